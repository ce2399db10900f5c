fn main() -> eframe::Result<()> {
    env_logger::init();
    let native_options = eframe::NativeOptions::default();
    eframe::run_native(
        "RallyBane",
        native_options,
        Box::new(|cc| Ok(Box::new(rallybane::app::TrackApp::new(cc)))),
    )
}
