pub mod app;
pub mod catalog;
pub mod document;
pub mod model;
pub mod scene;
