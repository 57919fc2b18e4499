// Presentation layer - HTTP routes and response mapping
pub mod app_state;
pub mod handlers;
