pub mod app;
pub mod client;
pub mod config;
pub mod controller;
pub mod errors;
pub mod filters;
pub mod format;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod state;
pub mod store;
pub mod ui;
pub mod view;

pub use app::router;
pub use config::Config;
pub use state::AppState;
