//! Shared application state.
//!
//! A single `Controller` backs every browser that opens the page, so drafts
//! and notices are visible to whoever renders next. The app is meant for one
//! operator at a time.

use crate::client::ResourceClient;
use crate::config::Config;
use crate::controller::Controller;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Mutex<Controller>>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let http = reqwest::Client::new();
        let controller = Controller::new(
            ResourceClient::new(http.clone(), config.appointments_url()),
            ResourceClient::new(http, config.results_url()),
        );
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }
}
