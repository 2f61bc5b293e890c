use std::env;
use tracing::warn;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8081";
pub const DEFAULT_API_PREFIX: &str = "/api";
pub const DEFAULT_RESULTS_PATH: &str = "resultados-medicos";

const APPOINTMENTS_PATH: &str = "citas";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    /// Origin of the REST backend, e.g. `http://127.0.0.1:8081`.
    pub backend_url: String,
    /// Path segment in front of every collection; may be empty.
    pub api_prefix: String,
    pub results_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

impl Config {
    pub fn new(backend_url: impl Into<String>) -> Self {
        Self {
            port: DEFAULT_PORT,
            backend_url: backend_url.into(),
            api_prefix: DEFAULT_API_PREFIX.to_string(),
            results_path: DEFAULT_RESULTS_PATH.to_string(),
        }
    }

    pub fn from_env() -> Self {
        let port = match env::var("PORT") {
            Ok(value) => value.parse::<u16>().unwrap_or_else(|_| {
                warn!(%value, "PORT is not a valid port, using {DEFAULT_PORT}");
                DEFAULT_PORT
            }),
            Err(_) => DEFAULT_PORT,
        };
        let backend_url =
            env::var("BACKEND_URL").unwrap_or_else(|_| DEFAULT_BACKEND_URL.to_string());
        let api_prefix = env::var("API_PREFIX").unwrap_or_else(|_| DEFAULT_API_PREFIX.to_string());
        let results_path =
            env::var("RESULTS_PATH").unwrap_or_else(|_| DEFAULT_RESULTS_PATH.to_string());

        Self {
            port,
            backend_url,
            api_prefix,
            results_path,
        }
    }

    pub fn appointments_url(&self) -> String {
        self.collection_url(APPOINTMENTS_PATH)
    }

    pub fn results_url(&self) -> String {
        self.collection_url(&self.results_path)
    }

    fn collection_url(&self, collection: &str) -> String {
        let origin = self.backend_url.trim().trim_end_matches('/');
        let prefix = self.api_prefix.trim().trim_matches('/');
        let collection = collection.trim().trim_matches('/');
        if prefix.is_empty() {
            format!("{origin}/{collection}")
        } else {
            format!("{origin}/{prefix}/{collection}")
        }
    }
}
