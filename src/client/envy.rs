use serde::Deserialize;

const API_URL: &str = "https://api.runpod.ai/v2";

#[derive(Debug, Clone, Deserialize)]
pub struct ClientEnvy {
    pub runpod_endpoint_id: String,
    pub runpod_api_key: String,
    /// Overrides the whole endpoint base, e.g. `http://localhost:8000` for a
    /// worker serving its local API.
    pub runpod_api_url: Option<String>,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
    pub max_polls: Option<u32>,
}

fn default_poll_interval_secs() -> u64 {
    10
}

impl ClientEnvy {
    pub fn endpoint_url(&self) -> String {
        match &self.runpod_api_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("{}/{}", API_URL, self.runpod_endpoint_id),
        }
    }
}
