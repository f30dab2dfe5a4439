use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct RunResponse {
    pub id: Option<String>,
    pub status: Option<String>,
}
