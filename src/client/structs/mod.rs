pub mod run_response;
pub mod status_response;
