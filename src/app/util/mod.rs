pub mod dotenv;
pub mod janitor;
pub mod logging;
pub mod time;
