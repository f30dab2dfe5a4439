pub mod args;
pub mod config;
pub mod errors;
pub mod models;
pub mod output;
pub mod runner;
pub mod service;
