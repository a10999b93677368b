pub mod analyzers;
pub mod config;
pub mod date;
pub mod error;
pub mod fetch;
pub mod infra;
pub mod output;
pub mod server;
pub mod services;
pub mod webhook;
