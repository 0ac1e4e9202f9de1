pub mod client;
pub mod config;
pub mod error;
pub mod flatten;
pub mod logging;
pub mod models;
pub mod optout;
pub mod proceedings;
pub mod sink;
