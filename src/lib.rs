pub mod cli;
pub mod codec;
pub mod combine;
pub mod config;
pub mod logging;
pub mod model;
pub mod server;
pub mod store;
pub mod table;
