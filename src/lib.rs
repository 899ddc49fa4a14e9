pub mod api;
pub mod config;
pub mod datastore;
pub mod error;
pub mod server;
