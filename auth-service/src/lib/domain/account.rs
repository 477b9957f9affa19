pub mod errors;
pub mod messages;
pub mod models;
pub mod ports;
pub mod service;
