pub mod conf;
pub mod employee;
pub mod error;
pub mod server;
