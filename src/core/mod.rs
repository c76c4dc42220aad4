pub mod backend;
pub mod config;
pub mod constants;
pub mod endpoint;
pub mod message;
pub mod widget;
