pub mod adapters;
pub mod config;
pub mod tool_server;
