pub mod api;
pub mod config;
pub mod logs;
pub mod observability;
