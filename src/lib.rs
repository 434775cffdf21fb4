pub mod api;
pub mod broker;
pub mod config;
pub mod context;
pub mod error;
pub mod host;
pub mod model;
pub mod remote;
