// src/backend/lib.rs

pub mod adapter;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod session;
pub mod storage;
pub mod utils;

pub use api::{ActionResult, Completed, HealthChainClient};
pub use config::GatewayConfig;
pub use error::HealthError;
