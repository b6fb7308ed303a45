//! Infrastructure layer - Cloud SDK adapters and provisioning services

pub mod aws;
pub mod fetch;
pub mod logging;
pub mod services;
