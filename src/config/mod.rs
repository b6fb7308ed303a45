mod app_config;

pub use app_config::{
    AppConfig, AwsConfig, DownloadConfig, LogFormat, LoggingConfig, ProvisioningConfig,
};
