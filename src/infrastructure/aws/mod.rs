//! AWS SDK implementations of the cloud ports

mod bedrock_agent;
mod error;
mod iam;
mod retrieval;
mod s3;
mod s3_vectors;
mod sts;

pub use bedrock_agent::BedrockKnowledgeBaseClient;
pub use error::classify;
pub use iam::IamAccessClient;
pub use retrieval::KnowledgeBaseRetriever;
pub use s3::S3ObjectStoreClient;
pub use s3_vectors::S3VectorStoreClient;
pub use sts::StsIdentityClient;

use crate::config::AwsConfig;

/// Load the shared SDK configuration for a region and optional profile
pub async fn load_sdk_config(config: &AwsConfig) -> aws_config::SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.region.clone()));

    if let Some(profile) = &config.profile {
        loader = loader.profile_name(profile);
    }

    loader.load().await
}
