//! IAM policy documents for the knowledge base access role

use serde_json::{json, Value};

use super::naming::bucket_arn;

pub const POLICY_VERSION: &str = "2012-10-17";

/// Service principal that assumes the knowledge base role
pub const KNOWLEDGE_BASE_PRINCIPAL: &str = "bedrock.amazonaws.com";

/// Trust policy letting the knowledge base service assume the role
pub fn trust_policy() -> Value {
    json!({
        "Version": POLICY_VERSION,
        "Statement": [
            {
                "Effect": "Allow",
                "Principal": { "Service": KNOWLEDGE_BASE_PRINCIPAL },
                "Action": "sts:AssumeRole"
            }
        ]
    })
}

/// Permissions scoped to one bucket, the vector store and one embedding model.
///
/// Only the vector store action namespace is wildcarded.
pub fn permissions_policy(bucket: &str, embedding_model_arn: &str) -> Value {
    let bucket_arn = bucket_arn(bucket);

    json!({
        "Version": POLICY_VERSION,
        "Statement": [
            {
                "Effect": "Allow",
                "Action": ["s3vectors:*"],
                "Resource": "*"
            },
            {
                "Effect": "Allow",
                "Action": ["s3:GetObject", "s3:ListBucket"],
                "Resource": [bucket_arn, format!("{}/*", bucket_arn)]
            },
            {
                "Effect": "Allow",
                "Action": ["bedrock:InvokeModel"],
                "Resource": embedding_model_arn
            }
        ]
    })
}
