use thiserror::Error;

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    #[error("Transient error from {service}: {message}")]
    Transient { service: String, message: String },

    #[error("Service error from {service}: {message}")]
    Service { service: String, message: String },

    #[error("Provisioning failed for {resource}: {}", .reasons.join("; "))]
    ProvisioningFailure {
        resource: String,
        reasons: Vec<String>,
    },

    #[error("Deadline exceeded waiting for {operation} after {attempts} attempts ({elapsed_ms} ms)")]
    DeadlineExceeded {
        operation: String,
        attempts: u32,
        elapsed_ms: u64,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn transient(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transient {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn provisioning_failure(resource: impl Into<String>, reasons: Vec<String>) -> Self {
        let reasons = if reasons.is_empty() {
            vec!["Unknown error".to_string()]
        } else {
            reasons
        };

        Self::ProvisioningFailure {
            resource: resource.into(),
            reasons,
        }
    }

    pub fn deadline_exceeded(operation: impl Into<String>, attempts: u32, elapsed_ms: u64) -> Self {
        Self::DeadlineExceeded {
            operation: operation.into(),
            attempts,
            elapsed_ms,
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether the caller may retry the failed call unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
