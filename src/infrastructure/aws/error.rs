//! Classification of AWS SDK errors into domain errors

use std::error::Error as StdError;

use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;

use crate::domain::DomainError;

const NOT_FOUND_CODES: &[&str] = &[
    "NotFoundException",
    "ResourceNotFoundException",
    "NoSuchEntity",
    "NoSuchBucket",
    "NoSuchKey",
];

const CONFLICT_CODES: &[&str] = &["BucketAlreadyExists", "ConflictException"];

const TRANSIENT_CODES: &[&str] = &[
    "ThrottlingException",
    "Throttling",
    "TooManyRequestsException",
    "RequestLimitExceeded",
    "SlowDown",
    "ServiceUnavailable",
    "ServiceUnavailableException",
    "InternalError",
    "InternalFailure",
    "InternalServerException",
    "RequestTimeout",
    "RequestTimeoutException",
];

/// Map an SDK error to the domain error taxonomy.
///
/// Errors without a service code never reached the service (dispatch
/// failures, timeouts) and are classified as transient.
pub fn classify<E>(service: &str, operation: &str, err: E) -> DomainError
where
    E: ProvideErrorMetadata + StdError + 'static,
{
    let message = format!("{} failed: {}", operation, DisplayErrorContext(&err));

    match err.code() {
        Some(code) if NOT_FOUND_CODES.contains(&code) => DomainError::not_found(message),
        Some(code) if CONFLICT_CODES.contains(&code) => DomainError::conflict(message),
        Some(code) if TRANSIENT_CODES.contains(&code) => DomainError::transient(service, message),
        Some(_) => DomainError::service(service, message),
        None => DomainError::transient(service, message),
    }
}
