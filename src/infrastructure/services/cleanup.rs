//! Error policy for delete-before-recreate steps

use tracing::warn;

use crate::domain::DomainError;

/// Tolerate the failures an idempotent cleanup step is expected to hit.
///
/// Not-found is silent, transient errors are logged and skipped, anything
/// else (access denied, validation) aborts. `None` means the step was skipped.
pub(crate) fn tolerate<T>(
    result: Result<T, DomainError>,
    kind: &str,
    name: &str,
) -> Result<Option<T>, DomainError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) if e.is_retryable() => {
            warn!(kind, name, error = %e, "Cleanup failed, continuing");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

/// Whether a cleanup delete actually removed something
pub(crate) fn deleted(
    result: Result<bool, DomainError>,
    kind: &str,
    name: &str,
) -> Result<bool, DomainError> {
    Ok(tolerate(result, kind, name)?.unwrap_or(false))
}
