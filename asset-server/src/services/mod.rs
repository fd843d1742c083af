//! Entity services
//!
//! Each mutating call validates its input, performs the repository write and
//! then records the change through [`AuditService`](crate::audit::AuditService).
//! A failed write records nothing; a failed audit write is logged and the
//! mutation result is returned unchanged.
//!
//! The write and its audit record run together on a spawned task (see
//! [`run_detached`]). Dropping the caller's future, on a request timeout or a
//! client disconnect, therefore never leaves a committed write unaudited.

pub mod asset;
pub mod category;
pub mod error;
pub mod location;

#[cfg(test)]
pub(crate) mod testing;

pub use asset::AssetService;
pub use category::{CategoryService, next_category_code};
pub use error::{ServiceError, ServiceResult};
pub use location::LocationService;

/// Drive `work` to completion on its own task and wait for the result
///
/// Cancelling the returned future only stops the wait.
async fn run_detached<T, F>(work: F) -> ServiceResult<T>
where
    F: Future<Output = ServiceResult<T>> + Send + 'static,
    T: Send + 'static,
{
    tokio::spawn(work)
        .await
        .map_err(|e| ServiceError::Interrupted(e.to_string()))?
}

/// Trimmed value, or a validation error when blank
fn require_non_blank(value: &str, field: &str) -> ServiceResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ServiceError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

/// Like [`require_non_blank`] for optional update fields
fn non_blank(value: Option<String>, field: &str) -> ServiceResult<Option<String>> {
    value.map(|v| require_non_blank(&v, field)).transpose()
}
