use crate::domain::errors::BoxError;
use crate::domain::models::SecretKeyRef;

/// Supplies secret material by reference.
///
/// Resolution happens inside the synchronous merge, so implementations must
/// answer without awaiting network I/O.
pub trait CredentialResolver: Send + Sync {
    /// Look up one secret field. `Ok(None)` means the secret or key does not
    /// exist.
    fn resolve(&self, reference: &SecretKeyRef) -> Result<Option<String>, BoxError>;
}
