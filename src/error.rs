use thiserror::Error;

/// Errors surfaced to callers of [`crate::ApiClient`].
///
/// Every expected failure mode of an API call maps onto exactly one
/// variant; callers branch on the `Result` instead of catching anything.
/// The `Display` strings are the user-facing messages the UI shows in
/// toasts, so they stay in the product's language.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request exceeded the configured wall-clock timeout and was
    /// aborted client-side.
    #[error("La requête a expiré. Veuillez réessayer.")]
    Timeout,

    /// Transport-level failure (DNS, connection refused, reset).
    #[error("Une erreur est survenue")]
    Network(#[source] reqwest::Error),

    /// The server answered with an error status and a parseable message.
    #[error("{0}")]
    Api(String),

    /// The server answered with a body that was not the JSON we expected,
    /// or an error status with no usable message field.
    #[error("Une erreur est survenue")]
    MalformedResponse,

    /// Authentication could not be restored: no refresh token stored, or
    /// the refresh call itself was rejected. Stored credentials have been
    /// cleared by the time this is returned.
    #[error("Session expirée, veuillez vous reconnecter")]
    AuthExpired,

    /// Defect-class errors (client construction, unserializable payloads).
    #[error("Internal error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// True when the error should send the user back to the login screen.
    pub fn is_auth_expired(&self) -> bool {
        matches!(self, ApiError::AuthExpired)
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
