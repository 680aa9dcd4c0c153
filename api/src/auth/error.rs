use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Request did not come through the identity gateway")]
    UntrustedProxy,

    #[error(transparent)]
    Storage(#[from] chirp_db::storage::StoreError),
}
