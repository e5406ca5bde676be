use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("refusing to store an empty token")]
    EmptyToken,

    #[error("token store error: {0}")]
    TokenStoreError(String),
}
