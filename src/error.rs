use thiserror::Error;

#[derive(Debug, Error)]
pub enum AigitError {
   #[error("{0}")]
   ConfigMissing(String),

   #[error("Invalid config: {0}")]
   ConfigInvalid(String),

   #[error("Git command failed: {0}")]
   GitError(String),

   #[error("No {what} changes")]
   NoChanges { what: String },

   #[error("{provider} API error: {message}")]
   ProviderError { provider: &'static str, message: String },

   #[error("No response from {provider}")]
   EmptyResponse { provider: &'static str },

   #[error("Request timed out after {secs}s")]
   Timeout { secs: u64 },

   #[error("API request failed (HTTP {status}): {body}")]
   ApiError { status: u16, body: String },

   #[error("pre-commit hook at {path} was not installed by aigit, refusing to remove")]
   HookModified { path: String },

   #[error("Code review found high severity issues")]
   ReviewBlocked,

   #[error("IO error: {0}")]
   IoError(#[from] std::io::Error),

   #[error("JSON error: {0}")]
   JsonError(#[from] serde_json::Error),

   #[error("HTTP error: {0}")]
   HttpError(#[from] reqwest::Error),

   #[error("{0}")]
   Other(String),
}

pub type Result<T> = std::result::Result<T, AigitError>;
