//! Client error types

use crate::endpoint::EndpointError;
use thiserror::Error;

/// Client error type
///
/// Transport failures never show up here: the request loop degrades them
/// to an empty result. What remains is configuration.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Backend endpoint missing or unusable
    #[error(transparent)]
    Endpoint(#[from] EndpointError),
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
