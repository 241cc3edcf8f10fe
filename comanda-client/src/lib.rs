//! # comanda-client
//!
//! HTTP client for the remote order-management backend.
//!
//! ## Scope
//!
//! This crate handles HOW the backend is reached:
//! - endpoint normalization (LAN hosts stay on plain http, public hosts
//!   are forced to https)
//! - the fail-soft retry policy: transport errors are retried a fixed
//!   number of times and then degraded to an empty result, never thrown
//!   past the client boundary
//! - the typed webservice calls and document URLs
//!
//! Rendering and printing are the relay server's job.

mod endpoint;
mod error;
mod http;

pub use endpoint::{EndpointError, normalize};
pub use error::{ClientError, ClientResult};
pub use http::{BackendClient, download_url, print_view_url, profile_url};
