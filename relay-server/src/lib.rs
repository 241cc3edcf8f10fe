//! Relay server - polls the order backend and drives the local printer
//!
//! # Module structure
//!
//! ```text
//! relay-server/src/
//! ├── core/          # runtime state, background task management
//! ├── renderer       # order -> local PDF artifact
//! ├── dispatcher     # artifact -> print pipeline + status line
//! ├── poller         # periodic check cycle and interactive commands
//! ├── janitor        # artifact directory cleanup
//! └── progress       # cosmetic progress ticker
//! ```
//!
//! The poll worker owns the whole fetch → render → print path; the shell
//! (out of scope here) talks to it through a [`PollHandle`] and consumes
//! [`shared::FeedEvent`]s.

pub mod core;
pub mod dispatcher;
pub mod janitor;
pub mod poller;
pub mod progress;
pub mod renderer;

// Re-exports
pub use crate::core::state::AppState;
pub use crate::core::tasks::{BackgroundTasks, TaskKind};
pub use dispatcher::PrintDispatcher;
pub use janitor::{CleanupReport, cleanup, is_artifact_name};
pub use poller::{PollCommand, PollHandle, PollState, PollWorker};
pub use renderer::{CurlFetcher, Fetcher, OrderRenderer, RenderError, artifact_file_name};
