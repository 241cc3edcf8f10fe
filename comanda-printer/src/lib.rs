//! # comanda-printer
//!
//! Rasterizer-driven printing - low-level pipeline invocation only.
//!
//! ## Scope
//!
//! This crate handles HOW a rendered document reaches the printer:
//! - output-device addressing per OS family
//! - rasterizer argument building (a pure function, testable without a
//!   printer)
//! - external process invocation
//!
//! WHAT gets printed (template choice, status reporting, artifact
//! lifecycle) stays in the relay server.
//!
//! ## Example
//!
//! ```ignore
//! use comanda_printer::{GhostscriptPipeline, PrintJob, PrintPipeline};
//!
//! let pipeline = GhostscriptPipeline::new("gs");
//! let job = PrintJob {
//!     artifact: "artifacts/Order#42.pdf".into(),
//!     printer: "EPSON-TM20".into(),
//!     copies: 2,
//!     device: "mswinpr2".into(),
//! };
//! pipeline.print(&job).await?;
//! ```

mod error;
mod pipeline;

// Re-exports
pub use error::{PrintError, PrintResult};
pub use pipeline::{GhostscriptPipeline, OsFamily, PrintJob, PrintPipeline, build_args, output_target};
