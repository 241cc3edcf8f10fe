//! Ghostscript-style print pipeline
//!
//! Builds the rasterizer invocation for a rendered document and runs it.
//! The argument list is a pure function of the job and the OS family, so
//! both output-device addressing forms can be tested without a printer.

use crate::error::{PrintError, PrintResult};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::process::Command;
use tracing::info;

/// Host OS family, which decides the output-device addressing form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OsFamily {
    Windows,
    Unix,
}

impl OsFamily {
    /// Family of the running host
    pub fn current() -> Self {
        if cfg!(windows) {
            OsFamily::Windows
        } else {
            OsFamily::Unix
        }
    }
}

/// One print job for a rendered artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    /// Local rendered document
    pub artifact: PathBuf,
    /// Target printer name
    pub printer: String,
    /// Copies to produce
    pub copies: u32,
    /// Rasterizer output device
    pub device: String,
}

/// Output-device argument for the target printer
///
/// Windows drivers address the printer as `%printer%NAME`; everywhere else
/// the rasterizer pipes the document to `lp` for NAME. The two forms are
/// mutually exclusive.
pub fn output_target(family: OsFamily, printer: &str) -> String {
    match family {
        OsFamily::Windows => format!("%printer%{printer}"),
        OsFamily::Unix => format!("%|lp{printer}"),
    }
}

/// Build the full rasterizer argument list for `job`
pub fn build_args(job: &PrintJob, family: OsFamily) -> Vec<String> {
    vec![
        "-dPrinted".to_string(),
        "-dBATCH".to_string(),
        "-dNOPAUSE".to_string(),
        "-dQUIET".to_string(),
        "-dNOSAFER".to_string(),
        format!("-dNumCopies={}", job.copies),
        format!("-sDEVICE={}", job.device),
        format!("-sOutputFile={}", output_target(family, &job.printer)),
        job.artifact.to_string_lossy().into_owned(),
    ]
}

/// Trait for print pipeline adapters
#[async_trait]
pub trait PrintPipeline: Send + Sync {
    /// Send one rendered artifact to the printer
    async fn print(&self, job: &PrintJob) -> PrintResult<()>;
}

/// Pipeline invoking an external Ghostscript-compatible rasterizer
#[derive(Debug, Clone)]
pub struct GhostscriptPipeline {
    command: String,
    family: OsFamily,
}

impl GhostscriptPipeline {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            family: OsFamily::current(),
        }
    }

    /// Override the OS family (tests, cross-targeted spoolers)
    pub fn with_family(mut self, family: OsFamily) -> Self {
        self.family = family;
        self
    }
}

#[async_trait]
impl PrintPipeline for GhostscriptPipeline {
    async fn print(&self, job: &PrintJob) -> PrintResult<()> {
        if job.printer.is_empty() {
            return Err(PrintError::InvalidJob("no printer selected".to_string()));
        }
        if job.copies == 0 {
            return Err(PrintError::InvalidJob(
                "copy count must be at least 1".to_string(),
            ));
        }

        let args = build_args(job, self.family);
        info!(
            command = %self.command,
            printer = %job.printer,
            copies = job.copies,
            "sending document to printer"
        );

        let status = Command::new(&self.command)
            .args(&args)
            .status()
            .await
            .map_err(|source| PrintError::Spawn {
                command: self.command.clone(),
                source,
            })?;

        if !status.success() {
            return Err(PrintError::ExitStatus {
                command: self.command.clone(),
                status,
            });
        }

        info!(artifact = %job.artifact.display(), "print job sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job() -> PrintJob {
        PrintJob {
            artifact: PathBuf::from("artifacts/Order#42.pdf"),
            printer: "EPSON-TM20".to_string(),
            copies: 2,
            device: "mswinpr2".to_string(),
        }
    }

    #[test]
    fn windows_addressing() {
        assert_eq!(
            output_target(OsFamily::Windows, "EPSON-TM20"),
            "%printer%EPSON-TM20"
        );
    }

    #[test]
    fn unix_addressing() {
        assert_eq!(output_target(OsFamily::Unix, "EPSON-TM20"), "%|lpEPSON-TM20");
    }

    #[test]
    fn args_are_a_pure_function_of_the_job() {
        let args = build_args(&job(), OsFamily::Windows);
        assert_eq!(
            args,
            vec![
                "-dPrinted",
                "-dBATCH",
                "-dNOPAUSE",
                "-dQUIET",
                "-dNOSAFER",
                "-dNumCopies=2",
                "-sDEVICE=mswinpr2",
                "-sOutputFile=%printer%EPSON-TM20",
                "artifacts/Order#42.pdf",
            ]
        );
        assert_eq!(build_args(&job(), OsFamily::Windows), args);
    }

    #[test]
    fn families_differ_only_in_output_target() {
        let windows = build_args(&job(), OsFamily::Windows);
        let unix = build_args(&job(), OsFamily::Unix);
        assert_eq!(windows.len(), unix.len());
        let diff: Vec<_> = windows
            .iter()
            .zip(&unix)
            .filter(|(w, u)| w != u)
            .collect();
        assert_eq!(diff.len(), 1);
        assert!(diff[0].0.starts_with("-sOutputFile="));
    }

    #[tokio::test]
    async fn empty_printer_is_rejected_before_spawning() {
        let pipeline = GhostscriptPipeline::new("definitely-not-a-real-rasterizer");
        let mut invalid = job();
        invalid.printer.clear();

        match pipeline.print(&invalid).await {
            Err(PrintError::InvalidJob(_)) => {}
            other => panic!("expected InvalidJob, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn zero_copies_is_rejected_before_spawning() {
        let pipeline = GhostscriptPipeline::new("definitely-not-a-real-rasterizer");
        let mut invalid = job();
        invalid.copies = 0;

        assert!(matches!(
            pipeline.print(&invalid).await,
            Err(PrintError::InvalidJob(_))
        ));
    }
}
