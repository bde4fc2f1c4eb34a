//! Error types for blockfit.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`BlockFitError`].
pub type Result<T> = std::result::Result<T, BlockFitError>;

/// Broad classes of failure, used by callers to decide how to report an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The environment or the run options are unusable.
    Configuration,
    /// The mesh specification handed to the writer is inconsistent.
    Specification,
    /// An output file of the meshing tool could not be parsed.
    Format,
    /// The meshing tool failed or did not produce its output.
    ExternalTool,
    /// Plain file I/O failure.
    Io,
}

/// Errors that can occur while writing, meshing, or reading a case.
#[derive(Error, Debug)]
pub enum BlockFitError {
    /// None of the accepted executable names could be resolved.
    #[error("no meshing executable found (tried {})", candidates.join(", "))]
    ExecutableNotFound {
        /// The executable names that were probed.
        candidates: Vec<String>,
    },

    /// A block uses an edge that has no grading entry.
    #[error("block {block} uses edge ({v0}, {v1}) which has no grading entry")]
    MissingEdgeGrading {
        /// Index of the block.
        block: usize,
        /// Smaller vertex index of the edge.
        v0: usize,
        /// Larger vertex index of the edge.
        v1: usize,
    },

    /// An element of the specification references a vertex that does not exist.
    #[error("{element} references invalid vertex index {vertex} (only {count} vertices)")]
    InvalidVertexIndex {
        /// Description of the referencing element, e.g. `block 3`.
        element: String,
        /// The invalid vertex index.
        vertex: usize,
        /// Number of vertices in the specification.
        count: usize,
    },

    /// A line of a mesh file does not have the expected shape.
    #[error("{}:{line}: {message}", path.display())]
    Format {
        /// The file being parsed.
        path: PathBuf,
        /// 1-based line number, or 0 when the problem concerns the file as a whole.
        line: usize,
        /// What was wrong with the line.
        message: String,
    },

    /// The meshing tool exited unsuccessfully.
    #[error("{} failed with {status}: {stderr}", program.display())]
    ToolFailed {
        /// The executable that was run.
        program: PathBuf,
        /// Exit status description.
        status: String,
        /// Tail of the captured standard error.
        stderr: String,
    },

    /// The meshing tool finished but an expected output file is absent.
    #[error("expected mesh output {} was not produced", path.display())]
    MissingOutput {
        /// The missing file.
        path: PathBuf,
    },

    /// A case description file could not be decoded.
    #[error("invalid case file {}: {message}", path.display())]
    Config {
        /// The case file.
        path: PathBuf,
        /// Decoder message.
        message: String,
    },

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl BlockFitError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        BlockFitError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create a format error for `path` at the 1-based `line`.
    pub fn format<P: Into<PathBuf>, M: Into<String>>(path: P, line: usize, message: M) -> Self {
        BlockFitError::Format {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    /// The class of failure this error belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            BlockFitError::ExecutableNotFound { .. }
            | BlockFitError::InvalidParameter { .. }
            | BlockFitError::Config { .. } => ErrorCategory::Configuration,
            BlockFitError::MissingEdgeGrading { .. } | BlockFitError::InvalidVertexIndex { .. } => {
                ErrorCategory::Specification
            }
            BlockFitError::Format { .. } => ErrorCategory::Format,
            BlockFitError::ToolFailed { .. } | BlockFitError::MissingOutput { .. } => {
                ErrorCategory::ExternalTool
            }
            BlockFitError::Io(_) => ErrorCategory::Io,
        }
    }
}
