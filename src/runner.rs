//! Locating and running the meshing tool.
//!
//! The tool is found through an [`ExecutableResolver`], so callers decide how
//! discovery works: [`SearchPath`] probes the accepted executable names on
//! `PATH`, [`FixedExecutable`] uses an explicit path.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::Instant;

use tracing::{debug, info};

use crate::error::{BlockFitError, Result};

/// Accepted executable names, in order of preference.
pub const EXECUTABLE_NAMES: [&str; 2] = ["blockMeshBodyFit", "blockMeshBoyFit"];

/// Lines of tool output kept in a [`BlockFitError::ToolFailed`] message.
const OUTPUT_TAIL_LINES: usize = 20;

/// Finds the meshing executable.
pub trait ExecutableResolver {
    /// Names or paths that will be tried, for error messages.
    fn candidates(&self) -> Vec<String>;

    /// Path of the executable, or `None` when it is not available.
    fn resolve(&self) -> Option<PathBuf>;
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Probes executable names in a list of directories.
#[derive(Debug, Clone)]
pub struct SearchPath {
    names: Vec<String>,
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    /// Probe `names` in `dirs`.
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>, dirs: Vec<PathBuf>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            dirs,
        }
    }

    /// Probe `names` in the directories of a `PATH`-style variable value.
    pub fn from_path_var<S: Into<String>>(
        names: impl IntoIterator<Item = S>,
        path_var: Option<OsString>,
    ) -> Self {
        let dirs = path_var
            .map(|v| env::split_paths(&v).collect())
            .unwrap_or_default();
        Self::new(names, dirs)
    }

    /// Probe the accepted executable names on the current `PATH`.
    pub fn from_env() -> Self {
        Self::from_path_var(EXECUTABLE_NAMES, env::var_os("PATH"))
    }
}

impl Default for SearchPath {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ExecutableResolver for SearchPath {
    fn candidates(&self) -> Vec<String> {
        self.names.clone()
    }

    fn resolve(&self) -> Option<PathBuf> {
        // Name order wins over directory order.
        for name in &self.names {
            for dir in &self.dirs {
                let candidate = dir.join(name);
                if is_executable(&candidate) {
                    return Some(candidate);
                }
                if cfg!(windows) {
                    let exe = candidate.with_extension("exe");
                    if is_executable(&exe) {
                        return Some(exe);
                    }
                }
            }
        }
        None
    }
}

/// An explicitly configured executable.
#[derive(Debug, Clone)]
pub struct FixedExecutable {
    path: PathBuf,
}

impl FixedExecutable {
    /// Use the executable at `path`.
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl ExecutableResolver for FixedExecutable {
    fn candidates(&self) -> Vec<String> {
        vec![self.path.display().to_string()]
    }

    fn resolve(&self) -> Option<PathBuf> {
        is_executable(&self.path).then(|| self.path.clone())
    }
}

fn tail(text: &[u8]) -> String {
    let text = String::from_utf8_lossy(text);
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(OUTPUT_TAIL_LINES);
    lines[start..].join("\n")
}

/// A resolved meshing executable.
#[derive(Debug, Clone)]
pub struct MeshTool {
    program: PathBuf,
}

impl MeshTool {
    /// Resolve the executable, failing with
    /// [`BlockFitError::ExecutableNotFound`] when it is not available.
    pub fn locate(resolver: &dyn ExecutableResolver) -> Result<Self> {
        let program = resolver
            .resolve()
            .ok_or_else(|| BlockFitError::ExecutableNotFound {
                candidates: resolver.candidates(),
            })?;
        debug!(program = %program.display(), "found meshing executable");
        Ok(Self { program })
    }

    /// Path of the executable.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run the tool on `case_dir` and wait for it to finish.
    ///
    /// Output is captured; on failure the last lines of standard error (or of
    /// standard output when standard error is empty) end up in the error.
    pub fn run(&self, case_dir: &Path) -> Result<()> {
        info!(program = %self.program.display(), case = %case_dir.display(), "running mesher");
        let started = Instant::now();

        let output = Command::new(&self.program)
            .arg("-case")
            .arg(case_dir)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| BlockFitError::ToolFailed {
                program: self.program.clone(),
                status: "failed to start".to_string(),
                stderr: e.to_string(),
            })?;

        debug!(
            elapsed = ?started.elapsed(),
            stdout_bytes = output.stdout.len(),
            "mesher finished"
        );

        if !output.status.success() {
            let mut message = tail(&output.stderr);
            if message.is_empty() {
                message = tail(&output.stdout);
            }
            return Err(BlockFitError::ToolFailed {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: message,
            });
        }
        Ok(())
    }
}
