//! Resolution and invocation of external executables.
//!
//! Tools are resolved against the environment's `tools_dir` first, then
//! against every `$PATH` entry. Resolution happens once; the probe result is
//! carried by the [`Executable`] value so callers can check availability
//! before committing to an operation.

use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::configuration::types::Environment;
use crate::error_handling::types::{CommandError, RuntimeError};

/// A named external tool resolved against the environment.
#[derive(Debug, Clone)]
pub struct Executable {
    name: String,
    path: Option<PathBuf>,
}

impl Executable {
    /// Resolves `name`, checking the environment's tools directory before
    /// the `$PATH` entries.
    pub fn lookup(name: &str, env: &Environment) -> Self {
        let mut candidates = vec![env.tools_dir.join(name)];
        if let Some(path_var) = std::env::var_os("PATH") {
            for dir in std::env::split_paths(&path_var) {
                candidates.push(dir.join(name));
            }
        }
        let path = candidates.into_iter().find(|c| is_executable(c));
        debug!("executable {}: resolved to {:?}", name, path);
        Executable {
            name: name.to_string(),
            path,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True when a matching executable file was found.
    pub fn available(&self) -> bool {
        self.path.is_some()
    }

    pub fn path(&self) -> Result<&Path, CommandError> {
        self.path
            .as_deref()
            .ok_or_else(|| CommandError::NotFound(self.name.clone()))
    }
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

/// Runs a prepared command to completion and returns its stdout as text.
///
/// A non-zero exit is an operation failure carrying the captured stderr;
/// stdout that is not valid UTF-8 is a structural error.
pub fn output_of(cmd: &mut Command) -> Result<String, RuntimeError> {
    debug!("running {:?}", cmd);
    let out = cmd.output()?;
    if !out.status.success() {
        let stderr = String::from_utf8_lossy(&out.stderr);
        return Err(RuntimeError::OperationFailed(format!(
            "{:?} exited with {}: {}",
            cmd.get_program(),
            out.status,
            stderr.trim()
        )));
    }
    String::from_utf8(out.stdout).map_err(|_| {
        RuntimeError::MalformedStatus("command output is not valid UTF-8".to_string())
    })
}
