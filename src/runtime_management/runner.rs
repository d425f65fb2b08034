//! Launch, stop and status plumbing for the external runtime tool.

use log::{debug, info};
use std::path::Path;
use std::process::Command;

use crate::command::{output_of, Executable};
use crate::configuration::types::Environment;
use crate::error_handling::types::RuntimeError;

/// Seam between the controller and the processes it drives.
///
/// The controller never builds command lines itself; it hands the resolved
/// tool and prepared arguments to a runner. Tests substitute a recording
/// mock here.
pub trait ContainerRunner {
    /// Launches the runtime tool with the prepared arguments. Returns once
    /// the launch vehicle has accepted the job; does not wait for the
    /// container itself.
    fn start(&self, tool: &Executable, args: &[String]) -> Result<(), RuntimeError>;

    /// Stops the instance addressed by its runtime name.
    fn stop(&self, runtime_name: &str) -> Result<(), RuntimeError>;

    /// Captures the stdout of the tool's status command for `identifier`.
    fn status(&self, tool: &Executable, identifier: &str) -> Result<String, RuntimeError>;
}

/// Production runner.
///
/// Launches the tool as a transient systemd unit so the container outlives
/// the calling process and lands in the configured slice under the
/// configured uid/gid. Stop goes through `machinectl`: the tool registers
/// each pod with systemd-machined under its runtime name.
pub struct SystemdRunner {
    env: Environment,
}

impl SystemdRunner {
    pub fn new(env: Environment) -> Self {
        SystemdRunner { env }
    }

    fn launch_argv(&self, tool_path: &Path, args: &[String]) -> Vec<String> {
        let mut argv = Vec::new();
        if self.env.use_sudo {
            argv.push(String::from("sudo"));
        }
        argv.push(String::from("systemd-run"));
        argv.push(format!("--slice={}", self.env.cgroup_slice));
        argv.push(format!("--uid={}", self.env.uid));
        argv.push(format!("--gid={}", self.env.gid));
        argv.push(String::from("--"));
        argv.push(tool_path.display().to_string());
        argv.extend(args.iter().cloned());
        argv
    }

    fn stop_argv(&self, runtime_name: &str) -> Vec<String> {
        let mut argv = Vec::new();
        if self.env.use_sudo {
            argv.push(String::from("sudo"));
        }
        argv.push(String::from("machinectl"));
        argv.push(String::from("poweroff"));
        argv.push(runtime_name.to_string());
        argv
    }

    fn run_argv(argv: Vec<String>) -> Result<String, RuntimeError> {
        let mut parts = argv.into_iter();
        let program = match parts.next() {
            Some(program) => program,
            None => return Err(RuntimeError::OperationFailed("empty command".to_string())),
        };
        let mut cmd = Command::new(program);
        cmd.args(parts);
        output_of(&mut cmd)
    }
}

impl ContainerRunner for SystemdRunner {
    fn start(&self, tool: &Executable, args: &[String]) -> Result<(), RuntimeError> {
        let argv = self.launch_argv(tool.path()?, args);
        info!("launching {} via systemd-run", tool.name());
        Self::run_argv(argv)?;
        Ok(())
    }

    fn stop(&self, runtime_name: &str) -> Result<(), RuntimeError> {
        info!("powering off {}", runtime_name);
        Self::run_argv(self.stop_argv(runtime_name))?;
        Ok(())
    }

    fn status(&self, tool: &Executable, identifier: &str) -> Result<String, RuntimeError> {
        let mut cmd = Command::new(tool.path()?);
        cmd.arg("status").arg(identifier);
        debug!("querying status of {}", identifier);
        output_of(&mut cmd)
    }
}
