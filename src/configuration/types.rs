//! Core types used by the configuration subsystem.

use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;

/// Execution environment for the runtime tooling.
///
/// Passed explicitly into every component that shells out or touches the
/// filesystem, so instances can run against independent directories and
/// tests can run in parallel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Environment {
    /// Numeric uid container units are launched under.
    pub uid: u32,
    /// Numeric gid container units are launched under.
    pub gid: u32,
    /// Directory probed first when resolving external executables.
    pub tools_dir: PathBuf,
    /// Directory holding per-instance identifier files.
    pub run_dir: PathBuf,
    /// Directory the runtime reads its network definitions from.
    pub network_dir: PathBuf,
    /// Prefix launch and stop commands with `sudo`.
    pub use_sudo: bool,
    /// systemd slice transient container units are placed in.
    pub cgroup_slice: String,
}

impl Default for Environment {
    fn default() -> Self {
        Environment {
            uid: 36,
            gid: 36,
            tools_dir: PathBuf::from("/usr/libexec/rktkeeper"),
            run_dir: PathBuf::from("/run/rktkeeper"),
            network_dir: PathBuf::from("/etc/rkt/net.d"),
            use_sudo: false,
            cgroup_slice: String::from("machine.slice"),
        }
    }
}

/// Immutable launch parameters for one container instance.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunConfig {
    /// Image reference or path handed to the run command.
    pub image_path: String,
    /// Name of the network the container attaches to.
    pub network: String,
    /// Memory budget in mebibytes.
    pub memory_size_mib: u64,
}

/// Desired logical network configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NetworkConfig {
    pub name: String,
    pub bridge: String,
    pub subnet: Ipv4Addr,
    pub mask: u8,
}

/// Bounded-retry policy for readiness polling.
///
/// Readiness checks block the calling thread: the only timeout is
/// `attempts` times `delay`.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            attempts: 30,
            delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Zero-delay policy with the given attempt budget.
    pub fn immediate(attempts: u32) -> Self {
        RetryPolicy {
            attempts,
            delay: Duration::ZERO,
        }
    }
}
