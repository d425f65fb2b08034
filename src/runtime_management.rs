//! Runtime management subsystem.
//!
//! Drives the start/stop lifecycle of single rkt containers through the
//! external `rkt` executable. The tool forks its pods and writes their
//! identifier files at an unspecified later time, so starting is a
//! readiness protocol, not a single call: launch, poll for the identifier,
//! poll for the running state.
//!
//! Re-exports:
//! - [`RktRuntime`]: the per-instance lifecycle controller.
//! - [`ContainerRunner`], [`SystemdRunner`]: the process-driving seam.
//! - [`RuntimeState`], [`StatusReport`]: decoded status reporting.
//!
//! Example (non-running):
//! ```ignore
//! use rktkeeper::configuration::types::{Environment, RetryPolicy, RunConfig};
//! use rktkeeper::runtime_management::RktRuntime;
//!
//! let env = Environment::default();
//! let conf = RunConfig {
//!     image_path: "/var/lib/images/httpd.aci".into(),
//!     network: "testnet".into(),
//!     memory_size_mib: 128,
//! };
//! let mut runtime = RktRuntime::new(env, conf, RetryPolicy::default());
//! runtime.start(None)?;
//! println!("started as {:?}", runtime.runtime_name());
//! runtime.stop()?;
//! # Ok::<(), rktkeeper::error_handling::types::RuntimeError>(())
//! ```

pub mod retry;
pub mod runner;
pub mod runtime;
pub mod types;

pub use runner::{ContainerRunner, SystemdRunner};
pub use runtime::{parse_keyval, RktRuntime, TOOL_NAME};
pub use types::{RuntimeState, StatusReport};
