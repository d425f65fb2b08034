pub mod command;
pub mod configuration;
pub mod error_handling;
pub mod fsutil;
pub mod netconf;
pub mod runtime_management;

pub use command::Executable;
pub use configuration::config::Config;
pub use configuration::types::{Environment, NetworkConfig, RetryPolicy, RunConfig};
pub use netconf::{with_network, NetworkDefinition, NetworkFile};
pub use runtime_management::{RktRuntime, RuntimeState, StatusReport};
