//! On-disk network definition records.

use serde::{Deserialize, Serialize};

use crate::configuration::types::NetworkConfig;

/// IP address management block of a network definition.
///
/// Fields are declared in alphabetical order so the serialized form keeps
/// lexicographically sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ipam {
    pub subnet: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// One bridged network as the runtime tool reads it from its configuration
/// directory on every container launch.
///
/// Fields are declared in alphabetical order so the serialized form keeps
/// lexicographically sorted keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkDefinition {
    pub bridge: String,
    pub ipam: Ipam,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl NetworkDefinition {
    /// Builds the definition for network `name` from the desired
    /// configuration, with the fixed `bridge` / `host-local` type tags.
    pub fn from_desired(name: &str, desired: &NetworkConfig) -> Self {
        NetworkDefinition {
            bridge: desired.bridge.clone(),
            ipam: Ipam {
                subnet: format!("{}/{}", desired.subnet, desired.mask),
                kind: String::from("host-local"),
            },
            name: name.to_string(),
            kind: String::from("bridge"),
        }
    }

    /// Reconstructs the `{name, bridge, subnet, mask}` view from the stored
    /// CIDR string. Debug and test aid; `None` if the subnet field does not
    /// parse back.
    pub fn derived_conf(&self) -> Option<NetworkConfig> {
        let (subnet, mask) = self.ipam.subnet.split_once('/')?;
        Some(NetworkConfig {
            name: self.name.clone(),
            bridge: self.bridge.clone(),
            subnet: subnet.parse().ok()?,
            mask: mask.parse().ok()?,
        })
    }
}
