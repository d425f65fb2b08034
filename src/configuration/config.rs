use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use super::types::{Environment, NetworkConfig, RetryPolicy, RunConfig};
use crate::error_handling::types::ConfigError;

/// Pattern network and bridge names must match before they are spliced into
/// command lines and file names.
const NAME_PATTERN: &str = "^[A-Za-z][A-Za-z0-9_.-]*$";

/// Bridged networks need at least two host bits (gateway plus container).
const MAX_MASK: u8 = 30;

/// Complete configuration for one supervised container instance.
///
/// Loaded from a TOML file with three sections: `[environment]` (optional,
/// field-wise defaults), `[container]` and `[network]` (required), plus an
/// optional `[retry]` section tuning the readiness polling.
///
/// # Example
///
/// ```toml
/// [container]
/// image_path = "/var/lib/images/httpd.aci"
/// network = "testnet"
/// memory_size_mib = 128
///
/// [network]
/// name = "testnet"
/// bridge = "br0"
/// subnet = "10.0.0.0"
/// mask = 24
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub environment: Environment,
    pub container: RunConfig,
    pub network: NetworkConfig,
    pub retry: RetryPolicy,
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    environment: Environment,
    container: RunConfig,
    network: NetworkConfig,
    #[serde(default)]
    retry: RetrySection,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct RetrySection {
    attempts: u32,
    delay_ms: u64,
}

impl Default for RetrySection {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        RetrySection {
            attempts: policy.attempts,
            delay_ms: policy.delay.as_millis() as u64,
        }
    }
}

impl Config {
    /// Loads and validates a configuration file.
    pub fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let raw: RawConfig =
            toml::from_str(&text).map_err(|e| ConfigError::TomlError(e.to_string()))?;
        let config = Config {
            environment: raw.environment,
            container: raw.container,
            network: raw.network,
            retry: RetryPolicy {
                attempts: raw.retry.attempts,
                delay: Duration::from_millis(raw.retry.delay_ms),
            },
        };
        config.validate()?;
        debug!("configuration loaded from {}", path.display());
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let name_re = Regex::new(NAME_PATTERN).expect("valid pattern");
        for (what, value) in [
            ("network name", self.network.name.as_str()),
            ("bridge name", self.network.bridge.as_str()),
            ("container network", self.container.network.as_str()),
        ] {
            if !name_re.is_match(value) {
                return Err(ConfigError::BadName(format!(
                    "{} {:?} does not match {}",
                    what, value, NAME_PATTERN
                )));
            }
        }
        if self.network.mask == 0 || self.network.mask > MAX_MASK {
            return Err(ConfigError::BadMaskRange(format!(
                "mask {} not in 1..={}",
                self.network.mask, MAX_MASK
            )));
        }
        if self.container.memory_size_mib == 0 {
            return Err(ConfigError::BadMemorySize(
                "memory_size_mib must be positive".to_string(),
            ));
        }
        if self.retry.attempts == 0 {
            return Err(ConfigError::BadRetry(
                "attempts must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::net::Ipv4Addr;
    use std::path::PathBuf;

    const FULL: &str = r#"
[environment]
uid = 0
gid = 0
tools_dir = "/opt/tools"
run_dir = "/tmp/rktkeeper-test"
network_dir = "/tmp/rktkeeper-net"
use_sudo = true
cgroup_slice = "containers.slice"

[container]
image_path = "/var/lib/images/httpd.aci"
network = "testnet"
memory_size_mib = 128

[network]
name = "testnet"
bridge = "br0"
subnet = "10.0.0.0"
mask = 24

[retry]
attempts = 5
delay_ms = 100
"#;

    const MINIMAL: &str = r#"
[container]
image_path = "/var/lib/images/httpd.aci"
network = "testnet"
memory_size_mib = 128

[network]
name = "testnet"
bridge = "br0"
subnet = "10.0.0.0"
mask = 24
"#;

    fn write_config(text: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(text.as_bytes()).unwrap();
        (dir, path)
    }

    #[test]
    fn full_config_parses() {
        let (_dir, path) = write_config(FULL);
        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.environment.uid, 0);
        assert!(config.environment.use_sudo);
        assert_eq!(config.environment.cgroup_slice, "containers.slice");
        assert_eq!(config.environment.run_dir, PathBuf::from("/tmp/rktkeeper-test"));

        assert_eq!(config.container.image_path, "/var/lib/images/httpd.aci");
        assert_eq!(config.container.memory_size_mib, 128);

        assert_eq!(config.network.name, "testnet");
        assert_eq!(config.network.bridge, "br0");
        assert_eq!(config.network.subnet, Ipv4Addr::new(10, 0, 0, 0));
        assert_eq!(config.network.mask, 24);

        assert_eq!(config.retry.attempts, 5);
        assert_eq!(config.retry.delay, Duration::from_millis(100));
    }

    #[test]
    fn omitted_sections_use_defaults() {
        let (_dir, path) = write_config(MINIMAL);
        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.environment, Environment::default());
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn partial_environment_keeps_field_defaults() {
        let text = MINIMAL.replace(
            "[container]",
            "[environment]\nrun_dir = \"/tmp/elsewhere\"\n\n[container]",
        );
        let (_dir, path) = write_config(&text);
        let config = Config::from_file(&path).unwrap();

        assert_eq!(config.environment.run_dir, PathBuf::from("/tmp/elsewhere"));
        assert_eq!(config.environment.uid, 36);
        assert_eq!(config.environment.network_dir, PathBuf::from("/etc/rkt/net.d"));
    }

    #[test]
    fn bad_bridge_name_is_rejected() {
        let text = MINIMAL.replace("bridge = \"br0\"", "bridge = \"br 0\"");
        let (_dir, path) = write_config(&text);
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::BadName(_))
        ));
    }

    #[test]
    fn mask_out_of_range_is_rejected() {
        for bad in ["mask = 0", "mask = 31"] {
            let text = MINIMAL.replace("mask = 24", bad);
            let (_dir, path) = write_config(&text);
            assert!(matches!(
                Config::from_file(&path),
                Err(ConfigError::BadMaskRange(_))
            ));
        }
    }

    #[test]
    fn zero_memory_is_rejected() {
        let text = MINIMAL.replace("memory_size_mib = 128", "memory_size_mib = 0");
        let (_dir, path) = write_config(&text);
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::BadMemorySize(_))
        ));
    }

    #[test]
    fn zero_retry_attempts_is_rejected() {
        let text = format!("{}\n[retry]\nattempts = 0\n", MINIMAL);
        let (_dir, path) = write_config(&text);
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::BadRetry(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::from_file(&dir.path().join("absent.toml")),
            Err(ConfigError::IoError(_))
        ));
    }

    #[test]
    fn malformed_toml_is_toml_error() {
        let (_dir, path) = write_config("not = [valid");
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::TomlError(_))
        ));
    }

    #[test]
    fn missing_container_section_is_toml_error() {
        let (_dir, path) = write_config("[network]\nname = \"n\"\nbridge = \"b\"\nsubnet = \"10.0.0.0\"\nmask = 24\n");
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::TomlError(_))
        ));
    }
}
