//! Lifecycle controller for a single rkt container instance.
//!
//! rkt assigns its pod identifier asynchronously: the run command forks the
//! pod, the identifier file appears at some later point, and only after that
//! can the pod be queried for status. [`RktRuntime`] bridges that onto a
//! synchronous start/stop API with bounded readiness polling.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::retry::retry;
use super::runner::{ContainerRunner, SystemdRunner};
use super::types::{RuntimeState, StatusReport};
use crate::command::Executable;
use crate::configuration::types::{Environment, NetworkConfig, RetryPolicy, RunConfig};
use crate::error_handling::types::{NetworkError, RuntimeError};
use crate::fsutil;
use crate::netconf;

/// Name of the external runtime tool.
pub const TOOL_NAME: &str = "rkt";

/// Prefix qualifying a pod identifier into the runtime name stop and
/// status operations are addressed by.
const RUNTIME_NAME_PREFIX: &str = "rkt-";

type ReadFile = Box<dyn Fn(&Path) -> io::Result<String>>;

/// Controller for one container instance.
///
/// Holds the instance identity, the identifier-file path derived from it,
/// and the pod identifier once discovered. Not designed for concurrent use:
/// callers must serialize `start`/`stop` on a given instance.
pub struct RktRuntime {
    run_conf: RunConfig,
    policy: RetryPolicy,
    uuid: Uuid,
    uuid_path: PathBuf,
    tool: Executable,
    runner: Box<dyn ContainerRunner>,
    read_file: ReadFile,
    rkt_uuid: Option<String>,
    pid: Option<i32>,
    state: RuntimeState,
    started_at: Option<DateTime<Utc>>,
}

impl RktRuntime {
    /// Creates a controller for a fresh instance.
    pub fn new(env: Environment, run_conf: RunConfig, policy: RetryPolicy) -> Self {
        Self::with_uuid(env, run_conf, policy, Uuid::new_v4())
    }

    /// Creates a controller for a known instance uuid, e.g. to address a
    /// container started by an earlier process.
    pub fn with_uuid(
        env: Environment,
        run_conf: RunConfig,
        policy: RetryPolicy,
        uuid: Uuid,
    ) -> Self {
        let runner = Box::new(SystemdRunner::new(env.clone()));
        Self::with_backends(env, run_conf, policy, uuid, runner, Box::new(fsutil::read_file))
    }

    /// Full constructor with injectable runner and file reader.
    pub fn with_backends(
        env: Environment,
        run_conf: RunConfig,
        policy: RetryPolicy,
        uuid: Uuid,
        runner: Box<dyn ContainerRunner>,
        read_file: ReadFile,
    ) -> Self {
        let uuid_path = env.run_dir.join(format!("{}.{}", uuid, TOOL_NAME));
        debug!("rkt instance {}: identifier file {}", uuid, uuid_path.display());
        let tool = Executable::lookup(TOOL_NAME, &env);
        RktRuntime {
            run_conf,
            policy,
            uuid,
            uuid_path,
            tool,
            runner,
            read_file,
            rkt_uuid: None,
            pid: None,
            state: RuntimeState::Unknown,
            started_at: None,
        }
    }

    /// Whether the runtime tool is present on this host.
    pub fn available(env: &Environment) -> bool {
        Executable::lookup(TOOL_NAME, env).available()
    }

    /// One-time runtime configuration, independent of any instance:
    /// reconcile the network definition the tool reads on each launch.
    pub fn configure_runtime(
        env: &Environment,
        desired: &NetworkConfig,
    ) -> Result<(), NetworkError> {
        netconf::with_network(&env.network_dir, &desired.name, |net| {
            net.update(desired);
            Ok(())
        })
    }

    /// Starts the container and blocks until the tool confirms it running.
    ///
    /// `target` overrides the configured image for this launch. Fails
    /// immediately when the instance is already attached to a pod. The two
    /// readiness phases (identifier discovery, running confirmation) retry
    /// per the configured policy; exhaustion surfaces as a terminal
    /// not-ready error.
    pub fn start(&mut self, target: Option<&str>) -> Result<(), RuntimeError> {
        if self.running() {
            return Err(RuntimeError::AlreadyRunning);
        }
        // A leftover identifier file from a previous instance must never be
        // readable once the new pod is launched.
        fsutil::rm_file(&self.uuid_path)?;

        let image = target.unwrap_or(&self.run_conf.image_path).to_string();
        let args = self.run_args(&image);
        info!("rkt instance {}: starting image {}", self.uuid, image);
        self.runner.start(&self.tool, &args)?;

        self.read_rkt_uuid()?;
        self.fetch_rkt_state()?;
        Ok(())
    }

    /// Stops the container addressed by its runtime name.
    ///
    /// Identifier-file removal is best effort: a failure is logged and
    /// swallowed, the pod is already down.
    pub fn stop(&mut self) -> Result<(), RuntimeError> {
        let name = self.runtime_name().ok_or(RuntimeError::NotRunning)?;
        self.runner.stop(&name)?;
        if let Err(e) = fsutil::rm_file(&self.uuid_path) {
            warn!(
                "rkt instance {}: failed to remove identifier file {}: {}",
                self.uuid,
                self.uuid_path.display(),
                e
            );
        }
        self.rkt_uuid = None;
        self.pid = None;
        self.state = RuntimeState::Unknown;
        self.started_at = None;
        info!("rkt instance {}: stopped", self.uuid);
        Ok(())
    }

    /// Adopts an already running pod by reading its identifier file once.
    ///
    /// No readiness polling: a missing or empty file is an immediate
    /// error. Lets a fresh process stop or query a container started by an
    /// earlier one.
    pub fn reattach(&mut self) -> Result<(), RuntimeError> {
        if self.running() {
            return Err(RuntimeError::AlreadyRunning);
        }
        let data = (self.read_file)(&self.uuid_path)?;
        let identifier = data.trim();
        if identifier.is_empty() {
            return Err(RuntimeError::OperationFailed(format!(
                "identifier file {} is empty",
                self.uuid_path.display()
            )));
        }
        self.rkt_uuid = Some(identifier.to_string());
        info!("rkt instance {}: reattached to pod {}", self.uuid, identifier);
        Ok(())
    }

    /// Fetches and decodes the tool's status report for the attached pod.
    pub fn status(&self) -> Result<StatusReport, RuntimeError> {
        let identifier = self.rkt_uuid.as_deref().ok_or(RuntimeError::NotRunning)?;
        let out = self.runner.status(&self.tool, identifier)?;
        let data = parse_keyval(&out)?;
        StatusReport::from_keyval(&data)
    }

    /// True while a pod identifier is held.
    ///
    /// This is deliberately "attached", not "confirmed running": the
    /// identifier is the externally observable liveness proxy, while the
    /// confirmed-state check happens only inside `start`'s own polling
    /// (observable through [`pid`] and [`started_at`], which are set once
    /// confirmed).
    ///
    /// [`pid`]: RktRuntime::pid
    /// [`started_at`]: RktRuntime::started_at
    pub fn running(&self) -> bool {
        self.rkt_uuid.is_some()
    }

    /// Prefix-qualified name addressing this instance in stop and status
    /// operations; `None` while no pod identifier is known.
    pub fn runtime_name(&self) -> Option<String> {
        self.rkt_uuid
            .as_ref()
            .map(|identifier| format!("{}{}", RUNTIME_NAME_PREFIX, identifier))
    }

    /// Container process id; set once `start` confirmed the running state.
    pub fn pid(&self) -> Option<i32> {
        self.pid
    }

    /// Instance uuid this controller was created with.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Path of the identifier file the tool writes for this instance.
    pub fn uuid_path(&self) -> &Path {
        &self.uuid_path
    }

    /// Last state observed during readiness polling.
    pub fn last_state(&self) -> &RuntimeState {
        &self.state
    }

    /// Confirmation timestamp of the current run, if any.
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    fn run_args(&self, image: &str) -> Vec<String> {
        vec![
            format!("--uuid-file-save={}", self.uuid_path.display()),
            String::from("--insecure-options=image"),
            format!("--net={}", self.run_conf.network),
            String::from("run"),
            image.to_string(),
            format!("--memory={}M", self.run_conf.memory_size_mib),
        ]
    }

    fn read_rkt_uuid(&mut self) -> Result<(), RuntimeError> {
        let policy = self.policy.clone();
        retry("read rkt uuid", &policy, || {
            let data = match (self.read_file)(&self.uuid_path) {
                Ok(data) => data,
                Err(e) => {
                    return Err(RuntimeError::NotYetReady(format!(
                        "identifier file not readable: {}",
                        e
                    )))
                }
            };
            let identifier = data.trim();
            if identifier.is_empty() {
                return Err(RuntimeError::NotYetReady(
                    "identifier file still empty".to_string(),
                ));
            }
            self.rkt_uuid = Some(identifier.to_string());
            info!("rkt instance {}: pod identifier {}", self.uuid, identifier);
            Ok(())
        })
    }

    fn fetch_rkt_state(&mut self) -> Result<(), RuntimeError> {
        let policy = self.policy.clone();
        retry("fetch rkt state", &policy, || {
            let identifier = match self.rkt_uuid.clone() {
                Some(identifier) => identifier,
                None => {
                    return Err(RuntimeError::OperationFailed(
                        "no pod identifier".to_string(),
                    ))
                }
            };
            let out = self.runner.status(&self.tool, &identifier)?;
            let data = parse_keyval(&out)?;
            let report = StatusReport::from_keyval(&data)?;
            if !report.state.is_running() {
                self.state = RuntimeState::NotYetReady;
                return Err(RuntimeError::NotYetReady(format!(
                    "pod state is {}",
                    report.state
                )));
            }
            self.pid = report.pid;
            self.state = RuntimeState::Running;
            self.started_at = Some(Utc::now());
            info!(
                "rkt instance {}: pod {} running, pid {:?}",
                self.uuid, identifier, self.pid
            );
            Ok(())
        })
    }
}

/// Parses line-oriented `key=value` output.
///
/// Blank lines are skipped. The first `=` splits, so values may themselves
/// contain `=`. A non-blank line without one is a structural error.
pub fn parse_keyval(output: &str) -> Result<HashMap<String, String>, RuntimeError> {
    let mut res = HashMap::new();
    for line in output.lines() {
        if line.is_empty() {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) => {
                res.insert(key.to_string(), value.to_string());
            }
            None => {
                return Err(RuntimeError::MalformedStatus(format!(
                    "line without key=value: {:?}",
                    line
                )))
            }
        }
    }
    Ok(res)
}
