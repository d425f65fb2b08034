use std::fmt;

#[derive(Debug)]
pub enum ConfigError {
    IoError(std::io::Error),
    TomlError(String),
    BadName(String),
    BadMaskRange(String),
    BadMemorySize(String),
    BadRetry(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {}", e),
            ConfigError::TomlError(e) => write!(f, "TOML parsing error: {}", e),
            ConfigError::BadName(e) => write!(f, "Name error: {}", e),
            ConfigError::BadMaskRange(e) => write!(f, "Netmask error: {}", e),
            ConfigError::BadMemorySize(e) => write!(f, "Memory size error: {}", e),
            ConfigError::BadRetry(e) => write!(f, "Retry policy error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err)
    }
}

#[derive(Debug)]
pub enum CommandError {
    NotFound(String),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::NotFound(name) => write!(f, "Executable not found: {}", name),
        }
    }
}

impl std::error::Error for CommandError {}

#[derive(Debug)]
pub enum RuntimeError {
    AlreadyRunning,
    NotRunning,
    NotYetReady(String),
    OperationFailed(String),
    MalformedStatus(String),
    IoError(std::io::Error),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::AlreadyRunning => write!(f, "Container already running"),
            RuntimeError::NotRunning => write!(f, "Container not running"),
            RuntimeError::NotYetReady(e) => write!(f, "Container not yet ready: {}", e),
            RuntimeError::OperationFailed(e) => write!(f, "Runtime operation failed: {}", e),
            RuntimeError::MalformedStatus(e) => write!(f, "Malformed status output: {}", e),
            RuntimeError::IoError(e) => write!(f, "Runtime IO error: {}", e),
        }
    }
}

impl std::error::Error for RuntimeError {}

impl From<std::io::Error> for RuntimeError {
    fn from(err: std::io::Error) -> Self {
        RuntimeError::IoError(err)
    }
}

impl From<CommandError> for RuntimeError {
    fn from(err: CommandError) -> Self {
        RuntimeError::OperationFailed(err.to_string())
    }
}

#[derive(Debug)]
pub enum NetworkError {
    IoError(std::io::Error),
    SerializeFailed(String),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::IoError(e) => write!(f, "Network definition IO error: {}", e),
            NetworkError::SerializeFailed(e) => write!(f, "Network definition encoding failed: {}", e),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<std::io::Error> for NetworkError {
    fn from(err: std::io::Error) -> Self {
        NetworkError::IoError(err)
    }
}
