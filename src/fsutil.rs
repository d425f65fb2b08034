//! Small filesystem helpers shared by the runtime and network subsystems.

use std::fs;
use std::io;
use std::path::Path;

/// Reads a whole file as UTF-8 text.
pub fn read_file(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Removes a file, treating an already missing file as success.
pub fn rm_file(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}
