//! Bounded retry for readiness conditions owned by another process.

use log::debug;
use std::thread;

use crate::configuration::types::RetryPolicy;
use crate::error_handling::types::RuntimeError;

/// Runs `op` until it succeeds or the policy's attempt budget is spent.
///
/// Only [`RuntimeError::NotYetReady`] is retried; any other error
/// propagates immediately, since repeating a structural failure cannot fix
/// it. The calling thread sleeps `policy.delay` between attempts.
/// Exhaustion converts into a terminal not-ready error naming the
/// operation and the attempt count.
pub fn retry<T, F>(what: &str, policy: &RetryPolicy, mut op: F) -> Result<T, RuntimeError>
where
    F: FnMut() -> Result<T, RuntimeError>,
{
    let mut last = String::new();
    for attempt in 1..=policy.attempts {
        match op() {
            Ok(value) => {
                debug!("{}: succeeded on attempt {}/{}", what, attempt, policy.attempts);
                return Ok(value);
            }
            Err(RuntimeError::NotYetReady(msg)) => {
                debug!(
                    "{}: attempt {}/{} not ready: {}",
                    what, attempt, policy.attempts, msg
                );
                last = msg;
                if attempt < policy.attempts && !policy.delay.is_zero() {
                    thread::sleep(policy.delay);
                }
            }
            Err(other) => return Err(other),
        }
    }
    Err(RuntimeError::NotYetReady(format!(
        "{}: giving up after {} attempts: {}",
        what, policy.attempts, last
    )))
}
