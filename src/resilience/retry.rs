use log::{debug, warn};
use std::fmt::Display;
use std::future::Future;

use super::RetryPolicy;

/// Run `op` until it succeeds or `policy` runs out of attempts.
///
/// Returns the last error when every attempt failed.
pub async fn retry_with<T, E, F, Fut>(label: &str, policy: &RetryPolicy, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!("{} succeeded on attempt {}", label, attempt);
                }
                return Ok(value);
            }
            Err(e) => match policy.delay_for(attempt) {
                Some(delay) => {
                    warn!("{} failed (attempt {}): {}; retrying in {:?}", label, attempt, e, delay);
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                    attempt += 1;
                }
                None => {
                    warn!("{} failed after {} attempt(s): {}", label, attempt, e);
                    return Err(e);
                }
            },
        }
    }
}
