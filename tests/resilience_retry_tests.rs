use picostream::resilience::{retry_with, RetryPolicy};
use std::cell::Cell;
use tokio::time::{Duration, Instant};

#[tokio::test(start_paused = true)]
async fn test_exponential_backoff_waits_between_attempts() {
    let policy = RetryPolicy::Exponential {
        base_ms: 100,
        max_ms: 1000,
        max_attempts: 4,
    };
    let attempts = Cell::new(0);
    let start = Instant::now();

    let result: Result<u32, String> = retry_with("test", &policy, || {
        attempts.set(attempts.get() + 1);
        let n = attempts.get();
        async move {
            if n < 4 {
                Err(format!("attempt {} failed", n))
            } else {
                Ok(n)
            }
        }
    })
    .await;

    assert_eq!(result, Ok(4));
    // 100 + 200 + 400
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(700));
    assert!(elapsed < Duration::from_millis(750));
}

#[tokio::test]
async fn test_returns_last_error_when_exhausted() {
    let attempts = Cell::new(0);

    let result: Result<(), String> = retry_with(
        "test",
        &RetryPolicy::Immediate { max_attempts: 3 },
        || {
            attempts.set(attempts.get() + 1);
            let n = attempts.get();
            async move { Err(format!("failure {}", n)) }
        },
    )
    .await;

    assert_eq!(result, Err("failure 3".to_string()));
    assert_eq!(attempts.get(), 3);
}

#[tokio::test]
async fn test_never_makes_one_attempt() {
    let attempts = Cell::new(0);

    let result: Result<(), &str> = retry_with("test", &RetryPolicy::Never, || {
        attempts.set(attempts.get() + 1);
        async { Err("down") }
    })
    .await;

    assert!(result.is_err());
    assert_eq!(attempts.get(), 1);
}
