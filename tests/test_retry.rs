//! Retry policy behavior in isolation.

use std::sync::atomic::{AtomicU32, Ordering};

use facemosaic::RetryPolicy;

#[tokio::test]
async fn succeeds_once_a_later_attempt_does() {
    let policy = RetryPolicy::immediate(3);
    let calls = AtomicU32::new(0);

    let result = policy
        .run(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(anyhow::anyhow!("transient"))
                } else {
                    Ok(n)
                }
            }
        })
        .await;

    assert_eq!(result.unwrap(), 2);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn returns_the_last_error_after_exhaustion() {
    let policy = RetryPolicy::immediate(3);
    let calls = AtomicU32::new(0);

    let result: anyhow::Result<()> = policy
        .run(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { Err(anyhow::anyhow!("failure #{n}")) }
        })
        .await;

    assert_eq!(result.unwrap_err().to_string(), "failure #2");
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn first_success_needs_no_retries() {
    let policy = RetryPolicy::default();
    let calls = AtomicU32::new(0);

    // The default policy sleeps between attempts, so a pass here also
    // shows no sleep happens on the success path.
    let result = policy
        .run(|| {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Ok(42u32) }
        })
        .await;

    assert_eq!(result.unwrap(), 42);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
