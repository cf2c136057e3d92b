#![allow(dead_code)]

pub use fleetrun_test_utils::builders;
pub use fleetrun_test_utils::fake_invoker;
pub use fleetrun_test_utils::init_tracing;
pub use fleetrun_test_utils::recording_printer;

/// Run a future with a 5-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}
