//! Timeout wrapper for page operations

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Run `operation`, failing with a named timeout error once `limit` elapses.
pub async fn with_page_timeout<F, T>(operation: F, limit: Duration, operation_name: &str) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {:.1} seconds",
            limit.as_secs_f64()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn elapsed_operation_reports_name() {
        let err = with_page_timeout(
            async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            },
            Duration::from_secs(30),
            "Navigation",
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Navigation timeout after 30.0 seconds");
    }

    #[tokio::test]
    async fn inner_error_passes_through() {
        let err = with_page_timeout(
            async { Err::<(), _>(anyhow::anyhow!("boom")) },
            Duration::from_secs(1),
            "Navigation",
        )
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "boom");
    }
}
