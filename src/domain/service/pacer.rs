use std::time::Duration;

use async_trait::async_trait;

/// Suspension point applied after each committed row in incremental mode.
/// Injected so tests can assert ordering without real sleeps. The commit is
/// always visible before the pause begins.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self, delay: Duration);
}

pub struct TokioPacer;

#[async_trait]
impl Pacer for TokioPacer {
    async fn pause(&self, delay: Duration) {
        tokio::time::sleep(delay).await;
    }
}
