use crate::domain::ports::Pipeline;
use crate::core::engine::RunEngine;
use crate::utils::error::Result;
use chrono::Utc;
use std::time::Duration;

const TIME_FORMAT: &str = "%H:%M:%S %d.%m.%Y";

/// Re-runs the update on a fixed interval, first run immediately on start.
/// A failed run propagates and ends the loop, there is no retry.
pub struct FixedScheduler {
    interval: Duration,
    max_runs: Option<u64>,
}

impl FixedScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            max_runs: None,
        }
    }

    /// Stop after this many runs (used by tests).
    pub fn with_max_runs(mut self, runs: u64) -> Self {
        self.max_runs = Some(runs);
        self
    }

    pub async fn run<P: Pipeline>(&self, engine: &RunEngine<P>) -> Result<()> {
        let mut completed: u64 = 0;

        loop {
            tracing::info!(
                "Starting scheduled update at {} UTC",
                Utc::now().format(TIME_FORMAT)
            );

            engine.run().await?;
            completed += 1;

            if let Some(max) = self.max_runs {
                if completed >= max {
                    return Ok(());
                }
            }

            let next = Utc::now()
                + chrono::Duration::from_std(self.interval).unwrap_or(chrono::Duration::zero());
            tracing::info!("Next update at {} UTC", next.format(TIME_FORMAT));

            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::test_support::{
        FixedSource, MemoryStorage, MockChain, RecordingBlobStore,
    };
    use crate::core::pipeline::UpdatePipeline;
    use crate::domain::model::TokenRef;
    use crate::render::TokenImageRenderer;
    use crate::utils::error::LiveNftError;

    fn engine_with(
        chain: MockChain,
    ) -> RunEngine<UpdatePipeline<FixedSource, MemoryStorage, RecordingBlobStore, MockChain>> {
        let storage = MemoryStorage::with_template();
        RunEngine::new(UpdatePipeline::new(
            FixedSource { param: 5.0 },
            TokenImageRenderer::new(storage.clone(), storage),
            RecordingBlobStore::default(),
            chain,
            TokenRef {
                collection_id: 1,
                token_id: 1,
            },
        ))
    }

    #[tokio::test]
    async fn test_scheduler_runs_the_requested_number_of_times() {
        let chain = MockChain::new("5Admin", &["5Admin"], &[10.0]);
        let calls = chain.calls.clone();
        let engine = engine_with(chain);

        let scheduler = FixedScheduler::new(Duration::from_millis(1)).with_max_runs(3);
        scheduler.run(&engine).await.unwrap();

        let calls = calls.lock().await;
        let submits = calls.iter().filter(|c| *c == "set_properties").count();
        assert_eq!(submits, 3);
    }

    #[tokio::test]
    async fn test_scheduler_stops_on_the_first_failure() {
        // Signer is not an admin, so the first tick's preflight fails.
        let chain = MockChain::new("5Admin", &["5NotUs"], &[10.0]);
        let engine = engine_with(chain);

        let scheduler = FixedScheduler::new(Duration::from_millis(1)).with_max_runs(3);
        let result = scheduler.run(&engine).await;
        assert!(matches!(
            result,
            Err(LiveNftError::NotCollectionAdminError { .. })
        ));
    }
}
