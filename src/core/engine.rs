use crate::domain::model::UpdateOutcome;
use crate::domain::ports::Pipeline;
use crate::utils::error::Result;

/// Drives the pipeline stages in order and logs the progress of each run.
pub struct RunEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> RunEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<UpdateOutcome> {
        tracing::info!("Starting token updating process...");

        let balance_before = self.pipeline.preflight().await?;

        let reading = self.pipeline.fetch().await?;
        tracing::info!("New data from the API: param = {}", reading.param);

        let image = self.pipeline.render(&reading).await?;

        let receipt = self.pipeline.upload(image).await?;
        tracing::info!("Image uploaded to IPFS, cid: {}", receipt.cid);

        let outcome = self
            .pipeline
            .submit(&reading, &receipt, &balance_before)
            .await?;
        tracing::info!(
            "Token {}/{} has been successfully updated, it took {:.3} {}",
            outcome.token.collection_id,
            outcome.token.token_id,
            outcome.fee,
            outcome.unit
        );

        Ok(outcome)
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

    #[tokio::test]
    async fn test_run_executes_all_stages_in_order() {
        let chain = MockChain::new("5Admin", &["5Admin"], &[5.0, 4.9]);
        let calls = chain.calls.clone();
        let blobs = RecordingBlobStore::default();
        let uploads = blobs.uploads.clone();
        let storage = MemoryStorage::with_template();

        let pipeline = UpdatePipeline::new(
            FixedSource { param: 7.0 },
            TokenImageRenderer::new(storage.clone(), storage),
            blobs,
            chain,
            TokenRef {
                collection_id: 3,
                token_id: 9,
            },
        );

        let outcome = RunEngine::new(pipeline).run().await.unwrap();

        assert_eq!(outcome.cid, "QmMockCid");
        assert!((outcome.fee - 0.1).abs() < 1e-9);

        let uploads = uploads.lock().await;
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "result.png");

        let calls = calls.lock().await;
        assert_eq!(
            *calls,
            vec!["balance", "admins", "set_properties", "balance"]
        );
    }

    #[tokio::test]
    async fn test_run_aborts_on_failed_preflight() {
        let chain = MockChain::new("5Admin", &["5NotUs"], &[5.0]);
        let calls = chain.calls.clone();
        let storage = MemoryStorage::with_template();

        let pipeline = UpdatePipeline::new(
            FixedSource { param: 7.0 },
            TokenImageRenderer::new(storage.clone(), storage),
            RecordingBlobStore::default(),
            chain,
            TokenRef {
                collection_id: 3,
                token_id: 9,
            },
        );

        let result = RunEngine::new(pipeline).run().await;
        assert!(matches!(
            result,
            Err(LiveNftError::NotCollectionAdminError { .. })
        ));

        // Nothing past the preflight ran.
        let calls = calls.lock().await;
        assert_eq!(*calls, vec!["balance", "admins"]);
    }
}
