use crate::domain::model::{
    property_keys, updated_at_label, ApiReading, Balance, TokenProperty, TokenRef, UpdateOutcome,
    UploadReceipt,
};
use crate::domain::ports::{BlobStore, Chain, DataSource, Pipeline, Storage};
use crate::render::{TokenImageRenderer, OUTPUT_FILE};
use crate::utils::error::{LiveNftError, Result};

/// The update sequence against real collaborators: data API, template
/// renderer, IPFS upload endpoint and chain SDK.
pub struct UpdatePipeline<D, S, B, C>
where
    D: DataSource,
    S: Storage,
    B: BlobStore,
    C: Chain,
{
    source: D,
    renderer: TokenImageRenderer<S>,
    blobs: B,
    chain: C,
    token: TokenRef,
}

impl<D, S, B, C> UpdatePipeline<D, S, B, C>
where
    D: DataSource,
    S: Storage,
    B: BlobStore,
    C: Chain,
{
    pub fn new(
        source: D,
        renderer: TokenImageRenderer<S>,
        blobs: B,
        chain: C,
        token: TokenRef,
    ) -> Self {
        Self {
            source,
            renderer,
            blobs,
            chain,
            token,
        }
    }
}

#[async_trait::async_trait]
impl<D, S, B, C> Pipeline for UpdatePipeline<D, S, B, C>
where
    D: DataSource,
    S: Storage,
    B: BlobStore,
    C: Chain,
{
    async fn preflight(&self) -> Result<Balance> {
        let address = self.chain.signer_address();

        let balance = self.chain.balance(address).await?;
        tracing::info!(
            "Admin address is {}, admin balance is {:.3} {}",
            address,
            balance.amount,
            balance.unit
        );

        let admins = self.chain.collection_admins(self.token.collection_id).await?;
        if !admins.iter().any(|admin| admin.trim() == address) {
            return Err(LiveNftError::NotCollectionAdminError {
                address: address.to_string(),
                collection_id: self.token.collection_id,
            });
        }

        if balance.amount <= 1.0 {
            return Err(LiveNftError::InsufficientBalanceError {
                address: address.to_string(),
                balance: balance.amount,
                unit: balance.unit,
                required: 1.0,
            });
        }

        Ok(balance)
    }

    async fn fetch(&self) -> Result<ApiReading> {
        self.source.fetch().await
    }

    async fn render(&self, reading: &ApiReading) -> Result<Vec<u8>> {
        self.renderer.generate(reading).await
    }

    async fn upload(&self, image: Vec<u8>) -> Result<UploadReceipt> {
        self.blobs.upload(image, OUTPUT_FILE).await
    }

    async fn submit(
        &self,
        reading: &ApiReading,
        receipt: &UploadReceipt,
        balance_before: &Balance,
    ) -> Result<UpdateOutcome> {
        let properties = vec![
            TokenProperty::wrapped(property_keys::VALUE, reading.param),
            TokenProperty::wrapped(
                property_keys::UPDATED_AT,
                updated_at_label(reading.fetched_at),
            ),
            TokenProperty::new(property_keys::IMAGE_CID, receipt.cid.clone()),
        ];

        self.chain
            .set_token_properties(self.token.collection_id, self.token.token_id, &properties)
            .await?;

        let balance_after = self.chain.balance(self.chain.signer_address()).await?;
        let fee = balance_before.amount - balance_after.amount;

        Ok(UpdateOutcome {
            token: self.token,
            cid: receipt.cid.clone(),
            fee,
            unit: balance_after.unit,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use chrono::{TimeZone, Utc};

    fn pipeline_with(
        chain: MockChain,
    ) -> UpdatePipeline<FixedSource, MemoryStorage, RecordingBlobStore, MockChain> {
        let storage = MemoryStorage::with_template();
        UpdatePipeline::new(
            FixedSource { param: 1234.0 },
            TokenImageRenderer::new(storage.clone(), storage),
            RecordingBlobStore::default(),
            chain,
            TokenRef {
                collection_id: 10,
                token_id: 1,
            },
        )
    }

    #[tokio::test]
    async fn test_preflight_passes_for_funded_admin() {
        let chain = MockChain::new("5Admin", &["5Admin", "5Other"], &[5.0]);
        let pipeline = pipeline_with(chain);

        let balance = pipeline.preflight().await.unwrap();
        assert_eq!(balance.amount, 5.0);
    }

    #[tokio::test]
    async fn test_preflight_rejects_non_admin() {
        let chain = MockChain::new("5Admin", &["5SomeoneElse"], &[5.0]);
        let pipeline = pipeline_with(chain);

        let result = pipeline.preflight().await;
        assert!(matches!(
            result,
            Err(LiveNftError::NotCollectionAdminError { .. })
        ));
    }

    #[tokio::test]
    async fn test_preflight_rejects_low_balance() {
        let chain = MockChain::new("5Admin", &["5Admin"], &[0.9]);
        let pipeline = pipeline_with(chain);

        let result = pipeline.preflight().await;
        assert!(matches!(
            result,
            Err(LiveNftError::InsufficientBalanceError { .. })
        ));
    }

    #[tokio::test]
    async fn test_submit_writes_the_three_properties_and_reports_fee() {
        // Submit reads the balance once, so the single seeded amount is the
        // after-balance against the hand-built before of 5.0.
        let chain = MockChain::new("5Admin", &["5Admin"], &[4.85]);
        let submitted = chain.submitted.clone();
        let pipeline = pipeline_with(chain);

        let reading = ApiReading {
            param: 1234.0,
            fetched_at: Utc.with_ymd_and_hms(2026, 8, 5, 13, 45, 12).unwrap(),
        };
        let receipt = UploadReceipt {
            cid: "QmMockCid".to_string(),
        };
        let before = Balance {
            amount: 5.0,
            unit: "UNQ".to_string(),
        };

        let outcome = pipeline.submit(&reading, &receipt, &before).await.unwrap();

        assert_eq!(outcome.cid, "QmMockCid");
        assert!((outcome.fee - 0.15).abs() < 1e-9);
        assert_eq!(outcome.unit, "UNQ");

        let submissions = submitted.lock().await;
        assert_eq!(submissions.len(), 1);
        let properties = &submissions[0];
        assert_eq!(properties.len(), 3);
        assert_eq!(properties[0].key, "a.0");
        assert_eq!(properties[0].value, "{\"_\": \"1234\"}");
        assert_eq!(properties[1].key, "a.1");
        assert_eq!(properties[1].value, "{\"_\": \"5 August 2026 13:45:12\"}");
        assert_eq!(properties[2].key, "i.i");
        assert_eq!(properties[2].value, "QmMockCid");
    }

    #[tokio::test]
    async fn test_render_writes_output_and_returns_png() {
        let chain = MockChain::new("5Admin", &["5Admin"], &[5.0]);
        let storage = MemoryStorage::with_template();
        let pipeline = UpdatePipeline::new(
            FixedSource { param: 42.0 },
            TokenImageRenderer::new(storage.clone(), storage.clone()),
            RecordingBlobStore::default(),
            chain,
            TokenRef {
                collection_id: 10,
                token_id: 1,
            },
        );

        let reading = pipeline.fetch().await.unwrap();
        let png = pipeline.render(&reading).await.unwrap();

        assert!(!png.is_empty());
        let written = storage.get_file(OUTPUT_FILE).await.unwrap();
        assert_eq!(written, png);
        assert!(image::load_from_memory(&png).is_ok());
    }
}
