use crate::domain::model::{
    ApiReading, Balance, CollectionPlan, TokenProperty, UpdateOutcome, UploadReceipt,
};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Source of the live value rendered onto the token image.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> Result<ApiReading>;
}

/// Content-addressed blob store (IPFS-style upload endpoint).
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn upload(&self, file: Vec<u8>, file_name: &str) -> Result<UploadReceipt>;
}

/// Chain SDK operations used by the update and bootstrap flows.
#[async_trait]
pub trait Chain: Send + Sync {
    /// Address of the signing account behind the configured mnemonic.
    fn signer_address(&self) -> &str;

    async fn balance(&self, address: &str) -> Result<Balance>;
    async fn collection_admins(&self, collection_id: u32) -> Result<Vec<String>>;
    async fn set_token_properties(
        &self,
        collection_id: u32,
        token_id: u32,
        properties: &[TokenProperty],
    ) -> Result<()>;
    async fn create_collection(&self, plan: &CollectionPlan) -> Result<u32>;
    async fn add_admin(&self, collection_id: u32, new_admin: &str) -> Result<()>;
    async fn transfer_collection(&self, collection_id: u32, to: &str) -> Result<()>;
    async fn create_token(&self, collection_id: u32, owner: &str) -> Result<u32>;
}

/// The fixed update sequence: preflight, fetch, render, upload, submit.
#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn preflight(&self) -> Result<Balance>;
    async fn fetch(&self) -> Result<ApiReading>;
    async fn render(&self, reading: &ApiReading) -> Result<Vec<u8>>;
    async fn upload(&self, image: Vec<u8>) -> Result<UploadReceipt>;
    async fn submit(
        &self,
        reading: &ApiReading,
        receipt: &UploadReceipt,
        balance_before: &Balance,
    ) -> Result<UpdateOutcome>;
}
