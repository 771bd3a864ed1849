use crate::domain::model::{property_keys, Balance, CollectionPlan, TokenProperty};
use crate::domain::ports::Chain;
use crate::utils::error::{LiveNftError, Result};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Client for the chain SDK REST service. Signing happens server-side: the
/// mnemonic travels in the Authorization header and the signer address is
/// resolved once at connect time.
#[derive(Clone)]
pub struct ChainRestClient {
    http: Client,
    base_url: String,
    seed: String,
    address: String,
}

#[derive(Debug, Deserialize)]
struct AccountResponse {
    address: String,
}

#[derive(Debug, Deserialize)]
struct BalancePayload {
    amount: String,
    unit: String,
}

#[derive(Debug, Deserialize)]
struct BalanceResponse {
    #[serde(rename = "availableBalance")]
    available_balance: BalancePayload,
}

#[derive(Debug, Deserialize)]
struct AdminsResponse {
    admins: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "isCompleted")]
    is_completed: Option<bool>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CreatedCollection {
    #[serde(rename = "collectionId")]
    collection_id: u32,
}

#[derive(Debug, Deserialize)]
struct CreateCollectionResponse {
    parsed: Option<CreatedCollection>,
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct CreatedToken {
    #[serde(rename = "tokenId")]
    token_id: u32,
}

#[derive(Debug, Deserialize)]
struct CreateTokenResponse {
    parsed: Option<CreatedToken>,
    error: Option<serde_json::Value>,
}

impl ChainRestClient {
    pub async fn connect(base_url: &str, seed: &str) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        let base_url = base_url.trim_end_matches('/').to_string();

        let response = http
            .get(format!("{}/v1/account", base_url))
            .header(AUTHORIZATION, format!("Seed {}", seed))
            .send()
            .await?;
        let response = check_status(response, "account lookup").await?;
        let account: AccountResponse = response.json().await?;

        tracing::debug!("Connected to chain SDK as {}", account.address);
        Ok(Self {
            http,
            base_url,
            seed: seed.to_string(),
            address: account.address,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(AUTHORIZATION, format!("Seed {}", self.seed))
    }
}

async fn check_status(response: Response, operation: &str) -> Result<Response> {
    if response.status().is_success() {
        Ok(response)
    } else {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(LiveNftError::ChainError {
            message: format!("{} returned {}: {}", operation, status, body),
        })
    }
}

// Only an explicit `isCompleted: true` counts as success; a response
// missing the flag is treated as a failed submission.
fn ensure_completed(submit: SubmitResponse, operation: &str) -> Result<()> {
    if submit.is_completed == Some(true) {
        return Ok(());
    }
    let detail = submit
        .error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "response has no isCompleted flag".to_string());
    Err(LiveNftError::ChainError {
        message: format!("{} was not completed: {}", operation, detail),
    })
}

#[async_trait]
impl Chain for ChainRestClient {
    fn signer_address(&self) -> &str {
        &self.address
    }

    async fn balance(&self, address: &str) -> Result<Balance> {
        let response = self
            .http
            .get(self.url("/v1/balance"))
            .query(&[("address", address)])
            .send()
            .await?;
        let response = check_status(response, "balance query").await?;
        let payload: BalanceResponse = response.json().await?;

        let amount = payload
            .available_balance
            .amount
            .parse::<f64>()
            .map_err(|_| LiveNftError::ChainError {
                message: format!(
                    "Balance amount '{}' is not a number",
                    payload.available_balance.amount
                ),
            })?;

        Ok(Balance {
            amount,
            unit: payload.available_balance.unit,
        })
    }

    async fn collection_admins(&self, collection_id: u32) -> Result<Vec<String>> {
        let response = self
            .http
            .get(self.url("/v1/collections/admins"))
            .query(&[("collectionId", collection_id)])
            .send()
            .await?;
        let response = check_status(response, "admins query").await?;
        let payload: AdminsResponse = response.json().await?;
        Ok(payload.admins)
    }

    async fn set_token_properties(
        &self,
        collection_id: u32,
        token_id: u32,
        properties: &[TokenProperty],
    ) -> Result<()> {
        let body = json!({
            "address": self.address,
            "collectionId": collection_id,
            "tokenId": token_id,
            "properties": properties,
        });

        let response = self
            .authorized(self.http.post(self.url("/v1/tokens/properties")))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response, "set token properties").await?;
        let submit: SubmitResponse = response.json().await?;
        ensure_completed(submit, "set token properties")
    }

    async fn create_collection(&self, plan: &CollectionPlan) -> Result<u32> {
        let permission_all_true = json!({
            "mutable": true,
            "collectionAdmin": true,
            "tokenOwner": true,
        });
        let token_property_permissions: Vec<serde_json::Value> = property_keys::ALL_MUTABLE
            .iter()
            .map(|key| json!({"key": key, "permission": permission_all_true}))
            .collect();

        let body = json!({
            "address": self.address,
            "name": plan.name,
            "description": plan.description,
            "tokenPrefix": plan.token_prefix,
            "schema": {
                "schemaName": "unique",
                "schemaVersion": "1.0.0",
                "image": {
                    "urlTemplate": "https://ipfs.unique.network/ipfs/{infix}"
                },
                "coverPicture": {
                    "url": "https://ipfs.unique.network/ipfs/QmPCqY7Lmxerm8cLKmB18kT1RxkwnpasPVksA8XLhViVT7"
                },
                "attributesSchemaVersion": "1.0.0",
                "attributesSchema": {
                    "0": {
                        "name": {"_": "param"},
                        "type": "string", "isArray": false, "optional": false,
                    },
                    "1": {
                        "name": {"_": "Updated at"},
                        "type": "string", "isArray": false, "optional": false,
                    },
                },
            },
            "tokenPropertyPermissions": token_property_permissions,
        });

        let response = self
            .authorized(self.http.post(self.url("/v1/collections")))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response, "create collection").await?;
        let payload: CreateCollectionResponse = response.json().await?;

        match payload.parsed {
            Some(created) => Ok(created.collection_id),
            None => Err(LiveNftError::ChainError {
                message: format!(
                    "Collection creation returned no id: {}",
                    payload
                        .error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "unknown error".to_string())
                ),
            }),
        }
    }

    async fn add_admin(&self, collection_id: u32, new_admin: &str) -> Result<()> {
        let body = json!({
            "address": self.address,
            "collectionId": collection_id,
            "newAdmin": new_admin,
        });

        let response = self
            .authorized(self.http.post(self.url("/v1/collections/admins")))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response, "add admin").await?;
        let submit: SubmitResponse = response.json().await?;
        ensure_completed(submit, "add admin")
    }

    async fn transfer_collection(&self, collection_id: u32, to: &str) -> Result<()> {
        let body = json!({
            "address": self.address,
            "collectionId": collection_id,
            "to": to,
        });

        let response = self
            .authorized(self.http.post(self.url("/v1/collections/transfer")))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response, "transfer collection").await?;
        let submit: SubmitResponse = response.json().await?;
        ensure_completed(submit, "transfer collection")
    }

    async fn create_token(&self, collection_id: u32, owner: &str) -> Result<u32> {
        let body = json!({
            "address": self.address,
            "owner": owner,
            "collectionId": collection_id,
        });

        let response = self
            .authorized(self.http.post(self.url("/v1/tokens")))
            .json(&body)
            .send()
            .await?;
        let response = check_status(response, "create token").await?;
        let payload: CreateTokenResponse = response.json().await?;

        match payload.parsed {
            Some(created) => Ok(created.token_id),
            None => Err(LiveNftError::ChainError {
                message: format!(
                    "Token creation returned no id: {}",
                    payload
                        .error
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "unknown error".to_string())
                ),
            }),
        }
    }
}
