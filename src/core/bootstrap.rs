use crate::domain::model::{CollectionPlan, MintedIds};
use crate::domain::ports::Chain;
use crate::utils::error::{LiveNftError, Result};

/// Creates the collection, hands it to the configured owner and mints one
/// placeholder token for the updater to write into.
pub async fn create_collection_and_token<C: Chain>(
    chain: &C,
    owner_address: &str,
) -> Result<MintedIds> {
    let address = chain.signer_address();

    let balance = chain.balance(address).await?;
    tracing::info!(
        "Admin address is {}, admin balance is {:.3} {}",
        address,
        balance.amount,
        balance.unit
    );

    if balance.amount <= 3.0 {
        return Err(LiveNftError::InsufficientBalanceError {
            address: address.to_string(),
            balance: balance.amount,
            unit: balance.unit,
            required: 3.0,
        });
    }

    let plan = CollectionPlan::default();
    let collection_id = chain.create_collection(&plan).await?;
    tracing::info!("Collection {} created", collection_id);

    chain.add_admin(collection_id, address).await?;
    chain.transfer_collection(collection_id, owner_address).await?;

    let token_id = chain.create_token(collection_id, owner_address).await?;
    tracing::info!("Placeholder token {} minted", token_id);

    Ok(MintedIds {
        collection_id,
        token_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::pipeline::test_support::MockChain;

    #[tokio::test]
    async fn test_create_runs_the_chain_calls_in_order() {
        let chain = MockChain::new("5Admin", &[], &[10.0]);
        let calls = chain.calls.clone();

        let ids = create_collection_and_token(&chain, "5Owner").await.unwrap();
        assert_eq!(ids.collection_id, 111);
        assert_eq!(ids.token_id, 222);

        let calls = calls.lock().await;
        assert_eq!(
            *calls,
            vec![
                "balance",
                "create_collection",
                "add_admin",
                "transfer",
                "create_token"
            ]
        );
    }

    #[tokio::test]
    async fn test_create_requires_balance_above_three() {
        let chain = MockChain::new("5Admin", &[], &[2.5]);
        let calls = chain.calls.clone();

        let result = create_collection_and_token(&chain, "5Owner").await;
        assert!(matches!(
            result,
            Err(LiveNftError::InsufficientBalanceError { required, .. }) if required == 3.0
        ));

        let calls = calls.lock().await;
        assert_eq!(*calls, vec!["balance"]);
    }
}
