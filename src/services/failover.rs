//! Primary/secondary client pair: every query goes to the primary first and is retried once
//! on the secondary.

use std::future::Future;

use async_trait::async_trait;
use log::{error, info, warn};

use super::protocol_client::{BakerClient, NominationClient, QueryResult};
use crate::models::{
    Amount, BakerDelegatorDetails, BakerInfo, BakerRewardRecord, DelegationInfo, ElectionStatus,
    NominatorDetails, ValidatorDetails,
};

pub struct FailoverClient<C> {
    primary: C,
    secondary: C,
}

impl<C> FailoverClient<C> {
    pub fn new(primary: C, secondary: C) -> Self {
        info!("Client failover configured");
        Self { primary, secondary }
    }

    async fn query<'a, T, F, Fut>(&'a self, name: &str, call: F) -> QueryResult<T>
    where
        F: Fn(&'a C) -> Fut,
        Fut: Future<Output = QueryResult<T>>,
    {
        info!("Querying client: {}", name);
        match call(&self.primary).await {
            Ok(response) => Ok(response),
            Err(primary_err) => {
                warn!("Primary client failed on {}: {}, trying secondary", name, primary_err);
                match call(&self.secondary).await {
                    Ok(response) => {
                        info!("Query successful on secondary: {}", name);
                        Ok(response)
                    }
                    Err(e) => {
                        error!("Both clients failed on {}: {}", name, e);
                        Err(e)
                    }
                }
            }
        }
    }
}

#[async_trait]
impl<C: NominationClient> NominationClient for FailoverClient<C> {
    async fn nominator_details(
        &self,
        nominator: &str,
        validators: &[String],
    ) -> QueryResult<NominatorDetails> {
        self.query("nominator_details", |c| c.nominator_details(nominator, validators))
            .await
    }

    async fn validator_details(&self, validator: &str) -> QueryResult<ValidatorDetails> {
        self.query("validator_details", |c| c.validator_details(validator))
            .await
    }

    async fn existential_deposit(&self) -> QueryResult<Amount> {
        self.query("existential_deposit", |c| c.existential_deposit())
            .await
    }

    async fn estimate_max_delegation_value(&self, address: &str) -> QueryResult<Amount> {
        self.query("estimate_max_delegation_value", |c| {
            c.estimate_max_delegation_value(address)
        })
        .await
    }

    async fn election_status(&self) -> QueryResult<ElectionStatus> {
        self.query("election_status", |c| c.election_status()).await
    }
}

#[async_trait]
impl<C: BakerClient> BakerClient for FailoverClient<C> {
    async fn delegator_details(&self, address: &str) -> QueryResult<BakerDelegatorDetails> {
        self.query("delegator_details", |c| c.delegator_details(address))
            .await
    }

    async fn delegation_info(&self, address: &str) -> QueryResult<DelegationInfo> {
        self.query("delegation_info", |c| c.delegation_info(address))
            .await
    }

    async fn baker_info(&self, baker: &str) -> QueryResult<BakerInfo> {
        self.query("baker_info", |c| c.baker_info(baker)).await
    }

    async fn delegation_rewards(
        &self,
        baker: &str,
        delegator: Option<&str>,
    ) -> QueryResult<Vec<BakerRewardRecord>> {
        self.query("delegation_rewards", |c| c.delegation_rewards(baker, delegator))
            .await
    }
}
