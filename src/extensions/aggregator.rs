//! Assembles the final result and runs the deferred enrichment pass.

use std::sync::{Arc, Mutex, PoisonError};

use log::{info, warn};
use tokio::task::JoinHandle;

use super::{DelegationExtension, ExtensionRegistry};
use crate::error::Result;
use crate::models::{Alert, DelegateeDetails, DelegationDetails, DelegatorDetails};

/// Merges both perspectives. Producers own disjoint fields, so nothing is reconciled.
pub fn assemble(
    alerts: Vec<Alert>,
    delegator: DelegatorDetails,
    delegatees: Vec<DelegateeDetails>,
) -> DelegationDetails {
    DelegationDetails {
        alerts,
        delegator,
        delegatees,
    }
}

pub struct Aggregator {
    registry: Arc<ExtensionRegistry>,
}

impl Aggregator {
    pub fn new(registry: Arc<ExtensionRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &ExtensionRegistry {
        &self.registry
    }

    /// Runs one query and, when the extension has one, starts its enrichment pass.
    pub async fn fetch(
        &self,
        protocol_id: &str,
        delegator: &str,
        delegatees: &[String],
    ) -> Result<DelegationHandle> {
        let extension = self.registry.get_or_create(protocol_id).await?;
        info!(
            "Fetching {} delegation details for {} ({} delegatees)",
            protocol_id,
            delegator,
            delegatees.len()
        );
        let details = extension
            .fetch_delegation_details(delegator, delegatees)
            .await?;

        let handle = DelegationHandle::new(details);
        if extension.has_enrichment() {
            handle.start_enrichment(extension);
        }
        Ok(handle)
    }
}

/// A delivered result plus its in-flight enrichment, if any.
pub struct DelegationHandle {
    details: DelegationDetails,
    enrichment: Mutex<Option<JoinHandle<()>>>,
}

impl DelegationHandle {
    pub fn new(details: DelegationDetails) -> Self {
        Self {
            details,
            enrichment: Mutex::new(None),
        }
    }

    /// The result as delivered. Its delegator display list may still change while an
    /// enrichment is running.
    pub fn details(&self) -> &DelegationDetails {
        &self.details
    }

    /// Spawns the enrichment pass unless one is already running. Returns whether it started.
    pub fn start_enrichment(&self, extension: Arc<dyn DelegationExtension>) -> bool {
        let mut slot = self.enrichment.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|task| !task.is_finished()) {
            warn!("Enrichment already in flight for {}", self.details.delegator.address());
            return false;
        }

        let details = self.details.clone();
        *slot = Some(tokio::spawn(async move {
            let updates = extension.enrichment_updates(&details).await;
            if updates.is_empty() {
                return;
            }
            let version = details.delegator.display_details.apply(updates);
            info!(
                "Enriched display details for {} (version {})",
                details.delegator.address(),
                version
            );
        }));
        true
    }

    pub fn is_enriching(&self) -> bool {
        self.enrichment
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Waits for the running enrichment pass, if any.
    pub async fn wait_for_enrichment(&self) {
        let task = self
            .enrichment
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                warn!("Enrichment task failed: {}", e);
            }
        }
    }

    pub fn into_details(self) -> DelegationDetails {
        self.details
    }
}
