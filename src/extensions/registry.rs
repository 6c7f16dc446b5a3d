//! Protocol id -> extension, one lazily built instance per protocol.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use futures::FutureExt;
use log::info;
use tokio::sync::OnceCell;

use super::{
    DelegationExtension, NominationConfig, NominationExtension, SingleDelegateConfig,
    SingleDelegateExtension,
};
use crate::error::{Error, Result};
use crate::services::{BakerClient, NominationClient, RemoteConfigProvider};

type Factory =
    Box<dyn Fn() -> BoxFuture<'static, Result<Arc<dyn DelegationExtension>>> + Send + Sync>;

struct Entry {
    factory: Factory,
    instance: OnceCell<Arc<dyn DelegationExtension>>,
}

#[derive(Default)]
pub struct ExtensionRegistry {
    entries: HashMap<String, Entry>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers how to build the extension of `protocol_id`. Nothing is built until the first
    /// [`get_or_create`](Self::get_or_create).
    pub fn register<F, Fut>(&mut self, protocol_id: impl Into<String>, factory: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Arc<dyn DelegationExtension>>> + Send + 'static,
    {
        self.entries.insert(
            protocol_id.into(),
            Entry {
                factory: Box::new(move || factory().boxed()),
                instance: OnceCell::new(),
            },
        );
    }

    pub fn register_nomination(
        &mut self,
        config: NominationConfig,
        client: Arc<dyn NominationClient>,
    ) {
        let protocol_id = config.protocol.identifier.clone();
        self.register(protocol_id, move || {
            let extension: Arc<dyn DelegationExtension> =
                Arc::new(NominationExtension::new(config.clone(), Arc::clone(&client)));
            async move { Ok(extension) }
        });
    }

    pub fn register_single_delegate(
        &mut self,
        config: SingleDelegateConfig,
        client: Arc<dyn BakerClient>,
        remote_config: Arc<dyn RemoteConfigProvider>,
    ) {
        let protocol_id = config.protocol.identifier.clone();
        self.register(protocol_id, move || {
            let config = config.clone();
            let client = Arc::clone(&client);
            let remote_config = Arc::clone(&remote_config);
            async move {
                let extension =
                    SingleDelegateExtension::create(config, client, remote_config.as_ref()).await?;
                Ok(Arc::new(extension) as Arc<dyn DelegationExtension>)
            }
        });
    }

    pub fn is_registered(&self, protocol_id: &str) -> bool {
        self.entries.contains_key(protocol_id)
    }

    pub fn protocols(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// The extension of `protocol_id`, built on first use. Concurrent first calls share one
    /// construction; a failed construction is retried by the next call.
    pub async fn get_or_create(&self, protocol_id: &str) -> Result<Arc<dyn DelegationExtension>> {
        let entry = self
            .entries
            .get(protocol_id)
            .ok_or_else(|| Error::UnsupportedProtocol(protocol_id.to_string()))?;

        let extension = entry
            .instance
            .get_or_try_init(|| async {
                info!("Creating delegation extension for {}", protocol_id);
                (entry.factory)().await
            })
            .await?;

        Ok(Arc::clone(extension))
    }
}
