use std::sync::Arc;

use dotenv::dotenv;
use log::{info, warn};

use delegation_details::config::Config;
use delegation_details::extensions::{
    Aggregator, ExtensionRegistry, NominationConfig, SingleDelegateConfig,
};
use delegation_details::models::{BakerConfig, ProtocolInfo};
use delegation_details::services::{
    BakerClient, ChainSnapshot, FailoverClient, HttpRemoteConfig, NominationClient,
    RemoteConfigProvider, StaticRemoteConfig,
};
use delegation_details::utils::helpers::load_snapshot;

struct Clients {
    nomination: Arc<dyn NominationClient>,
    baker: Arc<dyn BakerClient>,
    trusted_bakers: Vec<BakerConfig>,
}

fn connect(config: &Config) -> Result<Clients, Box<dyn std::error::Error>> {
    info!("Loading chain snapshot from {}", config.snapshot_path);
    let primary = load_snapshot(&config.snapshot_path)?;
    let trusted_bakers = primary.trusted_bakers.clone();

    let clients = match &config.secondary_snapshot_path {
        Some(path) => {
            info!("Loading secondary chain snapshot from {}", path);
            let client = Arc::new(FailoverClient::new(primary, load_snapshot(path)?));
            Clients {
                nomination: client.clone(),
                baker: client,
                trusted_bakers,
            }
        }
        None => {
            let client: Arc<ChainSnapshot> = Arc::new(primary);
            Clients {
                nomination: client.clone(),
                baker: client,
                trusted_bakers,
            }
        }
    };
    Ok(clients)
}

fn build_registry(config: &Config, clients: Clients) -> ExtensionRegistry {
    let remote_config: Arc<dyn RemoteConfigProvider> = match &config.baker_config_url {
        Some(url) => Arc::new(HttpRemoteConfig::new(url.clone(), config.remote_config_retries)),
        None => Arc::new(StaticRemoteConfig::new(clients.trusted_bakers)),
    };

    let mut registry = ExtensionRegistry::new();
    registry.register_nomination(
        NominationConfig::new(ProtocolInfo::new("polkadot", "DOT", 10)),
        Arc::clone(&clients.nomination),
    );
    registry.register_nomination(
        NominationConfig::new(ProtocolInfo::new("kusama", "KSM", 12)),
        clients.nomination,
    );
    registry.register_single_delegate(
        SingleDelegateConfig::new(ProtocolInfo::new("tezos", "XTZ", 6)),
        clients.baker,
        remote_config,
    );
    registry
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    env_logger::init();

    info!("Starting delegation details lookup");
    let config = Config::from_env()?;

    let clients = connect(&config)?;
    let registry = Arc::new(build_registry(&config, clients));
    info!("Registered protocols: {:?}", registry.protocols());

    let aggregator = Aggregator::new(Arc::clone(&registry));
    let handle = aggregator
        .fetch(
            &config.protocol_id,
            &config.delegator_address,
            &config.delegatee_addresses,
        )
        .await?;
    handle.wait_for_enrichment().await;

    let details = handle.into_details();
    println!("{}", serde_json::to_string_pretty(&details)?);

    let extension = registry.get_or_create(&config.protocol_id).await?;
    match extension
        .fetch_reward_summary(&config.delegator_address, &config.delegatee_addresses)
        .await?
    {
        Some(rewards) => println!("{}", serde_json::to_string_pretty(&rewards)?),
        None => warn!("No rewards recorded yet for {}", config.delegator_address),
    }

    if config.delegatee_addresses.is_empty() {
        if let Some(featured) = extension.default_delegatee() {
            info!("Featured delegatee: {}", featured);
        }
    } else {
        let summaries = extension.summarize_delegatees(&config.delegatee_addresses).await?;
        println!("{}", serde_json::to_string_pretty(&summaries)?);
    }

    info!("Lookup complete");
    Ok(())
}
