pub mod failover;
pub mod protocol_client;
pub mod remote_config;
pub mod snapshot;

pub use failover::FailoverClient;
pub use protocol_client::{BakerClient, NominationClient, QueryResult};
pub use remote_config::{HttpRemoteConfig, RemoteConfigProvider, StaticRemoteConfig};
pub use snapshot::ChainSnapshot;
