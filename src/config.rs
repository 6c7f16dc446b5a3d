use std::env;

use crate::error::{Error, Result};
use crate::utils::helpers::split_addresses;

#[derive(Debug)]
pub struct Config {
    pub protocol_id: String,
    pub delegator_address: String,
    pub delegatee_addresses: Vec<String>,
    pub snapshot_path: String,
    pub secondary_snapshot_path: Option<String>,
    pub baker_config_url: Option<String>,
    pub remote_config_retries: u32,
}

fn required(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("{name} must be set")))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            protocol_id: env::var("PROTOCOL_ID").unwrap_or_else(|_| "polkadot".to_string()),
            delegator_address: required("DELEGATOR_ADDRESS")?,
            delegatee_addresses: split_addresses(
                &env::var("DELEGATEE_ADDRESSES").unwrap_or_default(),
            ),
            snapshot_path: required("SNAPSHOT_PATH")?,
            secondary_snapshot_path: optional("SECONDARY_SNAPSHOT_PATH"),
            baker_config_url: optional("BAKER_CONFIG_URL"),
            remote_config_retries: env::var("REMOTE_CONFIG_RETRIES")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|e| Error::Config(format!("REMOTE_CONFIG_RETRIES: {e}")))?,
        })
    }
}
