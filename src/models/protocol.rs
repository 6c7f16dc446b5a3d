use serde::{Deserialize, Serialize};

/// Static metadata of the chain an extension serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolInfo {
    pub identifier: String,
    pub symbol: String,
    pub decimals: u32,
}

impl ProtocolInfo {
    pub fn new(identifier: impl Into<String>, symbol: impl Into<String>, decimals: u32) -> Self {
        Self {
            identifier: identifier.into(),
            symbol: symbol.into(),
            decimals,
        }
    }
}
