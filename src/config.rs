//! Runtime configuration fixed at startup.

use serde::{Deserialize, Serialize};

/// Public domain and address of the tunnel server, shown in the console so
/// users can build tunnel URLs. Set once at bootstrap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub domain: String,
    /// Host IP the agents connect to.
    #[serde(rename = "ip", default)]
    pub address: String,
}

impl RuntimeConfig {
    pub fn new(domain: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            address: address.into(),
        }
    }

    pub fn is_set(&self) -> bool {
        !self.domain.is_empty() || !self.address.is_empty()
    }
}
