//! Script configuration and on-chain identifier resolution.
//!
//! The deployed bank is known through a name → id map written when the
//! package was published:
//!
//! ```json
//! {
//!   "package": "0x…",
//!   "bank::Bank": "0x…",
//!   "dollar::CapWrapper": "0x…"
//! }
//! ```
//!
//! [`Deployment::resolve`] turns that map into [`BankIds`], from which every
//! type tag and call target the scripts use is derived.

use crate::model::{coin_object_type, MoveTarget, ObjectId, SuiAddress};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

pub const PACKAGE: &str = "package";
pub const BANK: &str = "bank::Bank";
pub const CAP_WRAPPER: &str = "dollar::CapWrapper";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("No id configured for '{0}'")]
    MissingId(String),
}

/// Logical name → on-chain id map of a published package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Deployment {
    ids: BTreeMap<String, ObjectId>,
}

impl Deployment {
    pub fn new(package: ObjectId, bank: ObjectId, cap_wrapper: ObjectId) -> Self {
        let mut ids = BTreeMap::new();
        ids.insert(PACKAGE.to_string(), package);
        ids.insert(BANK.to_string(), bank);
        ids.insert(CAP_WRAPPER.to_string(), cap_wrapper);
        Self { ids }
    }

    pub fn get_id(&self, name: &str) -> Result<&ObjectId, ConfigError> {
        self.ids
            .get(name)
            .ok_or_else(|| ConfigError::MissingId(name.to_string()))
    }

    pub fn resolve(&self) -> Result<BankIds, ConfigError> {
        Ok(BankIds {
            package: self.get_id(PACKAGE)?.clone(),
            bank: self.get_id(BANK)?.clone(),
            cap_wrapper: self.get_id(CAP_WRAPPER)?.clone(),
        })
    }
}

/// The resolved ids of the bank deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankIds {
    pub package: ObjectId,
    pub bank: ObjectId,
    pub cap_wrapper: ObjectId,
}

impl BankIds {
    pub fn target(&self, module: &str, function: &str) -> MoveTarget {
        MoveTarget::new(self.package.clone(), module, function)
    }

    pub fn account_type(&self) -> String {
        format!("{}::bank::Account", self.package)
    }

    pub fn bank_type(&self) -> String {
        format!("{}::bank::Bank", self.package)
    }

    pub fn cap_wrapper_type(&self) -> String {
        format!("{}::dollar::CapWrapper", self.package)
    }

    /// Coin type of the borrowed stablecoin.
    pub fn dollar_type(&self) -> String {
        format!("{}::dollar::DOLLAR", self.package)
    }

    pub fn dollar_coin_type(&self) -> String {
        coin_object_type(&self.dollar_type())
    }
}

/// Settings of the in-process node the scripts run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_gas_balance")]
    pub gas_balance: u64,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_gas_balance() -> u64 {
    1_000_000
}

fn default_page_size() -> usize {
    50
}

fn default_channel_capacity() -> usize {
    32
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            gas_balance: default_gas_balance(),
            page_size: default_page_size(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptConfig {
    pub sender: SuiAddress,
    pub deployment: Deployment,
    #[serde(default)]
    pub node: NodeConfig,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            sender: SuiAddress::from_index(0xa11ce),
            deployment: Deployment::new(
                ObjectId::from_index(0xba4c),
                ObjectId::from_index(0xba4c_0001),
                ObjectId::from_index(0xba4c_0002),
            ),
            node: NodeConfig::default(),
        }
    }
}

impl ScriptConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Loads `path`, falling back to the defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let config = Self::load(path)?;
            info!(path = %path.display(), "Config loaded");
            Ok(config)
        } else {
            info!(path = %path.display(), "Config file not found, using defaults");
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_deployment_by_logical_name() {
        let config = ScriptConfig::from_json(
            r#"{
                "sender": "0xa",
                "deployment": {
                    "package": "0xp",
                    "bank::Bank": "0xb",
                    "dollar::CapWrapper": "0xc"
                },
                "node": { "page_size": 2 }
            }"#,
        )
        .unwrap();

        let ids = config.deployment.resolve().unwrap();
        assert_eq!(ids.package, ObjectId::new("0xp"));
        assert_eq!(ids.bank, ObjectId::new("0xb"));
        assert_eq!(ids.cap_wrapper, ObjectId::new("0xc"));
        assert_eq!(ids.account_type(), "0xp::bank::Account");
        assert_eq!(ids.dollar_type(), "0xp::dollar::DOLLAR");
        assert_eq!(ids.target("bank", "deposit").to_string(), "0xp::bank::deposit");

        assert_eq!(config.node.page_size, 2);
        assert_eq!(config.node.gas_balance, 1_000_000);
    }

    #[test]
    fn missing_id_is_reported_by_name() {
        let config = ScriptConfig::from_json(
            r#"{ "sender": "0xa", "deployment": { "package": "0xp" } }"#,
        )
        .unwrap();

        let err = config.deployment.resolve().unwrap_err();
        assert!(matches!(err, ConfigError::MissingId(ref name) if name == BANK));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = ScriptConfig::load_or_default(Path::new("/nonexistent/bank.json")).unwrap();
        assert_eq!(config, ScriptConfig::default());
    }
}
