//! Identities, object records and coin balances as the node reports them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Type of the native gas coin.
pub const GAS_COIN_TYPE: &str = "0x2::sui::SUI";

/// Full type tag of a coin object holding `coin_type`.
pub fn coin_object_type(coin_type: &str) -> String {
    format!("0x2::coin::Coin<{}>", coin_type)
}

macro_rules! hex_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Builds the canonical 32-byte hex form of `index`.
            pub fn from_index(index: u64) -> Self {
                Self(format!("0x{:064x}", index))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

hex_id!(
    /// A public address controlling assets.
    SuiAddress
);

hex_id!(
    /// Identifier of an on-chain object.
    ObjectId
);

/// Who may use an object as a transaction input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum Owner {
    AddressOwner(SuiAddress),
    Shared {
        #[serde(rename = "initial_shared_version")]
        initial_shared_version: u64,
    },
    Immutable,
}

impl Owner {
    pub fn is_owned_by(&self, address: &SuiAddress) -> bool {
        matches!(self, Owner::AddressOwner(owner) if owner == address)
    }
}

/// Which optional fields an owned-object query fills in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectDataOptions {
    pub show_type: bool,
    pub show_owner: bool,
}

impl ObjectDataOptions {
    pub fn with_type() -> Self {
        Self {
            show_type: true,
            ..Default::default()
        }
    }
}

/// One entry of an owned-object page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRecord {
    pub object_id: ObjectId,
    pub version: u64,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

impl ObjectRecord {
    pub fn new(object_id: ObjectId, version: u64) -> Self {
        Self {
            object_id,
            version,
            object_type: None,
            owner: None,
        }
    }

    pub fn with_type(mut self, object_type: impl Into<String>) -> Self {
        self.object_type = Some(object_type.into());
        self
    }
}

/// A page of objects owned by one address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectPage {
    pub data: Vec<ObjectRecord>,
    pub next_cursor: Option<ObjectId>,
    pub has_next_page: bool,
}

/// Point-in-time balance of one coin type owned by an address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoinBalance {
    pub coin_type: String,
    pub total_balance: u128,
    pub coin_object_count: usize,
}

impl CoinBalance {
    pub fn empty(coin_type: impl Into<String>) -> Self {
        Self {
            coin_type: coin_type.into(),
            total_balance: 0,
            coin_object_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_padded_and_ordered() {
        let a = ObjectId::from_index(2);
        let b = ObjectId::from_index(10);
        assert_eq!(a.as_str().len(), 66);
        assert!(a < b);
        assert_eq!(a.to_string(), a.as_str());
    }

    #[test]
    fn owner_serializes_like_the_node() {
        let owner = Owner::AddressOwner(SuiAddress::new("0xa"));
        let json = serde_json::to_value(&owner).unwrap();
        assert_eq!(json, serde_json::json!({ "AddressOwner": "0xa" }));

        let shared = Owner::Shared { initial_shared_version: 1 };
        let json = serde_json::to_value(&shared).unwrap();
        assert_eq!(json, serde_json::json!({ "Shared": { "initial_shared_version": 1 } }));
    }
}
