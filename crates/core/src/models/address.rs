//! Shipping addresses.

use serde::{Deserialize, Serialize};

use crate::types::AddressId;

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub receiver_name: String,
    pub phone: String,
    pub province: String,
    pub city: String,
    pub district: String,
    pub detail: String,
    pub postal_code: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Street-to-region single line, e.g. for order summaries.
    #[must_use]
    pub fn one_line(&self) -> String {
        [
            self.detail.as_str(),
            self.district.as_str(),
            self.city.as_str(),
            self.province.as_str(),
            self.postal_code.as_str(),
        ]
        .iter()
        .map(|part| part.trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// The default address, or the first one when none is flagged.
    #[must_use]
    pub fn preferred(addresses: &[Self]) -> Option<&Self> {
        addresses
            .iter()
            .find(|a| a.is_default)
            .or_else(|| addresses.first())
    }
}

/// Payload for creating or editing an address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    #[serde(default)]
    pub receiver_name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub province: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub district: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub postal_code: String,
    #[serde(default)]
    pub is_default: bool,
}

impl From<&Address> for AddressInput {
    fn from(address: &Address) -> Self {
        Self {
            receiver_name: address.receiver_name.clone(),
            phone: address.phone.clone(),
            province: address.province.clone(),
            city: address.city.clone(),
            district: address.district.clone(),
            detail: address.detail.clone(),
            postal_code: address.postal_code.clone(),
            is_default: address.is_default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address(id: i64, is_default: bool) -> Address {
        Address {
            id: AddressId::new(id),
            receiver_name: "Ann".to_string(),
            phone: "5550100".to_string(),
            province: "Ontario".to_string(),
            city: "Toronto".to_string(),
            district: String::new(),
            detail: "12 Queen St".to_string(),
            postal_code: "100001".to_string(),
            is_default,
        }
    }

    #[test]
    fn test_one_line_skips_blank_parts() {
        assert_eq!(
            address(1, false).one_line(),
            "12 Queen St, Toronto, Ontario, 100001"
        );
    }

    #[test]
    fn test_preferred_address() {
        let list = vec![address(1, false), address(2, true)];
        assert_eq!(Address::preferred(&list).map(|a| a.id), Some(AddressId::new(2)));
        let list = vec![address(3, false)];
        assert_eq!(Address::preferred(&list).map(|a| a.id), Some(AddressId::new(3)));
        assert!(Address::preferred(&[]).is_none());
    }
}
