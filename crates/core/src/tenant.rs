use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One roster entry.
///
/// `reference` is compared case-insensitively against payment accounts and is
/// expected, though not required, to be unique across the roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantRecord {
    pub tenant_id: String,
    pub name: String,
    pub house: String,
    pub reference: String,
    pub expected_rent: Decimal,
}

impl TenantRecord {
    pub fn reference_matches(&self, account: &str) -> bool {
        self.reference.to_uppercase() == account.to_uppercase()
    }

    /// True when the uppercased tenant name occurs anywhere in the uppercased payer.
    pub fn name_within(&self, payer: &str) -> bool {
        payer.to_uppercase().contains(&self.name.to_uppercase())
    }
}
