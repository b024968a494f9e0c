use serde::{Deserialize, Serialize};

/// One credit alert, parsed from a single notification line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payer: String,
    /// Whole currency units. Fractions are truncated at parse time.
    pub amount: u64,
    /// Account reference quoted by the payer. May be empty.
    pub account: String,
    /// Timestamp exactly as the bank wrote it.
    pub date: String,
    pub external_ref: String,
    pub raw_message: String,
}

impl PaymentRecord {
    pub fn has_account(&self) -> bool {
        !self.account.is_empty()
    }
}
