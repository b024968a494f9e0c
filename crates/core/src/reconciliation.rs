use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::payment::PaymentRecord;
use crate::tenant::TenantRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchStatus {
    Matched,
    Unknown,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Matched => write!(f, "MATCHED"),
            MatchStatus::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentType {
    Full,
    Partial,
    Unknown,
}

impl PaymentType {
    /// Full when the amount covers the expected rent exactly as stored.
    pub fn classify(amount: u64, expected_rent: Decimal) -> Self {
        if Decimal::from(amount) >= expected_rent {
            PaymentType::Full
        } else {
            PaymentType::Partial
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentType::Full => write!(f, "FULL"),
            PaymentType::Partial => write!(f, "PARTIAL"),
            PaymentType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Which matching pass produced the hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPass {
    Reference,
    PayerName,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    #[serde(flatten)]
    pub payment: PaymentRecord,
    pub tenant_id: Option<String>,
    pub tenant_name: Option<String>,
    pub house: Option<String>,
    pub expected_rent: Option<Decimal>,
    pub match_status: MatchStatus,
    pub payment_type: PaymentType,
    pub matched_by: Option<MatchPass>,
}

impl ReconciliationResult {
    pub fn matched(payment: PaymentRecord, tenant: &TenantRecord, pass: MatchPass) -> Self {
        let payment_type = PaymentType::classify(payment.amount, tenant.expected_rent);
        Self {
            payment,
            tenant_id: Some(tenant.tenant_id.clone()),
            tenant_name: Some(tenant.name.clone()),
            house: Some(tenant.house.clone()),
            expected_rent: Some(tenant.expected_rent),
            match_status: MatchStatus::Matched,
            payment_type,
            matched_by: Some(pass),
        }
    }

    pub fn unmatched(payment: PaymentRecord) -> Self {
        Self {
            payment,
            tenant_id: None,
            tenant_name: None,
            house: None,
            expected_rent: None,
            match_status: MatchStatus::Unknown,
            payment_type: PaymentType::Unknown,
            matched_by: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.match_status == MatchStatus::Matched
    }
}
