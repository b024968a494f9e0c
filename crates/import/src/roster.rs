use std::collections::HashSet;
use std::io::Read;
use std::str::FromStr;

use rentrec_core::TenantRecord;
use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RosterError {
    /// Includes I/O failures from the underlying reader.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Row {row}: invalid expected_rent '{value}'")]
    InvalidRent { row: usize, value: String },
    #[error("Row {row}: expected_rent must be positive, got {value}")]
    NonPositiveRent { row: usize, value: Decimal },
    #[error("Row {row}: missing {field}")]
    MissingField { row: usize, field: &'static str },
}

/// Raw CSV row. Rent stays text until validated so errors can name the row.
#[derive(Debug, Deserialize)]
struct RosterRow {
    tenant_id: String,
    name: String,
    house: String,
    reference: String,
    expected_rent: String,
}

impl RosterRow {
    fn into_tenant(self, row: usize) -> Result<TenantRecord, RosterError> {
        if self.tenant_id.is_empty() {
            return Err(RosterError::MissingField { row, field: "tenant_id" });
        }
        // An empty name is contained in every payer string.
        if self.name.is_empty() {
            return Err(RosterError::MissingField { row, field: "name" });
        }

        let clean = self.expected_rent.replace(',', "");
        let expected_rent = Decimal::from_str(&clean).map_err(|_| RosterError::InvalidRent {
            row,
            value: self.expected_rent.clone(),
        })?;
        if expected_rent <= Decimal::ZERO {
            return Err(RosterError::NonPositiveRent { row, value: expected_rent });
        }

        Ok(TenantRecord {
            tenant_id: self.tenant_id,
            name: self.name,
            house: self.house,
            reference: self.reference,
            expected_rent,
        })
    }
}

/// Loads a headed CSV roster (`tenant_id,name,house,reference,expected_rent`),
/// keeping file order. The first bad row fails the whole load.
pub fn load_roster<R: Read>(data: R) -> Result<Vec<TenantRecord>, RosterError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let mut tenants = Vec::new();
    let mut seen_refs = HashSet::new();

    for (idx, result) in reader.deserialize::<RosterRow>().enumerate() {
        // Header is row 1.
        let row = idx + 2;
        let tenant = result?.into_tenant(row)?;

        if !tenant.reference.is_empty() && !seen_refs.insert(tenant.reference.to_uppercase()) {
            tracing::warn!(
                row,
                "Duplicate tenant reference '{}'; earlier roster entry wins",
                tenant.reference
            );
        }
        tenants.push(tenant);
    }

    tracing::debug!("Loaded {} tenants", tenants.len());
    Ok(tenants)
}
