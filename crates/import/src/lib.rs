pub mod match_engine;
pub mod roster;
pub mod sms;

pub use match_engine::{match_payment, reconcile_all, Reconciler, ReconciliationSummary};
pub use roster::{load_roster, RosterError};
pub use sms::{parse_line, parse_lines, parse_lines_logged, parse_reader, ParseFailure, SmsError};

pub mod import {
    use crate::*;
    use rentrec_core::{PaymentRecord, ReconciliationResult, TenantRecord};

    /// Parses alerts from `alerts`, logging each rejected line, and reconciles
    /// them against the roster in `roster`.
    pub fn reconcile_sources<S: std::io::BufRead, R: std::io::Read>(
        alerts: S,
        roster: R,
    ) -> Result<(Vec<TenantRecord>, Vec<ReconciliationResult>), ImportError> {
        let tenants = load_roster(roster)?;
        let payments: Vec<PaymentRecord> = parse_reader(alerts, crate::sms::log_failure)?;
        let results = reconcile_all(&payments, &tenants);
        Ok((tenants, results))
    }

    #[derive(Debug, thiserror::Error)]
    pub enum ImportError {
        #[error(transparent)]
        Sms(#[from] SmsError),
        #[error(transparent)]
        Roster(#[from] RosterError),
    }

}
