pub mod payment;
pub mod reconciliation;
pub mod tenant;

pub use payment::PaymentRecord;
pub use reconciliation::{MatchPass, MatchStatus, PaymentType, ReconciliationResult};
pub use tenant::TenantRecord;
