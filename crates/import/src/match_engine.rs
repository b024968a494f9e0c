use rentrec_core::{MatchPass, PaymentRecord, PaymentType, ReconciliationResult, TenantRecord};
use serde::Serialize;

/// Matches payments against a roster whose order is significant: on every
/// pass the earliest qualifying tenant wins.
pub struct Reconciler<'a> {
    tenants: &'a [TenantRecord],
}

impl<'a> Reconciler<'a> {
    pub fn new(tenants: &'a [TenantRecord]) -> Self {
        Self { tenants }
    }

    pub fn reconcile_all(&self, payments: &[PaymentRecord]) -> Vec<ReconciliationResult> {
        payments.iter().map(|p| self.match_payment(p)).collect()
    }

    pub fn match_payment(&self, payment: &PaymentRecord) -> ReconciliationResult {
        match self.find_tenant(payment) {
            Some((tenant, pass)) => {
                tracing::debug!(
                    external_ref = %payment.external_ref,
                    tenant_id = %tenant.tenant_id,
                    ?pass,
                    "Payment matched"
                );
                ReconciliationResult::matched(payment.clone(), tenant, pass)
            }
            None => {
                tracing::debug!(external_ref = %payment.external_ref, "Payment unmatched");
                ReconciliationResult::unmatched(payment.clone())
            }
        }
    }

    fn find_tenant(&self, payment: &PaymentRecord) -> Option<(&'a TenantRecord, MatchPass)> {
        if payment.has_account() {
            if let Some(t) = self
                .tenants
                .iter()
                .find(|t| t.reference_matches(&payment.account))
            {
                return Some((t, MatchPass::Reference));
            }
        }

        // Substring containment; short names can hit unrelated payers.
        self.tenants
            .iter()
            .find(|t| t.name_within(&payment.payer))
            .map(|t| (t, MatchPass::PayerName))
    }
}

pub fn match_payment(payment: &PaymentRecord, tenants: &[TenantRecord]) -> ReconciliationResult {
    Reconciler::new(tenants).match_payment(payment)
}

pub fn reconcile_all(
    payments: &[PaymentRecord],
    tenants: &[TenantRecord],
) -> Vec<ReconciliationResult> {
    Reconciler::new(tenants).reconcile_all(payments)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationSummary {
    pub total: usize,
    pub matched: usize,
    pub unknown: usize,
    pub full: usize,
    pub partial: usize,
    /// Sum of every amount received, matched or not. Wider than a single
    /// amount so large batches cannot overflow.
    pub amount_received: u128,
    pub amount_unmatched: u128,
}

impl ReconciliationSummary {
    pub fn from_results(results: &[ReconciliationResult]) -> Self {
        results.iter().fold(Self::default(), |mut s, r| {
            s.total += 1;
            s.amount_received += u128::from(r.payment.amount);
            match r.payment_type {
                PaymentType::Full => s.full += 1,
                PaymentType::Partial => s.partial += 1,
                PaymentType::Unknown => s.amount_unmatched += u128::from(r.payment.amount),
            }
            if r.is_matched() {
                s.matched += 1;
            } else {
                s.unknown += 1;
            }
            s
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rentrec_core::MatchStatus;
    use rust_decimal::Decimal;

    fn tenant(id: &str, name: &str, reference: &str, rent: i64) -> TenantRecord {
        TenantRecord {
            tenant_id: id.to_string(),
            name: name.to_string(),
            house: format!("H-{id}"),
            reference: reference.to_string(),
            expected_rent: Decimal::from(rent),
        }
    }

    fn payment(payer: &str, account: &str, amount: u64) -> PaymentRecord {
        PaymentRecord {
            payer: payer.to_string(),
            amount,
            account: account.to_string(),
            date: "01/05/24 10:00".to_string(),
            external_ref: format!("REF{amount}"),
            raw_message: String::new(),
        }
    }

    fn roster() -> Vec<TenantRecord> {
        vec![
            tenant("T1", "John Doe", "HOUSE12", 5000),
            tenant("T2", "Jane Doe", "HOUSE13", 4500),
        ]
    }

    #[test]
    fn reference_match_full_payment() {
        let r = match_payment(&payment("JOHN DOE", "HOUSE12", 5000), &roster());
        assert_eq!(r.match_status, MatchStatus::Matched);
        assert_eq!(r.payment_type, PaymentType::Full);
        assert_eq!(r.tenant_id.as_deref(), Some("T1"));
        assert_eq!(r.matched_by, Some(MatchPass::Reference));
    }

    #[test]
    fn reference_match_partial_payment() {
        let r = match_payment(&payment("JOHN DOE", "HOUSE12", 3000), &roster());
        assert_eq!(r.match_status, MatchStatus::Matched);
        assert_eq!(r.payment_type, PaymentType::Partial);
    }

    #[test]
    fn reference_match_ignores_case() {
        let r = match_payment(&payment("SOMEONE", "house13", 4500), &roster());
        assert_eq!(r.tenant_id.as_deref(), Some("T2"));
    }

    #[test]
    fn reference_pass_beats_name_pass() {
        // Payer names T1, account names T2: the account wins.
        let r = match_payment(&payment("JOHN DOE", "HOUSE13", 4500), &roster());
        assert_eq!(r.tenant_id.as_deref(), Some("T2"));
        assert_eq!(r.matched_by, Some(MatchPass::Reference));
    }

    #[test]
    fn empty_account_falls_through_to_name() {
        let r = match_payment(&payment("MARY JANE DOE", "", 4500), &roster());
        assert_eq!(r.match_status, MatchStatus::Matched);
        assert_eq!(r.tenant_id.as_deref(), Some("T2"));
        assert_eq!(r.matched_by, Some(MatchPass::PayerName));
    }

    #[test]
    fn empty_account_never_matches_empty_reference() {
        let tenants = vec![tenant("T1", "Someone Else", "", 100)];
        let r = match_payment(&payment("JOHN", "", 100), &tenants);
        assert_eq!(r.match_status, MatchStatus::Unknown);
    }

    #[test]
    fn unknown_account_falls_through_to_name() {
        let r = match_payment(&payment("JOHN DOE", "NOPE", 5000), &roster());
        assert_eq!(r.tenant_id.as_deref(), Some("T1"));
        assert_eq!(r.matched_by, Some(MatchPass::PayerName));
    }

    #[test]
    fn no_match_is_unknown() {
        let r = match_payment(&payment("PETER PAN", "NOPE", 5000), &roster());
        assert_eq!(r.match_status, MatchStatus::Unknown);
        assert_eq!(r.payment_type, PaymentType::Unknown);
        assert!(r.tenant_id.is_none());
        assert!(r.tenant_name.is_none());
        assert!(r.house.is_none());
        assert!(r.expected_rent.is_none());
    }

    #[test]
    fn empty_roster_is_always_unknown() {
        let r = match_payment(&payment("JOHN DOE", "HOUSE12", 5000), &[]);
        assert_eq!(r.match_status, MatchStatus::Unknown);
    }

    #[test]
    fn first_reference_in_roster_wins() {
        let tenants = vec![
            tenant("T1", "A", "DUP", 100),
            tenant("T2", "B", "dup", 100),
        ];
        let r = match_payment(&payment("X", "DUP", 100), &tenants);
        assert_eq!(r.tenant_id.as_deref(), Some("T1"));
    }

    #[test]
    fn first_name_in_roster_wins() {
        let tenants = vec![
            tenant("T1", "Doe", "R1", 100),
            tenant("T2", "John Doe", "R2", 100),
        ];
        let r = match_payment(&payment("JOHN DOE", "", 100), &tenants);
        assert_eq!(r.tenant_id.as_deref(), Some("T1"));

        let reversed: Vec<_> = tenants.into_iter().rev().collect();
        let r = match_payment(&payment("JOHN DOE", "", 100), &reversed);
        assert_eq!(r.tenant_id.as_deref(), Some("T2"));
    }

    #[test]
    fn short_name_false_positive_is_kept() {
        let tenants = vec![tenant("T1", "Ann", "R1", 100)];
        let r = match_payment(&payment("JOANNA KAMAU", "", 100), &tenants);
        assert_eq!(r.tenant_id.as_deref(), Some("T1"));
    }

    #[test]
    fn reconcile_all_one_result_per_payment_in_order() {
        let payments = vec![
            payment("PETER PAN", "", 1),
            payment("JOHN DOE", "HOUSE12", 5000),
            payment("MARY JANE DOE", "", 2000),
        ];
        let results = reconcile_all(&payments, &roster());
        assert_eq!(results.len(), payments.len());
        for (r, p) in results.iter().zip(&payments) {
            assert_eq!(&r.payment, p);
        }
        assert_eq!(results[0].payment_type, PaymentType::Unknown);
        assert_eq!(results[1].payment_type, PaymentType::Full);
        assert_eq!(results[2].payment_type, PaymentType::Partial);
    }

    #[test]
    fn reconcile_all_is_idempotent() {
        let payments = vec![payment("JOHN DOE", "HOUSE12", 5000), payment("X", "", 1)];
        let tenants = roster();
        assert_eq!(reconcile_all(&payments, &tenants), reconcile_all(&payments, &tenants));
    }

    #[test]
    fn classification_law_holds() {
        let payments: Vec<_> = (0..10)
            .map(|i| payment("JOHN DOE", "HOUSE12", 4000 + i * 200))
            .chain([payment("NOBODY", "", 9999)])
            .collect();
        for r in reconcile_all(&payments, &roster()) {
            match (r.match_status, r.expected_rent) {
                (MatchStatus::Matched, Some(rent)) => {
                    let full = Decimal::from(r.payment.amount) >= rent;
                    assert_eq!(r.payment_type == PaymentType::Full, full);
                    assert_eq!(r.payment_type == PaymentType::Partial, !full);
                }
                (MatchStatus::Unknown, None) => assert_eq!(r.payment_type, PaymentType::Unknown),
                other => panic!("inconsistent result: {other:?}"),
            }
        }
    }

    #[test]
    fn summary_counts_results() {
        let payments = vec![
            payment("JOHN DOE", "HOUSE12", 5000),
            payment("JANE DOE", "HOUSE13", 1000),
            payment("NOBODY", "", 700),
        ];
        let summary = ReconciliationSummary::from_results(&reconcile_all(&payments, &roster()));
        assert_eq!(
            summary,
            ReconciliationSummary {
                total: 3,
                matched: 2,
                unknown: 1,
                full: 1,
                partial: 1,
                amount_received: 6700,
                amount_unmatched: 700,
            }
        );
    }

    #[test]
    fn summary_totals_do_not_overflow_single_amount() {
        let big = payment("NOBODY", "", 10_000_000_000_000_000_000);
        let results = reconcile_all(&[big.clone(), big], &[]);
        let summary = ReconciliationSummary::from_results(&results);
        assert_eq!(summary.amount_received, 20_000_000_000_000_000_000);
        assert_eq!(summary.amount_unmatched, 20_000_000_000_000_000_000);
    }
}
