use rentrec_core::ReconciliationResult;
use rentrec_import::ReconciliationSummary;
use serde::Serialize;

const UNKNOWN: &str = "UNKNOWN";

pub fn render_text(results: &[ReconciliationResult], currency: &str) -> String {
    let mut out = String::from("--- RECONCILIATION REPORT ---\n");
    for r in results {
        out.push_str(&report_line(r, currency));
        out.push('\n');
    }

    let s = ReconciliationSummary::from_results(results);
    out.push_str(&format!(
        "\n--- SUMMARY ---\n\
         Payments: {} ({} matched, {} unknown)\n\
         Full: {}  Partial: {}\n\
         Received: {currency} {}\n\
         Unmatched: {currency} {}\n",
        s.total, s.matched, s.unknown, s.full, s.partial, s.amount_received, s.amount_unmatched,
    ));
    out
}

pub fn report_line(r: &ReconciliationResult, currency: &str) -> String {
    format!(
        "{} - {} : {} - {currency} {} - MPESA Ref: {}",
        r.house.as_deref().unwrap_or(UNKNOWN),
        r.tenant_name.as_deref().unwrap_or(UNKNOWN),
        r.payment_type,
        r.payment.amount,
        r.payment.external_ref,
    )
}

#[derive(Serialize)]
struct JsonReport<'a> {
    results: &'a [ReconciliationResult],
    summary: ReconciliationSummary,
}

pub fn render_json(results: &[ReconciliationResult]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        results,
        summary: ReconciliationSummary::from_results(results),
    })
}
