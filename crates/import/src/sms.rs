use std::io::BufRead;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rentrec_core::PaymentRecord;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

// ── Template ─────────────────────────────────────────────────────────────────

fn re_credit_alert() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| {
        Regex::new(concat!(
            r"received a credit of KES\s+([0-9,]+(?:\.[0-9]{2})?)\s+",
            r"from\s+(.+?)\s+",
            r"for account\s+([A-Z0-9\-]+)\s+",
            r"at\s+(.+?)\.\s*MPESA Ref\s+([A-Z0-9]+)",
        ))
        .expect("invalid regex")
    })
}

#[derive(Error, Debug)]
pub enum SmsError {
    #[error("line does not match the credit alert template")]
    TemplateMismatch,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A line that could not be turned into a payment, handed to the caller's sink.
#[derive(Debug)]
pub struct ParseFailure {
    /// 1-based position in the input, blank lines included.
    pub line_number: usize,
    pub line: String,
    pub error: SmsError,
}

// ── Single line ──────────────────────────────────────────────────────────────

pub fn parse_line(line: &str) -> Result<PaymentRecord, SmsError> {
    let line = line.trim();
    let c = re_credit_alert()
        .captures(line)
        .ok_or(SmsError::TemplateMismatch)?;

    // All five groups are mandatory in the pattern.
    let group = |i: usize| c.get(i).map_or("", |m| m.as_str()).trim().to_string();

    Ok(PaymentRecord {
        amount: parse_whole_amount(&group(1))?,
        payer: group(2),
        account: group(3),
        date: group(4),
        external_ref: group(5),
        raw_message: line.to_string(),
    })
}

/// Strips thousands separators and truncates toward zero. Amounts above
/// `u64::MAX` whole units are rejected.
fn parse_whole_amount(s: &str) -> Result<u64, SmsError> {
    let clean = s.replace(',', "");
    Decimal::from_str(&clean)
        .ok()
        .and_then(|d| d.trunc().to_u64())
        .ok_or_else(|| SmsError::InvalidAmount(s.to_string()))
}

// ── Batches ──────────────────────────────────────────────────────────────────

/// Parses every non-blank line, in order. Failures go to `sink` and are left
/// out of the returned records.
pub fn parse_lines<I, S, F>(lines: I, mut sink: F) -> Vec<PaymentRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: FnMut(ParseFailure),
{
    let mut records = Vec::new();
    for (idx, line) in lines.into_iter().enumerate() {
        let line = line.as_ref().trim();
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(record) => records.push(record),
            Err(error) => sink(ParseFailure {
                line_number: idx + 1,
                line: line.to_string(),
                error,
            }),
        }
    }
    records
}

pub fn parse_lines_logged<I, S>(lines: I) -> Vec<PaymentRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_lines(lines, log_failure)
}

/// Reads lines from `reader` and parses them. Read errors abort; template
/// failures do not.
pub fn parse_reader<R, F>(reader: R, sink: F) -> Result<Vec<PaymentRecord>, SmsError>
where
    R: BufRead,
    F: FnMut(ParseFailure),
{
    let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
    Ok(parse_lines(lines, sink))
}

pub fn log_failure(failure: ParseFailure) {
    tracing::warn!(
        line_number = failure.line_number,
        "Failed to parse line: {} ({})",
        failure.line,
        failure.error
    );
}

// ── Tests ────────────────────────────────────────────────────────────────────
