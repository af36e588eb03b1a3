use super::{unescape, Section};
use crate::error::ImportError;
use crate::model::{
    Amount, AppData, AppState, Bill, Income, Month, PaycheckNumber, Savings, SavingsHistoryEntry,
};
use crate::validate::max_amount;
use std::str::FromStr;
use tracing::{debug, trace};

/// A data row needs at least a name and an amount (or a month and a total).
const MIN_FIELDS: usize = 2;

/// Case-insensitive values that mark a bill as paid.
const PAID_VALUES: [&str; 4] = ["yes", "true", "1", "x"];

/// Reads CSV text into a complete `AppData`.
///
/// Rows that cannot be used are skipped. The parse only fails when no income, bill or savings
/// row could be recovered at all. `now` becomes the session month when the file has no usable
/// savings history.
pub fn parse(text: &str, now: Month) -> Result<AppData, ImportError> {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut income = Vec::new();
    let mut bills = Vec::new();
    let mut savings = Vec::new();
    let mut history = Vec::new();

    let mut section: Option<Section> = None;
    let mut header_skipped = false;

    for (ix, raw) in normalized.split('\n').enumerate() {
        let line_number = ix + 1;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(next) = Section::detect(line) {
            trace!("Line {line_number} opens section {next:?}");
            section = Some(next);
            header_skipped = false;
            continue;
        }

        // Anything before the first section label, such as the title line.
        let Some(current) = section else {
            continue;
        };

        if !header_skipped && looks_like_header(current, line) {
            header_skipped = true;
            continue;
        }

        let fields = split_fields(line);
        if fields.len() < MIN_FIELDS || fields[0].is_empty() {
            debug!("Skipping line {line_number}, it does not have enough fields");
            continue;
        }

        match current {
            Section::Income => income.push(income_row(&fields)),
            Section::Bills => match bill_row(&fields) {
                Some(bill) => bills.push(bill),
                None => debug!(
                    "Skipping line {line_number}, bill '{}' has no amount above zero",
                    fields[0]
                ),
            },
            Section::Savings => savings.push(savings_row(&fields)),
            Section::SavingsHistory => match history_row(&fields) {
                Some(entry) => history.push(entry),
                None => debug!(
                    "Skipping line {line_number}, '{}' is not a YYYY-MM month",
                    fields[0]
                ),
            },
            Section::Summary => {}
        }
    }

    if income.is_empty() && bills.is_empty() && savings.is_empty() {
        return Err(ImportError::Unrecognized);
    }

    let last_session_month = history
        .iter()
        .map(SavingsHistoryEntry::month)
        .max()
        .unwrap_or(now);
    let mut app_state = AppState::new(last_session_month);
    app_state.has_completed_setup = true;
    for entry in history {
        app_state.push_history(entry);
    }

    let mut data = AppData::new(income, bills, savings, app_state);
    data.ensure_paychecks();
    Ok(data)
}

/// True for a column-header row. Only the first such row in a section is skipped.
fn looks_like_header(section: Section, line: &str) -> bool {
    let lower = line.to_lowercase();
    if ["name", "month", "total"]
        .iter()
        .any(|prefix| lower.starts_with(prefix))
    {
        return true;
    }
    matches!(section, Section::Income | Section::Bills)
        && ((lower.contains("default") && lower.contains("amount")) || lower.contains("paid"))
}

/// Splits one line into unquoted, trimmed and unescaped cells.
fn split_fields(line: &str) -> Vec<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(line.as_bytes());
    let mut record = csv::StringRecord::new();
    match reader.read_record(&mut record) {
        Ok(true) => record.iter().map(unescape).collect(),
        Ok(false) => Vec::new(),
        Err(e) => {
            debug!("Unable to split CSV line: {e}");
            Vec::new()
        }
    }
}

/// Parses an amount cell, tolerating `$` and thousands separators. Negative values become zero.
/// Values beyond the largest amount a user may enter are treated as unparseable.
fn lenient_amount(cell: &str) -> Option<Amount> {
    let amount = Amount::from_str(cell).ok()?;
    if amount.value().abs() > max_amount().value() {
        debug!("Ignoring amount '{cell}', it exceeds {}", max_amount());
        return None;
    }
    Some(amount.clamp_non_negative().to_cents())
}

fn income_row(fields: &[String]) -> Income {
    let default_amount = lenient_amount(&fields[1]).unwrap_or(Amount::ZERO);
    let current_amount = fields
        .get(2)
        .and_then(|cell| lenient_amount(cell))
        .unwrap_or(default_amount);
    let paycheck_number = fields
        .get(3)
        .and_then(|cell| cell.parse::<i64>().ok())
        .and_then(PaycheckNumber::from_number);
    Income::new(
        fields[0].clone(),
        default_amount,
        current_amount,
        paycheck_number,
    )
}

/// Bills owe something, so a row without a positive amount is dropped.
fn bill_row(fields: &[String]) -> Option<Bill> {
    let amount = lenient_amount(&fields[1]).filter(Amount::is_positive)?;
    let paid = fields
        .get(2)
        .map(|cell| PAID_VALUES.contains(&cell.to_lowercase().as_str()))
        .unwrap_or(false);
    Some(Bill::new(fields[0].clone(), amount, paid))
}

fn savings_row(fields: &[String]) -> Savings {
    let amount = lenient_amount(&fields[1]).unwrap_or(Amount::ZERO);
    Savings::new(fields[0].clone(), amount)
}

fn history_row(fields: &[String]) -> Option<SavingsHistoryEntry> {
    let month = Month::from_str(&fields[0]).ok()?;
    let total = lenient_amount(&fields[1]).unwrap_or(Amount::ZERO);
    Some(SavingsHistoryEntry::new(month, total))
}
