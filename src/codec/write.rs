use super::{escape, quote, Section};
use crate::model::{AppData, Month};
use crate::summary::Summary;

const INCOME_HEADERS: [&str; 4] = ["Name", "Default Amount", "Current Amount", "Paycheck Number"];
const BILL_HEADERS: [&str; 3] = ["Name", "Amount", "Paid"];
const SAVINGS_HEADERS: [&str; 2] = ["Name", "Amount"];
const HISTORY_HEADERS: [&str; 2] = ["Month", "Total"];
const SUMMARY_HEADERS: [&str; 2] = ["Metric", "Value"];

/// Writes `data` as CSV text. `now` only labels the export.
pub fn to_csv(data: &AppData, now: Month) -> String {
    let mut lines = vec![format!("Monthly Budget Export - {}", now.label()), String::new()];

    push_block(
        &mut lines,
        Section::Income,
        &INCOME_HEADERS,
        data.income().iter().map(|i| {
            vec![
                i.name().to_string(),
                i.default_amount().to_string(),
                i.current_amount().to_string(),
                i.paycheck_number()
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
            ]
        }),
        escape,
    );

    push_block(
        &mut lines,
        Section::Bills,
        &BILL_HEADERS,
        data.bills().iter().map(|b| {
            vec![
                b.name().to_string(),
                b.amount().to_string(),
                if b.paid() { "Yes" } else { "No" }.to_string(),
            ]
        }),
        escape,
    );

    push_block(
        &mut lines,
        Section::Savings,
        &SAVINGS_HEADERS,
        data.savings()
            .iter()
            .map(|s| vec![s.name().to_string(), s.amount().to_string()]),
        escape,
    );

    let history = data.app_state().savings_history();
    if !history.is_empty() {
        push_block(
            &mut lines,
            Section::SavingsHistory,
            &HISTORY_HEADERS,
            history
                .iter()
                .map(|e| vec![e.month().to_string(), e.total().to_string()]),
            escape,
        );
    }

    let summary = Summary::new(data);
    let metrics = [
        ("Total Income", summary.income_total.to_money_string()),
        ("Bills Due", summary.bills_total_due.to_money_string()),
        ("Bills Paid", summary.bills_total_paid.to_money_string()),
        ("Bills Remaining", summary.bills_total_remaining.to_money_string()),
        ("Bills Progress", format!("{}%", summary.bills_progress)),
        ("Savings Total", summary.savings_total.to_money_string()),
        ("Remaining Cash", summary.remaining_cash.to_money_string()),
    ];
    // Computed values, not user text, so they are only quoted.
    push_block(
        &mut lines,
        Section::Summary,
        &SUMMARY_HEADERS,
        metrics
            .into_iter()
            .map(|(metric, value)| vec![metric.to_string(), value]),
        quote,
    );

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn push_block<R>(
    lines: &mut Vec<String>,
    section: Section,
    headers: &[&str],
    rows: R,
    encode: fn(&str) -> String,
) where
    R: IntoIterator<Item = Vec<String>>,
{
    lines.push(format!("=== {} ===", section.label()));
    lines.push(headers.join(","));
    for row in rows {
        lines.push(
            row.iter()
                .map(|cell| encode(cell))
                .collect::<Vec<String>>()
                .join(","),
        );
    }
    lines.push(String::new());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, Bill, Savings, SavingsHistoryEntry};
    use std::str::FromStr;

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    fn sample() -> AppData {
        let mut data = AppData::initial(Month::new(2024, 11).unwrap());
        data.income[0].default_amount = amount("2500");
        data.income[0].current_amount = amount("1800");
        data.bills = vec![
            Bill::new("Rent", amount("1200"), true),
            Bill::new("=CMD()", amount("15.5"), false),
        ];
        data.savings = vec![Savings::new("Emergency, main", amount("5000"))];
        data
    }

    #[test]
    fn test_layout() {
        let text = to_csv(&sample(), Month::new(2024, 11).unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Monthly Budget Export - November 2024");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "=== INCOME ===");
        assert_eq!(lines[3], "Name,Default Amount,Current Amount,Paycheck Number");
        assert_eq!(lines[4], "Paycheck 1,2500.00,1800.00,1");
        assert_eq!(lines[5], "Paycheck 2,0.00,0.00,2");
        assert_eq!(lines[6], "");
        assert_eq!(lines[7], "=== BILLS ===");
        assert_eq!(lines[8], "Name,Amount,Paid");
        assert_eq!(lines[9], "Rent,1200.00,Yes");
        assert_eq!(lines[10], "\"'=CMD()\",15.50,No");
        assert_eq!(lines[12], "=== SAVINGS ===");
        assert_eq!(lines[14], "\"Emergency, main\",5000.00");
    }

    #[test]
    fn test_history_block_only_when_present() {
        let mut data = sample();
        let text = to_csv(&data, Month::new(2024, 11).unwrap());
        assert!(!text.contains("SAVINGS HISTORY"));

        data.app_state.push_history(SavingsHistoryEntry::new(
            Month::new(2024, 10).unwrap(),
            amount("4800"),
        ));
        let text = to_csv(&data, Month::new(2024, 11).unwrap());
        assert!(text.contains("=== SAVINGS HISTORY ===\nMonth,Total\n2024-10,4800.00\n"));
    }

    #[test]
    fn test_summary_block() {
        let text = to_csv(&sample(), Month::new(2024, 11).unwrap());
        assert!(text.contains("=== SUMMARY ==="));
        assert!(text.contains("Bills Remaining,$15.50"));
        assert!(text.contains("Remaining Cash,\"$1,784.50\""));
        assert!(text.contains("Bills Progress,99%"));
    }

    #[test]
    fn test_summary_negative_cash_is_readable() {
        let mut data = AppData::initial(Month::new(2024, 11).unwrap());
        data.bills = vec![Bill::new("Rent", amount("1200"), false)];
        let text = to_csv(&data, Month::new(2024, 11).unwrap());
        assert!(text.contains("Remaining Cash,\"-$1,200.00\"\n"));
        assert!(!text.contains("'-"));
    }

    #[test]
    fn test_no_bare_formula_cell() {
        let text = to_csv(&sample(), Month::new(2024, 11).unwrap());
        for line in text.lines().filter(|l| !l.starts_with("===")) {
            for cell in line.split(',') {
                assert!(!cell.starts_with('='), "bare formula cell in line: {line}");
            }
        }
    }
}
