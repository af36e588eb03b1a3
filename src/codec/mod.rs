//! CSV import and export of the whole `AppData`.
//!
//! The file is a sequence of labelled blocks rather than a single table:
//!
//! ```text
//! Monthly Budget Export - November 2024
//!
//! === INCOME ===
//! Name,Default Amount,Current Amount,Paycheck Number
//! Paycheck 1,2500.00,1800.00,1
//!
//! === BILLS ===
//! Name,Amount,Paid
//! Rent,1200.00,Yes
//! ```
//!
//! Writing escapes cells that a spreadsheet would otherwise run as a formula. Reading is
//! forgiving: unknown lines and malformed rows are skipped, and only a file with no records at
//! all is refused.

mod read;
mod write;

pub use read::parse;
pub use write::to_csv;

/// Characters that make a spreadsheet treat a cell as a formula.
const FORMULA_PREFIXES: [char; 4] = ['=', '+', '-', '@'];

/// Written in front of a formula-looking cell, inside its quotes.
const FORMULA_MARKER: char = '\'';

/// Runs of these mark a section label line.
const DELIMITERS: [&str; 2] = ["===", "---"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Income,
    Bills,
    Savings,
    SavingsHistory,
    Summary,
}

/// Checked in order so that "savings history" wins over "savings".
const SECTION_KEYWORDS: [(&str, Section); 5] = [
    ("savings history", Section::SavingsHistory),
    ("income", Section::Income),
    ("bills", Section::Bills),
    ("savings", Section::Savings),
    ("summary", Section::Summary),
];

impl Section {
    fn label(&self) -> &'static str {
        match self {
            Section::Income => "INCOME",
            Section::Bills => "BILLS",
            Section::Savings => "SAVINGS",
            Section::SavingsHistory => "SAVINGS HISTORY",
            Section::Summary => "SUMMARY",
        }
    }

    /// Returns the section that `line` opens, or `None` if `line` is not a section label.
    ///
    /// A label holds a delimiter run and a section keyword in a single cell. Trailing empty
    /// cells, as a spreadsheet adds when it saves the file, are allowed. A record row always has
    /// a second non-empty cell, so a name such as `Savings---Fund` never opens a section.
    fn detect(line: &str) -> Option<Section> {
        let label = line.trim_end_matches([',', ' ', '\t']);
        if label.contains(',') || !DELIMITERS.iter().any(|d| label.contains(d)) {
            return None;
        }
        let lower = label.to_lowercase();
        SECTION_KEYWORDS
            .iter()
            .find(|(keyword, _)| lower.contains(keyword))
            .map(|(_, section)| *section)
    }
}

/// Escapes one cell for writing.
fn escape(value: &str) -> String {
    if value.starts_with(FORMULA_PREFIXES) {
        let doubled = value.replace('"', "\"\"");
        format!("\"{FORMULA_MARKER}{doubled}\"")
    } else {
        quote(value)
    }
}

/// Quotes a cell only when it holds a comma, a quote or a line break. Used as is for values the
/// export computes itself, which never come from user input.
fn quote(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Removes the formula marker from a cell that has already been unquoted.
fn unescape(cell: &str) -> String {
    match cell.strip_prefix(FORMULA_MARKER) {
        Some(rest) if rest.starts_with(FORMULA_PREFIXES) => rest.to_string(),
        _ => cell.to_string(),
    }
}
