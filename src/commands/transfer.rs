//! CSV export and import handlers.

use crate::commands::{open, plural, Out};
use crate::model::Month;
use crate::{utils, Config, ImportOutcome, Result};
use std::path::{Path, PathBuf};

/// Writes the budget as CSV to `output`, or to `exports/budget-export-YYYY-MM.csv` in the budget
/// home when no output is given. An existing file is overwritten.
pub async fn export(config: Config, output: Option<&Path>) -> Result<Out<PathBuf>> {
    let now = Month::current();
    let (budget, _) = open(&config, now).await?;
    let path = match output {
        Some(path) => path.to_path_buf(),
        None => config.exports().join(format!("budget-export-{now}.csv")),
    };
    utils::write(&path, budget.export_csv(now)).await?;
    Ok(Out::new(
        format!("Exported the budget to {}", path.display()),
        path,
    ))
}

/// Replaces the budget with the contents of the CSV `file`. Without a file nothing happens. The
/// budget is backed up to `.backups/` before it is replaced.
///
/// # Errors
/// - An `ImportError` (recoverable with `downcast_ref`) if the file holds no usable records. The
///   budget is unchanged.
/// - Returns an error if the file cannot be read or if the backup or save fails.
pub async fn import(config: Config, file: Option<&Path>) -> Result<Out<ImportOutcome>> {
    let now = Month::current();
    let (mut budget, _) = open(&config, now).await?;
    let text = match file {
        Some(path) => Some(utils::read(path).await?),
        None => None,
    };

    let outcome = budget.import_csv(text.as_deref(), now).await?;
    let message = match &outcome {
        ImportOutcome::Imported(report) => format!(
            "Imported {}, {}, {} and {}",
            plural(report.income, "income", "incomes"),
            plural(report.bills, "bill", "bills"),
            plural(report.savings, "savings account", "savings accounts"),
            plural(report.history, "history entry", "history entries"),
        ),
        ImportOutcome::Failed(e) => {
            let context = match file {
                Some(path) => format!("Nothing was imported from {}", path.display()),
                None => "Nothing was imported".to_string(),
            };
            return Err(anyhow::Error::new(e.clone()).context(context));
        }
        ImportOutcome::Cancelled => "No file was given, nothing was imported".to_string(),
    };
    Ok(Out::new(message, outcome))
}
