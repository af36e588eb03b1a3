//! These structs provide the CLI interface for the budget CLI.

use crate::store::Backend;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// budget: A local tracker for paychecks, bills and savings.
///
/// Enter your two paychecks and any other income, list the bills you owe this month and the
/// savings accounts you keep. The summary shows how much cash remains once the unpaid bills are
/// covered. At the start of each month the paychecks go back to their defaults, every bill
/// becomes unpaid again and last month's savings total is added to the history.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the budget home directory, its configuration and an empty budget.
    ///
    /// This is the first command you should run. By default the home directory is $HOME/budget,
    /// pass --budget-home or set BUDGET_HOME to put it somewhere else.
    Init(InitArgs),
    /// Print the totals and the amount of cash remaining.
    Summary,
    /// Print every income, bill and savings record.
    Show,
    /// Roll the budget over to the current month if a new month has started.
    ///
    /// Every other command does this first, so you only need it to see what happened.
    Rollover,
    /// Add, change or remove income.
    #[command(subcommand)]
    Income(IncomeSubcommand),
    /// Add, change, remove or pay bills.
    #[command(subcommand)]
    Bill(BillSubcommand),
    /// Add, change or remove savings accounts.
    #[command(subcommand)]
    Savings(SavingsSubcommand),
    /// Write the budget to a CSV file that a spreadsheet can open.
    Export(ExportArgs),
    /// Replace the whole budget with the contents of a CSV file.
    Import(ImportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the budget and its configuration are held. Defaults to ~/budget
    #[arg(long, env = "BUDGET_HOME", default_value_t = default_budget_home())]
    budget_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, budget_home: PathBuf) -> Self {
        Self {
            log_level,
            budget_home: budget_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn budget_home(&self) -> &DisplayPath {
        &self.budget_home
    }
}

/// (Not shown): Args for the `budget init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// Where to keep the budget: a JSON file or a SQLite database.
    #[arg(long, value_enum, default_value_t = Backend::Json)]
    backend: Backend,
}

impl InitArgs {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> Backend {
        self.backend
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum IncomeSubcommand {
    /// Add an income other than the two paychecks.
    Add(IncomeAddArgs),
    /// Change an income, including the paychecks.
    Update(IncomeUpdateArgs),
    /// Remove an income. The two paychecks cannot be removed.
    Delete(NameArgs),
    /// Set every income's current amount back to its default amount.
    Reset,
}

/// (Not shown): Args for `budget income add`.
#[derive(Debug, Parser, Clone)]
pub struct IncomeAddArgs {
    /// A unique name of up to 32 letters, numbers, spaces or dashes.
    pub name: String,

    /// The amount usually received, e.g. 250.00
    #[arg(long = "default")]
    pub default_amount: String,

    /// The amount received this month. Defaults to the default amount.
    #[arg(long = "current")]
    pub current_amount: Option<String>,
}

/// (Not shown): Args for `budget income update`.
#[derive(Debug, Parser, Clone)]
pub struct IncomeUpdateArgs {
    /// The name of the income to change, ignoring case.
    pub name: String,

    /// A new name.
    #[arg(long)]
    pub rename: Option<String>,

    #[arg(long = "default")]
    pub default_amount: Option<String>,

    #[arg(long = "current")]
    pub current_amount: Option<String>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum BillSubcommand {
    Add(AmountArgs),
    Update(AmountUpdateArgs),
    Delete(NameArgs),
    /// Mark a bill paid, or unpaid if it was paid.
    Toggle(NameArgs),
}

#[derive(Subcommand, Debug, Clone)]
pub enum SavingsSubcommand {
    Add(AmountArgs),
    Update(AmountUpdateArgs),
    Delete(NameArgs),
}

/// (Not shown): Args that name an existing record.
#[derive(Debug, Parser, Clone)]
pub struct NameArgs {
    /// The name of the record, ignoring case.
    pub name: String,
}

/// (Not shown): Args for adding a bill or a savings account.
#[derive(Debug, Parser, Clone)]
pub struct AmountArgs {
    /// A unique name of up to 32 letters, numbers, spaces or dashes.
    pub name: String,

    /// The amount, with at most two decimal places, e.g. 1200 or 89.99
    pub amount: String,
}

/// (Not shown): Args for changing a bill or a savings account.
#[derive(Debug, Parser, Clone)]
pub struct AmountUpdateArgs {
    /// The name of the record to change, ignoring case.
    pub name: String,

    /// A new name.
    #[arg(long)]
    pub rename: Option<String>,

    /// A new amount.
    #[arg(long)]
    pub amount: Option<String>,
}

/// (Not shown): Args for the `budget export` command.
#[derive(Debug, Parser, Clone)]
pub struct ExportArgs {
    /// Where to write the CSV. Defaults to $BUDGET_HOME/exports/budget-export-YYYY-MM.csv
    #[arg(long)]
    output: Option<PathBuf>,
}

impl ExportArgs {
    pub fn new(output: Option<PathBuf>) -> Self {
        Self { output }
    }

    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
}

/// (Not shown): Args for the `budget import` command.
#[derive(Debug, Parser, Clone)]
pub struct ImportArgs {
    /// The CSV file to import. Without it nothing is imported.
    #[arg(long)]
    file: Option<PathBuf>,
}

impl ImportArgs {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

fn default_budget_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("budget"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --budget-home or BUDGET_HOME instead of relying on the default \
                budget home directory. If you continue using the program right now, you may have \
                problems!",
            );
            PathBuf::from("budget")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bill_add() {
        let args = Args::try_parse_from([
            "budget",
            "--budget-home",
            "/tmp/b",
            "bill",
            "add",
            "Rent",
            "1200",
        ])
        .unwrap();
        assert_eq!(args.common().budget_home().path(), Path::new("/tmp/b"));
        match args.command() {
            Command::Bill(BillSubcommand::Add(a)) => {
                assert_eq!(a.name, "Rent");
                assert_eq!(a.amount, "1200");
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_income_update() {
        let args = Args::try_parse_from([
            "budget",
            "income",
            "update",
            "paycheck 1",
            "--rename",
            "Main job",
            "--default",
            "2500",
        ])
        .unwrap();
        match args.command() {
            Command::Income(IncomeSubcommand::Update(a)) => {
                assert_eq!(a.name, "paycheck 1");
                assert_eq!(a.rename.as_deref(), Some("Main job"));
                assert_eq!(a.default_amount.as_deref(), Some("2500"));
                assert!(a.current_amount.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_init_backend() {
        let args = Args::try_parse_from(["budget", "init", "--backend", "sqlite"]).unwrap();
        match args.command() {
            Command::Init(a) => assert_eq!(a.backend(), Backend::Sqlite),
            other => panic!("unexpected command {other:?}"),
        }
        assert_eq!(args.common().log_level(), LevelFilter::INFO);
    }
}
