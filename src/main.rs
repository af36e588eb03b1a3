use clap::Parser;
use monthly_budget::args::{Args, BillSubcommand, Command, IncomeSubcommand, SavingsSubcommand};
use monthly_budget::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().budget_home().path();

    // Route to appropriate command handler
    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.backend()).await?.print(),

        Command::Summary => commands::summary(Config::load(home).await?)
            .await?
            .print(),

        Command::Show => commands::show(Config::load(home).await?).await?.print(),

        Command::Rollover => commands::rollover(Config::load(home).await?)
            .await?
            .print(),

        Command::Income(sub) => {
            let config = Config::load(home).await?;
            match sub {
                IncomeSubcommand::Add(a) => commands::income_add(config, a.clone()).await?.print(),
                IncomeSubcommand::Update(a) => {
                    commands::income_update(config, a.clone()).await?.print()
                }
                IncomeSubcommand::Delete(a) => {
                    commands::income_delete(config, a.clone()).await?.print()
                }
                IncomeSubcommand::Reset => commands::income_reset(config).await?.print(),
            }
        }

        Command::Bill(sub) => {
            let config = Config::load(home).await?;
            match sub {
                BillSubcommand::Add(a) => commands::bill_add(config, a.clone()).await?.print(),
                BillSubcommand::Update(a) => commands::bill_update(config, a.clone()).await?.print(),
                BillSubcommand::Delete(a) => commands::bill_delete(config, a.clone()).await?.print(),
                BillSubcommand::Toggle(a) => commands::bill_toggle(config, a.clone()).await?.print(),
            }
        }

        Command::Savings(sub) => {
            let config = Config::load(home).await?;
            match sub {
                SavingsSubcommand::Add(a) => commands::savings_add(config, a.clone()).await?.print(),
                SavingsSubcommand::Update(a) => {
                    commands::savings_update(config, a.clone()).await?.print()
                }
                SavingsSubcommand::Delete(a) => {
                    commands::savings_delete(config, a.clone()).await?.print()
                }
            }
        }

        Command::Export(export_args) => {
            commands::export(Config::load(home).await?, export_args.output())
                .await?
                .print()
        }

        Command::Import(import_args) => {
            commands::import(Config::load(home).await?, import_args.file())
                .await?
                .print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                "monthly_budget",
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
