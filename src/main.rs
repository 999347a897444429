use std::io;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use fairshare::cli::{run_demo, run_precision_demo, Prompter, Session, SessionOptions};
use fairshare::config::{FairsharePaths, MissingPersonMode, Settings};
use fairshare::services::Ledger;

#[derive(Parser)]
#[command(
    name = "fairshare",
    version,
    about = "Split shared expenses and settle up with as few transfers as possible",
    long_about = "Fairshare keeps track of who paid for what in a group, splits each \
                  expense equally, by weight, by percentage or by exact amounts, and \
                  works out who should pay whom to settle every balance."
)]
struct Cli {
    /// Currency symbol used when displaying amounts
    #[arg(long, global = true, env = "FAIRSHARE_CURRENCY")]
    currency: Option<String>,

    /// How to handle names in an expense that are not in the ledger
    #[arg(long, global = true, value_enum)]
    missing: Option<MissingPersonMode>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the interactive menu (default)
    #[command(alias = "run")]
    Session,

    /// Run a worked example and print balances and transfers
    Demo {
        /// Show how shares keep full precision until settlement
        #[arg(long)]
        precision: bool,
    },

    /// Write the default settings file
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    fairshare::logging::init();
    let cli = Cli::parse();

    let paths = FairsharePaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;
    if let Some(currency) = cli.currency {
        settings.currency_symbol = currency;
    }
    if let Some(missing) = cli.missing {
        settings.missing_person = missing;
    }
    debug!(config = %paths.settings_file().display(), "settings loaded");

    let ledger = Ledger::with_config(settings.limits.clone(), settings.tolerances.clone());

    match cli.command.unwrap_or(Commands::Session) {
        Commands::Session => {
            let prompter = Prompter::new(io::stdin().lock(), io::stdout());
            let options = SessionOptions::from_settings(&settings, &paths);
            Session::new(ledger, prompter, options).run()?;
        }
        Commands::Demo { precision } => {
            let mut out = io::stdout().lock();
            if precision {
                run_precision_demo(&mut out, ledger, &settings.currency_symbol)?;
            } else {
                run_demo(&mut out, ledger, &settings.currency_symbol)?;
            }
        }
        Commands::Init => {
            if paths.is_initialized() {
                println!(
                    "Settings already exist at: {}",
                    paths.settings_file().display()
                );
            } else {
                settings.save(&paths)?;
                println!("Settings written to: {}", paths.settings_file().display());
            }
        }
        Commands::Config => {
            println!("Fairshare Configuration");
            println!("=======================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency symbol:   {}", settings.currency_symbol);
            println!("  Missing people:    {:?}", settings.missing_person);
            println!("  Max people:        {}", settings.limits.max_people);
            println!("  Max participants:  {}", settings.limits.max_participants);
            println!("  Max amount:        {}", settings.limits.max_amount);
            println!("  Settle tolerance:  {}", settings.tolerances.settlement);
            println!("  Percent tolerance: {}", settings.tolerances.percentage);
        }
    }

    Ok(())
}
