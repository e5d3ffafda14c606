use anyhow::{Context, Result, bail};
use catat_core::{Entry, EntryKind, EntryStore, KnownCategory, Locale};
use catat_finance::{
    CancelToken, CategorySuggester, FormGate, Notice, ParseOptions, SubmitError, SuggestionMode,
    parse_deterministic, submit,
};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod auth;
mod config;
mod export;
mod llm;
mod report;
mod state;
mod store;
mod suggest;

use config::Config;
use store::JsonFileStore;

#[derive(Parser, Debug)]
#[command(
    name = "catat",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CATAT_BUILD_SHA"), ")"),
    about = "Log expenses and income from free text like \"Makan siang 50rb\""
)]
struct Cli {
    /// Log pipeline steps (same as RUST_LOG=debug)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record an expense, e.g. `catat add Makan siang 50rb`
    Add {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        /// Skip the AI category suggestion
        #[arg(long)]
        no_ai: bool,
    },

    /// Record income, e.g. `catat income Gaji 5jt`
    Income {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        #[arg(long)]
        no_ai: bool,
    },

    /// Show what would be recorded, without AI or saving
    Parse {
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,

        #[arg(long)]
        income: bool,
    },

    /// List recorded entries, newest first
    List {
        #[arg(long)]
        income: bool,

        #[arg(long, default_value_t = 20)]
        limit: usize,
    },

    /// Monthly totals and expense per category
    Report {
        /// Month as YYYY-MM (default: current month)
        #[arg(long)]
        month: Option<String>,
    },

    /// Export entries to CSV
    Export {
        #[arg(long)]
        out: PathBuf,

        #[arg(long)]
        income: bool,
    },

    /// Manage ~/.catat/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Store API keys for the category suggestion service
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write the default config if none exists
    Init,
    /// Print the effective config
    Show,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    PasteOpenaiApiKey,
    PasteAnthropicToken,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Add { text, no_ai } => {
            record(&text.join(" "), EntryKind::Expense, no_ai).await?;
        }
        Command::Income { text, no_ai } => {
            record(&text.join(" "), EntryKind::Income, no_ai).await?;
        }
        Command::Parse { text, income } => {
            let cfg = config::load_config()?;
            let opts = parse_options(&cfg, kind_of(income), Vec::new())?;
            let raw = text.join(" ");
            match parse_deterministic(&raw, &opts) {
                Ok(p) => {
                    println!("description: {}", p.description);
                    println!("amount:      {}", report::format_rupiah(p.amount as i128));
                    println!("category:    {}", p.category.label(&opts.locale));
                }
                Err(e) => bail!("{e}"),
            }
        }
        Command::List { income, limit } => {
            let cfg = config::load_config()?;
            let store = open_store(&cfg, kind_of(income))?;
            let entries = store.list_all()?;
            if entries.is_empty() {
                println!("No entries yet.");
            }
            for e in entries.iter().take(limit) {
                println!(
                    "{} | {:>14} | {:<18} | {}",
                    e.date,
                    report::format_rupiah(e.amount as i128),
                    e.category,
                    e.description
                );
            }
        }
        Command::Report { month } => {
            let cfg = config::load_config()?;
            let (year, month) = match month {
                Some(m) => report::parse_month(&m)
                    .with_context(|| format!("invalid month {m:?}, expected YYYY-MM"))?,
                None => {
                    let today = cfg.today()?;
                    (today.year(), today.month())
                }
            };
            let mut entries = open_store(&cfg, EntryKind::Expense)?.list_all()?;
            entries.extend(open_store(&cfg, EntryKind::Income)?.list_all()?);
            let r = report::MonthlyReport::build(&entries, year, month);
            print!("{}", r.render(&Locale::for_language(cfg.language()?)));
        }
        Command::Export { out, income } => {
            let cfg = config::load_config()?;
            let entries = open_store(&cfg, kind_of(income))?.list_all()?;
            export::export_csv(&entries, &out)?;
            println!("Exported {} entries to {}", entries.len(), out.display());
        }
        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
        Command::Auth { command } => match command {
            AuthCommand::PasteOpenaiApiKey => auth::openai_paste_api_key()?,
            AuthCommand::PasteAnthropicToken => auth::anthropic_paste_token()?,
        },
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn kind_of(income: bool) -> EntryKind {
    if income { EntryKind::Income } else { EntryKind::Expense }
}

fn open_store(cfg: &Config, kind: EntryKind) -> Result<JsonFileStore> {
    let dir = state::user_dir(&cfg.user.id)?;
    Ok(JsonFileStore::for_kind(&dir, kind))
}

fn parse_options(cfg: &Config, kind: EntryKind, existing: Vec<String>) -> Result<ParseOptions> {
    Ok(ParseOptions::new(cfg.language()?)
        .with_kind(kind)
        .with_existing_categories(existing)
        .with_mode(cfg.suggestion.mode)
        .with_rules(Arc::new(cfg.rule_set()?)))
}

/// Categories the suggestion service should prefer: the known labels for
/// this kind of entry plus whatever this user has already used.
fn existing_categories(locale: &Locale, kind: EntryKind, used: &[Entry]) -> Vec<String> {
    let known: Vec<KnownCategory> = match kind {
        EntryKind::Income => vec![KnownCategory::Income],
        EntryKind::Expense => KnownCategory::ALL
            .into_iter()
            .filter(|k| *k != KnownCategory::Other && *k != KnownCategory::Income)
            .collect(),
    };
    let mut seen: BTreeSet<String> = known
        .into_iter()
        .map(|k| locale.category_label(k).to_string())
        .collect();
    for e in used {
        seen.insert(e.category.clone());
    }
    seen.into_iter().collect()
}

fn suggester(cfg: &Config, no_ai: bool) -> Result<Option<Box<dyn CategorySuggester>>> {
    if no_ai || cfg.suggestion.mode == SuggestionMode::Off {
        return Ok(None);
    }
    let auth = auth::load_auth()?;
    match llm::from_config(&cfg.llm, &auth)? {
        Some(c) => Ok(Some(Box::new(suggest::LlmSuggester::new(c)))),
        None => {
            let provider = llm::Provider::from_name(&cfg.llm.provider)?;
            tracing::debug!(?provider, "no API key configured");
            Ok(Some(Box::new(suggest::MissingKeySuggester::new(provider))))
        }
    }
}

async fn record(raw: &str, kind: EntryKind, no_ai: bool) -> Result<()> {
    let cfg = config::load_config()?;
    let locale = Locale::for_language(cfg.language()?);
    let mut store = open_store(&cfg, kind)?;
    let existing = existing_categories(&locale, kind, &store.list_all()?);
    let opts = parse_options(&cfg, kind, existing)?;
    let suggester = suggester(&cfg, no_ai)?;
    let today = cfg.today()?;

    let cancel = CancelToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let gate = FormGate::new();
    let result = submit(
        raw,
        &opts,
        suggester.as_deref(),
        &cancel,
        &gate,
        &mut store,
        today,
    )
    .await;

    match result {
        Ok(done) => {
            for notice in &done.notices {
                match notice {
                    Notice::SuggestionFailed { reason } => eprintln!(
                        "warning: AI category suggestion failed ({reason}); saved under \"{}\"",
                        done.entry.category
                    ),
                }
            }
            println!(
                "Saved: {} | {} | {}",
                done.entry.description,
                report::format_rupiah(done.entry.amount as i128),
                done.entry.category
            );
            Ok(())
        }
        Err(SubmitError::Cancelled) => {
            eprintln!("Cancelled; nothing was saved.");
            Ok(())
        }
        Err(e @ SubmitError::PersistenceFailed(_)) => {
            Err(anyhow::Error::new(e)).with_context(|| format!("input kept for retry: {raw:?}"))
        }
        Err(e) => bail!("{e}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catat_core::Language;
    use chrono::NaiveDate;

    fn used(kind: EntryKind, category: &str) -> Entry {
        let date = NaiveDate::from_ymd_opt(2026, 10, 1).unwrap();
        Entry::new("e1", date, kind, "x", 1_000, category)
    }

    #[test]
    fn test_income_form_prefers_income_labels() {
        let locale = Locale::for_language(Language::Indonesian);
        let got = existing_categories(
            &locale,
            EntryKind::Income,
            &[used(EntryKind::Income, "Penjualan")],
        );
        assert_eq!(got, vec!["Pemasukan".to_string(), "Penjualan".to_string()]);
    }

    #[test]
    fn test_expense_form_prefers_spending_labels() {
        let locale = Locale::for_language(Language::Indonesian);
        let got = existing_categories(
            &locale,
            EntryKind::Expense,
            &[used(EntryKind::Expense, "Langganan")],
        );
        assert!(got.contains(&"Belanja".to_string()));
        assert!(got.contains(&"Langganan".to_string()));
        assert!(!got.contains(&"Pemasukan".to_string()));
        assert!(!got.contains(&"Lainnya".to_string()));
    }
}
