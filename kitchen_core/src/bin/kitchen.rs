use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use kitchen_core::{FileStore, GeminiResolver, KitchenConfig, Session};
use kitchen_rules::{CookingMethod, ItemId, ResultDescriptor, MAX_MIX_ITEMS};
use tracing_subscriber::EnvFilter;

const LEDGER_EXPORT_FILE: &str = "alchemist_ledger_backup.json";

type KitchenSession = Session<Option<GeminiResolver>, FileStore>;

#[derive(Debug, Parser)]
#[command(name = "kitchen")]
#[command(about = "The Gourmet Lab: combine ingredients, discover dishes")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the save directory.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Never call the generative fallback.
    #[arg(long, global = true, default_value_t = false)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Put ingredients in the bowl and cook them.
    Cook(CookArgs),
    /// List discovered ingredients.
    Catalog {
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show the discovery book, newest first.
    History {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// List cooking techniques.
    Methods,
    /// Manage the recipe ledger.
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },
}

#[derive(Debug, Args)]
struct CookArgs {
    /// One or two ingredient names or ids.
    #[arg(required = true, num_args = 1..=MAX_MIX_ITEMS)]
    ingredients: Vec<String>,

    #[arg(short, long, default_value = "MIX")]
    method: CookingMethod,
}

#[derive(Debug, Subcommand)]
enum RulesCommand {
    List,
    Add(AddRuleArgs),
    Delete { index: usize },
    Import { path: PathBuf },
    Export {
        #[arg(long, default_value = LEDGER_EXPORT_FILE)]
        out: PathBuf,
    },
    /// User recipes that a built-in recipe always wins over.
    Shadowed,
}

#[derive(Debug, Args)]
struct AddRuleArgs {
    /// One or two ingredient names or ids.
    #[arg(required = true, num_args = 1..=MAX_MIX_ITEMS)]
    ingredients: Vec<String>,

    #[arg(short, long, default_value = "MIX")]
    method: CookingMethod,

    #[arg(long)]
    name: String,

    #[arg(long, default_value = "🍽️")]
    emoji: String,

    #[arg(long, default_value = "")]
    description: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = KitchenConfig::load_or_default(cli.config.as_deref())
        .context("failed to load config")?;

    let dir = cli.data_dir.clone().unwrap_or_else(|| config.storage.dir.clone());
    let fallback = if cli.offline {
        None
    } else {
        GeminiResolver::from_config(&config.fallback)
    };
    let mut session = Session::open(fallback, FileStore::new(dir), config);

    match cli.command {
        Command::Cook(args) => run_cook(&mut session, args).await,
        Command::Catalog { filter } => run_catalog(&session, filter.as_deref()),
        Command::History { limit } => run_history(&session, limit),
        Command::Methods => run_methods(),
        Command::Rules { command } => run_rules(&mut session, command),
    }
}

async fn run_cook(session: &mut KitchenSession, args: CookArgs) -> Result<()> {
    session.select_method(args.method)?;

    let mut outcome = None;
    for raw in &args.ingredients {
        let id = resolve_item(session, raw)?;
        outcome = session.stage(&id).await?;
    }
    if outcome.is_none() && !session.engine().selection().is_empty() {
        outcome = session.resolve().await?;
    }

    let Some(record) = outcome else {
        return Err(anyhow!("nothing to cook"));
    };
    let item = &record.result;
    let tag = if record.is_new_discovery {
        "NEW DISCOVERY"
    } else {
        "ALREADY KNOWN"
    };
    println!("{tag}: {} {}", item.emoji, item.name);
    println!("  {}", item.description);
    if record.is_custom {
        println!("  (from your ledger)");
    }
    if let Some(url) = &item.source_url {
        println!("  source: {} <{url}>", item.source_title.as_deref().unwrap_or(url));
    }
    Ok(())
}

fn run_catalog(session: &KitchenSession, filter: Option<&str>) -> Result<()> {
    let catalog = session.engine().catalog();
    let items = match filter {
        Some(term) => catalog.filter(term),
        None => catalog.iter().collect(),
    };
    for item in items {
        println!("{:<24} {} {}", item.id.as_str(), item.emoji, item.name);
    }
    let stats = session.stats();
    println!(
        "{} discovered, {} discoveries, {} ledger recipes",
        stats.discovered, stats.discoveries, stats.ledger
    );
    Ok(())
}

fn run_history(session: &KitchenSession, limit: Option<usize>) -> Result<()> {
    let records = match limit {
        Some(limit) => session.engine().history().recent(limit),
        None => session.recent_history(),
    };
    if records.is_empty() {
        println!("No discoveries yet.");
    }
    for record in records {
        let when = record
            .result
            .discovered_at
            .map(|at| at.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_default();
        println!(
            "{when:<16} {} {} = {} {}",
            record.ingredients.join(" + "),
            record.method,
            record.result.emoji,
            record.result.name
        );
    }
    Ok(())
}

fn run_methods() -> Result<()> {
    for method in CookingMethod::ALL {
        println!(
            "{:<8} {:<10} needs {}",
            method.tag(),
            method.display_name(),
            method.min_inputs()
        );
    }
    Ok(())
}

fn run_rules(session: &mut KitchenSession, command: RulesCommand) -> Result<()> {
    match command {
        RulesCommand::List => {
            let ledger = session.engine().rules().user();
            if ledger.is_empty() {
                println!("Your ledger is empty.");
            }
            for (index, rule) in ledger.rules().iter().enumerate() {
                let ids: Vec<_> = rule.ingredients.iter().map(ItemId::as_str).collect();
                println!(
                    "[{index}] {} {} = {} {}",
                    ids.join(" + "),
                    rule.method,
                    rule.result.emoji,
                    rule.result.name
                );
            }
        }
        RulesCommand::Add(args) => {
            let ingredients = args
                .ingredients
                .iter()
                .map(|raw| resolve_item(session, raw))
                .collect::<Result<Vec<_>>>()?;
            let result = ResultDescriptor::new(args.name, args.emoji, args.description);
            let index = session.add_rule(ingredients, args.method, result)?;
            println!("Recipe saved as [{index}].");
        }
        RulesCommand::Delete { index } => {
            let removed = session.delete_rule(index)?;
            println!("Removed {}.", removed.result.name);
        }
        RulesCommand::Import { path } => {
            let json = fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let count = session.import_rules(&json)?;
            println!("Imported {count} recipes.");
        }
        RulesCommand::Export { out } => {
            fs::write(&out, session.export_rules()?)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Ledger written to {}.", out.display());
        }
        RulesCommand::Shadowed => {
            let shadowed = session.engine().rules().shadowed_user_rules();
            if shadowed.is_empty() {
                println!("No ledger recipe is hidden by a built-in one.");
            }
            for index in shadowed {
                println!("[{index}] never applies: a built-in recipe matches first");
            }
        }
    }
    Ok(())
}

/// Accept either an item id or its display name.
fn resolve_item(session: &KitchenSession, raw: &str) -> Result<ItemId> {
    let catalog = session.engine().catalog();
    let id = ItemId::from(raw);
    if catalog.contains(&id) {
        return Ok(id);
    }
    catalog
        .find_by_name(raw)
        .map(|item| item.id.clone())
        .ok_or_else(|| anyhow!("unknown ingredient: {raw}"))
}
