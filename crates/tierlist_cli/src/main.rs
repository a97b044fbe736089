//! Command-line driver for `tierlist_core`.
//!
//! # Responsibility
//! - Map subcommands onto store commands against the configured durable store.
//! - Keep output plain and line-oriented for scripting.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tierlist_core::{
    core_version, export_document, init_logging, ImportCommit, ImportPipeline, KvDocumentStore,
    NewThing, SqliteKvRepository, ThingId, Tier, TierListConfig, TierStore, EXPORT_FILE_NAME,
};

const DEFAULT_DB_FILE_NAME: &str = "tierlist.sqlite3";

type Store = TierStore<KvDocumentStore<SqliteKvRepository>>;

/// Tier list maintenance from the shell.
#[derive(Debug, Parser)]
#[command(name = "tierlist_cli", version, about)]
struct Cli {
    /// JSON config file; without it `tierlist.sqlite3` in the working directory is used.
    #[arg(long, env = "TIERLIST_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print every tier and its members, queue last.
    Show,

    /// Add a text thing; prints the new id.
    Add {
        title: String,

        /// Row of the target tier; omitted means the queue.
        #[arg(allow_negative_numbers = true)]
        row: Option<i64>,
    },

    /// Move a thing into the tier at `row`.
    Place {
        thing_id: String,

        #[arg(allow_negative_numbers = true)]
        row: i64,
    },

    /// Remove a thing.
    Remove { thing_id: String },

    /// Remove every thing; tiers are kept.
    Clear,

    /// Write the document as JSON.
    Export {
        /// Output file (default: tier-list.json).
        path: Option<PathBuf>,
    },

    /// Replace the document with a JSON export.
    Import { path: PathBuf },

    /// Print the core library version.
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli)
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Version = cli.command {
        println!("tierlist_core version={}", core_version());
        return Ok(());
    }

    let config = load_config(cli.config.as_deref())?;
    if let Some(log_dir) = &config.log_dir {
        init_logging(&config.log_level, log_dir).context("failed to initialize logging")?;
    }
    let mut store = TierStore::open(
        config
            .open_document_store()
            .context("failed to open the document store")?,
    );

    match cli.command {
        Commands::Show => show(&store),
        Commands::Add { title, row } => add(&mut store, &title, row),
        Commands::Place { thing_id, row } => {
            let tier = tier_at(&store, row)?;
            if !store.place(&ThingId::from(thing_id.as_str()), &tier) {
                bail!("no thing with id `{thing_id}`");
            }
            Ok(())
        }
        Commands::Remove { thing_id } => {
            if !store.remove(&ThingId::from(thing_id.as_str())) {
                bail!("no thing with id `{thing_id}`");
            }
            Ok(())
        }
        Commands::Clear => {
            store.delete_all_things();
            Ok(())
        }
        Commands::Export { path } => export(
            &store,
            &path.unwrap_or_else(|| PathBuf::from(EXPORT_FILE_NAME)),
        ),
        Commands::Import { path } => import(store, &config, &path),
        Commands::Version => Ok(()),
    }
}

fn load_config(path: Option<&Path>) -> Result<TierListConfig> {
    match path {
        Some(path) => TierListConfig::from_json_file(path)
            .with_context(|| format!("failed to load config `{}`", path.display())),
        None => Ok(TierListConfig {
            db_path: Some(PathBuf::from(DEFAULT_DB_FILE_NAME)),
            ..TierListConfig::default()
        }),
    }
}

fn tier_at(store: &Store, row: i64) -> Result<Tier> {
    store
        .document()
        .tiers
        .iter()
        .find(|tier| tier.row == row)
        .cloned()
        .ok_or_else(|| anyhow!("no tier with row {row}"))
}

fn show(store: &Store) -> Result<()> {
    let document = store.document();
    for tier in document.sorted_tiers() {
        println!("[{}] {}", tier.row, tier.title);
        for thing in document.things_in_tier(tier.row) {
            println!("    {}  {}", thing.id, thing.title);
        }
    }
    Ok(())
}

fn add(store: &mut Store, title: &str, row: Option<i64>) -> Result<()> {
    let title = title.trim();
    if title.is_empty() {
        bail!("title cannot be empty");
    }
    let tier = row.map(|row| tier_at(store, row)).transpose()?;
    let id = store.add(NewThing::text(title), tier.as_ref());
    println!("{id}");
    Ok(())
}

fn export(store: &Store, path: &Path) -> Result<()> {
    let bytes = export_document(store.document()).context("failed to encode the document")?;
    std::fs::write(path, bytes)
        .with_context(|| format!("failed to write `{}`", path.display()))?;
    println!("{}", path.display());
    Ok(())
}

fn import(store: Store, config: &TierListConfig, path: &Path) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to start runtime")?;
    let pipeline = ImportPipeline::new(store.into_shared()).with_min_loading(config.min_loading());

    match runtime
        .block_on(pipeline.import_file(path))
        .with_context(|| format!("failed to import `{}`", path.display()))?
    {
        ImportCommit::Committed {
            tiers,
            things,
            cleared_placements,
        } => {
            println!("imported tiers={tiers} things={things} unranked_fallbacks={cleared_placements}");
            Ok(())
        }
        ImportCommit::Superseded => bail!("import superseded"),
    }
}

#[cfg(test)]
mod tests {
    use super::{Cli, Commands};
    use clap::{CommandFactory, Parser};
    use std::path::PathBuf;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn place_accepts_negative_rows() {
        let cli = Cli::try_parse_from(["tierlist_cli", "place", "abc", "-1"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Place { ref thing_id, row: -1 } if thing_id == "abc"
        ));
    }

    #[test]
    fn add_row_is_optional() {
        let cli = Cli::try_parse_from(["tierlist_cli", "add", "Rust"]).unwrap();
        assert!(matches!(cli.command, Commands::Add { row: None, .. }));
    }

    #[test]
    fn config_flag_is_accepted_after_subcommand() {
        let cli =
            Cli::try_parse_from(["tierlist_cli", "show", "--config", "tierlist.json"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("tierlist.json")));
        assert!(matches!(cli.command, Commands::Show));
    }

    #[test]
    fn unknown_subcommand_and_missing_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["tierlist_cli", "rank"]).is_err());
        assert!(Cli::try_parse_from(["tierlist_cli", "place", "abc"]).is_err());
        assert!(Cli::try_parse_from(["tierlist_cli", "add", "x", "top"]).is_err());
    }
}
