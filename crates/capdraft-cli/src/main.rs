//! capdraft: headless draft editing from the command line.
//!
//! Drafts are read from a file and written to `--output`, or to stdout when
//! no output is given. Logs go to stderr so stdout stays pipeable.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use tracing::info;

use capdraft_core::core::catalog::{CatalogKind, CatalogStore};
use capdraft_core::ipc::{self, ApplyResponse};
use capdraft_core::{AppState, DraftEngine};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("no app data directory available on this platform; pass --data-dir")]
    NoDataDir,
    #[error("invalid item '{item}': {reason}")]
    InvalidItem { item: String, reason: String },
    #[error("{0}")]
    Engine(String),
}

impl From<String> for CliError {
    fn from(message: String) -> Self {
        Self::Engine(message)
    }
}

#[derive(Debug, Parser)]
#[command(name = "capdraft", version, about = "Edit CapCut draft documents")]
struct Cli {
    /// App data directory holding settings.json and catalogs/
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use the built-in sample catalogs instead of loading sources
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Inspect catalogs
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Apply video effects to a draft
    ApplyEffects(ApplyArgs),
    /// Place transitions between clips of a draft
    ApplyTransitions(ApplyArgs),
    /// Attach in/out/group animations to clips of a draft
    ApplyAnimations(ApplyArgs),
    /// Add missing required material references to a draft
    EnsureRefs {
        draft: PathBuf,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Debug, Subcommand)]
enum CatalogAction {
    /// List catalog entries
    List {
        #[arg(value_enum)]
        kind: KindArg,
        /// Only animations of this type (in, out, group)
        #[arg(long = "type")]
        animation_type: Option<String>,
    },
}

#[derive(Debug, Subcommand)]
enum SettingsAction {
    Show,
    /// Deep-merge a JSON object into the settings
    Set { patch: String },
    Reset,
}

#[derive(Debug, clap::Args)]
struct ApplyArgs {
    /// Draft document to edit
    draft: PathBuf,

    /// Catalog name or id, or an inline JSON descriptor; in clip order
    #[arg(short, long = "item", required = true)]
    items: Vec<String>,

    /// Where to write the edited draft; stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KindArg {
    Effects,
    Transitions,
    Animations,
}

impl From<KindArg> for CatalogKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Effects => CatalogKind::Effects,
            KindArg::Transitions => CatalogKind::Transitions,
            KindArg::Animations => CatalogKind::Animations,
        }
    }
}

/// Turns `--item` values into the JSON list the apply commands take.
fn parse_items(items: &[String]) -> Result<Value, CliError> {
    items
        .iter()
        .map(|item| {
            let trimmed = item.trim();
            if trimmed.starts_with('{') {
                serde_json::from_str::<Value>(trimmed).map_err(|e| CliError::InvalidItem {
                    item: item.clone(),
                    reason: e.to_string(),
                })
            } else if trimmed.is_empty() {
                Err(CliError::InvalidItem {
                    item: item.clone(),
                    reason: "empty".to_string(),
                })
            } else {
                Ok(Value::String(trimmed.to_string()))
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn prepare_catalogs(engine: &DraftEngine, offline: bool) -> Result<()> {
    if offline {
        *engine.state().catalogs.lock().await = CatalogStore::with_samples();
        return Ok(());
    }
    for outcome in engine.reload_catalogs().await.map_err(CliError::from)? {
        info!("{} catalog: {:?}", outcome.catalog, outcome.origin);
    }
    Ok(())
}

async fn finish<S: Serialize>(
    engine: &DraftEngine,
    response: ApplyResponse<S>,
    output: Option<PathBuf>,
) -> Result<()> {
    if let Some(error) = &response.error {
        eprintln!("warning: draft left unchanged: {}", error);
    } else if let Some(summary) = &response.summary {
        eprintln!("{}", serde_json::to_string(summary)?);
    }
    write_draft(engine, response.draft, output).await
}

async fn write_draft(engine: &DraftEngine, draft: Value, output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            engine
                .save_draft(path.to_string_lossy().into_owned(), draft)
                .await
                .map_err(CliError::from)?;
            info!("Draft written to {}", path.display());
            Ok(())
        }
        None => print_json(&draft),
    }
}

async fn read_draft(path: &std::path::Path) -> Result<Value> {
    ipc::load_draft(path.to_string_lossy().into_owned())
        .await
        .map_err(CliError::from)
        .with_context(|| format!("reading {}", path.display()))
}

async fn run(cli: Cli) -> Result<()> {
    let data_dir = cli
        .data_dir
        .or_else(AppState::default_app_data_dir)
        .ok_or(CliError::NoDataDir)?;
    capdraft_core::init_logging_from(&data_dir);
    let engine = DraftEngine::new(AppState::new(data_dir));

    match cli.command {
        Command::Catalog {
            action: CatalogAction::List { kind, animation_type },
        } => {
            prepare_catalogs(&engine, cli.offline).await?;
            let state = engine.state();
            match CatalogKind::from(kind) {
                CatalogKind::Effects => print_json(&ipc::get_effects(state).await.map_err(CliError::from)?),
                CatalogKind::Transitions => {
                    print_json(&ipc::get_transitions(state).await.map_err(CliError::from)?)
                }
                CatalogKind::Animations => print_json(
                    &ipc::get_animations(state, animation_type)
                        .await
                        .map_err(CliError::from)?,
                ),
            }
        }
        Command::ApplyEffects(args) => {
            prepare_catalogs(&engine, cli.offline).await?;
            let draft = read_draft(&args.draft).await?;
            let response = engine.apply_effects(draft, parse_items(&args.items)?).await.map_err(CliError::from)?;
            finish(&engine, response, args.output).await
        }
        Command::ApplyTransitions(args) => {
            prepare_catalogs(&engine, cli.offline).await?;
            let draft = read_draft(&args.draft).await?;
            let response = engine
                .apply_transitions(draft, parse_items(&args.items)?)
                .await
                .map_err(CliError::from)?;
            finish(&engine, response, args.output).await
        }
        Command::ApplyAnimations(args) => {
            prepare_catalogs(&engine, cli.offline).await?;
            let draft = read_draft(&args.draft).await?;
            let response = engine
                .apply_animations(draft, parse_items(&args.items)?)
                .await
                .map_err(CliError::from)?;
            finish(&engine, response, args.output).await
        }
        Command::EnsureRefs { draft, output } => {
            let doc = read_draft(&draft).await?;
            let doc = ipc::ensure_references(doc).await.map_err(CliError::from)?;
            write_draft(&engine, doc, output).await
        }
        Command::Settings { action } => {
            let state = engine.state();
            let settings = match action {
                SettingsAction::Show => ipc::get_settings(state).await,
                SettingsAction::Set { patch } => {
                    let patch: Value = serde_json::from_str(&patch).context("settings patch is not JSON")?;
                    ipc::set_settings(state, patch).await
                }
                SettingsAction::Reset => ipc::reset_settings(state).await,
            }
            .map_err(CliError::from)?;
            print_json(&settings)
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_apply_effects() {
        let cli = Cli::try_parse_from([
            "capdraft", "--offline", "apply-effects", "draft.json", "-i", "Blur", "--item", "Glow", "-o", "out.json",
        ])
        .unwrap();
        assert!(cli.offline);
        match cli.command {
            Command::ApplyEffects(args) => {
                assert_eq!(args.items, vec!["Blur", "Glow"]);
                assert_eq!(args.output, Some(PathBuf::from("out.json")));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_apply_requires_items() {
        assert!(Cli::try_parse_from(["capdraft", "apply-transitions", "draft.json"]).is_err());
    }

    #[test]
    fn test_catalog_list_with_type() {
        let cli = Cli::try_parse_from(["capdraft", "catalog", "list", "animations", "--type", "out"]).unwrap();
        match cli.command {
            Command::Catalog {
                action: CatalogAction::List { kind, animation_type },
            } => {
                assert!(matches!(kind, KindArg::Animations));
                assert_eq!(animation_type.as_deref(), Some("out"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_items_mixes_names_and_json() {
        let items = vec!["Blur".to_string(), r#"{"name": "Custom", "effect_id": "9"}"#.to_string()];
        assert_eq!(
            parse_items(&items).unwrap(),
            json!(["Blur", {"name": "Custom", "effect_id": "9"}])
        );
    }

    #[test]
    fn test_parse_items_rejects_bad_json_and_blanks() {
        assert!(parse_items(&["{oops".to_string()]).is_err());
        assert!(parse_items(&["  ".to_string()]).is_err());
    }
}
