//! `drawvault` — import and inspect stored lottery draw results.
//!
//! Reads `config.toml` (or the path given with `--config`) for the database
//! location; `--db` overrides it. Import subcommands run one batch each and
//! print the batch report.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use drawvault_core::{
  draw::{DrawResult, LotteryType},
  normalize::{normalize_draw_number, normalize_lottery_type},
  store::{DrawQuery, DrawStore},
};
use drawvault_import::batch;
use drawvault_store_sqlite::SqliteStore;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Drawvault lottery-results store")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Database path; overrides the config file.
  #[arg(long)]
  db: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Import an OCR capture document (JSON).
  ImportOcr { file: PathBuf },

  /// Import a spreadsheet export (CSV).
  ImportSheet { file: PathBuf },

  /// Import a scrape bundle (JSON).
  ImportScrape { file: PathBuf },

  /// List stored draws, newest first.
  List {
    /// Restrict to one game, e.g. "lotto plus 1".
    #[arg(long)]
    game:  Option<String>,
    #[arg(long, default_value_t = 20)]
    limit: usize,
  },

  /// Show one stored draw in full.
  Show { game: String, draw_number: String },

  /// Show the most recent stored draw for each game.
  Latest,
}

// ─── Config file ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Settings {
  #[serde(default = "default_db_path")]
  db_path: String,
}

fn default_db_path() -> String {
  "drawvault.sqlite3".into()
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("DRAWVAULT"))
    .build()
    .context("failed to read config")?;
  let settings: Settings = settings
    .try_deserialize()
    .context("failed to deserialise settings")?;

  let db_path = cli.db.unwrap_or_else(|| PathBuf::from(&settings.db_path));
  let store = SqliteStore::open(&db_path)
    .await
    .with_context(|| format!("failed to open store at {}", db_path.display()))?;

  match cli.command {
    Command::ImportOcr { file } => {
      let report = batch::import_ocr_file(&store, &file).await?;
      println!("{report}");
    }
    Command::ImportSheet { file } => {
      let report = batch::import_sheet_file(&store, &file).await?;
      println!("{report}");
    }
    Command::ImportScrape { file } => {
      let report = batch::import_scrape_file(&store, &file).await?;
      println!("{report}");
    }
    Command::List { game, limit } => {
      let query = DrawQuery {
        lottery_type: game.as_deref().map(normalize_lottery_type),
        limit: Some(limit),
        ..Default::default()
      };
      for draw in store.list_draws(&query).await? {
        print_summary(&draw);
      }
    }
    Command::Show { game, draw_number } => {
      let lottery_type = normalize_lottery_type(&game);
      let number = normalize_draw_number(&draw_number)
        .context("draw number has no usable identifier")?;
      match store.get_draw(lottery_type, &number).await? {
        Some(draw) => print_full(&draw),
        None => println!("no stored result for {lottery_type} draw {number}"),
      }
    }
    Command::Latest => {
      for lottery_type in LotteryType::ALL {
        if let Some(draw) = store.latest_draw(lottery_type).await? {
          print_summary(&draw);
        }
      }
    }
  }

  Ok(())
}

// ─── Output ───────────────────────────────────────────────────────────────────

fn print_summary(draw: &DrawResult) {
  let numbers = draw
    .numbers
    .iter()
    .map(u32::to_string)
    .collect::<Vec<_>>()
    .join(" ");
  println!(
    "{:<16} #{:<6} {}  [{numbers}]",
    draw.lottery_type.canonical_name(),
    draw.draw_number,
    draw.draw_date,
  );
}

fn print_full(draw: &DrawResult) {
  print_summary(draw);
  if !draw.bonus_numbers.is_empty() {
    let bonus = draw
      .bonus_numbers
      .iter()
      .map(u32::to_string)
      .collect::<Vec<_>>()
      .join(" ");
    println!("  bonus: [{bonus}]");
  }
  for (division, entry) in &draw.divisions {
    println!(
      "  Division {division}: {} winners, {}",
      entry.winners, entry.prize
    );
  }
  if let Some(url) = &draw.provenance.source_url {
    println!("  source: {url}");
  }
}
