use anyhow::{Context, Result};
use clap::Parser;
use crossterm::style::Stylize;
use deck_core::persistence::load_or_build;
use deck_core::{ApkgEmitter, DeckConfig, DeckEmitter, DeckEngine};
use std::path::PathBuf;

/// Builds a Chinese character flashcard deck from CC-CEDICT, a pinyin
/// reading table and a decomposition table.
#[derive(Parser, Debug)]
#[command(name = "deck_builder", version, about)]
struct Args {
    /// CC-CEDICT dictionary file
    #[arg(long)]
    cedict: Option<PathBuf>,

    /// Pinyin reading table in xpinyin's Mandarin.dat layout (`HEX<TAB>READINGS` per line)
    #[arg(long)]
    pinyin: Option<PathBuf>,

    /// Stylesheet embedded into the note model
    #[arg(long)]
    css: Option<PathBuf>,

    /// JSON decomposition table
    #[arg(long)]
    decomposition: Option<PathBuf>,

    /// JSON array giving the study order
    #[arg(long)]
    word_order: Option<PathBuf>,

    /// Anki package (.apkg) to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Cache parsed sources in this bincode snapshot
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Candidate readings kept per character
    #[arg(long)]
    max_readings: Option<usize>,

    /// Deepest decomposition level expanded before giving up
    #[arg(long)]
    max_depth: Option<usize>,
}

impl From<Args> for DeckConfig {
    fn from(args: Args) -> Self {
        let mut config = DeckConfig::default();
        if let Some(p) = args.cedict { config.cedict_path = p; }
        if let Some(p) = args.pinyin { config.pinyin_path = p; }
        if let Some(p) = args.css { config.css_path = p; }
        if let Some(p) = args.decomposition { config.decomposition_path = p; }
        if let Some(p) = args.word_order { config.word_order_path = p; }
        if let Some(p) = args.output { config.output_path = p; }
        if let Some(n) = args.max_readings { config.max_renderings = n; }
        if let Some(n) = args.max_depth { config.max_depth = n; }
        config.cache_path = args.cache;
        config
    }
}

fn stage(message: &str) {
    println!("{} {}", "==>".green().bold(), message);
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("deck_core=info".parse()?),
        )
        .init();

    let config: DeckConfig = Args::parse().into();

    stage("loading sources");
    let sources = load_or_build(&config).context("could not load the deck sources")?;

    stage(&format!("building {} cards", sources.word_order.len()));
    let engine = DeckEngine::new(&sources, config.card_options());
    let cards = engine.build_deck().context("could not assemble the cards")?;

    stage("writing output file");
    let emitter = ApkgEmitter::new(&config.output_path, config.deck.clone());
    let path = emitter
        .emit(&cards, &sources.style)
        .with_context(|| format!("could not write the deck to '{}'", config.output_path.display()))?;

    println!("{} {}", "done!".green().bold(), path.display());
    Ok(())
}
