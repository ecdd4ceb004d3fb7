//! # Lootgen Command Line
//!
//! Rolls loot from the catalog in a data directory and manages presets.

use clap::{Args as ClapArgs, Parser, Subcommand};
use log::info;
use lootgen::config::{DataPaths, DEFAULT_DATA_DIR, DEFAULT_LOOT_POINTS};
use lootgen::generation::utils::{create_rng, entropy_rng};
use lootgen::{
    parse_items_text, parse_materials_text, total_points, CatalogLoader, Generator, LootError,
    LootResult, LootSelector, Preset, PresetStore, SelectionConfig,
};
use std::path::{Path, PathBuf};

/// Command line arguments for lootgen.
#[derive(Parser, Debug)]
#[command(name = "lootgen")]
#[command(about = "Point-budgeted weighted loot generation")]
#[command(version)]
struct Args {
    /// Directory holding loot_items.json, presets.json and materials.json
    #[arg(long, default_value = DEFAULT_DATA_DIR)]
    data_dir: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Roll a batch of loot
    Generate {
        #[command(flatten)]
        filters: FilterArgs,

        /// Start from a saved preset; explicit flags override it
        #[arg(long)]
        preset: Option<String>,

        /// Fill material placeholders in item names
        #[arg(long)]
        materials: bool,

        /// Random seed for reproducible rolls
        #[arg(short, long)]
        seed: Option<u64>,
    },

    /// List every tag known to the catalog
    Tags,

    /// Manage saved presets
    Presets {
        #[command(subcommand)]
        action: PresetAction,
    },

    /// Append pipe-delimited records from a text file to the catalog
    Import {
        file: PathBuf,

        /// Treat the file as `name|modifier|type` material records
        #[arg(long)]
        materials: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PresetAction {
    /// Show saved presets
    List,
    /// Save or overwrite a preset
    Save {
        name: String,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Remove a preset
    Delete { name: String },
}

#[derive(ClapArgs, Debug, Default)]
struct FilterArgs {
    /// Point budget
    #[arg(short, long)]
    points: Option<u32>,

    /// Comma-separated tags; items must carry at least one
    #[arg(long, value_delimiter = ',')]
    include: Vec<String>,

    /// Comma-separated tags; items must carry none
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,

    /// Lowest rarity accepted
    #[arg(long)]
    min_rarity: Option<i32>,

    /// Highest rarity accepted
    #[arg(long)]
    max_rarity: Option<i32>,
}

impl FilterArgs {
    /// Layers these flags over `base`.
    fn apply(&self, base: SelectionConfig) -> SelectionConfig {
        let mut config = base;
        if let Some(points) = self.points {
            config.points = points;
        }
        let include = clean_tags(&self.include);
        if !include.is_empty() {
            config.include_tags = include;
        }
        let exclude = clean_tags(&self.exclude);
        if !exclude.is_empty() {
            config.exclude_tags = exclude;
        }
        if self.min_rarity.is_some() {
            config.min_rarity = self.min_rarity;
        }
        if self.max_rarity.is_some() {
            config.max_rarity = self.max_rarity;
        }
        config
    }
}

fn clean_tags(tags: &[String]) -> Vec<String> {
    tags.iter()
        .map(|tag| tag.trim())
        .filter(|tag| !tag.is_empty())
        .map(String::from)
        .collect()
}

fn main() {
    let args = Args::parse();

    initialize_logging(&args.log_level);
    info!("Starting lootgen v{}", lootgen::VERSION);

    if let Err(e) = run(args) {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        use tracing::Level;

        let level = match log_level.to_lowercase().as_str() {
            "error" => Level::ERROR,
            "warn" => Level::WARN,
            "info" => Level::INFO,
            "debug" => Level::DEBUG,
            "trace" => Level::TRACE,
            _ => Level::INFO,
        };

        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_target(false)
            .init();
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_target(false)
            .init();
    }
}

fn run(args: Args) -> LootResult<()> {
    let paths = DataPaths::new(args.data_dir.clone());
    let catalog = CatalogLoader::from_paths(&paths);
    let store = PresetStore::new(paths.presets());

    match args.command {
        Command::Generate {
            filters,
            preset,
            materials,
            seed,
        } => {
            let base = match preset {
                Some(name) => {
                    let presets = store.load_presets()?;
                    let preset = presets
                        .get(&name)
                        .ok_or_else(|| LootError::PresetNotFound(name.clone()))?;
                    info!("Using preset '{}'", name);
                    SelectionConfig::from(preset)
                }
                None => SelectionConfig::new(DEFAULT_LOOT_POINTS),
            };
            let config = filters.apply(base);
            generate(&catalog, &config, materials, seed)
        }
        Command::Tags => {
            for tag in catalog.load_all_tags()? {
                println!("{}", tag);
            }
            Ok(())
        }
        Command::Presets { action } => manage_presets(&store, action),
        Command::Import { file, materials } => import(&catalog, &file, materials),
    }
}

fn generate(
    catalog: &CatalogLoader,
    config: &SelectionConfig,
    use_materials: bool,
    seed: Option<u64>,
) -> LootResult<()> {
    let items = catalog.load_items()?;
    let materials = if use_materials {
        catalog.load_materials()?
    } else {
        Vec::new()
    };

    let mut selector = LootSelector::new(&items);
    if use_materials {
        selector = selector.with_materials(&materials);
    }

    let loot = match seed {
        Some(seed) => {
            info!("Rolling loot with seed: {}", seed);
            selector.generate(config, &mut create_rng(seed))?
        }
        None => selector.generate(config, &mut entropy_rng())?,
    };

    for item in &loot {
        println!("{}", item);
    }
    info!(
        "{} items, {}/{} points",
        loot.len(),
        total_points(&loot),
        config.points
    );
    Ok(())
}

fn manage_presets(store: &PresetStore, action: PresetAction) -> LootResult<()> {
    let mut presets = store.load_presets()?;

    match action {
        PresetAction::List => {
            for (name, preset) in &presets {
                println!(
                    "{}: {} pts, include [{}], exclude [{}], rarity {}..{}",
                    name,
                    preset.loot_points,
                    preset.include_tags.join(", "),
                    preset.exclude_tags.join(", "),
                    preset.min_rarity.map_or("*".to_string(), |r| r.to_string()),
                    preset.max_rarity.map_or("*".to_string(), |r| r.to_string()),
                );
            }
            return Ok(());
        }
        PresetAction::Save { name, filters } => {
            let config = filters.apply(SelectionConfig::new(DEFAULT_LOOT_POINTS));
            info!("Saving preset '{}'", name);
            presets.insert(name, Preset::from(&config));
        }
        PresetAction::Delete { name } => {
            if presets.remove(&name).is_none() {
                return Err(LootError::PresetNotFound(name));
            }
            info!("Deleted preset '{}'", name);
        }
    }

    store.save_presets(&presets)
}

fn import(catalog: &CatalogLoader, file: &Path, materials: bool) -> LootResult<()> {
    let text = std::fs::read_to_string(file)?;

    if materials {
        let mut existing = catalog.load_materials()?;
        let added = parse_materials_text(&text)?;
        info!("Importing {} materials", added.len());
        existing.extend(added);
        catalog.save_materials(&existing)
    } else {
        let mut existing = catalog.load_items()?;
        let added = parse_items_text(&text)?;
        info!("Importing {} items", added.len());
        existing.extend(added);
        catalog.save_items(&existing)
    }
}
