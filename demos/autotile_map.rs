use anyhow::Result;
use clap::Parser;
use simplelog::{ColorChoice, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use wang_fill::{GridAutotiler, Resolver, TerrainGrid, TileId, WangCatalog};

/// Terrain autotiling configuration.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Config {
    #[arg(short, long)]
    catalog: PathBuf,

    #[arg(short, long)]
    terrain: PathBuf,

    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    #[arg(short, long, default_value_t = 0)]
    fallback_tile: TileId,

    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let config = Config::parse();

    let level = if config.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    if config.verbose {
        println!("Catalog file      : {}", config.catalog.display());
        println!("Terrain file      : {}", config.terrain.display());
        println!("Seed              : {}", config.seed);
        println!("Fallback tile     : {}", config.fallback_tile);
    }

    let catalog = WangCatalog::load_path(&config.catalog)?;
    let terrain = TerrainGrid::load(&config.terrain)?;
    if config.verbose {
        println!("Number of tiles   : {}", catalog.len());
        println!("Terrain colors    : {:?}", catalog.colors());
        println!("Grid size         : {:?}", terrain.size());
    }

    let resolver = Resolver::new(&catalog);
    let autotiler = GridAutotiler::new(&resolver, config.fallback_tile);
    let outcome = autotiler.resolve_grid(&terrain, config.seed);

    let rendered = render_tile_grid(&outcome.tiles);
    print!("{rendered}");
    if let Some(path) = &config.output {
        std::fs::write(path, &rendered)?;
    }

    for diagnostic in &outcome.diagnostics {
        eprintln!(
            "Unmatched cell ({}, {}): {}",
            diagnostic.row, diagnostic.col, diagnostic.error
        );
    }
    Ok(())
}

fn render_tile_grid(tiles: &ndarray::Array2<TileId>) -> String {
    let print_width = tiles
        .iter()
        .max()
        .map_or(1, |tile| tile.to_string().len());
    let mut out = String::new();
    for row in tiles.rows() {
        for tile in row.iter() {
            out.push_str(&format!("{tile:print_width$} "));
        }
        out.push('\n');
    }
    out
}
