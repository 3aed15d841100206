use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use wang_fill::WangCatalog;

/// Catalog inspection configuration.
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Config {
    #[arg(short, long)]
    catalog: PathBuf,

    #[clap(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let config = Config::parse();

    let catalog = WangCatalog::load_path(&config.catalog)?;
    println!("Number of tiles   : {}", catalog.len());

    for color in catalog.colors() {
        let count = catalog
            .descriptors()
            .iter()
            .filter(|descriptor| descriptor.wang_id.colors().contains(&color))
            .count();
        match catalog.representative(color) {
            Some(tile) => {
                println!("Color {color:3}         : {count:3} tiles (representative tile {tile})");
            }
            None => println!("Color {color:3}         : {count:3} tiles"),
        }
    }

    if config.verbose {
        for descriptor in catalog.descriptors() {
            println!(
                "{:3}  {}  weight {}",
                descriptor.tile_id, descriptor.wang_id, descriptor.weight
            );
        }
    }
    Ok(())
}
