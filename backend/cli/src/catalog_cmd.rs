//! `horadric catalog`: browse aggregate files through the cached catalog.

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use horadric_catalog::{CatalogRecord, CatalogStore};
use horadric_config::VisionConfig;
use horadric_core::Category;

use crate::terminal_output::{note_info, note_success, note_warn, render_table, Column};

#[derive(Subcommand, Debug)]
pub enum CatalogCommands {
    /// Parse aggregate files (or folders of them) and replace the cache
    Load {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Search cached items; every term must match, "quoted phrases" stay whole
    Search {
        query: Option<String>,
        /// Limit to one category (ARMOR, WEAPON, RUNE, ...)
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Item counts per category
    Stats,
    /// Delete one item (by search index) from the catalog and its source file
    Remove { index: usize },
    /// Delete the catalog cache
    Clear,
}

pub fn run(command: CatalogCommands, config: &VisionConfig) -> Result<()> {
    let mut store = CatalogStore::new(config.cache_path.clone());

    match command {
        CatalogCommands::Load { paths } => {
            let count = store.load(&paths)?;
            store.save()?;
            note_success(&format!(
                "Loaded {count} item(s) from {} path(s); cache at {}",
                paths.len(),
                store.cache_path().display()
            ));
        }
        CatalogCommands::Search { query, category } => {
            if store.reload()? == 0 {
                note_warn("Catalog is empty; run `horadric catalog load <files>` first");
                return Ok(());
            }
            let hits = store.search_indices(query.as_deref().unwrap_or(""), category);
            if hits.is_empty() {
                note_info("No matching items");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = hits
                .iter()
                .map(|&i| record_row(i, &store.records()[i]))
                .collect();
            print!("{}", render_table(&record_columns(), &rows));
            note_info(&format!("{} of {} item(s)", hits.len(), store.len()));
        }
        CatalogCommands::Stats => {
            store.reload()?;
            let rows: Vec<Vec<String>> = store
                .category_counts()
                .into_iter()
                .map(|(category, count)| vec![category.to_string(), count.to_string()])
                .collect();
            print!(
                "{}",
                render_table(&[Column::left("Category"), Column::right("Items")], &rows)
            );
            note_info(&format!("{} item(s) from {} source(s)", store.len(), store.sources().len()));
        }
        CatalogCommands::Remove { index } => {
            store.reload()?;
            let name = store.records().get(index).map(|r| r.name.clone());
            if store.remove(index)? {
                store.save()?;
                note_success(&format!("Removed #{index} {}", name.unwrap_or_default()));
            } else {
                note_warn(&format!("No item #{index} (catalog has {})", store.len()));
            }
        }
        CatalogCommands::Clear => {
            if store.clear_cache()? {
                note_success(&format!("Deleted {}", store.cache_path().display()));
            } else {
                note_info("No catalog cache to delete");
            }
        }
    }
    Ok(())
}

fn record_columns() -> Vec<Column> {
    vec![
        Column::right("#"),
        Column::left("Name").max_width(32),
        Column::left("Category"),
        Column::left("Quality"),
        Column::left("Sockets"),
        Column::left("Owner").max_width(20),
    ]
}

fn record_row(index: usize, record: &CatalogRecord) -> Vec<String> {
    let mut quality = record.quality.to_string();
    if record.ethereal {
        quality.push_str(" eth");
    }
    vec![
        index.to_string(),
        record.name.clone(),
        record.category.to_string(),
        quality,
        record.sockets.map(|s| s.to_string()).unwrap_or_default(),
        record.owner.clone(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn row_marks_ethereal_and_sockets() {
        let record = CatalogRecord::new(
            "Ethereal Thresher\nSocketed (4)\nEthereal (Cannot be Repaired)",
            Category::Weapon,
            Path::new("Merc.txt"),
        );
        let row = record_row(7, &record);
        assert_eq!(row[0], "7");
        assert_eq!(row[1], "Ethereal Thresher");
        assert!(row[3].ends_with(" eth"));
        assert_eq!(row[4], "4");
        assert_eq!(row[5], "Merc");
        assert_eq!(row.len(), record_columns().len());
    }
}
