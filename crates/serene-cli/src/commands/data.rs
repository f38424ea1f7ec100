use std::path::PathBuf;

use clap::Subcommand;
use serene_core::{export, Limit, LimitCollection, LimitStore};

#[derive(Subcommand)]
pub enum DataAction {
    /// Export limits to a password-protected container
    Export {
        /// Output path; the .serenedata extension is appended if missing
        path: PathBuf,
        /// Container password, 8 characters or more
        #[arg(long)]
        password: String,
        /// Names of limits to include; everything when omitted
        #[arg(long = "limit")]
        limits: Vec<String>,
    },
    /// Import limits from a container
    Import {
        path: PathBuf,
        #[arg(long)]
        password: String,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let store = LimitStore::open()?;
    let mut collection = LimitCollection::from_limits(store.load_all()?);

    match action {
        DataAction::Export {
            path,
            password,
            limits,
        } => {
            let selected: Vec<Limit> = if limits.is_empty() {
                collection.limits().to_vec()
            } else {
                let mut selected = Vec::with_capacity(limits.len());
                for name in &limits {
                    let limit = collection
                        .get(name)
                        .ok_or_else(|| format!("no limit named '{name}'"))?;
                    selected.push(limit.clone());
                }
                selected
            };
            if selected.is_empty() {
                return Err("nothing to export".into());
            }

            let written = export::export_to_file(&path, &selected, &password)?;
            println!(
                "Exported {} limit{} to {}",
                selected.len(),
                if selected.len() == 1 { "" } else { "s" },
                written.display()
            );
        }
        DataAction::Import { path, password } => {
            let imported = export::import_from_file(&path, &password)?;
            let mut saved = 0usize;
            for limit in imported {
                let name = limit.name().to_string();
                match collection.add(limit) {
                    Ok(()) => {
                        if let Some(limit) = collection.get(&name) {
                            store.save(limit)?;
                        }
                        saved += 1;
                    }
                    Err(e) => eprintln!("skipping '{name}': {e}"),
                }
            }
            println!(
                "Imported {saved} limit{}",
                if saved == 1 { "" } else { "s" }
            );
        }
    }
    Ok(())
}
