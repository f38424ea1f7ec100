use clap::Subcommand;
use serene_core::storage::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the full configuration as TOML
    List,
    /// Get a value by dot-separated key, e.g. units.food
    Get { key: String },
    /// Set a value by dot-separated key; lists are given as JSON
    Set { key: String, value: String },
}

fn get_by_path<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    let mut current = root;
    for part in key.split('.') {
        current = current.get(part)?;
    }
    Some(current)
}

fn set_by_path(
    root: &mut serde_json::Value,
    key: &str,
    value: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if key.is_empty() {
        return Err("config key is empty".into());
    }
    let (parent_path, leaf) = match key.rsplit_once('.') {
        Some((path, leaf)) => (Some(path), leaf),
        None => (None, key),
    };

    let parent = match parent_path {
        Some(path) => path
            .split('.')
            .try_fold(root, |node, part| node.get_mut(part))
            .ok_or_else(|| format!("unknown config key: {key}"))?,
        None => root,
    };
    let obj = parent
        .as_object_mut()
        .ok_or_else(|| format!("unknown config key: {key}"))?;
    if !obj.contains_key(leaf) {
        return Err(format!("unknown config key: {key}").into());
    }

    // Accept JSON for structured values, fall back to a plain string.
    let new_value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    obj.insert(leaf.to_string(), new_value);
    Ok(())
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::List => {
            let cfg = Config::load_or_default();
            print!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigAction::Get { key } => {
            let cfg = Config::load_or_default();
            let json = serde_json::to_value(&cfg)?;
            match get_by_path(&json, &key) {
                Some(serde_json::Value::String(s)) => println!("{s}"),
                Some(other) => println!("{other}"),
                None => return Err(format!("unknown config key: {key}").into()),
            }
        }
        ConfigAction::Set { key, value } => {
            let cfg = Config::load_or_default();
            let mut json = serde_json::to_value(&cfg)?;
            set_by_path(&mut json, &key, &value)?;
            let cfg: Config = serde_json::from_value(json)?;
            cfg.save()?;
            println!("Set {key}");
        }
    }
    Ok(())
}
