use std::{
    fs,
    io::{self, Read},
};

use nu_ansi_term::Color::{Cyan, Green};
use repojump_store::{storage::Storage, RepositoryStore};
use repojump_utils::path::resolve_path;
use tracing::info;

use crate::{
    error::{ErrorContext, RepojumpResult},
    utils::{icon_or, Colored, Icons},
};

/// Writes the full current settings as pretty JSON to `output`, or stdout.
pub fn export_settings<S: Storage>(
    store: &mut RepositoryStore<S>,
    output: Option<&str>,
) -> RepojumpResult<()> {
    let blob = store.export()?;
    let serialized = serde_json::to_string_pretty(&blob)?;

    match output {
        Some(output) => {
            let path = resolve_path(output)?;
            fs::write(&path, format!("{serialized}\n"))
                .with_context(|| format!("writing export to {}", path.display()))?;
            info!(
                "{} Exported {} repositories to {}",
                icon_or(Icons::CHECK, "+"),
                Colored(Cyan, blob.repos.len()),
                Colored(Green, path.display())
            );
        }
        None => println!("{serialized}"),
    }

    Ok(())
}

fn read_input(file: &str) -> RepojumpResult<String> {
    if file == "-" {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .with_context(|| "reading settings from stdin".to_string())?;
        return Ok(buffer);
    }

    let path = resolve_path(file)?;
    fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))
}

/// Replaces the settings with an export. Nothing is written unless the whole
/// payload is valid.
pub fn import_settings<S: Storage>(
    store: &mut RepositoryStore<S>,
    file: &str,
) -> RepojumpResult<()> {
    let raw = read_input(file)?;
    let count = store.import_and_replace(&raw)?;
    info!(
        "{} Imported {} repositories",
        icon_or(Icons::CHECK, "+"),
        Colored(Cyan, count)
    );
    Ok(())
}
