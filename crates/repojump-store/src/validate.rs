use serde_json::Value;

use crate::{
    error::ValidationError,
    models::{RepoEntry, SchemaVersion, SettingsBlob, REPOS_KEY, VERSION_KEY},
};

/// Checks externally supplied settings (an import) against the current
/// layout and converts them into a [`SettingsBlob`].
///
/// Internally built saves are trusted and never pass through here.
pub fn validate(settings: &Value) -> Result<SettingsBlob, ValidationError> {
    let object = settings.as_object().ok_or(ValidationError::NotAnObject)?;

    let version = object.get(VERSION_KEY);
    if version.and_then(Value::as_str) != Some(SchemaVersion::CURRENT.as_str()) {
        return Err(ValidationError::VersionMismatch {
            found: version.map(|v| {
                v.as_str()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| v.to_string())
            }),
            expected: SchemaVersion::CURRENT.as_str(),
        });
    }

    let mut repos = Vec::new();
    match object.get(REPOS_KEY) {
        None => {}
        Some(Value::Array(items)) => {
            for (index, item) in items.iter().enumerate() {
                repos.push(validate_entry(index, item)?);
            }
        }
        Some(_) => return Err(ValidationError::ReposNotArray),
    }

    Ok(SettingsBlob {
        version: SchemaVersion::CURRENT.as_str().to_string(),
        repos,
    })
}

fn validate_entry(index: usize, item: &Value) -> Result<RepoEntry, ValidationError> {
    let entry = item
        .as_object()
        .ok_or(ValidationError::EntryNotObject { index })?;

    let url = match entry.get("url") {
        Some(Value::String(url)) if !url.trim().is_empty() => url.clone(),
        _ => return Err(ValidationError::MissingUrl { index }),
    };

    let tag = match entry.get("tag") {
        None => None,
        Some(Value::String(tag)) => Some(tag.clone()),
        Some(_) => return Err(ValidationError::TagNotString { index }),
    };

    let extra = entry
        .iter()
        .filter(|(key, _)| key.as_str() != "url" && key.as_str() != "tag")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    Ok(RepoEntry {
        url,
        tag,
        extra,
    })
}
