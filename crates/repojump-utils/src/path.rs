use std::{env, path::PathBuf};

use crate::error::{PathError, PathResult};

/// Resolves a path string that may contain environment variables.
///
/// Expands `$VAR` and `${VAR}`, resolves a leading `~` to the user's home
/// directory and makes relative paths absolute against the current directory.
///
/// # Errors
///
/// * [`PathError::Empty`] if the path is empty
/// * [`PathError::CurrentDir`] if the current directory cannot be determined
/// * [`PathError::MissingEnvVar`] if a referenced variable is undefined
/// * [`PathError::UnclosedVariable`] if a `${` is never closed
///
/// # Example
///
/// ```
/// use repojump_utils::path::resolve_path;
///
/// let resolved = resolve_path("/tmp/storage.json").unwrap();
/// assert!(resolved.is_absolute());
/// ```
pub fn resolve_path(path: &str) -> PathResult<PathBuf> {
    let path = path.trim();

    if path.is_empty() {
        return Err(PathError::Empty);
    }

    let resolved = expand_variables(path)?;
    let path_buf = PathBuf::from(resolved);

    if path_buf.is_absolute() {
        Ok(path_buf)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path_buf))
            .map_err(|err| PathError::CurrentDir { source: err })
    }
}

/// Returns the user's home directory.
///
/// Uses `HOME`, falling back to `/home/$USER`.
pub fn home_dir() -> PathBuf {
    env::var("HOME").map(PathBuf::from).unwrap_or_else(|_| {
        let user = env::var("USER").unwrap_or_default();
        PathBuf::from(format!("/home/{user}"))
    })
}

/// `$XDG_CONFIG_HOME`, defaulting to `$HOME/.config`.
pub fn xdg_config_home() -> PathBuf {
    env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// `$XDG_DATA_HOME`, defaulting to `$HOME/.local/share`.
pub fn xdg_data_home() -> PathBuf {
    env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/share"))
}

/// Expands a leading `~`, `$NAME` and `${NAME}`. The XDG and `HOME`
/// variables fall back to their defaults when unset.
fn expand_variables(path: &str) -> PathResult<String> {
    let mut expanded = String::with_capacity(path.len());
    let mut rest = path;

    if let Some(after_tilde) = rest.strip_prefix('~') {
        expanded.push_str(&home_dir().to_string_lossy());
        rest = after_tilde;
    }

    while let Some(dollar) = rest.find('$') {
        expanded.push_str(&rest[..dollar]);
        let after_dollar = &rest[dollar + 1..];

        let (name, remainder) = match after_dollar.strip_prefix('{') {
            Some(braced) => {
                let close = braced.find('}').ok_or_else(|| {
                    PathError::UnclosedVariable {
                        input: rest[dollar..].to_string(),
                    }
                })?;
                (&braced[..close], &braced[close + 1..])
            }
            None => {
                let len = after_dollar
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after_dollar.len());
                after_dollar.split_at(len)
            }
        };

        if name.is_empty() {
            expanded.push('$');
        } else {
            expanded.push_str(&variable_value(name, path)?);
        }
        rest = remainder;
    }

    expanded.push_str(rest);
    Ok(expanded)
}

fn variable_value(name: &str, path: &str) -> PathResult<String> {
    let dir = match name {
        "HOME" => home_dir(),
        "XDG_CONFIG_HOME" => xdg_config_home(),
        "XDG_DATA_HOME" => xdg_data_home(),
        _ => {
            return env::var(name).map_err(|_| {
                PathError::MissingEnvVar {
                    var: name.to_string(),
                    input: path.to_string(),
                }
            });
        }
    };
    Ok(dir.to_string_lossy().into_owned())
}
