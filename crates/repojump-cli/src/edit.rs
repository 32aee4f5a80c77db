use nu_ansi_term::Color::{Blue, Cyan, LightRed};
use repojump_config::error::UrlError;
use repojump_store::{
    rows::{check_rows, RowInput},
    storage::Storage,
    EnrichedRepo, RepositoryStore,
};
use tracing::{debug, error, info, warn};

use crate::{
    error::{RepojumpError, RepojumpResult},
    utils::{icon_or, same_url, Colored, Icons},
};

pub fn add_repo<S: Storage>(
    store: &mut RepositoryStore<S>,
    url: &str,
    tag: Option<&str>,
) -> RepojumpResult<()> {
    let report = check_rows(&[RowInput::new(url, tag.unwrap_or_default())]);
    if let Some(rejection) = report.rejected.into_iter().next() {
        return Err(RepojumpError::InvalidUrl(rejection.error));
    }
    let Some(entry) = report.accepted.into_iter().next() else {
        return Err(RepojumpError::InvalidUrl(UrlError::Empty));
    };

    let mut repos = store.load_all()?;
    if repos.iter().any(|repo| same_url(&repo.url, &entry.url)) {
        warn!("{} is already saved", entry.url);
        return Ok(());
    }

    let repo = EnrichedRepo::from_entry(entry);
    let name = repo.name.clone().unwrap_or_default();
    repos.push(repo);
    store.save_all(&repos)?;

    info!("{} Added {}", icon_or(Icons::CHECK, "+"), Colored(Blue, name));
    Ok(())
}

fn is_target(repo: &EnrichedRepo, target: &str) -> bool {
    same_url(&repo.url, target) || repo.name.as_deref() == Some(target.trim())
}

/// Removes every repository whose URL or name equals one of `targets`.
pub fn remove_repos<S: Storage>(
    store: &mut RepositoryStore<S>,
    targets: &[String],
) -> RepojumpResult<()> {
    let repos = store.load_all()?;
    let before = repos.len();

    let (removed, kept): (Vec<_>, Vec<_>) = repos
        .into_iter()
        .partition(|repo| targets.iter().any(|target| is_target(repo, target)));

    for target in targets {
        if !removed.iter().any(|repo| is_target(repo, target)) {
            warn!("No saved repository matches {}", target);
        }
    }

    if removed.is_empty() {
        return Ok(());
    }

    store.save_all(&kept)?;
    for repo in &removed {
        info!("{} Removed {}", icon_or(Icons::CROSS, "-"), repo.url);
    }
    debug!(before = before, after = kept.len(), "repositories removed");
    Ok(())
}

/// Parses `<url> [tag]` lines. Blank lines and `#` comments are skipped; the
/// 1-based line number of each row is kept for reporting.
pub fn parse_rows(content: &str) -> (Vec<usize>, Vec<RowInput>) {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(index, line)| {
            let line = line.trim();
            let row = match line.split_once(char::is_whitespace) {
                Some((url, tag)) => RowInput::new(url, tag),
                None => RowInput::new(line, ""),
            };
            (index + 1, row)
        })
        .unzip()
}

/// Replaces the saved list with the valid rows of `content`.
pub fn edit_repos<S: Storage>(
    store: &mut RepositoryStore<S>,
    content: &str,
) -> RepojumpResult<()> {
    let (lines, rows) = parse_rows(content);
    let report = store.save_rows(&rows)?;

    for rejection in &report.rejected {
        error!(
            "line {}: {} {}",
            Colored(Cyan, lines[rejection.index]),
            Colored(LightRed, &rejection.url),
            rejection.error
        );
    }

    info!(
        "Saved {} repositories{}",
        Colored(Cyan, report.accepted.len()),
        if report.is_clean() {
            String::new()
        } else {
            format!(", skipped {}", Colored(LightRed, report.rejected.len()))
        }
    );
    Ok(())
}
