use nu_ansi_term::Color::{Blue, Cyan, LightRed, Yellow};
use repojump_navigation::filter::filter_indices;
use repojump_store::{storage::Storage, EnrichedRepo, RepositoryStore};
use tracing::{debug, info};

use crate::{
    error::RepojumpResult,
    utils::{icon_or, Colored, Icons},
};

pub fn format_repo(repo: &EnrichedRepo) -> String {
    let tag = repo
        .tag
        .as_deref()
        .map(|tag| format!(" {} {}", icon_or(Icons::TAG, "#"), Colored(Yellow, tag)))
        .unwrap_or_default();

    match (&repo.host, &repo.name) {
        (Some(host), Some(name)) => {
            format!(
                "{} {}{} {}:{}",
                icon_or(Icons::CHECK, "+"),
                Colored(Blue, name),
                tag,
                Colored(Cyan, host),
                repo.url
            )
        }
        _ => {
            format!(
                "{} {}{} {}",
                icon_or(Icons::CROSS, "x"),
                Colored(LightRed, &repo.url),
                tag,
                Colored(LightRed, "(unsupported url)")
            )
        }
    }
}

/// Repositories whose name or tag contains every query word. Hotkey words get
/// no link-mode treatment here.
fn matching_repos(repos: Vec<EnrichedRepo>, query: &str) -> Vec<EnrichedRepo> {
    let keep = filter_indices(&repos, query);
    repos
        .into_iter()
        .enumerate()
        .filter(|(index, _)| keep.contains(index))
        .map(|(_, repo)| repo)
        .collect()
}

/// Lists saved repositories, narrowed by the search filter.
pub fn list_repos<S: Storage>(
    store: &mut RepositoryStore<S>,
    query: &[String],
) -> RepojumpResult<()> {
    let repos = store.load_all()?;
    let total = repos.len();
    let shown = matching_repos(repos, &query.join(" "));

    let mut unresolvable = 0;
    for repo in &shown {
        if !repo.is_resolvable() {
            unresolvable += 1;
        }
        info!("{}", format_repo(repo));
    }

    debug!(total = total, shown = shown.len(), "listed repositories");
    if unresolvable > 0 {
        info!(
            "{} {} repositories cannot be opened; fix or remove them",
            icon_or(Icons::WARNING, "!"),
            Colored(LightRed, unresolvable)
        );
    }
    info!(
        "{} of {} repositories",
        Colored(Cyan, shown.len()),
        Colored(Cyan, total)
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use repojump_store::RepoEntry;

    use super::*;

    fn repos() -> Vec<EnrichedRepo> {
        [
            ("https://github.com/acme/widget", None),
            ("https://github.com/acme/pipeline", Some("p")),
            ("https://bitbucket.org/team/loader", Some("work")),
        ]
        .into_iter()
        .map(|(url, tag)| EnrichedRepo::from_entry(RepoEntry::new(url, tag.map(String::from))))
        .collect()
    }

    fn names(repos: &[EnrichedRepo]) -> Vec<&str> {
        repos.iter().filter_map(|repo| repo.name.as_deref()).collect()
    }

    #[test]
    fn test_matching_repos_has_no_link_modes() {
        assert_eq!(names(&matching_repos(repos(), "p widget")), Vec::<&str>::new());
        assert_eq!(names(&matching_repos(repos(), "p")), vec!["pipeline"]);
        assert_eq!(names(&matching_repos(repos(), "l work")), vec!["loader"]);
    }

    #[test]
    fn test_matching_repos_empty_query() {
        assert_eq!(
            names(&matching_repos(repos(), "  ")),
            vec!["widget", "pipeline", "loader"]
        );
    }
}
