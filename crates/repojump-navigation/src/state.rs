use std::fmt;

use repojump_config::{host::destination_url, link_mode::LinkMode};
use repojump_store::EnrichedRepo;
use tracing::{debug, trace, warn};

use crate::{
    event::{Destination, Disposition, Modifiers, NavigationEvent},
    filter::filter_indices,
};

/// The repositories a session searches over.
#[derive(Clone, Debug, PartialEq)]
pub enum Catalog {
    Loaded(Vec<EnrichedRepo>),
    /// Loading failed; the session stays in an error state.
    Unavailable(String),
}

/// Search session state. Every event produces a new state through
/// [`NavigationState::apply`].
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationState {
    catalog: Catalog,
    visible: Vec<usize>,
    highlight: usize,
    link_mode: Option<LinkMode>,
    query: String,
}

/// Result of applying one event.
#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub state: NavigationState,
    pub destination: Option<Destination>,
}

impl From<NavigationState> for Transition {
    fn from(state: NavigationState) -> Self {
        Transition {
            state,
            destination: None,
        }
    }
}

impl NavigationState {
    /// A fresh session over `repos` with an empty query: everything is visible
    /// and the first entry is highlighted.
    pub fn new(repos: Vec<EnrichedRepo>) -> Self {
        let visible = (0..repos.len()).collect();
        Self {
            catalog: Catalog::Loaded(repos),
            visible,
            highlight: 0,
            link_mode: None,
            query: String::new(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            catalog: Catalog::Unavailable(reason.into()),
            visible: Vec::new(),
            highlight: 0,
            link_mode: None,
            query: String::new(),
        }
    }

    /// Starts a session from the outcome of loading the repository list.
    pub fn from_load<E: fmt::Display>(loaded: Result<Vec<EnrichedRepo>, E>) -> Self {
        match loaded {
            Ok(repos) => Self::new(repos),
            Err(err) => {
                warn!("repository list unavailable: {err}");
                Self::unavailable(err.to_string())
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn is_available(&self) -> bool {
        matches!(self.catalog, Catalog::Loaded(_))
    }

    fn repos(&self) -> &[EnrichedRepo] {
        match &self.catalog {
            Catalog::Loaded(repos) => repos,
            Catalog::Unavailable(_) => &[],
        }
    }

    /// Entries matching the current query, in catalog order.
    pub fn visible(&self) -> impl Iterator<Item = &EnrichedRepo> {
        let repos = self.repos();
        self.visible.iter().map(move |&index| &repos[index])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn highlight(&self) -> usize {
        self.highlight
    }

    pub fn highlighted(&self) -> Option<&EnrichedRepo> {
        self.visible
            .get(self.highlight)
            .map(|&index| &self.repos()[index])
    }

    /// The locked link mode, if any.
    pub fn link_mode(&self) -> Option<LinkMode> {
        self.link_mode
    }

    /// The mode a commit would use right now.
    pub fn effective_mode(&self) -> LinkMode {
        self.link_mode.unwrap_or_default()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Applies one event. An unavailable catalog ignores every event.
    pub fn apply(self, event: NavigationEvent) -> Transition {
        if !self.is_available() {
            trace!(?event, "ignoring event, repository list unavailable");
            return self.into();
        }

        match event {
            NavigationEvent::Input(text) => self.input(&text).into(),
            NavigationEvent::Backspace => self.backspace().into(),
            NavigationEvent::ArrowDown => self.step(1).into(),
            NavigationEvent::ArrowUp => self.step(-1).into(),
            NavigationEvent::Commit(modifiers) => self.commit(modifiers),
        }
    }

    fn input(mut self, text: &str) -> Self {
        let query = match self.link_mode {
            Some(_) => text,
            None => {
                match LinkMode::detect(text) {
                    Some((mode, rest)) => {
                        debug!(mode = %mode, "link mode locked");
                        self.link_mode = Some(mode);
                        rest
                    }
                    None => text,
                }
            }
        };

        self.query = query.to_string();
        self.refilter()
    }

    fn backspace(mut self) -> Self {
        if self.query.is_empty() && self.link_mode.take().is_some() {
            debug!("link mode unlocked");
        }
        self
    }

    fn refilter(mut self) -> Self {
        self.visible = filter_indices(self.repos(), &self.query);
        if self.visible.is_empty() {
            self.highlight = 0;
        } else if self.highlight >= self.visible.len() {
            self.highlight = self.visible.len() - 1;
        }
        trace!(
            query = %self.query,
            visible = self.visible.len(),
            highlight = self.highlight,
            "filtered repositories"
        );
        self
    }

    fn step(mut self, delta: isize) -> Self {
        let len = self.visible.len();
        if len == 0 {
            self.highlight = 0;
            return self;
        }

        self.highlight = if delta >= 0 {
            (self.highlight + 1) % len
        } else if self.highlight == 0 {
            len - 1
        } else {
            self.highlight - 1
        };
        self
    }

    fn commit(self, modifiers: Modifiers) -> Transition {
        let Some(repo) = self.highlighted() else {
            trace!("nothing to open");
            return self.into();
        };

        if !repo.is_resolvable() {
            warn!(url = %repo.url, "cannot open an unresolvable repository");
            return self.into();
        }

        let mode = self.effective_mode();
        let destination = Destination {
            url: destination_url(&repo.url, repo.host, mode),
            disposition: Disposition::from(modifiers),
        };
        debug!(url = %destination.url, mode = %mode, "resolved destination");

        Transition {
            state: self,
            destination: Some(destination),
        }
    }
}

#[cfg(test)]
mod tests {
    use repojump_store::RepoEntry;

    use super::*;

    fn repo(url: &str, tag: Option<&str>) -> EnrichedRepo {
        EnrichedRepo::from_entry(RepoEntry::new(url, tag.map(String::from)))
    }

    fn run(state: NavigationState, events: Vec<NavigationEvent>) -> NavigationState {
        events
            .into_iter()
            .fold(state, |state, event| state.apply(event).state)
    }

    fn three() -> NavigationState {
        NavigationState::new(vec![
            repo("https://github.com/acme/alpha", None),
            repo("https://github.com/acme/beta", None),
            repo("https://github.com/acme/gamma", None),
        ])
    }

    #[test]
    fn test_arrow_down_wraps() {
        let mut state = three();
        let mut seen = vec![state.highlight()];
        for _ in 0..3 {
            state = state.apply(NavigationEvent::ArrowDown).state;
            seen.push(state.highlight());
        }
        assert_eq!(seen, vec![0, 1, 2, 0]);
    }

    #[test]
    fn test_arrow_up_wraps() {
        let state = three().apply(NavigationEvent::ArrowUp).state;
        assert_eq!(state.highlight(), 2);
        let state = state.apply(NavigationEvent::ArrowUp).state;
        assert_eq!(state.highlight(), 1);
    }

    #[test]
    fn test_navigation_on_empty_list_is_noop() {
        let state = run(
            three(),
            vec![
                NavigationEvent::Input("nothing matches".into()),
                NavigationEvent::ArrowDown,
                NavigationEvent::ArrowUp,
            ],
        );
        assert_eq!(state.visible_len(), 0);
        assert_eq!(state.highlight(), 0);

        let transition = state.apply(NavigationEvent::Commit(Modifiers::default()));
        assert_eq!(transition.destination, None);
    }

    #[test]
    fn test_highlight_clamps_when_list_shrinks() {
        let state = run(
            three(),
            vec![
                NavigationEvent::ArrowDown,
                NavigationEvent::ArrowDown,
                NavigationEvent::Input("a".into()),
            ],
        );
        assert_eq!(state.visible_len(), 3);
        assert_eq!(state.highlight(), 2);

        let state = state.apply(NavigationEvent::Input("ta".into())).state;
        let names: Vec<_> = state.visible().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["beta"]);
        assert_eq!(state.highlight(), 0);
    }

    #[test]
    fn test_hotkey_locks_mode_and_filters() {
        let state = NavigationState::new(vec![
            repo("https://github.com/acme/myrepo", None),
            repo("https://github.com/acme/other", None),
        ]);
        let state = state
            .apply(NavigationEvent::Input("p myrepo".into()))
            .state;

        assert_eq!(state.link_mode(), Some(LinkMode::PullRequest));
        assert_eq!(state.query(), "myrepo");
        let names: Vec<_> = state.visible().filter_map(|r| r.name.as_deref()).collect();
        assert_eq!(names, vec!["myrepo"]);
    }

    #[test]
    fn test_locked_mode_skips_detection() {
        let state = run(
            three(),
            vec![
                NavigationEvent::Input("s ".into()),
                NavigationEvent::Input("c beta".into()),
            ],
        );
        assert_eq!(state.link_mode(), Some(LinkMode::Source));
        assert_eq!(state.query(), "c beta");
    }

    #[test]
    fn test_backspace_on_empty_query_unlocks() {
        let state = run(
            three(),
            vec![
                NavigationEvent::Input("l al".into()),
                NavigationEvent::Backspace,
            ],
        );
        assert_eq!(state.link_mode(), Some(LinkMode::Commits));

        let state = run(
            state,
            vec![
                NavigationEvent::Input("".into()),
                NavigationEvent::Backspace,
            ],
        );
        assert_eq!(state.link_mode(), None);
        assert_eq!(state.effective_mode(), LinkMode::PullRequest);
        assert_eq!(state.visible_len(), 3);
    }

    #[test]
    fn test_enter_without_query_opens_default_mode() {
        let state = NavigationState::new(vec![repo(
            "https://github.com/acme/widget",
            Some("work"),
        )]);
        let transition = state.apply(NavigationEvent::Commit(Modifiers::default()));

        assert_eq!(
            transition.destination,
            Some(Destination {
                url: "https://github.com/acme/widget/pulls".into(),
                disposition: Disposition::NewTab { active: true },
            })
        );
    }

    #[test]
    fn test_source_mode_on_bitbucket() {
        let state = NavigationState::new(vec![
            repo("https://bitbucket.org/acme/widget", Some("work")),
            repo("https://bitbucket.org/acme/gadget", None),
        ]);
        let transition = state
            .apply(NavigationEvent::Input("s widget".into()))
            .state
            .apply(NavigationEvent::Commit(Modifiers::default()));

        assert_eq!(transition.state.visible_len(), 1);
        let destination = transition.destination.unwrap();
        assert!(destination.url.ends_with("/src/"));
        assert_eq!(destination.url, "https://bitbucket.org/acme/widget/src/");
    }

    #[test]
    fn test_source_mode_on_github() {
        let state = NavigationState::new(vec![repo("https://github.com/acme/widget", None)]);
        let transition = state
            .apply(NavigationEvent::Input("s widget".into()))
            .state
            .apply(NavigationEvent::Commit(Modifiers::default()));

        assert_eq!(
            transition.destination.unwrap().url,
            "https://github.com/acme/widget/"
        );
    }

    #[test]
    fn test_commit_modifiers() {
        let state = NavigationState::new(vec![repo("github.com/acme/widget/", None)]);

        let replaced = state.clone().apply(NavigationEvent::Commit(Modifiers {
            replace_current: true,
            background: false,
        }));
        let replaced = replaced.destination.unwrap();
        assert_eq!(replaced.url, "https://github.com/acme/widget/pulls");
        assert_eq!(replaced.disposition, Disposition::ReplaceCurrent);

        let background = state.apply(NavigationEvent::Commit(Modifiers {
            replace_current: false,
            background: true,
        }));
        assert_eq!(
            background.destination.unwrap().disposition,
            Disposition::NewTab { active: false }
        );
    }

    #[test]
    fn test_commit_uses_highlighted_entry() {
        let transition = run(three(), vec![NavigationEvent::ArrowDown])
            .apply(NavigationEvent::Commit(Modifiers::default()));
        assert_eq!(
            transition.destination.unwrap().url,
            "https://github.com/acme/beta/pulls"
        );
    }

    #[test]
    fn test_unresolvable_entry_is_not_opened() {
        let state = NavigationState::new(vec![repo("https://gitlab.com/acme/widget", Some("old"))]);
        assert_eq!(state.visible_len(), 1);

        let transition = state.apply(NavigationEvent::Commit(Modifiers::default()));
        assert_eq!(transition.destination, None);
    }

    #[test]
    fn test_unavailable_catalog_ignores_events() {
        let state = NavigationState::from_load::<String>(Err("storage offline".into()));
        assert!(!state.is_available());
        assert_eq!(
            state.catalog(),
            &Catalog::Unavailable("storage offline".into())
        );

        let before = state.clone();
        let state = run(
            state,
            vec![
                NavigationEvent::Input("p widget".into()),
                NavigationEvent::ArrowDown,
            ],
        );
        assert_eq!(state, before);
        assert_eq!(
            state
                .apply(NavigationEvent::Commit(Modifiers::default()))
                .destination,
            None
        );
    }

    #[test]
    fn test_filtering_never_mutates_catalog() {
        let state = three();
        let catalog = state.catalog().clone();
        let state = state.apply(NavigationEvent::Input("beta".into())).state;
        assert_eq!(state.catalog(), &catalog);
    }
}
