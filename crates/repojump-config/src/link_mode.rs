use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Destination a repository jump resolves to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LinkMode {
    /// Open pull requests
    #[default]
    PullRequest,
    /// Commit history
    Commits,
    /// Source browser
    Source,
    /// New pull request form
    CreatePullRequest,
}

impl LinkMode {
    pub const ALL: [LinkMode; 4] = [
        LinkMode::PullRequest,
        LinkMode::Commits,
        LinkMode::Source,
        LinkMode::CreatePullRequest,
    ];

    pub fn hotkey(self) -> char {
        match self {
            LinkMode::PullRequest => 'p',
            LinkMode::Commits => 'l',
            LinkMode::Source => 's',
            LinkMode::CreatePullRequest => 'c',
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LinkMode::PullRequest => "pr",
            LinkMode::Commits => "log",
            LinkMode::Source => "src",
            LinkMode::CreatePullRequest => "c-pr",
        }
    }

    /// Finds the first mode whose `hotkey + ' '` prefixes `text`.
    ///
    /// Returns the mode together with the remaining text after the prefix.
    ///
    /// # Example
    ///
    /// ```
    /// use repojump_config::link_mode::LinkMode;
    ///
    /// assert_eq!(LinkMode::detect("s widget"), Some((LinkMode::Source, "widget")));
    /// assert_eq!(LinkMode::detect("widget"), None);
    /// ```
    pub fn detect(text: &str) -> Option<(LinkMode, &str)> {
        Self::ALL.into_iter().find_map(|mode| {
            text.strip_prefix(mode.hotkey())
                .and_then(|rest| rest.strip_prefix(' '))
                .map(|rest| (mode, rest))
        })
    }
}

impl fmt::Display for LinkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LinkMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|mode| {
                mode.label() == needle
                    || needle.len() == 1 && needle.starts_with(mode.hotkey())
                    || format!("{mode:?}").to_lowercase() == needle.replace(['-', '_'], "")
            })
            .ok_or(ConfigError::InvalidLinkMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_mode_is_pull_request() {
        assert_eq!(LinkMode::default(), LinkMode::PullRequest);
    }

    #[test]
    fn test_hotkeys_are_unique() {
        let mut keys: Vec<char> = LinkMode::ALL.iter().map(|m| m.hotkey()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), LinkMode::ALL.len());
    }

    #[test]
    fn test_detect_strips_prefix() {
        assert_eq!(
            LinkMode::detect("p myrepo"),
            Some((LinkMode::PullRequest, "myrepo"))
        );
        assert_eq!(LinkMode::detect("c "), Some((LinkMode::CreatePullRequest, "")));
        assert_eq!(LinkMode::detect("l a b"), Some((LinkMode::Commits, "a b")));
    }

    #[test]
    fn test_detect_requires_space() {
        assert_eq!(LinkMode::detect("p"), None);
        assert_eq!(LinkMode::detect("pmyrepo"), None);
        assert_eq!(LinkMode::detect(" p myrepo"), None);
        assert_eq!(LinkMode::detect(""), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("src".parse::<LinkMode>().unwrap(), LinkMode::Source);
        assert_eq!("c".parse::<LinkMode>().unwrap(), LinkMode::CreatePullRequest);
        assert_eq!("C-PR".parse::<LinkMode>().unwrap(), LinkMode::CreatePullRequest);
        assert_eq!(
            "pull-request".parse::<LinkMode>().unwrap(),
            LinkMode::PullRequest
        );
        assert_eq!("commits".parse::<LinkMode>().unwrap(), LinkMode::Commits);
        assert!(matches!(
            "x".parse::<LinkMode>(),
            Err(ConfigError::InvalidLinkMode(_))
        ));
    }

    #[test]
    fn test_serde_names() {
        let rendered = toml::to_string(&std::collections::BTreeMap::from([(
            "mode",
            LinkMode::CreatePullRequest,
        )]))
        .unwrap();
        assert!(rendered.contains("CREATE_PULL_REQUEST"));
    }
}
