use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::{error::UrlError, link_mode::LinkMode};

/// Supported code-hosting services.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HostId {
    Bitbucket,
    Github,
}

impl fmt::Display for HostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostId::Bitbucket => f.write_str("bitbucket"),
            HostId::Github => f.write_str("github"),
        }
    }
}

/// URL suffix appended to a repository's base URL for each [`LinkMode`].
#[derive(Clone, Debug)]
pub struct Suffixes {
    pub pull_request: &'static str,
    pub commits: &'static str,
    pub source: &'static str,
    pub create_pull_request: &'static str,
}

impl Suffixes {
    pub fn get(&self, mode: LinkMode) -> &'static str {
        match mode {
            LinkMode::PullRequest => self.pull_request,
            LinkMode::Commits => self.commits,
            LinkMode::Source => self.source,
            LinkMode::CreatePullRequest => self.create_pull_request,
        }
    }
}

/// Static descriptor of a supported code-hosting domain.
#[derive(Debug)]
pub struct HostProfile {
    pub id: HostId,
    pub domain: &'static str,
    name_pattern: Regex,
    suffixes: Suffixes,
}

impl HostProfile {
    fn new(id: HostId, domain: &'static str, suffixes: Suffixes) -> Self {
        // Last path segment after at least one owner segment; a trailing slash is tolerated.
        let pattern = format!(
            r"^(?:https?://)?(?:www\.)?{}/.+/([^/]+)/?$",
            regex::escape(domain)
        );
        let name_pattern = Regex::new(&pattern).expect("unable to compile host name regex");

        Self {
            id,
            domain,
            name_pattern,
            suffixes,
        }
    }

    /// Extracts the repository's short name from the original, unnormalized URL.
    pub fn extract_name(&self, url: &str) -> Option<String> {
        let caps = self.name_pattern.captures(url)?;
        caps.get(1).map(|m| m.as_str().to_string())
    }

    pub fn suffix(&self, mode: LinkMode) -> &'static str {
        self.suffixes.get(mode)
    }
}

struct DefaultHostInfo {
    id: HostId,
    domain: &'static str,
    suffixes: Suffixes,
}

fn default_hosts() -> Vec<DefaultHostInfo> {
    vec![
        DefaultHostInfo {
            id: HostId::Bitbucket,
            domain: "bitbucket.org",
            suffixes: Suffixes {
                pull_request: "/pull-requests/",
                commits: "/commits/",
                source: "/src/",
                create_pull_request: "/pull-requests/new",
            },
        },
        DefaultHostInfo {
            id: HostId::Github,
            domain: "github.com",
            suffixes: Suffixes {
                pull_request: "/pulls",
                commits: "/commits",
                source: "/",
                create_pull_request: "/compare",
            },
        },
    ]
}

static HOSTS: LazyLock<Vec<HostProfile>> = LazyLock::new(|| {
    default_hosts()
        .into_iter()
        .map(|info| HostProfile::new(info.id, info.domain, info.suffixes))
        .collect()
});

/// All compiled-in host profiles, in match order.
pub fn host_profiles() -> &'static [HostProfile] {
    &HOSTS
}

pub fn find_host_by_id(id: HostId) -> Option<&'static HostProfile> {
    HOSTS.iter().find(|profile| profile.id == id)
}

/// Finds the profile whose domain prefixes `url` once a leading `https://` or
/// `http://` and then a leading `www.` are stripped. Table order breaks ties.
pub fn match_host(url: &str) -> Option<&'static HostProfile> {
    let mut normalized = url;
    if let Some(rest) = normalized.strip_prefix("https://") {
        normalized = rest;
    }
    if let Some(rest) = normalized.strip_prefix("http://") {
        normalized = rest;
    }
    if let Some(rest) = normalized.strip_prefix("www.") {
        normalized = rest;
    }

    HOSTS
        .iter()
        .find(|profile| normalized.starts_with(profile.domain))
}

pub fn suffix_for(profile: Option<&HostProfile>, mode: LinkMode) -> &'static str {
    profile.map(|p| p.suffix(mode)).unwrap_or_default()
}

/// Host and canonical name of a usable repository URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedRepo {
    pub host: HostId,
    pub name: String,
}

/// A URL is usable iff a host matches and the host's name pattern extracts a name.
pub fn resolve(url: &str) -> Result<ResolvedRepo, UrlError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(UrlError::Empty);
    }

    let profile = match_host(url).ok_or_else(|| UrlError::UnknownHost(url.to_string()))?;
    let name = profile
        .extract_name(url)
        .ok_or_else(|| UrlError::NameMismatch {
            url: url.to_string(),
            domain: profile.domain,
        })?;

    trace!(url = url, host = %profile.id, name = %name, "resolved repository url");

    Ok(ResolvedRepo {
        host: profile.id,
        name,
    })
}

/// Builds the navigation target for a repository: its base URL (with
/// `https://` prepended when it carries no scheme) followed by the host's
/// suffix for `mode`.
///
/// # Example
///
/// ```
/// use repojump_config::{host::{destination_url, HostId}, link_mode::LinkMode};
///
/// assert_eq!(
///     destination_url("github.com/acme/widget", Some(HostId::Github), LinkMode::PullRequest),
///     "https://github.com/acme/widget/pulls"
/// );
/// ```
pub fn destination_url(base_url: &str, host: Option<HostId>, mode: LinkMode) -> String {
    let suffix = suffix_for(host.and_then(find_host_by_id), mode);
    if base_url.contains("://") {
        format!("{base_url}{suffix}")
    } else {
        format!("https://{base_url}{suffix}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_host_with_prefix_variants() {
        for url in [
            "https://github.com/acme/widget",
            "http://github.com/acme/widget",
            "https://www.github.com/acme/widget",
            "www.github.com/acme/widget",
            "github.com/acme/widget",
        ] {
            let profile = match_host(url).unwrap();
            assert_eq!(profile.id, HostId::Github, "{url}");
        }

        assert_eq!(
            match_host("https://bitbucket.org/team/repo").unwrap().id,
            HostId::Bitbucket
        );
    }

    #[test]
    fn test_match_host_unknown() {
        assert!(match_host("https://gitlab.com/acme/widget").is_none());
        assert!(match_host("").is_none());
        assert!(match_host("ftp://github.com/acme/widget").is_none());
    }

    #[test]
    fn test_extract_name_is_stable_across_forms() {
        let forms = [
            "https://github.com/acme/widget",
            "https://github.com/acme/widget/",
            "http://www.github.com/acme/widget",
            "www.github.com/acme/widget/",
            "github.com/acme/widget",
        ];
        for url in forms {
            let profile = match_host(url).unwrap();
            assert_eq!(profile.extract_name(url).as_deref(), Some("widget"), "{url}");
        }

        let profile = match_host("bitbucket.org/team/project/").unwrap();
        assert_eq!(
            profile.extract_name("bitbucket.org/team/project/").as_deref(),
            Some("project")
        );
    }

    #[test]
    fn test_extract_name_requires_owner_segment() {
        let profile = find_host_by_id(HostId::Github).unwrap();
        assert_eq!(profile.extract_name("https://github.com/widget"), None);
        assert_eq!(profile.extract_name("https://github.com/"), None);
    }

    #[test]
    fn test_extract_name_uses_last_segment() {
        let profile = find_host_by_id(HostId::Bitbucket).unwrap();
        assert_eq!(
            profile
                .extract_name("https://bitbucket.org/team/sub/deep")
                .as_deref(),
            Some("deep")
        );
    }

    #[test]
    fn test_suffix_table() {
        let bitbucket = find_host_by_id(HostId::Bitbucket);
        let github = find_host_by_id(HostId::Github);

        assert_eq!(suffix_for(bitbucket, LinkMode::PullRequest), "/pull-requests/");
        assert_eq!(suffix_for(bitbucket, LinkMode::Commits), "/commits/");
        assert_eq!(suffix_for(bitbucket, LinkMode::Source), "/src/");
        assert_eq!(
            suffix_for(bitbucket, LinkMode::CreatePullRequest),
            "/pull-requests/new"
        );

        assert_eq!(suffix_for(github, LinkMode::PullRequest), "/pulls");
        assert_eq!(suffix_for(github, LinkMode::Commits), "/commits");
        assert_eq!(suffix_for(github, LinkMode::Source), "/");
        assert_eq!(suffix_for(github, LinkMode::CreatePullRequest), "/compare");

        assert_eq!(suffix_for(None, LinkMode::Source), "");
    }

    #[test]
    fn test_resolve() {
        assert_eq!(
            resolve("https://github.com/acme/widget/").unwrap(),
            ResolvedRepo {
                host: HostId::Github,
                name: "widget".to_string(),
            }
        );
        assert_eq!(resolve("  "), Err(UrlError::Empty));
        assert!(matches!(
            resolve("https://example.com/a/b"),
            Err(UrlError::UnknownHost(_))
        ));
        assert!(matches!(
            resolve("https://github.com/widget"),
            Err(UrlError::NameMismatch { .. })
        ));
    }

    #[test]
    fn test_destination_url() {
        assert_eq!(
            destination_url(
                "https://bitbucket.org/team/widget",
                Some(HostId::Bitbucket),
                LinkMode::Source
            ),
            "https://bitbucket.org/team/widget/src/"
        );
        assert_eq!(
            destination_url("github.com/acme/widget", Some(HostId::Github), LinkMode::Commits),
            "https://github.com/acme/widget/commits"
        );
        assert_eq!(
            destination_url("http://example.com/x", None, LinkMode::PullRequest),
            "http://example.com/x"
        );
    }

    #[test]
    fn test_host_table_has_no_overlapping_domains() {
        let profiles = host_profiles();
        for a in profiles {
            for b in profiles {
                if a.id != b.id {
                    assert!(!a.domain.starts_with(b.domain));
                }
            }
        }
    }
}
