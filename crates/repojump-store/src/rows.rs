use repojump_config::{error::UrlError, host::resolve};
use tracing::debug;

use crate::models::RepoEntry;

/// One editable row of the repository list, as typed by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RowInput {
    pub url: String,
    pub tag: String,
}

impl RowInput {
    pub fn new(url: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            tag: tag.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowRejection {
    pub index: usize,
    pub url: String,
    pub error: UrlError,
}

/// Outcome of checking a list of rows: the entries to persist and the rows
/// to flag. A rejected row never prevents the others from being saved.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RowReport {
    pub accepted: Vec<RepoEntry>,
    pub rejected: Vec<RowRejection>,
}

impl RowReport {
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// Checks edited rows for usable URLs.
///
/// Values are trimmed and an empty tag is dropped. The last row is the blank
/// "new entry" row of an editor: when its URL is empty it is skipped rather
/// than flagged.
pub fn check_rows(rows: &[RowInput]) -> RowReport {
    let mut report = RowReport::default();

    for (index, row) in rows.iter().enumerate() {
        let url = row.url.trim();
        let tag = row.tag.trim();
        let is_last_row = index + 1 == rows.len();

        if url.is_empty() && is_last_row {
            continue;
        }

        match resolve(url) {
            Ok(_) => {
                report.accepted.push(RepoEntry::new(
                    url,
                    (!tag.is_empty()).then(|| tag.to_string()),
                ));
            }
            Err(error) => {
                debug!(row = index, url = url, "rejecting repository row: {error}");
                report.rejected.push(RowRejection {
                    index,
                    url: url.to_string(),
                    error,
                });
            }
        }
    }

    report
}
