use repojump_store::EnrichedRepo;

/// Lowercased, whitespace-separated words of a search query.
pub fn query_words(query: &str) -> Vec<String> {
    query.split_whitespace().map(str::to_lowercase).collect()
}

/// Whether every word is a case-insensitive substring of the repository's
/// name or of one of its labels. An empty word list matches everything.
pub fn matches(repo: &EnrichedRepo, words: &[String]) -> bool {
    let name = repo.name.as_deref().map(str::to_lowercase);
    let labels: Vec<String> = repo.labels().map(str::to_lowercase).collect();

    words.iter().all(|word| {
        name.as_deref().is_some_and(|name| name.contains(word.as_str()))
            || labels.iter().any(|label| label.contains(word.as_str()))
    })
}

/// Indices into `repos` of the entries matching `query`, in catalog order.
pub fn filter_indices(repos: &[EnrichedRepo], query: &str) -> Vec<usize> {
    let words = query_words(query);
    repos
        .iter()
        .enumerate()
        .filter(|(_, repo)| matches(repo, &words))
        .map(|(index, _)| index)
        .collect()
}
