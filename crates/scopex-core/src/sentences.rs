use crate::numeric::NumericFilter;
use std::collections::HashSet;

/// Sentences of `text` that mention a keyword AND a search word.
///
/// Sentences are split on `.`, whitespace is collapsed, and duplicates are
/// dropped keeping the first occurrence.
pub fn matching_sentences<K, W>(text: &str, keywords: &[K], search_words: &[W]) -> Vec<String>
where
    K: AsRef<str>,
    W: AsRef<str>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for raw in text.split('.') {
        let sentence = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if sentence.is_empty() {
            continue;
        }
        let has_keyword = keywords.iter().any(|k| sentence.contains(k.as_ref()));
        let has_search_word = search_words.iter().any(|w| sentence.contains(w.as_ref()));
        if has_keyword && has_search_word && seen.insert(sentence.clone()) {
            out.push(sentence);
        }
    }

    out
}

/// Split candidate sentences into short ones carrying a digit, which are
/// mined for values, and the rest, which are staged for semantic matching.
///
/// A sentence is short when it has fewer than `short_text_max_len` characters.
pub fn split_by_length(sentences: Vec<String>, short_text_max_len: usize) -> (Vec<String>, Vec<String>) {
    sentences.into_iter().partition(|sentence| {
        sentence.chars().count() < short_text_max_len && sentence.bytes().any(|b| b.is_ascii_digit())
    })
}

/// Numeric tokens embedded in candidate sentences, in canonical form.
///
/// Tokens that are themselves part of a keyword or heading label (the "1" of
/// "Scope 1", a "2021" column label) are never counted as values.
pub fn sentence_values<S, E>(sentences: &[S], excluded_terms: &[E], filter: &NumericFilter) -> Vec<String>
where
    S: AsRef<str>,
    E: AsRef<str>,
{
    let excluded: HashSet<&str> = excluded_terms
        .iter()
        .flat_map(|t| t.as_ref().split_whitespace())
        .collect();

    sentences
        .iter()
        .flat_map(|s| s.as_ref().split_whitespace())
        .filter(|token| !excluded.contains(token))
        .filter_map(|token| filter.canonical(token))
        .collect()
}
