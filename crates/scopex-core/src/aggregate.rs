use crate::model::{AggregateResult, GroupAggregates, PageFinding, ValueBucket};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// The `n` most frequent distinct values, most frequent first.
///
/// Equal counts keep the order in which the values were first seen.
pub fn top_n_values<S: AsRef<str>>(values: &[S], n: usize) -> Vec<String> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut position: HashMap<&str, usize> = HashMap::new();

    for value in values {
        let value = value.as_ref();
        match position.get(value) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                position.insert(value, counts.len());
                counts.push((value, 1));
            }
        }
    }

    // sort_by is stable, so first-seen order breaks ties
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(n)
        .map(|(value, _)| value.to_string())
        .collect()
}

/// Combined aggregate over all buckets, per group.
///
/// Values are pooled in page order, and within a page in neighbour, table,
/// text order. Every group in `groups` gets an entry, empty if nothing was
/// found for it.
pub fn aggregate<'g>(
    findings: &[PageFinding],
    groups: impl IntoIterator<Item = &'g String>,
    top_n: usize,
) -> BTreeMap<String, AggregateResult> {
    aggregate_with(findings, groups, top_n, &ValueBucket::ALL)
}

/// Aggregate a single value bucket, per group.
pub fn aggregate_bucket<'g>(
    findings: &[PageFinding],
    groups: impl IntoIterator<Item = &'g String>,
    top_n: usize,
    bucket: ValueBucket,
) -> BTreeMap<String, AggregateResult> {
    aggregate_with(findings, groups, top_n, &[bucket])
}

/// Combined and per-bucket aggregates in one go.
pub fn aggregate_all<'g>(
    findings: &[PageFinding],
    groups: impl IntoIterator<Item = &'g String> + Clone,
    top_n: usize,
) -> GroupAggregates {
    GroupAggregates {
        combined: aggregate(findings, groups.clone(), top_n),
        neighbour: aggregate_bucket(findings, groups.clone(), top_n, ValueBucket::Neighbour),
        table: aggregate_bucket(findings, groups.clone(), top_n, ValueBucket::Table),
        text: aggregate_bucket(findings, groups, top_n, ValueBucket::Text),
    }
}

fn aggregate_with<'g>(
    findings: &[PageFinding],
    groups: impl IntoIterator<Item = &'g String>,
    top_n: usize,
    buckets: &[ValueBucket],
) -> BTreeMap<String, AggregateResult> {
    let mut ordered: Vec<&PageFinding> = findings.iter().collect();
    ordered.sort_by_key(|f| f.page_number);

    let mut out = BTreeMap::new();
    for group in groups {
        let mut values: Vec<&str> = Vec::new();
        let mut pages = BTreeSet::new();

        for finding in &ordered {
            let Some(group_finding) = finding.groups.get(group) else {
                continue;
            };
            for &bucket in buckets {
                let bucket_values = group_finding.values(bucket);
                if !bucket_values.is_empty() {
                    pages.insert(finding.page_number);
                }
                values.extend(bucket_values.iter().map(String::as_str));
            }
        }

        out.insert(
            group.clone(),
            AggregateResult {
                values: top_n_values(&values, top_n),
                pages: pages.into_iter().collect(),
            },
        );
    }
    out
}
