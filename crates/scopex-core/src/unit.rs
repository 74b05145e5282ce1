/// Most frequently mentioned unit across the candidate sentences.
///
/// Units are counted longest-first and every counted match is blanked out,
/// so "t" is not counted again inside an already counted "kt". On equal
/// counts the unit listed first in `units` wins. Returns `None` when no
/// unit occurs at all.
pub fn classify_unit<S, U>(sentences: &[S], units: &[U]) -> Option<String>
where
    S: AsRef<str>,
    U: AsRef<str>,
{
    let mut text = sentences
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" ");

    let mut order: Vec<usize> = (0..units.len()).collect();
    // Stable: equal lengths keep their configured order.
    order.sort_by(|&a, &b| units[b].as_ref().len().cmp(&units[a].as_ref().len()));

    let mut counts = vec![0usize; units.len()];
    for idx in order {
        let unit = units[idx].as_ref();
        if unit.is_empty() {
            continue;
        }
        counts[idx] = text.matches(unit).count();
        if counts[idx] > 0 {
            text = text.replace(unit, " ");
        }
    }

    let mut best: Option<(usize, usize)> = None;
    for (idx, &count) in counts.iter().enumerate() {
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((idx, count)),
        }
    }

    best.map(|(idx, _)| units[idx].as_ref().to_string())
}
