use std::collections::HashSet;

use crate::HistoryOutcome;

/// Track-record score against a target job title: half acceptance rate,
/// half best title similarity among accepted engagements.
pub fn score_history(outcomes: &[HistoryOutcome], target_title: &str) -> f64 {
    let success_rate = if outcomes.is_empty() {
        // no history at all is unknown, not bad
        0.5
    } else {
        let accepted = outcomes.iter().filter(|o| o.accepted).count();
        accepted as f64 / outcomes.len() as f64
    };

    let title_similarity = outcomes
        .iter()
        .filter(|o| o.accepted)
        .map(|o| title_overlap(&o.title, target_title))
        .fold(0.0, f64::max);

    0.5 * success_rate + 0.5 * title_similarity
}

/// Bag-of-words overlap ratio: |A ∩ B| / max(|A|, |B|), case-folded.
fn title_overlap(a: &str, b: &str) -> f64 {
    let words_a = word_bag(a);
    let words_b = word_bag(b);

    let denominator = words_a.len().max(words_b.len());
    if denominator == 0 {
        return 0.0;
    }

    words_a.intersection(&words_b).count() as f64 / denominator as f64
}

fn word_bag(title: &str) -> HashSet<String> {
    title
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect()
}
