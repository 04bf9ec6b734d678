use std::collections::HashSet;

use super::normalizer::related_skills;

const RELATED_MATCH_WEIGHT: f64 = 0.7;

/// Overlap between a candidate's skills and a requirement set. All labels
/// are expected in canonical form (see `normalizer`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillMatchOutcome {
    pub score: f64,
    /// Skills present on both sides.
    pub exact: Vec<String>,
    /// (have, want) pairs matched through category membership.
    pub related: Vec<(String, String)>,
    /// Want-skills with neither exact nor related coverage.
    pub missing: Vec<String>,
    /// Have-skills unused by any match.
    pub extra: Vec<String>,
}

/// Score how well `have` covers `want`.
///
/// An empty `want` imposes no constraint and scores 1.0. With
/// `require_exact` false, want-skills without an exact hit may still be
/// covered through category-related have-skills at reduced weight. A single
/// have-skill may contribute to the exact term and to related pairs for
/// other want-skills at the same time; the cap keeps the score in range.
pub fn score_skill_match(
    have: &[String],
    want: &[String],
    require_exact: bool,
) -> SkillMatchOutcome {
    let have_set: HashSet<&str> = have.iter().map(String::as_str).collect();
    let want_set: HashSet<&str> = want.iter().map(String::as_str).collect();

    if want_set.is_empty() {
        let mut extra: Vec<String> = have_set.iter().map(|s| (*s).to_string()).collect();
        extra.sort();
        return SkillMatchOutcome {
            score: 1.0,
            extra,
            ..SkillMatchOutcome::default()
        };
    }

    let mut exact: Vec<String> = have_set
        .intersection(&want_set)
        .map(|s| (*s).to_string())
        .collect();
    exact.sort();

    let mut related: Vec<(String, String)> = Vec::new();
    if !require_exact {
        for want_skill in &want_set {
            if have_set.contains(want_skill) {
                continue;
            }
            let relatives = related_skills(want_skill);
            for have_skill in &have_set {
                if relatives.contains(*have_skill) {
                    related.push(((*have_skill).to_string(), (*want_skill).to_string()));
                }
            }
        }
    }
    related.sort();

    let want_len = want_set.len() as f64;
    let score = (exact.len() as f64 / want_len
        + RELATED_MATCH_WEIGHT * related.len() as f64 / want_len)
        .min(1.0);

    let related_wants: HashSet<&str> = related.iter().map(|(_, w)| w.as_str()).collect();
    let related_haves: HashSet<&str> = related.iter().map(|(h, _)| h.as_str()).collect();
    let exact_lookup: HashSet<&str> = exact.iter().map(String::as_str).collect();

    let mut missing: Vec<String> = want_set
        .iter()
        .filter(|w| !exact_lookup.contains(**w) && !related_wants.contains(**w))
        .map(|w| (*w).to_string())
        .collect();
    missing.sort();

    let mut extra: Vec<String> = have_set
        .iter()
        .filter(|h| !exact_lookup.contains(**h) && !related_haves.contains(**h))
        .map(|h| (*h).to_string())
        .collect();
    extra.sort();

    SkillMatchOutcome {
        score,
        exact,
        related,
        missing,
        extra,
    }
}
