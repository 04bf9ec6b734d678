use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use strsim::damerau_levenshtein;
use unicode_normalization::UnicodeNormalization;

use super::vocabulary::{self, ALIAS_TO_CANONICAL};

fn nfkc_lower_trim(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_lowercase()
}

fn compact_key(input: &str) -> String {
    input
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '_' | '/' | ','))
        .collect()
}

/// Separator-stripped alias keys for tolerance of minor punctuation drift
/// ("drain-cleaning", "pet_sitting").
static COMPACT_ALIAS_TO_CANONICAL: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (alias, canonical) in ALIAS_TO_CANONICAL.iter() {
        map.entry(compact_key(alias)).or_insert(*canonical);
    }
    map
});

fn match_canonical_token(token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }

    if let Some(canonical) = ALIAS_TO_CANONICAL.get(token) {
        return Some((*canonical).to_string());
    }

    let compact = compact_key(token);
    if let Some(canonical) = COMPACT_ALIAS_TO_CANONICAL.get(&compact) {
        return Some((*canonical).to_string());
    }

    fuzzy_match_canonical(&compact)
}

fn fuzzy_match_canonical(compact: &str) -> Option<String> {
    // Short tokens are only matched through the exact/alias lookups above;
    // edit-distance on brief inputs produces too many collisions.
    if compact.len() < 5 {
        return None;
    }

    // Ties on distance break on alias order so repeated runs resolve the
    // same typo to the same canonical skill.
    let mut best: Option<(&str, &str, usize)> = None;
    for (alias, canonical) in COMPACT_ALIAS_TO_CANONICAL.iter() {
        if alias.len() < 5 {
            continue;
        }

        let distance = damerau_levenshtein(compact, alias);
        if distance == 0 {
            return Some((*canonical).to_string());
        }

        let len = compact.len().max(alias.len());
        let acceptable = distance == 1 || (len >= 8 && distance == 2);
        if !acceptable {
            continue;
        }

        let candidate = (alias.as_str(), *canonical, distance);
        best = match best {
            None => Some(candidate),
            Some((best_alias, _, best_dist)) => {
                if distance < best_dist || (distance == best_dist && candidate.0 < best_alias) {
                    Some(candidate)
                } else {
                    best
                }
            }
        };
    }

    best.map(|(_, canonical, _)| canonical.to_string())
}

fn split_segments(input: &str) -> impl Iterator<Item = String> + '_ {
    input
        .split(|c: char| matches!(c, '/' | ',' | ';' | '|' | '+' | '&'))
        .map(nfkc_lower_trim)
        .filter(|s| !s.is_empty())
}

/// Map one raw skill label to its canonical form. Unknown labels pass
/// through lowercased and trimmed so they remain usable for exact matching.
pub fn normalize_skill(skill: &str) -> String {
    let normalized = nfkc_lower_trim(skill);
    if let Some(canonical) = match_canonical_token(&normalized) {
        return canonical;
    }

    for segment in split_segments(skill) {
        if let Some(canonical) = match_canonical_token(&segment) {
            return canonical;
        }
    }

    normalized
}

/// Normalize a tag list into a canonical-skill set.
pub fn normalize_skill_set(skills: &[String]) -> HashSet<String> {
    skills
        .iter()
        .filter(|s| !s.trim().is_empty())
        .map(|s| normalize_skill(s))
        .collect()
}

/// Scan free text for case-folded substring occurrences of every known
/// surface form (canonical labels and aliases) and return the canonical
/// union. Cost is linear in vocabulary size per call. Substring matching
/// can fire inside unrelated longer words; that imprecision is accepted.
pub fn extract_skills(text: &str) -> HashSet<String> {
    let folded = nfkc_lower_trim(text);
    if folded.is_empty() {
        return HashSet::new();
    }

    let mut found = HashSet::new();
    for (surface, canonical) in vocabulary::surface_forms() {
        if folded.contains(surface) {
            found.insert(canonical.to_string());
        }
    }
    found
}

/// The full skill set of the skill's category, or the singleton set when
/// the skill is uncategorized or unknown.
pub fn related_skills(skill: &str) -> HashSet<String> {
    match vocabulary::category_of(skill).and_then(vocabulary::skills_in_category) {
        Some(members) => members.iter().map(|s| (*s).to_string()).collect(),
        None => HashSet::from([skill.to_string()]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aliases_and_case_normalize() {
        assert_eq!(normalize_skill("Plumber"), "plumbing");
        assert_eq!(normalize_skill("  ELECTRICIAN "), "electrical");
        assert_eq!(normalize_skill("Maid Service"), "house cleaning");
    }

    #[test]
    fn separators_are_tolerated() {
        assert_eq!(normalize_skill("drain-cleaning"), "plumbing");
        assert_eq!(normalize_skill("pet_sitting"), "pet care");
        assert_eq!(normalize_skill("Painting / Drywall"), "painting");
    }

    #[test]
    fn tolerates_small_typos_for_known_aliases() {
        assert_eq!(normalize_skill("plumbr"), "plumbing");
        assert_eq!(normalize_skill("electricain"), "electrical");
        assert_eq!(normalize_skill("landscapping"), "landscaping");
    }

    #[test]
    fn unknown_skills_pass_through_lowercased() {
        assert_eq!(normalize_skill("Forklift Operation"), "forklift operation");
        assert_eq!(normalize_skill("ab"), "ab");
    }

    #[test]
    fn normalize_set_dedupes_aliases() {
        let set = normalize_skill_set(&[
            "Plumber".to_string(),
            "plumbing".to_string(),
            " ".to_string(),
            "Roofer".to_string(),
        ]);
        assert_eq!(set.len(), 2);
        assert!(set.contains("plumbing"));
        assert!(set.contains("roofing"));
    }

    #[test]
    fn extracts_canonical_skills_from_job_text() {
        let found = extract_skills("Need a licensed plumber for bathroom repair");
        assert_eq!(found, HashSet::from(["plumbing".to_string()]));
    }

    #[test]
    fn extracts_multiple_skills_and_folds_case() {
        let found = extract_skills("MOWING and Tree Trimming for a large yard");
        assert!(found.contains("lawn care"));
        assert!(found.contains("tree service"));
    }

    #[test]
    fn extract_on_empty_text_is_empty() {
        assert!(extract_skills("").is_empty());
        assert!(extract_skills("   ").is_empty());
    }

    #[test]
    fn related_skills_expand_to_category() {
        let related = related_skills("plumbing");
        assert!(related.contains("electrical"));
        assert!(related.contains("hvac"));
        assert!(!related.contains("carpentry"));
    }

    #[test]
    fn related_skills_for_unknown_is_singleton() {
        let related = related_skills("forklift operation");
        assert_eq!(related, HashSet::from(["forklift operation".to_string()]));
    }
}
