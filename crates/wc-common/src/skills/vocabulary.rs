use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

/// Canonical skill → accepted aliases.
///
/// NOTE: keep in sync with the trade taxonomy in the marketplace admin
/// tooling (38 canonical skills, 110+ aliases). The canonical label itself
/// is always accepted as an alias.
const SKILL_ALIASES: &[(&str, &[&str])] = &[
    // Home maintenance
    (
        "plumbing",
        &[
            "plumber",
            "pipe fitting",
            "pipefitter",
            "drain cleaning",
            "water heater repair",
            "leak repair",
        ],
    ),
    (
        "electrical",
        &["electrician", "wiring", "rewiring", "electric work", "panel upgrade"],
    ),
    (
        "hvac",
        &[
            "heating and cooling",
            "air conditioning",
            "ac repair",
            "furnace repair",
            "refrigeration",
        ],
    ),
    (
        "appliance repair",
        &["appliance technician", "washer repair", "dryer repair", "fridge repair"],
    ),
    (
        "painting",
        &["painter", "repainting", "interior painting", "exterior painting"],
    ),
    (
        "general repairs",
        &["handyman", "handywoman", "odd jobs", "home repair", "fix it"],
    ),
    ("locksmith", &["lock repair", "lockout service", "rekeying"]),
    ("pest control", &["exterminator", "pest removal", "fumigation"]),
    // Construction trades
    (
        "carpentry",
        &["carpenter", "woodworking", "cabinetry", "cabinet making", "trim work"],
    ),
    ("framing", &["framer", "wall framing", "stud framing"]),
    ("drywall", &["sheetrock", "plastering", "plasterer", "drywall repair"]),
    ("masonry", &["mason", "bricklaying", "bricklayer", "stonework"]),
    ("concrete", &["concrete finishing", "cement work", "concrete pouring"]),
    ("roofing", &["roofer", "roof repair", "shingling"]),
    (
        "welding",
        &["welder", "metal fabrication", "mig welding", "tig welding"],
    ),
    ("demolition", &["demo work", "teardown", "gut out"]),
    ("tiling", &["tile setting", "tile setter", "tile installation", "grouting"]),
    (
        "flooring",
        &[
            "floor installation",
            "hardwood floors",
            "laminate installation",
            "carpet installation",
        ],
    ),
    // Outdoor
    ("landscaping", &["landscaper", "landscape design", "yard work"]),
    ("lawn care", &["mowing", "lawn mowing", "lawn maintenance"]),
    ("gardening", &["gardener", "planting", "weeding"]),
    (
        "tree service",
        &["tree trimming", "tree removal", "arborist", "pruning"],
    ),
    ("snow removal", &["snow plowing", "snow shoveling"]),
    ("fencing", &["fence installation", "fence repair"]),
    ("pressure washing", &["power washing", "powerwashing"]),
    ("gutter cleaning", &["gutter repair", "gutter clearing"]),
    // Domestic
    (
        "house cleaning",
        &["housekeeping", "housekeeper", "maid service", "home cleaning"],
    ),
    ("deep cleaning", &["move out cleaning", "spring cleaning"]),
    ("window cleaning", &["window washing", "window washer"]),
    ("laundry", &["ironing", "laundry service"]),
    ("cooking", &["cook", "meal prep", "personal chef", "catering"]),
    // Care work
    ("childcare", &["babysitting", "babysitter", "nanny", "child care"]),
    (
        "eldercare",
        &["elder care", "senior care", "caregiver", "caregiving", "home care aide"],
    ),
    (
        "pet care",
        &["pet sitting", "dog walking", "dog walker", "pet sitter"],
    ),
    // Logistics
    (
        "moving",
        &["mover", "moving help", "furniture moving", "relocation help"],
    ),
    ("hauling", &["junk removal", "debris removal", "hauler"]),
    ("delivery driving", &["delivery driver", "courier", "van driver"]),
    ("furniture assembly", &["flat pack assembly", "ikea assembly"]),
];

/// Category → member skills. A skill appears in at most one category;
/// membership drives "related" expansion only, never exact matching.
const CATEGORY_MEMBERS: &[(&str, &[&str])] = &[
    (
        "home maintenance",
        &[
            "plumbing",
            "electrical",
            "hvac",
            "appliance repair",
            "painting",
            "general repairs",
            "locksmith",
            "pest control",
        ],
    ),
    (
        "construction",
        &[
            "carpentry",
            "framing",
            "drywall",
            "masonry",
            "concrete",
            "roofing",
            "welding",
            "demolition",
            "tiling",
            "flooring",
        ],
    ),
    (
        "outdoor",
        &[
            "landscaping",
            "lawn care",
            "gardening",
            "tree service",
            "snow removal",
            "fencing",
            "pressure washing",
            "gutter cleaning",
        ],
    ),
    (
        "domestic",
        &[
            "house cleaning",
            "deep cleaning",
            "window cleaning",
            "laundry",
            "cooking",
        ],
    ),
    ("care", &["childcare", "eldercare", "pet care"]),
    (
        "logistics",
        &["moving", "hauling", "delivery driving", "furniture assembly"],
    ),
];

pub(crate) static ALIAS_TO_CANONICAL: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| {
        let mut map = HashMap::new();
        for (canonical, alias_list) in SKILL_ALIASES {
            map.insert(*canonical, *canonical);
            for alias in *alias_list {
                map.insert(*alias, *canonical);
            }
        }
        map
    });

static SKILL_TO_CATEGORY: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (category, members) in CATEGORY_MEMBERS {
        for member in *members {
            map.insert(*member, *category);
        }
    }
    map
});

static CATEGORY_SKILLS: LazyLock<HashMap<&'static str, HashSet<&'static str>>> =
    LazyLock::new(|| {
        CATEGORY_MEMBERS
            .iter()
            .map(|(category, members)| (*category, members.iter().copied().collect()))
            .collect()
    });

pub fn is_known_skill(skill: &str) -> bool {
    SKILL_ALIASES.iter().any(|(canonical, _)| *canonical == skill)
}

pub fn category_of(skill: &str) -> Option<&'static str> {
    SKILL_TO_CATEGORY.get(skill).copied()
}

pub fn skills_in_category(category: &str) -> Option<&'static HashSet<&'static str>> {
    CATEGORY_SKILLS.get(category)
}

/// Every recognizable surface form: each canonical label and each alias,
/// paired with its canonical skill. The extractor scans all of these.
pub fn surface_forms() -> impl Iterator<Item = (&'static str, &'static str)> {
    SKILL_ALIASES.iter().flat_map(|(canonical, aliases)| {
        std::iter::once((*canonical, *canonical))
            .chain(aliases.iter().map(move |alias| (*alias, *canonical)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_member_is_a_canonical_skill() {
        for (_, members) in CATEGORY_MEMBERS {
            for member in *members {
                assert!(is_known_skill(member), "uncategorizable member: {member}");
            }
        }
    }

    #[test]
    fn skills_belong_to_at_most_one_category() {
        let mut seen: HashMap<&str, &str> = HashMap::new();
        for (category, members) in CATEGORY_MEMBERS {
            for member in *members {
                if let Some(previous) = seen.insert(member, category) {
                    panic!("{member} appears in both {previous} and {category}");
                }
            }
        }
    }

    #[test]
    fn aliases_resolve_to_their_canonical() {
        assert_eq!(ALIAS_TO_CANONICAL.get("plumber"), Some(&"plumbing"));
        assert_eq!(ALIAS_TO_CANONICAL.get("electrician"), Some(&"electrical"));
        assert_eq!(ALIAS_TO_CANONICAL.get("plumbing"), Some(&"plumbing"));
    }

    #[test]
    fn category_lookup_is_symmetric() {
        let category = category_of("plumbing").expect("plumbing is categorized");
        assert!(skills_in_category(category)
            .expect("category exists")
            .contains("plumbing"));
    }
}
