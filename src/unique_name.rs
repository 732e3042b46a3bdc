use regex::Regex;

/// Resolves a candidate list name against the names already rendered in the
/// catalog. An unused candidate is returned unchanged. Otherwise a trailing
/// `" <integer>"` suffix is stripped and re-appended incremented by one
/// (appending `" 2"` when there is none), until the name is free. The
/// comparison on the suffix is numeric, so "Foo 9" advances to "Foo 10".
pub fn ensure_unique_name(candidate: &str, existing: &[String]) -> String {
    let suffix = Regex::new(r"^(.*?) (\d+)$").expect("Invalid name suffix pattern");
    let mut name = candidate.to_string();
    while existing.iter().any(|used| *used == name) {
        name = match suffix.captures(&name) {
            Some(caps) => {
                let index: u64 = caps[2].parse().unwrap_or(1);
                format!("{} {}", &caps[1], index + 1)
            }
            None => format!("{name} 2"),
        };
    }
    name
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_unique_candidate_is_unchanged() {
        assert_eq!(ensure_unique_name("Foo", &names(&["Bar"])), "Foo");
        assert_eq!(ensure_unique_name("Foo", &[]), "Foo");
    }

    #[test]
    fn test_first_clash_appends_two() {
        assert_eq!(ensure_unique_name("Foo", &names(&["Foo"])), "Foo 2");
    }

    #[test]
    fn test_suffix_increments_instead_of_stacking() {
        // Never "Foo 2 2".
        assert_eq!(
            ensure_unique_name("Foo", &names(&["Foo", "Foo 2"])),
            "Foo 3"
        );
        assert_eq!(
            ensure_unique_name("Foo 2", &names(&["Foo 2", "Foo 3"])),
            "Foo 4"
        );
    }

    #[test]
    fn test_increment_is_numeric_not_lexicographic() {
        assert_eq!(
            ensure_unique_name("Foo 9", &names(&["Foo 9"])),
            "Foo 10"
        );
        assert_eq!(
            ensure_unique_name("Foo 10", &names(&["Foo 10"])),
            "Foo 11"
        );
    }

    #[test]
    fn test_terminates_within_existing_len_plus_one() {
        let existing = names(&["Foo", "Foo 2", "Foo 3", "Foo 4"]);
        assert_eq!(ensure_unique_name("Foo", &existing), "Foo 5");
    }

    #[test]
    fn test_name_containing_spaces_keeps_base() {
        assert_eq!(
            ensure_unique_name("My gene set", &names(&["My gene set"])),
            "My gene set 2"
        );
    }
}
