use itertools::Itertools;

/// Collapses integer-like identifiers into comma-separated dash ranges,
/// e.g. `["1","2","3","5"]` becomes `"1-3,5"`. Values are deduplicated
/// before scanning (a repeated identifier would otherwise break a run) and
/// tokens that do not parse as integers are dropped with a debug log.
pub fn compress<S: AsRef<str>>(ids: &[S]) -> String {
    let numbers: Vec<i64> = ids
        .iter()
        .filter_map(|id| {
            let raw = id.as_ref().trim();
            match raw.parse::<i64>() {
                Ok(n) => Some(n),
                Err(_) => {
                    log::debug!("Skipping non-numeric identifier '{raw}'");
                    None
                }
            }
        })
        .sorted_unstable()
        .dedup()
        .collect();

    let mut ranges: Vec<String> = Vec::new();
    let mut numbers = numbers.into_iter();
    let Some(first) = numbers.next() else {
        return String::new();
    };
    let mut start = first;
    let mut end = first;
    for n in numbers {
        if n == end + 1 {
            end = n;
        } else {
            ranges.push(format_run(start, end));
            start = n;
            end = n;
        }
    }
    ranges.push(format_run(start, end));
    ranges.join(",")
}

fn format_run(start: i64, end: i64) -> String {
    if start == end {
        format!("{start}")
    } else {
        format!("{start}-{end}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_mixed_runs_and_singletons() {
        assert_eq!(
            compress(&ids(&["1", "2", "3", "5", "7", "8", "9"])),
            "1-3,5,7-9"
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(compress(&Vec::<String>::new()), "");
    }

    #[test]
    fn test_single_value() {
        assert_eq!(compress(&ids(&["4"])), "4");
    }

    #[test]
    fn test_unsorted_input_is_sorted_first() {
        assert_eq!(compress(&ids(&["9", "7", "8", "1"])), "1,7-9");
    }

    #[test]
    fn test_duplicates_do_not_break_a_run() {
        assert_eq!(compress(&ids(&["1", "1", "2", "3"])), "1-3");
        assert_eq!(compress(&ids(&["5", "5", "5"])), "5");
    }

    #[test]
    fn test_non_numeric_tokens_are_dropped() {
        assert_eq!(compress(&ids(&["1", "x", "2"])), "1-2");
        assert_eq!(compress(&ids(&["x"])), "");
    }

    #[test]
    fn test_two_element_run_uses_dash() {
        assert_eq!(compress(&ids(&["3", "4"])), "3-4");
    }
}
