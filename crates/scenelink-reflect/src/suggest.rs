//! Closest-name suggestions for unknown properties.

/// Case-insensitive Levenshtein distance.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().flat_map(char::to_lowercase).collect();
    let b: Vec<char> = b.chars().flat_map(char::to_lowercase).collect();
    if a.is_empty() {
        return b.len();
    }
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];
    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[b.len()]
}

/// A ranked candidate name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Suggestion {
    /// Candidate name.
    pub name: String,
    /// Distance to the query.
    pub edit_distance: usize,
}

/// Rank `candidates` against `query`: ascending distance, then name. Duplicates collapse.
pub fn suggest<'a>(
    query: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    limit: usize,
) -> Vec<Suggestion> {
    let mut ranked: Vec<Suggestion> = Vec::new();
    for name in candidates {
        if ranked.iter().any(|s| s.name == name) {
            continue;
        }
        ranked.push(Suggestion {
            name: name.to_owned(),
            edit_distance: edit_distance(query, name),
        });
    }
    ranked.sort_by(|a, b| {
        a.edit_distance
            .cmp(&b.edit_distance)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked.truncate(limit);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn distance_basics() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("Locaton", "Location"), 1);
        assert_eq!(edit_distance("INTENSITY", "Intensity"), 0);
    }

    #[test]
    fn closest_first() {
        let ranked = suggest("Locaton", ["Location", "Rotation", "Scale"], 5);
        assert_eq!(ranked[0].name, "Location");
        assert_eq!(ranked[0].edit_distance, 1);
        assert!(ranked[1].edit_distance >= 2);
    }

    #[test]
    fn ties_break_by_name_and_duplicates_collapse() {
        let ranked = suggest("ab", ["ac", "aa", "ac", "zz"], 5);
        let names: Vec<_> = ranked.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["aa", "ac", "zz"]);
    }

    #[test]
    fn limit_truncates() {
        let ranked = suggest("x", ["a", "b", "c", "d", "e", "f", "g"], 5);
        assert_eq!(ranked.len(), 5);
    }

    proptest! {
        #[test]
        fn distance_is_symmetric(a in "[a-zA-Z]{0,12}", b in "[a-zA-Z]{0,12}") {
            prop_assert_eq!(edit_distance(&a, &b), edit_distance(&b, &a));
        }

        #[test]
        fn distance_bounded_by_longer(a in "[a-z]{0,12}", b in "[a-z]{0,12}") {
            prop_assert!(edit_distance(&a, &b) <= a.len().max(b.len()));
        }
    }
}
