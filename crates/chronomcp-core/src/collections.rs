//! Small collection helpers

use std::collections::HashSet;
use std::hash::Hash;

/// Remove repeated items, keeping the first occurrence of each in order.
pub fn deduplicate<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_keeps_first_occurrence_order() {
        let out = deduplicate(["b", "a", "b", "c", "a"]);
        assert_eq!(out, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_empty() {
        assert!(deduplicate(Vec::<String>::new()).is_empty());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_idempotent(xs in prop::collection::vec("[a-d]{1,2}", 0..20)) {
            let once = deduplicate(xs.clone());
            let twice = deduplicate(once.clone());
            prop_assert_eq!(&once, &twice);
            for item in &xs {
                prop_assert!(once.contains(item));
            }
        }
    }
}
