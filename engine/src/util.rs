use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Insert `value` into an already sorted vector unless an equal value is
/// present. Returns the index of the value and whether it was inserted.
pub fn sorted_insert_unique<T: Ord>(sorted_vec: &mut Vec<T>, value: T) -> (usize, bool) {
    let mut min = 0;
    let mut max = sorted_vec.len();
    while min < max {
        let middle = (max + min) / 2;
        match value.cmp(&sorted_vec[middle]) {
            Ordering::Less => {
                max = middle;
            },
            Ordering::Greater => {
                min = middle + 1;
            },
            Ordering::Equal => {
                return (middle, false);
            }
        }
    }
    sorted_vec.insert(min, value);
    (min, true)
}

/// Row indices for each distinct label, labels in sorted order.
pub fn group_indices(labels: &[String]) -> BTreeMap<&str, Vec<usize>> {
    let mut groups: BTreeMap<&str, Vec<usize>> = BTreeMap::new();
    for (i, label) in labels.iter().enumerate() {
        groups.entry(label.as_str()).or_default().push(i);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sorted_insert_empty() {
        let mut vector = vec![];
        let value = "test";

        let result = sorted_insert_unique(&mut vector, value);

        assert_eq!(result, (0, true));
        assert_eq!(vector, vec![value]);
    }

    #[test]
    fn test_sorted_insert_start() {
        let a = "aloft";
        let c = "cast";
        let c2 = "crusty";
        let mut vector = vec![a, c, c2];
        let value = "a";

        sorted_insert_unique(&mut vector, value);

        assert_eq!(vector, vec![value, a, c, c2]);
    }

    #[test]
    fn test_sorted_insert_end() {
        let a = "aloft";
        let c = "cast";
        let d = "deleted";
        let mut vector = vec![a, c, d];
        let value = "test";

        let result = sorted_insert_unique(&mut vector, value);

        assert_eq!(result, (3, true));
        assert_eq!(vector, vec![a, c, d, value]);
    }

    #[test]
    fn test_sorted_insert_middle() {
        let a = "aloft";
        let c = "cast";
        let c2 = "crusty";
        let d = "deleted";
        let mut vector = vec![a, c, c2, d];
        let value = "b";

        sorted_insert_unique(&mut vector, value);

        assert_eq!(vector, vec![a, value, c, c2, d]);
    }

    #[test]
    fn test_sorted_insert_equal_is_skipped() {
        let a = "aloft";
        let c = "cast";
        let d = "deleted";
        let e = "elate";
        let mut vector = vec![a, c, d, e];

        let result = sorted_insert_unique(&mut vector, "deleted");

        assert_eq!(result, (2, false));
        assert_eq!(vector, vec![a, c, d, e]);
    }

    #[test]
    fn test_group_indices() {
        let labels: Vec<String> = ["b", "a", "b", "c"].iter().map(|s| s.to_string()).collect();

        let groups = group_indices(&labels);

        let keys: Vec<&str> = groups.keys().copied().collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(groups["b"], vec![0, 2]);
    }
}
