// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

/// Merge two attribute maps, `overlay` winning on key collisions.
///
/// # Example
///
/// ```rust
/// use std::collections::HashMap;
/// use omi_node::utils::merge_attributes;
///
/// let base = HashMap::from([
///     ("unit".to_string(), "C".to_string()),
///     ("source".to_string(), "a".to_string()),
/// ]);
/// let overlay = HashMap::from([("source".to_string(), "b".to_string())]);
///
/// let merged = merge_attributes(&base, &overlay);
///
/// assert_eq!(merged.get("unit"), Some(&"C".to_string()));
/// assert_eq!(merged.get("source"), Some(&"b".to_string()));
/// ```
pub fn merge_attributes(
    base: &HashMap<String, String>,
    overlay: &HashMap<String, String>,
) -> HashMap<String, String> {
    let mut merged = base.clone();
    for (key, value) in overlay {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Concatenate `right` onto `left`, skipping elements already present.
///
/// Order is preserved: everything from `left` first, then the new elements
/// of `right` in their original order.
pub fn union_distinct<T: Clone + PartialEq>(left: &[T], right: &[T]) -> Vec<T> {
    let mut merged = left.to_vec();
    for item in right {
        if !merged.contains(item) {
            merged.push(item.clone());
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_attributes_right_precedence() {
        let base = HashMap::from([("a".to_string(), "1".to_string())]);
        let overlay = HashMap::from([
            ("a".to_string(), "2".to_string()),
            ("b".to_string(), "3".to_string()),
        ]);
        let merged = merge_attributes(&base, &overlay);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["a"], "2");
        assert_eq!(merged["b"], "3");
    }

    #[test]
    fn test_union_distinct_suppresses_duplicates() {
        let merged = union_distinct(&[1, 2, 3], &[3, 4, 1, 5]);
        assert_eq!(merged, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_union_distinct_with_empty_sides() {
        let empty: Vec<i32> = vec![];
        assert_eq!(union_distinct(&empty, &[1]), vec![1]);
        assert_eq!(union_distinct(&[1], &empty), vec![1]);
    }
}
