//! Left join over roster collections
//!
//! Two flavours share one implementation:
//!
//! - [`left_join`] is generic over row types, key extraction and the merge
//!   step, for callers working with typed records.
//! - [`join_records`] joins untyped [`Record`]s on named fields and embeds the
//!   matched right-hand row under a field-name prefix.
//!
//! Both keep every left row exactly once, in left order. When several right
//! rows share a key the first one (in right order) is used.

use crate::domain::Record;
use serde_json::Value;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::hash::Hash;

/// Left-join `left` with `right`
///
/// `right` is indexed once by `right_key`; each left row is then paired with
/// the right row whose key equals `left_key(row)`, or with `None` when the
/// left row has no key or nothing matches. `merge` builds one output row per
/// left row.
///
/// # Examples
///
/// ```
/// use oneroster::core::join::left_join;
///
/// let classes = vec![("C1", "CR1"), ("C2", "CR9")];
/// let courses = vec![("CR1", "Math 101")];
///
/// let joined = left_join(
///     &classes,
///     &courses,
///     |class| Some(class.1),
///     |course| Some(course.0),
///     |class, course| (class.0, course.map(|c| c.1)),
/// );
///
/// assert_eq!(joined, vec![("C1", Some("Math 101")), ("C2", None)]);
/// ```
pub fn left_join<'a, L, R, K, O, FL, FR, M>(
    left: &'a [L],
    right: &'a [R],
    left_key: FL,
    right_key: FR,
    mut merge: M,
) -> Vec<O>
where
    K: Eq + Hash,
    FL: Fn(&'a L) -> Option<K>,
    FR: Fn(&'a R) -> Option<K>,
    M: FnMut(&'a L, Option<&'a R>) -> O,
{
    let mut index: HashMap<K, &'a R> = HashMap::with_capacity(right.len());
    let mut duplicates = 0usize;

    for row in right {
        if let Some(key) = right_key(row) {
            match index.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(row);
                }
                Entry::Occupied(_) => duplicates += 1,
            }
        }
    }

    if duplicates > 0 {
        tracing::debug!(
            duplicates,
            right_rows = right.len(),
            "Right-hand rows with an already indexed key were ignored"
        );
    }

    left.iter()
        .map(|row| {
            let matched = left_key(row).and_then(|key| index.get(&key).copied());
            merge(row, matched)
        })
        .collect()
}

/// Left-join untyped records on string-valued key fields
///
/// Each output record holds every field of the left record unchanged plus
/// every field of the matched right record renamed to `prefix + name`. Keys
/// only match when both fields are JSON strings with equal contents. A
/// prefixed name that already exists on the left record keeps the left value.
///
/// # Examples
///
/// ```
/// use oneroster::core::join::join_records;
/// use serde_json::json;
///
/// let classes = vec![json!({"sourcedId": "C1", "courseSourcedId": "CR1"})
///     .as_object().unwrap().clone()];
/// let courses = vec![json!({"sourcedId": "CR1", "title": "Math 101"})
///     .as_object().unwrap().clone()];
///
/// let rows = join_records(&classes, &courses, "courseSourcedId", "sourcedId", "course_");
/// assert_eq!(rows[0]["course_title"], json!("Math 101"));
/// assert_eq!(rows[0]["sourcedId"], json!("C1"));
/// ```
pub fn join_records(
    left: &[Record],
    right: &[Record],
    left_key: &str,
    right_key: &str,
    prefix: &str,
) -> Vec<Record> {
    left_join(
        left,
        right,
        |row| string_field(row, left_key),
        |row| string_field(row, right_key),
        |row, matched| {
            let mut merged = row.clone();
            if let Some(matched) = matched {
                for (name, value) in prefix_fields(matched, prefix) {
                    merged.entry(name).or_insert(value);
                }
            }
            merged
        },
    )
}

/// Copy of `record` with every field name prefixed
pub fn prefix_fields(record: &Record, prefix: &str) -> Record {
    record
        .iter()
        .map(|(name, value)| (format!("{prefix}{name}"), value.clone()))
        .collect()
}

fn string_field<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    record.get(field).and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().expect("object literal")
    }

    fn classes() -> Vec<Record> {
        vec![
            record(json!({"sourcedId": "C1", "title": "Algebra", "courseSourcedId": "CR1"})),
            record(json!({"sourcedId": "C2", "title": "Biology", "courseSourcedId": "CR2"})),
            record(json!({"sourcedId": "C3", "title": "Orphan", "courseSourcedId": "CR404"})),
        ]
    }

    fn courses() -> Vec<Record> {
        vec![
            record(json!({"sourcedId": "CR2", "title": "Life Science", "status": "active"})),
            record(json!({"sourcedId": "CR1", "title": "Math 101"})),
        ]
    }

    #[test]
    fn test_output_length_and_order_follow_left() {
        let rows = join_records(&classes(), &courses(), "courseSourcedId", "sourcedId", "course_");

        assert_eq!(rows.len(), 3);
        let ids: Vec<_> = rows.iter().map(|r| r["sourcedId"].clone()).collect();
        assert_eq!(ids, vec![json!("C1"), json!("C2"), json!("C3")]);
    }

    #[test]
    fn test_left_fields_preserved() {
        let left = classes();
        let rows = join_records(&left, &courses(), "courseSourcedId", "sourcedId", "course_");

        for (original, joined) in left.iter().zip(&rows) {
            for (name, value) in original {
                assert_eq!(joined.get(name), Some(value), "field {name} changed");
            }
        }
    }

    #[test]
    fn test_right_fields_only_appear_prefixed() {
        let rows = join_records(&classes(), &courses(), "courseSourcedId", "sourcedId", "course_");
        let biology = &rows[1];

        assert_eq!(biology["course_sourcedId"], json!("CR2"));
        assert_eq!(biology["course_title"], json!("Life Science"));
        assert_eq!(biology["course_status"], json!("active"));
        // Unprefixed `status` only exists on the course, so it must not leak in
        assert!(biology.get("status").is_none());
        // Left `title` wins over nothing; course title is only under the prefix
        assert_eq!(biology["title"], json!("Biology"));
    }

    #[test]
    fn test_unmatched_row_kept_without_prefixed_fields() {
        let rows = join_records(&classes(), &courses(), "courseSourcedId", "sourcedId", "course_");
        let orphan = &rows[2];

        assert_eq!(orphan["sourcedId"], json!("C3"));
        assert!(orphan.keys().all(|k| !k.starts_with("course_")));
        assert_eq!(orphan.len(), classes()[2].len());
    }

    #[test]
    fn test_first_right_match_wins() {
        let right = vec![
            record(json!({"sourcedId": "CR1", "title": "first"})),
            record(json!({"sourcedId": "CR1", "title": "second"})),
        ];
        let left = vec![record(json!({"courseSourcedId": "CR1"}))];

        let rows = join_records(&left, &right, "courseSourcedId", "sourcedId", "course_");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["course_title"], json!("first"));
    }

    #[test]
    fn test_non_string_keys_never_match() {
        let left = vec![
            record(json!({"k": 1})),
            record(json!({"k": null})),
            record(json!({"other": "x"})),
        ];
        let right = vec![
            record(json!({"id": 1, "v": "number"})),
            record(json!({"id": null, "v": "null"})),
        ];

        let rows = join_records(&left, &right, "k", "id", "r_");

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.get("r_v").is_none()));
    }

    #[test]
    fn test_existing_prefixed_left_field_is_kept() {
        let left = vec![record(json!({"key": "A", "x_title": "left"}))];
        let right = vec![record(json!({"key": "A", "title": "right"}))];

        let rows = join_records(&left, &right, "key", "key", "x_");

        assert_eq!(rows[0]["x_title"], json!("left"));
        assert_eq!(rows[0]["x_key"], json!("A"));
    }

    #[test]
    fn test_inputs_not_mutated() {
        let left = classes();
        let right = courses();
        let (left_before, right_before) = (left.clone(), right.clone());

        let _ = join_records(&left, &right, "courseSourcedId", "sourcedId", "course_");

        assert_eq!(left, left_before);
        assert_eq!(right, right_before);
    }

    #[test]
    fn test_empty_left_yields_empty_output() {
        let rows = join_records(&[], &courses(), "courseSourcedId", "sourcedId", "course_");
        assert!(rows.is_empty());
    }

    #[test]
    fn test_empty_right_keeps_all_left_rows() {
        let rows = join_records(&classes(), &[], "courseSourcedId", "sourcedId", "course_");
        assert_eq!(rows, classes());
    }

    #[test]
    fn test_typed_left_join() {
        let left = [1u32, 2, 3, 2];
        let right = [(2u32, "two"), (3, "three"), (3, "trois")];

        let joined = left_join(
            &left,
            &right,
            |n| Some(*n),
            |(n, _)| Some(*n),
            |n, m| (*n, m.map(|(_, name)| *name)),
        );

        assert_eq!(
            joined,
            vec![(1, None), (2, Some("two")), (3, Some("three")), (2, Some("two"))]
        );
    }

    #[test]
    fn test_typed_left_join_without_left_key() {
        let left = [Some("a"), None];
        let right = ["a"];

        let joined = left_join(&left, &right, |k| *k, |r| Some(*r), |_, m| m.is_some());

        assert_eq!(joined, vec![true, false]);
    }

    #[test]
    fn test_prefix_fields() {
        let prefixed = prefix_fields(&record(json!({"a": 1, "b": {"c": 2}})), "p_");

        assert_eq!(Value::Object(prefixed), json!({"p_a": 1, "p_b": {"c": 2}}));
    }
}
