//! Enrollment assembly
//!
//! Rebuilds enrollments with their class and course embedded from three
//! independently fetched collections:
//!
//! 1. fetch enrollments, classes and courses in full
//! 2. derive `userSourcedId` / `classSourcedId` on each enrollment
//! 3. derive `courseSourcedId` on each class
//! 4. join classes with courses (`course_` prefix)
//! 5. join enrollments with the result (`class_` prefix)
//! 6. reshape each flat row into a [`JoinedEnrollment`]
//!
//! Unresolved references never fail the assembly; the affected nested
//! fields are simply absent.

use crate::adapters::oneroster::{QueryParams, ResourceFetcher, ResourceType};
use crate::core::join::join_records;
use crate::domain::{JoinedClass, JoinedCourse, JoinedEnrollment, JoinedUser, Record, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Instant;

/// Derived enrollment field holding `user.sourcedId`
pub const USER_KEY: &str = "userSourcedId";
/// Derived enrollment field holding `class.sourcedId`
pub const CLASS_KEY: &str = "classSourcedId";
/// Derived class field holding `course.sourcedId`
pub const COURSE_KEY: &str = "courseSourcedId";
/// Prefix applied to course fields joined onto a class
pub const COURSE_PREFIX: &str = "course_";
/// Prefix applied to class fields joined onto an enrollment
pub const CLASS_PREFIX: &str = "class_";

const SOURCED_ID: &str = "sourcedId";

/// The three collections one assembly works from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RosterSnapshot {
    pub enrollments: Vec<Record>,
    pub classes: Vec<Record>,
    pub courses: Vec<Record>,
}

/// Orchestrates fetch, join and reshape of enrollments
///
/// # Example
///
/// ```no_run
/// use oneroster::adapters::oneroster::OneRosterClient;
/// use oneroster::config::ProviderConfig;
/// use oneroster::core::assemble::EnrollmentAssembler;
///
/// # async fn example() -> oneroster::domain::Result<()> {
/// let client = OneRosterClient::connect(ProviderConfig::default()).await?;
/// let assembler = EnrollmentAssembler::new(client);
///
/// for enrollment in assembler.get_enrollments_joined().await? {
///     println!("{:?} -> {:?}", enrollment.sourced_id, enrollment.class.title);
/// }
/// # Ok(())
/// # }
/// ```
pub struct EnrollmentAssembler<F> {
    fetcher: F,
    concurrent_fetch: bool,
}

impl<F: ResourceFetcher> EnrollmentAssembler<F> {
    /// Create an assembler that fetches sequentially
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            concurrent_fetch: false,
        }
    }

    /// Fetch the three collections concurrently instead of one after another
    ///
    /// The output is identical either way.
    pub fn with_concurrent_fetch(mut self, enabled: bool) -> Self {
        self.concurrent_fetch = enabled;
        self
    }

    /// Get a reference to the underlying fetcher
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch enrollments, classes and courses
    ///
    /// # Errors
    ///
    /// Returns the first fetch failure; nothing is returned for the other
    /// collections in that case.
    pub async fn fetch_snapshot(&self) -> Result<RosterSnapshot> {
        let params = QueryParams::default();

        let (enrollments, classes, courses) = if self.concurrent_fetch {
            tokio::try_join!(
                self.fetcher.fetch_all(ResourceType::Enrollments, &params),
                self.fetcher.fetch_all(ResourceType::Classes, &params),
                self.fetcher.fetch_all(ResourceType::Courses, &params),
            )?
        } else {
            let enrollments = self
                .fetcher
                .fetch_all(ResourceType::Enrollments, &params)
                .await?;
            let classes = self
                .fetcher
                .fetch_all(ResourceType::Classes, &params)
                .await?;
            let courses = self
                .fetcher
                .fetch_all(ResourceType::Courses, &params)
                .await?;
            (enrollments, classes, courses)
        };

        Ok(RosterSnapshot {
            enrollments,
            classes,
            courses,
        })
    }

    /// Flat joined rows (enrollment fields, `class_*` and `class_course_*`)
    pub async fn get_enrollment_rows(&self) -> Result<Vec<Record>> {
        let snapshot = self.fetch_snapshot().await?;
        Ok(join_snapshot(&snapshot))
    }

    /// Enrollments with class and course details embedded
    ///
    /// # Errors
    ///
    /// Fails when any of the three fetches fails, including authentication
    /// failures raised before a request is sent.
    pub async fn get_enrollments_joined(&self) -> Result<Vec<JoinedEnrollment>> {
        let snapshot = self.fetch_snapshot().await?;
        Ok(assemble_enrollments(&snapshot))
    }
}

/// Join a snapshot into flat rows
pub fn join_snapshot(snapshot: &RosterSnapshot) -> Vec<Record> {
    join_enrollment_rows(
        &snapshot.enrollments,
        &snapshot.classes,
        &snapshot.courses,
    )
}

/// Join and reshape a snapshot into [`JoinedEnrollment`]s
pub fn assemble_enrollments(snapshot: &RosterSnapshot) -> Vec<JoinedEnrollment> {
    let started = Instant::now();
    let rows = join_snapshot(snapshot);

    let unresolved_classes = rows
        .iter()
        .filter(|row| !row.contains_key("class_sourcedId"))
        .count();
    let joined: Vec<JoinedEnrollment> = rows.iter().map(reshape_row).collect();

    tracing::info!(
        enrollments = snapshot.enrollments.len(),
        classes = snapshot.classes.len(),
        courses = snapshot.courses.len(),
        unresolved_classes,
        duration_ms = started.elapsed().as_millis() as u64,
        "Assembled joined enrollments"
    );

    joined
}

/// Steps 2–5: derive keys and run both joins
pub fn join_enrollment_rows(
    enrollments: &[Record],
    classes: &[Record],
    courses: &[Record],
) -> Vec<Record> {
    let enrollments: Vec<Record> = enrollments.iter().map(derive_enrollment_keys).collect();
    let classes: Vec<Record> = classes.iter().map(derive_class_keys).collect();

    let classes_with_courses = join_records(&classes, courses, COURSE_KEY, SOURCED_ID, COURSE_PREFIX);

    join_records(
        &enrollments,
        &classes_with_courses,
        CLASS_KEY,
        SOURCED_ID,
        CLASS_PREFIX,
    )
}

/// Copy of an enrollment with `userSourcedId` and `classSourcedId` added
pub fn derive_enrollment_keys(enrollment: &Record) -> Record {
    let mut row = enrollment.clone();
    row.insert(USER_KEY.to_string(), nested_sourced_id(enrollment, "user"));
    row.insert(CLASS_KEY.to_string(), nested_sourced_id(enrollment, "class"));
    row
}

/// Copy of a class with `courseSourcedId` added
pub fn derive_class_keys(class: &Record) -> Record {
    let mut row = class.clone();
    row.insert(COURSE_KEY.to_string(), nested_sourced_id(class, "course"));
    row
}

fn nested_sourced_id(record: &Record, field: &str) -> Value {
    record
        .get(field)
        .and_then(|reference| reference.get(SOURCED_ID))
        .cloned()
        .unwrap_or(Value::Null)
}

/// Step 6: rebuild the nested enrollment shape from a flat joined row
pub fn reshape_row(row: &Record) -> JoinedEnrollment {
    JoinedEnrollment {
        sourced_id: read(row, &["sourcedId"]),
        date_last_modified: read(row, &["dateLastModified"]),
        role: read(row, &["role"]),
        school: read(row, &["school"]),
        status: read(row, &["status"]),
        user: JoinedUser {
            sourced_id: read(row, &[USER_KEY]),
        },
        class: JoinedClass {
            sourced_id: read(row, &[CLASS_KEY]),
            code: read(row, &["class_code", "class_classCode"]),
            class_type: read(row, &["class_type", "class_classType"]),
            date_last_modified: read(row, &["class_dateLastModified"]),
            grades: read(row, &["class_grades"]),
            school: read(row, &["class_school"]),
            status: read(row, &["class_status"]),
            subjects: read(row, &["class_subjects"]),
            terms: read(row, &["class_terms"]),
            title: read(row, &["class_title"]),
            course: JoinedCourse {
                sourced_id: read(row, &["class_course_sourcedId"]),
                code: read(row, &["class_course_code", "class_course_courseCode"]),
                date_last_modified: read(row, &["class_course_dateLastModified"]),
                org: read(row, &["class_course_org"]),
                status: read(row, &["class_course_status"]),
                subjects: read(row, &["class_course_subjects"]),
                title: read(row, &["class_course_title"]),
            },
        },
    }
}

/// First non-null field among `fields`, decoded as `T`
///
/// A value of the wrong shape counts as absent.
fn read<T: DeserializeOwned>(row: &Record, fields: &[&str]) -> Option<T> {
    let (field, value) = fields.iter().find_map(|field| {
        row.get(*field)
            .filter(|value| !value.is_null())
            .map(|value| (*field, value))
    })?;

    match serde_json::from_value(value.clone()) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            tracing::warn!(
                field,
                sourced_id = ?row.get(SOURCED_ID),
                error = %e,
                "Ignoring roster field with unexpected shape"
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().expect("object literal")
    }

    #[test]
    fn test_derive_enrollment_keys() {
        let enrollment = record(json!({
            "sourcedId": "E1",
            "user": {"sourcedId": "U1", "type": "user"},
            "class": {"sourcedId": "C1"}
        }));

        let row = derive_enrollment_keys(&enrollment);

        assert_eq!(row[USER_KEY], json!("U1"));
        assert_eq!(row[CLASS_KEY], json!("C1"));
        // originals kept
        assert_eq!(row["user"], enrollment["user"]);
        assert_eq!(row["class"], enrollment["class"]);
    }

    #[test]
    fn test_derive_keys_missing_reference_is_null() {
        let row = derive_enrollment_keys(&record(json!({"sourcedId": "E1"})));
        assert_eq!(row[USER_KEY], Value::Null);
        assert_eq!(row[CLASS_KEY], Value::Null);

        let row = derive_class_keys(&record(json!({"sourcedId": "C1", "course": "CR1"})));
        assert_eq!(row[COURSE_KEY], Value::Null);
    }

    #[test]
    fn test_join_rows_carry_double_prefixed_course_fields() {
        let rows = join_enrollment_rows(
            &[record(json!({"sourcedId": "E1", "class": {"sourcedId": "C1"}}))],
            &[record(json!({"sourcedId": "C1", "title": "Algebra", "course": {"sourcedId": "CR1"}}))],
            &[record(json!({"sourcedId": "CR1", "title": "Math 101"}))],
        );

        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row["class_title"], json!("Algebra"));
        assert_eq!(row["class_courseSourcedId"], json!("CR1"));
        assert_eq!(row["class_course_title"], json!("Math 101"));
        assert_eq!(row["class_course_sourcedId"], json!("CR1"));
    }

    #[test]
    fn test_reshape_reads_wire_aliases() {
        let row = record(json!({
            "sourcedId": "E1",
            "classSourcedId": "C1",
            "class_classCode": "ALG",
            "class_classType": "homeroom",
            "class_course_courseCode": "M101"
        }));

        let joined = reshape_row(&row);

        assert_eq!(joined.class.code.as_deref(), Some("ALG"));
        assert_eq!(joined.class.class_type.as_deref(), Some("homeroom"));
        assert_eq!(joined.class.course.code.as_deref(), Some("M101"));
    }

    #[test]
    fn test_reshape_ignores_wrongly_shaped_values() {
        let row = record(json!({
            "sourcedId": "E1",
            "school": "not-a-reference",
            "classSourcedId": "C1",
            "class_grades": "09",
            "class_title": "Algebra"
        }));

        let joined = reshape_row(&row);

        assert!(joined.school.is_none());
        assert!(joined.class.grades.is_none());
        assert_eq!(joined.class.title.as_deref(), Some("Algebra"));
    }

    #[test]
    fn test_reshape_unresolved_class_keeps_reference_id() {
        let rows = join_enrollment_rows(
            &[record(json!({
                "sourcedId": "E1",
                "role": "teacher",
                "user": {"sourcedId": "U1"},
                "class": {"sourcedId": "C404"}
            }))],
            &[record(json!({"sourcedId": "C1", "title": "Algebra"}))],
            &[],
        );

        let joined = reshape_row(&rows[0]);

        assert_eq!(joined.class.sourced_id.as_ref().map(|s| s.as_str()), Some("C404"));
        assert_eq!(joined.class, JoinedClass {
            sourced_id: joined.class.sourced_id.clone(),
            ..Default::default()
        });
        assert_eq!(joined.user.sourced_id.as_ref().map(|s| s.as_str()), Some("U1"));
        assert_eq!(joined.role.as_deref(), Some("teacher"));
    }
}
