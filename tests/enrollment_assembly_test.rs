//! End-to-end enrollment assembly over in-memory collections

use async_trait::async_trait;
use oneroster::adapters::oneroster::{QueryParams, ResourceFetcher, ResourceType};
use oneroster::core::assemble::join_enrollment_rows;
use oneroster::core::EnrollmentAssembler;
use oneroster::domain::errors::OneRosterError;
use oneroster::domain::{Record, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use test_case::test_case;

/// Serves fixed collections; optionally fails one resource type
#[derive(Default)]
struct InMemoryFetcher {
    collections: HashMap<ResourceType, Vec<Record>>,
    fail_on: Option<ResourceType>,
    calls: Mutex<Vec<ResourceType>>,
}

impl InMemoryFetcher {
    fn new(enrollments: Value, classes: Value, courses: Value) -> Self {
        let mut collections = HashMap::new();
        collections.insert(ResourceType::Enrollments, records(enrollments));
        collections.insert(ResourceType::Classes, records(classes));
        collections.insert(ResourceType::Courses, records(courses));
        Self {
            collections,
            ..Self::default()
        }
    }

    fn failing_on(mut self, resource: ResourceType) -> Self {
        self.fail_on = Some(resource);
        self
    }

    fn calls(&self) -> Vec<ResourceType> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ResourceFetcher for InMemoryFetcher {
    async fn fetch_all(&self, resource: ResourceType, _params: &QueryParams) -> Result<Vec<Record>> {
        self.calls.lock().unwrap().push(resource);

        if self.fail_on == Some(resource) {
            return Err(OneRosterError::Http {
                status: 503,
                body: "unavailable".to_string(),
            }
            .into());
        }

        Ok(self.collections.get(&resource).cloned().unwrap_or_default())
    }
}

fn records(value: Value) -> Vec<Record> {
    value
        .as_array()
        .expect("array literal")
        .iter()
        .map(|item| item.as_object().cloned().expect("object literal"))
        .collect()
}

fn scenario_one() -> InMemoryFetcher {
    InMemoryFetcher::new(
        json!([{
            "sourcedId": "E1",
            "user": {"sourcedId": "U1"},
            "class": {"sourcedId": "C1"},
            "role": "student"
        }]),
        json!([{"sourcedId": "C1", "title": "Algebra", "course": {"sourcedId": "CR1"}}]),
        json!([{"sourcedId": "CR1", "title": "Math 101"}]),
    )
}

#[tokio::test]
async fn test_single_enrollment_joins_class_and_course() {
    let assembler = EnrollmentAssembler::new(scenario_one());

    let joined = assembler.get_enrollments_joined().await.unwrap();

    assert_eq!(
        serde_json::to_value(&joined).unwrap(),
        json!([{
            "sourcedId": "E1",
            "role": "student",
            "user": {"sourcedId": "U1"},
            "class": {
                "sourcedId": "C1",
                "title": "Algebra",
                "course": {"sourcedId": "CR1", "title": "Math 101"}
            }
        }])
    );
}

#[tokio::test]
async fn test_unknown_class_keeps_enrollment_reference_only() {
    let fetcher = InMemoryFetcher::new(
        json!([{
            "sourcedId": "E1",
            "user": {"sourcedId": "U1"},
            "class": {"sourcedId": "MISSING"},
            "role": "teacher"
        }]),
        json!([{"sourcedId": "C1", "title": "Algebra", "course": {"sourcedId": "CR1"}}]),
        json!([{"sourcedId": "CR1", "title": "Math 101"}]),
    );

    let joined = EnrollmentAssembler::new(fetcher)
        .get_enrollments_joined()
        .await
        .unwrap();

    assert_eq!(joined.len(), 1);
    let class = &joined[0].class;
    assert_eq!(class.sourced_id.as_ref().unwrap().as_str(), "MISSING");
    assert!(class.title.is_none());
    assert!(class.status.is_none());
    assert!(class.course.sourced_id.is_none());
    assert!(class.course.title.is_none());
}

#[tokio::test]
async fn test_empty_enrollments_yield_empty_output() {
    let fetcher = InMemoryFetcher::new(
        json!([]),
        json!([{"sourcedId": "C1", "course": {"sourcedId": "CR1"}}]),
        json!([{"sourcedId": "CR1"}]),
    );

    let joined = EnrollmentAssembler::new(fetcher)
        .get_enrollments_joined()
        .await
        .unwrap();

    assert!(joined.is_empty());
}

#[tokio::test]
async fn test_output_length_matches_enrollments() {
    let fetcher = InMemoryFetcher::new(
        json!([
            {"sourcedId": "E1", "user": {"sourcedId": "U1"}, "class": {"sourcedId": "C1"}},
            {"sourcedId": "E2", "user": {"sourcedId": "U2"}, "class": {"sourcedId": "C1"}},
            {"sourcedId": "E3", "user": {"sourcedId": "U3"}, "class": {"sourcedId": "C2"}},
            {"sourcedId": "E4", "user": {"sourcedId": "U4"}}
        ]),
        json!([
            {"sourcedId": "C1", "course": {"sourcedId": "CR1"}},
            {"sourcedId": "C2", "course": {"sourcedId": "CR9"}}
        ]),
        json!([{"sourcedId": "CR1", "title": "Math 101"}]),
    );

    let joined = EnrollmentAssembler::new(fetcher)
        .get_enrollments_joined()
        .await
        .unwrap();

    let ids: Vec<_> = joined
        .iter()
        .map(|e| e.sourced_id.as_ref().unwrap().as_str().to_string())
        .collect();
    assert_eq!(ids, vec!["E1", "E2", "E3", "E4"]);
    assert_eq!(joined[1].class.course.title.as_deref(), Some("Math 101"));
    assert!(joined[2].class.course.title.is_none());
    assert!(joined[3].class.sourced_id.is_none());
}

#[tokio::test]
async fn test_reassembly_is_identical() {
    let assembler = EnrollmentAssembler::new(scenario_one());

    let first = serde_json::to_string(&assembler.get_enrollments_joined().await.unwrap()).unwrap();
    let second = serde_json::to_string(&assembler.get_enrollments_joined().await.unwrap()).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_concurrent_fetch_matches_sequential() {
    let sequential = EnrollmentAssembler::new(scenario_one())
        .get_enrollments_joined()
        .await
        .unwrap();
    let concurrent = EnrollmentAssembler::new(scenario_one())
        .with_concurrent_fetch(true)
        .get_enrollments_joined()
        .await
        .unwrap();

    assert_eq!(sequential, concurrent);
}

#[tokio::test]
async fn test_sequential_fetch_order() {
    let assembler = EnrollmentAssembler::new(scenario_one());
    assembler.get_enrollments_joined().await.unwrap();

    assert_eq!(
        assembler.fetcher().calls(),
        vec![
            ResourceType::Enrollments,
            ResourceType::Classes,
            ResourceType::Courses
        ]
    );
}

#[test_case(ResourceType::Enrollments; "enrollments")]
#[test_case(ResourceType::Classes; "classes")]
#[test_case(ResourceType::Courses; "courses")]
#[tokio::test]
async fn test_fetch_failure_aborts_assembly(resource: ResourceType) {
    let assembler = EnrollmentAssembler::new(scenario_one().failing_on(resource));

    let err = assembler.get_enrollments_joined().await.unwrap_err();

    assert!(err.to_string().contains("503"));
    assert!(!err.is_authentication());
}

#[tokio::test]
async fn test_flat_rows_carry_prefixed_fields() {
    let rows = EnrollmentAssembler::new(scenario_one())
        .get_enrollment_rows()
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row["userSourcedId"], "U1");
    assert_eq!(row["classSourcedId"], "C1");
    assert_eq!(row["class_title"], "Algebra");
    assert_eq!(row["class_courseSourcedId"], "CR1");
    assert_eq!(row["class_course_title"], "Math 101");
    assert!(!row.contains_key("title"));
}

#[test]
fn test_join_does_not_mutate_inputs() {
    let enrollments = records(json!([{"sourcedId": "E1", "class": {"sourcedId": "C1"}}]));
    let classes = records(json!([{"sourcedId": "C1", "course": {"sourcedId": "CR1"}}]));
    let courses = records(json!([{"sourcedId": "CR1"}]));
    let before = (enrollments.clone(), classes.clone(), courses.clone());

    let _ = join_enrollment_rows(&enrollments, &classes, &courses);

    assert_eq!((enrollments, classes, courses), before);
}
