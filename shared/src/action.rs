//! Structured actions the app executes locally.
//!
//! The model is asked to embed one of these as a JSON object in its reply.
//! Extraction produces a generic JSON object first (see [`crate::extract`]);
//! that object is then decoded into a typed variant here.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A command for the app, tagged by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    #[serde(rename_all = "camelCase")]
    AddAssignment {
        student_name: String,
        subject_name: String,
        name: String,
        due_date: NaiveDate,
    },
    #[serde(rename_all = "camelCase")]
    AddStudent {
        name: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        age: Option<u32>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        grade_level: Option<String>,
    },
    AddSubject {
        name: String,
    },
    SetTeacherMood {
        /// One of the supported mood emoji, or null to clear
        mood: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    CompleteAssignment {
        assignment_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        grade: Option<f64>,
    },
    #[serde(rename_all = "camelCase")]
    DeleteAssignment {
        assignment_id: String,
    },
}

impl Action {
    /// Decode an extracted JSON object into a typed action.
    ///
    /// The object must already carry a `"type"` tag (extraction guarantees
    /// this). Unknown tags or invalid fields are decode errors.
    pub fn from_extracted(object: Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(object))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(json: &str) -> Map<String, Value> {
        match serde_json::from_str(json).unwrap() {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_add_assignment() {
        let action = Action::from_extracted(object(
            r#"{"type": "add_assignment", "studentName": "William", "subjectName": "Math",
                "name": "Chapter 5 Review", "dueDate": "2025-06-11"}"#,
        ))
        .unwrap();

        assert_eq!(
            action,
            Action::AddAssignment {
                student_name: "William".to_string(),
                subject_name: "Math".to_string(),
                name: "Chapter 5 Review".to_string(),
                due_date: NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
            }
        );
    }

    #[test]
    fn test_decode_add_student_with_optional_fields_missing() {
        let action =
            Action::from_extracted(object(r#"{"type": "add_student", "name": "Emma"}"#)).unwrap();
        assert_eq!(
            action,
            Action::AddStudent {
                name: "Emma".to_string(),
                age: None,
                grade_level: None,
            }
        );
    }

    #[test]
    fn test_decode_set_teacher_mood_null_clears() {
        let action =
            Action::from_extracted(object(r#"{"type": "set_teacher_mood", "mood": null}"#)).unwrap();
        assert_eq!(action, Action::SetTeacherMood { mood: None });
    }

    #[test]
    fn test_decode_ignores_extra_fields() {
        let action = Action::from_extracted(object(
            r#"{"type": "add_subject", "name": "Latin", "note": "model chatter"}"#,
        ))
        .unwrap();
        assert_eq!(action, Action::AddSubject { name: "Latin".to_string() });
    }

    #[test]
    fn test_decode_unknown_type_fails() {
        let result = Action::from_extracted(object(r#"{"type": "launch_rocket"}"#));
        assert!(result.is_err());
    }

    #[test]
    fn test_decode_bad_due_date_fails() {
        let result = Action::from_extracted(object(
            r#"{"type": "add_assignment", "studentName": "W", "subjectName": "Math",
                "name": "Review", "dueDate": "tomorrow"}"#,
        ));
        assert!(result.is_err());
    }

    #[test]
    fn test_roundtrip_keeps_wire_shape() {
        let action = Action::CompleteAssignment {
            assignment_id: "abc123".to_string(),
            grade: Some(95.0),
        };
        let json = serde_json::to_value(&action).unwrap();
        assert_eq!(json["type"], "complete_assignment");
        assert_eq!(json["assignmentId"], "abc123");
        assert_eq!(json["grade"], 95.0);
    }
}
