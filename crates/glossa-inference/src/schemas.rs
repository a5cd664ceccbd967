//! JSON schemas sent with each phase's model request.
//!
//! These are fixed wire artifacts for the endpoint's strict json_schema
//! mode; the parser in [`crate::parser`] re-validates whatever comes back.

use serde_json::{json, Value};

/// Schema name for the note-creation phase.
pub const NOTES_SCHEMA_NAME: &str = "transcript_notes";

/// Schema name for the line-assignment phase.
pub const ASSIGNMENTS_SCHEMA_NAME: &str = "note_line_assignments";

/// Schema for the note-creation response: an object with a `notes` array.
pub fn notes_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "notes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "title": { "type": "string" },
                        "answer_1": { "type": "string" },
                        "answer_2": { "type": "string" },
                        "answer_3": { "type": "string" }
                    },
                    "required": ["title", "answer_1", "answer_2", "answer_3"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["notes"],
        "additionalProperties": false
    })
}

/// Schema for the line-assignment response: an object with an `assignments`
/// array of line citations.
pub fn assignments_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "assignments": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "line_number": { "type": "integer", "minimum": 1 },
                        "speaker": { "type": "string" },
                        "utterance": { "type": "string" }
                    },
                    "required": ["line_number"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["assignments"],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notes_schema_shape() {
        let schema = notes_schema();
        assert_eq!(schema["type"], "object");
        let required = schema["properties"]["notes"]["items"]["required"]
            .as_array()
            .unwrap();
        assert_eq!(required.len(), 4);
    }

    #[test]
    fn test_assignments_schema_shape() {
        let schema = assignments_schema();
        let item = &schema["properties"]["assignments"]["items"];
        assert_eq!(item["properties"]["line_number"]["minimum"], 1);
        assert_eq!(item["required"].as_array().unwrap().len(), 1);
    }
}
