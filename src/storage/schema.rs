//! Canonical JSON Schema written to `.ananke/schema.json` by `init`.

use serde_json::{Value, json};

use crate::models::{EPIC_PREFIX, MAX_PRIORITY, TASK_PREFIX};

fn id_pattern(prefix: &str) -> String {
    format!("^{}-[0-9]+$", prefix)
}

/// Schema describing the index, epic, task and blocks documents.
pub fn canonical_schema() -> Value {
    let epic_id = id_pattern(EPIC_PREFIX);
    let task_id = id_pattern(TASK_PREFIX);

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "$id": "ananke.schema.json",
        "title": "Ananke Workspace Schema",
        "type": "object",
        "additionalProperties": false,
        "required": ["index", "epic", "task", "blocks"],
        "properties": {
            "index": { "$ref": "#/$defs/index" },
            "epic": { "$ref": "#/$defs/epic" },
            "task": { "$ref": "#/$defs/task" },
            "blocks": { "$ref": "#/$defs/blocks" }
        },
        "$defs": {
            "index": {
                "type": "object",
                "additionalProperties": false,
                "required": ["next_epic", "next_task", "updated_at"],
                "properties": {
                    "next_epic": { "type": "integer", "minimum": 1 },
                    "next_task": { "type": "integer", "minimum": 1 },
                    "updated_at": { "type": "string", "format": "date-time" }
                }
            },
            "epic": {
                "type": "object",
                "required": [
                    "id", "title", "goal", "status", "constraints", "decisions",
                    "created_at", "updated_at"
                ],
                "properties": {
                    "id": { "type": "string", "pattern": epic_id },
                    "title": { "type": "string", "minLength": 1 },
                    "goal": { "type": "string", "minLength": 1 },
                    "status": { "type": "string", "enum": ["active", "paused", "done"] },
                    "constraints": { "type": "array", "items": { "type": "string", "minLength": 1 } },
                    "decisions": { "type": "array", "items": { "type": "string", "minLength": 1 } },
                    "context": { "type": "string" },
                    "digest": { "type": "string" },
                    "created_at": { "type": "string", "format": "date-time" },
                    "updated_at": { "type": "string", "format": "date-time" }
                }
            },
            "task": {
                "type": "object",
                "required": [
                    "id", "epic_id", "title", "description", "status", "priority",
                    "created_at", "updated_at"
                ],
                "properties": {
                    "id": { "type": "string", "pattern": task_id },
                    "epic_id": { "type": "string", "pattern": epic_id },
                    "title": { "type": "string", "minLength": 1 },
                    "description": { "type": "string", "minLength": 1 },
                    "status": { "type": "string", "enum": ["todo", "doing", "done"] },
                    "priority": { "type": "integer", "minimum": 0, "maximum": MAX_PRIORITY },
                    "notes": { "type": "string" },
                    "acceptance": { "type": "array", "items": { "type": "string", "minLength": 1 } },
                    "outcome_summary": { "type": "string", "minLength": 1 },
                    "created_at": { "type": "string", "format": "date-time" },
                    "updated_at": { "type": "string", "format": "date-time" }
                }
            },
            "blockEdge": {
                "type": "object",
                "additionalProperties": false,
                "required": ["from", "to"],
                "properties": {
                    "from": { "type": "string", "pattern": task_id },
                    "to": { "type": "string", "pattern": task_id }
                }
            },
            "blocks": {
                "type": "array",
                "items": { "$ref": "#/$defs/blockEdge" }
            }
        }
    })
}
