//! Command implementations for the ananke CLI.
//!
//! Each handler takes the workspace root plus already-parsed arguments, opens
//! [`Storage`](crate::storage::Storage), and returns a typed result that knows
//! how to render itself. Commands are organized by entity type:
//! - `init` - Scaffold the workspace
//! - `epic` - Epic create/show/update
//! - `task` - Task create/show/update/close
//! - `dep` - Blocks edges
//! - `ready` - Ready queue
//! - `pack` - Context packs

mod dep;
mod epic;
mod init;
mod pack;
mod ready;
mod task;

pub use dep::{DepAdded, DepRemoved, dep_add, dep_rm};
pub use epic::{EpicCreated, EpicPatch, EpicShown, EpicUpdated, epic_create, epic_show, epic_update};
pub use init::{InitResult, init};
pub use pack::{PackResult, pack};
pub use ready::{ReadyResult, ready};
pub use task::{TaskCreated, TaskMutated, TaskPatch, TaskShown, task_close, task_create, task_show, task_update};

use serde::Serialize;
use serde_json::json;

use crate::Error;

/// Command results that can be rendered as a JSON envelope or for humans.
pub trait Output: Serialize {
    /// One-line summary; the envelope `message`.
    fn message(&self) -> String;

    /// Human-readable body printed after the message. Empty for none.
    fn to_human(&self) -> String;

    /// `{"ok": true, "message": ..., "data": ...}`, pretty-printed.
    fn to_json(&self) -> String {
        let envelope = SuccessEnvelope {
            ok: true,
            message: self.message(),
            data: self,
        };
        serde_json::to_string_pretty(&envelope)
            .unwrap_or_else(|e| failure_json(&Error::Json(e)))
    }
}

#[derive(Serialize)]
struct SuccessEnvelope<'a, T: Serialize + ?Sized> {
    ok: bool,
    message: String,
    data: &'a T,
}

/// `{"ok": false, "error": {"code": ..., "message": ...}}`, pretty-printed.
pub fn failure_json(error: &Error) -> String {
    let envelope = json!({
        "ok": false,
        "error": {
            "code": error.code(),
            "message": error.to_string(),
        }
    });
    // A Value built from strings always serializes.
    serde_json::to_string_pretty(&envelope).unwrap_or_default()
}

/// Human-readable failure line.
pub fn failure_human(error: &Error) -> String {
    format!("Error ({}): {}", error.code(), error)
}

/// Append values not already in `target`, preserving order. Returns how many
/// were added.
pub(crate) fn append_unique(target: &mut Vec<String>, incoming: Vec<String>) -> usize {
    let mut added = 0;
    for value in incoming {
        if !target.contains(&value) {
            target.push(value);
            added += 1;
        }
    }
    added
}

/// Overwrite `slot` with `value` when given and different.
pub(crate) fn assign_if_changed<T: PartialEq>(slot: &mut T, value: Option<T>) -> bool {
    match value {
        Some(value) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}

/// As [`assign_if_changed`] for optional fields.
pub(crate) fn assign_optional_if_changed<T: PartialEq>(
    slot: &mut Option<T>,
    value: Option<T>,
) -> bool {
    match value {
        Some(value) if slot.as_ref() != Some(&value) => {
            *slot = Some(value);
            true
        }
        _ => false,
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("  - {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Sample {
        value: u8,
    }

    impl Output for Sample {
        fn message(&self) -> String {
            format!("Sample {}", self.value)
        }

        fn to_human(&self) -> String {
            String::new()
        }
    }

    #[test]
    fn test_success_envelope_shape() {
        let json: serde_json::Value = serde_json::from_str(&Sample { value: 3 }.to_json()).unwrap();
        assert_eq!(json["ok"], true);
        assert_eq!(json["message"], "Sample 3");
        assert_eq!(json["data"]["value"], 3);
    }

    #[test]
    fn test_failure_envelope_shape() {
        let err = Error::NotFound("Task not found: TSK-009".into());
        let json: serde_json::Value = serde_json::from_str(&failure_json(&err)).unwrap();
        assert_eq!(json["ok"], false);
        assert_eq!(json["error"]["code"], "NOT_FOUND");
        assert_eq!(json["error"]["message"], "Task not found: TSK-009");
        assert_eq!(failure_human(&err), "Error (NOT_FOUND): Task not found: TSK-009");
    }

    #[test]
    fn test_append_unique() {
        let mut target = vec!["a".to_string()];
        let added = append_unique(
            &mut target,
            vec!["a".into(), "b".into(), "b".into(), "c".into()],
        );
        assert_eq!(added, 2);
        assert_eq!(target, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_assign_if_changed() {
        let mut title = "old".to_string();
        assert!(!assign_if_changed(&mut title, None));
        assert!(!assign_if_changed(&mut title, Some("old".to_string())));
        assert!(assign_if_changed(&mut title, Some("new".to_string())));
        assert_eq!(title, "new");

        let mut notes: Option<String> = None;
        assert!(assign_optional_if_changed(&mut notes, Some("n".into())));
        assert!(!assign_optional_if_changed(&mut notes, Some("n".into())));
    }
}
