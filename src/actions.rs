// src/actions.rs
//
// Discrete replication actions and the wire command sent to the
// controller. A policy emits one integer action id per tick; the codec
// decodes it into an ActionSlot, and a naming scheme (static catalog or
// per-tick registry) resolves the slot into a ReplicationCommand.

use serde::{Deserialize, Serialize};

/// Replication operation kind.
///
/// Serialized in the controller's wire format ("REPLICATE" / "EVICT").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionKind {
    Replicate,
    Evict,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Replicate => "REPLICATE",
            ActionKind::Evict => "EVICT",
        }
    }
}

/// Decoded (operation, key slot, node slot) triple.
///
/// Slot indices live in the codec's capacity space. An index can point
/// past the live registry for the current tick; that means "no
/// corresponding live entity" and resolution yields no command, it is
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionSlot {
    pub kind: ActionKind,
    pub key_index: usize,
    pub node_index: usize,
}

/// Concrete command dispatched to the controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplicationCommand {
    #[serde(rename = "actionType")]
    pub action_type: ActionKind,
    pub key: String,
    #[serde(rename = "targetNode")]
    pub target_node: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_serializes_to_controller_wire_format() {
        let cmd = ReplicationCommand {
            action_type: ActionKind::Replicate,
            key: "user_profile_3".to_string(),
            target_node: "replication-eu".to_string(),
        };

        let json = serde_json::to_value(&cmd).unwrap();
        assert_eq!(json["actionType"], "REPLICATE");
        assert_eq!(json["key"], "user_profile_3");
        assert_eq!(json["targetNode"], "replication-eu");
    }

    #[test]
    fn action_kind_roundtrips() {
        for kind in [ActionKind::Replicate, ActionKind::Evict] {
            let json = serde_json::to_string(&kind).unwrap();
            let back: ActionKind = serde_json::from_str(&json).unwrap();
            assert_eq!(kind, back);
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }
}
