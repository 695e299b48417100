use serde::{Deserialize, Serialize};

/// Named node in the group hierarchy. `parent_id` is self-referential and
/// nullable; the parent graph must stay acyclic (enforced by the store's
/// update path, not left to the UI).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// Sibling ordering key.
    pub sort_order: i32,
    pub created_at: String,
}

#[derive(Debug, Clone, Default)]
pub struct NewGroup {
    pub name: String,
    pub parent_id: Option<String>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort_order: i32,
}

/// Sparse update for a group. `parent_id` distinguishes "leave alone"
/// (`None`) from "move to top level" (`Some(None)`).
#[derive(Debug, Clone, Default)]
pub struct GroupChanges {
    pub name: Option<String>,
    pub parent_id: Option<Option<String>>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub sort_order: Option<i32>,
}

impl GroupChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.parent_id.is_none()
            && self.icon.is_none()
            && self.color.is_none()
            && self.sort_order.is_none()
    }
}
