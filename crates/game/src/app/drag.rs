use engine::{Rect, Vector};
use tracing::debug;

use super::entity::EntityId;

/// How the grabbed entity sits under the pointer while dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GrabMode {
    /// Keeps the point that was pressed under the pointer.
    KeepOffset,
    /// Centers the entity on the pointer.
    Centered,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DragState {
    Idle,
    Dragging { entity: EntityId, grab_offset: Vector },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DropOutcome {
    Match,
    Miss,
}

/// Press, drag, release lifecycle for one scene. At most one entity is dragged at a time.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DragController {
    state: DragState,
}

impl Default for DragController {
    fn default() -> Self {
        Self::new()
    }
}

impl DragController {
    pub(crate) fn new() -> Self {
        Self {
            state: DragState::Idle,
        }
    }

    pub(crate) fn state(&self) -> DragState {
        self.state
    }

    pub(crate) fn dragged(&self) -> Option<EntityId> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { entity, .. } => Some(entity),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_dragging(&self, entity: EntityId) -> bool {
        self.dragged() == Some(entity)
    }

    /// Starts a drag on the first candidate, which callers order topmost first.
    /// Ignored while another drag is active or when nothing is under the pointer.
    pub(crate) fn press(
        &mut self,
        candidates: &[(EntityId, Rect, GrabMode)],
        cursor: Vector,
    ) -> Option<EntityId> {
        if self.dragged().is_some() {
            return None;
        }
        let (entity, rect, mode) = candidates
            .iter()
            .copied()
            .find(|(_, rect, _)| rect.contains(cursor))?;
        let grab_offset = match mode {
            GrabMode::KeepOffset => cursor - rect.pos,
            GrabMode::Centered => Vector::new(rect.width / 2, rect.height / 2),
        };
        self.state = DragState::Dragging {
            entity,
            grab_offset,
        };
        debug!(entity = entity.0, "drag_started");
        Some(entity)
    }

    /// Top-left position of the dragged entity for this cursor position.
    pub(crate) fn drag_position(&self, cursor: Vector) -> Option<Vector> {
        match self.state {
            DragState::Idle => None,
            DragState::Dragging { grab_offset, .. } => Some(cursor - grab_offset),
        }
    }

    pub(crate) fn release(&mut self) -> Option<EntityId> {
        let entity = self.dragged()?;
        self.state = DragState::Idle;
        debug!(entity = entity.0, "drag_released");
        Some(entity)
    }

    /// Drops the active drag without reporting it.
    pub(crate) fn cancel(&mut self) {
        self.state = DragState::Idle;
    }
}

/// A drop matches when the tile overlaps the zone and its face is the expected answer.
pub(crate) fn evaluate_drop(tile: &Rect, zone: &Rect, face_matches: bool) -> DropOutcome {
    if face_matches && tile.overlaps(zone) {
        DropOutcome::Match
    } else {
        DropOutcome::Miss
    }
}
