//! Tile rounds shared by the transcription and translation scenes.

use engine::{InputSnapshot, Rect, Vector};
use tracing::debug;

use super::{apply_shared, SceneCommand, SceneId, Stage};
use crate::app::drag::{evaluate_drop, DropOutcome};
use crate::app::entity::{EntityEvent, EntityId, PuzzleView, Role, Sprite, LAYER_TILES};
use crate::app::puzzle::{Advance, CodonPuzzle, MatchOutcome, PuzzleKind, TILE_COUNT};
use crate::app::state::GameState;

pub(crate) const TILE_SLOTS: [Vector; TILE_COUNT] = [
    Vector::new(50, 150),
    Vector::new(350, 150),
    Vector::new(650, 150),
];
pub(crate) const TILE_WIDTH: i32 = 192;
pub(crate) const TILE_HEIGHT: i32 = 111;

/// The three draggable tiles of a puzzle scene and the mover they are dropped on.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TileBench {
    kind: PuzzleKind,
    tiles: [EntityId; TILE_COUNT],
    zone: EntityId,
}

impl TileBench {
    /// One tile per slot, showing the puzzle's current round.
    pub(crate) fn spawn(stage: &mut Stage, puzzle: &CodonPuzzle, zone: EntityId) -> Self {
        let image = stage.art().codon_button.clone();
        let round = *puzzle.round();
        let kind = puzzle.kind();
        let tiles = [0, 1, 2].map(|slot| {
            let face = round[slot];
            let role = match kind {
                PuzzleKind::Transcription => Role::CodonTile { face },
                PuzzleKind::Translation => Role::TransferRna { face },
            };
            let pos = TILE_SLOTS[slot];
            let rect = Rect::new(pos.x, pos.y, TILE_WIDTH, TILE_HEIGHT);
            stage.spawn(Sprite::new(&image, rect, LAYER_TILES), role)
        });
        Self { kind, tiles, zone }
    }

    pub(crate) fn tiles(&self) -> [EntityId; TILE_COUNT] {
        self.tiles
    }

    pub(crate) fn zone(&self) -> EntityId {
        self.zone
    }

    /// Puts every tile back on its slot with the puzzle's current faces.
    pub(crate) fn deal(&self, stage: &mut Stage, puzzle: &CodonPuzzle) {
        stage.drag.cancel();
        for (slot, (tile, face)) in self.tiles.iter().zip(puzzle.round()).enumerate() {
            if let Some(entity) = stage.entities.get_mut(*tile) {
                if let Role::CodonTile { face: shown } | Role::TransferRna { face: shown } =
                    &mut entity.role
                {
                    *shown = *face;
                }
            }
            stage.entities.place(*tile, TILE_SLOTS[slot]);
        }
        debug!(puzzle = ?self.kind, fragment = puzzle.active_index(), "tiles_dealt");
    }

    /// Reports a released tile to the puzzle when it lands on the zone with the right face.
    /// Anything else leaves the tile where it was dropped.
    pub(crate) fn drop_tile(
        &self,
        stage: &Stage,
        puzzle: &mut CodonPuzzle,
        entity: EntityId,
        rect: Rect,
    ) -> Option<MatchOutcome> {
        if !self.tiles.contains(&entity) {
            return None;
        }
        let face = stage.entities.get(entity)?.face()?;
        let zone = stage.entities.rect(self.zone)?;
        match evaluate_drop(&rect, &zone, puzzle.is_correct(&face)) {
            DropOutcome::Match => Some(puzzle.report_match(&face)),
            DropOutcome::Miss => {
                debug!(entity = entity.0, "tile_missed");
                None
            }
        }
    }

    /// One frame of a puzzle scene. The mover's path end advances the puzzle, and
    /// finishing the last fragment returns to the main menu.
    pub(crate) fn run_frame(
        &self,
        stage: &mut Stage,
        input: &InputSnapshot,
        state: &mut GameState,
    ) -> SceneCommand {
        {
            let (puzzle, rng) = state.puzzle_mut(self.kind);
            if puzzle.take_reset(rng) {
                self.deal(stage, puzzle);
            }
        }

        let view = PuzzleView::of(state.puzzle(self.kind));
        let events = stage.step(input, state.music_enabled, Some(view));
        let mut command = SceneCommand::None;
        for event in &events {
            match *event {
                EntityEvent::Dropped { entity, rect } => {
                    let (puzzle, _) = state.puzzle_mut(self.kind);
                    self.drop_tile(stage, puzzle, entity, rect);
                }
                EntityEvent::PathEnded(entity) if entity == self.zone => {
                    let (puzzle, _) = state.puzzle_mut(self.kind);
                    if puzzle.advance() == Advance::Finished {
                        command = SceneCommand::SwitchTo(SceneId::MainMenu);
                    }
                }
                _ => apply_shared(event, state, &mut command),
            }
        }
        command
    }
}
