use engine::{Canvas, Color, InputSnapshot, Rect, Resolution, Vector};

use super::codon::TileBench;
use super::{Scene, SceneCommand, SceneId, Stage};
use crate::app::art::Art;
use crate::app::entity::{
    EntityId, Nucleobase, Role, Sprite, LAYER_ACTORS, LAYER_BACKGROUND, LAYER_SCENERY,
};
use crate::app::motion::{Leg, PathScript, RideAlong, Tether, Trigger, Until, WalkerScript};
use crate::app::puzzle::{PuzzleKind, FRAGMENT_COUNT};
use crate::app::state::GameState;

const HEADER: &str = "WELCOME TO THE NUCLEUS! \n Match each codon on the DNA template to the corresponding RNA \n codon to transcribe a new mRNA molecule!!!";
const INFO_TEXT: &str = "Drag the RNA codon that pairs with\nthe highlighted DNA codon onto the\nRNA polymerase. It moves along the\ntemplate after every match.";
const HEADER_POS: Vector = Vector::new(100, 50);
const ACTIVE_CODON_POS: Vector = Vector::new(450, 500);
/// Completed RNA codons, relative to the RNA strand.
const TRANSCRIPT_OFFSET: Vector = Vector::new(500, 140);
const TRANSCRIPT_SPACING: i32 = 150;

const POLYMERASE_START: Rect = Rect::new(-350, 100, 340, 265);
const FACTOR_START: Rect = Rect::new(400, -100, 150, 150);
const RNA_START: Rect = Rect::new(-1100, 200, 1000, 150);
const RNA_OFFSET: Vector = Vector::new(-750, -116);

pub(crate) struct TranscriptionScene {
    stage: Stage,
    bench: TileBench,
    polymerase: EntityId,
    rna: EntityId,
}

pub(crate) fn build(art: &Art, state: &mut GameState) -> Box<dyn Scene> {
    Box::new(TranscriptionScene::new(art, state))
}

impl TranscriptionScene {
    /// Restarts the transcription puzzle.
    pub(crate) fn new(art: &Art, state: &mut GameState) -> Self {
        let (puzzle, rng) = state.puzzle_mut(PuzzleKind::Transcription);
        puzzle.restart(rng);

        let mut stage = Stage::new(art, state.resolution);
        stage.spawn_still(
            &art.nucleus_background,
            Rect::new(0, 0, 1250, 750),
            LAYER_BACKGROUND,
        );
        for (index, codon) in state.template.iter().enumerate() {
            stage.spawn(
                Sprite::new(
                    &art.dna,
                    Rect::new(-50 + 200 * index as i32, 500, 150, 150),
                    LAYER_SCENERY,
                ),
                Role::Strand {
                    tether: None,
                    bases: Some(Nucleobase::of_codon(*codon, true)),
                },
            );
        }

        let polymerase = stage.spawn(
            Sprite::new(&art.polymerase, POLYMERASE_START, LAYER_ACTORS),
            Role::Still,
        );
        let factor = stage.spawn(
            Sprite::new(&art.transcription_factor_active, FACTOR_START, LAYER_ACTORS),
            Role::TranscriptionFactor {
                path: PathScript::new(
                    Trigger::Immediately,
                    vec![Leg::new(-2, 4, Until::YAbove(450))],
                )
                .with_ride(RideAlong {
                    partner: polymerase,
                    threshold_x: 80,
                    offset: Vector::new(60, 115),
                }),
            },
        );
        stage.entities.set_role(
            polymerase,
            Role::Polymerase {
                walker: WalkerScript::new(
                    Trigger::PartnerReachesY {
                        partner: factor,
                        y: 420,
                    },
                    Leg::new(4, 2, Until::XAbove(80)),
                    2,
                    Leg::new(5, 3, Until::OffScreenRight(50)),
                ),
            },
        );
        let rna = stage.spawn(
            Sprite::new(&art.rna, RNA_START, LAYER_SCENERY),
            Role::Strand {
                tether: Some(Tether {
                    partner: polymerase,
                    offset: RNA_OFFSET,
                }),
                bases: None,
            },
        );

        let bench = TileBench::spawn(&mut stage, &state.transcription, polymerase);
        stage.spawn_chrome(INFO_TEXT);
        Self {
            stage,
            bench,
            polymerase,
            rna,
        }
    }
}

impl Scene for TranscriptionScene {
    fn id(&self) -> SceneId {
        SceneId::Transcription
    }

    fn update(&mut self, input: &InputSnapshot, state: &mut GameState) -> SceneCommand {
        self.bench.run_frame(&mut self.stage, input, state)
    }

    fn draw(&self, canvas: &mut dyn Canvas, state: &GameState) {
        self.stage.draw(canvas);
        let ctx = self.stage.draw_context();
        self.stage
            .draw_text(canvas, &ctx.fonts.default, HEADER, HEADER_POS, Color::WHITE);

        let puzzle = &state.transcription;
        if !puzzle.is_finished() && puzzle.active_index() < FRAGMENT_COUNT {
            let codon = state.template[puzzle.active_index()].to_string();
            self.stage
                .draw_text(canvas, &ctx.fonts.codon, &codon, ACTIVE_CODON_POS, Color::BLACK);
        }

        if let Some(rna) = self.stage.entities.rect(self.rna) {
            for (k, answer) in puzzle.completed_answers().iter().enumerate() {
                let offset = ctx.scale.point(Vector::new(
                    TRANSCRIPT_OFFSET.x + TRANSCRIPT_SPACING * k as i32,
                    TRANSCRIPT_OFFSET.y,
                ));
                let pos = rna.pos + offset;
                canvas.draw_text(&ctx.fonts.codon, &answer.label(), pos.x, pos.y, Color::WHITE);
            }
        }
    }

    fn rescale(&mut self, resolution: Resolution) {
        self.stage.rescale(resolution);
    }

    fn entity_count(&self) -> usize {
        self.stage.entity_count()
    }
}

#[cfg(test)]
mod tests {
    use engine::RecordingCanvas;

    use super::super::test_support::*;
    use super::*;
    use crate::app::genetics::SeedSignal;
    use crate::app::motion::WalkerPhase;

    fn state() -> GameState {
        GameState::seeded(SeedSignal::new(1).expect("seed signal"), 11)
    }

    fn walker_phase(scene: &TranscriptionScene) -> Option<WalkerPhase> {
        match &scene.stage.entities.get(scene.polymerase)?.role {
            Role::Polymerase { walker } => Some(walker.phase()),
            _ => None,
        }
    }

    fn settle(scene: &mut TranscriptionScene, state: &mut GameState) {
        for _ in 0..400 {
            scene.update(&idle(), state);
            if walker_phase(scene) == Some(WalkerPhase::Ready) {
                return;
            }
        }
        panic!("polymerase never reached the strand");
    }

    /// Drags `tile` so its top-left lands at `target`. Returns the command of the release frame.
    fn drag_tile(
        scene: &mut TranscriptionScene,
        state: &mut GameState,
        tile: EntityId,
        target: Vector,
    ) -> SceneCommand {
        let rect = scene.stage.entities.rect(tile).expect("tile");
        let grab = Vector::new(rect.pos.x + 10, rect.pos.y + 10);
        let target = Vector::new(target.x + 10, target.y + 10);
        scene.update(&click(grab), state);
        scene.update(&hold(target), state);
        scene.update(&release(target), state)
    }

    fn correct_tile(scene: &TranscriptionScene, state: &GameState) -> EntityId {
        scene
            .bench
            .tiles()
            .into_iter()
            .find(|tile| {
                let face = scene.stage.entities.get(*tile).and_then(|e| e.face());
                face.is_some_and(|face| state.transcription.is_correct(&face))
            })
            .expect("one correct tile")
    }

    #[test]
    fn entry_restarts_puzzle_and_deals_round() {
        let mut state = state();
        let face = *state
            .transcription
            .round()
            .iter()
            .find(|face| state.transcription.is_correct(face))
            .expect("correct face");
        state.transcription.report_match(&face);
        state.transcription.advance();
        assert_eq!(state.transcription.active_index(), 1);
        let scene = TranscriptionScene::new(&Art::placeholder(), &mut state);
        assert_eq!(state.transcription.active_index(), 0);
        assert!(!state.transcription.active_fragment().completed);
        let faces: Vec<_> = scene
            .bench
            .tiles()
            .iter()
            .filter_map(|tile| scene.stage.entities.get(*tile).and_then(|e| e.face()))
            .collect();
        assert_eq!(faces, state.transcription.round().to_vec());
    }

    #[test]
    fn matching_aug_advances_to_next_fragment() {
        let mut state = state();
        assert_eq!(state.template[0].to_string(), "TAC");
        assert_eq!(state.template[4].to_string(), "ACT");
        let mut scene = TranscriptionScene::new(&Art::placeholder(), &mut state);
        settle(&mut scene, &mut state);

        let tile = correct_tile(&scene, &state);
        let face = scene.stage.entities.get(tile).and_then(|e| e.face());
        assert_eq!(face.map(|face| face.codon.to_string()), Some("AUG".to_string()));

        let zone = scene.stage.entities.rect(scene.polymerase).expect("polymerase");
        drag_tile(&mut scene, &mut state, tile, zone.center());
        assert!(state.transcription.fragments()[0].completed);

        for _ in 0..200 {
            scene.update(&idle(), &mut state);
            if state.transcription.active_index() == 1 && !state.transcription.reset_pending() {
                break;
            }
        }
        assert_eq!(state.transcription.active_index(), 1);
        assert!(state.transcription.fragments()[0].completed);
        assert!(!state.transcription.fragments()[1].completed);
        let expected = state.template[1].transcribe();
        assert!(state
            .transcription
            .round()
            .iter()
            .any(|face| face.codon == expected));
        for (slot, tile) in scene.bench.tiles().iter().enumerate() {
            let rect = scene.stage.entities.rect(*tile).expect("tile");
            assert_eq!(rect.pos, super::super::codon::TILE_SLOTS[slot]);
        }
    }

    #[test]
    fn wrong_tile_stays_where_dropped() {
        let mut state = state();
        let mut scene = TranscriptionScene::new(&Art::placeholder(), &mut state);
        settle(&mut scene, &mut state);
        let wrong = scene
            .bench
            .tiles()
            .into_iter()
            .find(|tile| *tile != correct_tile(&scene, &state))
            .expect("distractor");
        let zone = scene.stage.entities.rect(scene.polymerase).expect("polymerase");
        drag_tile(&mut scene, &mut state, wrong, zone.center());

        assert!(!state.transcription.fragments()[0].completed);
        let rect = scene.stage.entities.rect(wrong).expect("tile");
        assert_eq!(rect.pos, zone.center());
    }

    #[test]
    fn correct_tile_dropped_off_zone_does_not_match() {
        let mut state = state();
        let mut scene = TranscriptionScene::new(&Art::placeholder(), &mut state);
        settle(&mut scene, &mut state);
        let tile = correct_tile(&scene, &state);
        drag_tile(&mut scene, &mut state, tile, Vector::new(900, 600));
        assert!(!state.transcription.fragments()[0].completed);
    }

    #[test]
    fn draw_shows_header_and_active_codon() {
        let mut state = state();
        let scene = TranscriptionScene::new(&Art::placeholder(), &mut state);
        let mut canvas = RecordingCanvas::new(state.resolution);
        scene.draw(&mut canvas, &state);
        let texts = canvas.texts();
        assert!(texts.contains(&HEADER));
        assert!(texts.contains(&"TAC"));
        assert!(canvas.image_names().contains(&"rnaPolym.png"));
    }
}
