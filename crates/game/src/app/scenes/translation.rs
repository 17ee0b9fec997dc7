use engine::{Canvas, Color, InputSnapshot, Rect, Resolution, Vector};

use super::codon::TileBench;
use super::{Scene, SceneCommand, SceneId, Stage};
use crate::app::art::Art;
use crate::app::entity::{EntityId, Nucleobase, Role, Sprite, LAYER_ACTORS, LAYER_SCENERY};
use crate::app::motion::{Leg, Trigger, Until, WalkerScript};
use crate::app::puzzle::{Answer, PuzzleKind};
use crate::app::state::GameState;

const HEADER: &str = "FINALLY, BACK TO THE CYTOPLASM! \n Match each codon from your mRNA template \n to its corresponding amino acid to synthesize your protein!!!!";
const INFO_TEXT: &str = "Drag the transfer RNA whose anticodon\npairs with the highlighted mRNA codon\nonto the ribosome. Each match adds one\namino acid to the protein.";
const HEADER_POS: Vector = Vector::new(100, 50);
const ACTIVE_CODON_POS: Vector = Vector::new(500, 520);
const PROTEIN_ORIGIN: Vector = Vector::new(50, 400);
const PROTEIN_SPACING: i32 = 150;
const PROTEIN_LABEL_SIZE: (i32, i32) = (140, 50);

const RIBOSOME_START: Rect = Rect::new(40, 300, 404, 367);

pub(crate) struct TranslationScene {
    stage: Stage,
    bench: TileBench,
    ribosome: EntityId,
}

pub(crate) fn build(art: &Art, state: &mut GameState) -> Box<dyn Scene> {
    Box::new(TranslationScene::new(art, state))
}

impl TranslationScene {
    /// Restarts the translation puzzle.
    pub(crate) fn new(art: &Art, state: &mut GameState) -> Self {
        let (puzzle, rng) = state.puzzle_mut(PuzzleKind::Translation);
        puzzle.restart(rng);

        let mut stage = Stage::new(art, state.resolution);
        stage.spawn_parallax(&art.translation_background, (-5, 95, 7), (-3, 100, 5), 1);
        for (index, fragment) in state.translation.fragments().iter().enumerate() {
            stage.spawn(
                Sprite::new(
                    &art.rna,
                    Rect::new(-50 + 200 * index as i32, 600, 150, 150),
                    LAYER_SCENERY,
                ),
                Role::Strand {
                    tether: None,
                    bases: Some(Nucleobase::of_codon(fragment.codon, true)),
                },
            );
        }

        let ribosome = stage.spawn(
            Sprite::new(&art.ribosome, RIBOSOME_START, LAYER_ACTORS),
            Role::Ribosome {
                walker: WalkerScript::new(
                    Trigger::Immediately,
                    Leg::new(4, 2, Until::XAbove(40)),
                    1,
                    Leg::new(5, 3, Until::OffScreenRight(50)),
                ),
            },
        );
        let bench = TileBench::spawn(&mut stage, &state.translation, ribosome);
        stage.spawn_chrome(INFO_TEXT);
        Self {
            stage,
            bench,
            ribosome,
        }
    }
}

impl Scene for TranslationScene {
    fn id(&self) -> SceneId {
        SceneId::Translation
    }

    fn update(&mut self, input: &InputSnapshot, state: &mut GameState) -> SceneCommand {
        self.bench.run_frame(&mut self.stage, input, state)
    }

    fn draw(&self, canvas: &mut dyn Canvas, state: &GameState) {
        self.stage.draw(canvas);
        let ctx = self.stage.draw_context();
        self.stage
            .draw_text(canvas, &ctx.fonts.default, HEADER, HEADER_POS, Color::BLACK);

        let puzzle = &state.translation;
        if !puzzle.is_finished() {
            let codon = puzzle.active_fragment().codon.to_string();
            self.stage
                .draw_text(canvas, &ctx.fonts.codon, &codon, ACTIVE_CODON_POS, Color::BLACK);
        }

        let (width, height) = PROTEIN_LABEL_SIZE;
        for (index, answer) in puzzle.completed_answers().iter().enumerate() {
            let Answer::Protein(amino) = *answer else {
                continue;
            };
            let base = Rect::new(
                PROTEIN_ORIGIN.x + PROTEIN_SPACING * index as i32,
                PROTEIN_ORIGIN.y,
                width,
                height,
            );
            Nucleobase::amino(amino).draw(canvas, &ctx, ctx.scale.rect(base));
        }
    }

    fn rescale(&mut self, resolution: Resolution) {
        self.stage.rescale(resolution);
    }

    fn entity_count(&self) -> usize {
        self.stage.entity_count()
    }
}
