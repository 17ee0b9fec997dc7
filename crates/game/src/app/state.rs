use engine::Resolution;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

use super::genetics::SeedSignal;
use super::puzzle::{generate_template, CodonPuzzle, PuzzleKind, Template};
use super::scenes::SceneId;

/// Everything that outlives a single scene. Created once per session.
#[derive(Debug, Clone)]
pub(crate) struct GameState {
    pub(crate) active_scene: SceneId,
    pub(crate) seed_signal: SeedSignal,
    pub(crate) template: Template,
    pub(crate) transcription: CodonPuzzle,
    pub(crate) translation: CodonPuzzle,
    pub(crate) music_enabled: bool,
    pub(crate) resolution: Resolution,
    pub(crate) rng: StdRng,
}

impl GameState {
    /// Draws the seed signal and the template from `rng`.
    pub(crate) fn new(mut rng: StdRng, music_enabled: bool, resolution: Resolution) -> Self {
        let seed_signal = SeedSignal::random(&mut rng);
        Self::with_seed_signal(seed_signal, rng, music_enabled, resolution)
    }

    pub(crate) fn with_seed_signal(
        seed_signal: SeedSignal,
        mut rng: StdRng,
        music_enabled: bool,
        resolution: Resolution,
    ) -> Self {
        let template = generate_template(seed_signal, &mut rng);
        let codons = template
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        info!(seed_signal = seed_signal.value(), template = %codons, "template_generated");

        let transcription = CodonPuzzle::new(PuzzleKind::Transcription, &template, &mut rng);
        let translation = CodonPuzzle::new(PuzzleKind::Translation, &template, &mut rng);
        Self {
            active_scene: SceneId::MainMenu,
            seed_signal,
            template,
            transcription,
            translation,
            music_enabled,
            resolution,
            rng,
        }
    }

    /// Deterministic state for a fixed seed signal and random seed.
    #[cfg(test)]
    pub(crate) fn seeded(seed_signal: SeedSignal, seed: u64) -> Self {
        Self::with_seed_signal(
            seed_signal,
            StdRng::seed_from_u64(seed),
            true,
            Resolution::default(),
        )
    }

    pub(crate) fn puzzle(&self, kind: PuzzleKind) -> &CodonPuzzle {
        match kind {
            PuzzleKind::Transcription => &self.transcription,
            PuzzleKind::Translation => &self.translation,
        }
    }

    /// The puzzle together with the random source it draws rounds from.
    pub(crate) fn puzzle_mut(&mut self, kind: PuzzleKind) -> (&mut CodonPuzzle, &mut StdRng) {
        let puzzle = match kind {
            PuzzleKind::Transcription => &mut self.transcription,
            PuzzleKind::Translation => &mut self.translation,
        };
        (puzzle, &mut self.rng)
    }

    pub(crate) fn toggle_music(&mut self) {
        self.music_enabled = !self.music_enabled;
        info!(music_enabled = self.music_enabled, "music_toggled");
    }
}
