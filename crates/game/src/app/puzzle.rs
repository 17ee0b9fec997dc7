use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

use super::genetics::{random_coding_dna_codon, AminoAcid, Base, Codon, SeedSignal};

pub(crate) const FRAGMENT_COUNT: usize = 5;
pub(crate) const LAST_FRAGMENT: usize = FRAGMENT_COUNT - 1;
pub(crate) const TILE_COUNT: usize = 3;
pub(crate) const START_CODON: Codon = Codon::new([Base::T, Base::A, Base::C]);

pub(crate) type Template = [Codon; FRAGMENT_COUNT];

/// `["TAC", r1, r2, r3, stop]` where the last codon is chosen by the seed signal.
pub(crate) fn generate_template(seed: SeedSignal, rng: &mut impl Rng) -> Template {
    [
        START_CODON,
        random_coding_dna_codon(rng),
        random_coding_dna_codon(rng),
        random_coding_dna_codon(rng),
        seed.stop_codon(),
    ]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum PuzzleKind {
    /// DNA template codon to its mRNA codon.
    Transcription,
    /// mRNA codon to its amino acid, matched with a transfer RNA.
    Translation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Answer {
    Rna(Codon),
    Protein(AminoAcid),
}

impl Answer {
    pub(crate) fn label(&self) -> String {
        match self {
            Answer::Rna(codon) => codon.to_string(),
            Answer::Protein(amino) => amino.label().to_string(),
        }
    }
}

/// What a tile shows and what it answers.
///
/// For transcription the codon is the RNA codon itself. For translation it is the
/// transfer RNA's anticodon and the answer is the amino acid it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TileFace {
    pub(crate) codon: Codon,
    pub(crate) answer: Answer,
}

impl TileFace {
    fn transcript(rna: Codon) -> Self {
        Self {
            codon: rna,
            answer: Answer::Rna(rna),
        }
    }

    fn transfer_rna(mrna: Codon) -> Self {
        Self {
            codon: mrna.anticodon(),
            answer: Answer::Protein(mrna.translate()),
        }
    }

    pub(crate) fn amino_acid(&self) -> Option<AminoAcid> {
        match self.answer {
            Answer::Protein(amino) => Some(amino),
            Answer::Rna(_) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Fragment {
    pub(crate) codon: Codon,
    pub(crate) completed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MatchOutcome {
    Accepted,
    Rejected,
    /// Fragment already completed, or the puzzle is over.
    Ignored,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Advance {
    NotReady,
    Advanced(usize),
    Finished,
}

/// Drag-and-match puzzle over the five fragments of one strand.
#[derive(Debug, Clone)]
pub(crate) struct CodonPuzzle {
    kind: PuzzleKind,
    fragments: [Fragment; FRAGMENT_COUNT],
    active_index: usize,
    reset_pending: bool,
    round: [TileFace; TILE_COUNT],
    finished: bool,
}

impl CodonPuzzle {
    /// Translation fragments hold the mRNA, so the template is transcribed first.
    pub(crate) fn new(kind: PuzzleKind, template: &Template, rng: &mut impl Rng) -> Self {
        let fragments = template.map(|codon| Fragment {
            codon: match kind {
                PuzzleKind::Transcription => codon,
                PuzzleKind::Translation => codon.transcribe(),
            },
            completed: false,
        });
        let round = generate_round(kind, fragments[0].codon, rng);
        Self {
            kind,
            fragments,
            active_index: 0,
            reset_pending: false,
            round,
            finished: false,
        }
    }

    pub(crate) fn kind(&self) -> PuzzleKind {
        self.kind
    }

    pub(crate) fn fragments(&self) -> &[Fragment; FRAGMENT_COUNT] {
        &self.fragments
    }

    pub(crate) fn active_index(&self) -> usize {
        self.active_index
    }

    pub(crate) fn active_fragment(&self) -> &Fragment {
        &self.fragments[self.active_index]
    }

    pub(crate) fn is_finished(&self) -> bool {
        self.finished
    }

    pub(crate) fn round(&self) -> &[TileFace; TILE_COUNT] {
        &self.round
    }

    #[cfg(test)]
    pub(crate) fn reset_pending(&self) -> bool {
        self.reset_pending
    }

    pub(crate) fn expected(&self) -> Answer {
        expected_answer(self.kind, self.active_fragment().codon)
    }

    pub(crate) fn is_correct(&self, face: &TileFace) -> bool {
        face.answer == self.expected()
    }

    /// Regenerates the round if an advance asked for it. Returns `true` when it did.
    pub(crate) fn take_reset(&mut self, rng: &mut impl Rng) -> bool {
        if !self.reset_pending {
            return false;
        }
        self.round = generate_round(self.kind, self.active_fragment().codon, rng);
        self.reset_pending = false;
        true
    }

    pub(crate) fn report_match(&mut self, face: &TileFace) -> MatchOutcome {
        if self.finished || self.active_fragment().completed {
            return MatchOutcome::Ignored;
        }
        if !self.is_correct(face) {
            return MatchOutcome::Rejected;
        }
        self.fragments[self.active_index].completed = true;
        info!(
            puzzle = ?self.kind,
            fragment = self.active_index,
            codon = %self.active_fragment().codon,
            "fragment_matched"
        );
        MatchOutcome::Accepted
    }

    /// Moves to the next fragment once the active one is completed.
    pub(crate) fn advance(&mut self) -> Advance {
        if self.finished || !self.active_fragment().completed {
            return Advance::NotReady;
        }
        if self.active_index < LAST_FRAGMENT {
            self.active_index += 1;
            self.reset_pending = true;
            info!(puzzle = ?self.kind, fragment = self.active_index, "fragment_advanced");
            Advance::Advanced(self.active_index)
        } else {
            self.finished = true;
            info!(puzzle = ?self.kind, "puzzle_finished");
            Advance::Finished
        }
    }

    /// Back to fragment 0 with fresh tiles. The template is kept.
    pub(crate) fn restart(&mut self, rng: &mut impl Rng) {
        for fragment in &mut self.fragments {
            fragment.completed = false;
        }
        self.active_index = 0;
        self.reset_pending = false;
        self.finished = false;
        self.round = generate_round(self.kind, self.fragments[0].codon, rng);
    }

    /// Answers of the completed fragments, in strand order.
    pub(crate) fn completed_answers(&self) -> Vec<Answer> {
        self.fragments
            .iter()
            .filter(|fragment| fragment.completed)
            .map(|fragment| expected_answer(self.kind, fragment.codon))
            .collect()
    }
}

fn expected_answer(kind: PuzzleKind, codon: Codon) -> Answer {
    match kind {
        PuzzleKind::Transcription => Answer::Rna(codon.transcribe()),
        PuzzleKind::Translation => Answer::Protein(codon.translate()),
    }
}

/// One correct face and two distinct distractors, shuffled across the slots.
pub(crate) fn generate_round(
    kind: PuzzleKind,
    fragment: Codon,
    rng: &mut impl Rng,
) -> [TileFace; TILE_COUNT] {
    let correct = match kind {
        PuzzleKind::Transcription => TileFace::transcript(fragment.transcribe()),
        PuzzleKind::Translation => TileFace::transfer_rna(fragment),
    };
    let mut faces = vec![correct];
    while faces.len() < TILE_COUNT {
        let candidate = match kind {
            PuzzleKind::Transcription => TileFace::transcript(Codon::random_rna(rng)),
            PuzzleKind::Translation => TileFace::transfer_rna(Codon::random_rna(rng)),
        };
        let duplicate = faces
            .iter()
            .any(|face| face.answer == candidate.answer || face.codon == candidate.codon);
        if !duplicate {
            faces.push(candidate);
        }
    }
    faces.shuffle(rng);
    [faces[0], faces[1], faces[2]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn codon(raw: &str) -> Codon {
        raw.parse().expect("codon")
    }

    fn template() -> Template {
        [
            codon("TAC"),
            codon("GCA"),
            codon("CCG"),
            codon("TTT"),
            codon("ACT"),
        ]
    }

    fn correct_face(puzzle: &CodonPuzzle) -> TileFace {
        *puzzle
            .round()
            .iter()
            .find(|face| puzzle.is_correct(face))
            .expect("correct face")
    }

    fn wrong_face(puzzle: &CodonPuzzle) -> TileFace {
        *puzzle
            .round()
            .iter()
            .find(|face| !puzzle.is_correct(face))
            .expect("distractor")
    }

    #[test]
    fn template_starts_with_tac_and_ends_with_seed_stop() {
        let mut rng = StdRng::seed_from_u64(1);
        for (seed, stop) in [(1, "ACT"), (2, "ATT"), (3, "ATC"), (4, "ATT")] {
            let seed = SeedSignal::new(seed).expect("seed");
            let template = generate_template(seed, &mut rng);
            assert_eq!(template[0], codon("TAC"));
            assert_eq!(template[4], codon(stop));
            for middle in &template[1..4] {
                assert_ne!(middle.transcribe().translate(), AminoAcid::Stop);
            }
        }
    }

    #[test]
    fn same_seed_gives_same_template() {
        let seed = SeedSignal::new(1).expect("seed");
        let first = generate_template(seed, &mut StdRng::seed_from_u64(99));
        let second = generate_template(seed, &mut StdRng::seed_from_u64(99));
        assert_eq!(first, second);
    }

    #[test]
    fn every_round_has_exactly_one_correct_face() {
        let mut rng = StdRng::seed_from_u64(3);
        for kind in [PuzzleKind::Transcription, PuzzleKind::Translation] {
            for _ in 0..200 {
                let source = match kind {
                    PuzzleKind::Transcription => Codon::random_dna(&mut rng),
                    PuzzleKind::Translation => Codon::random_rna(&mut rng),
                };
                let round = generate_round(kind, source, &mut rng);
                let expected = expected_answer(kind, source);
                let correct = round.iter().filter(|face| face.answer == expected).count();
                assert_eq!(correct, 1);
                assert_ne!(round[0].answer, round[1].answer);
                assert_ne!(round[0].answer, round[2].answer);
                assert_ne!(round[1].answer, round[2].answer);
            }
        }
    }

    #[test]
    fn translation_faces_show_anticodons() {
        let mut rng = StdRng::seed_from_u64(5);
        let puzzle = CodonPuzzle::new(PuzzleKind::Translation, &template(), &mut rng);
        assert_eq!(puzzle.active_fragment().codon, codon("AUG"));
        assert_eq!(puzzle.expected(), Answer::Protein(AminoAcid::Met));
        let face = correct_face(&puzzle);
        assert_eq!(face.codon, codon("UAC"));
        assert_eq!(face.amino_acid(), Some(AminoAcid::Met));
    }

    #[test]
    fn match_completes_fragment_once() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut puzzle = CodonPuzzle::new(PuzzleKind::Transcription, &template(), &mut rng);
        let wrong = wrong_face(&puzzle);
        assert_eq!(puzzle.report_match(&wrong), MatchOutcome::Rejected);
        assert!(!puzzle.active_fragment().completed);

        let right = correct_face(&puzzle);
        assert_eq!(right.codon, codon("AUG"));
        assert_eq!(puzzle.report_match(&right), MatchOutcome::Accepted);
        assert!(puzzle.active_fragment().completed);
        assert_eq!(puzzle.report_match(&right), MatchOutcome::Ignored);
    }

    #[test]
    fn advance_requires_completed_fragment() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut puzzle = CodonPuzzle::new(PuzzleKind::Transcription, &template(), &mut rng);
        assert_eq!(puzzle.advance(), Advance::NotReady);
        assert_eq!(puzzle.active_index(), 0);
    }

    #[test]
    fn active_index_climbs_by_one_and_finishes_at_last() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut puzzle = CodonPuzzle::new(PuzzleKind::Translation, &template(), &mut rng);
        for expected_index in 1..=LAST_FRAGMENT {
            let face = correct_face(&puzzle);
            assert_eq!(puzzle.report_match(&face), MatchOutcome::Accepted);
            assert_eq!(puzzle.advance(), Advance::Advanced(expected_index));
            assert_eq!(puzzle.active_index(), expected_index);
            assert!(puzzle.reset_pending());
            assert!(puzzle.take_reset(&mut rng));
            assert!(!puzzle.take_reset(&mut rng));
        }
        let face = correct_face(&puzzle);
        assert_eq!(face.amino_acid(), Some(AminoAcid::Stop));
        assert_eq!(puzzle.report_match(&face), MatchOutcome::Accepted);
        assert_eq!(puzzle.advance(), Advance::Finished);
        assert_eq!(puzzle.active_index(), LAST_FRAGMENT);
        assert!(puzzle.is_finished());
        assert_eq!(puzzle.report_match(&face), MatchOutcome::Ignored);
        assert_eq!(puzzle.advance(), Advance::NotReady);
    }

    #[test]
    fn restart_clears_progress_but_keeps_template() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut puzzle = CodonPuzzle::new(PuzzleKind::Transcription, &template(), &mut rng);
        let face = correct_face(&puzzle);
        puzzle.report_match(&face);
        puzzle.advance();
        puzzle.restart(&mut rng);
        assert_eq!(puzzle.active_index(), 0);
        assert!(puzzle.fragments().iter().all(|fragment| !fragment.completed));
        assert_eq!(puzzle.fragments()[1].codon, codon("GCA"));
        assert!(puzzle.completed_answers().is_empty());
    }

    #[test]
    fn completed_answers_follow_strand_order() {
        let mut rng = StdRng::seed_from_u64(17);
        let mut puzzle = CodonPuzzle::new(PuzzleKind::Transcription, &template(), &mut rng);
        for _ in 0..2 {
            let face = correct_face(&puzzle);
            puzzle.report_match(&face);
            puzzle.advance();
            puzzle.take_reset(&mut rng);
        }
        assert_eq!(
            puzzle.completed_answers(),
            vec![Answer::Rna(codon("AUG")), Answer::Rna(codon("CGU"))]
        );
    }
}
