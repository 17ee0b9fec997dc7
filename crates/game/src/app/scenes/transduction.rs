use engine::{Canvas, InputSnapshot, Rect, Resolution, Vector};
use tracing::{debug, info};

use super::reception::{spawn_receptors, ReceptorSlot};
use super::{apply_shared, Scene, SceneCommand, SceneId, Stage};
use crate::app::art::Art;
use crate::app::entity::{EntityEvent, EntityId, Role, Sprite, LAYER_ACTORS};
use crate::app::motion::{Leg, PathScript, PatrolScript, Trigger, Until, FALL_STEP};
use crate::app::state::GameState;

const INFO_TEXT: &str = "The bound receptor passes the signal on.\nClick each kinase while it touches the\nnext one in the chain to activate it.";
const RELAY_SIZE: (i32, i32) = (150, 150);
const FACTOR_START: Rect = Rect::new(500, 520, 150, 150);

/// Rail a patrolling kinase runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KinaseRail {
    First,
    Second,
}

impl KinaseRail {
    pub(crate) fn start(self) -> Rect {
        match self {
            KinaseRail::First => Rect::new(100, -300, 280, 280),
            KinaseRail::Second => Rect::new(800, 300, 280, 280),
        }
    }

    /// Entry descent stops once the top edge passes this.
    pub(crate) fn rail_y(self) -> i32 {
        match self {
            KinaseRail::First => 50,
            KinaseRail::Second => 400,
        }
    }

    pub(crate) fn dock_y(self) -> i32 {
        match self {
            KinaseRail::First => 120,
            KinaseRail::Second => 450,
        }
    }

    fn patrol(self, trigger: Trigger, partner: EntityId) -> PatrolScript {
        PatrolScript::new(trigger, self.rail_y(), self.dock_y(), partner)
    }
}

pub(crate) struct TransductionScene {
    stage: Stage,
    relays: [EntityId; 4],
    kinases: [EntityId; 2],
    factor: EntityId,
}

pub(crate) fn build(art: &Art, state: &mut GameState) -> Box<dyn Scene> {
    Box::new(TransductionScene::new(art, state))
}

impl TransductionScene {
    pub(crate) fn new(art: &Art, state: &GameState) -> Self {
        let bound = ReceptorSlot::for_signal(state.seed_signal);
        let mut stage = Stage::new(art, state.resolution);
        stage.spawn_parallax(&art.cytoplasm_background, (-5, 80, 7), (-3, 100, 5), 1);
        spawn_receptors(&mut stage, art, Some(bound));

        let relays = ReceptorSlot::ALL.map(|slot| {
            let follower = slot.relay_follower();
            let start = follower.position(Vector::new(0, 0));
            let trigger = if slot == bound {
                Trigger::Immediately
            } else {
                Trigger::Never
            };
            stage.spawn(
                Sprite::new(
                    &art.kinase,
                    Rect::new(start.x, start.y, RELAY_SIZE.0, RELAY_SIZE.1),
                    LAYER_ACTORS,
                )
                .with_alternate(&art.kinase_active),
                Role::Relay {
                    follower,
                    path: PathScript::new(
                        trigger,
                        vec![Leg::new(0, FALL_STEP, Until::OffScreenBottom)],
                    ),
                },
            )
        });

        let kinases = [KinaseRail::First, KinaseRail::Second].map(|rail| {
            stage.spawn(
                Sprite::new(&art.kinase, rail.start(), LAYER_ACTORS)
                    .with_alternate(&art.kinase_active),
                Role::Still,
            )
        });
        let factor = stage.spawn(
            Sprite::new(&art.transcription_factor, FACTOR_START, LAYER_ACTORS)
                .with_alternate(&art.transcription_factor_active),
            Role::TranscriptionFactor {
                path: PathScript::new(
                    Trigger::PartnerFinished(kinases[1]),
                    vec![Leg::new(0, FALL_STEP, Until::OffScreenBottom)],
                ),
            },
        );
        stage.entities.set_role(
            kinases[0],
            Role::Kinase {
                patrol: KinaseRail::First.patrol(
                    Trigger::PartnerFinished(relays[bound.index()]),
                    kinases[1],
                ),
            },
        );
        stage.entities.set_role(
            kinases[1],
            Role::Kinase {
                patrol: KinaseRail::Second.patrol(Trigger::PartnerFinished(kinases[0]), factor),
            },
        );

        stage.spawn_chrome(INFO_TEXT);
        Self {
            stage,
            relays,
            kinases,
            factor,
        }
    }
}

impl Scene for TransductionScene {
    fn id(&self) -> SceneId {
        SceneId::SignalTransduction
    }

    fn update(&mut self, input: &InputSnapshot, state: &mut GameState) -> SceneCommand {
        let events = self.stage.step(input, state.music_enabled, None);
        let mut command = SceneCommand::None;
        for event in &events {
            match *event {
                EntityEvent::PathEnded(entity) if entity == self.factor => {
                    info!("cascade_complete");
                    command = SceneCommand::SwitchTo(SceneId::Transcription);
                }
                EntityEvent::PathEnded(entity) => {
                    let relay = self.relays.contains(&entity);
                    debug!(entity = entity.0, relay, "cascade_step");
                }
                EntityEvent::Activated(entity) if self.kinases.contains(&entity) => {
                    info!(entity = entity.0, "kinase_activated");
                }
                _ => apply_shared(event, state, &mut command),
            }
        }
        command
    }

    fn draw(&self, canvas: &mut dyn Canvas, _state: &GameState) {
        self.stage.draw(canvas);
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
    use super::super::test_support::*;
    use super::*;
    use crate::app::genetics::SeedSignal;
    use crate::app::motion::PatrolPhase;

    fn scene_for(signal: u8) -> (TransductionScene, GameState) {
        let state = GameState::seeded(SeedSignal::new(signal).expect("seed signal"), 9);
        let scene = TransductionScene::new(&Art::placeholder(), &state);
        (scene, state)
    }

    fn patrol_phase(scene: &TransductionScene, id: EntityId) -> Option<PatrolPhase> {
        match &scene.stage.entities.get(id)?.role {
            Role::Kinase { patrol } => Some(patrol.phase()),
            _ => None,
        }
    }

    fn relay_started(scene: &TransductionScene, slot: ReceptorSlot) -> bool {
        match scene.stage.entities.get(scene.relays[slot.index()]).map(|e| &e.role) {
            Some(Role::Relay { path, .. }) => path.has_started(),
            _ => false,
        }
    }

    /// Click input on `kinase` when it patrols over `partner`, idle otherwise.
    fn cascade_input(
        scene: &TransductionScene,
        kinase: EntityId,
        partner: EntityId,
    ) -> InputSnapshot {
        let rects = scene
            .stage
            .entities
            .rect(kinase)
            .zip(scene.stage.entities.rect(partner));
        match (patrol_phase(scene, kinase), rects) {
            (Some(PatrolPhase::Patrolling), Some((rect, other))) if rect.overlaps(&other) => {
                click(rect.center())
            }
            _ => idle(),
        }
    }

    #[test]
    fn kinase_rails_match_layout() {
        assert_eq!(KinaseRail::First.rail_y(), 50);
        assert_eq!(KinaseRail::Second.rail_y(), 400);
        assert!(KinaseRail::First.dock_y() > KinaseRail::First.rail_y());
        assert!(KinaseRail::Second.dock_y() > KinaseRail::Second.rail_y());
    }

    #[test]
    fn only_bound_relay_starts() {
        let (mut scene, mut state) = scene_for(3);
        scene.update(&idle(), &mut state);
        for slot in ReceptorSlot::ALL {
            assert_eq!(relay_started(&scene, slot), slot == ReceptorSlot::C);
        }
        let active = scene
            .stage
            .entities
            .iter()
            .filter(|entity| {
                matches!(entity.role, Role::Receptor { .. })
                    && entity.sprite.image().name() == "act_receptor.png"
            })
            .count();
        assert_eq!(active, 1);
    }

    #[test]
    fn first_kinase_waits_for_relay_then_patrols() {
        let (mut scene, mut state) = scene_for(1);
        scene.update(&idle(), &mut state);
        assert_eq!(
            patrol_phase(&scene, scene.kinases[0]),
            Some(PatrolPhase::Dormant)
        );
        for _ in 0..600 {
            scene.update(&idle(), &mut state);
        }
        assert_eq!(
            patrol_phase(&scene, scene.kinases[0]),
            Some(PatrolPhase::Patrolling)
        );
        assert_eq!(
            patrol_phase(&scene, scene.kinases[1]),
            Some(PatrolPhase::Dormant)
        );
        let rect = scene.stage.entities.rect(scene.kinases[0]).expect("kinase");
        assert!(rect.pos.y > 50);
    }

    #[test]
    fn click_away_from_partner_does_not_activate() {
        let (mut scene, mut state) = scene_for(1);
        for _ in 0..300 {
            scene.update(&idle(), &mut state);
            if patrol_phase(&scene, scene.kinases[0]) == Some(PatrolPhase::Patrolling) {
                break;
            }
        }
        let rect = scene.stage.entities.rect(scene.kinases[0]).expect("kinase");
        let partner = scene.stage.entities.rect(scene.kinases[1]).expect("partner");
        assert!(!rect.overlaps(&partner));
        scene.update(&click(rect.center()), &mut state);
        assert_eq!(
            patrol_phase(&scene, scene.kinases[0]),
            Some(PatrolPhase::Patrolling)
        );
    }

    #[test]
    fn cascade_ends_in_transcription() {
        let (mut scene, mut state) = scene_for(2);
        let mut command = SceneCommand::None;
        for _ in 0..3000 {
            let input = if patrol_phase(&scene, scene.kinases[0]) != Some(PatrolPhase::Docked) {
                cascade_input(&scene, scene.kinases[0], scene.kinases[1])
            } else {
                cascade_input(&scene, scene.kinases[1], scene.factor)
            };
            command = scene.update(&input, &mut state);
            if command != SceneCommand::None {
                break;
            }
        }
        assert_eq!(command, SceneCommand::SwitchTo(SceneId::Transcription));
        assert_eq!(
            patrol_phase(&scene, scene.kinases[1]),
            Some(PatrolPhase::Docked)
        );
        let factor = scene.stage.entities.get(scene.factor).expect("factor");
        assert_eq!(factor.sprite.image().name(), "act_TFA.png");
    }

    #[test]
    fn relays_follow_pointer_until_started() {
        let (mut scene, mut state) = scene_for(1);
        let idle_relay = scene.relays[ReceptorSlot::D.index()];
        scene.update(&idle(), &mut state);
        let before = scene.stage.entities.rect(idle_relay).expect("relay");
        scene.update(&idle().with_cursor(Vector::new(900, 500)), &mut state);
        let after = scene.stage.entities.rect(idle_relay).expect("relay");
        assert_ne!(before.pos, after.pos);
    }
}
