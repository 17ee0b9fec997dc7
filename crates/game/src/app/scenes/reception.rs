use engine::{Canvas, InputSnapshot, Rect, Resolution, Vector, BASE_RESOLUTION};
use tracing::{debug, info};

use super::{apply_shared, Scene, SceneCommand, SceneId, Stage};
use crate::app::art::Art;
use crate::app::entity::{
    EntityEvent, EntityId, Role, Sprite, Visual, LAYER_ACTORS, LAYER_SCENERY, LAYER_UI,
};
use crate::app::genetics::SeedSignal;
use crate::app::motion::{Affine, Follower, Tether};
use crate::app::state::GameState;

const INFO_TEXT: &str = "A signal molecule has reached the cell.\nDrag it onto the receptor it fits.\nOnly one receptor will bind it.";
pub(crate) const RECEPTOR_SIZE: (i32, i32) = (200, 350);
const SIGNAL_START: Rect = Rect::new(575, 20, 100, 100);
const NEXT_BUTTON_RECT: Rect = Rect::new(1000, 560, 220, 160);

/// One of the four membrane receptors, left to right.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReceptorSlot {
    A,
    B,
    C,
    D,
}

impl ReceptorSlot {
    pub(crate) const ALL: [ReceptorSlot; 4] = [
        ReceptorSlot::A,
        ReceptorSlot::B,
        ReceptorSlot::C,
        ReceptorSlot::D,
    ];

    pub(crate) fn for_signal(signal: SeedSignal) -> Self {
        match signal {
            SeedSignal::First => ReceptorSlot::A,
            SeedSignal::Second => ReceptorSlot::B,
            SeedSignal::Third => ReceptorSlot::C,
            SeedSignal::Fourth => ReceptorSlot::D,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            ReceptorSlot::A => 0,
            ReceptorSlot::B => 1,
            ReceptorSlot::C => 2,
            ReceptorSlot::D => 3,
        }
    }

    /// Column in sevenths of the screen width.
    fn column(self) -> i32 {
        [1, 4, 7, 9][self.index()]
    }

    fn row(self) -> i32 {
        [450, 400, 400, 450][self.index()]
    }

    fn column_x(self) -> Affine {
        let width = BASE_RESOLUTION.width as i32;
        Affine::new(-5, 100, 9, width * self.column() / 7)
    }

    pub(crate) fn follower(self) -> Follower {
        Follower {
            x: self.column_x(),
            y: Affine::new(-1, 100, 4, self.row()),
        }
    }

    /// The relay kinase hanging under this receptor.
    pub(crate) fn relay_follower(self) -> Follower {
        Follower {
            x: self.column_x(),
            y: Affine::new(-1, 100, 5, self.row() + 200),
        }
    }

    /// Where a bound signal sits on this receptor.
    pub(crate) fn bind_offset(self) -> Vector {
        match self {
            ReceptorSlot::A | ReceptorSlot::D => Vector::new(80, 0),
            ReceptorSlot::B | ReceptorSlot::C => Vector::new(60, 0),
        }
    }

    /// Base rect for a pointer at the origin.
    pub(crate) fn start_rect(self) -> Rect {
        let pos = self.follower().position(Vector::new(0, 0));
        Rect::new(pos.x, pos.y, RECEPTOR_SIZE.0, RECEPTOR_SIZE.1)
    }
}

/// Spawns the four receptors. The bound one starts activated when `active` names it.
pub(crate) fn spawn_receptors(
    stage: &mut Stage,
    art: &Art,
    active: Option<ReceptorSlot>,
) -> [EntityId; 4] {
    ReceptorSlot::ALL.map(|slot| {
        let mut sprite = Sprite::new(&art.receptor, slot.start_rect(), LAYER_SCENERY)
            .with_alternate(&art.receptor_active);
        if active == Some(slot) {
            sprite.visual = Visual::Alternate;
        }
        stage.spawn(
            sprite,
            Role::Receptor {
                follower: slot.follower(),
            },
        )
    })
}

pub(crate) struct ReceptionScene {
    stage: Stage,
    receptors: [EntityId; 4],
    signal: EntityId,
    next: EntityId,
    target: ReceptorSlot,
}

pub(crate) fn build(art: &Art, state: &mut GameState) -> Box<dyn Scene> {
    Box::new(ReceptionScene::new(art, state))
}

impl ReceptionScene {
    pub(crate) fn new(art: &Art, state: &GameState) -> Self {
        let mut stage = Stage::new(art, state.resolution);
        stage.spawn_parallax(&art.plasma_background, (-6, 100, 7), (-2, 100, 3), 1);
        let receptors = spawn_receptors(&mut stage, art, None);
        let signal = stage.spawn(
            Sprite::new(&art.signal, SIGNAL_START, LAYER_ACTORS),
            Role::Signal {
                floor: receptors[ReceptorSlot::B.index()],
                bound: None,
            },
        );
        let next = stage.spawn(
            Sprite::new(&art.next_button, NEXT_BUTTON_RECT, LAYER_UI).hidden(),
            Role::Button {
                target: SceneId::SignalTransduction,
            },
        );
        stage.spawn_chrome(INFO_TEXT);
        Self {
            stage,
            receptors,
            signal,
            next,
            target: ReceptorSlot::for_signal(state.seed_signal),
        }
    }

    pub(crate) fn is_bound(&self) -> bool {
        matches!(
            self.stage.entities.get(self.signal).map(|entity| &entity.role),
            Some(Role::Signal { bound: Some(_), .. })
        )
    }

    /// Binds the signal when it was released over the target receptor.
    fn try_bind(&mut self, signal_rect: Rect) {
        if self.is_bound() {
            return;
        }
        let receptor = self.receptors[self.target.index()];
        let Some(zone) = self.stage.entities.rect(receptor) else {
            return;
        };
        if !signal_rect.overlaps(&zone) {
            debug!(receptor = ?self.target, "signal_missed");
            return;
        }

        let tether = Tether {
            partner: receptor,
            offset: self.target.bind_offset(),
        };
        let bind_pos = zone.pos + self.stage.entities.scale().point(tether.offset);
        if let Some(entity) = self.stage.entities.get_mut(self.signal) {
            if let Role::Signal { bound, .. } = &mut entity.role {
                *bound = Some(tether);
            }
            entity.sprite.rect.pos = bind_pos;
        }
        if let Some(entity) = self.stage.entities.get_mut(receptor) {
            entity.sprite.visual = Visual::Alternate;
        }
        if let Some(entity) = self.stage.entities.get_mut(self.next) {
            entity.sprite.visible = true;
        }
        info!(receptor = ?self.target, "signal_bound");
    }
}

impl Scene for ReceptionScene {
    fn id(&self) -> SceneId {
        SceneId::SignalReception
    }

    fn update(&mut self, input: &InputSnapshot, state: &mut GameState) -> SceneCommand {
        let events = self.stage.step(input, state.music_enabled, None);
        let mut command = SceneCommand::None;
        for event in &events {
            match *event {
                EntityEvent::Dropped { entity, rect } if entity == self.signal => {
                    self.try_bind(rect);
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
