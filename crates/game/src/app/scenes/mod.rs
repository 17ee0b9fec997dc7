//! Scene state machine. One scene is live at a time and owns its entity set;
//! switching drops the old set and builds the next one through the registry.

use engine::{
    Canvas, Color, DrawTransform, FontHandle, ImageHandle, InputSnapshot, Rect, Resolution, Vector,
};
use tracing::{debug, info, warn};

use super::art::Art;
use super::drag::DragController;
use super::entity::{
    DrawContext, EntityEvent, EntityId, EntitySet, PuzzleView, Role, Sprite, LAYER_BACKGROUND,
    LAYER_MODAL, LAYER_UI,
};
use super::motion::Follower;
use super::state::GameState;

pub(crate) mod codon;
pub(crate) mod menu;
pub(crate) mod reception;
pub(crate) mod registry;
pub(crate) mod transcription;
pub(crate) mod transduction;
pub(crate) mod translation;

pub(crate) use registry::{RegistryError, SceneRegistry};

pub(crate) const MENU_BUTTON_RECT: Rect = Rect::new(1000, 0, 300, 200);
pub(crate) const INFO_BUTTON_RECT: Rect = Rect::new(850, 0, 165, 165);
pub(crate) const INFO_TEXT_POS: Vector = Vector::new(300, 200);
/// Oversized so parallax layers cover the screen at every pointer position.
pub(crate) const PARALLAX_LAYER_SIZE: (i32, i32) = (2500, 1500);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SceneId {
    MainMenu,
    About,
    LevelSelection,
    SignalReception,
    SignalTransduction,
    Transcription,
    Translation,
}

impl SceneId {
    pub(crate) const ALL: [SceneId; 7] = [
        SceneId::MainMenu,
        SceneId::About,
        SceneId::LevelSelection,
        SceneId::SignalReception,
        SceneId::SignalTransduction,
        SceneId::Transcription,
        SceneId::Translation,
    ];

    pub(crate) fn display_name(self) -> &'static str {
        match self {
            SceneId::MainMenu => "Main Menu",
            SceneId::About => "About",
            SceneId::LevelSelection => "Level Selection",
            SceneId::SignalReception => "Signal Reception",
            SceneId::SignalTransduction => "Signal Transduction",
            SceneId::Transcription => "Transcription",
            SceneId::Translation => "Translation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SceneCommand {
    None,
    SwitchTo(SceneId),
}

pub(crate) trait Scene {
    fn id(&self) -> SceneId;
    fn update(&mut self, input: &InputSnapshot, state: &mut GameState) -> SceneCommand;
    fn draw(&self, canvas: &mut dyn Canvas, state: &GameState);
    fn rescale(&mut self, resolution: Resolution);
    fn entity_count(&self) -> usize;
}

pub(crate) struct SceneMachine {
    registry: SceneRegistry,
    art: Art,
    active: Box<dyn Scene>,
}

impl SceneMachine {
    /// Checks that every scene can be built, then enters the main menu.
    pub(crate) fn start(
        registry: SceneRegistry,
        art: Art,
        state: &mut GameState,
    ) -> Result<Self, RegistryError> {
        registry.ensure_complete()?;
        let active = registry.build(SceneId::MainMenu, &art, state)?;
        state.active_scene = SceneId::MainMenu;
        info!(
            scene = ?SceneId::MainMenu,
            entity_count = active.entity_count(),
            "scene_entered"
        );
        Ok(Self {
            registry,
            art,
            active,
        })
    }

    pub(crate) fn active_id(&self) -> SceneId {
        self.active.id()
    }

    /// Runs the active scene for one frame, then applies its transition request.
    pub(crate) fn update(&mut self, input: &InputSnapshot, state: &mut GameState) {
        if let SceneCommand::SwitchTo(next) = self.active.update(input, state) {
            self.switch_to(next, state);
        }
    }

    /// Replaces the active scene with a fresh build of `next`.
    pub(crate) fn switch_to(&mut self, next: SceneId, state: &mut GameState) -> bool {
        match self.registry.build(next, &self.art, state) {
            Ok(scene) => {
                let from = state.active_scene;
                self.active = scene;
                state.active_scene = next;
                info!(
                    from = ?from,
                    scene = ?next,
                    entity_count = self.active.entity_count(),
                    "scene_switched"
                );
                true
            }
            Err(err) => {
                warn!(error = %err, "scene_switch_failed");
                false
            }
        }
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas, state: &GameState) {
        self.active.draw(canvas, state);
    }

    pub(crate) fn rescale(&mut self, resolution: Resolution) {
        self.active.rescale(resolution);
        debug!(
            width = resolution.width,
            height = resolution.height,
            "scene_rescaled"
        );
    }
}

/// Entity set, drag controller and art shared by every scene implementation.
pub(crate) struct Stage {
    pub(crate) entities: EntitySet,
    pub(crate) drag: DragController,
    art: Art,
}

impl Stage {
    pub(crate) fn new(art: &Art, resolution: Resolution) -> Self {
        Self {
            entities: EntitySet::new(resolution),
            drag: DragController::new(),
            art: art.clone(),
        }
    }

    pub(crate) fn art(&self) -> &Art {
        &self.art
    }

    pub(crate) fn spawn(&mut self, sprite: Sprite, role: Role) -> EntityId {
        self.entities.spawn(sprite, role)
    }

    pub(crate) fn spawn_still(&mut self, image: &ImageHandle, rect: Rect, layer: i32) -> EntityId {
        self.spawn(Sprite::new(image, rect, layer), Role::Still)
    }

    pub(crate) fn spawn_button(
        &mut self,
        image: &ImageHandle,
        rect: Rect,
        target: SceneId,
    ) -> EntityId {
        self.spawn(Sprite::new(image, rect, LAYER_UI), Role::Button { target })
    }

    /// Pointer-following background layer, drawn enlarged by `(depth + 0.5) / depth`.
    pub(crate) fn spawn_parallax(
        &mut self,
        image: &ImageHandle,
        x: (i32, i32, i32),
        y: (i32, i32, i32),
        depth: i32,
    ) -> EntityId {
        let depth = depth.max(1);
        let follower = Follower::parallax(x, y, depth);
        let start = follower.position(Vector::new(0, 0));
        let (width, height) = PARALLAX_LAYER_SIZE;
        let sprite = Sprite::new(
            image,
            Rect::new(start.x, start.y, width, height),
            LAYER_BACKGROUND - depth,
        )
        .with_transform(DrawTransform::scaled((depth as f32 + 0.5) / depth as f32));
        self.spawn(sprite, Role::Parallax { follower })
    }

    /// Menu button and info page carried by every gameplay scene.
    pub(crate) fn spawn_chrome(&mut self, info_text: &'static str) {
        let menu_button = self.art.menu_button.clone();
        self.spawn_button(&menu_button, MENU_BUTTON_RECT, SceneId::MainMenu);
        let sprite = Sprite::new(&self.art.info_button, INFO_BUTTON_RECT, LAYER_MODAL)
            .with_alternate(&self.art.info_page);
        self.spawn(
            sprite,
            Role::InfoPage {
                open: false,
                button_rect: INFO_BUTTON_RECT,
                text: info_text,
            },
        );
    }

    pub(crate) fn step(
        &mut self,
        input: &InputSnapshot,
        music_enabled: bool,
        puzzle: Option<PuzzleView>,
    ) -> Vec<EntityEvent> {
        self.entities
            .update(input, &mut self.drag, puzzle, music_enabled)
    }

    pub(crate) fn draw(&self, canvas: &mut dyn Canvas) {
        self.entities.draw(canvas, &self.art);
    }

    pub(crate) fn draw_context(&self) -> DrawContext<'_> {
        DrawContext::new(&self.art, self.entities.scale())
    }

    /// Text at a base-coordinate position.
    pub(crate) fn draw_text(
        &self,
        canvas: &mut dyn Canvas,
        font: &FontHandle,
        text: &str,
        base: Vector,
        color: Color,
    ) {
        let pos = self.entities.scale().point(base);
        canvas.draw_text(font, text, pos.x, pos.y, color);
    }

    pub(crate) fn rescale(&mut self, resolution: Resolution) {
        self.entities.rescale(resolution);
    }

    pub(crate) fn entity_count(&self) -> usize {
        self.entities.len()
    }
}

/// Events every scene handles the same way: navigation, the volume toggle and the info page.
pub(crate) fn apply_shared(event: &EntityEvent, state: &mut GameState, command: &mut SceneCommand) {
    match *event {
        EntityEvent::Navigate(target) => *command = SceneCommand::SwitchTo(target),
        EntityEvent::ToggleMusic => state.toggle_music(),
        EntityEvent::InfoToggled { open } => {
            debug!(open, scene = ?state.active_scene, "info_page_toggled")
        }
        EntityEvent::Dropped { .. } | EntityEvent::Activated(_) | EntityEvent::PathEnded(_) => {}
    }
}
