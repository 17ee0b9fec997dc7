//! Main menu, About and Level selection. None of them carry puzzle state.

use engine::{Canvas, Color, InputSnapshot, Rect, Resolution, Vector};

use super::{apply_shared, Scene, SceneCommand, SceneId, Stage, MENU_BUTTON_RECT};
use crate::app::art::Art;
use crate::app::entity::{Role, Sprite, LAYER_BACKGROUND, LAYER_SCENERY, LAYER_UI};
use crate::app::state::GameState;

const TITLE_RECT: Rect = Rect::new(325, 50, 600, 200);
const PLAY_RECT: Rect = Rect::new(475, 300, 300, 100);
const LEVEL_SELECT_RECT: Rect = Rect::new(475, 420, 300, 100);
const ABOUT_RECT: Rect = Rect::new(475, 540, 300, 100);
const VOLUME_RECT: Rect = Rect::new(1100, 600, 120, 120);

const CREDITS: &str = "Cell Signaling Pathway Simulator\n\nFollow one signal from the cell membrane\nto a finished protein.\n\nArt, music and code by the CSPS team.";
const CREDITS_POS: Vector = Vector::new(100, 250);

const LEVEL_TARGETS: [SceneId; 4] = [
    SceneId::SignalReception,
    SceneId::SignalTransduction,
    SceneId::Transcription,
    SceneId::Translation,
];

pub(crate) struct MenuScene {
    id: SceneId,
    stage: Stage,
    caption: Option<(&'static str, Vector)>,
}

pub(crate) fn build_main_menu(art: &Art, state: &mut GameState) -> Box<dyn Scene> {
    let mut stage = Stage::new(art, state.resolution);
    for (depth, layer) in (1..).zip(&art.menu_layers) {
        stage.spawn_parallax(layer, (-5, 75, 6), (-5, 100, 7), depth);
    }
    stage.spawn_still(&art.title, TITLE_RECT, LAYER_SCENERY);
    stage.spawn_button(&art.play_button, PLAY_RECT, SceneId::SignalReception);
    stage.spawn_button(
        &art.level_select_button,
        LEVEL_SELECT_RECT,
        SceneId::LevelSelection,
    );
    stage.spawn_button(&art.about_button, ABOUT_RECT, SceneId::About);
    stage.spawn(
        Sprite::new(&art.volume_on, VOLUME_RECT, LAYER_UI).with_alternate(&art.volume_off),
        Role::VolumeToggle,
    );
    Box::new(MenuScene {
        id: SceneId::MainMenu,
        stage,
        caption: None,
    })
}

pub(crate) fn build_about(art: &Art, state: &mut GameState) -> Box<dyn Scene> {
    let mut stage = Stage::new(art, state.resolution);
    stage.spawn_still(&art.about_page, Rect::new(0, 0, 1250, 750), LAYER_BACKGROUND);
    stage.spawn_button(&art.menu_button, MENU_BUTTON_RECT, SceneId::MainMenu);
    Box::new(MenuScene {
        id: SceneId::About,
        stage,
        caption: Some((CREDITS, CREDITS_POS)),
    })
}

pub(crate) fn build_level_selection(art: &Art, state: &mut GameState) -> Box<dyn Scene> {
    let mut stage = Stage::new(art, state.resolution);
    stage.spawn_still(&art.menu_layers[0], Rect::new(0, 0, 1250, 750), LAYER_BACKGROUND);
    for (k, (image, target)) in art.level_buttons.iter().zip(LEVEL_TARGETS).enumerate() {
        let rect = Rect::new(100 + 275 * k as i32, 300, 250, 150);
        stage.spawn_button(image, rect, target);
    }
    stage.spawn_button(&art.menu_button, MENU_BUTTON_RECT, SceneId::MainMenu);
    Box::new(MenuScene {
        id: SceneId::LevelSelection,
        stage,
        caption: None,
    })
}

impl Scene for MenuScene {
    fn id(&self) -> SceneId {
        self.id
    }

    fn update(&mut self, input: &InputSnapshot, state: &mut GameState) -> SceneCommand {
        let events = self.stage.step(input, state.music_enabled, None);
        let mut command = SceneCommand::None;
        for event in &events {
            apply_shared(event, state, &mut command);
        }
        command
    }

    fn draw(&self, canvas: &mut dyn Canvas, _state: &GameState) {
        self.stage.draw(canvas);
        if let Some((text, pos)) = self.caption {
            let ctx = self.stage.draw_context();
            self.stage
                .draw_text(canvas, &ctx.fonts.default, text, pos, Color::WHITE);
        }
    }

    fn rescale(&mut self, resolution: Resolution) {
        self.stage.rescale(resolution);
    }

    fn entity_count(&self) -> usize {
        self.stage.entity_count()
    }
}
