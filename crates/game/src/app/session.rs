use engine::{AudioPlayer, Canvas, Game, InputSnapshot, Resolution};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use super::art::Art;
use super::config::GameConfig;
use super::scenes::{RegistryError, SceneId, SceneMachine, SceneRegistry};
use super::state::GameState;

/// One run of the game: the shared state, the scene machine and the menu track.
pub(crate) struct Session {
    state: GameState,
    machine: SceneMachine,
    music: Box<dyn AudioPlayer>,
}

impl Session {
    /// Fresh state from the configured seed, or from entropy, entering the main menu.
    pub(crate) fn init(
        registry: SceneRegistry,
        art: Art,
        music: Box<dyn AudioPlayer>,
        config: &GameConfig,
    ) -> Result<Self, RegistryError> {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = GameState::new(rng, config.music_enabled, config.window_size);
        Self::with_state(registry, art, music, state)
    }

    pub(crate) fn with_state(
        registry: SceneRegistry,
        art: Art,
        music: Box<dyn AudioPlayer>,
        mut state: GameState,
    ) -> Result<Self, RegistryError> {
        let machine = SceneMachine::start(registry, art, &mut state)?;
        let mut session = Self {
            state,
            machine,
            music,
        };
        session.sync_music();
        info!(
            seed_signal = session.state.seed_signal.value(),
            music_enabled = session.state.music_enabled,
            "session_started"
        );
        Ok(session)
    }

    pub(crate) fn state(&self) -> &GameState {
        &self.state
    }

    pub(crate) fn active_scene(&self) -> SceneId {
        self.machine.active_id()
    }

    pub(crate) fn music_playing(&self) -> bool {
        self.music.is_playing()
    }

    /// Loops the track while music is enabled.
    fn sync_music(&mut self) {
        if self.state.music_enabled {
            if !self.music.is_playing() {
                self.music.rewind();
                self.music.play();
            }
        } else if self.music.is_playing() {
            self.music.pause();
        }
    }
}

impl Game for Session {
    fn update(&mut self, input: &InputSnapshot) {
        self.machine.update(input, &mut self.state);
        self.sync_music();
    }

    fn draw(&self, canvas: &mut dyn Canvas) {
        self.machine.draw(canvas, &self.state);
    }

    fn on_resize(&mut self, resolution: Resolution) {
        if resolution.is_empty() || resolution == self.state.resolution {
            return;
        }
        debug!(
            width = resolution.width,
            height = resolution.height,
            "window_resized"
        );
        self.machine.rescale(resolution);
        self.state.resolution = resolution;
    }

    fn window_title(&self) -> String {
        format!("CSPS - {}", self.state.active_scene.display_name())
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use engine::{MouseButton, RecordingCanvas, Vector, BASE_RESOLUTION};

    use super::*;
    use crate::app::genetics::SeedSignal;

    /// Transport state shared with the test after the session takes ownership.
    #[derive(Default)]
    struct Transport {
        playing: bool,
        rewinds: u32,
    }

    struct SharedTrack(Rc<RefCell<Transport>>);

    impl AudioPlayer for SharedTrack {
        fn play(&mut self) {
            self.0.borrow_mut().playing = true;
        }

        fn pause(&mut self) {
            self.0.borrow_mut().playing = false;
        }

        fn rewind(&mut self) {
            self.0.borrow_mut().rewinds += 1;
        }

        fn is_playing(&self) -> bool {
            self.0.borrow().playing
        }
    }

    fn session_with(transport: &Rc<RefCell<Transport>>) -> Session {
        let state = GameState::seeded(SeedSignal::new(2).expect("seed signal"), 17);
        Session::with_state(
            SceneRegistry::standard(),
            Art::placeholder(),
            Box::new(SharedTrack(Rc::clone(transport))),
            state,
        )
        .expect("session")
    }

    fn click(x: i32, y: i32) -> InputSnapshot {
        InputSnapshot::empty()
            .with_cursor(Vector::new(x, y))
            .with_press(MouseButton::Left)
    }

    #[test]
    fn init_uses_configured_seed() {
        let config = GameConfig {
            rng_seed: Some(99),
            ..GameConfig::default()
        };
        let a = Session::init(
            SceneRegistry::standard(),
            Art::placeholder(),
            Box::new(engine::SilentTrack::new()),
            &config,
        )
        .expect("session");
        let b = Session::init(
            SceneRegistry::standard(),
            Art::placeholder(),
            Box::new(engine::SilentTrack::new()),
            &config,
        )
        .expect("session");
        assert_eq!(a.state().template, b.state().template);
        assert_eq!(a.state().seed_signal, b.state().seed_signal);
        assert_eq!(a.active_scene(), SceneId::MainMenu);
        assert!(a.music_playing());
    }

    #[test]
    fn init_fails_on_incomplete_registry() {
        let result = Session::init(
            SceneRegistry::new(),
            Art::placeholder(),
            Box::new(engine::SilentTrack::new()),
            &GameConfig::default(),
        );
        assert!(matches!(result, Err(RegistryError::Missing(_))));
    }

    #[test]
    fn play_button_enters_reception_and_updates_title() {
        let transport = Rc::new(RefCell::new(Transport::default()));
        let mut session = session_with(&transport);
        assert_eq!(session.window_title(), "CSPS - Main Menu");
        session.update(&click(480, 310));
        assert_eq!(session.active_scene(), SceneId::SignalReception);
        assert_eq!(session.window_title(), "CSPS - Signal Reception");
    }

    #[test]
    fn volume_toggle_pauses_and_resumes_track() {
        let transport = Rc::new(RefCell::new(Transport::default()));
        let mut session = session_with(&transport);
        assert!(transport.borrow().playing);
        assert_eq!(transport.borrow().rewinds, 1);

        session.update(&click(1110, 610));
        assert!(!session.state().music_enabled);
        assert!(!transport.borrow().playing);

        session.update(&click(1110, 610));
        assert!(session.state().music_enabled);
        assert!(transport.borrow().playing);
        assert_eq!(transport.borrow().rewinds, 2);
    }

    #[test]
    fn finished_track_is_looped() {
        let transport = Rc::new(RefCell::new(Transport::default()));
        let mut session = session_with(&transport);
        transport.borrow_mut().playing = false;
        session.update(&InputSnapshot::empty());
        assert!(transport.borrow().playing);
        assert_eq!(transport.borrow().rewinds, 2);
    }

    #[test]
    fn resize_rescales_active_scene() {
        let transport = Rc::new(RefCell::new(Transport::default()));
        let mut session = session_with(&transport);
        session.on_resize(Resolution::new(2500, 1500));
        assert_eq!(session.state().resolution, Resolution::new(2500, 1500));

        session.on_resize(Resolution::new(0, 0));
        assert_eq!(session.state().resolution, Resolution::new(2500, 1500));

        let mut canvas = RecordingCanvas::new(Resolution::new(2500, 1500));
        session.draw(&mut canvas);
        assert!(canvas.image_names().contains(&"title.png"));
        assert_ne!(session.state().resolution, BASE_RESOLUTION);
    }
}
