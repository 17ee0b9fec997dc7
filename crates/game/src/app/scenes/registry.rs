use std::collections::HashMap;

use thiserror::Error;

use super::{menu, reception, transcription, transduction, translation, Scene, SceneId};
use crate::app::art::Art;
use crate::app::state::GameState;

/// Builds a fresh scene. Puzzle scenes restart their puzzle in `state`.
pub(crate) type SceneConstructor = fn(&Art, &mut GameState) -> Box<dyn Scene>;

#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum RegistryError {
    #[error("no constructor registered for scene {0:?}")]
    Missing(SceneId),
}

#[derive(Default)]
pub(crate) struct SceneRegistry {
    constructors: HashMap<SceneId, SceneConstructor>,
}

impl SceneRegistry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every scene of the game.
    pub(crate) fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(SceneId::MainMenu, menu::build_main_menu);
        registry.register(SceneId::About, menu::build_about);
        registry.register(SceneId::LevelSelection, menu::build_level_selection);
        registry.register(SceneId::SignalReception, reception::build);
        registry.register(SceneId::SignalTransduction, transduction::build);
        registry.register(SceneId::Transcription, transcription::build);
        registry.register(SceneId::Translation, translation::build);
        registry
    }

    /// Replaces any constructor already registered for `id`.
    pub(crate) fn register(&mut self, id: SceneId, constructor: SceneConstructor) {
        self.constructors.insert(id, constructor);
    }

    pub(crate) fn contains(&self, id: SceneId) -> bool {
        self.constructors.contains_key(&id)
    }

    pub(crate) fn ensure_complete(&self) -> Result<(), RegistryError> {
        match SceneId::ALL.into_iter().find(|id| !self.contains(*id)) {
            Some(missing) => Err(RegistryError::Missing(missing)),
            None => Ok(()),
        }
    }

    pub(crate) fn build(
        &self,
        id: SceneId,
        art: &Art,
        state: &mut GameState,
    ) -> Result<Box<dyn Scene>, RegistryError> {
        let constructor = self
            .constructors
            .get(&id)
            .ok_or(RegistryError::Missing(id))?;
        Ok(constructor(art, state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::genetics::SeedSignal;

    fn state() -> GameState {
        GameState::seeded(SeedSignal::new(2).expect("seed signal"), 9)
    }

    #[test]
    fn standard_registry_is_complete() {
        let registry = SceneRegistry::standard();
        assert_eq!(registry.ensure_complete(), Ok(()));
        for id in SceneId::ALL {
            assert!(registry.contains(id));
        }
    }

    #[test]
    fn empty_registry_reports_first_missing_scene() {
        let registry = SceneRegistry::new();
        assert_eq!(
            registry.ensure_complete(),
            Err(RegistryError::Missing(SceneId::MainMenu))
        );
    }

    #[test]
    fn build_returns_scene_with_requested_id() {
        let registry = SceneRegistry::standard();
        let art = Art::placeholder();
        let mut state = state();
        for id in SceneId::ALL {
            let scene = registry.build(id, &art, &mut state).expect("registered");
            assert_eq!(scene.id(), id);
            assert!(scene.entity_count() > 0);
        }
    }

    #[test]
    fn build_of_unregistered_scene_fails() {
        let mut registry = SceneRegistry::new();
        registry.register(SceneId::MainMenu, menu::build_main_menu);
        let mut state = state();
        let result = registry.build(SceneId::Translation, &Art::placeholder(), &mut state);
        assert!(matches!(result, Err(RegistryError::Missing(SceneId::Translation))));
    }
}
