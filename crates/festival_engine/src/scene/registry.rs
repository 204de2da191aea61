//! Festival scene registry

use std::collections::HashMap;
use std::fmt;

use super::collaborators::Collaborators;
use super::default_scene::DefaultScene;
use super::festival::FestivalId;
use super::lifecycle::FestivalScene;

/// Builds a fresh, unbuilt scene instance
pub type SceneConstructor = Box<dyn Fn(Collaborators) -> Box<dyn FestivalScene>>;

/// Maps festival identifiers to scene constructors
///
/// Identifiers without a constructor resolve to [`DefaultScene`].
#[derive(Default)]
pub struct SceneRegistry {
    constructors: HashMap<FestivalId, SceneConstructor>,
}

impl SceneRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor, replacing any previous one
    pub fn register<F>(&mut self, festival: FestivalId, constructor: F)
    where
        F: Fn(Collaborators) -> Box<dyn FestivalScene> + 'static,
    {
        if self.constructors.insert(festival, Box::new(constructor)).is_some() {
            log::warn!("Scene {:?} was already registered and has been replaced", festival);
        }
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<F>(mut self, festival: FestivalId, constructor: F) -> Self
    where
        F: Fn(Collaborators) -> Box<dyn FestivalScene> + 'static,
    {
        self.register(festival, constructor);
        self
    }

    /// Whether a constructor is registered for `festival`
    pub fn is_registered(&self, festival: FestivalId) -> bool {
        self.constructors.contains_key(&festival)
    }

    /// Number of registered constructors
    pub fn len(&self) -> usize {
        self.constructors.len()
    }

    /// Whether no constructor is registered
    pub fn is_empty(&self) -> bool {
        self.constructors.is_empty()
    }

    /// Instantiate a scene for `festival`
    pub fn build(&self, festival: FestivalId, collaborators: &Collaborators) -> Box<dyn FestivalScene> {
        match self.constructors.get(&festival) {
            Some(constructor) => constructor(collaborators.clone()),
            None => {
                if festival != FestivalId::Default {
                    log::warn!("No scene registered for {}, using default scene", festival);
                }
                Box::new(DefaultScene::new())
            }
        }
    }
}

impl fmt::Debug for SceneRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneRegistry")
            .field("festivals", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_builds_default() {
        let registry = SceneRegistry::new();
        let scene = registry.build(FestivalId::Holi, &Collaborators::none());
        assert_eq!(scene.id(), FestivalId::Default);
    }

    #[test]
    fn test_registered_constructor_used() {
        let registry = SceneRegistry::new().with(FestivalId::Default, |_| Box::new(DefaultScene::new()));
        assert!(registry.is_registered(FestivalId::Default));
        assert_eq!(registry.len(), 1);
        let scene = registry.build(FestivalId::Default, &Collaborators::none());
        assert!(!scene.is_loaded());
    }
}
