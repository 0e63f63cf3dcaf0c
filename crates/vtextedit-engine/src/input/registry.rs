use std::collections::BTreeMap;

use crate::input::{InputMode, InputModeFactory, NORMAL_INPUT_MODE, NormalInputModeFactory};

/// Input mode factories by name
pub struct InputModeRegistry {
    factories: BTreeMap<String, Box<dyn InputModeFactory>>,
}

impl InputModeRegistry {
    /// A registry holding only the normal mode
    pub fn new() -> Self {
        let mut registry = Self {
            factories: BTreeMap::new(),
        };
        registry.register(Box::new(NormalInputModeFactory));
        registry
    }

    /// Add a factory, replacing any factory already registered under its name
    pub fn register(&mut self, factory: Box<dyn InputModeFactory>) -> Option<Box<dyn InputModeFactory>> {
        let name = factory.name().to_string();
        self.factories.insert(name, factory)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    pub fn description(&self, name: &str) -> Option<&str> {
        self.factories.get(name).map(|factory| factory.description())
    }

    /// Create the named mode; unknown names get the normal mode
    pub fn create(&self, name: &str) -> Box<dyn InputMode> {
        if let Some(factory) = self.factories.get(name) {
            return factory.create_input_mode();
        }

        log::warn!("Unknown input mode {name:?}, using {NORMAL_INPUT_MODE:?}");
        match self.factories.get(NORMAL_INPUT_MODE) {
            Some(factory) => factory.create_input_mode(),
            None => NormalInputModeFactory.create_input_mode(),
        }
    }
}

impl Default for InputModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for InputModeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputModeRegistry")
            .field("modes", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputModeEditor, KeyEvent};
    use pretty_assertions::assert_eq;

    struct SwallowAll;

    impl InputMode for SwallowAll {
        fn name(&self) -> &str {
            "swallow"
        }

        fn key_press(&mut self, _editor: &mut dyn InputModeEditor, _event: &KeyEvent) -> bool {
            true
        }
    }

    struct SwallowAllFactory;

    impl InputModeFactory for SwallowAllFactory {
        fn create_input_mode(&self) -> Box<dyn InputMode> {
            Box::new(SwallowAll)
        }

        fn name(&self) -> &str {
            "swallow"
        }

        fn description(&self) -> &str {
            "Consumes every key"
        }
    }

    #[test]
    fn test_default_registry_has_normal_mode() {
        let registry = InputModeRegistry::default();

        assert_eq!(registry.names(), vec!["normal"]);
        assert_eq!(registry.create("normal").name(), "normal");
        assert_eq!(registry.description("normal"), Some("Normal input mode"));
    }

    #[test]
    fn test_register_and_create_custom_mode() {
        let mut registry = InputModeRegistry::new();

        assert!(registry.register(Box::new(SwallowAllFactory)).is_none());

        assert_eq!(registry.names(), vec!["normal", "swallow"]);
        assert_eq!(registry.create("swallow").name(), "swallow");
    }

    #[test]
    fn test_unknown_mode_falls_back_to_normal() {
        let registry = InputModeRegistry::new();

        assert_eq!(registry.create("vi").name(), "normal");
    }
}
