use std::collections::HashMap;

use crate::scroll::{ElementScrollState, ScrollState, TextScrollState};

/// Scroll state for every named scroller.
///
/// The runtime owns one registry for the life of the session and lends it to
/// each frame; scrollers look their state up by name, so the tree can be
/// rebuilt from scratch every frame without losing positions.
#[derive(Debug, Default)]
pub struct StateRegistry {
    states: HashMap<String, ScrollState>,
}

impl StateRegistry {
    /// Mutable element state for `name`, created on first use. A slot that
    /// previously held text state is replaced.
    pub fn element_entry(&mut self, name: &str) -> &mut ElementScrollState {
        let slot = self
            .states
            .entry(name.to_owned())
            .or_insert_with(|| ScrollState::Element(ElementScrollState::default()));
        if !matches!(slot, ScrollState::Element(_)) {
            *slot = ScrollState::Element(ElementScrollState::default());
        }
        match slot {
            ScrollState::Element(state) => state,
            ScrollState::Text(_) => unreachable!("slot replaced above"),
        }
    }

    /// Mutable text state for `name`, created on first use. A slot that
    /// previously held element state is replaced.
    pub fn text_entry(&mut self, name: &str) -> &mut TextScrollState {
        let slot = self
            .states
            .entry(name.to_owned())
            .or_insert_with(|| ScrollState::Text(TextScrollState::default()));
        if !matches!(slot, ScrollState::Text(_)) {
            *slot = ScrollState::Text(TextScrollState::default());
        }
        match slot {
            ScrollState::Text(state) => state,
            ScrollState::Element(_) => unreachable!("slot replaced above"),
        }
    }

    /// Element state for `name`, if a scroller by that name has rendered.
    pub fn element_state(&self, name: &str) -> Option<&ElementScrollState> {
        match self.states.get(name) {
            Some(ScrollState::Element(state)) => Some(state),
            _ => None,
        }
    }

    /// Text state for `name`, if a scroller by that name has rendered.
    pub fn text_state(&self, name: &str) -> Option<&TextScrollState> {
        match self.states.get(name) {
            Some(ScrollState::Text(state)) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn element_state_mut(&mut self, name: &str) -> Option<&mut ElementScrollState> {
        match self.states.get_mut(name) {
            Some(ScrollState::Element(state)) => Some(state),
            _ => None,
        }
    }

    pub(crate) fn text_state_mut(&mut self, name: &str) -> Option<&mut TextScrollState> {
        match self.states.get_mut(name) {
            Some(ScrollState::Text(state)) => Some(state),
            _ => None,
        }
    }

    /// Forget the state for one scroller name.
    pub fn remove(&mut self, name: &str) {
        self.states.remove(name);
    }

    /// Forget every scroller's state.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_create_state_on_first_use() {
        let mut registry = StateRegistry::default();
        assert!(registry.is_empty());

        registry.text_entry("logs");
        registry.element_entry("services");
        assert_eq!(registry.len(), 2);
        assert!(registry.text_state("logs").is_some());
        assert!(registry.element_state("services").is_some());
    }

    #[test]
    fn a_name_holds_one_kind_of_state_at_a_time() {
        let mut registry = StateRegistry::default();
        registry.text_entry("pane").set_follow(false);
        assert!(!registry.text_entry("pane").is_following());

        registry.element_entry("pane");
        assert!(registry.text_state("pane").is_none());
        assert!(registry.element_state("pane").is_some());

        // Coming back as a text scroller starts fresh.
        assert!(registry.text_entry("pane").is_following());
    }

    #[test]
    fn getters_never_create_state() {
        let registry = StateRegistry::default();
        assert!(registry.text_state("missing").is_none());
        assert!(registry.element_state("missing").is_none());
    }

    #[test]
    fn removal_only_touches_the_named_scroller() {
        let mut registry = StateRegistry::default();
        registry.text_entry("logs");
        registry.element_entry("services");

        registry.remove("logs");
        assert!(registry.text_state("logs").is_none());
        assert!(registry.element_state("services").is_some());

        registry.clear();
        assert!(registry.is_empty());
    }
}
