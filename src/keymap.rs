use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::action::LabelAction;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum KeymapProfile {
    #[default]
    Default,
    Vim,
    Arrows,
}

#[derive(Clone, Copy, Debug)]
pub struct LabelKeyBindings {
    profile: KeymapProfile,
}

impl Default for LabelKeyBindings {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelKeyBindings {
    pub const fn new() -> Self {
        Self {
            profile: KeymapProfile::Default,
        }
    }

    pub const fn with_profile(profile: KeymapProfile) -> Self {
        Self { profile }
    }

    pub const fn profile(&self) -> KeymapProfile {
        self.profile
    }

    pub const fn set_profile(&mut self, profile: KeymapProfile) {
        self.profile = profile;
    }

    pub fn resolve<C>(&self, key: KeyEvent) -> Option<LabelAction<C>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('a') => return Some(LabelAction::ToggleAll),
                KeyCode::Char('s') => return Some(LabelAction::CycleSort),
                _ => {}
            }
        }

        let nav_action = match self.profile {
            KeymapProfile::Default => self.resolve_default_nav(key),
            KeymapProfile::Vim => self.resolve_vim_nav(key),
            KeymapProfile::Arrows => self.resolve_arrow_nav(key),
        };
        if nav_action.is_some() {
            return nav_action;
        }

        self.resolve_common(key)
    }

    pub fn resolve_with<C, F>(&self, key: KeyEvent, custom: F) -> Option<LabelAction<C>>
    where
        F: Fn(KeyEvent) -> Option<C>,
    {
        if let Some(action) = custom(key) {
            return Some(LabelAction::Custom(action));
        }

        self.resolve(key)
    }

    const fn resolve_default_nav<C>(&self, key: KeyEvent) -> Option<LabelAction<C>> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(LabelAction::SelectPrev),
            KeyCode::Down | KeyCode::Char('j') => Some(LabelAction::SelectNext),
            _ => None,
        }
    }

    const fn resolve_vim_nav<C>(&self, key: KeyEvent) -> Option<LabelAction<C>> {
        match key.code {
            KeyCode::Char('k') => Some(LabelAction::SelectPrev),
            KeyCode::Char('j') => Some(LabelAction::SelectNext),
            KeyCode::Char('g') => Some(LabelAction::SelectFirst),
            KeyCode::Char('G') => Some(LabelAction::SelectLast),
            _ => None,
        }
    }

    const fn resolve_arrow_nav<C>(&self, key: KeyEvent) -> Option<LabelAction<C>> {
        match key.code {
            KeyCode::Up => Some(LabelAction::SelectPrev),
            KeyCode::Down => Some(LabelAction::SelectNext),
            _ => None,
        }
    }

    fn resolve_common<C>(&self, key: KeyEvent) -> Option<LabelAction<C>> {
        match key.code {
            KeyCode::Char(' ') => Some(LabelAction::ToggleChecked),
            KeyCode::Char('a') => Some(LabelAction::ToggleAll),
            KeyCode::Char('s') => Some(LabelAction::CycleSort),
            KeyCode::Enter => Some(LabelAction::Activate),
            KeyCode::F(2) | KeyCode::Char('e') => Some(LabelAction::EditName),
            KeyCode::Delete | KeyCode::Char('d') => Some(LabelAction::RemoveLabel),
            KeyCode::Home => Some(LabelAction::SelectFirst),
            KeyCode::End => Some(LabelAction::SelectLast),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn arrows_profile_ignores_letters_for_navigation() {
        let bindings = LabelKeyBindings::with_profile(KeymapProfile::Arrows);

        assert_eq!(
            bindings.resolve::<()>(key(KeyCode::Down)),
            Some(LabelAction::SelectNext)
        );
        assert_eq!(bindings.resolve::<()>(key(KeyCode::Char('j'))), None);
    }

    #[test]
    fn custom_mapping_takes_precedence() {
        let bindings = LabelKeyBindings::new();

        let action = bindings.resolve_with(key(KeyCode::Char(' ')), |event| {
            (event.code == KeyCode::Char(' ')).then_some(7_u8)
        });

        assert_eq!(action, Some(LabelAction::Custom(7)));
        assert_eq!(
            bindings.resolve::<()>(key(KeyCode::Char(' '))),
            Some(LabelAction::ToggleChecked)
        );
    }

    #[test]
    fn control_chords_toggle_all_and_sort() {
        let bindings = LabelKeyBindings::new();
        let chord = KeyEvent::new(KeyCode::Char('s'), KeyModifiers::CONTROL);

        assert_eq!(bindings.resolve::<()>(chord), Some(LabelAction::CycleSort));
    }
}
