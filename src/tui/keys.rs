use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Commands reachable from the table in normal mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Help,
    Up,
    Down,
    NextPage,
    PreviousPage,
    FirstPage,
    LastPage,
    Refresh,
    ToggleRow,
    TogglePage,
    OpenBulkSelect,
    ClearSelection,
}

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub keys: Vec<(KeyCode, KeyModifiers)>,
    pub label: String,
    pub description: String,
}

impl KeyBinding {
    pub fn new(key: KeyCode, modifiers: KeyModifiers, label: &str, description: &str) -> Self {
        Self {
            keys: vec![(key, modifiers)],
            label: label.to_string(),
            description: description.to_string(),
        }
    }

    /// Add an alternative key
    pub fn or(mut self, key: KeyCode, modifiers: KeyModifiers) -> Self {
        self.keys.push((key, modifiers));
        self
    }

    /// Shift is ignored for character keys since it is already part of the
    /// character itself
    pub fn matches(&self, event: &KeyEvent) -> bool {
        let mut modifiers = event.modifiers;
        if matches!(event.code, KeyCode::Char(_)) {
            modifiers.remove(KeyModifiers::SHIFT);
        }
        self.keys
            .iter()
            .any(|(key, mods)| *key == event.code && *mods == modifiers)
    }
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(Action, KeyBinding)>,
}

impl Default for KeyMap {
    fn default() -> Self {
        let none = KeyModifiers::NONE;
        let bindings = vec![
            (
                Action::Quit,
                KeyBinding::new(KeyCode::Char('q'), none, "q", "Quit application")
                    .or(KeyCode::Char('c'), KeyModifiers::CONTROL),
            ),
            (
                Action::Help,
                KeyBinding::new(KeyCode::Char('?'), none, "?", "Show/hide help"),
            ),
            (
                Action::Up,
                KeyBinding::new(KeyCode::Up, none, "↑/k", "Previous row")
                    .or(KeyCode::Char('k'), none),
            ),
            (
                Action::Down,
                KeyBinding::new(KeyCode::Down, none, "↓/j", "Next row")
                    .or(KeyCode::Char('j'), none),
            ),
            (
                Action::NextPage,
                KeyBinding::new(KeyCode::Right, none, "→/l", "Next page")
                    .or(KeyCode::Char('l'), none)
                    .or(KeyCode::PageDown, none),
            ),
            (
                Action::PreviousPage,
                KeyBinding::new(KeyCode::Left, none, "←/h", "Previous page")
                    .or(KeyCode::Char('h'), none)
                    .or(KeyCode::PageUp, none),
            ),
            (
                Action::FirstPage,
                KeyBinding::new(KeyCode::Home, none, "Home/g", "First page")
                    .or(KeyCode::Char('g'), none),
            ),
            (
                Action::LastPage,
                KeyBinding::new(KeyCode::End, none, "End/G", "Last page")
                    .or(KeyCode::Char('G'), none),
            ),
            (
                Action::Refresh,
                KeyBinding::new(KeyCode::Char('r'), none, "r", "Reload current page"),
            ),
            (
                Action::ToggleRow,
                KeyBinding::new(KeyCode::Char(' '), none, "space", "Toggle favorite"),
            ),
            (
                Action::TogglePage,
                KeyBinding::new(KeyCode::Char('a'), none, "a", "Toggle all rows on page"),
            ),
            (
                Action::OpenBulkSelect,
                KeyBinding::new(KeyCode::Char('n'), none, "n", "Select first N rows"),
            ),
            (
                Action::ClearSelection,
                KeyBinding::new(KeyCode::Char('c'), none, "c", "Clear all favorites"),
            ),
        ];

        Self { bindings }
    }
}

impl KeyMap {
    /// Resolve a key event to an action
    pub fn action(&self, event: &KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .find(|(_, binding)| binding.matches(event))
            .map(|(action, _)| *action)
    }

    /// Get help text for all key bindings
    pub fn help_lines(&self) -> Vec<(String, String)> {
        self.bindings
            .iter()
            .map(|(_, b)| (b.label.clone(), b.description.clone()))
            .collect()
    }
}
