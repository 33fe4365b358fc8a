use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Key binding configuration
#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub keys: Vec<KeyCode>,
    pub modifiers: KeyModifiers,
    pub description: String,
}

impl KeyBinding {
    pub fn new(keys: &[KeyCode], modifiers: KeyModifiers, description: &str) -> Self {
        Self {
            keys: keys.to_vec(),
            modifiers,
            description: description.to_string(),
        }
    }

    /// Shift is ignored so bindings like `+` work on every layout
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys.contains(&event.code) && event.modifiers - KeyModifiers::SHIFT == self.modifiers
    }

    /// Key label for help text, e.g. `Ctrl+C` or `←/h`
    pub fn label(&self) -> String {
        let keys = self
            .keys
            .iter()
            .map(|key| match key {
                KeyCode::Left => "←".to_string(),
                KeyCode::Right => "→".to_string(),
                KeyCode::Up => "↑".to_string(),
                KeyCode::Down => "↓".to_string(),
                KeyCode::Enter => "Enter".to_string(),
                KeyCode::Esc => "Esc".to_string(),
                KeyCode::Char(c) => c.to_string(),
                other => format!("{:?}", other),
            })
            .collect::<Vec<_>>()
            .join("/");

        if self.modifiers.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", keys.to_uppercase())
        } else {
            keys
        }
    }
}

/// Application key mappings
#[derive(Debug, Clone)]
pub struct KeyMap {
    /// Quit application
    pub quit: KeyBinding,

    /// Show help
    pub help: KeyBinding,

    pub next_page: KeyBinding,
    pub previous_page: KeyBinding,
    pub larger_pages: KeyBinding,
    pub smaller_pages: KeyBinding,
    pub reload: KeyBinding,
    pub tenants: KeyBinding,
    pub select: KeyBinding,
    pub back: KeyBinding,
    pub up: KeyBinding,
    pub down: KeyBinding,
}

impl Default for KeyMap {
    fn default() -> Self {
        let none = KeyModifiers::NONE;
        Self {
            quit: KeyBinding::new(&[KeyCode::Char('c')], KeyModifiers::CONTROL, "Quit application"),
            help: KeyBinding::new(&[KeyCode::Char('g')], KeyModifiers::CONTROL, "Show/hide help"),
            next_page: KeyBinding::new(&[KeyCode::Right, KeyCode::Char('l')], none, "Next page"),
            previous_page: KeyBinding::new(
                &[KeyCode::Left, KeyCode::Char('h')],
                none,
                "Previous page",
            ),
            larger_pages: KeyBinding::new(
                &[KeyCode::Char('+'), KeyCode::Char('=')],
                none,
                "More users per page",
            ),
            smaller_pages: KeyBinding::new(&[KeyCode::Char('-')], none, "Fewer users per page"),
            reload: KeyBinding::new(&[KeyCode::Char('r')], none, "Reload from the first page"),
            tenants: KeyBinding::new(&[KeyCode::Char('t')], none, "Choose tenant"),
            select: KeyBinding::new(&[KeyCode::Enter], none, "Select"),
            back: KeyBinding::new(&[KeyCode::Esc], none, "Back"),
            up: KeyBinding::new(&[KeyCode::Up, KeyCode::Char('k')], none, "Move up"),
            down: KeyBinding::new(&[KeyCode::Down, KeyCode::Char('j')], none, "Move down"),
        }
    }
}

impl KeyMap {
    /// Check if the event should quit the application
    pub fn should_quit(&self, event: &KeyEvent) -> bool {
        self.quit.matches(event)
            || (event.code == KeyCode::Char('q') && event.modifiers == KeyModifiers::NONE)
    }

    /// Check if the event should show help
    pub fn should_show_help(&self, event: &KeyEvent) -> bool {
        self.help.matches(event)
    }

    /// Get help text for all key bindings
    pub fn help_text(&self) -> String {
        [
            &self.previous_page,
            &self.next_page,
            &self.larger_pages,
            &self.smaller_pages,
            &self.reload,
            &self.tenants,
            &self.select,
            &self.back,
            &self.help,
            &self.quit,
        ]
        .iter()
        .map(|binding| format!("{:<10} {}", binding.label(), binding.description))
        .collect::<Vec<_>>()
        .join("\n")
    }
}
