use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Navigate,     // Browse, paste, toggle settings
    Edit,         // Editing the selected item
    Search,       // Typing the substring filter
    ConfirmClear, // Waiting for y/n before clearing
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Navigate => write!(f, "NAVIGATE"),
            Mode::Edit => write!(f, "EDIT"),
            Mode::Search => write!(f, "SEARCH"),
            Mode::ConfirmClear => write!(f, "CLEAR?"),
        }
    }
}
