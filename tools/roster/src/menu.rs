#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuBinding {
    pub key: u32,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Add,
    Fetch,
    Quit,
}

pub const MENU_HEADER: &str = "Choose an option:";
pub const CHOICE_PROMPT: &str = "Enter choice: ";

pub const MENU_BINDINGS: [MenuBinding; 3] = [
    MenuBinding {
        key: 1,
        label: "Add Record",
    },
    MenuBinding {
        key: 2,
        label: "Fetch Record",
    },
    MenuBinding {
        key: 3,
        label: "Quit",
    },
];

/// Menu lines as printed before every prompt, blank separator line first.
pub fn menu_lines() -> Vec<String> {
    let mut lines = vec![String::new(), MENU_HEADER.to_string()];
    lines.extend(
        MENU_BINDINGS
            .iter()
            .map(|binding| format!("{}. {}", binding.key, binding.label)),
    );
    lines
}

pub fn action_for_key(key: i64) -> Option<MenuAction> {
    match key {
        1 => Some(MenuAction::Add),
        2 => Some(MenuAction::Fetch),
        3 => Some(MenuAction::Quit),
        _ => None,
    }
}

/// Anything that is not one of the listed integers, including non-numeric
/// text, is an invalid choice rather than a parse error.
pub fn action_for_input(raw: &str) -> Option<MenuAction> {
    raw.trim().parse::<i64>().ok().and_then(action_for_key)
}
