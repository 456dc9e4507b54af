use serde::Serialize;

/// A name/age pair. Records carry no id; their position in the store is their identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub name: String,
    pub age: i32,
}

impl Record {
    pub fn new(name: impl Into<String>, age: i32) -> Self {
        Self {
            name: name.into(),
            age,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleState {
    MenuPrompt,
    AddFlow,
    FetchFlow,
    Exit,
}

impl ConsoleState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MenuPrompt => "menu_prompt",
            Self::AddFlow => "add_flow",
            Self::FetchFlow => "fetch_flow",
            Self::Exit => "exit",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Exit)
    }
}
