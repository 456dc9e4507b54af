use crate::errors::RosterError;
use crate::fsm::ConsoleSnapshot;
use crate::input::{parse_age, parse_index, parse_name};
use crate::logging::{JsonlLogger, LogEvent};
use crate::menu::{action_for_input, menu_lines, CHOICE_PROMPT};
use crate::record_store::RecordStore;
use crate::runtime::Console;
use crate::types::{ConsoleState, Record};
use serde_json::{json, Value};

pub const NAME_PROMPT: &str = "Enter name: ";
pub const AGE_PROMPT: &str = "Enter age: ";
pub const INDEX_PROMPT: &str = "Enter User ID to fetch: ";

pub const MSG_ADDED: &str = "Record added successfully!";
pub const MSG_INVALID_CHOICE: &str = "Invalid choice, please try again.";
pub const MSG_EXIT: &str = "Exiting program...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub records: usize,
    pub iterations: u64,
    pub invalid_choices: u64,
    pub reached_eof: bool,
}

/// Menu-driven loop over an owned `RecordStore`.
pub struct ConsoleLoop<'a> {
    console: &'a dyn Console,
    store: RecordStore,
    logger: Option<&'a JsonlLogger>,
    fsm: ConsoleSnapshot,
    reached_eof: bool,
}

impl<'a> ConsoleLoop<'a> {
    pub fn new(console: &'a dyn Console, store: RecordStore) -> Self {
        Self {
            console,
            store,
            logger: None,
            fsm: ConsoleSnapshot::default(),
            reached_eof: false,
        }
    }

    pub fn with_logger(mut self, logger: Option<&'a JsonlLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn state(&self) -> ConsoleState {
        self.fsm.state
    }

    pub fn into_store(self) -> RecordStore {
        self.store
    }

    /// Runs until the user quits or input runs out. Store and input errors are
    /// reported on the console; only I/O failures end the loop with `Err`.
    pub fn run(&mut self) -> Result<SessionSummary, RosterError> {
        self.log(
            "info",
            "session_started",
            json!({"capacity": self.store.capacity()}),
        )?;

        while !self.fsm.state.is_terminal() {
            self.step()?;
        }

        let summary = SessionSummary {
            records: self.store.len(),
            iterations: self.fsm.iterations,
            invalid_choices: self.fsm.invalid_choices,
            reached_eof: self.reached_eof,
        };
        self.log(
            "info",
            "session_ended",
            json!({
                "records": summary.records,
                "iterations": summary.iterations,
                "invalid_choices": summary.invalid_choices,
                "reached_eof": summary.reached_eof,
            }),
        )?;
        Ok(summary)
    }

    /// Executes one state of the machine.
    pub fn step(&mut self) -> Result<(), RosterError> {
        match self.fsm.state {
            ConsoleState::MenuPrompt => self.menu_prompt(),
            ConsoleState::AddFlow => self.add_flow(),
            ConsoleState::FetchFlow => self.fetch_flow(),
            ConsoleState::Exit => Ok(()),
        }
    }

    fn menu_prompt(&mut self) -> Result<(), RosterError> {
        for line in menu_lines() {
            self.console.write_line(&line)?;
        }
        let Some(raw) = self.prompt(CHOICE_PROMPT)? else {
            return self.end_of_input();
        };

        let action = action_for_input(&raw);
        self.fsm.apply_choice(action)?;
        match self.fsm.state {
            ConsoleState::Exit => self.console.write_line(MSG_EXIT),
            ConsoleState::MenuPrompt => {
                self.console.write_line(MSG_INVALID_CHOICE)?;
                self.log("warn", "invalid_choice", json!({"input": raw.trim()}))
            }
            _ => Ok(()),
        }
    }

    fn add_flow(&mut self) -> Result<(), RosterError> {
        let Some(raw_name) = self.prompt(NAME_PROMPT)? else {
            return self.end_of_input();
        };
        let name = parse_name(&raw_name);
        let Some(raw_age) = self.prompt(AGE_PROMPT)? else {
            return self.end_of_input();
        };

        let outcome = parse_age(&raw_age).and_then(|age| {
            self.store
                .add(name.clone(), age)
                .map(|position| (position, age))
        });
        match outcome {
            Ok((position, age)) => {
                self.console.write_line(MSG_ADDED)?;
                let record = Record::new(name, age);
                self.log(
                    "info",
                    "record_added",
                    json!({"index": position, "record": record}),
                )?;
            }
            Err(err) => self.report(err)?,
        }
        self.fsm.finish_flow()
    }

    fn fetch_flow(&mut self) -> Result<(), RosterError> {
        let Some(raw_index) = self.prompt(INDEX_PROMPT)? else {
            return self.end_of_input();
        };

        let outcome = parse_index(&raw_index)
            .and_then(|index| self.store.fetch(index).map(|record| (index, record.clone())));
        match outcome {
            Ok((index, record)) => {
                self.console.write_line(&format!("Record ID: {index}"))?;
                self.console
                    .write_line(&format!("Name: {}, Age: {}", record.name, record.age))?;
                self.log(
                    "info",
                    "record_fetched",
                    json!({"index": index, "record": record}),
                )?;
            }
            Err(err) => self.report(err)?,
        }
        self.fsm.finish_flow()
    }

    fn prompt(&self, text: &str) -> Result<Option<String>, RosterError> {
        self.console.write(text)?;
        self.console.read_line()
    }

    fn end_of_input(&mut self) -> Result<(), RosterError> {
        self.reached_eof = true;
        // Keep the transcript tidy after an unanswered inline prompt.
        self.console.write_line("")?;
        self.fsm.transition(ConsoleState::Exit)
    }

    fn report(&self, err: RosterError) -> Result<(), RosterError> {
        if !err.is_user_facing() {
            return Err(err);
        }
        self.console.write_line(&user_message(&err))?;
        let (event_type, payload) = match &err {
            RosterError::CapacityExceeded { capacity } => {
                ("capacity_exceeded", json!({"capacity": capacity}))
            }
            RosterError::InvalidIndex { index, len } => {
                ("invalid_index", json!({"index": index, "len": len}))
            }
            other => ("parse_error", json!({"error": other.to_string()})),
        };
        self.log("warn", event_type, payload)
    }

    fn log(&self, level: &str, event_type: &str, payload: Value) -> Result<(), RosterError> {
        let Some(logger) = self.logger else {
            return Ok(());
        };
        logger.append(&LogEvent {
            level,
            event_type,
            payload,
        })
    }
}

/// Console wording for errors the loop recovers from.
pub fn user_message(err: &RosterError) -> String {
    match err {
        RosterError::CapacityExceeded { .. } => {
            "Error: Maximum number of records reached.".to_string()
        }
        RosterError::InvalidIndex { .. } => "Error: Invalid User ID.".to_string(),
        RosterError::Parse(input) => format!("Error: '{input}' is not a valid number."),
        other => format!("Error: {other}"),
    }
}
