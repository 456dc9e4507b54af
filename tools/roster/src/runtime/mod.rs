use crate::errors::RosterError;
use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub trait FileSystem: Send + Sync {
    fn read_to_string(&self, path: &Path) -> Result<String, RosterError>;
}

pub trait Console: Send + Sync {
    /// Returns `None` once input is exhausted.
    fn read_line(&self) -> Result<Option<String>, RosterError>;
    /// Writes without a newline and flushes, for inline prompts.
    fn write(&self, text: &str) -> Result<(), RosterError>;
    fn write_line(&self, line: &str) -> Result<(), RosterError>;
}

pub struct ProductionFileSystem;

impl FileSystem for ProductionFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, RosterError> {
        std::fs::read_to_string(path).map_err(|e| RosterError::Io(e.to_string()))
    }
}

pub struct ProductionConsole;

impl Console for ProductionConsole {
    fn read_line(&self) -> Result<Option<String>, RosterError> {
        let mut line = String::new();
        let read = std::io::stdin()
            .read_line(&mut line)
            .map_err(|e| RosterError::Io(e.to_string()))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line))
    }

    fn write(&self, text: &str) -> Result<(), RosterError> {
        use std::io::Write;
        let mut out = std::io::stdout();
        out.write_all(text.as_bytes())
            .and_then(|_| out.flush())
            .map_err(|e| RosterError::Io(e.to_string()))
    }

    fn write_line(&self, line: &str) -> Result<(), RosterError> {
        use std::io::Write;
        let mut out = std::io::stdout();
        writeln!(out, "{line}").map_err(|e| RosterError::Io(e.to_string()))
    }
}

pub struct ProductionRuntime {
    pub file_system: Arc<dyn FileSystem>,
    pub console: Arc<dyn Console>,
}

impl ProductionRuntime {
    pub fn new() -> Self {
        Self {
            file_system: Arc::new(ProductionFileSystem),
            console: Arc::new(ProductionConsole),
        }
    }
}

impl Default for ProductionRuntime {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Default, Clone)]
pub struct FakeFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, String>>>,
    fail_next: Arc<Mutex<Option<RosterError>>>,
}

impl FakeFileSystem {
    pub fn with_file(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .expect("files lock")
            .insert(path.into(), contents.into());
        fs
    }

    pub fn set_fail_next(&self, error: RosterError) {
        *self.fail_next.lock().expect("fail lock") = Some(error);
    }

    fn maybe_fail(&self) -> Result<(), RosterError> {
        if let Some(err) = self.fail_next.lock().expect("fail lock").take() {
            return Err(err);
        }
        Ok(())
    }
}

impl FileSystem for FakeFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String, RosterError> {
        self.maybe_fail()?;
        self.files
            .lock()
            .expect("files lock")
            .get(path)
            .cloned()
            .ok_or_else(|| RosterError::Io(format!("missing file {}", path.display())))
    }
}

/// Scripted console: input lines are queued up front and everything written
/// is captured as one transcript.
#[derive(Default, Clone)]
pub struct FakeConsole {
    input: Arc<Mutex<VecDeque<String>>>,
    transcript: Arc<Mutex<String>>,
}

impl FakeConsole {
    pub fn with_input<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let console = Self::default();
        console.push_input(lines);
        console
    }

    pub fn push_input<I, S>(&self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut input = self.input.lock().expect("input lock");
        for line in lines {
            let mut line = line.into();
            if !line.ends_with('\n') {
                line.push('\n');
            }
            input.push_back(line);
        }
    }

    pub fn transcript(&self) -> String {
        self.transcript.lock().expect("transcript lock").clone()
    }

    pub fn written_lines(&self) -> Vec<String> {
        self.transcript().lines().map(str::to_string).collect()
    }

    pub fn remaining_input(&self) -> usize {
        self.input.lock().expect("input lock").len()
    }
}

impl Console for FakeConsole {
    fn read_line(&self) -> Result<Option<String>, RosterError> {
        Ok(self.input.lock().expect("input lock").pop_front())
    }

    fn write(&self, text: &str) -> Result<(), RosterError> {
        self.transcript
            .lock()
            .expect("transcript lock")
            .push_str(text);
        Ok(())
    }

    fn write_line(&self, line: &str) -> Result<(), RosterError> {
        let mut transcript = self.transcript.lock().expect("transcript lock");
        transcript.push_str(line);
        transcript.push('\n');
        Ok(())
    }
}
