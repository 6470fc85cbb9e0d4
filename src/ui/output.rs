//! Build log output
//!
//! The build log is plain, indented text meant to be read in CI output.
//! Titles and process headings are styled when the terminal supports it.

use crate::layer::Environment;
use console::style;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// In-memory writer that can be cloned and read back
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        match self.0.lock() {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => String::new(),
        }
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self
            .0
            .lock()
            .map_err(|_| io::Error::other("build log buffer poisoned"))?;
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Writes build progress to the build log
#[derive(Clone)]
pub struct Emitter {
    out: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Emitter {
    /// Create an emitter writing to `writer`
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            out: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// Create an emitter writing to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    fn line(&self, text: &str) {
        if let Ok(mut out) = self.out.lock() {
            writeln!(out, "{}", text).ok();
            out.flush().ok();
        }
    }

    /// Buildpack title line
    pub fn title(&self, text: &str) {
        self.line(&style(text).bold().to_string());
    }

    /// Top-level step
    pub fn process(&self, text: &str) {
        self.line(&format!("  {}", style(text).cyan()));
    }

    /// Detail of the current step
    pub fn subprocess(&self, text: &str) {
        self.line(&format!("    {}", text));
    }

    /// Outcome of the current step
    pub fn action(&self, text: &str) {
        self.line(&format!("      {}", text));
    }

    /// Raw output line from a child process
    pub fn detail(&self, text: &str) {
        self.line(&format!("      {}", style(text).dim()));
    }

    /// Blank separator line
    pub fn break_line(&self) {
        self.line("");
    }

    /// List the variables configured on a layer's shared environment
    pub fn environment(&self, env: &Environment) {
        for (name, value) in env.describe() {
            self.subprocess(&format!("{} -> \"{}\"", name, value));
        }
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter").finish_non_exhaustive()
    }
}
