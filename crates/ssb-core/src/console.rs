//! User-facing output and questions.
//!
//! Diagnostics go through `tracing`. The list table and the uninstall
//! confirmation go through a `Console` handed to the registry at construction,
//! so they can be redirected or scripted.

use crate::error::{Result, SsbError};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

/// Sink for user-facing lines and source of yes/no answers.
pub trait Console {
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Ask a yes/no question. Only an exact `y` answers yes.
    fn confirm(&mut self, question: &str) -> Result<bool>;
}

/// Console on stdout/stdin.
#[derive(Debug, Default)]
pub struct TerminalConsole {
    assume_yes: bool,
}

impl TerminalConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every question with yes without reading stdin.
    pub fn assume_yes() -> Self {
        Self { assume_yes: true }
    }
}

impl Console for TerminalConsole {
    fn write_line(&mut self, line: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        Ok(())
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }

        {
            let mut stdout = io::stdout().lock();
            write!(stdout, "{} [y/N] ", question)?;
            stdout.flush()?;
        }

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(is_yes(&answer))
    }
}

fn is_yes(answer: &str) -> bool {
    answer.trim_end_matches(['\r', '\n']) == "y"
}

/// Console that records output and replays scripted answers.
///
/// Clones share the same buffers, so a caller can keep one clone while the
/// registry owns another.
#[derive(Debug, Clone, Default)]
pub struct BufferConsole {
    state: Rc<RefCell<BufferState>>,
}

#[derive(Debug, Default)]
struct BufferState {
    lines: Vec<String>,
    answers: VecDeque<String>,
    questions: Vec<String>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue answers returned by successive `confirm` calls.
    pub fn with_answers<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let console = Self::new();
        console
            .state
            .borrow_mut()
            .answers
            .extend(answers.into_iter().map(Into::into));
        console
    }

    pub fn lines(&self) -> Vec<String> {
        self.state.borrow().lines.clone()
    }

    pub fn questions(&self) -> Vec<String> {
        self.state.borrow().questions.clone()
    }
}

impl Console for BufferConsole {
    fn write_line(&mut self, line: &str) -> Result<()> {
        self.state.borrow_mut().lines.push(line.to_string());
        Ok(())
    }

    fn confirm(&mut self, question: &str) -> Result<bool> {
        let mut state = self.state.borrow_mut();
        state.questions.push(question.to_string());
        let answer = state.answers.pop_front().ok_or_else(|| SsbError::Io {
            message: format!("no scripted answer for: {}", question),
            path: None,
            source: None,
        })?;
        Ok(is_yes(&answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_exact_y_confirms() {
        assert!(is_yes("y\n"));
        assert!(is_yes("y\r\n"));
        assert!(!is_yes("Y\n"));
        assert!(!is_yes("yes\n"));
        assert!(!is_yes("\n"));
        assert!(!is_yes(" y\n"));
    }

    #[test]
    fn test_buffer_console_replays_answers() {
        let mut console = BufferConsole::with_answers(["y", "n"]);

        assert!(console.confirm("first?").unwrap());
        assert!(!console.confirm("second?").unwrap());
        assert!(console.confirm("third?").is_err());
        assert_eq!(console.questions().len(), 3);
    }

    #[test]
    fn test_buffer_console_records_lines() {
        let console = BufferConsole::new();
        let mut owned = console.clone();
        owned.write_line("hello").unwrap();
        assert_eq!(console.lines(), vec!["hello".to_string()]);
    }
}
