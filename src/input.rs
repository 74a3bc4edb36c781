//! Console prompting.
//!
//! The typed readers reprompt until the line parses; they never give up on
//! bad input. Only a closed input stream or an I/O failure ends the loop.

use std::io::{BufRead, Write};

use crate::error::{Result, TrackerError};

pub const INT_RETRY: &str = "<<< Please enter whole numbers only >>>";
pub const REAL_RETRY: &str = "<<< Please enter numbers only >>>";
pub const ALPHA_RETRY: &str = "<<< Please enter letters only >>>";

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writer used for prompts; also where callers print user-facing notices.
    pub fn output(&mut self) -> &mut W {
        &mut self.output
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Shows `prompt` and returns the next line without its line terminator.
    /// Any text is accepted, including the empty string.
    pub fn read_line(&mut self, prompt: &str) -> Result<String> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(TrackerError::InputClosed);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(line)
    }

    pub fn read_int(&mut self, prompt: &str) -> Result<i64> {
        self.read_parsed(prompt, INT_RETRY, |line| line.trim().parse().ok())
    }

    pub fn read_real(&mut self, prompt: &str) -> Result<f64> {
        self.read_parsed(prompt, REAL_RETRY, |line| line.trim().parse().ok())
    }

    /// Letters only: spaces, digits and punctuation are all rejected, so
    /// multi-word values cannot be entered here.
    pub fn read_alpha(&mut self, prompt: &str) -> Result<String> {
        self.read_parsed(prompt, ALPHA_RETRY, |line| {
            is_alphabetic(line).then(|| line.to_string())
        })
    }

    fn read_parsed<T>(
        &mut self,
        prompt: &str,
        retry: &str,
        parse: impl Fn(&str) -> Option<T>,
    ) -> Result<T> {
        loop {
            let line = self.read_line(prompt)?;
            if let Some(value) = parse(&line) {
                return Ok(value);
            }
            writeln!(self.output, "{retry}")?;
        }
    }
}

fn is_alphabetic(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_alphabetic)
}
