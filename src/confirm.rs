//! Confirmation gate in front of the release steps.
use std::{
    cell::RefCell,
    io::{self, BufRead, Write},
};

use crate::error::Result;

/// Decides whether the operator agreed to proceed.
#[cfg_attr(test, mockall::automock)]
pub trait ConfirmationPolicy {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Always proceeds. Selected by `--force`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForceConfirmation;

impl ConfirmationPolicy for ForceConfirmation {
    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Ok(true)
    }
}

/// Asks on `output` and reads one line from `input`. Only `y` or `yes`
/// proceeds; anything else, including end of input, declines.
pub struct InteractiveConfirmation<R, W> {
    input: RefCell<R>,
    output: RefCell<W>,
}

impl InteractiveConfirmation<io::StdinLock<'static>, io::Stderr> {
    /// Prompt on stderr so stdout stays clean for sentry-cli output.
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stderr())
    }
}

impl<R: BufRead, W: Write> InteractiveConfirmation<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: RefCell::new(input),
            output: RefCell::new(output),
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output.into_inner()
    }
}

impl<R: BufRead, W: Write> ConfirmationPolicy for InteractiveConfirmation<R, W> {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        {
            let mut output = self.output.borrow_mut();
            write!(output, "{prompt} (yes/no) [no]: ")?;
            output.flush()?;
        }

        let mut answer = String::new();
        self.input.borrow_mut().read_line(&mut answer)?;

        Ok(matches!(
            answer.trim().to_ascii_lowercase().as_str(),
            "y" | "yes"
        ))
    }
}
