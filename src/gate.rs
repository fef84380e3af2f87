//! Operator gates between sequencer steps

use crate::domain::ports::Gate;
use crate::error::Result;
use async_trait::async_trait;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Stdin};
use tracing::debug;

pub const PROMPT: &str = "-> Press Return key to continue.";

/// Prompts and waits for one line of input.
///
/// End of input counts as confirmation so piped runs do not hang.
pub struct LineGate<R, W> {
    input: R,
    output: W,
}

/// [`LineGate`] on the controlling terminal
pub type StdinGate = LineGate<BufReader<Stdin>, std::io::Stdout>;

impl StdinGate {
    pub fn stdin() -> Self {
        LineGate::new(BufReader::new(tokio::io::stdin()), std::io::stdout())
    }
}

impl<R, W> LineGate<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

#[async_trait]
impl<R, W> Gate for LineGate<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: Write + Send,
{
    async fn confirm(&mut self) -> Result<()> {
        write!(self.output, "{}", PROMPT)?;
        self.output.flush()?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).await?;
        if read == 0 {
            debug!("Input closed at gate, continuing");
        }

        writeln!(self.output)?;
        Ok(())
    }
}

/// Gate that never waits
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoConfirm;

#[async_trait]
impl Gate for AutoConfirm {
    async fn confirm(&mut self) -> Result<()> {
        debug!("Auto-confirming step");
        Ok(())
    }
}
