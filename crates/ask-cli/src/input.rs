use std::io::Write;

use anyhow::{Result, anyhow};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Line-oriented stdin shared by prompts and the chat loop.
pub struct Input {
    lines: Lines<BufReader<Stdin>>,
}

impl Input {
    pub fn stdin() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }

    /// Next line, or `None` at end of input. Cancel safe.
    pub async fn next_line(&mut self) -> Result<Option<String>> {
        Ok(self.lines.next_line().await?)
    }

    /// Show `label` and read one answer. End of input is an error here.
    pub async fn prompt(&mut self, label: &str) -> Result<String> {
        print!("{}: ", label);
        std::io::stdout().flush()?;
        self.next_line()
            .await?
            .ok_or_else(|| anyhow!("input closed while waiting for {}", label.to_lowercase()))
    }

    /// Use `given` if present, otherwise ask for it.
    pub async fn value_or_prompt(&mut self, given: Option<String>, label: &str) -> Result<String> {
        match given {
            Some(value) => Ok(value),
            None => self.prompt(label).await,
        }
    }
}
