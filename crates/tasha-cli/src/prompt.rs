//! Numbered-menu prompt on the terminal.

use std::collections::BTreeSet;
use std::io::{self, BufRead, Write};

use colored::Colorize;
use tasha_mechanics::{Prompt, PromptError};

pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Result<String, PromptError> {
        self.output.flush()?;
        let mut line = String::new();
        match self.input.read_line(&mut line)? {
            0 => Err(PromptError::Closed),
            _ => Ok(line.trim().to_string()),
        }
    }
}

/// Parse `count` distinct 1-based menu numbers separated by spaces or
/// commas.
fn parse_selection(line: &str, len: usize, count: usize) -> Result<Vec<usize>, String> {
    let mut picked = Vec::new();
    let mut seen = BTreeSet::new();
    for token in line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
    {
        let n: usize = token
            .parse()
            .map_err(|_| format!("'{token}' is not a number"))?;
        if n == 0 || n > len {
            return Err(format!("{n} is not between 1 and {len}"));
        }
        if !seen.insert(n) {
            return Err(format!("{n} was chosen twice"));
        }
        picked.push(n - 1);
    }
    if picked.len() != count {
        return Err(format!("choose exactly {count}"));
    }
    Ok(picked)
}

impl<R: BufRead, W: Write> Prompt for ConsolePrompt<R, W> {
    fn choose(
        &mut self,
        message: &str,
        candidates: &[String],
        count: usize,
    ) -> Result<Vec<String>, PromptError> {
        writeln!(self.output)?;
        writeln!(self.output, "  {}", message.bold())?;
        for (i, candidate) in candidates.iter().enumerate() {
            writeln!(self.output, "  {:>3}. {candidate}", i + 1)?;
        }
        loop {
            if count == 1 {
                write!(self.output, "  > ")?;
            } else {
                write!(self.output, "  pick {count} > ")?;
            }
            let line = self.read_line()?;
            match parse_selection(&line, candidates.len(), count) {
                Ok(indices) => {
                    return Ok(indices.into_iter().map(|i| candidates[i].clone()).collect());
                }
                Err(e) => writeln!(self.output, "  {}", e.yellow())?,
            }
        }
    }

    fn confirm(&mut self, message: &str) -> Result<bool, PromptError> {
        loop {
            write!(self.output, "  {} [y/n] ", message.bold())?;
            let line = self.read_line()?;
            match line.to_lowercase().as_str() {
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.output, "  {}", "answer y or n".yellow())?,
            }
        }
    }
}
