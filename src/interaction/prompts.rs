//! User prompting implementation

use anyhow::Result;
use async_trait::async_trait;
use std::io::{self, BufRead, Write};
use std::sync::Mutex;

/// Trait for user prompting
#[async_trait]
pub trait UserPrompter: Send + Sync {
    /// Ask a yes/no question; an empty answer or end of input yields `default`
    async fn prompt_yes_no(&self, message: &str, default: bool) -> Result<bool>;
}

/// Prompts on the terminal and reads one line from stdin
pub struct StdinPrompter;

impl Default for StdinPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl StdinPrompter {
    pub fn new() -> Self {
        Self
    }

    /// Render the question with its answer hint
    pub fn format_question(message: &str, default: bool) -> String {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        format!("{message} {hint}: ")
    }

    /// Interpret a typed answer; `None` means end of input
    pub fn interpret_answer(input: Option<&str>, default: bool) -> bool {
        let Some(input) = input else {
            return default;
        };
        match input.trim().to_lowercase().as_str() {
            "" => default,
            "y" | "yes" => true,
            _ => false,
        }
    }

    fn read_line() -> Result<Option<String>> {
        let mut input = String::new();
        let read = io::stdin().lock().read_line(&mut input)?;
        if read == 0 {
            Ok(None)
        } else {
            Ok(Some(input))
        }
    }
}

#[async_trait]
impl UserPrompter for StdinPrompter {
    async fn prompt_yes_no(&self, message: &str, default: bool) -> Result<bool> {
        print!("{}", Self::format_question(message, default));
        io::stdout().flush()?;

        let input = Self::read_line()?;
        if input.is_none() {
            // Keep the next output off the prompt line
            println!();
        }
        Ok(Self::interpret_answer(input.as_deref(), default))
    }
}

/// Answers every question the same way and remembers what was asked
pub struct FixedPrompter {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl FixedPrompter {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order
    pub fn questions(&self) -> Vec<String> {
        self.asked
            .lock()
            .map(|asked| asked.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl UserPrompter for FixedPrompter {
    async fn prompt_yes_no(&self, message: &str, _default: bool) -> Result<bool> {
        if let Ok(mut asked) = self.asked.lock() {
            asked.push(message.to_string());
        }
        Ok(self.answer)
    }
}
