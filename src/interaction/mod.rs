//! Terminal interaction for confirmations

pub mod prompts;

pub use prompts::{FixedPrompter, StdinPrompter, UserPrompter};
