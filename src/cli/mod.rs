//! CLI front end
//!
//! Bridges clap argument parsing and terminal input with the ledger service:
//! the interactive session, its prompting helpers and the demo scenarios.

pub mod demo;
pub mod prompt;
pub mod session;

pub use demo::{run_demo, run_precision_demo};
pub use prompt::{PromptPolicy, Prompter};
pub use session::{Session, SessionOptions};
