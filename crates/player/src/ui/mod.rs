//! Rendering layer stand-in for the terminal binary.

pub mod terminal;

pub use terminal::{render, OutputFormat, ParseCommandError, TerminalCommand, HELP};
