//! Testing utilities for termprint output
//!
//! Provides `TestConsole` for capturing and asserting on rendered output.

mod test_console;

pub use test_console::TestConsole;
