//! TestConsole for capturing output in tests
//!
//! Provides a Console that writes into a buffer for assertion instead of to
//! a terminal.

use std::io::Write;
use std::sync::{Arc, Mutex};

use strip_ansi_escapes::strip;

use crate::console::Console;
use crate::renderer::Renderer;
use crate::scheme::{ColorScheme, SchemeName};

/// A Console that captures output for testing
///
/// Use `console()` or `renderer()` to get something to print through, then
/// use `output()`, `contains()`, and the assertion methods to verify it.
#[derive(Clone)]
pub struct TestConsole {
    inner: Console,
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl TestConsole {
    /// Create a test console that writes plain text
    #[must_use]
    pub fn new() -> Self {
        Self::new_inner(false)
    }

    /// Create a test console that writes escape codes (for visual testing)
    #[must_use]
    pub fn new_rich() -> Self {
        Self::new_inner(true)
    }

    fn new_inner(color: bool) -> Self {
        let buffer = Arc::new(Mutex::new(Vec::new()));
        Self {
            inner: Console::with_writer(BufferWriter(buffer.clone()), color),
            buffer,
        }
    }

    /// Use a different layout width
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.inner = self.inner.with_width(width);
        self
    }

    /// A console handle that writes into this buffer
    #[must_use]
    pub fn console(&self) -> Console {
        self.inner.clone()
    }

    /// A renderer with a built-in scheme that writes into this buffer
    #[must_use]
    pub fn renderer(&self, scheme: SchemeName) -> Renderer {
        Renderer::new(self.console()).with_scheme(ColorScheme::builtin(scheme))
    }

    fn bytes(&self) -> Vec<u8> {
        self.buffer.lock().map(|b| b.clone()).unwrap_or_default()
    }

    /// Get all captured output (ANSI codes stripped)
    #[must_use]
    pub fn output(&self) -> Vec<String> {
        String::from_utf8_lossy(&strip(self.bytes()))
            .lines()
            .map(String::from)
            .collect()
    }

    /// Get all captured output (with ANSI codes)
    #[must_use]
    pub fn raw_output(&self) -> Vec<String> {
        String::from_utf8_lossy(&self.bytes())
            .lines()
            .map(String::from)
            .collect()
    }

    /// Get output as a single string
    #[must_use]
    pub fn output_string(&self) -> String {
        self.output().join("\n")
    }

    /// Check if output contains a string (case-insensitive)
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        let output = self.output_string().to_lowercase();
        output.contains(&needle.to_lowercase())
    }

    /// Check if output contains all of the given strings
    #[must_use]
    pub fn contains_all(&self, needles: &[&str]) -> bool {
        needles.iter().all(|n| self.contains(n))
    }

    /// Check if output matches a regex pattern (multi-line mode)
    #[must_use]
    pub fn matches(&self, pattern: &str) -> bool {
        match regex::RegexBuilder::new(pattern).multi_line(true).build() {
            Ok(re) => re.is_match(&self.output_string()),
            Err(_) => false,
        }
    }

    /// Assert that output contains a string
    ///
    /// # Panics
    ///
    /// Panics if the output does not contain the needle string.
    pub fn assert_contains(&self, needle: &str) {
        assert!(
            self.contains(needle),
            "Output did not contain '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert that output does NOT contain a string
    ///
    /// # Panics
    ///
    /// Panics if the output contains the needle string.
    pub fn assert_not_contains(&self, needle: &str) {
        assert!(
            !self.contains(needle),
            "Output unexpectedly contained '{}'. Actual output:\n{}",
            needle,
            self.output_string()
        );
    }

    /// Assert output has specific number of lines
    ///
    /// # Panics
    ///
    /// Panics if the line count doesn't match expected.
    pub fn assert_line_count(&self, expected: usize) {
        let actual = self.output().len();
        assert_eq!(
            actual,
            expected,
            "Expected {} lines but got {}. Actual output:\n{}",
            expected,
            actual,
            self.output_string()
        );
    }

    /// Clear the buffer
    pub fn clear(&self) {
        if let Ok(mut buf) = self.buffer.lock() {
            buf.clear();
        }
    }

    /// Print output for debugging (in tests)
    pub fn debug_print(&self) {
        eprintln!("=== TestConsole Output ===");
        for (i, line) in self.output().iter().enumerate() {
            eprintln!("{:3}: {}", i + 1, line);
        }
        eprintln!("==========================");
    }

    /// Check if the console writes escape codes
    #[must_use]
    pub fn is_rich(&self) -> bool {
        self.inner.is_color()
    }
}

impl Default for TestConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TestConsole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TestConsole")
            .field("is_rich", &self.is_rich())
            .field("line_count", &self.output().len())
            .finish()
    }
}

/// Writer that appends to the shared buffer
struct BufferWriter(Arc<Mutex<Vec<u8>>>);

impl Write for BufferWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if let Ok(mut buffer) = self.0.lock() {
            buffer.extend_from_slice(buf);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
