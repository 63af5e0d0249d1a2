//! Configured Console wrapper

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use rich_rust::console::Console as RichConsole;
use rich_rust::prelude::*;
use rich_rust::renderables::Renderable;
use rich_rust::terminal;

use crate::config::RenderConfig;
use crate::error::{RenderError, RenderResult};

/// Width used when the terminal size cannot be determined.
pub const DEFAULT_WIDTH: usize = 80;

/// Where a [`Console`] writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Target {
    /// Standard output.
    #[default]
    Stdout,
    /// Standard error.
    Stderr,
}

type Sink = Arc<Mutex<Box<dyn Write + Send>>>;

/// Cloneable handle to a terminal writer
///
/// Layout and escape codes come from a `rich_rust` console; the bytes land in
/// a shared sink. Clones share the same sink and each call writes its whole
/// output under one lock, so output from different clones never interleaves.
#[derive(Clone)]
pub struct Console {
    inner: Arc<RichConsole>,
    sink: Sink,
    color: bool,
    width: usize,
}

impl Console {
    /// Create for stdout with automatic detection
    #[must_use]
    pub fn new() -> Self {
        Self::for_target(Target::Stdout, crate::detection::should_enable_rich())
    }

    /// Create for a standard stream with explicit color setting
    #[must_use]
    pub fn for_target(target: Target, color: bool) -> Self {
        let writer: Box<dyn Write + Send> = match target {
            Target::Stdout => Box::new(io::stdout()),
            Target::Stderr => Box::new(io::stderr()),
        };
        let width = terminal::get_terminal_size().map_or(DEFAULT_WIDTH, |(cols, _rows)| cols);
        Self::from_parts(writer, color, width)
    }

    /// Create from a resolved configuration
    #[must_use]
    pub fn from_config(config: &RenderConfig) -> Self {
        let console = Self::for_target(config.target, config.should_use_rich());
        match config.width {
            Some(width) => console.with_width(width),
            None => console,
        }
    }

    /// Create with custom writer (for testing)
    #[must_use]
    pub fn with_writer<W: Write + Send + 'static>(writer: W, color: bool) -> Self {
        Self::from_parts(Box::new(writer), color, DEFAULT_WIDTH)
    }

    /// Override the layout width
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width.max(1);
        self.inner = Arc::new(build_inner(self.color, self.width));
        self
    }

    fn from_parts(writer: Box<dyn Write + Send>, color: bool, width: usize) -> Self {
        let width = width.max(1);
        Self {
            inner: Arc::new(build_inner(color, width)),
            sink: Arc::new(Mutex::new(writer)),
            color,
            width,
        }
    }

    // ─────────────────────────────────────────────────
    // State Queries
    // ─────────────────────────────────────────────────

    /// Check if escape codes are written
    pub fn is_color(&self) -> bool {
        self.color
    }

    /// Layout width in cells
    pub fn width(&self) -> usize {
        self.width
    }

    /// The `rich_rust` console doing layout
    pub fn rich(&self) -> &RichConsole {
        &self.inner
    }

    // ─────────────────────────────────────────────────
    // Output Methods
    // ─────────────────────────────────────────────────

    /// Print one line of markup
    pub fn print(&self, content: &str) -> RenderResult<()> {
        let text = rich_rust::markup::render(content)
            .map_err(|e| RenderError::markup(content, e.to_string()))?;
        self.print_text(&text)
    }

    /// Print text as-is, without markup processing
    pub fn print_plain(&self, text: &str) -> RenderResult<()> {
        self.print_text(&Text::new(text))
    }

    /// Print styled text followed by a newline
    pub fn print_text(&self, text: &Text) -> RenderResult<()> {
        self.write_segments(&text.render("\n"))
    }

    /// Print a blank line
    pub fn newline(&self) -> RenderResult<()> {
        self.write_segments(&[Segment::line()])
    }

    /// Print a renderable
    pub fn render<R: Renderable + ?Sized>(&self, renderable: &R) -> RenderResult<()> {
        self.write_segments(&self.segments(renderable))
    }

    /// Lay out a renderable at this console's width
    pub fn segments<'a, R: Renderable + ?Sized>(&self, renderable: &'a R) -> Vec<Segment<'a>> {
        renderable.render(&self.inner, &self.inner.options())
    }

    /// Encode segments and write them under a single lock
    pub fn write_segments(&self, segments: &[Segment<'_>]) -> RenderResult<()> {
        let mut encoded = Vec::new();
        self.inner.print_segments_to(&mut encoded, segments)?;

        let mut sink = self
            .sink
            .lock()
            .map_err(|_| RenderError::Io(io::Error::other("console writer poisoned")))?;
        sink.write_all(&encoded)?;
        sink.flush()?;
        Ok(())
    }
}

fn build_inner(color: bool, width: usize) -> RichConsole {
    let builder = RichConsole::builder()
        .file(Box::new(io::sink()))
        .markup(true)
        .emoji(false)
        .highlight(false)
        .width(width);

    if color {
        builder
            .force_terminal(true)
            .color_system(ColorSystem::TrueColor)
            .build()
    } else {
        builder.force_terminal(false).no_color().build()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Console {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Console")
            .field("color", &self.color)
            .field("width", &self.width)
            .finish_non_exhaustive()
    }
}
