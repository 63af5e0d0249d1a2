//! Scheme-colored log output
//!
//! A `log` crate logger that prints records through a [`Console`], coloring
//! the level with the active scheme: errors use the error role, warnings the
//! warn role, info the info role, and debug/trace the line role.
//!
//! ```ignore
//! use termprint::logging::SchemeLogger;
//! use log::Level;
//!
//! SchemeLogger::builder()
//!     .level(Level::Debug)
//!     .with_timestamps(true)
//!     .init()?;
//! ```

use log::{Level, LevelFilter, Log, Metadata, Record};
use rich_rust::style::Style;
use rich_rust::text::Text;
use time::{OffsetDateTime, format_description};

use crate::config::RenderConfig;
use crate::console::{Console, Target};
use crate::error::RenderResult;
use crate::scheme::{ColorScheme, Role};

/// Logger that writes scheme-colored lines to a console.
#[derive(Debug)]
pub struct SchemeLogger {
    console: Console,
    scheme: ColorScheme,
    min_level: Level,
    show_timestamps: bool,
    show_targets: bool,
}

impl SchemeLogger {
    /// Logger for stderr at the given level.
    #[must_use]
    pub fn new(min_level: Level) -> Self {
        SchemeLoggerBuilder::new().level(min_level).build()
    }

    /// Create a logger using the builder pattern.
    #[must_use]
    pub fn builder() -> SchemeLoggerBuilder {
        SchemeLoggerBuilder::new()
    }

    /// Role whose style colors a level.
    #[must_use]
    pub fn level_role(level: Level) -> Role {
        match level {
            Level::Error => Role::Error,
            Level::Warn => Role::Warn,
            Level::Info => Role::Info,
            Level::Debug | Level::Trace => Role::Line,
        }
    }

    /// Styled line for one record. The message itself is never parsed as
    /// markup.
    fn format_record(&self, record: &Record<'_>) -> RenderResult<Text> {
        let mut line = Text::new("");

        if self.show_timestamps {
            let now = OffsetDateTime::now_utc();
            // HH:MM:SS
            if let Ok(fmt) = format_description::parse("[hour]:[minute]:[second]") {
                if let Ok(ts) = now.format(&fmt) {
                    line.append_styled(&ts, Style::new().dim());
                    line.append(" ");
                }
            }
        }

        let level = record.level();
        let label = format!("{:<5}", level.as_str());
        let level_style = self.scheme.role_style(Self::level_role(level))?.bold();
        line.append_styled(&label, level_style);
        line.append(" ");

        if self.show_targets && !record.target().is_empty() {
            line.append_styled(record.target(), self.scheme.role_style(Role::Line)?);
            line.append(": ");
        }

        line.append(&record.args().to_string());
        Ok(line)
    }
}

/// Builder for [`SchemeLogger`].
#[derive(Debug)]
pub struct SchemeLoggerBuilder {
    min_level: Level,
    show_timestamps: bool,
    show_targets: bool,
    scheme: Option<ColorScheme>,
    console: Option<Console>,
}

impl Default for SchemeLoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SchemeLoggerBuilder {
    /// Info level, timestamps on, targets off.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: Level::Info,
            show_timestamps: true,
            show_targets: false,
            scheme: None,
            console: None,
        }
    }

    /// Builder preset from a configuration.
    ///
    /// Fails when the configured scheme or one of its overrides does not
    /// resolve. Color is decided for stderr, where the logger writes.
    pub fn from_config(config: &RenderConfig) -> RenderResult<Self> {
        let color = config.should_use_rich_on(Target::Stderr);
        let mut console = Console::for_target(Target::Stderr, color);
        if let Some(width) = config.width {
            console = console.with_width(width);
        }
        Ok(Self {
            min_level: config.log_level.unwrap_or(Level::Info),
            show_timestamps: config.log_timestamps,
            show_targets: false,
            scheme: Some(config.resolve_scheme()?),
            console: Some(console),
        })
    }

    /// Set the minimum log level.
    #[must_use]
    pub fn level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Set the minimum log level from a LevelFilter.
    #[must_use]
    pub fn level_filter(mut self, filter: LevelFilter) -> Self {
        self.min_level = filter.to_level().unwrap_or(Level::Trace);
        self
    }

    /// Set whether to show timestamps.
    #[must_use]
    pub fn with_timestamps(mut self, show: bool) -> Self {
        self.show_timestamps = show;
        self
    }

    /// Set whether to show record targets.
    #[must_use]
    pub fn with_targets(mut self, show: bool) -> Self {
        self.show_targets = show;
        self
    }

    /// Set the scheme used for level colors.
    #[must_use]
    pub fn scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = Some(scheme);
        self
    }

    /// Write to a specific console instead of stderr.
    #[must_use]
    pub fn console(mut self, console: Console) -> Self {
        self.console = Some(console);
        self
    }

    /// Build the logger without installing it.
    #[must_use]
    pub fn build(self) -> SchemeLogger {
        let console = self.console.unwrap_or_else(|| {
            Console::for_target(
                Target::Stderr,
                crate::detection::should_enable_rich_for(Target::Stderr),
            )
        });
        SchemeLogger {
            console,
            scheme: self.scheme.unwrap_or_default(),
            min_level: self.min_level,
            show_timestamps: self.show_timestamps,
            show_targets: self.show_targets,
        }
    }

    /// Build and install as the global logger.
    ///
    /// Returns an error if a logger has already been set.
    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.min_level;
        log::set_boxed_logger(Box::new(self.build()))?;
        log::set_max_level(level.to_level_filter());
        Ok(())
    }

    /// Build and install, ignoring errors if already set.
    pub fn try_init(self) {
        let _ = self.init();
    }
}

impl Log for SchemeLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.min_level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let printed = self
            .format_record(record)
            .and_then(|line| self.console.print_text(&line));
        if printed.is_err() {
            let _ = self.console.print_plain(&record.args().to_string());
        }
    }

    fn flush(&self) {}
}
