//! Centralized configuration for termprint output.
//!
//! `RenderConfig` provides a single point of configuration for a
//! [`Renderer`](crate::Renderer), supporting programmatic, environment
//! variable and TOML file sources.

use std::collections::BTreeMap;
use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::console::Target;
use crate::detection::DisplayContext;
use crate::error::{RenderError, RenderResult};
use crate::scheme::{ColorScheme, Role, SchemePolicy, parse_style};

/// Default bound on rendered table rows.
pub const DEFAULT_MAX_ROWS: usize = 30;
/// Default rule length.
pub const DEFAULT_LINE_LENGTH: usize = 80;
/// Default rule character.
pub const DEFAULT_RULE_CHAR: char = '─';

/// Comprehensive configuration for termprint output
#[derive(Debug, Clone)]
pub struct RenderConfig {
    // Scheme
    /// Scheme name to select
    pub scheme: String,
    /// What to do with an unknown scheme name
    pub scheme_policy: SchemePolicy,
    /// Per-role token overrides applied on top of the scheme
    pub colors: BTreeMap<Role, String>,
    /// Replacement tree-level tokens (empty = keep the scheme's)
    pub tree_levels: Vec<String>,

    // Display mode
    /// Override display context (None = auto-detect)
    pub context: Option<DisplayContext>,
    /// Force color output even in non-TTY
    pub force_color: Option<bool>,
    /// Force plain text mode (no styling)
    pub force_plain: bool,
    /// Output stream
    pub target: Target,
    /// Layout width override (None = terminal width)
    pub width: Option<usize>,

    // Formatter defaults
    /// Maximum rows in tables
    pub max_rows: usize,
    /// Length of rules drawn by `line` and `title`
    pub line_length: usize,
    /// Character rules are drawn with
    pub rule_char: char,

    // Logging
    /// Log level filter
    pub log_level: Option<log::Level>,
    /// Show timestamps in logs
    pub log_timestamps: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scheme: crate::scheme::SchemeName::default().to_string(),
            scheme_policy: SchemePolicy::Fallback,
            colors: BTreeMap::new(),
            tree_levels: Vec::new(),
            context: None,
            force_color: None,
            force_plain: false,
            target: Target::Stdout,
            width: None,
            max_rows: DEFAULT_MAX_ROWS,
            line_length: DEFAULT_LINE_LENGTH,
            rule_char: DEFAULT_RULE_CHAR,
            log_level: None,
            log_timestamps: true,
        }
    }
}

/// On-disk layout of the TOML config file
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    scheme: Option<String>,
    strict: Option<bool>,
    plain: Option<bool>,
    force_color: Option<bool>,
    width: Option<usize>,
    max_rows: Option<usize>,
    line_length: Option<usize>,
    rule_char: Option<char>,
    log_level: Option<String>,
    log_timestamps: Option<bool>,
    #[serde(default)]
    colors: BTreeMap<Role, String>,
    #[serde(default)]
    tree_levels: Vec<String>,
}

impl RenderConfig {
    /// Create config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create config from environment variables
    ///
    /// # Environment Variables
    ///
    /// | Variable | Values | Description |
    /// |----------|--------|-------------|
    /// | `TERMPRINT_SCHEME` | truecolor/256colors/basic/mono | Color scheme |
    /// | `TERMPRINT_STRICT` | (set) | Reject unknown scheme names |
    /// | `TERMPRINT_FORCE_COLOR` | (set) | Force styled output |
    /// | `TERMPRINT_PLAIN` | (set) | Force plain output |
    /// | `NO_COLOR` | (set) | Disable colors (standard) |
    /// | `TERMPRINT_MAX_ROWS` | integer | Table row bound |
    /// | `TERMPRINT_WIDTH` | integer | Layout width |
    /// | `TERMPRINT_LOG` | trace/debug/info/warn/error | Log level |
    /// | `TERMPRINT_LOG_TIMESTAMPS` | 0/1 | Show timestamps |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an explicit variable lookup
    #[must_use]
    pub fn from_env_with(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self::default().with_env_overrides(lookup)
    }

    /// Layer environment variables over this config (a loaded file, say)
    #[must_use]
    pub fn with_env_overrides(self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = self;

        if let Some(scheme) = lookup("TERMPRINT_SCHEME") {
            config.scheme = scheme;
        }
        if lookup("TERMPRINT_STRICT").is_some() {
            config.scheme_policy = SchemePolicy::Strict;
        }

        // Display mode
        if lookup("TERMPRINT_FORCE_COLOR").is_some() {
            config.force_color = Some(true);
        }
        if lookup("TERMPRINT_PLAIN").is_some() || lookup("NO_COLOR").is_some() {
            config.force_plain = true;
        }
        if let Some(width) = lookup("TERMPRINT_WIDTH").and_then(|v| v.parse().ok()) {
            config.width = Some(width);
        }

        // Formatter defaults
        if let Some(max) = lookup("TERMPRINT_MAX_ROWS").and_then(|v| v.parse().ok()) {
            config.max_rows = max;
        }

        // Logging
        if let Some(level) = lookup("TERMPRINT_LOG") {
            config.log_level = parse_level(&level);
        }
        if lookup("TERMPRINT_LOG_TIMESTAMPS")
            .map(|v| v == "0" || v.eq_ignore_ascii_case("false"))
            .unwrap_or(false)
        {
            config.log_timestamps = false;
        }

        config
    }

    /// Parse a TOML config document
    ///
    /// ```toml
    /// scheme = "truecolor"
    /// strict = true
    /// max_rows = 50
    ///
    /// [colors]
    /// error = "bold red"
    /// ```
    pub fn from_toml_str(text: &str) -> RenderResult<Self> {
        let file: ConfigFile =
            toml::from_str(text).map_err(|e| RenderError::Config(e.to_string()))?;
        Self::default().merge_file(file)
    }

    /// Load a TOML config file
    pub fn load(path: &Path) -> RenderResult<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| RenderError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Default config file location: `<config dir>/termprint/config.toml`
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("termprint").join("config.toml"))
    }

    fn merge_file(mut self, file: ConfigFile) -> RenderResult<Self> {
        if let Some(scheme) = file.scheme {
            self.scheme = scheme;
        }
        if let Some(strict) = file.strict {
            self.scheme_policy = if strict {
                SchemePolicy::Strict
            } else {
                SchemePolicy::Fallback
            };
        }
        if let Some(plain) = file.plain {
            self.force_plain = plain;
        }
        if file.force_color.is_some() {
            self.force_color = file.force_color;
        }
        if file.width.is_some() {
            self.width = file.width;
        }
        if let Some(max) = file.max_rows {
            self.max_rows = max;
        }
        if let Some(len) = file.line_length {
            self.line_length = len;
        }
        if let Some(ch) = file.rule_char {
            self.rule_char = ch;
        }
        if let Some(level) = file.log_level {
            self.log_level = Some(
                parse_level(&level)
                    .ok_or_else(|| RenderError::Config(format!("unknown log level '{level}'")))?,
            );
        }
        if let Some(ts) = file.log_timestamps {
            self.log_timestamps = ts;
        }
        self.colors.extend(file.colors);
        if !file.tree_levels.is_empty() {
            self.tree_levels = file.tree_levels;
        }
        Ok(self)
    }

    // ─────────────────────────────────────────────────
    // Builder Methods
    // ─────────────────────────────────────────────────

    /// Select a scheme by name
    #[must_use]
    pub fn with_scheme(mut self, name: impl Into<String>) -> Self {
        self.scheme = name.into();
        self
    }

    /// Reject unknown scheme names instead of falling back
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.scheme_policy = SchemePolicy::Strict;
        self
    }

    /// Override one role's style token
    #[must_use]
    pub fn with_color(mut self, role: Role, token: impl Into<String>) -> Self {
        self.colors.insert(role, token.into());
        self
    }

    /// Force color output
    #[must_use]
    pub fn force_color(mut self, force: bool) -> Self {
        self.force_color = Some(force);
        self
    }

    /// Enable plain text mode (no styling)
    #[must_use]
    pub fn plain_mode(mut self) -> Self {
        self.force_plain = true;
        self
    }

    /// Set display context explicitly
    #[must_use]
    pub fn with_context(mut self, context: DisplayContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Write to the given stream
    #[must_use]
    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    /// Fix the layout width
    #[must_use]
    pub fn with_width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// Set maximum table rows
    #[must_use]
    pub fn with_max_rows(mut self, max: usize) -> Self {
        self.max_rows = max;
        self
    }

    /// Set rule length and character
    #[must_use]
    pub fn with_rule(mut self, length: usize, ch: char) -> Self {
        self.line_length = length;
        self.rule_char = ch;
        self
    }

    /// Set the log level
    #[must_use]
    pub fn with_log_level(mut self, level: log::Level) -> Self {
        self.log_level = Some(level);
        self
    }

    // ─────────────────────────────────────────────────
    // Resolution Methods
    // ─────────────────────────────────────────────────

    /// Resolve the display context based on config and environment
    #[must_use]
    pub fn resolve_context(&self) -> DisplayContext {
        self.resolve_context_for(self.target)
    }

    /// Resolve the display context for output written to `target`
    #[must_use]
    pub fn resolve_context_for(&self, target: Target) -> DisplayContext {
        if self.force_plain {
            return DisplayContext::new_agent();
        }
        if let Some(true) = self.force_color {
            return DisplayContext::new_human();
        }
        self.context.unwrap_or_else(|| DisplayContext::detect_for(target))
    }

    /// Check if styled output should be used based on resolved context
    #[must_use]
    pub fn should_use_rich(&self) -> bool {
        self.resolve_context().is_human()
    }

    /// Check if styled output should be used on `target`
    #[must_use]
    pub fn should_use_rich_on(&self, target: Target) -> bool {
        self.resolve_context_for(target).is_human()
    }

    /// Resolve the scheme, apply overrides and validate every token
    pub fn resolve_scheme(&self) -> RenderResult<ColorScheme> {
        let mut scheme = ColorScheme::select(&self.scheme, self.scheme_policy)?;
        for (role, token) in &self.colors {
            parse_style(token)?;
            scheme = scheme.with_override(*role, token.clone());
        }
        for token in &self.tree_levels {
            parse_style(token)?;
        }
        Ok(scheme.with_tree_levels(self.tree_levels.iter().cloned()))
    }
}

fn parse_level(level: &str) -> Option<log::Level> {
    match level.to_lowercase().as_str() {
        "trace" => Some(log::Level::Trace),
        "debug" => Some(log::Level::Debug),
        "info" => Some(log::Level::Info),
        "warn" | "warning" => Some(log::Level::Warn),
        "error" => Some(log::Level::Error),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheme::SchemeName;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = RenderConfig::new();
        assert_eq!(config.scheme, "256colors");
        assert_eq!(config.scheme_policy, SchemePolicy::Fallback);
        assert_eq!(config.max_rows, 30);
        assert_eq!(config.line_length, 80);
        assert_eq!(config.rule_char, '─');
        assert!(config.log_timestamps);
        assert!(!config.force_plain);
    }

    #[test]
    fn test_builder_pattern() {
        let config = RenderConfig::new()
            .with_scheme("mono")
            .strict()
            .with_color(Role::Error, "bold red")
            .with_max_rows(5)
            .with_rule(40, '=')
            .with_log_level(log::Level::Debug);

        assert_eq!(config.scheme, "mono");
        assert_eq!(config.scheme_policy, SchemePolicy::Strict);
        assert_eq!(config.colors.get(&Role::Error).map(String::as_str), Some("bold red"));
        assert_eq!(config.max_rows, 5);
        assert_eq!(config.line_length, 40);
        assert_eq!(config.rule_char, '=');
        assert_eq!(config.log_level, Some(log::Level::Debug));
    }

    #[test]
    fn test_plain_mode() {
        let config = RenderConfig::new().plain_mode();
        assert_eq!(config.resolve_context(), DisplayContext::Agent);
        assert!(!config.should_use_rich());
    }

    #[test]
    fn test_force_color() {
        let config = RenderConfig::new().force_color(true);
        assert_eq!(config.resolve_context(), DisplayContext::Human);
    }

    #[test]
    fn test_from_env() {
        let config = RenderConfig::from_env_with(env(&[
            ("TERMPRINT_SCHEME", "truecolor"),
            ("TERMPRINT_STRICT", "1"),
            ("NO_COLOR", "1"),
            ("TERMPRINT_MAX_ROWS", "12"),
            ("TERMPRINT_WIDTH", "120"),
            ("TERMPRINT_LOG", "warning"),
            ("TERMPRINT_LOG_TIMESTAMPS", "0"),
        ]));

        assert_eq!(config.scheme, "truecolor");
        assert_eq!(config.scheme_policy, SchemePolicy::Strict);
        assert!(config.force_plain);
        assert_eq!(config.max_rows, 12);
        assert_eq!(config.width, Some(120));
        assert_eq!(config.log_level, Some(log::Level::Warn));
        assert!(!config.log_timestamps);
    }

    #[test]
    fn test_from_env_ignores_garbage_numbers() {
        let config = RenderConfig::from_env_with(env(&[("TERMPRINT_MAX_ROWS", "lots")]));
        assert_eq!(config.max_rows, DEFAULT_MAX_ROWS);
    }

    #[test]
    fn test_from_toml_str() {
        let config = RenderConfig::from_toml_str(
            r#"
            scheme = "basic"
            strict = true
            max_rows = 3
            rule_char = "="
            log_level = "debug"

            [colors]
            warning = "bold yellow"
            var = "magenta"
            "#,
        )
        .unwrap();

        assert_eq!(config.scheme, "basic");
        assert_eq!(config.scheme_policy, SchemePolicy::Strict);
        assert_eq!(config.max_rows, 3);
        assert_eq!(config.rule_char, '=');
        assert_eq!(config.log_level, Some(log::Level::Debug));
        assert_eq!(config.colors.get(&Role::Warn).map(String::as_str), Some("bold yellow"));
        assert_eq!(config.colors.get(&Role::Var).map(String::as_str), Some("magenta"));
    }

    #[test]
    fn test_env_overrides_layer_over_file() {
        let config = RenderConfig::from_toml_str("scheme = \"basic\"\nmax_rows = 3")
            .unwrap()
            .with_env_overrides(env(&[("TERMPRINT_SCHEME", "mono")]));
        assert_eq!(config.scheme, "mono");
        assert_eq!(config.max_rows, 3);
    }

    #[test]
    fn test_from_toml_rejects_unknown_keys() {
        assert!(matches!(
            RenderConfig::from_toml_str("colour = \"red\""),
            Err(RenderError::Config(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "scheme = \"mono\"").unwrap();
        let config = RenderConfig::load(file.path()).unwrap();
        assert_eq!(config.scheme, "mono");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let err = RenderConfig::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, RenderError::Config(_)));
    }

    #[test]
    fn test_resolve_scheme_applies_overrides() {
        let scheme = RenderConfig::new()
            .with_scheme("basic")
            .with_color(Role::Bullet, "green")
            .resolve_scheme()
            .unwrap();
        assert_eq!(scheme.name(), "basic");
        assert_eq!(scheme.style(Role::Bullet), "green");
    }

    #[test]
    fn test_resolve_scheme_rejects_bad_override() {
        let err = RenderConfig::new()
            .with_color(Role::Info, "sparkly")
            .resolve_scheme()
            .unwrap_err();
        assert!(matches!(err, RenderError::InvalidStyle { .. }));
    }

    #[test]
    fn test_resolve_scheme_strict_unknown() {
        let result = RenderConfig::new().with_scheme("neon").strict().resolve_scheme();
        assert!(matches!(result, Err(RenderError::UnknownScheme(_))));

        let fallback = RenderConfig::new().with_scheme("neon").resolve_scheme().unwrap();
        assert_eq!(fallback, ColorScheme::builtin(SchemeName::Basic));
    }
}
