//! Color schemes
//!
//! A [`ColorScheme`] maps each semantic [`Role`] to a style token, plus one
//! token per tree depth. Tokens use `rich_rust` style syntax
//! (`"bold rgb(137,209,255)"`, `"italic color(27)"`, `"white on blue"`) and
//! are parsed into [`Style`] values when a formatter needs them.

use std::fmt;
use std::str::FromStr;

use rich_rust::style::Style;
use serde::{Deserialize, Serialize};

use crate::error::{RenderError, RenderResult};

/// Number of depth-indexed tree tokens in every built-in scheme.
pub const TREE_LEVELS: usize = 12;

/// A purpose label resolved through the active scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Informational text.
    Info,
    /// Section titles.
    Title,
    /// Table titles and column headers.
    Header,
    /// Horizontal rules.
    Line,
    /// Highlighted values appended to info lines.
    Var,
    /// Error messages.
    Error,
    /// Warning messages.
    #[serde(alias = "warning")]
    Warn,
    /// Bullet list entries.
    Item,
    /// Bullet glyphs.
    Bullet,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Role; 9] = [
        Role::Info,
        Role::Title,
        Role::Header,
        Role::Line,
        Role::Var,
        Role::Error,
        Role::Warn,
        Role::Item,
        Role::Bullet,
    ];

    /// Lowercase role key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Info => "info",
            Role::Title => "title",
            Role::Header => "header",
            Role::Line => "line",
            Role::Var => "var",
            Role::Error => "error",
            Role::Warn => "warn",
            Role::Item => "item",
            Role::Bullet => "bullet",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Role::Info),
            "title" => Ok(Role::Title),
            "header" => Ok(Role::Header),
            "line" => Ok(Role::Line),
            "var" => Ok(Role::Var),
            "error" => Ok(Role::Error),
            "warn" | "warning" => Ok(Role::Warn),
            "item" => Ok(Role::Item),
            "bullet" => Ok(Role::Bullet),
            other => Err(RenderError::Config(format!("unknown role '{other}'"))),
        }
    }
}

/// Parse a style token.
pub fn parse_style(token: &str) -> RenderResult<Style> {
    Style::parse(token).map_err(|e| RenderError::invalid_style(token, e.to_string()))
}

/// Names of the built-in schemes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SchemeName {
    /// 24-bit RGB tokens.
    TrueColor,
    /// Indexed 256-color tokens.
    #[default]
    Colors256,
    /// Named ANSI colors.
    Basic,
    /// White only.
    Mono,
}

impl SchemeName {
    /// Every built-in scheme.
    pub const ALL: [SchemeName; 4] = [
        SchemeName::TrueColor,
        SchemeName::Colors256,
        SchemeName::Basic,
        SchemeName::Mono,
    ];

    /// Canonical scheme name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SchemeName::TrueColor => "truecolor",
            SchemeName::Colors256 => "256colors",
            SchemeName::Basic => "basic",
            SchemeName::Mono => "mono",
        }
    }
}

impl fmt::Display for SchemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemeName {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "truecolor" | "true" => Ok(SchemeName::TrueColor),
            "256colors" | "256color" | "256" => Ok(SchemeName::Colors256),
            "basic" => Ok(SchemeName::Basic),
            "mono" => Ok(SchemeName::Mono),
            _ => Err(RenderError::UnknownScheme(s.to_string())),
        }
    }
}

/// What to do when a scheme name is not recognized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemePolicy {
    /// Use the `basic` scheme instead.
    #[default]
    Fallback,
    /// Fail with [`RenderError::UnknownScheme`].
    Strict,
}

/// A named mapping from semantic role to style token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScheme {
    name: String,
    info: String,
    title: String,
    header: String,
    line: String,
    var: String,
    error: String,
    warn: String,
    item: String,
    bullet: String,
    tree_levels: Vec<String>,
}

impl ColorScheme {
    /// Build one of the built-in schemes.
    #[must_use]
    pub fn builtin(name: SchemeName) -> Self {
        match name {
            SchemeName::TrueColor => Self::from_tokens(
                name,
                [
                    "rgb(137,209,255)",
                    "bold rgb(137,209,255)",
                    "italic rgb(137,209,255)",
                    "rgb(137,209,255)",
                    "rgb(0,112,242)",
                    "rgb(210,10,10)",
                    "rgb(255,201,51)",
                    "rgb(137,209,255)",
                    "rgb(0,112,242)",
                ],
                &[
                    "bold white",
                    "rgb(27,144,255)",
                    "rgb(137,209,255)",
                ],
                "rgb(209,239,255)",
            ),
            SchemeName::Colors256 => Self::from_tokens(
                name,
                [
                    "color(27)",
                    "bold color(27)",
                    "italic color(27)",
                    "color(27)",
                    "color(87)",
                    "color(196)",
                    "color(190)",
                    "color(87)",
                    "color(27)",
                ],
                &["bold color(7)", "color(27)", "color(39)", "color(45)"],
                "color(87)",
            ),
            SchemeName::Basic => Self::from_tokens(
                name,
                [
                    "cyan",
                    "bold blue",
                    "italic blue",
                    "blue",
                    "cyan",
                    "red",
                    "yellow",
                    "cyan",
                    "blue",
                ],
                &["bold white", "blue"],
                "cyan",
            ),
            // var and bullet are plain white here so every role resolves.
            SchemeName::Mono => Self::from_tokens(
                name,
                [
                    "white",
                    "bold white",
                    "italic white",
                    "white",
                    "white",
                    "white",
                    "white",
                    "white",
                    "white",
                ],
                &["bold white"],
                "white",
            ),
        }
    }

    /// Resolve a scheme name under the given policy.
    pub fn select(name: &str, policy: SchemePolicy) -> RenderResult<Self> {
        match name.parse::<SchemeName>() {
            Ok(known) => Ok(Self::builtin(known)),
            Err(err) => match policy {
                SchemePolicy::Strict => Err(err),
                SchemePolicy::Fallback => {
                    log::debug!("unknown color scheme {name:?}, falling back to basic");
                    Ok(Self::builtin(SchemeName::Basic))
                }
            },
        }
    }

    /// Roles in [`Role::ALL`] order, then the head of the tree levels padded
    /// with `tail` up to [`TREE_LEVELS`].
    fn from_tokens(name: SchemeName, roles: [&str; 9], levels: &[&str], tail: &str) -> Self {
        let [info, title, header, line, var, error, warn, item, bullet] = roles.map(String::from);
        let mut tree_levels: Vec<String> = levels.iter().map(|s| (*s).to_string()).collect();
        tree_levels.resize(TREE_LEVELS, tail.to_string());

        Self {
            name: name.as_str().to_string(),
            info,
            title,
            header,
            line,
            var,
            error,
            warn,
            item,
            bullet,
            tree_levels,
        }
    }

    /// Scheme name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Style token for a role.
    #[must_use]
    pub fn style(&self, role: Role) -> &str {
        match role {
            Role::Info => &self.info,
            Role::Title => &self.title,
            Role::Header => &self.header,
            Role::Line => &self.line,
            Role::Var => &self.var,
            Role::Error => &self.error,
            Role::Warn => &self.warn,
            Role::Item => &self.item,
            Role::Bullet => &self.bullet,
        }
    }

    /// Parsed style for a role.
    pub fn role_style(&self, role: Role) -> RenderResult<Style> {
        parse_style(self.style(role))
    }

    /// `(role, token)` pairs in display order.
    pub fn roles(&self) -> impl Iterator<Item = (Role, &str)> + '_ {
        Role::ALL.into_iter().map(move |role| (role, self.style(role)))
    }

    /// Depth-indexed tree tokens.
    #[must_use]
    pub fn tree_levels(&self) -> &[String] {
        &self.tree_levels
    }

    /// Tree token for `depth`, clamped to the last level.
    #[must_use]
    pub fn tree_level(&self, depth: usize) -> &str {
        self.tree_levels
            .get(depth)
            .or_else(|| self.tree_levels.last())
            .map_or("", String::as_str)
    }

    /// Parsed tree style for `depth`, clamped like [`Self::tree_level`].
    pub fn tree_style(&self, depth: usize) -> RenderResult<Style> {
        parse_style(self.tree_level(depth))
    }

    /// Replace one role's token.
    #[must_use]
    pub fn with_override(mut self, role: Role, token: impl Into<String>) -> Self {
        let token = token.into();
        match role {
            Role::Info => self.info = token,
            Role::Title => self.title = token,
            Role::Header => self.header = token,
            Role::Line => self.line = token,
            Role::Var => self.var = token,
            Role::Error => self.error = token,
            Role::Warn => self.warn = token,
            Role::Item => self.item = token,
            Role::Bullet => self.bullet = token,
        }
        self
    }

    /// Replace the tree-level tokens. An empty list is ignored.
    #[must_use]
    pub fn with_tree_levels<I, S>(mut self, levels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let levels: Vec<String> = levels.into_iter().map(Into::into).collect();
        if !levels.is_empty() {
            self.tree_levels = levels;
        }
        self
    }
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self::builtin(SchemeName::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scheme_is_256colors() {
        assert_eq!(ColorScheme::default().name(), "256colors");
    }

    #[test]
    fn test_select_each_builtin() {
        for name in SchemeName::ALL {
            let selected = ColorScheme::select(name.as_str(), SchemePolicy::Fallback).unwrap();
            assert_eq!(selected, ColorScheme::builtin(name));
        }
    }

    #[test]
    fn test_select_unknown_falls_back_to_basic() {
        let selected = ColorScheme::select("solarized", SchemePolicy::Fallback).unwrap();
        assert_eq!(selected, ColorScheme::builtin(SchemeName::Basic));
    }

    #[test]
    fn test_select_unknown_strict_errors() {
        let err = ColorScheme::select("solarized", SchemePolicy::Strict).unwrap_err();
        assert!(matches!(err, RenderError::UnknownScheme(name) if name == "solarized"));
    }

    #[test]
    fn test_select_is_idempotent() {
        let once = ColorScheme::select("truecolor", SchemePolicy::Fallback).unwrap();
        let twice = ColorScheme::select(once.name(), SchemePolicy::Fallback).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_scheme_name_aliases() {
        assert_eq!("256".parse::<SchemeName>().unwrap(), SchemeName::Colors256);
        assert_eq!("TrueColor".parse::<SchemeName>().unwrap(), SchemeName::TrueColor);
        assert_eq!(" mono ".parse::<SchemeName>().unwrap(), SchemeName::Mono);
    }

    #[test]
    fn test_builtin_tokens_match_table() {
        let truecolor = ColorScheme::builtin(SchemeName::TrueColor);
        assert_eq!(truecolor.style(Role::Title), "bold rgb(137,209,255)");
        assert_eq!(truecolor.style(Role::Error), "rgb(210,10,10)");
        assert_eq!(truecolor.tree_level(1), "rgb(27,144,255)");

        let c256 = ColorScheme::builtin(SchemeName::Colors256);
        assert_eq!(c256.style(Role::Info), "color(27)");
        assert_eq!(c256.style(Role::Warn), "color(190)");
        assert_eq!(c256.tree_level(3), "color(45)");

        let basic = ColorScheme::builtin(SchemeName::Basic);
        assert_eq!(basic.style(Role::Header), "italic blue");
        assert_eq!(basic.tree_level(0), "bold white");
    }

    #[test]
    fn test_every_builtin_has_twelve_levels() {
        for name in SchemeName::ALL {
            assert_eq!(ColorScheme::builtin(name).tree_levels().len(), TREE_LEVELS);
        }
    }

    #[test]
    fn test_mono_defines_every_role() {
        let mono = ColorScheme::builtin(SchemeName::Mono);
        for (role, token) in mono.roles() {
            assert!(!token.is_empty(), "mono is missing {role}");
        }
        assert_eq!(mono.style(Role::Var), "white");
        assert_eq!(mono.style(Role::Bullet), "white");
    }

    #[test]
    fn test_tree_level_clamps_past_end() {
        let scheme = ColorScheme::builtin(SchemeName::Colors256);
        assert_eq!(scheme.tree_level(11), "color(87)");
        assert_eq!(scheme.tree_level(40), "color(87)");
    }

    #[test]
    fn test_with_override() {
        let scheme = ColorScheme::builtin(SchemeName::Basic).with_override(Role::Error, "bold red");
        assert_eq!(scheme.style(Role::Error), "bold red");
        assert_eq!(scheme.style(Role::Warn), "yellow");
    }

    #[test]
    fn test_with_tree_levels_ignores_empty() {
        let scheme = ColorScheme::builtin(SchemeName::Basic).with_tree_levels(Vec::<String>::new());
        assert_eq!(scheme.tree_levels().len(), TREE_LEVELS);

        let scheme = scheme.with_tree_levels(["red", "green"]);
        assert_eq!(scheme.tree_level(0), "red");
        assert_eq!(scheme.tree_level(5), "green");
    }

    #[test]
    fn test_every_builtin_token_parses() {
        for name in SchemeName::ALL {
            let scheme = ColorScheme::builtin(name);
            for role in Role::ALL {
                assert!(scheme.role_style(role).is_ok(), "{name} {role}");
            }
            for depth in 0..TREE_LEVELS {
                assert!(scheme.tree_style(depth).is_ok(), "{name} level {depth}");
            }
        }
    }

    #[test]
    fn test_parse_style_reports_token() {
        assert_eq!(parse_style("bold").unwrap(), Style::new().bold());
        let err = parse_style("bold sparkly").unwrap_err();
        assert!(matches!(err, RenderError::InvalidStyle { ref token, .. } if token == "bold sparkly"));
    }

    #[test]
    fn test_role_style_surfaces_bad_override() {
        let scheme = ColorScheme::builtin(SchemeName::Basic).with_override(Role::Info, "sparkly");
        assert!(scheme.role_style(Role::Info).is_err());
        assert!(scheme.role_style(Role::Error).is_ok());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("warning".parse::<Role>().unwrap(), Role::Warn);
        assert_eq!("BULLET".parse::<Role>().unwrap(), Role::Bullet);
        assert!("colour".parse::<Role>().is_err());
    }
}
