//! Scheme-aware formatters
//!
//! [`Renderer`] owns a [`ColorScheme`] and a [`Console`]. Every formatter
//! resolves its semantic role through the scheme at call time and writes its
//! lines to the console in one piece.

use rich_rust::prelude::*;
use rich_rust::renderables::Renderable;
use serde_json::{Map, Value};

use crate::config::{DEFAULT_LINE_LENGTH, DEFAULT_MAX_ROWS, DEFAULT_RULE_CHAR, RenderConfig};
use crate::console::Console;
use crate::error::{RenderError, RenderResult};
use crate::scheme::{ColorScheme, Role, SchemePolicy};

/// Glyph printed before each bullet-list item.
pub const BULLET: &str = "• ";

const TABLE_TITLE: &str = "Lists";
const DICT_TITLE: &str = "Dictionary";
const LISTDICTS_TITLE: &str = "Dictionaries";
const TREE_ROOT: &str = "root";

/// Per-call overrides for the table formatters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Table title; each formatter has its own default.
    pub title: Option<String>,
    /// Key and value column headers for `dictionary` and `listdicts`.
    pub columns: Option<(String, String)>,
    /// Row bound; the renderer's setting when unset.
    pub max_rows: Option<usize>,
}

impl TableOptions {
    /// Options with every field unset.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the key/value headers.
    #[must_use]
    pub fn columns(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.columns = Some((key.into(), value.into()));
        self
    }

    /// Set the row bound.
    #[must_use]
    pub fn max_rows(mut self, max: usize) -> Self {
        self.max_rows = Some(max);
        self
    }
}

/// Per-call overrides for rules and titles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleOptions {
    /// Rule length; the renderer's setting when unset.
    pub length: Option<usize>,
    /// Rule character; the renderer's setting when unset.
    pub ch: Option<char>,
    /// Whether `title` draws a rule under the text.
    pub draw_line: bool,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            length: None,
            ch: None,
            draw_line: true,
        }
    }
}

impl RuleOptions {
    /// Set the rule length.
    #[must_use]
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the rule character.
    #[must_use]
    pub fn ch(mut self, ch: char) -> Self {
        self.ch = Some(ch);
        self
    }

    /// Skip the rule under a title.
    #[must_use]
    pub fn no_line(mut self) -> Self {
        self.draw_line = false;
        self
    }
}

/// Styled console renderer
///
/// Holds the active scheme as instance state. Changing it needs `&mut self`;
/// formatting only needs `&self`, and a renderer can be shared across threads.
#[derive(Debug, Clone)]
pub struct Renderer {
    console: Console,
    scheme: ColorScheme,
    policy: SchemePolicy,
    max_rows: usize,
    line_length: usize,
    rule_char: char,
}

impl Renderer {
    /// Renderer over a console with the default scheme and settings
    #[must_use]
    pub fn new(console: Console) -> Self {
        Self {
            console,
            scheme: ColorScheme::default(),
            policy: SchemePolicy::default(),
            max_rows: DEFAULT_MAX_ROWS,
            line_length: DEFAULT_LINE_LENGTH,
            rule_char: DEFAULT_RULE_CHAR,
        }
    }

    /// Renderer for stdout with automatic color detection
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(Console::new())
    }

    /// Renderer built from a resolved configuration
    pub fn from_config(config: &RenderConfig) -> RenderResult<Self> {
        Ok(Self {
            console: Console::from_config(config),
            scheme: config.resolve_scheme()?,
            policy: config.scheme_policy,
            max_rows: config.max_rows,
            line_length: config.line_length,
            rule_char: config.rule_char,
        })
    }

    /// Replace the scheme (builder form)
    #[must_use]
    pub fn with_scheme(mut self, scheme: ColorScheme) -> Self {
        self.scheme = scheme;
        self
    }

    /// Set the policy used by [`select_scheme`](Self::select_scheme)
    #[must_use]
    pub fn with_policy(mut self, policy: SchemePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the default row bound
    #[must_use]
    pub fn with_max_rows(mut self, max: usize) -> Self {
        self.max_rows = max;
        self
    }

    /// Set the default rule length and character
    #[must_use]
    pub fn with_rule(mut self, length: usize, ch: char) -> Self {
        self.line_length = length;
        self.rule_char = ch;
        self
    }

    // ─────────────────────────────────────────────────
    // Scheme
    // ─────────────────────────────────────────────────

    /// Activate a built-in scheme by name
    ///
    /// Unknown names fall back to `basic` or fail, depending on the policy.
    /// On failure the active scheme is left unchanged.
    pub fn select_scheme(&mut self, name: &str) -> RenderResult<&ColorScheme> {
        self.scheme = ColorScheme::select(name, self.policy)?;
        Ok(&self.scheme)
    }

    /// Replace the active scheme
    pub fn set_scheme(&mut self, scheme: ColorScheme) {
        self.scheme = scheme;
    }

    /// The active scheme
    pub fn scheme(&self) -> &ColorScheme {
        &self.scheme
    }

    /// The output console
    pub fn console(&self) -> &Console {
        &self.console
    }

    /// Default row bound
    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    // ─────────────────────────────────────────────────
    // Text Formatters
    // ─────────────────────────────────────────────────

    /// Print a message in the error style
    pub fn error(&self, msg: &str) -> RenderResult<()> {
        self.console.print_text(&self.styled(Role::Error, msg)?)
    }

    /// Print a message in the warning style
    pub fn warning(&self, msg: &str) -> RenderResult<()> {
        self.console.print_text(&self.styled(Role::Warn, msg)?)
    }

    /// Print `primary` in the info style, optionally followed by
    /// `": secondary"` in the var style
    pub fn info(&self, primary: &str, secondary: Option<&str>) -> RenderResult<()> {
        let mut line = self.styled(Role::Info, primary)?;
        if let Some(secondary) = secondary {
            line.append(": ");
            line.append_styled(secondary, self.scheme.role_style(Role::Var)?);
        }
        self.console.print_text(&line)
    }

    /// Print a horizontal rule with the default length and character
    pub fn line(&self) -> RenderResult<()> {
        self.line_with(RuleOptions::default())
    }

    /// Print a horizontal rule
    pub fn line_with(&self, options: RuleOptions) -> RenderResult<()> {
        self.console.print_text(&self.rule(options)?)
    }

    /// Print a blank line, a bold title and a rule
    pub fn title(&self, msg: &str) -> RenderResult<()> {
        self.title_with(msg, RuleOptions::default())
    }

    /// Print a blank line, a bold title and optionally a rule
    pub fn title_with(&self, msg: &str, options: RuleOptions) -> RenderResult<()> {
        let mut heading = Text::new("");
        heading.append_styled(msg, self.scheme.role_style(Role::Title)?.bold());

        let mut lines = vec![Text::new(""), heading];
        if options.draw_line {
            lines.push(self.rule(options)?);
        }
        self.print_lines(&lines)
    }

    fn rule(&self, options: RuleOptions) -> RenderResult<Text> {
        let ch = options.ch.unwrap_or(self.rule_char);
        let length = options.length.unwrap_or(self.line_length);
        self.styled(Role::Line, &ch.to_string().repeat(length))
    }

    // ─────────────────────────────────────────────────
    // Collection Formatters
    // ─────────────────────────────────────────────────

    /// Print one bulleted line per item, then a blank separator line
    pub fn bullet_list<S: AsRef<str>>(&self, items: &[S], title: Option<&str>) -> RenderResult<()> {
        let bullet = self.scheme.role_style(Role::Bullet)?;
        let item_style = self.scheme.role_style(Role::Item)?;

        let mut lines = Vec::with_capacity(items.len() + 2);
        if let Some(title) = title {
            lines.push(self.styled(Role::Title, title)?);
        }
        for item in items {
            let mut line = Text::new("");
            line.append_styled(BULLET, bullet.clone());
            line.append_styled(item.as_ref(), item_style.clone());
            lines.push(line);
        }
        lines.push(Text::new(""));
        self.print_lines(&lines)
    }

    /// Print rows under the given headers
    pub fn table<S, R, C>(&self, columns: &[S], rows: &[R]) -> RenderResult<()>
    where
        S: AsRef<str>,
        R: AsRef<[C]>,
        C: ToString,
    {
        self.table_with(columns, rows, &TableOptions::default())
    }

    /// Print rows under the given headers, with per-call options
    ///
    /// Only the first `max_rows` rows are shown.
    pub fn table_with<S, R, C>(
        &self,
        columns: &[S],
        rows: &[R],
        options: &TableOptions,
    ) -> RenderResult<()>
    where
        S: AsRef<str>,
        R: AsRef<[C]>,
        C: ToString,
    {
        let max_rows = options.max_rows.unwrap_or(self.max_rows);
        let mut grid = self.styled_table(options.title.as_deref().unwrap_or(TABLE_TITLE))?;
        for header in columns {
            grid.add_column(self.info_column(header.as_ref())?);
        }
        for row in bounded(rows, max_rows, "table") {
            grid.add_row(row.as_ref().iter().map(ToString::to_string))?;
        }
        self.print_padded(&grid.finish())
    }

    /// Print a mapping as key/value rows
    pub fn dictionary(&self, data: &Map<String, Value>) -> RenderResult<()> {
        self.dictionary_with(data, &TableOptions::default())
    }

    /// Print a mapping as key/value rows, with per-call options
    pub fn dictionary_with(
        &self,
        data: &Map<String, Value>,
        options: &TableOptions,
    ) -> RenderResult<()> {
        let max_rows = options.max_rows.unwrap_or(self.max_rows);
        let mut grid = self.key_value_table(options, DICT_TITLE)?;
        if data.len() > max_rows {
            log::trace!("dictionary truncated to {max_rows} of {} entries", data.len());
        }
        for (key, value) in data.iter().take(max_rows) {
            grid.add_row([key.clone(), display_value(value)])?;
        }
        self.print_padded(&grid.finish())
    }

    /// Print a sequence of mappings as one sectioned key/value table
    pub fn listdicts(&self, data: &[Map<String, Value>]) -> RenderResult<()> {
        self.listdicts_with(data, &TableOptions::default())
    }

    /// Print a sequence of mappings, with per-call options
    ///
    /// `max_rows` bounds the number of mappings, not the number of lines.
    pub fn listdicts_with(
        &self,
        data: &[Map<String, Value>],
        options: &TableOptions,
    ) -> RenderResult<()> {
        let max_rows = options.max_rows.unwrap_or(self.max_rows);
        let mut grid = self.key_value_table(options, LISTDICTS_TITLE)?;
        for (i, map) in bounded(data, max_rows, "listdicts").iter().enumerate() {
            grid.add_row([i.to_string(), String::new()])?;
            grid.end_section();
            for (key, value) in map {
                grid.add_row([key.clone(), display_value(value)])?;
            }
        }
        self.print_padded(&grid.finish())
    }

    /// Print nested data as an indented tree, with a blank line before and after
    pub fn tree(&self, data: &Value, title: Option<&str>) -> RenderResult<()> {
        let tree = Tree::new(self.build_tree(data, title)?);
        self.print_padded(&tree)
    }

    /// Build the root node [`tree`](Self::tree) would print
    ///
    /// Without a title, a mapping with exactly one entry becomes a tree rooted
    /// at that key; anything else is rooted at `"root"`.
    pub fn build_tree(&self, data: &Value, title: Option<&str>) -> RenderResult<TreeNode> {
        let (label, body) = match (title, data) {
            (Some(title), _) => (title.to_string(), data),
            (None, Value::Object(map)) if map.len() == 1 => match map.iter().next() {
                Some((key, value)) => (key.clone(), value),
                None => (TREE_ROOT.to_string(), data),
            },
            _ => (TREE_ROOT.to_string(), data),
        };

        let root = TreeNode::new(Text::styled(label, self.scheme.tree_style(0)?));
        Ok(root.children(self.grow(body, 1)?))
    }

    fn grow(&self, value: &Value, depth: usize) -> RenderResult<Vec<TreeNode>> {
        if is_empty(value) {
            return Ok(Vec::new());
        }
        let style = self.scheme.tree_style(depth)?;
        let leaf = |label: String| TreeNode::new(Text::styled(label, style.clone()));
        match value {
            Value::Array(items) => Ok(items
                .iter()
                .map(|item| leaf(display_value(item)))
                .collect()),
            Value::Object(map) => map
                .iter()
                .map(|(key, child)| -> RenderResult<TreeNode> {
                    Ok(leaf(key.clone()).children(self.grow(child, depth + 1)?))
                })
                .collect(),
            scalar => Ok(vec![leaf(display_value(scalar))]),
        }
    }

    // ─────────────────────────────────────────────────
    // Shared Helpers
    // ─────────────────────────────────────────────────

    /// `text` in a role's style. The text is never parsed as markup.
    fn styled(&self, role: Role, text: &str) -> RenderResult<Text> {
        let mut line = Text::new("");
        line.append_styled(text, self.scheme.role_style(role)?);
        Ok(line)
    }

    /// Table with the title and header in the header role.
    pub(crate) fn styled_table(&self, title: &str) -> RenderResult<Grid> {
        let header = self.scheme.role_style(Role::Header)?;
        Ok(Grid::new(
            Table::new()
                .title(title)
                .title_style(header.clone())
                .header_style(header),
        ))
    }

    /// Column whose body uses the info role.
    pub(crate) fn info_column(&self, header: &str) -> RenderResult<Column> {
        Ok(Column::new(header).style(self.scheme.role_style(Role::Info)?))
    }

    /// Two-column table for `(key, value)` rows.
    pub(crate) fn key_value_table(
        &self,
        options: &TableOptions,
        default_title: &str,
    ) -> RenderResult<Grid> {
        let (key, value) = options
            .columns
            .clone()
            .unwrap_or_else(|| ("Key".to_string(), "Value".to_string()));
        let mut grid = self.styled_table(options.title.as_deref().unwrap_or(default_title))?;
        grid.add_column(self.info_column(&key)?);
        grid.add_column(self.info_column(&value)?);
        Ok(grid)
    }

    fn print_lines(&self, lines: &[Text]) -> RenderResult<()> {
        let segments: Vec<Segment<'_>> =
            lines.iter().flat_map(|line| line.render("\n")).collect();
        self.console.write_segments(&segments)
    }

    /// Render with a blank line before and after.
    pub(crate) fn print_padded<R: Renderable + ?Sized>(&self, renderable: &R) -> RenderResult<()> {
        let mut segments = vec![Segment::line()];
        segments.extend(self.console.segments(renderable));
        segments.push(Segment::line());
        self.console.write_segments(&segments)
    }
}

/// A `rich_rust` table that rejects rows whose width differs from the
/// column count.
pub(crate) struct Grid {
    table: Table,
    columns: usize,
    rows: Vec<Row>,
}

impl Grid {
    fn new(table: Table) -> Self {
        Self {
            table,
            columns: 0,
            rows: Vec::new(),
        }
    }

    pub(crate) fn add_column(&mut self, column: Column) {
        self.table.add_column(column);
        self.columns += 1;
    }

    pub(crate) fn add_row<I, S>(&mut self, cells: I) -> RenderResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let cells: Vec<Cell> = cells
            .into_iter()
            .map(|cell| Cell::new(Text::new(cell.into())))
            .collect();
        if cells.len() != self.columns {
            return Err(RenderError::RowWidth {
                row: self.rows.len(),
                expected: self.columns,
                found: cells.len(),
            });
        }
        self.rows.push(Row::new(cells));
        Ok(())
    }

    /// Draw a separator under the most recent row.
    pub(crate) fn end_section(&mut self) {
        if let Some(last) = self.rows.pop() {
            self.rows.push(last.end_section());
        }
    }

    pub(crate) fn finish(mut self) -> Table {
        for row in self.rows {
            self.table.add_row(row);
        }
        self.table
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::stdout()
    }
}

/// First `max` items, logging when anything is cut.
pub(crate) fn bounded<'a, T>(items: &'a [T], max: usize, what: &str) -> &'a [T] {
    if items.len() > max {
        log::trace!("{what} truncated to {max} of {} rows", items.len());
        &items[..max]
    } else {
        items
    }
}

/// Display string of a data value: strings as-is, everything else as JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Null, `{}`, `[]` and `""` render nothing.
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
