//! termprint CLI - preview color schemes and render data files.
//!
//! Commands:
//! - `demo` - Walk through colors, schemes and every formatter
//! - `schemes` - Table of the built-in schemes' style tokens
//! - `show` - Render a JSON, YAML or TOML file as a tree, table or list
//! - `request` - Render an HTTP request description with its curl command

#![forbid(unsafe_code)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde_json::{Map, Value, json};

use termprint::rich_rust::text::Text;
use termprint::{
    ColorScheme, RenderConfig, RenderError, RenderResult, Renderer, RequestInfo, Role,
    SchemeLoggerBuilder, SchemeName, TableOptions, display_value, parse_style,
};

/// termprint - Scheme-colored terminal output.
#[derive(Parser)]
#[command(name = "termprint")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Color scheme (truecolor, 256colors, basic, mono).
    #[arg(long, short = 's', global = true)]
    scheme: Option<String>,

    /// Fail on unknown scheme names instead of falling back to basic.
    #[arg(long, global = true)]
    strict: bool,

    /// Plain output without escape codes.
    #[arg(long, global = true)]
    plain: bool,

    /// Path to a TOML config file.
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show basic colors, the 256-color palette, every scheme and every formatter.
    Demo,

    /// List the built-in schemes and their style tokens.
    Schemes,

    /// Render a data file.
    ///
    /// The format is chosen by extension: .json, .yaml/.yml or .toml.
    Show {
        /// File to render.
        file: PathBuf,

        /// View (tree, dict, list, table, bullets).
        #[arg(long, short = 'v', default_value = "tree")]
        view: View,

        /// Title for the rendered view.
        #[arg(long, short = 't')]
        title: Option<String>,

        /// Maximum rows for table views.
        #[arg(long)]
        max_rows: Option<usize>,
    },

    /// Render a request description and its curl command.
    Request {
        /// Base endpoint URL.
        endpoint: String,

        /// Resource path appended to the endpoint.
        #[arg(default_value = "")]
        path: String,

        /// HTTP method.
        #[arg(long, short = 'X', default_value = "GET")]
        method: String,

        /// Header (KEY:VALUE format).
        #[arg(long = "header", short = 'H')]
        headers: Vec<String>,

        /// Query parameter (KEY=VALUE format).
        #[arg(long = "param", short = 'p')]
        params: Vec<String>,

        /// Body field (KEY=VALUE format).
        #[arg(long = "data", short = 'd')]
        data: Vec<String>,

        /// Client certificate path.
        #[arg(long, requires = "key")]
        cert: Option<String>,

        /// Client key path.
        #[arg(long, requires = "cert")]
        key: Option<String>,
    },
}

/// How `show` renders its input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
enum View {
    #[default]
    Tree,
    Dict,
    List,
    Table,
    Bullets,
}

impl std::str::FromStr for View {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "tree" => Ok(Self::Tree),
            "dict" | "dictionary" => Ok(Self::Dict),
            "list" | "listdicts" => Ok(Self::List),
            "table" => Ok(Self::Table),
            "bullets" | "bullet" => Ok(Self::Bullets),
            _ => Err(format!(
                "Unknown view: {s}. Expected: tree, dict, list, table, bullets"
            )),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = build_config(&cli).and_then(|config| {
        SchemeLoggerBuilder::from_config(&config)?.try_init();
        let mut renderer = Renderer::from_config(&config)?;
        run(cli.command, &mut renderer)
    });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands, renderer: &mut Renderer) -> RenderResult<()> {
    match command {
        Commands::Demo => cmd_demo(renderer),
        Commands::Schemes => cmd_schemes(renderer),
        Commands::Show {
            file,
            view,
            title,
            max_rows,
        } => cmd_show(renderer, &file, view, title, max_rows),
        Commands::Request {
            endpoint,
            path,
            method,
            headers,
            params,
            data,
            cert,
            key,
        } => {
            let mut request = RequestInfo::new(method, endpoint, path);
            for header in &headers {
                let (k, v) = split_pair(header, ':')?;
                request = request.header(k, v);
            }
            for param in &params {
                let (k, v) = split_pair(param, '=')?;
                request = request.param(k, v);
            }
            for field in &data {
                let (k, v) = split_pair(field, '=')?;
                request = request.data(k, v);
            }
            if let (Some(cert), Some(key)) = (cert, key) {
                request = request.client_cert(cert, key);
            }
            renderer.request_info(&request)
        }
    }
}

/// Config file (explicit or default location), then environment, then flags.
fn build_config(cli: &Cli) -> RenderResult<RenderConfig> {
    let path = cli
        .config
        .clone()
        .or_else(|| RenderConfig::default_path().filter(|p| p.exists()));
    let base = match path {
        Some(path) => RenderConfig::load(&path)?,
        None => RenderConfig::new(),
    };

    let mut config = base.with_env_overrides(|key| std::env::var(key).ok());
    if let Some(scheme) = &cli.scheme {
        config = config.with_scheme(scheme.clone());
    }
    if cli.strict {
        config = config.strict();
    }
    if cli.plain {
        config = config.plain_mode();
    }
    if let Some(level) = &cli.log_level {
        let level = level
            .parse::<log::Level>()
            .map_err(|_| RenderError::Config(format!("unknown log level '{level}'")))?;
        config = config.with_log_level(level);
    }
    Ok(config)
}

fn split_pair(text: &str, sep: char) -> RenderResult<(String, String)> {
    text.split_once(sep)
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .ok_or_else(|| RenderError::Input(format!("expected KEY{sep}VALUE, got '{text}'")))
}

// ─────────────────────────────────────────────────
// demo
// ─────────────────────────────────────────────────

fn cmd_demo(r: &mut Renderer) -> RenderResult<()> {
    let configured = r.scheme().clone();
    let console = r.console().clone();

    r.title("Basic colors")?;
    for color in [
        "red", "green", "blue", "yellow", "magenta", "cyan", "white", "black", "purple",
    ] {
        console.print(&format!("[{color}]This is {color}[/]"))?;
    }

    r.title("256 colors")?;
    for row in 0..13u16 {
        let mut line = String::new();
        for n in (row * 20)..(row * 20 + 20).min(256) {
            let _ = write!(line, "[color({n})]{n:3}[/] ");
        }
        console.print(line.trim_end())?;
    }

    for name in SchemeName::ALL {
        let scheme = r.select_scheme(name.as_str())?.clone();
        r.title(&format!("{name} scheme"))?;
        for (role, token) in scheme.roles() {
            console.print_text(&Text::styled(role.as_str(), parse_style(token)?))?;
        }
        let mut levels = Text::new("");
        for (i, token) in scheme.tree_levels().iter().enumerate() {
            if i > 0 {
                levels.append(" ");
            }
            levels.append_styled(&format!("level {i}"), parse_style(token)?);
        }
        console.print_text(&levels)?;
    }
    r.set_scheme(configured);

    r.title("Text examples")?;
    r.error("This is an error message")?;
    r.warning("This is a warning message")?;
    r.info("This is an info message", Some("This is the message"))?;

    r.bullet_list(&["item1", "item2", "item3"], Some("Bullet list"))?;

    r.table_with(
        &["First Name", "Last Name", "Age"],
        &[
            ["John", "Doe", "45"],
            ["Jane", "Doe", "56"],
            ["Alice", "Smith", "67"],
        ],
        &TableOptions::new().title("Table example"),
    )?;

    let person = object(json!({"First Name": "John", "Last Name": "Doe", "Age": 45}));
    r.dictionary_with(&person, &TableOptions::new().title("Dictionary example"))?;

    let people = vec![
        person,
        object(json!({"First Name": "Jane", "Last Name": "Doe", "Age": 56})),
    ];
    r.listdicts_with(&people, &TableOptions::new().title("List of dictionaries"))?;

    r.tree(&contacts(), None)
}

fn contacts() -> Value {
    json!({
        "Contacts": {
            "A": {
                "Person 1": {"First Name": "John", "Last Name": "Doe", "Age": 45}
            },
            "B": {
                "Person 1": {"First Name": "Jane", "Last Name": "Doe", "Age": 56},
                "Person 2": {"First Name": "Alice", "Last Name": "Smith", "Age": 67},
                "Person 3": {"First Name": "Bob", "Last Name": "Brown", "Age": 29}
            },
            "C": {
                "Person 1": {"First Name": "Charlie", "Last Name": "Davis", "Age": 34},
                "Person 2": {"First Name": "Diana", "Last Name": "Evans", "Age": 42}
            }
        }
    })
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

// ─────────────────────────────────────────────────
// schemes
// ─────────────────────────────────────────────────

fn cmd_schemes(r: &Renderer) -> RenderResult<()> {
    let schemes: Vec<ColorScheme> = SchemeName::ALL
        .into_iter()
        .map(ColorScheme::builtin)
        .collect();

    let mut columns = vec!["Role".to_string()];
    columns.extend(schemes.iter().map(|s| s.name().to_string()));

    let mut rows: Vec<Vec<String>> = Role::ALL
        .into_iter()
        .map(|role| {
            let mut row = vec![role.to_string()];
            row.extend(schemes.iter().map(|s| s.style(role).to_string()));
            row
        })
        .collect();
    let depth = schemes
        .iter()
        .map(|s| s.tree_levels().len())
        .max()
        .unwrap_or(0);
    for level in 0..depth {
        let mut row = vec![format!("tree level {level}")];
        row.extend(schemes.iter().map(|s| s.tree_level(level).to_string()));
        rows.push(row);
    }

    let options = TableOptions::new().title("Schemes").max_rows(rows.len());
    r.table_with(&columns, &rows, &options)
}

// ─────────────────────────────────────────────────
// show
// ─────────────────────────────────────────────────

fn cmd_show(
    r: &Renderer,
    file: &Path,
    view: View,
    title: Option<String>,
    max_rows: Option<usize>,
) -> RenderResult<()> {
    let data = load_data(file)?;
    let mut options = TableOptions::new();
    options.title = title.clone();
    options.max_rows = max_rows;

    match view {
        View::Tree => r.tree(&data, title.as_deref()),
        View::Dict => match &data {
            Value::Object(map) => r.dictionary_with(map, &options),
            _ => Err(shape_error(file, "a mapping")),
        },
        View::List => {
            let maps = list_of_maps(&data).ok_or_else(|| shape_error(file, "a list of mappings"))?;
            r.listdicts_with(&maps, &options)
        }
        View::Table => {
            let maps = list_of_maps(&data).ok_or_else(|| shape_error(file, "a list of mappings"))?;
            let mut columns: Vec<String> = Vec::new();
            for key in maps.iter().flat_map(Map::keys) {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
            let rows: Vec<Vec<String>> = maps
                .iter()
                .map(|map| {
                    columns
                        .iter()
                        .map(|c| map.get(c).map(display_value).unwrap_or_default())
                        .collect()
                })
                .collect();
            r.table_with(&columns, &rows, &options)
        }
        View::Bullets => match &data {
            Value::Array(items) => {
                let items: Vec<String> = items.iter().map(display_value).collect();
                r.bullet_list(&items, title.as_deref())
            }
            _ => Err(shape_error(file, "a list")),
        },
    }
}

fn load_data(file: &Path) -> RenderResult<Value> {
    let text = std::fs::read_to_string(file)?;
    let ext = file
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    let parse_error = |e: &dyn std::fmt::Display| {
        RenderError::Input(format!("{}: {e}", file.display()))
    };

    match ext.as_str() {
        "json" => serde_json::from_str(&text).map_err(|e| parse_error(&e)),
        "yaml" | "yml" => serde_yaml::from_str(&text).map_err(|e| parse_error(&e)),
        "toml" => toml::from_str(&text).map_err(|e| parse_error(&e)),
        other => Err(RenderError::Input(format!(
            "{}: unsupported file type '{other}' (expected json, yaml or toml)",
            file.display()
        ))),
    }
}

fn list_of_maps(data: &Value) -> Option<Vec<Map<String, Value>>> {
    match data {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_object().cloned())
            .collect(),
        _ => None,
    }
}

fn shape_error(file: &Path, expected: &str) -> RenderError {
    RenderError::Input(format!("{}: expected {expected}", file.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_parsing() {
        assert_eq!("TREE".parse::<View>().unwrap(), View::Tree);
        assert_eq!("dictionary".parse::<View>().unwrap(), View::Dict);
        assert_eq!("listdicts".parse::<View>().unwrap(), View::List);
        assert!("graph".parse::<View>().is_err());
    }

    #[test]
    fn test_split_pair() {
        assert_eq!(
            split_pair("Accept: json", ':').unwrap(),
            ("Accept".to_string(), "json".to_string())
        );
        assert_eq!(
            split_pair("url=http://x?a=b", '=').unwrap(),
            ("url".to_string(), "http://x?a=b".to_string())
        );
        assert!(split_pair("novalue", '=').is_err());
    }

    #[test]
    fn test_list_of_maps() {
        assert_eq!(list_of_maps(&json!([{"a": 1}, {"b": 2}])).map(|v| v.len()), Some(2));
        assert!(list_of_maps(&json!([{"a": 1}, 3])).is_none());
        assert!(list_of_maps(&json!({"a": 1})).is_none());
    }

    #[test]
    fn test_load_data_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("d.json");
        std::fs::write(&json_path, r#"{"a": [1, 2]}"#).unwrap();
        assert_eq!(load_data(&json_path).unwrap(), json!({"a": [1, 2]}));

        let yaml_path = dir.path().join("d.yml");
        std::fs::write(&yaml_path, "a:\n  - 1\n  - 2\n").unwrap();
        assert_eq!(load_data(&yaml_path).unwrap(), json!({"a": [1, 2]}));

        let toml_path = dir.path().join("d.toml");
        std::fs::write(&toml_path, "a = [1, 2]\n").unwrap();
        assert_eq!(load_data(&toml_path).unwrap(), json!({"a": [1, 2]}));

        let txt_path = dir.path().join("d.txt");
        std::fs::write(&txt_path, "a").unwrap();
        assert!(matches!(load_data(&txt_path), Err(RenderError::Input(_))));
    }

    #[test]
    fn test_cli_parses_globals_after_subcommand() {
        let cli = Cli::try_parse_from(["termprint", "schemes", "--plain", "-s", "mono"]).unwrap();
        assert!(cli.plain);
        assert_eq!(cli.scheme.as_deref(), Some("mono"));
        assert!(matches!(cli.command, Commands::Schemes));
    }
}
