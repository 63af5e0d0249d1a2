//! Integration tests for termprint.
//!
//! These exercise the renderer end to end through a captured console:
//! - scheme selection and its effect on every formatter
//! - row bounds for table, dictionary and list-of-dictionaries output
//! - tree construction from nested data
//! - configuration flowing into the renderer

use std::io::Write;
use std::thread;

use serde_json::{Map, Value, json};
use termprint::config::RenderConfig;
use termprint::detection::DisplayContext;
use termprint::scheme::{ColorScheme, Role, SchemeName, SchemePolicy};
use termprint::testing::TestConsole;
use termprint::{Renderer, RenderError, RequestInfo, TableOptions};

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected an object, got {other}"),
    }
}

fn body_rows(tc: &TestConsole) -> usize {
    tc.output().iter().filter(|l| l.starts_with('│')).count()
}

// ============================================================================
// Scheme Selection
// ============================================================================

#[test]
fn test_select_each_builtin_gives_its_table() {
    let tc = TestConsole::new();
    let mut r = tc.renderer(SchemeName::Basic);
    for name in SchemeName::ALL {
        let selected = r.select_scheme(name.as_str()).unwrap().clone();
        assert_eq!(selected, ColorScheme::builtin(name));
        assert_eq!(r.scheme().name(), name.as_str());
    }
}

#[test]
fn test_select_unknown_scheme_by_policy() {
    let tc = TestConsole::new();
    let mut r = tc.renderer(SchemeName::TrueColor);
    r.select_scheme("solarized").unwrap();
    assert_eq!(r.scheme(), &ColorScheme::builtin(SchemeName::Basic));

    let mut strict = tc
        .renderer(SchemeName::TrueColor)
        .with_policy(SchemePolicy::Strict);
    let err = strict.select_scheme("solarized").unwrap_err();
    assert!(matches!(err, RenderError::UnknownScheme(_)));
    assert_eq!(strict.scheme().name(), "truecolor");
}

#[test]
fn test_selection_is_idempotent() {
    let tc = TestConsole::new();
    let mut r = tc.renderer(SchemeName::Mono);
    let once = r.select_scheme("256colors").unwrap().clone();
    let twice = r.select_scheme("256colors").unwrap().clone();
    assert_eq!(once, twice);
}

#[test]
fn test_mono_defines_every_role() {
    let mono = ColorScheme::builtin(SchemeName::Mono);
    for (role, token) in mono.roles() {
        assert!(!token.is_empty(), "mono has no token for {role}");
    }
    assert_eq!(mono.style(Role::Var), "white");
    assert_eq!(mono.style(Role::Bullet), "white");
}

#[test]
fn test_formatters_read_scheme_at_call_time() {
    let tc = TestConsole::new_rich();
    let mut r = tc.renderer(SchemeName::Basic);
    r.error("first").unwrap();
    r.select_scheme("truecolor").unwrap();
    r.error("second").unwrap();

    let raw = tc.raw_output();
    assert!(raw[0].contains("\x1b[31m"), "{raw:?}");
    assert!(raw[1].contains("\x1b[38;2;210;10;10m"), "{raw:?}");
}

// ============================================================================
// Row Bounds
// ============================================================================

#[test]
fn test_table_renders_first_min_n_m_rows() {
    for (n, m) in [(0, 3), (2, 3), (3, 3), (10, 3), (5, 0)] {
        let tc = TestConsole::new();
        let r = tc.renderer(SchemeName::Colors256);
        let rows: Vec<Vec<String>> = (0..n).map(|i| vec![format!("row{i}")]).collect();
        r.table_with(&["Name"], &rows, &TableOptions::new().max_rows(m))
            .unwrap();

        assert_eq!(body_rows(&tc), n.min(m), "n={n} m={m}");
        for i in 0..n.min(m) {
            tc.assert_contains(&format!("row{i} "));
        }
    }
}

#[test]
fn test_dictionary_renders_first_min_n_m_entries() {
    let data = object(json!({"a": 1, "b": 2, "c": 3, "d": 4}));
    let tc = TestConsole::new();
    let r = tc.renderer(SchemeName::Basic).with_max_rows(3);
    r.dictionary(&data).unwrap();

    let out = tc.output();
    let keys: Vec<&str> = out
        .iter()
        .filter(|l| l.starts_with('│'))
        .filter_map(|l| l.split('│').nth(1))
        .map(str::trim)
        .collect();
    assert_eq!(keys, vec!["a", "b", "c"]);
}

#[test]
fn test_listdicts_bounds_number_of_mappings() {
    let data: Vec<Map<String, Value>> = (0..4).map(|i| object(json!({ "id": i }))).collect();
    let tc = TestConsole::new();
    let r = tc.renderer(SchemeName::Basic);
    r.listdicts_with(&data, &TableOptions::new().max_rows(2).title("Shares"))
        .unwrap();

    tc.assert_contains("Shares");
    // index row plus one key/value row per mapping
    assert_eq!(body_rows(&tc), 4);
}

// ============================================================================
// Trees
// ============================================================================

#[test]
fn test_tree_of_empty_mapping_is_bare_root() {
    let tc = TestConsole::new();
    let r = tc.renderer(SchemeName::Colors256);
    r.tree(&json!({}), None).unwrap();
    assert_eq!(tc.output(), vec!["", "root", ""]);
}

#[test]
fn test_tree_single_key_nested() {
    let tc = TestConsole::new();
    let r = tc.renderer(SchemeName::TrueColor);
    let root = r.build_tree(&json!({"a": {"b": 1}}), None).unwrap();

    assert_eq!(root.label().plain(), "a");
    let leaf = &root.children_nodes()[0].children_nodes()[0];
    assert_eq!(leaf.label().plain(), "1");
    assert_eq!(
        leaf.label().style(),
        &termprint::scheme::parse_style("rgb(137,209,255)").unwrap()
    );
}

#[test]
fn test_tree_two_keys_titled_root() {
    let tc = TestConsole::new();
    let r = tc.renderer(SchemeName::Basic);
    r.tree(&json!({"a": 1, "b": 2}), None).unwrap();
    assert_eq!(
        tc.output(),
        vec!["", "root", "├── a", "│   └── 1", "└── b", "    └── 2", ""]
    );
}

#[test]
fn test_tree_depth_past_last_level_uses_last_token() {
    let scheme = ColorScheme::builtin(SchemeName::Colors256);
    let last = scheme.tree_levels().last().cloned().unwrap();
    assert_eq!(scheme.tree_level(11), last);
    assert_eq!(scheme.tree_level(40), last);
}

// ============================================================================
// Text and Bullets
// ============================================================================

#[test]
fn test_bullet_list_two_items() {
    let tc = TestConsole::new();
    let r = tc.renderer(SchemeName::Colors256);
    r.bullet_list(&["x", "y"], None).unwrap();

    let bullets: Vec<String> = tc
        .output()
        .into_iter()
        .filter(|l| l.starts_with("• "))
        .collect();
    assert_eq!(bullets, vec!["• x", "• y"]);
}

#[test]
fn test_trailing_backslash_does_not_swallow_styling() {
    let tc = TestConsole::new_rich();
    let r = tc.renderer(SchemeName::Basic);
    r.error(r"share\").unwrap();
    r.warning(r"odd\\\").unwrap();
    r.bullet_list(&[r"dir\\"], None).unwrap();

    let raw = tc.raw_output();
    assert_eq!(raw[0], "\x1b[31mshare\\\x1b[0m");
    assert_eq!(tc.output()[1], r"odd\\\");
    assert_eq!(tc.output()[2], r"• dir\\");
    assert!(!raw.iter().any(|l| l.contains("[/]")));
}

#[test]
fn test_bracketed_user_text_is_literal() {
    let tc = TestConsole::new();
    let r = tc.renderer(SchemeName::Basic);
    r.warning("[red]not markup[/]").unwrap();
    r.bullet_list(&["a[1]", "[b]"], None).unwrap();
    r.title_with("[x]", termprint::RuleOptions::default().no_line())
        .unwrap();
    assert!(tc.contains_all(&["[red]not markup[/]", "• a[1]", "• [b]", "[x]"]));
}

#[test]
fn test_plain_console_never_emits_escapes() {
    let tc = TestConsole::new();
    let mut r = tc.renderer(SchemeName::TrueColor);
    r.title("Title").unwrap();
    r.info("k", Some("v")).unwrap();
    r.table(&["a", "b"], &[["1", "2"]]).unwrap();
    r.tree(&json!({"x": [1, 2]}), None).unwrap();
    r.select_scheme("basic").unwrap();
    r.error("e").unwrap();

    assert!(!tc.raw_output().iter().any(|l| l.contains('\x1b')));
}

#[test]
fn test_request_info_shows_curl() {
    let tc = TestConsole::new().with_width(200);
    let r = tc.renderer(SchemeName::Basic);
    let req = RequestInfo::new("GET", "https://h/api", "/shares")
        .header("Authorization", "Bearer token")
        .client_cert("c.pem", "k.pem");
    r.request_info(&req).unwrap();
    tc.assert_contains("curl -X GET https://h/api/shares");
    tc.assert_contains("--cert c.pem --key k.pem");
}

// ============================================================================
// Configuration
// ============================================================================

#[test]
fn test_renderer_from_config_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "scheme = \"basic\"\nmax_rows = 1\nplain = true\n\n[colors]\nerror = \"bold magenta\""
    )
    .unwrap();

    let config = RenderConfig::load(file.path()).unwrap();
    assert_eq!(config.resolve_context(), DisplayContext::Agent);

    let r = Renderer::from_config(&config).unwrap();
    assert_eq!(r.scheme().name(), "basic");
    assert_eq!(r.scheme().style(Role::Error), "bold magenta");
    assert_eq!(r.max_rows(), 1);
    assert!(!r.console().is_color());
}

#[test]
fn test_renderer_from_config_rejects_bad_override() {
    let config = RenderConfig::new().with_color(Role::Info, "sparkly");
    assert!(matches!(
        Renderer::from_config(&config),
        Err(RenderError::InvalidStyle { .. })
    ));
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_tables_do_not_interleave() {
    let tc = TestConsole::new();
    let r = tc.renderer(SchemeName::Basic);

    thread::scope(|s| {
        for t in 0..4 {
            let r = &r;
            s.spawn(move || {
                let rows: Vec<Vec<String>> = (0..5).map(|i| vec![format!("t{t}-{i}")]).collect();
                r.table(&["Cell"], &rows).unwrap();
            });
        }
    });

    // each table is a contiguous block: top border, header, rule, 5 rows, bottom
    let out = tc.output();
    for (i, line) in out.iter().enumerate() {
        if let Some(rest) = line.strip_prefix("│ t") {
            let thread = rest.chars().next().unwrap();
            let block_start = out[..i].iter().rposition(|l| l.starts_with('┡')).unwrap();
            for other in &out[block_start + 1..i] {
                assert!(other.starts_with(&format!("│ t{thread}")), "{other}");
            }
        }
    }
}
