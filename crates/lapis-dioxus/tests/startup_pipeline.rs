//! Integration tests for the startup path the desktop host takes: config file
//! → content file → mounted editor core.

use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

use lapis_config::Config;
use lapis_engine::io::parse_toml_content;
use lapis_engine::render::html::{html_registry, join_html};
use lapis_engine::{
    Coordinator, HostCallbacks, KeyEvent, PathRange, SelectionHub, Validation, load_content,
};

struct NoKey;

impl KeyEvent for NoKey {
    fn prevent_default(&self) {}
    fn stop_propagation(&self) {}
}

fn demo_asset() -> String {
    fs::read_to_string(concat!(env!("CARGO_MANIFEST_DIR"), "/src/assets/demo.toml")).unwrap()
}

#[test]
fn test_demo_asset_renders_like_the_sample() {
    let content = parse_toml_content(&demo_asset()).unwrap();
    let config = Config::default();

    let editor: Coordinator<String, SelectionHub<PathRange>, NoKey> = Coordinator::mount(
        config.coordinator_options().with_default_content(content),
        html_registry(),
        HostCallbacks::new(),
        SelectionHub::new(),
    );

    assert_eq!(
        join_html(&editor.get_content()),
        concat!(
            r#"<h1 data-lapis="quas"><span data-lapis="quas.0">Quas </span>"#,
            r#"<span data-lapis="wex"><span data-lapis="wex.0">Wex </span>"#,
            r#"<i data-lapis="exort"><span data-lapis="exort.0">"#,
            r#"the quick brown fox jumps over</span></i></span></h1>"#,
        )
    );
}

#[test]
fn test_config_points_at_markdown_content() {
    // Given a config file naming a markdown document and a custom attribute
    let dir = TempDir::new().unwrap();
    let doc = dir.path().join("doc.md");
    fs::write(&doc, "# Notes\n\nA **bold** move\n").unwrap();
    let config_file = dir.path().join("config.toml");
    fs::write(
        &config_file,
        format!(
            "attribute_name = \"data-ed\"\nvalidation = \"strict\"\ncontent_path = \"{}\"\n",
            doc.display()
        ),
    )
    .unwrap();

    // When the host resolves its startup state
    let config = Config::load_from_path(&config_file).unwrap().unwrap();
    let content_path = config.content_path.clone().unwrap();
    let content = load_content(&content_path, &config.root_id).unwrap();
    let editor: Coordinator<String, SelectionHub<PathRange>, NoKey> = Coordinator::mount(
        config.coordinator_options().with_default_content(content),
        html_registry(),
        HostCallbacks::new(),
        SelectionHub::new(),
    );

    // Then the editor uses the configured attribute and validation
    assert_eq!(config.validation, Validation::Strict);
    let html = join_html(&editor.get_content());
    assert!(html.starts_with(r#"<h1 data-ed="header-"#));
    assert!(html.contains("<b data-ed="));
    assert!(!html.contains("data-lapis"));
}
