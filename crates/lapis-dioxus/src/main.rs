use anyhow::Context;
use dioxus::prelude::*;
use lapis_config::Config;
use lapis_engine::{ContentTree, load_content};
use std::env;
use std::path::PathBuf;
use std::process;

mod demo;
mod dom;
mod ui;

use ui::App;

/// Everything `app_root` needs, resolved once before launch
#[derive(Clone)]
struct Startup {
    attribute: &'static str,
    config: Config,
    content: ContentTree,
}

fn main() {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    log::info!("lapis starting up!");

    let startup = match prepare() {
        Ok(startup) => startup,
        Err(e) => {
            log::error!("Startup failed: {e:#}");
            eprintln!("Error: {e:#}");
            let program_name = env::args()
                .next()
                .unwrap_or_else(|| "lapis-dioxus".to_string());
            eprintln!("Usage: {program_name} [content.toml | content.md]");
            process::exit(1);
        }
    };

    log::info!(
        "Launching editor with {} content nodes",
        startup.content.len()
    );
    dioxus::LaunchBuilder::desktop()
        .with_cfg(make_window_config())
        .with_context(startup)
        .launch(app_root);
}

/// Resolve configuration and initial content from CLI args and config file
fn prepare() -> anyhow::Result<Startup> {
    let config_path = Config::config_path();
    log::info!("Config path: {}", config_path.display());

    let config = match Config::load()? {
        Some(config) => config,
        None => {
            log::info!("No config file found, using defaults");
            Config::default()
        }
    };

    let content_path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.content_path.clone());
    let content = match content_path {
        Some(path) => load_content(&path, &config.root_id)
            .with_context(|| format!("Failed to load content from {}", path.display()))?,
        None => {
            log::info!("No content path given, using demo content");
            demo::demo_content().context("Demo content is invalid")?
        }
    };

    // Rendered attributes need a 'static name
    let attribute: &'static str = config.attribute_name.clone().leak();

    Ok(Startup {
        attribute,
        config,
        content,
    })
}

fn app_root() -> Element {
    let startup = use_context::<Startup>();

    rsx! {
        App {
            attribute: startup.attribute,
            config: startup.config,
            content: startup.content,
        }
    }
}

fn make_window_config() -> dioxus::desktop::Config {
    use dioxus::desktop::{Config, WindowBuilder};

    let window = WindowBuilder::new()
        .with_title("lapis")
        .with_always_on_top(false);

    Config::default().with_window(window)
}
