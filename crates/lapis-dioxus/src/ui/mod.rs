pub mod app;
pub mod components;
pub mod render;

use dioxus::prelude::Element;
use lapis_engine::{Coordinator, PathRange, SelectionHub};

use crate::dom::DomKeyEvent;

pub use app::App;

/// Editor core as mounted in the webview
pub type DomEditor = Coordinator<Element, SelectionHub<PathRange>, DomKeyEvent>;
