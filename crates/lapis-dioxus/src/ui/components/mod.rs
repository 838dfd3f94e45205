pub mod editor;
pub mod selection_panel;

pub use editor::Editor;
pub use selection_panel::SelectionPanel;
