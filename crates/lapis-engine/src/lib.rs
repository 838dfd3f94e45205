pub mod content;
pub mod coordinator;
pub mod events;
pub mod generation;
pub mod io;
pub mod render;
pub mod selection;
pub mod store;

// Re-export key types for easier usage
pub use content::{ChildRef, ContentError, ContentNode, ContentTree, NodeId, TypeTag, Validation};
pub use coordinator::{ContainerProps, Coordinator, CoordinatorOptions, HostCallbacks};
pub use events::{EventRouter, KeyEvent, KeyPhase};
pub use generation::Generation;
pub use io::{LoadError, load_content};
pub use render::{RenderBridge, RenderProps, RendererRegistry, TextLeaf};
pub use selection::{
    AncestorPath, ListenerId, LogicalSelection, NativeRange, PathRange, SelectionEndpoint,
    SelectionHub, SelectionParent, SelectionSource, SelectionTracker, ViewHandle, ViewNode,
};
pub use store::ContentStore;

/// Attribute name used to tag rendered elements when the embedder does not pick one.
pub const DEFAULT_ATTRIBUTE_NAME: &str = "data-lapis";
