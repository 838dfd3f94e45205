use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::markdown::import_markdown;
use crate::content::{ContentNode, ContentTree, NodeId};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid content file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Failed to serialize content: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Unsupported content file (expected .toml or .md): {0}")]
    UnsupportedExtension(PathBuf),
}

/// Load a content tree from disk.
///
/// `.toml` files hold the tree itself, keyed by node id. `.md` files are
/// imported as markdown under `root`.
pub fn load_content(path: &Path, root: &str) -> Result<ContentTree, LoadError> {
    let extension = path.extension().and_then(|ext| ext.to_str());
    let source = match extension {
        Some("toml") | Some("md") => read(path)?,
        _ => return Err(LoadError::UnsupportedExtension(path.to_path_buf())),
    };

    let tree = match extension {
        Some("md") => import_markdown(&source, root),
        _ => parse_toml_content(&source)?,
    };
    log::info!("Loaded {} content nodes from {}", tree.len(), path.display());
    Ok(tree)
}

/// Parse a content tree from its TOML form
pub fn parse_toml_content(source: &str) -> Result<ContentTree, LoadError> {
    Ok(toml::from_str(source)?)
}

/// Render a content tree as TOML, nodes sorted by id
pub fn content_to_toml(tree: &ContentTree) -> Result<String, LoadError> {
    let sorted: BTreeMap<&NodeId, &ContentNode> =
        tree.nodes().map(|node| (&node.id, node)).collect();
    Ok(toml::to_string_pretty(&sorted)?)
}

/// Write a content tree to `path` as TOML, creating parent directories
pub fn save_content_toml(path: &Path, tree: &ContentTree) -> Result<(), LoadError> {
    let serialized = content_to_toml(tree)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| LoadError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, serialized).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
