//! Absolute path materialization

use crate::namespace::NodeKind;
use crate::tree::Tree;
use crate::DecodeOptions;

/// Which tree nodes produce a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathOptions {
    /// Leaf directories (empty directories) produce a path
    pub include_empty_dirs: bool,
    /// Nodes with children produce a path before their descendants
    pub include_directories: bool,
}

impl Default for PathOptions {
    fn default() -> Self {
        PathOptions {
            include_empty_dirs: true,
            include_directories: false,
        }
    }
}

impl From<&DecodeOptions> for PathOptions {
    fn from(options: &DecodeOptions) -> Self {
        PathOptions {
            include_empty_dirs: options.include_empty_dirs,
            include_directories: options.include_directories,
        }
    }
}

/// Absolute paths, depth-first pre-order, root excluded.
///
/// With default options there is exactly one path per leaf.
pub fn materialize(tree: &Tree, options: PathOptions) -> Vec<String> {
    let mut paths = Vec::with_capacity(tree.path_leaf_count());
    for child in &tree.children {
        walk(child, "", options, &mut paths);
    }
    paths
}

fn walk(tree: &Tree, prefix: &str, options: PathOptions, paths: &mut Vec<String>) {
    let name = tree.node.name_lossy();
    let mut path = String::with_capacity(prefix.len() + 1 + name.len());
    path.push_str(prefix);
    path.push('/');
    path.push_str(&name);

    if tree.is_leaf() {
        if options.include_empty_dirs || tree.node.kind != NodeKind::Directory {
            paths.push(path);
        }
        return;
    }

    if options.include_directories {
        paths.push(path.clone());
    }
    for child in &tree.children {
        walk(child, &path, options, paths);
    }
}
