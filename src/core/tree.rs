//! Namespace tree reconstruction

use crate::error::{FsImageError, Result};
use crate::namespace::{AdjacencyTable, InodeId, Node, NodeKind, NodeTable};
use crate::DecodeOptions;
use serde::Serialize;
use std::collections::HashSet;
use tracing::warn;

/// A node and the subtrees it exclusively owns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tree {
    pub node: Node,
    pub children: Vec<Tree>,
    /// The id was referenced but had no inode record
    pub placeholder: bool,
}

impl Tree {
    pub fn leaf(node: Node) -> Self {
        Tree {
            node,
            children: Vec::new(),
            placeholder: false,
        }
    }

    pub fn id(&self) -> InodeId {
        self.node.id
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// This node plus all descendants
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Tree::node_count).sum::<usize>()
    }

    /// Nodes without children, this one included if it has none
    pub fn leaf_count(&self) -> usize {
        if self.is_leaf() {
            1
        } else {
            self.children.iter().map(Tree::leaf_count).sum()
        }
    }

    /// Leaves below this node, never counting the node itself
    pub fn path_leaf_count(&self) -> usize {
        self.children.iter().map(Tree::leaf_count).sum()
    }

    /// Levels below this node; a leaf has depth 0
    pub fn depth(&self) -> usize {
        self.children
            .iter()
            .map(|child| child.depth() + 1)
            .max()
            .unwrap_or(0)
    }

    /// Subtrees standing in for missing inode records
    pub fn placeholder_count(&self) -> usize {
        usize::from(self.placeholder)
            + self
                .children
                .iter()
                .map(Tree::placeholder_count)
                .sum::<usize>()
    }
}

/// Builds a [`Tree`] from the adjacency and node tables
pub struct TreeBuilder<'a> {
    adjacency: &'a AdjacencyTable,
    nodes: &'a NodeTable,
    max_depth: usize,
}

impl<'a> TreeBuilder<'a> {
    pub fn new(adjacency: &'a AdjacencyTable, nodes: &'a NodeTable) -> Self {
        TreeBuilder {
            adjacency,
            nodes,
            max_depth: crate::config::DEFAULT_MAX_DEPTH,
        }
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Build the subtree rooted at `root_id`.
    ///
    /// Children keep their stored order. An id with no inode record becomes a
    /// placeholder; an id that is its own ancestor fails with
    /// [`FsImageError::CycleDetected`], and an id reached a second time by
    /// any other route fails with [`FsImageError::DuplicateChild`].
    pub fn build(&self, root_id: InodeId) -> Result<Tree> {
        let mut ancestors = HashSet::new();
        let mut visited = HashSet::new();
        self.build_node(root_id, 0, &mut ancestors, &mut visited)
    }

    fn build_node(
        &self,
        id: InodeId,
        depth: usize,
        ancestors: &mut HashSet<InodeId>,
        visited: &mut HashSet<InodeId>,
    ) -> Result<Tree> {
        if depth > self.max_depth {
            return Err(FsImageError::DepthExceeded {
                limit: self.max_depth,
            });
        }
        // Each id is built at most once, so the tree never outgrows the tables
        if !visited.insert(id) {
            return Err(FsImageError::DuplicateChild { id });
        }

        let (node, placeholder) = match self.nodes.get(&id) {
            Some(node) => (node.clone(), false),
            None => {
                warn!("Inode {} is referenced but has no record", id);
                (Node::new(id, Vec::new(), NodeKind::Unknown(0)), true)
            }
        };

        let child_ids = match self.adjacency.get(&id) {
            Some(ids) if !ids.is_empty() => ids,
            _ => {
                return Ok(Tree {
                    node,
                    children: Vec::new(),
                    placeholder,
                })
            }
        };

        ancestors.insert(id);
        let mut children = Vec::with_capacity(child_ids.len());
        for &child in child_ids {
            if ancestors.contains(&child) {
                return Err(FsImageError::CycleDetected { id: child });
            }
            children.push(self.build_node(child, depth + 1, ancestors, visited)?);
        }

        ancestors.remove(&id);
        Ok(Tree {
            node,
            children,
            placeholder,
        })
    }
}

/// Build the namespace tree for `options.root_id`
pub fn build_tree(
    adjacency: &AdjacencyTable,
    nodes: &NodeTable,
    options: &DecodeOptions,
) -> Result<Tree> {
    TreeBuilder::new(adjacency, nodes)
        .max_depth(options.max_depth)
        .build(options.root_id)
}
