//! Namespace statistics

use crate::namespace::{AdjacencyTable, InodeId, NodeTable};
use serde::Serialize;
use std::collections::HashMap;

/// How often one name occurs in the namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameCount {
    pub name: String,
    pub count: u64,
}

/// Number of children recorded for one parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChildCount {
    pub parent: InodeId,
    pub children: usize,
}

/// Node names ranked by occurrence, most frequent first (ties by name)
pub fn name_frequencies(nodes: &NodeTable) -> Vec<NameCount> {
    let mut counts: HashMap<&[u8], u64> = HashMap::new();
    for node in nodes.values() {
        *counts.entry(node.name.as_slice()).or_insert(0) += 1;
    }

    let mut ranked: Vec<NameCount> = counts
        .into_iter()
        .map(|(name, count)| NameCount {
            name: String::from_utf8_lossy(name).into_owned(),
            count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked
}

/// Parents ranked by child count, largest first (ties by id)
pub fn child_counts(adjacency: &AdjacencyTable) -> Vec<ChildCount> {
    let mut ranked: Vec<ChildCount> = adjacency
        .iter()
        .map(|(&parent, children)| ChildCount {
            parent,
            children: children.len(),
        })
        .collect();
    ranked.sort_by(|a, b| b.children.cmp(&a.children).then(a.parent.cmp(&b.parent)));
    ranked
}

/// Smallest inode id, if any
pub fn min_inode_id<I>(ids: I) -> Option<InodeId>
where
    I: IntoIterator<Item = InodeId>,
{
    ids.into_iter().min()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::{Node, NodeKind};

    #[test]
    fn test_name_frequencies() {
        let mut nodes = NodeTable::new();
        for (id, name) in [
            (1, "part-0"),
            (2, "_SUCCESS"),
            (3, "part-0"),
            (4, "_SUCCESS"),
            (5, "x"),
        ] {
            nodes.insert(id, Node::new(id, name, NodeKind::File));
        }
        nodes.insert(6, Node::new(6, "part-0", NodeKind::File));

        let ranked = name_frequencies(&nodes);
        assert_eq!(
            ranked,
            vec![
                NameCount { name: "part-0".into(), count: 3 },
                NameCount { name: "_SUCCESS".into(), count: 2 },
                NameCount { name: "x".into(), count: 1 },
            ]
        );
    }

    #[test]
    fn test_child_counts() {
        let mut adjacency = AdjacencyTable::new();
        adjacency.insert(16385, vec![20, 21]);
        adjacency.insert(21, vec![22, 23, 24]);
        adjacency.insert(30, vec![31, 32]);

        let ranked = child_counts(&adjacency);
        assert_eq!(
            ranked,
            vec![
                ChildCount { parent: 21, children: 3 },
                ChildCount { parent: 30, children: 2 },
                ChildCount { parent: 16385, children: 2 },
            ]
        );
    }

    #[test]
    fn test_min_inode_id() {
        assert_eq!(min_inode_id(vec![16390, 16385, 16400]), Some(16385));
        assert_eq!(min_inode_id(Vec::new()), None);
    }
}
