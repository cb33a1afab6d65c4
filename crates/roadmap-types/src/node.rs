//! Legacy flat node representation and its arena
//!
//! Provides [`NodeArena`] for id-based lookup over a flat node collection.
//! Parent/child structure is implicit in `parent_id` references; the arena
//! keeps an id index and an adjacency map so tree reconstruction is a map
//! lookup instead of a full scan per node.

use crate::chunk::Category;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Role of a node in the rendered mind-map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Root,
    Branch,
    SubBranch,
    Detail,
    Resource,
    Book,
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Root => "root",
            NodeKind::Branch => "branch",
            NodeKind::SubBranch => "sub_branch",
            NodeKind::Detail => "detail",
            NodeKind::Resource => "resource",
            NodeKind::Book => "book",
        }
    }
}

/// Classified external link attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkKind {
    Video,
    Github,
    Documentation,
    Book,
    Website,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkKind::Video => "video",
            LinkKind::Github => "github",
            LinkKind::Documentation => "documentation",
            LinkKind::Book => "book",
            LinkKind::Website => "website",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeLink {
    pub url: String,
    pub title: String,
    pub kind: LinkKind,
}

/// A parsed mind-map element with explicit parent linkage
///
/// Depth is fixed by role: 0 root, 1 branch, 2 sub-branch, 3 leaf. A
/// `parent_id` that resolves to no node in the same collection legally
/// denotes a root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadmapNode {
    pub id: String,
    pub title: String,
    pub content: String,
    pub depth: u8,
    pub parent_id: Option<String>,
    pub kind: NodeKind,
    pub category: Category,
    pub links: Vec<NodeLink>,
    /// Sibling sequence within the same depth
    pub order: u32,
    pub tags: Vec<String>,
}

impl RoadmapNode {
    /// Fresh node id; uniqueness within an arena is all that is required
    pub fn fresh_id() -> String {
        Uuid::new_v4().to_string()
    }
}

/// A node with its recursively resolved children, in `order` order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTree {
    pub node: RoadmapNode,
    pub children: Vec<NodeTree>,
}

impl NodeTree {
    /// Total number of nodes in this subtree
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(NodeTree::count).sum::<usize>()
    }
}

/// Contiguous node storage with id and adjacency indexes
#[derive(Debug, Clone, Default)]
pub struct NodeArena {
    nodes: Vec<RoadmapNode>,
    /// node id -> position in `nodes`
    index: HashMap<String, usize>,
    /// parent id -> child positions
    children: HashMap<String, Vec<usize>>,
}

impl NodeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RoadmapNode> {
        self.nodes.iter()
    }

    /// Append a node, indexing it by id and parent.
    ///
    /// A node whose id is already present replaces the indexed entry (last
    /// write wins), mirroring upsert semantics of the backing stores.
    pub fn push(&mut self, node: RoadmapNode) {
        let pos = self.nodes.len();
        if let Some(parent) = &node.parent_id {
            self.children.entry(parent.clone()).or_default().push(pos);
        }
        self.index.insert(node.id.clone(), pos);
        self.nodes.push(node);
    }

    pub fn get(&self, id: &str) -> Option<&RoadmapNode> {
        self.index.get(id).map(|&pos| &self.nodes[pos])
    }

    /// Nodes with no resolvable parent, in `order` order
    pub fn roots(&self) -> Vec<&RoadmapNode> {
        let mut roots: Vec<&RoadmapNode> = self
            .nodes
            .iter()
            .filter(|n| match &n.parent_id {
                None => true,
                Some(pid) => !self.index.contains_key(pid),
            })
            .collect();
        roots.sort_by_key(|n| n.order);
        roots
    }

    /// Direct children of `id`, in `order` order
    pub fn children_of(&self, id: &str) -> Vec<&RoadmapNode> {
        let mut out: Vec<&RoadmapNode> = self
            .children
            .get(id)
            .map(|positions| positions.iter().map(|&p| &self.nodes[p]).collect())
            .unwrap_or_default();
        out.sort_by_key(|n| n.order);
        out
    }

    /// Materialize the subtree rooted at `id`
    pub fn subtree(&self, id: &str) -> Option<NodeTree> {
        let node = self.get(id)?.clone();
        let children = self
            .children_of(id)
            .into_iter()
            .map(|child| self.subtree(&child.id))
            .collect::<Option<Vec<_>>>()?;
        Some(NodeTree { node, children })
    }

    /// Mutate a node in place, returning a snapshot of its previous state.
    ///
    /// The caller is responsible for emitting the matching change record.
    /// Nodes are never deleted within a parse run.
    pub fn update<F>(&mut self, id: &str, apply: F) -> Option<RoadmapNode>
    where
        F: FnOnce(&mut RoadmapNode),
    {
        let pos = *self.index.get(id)?;
        let old = self.nodes[pos].clone();
        apply(&mut self.nodes[pos]);

        // Updates must not re-identify the node
        self.nodes[pos].id = old.id.clone();

        if self.nodes[pos].parent_id != old.parent_id {
            if let Some(prev_parent) = &old.parent_id {
                if let Some(siblings) = self.children.get_mut(prev_parent) {
                    siblings.retain(|&p| p != pos);
                }
            }
            if let Some(new_parent) = self.nodes[pos].parent_id.clone() {
                self.children.entry(new_parent).or_default().push(pos);
            }
        }
        Some(old)
    }

    /// Node-kind histogram, keyed by wire name
    pub fn kind_distribution(&self) -> HashMap<String, usize> {
        let mut dist = HashMap::new();
        for node in &self.nodes {
            *dist.entry(node.kind.as_str().to_string()).or_insert(0) += 1;
        }
        dist
    }
}

impl FromIterator<RoadmapNode> for NodeArena {
    fn from_iter<I: IntoIterator<Item = RoadmapNode>>(iter: I) -> Self {
        let mut arena = NodeArena::new();
        for node in iter {
            arena.push(node);
        }
        arena
    }
}
