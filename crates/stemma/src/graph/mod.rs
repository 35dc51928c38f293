//! Renderable node/edge model of a resolved family view.
//!
//! Married couples collapse into one [`Union`] node; everyone else is a
//! standalone [`PersonNode`]. Edges always name people at their person end,
//! so a child edge points at the child even when the child is drawn inside
//! their own union. Use [`FamilyGraph::node_for`] to find the node a person
//! is drawn in.

mod builder;

pub use builder::UnionBuilder;

use crate::domain::PersonId;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Identifier of a union, derived from the sorted member IDs.
///
/// Rendered as `union_<first>_<second>`. Inside each member ID, `%` and `_`
/// are percent-encoded, so the single unescaped `_` between the members
/// keeps distinct pairs apart: `(a, b_c)` is `union_a_b%5Fc` while
/// `(a_b, c)` is `union_a%5Fb_c`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct UnionId(String);

impl UnionId {
    /// The union ID for a pair, independent of argument order.
    #[must_use]
    pub fn for_pair(a: &PersonId, b: &PersonId) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self(format!(
            "union_{}_{}",
            escape_member(first.as_str()),
            escape_member(second.as_str())
        ))
    }

    /// The raw identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn escape_member(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for c in id.chars() {
        match c {
            '%' => escaped.push_str("%25"),
            '_' => escaped.push_str("%5F"),
            c => escaped.push(c),
        }
    }
    escaped
}

impl fmt::Display for UnionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reference to either a person or a union.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRef {
    /// A person, standalone or inside a union.
    Person(PersonId),
    /// A union node.
    Union(UnionId),
}

impl fmt::Display for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Person(id) => id.fmt(f),
            Self::Union(id) => id.fmt(f),
        }
    }
}

/// Everything a renderer needs to draw one person box.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonNode {
    /// Person ID
    pub id: PersonId,
    /// Box text, first line is the name
    pub label: Vec<String>,
    /// Living flag when known
    pub living: Option<bool>,
    /// Normalized generation
    pub generation: u32,
}

/// A married couple drawn as one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Union {
    /// Stable identifier
    pub id: UnionId,
    /// Lexicographically first member
    pub primary: PersonNode,
    /// The other member; never drawn standalone
    pub merged: PersonNode,
    /// Selected children of both members, in ID order
    pub children: Vec<PersonId>,
    /// Rank: the higher of the members' generations
    pub generation: u32,
}

impl Union {
    /// Both member IDs, primary first.
    #[must_use]
    pub fn members(&self) -> [&PersonId; 2] {
        [&self.primary.id, &self.merged.id]
    }
}

/// A graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Node {
    /// A person not absorbed into a union
    Person(PersonNode),
    /// A couple
    Union(Union),
}

impl Node {
    /// This node's reference.
    #[must_use]
    pub fn id(&self) -> NodeRef {
        match self {
            Self::Person(person) => NodeRef::Person(person.id.clone()),
            Self::Union(union) => NodeRef::Union(union.id.clone()),
        }
    }

    /// Layout rank.
    #[must_use]
    pub fn generation(&self) -> u32 {
        match self {
            Self::Person(person) => person.generation,
            Self::Union(union) => union.generation,
        }
    }
}

/// Edge kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    /// From a union (or one of two unmarried parents) to a child
    ParentChild,
    /// From a union to one of its members
    Spouse,
    /// From the only selected parent to a child
    SingleParent,
}

/// A directed edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Edge {
    /// Source
    pub from: NodeRef,
    /// Target
    pub to: NodeRef,
    /// Relationship
    pub kind: EdgeKind,
}

/// Nodes and edges for one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FamilyGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    #[serde(skip)]
    placement: HashMap<PersonId, NodeRef>,
    #[serde(skip)]
    index: HashMap<NodeRef, usize>,
    #[serde(skip)]
    children: HashMap<NodeRef, Vec<PersonId>>,
}

impl FamilyGraph {
    /// Assembles a graph and its lookup tables.
    ///
    /// `placement` must map every person drawn in `nodes` to their node.
    fn new(nodes: Vec<Node>, edges: Vec<Edge>, placement: HashMap<PersonId, NodeRef>) -> Self {
        let index = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id(), i))
            .collect();

        // Parent edges grouped by the node that owns them
        let mut children: HashMap<NodeRef, Vec<PersonId>> = HashMap::new();
        for edge in &edges {
            if edge.kind == EdgeKind::Spouse {
                continue;
            }
            let owner = match &edge.from {
                NodeRef::Person(person) => placement.get(person),
                union @ NodeRef::Union(_) => Some(union),
            };
            if let Some(owner) = owner
                && let NodeRef::Person(child) = &edge.to
            {
                let list = children.entry(owner.clone()).or_default();
                if !list.contains(child) {
                    list.push(child.clone());
                }
            }
        }

        Self {
            nodes,
            edges,
            placement,
            index,
            children,
        }
    }

    /// All nodes: persons and unions in member ID order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// All edges.
    #[must_use]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Looks up a node.
    #[must_use]
    pub fn node(&self, id: &NodeRef) -> Option<&Node> {
        self.index.get(id).and_then(|&i| self.nodes.get(i))
    }

    /// Unions only.
    pub fn unions(&self) -> impl Iterator<Item = &Union> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Union(union) => Some(union),
            Node::Person(_) => None,
        })
    }

    /// The node a person is drawn in: their own, or their union.
    #[must_use]
    pub fn node_for(&self, person: &PersonId) -> Option<&NodeRef> {
        self.placement.get(person)
    }

    /// Node references grouped by rank, oldest first, in node order.
    #[must_use]
    pub fn ranks(&self) -> BTreeMap<u32, Vec<NodeRef>> {
        let mut ranks: BTreeMap<u32, Vec<NodeRef>> = BTreeMap::new();
        for node in &self.nodes {
            ranks.entry(node.generation()).or_default().push(node.id());
        }
        ranks
    }

    /// Children hanging off a node: targets of its parent edges, including
    /// single-parent edges from a union's members. Each child once, in edge
    /// order.
    #[must_use]
    pub fn children_of(&self, node: &NodeRef) -> Vec<&PersonId> {
        self.children
            .get(node)
            .map(|children| children.iter().collect())
            .unwrap_or_default()
    }
}
