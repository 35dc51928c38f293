//! The resolve → assign → build pipeline for one request.

use crate::generation::{GenerationAssigner, GenerationMap, GenerationOptions};
use crate::graph::{FamilyGraph, UnionBuilder};
use crate::resolve::{RelationshipResolver, Resolution, RootQuery};
use crate::store::PersonStore;
use serde::Serialize;
use tracing::debug;

/// What to show.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRequest {
    /// Root person; `None` with zero limits means the complete tree
    pub root: Option<RootQuery>,
    /// Ancestor levels above the root
    pub generations_back: u32,
    /// Descendant levels below the root
    pub generations_forward: u32,
}

impl ViewRequest {
    /// The complete tree.
    #[must_use]
    pub fn complete() -> Self {
        Self::default()
    }

    /// A bounded view around `root`.
    #[must_use]
    pub fn around(root: RootQuery, generations_back: u32, generations_forward: u32) -> Self {
        Self {
            root: Some(root),
            generations_back,
            generations_forward,
        }
    }
}

/// A fully resolved view, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FamilyView {
    /// Who is included and why
    pub resolution: Resolution,
    /// Generation per included person
    pub generations: GenerationMap,
    /// Renderable nodes and edges
    pub graph: FamilyGraph,
}

impl FamilyView {
    /// Runs the whole pipeline against `store`.
    #[must_use]
    pub fn build(store: &PersonStore, request: &ViewRequest, options: &GenerationOptions) -> Self {
        let resolution = RelationshipResolver::new(store).resolve(
            request.root.as_ref(),
            request.generations_back,
            request.generations_forward,
        );
        let generations = GenerationAssigner::new(store, *options).assign(&resolution.selection);
        let graph = UnionBuilder::new(store).build(&resolution.selection, &generations);

        debug!(
            people = resolution.selection.len(),
            nodes = graph.nodes().len(),
            conditions = resolution.conditions.len(),
            "Built family view"
        );
        Self {
            resolution,
            generations,
            graph,
        }
    }
}
