//! Stemma - family-graph traversal and layout selection.
//!
//! The library turns a table of person rows into drawable family views:
//!
//! 1. [`store::PersonStore`] loads and indexes the rows, reporting data
//!    problems as [`store::LoadWarning`]s.
//! 2. [`resolve::RelationshipResolver`] selects the people around a root
//!    person, or the complete tree.
//! 3. [`generation::GenerationAssigner`] numbers the selected people by
//!    generation.
//! 4. [`graph::UnionBuilder`] folds couples into union nodes and wires
//!    children to them.
//!
//! [`view::FamilyView::build`] runs all four steps. The `stemma` binary
//! wraps the pipeline in a CLI.
//!
//! ```
//! use stemma::domain::PersonRow;
//! use stemma::generation::GenerationOptions;
//! use stemma::resolve::RootQuery;
//! use stemma::store::PersonStore;
//! use stemma::view::{FamilyView, ViewRequest};
//!
//! let rows = vec![
//!     PersonRow { spouse_id: Some("2".into()), ..PersonRow::with_id("1") },
//!     PersonRow { spouse_id: Some("1".into()), ..PersonRow::with_id("2") },
//!     PersonRow {
//!         father_id: Some("1".into()),
//!         mother_id: Some("2".into()),
//!         ..PersonRow::with_id("3")
//!     },
//! ];
//! let (store, warnings) = PersonStore::load(rows);
//! assert!(warnings.is_empty());
//!
//! let request = ViewRequest::around(RootQuery::Id("3".into()), 1, 0);
//! let view = FamilyView::build(&store, &request, &GenerationOptions::default());
//! assert_eq!(view.graph.unions().count(), 1);
//! ```

#![forbid(unsafe_code)]

pub mod domain;
pub mod error;
pub mod generation;
pub mod graph;
pub mod resolve;
pub mod store;
pub mod view;

pub mod app;
pub mod cli;
pub mod commands;
pub mod config;
pub mod output;

pub use error::{Error, Result};
