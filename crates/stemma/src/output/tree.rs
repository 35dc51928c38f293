//! Text rendering of a family view, one block per generation.
//!
//! ```text
//! Generation 0
//! └── ○ Ada [1] ⚭ ○ Bo [2]
//!     ├── Cy [3]
//!     └── Di [4]
//! Generation 1
//! ├── ○ Cy [3] (b. 1930)
//! └── ○ Di [4]
//! ```

use std::collections::HashMap;
use std::io::{self, Write};

use super::OutputConfig;
use super::color::{bold, colorize_id, dimmed, living_marker, union_marker};
use super::print_conditions;
use crate::domain::PersonId;
use crate::graph::{Node, PersonNode};
use crate::view::FamilyView;

struct Connectors {
    branch: &'static str,
    corner: &'static str,
    pipe: &'static str,
    space: &'static str,
}

impl Connectors {
    fn for_config(config: &OutputConfig) -> Self {
        if config.use_ascii {
            Self {
                branch: "|-- ",
                corner: "`-- ",
                pipe: "|   ",
                space: "    ",
            }
        } else {
            Self {
                branch: "├── ",
                corner: "└── ",
                pipe: "│   ",
                space: "    ",
            }
        }
    }
}

/// Render conditions, then every node grouped by generation with its
/// children hanging below it.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn print_view_text<W: Write>(
    w: &mut W,
    view: &FamilyView,
    config: &OutputConfig,
) -> io::Result<()> {
    print_conditions(w, &view.resolution.conditions, config)?;

    let graph = &view.graph;
    if graph.nodes().is_empty() {
        writeln!(w, "No people selected.")?;
        return Ok(());
    }

    let people = person_index(graph.nodes());
    let lines = Connectors::for_config(config);
    let connector = |text: &str| dimmed(text, config);

    for (rank, refs) in graph.ranks() {
        writeln!(w, "{}", bold(&format!("Generation {rank}"), config))?;
        for (i, node_ref) in refs.iter().enumerate() {
            let is_last = i + 1 == refs.len();
            let Some(node) = graph.node(node_ref) else {
                continue;
            };
            let head = if is_last { lines.corner } else { lines.branch };
            writeln!(w, "{}{}", connector(head), node_text(node, config))?;

            let children = graph.children_of(node_ref);
            let indent = if is_last { lines.space } else { lines.pipe };
            for (j, child) in children.iter().enumerate() {
                let child_head = if j + 1 == children.len() {
                    lines.corner
                } else {
                    lines.branch
                };
                writeln!(
                    w,
                    "{}{}{}",
                    connector(indent),
                    connector(child_head),
                    child_text(child, &people, config)
                )?;
            }
        }
    }

    let unconnected = &view.resolution.unconnected;
    if !unconnected.is_empty() {
        let ids: Vec<&str> = unconnected.iter().map(PersonId::as_str).collect();
        writeln!(
            w,
            "{} {}",
            dimmed("Not reached from any root ancestor:", config),
            ids.join(", ")
        )?;
    }
    Ok(())
}

fn person_index(nodes: &[Node]) -> HashMap<&PersonId, &PersonNode> {
    let mut index = HashMap::new();
    for node in nodes {
        match node {
            Node::Person(person) => {
                index.insert(&person.id, person);
            }
            Node::Union(union) => {
                index.insert(&union.primary.id, &union.primary);
                index.insert(&union.merged.id, &union.merged);
            }
        }
    }
    index
}

fn node_text(node: &Node, config: &OutputConfig) -> String {
    match node {
        Node::Person(person) => person_text(person, config),
        Node::Union(union) => format!(
            "{} {} {}",
            person_text(&union.primary, config),
            union_marker(config),
            person_text(&union.merged, config)
        ),
    }
}

fn person_text(person: &PersonNode, config: &OutputConfig) -> String {
    let name = person.label.first().map_or("", String::as_str);
    let mut text = format!(
        "{} {} [{}]",
        living_marker(person.living, config),
        name,
        colorize_id(person.id.as_str(), config)
    );
    if person.label.len() > 1 {
        let details = person.label[1..].join(", ");
        text.push(' ');
        text.push_str(&dimmed(&format!("({details})"), config));
    }
    text
}

fn child_text(
    child: &PersonId,
    people: &HashMap<&PersonId, &PersonNode>,
    config: &OutputConfig,
) -> String {
    let name = people
        .get(child)
        .and_then(|person| person.label.first())
        .map_or("", String::as_str);
    format!("{name} [{}]", colorize_id(child.as_str(), config))
}
