//! Parent/child restriction checks.

use crate::error::Diagnostic;
use crate::registry::{ROOT_TAG, TagRegistry};
use crate::tag::TagDefinition;
use crate::tree::{Node, tags};

/// Check every occurrence against its parent's and its own restrictions.
///
/// The document itself acts as a parent named [`ROOT_TAG`], taking the
/// restrictions of a registered tag of that name if there is one. Each
/// level is checked in full before descending into its children.
pub fn validate(nodes: &[Node], registry: &TagRegistry, diagnostics: &mut Vec<Diagnostic>) {
    check_level(ROOT_TAG, registry.get(ROOT_TAG), nodes, registry, diagnostics);
}

fn check_level(
    parent: &str,
    parent_def: Option<&TagDefinition>,
    children: &[Node],
    registry: &TagRegistry,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for child in tags(children) {
        if parent_def.is_some_and(|def| !def.allows_child(&child.name)) {
            diagnostics.push(Diagnostic::child_not_allowed(parent, &child.name));
        }
        if registry
            .get(&child.name)
            .is_some_and(|def| !def.allows_parent(parent))
        {
            diagnostics.push(Diagnostic::parent_not_allowed(parent, &child.name));
        }
    }

    for child in tags(children) {
        check_level(
            &child.name,
            registry.get(&child.name),
            &child.children,
            registry,
            diagnostics,
        );
    }
}
