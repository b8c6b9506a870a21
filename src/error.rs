//! Error and diagnostic types.
//!
//! [`Diagnostic`]s are non-fatal: they are collected while a document is
//! converted and returned alongside best-effort HTML. [`RegistryError`] is
//! only produced when the tag registry itself is misconfigured.

use thiserror::Error;

/// Non-fatal problem found while converting a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Diagnostic {
    /// The parent restricts its children and `child` is not among them.
    #[error("The tag \"{child}\" is not allowed as a child of the tag \"{parent}\".")]
    ChildNotAllowed {
        /// Enclosing tag name.
        parent: String,
        /// Offending child tag name.
        child: String,
    },
    /// The child restricts its parents and `parent` is not among them.
    #[error("The tag \"{parent}\" is not allowed as a parent of the tag \"{child}\".")]
    ParentNotAllowed {
        /// Offending parent tag name.
        parent: String,
        /// Child tag name.
        child: String,
    },
    /// Rendered output still contains raw brackets.
    #[error("Some tags appear to be misaligned.")]
    Misaligned,
}

impl Diagnostic {
    /// Create a child-not-allowed diagnostic.
    pub fn child_not_allowed(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::ChildNotAllowed {
            parent: parent.into(),
            child: child.into(),
        }
    }

    /// Create a parent-not-allowed diagnostic.
    pub fn parent_not_allowed(parent: impl Into<String>, child: impl Into<String>) -> Self {
        Self::ParentNotAllowed {
            parent: parent.into(),
            child: child.into(),
        }
    }
}

/// Errors raised when building or extending a tag registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// The name can never appear inside a bracket marker.
    #[error("invalid tag name {name:?}: {reason}")]
    InvalidName {
        /// Rejected name.
        name: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// A restriction list names a tag that is not registered.
    #[error("tag \"{tag}\" restricts its {relation} to unknown tag \"{unknown}\"")]
    UnknownRelation {
        /// Tag carrying the restriction.
        tag: String,
        /// `"children"` or `"parents"`.
        relation: &'static str,
        /// Name missing from the registry.
        unknown: String,
    },
}
