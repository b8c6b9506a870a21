//! Tag registry.
//!
//! Holds the tag definitions known to a [`Converter`](crate::Converter)
//! together with the lookups derived from them. Derived data is rebuilt in
//! full whenever the registry is extended, so lookups during conversion
//! never observe a half-updated registry.

use rustc_hash::FxHashMap;

use crate::error::RegistryError;
use crate::limits;
use crate::tag::TagDefinition;

/// Name of the shorthand list-item marker `[*]`.
pub const STAR_TAG: &str = "*";

/// Name of the virtual tag enclosing the whole document.
pub const ROOT_TAG: &str = "bbcode";

/// Mapping from canonical tag name to definition.
#[derive(Clone, Debug, Default)]
pub struct TagRegistry {
    tags: FxHashMap<String, TagDefinition>,
    /// Registration order.
    order: Vec<String>,
    no_parse: Vec<String>,
    /// Tags whose children may be `*`, i.e. where `[*]` is expanded.
    list_tags: Vec<String>,
}

impl TagRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in tag catalog.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        // Built-in names are static and valid.
        for def in crate::builtin::definitions() {
            registry.insert_unchecked(def);
        }
        registry.rebuild();
        registry
    }

    /// Add or override tags, then rebuild derived lookups.
    ///
    /// Names are validated up front; on error the registry is unchanged.
    pub fn extend<I>(&mut self, defs: I) -> Result<(), RegistryError>
    where
        I: IntoIterator<Item = TagDefinition>,
    {
        let defs: Vec<TagDefinition> = defs.into_iter().collect();
        for def in &defs {
            validate_name(def.name())?;
        }
        for def in defs {
            self.insert_unchecked(def);
        }
        self.rebuild();
        Ok(())
    }

    /// Add or override a single tag.
    pub fn insert(&mut self, def: TagDefinition) -> Result<(), RegistryError> {
        self.extend(std::iter::once(def))
    }

    fn insert_unchecked(&mut self, mut def: TagDefinition) {
        def.rebuild_lookups();
        let name = def.name().to_owned();
        if self.tags.insert(name.clone(), def).is_none() {
            self.order.push(name);
        }
    }

    fn rebuild(&mut self) {
        self.no_parse.clear();
        self.list_tags.clear();
        for name in &self.order {
            let Some(def) = self.tags.get(name) else {
                continue;
            };
            if def.is_no_parse() {
                self.no_parse.push(name.clone());
            }
            if name != STAR_TAG && def.restricted_children().iter().any(|c| c == STAR_TAG) {
                self.list_tags.push(name.clone());
            }
        }
        log::debug!(
            "tag registry rebuilt: {} tags, {} no-parse, {} list",
            self.order.len(),
            self.no_parse.len(),
            self.list_tags.len()
        );
    }

    /// Look up a tag by canonical (lowercase) name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&TagDefinition> {
        self.tags.get(name)
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.tags.contains_key(name)
    }

    /// Tag names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Definitions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &TagDefinition> {
        self.order.iter().filter_map(|name| self.tags.get(name))
    }

    /// Names of tags whose content is not parsed.
    pub fn no_parse_tags(&self) -> &[String] {
        &self.no_parse
    }

    /// Names of tags inside which `[*]` is expanded.
    pub fn list_tags(&self) -> &[String] {
        &self.list_tags
    }

    #[inline]
    pub fn is_list_tag(&self, name: &str) -> bool {
        self.list_tags.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Check that every restriction names a registered tag.
    ///
    /// Conversion tolerates unknown names (the relation simply never
    /// matches); call this at start-up to turn them into hard errors.
    pub fn validate(&self) -> Result<(), RegistryError> {
        for def in self.iter() {
            let relations = [
                ("children", def.restricted_children()),
                ("parents", def.restricted_parents()),
            ];
            for (relation, names) in relations {
                if let Some(unknown) = names
                    .iter()
                    .find(|n| !self.contains(n) && n.as_str() != ROOT_TAG)
                {
                    return Err(RegistryError::UnknownRelation {
                        tag: def.name().to_owned(),
                        relation,
                        unknown: unknown.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// Check that a name can appear inside a bracket marker.
pub fn validate_name(name: &str) -> Result<(), RegistryError> {
    let reason = if name.is_empty() {
        Some("name is empty")
    } else if name.len() > limits::MAX_TAG_NAME_LEN {
        Some("name is too long")
    } else if name
        .bytes()
        .any(|b| matches!(b, b'[' | b']' | b'/' | b'=' | b'<' | b'>') || b.is_ascii_whitespace())
    {
        Some("name contains a reserved character")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(RegistryError::InvalidName {
            name: name.to_owned(),
            reason,
        }),
        None => Ok(()),
    }
}
