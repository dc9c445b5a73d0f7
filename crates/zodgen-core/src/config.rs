//! Generation configuration: filters, naming, and the cycle-breaking retry
//! bound.
//!
//! Everything that shapes a `generate` run is carried in this value; there is
//! no ambient/global configuration. Defaults match the documented behavior:
//! exported declarations only, every tag accepted, `<flatName>Schema` naming.

use crate::ir::JsDocTag;

/// Default number of ordering runs before remaining cycles are reported.
pub const DEFAULT_MAX_RUN: u32 = 10;

/// Predicate over a flattened declaration identifier.
pub type NameFilter = Box<dyn Fn(&str) -> bool>;
/// Predicate over a declaration's JSDoc tag list.
pub type TagFilter = Box<dyn Fn(&[JsDocTag]) -> bool>;
/// Maps a flattened declaration identifier to its generated schema identifier.
pub type SchemaNamer = Box<dyn Fn(&str) -> String>;

/// Options for one `generate` invocation.
pub struct GenerateConfig {
    /// Which declarations to emit, by flattened identifier.
    /// `None`: every exported declaration.
    pub name_filter: Option<NameFilter>,
    /// Additional tag-based selection. `None`: accept all. Declarations the
    /// selected set depends on are pulled in regardless of filters.
    pub jsdoc_tag_filter: Option<TagFilter>,
    /// Schema identifier derivation. `None`: [`default_schema_name`].
    pub schema_namer: Option<SchemaNamer>,
    /// Propagate JSDoc comments onto emitted expressions.
    pub keep_comments: bool,
    /// Retry bound for chained resolvable cycles.
    pub max_run: u32,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            name_filter: None,
            jsdoc_tag_filter: None,
            schema_namer: None,
            keep_comments: false,
            max_run: DEFAULT_MAX_RUN,
        }
    }
}

impl GenerateConfig {
    /// The generated schema identifier for a flattened declaration name.
    pub fn schema_name(&self, flat: &str) -> String {
        match &self.schema_namer {
            Some(namer) => namer(flat),
            None => default_schema_name(flat),
        }
    }

    /// Whether `tags` pass the tag filter.
    pub fn tags_accepted(&self, tags: &[JsDocTag]) -> bool {
        match &self.jsdoc_tag_filter {
            Some(filter) => filter(tags),
            None => true,
        }
    }

    /// Whether a declaration is requested by name. Falls back to export
    /// visibility when no name filter is configured.
    pub fn name_requested(&self, flat: &str, exported: bool) -> bool {
        match &self.name_filter {
            Some(filter) => filter(flat),
            None => exported,
        }
    }
}

/// Default naming: lower-camel the flattened identifier and suffix `Schema`
/// (`MetropolisSuperman` -> `metropolisSupermanSchema`).
pub fn default_schema_name(flat: &str) -> String {
    let mut chars = flat.chars();
    match chars.next() {
        Some(first) => format!("{}{}Schema", first.to_lowercase(), chars.as_str()),
        None => "Schema".to_string(),
    }
}
