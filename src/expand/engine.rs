//! The expansion engine
//!
//! `Engine::render` turns a template and one device record into a resolved
//! configuration document. The template is scanned once into a node tree;
//! a single walk then applies, per node, the fixed pass order: direct
//! substitution, region inclusion, inline branch evaluation, default
//! resolution, and a final blank-line collapse over the assembled text.
//!
//! The engine is stateless and pure: no I/O, no shared mutable state, the
//! same inputs always produce the same output. Batch callers may render
//! records concurrently without coordination.

use crate::expand::defaults::DefaultTable;
use crate::expand::guards;
use crate::expand::normalize::collapse_blank_lines;
use crate::record::DataRecord;
use crate::template::ast::{GuardTest, Node};
use crate::template::parse;
use crate::RenderError;

/// Declares a marker-bounded optional region and the record key gating it
#[derive(Debug, Clone)]
pub struct RegionRule {
    /// Marker name, matched case-insensitively
    pub marker: String,
    /// Record key whose is-set truthiness decides inclusion
    pub guard: String,
}

impl RegionRule {
    pub fn new(marker: impl Into<String>, guard: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
            guard: guard.into(),
        }
    }
}

/// A fully rendered configuration document
#[derive(Debug, Clone)]
pub struct Rendered {
    /// The resolved text
    pub text: String,
    /// Keys of placeholders left as literal `{$key}` text, deduplicated, in
    /// order of first appearance; callers decide whether this is fatal
    pub unresolved: Vec<String>,
}

/// The expansion engine
///
/// # Example
///
/// ```rust
/// use provgen::{DataRecord, Engine};
///
/// let engine = Engine::new();
/// let record = DataRecord::from_pairs([("p", "1")]);
/// let rendered = engine
///     .render("{if isset($p)}YES{else}NO{/if}", &record)
///     .unwrap();
/// assert_eq!(rendered.text, "YES");
/// ```
#[derive(Debug, Clone)]
pub struct Engine {
    defaults: DefaultTable,
    regions: Vec<RegionRule>,
    required: Vec<String>,
}

impl Default for Engine {
    fn default() -> Self {
        Self {
            defaults: DefaultTable::default(),
            regions: vec![RegionRule::new("Second account", "account.2.user_id")],
            required: Vec::new(),
        }
    }
}

impl Engine {
    /// Create an engine with the built-in default table and region rules
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the fallback table
    pub fn with_defaults(mut self, defaults: DefaultTable) -> Self {
        self.defaults = defaults;
        self
    }

    /// Replace the declared optional regions
    pub fn with_regions(mut self, regions: Vec<RegionRule>) -> Self {
        self.regions = regions;
        self
    }

    /// Enable strict mode: rendering fails unless these record keys are set
    pub fn with_required(mut self, keys: Vec<String>) -> Self {
        self.required = keys;
        self
    }

    /// Render a template against one device record
    ///
    /// All-or-nothing: either the complete resolved text or an error.
    /// Missing or empty record fields are never errors; only malformed
    /// markers (and, in strict mode, unset required fields) fail.
    pub fn render(&self, template: &str, record: &DataRecord) -> Result<Rendered, RenderError> {
        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|key| !guards::is_set(key, record))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return Err(RenderError::MissingRequired { keys: missing });
        }

        let doc = parse(template)?;

        let mut out = String::with_capacity(template.len());
        let mut unresolved = Vec::new();
        self.emit_nodes(&doc.nodes, template, record, &mut out, &mut unresolved);

        Ok(Rendered {
            text: collapse_blank_lines(&out),
            unresolved,
        })
    }

    fn emit_nodes(
        &self,
        nodes: &[Node],
        source: &str,
        record: &DataRecord,
        out: &mut String,
        unresolved: &mut Vec<String>,
    ) {
        for node in nodes {
            self.emit_node(node, source, record, out, unresolved);
        }
    }

    fn emit_node(
        &self,
        node: &Node,
        source: &str,
        record: &DataRecord,
        out: &mut String,
        unresolved: &mut Vec<String>,
    ) {
        match node {
            Node::Text(span) => out.push_str(&source[span.clone()]),

            Node::Placeholder { key, span } => match record.get(key) {
                // A present key substitutes its value, empty included; an
                // empty value never falls through to the default table
                Some(value) => out.push_str(value),
                None if self.defaults.is_scanned(key) => {
                    let value = self.defaults.lookup(key, record).unwrap_or_default();
                    out.push_str(&value);
                }
                // Outside the scan list the placeholder stays literal;
                // callers see the key in `Rendered::unresolved` and apply
                // their own policy
                None => {
                    out.push_str(&source[span.clone()]);
                    if !unresolved.iter().any(|k| k == key) {
                        unresolved.push(key.clone());
                    }
                }
            },

            Node::Branch {
                test,
                then_body,
                else_body,
                ..
            } => {
                let taken = match test {
                    GuardTest::IsSet { key } => guards::is_set(key, record),
                    GuardTest::Equals { key, literal } => {
                        guards::match_branch_literal(key, record, &[literal.as_str()]).is_some()
                    }
                };
                if taken {
                    self.emit_nodes(then_body, source, record, out, unresolved);
                } else if let Some(else_body) = else_body {
                    self.emit_nodes(else_body, source, record, out, unresolved);
                }
            }

            Node::Region {
                name,
                start_span,
                end_span,
                body,
            } => {
                // An excluded region drops markers and body wholesale; a
                // kept region reproduces its markers byte-for-byte. Regions
                // with no declared rule are always kept.
                let excluded = self
                    .regions
                    .iter()
                    .find(|rule| rule.marker.eq_ignore_ascii_case(name))
                    .map(|rule| !guards::is_region_included(&rule.guard, record))
                    .unwrap_or(false);
                if excluded {
                    return;
                }
                out.push_str(&source[start_span.clone()]);
                self.emit_nodes(body, source, record, out, unresolved);
                out.push_str(&source[end_span.clone()]);
            }
        }
    }
}
