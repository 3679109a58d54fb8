//! Expansion engine: guards, fallback table, the expander, and output
//! normalization
//!
//! The passes run in a fixed order (direct substitution, named-region
//! inclusion, inline branch evaluation, default resolution, blank-line
//! collapse), realized as a single walk over the scanned node tree.

mod defaults;
mod engine;
mod guards;
mod normalize;

pub use defaults::{DefaultTable, DefaultTableError, DefaultValue};
pub use engine::{Engine, RegionRule, Rendered};
pub use guards::{
    is_region_included, is_set, match_branch_literal, transport_code, TRANSPORT_ALTERNATIVES,
};
pub use normalize::collapse_blank_lines;
