//! provgen - Provisioning config generation for Fanvil IP phones
//!
//! This library turns a configuration template (placeholders, conditional
//! blocks, optional marker-bounded regions) and one device's flat key-value
//! record into a fully resolved config document.
//!
//! # Example
//!
//! ```rust
//! use provgen::{render, DataRecord};
//!
//! let record = DataRecord::from_pairs([("account.1.user_id", "100")]);
//! let text = render("<User>{$account.1.user_id}</User>", &record).unwrap();
//! assert_eq!(text, "<User>100</User>");
//! ```

pub mod error;
pub mod expand;
pub mod record;
pub mod template;

pub use error::TemplateError;
pub use expand::{
    collapse_blank_lines, transport_code, DefaultTable, Engine, RegionRule, Rendered,
    TRANSPORT_ALTERNATIVES,
};
pub use record::{DataRecord, RecordError};
pub use template::{parse, Document};

use thiserror::Error;

/// Errors that can occur during rendering
#[derive(Debug, Error)]
pub enum RenderError {
    /// The template's markers are unbalanced or unterminated
    #[error("malformed template: {}", format_template_errors(.0))]
    Malformed(Vec<TemplateError>),

    /// Strict mode only: required record fields are unset
    #[error("missing required record fields: {}", .keys.join(", "))]
    MissingRequired { keys: Vec<String> },
}

impl From<Vec<TemplateError>> for RenderError {
    fn from(errors: Vec<TemplateError>) -> Self {
        RenderError::Malformed(errors)
    }
}

fn format_template_errors(errors: &[TemplateError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Render a template against one device record with the default engine
///
/// This is the main entry point for the library. Missing record fields fall
/// back to the built-in default table or stay as literal placeholders; use
/// [`Engine::render`] to inspect the unresolved keys or to customize the
/// engine.
///
/// # Example
///
/// ```rust
/// use provgen::{render, DataRecord};
///
/// let record = DataRecord::from_pairs([("account.1.sip_transport", "TLS")]);
/// let text = render(
///     "{if $account.1.sip_transport == 'tls'}<Transport>2</Transport>{/if}",
///     &record,
/// )
/// .unwrap();
/// assert_eq!(text, "<Transport>2</Transport>");
/// ```
pub fn render(template: &str, record: &DataRecord) -> Result<String, RenderError> {
    Engine::default()
        .render(template, record)
        .map(|rendered| rendered.text)
}
