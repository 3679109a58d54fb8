//! Error types for template scanning

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Malformed template at {span:?}: {message}")]
    Malformed {
        span: Span,
        message: String,
        expected: Vec<String>,
    },
}

impl TemplateError {
    /// Format the error with source context using ariadne
    pub fn format(&self, source: &str, filename: &str) -> String {
        let mut buf = Vec::new();
        match self {
            TemplateError::Malformed {
                span,
                message,
                expected,
            } => {
                let expected_str = if expected.is_empty() {
                    String::new()
                } else {
                    format!("\nExpected: {}", expected.join(", "))
                };

                Report::build(ReportKind::Error, filename, span.start)
                    .with_message(message)
                    .with_label(
                        Label::new((filename, span.clone()))
                            .with_message(format!("{}{}", message, expected_str))
                            .with_color(Color::Red),
                    )
                    .finish()
                    .write((filename, Source::from(source)), &mut buf)
                    .unwrap();
            }
        }
        String::from_utf8(buf).unwrap()
    }
}

impl<'a> From<chumsky::error::Rich<'a, crate::template::lexer::Token>> for TemplateError {
    fn from(err: chumsky::error::Rich<'a, crate::template::lexer::Token>) -> Self {
        use chumsky::error::RichReason;

        // Format the message based on the reason
        let message = match err.reason() {
            RichReason::ExpectedFound { found, .. } => match found {
                Some(tok) => format!("Unexpected {}", format_token(tok)),
                None => "Unexpected end of template".to_string(),
            },
            RichReason::Custom(msg) => msg.to_string(),
        };

        // Format expected tokens nicely
        let expected: Vec<String> = err
            .expected()
            .filter_map(|e| {
                match e {
                    chumsky::error::RichPattern::Token(tok) => Some(format_token(tok)),
                    chumsky::error::RichPattern::Label(label) => Some(label.to_string()),
                    chumsky::error::RichPattern::EndOfInput => Some("end of template".to_string()),
                    chumsky::error::RichPattern::Identifier(s) => Some(format!("identifier '{}'", s)),
                    chumsky::error::RichPattern::Any => Some("any token".to_string()),
                    chumsky::error::RichPattern::SomethingElse => None, // Skip "something else"
                }
            })
            .collect();

        TemplateError::Malformed {
            span: err.span().into_range(),
            message,
            expected,
        }
    }
}

/// Format a token for human-readable error messages
fn format_token(tok: &crate::template::lexer::Token) -> String {
    use crate::template::lexer::Token;
    match tok {
        Token::Placeholder(key) => format!("placeholder '{{${}}}'", key),
        Token::IfSet(key) => format!("conditional '{{if isset(${})}}'", key),
        Token::IfEquals(cmp) => format!("conditional '{{if ${} == '{}'}}'", cmp.key, cmp.literal),
        Token::Else => "'{else}'".to_string(),
        Token::EndIf => "'{/if}'".to_string(),
        Token::RegionStart(name) => format!("region marker '<!-- {} starts here -->'", name),
        Token::RegionEnd(name) => format!("region marker '<!-- End of {} -->'", name),
        Token::Text => "text".to_string(),
    }
}
