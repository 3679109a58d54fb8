//! Lexer for provisioning templates using logos
//!
//! The lexer is total: any input lexes. Constructs that almost look like a
//! marker (`{if` with no closing brace, a plain HTML comment) degrade to
//! [`Token::Text`] instead of failing, so structural errors are only raised
//! for genuinely unbalanced blocks at parse time.

use logos::{Lexer, Logos};

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Guard key and literal of an equality conditional
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub key: String,
    pub literal: String,
}

/// Extract `key` from `{$key}`
fn placeholder_key(lex: &mut Lexer<Token>) -> Option<String> {
    let s = lex.slice();
    Some(s.strip_prefix("{$")?.strip_suffix('}')?.to_string())
}

/// Extract `key` from `{if isset($key)}`
fn isset_key(lex: &mut Lexer<Token>) -> Option<String> {
    let s = lex.slice();
    let start = s.find("($")? + 2;
    let end = s[start..].find(')')? + start;
    Some(s[start..end].to_string())
}

/// Extract key and literal from `{if $key == 'literal'}`
fn comparison(lex: &mut Lexer<Token>) -> Option<Comparison> {
    let s = lex.slice();
    let key_start = s.find('$')? + 1;
    let key_end = s[key_start..].find([' ', '='])? + key_start;
    let lit_start = s.find('\'')? + 1;
    let lit_end = s.rfind('\'')?;
    Some(Comparison {
        key: s[key_start..key_end].to_string(),
        literal: s[lit_start..lit_end].to_string(),
    })
}

/// Extract `Name` from `<!-- Name starts here -->`
fn region_start_name(lex: &mut Lexer<Token>) -> Option<String> {
    let s = lex.slice();
    Some(s.strip_prefix("<!-- ")?.strip_suffix(" starts here -->")?.to_string())
}

/// Extract `Name` from `<!-- End of Name -->`
fn region_end_name(lex: &mut Lexer<Token>) -> Option<String> {
    let s = lex.slice();
    Some(s.strip_prefix("<!-- End of ")?.strip_suffix(" -->")?.to_string())
}

#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    /// `{$dotted.key}`
    #[regex(r"\{\$[A-Za-z0-9_.]+\}", placeholder_key)]
    Placeholder(String),

    /// `{if isset($key)}`
    #[regex(r"\{if +isset\(\$[A-Za-z0-9_.]+\)\}", isset_key)]
    IfSet(String),

    /// `{if $key == 'literal'}`
    #[regex(r"\{if +\$[A-Za-z0-9_.]+ *== *'[^'\n]*'\}", comparison)]
    IfEquals(Comparison),

    #[token("{else}")]
    Else,

    #[token("{/if}")]
    EndIf,

    /// `<!-- Name starts here -->`
    #[regex(r"<!-- [A-Za-z0-9_. -]+ starts here -->", region_start_name, priority = 4)]
    RegionStart(String),

    /// `<!-- End of Name -->` (higher priority: an `End of` comment is never a
    /// region start, even when its name happens to contain `starts here`)
    #[regex(r"<!-- End of [A-Za-z0-9_. -]+ -->", region_end_name, priority = 5)]
    RegionEnd(String),

    /// Anything else; lone `{` and `<` fall through here
    #[regex(r"[^{<]+")]
    #[regex(r"[{<]")]
    Text,
}

/// Lex template text into tokens with spans
pub fn lex(input: &str) -> impl Iterator<Item = (Token, Span)> + '_ {
    Token::lexer(input)
        .spanned()
        .filter_map(|(tok, span)| tok.ok().map(|t| (t, span)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        lex(input).map(|(t, _)| t).collect()
    }

    #[test]
    fn test_placeholder() {
        assert_eq!(
            tokens("{$account.1.user_id}"),
            vec![Token::Placeholder("account.1.user_id".to_string())]
        );
    }

    #[test]
    fn test_placeholder_between_text() {
        assert_eq!(
            tokens("<User>{$account.1.user_id}</User>"),
            vec![
                Token::Text,
                Token::Text,
                Token::Placeholder("account.1.user_id".to_string()),
                Token::Text,
                Token::Text,
            ]
        );
    }

    #[test]
    fn test_isset_conditional() {
        assert_eq!(
            tokens("{if isset($account.1.password)}1{else}0{/if}"),
            vec![
                Token::IfSet("account.1.password".to_string()),
                Token::Text,
                Token::Else,
                Token::Text,
                Token::EndIf,
            ]
        );
    }

    #[test]
    fn test_equality_conditional() {
        assert_eq!(
            tokens("{if $account.1.sip_transport == 'dns srv'}x{/if}"),
            vec![
                Token::IfEquals(Comparison {
                    key: "account.1.sip_transport".to_string(),
                    literal: "dns srv".to_string(),
                }),
                Token::Text,
                Token::EndIf,
            ]
        );
    }

    #[test]
    fn test_empty_literal() {
        assert_eq!(
            tokens("{if $k == ''}{/if}"),
            vec![
                Token::IfEquals(Comparison {
                    key: "k".to_string(),
                    literal: String::new(),
                }),
                Token::EndIf,
            ]
        );
    }

    #[test]
    fn test_region_markers() {
        assert_eq!(
            tokens("<!-- Second account starts here -->x<!-- End of second account -->"),
            vec![
                Token::RegionStart("Second account".to_string()),
                Token::Text,
                Token::RegionEnd("second account".to_string()),
            ]
        );
    }

    #[test]
    fn test_plain_comment_is_text() {
        // Not a region marker, just an XML comment
        let toks = tokens("<!-- keep this comment -->");
        assert!(toks.iter().all(|t| *t == Token::Text));
    }

    #[test]
    fn test_lone_brace_is_text() {
        let toks = tokens("a { b } c");
        assert!(toks.iter().all(|t| *t == Token::Text));
    }

    #[test]
    fn test_unclosed_conditional_degrades_to_text() {
        let toks = tokens("{if isset($a) oops");
        assert!(toks.iter().all(|t| *t == Token::Text));
    }

    #[test]
    fn test_spans_cover_input() {
        let input = "a{$k}b";
        let spans: Vec<_> = lex(input).map(|(_, s)| s).collect();
        assert_eq!(spans, vec![0..1, 1..5, 5..6]);
    }

    #[test]
    fn test_multiline_text() {
        assert_eq!(tokens("line1\n\nline2"), vec![Token::Text]);
    }
}
