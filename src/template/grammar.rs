//! Template scanner implementation using chumsky

use chumsky::input::{Stream, ValueInput};
use chumsky::prelude::*;

use crate::template::ast::{Document, GuardTest, Node};
use crate::template::lexer::Token;

/// Scan template text into a node tree
///
/// Structural violations (an unterminated `{if}`, an orphan `{/if}`, region
/// markers whose names do not match) are reported with the offending span,
/// never repaired.
pub fn parse(input: &str) -> Result<Document, Vec<crate::TemplateError>> {
    let len = input.len();

    // Create a logos lexer and convert to token stream
    let token_iter = crate::template::lexer::lex(input).map(|(tok, span)| (tok, span.into()));

    // Turn the token iterator into a stream that chumsky can use
    let token_stream = Stream::from_iter(token_iter)
        // Split (Token, SimpleSpan) into token and span parts
        .map((len..len).into(), |(t, s): (_, _)| (t, s));

    document_parser()
        .parse(token_stream)
        .into_result()
        .map_err(|errs| errs.into_iter().map(|e| e.into()).collect())
}

/// Helper to extract span range from chumsky's MapExtra
fn span_range(e: &impl chumsky::span::Span<Offset = usize>) -> std::ops::Range<usize> {
    e.start()..e.end()
}

fn document_parser<'a, I>() -> impl Parser<'a, I, Document, extra::Err<Rich<'a, Token>>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let node = recursive(|node| {
        let text = select! { Token::Text => () }.map_with(|_, e| Node::Text(span_range(&e.span())));

        let placeholder = select! { Token::Placeholder(key) => key }.map_with(|key, e| {
            Node::Placeholder {
                key,
                span: span_range(&e.span()),
            }
        });

        let body = node.clone().repeated().collect::<Vec<Node>>();

        let guard = select! {
            Token::IfSet(key) => GuardTest::IsSet { key },
            Token::IfEquals(cmp) => GuardTest::Equals { key: cmp.key, literal: cmp.literal },
        };

        // `{else}` and `{/if}` are not node starters, so the body repetition
        // stops at them without lookahead
        let branch = guard
            .then(body.clone())
            .then(just(Token::Else).ignore_then(body.clone()).or_not())
            .then_ignore(just(Token::EndIf))
            .map_with(|((test, then_body), else_body), e| Node::Branch {
                test,
                then_body,
                else_body,
                span: span_range(&e.span()),
            });

        let region_start =
            select! { Token::RegionStart(name) => name }.map_with(|name, e| (name, span_range(&e.span())));
        let region_end =
            select! { Token::RegionEnd(name) => name }.map_with(|name, e| (name, span_range(&e.span())));

        let region = region_start.then(body).then(region_end).try_map(
            |(((name, start_span), body), (end_name, end_span)), span| {
                // Marker names match case-insensitively: "Second account"
                // pairs with "End of second account"
                if name.eq_ignore_ascii_case(&end_name) {
                    Ok(Node::Region {
                        name,
                        start_span,
                        end_span,
                        body,
                    })
                } else {
                    Err(Rich::custom(
                        span,
                        format!("region '{}' is closed by 'End of {}'", name, end_name),
                    ))
                }
            },
        );

        choice((text, placeholder, branch, region)).boxed()
    });

    // Document is a list of nodes
    node.repeated()
        .collect()
        .then_ignore(end())
        .map(|nodes| Document { nodes })
}
