//! Integration tests for the template scanner

use provgen::parse;
use provgen::template::{GuardTest, Node};

#[test]
fn test_scan_plain_text() {
    let doc = parse("just text, no markers").expect("Should parse");
    assert_eq!(doc.nodes.len(), 1);
    assert!(matches!(doc.nodes[0], Node::Text(_)));
}

#[test]
fn test_scan_placeholders() {
    let doc = parse("<User>{$account.1.user_id}</User>\n<Pwd>{$account.1.password}</Pwd>")
        .expect("Should parse");

    let keys: Vec<&str> = doc
        .nodes
        .iter()
        .filter_map(|n| match n {
            Node::Placeholder { key, .. } => Some(key.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(keys, vec!["account.1.user_id", "account.1.password"]);
}

#[test]
fn test_scan_branch_guards() {
    let doc = parse(
        "{if isset($account.1.password)}1{else}0{/if}{if $account.1.sip_transport == 'udp'}<Transport>0</Transport>{/if}",
    )
    .expect("Should parse");
    assert_eq!(doc.nodes.len(), 2);

    match (&doc.nodes[0], &doc.nodes[1]) {
        (
            Node::Branch { test: first, .. },
            Node::Branch { test: second, .. },
        ) => {
            assert_eq!(first.key(), "account.1.password");
            assert_eq!(
                second,
                &GuardTest::Equals {
                    key: "account.1.sip_transport".to_string(),
                    literal: "udp".to_string(),
                }
            );
        }
        other => panic!("Expected two branches, got {:?}", other),
    }
}

#[test]
fn test_scan_region_with_contents() {
    let doc = parse(
        r#"before
<!-- Second account starts here -->
<User>{$account.2.user_id}</User>
{if isset($account.2.password)}1{else}0{/if}
<!-- End of second account -->
after"#,
    )
    .expect("Should parse");

    let region = doc
        .nodes
        .iter()
        .find_map(|n| match n {
            Node::Region { name, body, .. } => Some((name, body)),
            _ => None,
        })
        .expect("Should contain a region");
    assert_eq!(region.0, "Second account");
    assert!(region
        .1
        .iter()
        .any(|n| matches!(n, Node::Placeholder { key, .. } if key == "account.2.user_id")));
    assert!(region.1.iter().any(|n| matches!(n, Node::Branch { .. })));
}

#[test]
fn test_scan_same_conditional_twice() {
    let doc = parse("{if isset($p)}YES{else}NO{/if}-{if isset($p)}YES{else}NO{/if}")
        .expect("Should parse");
    let branches = doc
        .nodes
        .iter()
        .filter(|n| matches!(n, Node::Branch { .. }))
        .count();
    assert_eq!(branches, 2);
}

#[test]
fn test_scan_rejects_unbalanced_blocks() {
    assert!(parse("{if isset($p)}YES").is_err());
    assert!(parse("NO{/if}").is_err());
    assert!(parse("<!-- Second account starts here -->x").is_err());
    assert!(parse("x<!-- End of second account -->").is_err());
}

#[test]
fn test_scan_error_reports_span() {
    let source = "good text {if isset($p)}never closed";
    let errors = parse(source).expect_err("Should fail");
    assert!(!errors.is_empty());
    let provgen::TemplateError::Malformed { span, .. } = &errors[0];
    assert!(span.end <= source.len() + 1);
}

#[test]
fn test_scan_tolerates_almost_markers() {
    // Lone braces, plain comments, and broken conditionals are just text
    let doc = parse("a { b } c <!-- note --> {if broken").expect("Should parse");
    assert!(doc.nodes.iter().all(|n| matches!(n, Node::Text(_))));
}
