//! Bracket grouping: balanced input always structures, and mismatches stop the file

use cfold::{ErrorKind, SourceLoader, Tag};
use proptest::prelude::*;

fn balanced() -> impl Strategy<Value = String> {
    let leaf = prop_oneof![
        Just("x".to_string()),
        Just(" ".to_string()),
        Just("1".to_string()),
        Just(";".to_string()),
        Just("\n".to_string()),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(|parts| parts.concat()),
            inner.clone().prop_map(|s| format!("({})", s)),
            inner.clone().prop_map(|s| format!("[{}]", s)),
            inner.prop_map(|s| format!("{{{}}}", s)),
        ]
    })
}

proptest! {
    #[test]
    fn test_balanced_input_structures(source in balanced()) {
        let compilation = SourceLoader::from_string("p.cf", source.clone()).structure().unwrap();
        prop_assert!(!compilation.aborted);
        prop_assert_eq!(compilation.root.text_content(), source);
    }

    #[test]
    fn test_stray_closer_aborts(source in balanced()) {
        let broken = format!("{})", source);
        let compilation = SourceLoader::from_string("p.cf", broken).structure().unwrap();
        prop_assert!(compilation.aborted);
        prop_assert!(compilation.session.diagnostics.has_fatal());
    }
}

#[test]
fn test_groups_become_children() {
    let compilation = SourceLoader::from_string("t.cf", "f(a[1]) { g(); }\n")
        .structure()
        .unwrap();
    let tags: Vec<Tag> = compilation
        .root
        .significant()
        .map(|node| node.tag())
        .collect();
    assert_eq!(tags, vec![Tag::Identifier, Tag::Parens, Tag::Braces]);
}

#[test]
fn test_mismatch_reports_both_sides() {
    let compilation = SourceLoader::from_string("t.cf", "{ ( } )")
        .structure()
        .unwrap();
    assert!(compilation.aborted);
    let messages: Vec<&str> = compilation
        .session
        .diagnostics
        .iter()
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(
        messages,
        vec!["unmatched `(` before `}`", "mismatched `}`, expected `)`"]
    );
    assert!(compilation
        .session
        .diagnostics
        .iter()
        .all(|e| e.kind == ErrorKind::Structure));
}

#[test]
fn test_aborted_file_is_not_parsed_further() {
    let compilation = SourceLoader::from_string("t.cf", "int f( {\n").compile().unwrap();
    assert!(compilation.aborted);
    let messages: Vec<&str> = compilation
        .session
        .diagnostics
        .iter()
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(messages, vec!["unclosed `(`", "unclosed `{`"]);
    assert!(!compilation.root.is_parsed());
}

#[test]
fn test_runaway_nesting_stops_the_file() {
    let depth = 100_000;
    let source = format!("int x = {}1{};\n", "(".repeat(depth), ")".repeat(depth));
    let compilation = SourceLoader::from_string("t.cf", source).compile().unwrap();
    assert!(compilation.aborted);
    let errors: Vec<_> = compilation.session.diagnostics.iter().collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, ErrorKind::Resource);
    assert_eq!(errors[0].message, "nesting deeper than 256 levels");
}
