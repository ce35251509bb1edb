//! State machines
//!
//!     state Door {
//!         default Closed;
//!         Closed -> Open : push;
//!         Open -> Closed;
//!         Closed { ... }
//!         Open { ... }
//!     }
//!
//!     A state definition's body is an ordinary block. Transition and initial-state names are
//!     checked against the defined states once the body has been folded; a machine that
//!     defines no states at all is not checked.

use crate::diagnostics::{FoldError, FoldResult};
use crate::parsing::passes::{match_at, next_tag, recognize, retag_next, scan_heads, Context, Pass};
use crate::session::Session;
use crate::token::Tag;
use crate::tree::Node;
use std::collections::HashSet;

pub fn state_machines(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    scan_heads(session, node, &[Tag::State], |session, node, at| {
        recognize(session, node, at, Tag::StateMachine, |frames, node| {
            node.expect(frames, Tag::State)?;
            node.expect(frames, Tag::Identifier)?;
            node.expect(frames, Tag::Braces)?;
            node.accept(Tag::Semicolon);
            Ok(())
        })
    })
}

pub static STATE_MACHINE: Context = Context {
    name: "state machine",
    pre_parse: None,
    passes: &[Pass::new("body", machine_body)],
    allow: |tag| {
        matches!(
            tag,
            Tag::State | Tag::Identifier | Tag::StateBody | Tag::Semicolon
        )
    },
    post_parse: None,
    recurse: true,
};

fn machine_body(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    retag_next(node, Tag::Braces, Tag::StateBody).map(|_| ())
}

pub static STATE_BODY: Context = Context {
    name: "state machine body",
    pre_parse: None,
    passes: &[
        Pass::new("initial state", initial_state),
        Pass::new("transitions", transitions),
        Pass::new("state definitions", state_definitions),
    ],
    allow: |tag| {
        matches!(
            tag,
            Tag::InitialState | Tag::Transition | Tag::StateDef | Tag::LBrace | Tag::RBrace
        )
    },
    post_parse: Some(check_states),
    recurse: true,
};

fn initial_state(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    scan_heads(session, node, &[Tag::Default], |session, node, at| {
        recognize(session, node, at, Tag::InitialState, |frames, node| {
            node.expect(frames, Tag::Default)?;
            node.expect(frames, Tag::Identifier)?;
            node.expect(frames, Tag::Semicolon)?;
            Ok(())
        })
    })
}

fn transitions(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    scan_heads(session, node, &[Tag::Identifier], |session, node, at| {
        if next_tag(node, at) != Some(Tag::Arrow) {
            return Ok(());
        }
        recognize(session, node, at, Tag::Transition, |frames, node| {
            node.expect(frames, Tag::Identifier)?;
            node.expect(frames, Tag::Arrow)?;
            node.expect(frames, Tag::Identifier)?;
            if node.accept(Tag::Colon).is_some() {
                node.expect(frames, Tag::Identifier)?;
            }
            node.expect(frames, Tag::Semicolon)?;
            Ok(())
        })
    })
}

fn state_definitions(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut index = 0;
    while index < node.len() {
        if node.tag_at(index) == Some(Tag::Identifier) {
            if let Some(end) = match_at(node, index, &[&[Tag::Identifier], &[Tag::Braces]]) {
                node.wrap_range(index..end, Tag::StateDef)?;
            }
        }
        index += 1;
    }
    Ok(())
}

/// The identifiers of a folded state construct, in order.
fn names(node: &Node) -> impl Iterator<Item = &Node> {
    node.significant().filter(|c| c.tag() == Tag::Identifier)
}

fn check_states(session: &mut Session, node: &mut Node) -> FoldResult<()> {
    let mut defined = HashSet::new();
    for def in node.children().iter().filter(|c| c.tag() == Tag::StateDef) {
        let Some(name) = names(def).next() else {
            continue;
        };
        let text = name.text().unwrap_or_default();
        if !defined.insert(text) {
            session.report(FoldError::parse(
                name.location().clone(),
                format!("duplicate state `{}`", text),
            ));
        }
    }

    let initials: Vec<&Node> = node
        .children()
        .iter()
        .filter(|c| c.tag() == Tag::InitialState)
        .collect();
    for extra in initials.iter().skip(1) {
        session.report(FoldError::parse(
            extra.location().clone(),
            "more than one initial state",
        ));
    }

    if defined.is_empty() {
        return Ok(());
    }
    for child in node.children() {
        let referenced: Vec<&Node> = match child.tag() {
            Tag::InitialState => names(child).take(1).collect(),
            // the third name is the event
            Tag::Transition => names(child).take(2).collect(),
            _ => continue,
        };
        for name in referenced {
            let text = name.text().unwrap_or_default();
            if !defined.contains(text) {
                session.report(FoldError::parse(
                    name.location().clone(),
                    format!("undefined state `{}`", text),
                ));
            }
        }
    }
    Ok(())
}

pub static STATE_DEF: Context = Context {
    name: "state definition",
    pre_parse: None,
    passes: &[Pass::new("body", state_block)],
    allow: |tag| matches!(tag, Tag::Identifier | Tag::Block),
    post_parse: None,
    recurse: true,
};

fn state_block(_session: &mut Session, node: &mut Node) -> FoldResult<()> {
    retag_next(node, Tag::Braces, Tag::Block).map(|_| ())
}

#[cfg(test)]
mod tests {
    use crate::parsing::testing::parse_source;
    use crate::token::Tag;
    use crate::tree::Node;

    fn messages(source: &str) -> Vec<String> {
        let (session, _) = parse_source(source);
        session.diagnostics.iter().map(|e| e.message.clone()).collect()
    }

    #[test]
    fn test_machine_shape() {
        let (session, root) = parse_source(
            "state Door {\n  default Closed;\n  Closed -> Open : push;\n  Open -> Closed;\n  Closed { close(); }\n  Open { }\n}\n",
        );
        assert!(session.diagnostics.is_empty(), "{:?}", session.diagnostics);
        let mut body = None;
        root.walk(&mut |node, _| {
            if node.tag() == Tag::StateBody {
                body = Some(node);
            }
        });
        let tags: Vec<Tag> = body
            .unwrap()
            .significant()
            .map(Node::tag)
            .filter(|t| !matches!(t, Tag::LBrace | Tag::RBrace))
            .collect();
        assert_eq!(
            tags,
            vec![
                Tag::InitialState,
                Tag::Transition,
                Tag::Transition,
                Tag::StateDef,
                Tag::StateDef,
            ]
        );
    }

    #[test]
    fn test_state_checks() {
        assert_eq!(
            messages("state M { default A; default B; A -> C; A { } B { } A { } }\n"),
            vec![
                "duplicate state `A`",
                "more than one initial state",
                "undefined state `C`",
            ]
        );
    }

    #[test]
    fn test_undeclared_states_are_not_checked_without_definitions() {
        assert!(messages("state M { default A; A -> B; }\n").is_empty());
    }
}
