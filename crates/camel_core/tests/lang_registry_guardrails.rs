use std::collections::{HashMap, HashSet};

use camel_core::lang::dialect::{Dialect, ObjectSystem};
use camel_core::lang::keywords;
use camel_core::lang::kinds::SyntaxKind;
use camel_core::lang::operators::{self, Fixity};
use camel_core::lang::token_sets;

fn everything_enabled() -> Dialect {
    Dialect::modern().with_object_system(ObjectSystem::Moose)
}

#[test]
fn keywords_spellings_unique_and_resolvable() {
    let dialect = everything_enabled();
    let mut seen: HashMap<&'static str, SyntaxKind> = HashMap::new();

    for info in keywords::KEYWORDS {
        assert_eq!(
            keywords::from_str(info.spelling, &dialect),
            Some(info.kind),
            "keyword spelling not resolvable: {}",
            info.spelling
        );
        assert_eq!(
            keywords::as_str(info.kind),
            Some(info.spelling),
            "keyword as_str mismatch for {:?}",
            info.kind
        );
        if let Some(prev) = seen.insert(info.spelling, info.kind) {
            panic!("duplicate keyword spelling {:?}: {:?} and {:?}", info.spelling, prev, info.kind);
        }
    }
}

#[test]
fn every_keyword_kind_is_registered() {
    for kind in token_sets::KEYWORDS.iter() {
        assert!(keywords::info_for(kind).is_some(), "keyword kind {kind:?} has no spelling");
    }
    for info in keywords::KEYWORDS {
        assert!(token_sets::KEYWORDS.contains(info.kind), "{:?} missing from KEYWORDS set", info.kind);
    }
}

#[test]
fn operator_roles_unique() {
    let mut seen: HashSet<(SyntaxKind, Fixity)> = HashSet::new();
    for info in operators::OPERATORS {
        assert!(seen.insert((info.kind, info.fixity)), "duplicate operator role {:?} {:?}", info.kind, info.fixity);
        assert!(info.node.is_node(), "operator {:?} maps to non-node {:?}", info.kind, info.node);
        assert!(!info.spellings.is_empty(), "operator {:?} has no spelling", info.kind);
    }
}

#[test]
fn word_operators_do_not_collide_with_keywords() {
    let dialect = everything_enabled();
    for info in operators::OPERATORS.iter().filter(|info| info.is_word()) {
        for spelling in info.spellings {
            assert_eq!(
                keywords::from_str(spelling, &dialect),
                None,
                "word operator {spelling} is also a keyword"
            );
            assert_eq!(operators::word_operator(spelling), Some(info.kind));
        }
    }
}

#[test]
fn word_operator_set_matches_registry() {
    for info in operators::OPERATORS.iter().filter(|info| info.is_word()) {
        assert!(
            token_sets::WORD_OPERATORS.contains(info.kind),
            "{:?} missing from WORD_OPERATORS",
            info.kind
        );
    }
}

#[test]
fn unchainable_operators_are_comparisons() {
    for kind in token_sets::UNCHAINABLE_OPERATORS.iter() {
        let info = operators::infix_info(kind);
        assert_eq!(info.map(|i| i.node), Some(SyntaxKind::EqualityExpr), "{kind:?}");
    }
}

#[test]
fn token_sets_only_hold_their_layer() {
    for kind in token_sets::TRIVIA.iter() {
        assert!(!kind.is_node(), "trivia set holds node kind {kind:?}");
    }
    for kind in token_sets::COMPOSITE_LITERALS.iter() {
        assert!(kind.is_composite(), "{kind:?} is not a composite kind");
    }
}
