use std::collections::HashSet;

use recast::identity::{IdGenerator, ID_INDICATOR};

#[test]
fn generated_identifiers_are_distinct() {
    let mut generator = IdGenerator::new();
    let mut seen = HashSet::new();
    for _ in 0..10_000 {
        let id = generator.generate();
        assert!(id.starts_with(ID_INDICATOR));
        assert!(id.len() > 1);
        assert!(seen.insert(id), "generator repeated an identifier");
    }
}

#[test]
fn reserved_identifiers_are_never_generated() {
    let mut generator = IdGenerator::new();
    let reserved = ["#alpha", "#0", "#zzzzzzzzzzzz"];
    for id in reserved {
        generator.reserve(id);
        assert!(generator.is_issued(id));
    }
    for _ in 0..10_000 {
        let id = generator.generate();
        assert!(!reserved.contains(&id.as_str()));
    }
}

#[test]
fn generated_identifiers_are_marked_issued() {
    let mut generator = IdGenerator::new();
    let id = generator.generate();
    assert!(generator.is_issued(&id));
    assert!(!generator.is_issued("#never-seen"));
}
