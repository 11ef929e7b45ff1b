use recast::construct::{Builder, Constructable, Node};
use recast::error::RecastError;

#[derive(Default, Debug)]
struct Item {
    id: String,
    instruction: String,
    attributes: Vec<(String, String)>,
    links: Vec<(String, Node)>,
}

impl Constructable for Item {
    fn set_id(&mut self, id: &str) {
        self.id = id.to_owned();
    }
    fn set_attribute(&mut self, name: &str, value: &str) {
        self.attributes.push((name.to_owned(), value.to_owned()));
    }
    fn set_link(&mut self, name: &str, target: Node) {
        self.links.push((name.to_owned(), target));
    }
}

fn builder() -> Builder<Item> {
    // make builder warnings visible under RUST_LOG; only the first call installs
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
    Builder::new(|instruction: &str| Item {
        instruction: instruction.to_owned(),
        ..Item::default()
    })
}

#[test]
fn forward_reference_resolves_exactly_once() {
    let mut b = builder();
    b.create("#a").unwrap();
    b.add_link("next", "#b").unwrap();
    // nothing resolved yet
    assert!(b.construct(b.get("#a").unwrap()).links.is_empty());

    let target = b.create("#b").unwrap();
    let a = b.get("#a").unwrap();
    assert_eq!(b.construct(a).links, vec![(String::from("next"), target)]);

    // later edits to the target must not touch the already resolved link
    b.add_attribute("name", "second").unwrap();
    assert_eq!(b.construct(a).links, vec![(String::from("next"), target)]);
}

#[test]
fn pending_queries_resolve_in_declaration_order() {
    let mut b = builder();
    b.create("#a").unwrap();
    b.add_link("first", "#t").unwrap();
    b.add_link("second", "#t").unwrap();
    let target = b.create("#t").unwrap();
    let a = b.get("#a").unwrap();
    assert_eq!(
        b.construct(a).links,
        vec![
            (String::from("first"), target),
            (String::from("second"), target)
        ]
    );
}

#[test]
fn immediate_links_require_no_pending_query() {
    let mut b = builder();
    let a = b.create("#a").unwrap();
    b.create("#b").unwrap();
    b.add_link("prev", "#a").unwrap();
    let bee = b.get("#b").unwrap();
    assert_eq!(b.construct(bee).links, vec![(String::from("prev"), a)]);
    assert!(b.finish().is_empty());
}

#[test]
fn duplicate_id_is_rejected_and_first_object_survives() {
    let mut b = builder();
    b.create("#x").unwrap();
    b.add_attribute("name", "original").unwrap();
    let error = b.create("#x").unwrap_err();
    assert!(matches!(error, RecastError::DuplicateIdentifier { ref id } if id == "#x"));
    let x = b.get("#x").unwrap();
    assert_eq!(
        b.construct(x).attributes,
        vec![(String::from("name"), String::from("original"))]
    );
    assert_eq!(b.len(), 1);
}

#[test]
fn instructions_before_any_create_fail() {
    let mut b = builder();
    assert!(matches!(
        b.add_attribute("name", "nobody").unwrap_err(),
        RecastError::NoConstruct
    ));
    assert!(matches!(
        b.add_link("next", "#nowhere").unwrap_err(),
        RecastError::NoConstruct
    ));
}

#[test]
fn move_to_repositions_the_cursor() {
    let mut b = builder();
    let a = b.create("#a").unwrap();
    b.create("#b").unwrap();
    b.move_to("#a").unwrap();
    assert_eq!(b.latest(), Some(a));
    b.add_attribute("revisited", "yes").unwrap();
    assert_eq!(
        b.construct(a).attributes,
        vec![(String::from("revisited"), String::from("yes"))]
    );
    assert!(matches!(
        b.move_to("#missing").unwrap_err(),
        RecastError::Format { .. }
    ));
}

#[test]
fn ambient_instruction_applies_from_the_next_create() {
    let mut b = builder();
    b.create("#a").unwrap();
    b.set_instruction("verbose");
    b.create("#b").unwrap();
    assert_eq!(b.construct(b.get("#a").unwrap()).instruction, "");
    assert_eq!(b.construct(b.get("#b").unwrap()).instruction, "verbose");
}

#[test]
fn finish_reports_unresolved_targets_once() {
    let mut b = builder();
    b.create("#a").unwrap();
    b.add_link("next", "#ghost").unwrap();
    b.add_link("peer", "#phantom").unwrap();
    b.add_link("again", "#ghost").unwrap();
    let unresolved = b.finish();
    assert_eq!(unresolved, vec![String::from("#ghost"), String::from("#phantom")]);
    // the report drains the pending state
    assert!(b.finish().is_empty());
}

#[test]
fn reset_clears_the_session() {
    let mut b = builder();
    b.create("#a").unwrap();
    b.set_instruction("verbose");
    b.add_link("next", "#b").unwrap();
    b.reset();
    assert_eq!(b.len(), 0);
    assert_eq!(b.latest(), None);
    // the id is free again and the instruction context is gone
    b.create("#a").unwrap();
    assert_eq!(b.construct(b.get("#a").unwrap()).instruction, "");
    assert!(b.finish().is_empty());
}
