use recast::construct::{Builder, Constructable, Node};
use recast::reader::{TextReader, XmlReader};
use recast::record::{Recorder, Writable};

#[derive(Default, Debug)]
struct Item {
    id: String,
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

impl Writable for Item {
    fn attributes(&self) -> Vec<(String, String)> {
        self.attributes.clone()
    }
    fn links(&self) -> Vec<(String, Node)> {
        self.links.clone()
    }
}

fn item(attributes: &[(&str, &str)], links: &[(&str, Node)]) -> Item {
    Item {
        id: String::new(),
        attributes: attributes
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
        links: links.iter().map(|(k, n)| (k.to_string(), *n)).collect(),
    }
}

/// A graph with a forward reference, a back reference (cycle) and a self
/// link, to exercise every link resolution path on the way back in.
fn sample_graph() -> Vec<Item> {
    vec![
        item(&[("name", "first"), ("kind", "root")], &[("next", 1)]),
        item(&[("name", "second")], &[("next", 2), ("prev", 0)]),
        item(&[("name", "third")], &[("prev", 1), ("self", 2)]),
    ]
}

fn assert_isomorphic(original: &[Item], written_ids: &[String], builder: &Builder<Item>) {
    assert_eq!(builder.len(), original.len());
    for (index, source) in original.iter().enumerate() {
        let node = builder
            .get(&written_ids[index])
            .unwrap_or_else(|| panic!("id {} missing after read", written_ids[index]));
        let rebuilt = builder.construct(node);
        assert_eq!(rebuilt.attributes, source.attributes);
        // link resolution order is a builder convenience, so compare the
        // (name, target) pairs as sets, with targets taken by id
        let mut rebuilt_links = rebuilt.links.clone();
        let mut expected_links: Vec<(String, Node)> = source
            .links
            .iter()
            .map(|(name, target)| (name.clone(), builder.get(&written_ids[*target]).unwrap()))
            .collect();
        rebuilt_links.sort();
        expected_links.sort();
        assert_eq!(rebuilt_links, expected_links);
    }
}

#[test]
fn text_round_trip_reconstructs_isomorphic_graph() {
    let graph = sample_graph();
    let mut recorder = Recorder::new();
    let mut out = Vec::new();
    recorder.write_text(&graph, &mut out).unwrap();
    let written_ids: Vec<String> = (0..graph.len()).map(|n| recorder.id_for(n)).collect();

    let mut builder = Builder::new(|_| Item::default());
    TextReader::new()
        .read_str(std::str::from_utf8(&out).unwrap(), &mut builder)
        .unwrap();
    assert!(builder.finish().is_empty());
    assert_isomorphic(&graph, &written_ids, &builder);
}

#[test]
fn xml_round_trip_reconstructs_isomorphic_graph() {
    let graph = sample_graph();
    let mut recorder = Recorder::new();
    let mut out = Vec::new();
    recorder.write_xml(&graph, &mut out).unwrap();
    let written_ids: Vec<String> = (0..graph.len()).map(|n| recorder.id_for(n)).collect();

    let mut builder = Builder::new(|_| Item::default());
    XmlReader::new()
        .read_str(std::str::from_utf8(&out).unwrap(), &mut builder)
        .unwrap();
    assert!(builder.finish().is_empty());
    assert_isomorphic(&graph, &written_ids, &builder);
}

#[test]
fn recorder_ids_are_stable_and_distinct() {
    let mut recorder = Recorder::new();
    let first = recorder.id_for(0);
    let second = recorder.id_for(1);
    assert_ne!(first, second);
    assert_eq!(recorder.id_for(0), first);
    assert_eq!(recorder.id_for(1), second);
}

#[test]
fn different_recorders_assign_independently() {
    let graph = sample_graph();
    let mut out_a = Vec::new();
    let mut out_b = Vec::new();
    Recorder::new().write_text(&graph, &mut out_a).unwrap();
    Recorder::new().write_text(&graph, &mut out_b).unwrap();
    // both outputs must parse back to three objects regardless of the ids chosen
    for out in [&out_a, &out_b] {
        let mut builder = Builder::new(|_| Item::default());
        TextReader::new()
            .read_str(std::str::from_utf8(out).unwrap(), &mut builder)
            .unwrap();
        assert_eq!(builder.len(), 3);
    }
}

#[test]
fn comment_and_blank_lines_are_skipped() {
    let content = "// header\n\n#a\n// not an attribute\nname=first\n\n#b\nname=second\n";
    let mut builder = Builder::new(|_| Item::default());
    TextReader::new()
        .with_comment_indicator("//")
        .read_str(content, &mut builder)
        .unwrap();
    assert_eq!(builder.len(), 2);
    let a = builder.construct(builder.get("#a").unwrap());
    assert_eq!(a.attributes, vec![(String::from("name"), String::from("first"))]);
}

#[test]
fn malformed_attribute_lines_fail() {
    for content in ["#a\nno separator\n", "#a\nkey=\n"] {
        let mut builder = Builder::new(|_| Item::default());
        let error = TextReader::new().read_str(content, &mut builder).unwrap_err();
        assert!(matches!(error, recast::error::RecastError::Format { .. }));
    }
}

#[test]
fn xml_character_data_outside_attribute_fails() {
    let content = "<graph><#a>loose text</#a></graph>";
    let mut builder = Builder::new(|_| Item::default());
    let error = XmlReader::new().read_str(content, &mut builder).unwrap_err();
    assert!(matches!(error, recast::error::RecastError::Format { .. }));
}

#[test]
fn instructor_variants_carry_the_ambient_instruction() {
    // the factory keeps the instruction it was created under as an attribute
    let make_builder = || {
        Builder::new(|instruction: &str| {
            let mut item = Item::default();
            if !instruction.is_empty() {
                item.attributes
                    .push((String::from("instruction"), instruction.to_owned()));
            }
            item
        })
    };

    let mut builder = make_builder();
    TextReader::new()
        .instructor()
        .read_str("%CHECK: strict\n#a\nname=first\n", &mut builder)
        .unwrap();
    let a = builder.construct(builder.get("#a").unwrap());
    assert_eq!(a.attributes[0], (String::from("instruction"), String::from("strict")));

    let mut builder = make_builder();
    XmlReader::new()
        .instructor()
        .read_str(
            "<graph><check><![CDATA[strict]]></check><#a><name><![CDATA[first]]></name></#a></graph>",
            &mut builder,
        )
        .unwrap();
    let a = builder.construct(builder.get("#a").unwrap());
    assert_eq!(a.attributes[0], (String::from("instruction"), String::from("strict")));
}
