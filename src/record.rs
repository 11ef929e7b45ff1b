use std::collections::HashMap;
use std::io::Write;

use tracing::debug;

use crate::construct::Node;
use crate::error::Result;
use crate::identity::{IdGenerator, IdHasher};
use crate::xml::XmlEmitter;

/// The serializable view of an object: its named string attributes and its
/// named links to other objects of the same graph, expressed as handles into
/// the slice being written.
pub trait Writable {
    fn attributes(&self) -> Vec<(String, String)>;
    fn links(&self) -> Vec<(String, Node)>;
}

/// Serializes a graph of writables back into the instruction stream format,
/// as text lines or as XML.
///
/// Each distinct object is assigned a generated id the first time it is
/// encountered and keeps that id for the recorder's lifetime; a fresh
/// recorder will assign fresh ids. Not for concurrent use from multiple
/// threads. Writing a graph and reading it back through a fresh
/// [`crate::construct::Builder`] reconstructs an isomorphic graph.
pub struct Recorder {
    generator: IdGenerator,
    ids: HashMap<Node, String, IdHasher>,
}

impl Recorder {
    pub fn new() -> Self {
        Self {
            generator: IdGenerator::new(),
            ids: HashMap::default(),
        }
    }
    /// The stable id for a node within this recorder's lifetime, generated on
    /// first use.
    pub fn id_for(&mut self, node: Node) -> String {
        self.ids
            .entry(node)
            .or_insert_with(|| self.generator.generate())
            .clone()
    }
    /// One id line per object, then one `key=value` line per attribute and
    /// one `key=#<target id>` line per link.
    pub fn write_text<W: Writable>(&mut self, graph: &[W], out: &mut impl Write) -> Result<()> {
        debug!(objects = graph.len(), "recording graph as text");
        for (node, writable) in graph.iter().enumerate() {
            let id = self.id_for(node);
            writeln!(out, "{}", id)?;
            for (key, value) in writable.attributes() {
                writeln!(out, "{}={}", key, value)?;
            }
            for (key, target) in writable.links() {
                let target_id = self.id_for(target);
                writeln!(out, "{}={}", key, target_id)?;
            }
        }
        Ok(())
    }
    /// The XML mirror of the text format: one element per object named by its
    /// generated id, one child element per attribute or link with the value
    /// as CDATA.
    pub fn write_xml<W: Writable>(&mut self, graph: &[W], out: &mut impl Write) -> Result<()> {
        debug!(objects = graph.len(), "recording graph as xml");
        let mut emitter = XmlEmitter::new(out);
        emitter.start("graph")?;
        for (node, writable) in graph.iter().enumerate() {
            let id = self.id_for(node);
            emitter.start(&id)?;
            for (key, value) in writable.attributes() {
                emitter.start(&key)?;
                emitter.cdata(&value)?;
                emitter.end(&key)?;
            }
            for (key, target) in writable.links() {
                let target_id = self.id_for(target);
                emitter.start(&key)?;
                emitter.cdata(&target_id)?;
                emitter.end(&key)?;
            }
            emitter.end(&id)?;
        }
        emitter.end("graph")?;
        Ok(())
    }
}

impl Default for Recorder {
    fn default() -> Self {
        Self::new()
    }
}
