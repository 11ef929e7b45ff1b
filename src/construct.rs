use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::{RecastError, Result};
use crate::identity::IdHasher;

// ------------- Node -------------
/// Handle into a builder's construct arena. Links between constructs are
/// expressed as handles rather than references, so cyclic graphs carry no
/// ownership cycles.
pub type Node = usize;

/// A mutable, identifiable node built incrementally from an instruction
/// stream: an id, named string attributes and named links to other nodes of
/// the same family.
pub trait Constructable {
    fn set_id(&mut self, id: &str);
    fn set_attribute(&mut self, name: &str, value: &str);
    fn set_link(&mut self, name: &str, target: Node);
}

// ------------- Builder -------------
/// Consumes a flat stream of create / attribute / link instructions and grows
/// a graph of interlinked constructs, resolving links whose target id has not
/// been seen yet.
///
/// One builder holds one parse session: an arena of constructs, the id map,
/// the pending link queries keyed by not-yet-seen id, a cursor at the most
/// recently created construct and an ambient instruction string handed to the
/// factory on every `create`. Call [`Builder::reset`] between independent
/// sessions. A builder owns its state exclusively and is not for concurrent
/// use from multiple threads.
pub struct Builder<T: Constructable> {
    constructs: Vec<T>,
    ids: HashMap<String, Node, IdHasher>,
    pending: HashMap<String, Vec<(Node, String)>, IdHasher>,
    latest: Option<Node>,
    instruction: String,
    factory: Box<dyn FnMut(&str) -> T>,
}

impl<T: Constructable> Builder<T> {
    /// The factory decides how to instantiate each construct; it receives the
    /// ambient instruction current at the time of the `create`.
    pub fn new(factory: impl FnMut(&str) -> T + 'static) -> Self {
        Self {
            constructs: Vec::new(),
            ids: HashMap::default(),
            pending: HashMap::default(),
            latest: None,
            instruction: String::new(),
            factory: Box::new(factory),
        }
    }
    /// Creates a construct under `id` and makes it the latest one. Pending
    /// link queries against `id` are resolved now, in the order they were
    /// declared. Fails if the id is already taken in this session.
    pub fn create(&mut self, id: &str) -> Result<Node> {
        match self.ids.entry(id.to_owned()) {
            Entry::Occupied(_) => {
                return Err(RecastError::DuplicateIdentifier { id: id.to_owned() });
            }
            Entry::Vacant(e) => {
                let mut construct = (self.factory)(&self.instruction);
                construct.set_id(id);
                let node = self.constructs.len();
                self.constructs.push(construct);
                e.insert(node);
                self.latest = Some(node);
                if let Some(queries) = self.pending.remove(id) {
                    debug!(id, queries = queries.len(), "resolving pending links");
                    for (asker, name) in queries {
                        self.constructs[asker].set_link(&name, node);
                    }
                }
                Ok(node)
            }
        }
    }
    /// Sets a scalar attribute on the latest construct.
    pub fn add_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        let latest = self.latest.ok_or(RecastError::NoConstruct)?;
        self.constructs[latest].set_attribute(name, value);
        Ok(())
    }
    /// Links the latest construct to `target_id`. If the target exists the
    /// link is set immediately; otherwise the query is parked until the
    /// target id is created.
    pub fn add_link(&mut self, name: &str, target_id: &str) -> Result<()> {
        let latest = self.latest.ok_or(RecastError::NoConstruct)?;
        match self.ids.get(target_id) {
            Some(&target) => self.constructs[latest].set_link(name, target),
            None => self
                .pending
                .entry(target_id.to_owned())
                .or_default()
                .push((latest, name.to_owned())),
        }
        Ok(())
    }
    /// Updates the ambient instruction used by subsequent `create` calls.
    /// Already created constructs are unaffected.
    pub fn set_instruction(&mut self, text: &str) {
        self.instruction = text.to_owned();
    }
    /// Repositions the latest-construct cursor on an already created
    /// construct without creating anything.
    pub fn move_to(&mut self, id: &str) -> Result<Node> {
        let node = *self.ids.get(id).ok_or_else(|| RecastError::Format {
            message: format!("cannot move to unknown id {}", id),
            line: None,
        })?;
        self.latest = Some(node);
        Ok(node)
    }
    pub fn get(&self, id: &str) -> Option<Node> {
        self.ids.get(id).copied()
    }
    pub fn construct(&self, node: Node) -> &T {
        &self.constructs[node]
    }
    pub fn constructs(&self) -> &[T] {
        &self.constructs
    }
    pub fn len(&self) -> usize {
        self.constructs.len()
    }
    pub fn is_empty(&self) -> bool {
        self.constructs.is_empty()
    }
    pub fn latest(&self) -> Option<Node> {
        self.latest
    }
    /// Ends the session and reports the target ids of link queries that were
    /// never resolved. Dangling forward references are not an error, but they
    /// are worth knowing about.
    pub fn finish(&mut self) -> Vec<String> {
        let mut unresolved: Vec<String> = self.pending.drain().map(|(id, _)| id).collect();
        unresolved.sort();
        if !unresolved.is_empty() {
            warn!(?unresolved, "session ended with unresolved links");
        }
        unresolved
    }
    /// Clears all session state. Must be called before reusing a builder for
    /// an independent parse session.
    pub fn reset(&mut self) {
        self.constructs.clear();
        self.ids.clear();
        self.pending.clear();
        self.latest = None;
        self.instruction.clear();
    }
}
