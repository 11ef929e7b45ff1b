//! Recast – typed values and instruction-driven object-graph recording.
//!
//! Recast centers on a small protocol for taking arbitrary linked object
//! graphs apart into a flat instruction stream and putting them back
//! together, plus the typed value system that gives the streamed attribute
//! values meaning:
//! * A [`construct::Constructable`] is a mutable node built incrementally
//!   from create / attribute / link instructions.
//! * A [`construct::Builder`] consumes the instruction stream and grows an
//!   arena of interlinked constructs, resolving links whose targets are
//!   declared before they exist.
//! * A [`record::Writable`] is the inverse view: an object exposing its
//!   attributes and links so the [`record::Recorder`] can stream it back out
//!   as text or XML under a stable generated id.
//! * A [`value::Value`] is an immutable `(payload, DataType)` pair whose
//!   conversions run through a [`datatype::TypeRegistry`] and its ordered
//!   chain of [`datatype::ValueParser`]s.
//!
//! ## Modules
//! * [`identity`] – process-locally-unique identifier generation.
//! * [`datatype`] – the data type forest, parser chain, conversion
//!   reliability and the four-valued [`datatype::ExtraBoolean`].
//! * [`value`] – the immutable typed value.
//! * [`construct`] – the instruction-driven graph builder.
//! * [`record`] – serialization of writable graphs to text and XML.
//! * [`reader`] – text line and XML element readers producing builder
//!   instructions.
//! * [`xml`] – the custom streaming XML cursor and emitter the readers and
//!   recorder share.
//! * [`error`] – the crate-wide error taxonomy.
//!
//! ## Instruction stream
//! A line starting with `#` opens the object with that id; `key=value` lines
//! set attributes on the most recently opened object and `key=#other` lines
//! link it to the object with id `#other`, whether or not that one exists
//! yet. The XML rendering mirrors this with one element per object named by
//! its id. See [`reader`] for the exact dispatch rules.
//!
//! ## Quick Start
//! ```
//! use recast::construct::{Builder, Constructable, Node};
//! use recast::reader::TextReader;
//!
//! #[derive(Default)]
//! struct Item {
//!     id: String,
//!     attributes: Vec<(String, String)>,
//!     links: Vec<(String, Node)>,
//! }
//! impl Constructable for Item {
//!     fn set_id(&mut self, id: &str) { self.id = id.to_owned(); }
//!     fn set_attribute(&mut self, name: &str, value: &str) {
//!         self.attributes.push((name.to_owned(), value.to_owned()));
//!     }
//!     fn set_link(&mut self, name: &str, target: Node) {
//!         self.links.push((name.to_owned(), target));
//!     }
//! }
//!
//! let mut builder = Builder::new(|_instruction| Item::default());
//! TextReader::new()
//!     .read_str("#a\nname=first\nnext=#b\n#b\nname=second\n", &mut builder)
//!     .unwrap();
//! assert_eq!(builder.len(), 2);
//! ```
//!
//! ## Concurrency
//! Everything here is single-threaded, synchronous and allocation-backed: a
//! builder, recorder or registry instance is owned mutable state for one
//! thread at a time. Streams handed to the readers and the recorder are
//! opened and closed by the caller.

pub mod construct;
pub mod datatype;
pub mod error;
pub mod identity;
pub mod reader;
pub mod record;
pub mod value;
pub mod xml;
