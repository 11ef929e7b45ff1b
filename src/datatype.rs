// used for the date and datetime data types
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

// used to recognize literal shapes before handing them to chrono
use lazy_static::lazy_static;
use regex::Regex;

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use crate::error::{RecastError, Result};
use crate::identity::IdHasher;
use crate::value::{Payload, Value};

// ------------- DataType -------------
/// A named tag in a hierarchy used to select conversions and validate operations.
/// Identity is the name, so a re-registered type compares equal to its
/// predecessor and links by name keep working across replacement.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct DataType(Arc<str>);

impl DataType {
    pub fn new(name: &str) -> Self {
        Self(Arc::from(name))
    }
    pub fn name(&self) -> &str {
        &self.0
    }
}
impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

lazy_static! {
    pub static ref STRING: DataType = DataType::new("String");
    pub static ref INTEGER: DataType = DataType::new("Integer");
    pub static ref LONG: DataType = DataType::new("Long");
    pub static ref DOUBLE: DataType = DataType::new("Double");
    pub static ref NUMBER: DataType = DataType::new("Number");
    pub static ref BOOLEAN: DataType = DataType::new("Boolean");
    pub static ref EXTRA_BOOLEAN: DataType = DataType::new("ExtraBoolean");
    pub static ref DATE: DataType = DataType::new("Date");
    pub static ref DATETIME: DataType = DataType::new("DateTime");
}

// ------------- Reliability -------------
/// How lossy a hypothetical conversion between two types would be,
/// independent of whether a parser is installed for it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Reliability {
    Unsupported,
    Lossy,
    Exact,
}

// ------------- ExtraBoolean -------------
/// A four-valued confidence boolean.
///
/// Each variant carries a fixed confidence level; plain truth is recovered by
/// thresholding at 0.5. Comparing two extra-booleans yields another
/// extra-boolean rather than a plain bool, so uncertainty propagates.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ExtraBoolean {
    ExtraTrue,
    WeakTrue,
    WeakFalse,
    ExtraFalse,
}

impl ExtraBoolean {
    pub fn level(&self) -> f64 {
        match self {
            ExtraBoolean::ExtraTrue => 1.0,
            ExtraBoolean::WeakTrue => 0.6,
            ExtraBoolean::WeakFalse => 0.3,
            ExtraBoolean::ExtraFalse => 0.0,
        }
    }
    pub fn to_boolean(&self) -> bool {
        self.level() >= 0.5
    }
    pub fn from_boolean(b: bool) -> Self {
        if b {
            ExtraBoolean::ExtraTrue
        } else {
            ExtraBoolean::ExtraFalse
        }
    }
    /// Confidence-preserving equality: identical values are extra-true, equal
    /// truthiness is weak-true, opposite truthiness with a level gap above
    /// 0.5 is extra-false, and anything else weak-false.
    pub fn equals(&self, other: &ExtraBoolean) -> ExtraBoolean {
        if self == other {
            ExtraBoolean::ExtraTrue
        } else if self.to_boolean() == other.to_boolean() {
            ExtraBoolean::WeakTrue
        } else if (self.level() - other.level()).abs() > 0.5 {
            ExtraBoolean::ExtraFalse
        } else {
            ExtraBoolean::WeakFalse
        }
    }
}
impl fmt::Display for ExtraBoolean {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ExtraBoolean::ExtraTrue => write!(f, "extra-true"),
            ExtraBoolean::WeakTrue => write!(f, "weak-true"),
            ExtraBoolean::WeakFalse => write!(f, "weak-false"),
            ExtraBoolean::ExtraFalse => write!(f, "extra-false"),
        }
    }
}

// ------------- ValueParser -------------
/// A converter supporting a declared set of (input type, output type) pairs.
/// Parsers are tried in registration order; the first whose declared sets
/// match the requested conversion is delegated to.
pub trait ValueParser: Send + Sync {
    fn input_types(&self) -> Vec<DataType>;
    fn output_types(&self) -> Vec<DataType>;
    fn convert(&self, value: &Value, to: &DataType) -> Result<Value>;
}

// ------------- TypeRegistry -------------
struct TypeNode {
    parent: Option<DataType>,
}

/// Owns the forest of data types and the ordered parser chain.
///
/// A registry is constructed explicitly and passed by reference wherever
/// conversions are needed; there is no process-wide instance. Not safe for
/// concurrent mutation from multiple threads without external synchronization.
pub struct TypeRegistry {
    nodes: HashMap<String, TypeNode, IdHasher>,
    parsers: Vec<Arc<dyn ValueParser>>,
    inputs: HashSet<DataType, IdHasher>,
    outputs: HashSet<DataType, IdHasher>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::default(),
            parsers: Vec::new(),
            inputs: HashSet::default(),
            outputs: HashSet::default(),
        }
    }
    /// A registry primed with the built-in forest (the numeric types under
    /// NUMBER) and the basic coercion parser.
    pub fn basic() -> Self {
        let mut registry = Self::new();
        for built_in in [
            &*STRING,
            &*NUMBER,
            &*BOOLEAN,
            &*EXTRA_BOOLEAN,
            &*DATE,
            &*DATETIME,
        ] {
            registry.register(built_in.clone(), None);
        }
        for numeric in [&*INTEGER, &*LONG, &*DOUBLE] {
            registry.register(numeric.clone(), Some(NUMBER.clone()));
        }
        registry.add_parser(Arc::new(BasicParser::new()), false);
        registry
    }
    /// Inserts or replaces (by name) a type node. Replacing resets the node's
    /// parent to the one supplied here; the caller re-establishes the
    /// hierarchy position. Children referring to the name are unaffected.
    pub fn register(&mut self, data_type: DataType, parent: Option<DataType>) {
        self.nodes
            .insert(data_type.name().to_owned(), TypeNode { parent });
    }
    pub fn is_registered(&self, data_type: &DataType) -> bool {
        self.nodes.contains_key(data_type.name())
    }
    /// True if `data_type` equals `ancestor` or any type on its parent chain
    /// does. Errors if `data_type` was never registered. The walk is guarded
    /// so it terminates even if re-registration has bent the forest.
    pub fn is_of_type(&self, data_type: &DataType, ancestor: &DataType) -> Result<bool> {
        if !self.nodes.contains_key(data_type.name()) {
            return Err(RecastError::UnknownType(data_type.name().to_owned()));
        }
        let mut visited: HashSet<&str, IdHasher> = HashSet::default();
        let mut current = data_type.name();
        loop {
            if current == ancestor.name() {
                return Ok(true);
            }
            if !visited.insert(current) {
                return Ok(false);
            }
            match self.nodes.get(current).and_then(|n| n.parent.as_ref()) {
                Some(parent) => current = parent.name(),
                None => return Ok(false),
            }
        }
    }
    /// Appends a parser to the front (primary) or back (fallback) of the
    /// chain. Re-adding an already present parser is a no-op. The parser's
    /// declared types are merged into the aggregate supported-type sets.
    pub fn add_parser(&mut self, parser: Arc<dyn ValueParser>, primary: bool) {
        if self.parsers.iter().any(|p| Arc::ptr_eq(p, &parser)) {
            return;
        }
        self.inputs.extend(parser.input_types());
        self.outputs.extend(parser.output_types());
        if primary {
            self.parsers.insert(0, parser);
        } else {
            self.parsers.push(parser);
        }
    }
    /// True if some parser declares the type as an accepted input.
    pub fn accepts_input(&self, data_type: &DataType) -> bool {
        self.inputs.contains(data_type)
    }
    /// True if some parser declares the type as a producible output.
    pub fn produces_output(&self, data_type: &DataType) -> bool {
        self.outputs.contains(data_type)
    }
    /// Delegates to the first parser in order whose declared input set
    /// contains the value's type and whose output set contains `to`.
    pub fn convert(&self, value: &Value, to: &DataType) -> Result<Value> {
        let from = value.data_type();
        for parser in &self.parsers {
            if parser.input_types().contains(from) && parser.output_types().contains(to) {
                return parser.convert(value, to);
            }
        }
        Err(RecastError::Conversion {
            value: value.to_string(),
            from: from.name().to_owned(),
            to: to.name().to_owned(),
        })
    }
    /// The reliability of a hypothetical (from, to) conversion, independent
    /// of whether a parser for it is installed.
    pub fn reliability(&self, from: &DataType, to: &DataType) -> Reliability {
        if from == to {
            return Reliability::Exact;
        }
        match (from.name(), to.name()) {
            // widening keeps every representable value
            ("Integer", "Long")
            | ("Integer", "Double")
            | ("Integer", "Number")
            | ("Long", "Number")
            | ("Double", "Number")
            | ("Boolean", "ExtraBoolean")
            | ("Boolean", "String")
            | ("ExtraBoolean", "String")
            | ("Date", "DateTime")
            | ("Date", "String")
            | ("DateTime", "String")
            | ("Integer", "String")
            | ("Long", "String")
            | ("Double", "String")
            | ("Number", "String") => Reliability::Exact,
            // narrowing, truncating or parse-dependent
            ("Long", "Integer")
            | ("Long", "Double")
            | ("Double", "Integer")
            | ("Double", "Long")
            | ("Number", "Integer")
            | ("Number", "Long")
            | ("Number", "Double")
            | ("ExtraBoolean", "Boolean")
            | ("DateTime", "Date")
            | ("String", "Integer")
            | ("String", "Long")
            | ("String", "Double")
            | ("String", "Number")
            | ("String", "Boolean")
            | ("String", "ExtraBoolean")
            | ("String", "Date")
            | ("String", "DateTime") => Reliability::Lossy,
            _ => Reliability::Unsupported,
        }
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ------------- BasicParser -------------
lazy_static! {
    static ref DATE_SHAPE: Regex = Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap();
    static ref DATETIME_SHAPE: Regex =
        Regex::new(r"^\d{4}-\d{2}-\d{2}[T ]\d{2}:\d{2}:\d{2}$").unwrap();
}

/// The basic coercion policy among the built-in types.
///
/// Numeric strings are parsed through double first and truncated toward zero
/// for integral targets; a string that is not fully numeric is a conversion
/// error, never a silent zero.
pub struct BasicParser {
    inputs: Vec<DataType>,
    outputs: Vec<DataType>,
}

impl BasicParser {
    pub fn new() -> Self {
        let supported = vec![
            STRING.clone(),
            INTEGER.clone(),
            LONG.clone(),
            DOUBLE.clone(),
            NUMBER.clone(),
            BOOLEAN.clone(),
            EXTRA_BOOLEAN.clone(),
            DATE.clone(),
            DATETIME.clone(),
        ];
        Self {
            inputs: supported.clone(),
            outputs: supported,
        }
    }
    fn failure(value: &Value, to: &DataType) -> RecastError {
        RecastError::Conversion {
            value: value.to_string(),
            from: value.data_type().name().to_owned(),
            to: to.name().to_owned(),
        }
    }
    fn numeric(value: &Value, text: &str, to: &DataType) -> Result<f64> {
        text.trim()
            .parse::<f64>()
            .map_err(|_| Self::failure(value, to))
    }
}

impl Default for BasicParser {
    fn default() -> Self {
        Self::new()
    }
}

impl ValueParser for BasicParser {
    fn input_types(&self) -> Vec<DataType> {
        self.inputs.clone()
    }
    fn output_types(&self) -> Vec<DataType> {
        self.outputs.clone()
    }
    fn convert(&self, value: &Value, to: &DataType) -> Result<Value> {
        // a null converts to the null of the target type
        let Some(payload) = value.payload() else {
            return Ok(Value::null(to.clone()));
        };
        if value.data_type() == to {
            return Ok(value.clone());
        }
        // the display form serves every source type
        if to == &*STRING {
            return Ok(Value::string(value.to_string()));
        }
        match (payload, to.name()) {
            (Payload::String(s), "Integer") => {
                Ok(Value::integer(Self::numeric(value, s, to)? as i32))
            }
            (Payload::String(s), "Long") => Ok(Value::long(Self::numeric(value, s, to)? as i64)),
            (Payload::String(s), "Double") => Ok(Value::double(Self::numeric(value, s, to)?)),
            (Payload::String(s), "Number") => Ok(Value::number(Self::numeric(value, s, to)?)),
            (Payload::String(s), "Boolean") => {
                let trimmed = s.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Value::boolean(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Value::boolean(false))
                } else {
                    Err(Self::failure(value, to))
                }
            }
            (Payload::String(s), "ExtraBoolean") => {
                let trimmed = s.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Value::extra_boolean(ExtraBoolean::ExtraTrue))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Value::extra_boolean(ExtraBoolean::ExtraFalse))
                } else {
                    Err(Self::failure(value, to))
                }
            }
            (Payload::String(s), "Date") => {
                let trimmed = s.trim();
                if !DATE_SHAPE.is_match(trimmed) {
                    return Err(Self::failure(value, to));
                }
                NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
                    .map(Value::date)
                    .map_err(|_| Self::failure(value, to))
            }
            (Payload::String(s), "DateTime") => {
                let trimmed = s.trim();
                if !DATETIME_SHAPE.is_match(trimmed) {
                    return Err(Self::failure(value, to));
                }
                let normalized = trimmed.replace('T', " ");
                NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%d %H:%M:%S")
                    .map(Value::datetime)
                    .map_err(|_| Self::failure(value, to))
            }
            (Payload::Integer(i), "Long") => Ok(Value::long(i64::from(*i))),
            (Payload::Integer(i), "Double") => Ok(Value::double(f64::from(*i))),
            (Payload::Long(l), "Integer") => Ok(Value::integer(*l as i32)),
            (Payload::Long(l), "Double") => Ok(Value::double(*l as f64)),
            // truncation toward zero
            (Payload::Double(d), "Integer") => Ok(Value::integer(*d as i32)),
            (Payload::Double(d), "Long") => Ok(Value::long(*d as i64)),
            // a numeric payload is already consistent with NUMBER; retag it
            (Payload::Integer(_), "Number")
            | (Payload::Long(_), "Number")
            | (Payload::Double(_), "Number") => Ok(Value::tagged(payload.clone(), NUMBER.clone())),
            // and back: a NUMBER-tagged payload whose shape already matches
            // the concrete target retags without a cast
            (Payload::Integer(_), "Integer") => {
                Ok(Value::tagged(payload.clone(), INTEGER.clone()))
            }
            (Payload::Long(_), "Long") => Ok(Value::tagged(payload.clone(), LONG.clone())),
            (Payload::Double(_), "Double") => Ok(Value::tagged(payload.clone(), DOUBLE.clone())),
            (Payload::Boolean(b), "ExtraBoolean") => {
                Ok(Value::extra_boolean(ExtraBoolean::from_boolean(*b)))
            }
            (Payload::Extra(e), "Boolean") => Ok(Value::boolean(e.to_boolean())),
            (Payload::Date(d), "DateTime") => Ok(Value::datetime(d.and_time(NaiveTime::MIN))),
            (Payload::DateTime(dt), "Date") => Ok(Value::date(dt.date())),
            _ => Err(Self::failure(value, to)),
        }
    }
}
