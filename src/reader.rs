use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::construct::{Builder, Constructable};
use crate::error::{RecastError, Result};
use crate::identity::ID_INDICATOR;
use crate::xml::{XmlCursor, XmlEvent};

/// Default marker for an ambient instruction line.
pub const INSTRUCTION_INDICATOR: &str = "%CHECK:";

// ------------- TextReader -------------
/// Turns a stream of text lines into builder instructions.
///
/// A line starting with the id indicator creates an object; any other line is
/// split at its first `=` into a key and a value, and the value's own leading
/// id indicator decides between link and attribute. Blank lines, and comment
/// lines when a comment indicator is configured, are skipped. Instruction
/// lines are honored only in the instructor variant.
pub struct TextReader {
    comment_indicator: Option<String>,
    instruction_indicator: String,
    instructor: bool,
}

impl TextReader {
    pub fn new() -> Self {
        Self {
            comment_indicator: None,
            instruction_indicator: String::from(INSTRUCTION_INDICATOR),
            instructor: false,
        }
    }
    /// Lines starting with `indicator` are skipped before dispatch.
    pub fn with_comment_indicator(mut self, indicator: &str) -> Self {
        self.comment_indicator = Some(indicator.to_owned());
        self
    }
    pub fn with_instruction_indicator(mut self, indicator: &str) -> Self {
        self.instruction_indicator = indicator.to_owned();
        self
    }
    /// Enables ambient instruction lines.
    pub fn instructor(mut self) -> Self {
        self.instructor = true;
        self
    }
    pub fn read<T: Constructable>(
        &self,
        source: impl BufRead,
        builder: &mut Builder<T>,
    ) -> Result<()> {
        for (number, line) in source.lines().enumerate() {
            let line = line?;
            let line = line.trim();
            self.dispatch(line, number + 1, builder)?;
        }
        debug!(constructs = builder.len(), "text read complete");
        Ok(())
    }
    pub fn read_str<T: Constructable>(&self, content: &str, builder: &mut Builder<T>) -> Result<()> {
        for (number, line) in content.lines().enumerate() {
            self.dispatch(line.trim(), number + 1, builder)?;
        }
        debug!(constructs = builder.len(), "text read complete");
        Ok(())
    }
    /// Reads a file; failure to open it surfaces as the underlying I/O error.
    pub fn read_file<T: Constructable>(
        &self,
        path: impl AsRef<Path>,
        builder: &mut Builder<T>,
    ) -> Result<()> {
        let file = File::open(path)?;
        self.read(BufReader::new(file), builder)
    }
    fn dispatch<T: Constructable>(
        &self,
        line: &str,
        number: usize,
        builder: &mut Builder<T>,
    ) -> Result<()> {
        if line.is_empty() {
            return Ok(());
        }
        if let Some(comment) = &self.comment_indicator {
            if line.starts_with(comment.as_str()) {
                return Ok(());
            }
        }
        if line.starts_with(ID_INDICATOR) {
            builder.create(line)?;
            return Ok(());
        }
        if self.instructor {
            if let Some(rest) = line.strip_prefix(self.instruction_indicator.as_str()) {
                builder.set_instruction(rest.trim());
                return Ok(());
            }
        }
        let Some((key, value)) = line.split_once('=') else {
            return Err(RecastError::Format {
                message: format!("missing '=' in {:?}", line),
                line: Some(number),
            });
        };
        if value.is_empty() {
            return Err(RecastError::Format {
                message: format!("empty value in {:?}", line),
                line: Some(number),
            });
        }
        if value.starts_with(ID_INDICATOR) {
            builder.add_link(key, value)?;
        } else {
            builder.add_attribute(key, value)?;
        }
        Ok(())
    }
}

impl Default for TextReader {
    fn default() -> Self {
        Self::new()
    }
}

// ------------- XmlReader -------------
/// Turns an XML document into builder instructions, mirroring the text
/// format: the root element is skipped, its id-named children open objects
/// and their children carry attribute or link values as character data.
pub struct XmlReader {
    instructor: bool,
}

impl XmlReader {
    pub fn new() -> Self {
        Self { instructor: false }
    }
    /// Treats non-id elements directly under the root as ambient instruction
    /// carriers instead of rejecting them.
    pub fn instructor(mut self) -> Self {
        self.instructor = true;
        self
    }
    pub fn read<T: Constructable>(
        &self,
        source: impl BufRead,
        builder: &mut Builder<T>,
    ) -> Result<()> {
        let cursor = XmlCursor::new(source)?;
        self.drive(cursor, builder)
    }
    pub fn read_str<T: Constructable>(&self, content: &str, builder: &mut Builder<T>) -> Result<()> {
        self.drive(XmlCursor::from_str(content), builder)
    }
    pub fn read_file<T: Constructable>(
        &self,
        path: impl AsRef<Path>,
        builder: &mut Builder<T>,
    ) -> Result<()> {
        let file = File::open(path)?;
        self.read(BufReader::new(file), builder)
    }
    fn drive<T: Constructable>(&self, mut cursor: XmlCursor, builder: &mut Builder<T>) -> Result<()> {
        let mut depth = 0usize;
        // the currently open attribute/link element, with a consumed flag
        let mut attribute: Option<(String, bool)> = None;
        let mut instruction_element = false;
        while let Some(event) = cursor.next_event()? {
            match event {
                XmlEvent::Start(name) => {
                    depth += 1;
                    match depth {
                        1 => {} // root is skipped
                        2 => {
                            if name.starts_with(ID_INDICATOR) {
                                builder.create(&name)?;
                            } else if self.instructor {
                                instruction_element = true;
                            } else {
                                return Err(RecastError::Format {
                                    message: format!(
                                        "unexpected element {:?} outside an object",
                                        name
                                    ),
                                    line: None,
                                });
                            }
                        }
                        3 => attribute = Some((name, false)),
                        _ => {
                            return Err(RecastError::Format {
                                message: format!("element {:?} nested too deeply", name),
                                line: None,
                            });
                        }
                    }
                }
                XmlEvent::Text(data) => {
                    if let Some((name, consumed)) = attribute.as_mut() {
                        if data.starts_with(ID_INDICATOR) {
                            builder.add_link(name, &data)?;
                        } else {
                            builder.add_attribute(name, &data)?;
                        }
                        *consumed = true;
                    } else if instruction_element {
                        builder.set_instruction(&data);
                    } else {
                        return Err(RecastError::Format {
                            message: format!(
                                "character data {:?} with no open attribute element",
                                data
                            ),
                            line: None,
                        });
                    }
                }
                XmlEvent::End(_) => {
                    if depth == 3 {
                        // an element without character data is an empty attribute
                        if let Some((name, consumed)) = attribute.take() {
                            if !consumed {
                                builder.add_attribute(&name, "")?;
                            }
                        }
                    }
                    if depth == 2 {
                        instruction_element = false;
                    }
                    depth = depth.saturating_sub(1);
                }
            }
        }
        debug!(constructs = builder.len(), "xml read complete");
        Ok(())
    }
}

impl Default for XmlReader {
    fn default() -> Self {
        Self::new()
    }
}
