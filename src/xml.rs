//! A small streaming XML layer: a pull-based event cursor over UTF-8 input
//! and a matching emitter. It covers exactly the subset the instruction
//! stream format uses, and is deliberately lenient about element names so
//! that identifiers such as `#q1w2` can serve as names.

use std::io::{BufRead, Write};

use crate::error::{RecastError, Result};

/// An event yielded by the [`XmlCursor`], in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlEvent {
    Start(String),
    Text(String),
    End(String),
}

/// Pull-based cursor over an XML document.
///
/// Declarations and comments are skipped, CDATA sections and the basic
/// entities are decoded, attributes inside start tags are ignored and
/// self-closing elements yield a start immediately followed by an end.
pub struct XmlCursor {
    chars: Vec<char>,
    position: usize,
    // queued end event for a self-closed element
    queued: Option<XmlEvent>,
}

impl XmlCursor {
    pub fn new(mut source: impl BufRead) -> Result<Self> {
        let mut content = String::new();
        source.read_to_string(&mut content)?;
        Ok(Self::from_str(&content))
    }
    pub fn from_str(content: &str) -> Self {
        Self {
            chars: content.chars().collect(),
            position: 0,
            queued: None,
        }
    }
    fn starts_with(&self, prefix: &str) -> bool {
        prefix
            .chars()
            .enumerate()
            .all(|(i, c)| self.chars.get(self.position + i) == Some(&c))
    }
    fn skip_past(&mut self, terminator: &str) -> Result<()> {
        while self.position < self.chars.len() {
            if self.starts_with(terminator) {
                self.position += terminator.chars().count();
                return Ok(());
            }
            self.position += 1;
        }
        Err(RecastError::Format {
            message: format!("unterminated markup, expected {:?}", terminator),
            line: None,
        })
    }
    fn take_until(&mut self, terminator: &str) -> Result<String> {
        let mut taken = String::new();
        while self.position < self.chars.len() {
            if self.starts_with(terminator) {
                self.position += terminator.chars().count();
                return Ok(taken);
            }
            taken.push(self.chars[self.position]);
            self.position += 1;
        }
        Err(RecastError::Format {
            message: format!("unterminated markup, expected {:?}", terminator),
            line: None,
        })
    }
    fn decode(text: &str) -> String {
        text.replace("&lt;", "<")
            .replace("&gt;", ">")
            .replace("&quot;", "\"")
            .replace("&apos;", "'")
            .replace("&amp;", "&")
    }
    /// The next event, or `None` at end of input. Whitespace-only character
    /// data between elements is not reported.
    pub fn next_event(&mut self) -> Result<Option<XmlEvent>> {
        if let Some(queued) = self.queued.take() {
            return Ok(Some(queued));
        }
        loop {
            if self.position >= self.chars.len() {
                return Ok(None);
            }
            if self.starts_with("<?") {
                self.skip_past("?>")?;
            } else if self.starts_with("<!--") {
                self.skip_past("-->")?;
            } else if self.starts_with("<![CDATA[") {
                self.position += "<![CDATA[".chars().count();
                let data = self.take_until("]]>")?;
                return Ok(Some(XmlEvent::Text(data)));
            } else if self.starts_with("</") {
                self.position += 2;
                let name = self.take_until(">")?;
                return Ok(Some(XmlEvent::End(name.trim().to_owned())));
            } else if self.starts_with("<") {
                self.position += 1;
                let tag = self.take_until(">")?;
                let self_closing = tag.ends_with('/');
                let tag = tag.trim_end_matches('/');
                // attributes, if any, are ignored
                let name = tag
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_owned();
                if name.is_empty() {
                    return Err(RecastError::Format {
                        message: String::from("element with empty name"),
                        line: None,
                    });
                }
                if self_closing {
                    self.queued = Some(XmlEvent::End(name.clone()));
                }
                return Ok(Some(XmlEvent::Start(name)));
            } else {
                let mut text = String::new();
                while self.position < self.chars.len() && !self.starts_with("<") {
                    text.push(self.chars[self.position]);
                    self.position += 1;
                }
                if !text.trim().is_empty() {
                    return Ok(Some(XmlEvent::Text(Self::decode(text.trim()))));
                }
            }
        }
    }
}

/// Writes the same subset of XML the cursor reads.
pub struct XmlEmitter<'a, W: Write> {
    out: &'a mut W,
    depth: usize,
}

impl<'a, W: Write> XmlEmitter<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self { out, depth: 0 }
    }
    fn indent(&mut self) -> Result<()> {
        for _ in 0..self.depth {
            write!(self.out, "  ")?;
        }
        Ok(())
    }
    pub fn start(&mut self, name: &str) -> Result<()> {
        self.indent()?;
        writeln!(self.out, "<{}>", name)?;
        self.depth += 1;
        Ok(())
    }
    pub fn cdata(&mut self, data: &str) -> Result<()> {
        self.indent()?;
        writeln!(self.out, "<![CDATA[{}]]>", data)?;
        Ok(())
    }
    pub fn end(&mut self, name: &str) -> Result<()> {
        self.depth = self.depth.saturating_sub(1);
        self.indent()?;
        writeln!(self.out, "</{}>", name)?;
        Ok(())
    }
}
