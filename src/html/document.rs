//! Span-preserving structure of an HTML page
//!
//! This is not a conforming HTML parser. It finds elements, attributes and
//! their byte ranges in the source so that edits can be expressed as
//! splices over known nodes. Nothing is ever re-serialized: every byte a
//! splice does not cover is copied through untouched.

use std::ops::Range;
use tracing::debug;

/// Byte range into the source text
pub type Span = Range<usize>;

/// Elements that never have content or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose content is raw text up to the matching closing tag
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "textarea", "title"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// Lowercased attribute name
    pub name: String,
    /// Raw value without quotes; `None` for a bare attribute
    pub value: Option<String>,
    /// From the first byte of the name to the last byte of the value
    pub span: Span,
}

#[derive(Debug, Clone)]
pub struct Element {
    /// Lowercased tag name
    pub tag: String,
    pub attrs: Vec<Attr>,
    /// The start tag, `<` through `>`
    pub open: Span,
    /// Everything between the start tag and the end tag
    pub inner: Span,
    /// Start tag through end tag
    pub outer: Span,
    /// End of the tag name inside the start tag
    name_end: usize,
    pub parent: Option<usize>,
    pub children: Vec<usize>,
    /// Whether an explicit end tag (or void/self-closing form) was found
    pub closed: bool,
}

impl Element {
    pub fn attr(&self, name: &str) -> Option<&Attr> {
        self.attrs.iter().find(|a| a.name == name)
    }

    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(|a| a.value.as_deref())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr_value("class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }

    /// Where a new attribute can be inserted in the start tag
    pub fn attr_insert_point(&self) -> usize {
        self.attrs.last().map_or(self.name_end, |a| a.span.end)
    }
}

/// Parsed element tree over a borrowed source
pub struct Document<'a> {
    source: &'a str,
    elements: Vec<Element>,
}

impl<'a> Document<'a> {
    pub fn parse(source: &'a str) -> Self {
        Parser::new(source).run()
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn element(&self, index: usize) -> &Element {
        &self.elements[index]
    }

    pub fn slice(&self, span: Span) -> &'a str {
        &self.source[span]
    }

    /// First element matching `pred`, in document order
    pub fn find(&self, pred: impl Fn(&Element) -> bool) -> Option<usize> {
        self.elements.iter().position(pred)
    }

    /// First element carrying the given `id`
    pub fn find_by_id(&self, id: &str) -> Option<usize> {
        self.find(|e| e.attr_value("id") == Some(id))
    }

    /// All elements below `index`, in document order
    pub fn descendants(&self, index: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = self.elements[index].children.iter().rev().copied().collect();
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.elements[next].children.iter().rev().copied());
        }
        out
    }

    /// Raw text content of a closed element that has no child elements
    pub fn text_of(&self, index: usize) -> Option<&'a str> {
        let element = &self.elements[index];
        if element.closed && element.children.is_empty() {
            Some(&self.source[element.inner.clone()])
        } else {
            None
        }
    }
}

struct Parser<'a> {
    source: &'a str,
    pos: usize,
    elements: Vec<Element>,
    open: Vec<usize>,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            elements: Vec::new(),
            open: Vec::new(),
        }
    }

    fn run(mut self) -> Document<'a> {
        while let Some(offset) = self.source[self.pos..].find('<') {
            let start = self.pos + offset;
            let rest = &self.source[start..];

            if rest.starts_with("<!--") {
                self.pos = self.skip_past(start + 4, "-->");
            } else if rest.starts_with("<!") || rest.starts_with("<?") {
                self.pos = self.skip_past(start + 2, ">");
            } else if rest.starts_with("</") {
                self.end_tag(start);
            } else if rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
                self.start_tag(start);
            } else {
                self.pos = start + 1;
            }
        }

        let len = self.source.len();
        while let Some(index) = self.open.pop() {
            self.finish(index, len, len, false);
        }

        Document {
            source: self.source,
            elements: self.elements,
        }
    }

    /// Position just after `needle`, or end of input
    fn skip_past(&self, from: usize, needle: &str) -> usize {
        self.source[from..]
            .find(needle)
            .map_or(self.source.len(), |i| from + i + needle.len())
    }

    fn name_at(&self, from: usize) -> (String, usize) {
        let end = self.source[from..]
            .find(|c: char| c.is_ascii_whitespace() || c == '>' || c == '/')
            .map_or(self.source.len(), |i| from + i);
        (self.source[from..end].to_ascii_lowercase(), end)
    }

    fn finish(&mut self, index: usize, inner_end: usize, outer_end: usize, closed: bool) {
        let element = &mut self.elements[index];
        element.inner.end = inner_end;
        element.outer.end = outer_end;
        element.closed = closed;
    }

    fn end_tag(&mut self, start: usize) {
        let (name, _) = self.name_at(start + 2);
        let end = self.skip_past(start + 2, ">");
        self.pos = end;

        let Some(depth) = self
            .open
            .iter()
            .rposition(|&i| self.elements[i].tag == name)
        else {
            debug!(tag = %name, offset = start, "stray end tag");
            return;
        };
        // anything opened after the match was never closed explicitly
        while self.open.len() > depth + 1 {
            if let Some(index) = self.open.pop() {
                self.finish(index, start, start, false);
            }
        }
        if let Some(index) = self.open.pop() {
            self.finish(index, start, end, true);
        }
    }

    fn start_tag(&mut self, start: usize) {
        let (tag, name_end) = self.name_at(start + 1);
        let (attrs, open_end, self_closing) = self.attributes(name_end);
        self.pos = open_end;

        let parent = self.open.last().copied();
        let index = self.elements.len();
        self.elements.push(Element {
            tag: tag.clone(),
            attrs,
            open: start..open_end,
            inner: open_end..open_end,
            outer: start..open_end,
            name_end,
            parent,
            children: Vec::new(),
            closed: false,
        });
        if let Some(p) = parent {
            self.elements[p].children.push(index);
        }

        if self_closing || VOID_ELEMENTS.contains(&tag.as_str()) {
            self.elements[index].closed = true;
        } else if RAW_TEXT_ELEMENTS.contains(&tag.as_str()) {
            let close = format!("</{tag}");
            let lower = self.source[open_end..].to_ascii_lowercase();
            match lower.find(&close) {
                Some(i) => {
                    let inner_end = open_end + i;
                    let end = self.skip_past(inner_end, ">");
                    self.finish(index, inner_end, end, true);
                    self.pos = end;
                }
                None => {
                    let len = self.source.len();
                    self.finish(index, len, len, false);
                    self.pos = len;
                }
            }
        } else {
            self.open.push(index);
        }
    }

    /// Parse attributes up to the end of the start tag.
    ///
    /// Returns the attributes, the position after `>`, and whether the tag
    /// ended with `/>`.
    fn attributes(&self, from: usize) -> (Vec<Attr>, usize, bool) {
        let bytes = self.source.as_bytes();
        let len = bytes.len();
        let mut attrs = Vec::new();
        let mut i = from;

        loop {
            while i < len && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i >= len {
                return (attrs, len, false);
            }
            match bytes[i] {
                b'>' => return (attrs, i + 1, false),
                b'/' if bytes.get(i + 1) == Some(&b'>') => return (attrs, i + 2, true),
                b'/' => {
                    i += 1;
                    continue;
                }
                _ => {}
            }

            let name_start = i;
            while i < len
                && !bytes[i].is_ascii_whitespace()
                && !matches!(bytes[i], b'=' | b'>' | b'/')
            {
                i += 1;
            }
            // a lone `=` would otherwise never advance
            if i == name_start {
                i += 1;
                continue;
            }
            let name = self.source[name_start..i].to_ascii_lowercase();

            let mut j = i;
            while j < len && bytes[j].is_ascii_whitespace() {
                j += 1;
            }
            if j >= len || bytes[j] != b'=' {
                attrs.push(Attr {
                    name,
                    value: None,
                    span: name_start..i,
                });
                continue;
            }
            j += 1;
            while j < len && bytes[j].is_ascii_whitespace() {
                j += 1;
            }

            let (value, end) = match bytes.get(j) {
                Some(&quote @ (b'"' | b'\'')) => {
                    let value_start = j + 1;
                    let value_end = self.source[value_start..]
                        .find(quote as char)
                        .map_or(len, |k| value_start + k);
                    (
                        self.source[value_start..value_end].to_string(),
                        (value_end + 1).min(len),
                    )
                }
                _ => {
                    let value_end = self.source[j..]
                        .find(|c: char| c.is_ascii_whitespace() || c == '>')
                        .map_or(len, |k| j + k);
                    (self.source[j..value_end].to_string(), value_end)
                }
            };
            attrs.push(Attr {
                name,
                value: Some(value),
                span: name_start..end,
            });
            i = end;
        }
    }
}

/// Collected replacements over one source text
#[derive(Debug, Default)]
pub struct Rewriter {
    splices: Vec<(Span, String)>,
}

impl Rewriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, span: Span, text: impl Into<String>) {
        self.splices.push((span, text.into()));
    }

    pub fn insert(&mut self, at: usize, text: impl Into<String>) {
        self.replace(at..at, text);
    }

    /// Apply every splice that lies inside `within` and return that range
    /// of the source with the splices in place.
    ///
    /// A splice overlapping one that starts earlier is dropped.
    pub fn render(&self, source: &str, within: Span) -> String {
        let mut splices: Vec<&(Span, String)> = self
            .splices
            .iter()
            .filter(|(span, _)| span.start >= within.start && span.end <= within.end)
            .collect();
        splices.sort_by_key(|(span, _)| (span.start, span.end));

        let mut out = String::with_capacity(within.len());
        let mut cursor = within.start;
        for (span, text) in splices {
            if span.start < cursor {
                debug!(?span, "dropping overlapping splice");
                continue;
            }
            out.push_str(&source[cursor..span.start]);
            out.push_str(text);
            cursor = span.end;
        }
        out.push_str(&source[cursor..within.end]);
        out
    }

    pub fn apply(&self, source: &str) -> String {
        self.render(source, 0..source.len())
    }
}
