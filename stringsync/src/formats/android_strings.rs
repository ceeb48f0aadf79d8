//! Support for the Android `strings.xml` resource format.
//!
//! `<string>` and `<plurals>` children of the root are parsed into typed nodes.
//! Everything else directly under the root (`<string-array>`, `<integer>`,
//! comments, ...) is carried through verbatim, so a document that is read and
//! written back without edits only changes in whitespace between entries.
//!
//! Entry text is held in markup form: character data unescaped, inline elements
//! such as `<b>` or `<xliff:g>` kept as tags. Text set through [`StringResource::new`]
//! or [`PluralItem::new`] is written back as markup when it is a well-formed
//! fragment containing elements, and as escaped plain text otherwise.

use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::{
    collections::HashSet,
    io::{BufRead, Write},
};
use tracing::{debug, warn};

use crate::{
    error::Error,
    traits::Parser,
    types::{EntryKind, PluralCategory},
};

const INDENT: &str = "  ";

/// An Android resource document: the root element and its children in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Format {
    pub root_name: String,
    pub root_attributes: Vec<(String, String)>,
    pub nodes: Vec<Node>,
}

/// One child of the root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    String(StringResource),
    Plurals(PluralsResource),
    /// Any other element, or stray text under the root, kept as the exact markup
    /// it was read from.
    Other(String),
    /// Comment content (without the `<!--`/`-->` delimiters).
    Comment(String),
}

impl Node {
    pub fn name(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(&s.name),
            Node::Plurals(p) => Some(&p.name),
            Node::Other(_) | Node::Comment(_) => None,
        }
    }

    pub fn kind(&self) -> Option<EntryKind> {
        match self {
            Node::String(_) => Some(EntryKind::Singular),
            Node::Plurals(_) => Some(EntryKind::Plural),
            Node::Other(_) | Node::Comment(_) => None,
        }
    }
}

/// Whether [`Format::upsert`] added a new entry or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Added,
    Replaced,
}

impl Default for Format {
    fn default() -> Self {
        Self::new()
    }
}

impl Format {
    /// An empty `<resources>` document.
    pub fn new() -> Self {
        Format {
            root_name: "resources".to_string(),
            root_attributes: Vec::new(),
            nodes: Vec::new(),
        }
    }

    /// All `<string>` entries, in document order.
    pub fn strings(&self) -> impl Iterator<Item = &StringResource> {
        self.nodes.iter().filter_map(|node| match node {
            Node::String(s) => Some(s),
            _ => None,
        })
    }

    /// All `<plurals>` entries, in document order.
    pub fn plurals(&self) -> impl Iterator<Item = &PluralsResource> {
        self.nodes.iter().filter_map(|node| match node {
            Node::Plurals(p) => Some(p),
            _ => None,
        })
    }

    pub fn string_names(&self) -> HashSet<&str> {
        self.strings().map(|s| s.name.as_str()).collect()
    }

    pub fn plural_names(&self) -> HashSet<&str> {
        self.plurals().map(|p| p.name.as_str()).collect()
    }

    /// Number of `<string>` and `<plurals>` entries.
    pub fn entry_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.kind().is_some()).count()
    }

    /// Looks up a string by name. With duplicate names the last one wins.
    pub fn find_string(&self, name: &str) -> Option<&StringResource> {
        self.strings().filter(|s| s.name == name).last()
    }

    /// Looks up a plurals group by name. With duplicate names the last one wins.
    pub fn find_plurals(&self, name: &str) -> Option<&PluralsResource> {
        self.plurals().filter(|p| p.name == name).last()
    }

    /// Removes every entry for which `keep` returns false and returns what was removed,
    /// in document order. Comments and unknown elements are always kept.
    pub fn retain_entries<F>(&mut self, mut keep: F) -> Vec<(EntryKind, String)>
    where
        F: FnMut(EntryKind, &str) -> bool,
    {
        let mut removed = Vec::new();
        self.nodes.retain(|node| match (node.kind(), node.name()) {
            (Some(kind), Some(name)) if !keep(kind, name) => {
                removed.push((kind, name.to_string()));
                false
            }
            _ => true,
        });
        removed
    }

    /// Inserts `node` or replaces the entry that already carries its name.
    ///
    /// The first entry with that name (of either kind) is replaced in place and any
    /// later duplicates are dropped; otherwise the node is appended.
    pub fn upsert(&mut self, node: Node) -> Upsert {
        let Some(name) = node.name().map(str::to_string) else {
            self.nodes.push(node);
            return Upsert::Added;
        };

        let mut positions = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.name() == Some(name.as_str()))
            .map(|(i, _)| i)
            .collect::<Vec<_>>();

        if positions.is_empty() {
            self.nodes.push(node);
            return Upsert::Added;
        }

        let first = positions.remove(0);
        for idx in positions.into_iter().rev() {
            self.nodes.remove(idx);
        }
        self.nodes[first] = node;
        Upsert::Replaced
    }
}

/// A `<string name="...">` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringResource {
    pub name: String,
    /// Remaining attributes (`translatable`, `formatted`, `tools:*`, ...) in document order.
    pub attributes: Vec<(String, String)>,
    value: String,
    raw: Option<String>,
}

impl StringResource {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        let value = value.into();
        StringResource {
            name: name.into(),
            attributes: Vec::new(),
            raw: markup_raw(&value),
            value,
        }
    }

    /// The unescaped text. Inline markup such as `<b>` or `<xliff:g>` is kept as markup.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.raw = markup_raw(&self.value);
    }
}

/// A `<plurals name="...">` group.
///
/// A group read from a document keeps its body as written (comments, item
/// attributes, items with non-CLDR quantities) until its items are replaced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralsResource {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    items: Vec<PluralItem>,
    body: Option<String>,
}

impl PluralsResource {
    pub fn new(name: impl Into<String>, items: impl IntoIterator<Item = PluralItem>) -> Self {
        PluralsResource {
            name: name.into(),
            attributes: Vec::new(),
            items: items.into_iter().collect(),
            body: None,
        }
    }

    /// Items with a recognised quantity, in document order.
    pub fn items(&self) -> &[PluralItem] {
        &self.items
    }

    pub fn set_items(&mut self, items: impl IntoIterator<Item = PluralItem>) {
        self.items = items.into_iter().collect();
        self.body = None;
    }
}

/// One `<item quantity="...">` of a plurals group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluralItem {
    pub quantity: PluralCategory,
    /// Attributes other than `quantity`, in document order.
    pub attributes: Vec<(String, String)>,
    value: String,
    raw: Option<String>,
}

impl PluralItem {
    pub fn new(quantity: PluralCategory, value: impl Into<String>) -> Self {
        let value = value.into();
        PluralItem {
            quantity,
            attributes: Vec::new(),
            raw: markup_raw(&value),
            value,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Parser for Format {
    /// Parse from any reader.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut xml_reader = Reader::from_reader(reader);

        let mut buf = Vec::new();
        let mut root: Option<(String, Vec<(String, String)>)> = None;
        let mut root_closed = false;
        let mut nodes = Vec::new();

        loop {
            let event = xml_reader.read_event_into(&mut buf)?;
            match event {
                Event::Eof => break,
                Event::Start(_) | Event::Empty(_) if root_closed => {
                    return Err(Error::InvalidResource(
                        "document has more than one root element".to_string(),
                    ));
                }
                Event::Start(ref e) if root.is_none() => {
                    root = Some(parse_element_header(e)?);
                }
                Event::Empty(ref e) if root.is_none() => {
                    root = Some(parse_element_header(e)?);
                    root_closed = true;
                }
                Event::Start(ref e) => match e.name().as_ref() {
                    b"string" => {
                        let (name, attributes) = parse_named_header(e, "string")?;
                        let inner = read_inner(&mut xml_reader, e.name().as_ref())?;
                        nodes.push(Node::String(StringResource {
                            name,
                            attributes,
                            value: inner.text,
                            raw: Some(inner.raw),
                        }));
                    }
                    b"plurals" => {
                        let (name, attributes) = parse_named_header(e, "plurals")?;
                        let inner = read_inner(&mut xml_reader, b"plurals")?;
                        let items = parse_plural_items(&name, &inner.raw)?;
                        nodes.push(Node::Plurals(PluralsResource {
                            name,
                            attributes,
                            items,
                            body: Some(inner.raw),
                        }));
                    }
                    _ => {
                        let inner = read_inner(&mut xml_reader, e.name().as_ref())?;
                        let tag = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        nodes.push(Node::Other(format!(
                            "<{}>{}</{}>",
                            String::from_utf8_lossy(e),
                            inner.raw,
                            tag
                        )));
                    }
                },
                Event::Empty(ref e) => match e.name().as_ref() {
                    b"string" => {
                        let (name, attributes) = parse_named_header(e, "string")?;
                        nodes.push(Node::String(StringResource {
                            name,
                            attributes,
                            value: String::new(),
                            raw: None,
                        }));
                    }
                    b"plurals" => {
                        let (name, attributes) = parse_named_header(e, "plurals")?;
                        nodes.push(Node::Plurals(PluralsResource {
                            name,
                            attributes,
                            items: Vec::new(),
                            body: None,
                        }));
                    }
                    _ => nodes.push(Node::Other(format!("<{}/>", String::from_utf8_lossy(e)))),
                },
                Event::End(_) => root_closed = true,
                Event::Comment(ref c) if root.is_some() && !root_closed => {
                    nodes.push(Node::Comment(String::from_utf8_lossy(c).into_owned()));
                }
                Event::Text(ref t) if root.is_some() && !root_closed => {
                    let raw = String::from_utf8_lossy(t);
                    let stray = raw.trim();
                    if !stray.is_empty() {
                        debug!(text = stray, "keeping stray text under the root element");
                        nodes.push(Node::Other(stray.to_string()));
                    }
                }
                // Declaration, doctype, processing instructions, whitespace between entries.
                _ => {}
            }
            buf.clear();
        }

        let Some((root_name, root_attributes)) = root else {
            return Err(Error::InvalidResource(
                "document has no root element".to_string(),
            ));
        };
        if !root_closed {
            return Err(Error::InvalidResource(format!(
                "root element <{}> is never closed",
                root_name
            )));
        }

        Ok(Format {
            root_name,
            root_attributes,
            nodes,
        })
    }

    /// Write to any writer (file, memory, etc.).
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        let mut xml_writer = Writer::new(&mut writer);

        xml_writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        write_newline(&mut xml_writer, 0)?;

        let mut root_start = BytesStart::new(self.root_name.as_str());
        for (key, value) in &self.root_attributes {
            root_start.push_attribute((key.as_str(), value.as_str()));
        }

        if self.nodes.is_empty() {
            xml_writer.write_event(Event::Empty(root_start))?;
            write_newline(&mut xml_writer, 0)?;
            return Ok(());
        }

        xml_writer.write_event(Event::Start(root_start))?;
        for node in &self.nodes {
            write_newline(&mut xml_writer, 1)?;
            match node {
                Node::String(sr) => write_string(&mut xml_writer, sr)?,
                Node::Plurals(pr) => write_plurals(&mut xml_writer, pr)?,
                Node::Other(raw) => {
                    xml_writer.write_event(Event::Text(BytesText::from_escaped(raw.as_str())))?
                }
                Node::Comment(text) => {
                    xml_writer.write_event(Event::Comment(BytesText::from_escaped(text.as_str())))?
                }
            }
        }
        write_newline(&mut xml_writer, 0)?;
        xml_writer.write_event(Event::End(BytesEnd::new(self.root_name.as_str())))?;
        write_newline(&mut xml_writer, 0)?;
        Ok(())
    }
}

fn write_newline<W: Write>(xml_writer: &mut Writer<W>, level: usize) -> Result<(), Error> {
    let text = format!("\n{}", INDENT.repeat(level));
    xml_writer.write_event(Event::Text(BytesText::from_escaped(text)))?;
    Ok(())
}

fn start_tag<'a>(tag: &'a str, name: &'a str, attributes: &'a [(String, String)]) -> BytesStart<'a> {
    let mut elem = BytesStart::new(tag);
    elem.push_attribute(("name", name));
    for (key, value) in attributes {
        elem.push_attribute((key.as_str(), value.as_str()));
    }
    elem
}

/// Escapes only `&`, `<` and `>`; quotes stay literal in element text.
fn text_content(value: &str) -> BytesText<'_> {
    BytesText::from_escaped(quick_xml::escape::partial_escape(value))
}

fn write_string<W: Write>(xml_writer: &mut Writer<W>, sr: &StringResource) -> Result<(), Error> {
    xml_writer.write_event(Event::Start(start_tag("string", &sr.name, &sr.attributes)))?;
    match &sr.raw {
        Some(raw) => xml_writer.write_event(Event::Text(BytesText::from_escaped(raw.as_str())))?,
        None => xml_writer.write_event(Event::Text(text_content(&sr.value)))?,
    }
    xml_writer.write_event(Event::End(BytesEnd::new("string")))?;
    Ok(())
}

fn write_plurals<W: Write>(xml_writer: &mut Writer<W>, pr: &PluralsResource) -> Result<(), Error> {
    let start = start_tag("plurals", &pr.name, &pr.attributes);
    if let Some(body) = &pr.body {
        xml_writer.write_event(Event::Start(start))?;
        xml_writer.write_event(Event::Text(BytesText::from_escaped(body.as_str())))?;
        xml_writer.write_event(Event::End(BytesEnd::new("plurals")))?;
        return Ok(());
    }
    if pr.items.is_empty() {
        xml_writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    xml_writer.write_event(Event::Start(start))?;
    for item in &pr.items {
        write_newline(xml_writer, 2)?;
        let mut elem = BytesStart::new("item");
        elem.push_attribute(("quantity", item.quantity.as_str()));
        for (key, value) in &item.attributes {
            elem.push_attribute((key.as_str(), value.as_str()));
        }
        xml_writer.write_event(Event::Start(elem))?;
        match &item.raw {
            Some(raw) => {
                xml_writer.write_event(Event::Text(BytesText::from_escaped(raw.as_str())))?
            }
            None => xml_writer.write_event(Event::Text(text_content(&item.value)))?,
        }
        xml_writer.write_event(Event::End(BytesEnd::new("item")))?;
    }
    write_newline(xml_writer, 1)?;
    xml_writer.write_event(Event::End(BytesEnd::new("plurals")))?;
    Ok(())
}

fn parse_element_header(e: &BytesStart) -> Result<(String, Vec<(String, String)>), Error> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes().with_checks(false) {
        let attr = attr?;
        attributes.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            attr.unescape_value()?.into_owned(),
        ));
    }
    Ok((name, attributes))
}

/// Splits the `name` attribute off an entry's start tag.
fn parse_named_header(e: &BytesStart, tag: &str) -> Result<(String, Vec<(String, String)>), Error> {
    let (_, mut attributes) = parse_element_header(e)?;
    let position = attributes
        .iter()
        .position(|(key, _)| key == "name")
        .ok_or_else(|| Error::InvalidResource(format!("{} tag missing 'name'", tag)))?;
    let (_, name) = attributes.remove(position);
    Ok((name, attributes))
}

/// Content between a start tag and its matching end tag.
struct Inner {
    /// Unescaped text with nested elements rendered back as markup.
    text: String,
    /// The exact escaped markup.
    raw: String,
}

fn read_inner<R: BufRead>(xml_reader: &mut Reader<R>, tag: &[u8]) -> Result<Inner, Error> {
    let mut buf = Vec::new();
    let mut raw_writer = Writer::new(Vec::new());
    let mut text = String::new();
    let mut depth = 0usize;

    loop {
        let event = xml_reader.read_event_into(&mut buf)?;
        match &event {
            Event::End(e) if depth == 0 => {
                if e.name().as_ref() != tag {
                    return Err(Error::InvalidResource(format!(
                        "unexpected closing tag </{}>",
                        String::from_utf8_lossy(e.name().as_ref())
                    )));
                }
                break;
            }
            Event::Eof => {
                return Err(Error::InvalidResource(format!(
                    "unexpected EOF inside <{}>",
                    String::from_utf8_lossy(tag)
                )));
            }
            Event::Text(t) => text.push_str(&t.unescape()?),
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(c)),
            Event::Start(e) => {
                depth += 1;
                text.push_str(&format!("<{}>", String::from_utf8_lossy(e)));
            }
            Event::Empty(e) => text.push_str(&format!("<{}/>", String::from_utf8_lossy(e))),
            Event::End(e) => {
                depth -= 1;
                text.push_str(&format!(
                    "</{}>",
                    String::from_utf8_lossy(e.name().as_ref())
                ));
            }
            _ => {}
        }
        raw_writer.write_event(event)?;
        buf.clear();
    }

    Ok(Inner {
        text,
        raw: String::from_utf8_lossy(&raw_writer.into_inner()).into_owned(),
    })
}

/// Items of a plurals group, parsed from the group's raw body.
///
/// Items whose quantity is not a CLDR category are left out here but stay in the
/// body, so they survive a rewrite of the unmodified group.
fn parse_plural_items(plurals: &str, body: &str) -> Result<Vec<PluralItem>, Error> {
    let mut xml_reader = Reader::from_str(body);
    let mut buf = Vec::new();
    let mut items = Vec::new();

    loop {
        let event = xml_reader.read_event_into(&mut buf)?;
        match event {
            Event::Start(ref e) if e.name().as_ref() == b"item" => {
                let header = parse_item_header(plurals, e)?;
                let inner = read_inner(&mut xml_reader, b"item")?;
                if let Some((quantity, attributes)) = header {
                    items.push(PluralItem {
                        quantity,
                        attributes,
                        value: inner.text,
                        raw: Some(inner.raw),
                    });
                }
            }
            Event::Empty(ref e) if e.name().as_ref() == b"item" => {
                if let Some((quantity, attributes)) = parse_item_header(plurals, e)? {
                    items.push(PluralItem {
                        quantity,
                        attributes,
                        value: String::new(),
                        raw: None,
                    });
                }
            }
            Event::Start(ref e) => {
                // Not an <item>; it stays in the body only.
                read_inner(&mut xml_reader, e.name().as_ref())?;
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(items)
}

/// The quantity and remaining attributes of an `<item>`, or `None` when the
/// quantity is not a CLDR category.
fn parse_item_header(
    plurals: &str,
    e: &BytesStart,
) -> Result<Option<(PluralCategory, Vec<(String, String)>)>, Error> {
    let (_, mut attributes) = parse_element_header(e)?;
    let position = attributes
        .iter()
        .position(|(key, _)| key == "quantity")
        .ok_or_else(|| {
            Error::InvalidResource(format!(
                "item tag in plurals '{}' missing 'quantity'",
                plurals
            ))
        })?;
    let (_, quantity) = attributes.remove(position);
    match quantity.parse::<PluralCategory>() {
        Ok(quantity) => Ok(Some((quantity, attributes))),
        Err(_) => {
            warn!(
                plurals,
                %quantity,
                "item with unknown quantity kept verbatim but not treated as translatable"
            );
            Ok(None)
        }
    }
}

/// Raw markup for `value` when it is a well-formed fragment with inline elements.
///
/// `&` always stands for itself in a value, so it is escaped before the check.
/// `None` means the value is plain text and gets escaped on write.
fn markup_raw(value: &str) -> Option<String> {
    if !value.contains('<') {
        return None;
    }
    let raw = value.replace('&', "&amp;");
    is_well_formed_fragment(&raw).then_some(raw)
}

fn is_well_formed_fragment(raw: &str) -> bool {
    let wrapped = format!("<fragment>{}</fragment>", raw);
    let mut xml_reader = Reader::from_str(&wrapped);
    let mut depth = 0usize;
    loop {
        match xml_reader.read_event() {
            Ok(Event::Start(_)) => depth += 1,
            Ok(Event::End(_)) => match depth.checked_sub(1) {
                Some(d) => depth = d,
                None => return false,
            },
            Ok(Event::Eof) => return depth == 0,
            Ok(Event::Decl(_) | Event::PI(_) | Event::DocType(_)) | Err(_) => return false,
            Ok(_) => {}
        }
    }
}
