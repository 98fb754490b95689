//! Namespace-aware XML tree used by the markup sniffers.
//!
//! The tree only keeps what detection needs: qualified element names,
//! attributes and children. Character data is dropped.
//!
//! Namespace prefixes are resolved while parsing, so lookups match on the
//! namespace URI and the local name regardless of the prefix a document
//! chose.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Reasons a blob is not a well-formed XML document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XmlParseError {
    #[error("XML syntax error: {0}")]
    Syntax(String),
    #[error("Undeclared namespace prefix: {0}")]
    UnboundPrefix(String),
    #[error("Unexpected closing tag: {0}")]
    UnexpectedEnd(String),
    #[error("Document is not closed: {0} open elements")]
    Unclosed(usize),
    #[error("Document has no root element")]
    NoRoot,
    #[error("Document has more than one root element")]
    MultipleRoots,
    #[error("Content outside of the root element")]
    StrayContent,
}

/// An attribute with its resolved namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlAttribute {
    namespace: Option<String>,
    local_name: String,
    value: String,
}

impl XmlAttribute {
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

/// An element with its resolved namespace, attributes and child elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    namespace: Option<String>,
    local_name: String,
    attributes: Vec<XmlAttribute>,
    children: Vec<XmlElement>,
}

impl XmlElement {
    /// Namespace URI of the element, `None` when unqualified.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    /// Returns `true` if the element has the given namespace and local name.
    pub fn is(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.local_name == local_name
    }

    pub fn attributes(&self) -> &[XmlAttribute] {
        &self.attributes
    }

    /// Value of an unqualified attribute.
    pub fn attribute(&self, local_name: &str) -> Option<&str> {
        self.attribute_ns(None, local_name)
    }

    /// Value of an attribute in the given namespace.
    pub fn attribute_ns(&self, namespace: Option<&str>, local_name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.namespace.as_deref() == namespace && a.local_name == local_name)
            .map(|a| a.value.as_str())
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Child elements with the given name.
    pub fn children_named<'a>(
        &'a self,
        namespace: Option<&'a str>,
        local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children
            .iter()
            .filter(move |child| child.is(namespace, local_name))
    }

    /// First child element with the given name.
    pub fn first_child(&self, namespace: Option<&str>, local_name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.is(namespace, local_name))
    }

    /// Follows a path of child element names from this element.
    pub fn find_path(&self, path: &[(Option<&str>, &str)]) -> Option<&XmlElement> {
        path.iter()
            .try_fold(self, |element, (namespace, local_name)| {
                element.first_child(*namespace, local_name)
            })
    }

    /// Every element below this one, depth first.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

impl Drop for XmlElement {
    fn drop(&mut self) {
        // Deeply nested documents would overflow the stack with the
        // recursive drop glue, so flatten the subtree first.
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut element) = pending.pop() {
            pending.append(&mut element.children);
        }
    }
}

/// Depth-first iterator over the descendants of an element.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// A parsed, well-formed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

/// Namespace declarations made by one open element.
type Scope = Vec<(Vec<u8>, Option<String>)>;

struct PendingElement {
    raw_name: Vec<u8>,
    scope_len: usize,
    element: XmlElement,
}

impl XmlDocument {
    /// The document element.
    pub fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Parse a complete XML document.
    ///
    /// Fails unless the content holds exactly one balanced root element with
    /// every namespace prefix declared.
    pub fn parse(bytes: &[u8]) -> Result<Self, XmlParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut scopes: Scope = Vec::new();
        let mut stack: Vec<PendingElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| XmlParseError::Syntax(e.to_string()))?;
            match event {
                Event::Start(ref e) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(XmlParseError::MultipleRoots);
                    }
                    let pending = open_element(e, &mut scopes)?;
                    stack.push(pending);
                },
                Event::Empty(ref e) => {
                    if root.is_some() && stack.is_empty() {
                        return Err(XmlParseError::MultipleRoots);
                    }
                    let pending = open_element(e, &mut scopes)?;
                    scopes.truncate(pending.scope_len);
                    attach(pending.element, &mut stack, &mut root);
                },
                Event::End(ref e) => {
                    let name = e.name();
                    let pending = stack.pop().ok_or_else(|| {
                        XmlParseError::UnexpectedEnd(String::from_utf8_lossy(name.as_ref()).into_owned())
                    })?;
                    if pending.raw_name != name.as_ref() {
                        return Err(XmlParseError::UnexpectedEnd(
                            String::from_utf8_lossy(name.as_ref()).into_owned(),
                        ));
                    }
                    scopes.truncate(pending.scope_len);
                    attach(pending.element, &mut stack, &mut root);
                },
                Event::Text(ref t) => {
                    if stack.is_empty() && t.iter().any(|b| !b.is_ascii_whitespace()) {
                        return Err(XmlParseError::StrayContent);
                    }
                },
                Event::CData(_) => {
                    if stack.is_empty() {
                        return Err(XmlParseError::StrayContent);
                    }
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        if !stack.is_empty() {
            return Err(XmlParseError::Unclosed(stack.len()));
        }
        root.map(|root| Self { root }).ok_or(XmlParseError::NoRoot)
    }
}

fn attach(element: XmlElement, stack: &mut [PendingElement], root: &mut Option<XmlElement>) {
    match stack.last_mut() {
        Some(parent) => parent.element.children.push(element),
        None => *root = Some(element),
    }
}

fn open_element(e: &BytesStart<'_>, scopes: &mut Scope) -> Result<PendingElement, XmlParseError> {
    let scope_len = scopes.len();
    let mut raw_attributes = Vec::new();

    for attr in e.attributes() {
        let attr = attr.map_err(|e| XmlParseError::Syntax(e.to_string()))?;
        let value = attr
            .unescape_value()
            .map_err(|e| XmlParseError::Syntax(e.to_string()))?
            .into_owned();
        let key = attr.key.as_ref();
        if key == b"xmlns" {
            scopes.push((Vec::new(), non_empty(value)));
        } else if let Some(prefix) = key.strip_prefix(b"xmlns:") {
            scopes.push((prefix.to_vec(), non_empty(value)));
        } else {
            raw_attributes.push((key.to_vec(), value));
        }
    }

    let raw_name = e.name().as_ref().to_vec();
    let (prefix, local_name) = split_name(&raw_name);
    let namespace = match prefix {
        Some(prefix) => Some(resolve_prefix(scopes, prefix)?),
        None => resolve_default(scopes),
    };

    let mut attributes = Vec::with_capacity(raw_attributes.len());
    for (key, value) in raw_attributes {
        let (prefix, local) = split_name(&key);
        // Unprefixed attributes are never in the default namespace.
        let namespace = match prefix {
            Some(prefix) => Some(resolve_prefix(scopes, prefix)?),
            None => None,
        };
        attributes.push(XmlAttribute {
            namespace,
            local_name: String::from_utf8_lossy(local).into_owned(),
            value,
        });
    }

    Ok(PendingElement {
        element: XmlElement {
            namespace,
            local_name: String::from_utf8_lossy(local_name).into_owned(),
            attributes,
            children: Vec::new(),
        },
        raw_name,
        scope_len,
    })
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn split_name(name: &[u8]) -> (Option<&[u8]>, &[u8]) {
    match memchr::memchr(b':', name) {
        Some(i) => (Some(&name[..i]), &name[i + 1..]),
        None => (None, name),
    }
}

fn resolve_prefix(scopes: &Scope, prefix: &[u8]) -> Result<String, XmlParseError> {
    if prefix == b"xml" {
        return Ok(XML_NAMESPACE.to_string());
    }
    scopes
        .iter()
        .rev()
        .find(|(p, _)| p.as_slice() == prefix)
        .and_then(|(_, uri)| uri.clone())
        .ok_or_else(|| XmlParseError::UnboundPrefix(String::from_utf8_lossy(prefix).into_owned()))
}

fn resolve_default(scopes: &Scope) -> Option<String> {
    scopes
        .iter()
        .rev()
        .find(|(p, _)| p.is_empty())
        .and_then(|(_, uri)| uri.clone())
}
