//! Minimal element tree for parsed define.xml input.
//!
//! The validator core consumes this tree shape; it never touches raw markup.
//! The reader rejects DOCTYPE declarations outright so entity-expansion
//! tricks never reach the model builder.

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::Event;

use define_model::{DefineError, Result};

/// One parsed XML element. Names keep their prefix as written; lookups go
/// through [`Element::attr`] and [`Element::child`], which match on the
/// local part so `def:`-prefixed and unprefixed documents behave alike.
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<Element>,
    pub text: String,
}

fn local_part(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

impl Element {
    /// Local element name with any namespace prefix stripped.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Attribute lookup by qualified or local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.attributes.get(name) {
            return Some(value.as_str());
        }
        self.attributes
            .iter()
            .find(|(key, _)| local_part(key) == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child with the given local name.
    pub fn child(&self, local: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.local_name() == local)
    }

    /// All children with the given local name, in document order.
    pub fn children_named<'a>(&'a self, local: &'a str) -> impl Iterator<Item = &'a Element> {
        self.children.iter().filter(move |c| c.local_name() == local)
    }

    /// Text content of a `Description/TranslatedText` child, trimmed.
    /// Returns `None` when the container is absent or the text is empty.
    pub fn translated_text(&self) -> Option<String> {
        let text = self.child("Description")?.child("TranslatedText")?.text.trim().to_string();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// Parse raw bytes into an element tree.
///
/// Comments, processing instructions, and CDATA are folded away; DOCTYPE is
/// rejected. Input must be UTF-8 (define.xml files are).
pub fn parse_tree(bytes: &[u8]) -> Result<Element> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| DefineError::Parse(format!("input is not valid UTF-8: {e}")))?;
    let mut reader = Reader::from_str(text);
    // Text is kept as-is; references split text events, so trimming here
    // would eat the spacing around them. Accessors trim instead.
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| DefineError::Parse("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                // References never appear here; they arrive as GeneralRef.
                let value = text
                    .decode()
                    .map_err(|e| DefineError::Parse(e.to_string()))?;
                if let Some(parent) = stack.last_mut() {
                    parent.text.push_str(&value);
                }
            }
            Ok(Event::CData(cdata)) => {
                if let Some(parent) = stack.last_mut() {
                    parent
                        .text
                        .push_str(&String::from_utf8_lossy(cdata.as_ref()));
                }
            }
            Ok(Event::GeneralRef(reference)) => {
                let resolved = resolve_reference(&reference)?;
                if let Some(parent) = stack.last_mut() {
                    parent.text.push(resolved);
                }
            }
            Ok(Event::DocType(_)) => {
                return Err(DefineError::Parse(
                    "DOCTYPE declarations are not accepted".to_string(),
                ));
            }
            Ok(Event::Decl(_) | Event::Comment(_) | Event::PI(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => return Err(DefineError::Parse(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(DefineError::Parse("unexpected end of input".to_string()));
    }
    root.ok_or_else(|| DefineError::Parse("empty document".to_string()))
}

/// Resolve a character or predefined entity reference. With DOCTYPE
/// rejected, no document-defined entity can exist, so anything else is
/// an error.
fn resolve_reference(reference: &quick_xml::events::BytesRef<'_>) -> Result<char> {
    if let Some(ch) = reference
        .resolve_char_ref()
        .map_err(|e| DefineError::Parse(e.to_string()))?
    {
        return Ok(ch);
    }
    match &**reference {
        b"amp" => Ok('&'),
        b"lt" => Ok('<'),
        b"gt" => Ok('>'),
        b"apos" => Ok('\''),
        b"quot" => Ok('"'),
        other => Err(DefineError::Parse(format!(
            "unresolvable entity reference '&{};'",
            String::from_utf8_lossy(other)
        ))),
    }
}

fn element_from_start(start: &quick_xml::events::BytesStart<'_>) -> Result<Element> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut attributes = BTreeMap::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| DefineError::Parse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| DefineError::Parse(e.to_string()))?
            .into_owned();
        attributes.insert(key, value);
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        text: String::new(),
    })
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(element);
            Ok(())
        }
        None => {
            if root.is_some() {
                return Err(DefineError::Parse(
                    "multiple root elements".to_string(),
                ));
            }
            *root = Some(element);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_elements_with_prefixed_attributes() {
        let tree = parse_tree(
            br#"<ODM xmlns:def="http://www.cdisc.org/ns/def/v2.1">
                  <ItemGroupDef OID="IG.DM" Name="DM" def:Structure="One record per subject">
                    <Description><TranslatedText>Demographics</TranslatedText></Description>
                  </ItemGroupDef>
                </ODM>"#,
        )
        .expect("parse tree");
        assert_eq!(tree.local_name(), "ODM");
        let group = tree.child("ItemGroupDef").expect("item group");
        assert_eq!(group.attr("OID"), Some("IG.DM"));
        assert_eq!(group.attr("Structure"), Some("One record per subject"));
        assert_eq!(group.attr("def:Structure"), Some("One record per subject"));
        assert_eq!(group.translated_text().as_deref(), Some("Demographics"));
    }

    #[test]
    fn resolves_entity_and_char_references_in_text() {
        let tree = parse_tree(
            b"<ODM><TranslatedText>Safety &amp; Efficacy &#8805; 10%</TranslatedText></ODM>",
        )
        .expect("parse tree");
        let text = &tree.child("TranslatedText").expect("text element").text;
        assert_eq!(text, "Safety & Efficacy \u{2265} 10%");
    }

    #[test]
    fn rejects_doctype() {
        let err = parse_tree(b"<!DOCTYPE foo [<!ENTITY x \"y\">]><ODM/>");
        assert!(matches!(err, Err(DefineError::Parse(_))));
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_tree(b"<ODM><Study></ODM>").is_err());
        assert!(parse_tree(b"").is_err());
    }
}
