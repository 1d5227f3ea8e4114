//! Two-way conversion between model attributes and inline view elements.
//!
//! Each [`AttributeConverter`] maps one model attribute key to an inline
//! element (downcast) and recognises that element when reading markup back
//! (upcast). A [`Conversion`] holds converters in priority order: earlier
//! converters produce outer elements, so a footnote wraps the bold text
//! inside it instead of being split by it.

mod downcast;
mod upcast;

use std::fmt;

use pulldown_cmark_escape::StrWrite;
use smol_str::SmolStr;

use crate::attributes::AttributeValue;
use crate::document::Document;
use crate::error::ConversionError;
use crate::text::TextBuffer;

pub use downcast::ViewWriter;

/// An inline element in the serialized view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewElement {
    pub name: SmolStr,
    /// Attributes in output order.
    pub attributes: Vec<(SmolStr, SmolStr)>,
}

impl ViewElement {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<SmolStr>, value: impl Into<SmolStr>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    pub fn get_attribute(&self, key: &str) -> Option<&SmolStr> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

/// Mapping between one model attribute and its view element.
pub trait AttributeConverter {
    /// The model attribute key handled by this converter.
    fn model_key(&self) -> &str;

    /// Model to view: the element wrapping a run with `value`.
    fn downcast(&self, value: &AttributeValue) -> ViewElement;

    /// View to model: the attribute value for `element`, or `None` if this
    /// converter does not recognise it.
    fn upcast(&self, element: &ViewElement) -> Option<AttributeValue>;
}

/// Footnote marker: `<fn title="…" class="footnote" contenteditable="false">`.
#[derive(Clone, Debug)]
pub struct FootnoteConverter {
    key: SmolStr,
    element: SmolStr,
    class: SmolStr,
}

impl FootnoteConverter {
    pub fn new(
        key: impl Into<SmolStr>,
        element: impl Into<SmolStr>,
        class: impl Into<SmolStr>,
    ) -> Self {
        Self {
            key: key.into(),
            element: element.into(),
            class: class.into(),
        }
    }
}

impl Default for FootnoteConverter {
    fn default() -> Self {
        Self::new("footnotes", "fn", "footnote")
    }
}

impl AttributeConverter for FootnoteConverter {
    fn model_key(&self) -> &str {
        &self.key
    }

    fn downcast(&self, value: &AttributeValue) -> ViewElement {
        ViewElement::new(self.element.clone())
            .with_attribute("title", value.to_string())
            .with_attribute("class", self.class.clone())
            .with_attribute("contenteditable", "false")
    }

    fn upcast(&self, element: &ViewElement) -> Option<AttributeValue> {
        if element.name != self.element {
            return None;
        }
        element
            .get_attribute("title")
            .map(|title| AttributeValue::Text(title.clone()))
    }
}

/// Presence-only formatting such as bold or italic.
#[derive(Clone, Debug)]
pub struct FlagElementConverter {
    key: SmolStr,
    element: SmolStr,
    aliases: Vec<SmolStr>,
}

impl FlagElementConverter {
    pub fn new(key: impl Into<SmolStr>, element: impl Into<SmolStr>) -> Self {
        Self {
            key: key.into(),
            element: element.into(),
            aliases: Vec::new(),
        }
    }

    /// Also accept `element` when reading markup.
    pub fn alias(mut self, element: impl Into<SmolStr>) -> Self {
        self.aliases.push(element.into());
        self
    }
}

impl AttributeConverter for FlagElementConverter {
    fn model_key(&self) -> &str {
        &self.key
    }

    fn downcast(&self, _value: &AttributeValue) -> ViewElement {
        ViewElement::new(self.element.clone())
    }

    fn upcast(&self, element: &ViewElement) -> Option<AttributeValue> {
        (element.name == self.element || self.aliases.contains(&element.name))
            .then_some(AttributeValue::Flag)
    }
}

/// Ordered converter registry for both directions.
#[derive(Default)]
pub struct Conversion {
    converters: Vec<Box<dyn AttributeConverter>>,
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.converters.iter().map(|c| c.model_key()))
            .finish()
    }
}

impl Conversion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter. Later registrations nest inside earlier ones.
    pub fn add(&mut self, converter: impl AttributeConverter + 'static) -> &mut Self {
        self.converters.push(Box::new(converter));
        self
    }

    pub fn converters(&self) -> &[Box<dyn AttributeConverter>] {
        &self.converters
    }

    /// Upcast a single element with the first converter that accepts it.
    pub fn upcast_element(&self, element: &ViewElement) -> Option<(SmolStr, AttributeValue)> {
        self.converters.iter().find_map(|c| {
            c.upcast(element)
                .map(|value| (SmolStr::new(c.model_key()), value))
        })
    }

    /// Serialize `doc` into `writer`, one `<p>` per paragraph.
    pub fn write_view<T: TextBuffer, W: StrWrite>(
        &self,
        doc: &Document<T>,
        writer: W,
    ) -> Result<(), W::Error> {
        ViewWriter::new(&self.converters, writer).write_document(doc)
    }

    /// Serialize `doc` to a string.
    pub fn to_view<T: TextBuffer>(&self, doc: &Document<T>) -> Result<String, fmt::Error> {
        let mut out = String::new();
        self.write_view(doc, &mut out)?;
        Ok(out)
    }

    /// Parse view markup into a fresh document.
    pub fn to_model(&self, markup: &str) -> Result<Document, ConversionError> {
        upcast::parse(self, markup)
    }
}
