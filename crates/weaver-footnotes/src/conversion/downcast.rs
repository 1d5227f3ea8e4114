//! Model to view: document runs to nested inline markup.

use pulldown_cmark_escape::{StrWrite, escape_html, escape_html_body_text};

use crate::attributes::{AttributeValue, Attributes};
use crate::document::Document;
use crate::text::TextBuffer;
use crate::types::{PARAGRAPH_BREAK, Range};

use super::{AttributeConverter, ViewElement};

/// Writes a document as `<p>` blocks of nested inline elements.
///
/// Within a paragraph, consecutive runs that agree on the first converter's
/// attribute value share one element; the remaining converters are applied
/// recursively inside it. One element is emitted per contiguous value, and
/// unequal neighbouring values always get separate elements.
pub struct ViewWriter<'c, W> {
    converters: &'c [Box<dyn AttributeConverter>],
    writer: W,
}

impl<'c, W: StrWrite> ViewWriter<'c, W> {
    pub fn new(converters: &'c [Box<dyn AttributeConverter>], writer: W) -> Self {
        Self { converters, writer }
    }

    pub fn write_document<T: TextBuffer>(mut self, doc: &Document<T>) -> Result<(), W::Error> {
        for paragraph in paragraphs(doc) {
            self.writer.write_str("<p>")?;
            let segments: Vec<(Range, &Attributes)> = doc.runs().clipped(paragraph).collect();
            self.write_inline(doc, &segments, 0)?;
            self.writer.write_str("</p>")?;
        }
        Ok(())
    }

    fn write_inline<T: TextBuffer>(
        &mut self,
        doc: &Document<T>,
        segments: &[(Range, &Attributes)],
        depth: usize,
    ) -> Result<(), W::Error> {
        let converters = self.converters;
        let Some(converter) = converters.get(depth) else {
            for (range, _) in segments {
                escape_html_body_text(&mut self.writer, &doc.text(*range))?;
            }
            return Ok(());
        };

        let key = converter.model_key();
        let mut rest = segments;
        while let Some((_, first)) = rest.first() {
            let value = first.get(key);
            let len = rest
                .iter()
                .take_while(|(_, attrs)| attrs.get(key) == value)
                .count();
            let (group, tail) = rest.split_at(len);
            match value {
                Some(value) => self.write_element(doc, converter.as_ref(), value, group, depth)?,
                None => self.write_inline(doc, group, depth + 1)?,
            }
            rest = tail;
        }
        Ok(())
    }

    fn write_element<T: TextBuffer>(
        &mut self,
        doc: &Document<T>,
        converter: &dyn AttributeConverter,
        value: &AttributeValue,
        group: &[(Range, &Attributes)],
        depth: usize,
    ) -> Result<(), W::Error> {
        let element = converter.downcast(value);
        self.open_tag(&element)?;
        self.write_inline(doc, group, depth + 1)?;
        self.writer.write_str("</")?;
        self.writer.write_str(&element.name)?;
        self.writer.write_str(">")
    }

    fn open_tag(&mut self, element: &ViewElement) -> Result<(), W::Error> {
        self.writer.write_str("<")?;
        self.writer.write_str(&element.name)?;
        for (key, value) in &element.attributes {
            self.writer.write_str(" ")?;
            self.writer.write_str(key)?;
            self.writer.write_str("=\"")?;
            escape_html(&mut self.writer, value)?;
            self.writer.write_str("\"")?;
        }
        self.writer.write_str(">")
    }
}

/// Paragraph ranges, excluding the breaks between them. An empty document
/// still has one (empty) paragraph.
fn paragraphs<T: TextBuffer>(doc: &Document<T>) -> Vec<Range> {
    let mut out = Vec::new();
    let mut start = 0;
    for (offset, ch) in doc.content_string().chars().enumerate() {
        if ch == PARAGRAPH_BREAK {
            out.push(Range::new(start, offset));
            start = offset + 1;
        }
    }
    out.push(Range::new(start, doc.len_chars()));
    out
}

#[cfg(test)]
mod tests {
    use crate::attributes::{AttributeValue, Attributes};
    use crate::conversion::{Conversion, FlagElementConverter, FootnoteConverter};
    use crate::document::Document;
    use crate::types::Range;

    fn conversion() -> Conversion {
        let mut conversion = Conversion::new();
        conversion
            .add(FootnoteConverter::default())
            .add(FlagElementConverter::new("bold", "strong"));
        conversion
    }

    #[test]
    fn test_plain_paragraphs() {
        let doc = Document::from_text("one\ntwo\n");
        insta::assert_snapshot!(conversion().to_view(&doc).unwrap(), @"<p>one</p><p>two</p><p></p>");
    }

    #[test]
    fn test_empty_document() {
        insta::assert_snapshot!(conversion().to_view(&Document::default()).unwrap(), @"<p></p>");
    }

    #[test]
    fn test_footnote_wraps_inner_formatting() {
        let mut doc = Document::from_text("see note here");
        doc.change(|w| {
            w.set_attribute("footnotes", AttributeValue::text("s"), Range::new(4, 8));
            w.set_attribute("bold", AttributeValue::Flag, Range::new(6, 13));
        });
        insta::assert_snapshot!(
            conversion().to_view(&doc).unwrap(),
            @r#"<p>see <fn title="s" class="footnote" contenteditable="false">no<strong>te</strong></fn><strong> here</strong></p>"#
        );
    }

    #[test]
    fn test_unequal_neighbours_get_separate_elements() {
        let mut doc = Document::from_text("abcd");
        doc.change(|w| {
            w.set_attribute("footnotes", AttributeValue::text("1"), Range::new(0, 2));
            w.set_attribute("footnotes", AttributeValue::text("2"), Range::new(2, 4));
        });
        insta::assert_snapshot!(
            conversion().to_view(&doc).unwrap(),
            @r#"<p><fn title="1" class="footnote" contenteditable="false">ab</fn><fn title="2" class="footnote" contenteditable="false">cd</fn></p>"#
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let mut doc = Document::default();
        doc.change(|w| {
            w.insert_content(
                "<b>",
                Attributes::new().with("footnotes", AttributeValue::text("\"q\" & <x>")),
                Range::caret(0),
            );
        });
        insta::assert_snapshot!(
            conversion().to_view(&doc).unwrap(),
            @r#"<p><fn title="&quot;q&quot; &amp; &lt;x&gt;" class="footnote" contenteditable="false">&lt;b&gt;</fn></p>"#
        );
    }
}
