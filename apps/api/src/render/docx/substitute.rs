//! Placeholder substitution over WordprocessingML parts.
//!
//! Paragraph text in DOCX is split across runs (`<w:r><w:t>..</w:t></w:r>`) at
//! arbitrary points, so a token like `{{name}}` may span several `<w:t>` nodes.
//! Tokens that sit inside one node are replaced in place and keep that run's
//! formatting. When any token in a paragraph spans nodes, the paragraph's text is
//! collapsed into its first node and the other nodes are emptied.
//! Table cells hold ordinary paragraphs, so they take the same path.

use std::collections::{BTreeMap, HashMap, HashSet};

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use super::placeholders::{find_tokens, PlaceholderMap};
use super::DocxError;

#[derive(Debug, Clone, Default)]
pub struct SubstitutionOutcome {
    pub xml: Vec<u8>,
    /// Number of tokens replaced, unknown ones included.
    pub replaced: usize,
    /// Keys found in the part with no value in the map. Sorted, deduplicated.
    pub unresolved: Vec<String>,
}

/// A run of character data inside a `<w:t>` element.
struct TextNode {
    start_tag: usize,
    event: usize,
    paragraph: usize,
    text: String,
}

pub fn substitute_placeholders(
    xml: &[u8],
    values: &PlaceholderMap,
) -> Result<SubstitutionOutcome, DocxError> {
    let events = read_events(xml)?;
    let nodes = collect_text_nodes(&events)?;

    let mut by_paragraph: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (i, node) in nodes.iter().enumerate() {
        by_paragraph.entry(node.paragraph).or_default().push(i);
    }

    let mut fill = Filler::new(values);
    let mut rewrites: HashMap<usize, String> = HashMap::new();

    for members in by_paragraph.values() {
        let texts: Vec<&str> = members.iter().map(|&i| nodes[i].text.as_str()).collect();
        let joined = texts.concat();
        let tokens = find_tokens(&joined);
        if tokens.is_empty() {
            continue;
        }

        let mut bounds = Vec::with_capacity(texts.len());
        let mut offset = 0;
        for t in &texts {
            bounds.push(offset..offset + t.len());
            offset += t.len();
        }
        let contained = tokens.iter().all(|tok| {
            bounds
                .iter()
                .any(|b| b.start <= tok.span.start && tok.span.end <= b.end)
        });

        if contained {
            for &i in members {
                if !find_tokens(&nodes[i].text).is_empty() {
                    rewrites.insert(i, fill.apply(&nodes[i].text));
                }
            }
        } else {
            let collapsed = fill.apply(&joined);
            for (n, &i) in members.iter().enumerate() {
                let text = if n == 0 { collapsed.clone() } else { String::new() };
                rewrites.insert(i, text);
            }
        }
    }

    let by_event: HashMap<usize, (&TextNode, &String)> = rewrites
        .iter()
        .map(|(&i, text)| (nodes[i].event, (&nodes[i], text)))
        .collect();
    let preserve: HashSet<usize> = by_event.values().map(|(n, _)| n.start_tag).collect();

    let mut writer = Writer::new(Vec::with_capacity(xml.len()));
    for (index, event) in events.iter().enumerate() {
        if let Some((node, text)) = by_event.get(&index) {
            let tag_name = match &events[node.start_tag] {
                Event::Start(start) => element_name(start),
                _ => "w:t".to_string(),
            };
            write_text(&mut writer, &tag_name, text)?;
        } else if preserve.contains(&index) {
            match event {
                Event::Start(start) => writer
                    .write_event(Event::Start(with_preserve(start)))
                    .map_err(xml_error)?,
                other => writer.write_event(other.clone()).map_err(xml_error)?,
            }
        } else {
            writer.write_event(event.clone()).map_err(xml_error)?;
        }
    }

    let mut unresolved: Vec<String> = fill.unresolved.into_iter().collect();
    unresolved.sort();

    Ok(SubstitutionOutcome {
        xml: writer.into_inner(),
        replaced: fill.replaced,
        unresolved,
    })
}

struct Filler<'a> {
    values: &'a PlaceholderMap,
    replaced: usize,
    unresolved: HashSet<String>,
}

impl<'a> Filler<'a> {
    fn new(values: &'a PlaceholderMap) -> Self {
        Self {
            values,
            replaced: 0,
            unresolved: HashSet::new(),
        }
    }

    /// Replaces every token in `text`; unknown keys become empty strings.
    fn apply(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut last = 0;
        for token in find_tokens(text) {
            out.push_str(&text[last..token.span.start]);
            match self.values.get(&token.key) {
                Some(value) => out.push_str(value),
                None => {
                    self.unresolved.insert(token.key.clone());
                }
            }
            self.replaced += 1;
            last = token.span.end;
        }
        out.push_str(&text[last..]);
        out
    }
}

fn read_events(xml: &[u8]) -> Result<Vec<Event<'static>>, DocxError> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut events = Vec::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_error)? {
            Event::Eof => break,
            event => events.push(event.into_owned()),
        }
        buf.clear();
    }
    Ok(events)
}

fn collect_text_nodes(events: &[Event<'static>]) -> Result<Vec<TextNode>, DocxError> {
    let mut nodes = Vec::new();
    let mut paragraphs: Vec<usize> = Vec::new();
    let mut next_paragraph = 0usize;
    let mut open_text: Option<usize> = None;

    for (index, event) in events.iter().enumerate() {
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => {
                    paragraphs.push(next_paragraph);
                    next_paragraph += 1;
                }
                b"t" => open_text = Some(index),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => {
                    paragraphs.pop();
                }
                b"t" => open_text = None,
                _ => {}
            },
            Event::Text(e) => {
                if let (Some(start_tag), Some(&paragraph)) = (open_text, paragraphs.last()) {
                    let text = e.unescape().map_err(xml_error)?.into_owned();
                    nodes.push(TextNode {
                        start_tag,
                        event: index,
                        paragraph,
                        text,
                    });
                }
            }
            _ => {}
        }
    }
    Ok(nodes)
}

/// Writes `text` as the body of an already-open text element. Newlines close the
/// element, emit a line break and reopen it. Only WordprocessingML has an in-run
/// break; other vocabularies get spaces instead.
fn write_text(writer: &mut Writer<Vec<u8>>, tag_name: &str, text: &str) -> Result<(), DocxError> {
    let prefix = tag_name
        .rsplit_once(':')
        .map(|(prefix, _)| prefix)
        .unwrap_or("");

    if prefix != "w" || !text.contains('\n') {
        let flat = text.replace('\n', " ");
        return writer
            .write_event(Event::Text(BytesText::new(&flat)))
            .map_err(xml_error);
    }

    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            writer
                .write_event(Event::End(BytesEnd::new(tag_name.to_string())))
                .map_err(xml_error)?;
            writer
                .write_event(Event::Empty(BytesStart::new("w:br")))
                .map_err(xml_error)?;
            let mut reopened = BytesStart::new(tag_name.to_string());
            reopened.push_attribute(("xml:space", "preserve"));
            writer
                .write_event(Event::Start(reopened))
                .map_err(xml_error)?;
        }
        writer
            .write_event(Event::Text(BytesText::new(line)))
            .map_err(xml_error)?;
    }
    Ok(())
}

fn with_preserve(start: &BytesStart<'static>) -> BytesStart<'static> {
    let mut tag = start.clone();
    let has_space = start
        .attributes()
        .flatten()
        .any(|a| a.key.as_ref() == b"xml:space");
    if !has_space {
        tag.push_attribute(("xml:space", "preserve"));
    }
    tag
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn xml_error(e: impl std::fmt::Display) -> DocxError {
    DocxError::Xml(e.to_string())
}
