use core::fmt;

use super::Document;
use crate::{DOMNode, NodeKind};
use indextree::NodeId;

use serde_json::{Map, Value, json};

fn sorted_attrs(data: &DOMNode) -> Vec<(String, String)> {
    let mut pairs: Vec<(String, String)> = data.attrs.iter().cloned().collect();
    if !data.style.is_empty() {
        pairs.push((String::from("style"), data.style.to_string()));
    }
    pairs.sort_by(|left, right| left.0.cmp(&right.0));
    pairs
}

fn node_to_json(doc: &Document, id: NodeId) -> Value {
    let Some(data) = doc.node(id) else {
        return Value::Null;
    };
    let children: Vec<Value> = doc
        .children(id)
        .into_iter()
        .map(|child| node_to_json(doc, child))
        .filter(|value| !value.is_null())
        .collect();
    match &data.kind {
        NodeKind::Document => json!({ "type": "document", "children": children }),
        NodeKind::Element { tag } => {
            let attrs_obj: Map<String, Value> = sorted_attrs(data)
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            json!({
                "type": "element",
                "tag": tag,
                "attrs": Value::Object(attrs_obj),
                "children": children,
            })
        }
        NodeKind::Text { text } => {
            if text.trim().is_empty() {
                Value::Null
            } else {
                json!({ "type": "text", "text": text })
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            _ => out.push(character),
        }
    }
    out
}

fn fmt_node(
    doc: &Document,
    id: NodeId,
    formatter: &mut fmt::Formatter<'_>,
    depth: usize,
) -> fmt::Result {
    let Some(data) = doc.node(id) else {
        return Ok(());
    };
    let indent = "  ".repeat(depth);
    match &data.kind {
        NodeKind::Document => writeln!(formatter, "{indent}#document")?,
        NodeKind::Element { tag } => {
            write!(formatter, "{indent}<{tag}")?;
            for (key, value) in sorted_attrs(data) {
                write!(formatter, " {key}=\"{}\"", escape_text(&value))?;
            }
            writeln!(formatter, ">")?;
        }
        NodeKind::Text { text } => {
            // Whitespace-only text is noise in snapshots.
            if !text.chars().all(char::is_whitespace) {
                writeln!(formatter, "{indent}\"{}\"", escape_text(text))?;
            }
            return Ok(());
        }
    }
    for child in doc.children(id) {
        fmt_node(doc, child, formatter, depth + 1)?;
    }
    if let NodeKind::Element { tag } = &data.kind {
        writeln!(formatter, "{indent}</{tag}>")?;
    }
    Ok(())
}

impl fmt::Debug for Document {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_node(self, self.root(), formatter, 0)
    }
}

impl Document {
    /// Deterministic JSON view of the tree, attributes sorted by name.
    /// - Document: { "type":"document", "children":[ ... ] }
    /// - Element: { "type":"element", "tag": "div", "attrs": {..}, "children":[ ... ] }
    /// - Text: { "type":"text", "text":"..." }
    pub fn to_json_value(&self) -> Value {
        node_to_json(self, self.root())
    }

    /// Pretty JSON string for snapshots and test comparisons.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.to_json_value()).unwrap_or_else(|_| String::from("{}"))
    }
}
