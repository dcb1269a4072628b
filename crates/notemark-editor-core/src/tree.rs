//! Rendered node tree and its HTML serialization.
//!
//! The tree is what the surface host displays. Plain text becomes a bare
//! text leaf; every token becomes a classified span wrapping exactly one
//! text leaf. Text leaves in document order spell out the source text, so
//! the caret reconciler can walk them to place a flattened offset.

use std::fmt::Write;
use std::ops::Range;

use smol_str::SmolStr;

use crate::types::{Classification, Segment};

/// A node in the rendered tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedNode {
    /// Text-bearing leaf.
    Text(SmolStr),
    /// Classified wrapper around token text.
    Span {
        classification: Classification,
        /// Source char range of the wrapped text.
        char_range: Range<usize>,
        roster_id: Option<i64>,
        children: Vec<RenderedNode>,
    },
}

impl RenderedNode {
    /// Flattened text of this node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(std::slice::from_ref(self), &mut out);
        out
    }
}

fn collect_text(nodes: &[RenderedNode], out: &mut String) {
    for node in nodes {
        match node {
            RenderedNode::Text(text) => out.push_str(text),
            RenderedNode::Span { children, .. } => collect_text(children, out),
        }
    }
}

/// Build the rendered tree from composed segments.
pub fn build_tree(segments: &[Segment]) -> Vec<RenderedNode> {
    segments
        .iter()
        .map(|segment| match segment.classification {
            Classification::PlainText => RenderedNode::Text(segment.text.clone()),
            classification => RenderedNode::Span {
                classification,
                char_range: segment.char_range.clone(),
                roster_id: segment.roster_id,
                children: vec![RenderedNode::Text(segment.text.clone())],
            },
        })
        .collect()
}

/// Text leaves of the tree, in document order.
pub fn text_leaves(tree: &[RenderedNode]) -> Vec<&str> {
    fn walk<'a>(nodes: &'a [RenderedNode], out: &mut Vec<&'a str>) {
        for node in nodes {
            match node {
                RenderedNode::Text(text) => out.push(text.as_str()),
                RenderedNode::Span { children, .. } => walk(children, out),
            }
        }
    }

    let mut leaves = Vec::new();
    walk(tree, &mut leaves);
    leaves
}

/// Flattened text of the whole tree.
pub fn tree_text(tree: &[RenderedNode]) -> String {
    let mut out = String::new();
    collect_text(tree, &mut out);
    out
}

/// Serialize the tree to HTML markup.
///
/// Class names are `{prefix}-hashtag`, `{prefix}-mention` and
/// `{prefix}-mention-invalid`; styling is left to the display layer.
pub fn render_html(tree: &[RenderedNode], class_prefix: &str) -> String {
    let mut html = String::new();
    write_nodes(tree, class_prefix, &mut html);
    html
}

fn write_nodes(nodes: &[RenderedNode], class_prefix: &str, html: &mut String) {
    for node in nodes {
        match node {
            RenderedNode::Text(text) => {
                html_escape::encode_text_to_string(text, html);
            }
            RenderedNode::Span {
                classification,
                char_range,
                roster_id,
                children,
            } => {
                let class = classification.class_suffix().unwrap_or("text");
                let prefix = html_escape::encode_double_quoted_attribute(class_prefix);
                // Writing into a String cannot fail.
                let _ = write!(
                    html,
                    "<span class=\"{}-{}\" data-char-start=\"{}\" data-char-end=\"{}\"",
                    prefix, class, char_range.start, char_range.end
                );
                if let Some(id) = roster_id {
                    let _ = write!(html, " data-roster-id=\"{}\"", id);
                }
                html.push('>');
                write_nodes(children, class_prefix, html);
                html.push_str("</span>");
            }
        }
    }
}
