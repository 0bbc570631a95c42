//! Node capability used by the heuristic pass.
//!
//! Anything that can report its flattened text and its child nodes can be
//! scanned; the walk visits every node, containers included.

use scraper::ElementRef;

use crate::text::normalize_whitespace;

/// Subtrees whose text is never page content.
const OPAQUE_TAGS: &[&str] = &["script", "style", "noscript", "template"];

pub trait TextNode: Sized {
    /// Whitespace-normalized text of the node and all its descendants.
    fn flattened_text(&self) -> String;

    fn child_nodes(&self) -> Vec<Self>;
}

impl<'a> TextNode for ElementRef<'a> {
    fn flattened_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::new();
        collect_text(*self, &mut parts);
        normalize_whitespace(&parts.join(" "))
    }

    fn child_nodes(&self) -> Vec<Self> {
        self.children()
            .filter_map(ElementRef::wrap)
            .filter(|el| !OPAQUE_TAGS.contains(&el.value().name()))
            .collect()
    }
}

fn collect_text<'a>(el: ElementRef<'a>, out: &mut Vec<&'a str>) {
    for child in el.children() {
        if let Some(text) = child.value().as_text() {
            out.push(&**text);
        } else if let Some(child_el) = ElementRef::wrap(child) {
            if !OPAQUE_TAGS.contains(&child_el.value().name()) {
                collect_text(child_el, out);
            }
        }
    }
}

/// Pre-order walk over `root` and all of its descendants.
pub fn walk<N: TextNode>(root: N, mut visit: impl FnMut(&N)) {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        visit(&node);
        let mut children = node.child_nodes();
        children.reverse();
        stack.extend(children);
    }
}
