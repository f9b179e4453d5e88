// File: src/core/markup.rs
use crate::core::decompose::{Decomposition, DecompositionNode};

/// Turns a decomposition tree into the text stored in the card's field.
pub trait MarkupRenderer {
    fn render(&self, decomposition: &Decomposition) -> String;
}

/// Nested `<ul>`/`<li>` lists, the layout the back template styles.
///
/// Top-level glyphs are listed bare; each table component is followed by its
/// readings in parentheses. A node with no children emits no inner list.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlListRenderer;

impl HtmlListRenderer {
    fn render_children(&self, children: &[DecompositionNode], out: &mut String) {
        if children.is_empty() {
            return;
        }
        out.push_str("<ul>");
        for child in children {
            out.push_str("<li>");
            out.push_str(&child.glyph);
            if let Some(readings) = &child.pronunciation {
                out.push_str(" (");
                out.push_str(&readings.join(", "));
                out.push(')');
            }
            out.push_str("</li>");
            self.render_children(&child.children, out);
        }
        out.push_str("</ul>");
    }
}

impl MarkupRenderer for HtmlListRenderer {
    fn render(&self, decomposition: &Decomposition) -> String {
        let mut out = String::from("<ul>");
        for root in &decomposition.roots {
            out.push_str("<li>");
            out.push_str(&root.glyph);
            out.push_str("</li>");
            self.render_children(&root.children, &mut out);
        }
        out.push_str("</ul>");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(glyph: &str, readings: &[&str]) -> DecompositionNode {
        DecompositionNode {
            glyph: glyph.to_string(),
            pronunciation: Some(readings.iter().map(|s| s.to_string()).collect()),
            children: vec![],
        }
    }

    #[test]
    fn bare_roots_render_as_flat_list() {
        let tree = Decomposition {
            roots: vec![DecompositionNode {
                glyph: "一".into(),
                pronunciation: None,
                children: vec![],
            }],
        };
        assert_eq!(HtmlListRenderer.render(&tree), "<ul><li>一</li></ul>");
    }

    #[test]
    fn nested_components_render_inline_after_their_item() {
        let mut person = leaf("亻", &[]);
        person.children = vec![leaf("丿", &["<span class=\"tone3\">piě</span>"])];
        let tree = Decomposition {
            roots: vec![DecompositionNode {
                glyph: "休".into(),
                pronunciation: None,
                children: vec![
                    person,
                    leaf("木", &["<span class=\"tone4\">mù</span>", "<span class=\"tone5\">mu</span>"]),
                ],
            }],
        };
        assert_eq!(
            HtmlListRenderer.render(&tree),
            "<ul><li>休</li><ul><li>亻 ()</li><ul><li>丿 (<span class=\"tone3\">piě</span>)</li></ul>\
             <li>木 (<span class=\"tone4\">mù</span>, <span class=\"tone5\">mu</span>)</li></ul></ul>"
        );
    }

    #[test]
    fn empty_decomposition_is_an_empty_list() {
        assert_eq!(HtmlListRenderer.render(&Decomposition::default()), "<ul></ul>");
    }
}
