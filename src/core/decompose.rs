// File: src/core/decompose.rs
use crate::core::pronunciation::PronunciationAnnotator;
use crate::core::types::DecompositionTable;
use crate::error::{DeckError, Result};

/// Default bound on how many table levels a character may expand through.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// One glyph in a decomposition tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompositionNode {
    pub glyph: String,
    /// `None` for the written glyphs at the top level, which are shown bare.
    /// Table components always carry their (possibly empty) readings.
    pub pronunciation: Option<Vec<String>>,
    pub children: Vec<DecompositionNode>,
}

/// The full breakdown of one character: one root per written glyph.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Decomposition {
    pub roots: Vec<DecompositionNode>,
}

impl Decomposition {
    /// Total number of table components below the roots.
    pub fn component_count(&self) -> usize {
        fn count(node: &DecompositionNode) -> usize {
            node.children.iter().map(|c| 1 + count(c)).sum()
        }
        self.roots.iter().map(count).sum()
    }
}

/// Expands characters depth-first through a read-only decomposition table.
pub struct DecompositionResolver<'a> {
    table: &'a DecompositionTable,
    annotator: &'a PronunciationAnnotator<'a>,
    max_renderings: usize,
    max_depth: usize,
}

impl<'a> DecompositionResolver<'a> {
    pub fn new(
        table: &'a DecompositionTable,
        annotator: &'a PronunciationAnnotator<'a>,
        max_renderings: usize,
        max_depth: usize,
    ) -> Self {
        Self { table, annotator, max_renderings, max_depth }
    }

    /// Builds the tree for `character`. The written glyphs form the first level;
    /// everything below comes from the table, in table order.
    pub fn decompose(&self, character: &str) -> Result<Decomposition> {
        let mut roots = Vec::new();
        for glyph in character.chars() {
            let glyph = glyph.to_string();
            let mut ancestors = vec![glyph.clone()];
            let children = self.expand(&glyph, &mut ancestors)?;
            roots.push(DecompositionNode { glyph, pronunciation: None, children });
        }
        Ok(Decomposition { roots })
    }

    /// `ancestors` holds the path from the root down to and including `glyph`.
    fn expand(&self, glyph: &str, ancestors: &mut Vec<String>) -> Result<Vec<DecompositionNode>> {
        let components = match self.table.get(glyph) {
            Some(components) => components,
            None => return Ok(vec![]),
        };

        if !components.is_empty() && ancestors.len() > self.max_depth {
            return Err(DeckError::DepthLimitExceeded {
                character: ancestors[0].clone(),
                limit: self.max_depth,
            });
        }

        let mut nodes = Vec::with_capacity(components.len());
        for component in components {
            if ancestors.iter().any(|a| a == component) {
                let mut path = ancestors.clone();
                path.push(component.clone());
                return Err(DeckError::DecompositionCycle { path });
            }

            ancestors.push(component.clone());
            let children = self.expand(component, ancestors)?;
            ancestors.pop();

            nodes.push(DecompositionNode {
                glyph: component.clone(),
                pronunciation: Some(self.annotator.annotate(component, self.max_renderings)),
                children,
            });
        }
        Ok(nodes)
    }
}
