//! Section tree construction
//!
//! Sections are built from the classified paragraph sequence with a stack of
//! open sections. Nodes live in an arena and the stack holds arena indices,
//! so an open section never needs a pointer back to its ancestors. The
//! owned `Section` tree is assembled once the walk is over.

use super::super::models::{Paragraph, Section};

#[derive(Debug)]
struct SectionNode {
    title: Paragraph,
    level: u32,
    paragraphs: Vec<Paragraph>,
    children: Vec<usize>,
    start_index: usize,
    end_index: usize,
}

#[derive(Debug, Default)]
pub(crate) struct SectionTreeBuilder {
    arena: Vec<SectionNode>,
    roots: Vec<usize>,
    /// Open ancestry chain as (level, arena index), innermost last
    stack: Vec<(u32, usize)>,
    last_index: Option<usize>,
}

impl SectionTreeBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, paragraph: &Paragraph) {
        self.last_index = Some(paragraph.index);

        if !paragraph.is_title() {
            // Content before the first heading stays out of the tree
            if let Some(&(_, open)) = self.stack.last() {
                self.arena[open].paragraphs.push(paragraph.clone());
            }
            return;
        }

        if paragraph.is_document_title() {
            return;
        }

        let level = paragraph.level.max(1);
        let index = paragraph.index;

        while let Some(&(open_level, open)) = self.stack.last() {
            if open_level < level {
                break;
            }
            self.arena[open].end_index = index.saturating_sub(1).max(self.arena[open].start_index);
            self.stack.pop();
        }

        let node = self.arena.len();
        self.arena.push(SectionNode {
            title: paragraph.clone(),
            level,
            paragraphs: Vec::new(),
            children: Vec::new(),
            start_index: index,
            end_index: index,
        });

        match self.stack.last() {
            Some(&(_, parent)) => self.arena[parent].children.push(node),
            None => self.roots.push(node),
        }
        self.stack.push((level, node));
    }

    /// Close whatever is still open at the last paragraph and build the tree
    pub(crate) fn finish(mut self) -> Vec<Section> {
        if let Some(last) = self.last_index {
            for &(_, open) in &self.stack {
                let node = &mut self.arena[open];
                node.end_index = node.end_index.max(last);
            }
        }

        let mut slots: Vec<Option<SectionNode>> = self.arena.into_iter().map(Some).collect();
        self.roots
            .iter()
            .filter_map(|&root| assemble(&mut slots, root))
            .collect()
    }
}

fn assemble(slots: &mut [Option<SectionNode>], index: usize) -> Option<Section> {
    let node = slots.get_mut(index)?.take()?;
    let subsections = node
        .children
        .iter()
        .filter_map(|&child| assemble(slots, child))
        .collect();

    Some(Section {
        title: Some(node.title),
        level: node.level,
        paragraphs: node.paragraphs,
        subsections,
        start_index: node.start_index,
        end_index: node.end_index,
    })
}

/// Build the section tree for a classified paragraph sequence
pub(crate) fn build_sections(paragraphs: &[Paragraph]) -> Vec<Section> {
    let mut builder = SectionTreeBuilder::new();
    for paragraph in paragraphs {
        builder.push(paragraph);
    }
    builder.finish()
}
