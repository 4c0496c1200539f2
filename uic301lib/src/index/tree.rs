//! Дерево смещений по сериализованному дереву документов.

use std::ops::Range;

/// Structural element of the serialized tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Documents,
    Document,
    Header,
    Details,
    DetailG4,
    DetailG5,
    Totals,
    Total,
    FieldError,
}

impl TagKind {
    pub const ALL: [TagKind; 9] = [
        TagKind::Documents,
        TagKind::Document,
        TagKind::Header,
        TagKind::Details,
        TagKind::DetailG4,
        TagKind::DetailG5,
        TagKind::Totals,
        TagKind::Total,
        TagKind::FieldError,
    ];

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.name() == name)
    }

    pub fn name(self) -> &'static str {
        match self {
            TagKind::Documents => "documents",
            TagKind::Document => "document",
            TagKind::Header => "header",
            TagKind::Details => "details",
            TagKind::DetailG4 => "detail-g4",
            TagKind::DetailG5 => "detail-g5",
            TagKind::Totals => "totals",
            TagKind::Total => "total",
            TagKind::FieldError => "field-error",
        }
    }

    /// Side-file code.
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.get(code as usize).copied()
    }

    /// Whether `child` may open directly below `self`.
    pub fn expects(self, child: TagKind) -> bool {
        use TagKind::*;
        matches!(
            (self, child),
            (Documents, Document)
                | (Document, Header | Details | Totals)
                | (Details, DetailG4 | DetailG5)
                | (Totals, Total)
                | (Header | DetailG4 | DetailG5 | Total, FieldError)
        )
    }
}

/// Byte offsets of one element. `begin` is the `<` of its start tag,
/// `start_end` the `>` of its start tag and `end` the `>` of its end tag.
/// For a self-closing element `start_end == end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub kind: TagKind,
    pub begin: u64,
    pub start_end: u64,
    pub end: u64,
    pub self_closing: bool,
    pub children: Vec<Tag>,
}

impl Tag {
    pub fn new(kind: TagKind, begin: u64) -> Self {
        Self {
            kind,
            begin,
            start_end: begin,
            end: begin,
            self_closing: false,
            children: Vec::new(),
        }
    }

    /// Half-open byte range of the start tag alone.
    pub fn start_tag_range(&self) -> Range<u64> {
        self.begin..self.start_end + 1
    }

    /// Half-open byte range of the whole element.
    pub fn range(&self) -> Range<u64> {
        self.begin..self.end + 1
    }

    pub fn children_of(&self, kind: TagKind) -> impl Iterator<Item = &Tag> + '_ {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    fn first_child(&self, kind: TagKind) -> Option<&Tag> {
        self.children_of(kind).next()
    }

    /// Number of nodes in this subtree, `self` included.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(tag) = stack.pop() {
            count += 1;
            stack.extend(tag.children.iter());
        }
        count
    }

    pub fn header(&self) -> Option<&Tag> {
        self.first_child(TagKind::Header)
    }

    /// `idx`-th detail of a document node, whatever its layout.
    pub fn detail(&self, idx: usize) -> Option<&Tag> {
        self.first_child(TagKind::Details)?.children.get(idx)
    }

    pub fn detail_count(&self) -> usize {
        self.first_child(TagKind::Details).map_or(0, |d| d.children.len())
    }

    pub fn total(&self, idx: usize) -> Option<&Tag> {
        self.first_child(TagKind::Totals)?.children.get(idx)
    }

    pub fn total_count(&self) -> usize {
        self.first_child(TagKind::Totals).map_or(0, |t| t.children.len())
    }
}

/// Offset tree rooted at `documents`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexTree {
    root: Tag,
}

impl IndexTree {
    pub fn new(root: Tag) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Tag {
        &self.root
    }

    pub fn documents(&self) -> impl Iterator<Item = &Tag> + '_ {
        self.root.children_of(TagKind::Document)
    }

    pub fn document(&self, idx: usize) -> Option<&Tag> {
        self.documents().nth(idx)
    }

    pub fn document_count(&self) -> usize {
        self.documents().count()
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Nodes per kind, in [`TagKind::ALL`] order.
    pub fn kind_counts(&self) -> [(TagKind, usize); 9] {
        let mut counts = TagKind::ALL.map(|k| (k, 0));
        let mut stack = vec![&self.root];
        while let Some(tag) = stack.pop() {
            counts[tag.kind.code() as usize].1 += 1;
            stack.extend(tag.children.iter());
        }
        counts
    }
}
