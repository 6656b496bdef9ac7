use crate::delimiters::Delimiters;
use crate::part::{PartType, TextPart};
use crate::slice::RefCountedSlice;

/// Mirrors [`PartType`] but adds `Root` for the implicit top-level node that
/// owns the whole parse tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockType {
    Root,
    StaticText,
    Comment,
    Delimiters,
    Interpolation,
    NoEscape,
    Section,
    InvertedSection,
    CloseSection,
    Partial,
    Parent,
    Block,
}

impl From<PartType> for BlockType {
    fn from(value: PartType) -> Self {
        match value {
            PartType::StaticText => BlockType::StaticText,
            PartType::Comment => BlockType::Comment,
            PartType::Delimiters => BlockType::Delimiters,
            PartType::Interpolation => BlockType::Interpolation,
            PartType::NoEscape => BlockType::NoEscape,
            PartType::Section => BlockType::Section,
            PartType::InvertedSection => BlockType::InvertedSection,
            PartType::CloseSection => BlockType::CloseSection,
            PartType::Partial => BlockType::Partial,
            PartType::Parent => BlockType::Parent,
            PartType::Block => BlockType::Block,
        }
    }
}

/// Index into the parse arena ([`crate::parser::Parser`]'s `Vec<Node>`).
/// `Node`s never move once created, so this index is stable for the
/// lifetime of one `parse` call.
pub type NodeId = usize;

/// One entry in the parse tree. Nodes are allocated in a flat arena rather
/// than linked by owned pointers; the `prev_node` back-reference is the only
/// cross-node link, used exclusively by the trimming walk.
#[derive(Debug, Clone)]
pub struct Node {
    pub block_type: BlockType,
    pub text_part: TextPart,
    /// The previous sibling at this level, or — for the first node of a new
    /// level — the last node of the enclosing level, so the trimming walk
    /// can cross level boundaries. `None` only for the very first node of
    /// the template.
    pub prev_node: Option<NodeId>,
    /// Populated once the matching `CloseSection` is seen; the number of
    /// descendant nodes (recursively) that belong to this subtree in
    /// emission order.
    pub children_count: usize,
    /// Verbatim source text between a section's open and close tags,
    /// captured via the scanner's bookmark mechanism. Only meaningful for
    /// `Section` nodes.
    pub inner_text: Option<RefCountedSlice>,
    /// The delimiters in effect for this node's own children. Only
    /// meaningful for `Section`/`InvertedSection`/`Parent`/`Block` nodes;
    /// carried so a lambda's captured `inner_text` can later be re-parsed
    /// with the delimiters it was originally written against.
    pub delimiters: Delimiters,
}

impl Node {
    pub fn new(block_type: BlockType, text_part: TextPart, prev_node: Option<NodeId>) -> Self {
        Self {
            block_type,
            text_part,
            prev_node,
            children_count: 0,
            inner_text: None,
            delimiters: Delimiters::default(),
        }
    }

    pub fn identifier(&self) -> &str {
        self.text_part.as_str().trim()
    }
}
