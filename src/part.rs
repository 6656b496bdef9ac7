use crate::slice::RefCountedSlice;

/// Discriminates what a [`TextPart`] represents, mirroring the tag sigils of
/// the Mustache syntax plus `StaticText` for everything between tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartType {
    StaticText,
    Comment,
    Delimiters,
    Interpolation,
    /// `&name` or `{{{name}}}` — unescaped interpolation.
    NoEscape,
    Section,
    InvertedSection,
    CloseSection,
    Partial,
    Parent,
    Block,
}

impl PartType {
    /// Non-interpolation tags may be "standalone": alone on their line, with
    /// their entire line (including the trailing newline) elided.
    pub fn can_be_stand_alone(&self) -> bool {
        !matches!(self, PartType::Interpolation | PartType::NoEscape)
    }
}

/// Whitespace-trimming state attached to one side (left or right) of a
/// [`TextPart`]'s content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrimState {
    /// No adjacent whitespace run can be trimmed from this side.
    PreserveWhitespaces,
    /// This side has already been trimmed.
    Trimmed,
    /// A whitespace run starting/ending at `index` (a byte offset into
    /// `content`) could be trimmed if the standalone-tag walk allows it.
    /// `stand_alone` is true when the run reaches all the way to a line
    /// boundary on its own, independent of neighboring nodes.
    AllowTrimming { index: usize, stand_alone: bool },
}

impl TrimState {
    pub fn is_allow_trimming(&self) -> bool {
        matches!(self, TrimState::AllowTrimming { .. })
    }
}

/// A tag opener's source position, used only for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

/// The atomic unit of output from the [`crate::scanner::TextScanner`]: either
/// a run of static text or the decoded body of a single tag.
#[derive(Debug, Clone)]
pub struct TextPart {
    pub content: RefCountedSlice,
    pub part_type: PartType,
    pub source: SourcePosition,
    pub left_trimming: TrimState,
    pub right_trimming: TrimState,
    pub indentation: Option<RefCountedSlice>,
    pub is_stand_alone: bool,
}

impl TextPart {
    pub fn new(content: RefCountedSlice, part_type: PartType, source: SourcePosition) -> Self {
        Self {
            content,
            part_type,
            source,
            left_trimming: TrimState::PreserveWhitespaces,
            right_trimming: TrimState::PreserveWhitespaces,
            indentation: None,
            is_stand_alone: false,
        }
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(self.content.as_bytes()).unwrap_or("")
    }

    pub fn is_empty_content(&self) -> bool {
        self.content.is_empty()
    }
}
