use std::io::Read;

use crate::delimiters::Delimiters;
use crate::error::{ParseError, ParseErrorKind};
use crate::part::{PartType, SourcePosition, TextPart, TrimState};
use crate::reader::FileReader;
use crate::slice::RefCountedSlice;

/// Tracks the verbatim span of bytes since a section's opening tag, for
/// lambda inner-text capture. `segments` accumulates whole-buffer chunks
/// whenever the live buffer is replaced while the bookmark is open;
/// `local_start` is the offset, within the *current* buffer, where the next
/// segment begins.
struct Bookmark {
    segments: Vec<RefCountedSlice>,
    local_start: usize,
}

/// A resumable tokenizer over either a complete in-memory buffer or an
/// incremental byte stream. Emits [`TextPart`] values with trimming
/// metadata already attached, locates tag boundaries across reads without
/// ever splitting a delimiter, and tracks 1-based line/column.
pub struct TextScanner<R: Read> {
    reader: Option<FileReader<R>>,
    buffer: RefCountedSlice,
    index: usize,
    row: u32,
    col: u32,
    delimiters: Delimiters,
    bookmark: Option<Bookmark>,
    last_tag_start: usize,
}

impl TextScanner<std::io::Empty> {
    /// Scans a complete in-memory template; never refills.
    pub fn from_str(source: impl Into<RefCountedSlice>) -> TextScanner<std::io::Empty> {
        TextScanner {
            reader: None,
            buffer: source.into(),
            index: 0,
            row: 1,
            col: 1,
            delimiters: Delimiters::default(),
            bookmark: None,
            last_tag_start: 0,
        }
    }
}

impl<R: Read> TextScanner<R> {
    pub fn streaming(reader: FileReader<R>) -> Self {
        Self {
            reader: Some(reader),
            buffer: RefCountedSlice::empty(),
            index: 0,
            row: 1,
            col: 1,
            delimiters: Delimiters::default(),
            bookmark: None,
            last_tag_start: 0,
        }
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.delimiters
    }

    pub fn set_delimiters(&mut self, delimiters: Delimiters) {
        self.delimiters = delimiters;
    }

    pub fn position(&self) -> SourcePosition {
        SourcePosition { line: self.row, column: self.col }
    }

    /// The byte offset, in the current buffer, of the opening delimiter of
    /// the most recently returned tag. Valid only until the next call to
    /// [`Self::next`]; used by the parser to finalize a lambda bookmark at
    /// the exact moment it recognizes a matching close tag.
    pub fn last_tag_start(&self) -> usize {
        self.last_tag_start
    }

    /// Records the scanner's current position as the start of a lambda
    /// section's verbatim inner text, to be captured by a later matching
    /// [`Self::end_bookmark`].
    pub fn begin_bookmark(&mut self) {
        self.bookmark = Some(Bookmark { segments: Vec::new(), local_start: self.index });
    }

    /// Finalizes the currently open bookmark, returning the verbatim bytes
    /// between the call to `begin_bookmark` and `close_tag_start` (the byte
    /// offset, in the *current* buffer, immediately before the matching
    /// close tag's opening delimiter).
    pub fn end_bookmark(&mut self, close_tag_start: usize) -> Option<RefCountedSlice> {
        let mut bookmark = self.bookmark.take()?;
        bookmark.segments.push(self.buffer.slice(bookmark.local_start..close_tag_start));
        Some(RefCountedSlice::concat(&bookmark.segments))
    }

    fn advance_to(&mut self, target: usize) {
        for &byte in &self.buffer.as_bytes()[self.index..target] {
            if byte == b'\n' {
                self.row += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        self.index = target;
    }

    fn can_refill(&self) -> bool {
        self.reader.as_ref().is_some_and(|r| !r.finished())
    }

    /// Replaces the live buffer with a freshly read one, carrying forward
    /// everything from `retain_from` onward as the new buffer's prepended
    /// tail. Any open bookmark's unflushed span up to `retain_from` is
    /// captured into a segment first, since those bytes will not exist at
    /// their old offsets once the buffer is replaced.
    fn refill_from(&mut self, retain_from: usize) -> Result<(), ParseError> {
        if let Some(bookmark) = &mut self.bookmark {
            let start = bookmark.local_start.min(retain_from);
            bookmark.segments.push(self.buffer.slice(start..retain_from));
            bookmark.local_start = 0;
        }
        let tail = self.buffer.slice(retain_from..self.buffer.len());
        let reader = self.reader.as_mut().expect("refill requires streaming mode");
        self.buffer = reader.read(tail.as_bytes())?;
        Ok(())
    }

    /// Searches for `needle` starting at `search_from`, refilling (carrying
    /// forward everything from `retain_from` onward) as many times as
    /// necessary until either the needle is found or the source is
    /// exhausted. Returns the absolute match position and the offset that
    /// `retain_from` ended up at in the final buffer (0 if any refill
    /// occurred, unchanged otherwise).
    fn search(
        &mut self,
        mut retain_from: usize,
        mut search_from: usize,
        needle: &[u8],
    ) -> Result<(Option<usize>, usize), ParseError> {
        loop {
            if let Some(rel) = memchr::memmem::find(&self.buffer.as_bytes()[search_from..], needle)
            {
                return Ok((Some(search_from + rel), retain_from));
            }
            if !self.can_refill() {
                return Ok((None, retain_from));
            }
            let delta = retain_from;
            self.refill_from(retain_from)?;
            search_from -= delta;
            retain_from = 0;
        }
    }

    /// Returns the next part, or `None` when the source is exhausted.
    pub fn next(&mut self) -> Result<Option<TextPart>, ParseError> {
        if self.index >= self.buffer.len() {
            if self.can_refill() {
                self.refill_from(self.index)?;
                self.index = 0;
            }
            if self.index >= self.buffer.len() {
                return Ok(None);
            }
        }

        let start_position = self.position();
        let open = self.delimiters.open.clone().into_bytes();
        let (found, base) = self.search(self.index, self.index, &open)?;
        self.index = base;

        match found {
            None => {
                let content = self.buffer.slice(self.index..self.buffer.len());
                self.advance_to(self.buffer.len());
                Ok(Some(self.build_static_text(content, start_position)))
            }
            Some(open_pos) if open_pos > self.index => {
                let content = self.buffer.slice(self.index..open_pos);
                self.advance_to(open_pos);
                Ok(Some(self.build_static_text(content, start_position)))
            }
            Some(open_pos) => self.parse_tag(open_pos, start_position),
        }
    }

    fn parse_tag(
        &mut self,
        open_pos: usize,
        start_position: SourcePosition,
    ) -> Result<Option<TextPart>, ParseError> {
        let content_start = open_pos + self.delimiters.open.len();
        let is_triple = self.delimiters.open == "{{"
            && self.delimiters.close == "}}"
            && self.buffer.as_bytes().get(content_start) == Some(&b'{');

        let inner_start = if is_triple { content_start + 1 } else { content_start };
        let close_marker: Vec<u8> = if is_triple {
            let mut marker = vec![b'}'];
            marker.extend_from_slice(self.delimiters.close.as_bytes());
            marker
        } else {
            self.delimiters.close.as_bytes().to_vec()
        };

        let (found, base) = self.search(content_start, inner_start, &close_marker)?;
        let content_start = base;
        let inner_start = if is_triple { content_start + 1 } else { content_start };
        self.last_tag_start = content_start - self.delimiters.open.len();

        let Some(close_pos) = found else {
            return Err(ParseError::new(
                ParseErrorKind::UnexpectedEof,
                start_position.line,
                start_position.column,
            ));
        };

        let tag_end = close_pos + close_marker.len();
        let raw = self.buffer.slice(inner_start..close_pos);

        let part = if is_triple {
            TextPart::new(raw, PartType::NoEscape, start_position)
        } else {
            self.classify(raw, start_position)?
        };

        self.advance_to(tag_end);
        Ok(Some(part))
    }

    fn classify(
        &self,
        raw: RefCountedSlice,
        start_position: SourcePosition,
    ) -> Result<TextPart, ParseError> {
        let bytes = raw.as_bytes();
        let (part_type, content) = match bytes.first() {
            Some(b'#') => (PartType::Section, raw.slice(1..raw.len())),
            Some(b'^') => (PartType::InvertedSection, raw.slice(1..raw.len())),
            Some(b'/') => (PartType::CloseSection, raw.slice(1..raw.len())),
            Some(b'&') => (PartType::NoEscape, raw.slice(1..raw.len())),
            Some(b'>') => (PartType::Partial, raw.slice(1..raw.len())),
            Some(b'<') => (PartType::Parent, raw.slice(1..raw.len())),
            Some(b'$') => (PartType::Block, raw.slice(1..raw.len())),
            Some(b'!') => (PartType::Comment, raw.slice(1..raw.len())),
            Some(b'=') => {
                if bytes.len() < 2 || bytes[bytes.len() - 1] != b'=' {
                    return Err(ParseError::new(
                        ParseErrorKind::InvalidDelimiters,
                        start_position.line,
                        start_position.column,
                    ));
                }
                (PartType::Delimiters, raw.slice(1..raw.len() - 1))
            }
            _ => (PartType::Interpolation, raw.clone()),
        };
        Ok(TextPart::new(content, part_type, start_position))
    }

    fn build_static_text(&self, content: RefCountedSlice, start_position: SourcePosition) -> TextPart {
        let mut part = TextPart::new(content.clone(), PartType::StaticText, start_position);
        let bytes = content.as_bytes();

        part.right_trimming = match bytes.iter().rposition(|&b| b == b'\n') {
            // No newline inside this run: if it still opens a source line (the
            // start of the buffer, or right after a newline consumed by an
            // earlier run) and is whitespace-only, it's as trimmable as if a
            // newline had just preceded it — a tag that starts the template,
            // or immediately follows a blank line, is still standalone.
            None if start_position.column == 1
                && !bytes.is_empty()
                && bytes.iter().all(|&b| b == b' ' || b == b'\t') =>
            {
                TrimState::AllowTrimming { index: 0, stand_alone: true }
            }
            None => TrimState::PreserveWhitespaces,
            Some(last_newline) => {
                let after = &bytes[last_newline + 1..];
                if after.iter().all(|&b| b == b' ' || b == b'\t') {
                    TrimState::AllowTrimming {
                        index: last_newline + 1,
                        stand_alone: after.len() == bytes.len() - (last_newline + 1),
                    }
                } else {
                    TrimState::PreserveWhitespaces
                }
            }
        };

        part.left_trimming = match bytes.iter().position(|&b| b == b'\n') {
            None => TrimState::PreserveWhitespaces,
            Some(first_newline) => {
                let before = &bytes[..=first_newline];
                if before.iter().all(|&b| b == b' ' || b == b'\t' || b == b'\n') {
                    TrimState::AllowTrimming { index: first_newline, stand_alone: true }
                } else {
                    TrimState::PreserveWhitespaces
                }
            }
        };

        part
    }
}
