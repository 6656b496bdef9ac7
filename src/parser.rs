use std::io::Read;

use crate::config::{ParserOptions, RenderMode};
use crate::delimiters::Delimiters;
use crate::element::{Element, Render};
use crate::error::{ParseError, ParseErrorKind};
use crate::level::LevelStack;
use crate::node::{BlockType, Node, NodeId};
use crate::part::{PartType, TrimState};
use crate::path::parse_path;
use crate::scanner::TextScanner;
use crate::slice::RefCountedSlice;
use crate::trim::{trim_last, trim_stand_alone};

/// One entry of the stack of currently-open sections/inverted
/// sections/parents/blocks, tracked alongside [`LevelStack`] so a close tag
/// can be validated against the identifier that opened it.
struct Opener {
    node_id: NodeId,
    identifier: String,
    is_lambda_section: bool,
}

/// Drives the scanner and level stack to produce a sequence of [`Element`]s,
/// delivered to a caller-supplied [`Render`] sink. Owns the arena of parsed
/// nodes for the duration of one `parse` call.
pub struct Parser<R: Read> {
    scanner: TextScanner<R>,
    levels: LevelStack,
    openers: Vec<Opener>,
    options: ParserOptions,
    last_error: Option<ParseError>,
}

impl<R: Read> Parser<R> {
    pub fn new(scanner: TextScanner<R>, options: ParserOptions) -> Self {
        let levels = LevelStack::init(scanner.delimiters().clone());
        Self { scanner, levels, openers: Vec::new(), options, last_error: None }
    }

    pub fn last_error(&self) -> Option<&ParseError> {
        self.last_error.as_ref()
    }

    /// Runs the parse to completion, delivering elements to `render`.
    /// Returns `true` on success; on failure, `last_error` is populated and
    /// this returns `false`.
    pub fn parse(&mut self, render: &mut dyn Render) -> bool {
        match self.run(render) {
            Ok(()) => true,
            Err(err) => {
                self.last_error = Some(err);
                false
            }
        }
    }

    /// Used only for errors with no specific tag to blame (EOF at the end of
    /// input with sections still open): the scanner's current position.
    fn position_error(&self, kind: ParseErrorKind) -> ParseError {
        let position = self.scanner.position();
        ParseError::new(kind, position.line, position.column)
    }

    /// Errors attributable to one tag (bad identifier, mismatched close,
    /// malformed delimiters) report that tag's own opener position, not
    /// wherever the scanner has advanced to after consuming it.
    fn tag_error(&self, part: &crate::part::TextPart, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, part.source.line, part.source.column)
    }

    /// Splits `content` on whitespace; valid iff exactly one non-empty
    /// token results.
    fn parse_identifier<'a>(&self, content: &'a str) -> Result<&'a str, ParseErrorKind> {
        let mut tokens = content.split_whitespace();
        let first = tokens.next().ok_or(ParseErrorKind::InvalidIdentifier)?;
        if tokens.next().is_some() {
            return Err(ParseErrorKind::InvalidIdentifier);
        }
        Ok(first)
    }

    /// Builds a node chained onto the current level's `current_node` and
    /// appends it, mirroring what [`crate::level::LevelStack::add_node`]'s
    /// own documentation promises but does not itself implement.
    fn push_node(&mut self, block_type: BlockType, part: crate::part::TextPart) -> NodeId {
        let prev = self.levels.current_level().current_node;
        self.levels.add_node(Node::new(block_type, part, prev))
    }

    fn parse_delimiters_tag(&self, part: &crate::part::TextPart) -> Result<Delimiters, ParseError> {
        let mut tokens = part.as_str().split_whitespace();
        let open = tokens.next();
        let close = tokens.next();
        let extra = tokens.next();
        match (open, close, extra) {
            (Some(open), Some(close), None) if !open.is_empty() && !close.is_empty() => {
                Ok(Delimiters::new(open, close))
            }
            _ => Err(self.tag_error(part, ParseErrorKind::InvalidDelimiters)),
        }
    }

    /// Iterative driver: an explicit `openers` stack stands in for
    /// recursion, so section nesting depth never risks the native call
    /// stack. `self.levels` still models one `Level` per nesting depth, as
    /// [`crate::trim`] expects.
    fn run(&mut self, render: &mut dyn Render) -> Result<(), ParseError> {
        loop {
            let part = match self.scanner.next()? {
                Some(part) => part,
                None => {
                    if self.openers.is_empty() {
                        break;
                    }
                    return Err(self.position_error(ParseErrorKind::UnexpectedEof));
                }
            };

            match part.part_type {
                PartType::StaticText => {
                    let id = self.push_node(BlockType::StaticText, part);
                    trim_stand_alone(self.levels.arena_mut(), id);
                    if self.levels.node(id).text_part.is_empty_content() {
                        self.levels.remove_last();
                    } else {
                        self.maybe_flush_streaming_batch(render);
                    }
                }
                PartType::Comment => {
                    let id = self.push_node(BlockType::Comment, part);
                    if let Some(prev_id) = self.levels.node(id).prev_node {
                        let is_comment_stand_alone =
                            match self.levels.node(prev_id).text_part.right_trimming {
                                TrimState::AllowTrimming { stand_alone, .. } => stand_alone,
                                TrimState::Trimmed => true,
                                TrimState::PreserveWhitespaces => false,
                            };
                        if is_comment_stand_alone {
                            self.levels.node_mut(prev_id).text_part.is_stand_alone = true;
                        }
                    }
                }
                PartType::Delimiters => {
                    let new_delimiters = self.parse_delimiters_tag(&part)?;
                    self.scanner.set_delimiters(new_delimiters.clone());
                    self.push_node(BlockType::Delimiters, part);
                    self.levels.set_delimiters(new_delimiters);
                }
                PartType::CloseSection => {
                    let identifier = self
                        .parse_identifier(part.as_str())
                        .map_err(|kind| self.tag_error(&part, kind))?
                        .to_string();
                    let Some(opener) = self.openers.pop() else {
                        return Err(self.tag_error(&part, ParseErrorKind::UnexpectedCloseSection {
                            found: identifier,
                        }));
                    };
                    if identifier != opener.identifier {
                        return Err(self.tag_error(&part, ParseErrorKind::ClosingTagMismatch {
                            opened: opener.identifier,
                            closed: identifier,
                        }));
                    }
                    if opener.is_lambda_section {
                        let close_start = self.scanner.last_tag_start();
                        let inner_text = self.scanner.end_bookmark(close_start);
                        self.levels.node_mut(opener.node_id).inner_text = inner_text;
                    }
                    // Chained into the child level so the backward trim walk
                    // sees the close tag itself, not the open tag, as the
                    // thing immediately preceding whatever follows the
                    // section — matching the real token order.
                    let close_id = self.push_node(BlockType::CloseSection, part);

                    let children = self.levels.end_level();
                    self.levels.node_mut(opener.node_id).children_count =
                        count_descendants(self.levels.arena(), &children);
                    self.scanner.set_delimiters(self.levels.delimiters().clone());

                    let level = self.levels.current_level_mut();
                    level.list.extend(children);
                    level.current_node = Some(close_id);
                }
                PartType::Section
                | PartType::InvertedSection
                | PartType::Parent
                | PartType::Block => {
                    let identifier = self
                        .parse_identifier(part.as_str())
                        .map_err(|kind| self.tag_error(&part, kind))?
                        .to_string();
                    let block_type = BlockType::from(part.part_type);
                    let is_lambda_section =
                        self.options.lambdas_enabled && block_type == BlockType::Section;

                    let active_delimiters = self.scanner.delimiters().clone();
                    let id = self.push_node(block_type, part);
                    self.levels.node_mut(id).delimiters = active_delimiters.clone();

                    if is_lambda_section {
                        self.scanner.begin_bookmark();
                    }

                    self.openers.push(Opener { node_id: id, identifier, is_lambda_section });
                    self.levels.next_level(active_delimiters);
                }
                PartType::Interpolation | PartType::NoEscape | PartType::Partial => {
                    self.parse_identifier(part.as_str()).map_err(|kind| self.tag_error(&part, kind))?;
                    let block_type = BlockType::from(part.part_type);
                    self.push_node(block_type, part);
                }
            }
        }

        let root_list = self.levels.current_level().list.clone();
        if let Some(last_static_text) =
            root_list.iter().rev().copied().find(|&id| self.levels.node(id).block_type == BlockType::StaticText)
        {
            trim_last(self.levels.arena_mut(), &root_list, last_static_text);
        }

        let remaining = std::mem::take(&mut self.levels.current_level_mut().list);
        self.produce_nodes_for(render, &remaining);
        Ok(())
    }

    fn maybe_flush_streaming_batch(&mut self, render: &mut dyn Render) {
        if !self.openers.is_empty() || self.options.render_mode != RenderMode::Streaming {
            return;
        }
        // The freshly-pushed node (`list.last()`) is the one about to be
        // *retained* across the flush, not flushed — it can't have been
        // right-trimmed yet since that only happens to an earlier node via
        // this same node's backward trim walk. The node that would actually
        // end up last in `flushed` is the one just before it.
        let list = &self.levels.current_level().list;
        let Some(boundary_id) = list.len().checked_sub(2).map(|i| list[i]) else { return };
        let is_boundary =
            matches!(self.levels.node(boundary_id).text_part.right_trimming, TrimState::Trimmed);
        if !is_boundary {
            return;
        }
        let level = self.levels.current_level_mut();
        let retained = level.list.pop();
        let flushed = std::mem::take(&mut level.list);
        self.produce_nodes_for(render, &flushed);
        let level = self.levels.current_level_mut();
        if let Some(id) = retained {
            level.list.push(id);
        }
    }

    /// Walks `list`, builds an `Element` for each node with emittable
    /// content, and delivers the batch to `render` in one call.
    fn produce_nodes_for(&mut self, render: &mut dyn Render, list: &[NodeId]) {
        let mut elements = Vec::with_capacity(list.len());
        for &id in list {
            if let Some(element) = self.create_element(id) {
                elements.push(element);
            }
        }
        if !elements.is_empty() {
            render.render(&elements);
        }
    }

    fn create_element(&self, id: NodeId) -> Option<Element> {
        let node = self.levels.node(id);
        match node.block_type {
            BlockType::Root | BlockType::Comment | BlockType::Delimiters | BlockType::CloseSection => None,
            // A node trimmed to nothing by a later node's backward trim walk
            // (e.g. the leading indentation of a standalone tag) never reaches
            // `render` — only nodes with non-empty content do.
            BlockType::StaticText if node.text_part.is_empty_content() => None,
            BlockType::StaticText => {
                Some(Element::StaticText(self.copy_if_needed(node.text_part.content.clone())))
            }
            BlockType::Interpolation => Some(Element::Interpolation(parse_path(node.identifier()))),
            BlockType::NoEscape => Some(Element::UnescapedInterpolation(parse_path(node.identifier()))),
            BlockType::Section => Some(Element::Section {
                path: parse_path(node.identifier()),
                children_count: node.children_count,
                inner_text: node.inner_text.clone().map(|s| self.copy_if_needed(s)),
                delimiters: node.delimiters.clone(),
            }),
            BlockType::InvertedSection => Some(Element::InvertedSection {
                path: parse_path(node.identifier()),
                children_count: node.children_count,
            }),
            BlockType::Partial => Some(Element::Partial {
                key: node.identifier().to_string(),
                indentation: node.text_part.indentation.clone().map(|s| self.copy_if_needed(s)),
            }),
            BlockType::Parent => Some(Element::Parent {
                key: node.identifier().to_string(),
                children_count: node.children_count,
                indentation: node.text_part.indentation.clone().map(|s| self.copy_if_needed(s)),
            }),
            BlockType::Block => Some(Element::Block {
                key: node.identifier().to_string(),
                children_count: node.children_count,
            }),
        }
    }

    fn copy_if_needed(&self, slice: RefCountedSlice) -> RefCountedSlice {
        if self.options.copy_strings {
            RefCountedSlice::from_bytes(slice.as_bytes().to_vec())
        } else {
            slice
        }
    }
}

/// Whether a node produces an [`Element`] at all; `Comment`, `Delimiters`,
/// and `CloseSection` nodes exist only to keep the trim walk's `prev_node`
/// chain accurate and never reach `render`, and a `StaticText` node trimmed
/// to nothing by a later node's backward walk emits nothing either.
fn is_emitting(node: &Node) -> bool {
    match node.block_type {
        BlockType::Root | BlockType::Comment | BlockType::Delimiters | BlockType::CloseSection => false,
        BlockType::StaticText => !node.text_part.is_empty_content(),
        _ => true,
    }
}

/// Counts every *emitted* node in `list` — used to populate `children_count`
/// on the just-closed opener. `list` is already the fully flattened
/// transitive child list (a closed level's nodes are merged straight into
/// its parent's list via `extend`, which itself was already flattened one
/// level down when *that* level closed), so a nested section's own
/// descendants already appear here as direct entries; adding its
/// `children_count` on top would double-count them. Must match exactly what
/// [`Parser::create_element`] turns into an `Element`, since a renderer uses
/// this count to skip over a subtree in the flat element stream.
fn count_descendants(arena: &[Node], list: &[NodeId]) -> usize {
    list.iter().filter(|&&id| is_emitting(&arena[id])).count()
}
