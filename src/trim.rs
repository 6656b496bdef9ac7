//! The standalone-tag whitespace trimming algorithm. Applied in the parser
//! each time a new static-text node is produced, and once more at
//! end-of-template to handle the trailing run of nodes.

use crate::node::{BlockType, Node, NodeId};
use crate::part::{PartType, TextPart, TrimState};

/// Cuts the leading whitespace run (recorded by the scanner as
/// `left_trimming`) off `part.content`, fixing up the opposite side's index
/// and marking this side as `Trimmed`.
///
/// `left_trimming.index` names the position of the newline that ends the
/// run, not its length, so the cut removes `index + 1` bytes — the newline
/// itself goes with it, since a standalone tag's own line vanishes whole.
pub fn trim_left(part: &mut TextPart) {
    let TrimState::AllowTrimming { index, .. } = part.left_trimming else {
        return;
    };
    let cut = index + 1;
    part.content = part.content.clone().trim_front(cut);
    if let TrimState::AllowTrimming { index: right_index, stand_alone } = part.right_trimming {
        part.right_trimming =
            TrimState::AllowTrimming { index: right_index.saturating_sub(cut), stand_alone };
    }
    part.left_trimming = TrimState::Trimmed;
}

/// Cuts the trailing whitespace run off `part.content`. The cut span is
/// recorded as `indentation` (propagated to partial/parent children) unless
/// it is empty.
pub fn trim_right(part: &mut TextPart) {
    let TrimState::AllowTrimming { index, .. } = part.right_trimming else {
        return;
    };
    let total_len = part.content.len();
    let cut = total_len - index;
    if cut > 0 {
        part.indentation = Some(part.content.slice(index..total_len));
    } else {
        part.indentation = None;
    }
    part.content = part.content.clone().trim_back(cut);
    part.right_trimming = TrimState::Trimmed;
}

/// Walks backwards from `start` (the candidate node's `prev_node`) deciding
/// whether the chain of standalone-capable tags eventually reaches a line
/// boundary that licenses trimming. Mutates the previous `StaticText` node's
/// trimming state in place as a side effect, per the spec's definition.
fn trim_previous_nodes_right(arena: &mut [Node], start: Option<NodeId>) -> bool {
    let Some(id) = start else {
        // Beginning of the template counts as a boundary.
        return true;
    };

    match arena[id].block_type {
        BlockType::StaticText => match arena[id].text_part.right_trimming {
            TrimState::AllowTrimming { stand_alone, .. } => {
                let prev = arena[id].prev_node;
                let allowed = stand_alone || trim_previous_nodes_right(arena, prev);
                if allowed {
                    trim_right(&mut arena[id].text_part);
                } else {
                    arena[id].text_part.right_trimming = TrimState::PreserveWhitespaces;
                    arena[id].text_part.indentation = None;
                }
                allowed
            }
            TrimState::Trimmed => true,
            TrimState::PreserveWhitespaces => false,
        },
        block_type if can_block_type_be_stand_alone(block_type) => {
            let prev = arena[id].prev_node;
            let allowed = trim_previous_nodes_right(arena, prev);
            // `trim_right` above records the trimmed span as `indentation` on
            // the *StaticText* node it cut it from, but a renderer needs it
            // on the Partial/Parent tag itself (it re-indents the partial's
            // expansion, not the whitespace node, which no longer exists
            // once it's empty). Forward it onto this node when its immediate
            // predecessor is the StaticText run that was just trimmed.
            if allowed && matches!(block_type, BlockType::Partial | BlockType::Parent) {
                if let Some(prev_id) = prev {
                    arena[id].text_part.indentation = arena[prev_id].text_part.indentation.clone();
                }
            }
            allowed
        }
        _ => false,
    }
}

fn can_block_type_be_stand_alone(block_type: BlockType) -> bool {
    !matches!(block_type, BlockType::Interpolation | BlockType::NoEscape | BlockType::Root)
}

/// Called after producing each `StaticText` node: decides whether its left
/// side may be trimmed by walking backwards through previously emitted
/// nodes, per the Mustache standalone-tag rules.
pub fn trim_stand_alone(arena: &mut [Node], node_id: NodeId) {
    let left_trimming = arena[node_id].text_part.left_trimming;
    if !left_trimming.is_allow_trimming() {
        return;
    }
    let prev = arena[node_id].prev_node;
    let allowed = trim_previous_nodes_right(arena, prev);
    if allowed {
        trim_left(&mut arena[node_id].text_part);
    } else {
        arena[node_id].text_part.left_trimming = TrimState::PreserveWhitespaces;
    }
}

/// Called once at end-of-template: walks forward from `last_static_text`
/// through the remainder of the root level's node list; if every node up to
/// the end is a standalone-capable tag, trims the right side of
/// `last_static_text`.
pub fn trim_last(arena: &mut [Node], level_list: &[NodeId], last_static_text: NodeId) {
    let right_trimming = arena[last_static_text].text_part.right_trimming;
    if !right_trimming.is_allow_trimming() {
        return;
    }
    let Some(position) = level_list.iter().position(|&id| id == last_static_text) else {
        return;
    };
    let all_standalone_capable = level_list[position + 1..]
        .iter()
        .all(|&id| can_block_type_be_stand_alone(arena[id].block_type));
    if all_standalone_capable {
        trim_right(&mut arena[last_static_text].text_part);
    }
}

/// Whether a tag's part type allows it to be considered standalone, used by
/// the parser when deciding whether to mark a previously-produced node.
pub fn part_can_be_stand_alone(part_type: PartType) -> bool {
    part_type.can_be_stand_alone()
}
