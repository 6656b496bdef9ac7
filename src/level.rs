use crate::delimiters::Delimiters;
use crate::node::{Node, NodeId};

/// One frame on the parse stack, corresponding to one nesting depth of
/// sections/parents/blocks. The root level has no parent and starts with
/// the default `{{ }}` delimiters.
#[derive(Debug)]
pub struct Level {
    pub delimiters: Delimiters,
    pub current_node: Option<NodeId>,
    /// The level's `current_node` at creation time (seeded from the parent
    /// level for non-root levels). Restored as the fallback `current_node`
    /// when [`LevelStack::remove_last`] empties `list`.
    seed: Option<NodeId>,
    pub list: Vec<NodeId>,
}

impl Level {
    fn new(delimiters: Delimiters, seed: Option<NodeId>) -> Self {
        Self { delimiters, current_node: seed, seed, list: Vec::new() }
    }
}

/// The stack of [`Level`]s a parse is currently nested in, plus the node
/// arena they index into. Levels are pushed on `{{#x}}`/`{{^x}}`/`{{<x}}`/
/// `{{$x}}` and popped on the matching `{{/x}}`.
#[derive(Debug)]
pub struct LevelStack {
    arena: Vec<Node>,
    levels: Vec<Level>,
}

impl LevelStack {
    pub fn init(delimiters: Delimiters) -> Self {
        Self { arena: Vec::new(), levels: vec![Level::new(delimiters, None)] }
    }

    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn arena(&self) -> &[Node] {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut [Node] {
        &mut self.arena
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.arena[id]
    }

    pub fn current_level(&self) -> &Level {
        self.levels.last().expect("level stack is never empty")
    }

    pub fn current_level_mut(&mut self) -> &mut Level {
        self.levels.last_mut().expect("level stack is never empty")
    }

    pub fn delimiters(&self) -> &Delimiters {
        &self.current_level().delimiters
    }

    pub fn set_delimiters(&mut self, delimiters: Delimiters) {
        self.current_level_mut().delimiters = delimiters;
    }

    /// Appends a freshly built node to the current level's list. The new
    /// node's `prev_node` is the level's prior `current_node`, which for the
    /// first node of a level was already seeded from the parent level by
    /// [`Self::next_level`] — this is how the trimming walk crosses level
    /// boundaries without knowing about the stack.
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = self.arena.len();
        self.arena.push(node);
        let level = self.current_level_mut();
        level.list.push(id);
        level.current_node = Some(id);
        id
    }

    /// Pushes a new child level. Its `current_node` is seeded with the
    /// parent's `current_node` so the first static-text node produced in the
    /// child can still trim against material preceding the opening tag.
    pub fn next_level(&mut self, delimiters: Delimiters) {
        let seed = self.current_level().current_node;
        self.levels.push(Level::new(delimiters, seed));
    }

    /// Pops the current level, returning the nodes it accumulated (in
    /// emission order) so the caller can attach them as a subtree and
    /// restore the parent's delimiters.
    pub fn end_level(&mut self) -> Vec<NodeId> {
        let level = self.levels.pop().expect("end_level called on the root level");
        level.list
    }

    /// Removes the most recently added node from the current level's list
    /// (used when a static-text node trims down to zero length). Does not
    /// reclaim the arena slot; it simply stops referencing it.
    pub fn remove_last(&mut self) {
        let level = self.current_level_mut();
        level.list.pop();
        level.current_node = level.list.last().copied().or(level.seed);
    }
}
