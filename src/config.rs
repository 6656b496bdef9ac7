/// Whether output is collected into one final element sequence or delivered
/// to the render sink incrementally as standalone boundaries are crossed.
/// The teacher's `intl_markdown` specializes the analogous choice
/// (`ParseContext`'s `lex_context`/trivia options) at compile time via
/// generics; targets without monomorphization represent it as a runtime
/// enum instead, per the source's own design notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// `render.render` is called exactly once, with the complete element
    /// sequence for the whole template.
    FullAst,
    /// `render.render` is called once per root-level standalone boundary;
    /// no call ever splits a section across two batches.
    Streaming,
}

/// Runtime knobs for a single [`crate::parser::Parser::parse`] call, built
/// with a chained `with_*` API in the teacher's `ParseContext` style.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// Minimum enforced at `2 * delimiters.max_len()` when streaming.
    pub read_buffer_size: usize,
    pub render_mode: RenderMode,
    /// When disabled, sections skip bookmarking entirely, saving the
    /// ref-count bookkeeping a lambda-less template doesn't need.
    pub lambdas_enabled: bool,
    /// When enabled, `indentation`/`inner_text` slices handed to `Element`s
    /// are copied into owned buffers instead of sharing the source's
    /// ref-counted storage, trading memory for simpler buffer lifetimes.
    pub copy_strings: bool,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    pub fn with_render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    pub fn with_lambdas_enabled(mut self, enabled: bool) -> Self {
        self.lambdas_enabled = enabled;
        self
    }

    pub fn with_copy_strings(mut self, enabled: bool) -> Self {
        self.copy_strings = enabled;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            read_buffer_size: 8192,
            render_mode: RenderMode::FullAst,
            lambdas_enabled: true,
            copy_strings: false,
        }
    }
}
