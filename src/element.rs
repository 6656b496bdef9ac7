use crate::delimiters::Delimiters;
use crate::path::Path;
use crate::slice::RefCountedSlice;

/// One item of parser output. `children_count` on the container variants is
/// the number of immediate-and-transitive descendants in emission order; a
/// renderer walking a flat element stream skips that many subsequent
/// elements to pass over the subtree.
#[derive(Debug, Clone)]
pub enum Element {
    StaticText(RefCountedSlice),
    Interpolation(Path),
    UnescapedInterpolation(Path),
    Section {
        path: Path,
        children_count: usize,
        inner_text: Option<RefCountedSlice>,
        delimiters: Delimiters,
    },
    InvertedSection {
        path: Path,
        children_count: usize,
    },
    Partial {
        key: String,
        indentation: Option<RefCountedSlice>,
    },
    Parent {
        key: String,
        children_count: usize,
        indentation: Option<RefCountedSlice>,
    },
    Block {
        key: String,
        children_count: usize,
    },
}

/// The external sink that receives completed element batches. In full-AST
/// mode, `render` is called exactly once with every element from the parse;
/// in render-streaming mode it is called once per root-level standalone
/// boundary, and no batch ever splits a section across two calls.
pub trait Render {
    fn render(&mut self, elements: &[Element]);
}
