use crate::element::{Element, Render};

/// A [`Render`] sink that simply appends every batch it receives into an
/// owned `Vec`, for callers that want a complete-AST result without writing
/// their own sink. Analogous to the teacher's debug tree collection in its
/// own parser test module.
#[derive(Debug, Default)]
pub struct VecRender {
    pub elements: Vec<Element>,
}

impl VecRender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_elements(self) -> Vec<Element> {
        self.elements
    }
}

impl Render for VecRender {
    fn render(&mut self, elements: &[Element]) {
        self.elements.extend_from_slice(elements);
    }
}
