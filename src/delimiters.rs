/// The pair of strings that bracket a tag. Mutable mid-template via the
/// `{{=open close=}}` set-delimiters tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delimiters {
    pub open: String,
    pub close: String,
}

impl Delimiters {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self { open: open.into(), close: close.into() }
    }

    pub fn default_mustache() -> Self {
        Self::new("{{", "}}")
    }

    /// The longest of the two delimiter strings; bounds how far ahead the
    /// scanner must keep buffered to never miss a delimiter split across a
    /// read boundary.
    pub fn max_len(&self) -> usize {
        self.open.len().max(self.close.len())
    }
}

impl Default for Delimiters {
    fn default() -> Self {
        Self::default_mustache()
    }
}
