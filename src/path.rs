/// A dotted identifier split into path segments, e.g. `a.b.c` → `["a", "b",
/// "c"]`. Resolving a `Path` against a data context is outside this crate's
/// scope; callers receive `Path` values and do their own lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub segments: Vec<String>,
}

impl Path {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }
}

/// Splits a validated identifier (already checked to contain no internal
/// whitespace) into path segments on `.`. `.` alone refers to the current
/// context and yields a single empty-string segment, matching the Mustache
/// spec's "implicit iterator" syntax.
pub fn parse_path(identifier: &str) -> Path {
    if identifier == "." {
        return Path::new(vec![String::new()]);
    }
    Path::new(identifier.split('.').map(str::to_owned).collect())
}
