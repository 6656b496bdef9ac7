//! Exercises `parse_template_file`'s incremental reader against the same
//! templates `tests/scenarios.rs` parses from memory, with a `read_buffer_size`
//! small enough that every template here is read across several chunks.

use std::io::Write;

use mustache_core::{parse_template_file, parse_template_str, Element, ParserOptions, VecRender};

/// A comparable summary of an element sequence. `Element` itself has no
/// `PartialEq` (a `RefCountedSlice` holds borrowed/ref-counted bytes, not a
/// value type), so tests compare this instead.
fn describe(elements: &[Element]) -> Vec<String> {
    elements
        .iter()
        .map(|element| match element {
            Element::StaticText(slice) => format!("text:{}", String::from_utf8_lossy(slice.as_bytes())),
            Element::Interpolation(path) => format!("interp:{}", path.segments.join(".")),
            Element::UnescapedInterpolation(path) => format!("raw:{}", path.segments.join(".")),
            Element::Section { path, children_count, .. } => {
                format!("section:{}/{children_count}", path.segments.join("."))
            }
            Element::InvertedSection { path, children_count } => {
                format!("inverted:{}/{children_count}", path.segments.join("."))
            }
            Element::Partial { key, .. } => format!("partial:{key}"),
            Element::Parent { key, children_count, .. } => format!("parent:{key}/{children_count}"),
            Element::Block { key, children_count } => format!("block:{key}/{children_count}"),
        })
        .collect()
}

fn parse_from_file(source: &str, read_buffer_size: usize) -> Vec<Element> {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(source.as_bytes()).unwrap();
    file.flush().unwrap();

    let options = ParserOptions::new().with_read_buffer_size(read_buffer_size);
    let mut render = VecRender::new();
    parse_template_file(file.path(), options, &mut render).unwrap();
    render.into_elements()
}

fn parse_from_memory(source: &str) -> Vec<Element> {
    let mut render = VecRender::new();
    parse_template_str(source, ParserOptions::default(), &mut render).unwrap();
    render.into_elements()
}

#[test]
fn a_tag_split_across_read_chunks_still_parses() {
    // `read_buffer_size` of 5 forces the scanner to refill mid-tag, since
    // "{{name}}Just static" is 20 bytes and no single chunk holds a whole
    // delimiter-to-delimiter span.
    let source = "{{name}}Just static";
    assert_eq!(describe(&parse_from_file(source, 5)), describe(&parse_from_memory(source)));
}

#[test]
fn a_standalone_section_split_across_read_chunks_trims_correctly() {
    let source = "{{#items}}\n  * {{.}}\n{{/items}}\nend";
    assert_eq!(describe(&parse_from_file(source, 8)), describe(&parse_from_memory(source)));
}

#[test]
fn a_long_template_spanning_many_chunks_matches_in_memory_parsing() {
    let mut source = String::from("{{#outer}}\n");
    for i in 0..50 {
        source.push_str(&format!("line {i} {{{{value}}}}\n"));
    }
    source.push_str("{{/outer}}\ntail\n");

    assert_eq!(describe(&parse_from_file(&source, 16)), describe(&parse_from_memory(&source)));
}

#[test]
fn file_backed_parsing_reports_errors_with_correct_positions() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"first line\nsecond {{/oops}} line").unwrap();
    file.flush().unwrap();

    let options = ParserOptions::new().with_read_buffer_size(8);
    let mut render = VecRender::new();
    let err = parse_template_file(file.path(), options, &mut render).unwrap_err();
    assert_eq!((err.line, err.column), (2, 8));
}
