//! Invariant checks that hold across many inputs rather than one scenario
//! apiece, in the teacher's `#[test_case]` tabular style.

use test_case::test_case;

use mustache_core::{parse_template_str, Element, ParserOptions, VecRender};

fn parse(source: &str) -> Vec<Element> {
    let mut render = VecRender::new();
    parse_template_str(source, ParserOptions::default(), &mut render).unwrap();
    render.into_elements()
}

fn reconstruct(elements: &[Element]) -> String {
    let mut out = String::new();
    for element in elements {
        if let Element::StaticText(slice) = element {
            out.push_str(&String::from_utf8_lossy(slice.as_bytes()));
        }
    }
    out
}

/// Every `children_count` on a container must equal the number of elements
/// actually emitted in the span immediately following it, so a renderer can
/// skip the subtree by counting elements rather than re-parsing.
fn assert_children_counts_are_walkable(elements: &[Element]) {
    fn count_of(element: &Element) -> Option<usize> {
        match element {
            Element::Section { children_count, .. } => Some(*children_count),
            Element::InvertedSection { children_count, .. } => Some(*children_count),
            Element::Parent { children_count, .. } => Some(*children_count),
            Element::Block { children_count, .. } => Some(*children_count),
            _ => None,
        }
    }

    for (index, element) in elements.iter().enumerate() {
        if let Some(children_count) = count_of(element) {
            assert!(
                index + 1 + children_count <= elements.len(),
                "children_count {children_count} at index {index} overruns the element stream"
            );
        }
    }
}

#[test_case("plain text with no tags at all"; "no_tags")]
#[test_case("{{#a}}{{#b}}{{#c}}x{{/c}}{{/b}}{{/a}}"; "deeply_nested_sections")]
#[test_case("{{#a}}{{^b}}{{#c}}x{{/c}}{{/b}}{{/a}}"; "mixed_section_kinds")]
#[test_case("{{<layout}}{{$a}}{{$b}}x{{/b}}{{/a}}{{/layout}}"; "nested_blocks_in_a_parent")]
#[test_case(""; "empty_template")]
fn children_counts_never_overrun_the_element_stream(source: &str) {
    assert_children_counts_are_walkable(&parse(source));
}

#[test_case("Hello {{name}}, you have {{count}} items."; "several_interpolations")]
#[test_case("{{#people}}{{name}}{{/people}}"; "one_section")]
#[test_case("no tags whatsoever"; "static_only")]
fn static_text_plus_tags_reconstructs_non_tag_source_bytes(source: &str) {
    // Stripping every tag from `source` by hand and stripping every non-
    // StaticText element from the parse should leave the same bytes: tags
    // never consume or alter the static spans around them.
    let elements = parse(source);
    let rebuilt = reconstruct(&elements);
    let without_tags: String = {
        let mut out = String::new();
        let mut in_tag = false;
        let mut chars = source.chars().peekable();
        while let Some(c) = chars.next() {
            if !in_tag && c == '{' && chars.peek() == Some(&'{') {
                in_tag = true;
                chars.next();
                continue;
            }
            if in_tag && c == '}' && chars.peek() == Some(&'}') {
                in_tag = false;
                chars.next();
                continue;
            }
            if !in_tag {
                out.push(c);
            }
        }
        out
    };
    assert_eq!(rebuilt, without_tags);
}

#[test_case(1; "buffer_of_one_delimiter_char")]
#[test_case(3; "buffer_shorter_than_a_tag")]
#[test_case(7; "buffer_close_to_a_tag_length")]
#[test_case(4096; "buffer_much_larger_than_the_template")]
fn read_buffer_size_has_no_effect_on_in_memory_parsing(read_buffer_size: usize) {
    // `parse_template_str` builds `TextScanner::from_str`, which holds the
    // whole source in one buffer regardless of `read_buffer_size` — that
    // option only governs `parse_template_file`'s incremental reader
    // (exercised with a real file in tests/streaming.rs).
    let source = "{{#a}}\n  {{b}}\n{{/a}}\ntrailing text";
    let mut render = VecRender::new();
    parse_template_str(source, ParserOptions::new().with_read_buffer_size(read_buffer_size), &mut render).unwrap();
    assert_eq!(format!("{:?}", render.into_elements()), format!("{:?}", parse(source)));
}

#[test]
fn ref_counted_slices_drop_their_backing_allocation_once_unreferenced() {
    use mustache_core::RefCountedSlice;

    let slice: RefCountedSlice = "hello world".into();
    let view = slice.slice(0..5);
    assert_eq!(view.as_bytes(), b"hello");
    drop(slice);
    // `view` still owns a reference to the same backing allocation, so its
    // bytes remain valid after the original handle is dropped.
    assert_eq!(view.as_bytes(), b"hello");
}
