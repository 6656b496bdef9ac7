//! A tokenizer, parse-tree builder, and standalone-tag whitespace trimmer
//! for the Mustache template language. This crate turns template source
//! into a flat stream of [`Element`]s; resolving interpolations and
//! sections against a data context and producing final output text is left
//! to a caller's [`Render`] implementation.

pub use config::{ParserOptions, RenderMode};
pub use delimiters::Delimiters;
pub use element::{Element, Render};
pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use parser::Parser;
pub use path::{parse_path, Path};
pub use reader::FileReader;
pub use render::VecRender;
pub use scanner::TextScanner;
pub use slice::RefCountedSlice;

mod config;
mod delimiters;
mod element;
mod error;
mod level;
mod node;
mod part;
mod parser;
mod path;
mod reader;
mod render;
mod scanner;
mod slice;
mod trim;

use std::fs::File;
use std::io::BufReader;

/// Parses a complete in-memory template, delivering every element to
/// `render` in one batch. `options.render_mode` is honored, but with a
/// fully-buffered source there is no streaming benefit to `RenderMode::
/// Streaming` beyond smaller individual `render` calls.
pub fn parse_template_str(
    source: &str,
    options: ParserOptions,
    render: &mut dyn Render,
) -> ParseResult<()> {
    let scanner = TextScanner::from_str(source);
    let mut parser = Parser::new(scanner, options);
    if parser.parse(render) {
        Ok(())
    } else {
        Err(parser.last_error().cloned().expect("parse failed without recording an error"))
    }
}

/// Parses a template from a file, reading it incrementally rather than
/// loading it into memory up front. `options.read_buffer_size` bounds how
/// much of the file is held in memory at once, after enforcing a minimum of
/// `2 * options` delimiters' worth of bytes so a delimiter can never be
/// split unrecoverably across a read.
pub fn parse_template_file(
    path: impl AsRef<std::path::Path>,
    mut options: ParserOptions,
    render: &mut dyn Render,
) -> ParseResult<()> {
    let minimum = 2 * Delimiters::default_mustache().max_len().max(8);
    if options.read_buffer_size < minimum {
        options = options.with_read_buffer_size(minimum);
    }
    let file = File::open(path)?;
    let reader = FileReader::new(BufReader::new(file), options.read_buffer_size);
    let scanner = TextScanner::streaming(reader);
    let mut parser = Parser::new(scanner, options);
    if parser.parse(render) {
        Ok(())
    } else {
        Err(parser.last_error().cloned().expect("parse failed without recording an error"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_template_str_reports_errors() {
        let mut render = VecRender::new();
        let err = parse_template_str("{{/unopened}}", ParserOptions::default(), &mut render).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedCloseSection { found: "unopened".to_string() });
    }

    #[test]
    fn parse_template_str_collects_elements() {
        let mut render = VecRender::new();
        parse_template_str("Hi {{name}}", ParserOptions::default(), &mut render).unwrap();
        assert_eq!(render.elements.len(), 2);
    }
}
