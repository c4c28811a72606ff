#![allow(clippy::module_inception)]

use std::{rc::Rc, time::Instant};

use tracing::info;

use crate::{
    compiler::compiler::compile, errors::errors::Error, lexer::lexer::tokenize,
    parser::parser::parse,
};

pub mod ast;
pub mod compiler;
pub mod errors;
pub mod lexer;
pub mod macros;
pub mod parser;
pub mod semantics;
pub mod toolchain;

extern crate regex;

/// A byte offset into a named source file.
#[derive(Debug, Clone)]
pub struct Position(pub u32, pub Rc<String>);

#[derive(Debug, Clone)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

/// Runs the whole front end and code generator over `source`, returning the
/// C++ translation unit. The first error aborts translation.
pub fn translate(source: &str, file_name: &str) -> Result<String, Error> {
    let start = Instant::now();
    let tokens = tokenize(source.to_string(), Some(String::from(file_name)))?;
    info!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();
    let (_, program) = parse(tokens, Rc::new(String::from(file_name)));
    let program = program?;
    info!("Parsed in {:?}", parse_start.elapsed());

    let compile_start = Instant::now();
    let code = compile(&program)?;
    info!("Generated C++ in {:?}", compile_start.elapsed());

    Ok(code)
}

/// Converts a byte offset into a 1-based line and 0-based column.
///
/// Offsets past the end of `source` are clamped to its end.
pub fn locate(source: &str, position: u32) -> (usize, usize) {
    let mut pos = (position as usize).min(source.len());
    while !source.is_char_boundary(pos) {
        pos -= 1;
    }

    let before = &source[..pos];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);

    (line, source[line_start..pos].chars().count())
}

/// Returns the line number, line text and in-line offset of `position`.
pub fn get_line_at_position(source: &str, position: u32) -> (usize, String, usize) {
    let (line_number, column) = locate(source, position);
    let line = source
        .split_inclusive('\n')
        .nth(line_number - 1)
        .unwrap_or("")
        .to_string();

    (line_number, line, column)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line_at_position() {
        let source = "Hello, world!\nfoo\nbar\nTesting { }\n";
        let (line_number, line, line_pos) = super::get_line_at_position(source, 10);
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(source, 30);
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);
    }

    #[test]
    fn test_locate_clamps_past_end() {
        assert_eq!(super::locate("ab\ncd", 100), (2, 2));
        assert_eq!(super::locate("", 0), (1, 0));
    }
}

/// Renders an error the way the command line shows it: the one-line
/// diagnostic followed by the offending source line and a caret.
pub fn format_error(error: &Error, source: &str, file: &str) -> String {
    /*
        Error: 'x' redefinition [Ln 20, Col 4]
        -> final.dtl
           |
        20 | x = #;
           | ----^
    */

    let position = error.get_position();
    let (line, line_text, line_pos) = get_line_at_position(source, position.0);

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    let mut out = String::new();
    out.push_str(&error.to_diagnostic(source).to_string());
    out.push('\n');
    let tip = error.get_tip().to_string();
    if !tip.is_empty() {
        out.push_str(&format!("tip: {}\n", tip));
    }
    out.push_str(&format!("-> {}\n", file));
    out.push_str(&format!("{:>padding$}\n", "|"));

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    out.push_str(&format!("{} | {}\n", line_string, line_text_removed.trim_end()));

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;
    out.push_str(&format!("{:>padding$} {:->arrows$}", "|", "^"));

    out
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}
