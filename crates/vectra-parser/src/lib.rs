//! Vectra parser: converts a token stream into one statement per line.
//!
//! ```text
//! script text → Lexer → Parser → ParsedScript { line → Statement | ScriptError }
//! ```
//!
//! The [`desugar`] pass rewrites vector products once operand shapes are known.

pub mod desugar;
mod parse_expr;
mod parse_line;
mod parser;

pub use desugar::{desugar_statement, infer_shape, Shape, ShapeLookup};
pub use parser::{ParsedLine, ParsedScript, Parser};

use vectra_lexer::Lexer;
use vectra_types::scene::LineId;
use vectra_types::ScriptSource;

/// Lex and parse a whole script.
///
/// Lexing errors take precedence over parse errors on the same line; lines
/// without errors are unaffected by their neighbours.
pub fn parse_script(source: &str) -> ParsedScript {
    let script = ScriptSource::new(source);
    let lexed = Lexer::new(&script).lex();
    let mut parsed = Parser::new(lexed.tokens.clone(), &script).parse();
    for line in &mut parsed.lines {
        if let Some(err) = lexed.error_on_line(line.line_number()) {
            line.outcome = Err(err.clone());
        }
    }
    // A line made only of bad characters produced no tokens at all.
    for err in &lexed.errors {
        let id = LineId(err.span.line_index());
        if !parsed.lines.iter().any(|l| l.line == id) {
            parsed.lines.push(ParsedLine {
                line: id,
                outcome: Err(err.clone()),
            });
        }
    }
    parsed.lines.sort_by_key(|l| l.line);
    parsed
}
