// Syntax errors and the furthest-failure tracker that builds them.
//
// The parser never recovers, but optional productions (a `WHERE` clause, one
// more list item, an infix operator) are probed before the one that finally
// fails. Recording each failed probe against its offset lets the error say
// what would have been accepted there, not just what broke.

use colored::*;
use std::cell::RefCell;
use strsim::jaro_winkler;
use thiserror::Error;

/// Clause and operator keywords offered as "did you mean" candidates.
const SUGGESTABLE_KEYWORDS: &[&str] = &[
    "SELECT", "FROM", "WHERE", "GROUP", "BY", "HAVING", "AS", "AND", "OR", "NOT", "IS", "ISNULL",
    "NOTNULL", "NULL", "BETWEEN", "LIKE", "GLOB", "REGEXP", "MATCH", "ESCAPE", "COLLATE", "CAST",
    "CASE", "WHEN", "THEN", "ELSE", "END",
];

const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Tracks the furthest offset at which the parser was refused, and what it
/// expected to see there. `RefCell` lets lookahead helpers that only hold
/// `&self` record expectations.
#[derive(Debug, Default)]
pub struct Backtrace {
    furthest: RefCell<Option<Refusal>>,
}

#[derive(Debug, Clone)]
struct Refusal {
    offset: usize,
    expected: Vec<String>,
    /// `None` when the parser ran out of input.
    lexeme: Option<String>,
}

impl Refusal {
    fn message(&self) -> String {
        let wanted = match self.expected.as_slice() {
            [single] => single.clone(),
            many => format!("one of: {}", many.join(", ")),
        };

        match &self.lexeme {
            Some(lexeme) => format!("Expected {}, found '{}'", wanted, lexeme),
            None => format!("Expected {}, reached end of input", wanted),
        }
    }
}

impl Backtrace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an expectation if it is at or beyond the furthest one seen.
    pub fn track_error(&self, offset: usize, expected: &str, lexeme: Option<&str>) {
        let mut furthest = self.furthest.borrow_mut();

        if let Some(refusal) = furthest.as_mut() {
            if offset < refusal.offset {
                return;
            }
            if offset == refusal.offset {
                if !refusal.expected.iter().any(|e| e == expected) {
                    refusal.expected.push(expected.to_owned());
                }
                return;
            }
        }

        *furthest = Some(Refusal {
            offset,
            expected: vec![expected.to_owned()],
            lexeme: lexeme.map(str::to_owned),
        });
    }

    /// Build the error for the furthest failure recorded so far.
    pub fn get_error(&self, input: &str) -> SyntaxError {
        match &*self.furthest.borrow() {
            Some(refusal) => {
                let mut error = SyntaxError::at(
                    input,
                    refusal.offset,
                    refusal.lexeme.as_deref(),
                    refusal.message(),
                );
                error.expected = refusal.expected.clone();
                error
            }
            None => SyntaxError::at(input, 0, None, "Unexpected error".to_string()),
        }
    }
}

/// The single failure kind of this crate, covering lexical and grammatical
/// errors alike.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at {line}:{column}: {message}")]
pub struct SyntaxError {
    pub message: String,
    /// Offending source text; `None` when input ended early.
    pub lexeme: Option<String>,
    /// Byte offset into the input.
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub expected: Vec<String>,
    pub suggestion: Option<String>,
    pub context: Option<String>,
}

impl SyntaxError {
    /// Build an error anchored at `offset` of `input`.
    pub fn at(input: &str, offset: usize, lexeme: Option<&str>, message: String) -> Self {
        let (line, column) = line_and_column(input, offset);

        SyntaxError {
            message,
            lexeme: lexeme.map(str::to_owned),
            offset,
            line,
            column,
            expected: Vec::new(),
            suggestion: lexeme.and_then(suggest_keyword),
            context: source_excerpt(input, line, column),
        }
    }

    /// Multi-line diagnostic with colors, for terminals.
    pub fn report(&self) -> String {
        let mut out = format!(
            "{} at line {}:{}\n  {}\n",
            "Syntax error".red().bold(),
            self.line,
            self.column,
            self.message
        );

        if let Some(suggestion) = &self.suggestion {
            out += &format!("  {} {}\n", "Did you mean:".yellow(), suggestion.green());
        }

        if let Some(context) = &self.context {
            out += "\n";
            out += &context.replace('^', &"^".red().to_string());
        }

        out
    }
}

/// Closest keyword to a misspelled word by Jaro-Winkler similarity.
fn suggest_keyword(word: &str) -> Option<String> {
    // Short words score high against everything.
    if word.len() < 3 || !word.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let upper = word.to_ascii_uppercase();
    if SUGGESTABLE_KEYWORDS.contains(&upper.as_str()) {
        return None;
    }

    SUGGESTABLE_KEYWORDS
        .iter()
        .map(|&keyword| (keyword, jaro_winkler(&upper, keyword)))
        .filter(|&(_, score)| score > SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(keyword, _)| keyword.to_owned())
}

/// 1-based line and column (in characters) of a byte offset.
fn line_and_column(input: &str, offset: usize) -> (usize, usize) {
    let before = &input[..offset.min(input.len())];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    let column = before[line_start..].chars().count() + 1;
    (line, column)
}

/// The offending source line with a caret under `column`.
fn source_excerpt(input: &str, line: usize, column: usize) -> Option<String> {
    let text = input.lines().nth(line - 1)?;
    let number = line.to_string();

    Some(format!(
        "  {} | {}\n  {} | {}^",
        number,
        text,
        " ".repeat(number.len()),
        " ".repeat(column - 1)
    ))
}
