// Tokenizer: raw SQL text to a flat list of classified lexemes.
//
// Tokens borrow their text from the input; nothing is copied until the parser
// builds owned AST nodes.

use crate::config::ParserConfig;
use crate::error::SyntaxError;
use logos::Logos;
use std::fmt;
use std::ops::Range;

/// A lexeme and where it came from.
#[derive(Clone, Debug, PartialEq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl<'a> Token<'a> {
    pub fn new(text: &'a str, kind: TokenKind, span: Range<usize>) -> Self {
        Token { text, kind, span }
    }
}

/// Token types using logos for fast tokenization
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"--[^\n]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum TokenKind {
    // Keywords (case-insensitive)
    #[regex("(?i)SELECT")]
    Select,

    #[regex("(?i)FROM")]
    From,

    #[regex("(?i)WHERE")]
    Where,

    #[regex("(?i)GROUP")]
    Group,

    #[regex("(?i)BY")]
    By,

    #[regex("(?i)HAVING")]
    Having,

    #[regex("(?i)AS")]
    As,

    #[regex("(?i)AND")]
    And,

    #[regex("(?i)OR")]
    Or,

    #[regex("(?i)NOT")]
    Not,

    #[regex("(?i)IS")]
    Is,

    #[regex("(?i)ISNULL")]
    IsNull,

    #[regex("(?i)NOTNULL")]
    NotNull,

    #[regex("(?i)NULL")]
    Null,

    #[regex("(?i)BETWEEN")]
    Between,

    #[regex("(?i)LIKE")]
    Like,

    #[regex("(?i)GLOB")]
    Glob,

    #[regex("(?i)REGEXP")]
    Regexp,

    #[regex("(?i)MATCH")]
    Match,

    #[regex("(?i)ESCAPE")]
    Escape,

    #[regex("(?i)COLLATE")]
    Collate,

    #[regex("(?i)CAST")]
    Cast,

    #[regex("(?i)CASE")]
    Case,

    #[regex("(?i)WHEN")]
    When,

    #[regex("(?i)THEN")]
    Then,

    #[regex("(?i)ELSE")]
    Else,

    #[regex("(?i)END")]
    End,

    #[regex("(?i)TRUE")]
    True,

    #[regex("(?i)FALSE")]
    False,

    // CAST target types
    #[regex("(?i)TEXT")]
    TypeText,

    #[regex("(?i)REAL")]
    TypeReal,

    #[regex("(?i)NONE")]
    TypeNone,

    #[regex("(?i)NUMERIC")]
    TypeNumeric,

    #[regex("(?i)INTEGER")]
    TypeInteger,

    // Identifiers and literals
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Identifier,

    /// Single-quoted, `''` kept as written.
    #[regex(r"'([^']|'')*'")]
    String,

    #[regex(r"[xX]'[0-9a-fA-F]*'")]
    Blob,

    /// Unsigned decimal integer. A `-` sign glued to it is folded in by the
    /// parser, which alone knows whether the `-` is a sign or a subtraction.
    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?|\.[0-9]+([eE][+-]?[0-9]+)?|[0-9]+[eE][+-]?[0-9]+")]
    Float,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexNumber,

    // Operators
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("~")]
    Tilde,

    #[token("&")]
    Ampersand,

    #[token("|")]
    Pipe,

    #[token("||")]
    Concat,

    #[token("->")]
    Arrow,

    #[token("->>")]
    LongArrow,

    #[token("<<")]
    ShiftLeft,

    #[token(">>")]
    ShiftRight,

    #[token("=")]
    #[token("==")]
    Equal,

    #[token("!=")]
    #[token("<>")]
    NotEqual,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("<=")]
    LessEqual,

    #[token(">=")]
    GreaterEqual,

    // Delimiters
    #[token("(")]
    LeftParen,

    #[token(")")]
    RightParen,

    #[token(",")]
    Comma,

    #[token(".")]
    Dot,

    #[token(";")]
    Semicolon,

    // End of input
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Select => "SELECT",
            TokenKind::From => "FROM",
            TokenKind::Where => "WHERE",
            TokenKind::Group => "GROUP",
            TokenKind::By => "BY",
            TokenKind::Having => "HAVING",
            TokenKind::As => "AS",
            TokenKind::And => "AND",
            TokenKind::Or => "OR",
            TokenKind::Not => "NOT",
            TokenKind::Is => "IS",
            TokenKind::IsNull => "ISNULL",
            TokenKind::NotNull => "NOTNULL",
            TokenKind::Null => "NULL",
            TokenKind::Between => "BETWEEN",
            TokenKind::Like => "LIKE",
            TokenKind::Glob => "GLOB",
            TokenKind::Regexp => "REGEXP",
            TokenKind::Match => "MATCH",
            TokenKind::Escape => "ESCAPE",
            TokenKind::Collate => "COLLATE",
            TokenKind::Cast => "CAST",
            TokenKind::Case => "CASE",
            TokenKind::When => "WHEN",
            TokenKind::Then => "THEN",
            TokenKind::Else => "ELSE",
            TokenKind::End => "END",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::TypeText => "TEXT",
            TokenKind::TypeReal => "REAL",
            TokenKind::TypeNone => "NONE",
            TokenKind::TypeNumeric => "NUMERIC",
            TokenKind::TypeInteger => "INTEGER",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string literal",
            TokenKind::Blob => "blob literal",
            TokenKind::Number => "integer literal",
            TokenKind::Float => "float literal",
            TokenKind::HexNumber => "hex literal",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::Tilde => "'~'",
            TokenKind::Ampersand => "'&'",
            TokenKind::Pipe => "'|'",
            TokenKind::Concat => "'||'",
            TokenKind::Arrow => "'->'",
            TokenKind::LongArrow => "'->>'",
            TokenKind::ShiftLeft => "'<<'",
            TokenKind::ShiftRight => "'>>'",
            TokenKind::Equal => "'='",
            TokenKind::NotEqual => "'!='",
            TokenKind::Less => "'<'",
            TokenKind::Greater => "'>'",
            TokenKind::LessEqual => "'<='",
            TokenKind::GreaterEqual => "'>='",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Comma => "','",
            TokenKind::Dot => "'.'",
            TokenKind::Semicolon => "';'",
            TokenKind::Eof => "end of input",
        };
        write!(f, "{}", s)
    }
}

/// Tokenize the whole input, failing on the first malformed span.
///
/// The returned list always ends with a single `Eof` token.
pub fn tokenize<'a>(input: &'a str, config: &ParserConfig) -> Result<Vec<Token<'a>>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(input);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let text = &input[span.clone()];

        let kind = match result {
            Ok(kind) => kind,
            Err(()) => {
                tracing::trace!(offset = span.start, text, "rejected input");
                return Err(unrecognized(input, span.start, text));
            }
        };

        match kind {
            TokenKind::Identifier if text.len() > config.max_identifier_len => {
                tracing::trace!(offset = span.start, len = text.len(), "identifier too long");
                return Err(SyntaxError::at(
                    input,
                    span.start,
                    Some(text),
                    format!(
                        "identifier exceeds maximum length of {} bytes",
                        config.max_identifier_len
                    ),
                ));
            }
            _ => tokens.push(Token::new(text, kind, span)),
        }
    }

    let len = input.len();
    tokens.push(Token::new("", TokenKind::Eof, len..len));

    Ok(tokens)
}

fn unrecognized(input: &str, offset: usize, text: &str) -> SyntaxError {
    let message = if text.starts_with('\'') {
        "unterminated string literal".to_string()
    } else if text.len() > 1 && (text.starts_with("x'") || text.starts_with("X'")) {
        "malformed blob literal".to_string()
    } else {
        format!("unrecognized character '{}'", text)
    };
    SyntaxError::at(input, offset, Some(text), message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        tokenize(input, &ParserConfig::default())
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    fn texts(input: &str) -> Vec<String> {
        tokenize(input, &ParserConfig::default())
            .unwrap()
            .into_iter()
            .map(|t| t.text.to_string())
            .collect()
    }

    #[test]
    fn test_zero_copy() {
        let sql = "SELECT * FROM users";
        let tokens = tokenize(sql, &ParserConfig::default()).unwrap();

        let start = sql.as_ptr() as usize;
        let end = start + sql.len();
        for token in &tokens {
            if !token.text.is_empty() {
                let ptr = token.text.as_ptr() as usize;
                assert!(ptr >= start && ptr < end, "Token should reference original input");
                assert_eq!(&sql[token.span.clone()], token.text);
            }
        }
    }

    #[test]
    fn test_tokenize_basic() {
        let tokens = tokenize("SELECT name FROM users WHERE age > 18", &ParserConfig::default())
            .unwrap();

        assert_eq!(tokens[0].kind, TokenKind::Select);
        assert_eq!(tokens[1].kind, TokenKind::Identifier);
        assert_eq!(tokens[1].text, "name");
        assert_eq!(tokens[2].kind, TokenKind::From);
        assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn test_keywords_any_case() {
        assert_eq!(
            kinds("select SeLeCt NOTNULL isnull Not null"),
            vec![
                TokenKind::Select,
                TokenKind::Select,
                TokenKind::NotNull,
                TokenKind::IsNull,
                TokenKind::Not,
                TokenKind::Null,
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("table column")[0], TokenKind::Identifier);
    }

    #[test]
    fn test_numeric_literals() {
        assert_eq!(
            kinds("12 1.2 .2 1e2 1E2 0xAF12"),
            vec![
                TokenKind::Number,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::Float,
                TokenKind::HexNumber,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_minus_is_always_its_own_token() {
        assert_eq!(
            kinds("-12"),
            vec![TokenKind::Minus, TokenKind::Number, TokenKind::Eof]
        );
        assert_eq!(texts("-12")[..2], ["-".to_string(), "12".to_string()]);

        assert_eq!(
            kinds("5-3"),
            vec![
                TokenKind::Number,
                TokenKind::Minus,
                TokenKind::Number,
                TokenKind::Eof,
            ]
        );
        assert_eq!(
            kinds("c1 -10 -2.3 -0x1F"),
            vec![
                TokenKind::Identifier,
                TokenKind::Minus,
                TokenKind::Number,
                TokenKind::Minus,
                TokenKind::Float,
                TokenKind::Minus,
                TokenKind::HexNumber,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_adjacent_spans_touch() {
        let tokens = tokenize("-12 - 3", &ParserConfig::default()).unwrap();
        assert_eq!(tokens[0].span, 0..1);
        assert_eq!(tokens[1].span, 1..3);
        assert_eq!(tokens[2].span, 4..5);
        assert_eq!(tokens[3].span, 6..7);
    }

    #[test]
    fn test_string_and_blob() {
        let tokens = tokenize("'bruno''s car' x'AF12' X'ab'", &ParserConfig::default())
            .unwrap();
        assert_eq!(tokens[0].kind, TokenKind::String);
        assert_eq!(tokens[0].text, "'bruno''s car'");
        assert_eq!(tokens[1].kind, TokenKind::Blob);
        assert_eq!(tokens[2].kind, TokenKind::Blob);
        assert_eq!(tokens[2].text, "X'ab'");
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            kinds("|| | -> ->> << >> <= >= <> != == ="),
            vec![
                TokenKind::Concat,
                TokenKind::Pipe,
                TokenKind::Arrow,
                TokenKind::LongArrow,
                TokenKind::ShiftLeft,
                TokenKind::ShiftRight,
                TokenKind::LessEqual,
                TokenKind::GreaterEqual,
                TokenKind::NotEqual,
                TokenKind::NotEqual,
                TokenKind::Equal,
                TokenKind::Equal,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            kinds("a -- trailing\n/* block */ b"),
            vec![TokenKind::Identifier, TokenKind::Identifier, TokenKind::Eof]
        );
    }

    #[test]
    fn test_identifier_length_bound() {
        let config = ParserConfig::default();
        let ok = "a".repeat(64);
        assert!(tokenize(&ok, &config).is_ok());

        let too_long = "a".repeat(65);
        let err = tokenize(&too_long, &config).unwrap_err();
        assert_eq!(err.offset, 0);
        assert!(err.message.contains("64"));

        let tight = ParserConfig::default().with_max_identifier_len(3);
        assert!(tokenize("abc", &tight).is_ok());
        assert!(tokenize("abcd", &tight).is_err());
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("SELECT 'abc", &ParserConfig::default()).unwrap_err();
        assert_eq!(err.offset, 7);
        assert_eq!(err.message, "unterminated string literal");
    }

    #[test]
    fn test_illegal_character() {
        let err = tokenize("SELECT a # b", &ParserConfig::default()).unwrap_err();
        assert_eq!(err.offset, 9);
        assert_eq!(err.lexeme.as_deref(), Some("#"));
    }
}
