// Parser knobs. `parse` is `parse_with(&ParserConfig::default())`.

/// Longest identifier the tokenizer accepts, in bytes.
pub const DEFAULT_MAX_IDENTIFIER_LEN: usize = 64;

/// Options consulted by the tokenizer and the statement parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Identifiers longer than this are a lexical error.
    pub max_identifier_len: usize,
    /// Accept `SELECT a b FROM t` as `SELECT a AS b FROM t`.
    pub implicit_alias: bool,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_identifier_len(mut self, len: usize) -> Self {
        self.max_identifier_len = len;
        self
    }

    pub fn with_implicit_alias(mut self, enabled: bool) -> Self {
        self.implicit_alias = enabled;
        self
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            max_identifier_len: DEFAULT_MAX_IDENTIFIER_LEN,
            implicit_alias: false,
        }
    }
}
