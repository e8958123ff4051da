//! Configuration scanner — converts a byte stream into a lazy token sequence
//!
//! Handles: keywords (`db`, `url_open_cmd`), integer, quoted-string and path
//! literals, `=`, blank separators and line terminators.
//! Anything else becomes an `InvalidToken` carrying the offending text; the
//! scanner never fails on bad input, the parser reports it.
//!
//! Guarantees:
//! - Lazy: one token per call, reading only as far as that token needs
//! - Finite: `EndOfFile` is yielded exactly once, then the iterator ends
//! - Every token carries the line:column of its first byte

use std::fmt;
use std::io::{BufReader, Bytes, Read};

use serde::{Deserialize, Serialize};

/// Lexical categories of the configuration language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    EndOfFile,
    Error,

    // Keywords
    Db,
    UrlOpenCmd,

    // Literals
    IntLiteral,
    StringLiteral,
    PathLiteral,

    // Punctuation
    Equals,
    Space,
    EndOfLine,

    InvalidToken,
}

impl TokenKind {
    pub fn is_keyword(self) -> bool {
        matches!(self, TokenKind::Db | TokenKind::UrlOpenCmd)
    }

    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::IntLiteral | TokenKind::StringLiteral | TokenKind::PathLiteral
        )
    }

    pub fn is_assign_op(self) -> bool {
        matches!(self, TokenKind::Equals | TokenKind::Space)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            TokenKind::EndOfFile => "END_OF_FILE",
            TokenKind::Error => "ERROR",
            TokenKind::Db => "DB",
            TokenKind::UrlOpenCmd => "URL_OPEN_CMD",
            TokenKind::IntLiteral => "INT_LITERAL",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::PathLiteral => "PATH_LITERAL",
            TokenKind::Equals => "EQUALS",
            TokenKind::Space => "SPACE",
            TokenKind::EndOfLine => "END_OF_LINE",
            TokenKind::InvalidToken => "INVALID_TOKEN",
        };
        f.write_str(name)
    }
}

/// Position in source text for error reporting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub line: usize,
    /// Byte column, 1-based
    pub column: usize,
    pub offset: usize,
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A scanned token. Cloning yields an independent owned copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>, span: Span) -> Self {
        Token {
            kind,
            content: content.into(),
            span,
        }
    }
}

/// Reserved keyword spellings. Matching is exact and case-sensitive.
const KEYWORDS: [(&str, TokenKind); 2] = [
    ("db", TokenKind::Db),
    ("url_open_cmd", TokenKind::UrlOpenCmd),
];

/// Classify a bare word (no blanks, `=`, quotes or line terminators).
pub fn classify_word(word: &str) -> TokenKind {
    if let Some((_, kind)) = KEYWORDS.iter().find(|(spelling, _)| *spelling == word) {
        return *kind;
    }
    if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
        return TokenKind::IntLiteral;
    }
    if word.contains('/') {
        return TokenKind::PathLiteral;
    }
    TokenKind::InvalidToken
}

fn is_blank(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn is_word_byte(b: u8) -> bool {
    !is_blank(b) && !matches!(b, b'\n' | b'\r' | b'=' | b'"')
}

/// Streaming scanner over any readable source
pub struct Scanner<R: Read> {
    bytes: Bytes<BufReader<R>>,
    /// `Some(None)` once the source is exhausted
    peeked: Option<Option<u8>>,
    read_error: Option<String>,
    finished: bool,
    line: usize,
    column: usize,
    offset: usize,
}

impl<'a> Scanner<&'a [u8]> {
    /// Scanner over in-memory text
    pub fn from_text(text: &'a str) -> Self {
        Scanner::new(text.as_bytes())
    }
}

impl<R: Read> Scanner<R> {
    /// Create a scanner over an already-open readable stream
    pub fn new(source: R) -> Self {
        Scanner {
            bytes: BufReader::new(source).bytes(),
            peeked: None,
            read_error: None,
            finished: false,
            line: 1,
            column: 1,
            offset: 0,
        }
    }

    /// Drain the scanner into a vector, ending with `EndOfFile`
    pub fn tokenize(self) -> Vec<Token> {
        self.collect()
    }

    // ── Byte helpers ───────────────────────────────────

    fn peek(&mut self) -> Option<u8> {
        if let Some(b) = self.peeked {
            return b;
        }
        let next = match self.bytes.next() {
            Some(Ok(b)) => Some(b),
            Some(Err(e)) => {
                self.read_error.get_or_insert_with(|| e.to_string());
                None
            }
            None => None,
        };
        self.peeked = Some(next);
        next
    }

    fn advance(&mut self) -> Option<u8> {
        let b = self.peek();
        if let Some(c) = b {
            self.peeked = None;
            self.offset += 1;
            if c == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        b
    }

    fn current_span(&self) -> Span {
        Span {
            line: self.line,
            column: self.column,
            offset: self.offset,
        }
    }

    fn skip_blanks(&mut self) -> Vec<u8> {
        let mut run = Vec::new();
        while let Some(b) = self.peek() {
            if !is_blank(b) {
                break;
            }
            run.push(b);
            self.advance();
        }
        run
    }

    // ── Main dispatch ──────────────────────────────────

    fn scan_token(&mut self) -> Token {
        loop {
            let span = self.current_span();
            let Some(b) = self.peek() else {
                return match self.read_error.take() {
                    Some(message) => Token::new(TokenKind::Error, message, span),
                    None => {
                        self.finished = true;
                        Token::new(TokenKind::EndOfFile, "", span)
                    }
                };
            };

            match b {
                b'\n' => {
                    self.advance();
                    return Token::new(TokenKind::EndOfLine, "\n", span);
                }
                b'\r' => {
                    self.advance();
                    if self.peek() == Some(b'\n') {
                        self.advance();
                        return Token::new(TokenKind::EndOfLine, "\n", span);
                    }
                    return Token::new(TokenKind::InvalidToken, "\r", span);
                }
                b'=' => return self.read_equals(),
                b'"' => return self.read_string(span),
                c if is_blank(c) => {
                    let run = self.skip_blanks();
                    match self.peek() {
                        Some(b'=') => return self.read_equals(),
                        // trailing whitespace
                        None | Some(b'\n') | Some(b'\r') => continue,
                        Some(_) => {
                            return Token::new(
                                TokenKind::Space,
                                String::from_utf8_lossy(&run),
                                span,
                            )
                        }
                    }
                }
                _ => return self.read_word(span),
            }
        }
    }

    // ── Assignment operator ────────────────────────────

    fn read_equals(&mut self) -> Token {
        let span = self.current_span();
        self.advance(); // consume =
        self.skip_blanks();
        Token::new(TokenKind::Equals, "=", span)
    }

    // ── String literals ────────────────────────────────

    fn read_string(&mut self, span: Span) -> Token {
        self.advance(); // consume opening "
        let mut value = Vec::new();

        loop {
            match self.peek() {
                Some(b'"') => {
                    self.advance();
                    break;
                }
                None if self.read_error.is_some() => return self.read_failure(),
                None | Some(b'\n') | Some(b'\r') => {
                    let mut partial = String::from("\"");
                    partial.push_str(&String::from_utf8_lossy(&value));
                    return Token::new(TokenKind::InvalidToken, partial, span);
                }
                Some(c) => {
                    value.push(c);
                    self.advance();
                }
            }
        }

        match String::from_utf8(value) {
            Ok(text) => Token::new(TokenKind::StringLiteral, text, span),
            Err(e) => Token::new(
                TokenKind::InvalidToken,
                String::from_utf8_lossy(e.as_bytes()),
                span,
            ),
        }
    }

    /// A token cut short by a failing stream is dropped in favour of `Error`.
    fn read_failure(&mut self) -> Token {
        let span = self.current_span();
        let message = self.read_error.take().unwrap_or_default();
        Token::new(TokenKind::Error, message, span)
    }

    // ── Keywords, integers, paths ──────────────────────

    fn read_word(&mut self, span: Span) -> Token {
        let mut word = Vec::new();
        while let Some(b) = self.peek() {
            if !is_word_byte(b) {
                break;
            }
            word.push(b);
            self.advance();
        }
        if self.read_error.is_some() {
            return self.read_failure();
        }

        match String::from_utf8(word) {
            Ok(text) => Token::new(classify_word(&text), text, span),
            Err(e) => Token::new(
                TokenKind::InvalidToken,
                String::from_utf8_lossy(e.as_bytes()),
                span,
            ),
        }
    }
}

impl<R: Read> Iterator for Scanner<R> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.finished {
            return None;
        }
        let token = self.scan_token();
        log::trace!("scanned {} {:?} at {}", token.kind, token.content, token.span);
        Some(token)
    }
}
