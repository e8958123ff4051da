//! Configuration parser — scanner, grammar driver and semantic hand-off
//!
//! Recursive descent over the LL(1) grammar below, one method per
//! non-terminal. The current token alone selects each production.
//!
//! ```text
//! PROGRAM        → STATEMENT_LIST END_OF_FILE
//! STATEMENT_LIST → STATEMENT { STATEMENT }
//! STATEMENT      → KEYWORD ASSIGN_OP LITERAL END_OF_LINE
//! KEYWORD        → DB | URL_OPEN_CMD
//! ASSIGN_OP      → EQUALS | SPACE
//! LITERAL        → INT_LITERAL | STRING_LITERAL | PATH_LITERAL
//! ```
//!
//! The first mismatch aborts the parse. Statements before the failing one
//! stay committed; nothing from the failing statement reaches the context.
//! A statement is checked against the grammar before its keyword/literal pair
//! is checked for type, so `db="x"` without a line terminator is a syntax
//! error, not a semantic one.

pub mod tokenizer;

use crate::context::Context;
use crate::semantics::{self, SemanticStack, STACK_CAPACITY};
use crate::{Error, Result};
use tokenizer::{Span, Token, TokenKind};

/// Grammar driver holding the token cursor, the semantic stack and the
/// destination context for one parse.
pub struct Parser<'c, I: Iterator<Item = Token>> {
    tokens: I,
    current: Token,
    stack: SemanticStack,
    context: &'c mut Context,
}

impl<'c, I: Iterator<Item = Token>> Parser<'c, I> {
    /// Create a parser writing into `context`, positioned on the first token.
    ///
    /// An empty token source behaves like one holding only `EndOfFile`.
    pub fn new(mut tokens: I, context: &'c mut Context) -> Self {
        let current = tokens
            .next()
            .unwrap_or_else(|| Token::new(TokenKind::EndOfFile, "", Span::default()));
        Parser {
            tokens,
            current,
            stack: SemanticStack::new(),
            context,
        }
    }

    /// Run the grammar to completion or to the first error
    pub fn parse(mut self) -> Result<()> {
        self.program()
    }

    // ── Cursor helpers ─────────────────────────────────

    fn advance(&mut self) {
        let span = self.current.span.clone();
        self.current = self
            .tokens
            .next()
            .unwrap_or_else(|| Token::new(TokenKind::EndOfFile, "", span));
    }

    fn token_is(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Diagnostic for the current token given what the grammar expected
    fn unexpected(&self, expected: &str) -> Error {
        let token = &self.current;
        match token.kind {
            TokenKind::InvalidToken => Error::LexicalError {
                expected: expected.to_string(),
                content: token.content.clone(),
                span: token.span.clone(),
            },
            TokenKind::Error => Error::ReadError {
                expected: expected.to_string(),
                message: token.content.clone(),
                span: token.span.clone(),
            },
            found => Error::SyntaxError {
                expected: expected.to_string(),
                found,
                content: token.content.clone(),
                span: token.span.clone(),
            },
        }
    }

    fn save(&mut self) -> Result<()> {
        if !self.stack.push(&self.current) {
            return Err(Error::CapacityError {
                capacity: STACK_CAPACITY,
            });
        }
        Ok(())
    }

    // ── Non-terminals ──────────────────────────────────

    fn program(&mut self) -> Result<()> {
        self.statement_list()?;

        if !self.token_is(TokenKind::EndOfFile) {
            return Err(self.unexpected("DB, URL_OPEN_CMD or END_OF_FILE"));
        }
        Ok(())
    }

    fn statement_list(&mut self) -> Result<()> {
        self.statement()?;
        while self.current.kind.is_keyword() {
            self.statement()?;
        }
        Ok(())
    }

    fn statement(&mut self) -> Result<()> {
        self.keyword()?;
        self.assign_op()?;
        self.literal()?;

        if !self.token_is(TokenKind::EndOfLine) {
            return Err(self.unexpected("END_OF_LINE"));
        }

        semantics::commit(self.context, &mut self.stack)?;
        self.advance();
        Ok(())
    }

    fn keyword(&mut self) -> Result<()> {
        if !self.current.kind.is_keyword() {
            return Err(self.unexpected("DB or URL_OPEN_CMD"));
        }
        self.save()?;
        self.advance();
        Ok(())
    }

    fn assign_op(&mut self) -> Result<()> {
        if !self.current.kind.is_assign_op() {
            return Err(self.unexpected("EQUALS or SPACE"));
        }
        self.advance();
        Ok(())
    }

    fn literal(&mut self) -> Result<()> {
        if !self.current.kind.is_literal() {
            return Err(self.unexpected("INT_LITERAL, STRING_LITERAL or PATH_LITERAL"));
        }
        self.save()?;
        self.advance();
        Ok(())
    }
}

/// Parse a token sequence, committing each valid statement into `context`
///
/// # Errors
/// The first lexical, syntax, semantic or read error, with the offending
/// token's kind, content and position.
pub fn parse<T: IntoIterator<Item = Token>>(tokens: T, context: &mut Context) -> Result<()> {
    Parser::new(tokens.into_iter(), context).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Attribute;
    use super::tokenizer::Scanner;

    fn parse_text(input: &str) -> (Result<()>, Context) {
        let mut ctx = Context::new();
        let result = parse(Scanner::from_text(input), &mut ctx);
        (result, ctx)
    }

    fn parse_ok(input: &str) -> Context {
        let (result, ctx) = parse_text(input);
        result.unwrap();
        ctx
    }

    fn parse_err(input: &str) -> (Error, Context) {
        let (result, ctx) = parse_text(input);
        (result.unwrap_err(), ctx)
    }

    // ── Valid programs ─────────────────────────────────

    #[test]
    fn test_parse_reference_config() {
        let ctx = parse_ok(
            "db=/home/user/.config/bookmark-open/bookmarks.db\nurl_open_cmd=\"firefox\"\n",
        );
        assert_eq!(
            ctx.get(Attribute::Db),
            Some("/home/user/.config/bookmark-open/bookmarks.db")
        );
        assert_eq!(ctx.get(Attribute::UrlOpenCmd), Some("firefox"));
    }

    #[test]
    fn test_space_as_assign_op() {
        let ctx = parse_ok("db /var/lib/bo.db\nurl_open_cmd \"xdg-open\"\n");
        assert_eq!(ctx.db(), Some("/var/lib/bo.db"));
        assert_eq!(ctx.url_open_cmd(), Some("xdg-open"));
    }

    #[test]
    fn test_single_statement_leaves_other_absent() {
        let ctx = parse_ok("url_open_cmd=\"firefox\"\n");
        assert_eq!(ctx.db(), None);
        assert_eq!(ctx.url_open_cmd(), Some("firefox"));
    }

    #[test]
    fn test_last_write_wins() {
        let ctx = parse_ok("db=/a\ndb=/b\n");
        assert_eq!(ctx.db(), Some("/b"));
    }

    #[test]
    fn test_round_trip_many_statements() {
        let values: Vec<String> = (0..20).map(|i| format!("/data/{}/bo.db", i)).collect();
        let mut input = String::new();
        for (i, v) in values.iter().enumerate() {
            input.push_str(&format!("db={}\n", v));
            input.push_str(&format!("url_open_cmd=\"browser-{}\"\n", i));
        }
        let ctx = parse_ok(&input);
        assert_eq!(ctx.db(), values.last().map(String::as_str));
        assert_eq!(ctx.url_open_cmd(), Some("browser-19"));
    }

    // ── Syntax errors ──────────────────────────────────

    #[test]
    fn test_empty_input_is_syntax_error() {
        let (err, ctx) = parse_err("");
        assert!(matches!(
            err,
            Error::SyntaxError {
                found: TokenKind::EndOfFile,
                ..
            }
        ));
        assert_eq!(ctx, Context::new());
    }

    #[test]
    fn test_missing_end_of_line_commits_nothing() {
        let (err, ctx) = parse_err("db=/a\nurl_open_cmd=\"firefox\"");
        match err {
            Error::SyntaxError {
                ref expected,
                found,
                ..
            } => {
                assert_eq!(expected, "END_OF_LINE");
                assert_eq!(found, TokenKind::EndOfFile);
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
        assert_eq!(ctx.db(), Some("/a"));
        assert_eq!(ctx.url_open_cmd(), None);
    }

    #[test]
    fn test_missing_literal() {
        let (err, _) = parse_err("db=\n");
        assert!(matches!(
            err,
            Error::SyntaxError {
                found: TokenKind::EndOfLine,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_assign_op() {
        let (err, _) = parse_err("db\"x\"\n");
        assert!(matches!(
            err,
            Error::SyntaxError {
                found: TokenKind::StringLiteral,
                ..
            }
        ));
    }

    #[test]
    fn test_blank_line_is_rejected() {
        let (err, ctx) = parse_err("db=/a\n\nurl_open_cmd=\"ff\"\n");
        assert!(matches!(
            err,
            Error::SyntaxError {
                found: TokenKind::EndOfLine,
                ..
            }
        ));
        assert_eq!(ctx.db(), Some("/a"));
        assert_eq!(ctx.url_open_cmd(), None);
    }

    #[test]
    fn test_syntax_error_reports_position() {
        let (err, _) = parse_err("db=/a\ndb = = /b\n");
        assert_eq!(err.span().map(|s| (s.line, s.column)), Some((2, 6)));
        assert!(err.to_string().contains("2:6"));
    }

    // ── Lexical errors ─────────────────────────────────

    #[test]
    fn test_unknown_key_is_lexical_error() {
        let (err, ctx) = parse_err("browser=\"firefox\"\n");
        assert_eq!(
            err,
            Error::LexicalError {
                expected: "DB or URL_OPEN_CMD".to_string(),
                content: "browser".to_string(),
                span: Span { line: 1, column: 1, offset: 0 },
            }
        );
        let msg = err.to_string();
        assert!(msg.contains("expected DB or URL_OPEN_CMD"));
        assert!(msg.contains("INVALID_TOKEN 'browser'"));
        assert_eq!(ctx, Context::new());
    }

    #[test]
    fn test_unquoted_word_value_is_lexical_error() {
        let (err, _) = parse_err("url_open_cmd=firefox\n");
        assert!(matches!(err, Error::LexicalError { ref content, .. } if content == "firefox"));
    }

    // ── Semantic errors ────────────────────────────────

    #[test]
    fn test_string_for_db_is_semantic_error() {
        let (err, ctx) = parse_err("db=\"a string\"\n");
        assert!(matches!(
            err,
            Error::SemanticError {
                keyword: TokenKind::Db,
                expected: TokenKind::PathLiteral,
                found: TokenKind::StringLiteral,
                ..
            }
        ));
        assert_eq!(ctx.db(), None);
    }

    #[test]
    fn test_path_for_url_open_cmd_is_semantic_error() {
        let (err, ctx) = parse_err("url_open_cmd=/some/path\n");
        assert!(matches!(
            err,
            Error::SemanticError {
                keyword: TokenKind::UrlOpenCmd,
                expected: TokenKind::StringLiteral,
                found: TokenKind::PathLiteral,
                ..
            }
        ));
        assert_eq!(ctx.url_open_cmd(), None);
    }

    #[test]
    fn test_int_literal_is_never_assignable() {
        let (err, _) = parse_err("db=42\n");
        assert!(matches!(
            err,
            Error::SemanticError {
                found: TokenKind::IntLiteral,
                ..
            }
        ));
    }

    #[test]
    fn test_semantic_error_aborts_remaining_statements() {
        let (err, ctx) = parse_err("db=\"x\"\nurl_open_cmd=\"firefox\"\n");
        assert!(matches!(err, Error::SemanticError { .. }));
        assert_eq!(ctx.url_open_cmd(), None);
    }

    // ── Token sources ──────────────────────────────────

    #[test]
    fn test_exhausted_source_without_eof_token() {
        let span = Span::default();
        let tokens = vec![
            Token::new(TokenKind::Db, "db", span.clone()),
            Token::new(TokenKind::Equals, "=", span.clone()),
            Token::new(TokenKind::PathLiteral, "/x", span.clone()),
            Token::new(TokenKind::EndOfLine, "\n", span),
        ];
        let mut ctx = Context::new();
        parse(tokens, &mut ctx).unwrap();
        assert_eq!(ctx.db(), Some("/x"));
    }

    #[test]
    fn test_read_error_token_is_reported() {
        let span = Span::default();
        let tokens = vec![
            Token::new(TokenKind::Error, "broken pipe", span.clone()),
            Token::new(TokenKind::EndOfFile, "", span),
        ];
        let mut ctx = Context::new();
        let err = parse(tokens, &mut ctx).unwrap_err();
        assert!(matches!(err, Error::ReadError { ref message, .. } if message == "broken pipe"));
        assert!(err.to_string().contains("expected DB or URL_OPEN_CMD"));
    }

    #[test]
    fn test_unterminated_line_checked_before_literal_type() {
        let (err, ctx) = parse_err("db=\"x\"");
        assert!(matches!(
            err,
            Error::SyntaxError {
                found: TokenKind::EndOfFile,
                ..
            }
        ));
        assert_eq!(ctx, Context::new());
    }

    // ── Determinism proof ──────────────────────────────

    #[test]
    fn test_parse_determinism_100_iterations() {
        let input = "db=/home/user/bo.db\nurl_open_cmd \"firefox --private-window\"\n";
        let first = parse_ok(input);
        for i in 0..100 {
            let ctx = parse_ok(input);
            assert_eq!(first, ctx, "Determinism failure at iteration {}", i);
        }
    }
}
