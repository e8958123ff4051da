//! bookmark-open configuration front end
//!
//! Reads the `key = value` configuration file and produces a validated
//! [`Context`]. File discovery and opening belong to the caller; this crate
//! consumes an already-open stream.
//!
//! # Architecture
//!
//! ```text
//! stream → Scanner → tokens → Parser → SemanticStack → validate → setter → Context
//! ```
//!
//! # Example file
//!
//! ```text
//! db=/home/user/.config/bookmark-open/bookmarks.db
//! url_open_cmd="firefox"
//! ```

pub mod context;
pub mod error;
pub mod parser;
pub mod semantics;

use std::io::Read;

pub use context::{Attribute, Context};
pub use error::{Error, Result};
pub use parser::tokenizer::{Scanner, Span, Token, TokenKind};

/// Scan and parse `reader`, committing statements into `context`.
///
/// # Errors
/// The first lexical, syntax, semantic or read error. Statements before the
/// failing one remain committed.
pub fn load_context<R: Read>(reader: R, context: &mut Context) -> Result<()> {
    parser::parse(Scanner::new(reader), context)
}

/// Parse configuration text into a fresh context
///
/// # Errors
/// The first lexical, syntax, semantic or read error. The partially filled
/// context is discarded.
pub fn parse_str(text: &str) -> Result<Context> {
    let mut context = Context::new();
    load_context(text.as_bytes(), &mut context)?;
    Ok(context)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REFERENCE: &str =
        "db=/home/user/.config/bookmark-open/bookmarks.db\nurl_open_cmd=\"firefox\"\n";

    #[test]
    fn test_parse_str() {
        let ctx = parse_str(REFERENCE).unwrap();
        assert!(ctx.is_complete());
        assert_eq!(ctx.url_open_cmd(), Some("firefox"));
    }

    #[test]
    fn test_load_context_from_reader() {
        let mut ctx = Context::new();
        let reader = std::io::Cursor::new(REFERENCE.as_bytes().to_vec());
        load_context(reader, &mut ctx).unwrap();
        assert_eq!(
            ctx.db(),
            Some("/home/user/.config/bookmark-open/bookmarks.db")
        );
    }

    #[test]
    fn test_load_context_keeps_existing_values() {
        let mut ctx = Context::new();
        ctx.set_url_open_cmd("chromium");
        load_context("db=/x\n".as_bytes(), &mut ctx).unwrap();
        assert_eq!(ctx.db(), Some("/x"));
        assert_eq!(ctx.url_open_cmd(), Some("chromium"));
    }

    #[test]
    fn test_error_display_names_expected_and_found() {
        let err = parse_str("db=\"a string\"\n").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DB"));
        assert!(msg.contains("PATH_LITERAL"));
        assert!(msg.contains("STRING_LITERAL"));
        assert!(msg.contains("1:4"));
        assert!(err.is_user_error());
    }

    struct TruncatedReader(std::io::Cursor<Vec<u8>>);

    impl Read for TruncatedReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.0.read(buf)? {
                0 => Err(std::io::Error::new(std::io::ErrorKind::Other, "disk on fire")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_read_failure_mid_literal_is_read_error() {
        let reader = TruncatedReader(std::io::Cursor::new(b"db=/a\nurl_open_cmd=\"fire".to_vec()));
        let mut ctx = Context::new();
        let err = load_context(reader, &mut ctx).unwrap_err();
        assert!(matches!(
            err,
            Error::ReadError { ref message, ref expected, .. }
                if message.contains("disk on fire")
                    && expected == "INT_LITERAL, STRING_LITERAL or PATH_LITERAL"
        ));
        assert_eq!(ctx.db(), Some("/a"));
        assert_eq!(ctx.url_open_cmd(), None);
    }

    #[test]
    fn test_context_serialization() {
        let ctx = parse_str(REFERENCE).unwrap();
        let json = serde_json::to_string(&ctx).unwrap();
        let deserialized: Context = serde_json::from_str(&json).unwrap();
        assert_eq!(ctx, deserialized);
    }
}
