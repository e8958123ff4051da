//! Semantic checking — the per-statement stack, pair validation and commit
//!
//! The parser pushes a statement's keyword token, then its literal token.
//! Once the statement is syntactically complete the pair is validated and,
//! if legal, handed to the setter for that keyword:
//!
//! ```text
//! DB           ↔ PATH_LITERAL    → Context::set_db
//! URL_OPEN_CMD ↔ STRING_LITERAL  → Context::set_url_open_cmd
//! ```

use crate::context::Context;
use crate::parser::tokenizer::{Token, TokenKind};
use crate::{Error, Result};

/// Number of slots: keyword then literal
pub const STACK_CAPACITY: usize = 2;

/// Context mutation for one keyword. Returns the overwritten value.
pub type Setter = fn(&mut Context, &str) -> Option<String>;

/// Fixed-capacity buffer for the statement under validation
#[derive(Debug, Default)]
pub struct SemanticStack {
    slots: [Option<Token>; STACK_CAPACITY],
    top: usize,
}

impl SemanticStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy `token` into the next free slot. Returns false when full.
    pub fn push(&mut self, token: &Token) -> bool {
        if self.top >= STACK_CAPACITY {
            log::error!("semantic stack full, dropping {} '{}'", token.kind, token.content);
            return false;
        }
        self.slots[self.top] = Some(token.clone());
        self.top += 1;
        true
    }

    pub fn len(&self) -> usize {
        self.top
    }

    pub fn is_empty(&self) -> bool {
        self.top == 0
    }

    /// Slot 0
    pub fn keyword(&self) -> Option<&Token> {
        self.slots[0].as_ref()
    }

    /// Slot 1
    pub fn literal(&self) -> Option<&Token> {
        self.slots[1].as_ref()
    }

    /// Release both slots
    pub fn clear(&mut self) {
        self.slots = [None, None];
        self.top = 0;
    }
}

/// Literal kind a keyword accepts, `None` for non-keywords
pub fn expected_literal(keyword: TokenKind) -> Option<TokenKind> {
    match keyword {
        TokenKind::Db => Some(TokenKind::PathLiteral),
        TokenKind::UrlOpenCmd => Some(TokenKind::StringLiteral),
        _ => None,
    }
}

/// True only for the legal (keyword, literal) pairs
pub fn validate(stack: &SemanticStack) -> bool {
    match (stack.keyword(), stack.literal()) {
        (Some(keyword), Some(literal)) => expected_literal(keyword.kind) == Some(literal.kind),
        _ => false,
    }
}

/// Setter responsible for storing a keyword's value
pub fn setter_for(keyword: TokenKind) -> Option<Setter> {
    match keyword {
        TokenKind::Db => Some(Context::set_db as Setter),
        TokenKind::UrlOpenCmd => Some(Context::set_url_open_cmd as Setter),
        _ => None,
    }
}

fn semantic_error(stack: &SemanticStack) -> Error {
    let keyword = stack.keyword();
    let literal = stack.literal();
    let anchor = literal.or(keyword);
    let keyword_kind = keyword.map_or(TokenKind::InvalidToken, |t| t.kind);

    Error::SemanticError {
        keyword: keyword_kind,
        expected: expected_literal(keyword_kind).unwrap_or(TokenKind::InvalidToken),
        found: literal.map_or(TokenKind::InvalidToken, |t| t.kind),
        content: literal.map(|t| t.content.clone()).unwrap_or_default(),
        span: anchor.map(|t| t.span.clone()).unwrap_or_default(),
    }
}

/// Store the validated pair into `context` and clear the stack.
///
/// # Errors
/// `SemanticError` if the pair is not legal; the stack and context are left
/// untouched in that case.
pub fn commit(context: &mut Context, stack: &mut SemanticStack) -> Result<()> {
    if !validate(stack) {
        return Err(semantic_error(stack));
    }

    let (Some(keyword), Some(literal)) = (stack.keyword(), stack.literal()) else {
        return Err(semantic_error(stack));
    };
    let setter = setter_for(keyword.kind).ok_or_else(|| semantic_error(stack))?;

    if let Some(previous) = setter(context, &literal.content) {
        log::warn!(
            "{} reassigned at {}: '{}' replaced by '{}'",
            keyword.kind,
            keyword.span,
            previous,
            literal.content
        );
    }
    log::debug!("committed {} = '{}'", keyword.kind, literal.content);

    stack.clear();
    Ok(())
}
