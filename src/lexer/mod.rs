pub mod token;
pub use token::is_keyword;

use logos::Logos;
use crate::span::{Span, Spanned};
use crate::diagnostics::CompileError;
use token::{LexError, Token};

pub fn lex(source: &str) -> Result<Vec<Spanned<Token>>, CompileError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(Token::Comment) => continue,
            Ok(tok) => tokens.push(Spanned::new(tok, Span::new(span.start, span.end))),
            Err(LexError::IntOutOfRange) => {
                return Err(CompileError::syntax(
                    format!("integer literal '{}' out of range", &source[span.start..span.end]),
                    Span::new(span.start, span.end),
                ));
            }
            Err(LexError::UnexpectedChar) => {
                return Err(CompileError::syntax(
                    format!("unexpected character '{}'", &source[span.start..span.end]),
                    Span::new(span.start, span.end),
                ));
            }
        }
    }

    tracing::trace!(count = tokens.len(), "lexed source");
    Ok(tokens)
}
