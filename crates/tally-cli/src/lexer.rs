//! Lexer (tokenizer) for the elementary algebra grammar.
//!
//! Converts a source string into a sequence of [`SpannedToken`] values,
//! each carrying its [`Span`] byte range in the original source.

use crate::error::{ParseError, ParseErrorKind};
use crate::token::{Span, SpannedToken, Token};

/// Replace common Unicode math operator lookalikes with ASCII equivalents.
/// This allows text pasted from PDFs and papers to parse correctly.
fn normalize_unicode(input: &str) -> String {
    input
        .replace('\u{2212}', "-") // MINUS SIGN -> hyphen-minus
        .replace('\u{00D7}', "*") // MULTIPLICATION SIGN -> star
        .replace('\u{00B7}', "*") // MIDDLE DOT -> star
        .replace('\u{00F7}', "/") // DIVISION SIGN -> slash
        .replace('\u{2013}', "-") // EN DASH -> hyphen-minus
        .replace('\u{2014}', "-") // EM DASH -> hyphen-minus
}

/// Tokenize a source string into a sequence of spanned tokens.
///
/// The returned vector always ends with a [`Token::Eof`] token whose span
/// points to the end of the input string. Unicode math operators are
/// normalized to ASCII equivalents before byte-level lexing.
///
/// # Errors
///
/// Returns [`ParseError`] if an unrecognized character is encountered or an
/// integer literal does not fit in i64.
pub fn tokenize(input: &str) -> Result<Vec<SpannedToken>, ParseError> {
    let normalized = normalize_unicode(input);
    let bytes = normalized.as_bytes();
    let mut pos = 0usize;
    let mut tokens = Vec::new();

    while pos < bytes.len() {
        let b = bytes[pos];

        // Skip whitespace (space, tab, newline, carriage return)
        if b == b' ' || b == b'\t' || b == b'\n' || b == b'\r' {
            pos += 1;
            continue;
        }

        // Single-character tokens
        let single = match b {
            b'+' => Some(Token::Plus),
            b'-' => Some(Token::Minus),
            b'*' => Some(Token::Star),
            b'/' => Some(Token::Slash),
            b'^' => Some(Token::Caret),
            b'(' => Some(Token::LParen),
            b')' => Some(Token::RParen),
            _ => None,
        };
        if let Some(token) = single {
            tokens.push(SpannedToken {
                token,
                span: Span::new(pos, pos + 1),
            });
            pos += 1;
            continue;
        }

        // Numeric literals: consecutive ASCII digits
        if b.is_ascii_digit() {
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            let word = &normalized[start..pos];
            let token = match word.parse::<i64>() {
                Ok(n) => Token::Integer(n),
                Err(_) => {
                    return Err(ParseError::new(ParseErrorKind::IntegerTooLarge, start));
                }
            };
            tokens.push(SpannedToken {
                token,
                span: Span::new(start, pos),
            });
            continue;
        }

        // Identifiers: ASCII letters, then letters/digits
        if b.is_ascii_alphabetic() {
            let start = pos;
            pos += 1;
            while pos < bytes.len() && bytes[pos].is_ascii_alphanumeric() {
                pos += 1;
            }
            tokens.push(SpannedToken {
                token: Token::Ident(normalized[start..pos].to_string()),
                span: Span::new(start, pos),
            });
            continue;
        }

        return Err(ParseError::new(
            ParseErrorKind::UnknownChar(bytes[pos] as char),
            pos,
        ));
    }

    tokens.push(SpannedToken {
        token: Token::Eof,
        span: Span::new(bytes.len(), bytes.len()),
    });
    Ok(tokens)
}
