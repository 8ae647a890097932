//! Recursive-descent parser producing the flattened top-level ref sequence
//! the simplifier core consumes.
//!
//! Terms separated by `+` `-` stay flat; `*` `/` `^` chains and
//! parenthesized sub-expressions fold into group composites whose children
//! carry the flattened sub-sequence. Implicit multiplication is accepted
//! between a factor and a following identifier or `(` (so `5y` and `5(x+1)`
//! parse as products). A parenthesized negative literal folds directly into
//! a negative number.

use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::tokenize;
use crate::token::{SpannedToken, Token};
use tally_core::aref::Children;
use tally_core::{RefArena, RefId, RefNode};

/// Parse an expression into a top-level ref sequence.
///
/// # Errors
///
/// Returns [`ParseError`] for lexical errors, malformed syntax, and
/// trailing input.
pub fn parse(text: &str, arena: &mut RefArena) -> Result<Vec<RefId>, ParseError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        arena,
    };
    let refs = parser.parse_sequence()?;
    match parser.peek().token {
        Token::Eof => Ok(refs),
        _ => Err(parser.error_here(ParseErrorKind::TrailingInput)),
    }
}

struct Parser<'a> {
    tokens: Vec<SpannedToken>,
    pos: usize,
    arena: &'a mut RefArena,
}

impl Parser<'_> {
    fn peek(&self) -> &SpannedToken {
        // the token stream always ends with Eof
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn advance(&mut self) -> SpannedToken {
        let st = self.peek().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        st
    }

    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.peek().span.start)
    }

    /// `[sign] term ((+|-) term)*`
    fn parse_sequence(&mut self) -> Result<Vec<RefId>, ParseError> {
        let mut refs = Vec::new();
        match self.peek().token {
            Token::Plus => {
                self.advance();
                refs.push(self.arena.make_op('+'));
            }
            Token::Minus => {
                self.advance();
                refs.push(self.arena.make_op('-'));
            }
            _ => {}
        }
        refs.push(self.parse_term()?);
        loop {
            let op = match self.peek().token {
                Token::Plus => '+',
                Token::Minus => '-',
                _ => break,
            };
            self.advance();
            refs.push(self.arena.make_op(op));
            refs.push(self.parse_term()?);
        }
        Ok(refs)
    }

    /// `factor ((*|/) factor)*`, with implicit `*` before an identifier or
    /// an opening parenthesis.
    fn parse_term(&mut self) -> Result<RefId, ParseError> {
        let first = self.parse_factor()?;
        let mut children: Children = Children::new();
        children.push(first);
        loop {
            let op = match self.peek().token {
                Token::Star => {
                    self.advance();
                    '*'
                }
                Token::Slash => {
                    self.advance();
                    '/'
                }
                Token::Ident(_) | Token::LParen => '*',
                _ => break,
            };
            let op_ref = self.arena.make_op(op);
            children.push(op_ref);
            children.push(self.parse_factor()?);
        }
        if children.len() == 1 {
            Ok(first)
        } else {
            Ok(self.arena.make_group(children))
        }
    }

    /// `primary (^ factor)?` -- exponentiation binds tightest and
    /// associates to the right.
    fn parse_factor(&mut self) -> Result<RefId, ParseError> {
        let base = self.parse_primary()?;
        if matches!(self.peek().token, Token::Caret) {
            self.advance();
            let caret = self.arena.make_op('^');
            let exp = self.parse_factor()?;
            let mut children = Children::new();
            children.extend([base, caret, exp]);
            Ok(self.arena.make_group(children))
        } else {
            Ok(base)
        }
    }

    fn parse_primary(&mut self) -> Result<RefId, ParseError> {
        let st = self.advance();
        match st.token {
            Token::Integer(n) => Ok(self.arena.make_number(n)),
            Token::Ident(name) => Ok(self.arena.make_variable(&name)),
            Token::LParen => {
                let inner = self.parse_sequence()?;
                match self.peek().token {
                    Token::RParen => {
                        self.advance();
                    }
                    _ => return Err(self.error_here(ParseErrorKind::UnclosedParen)),
                }
                // fold a parenthesized negative literal
                if let [sign, num] = inner.as_slice() {
                    if matches!(self.arena.node(*sign), RefNode::Op('-')) {
                        if let RefNode::Number(n) = self.arena.node(*num) {
                            let n = *n;
                            if let Some(m) = n.checked_neg() {
                                return Ok(self.arena.make_number(m));
                            }
                        }
                    }
                }
                Ok(self.arena.make_group(inner.into_iter().collect()))
            }
            _ => Err(ParseError::new(ParseErrorKind::ExpectedTerm, st.span.start)),
        }
    }
}

/// Render a parse for assertions and diagnostics without running a search.
#[cfg(test)]
fn parse_symbols(text: &str) -> String {
    let mut arena = RefArena::new();
    let refs = parse(text, &mut arena).unwrap();
    tally_core::render::symbols(&arena, &refs)
}
