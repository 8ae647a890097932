//! Surface crate for the Tally simplifier: lexer, parser, and the
//! parse-then-search entry point the binary and the integration tests use.

pub mod error;
pub mod lexer;
pub mod parser;
pub mod token;

use std::rc::Rc;
use tally_core::{CostModel, Model, Outcome, RefArena, SearchOptions};

/// Parse an expression and wrap it as the root model of a search.
///
/// # Errors
///
/// Surfaces the parser's [`error::ParseError`] unchanged.
pub fn parse_initial_model(
    arena: &mut RefArena,
    costs: &CostModel,
    text: &str,
) -> Result<Rc<Model>, error::ParseError> {
    let refs = parser::parse(text, arena)?;
    Ok(Model::initial(refs, arena, costs))
}

/// Parse an expression and run the search to completion.
///
/// # Errors
///
/// Surfaces the parser's [`error::ParseError`] unchanged; search outcomes
/// (including `NoSolution` and `Cancelled`) are values, not errors.
pub fn simplify(
    arena: &mut RefArena,
    costs: &CostModel,
    text: &str,
    options: &SearchOptions,
) -> Result<Outcome, error::ParseError> {
    let root = parse_initial_model(arena, costs, text)?;
    Ok(tally_core::search(arena, costs, root, options))
}
