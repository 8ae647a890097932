//! Goal recognizer: is a ref sequence a canonical simplified form?
//!
//! The canonical form is a constant plus a combination of distinct
//! variables with integer coefficients: every term is a number (at most
//! one), a variable power, a coefficient-times-variable term, or a
//! reciprocal of a variable power, and no variable name appears twice.
//! Any remaining `-` operator means normalization is unfinished.

use crate::aref::{Compute, RefId, RefNode};
use crate::arena::RefArena;
use crate::linear::{as_linear_term, as_number, as_var_power, split_terms, Sign};
use crate::symbol::VarId;
use rustc_hash::FxHashSet;

/// Variable named by a reciprocal term `c / v^p`, if the term has that shape.
fn as_reciprocal_var(arena: &RefArena, id: RefId) -> Option<VarId> {
    match arena.node(id) {
        RefNode::Composite {
            children,
            compute: Some(Compute::Div),
            ..
        } => match children.as_slice() {
            [num, denom] => {
                as_number(arena, *num)?;
                Some(as_var_power(arena, *denom)?.0)
            }
            _ => None,
        },
        _ => None,
    }
}

/// Whether `refs` is a goal: a single number, or a sum of pairwise-distinct
/// variable terms with at most one numeric term.
pub fn is_goal(refs: &[RefId], arena: &RefArena) -> bool {
    if let [only] = refs {
        if matches!(arena.node(*only), RefNode::Number(_)) {
            return true;
        }
    }
    let Some(terms) = split_terms(refs, arena) else {
        return false;
    };
    if terms.iter().any(|t| t.sign == Sign::Minus) {
        return false;
    }

    let mut numbers = 0usize;
    let mut seen_vars: FxHashSet<VarId> = FxHashSet::default();
    for term in &terms {
        if as_number(arena, term.id).is_some() {
            numbers += 1;
            if numbers > 1 {
                return false;
            }
            continue;
        }
        let var = match as_linear_term(arena, term.id) {
            Some(lt) => lt.var,
            None => match as_reciprocal_var(arena, term.id) {
                Some(v) => v,
                None => return false,
            },
        };
        if !seen_vars.insert(var) {
            return false;
        }
    }
    true
}
