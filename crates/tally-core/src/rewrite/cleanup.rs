//! Normalization rewrites: leading-sign cleanup, subtraction-to-addition,
//! and parenthesis elision.
//!
//! These carry no arithmetic of their own; each costs a flat bookkeeping
//! unit and moves the sequence toward the all-plus convention the goal
//! recognizer expects.

use crate::aref::{Compute, RefId, RefNode};
use crate::arena::RefArena;
use crate::cost::CostModel;
use crate::linear::{as_linear_term, join_terms, split_terms, Sign};
use crate::model::Model;
use crate::rewrite::{into_models, rewrite_in_term, Patch};
use smallvec::smallvec;
use std::rc::Rc;

/// Flat charge for one normalization step.
const STEP_COST: i64 = 1;

/// Strip a leading `+`; fold a leading `-` into the first term.
pub fn expand_cleanup(model: &Rc<Model>, arena: &mut RefArena, costs: &CostModel) -> Vec<Rc<Model>> {
    let refs = &model.refs;
    let Some((&head, rest)) = refs.split_first() else {
        return Vec::new();
    };
    let mut candidates = Vec::new();
    match arena.node(head) {
        RefNode::Op('+') => {
            candidates.push((STEP_COST, "drop_leading_plus", rest.to_vec(), None));
        }
        RefNode::Op('-') => {
            let Some(&first_term) = rest.first() else {
                return Vec::new();
            };
            let folded = match arena.node(first_term) {
                RefNode::Number(n) => {
                    let n = *n;
                    n.checked_neg().map(|m| arena.make_number(m))
                }
                _ => as_linear_term(arena, first_term).and_then(|lt| {
                    let coeff = lt.coeff.checked_neg()?;
                    let c = arena.make_number(coeff);
                    let name = arena.cache().var_name(lt.var).to_owned();
                    let v = arena.make_variable(&name);
                    let base = if lt.power == 1 {
                        v
                    } else {
                        let p = arena.make_number(lt.power);
                        arena.make_compute(Compute::Pow, smallvec![v, p])
                    };
                    Some(arena.make_compute(Compute::Mul, smallvec![c, base]))
                }),
            };
            if let Some(folded) = folded {
                let mut refs = vec![folded];
                refs.extend_from_slice(&rest[1..]);
                candidates.push((STEP_COST, "fold_leading_minus", refs, Some(folded)));
            }
        }
        _ => {}
    }
    into_models(model, candidates, arena, costs)
}

/// Rewrite one `- n` term into `+ (-n)`.
///
/// Idempotent on its own outputs: a negated number carries a plus sign, so
/// a second pass finds nothing to rewrite.
pub fn expand_sub_to_add(
    model: &Rc<Model>,
    arena: &mut RefArena,
    costs: &CostModel,
) -> Vec<Rc<Model>> {
    let Some(terms) = split_terms(&model.refs, arena) else {
        log::debug!("sub_to_add: skipping malformed sequence in {:?}", model.refs);
        return Vec::new();
    };

    let mut candidates = Vec::new();
    // the leading position belongs to cleanup
    for (i, term) in terms.iter().enumerate().skip(1) {
        if term.sign != Sign::Minus {
            continue;
        }
        let RefNode::Number(n) = arena.node(term.id) else {
            continue;
        };
        let Some(negated) = n.checked_neg() else {
            continue;
        };
        let negated = arena.make_number(negated);
        let mut rebuilt = terms.clone();
        rebuilt[i].sign = Sign::Plus;
        rebuilt[i].id = negated;
        let refs = join_terms(&rebuilt, arena);
        candidates.push((STEP_COST, "sub_to_add", refs, Some(negated)));
    }
    into_models(model, candidates, arena, costs)
}

/// Strip a composite that wraps exactly one ref, anywhere in a term.
pub fn expand_paren(model: &Rc<Model>, arena: &mut RefArena, costs: &CostModel) -> Vec<Rc<Model>> {
    let Some(terms) = split_terms(&model.refs, arena) else {
        log::debug!("paren: skipping malformed sequence in {:?}", model.refs);
        return Vec::new();
    };

    let mut candidates = Vec::new();
    for (ti, term) in terms.iter().enumerate() {
        let rewrites = rewrite_in_term(arena, term.id, &mut |arena, children| {
            match children {
                [only] if arena.node(*only).is_term() => vec![Patch {
                    start: 0,
                    len: 1,
                    replacement: *only,
                    cost: STEP_COST,
                    label: "elide_parens",
                }],
                _ => Vec::new(),
            }
        });
        for rw in rewrites {
            let mut rebuilt = terms.clone();
            rebuilt[ti].id = rw.term;
            let refs = join_terms(&rebuilt, arena);
            candidates.push((rw.cost, rw.label, refs, None));
        }
    }
    into_models(model, candidates, arena, costs)
}
