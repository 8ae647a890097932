//! Sum rewrites: merge a compatible pair of top-level terms.
//!
//! Pairs are compatible when both are numbers, both contribute linearly to
//! the same variable at the same power, or both are the same composite.
//! Numeric merges stay lazy (a pending `add(a,b)` composite materialized by
//! the deferred-compute phase); coefficient arithmetic on like variable
//! terms is done eagerly since both coefficients are known.

use crate::aref::{Compute, RefId};
use crate::arena::RefArena;
use crate::cost::CostModel;
use crate::linear::{as_linear_term, as_number, join_terms, split_terms, Sign, Term};
use crate::model::Model;
use crate::rewrite::into_models;
use crate::symbol::VarId;
use smallvec::smallvec;
use std::rc::Rc;

/// Build `v^p` (or just `v` when `p == 1`).
fn var_power_ref(arena: &mut RefArena, var: VarId, power: i64) -> RefId {
    let name = arena.cache().var_name(var).to_owned();
    let v = arena.make_variable(&name);
    if power == 1 {
        v
    } else {
        let p = arena.make_number(power);
        arena.make_compute(Compute::Pow, smallvec![v, p])
    }
}

/// Build `c * v^p`, folding away a unit coefficient.
fn linear_ref(arena: &mut RefArena, coeff: i64, var: VarId, power: i64) -> RefId {
    let base = var_power_ref(arena, var, power);
    if coeff == 1 {
        base
    } else {
        let c = arena.make_number(coeff);
        arena.make_compute(Compute::Mul, smallvec![c, base])
    }
}

/// Replace the pair `(i, j)` with `merged` (always plus-signed) and rebuild
/// the top-level sequence.
fn splice_pair(
    arena: &mut RefArena,
    terms: &[Term],
    i: usize,
    j: usize,
    merged: RefId,
) -> Vec<RefId> {
    let mut rebuilt: Vec<Term> = Vec::with_capacity(terms.len() - 1);
    for (k, term) in terms.iter().enumerate() {
        if k == j {
            continue;
        }
        if k == i {
            rebuilt.push(Term::plus(merged));
        } else {
            rebuilt.push(*term);
        }
    }
    join_terms(&rebuilt, arena)
}

pub fn expand(model: &Rc<Model>, arena: &mut RefArena, costs: &CostModel) -> Vec<Rc<Model>> {
    let Some(terms) = split_terms(&model.refs, arena) else {
        log::debug!("sum: skipping malformed sequence in {:?}", model.refs);
        return Vec::new();
    };

    let mut candidates = Vec::new();
    for i in 0..terms.len() {
        for j in i + 1..terms.len() {
            let (a, b) = (&terms[i], &terms[j]);

            // number +- number, both already in the all-plus convention
            if let (Some(x), Some(y)) = (as_number(arena, a.id), as_number(arena, b.id)) {
                if a.sign == Sign::Minus || b.sign == Sign::Minus {
                    // sub_to_add normalizes these first
                    continue;
                }
                let (label, cost) = if x == 0 || y == 0 || x.signum() == y.signum() {
                    ("add_numbers", costs.add_cost(x, y))
                } else {
                    ("subtract_numbers", costs.sub_cost(x.abs(), y.abs()))
                };
                let merged = arena.make_compute(Compute::Add, smallvec![a.id, b.id]);
                let refs = splice_pair(arena, &terms, i, j, merged);
                candidates.push((cost, label, refs, Some(merged)));
                continue;
            }

            // like variable terms at the same power
            if let (Some(la), Some(lb)) = (
                as_linear_term(arena, a.id),
                as_linear_term(arena, b.id),
            ) {
                if la.var != lb.var || la.power != lb.power {
                    continue;
                }
                let ca = if a.sign == Sign::Minus { -la.coeff } else { la.coeff };
                let cb = if b.sign == Sign::Minus { -lb.coeff } else { lb.coeff };
                let Some(c) = ca.checked_add(cb) else {
                    continue;
                };
                let (merged, cost) = if c == 0 {
                    (arena.make_number(0), costs.var_cancel_reward)
                } else {
                    (
                        linear_ref(arena, c, la.var, la.power),
                        costs.var_combine,
                    )
                };
                let refs = splice_pair(arena, &terms, i, j, merged);
                candidates.push((cost, "combine_terms", refs, Some(merged)));
                continue;
            }

            // identical composites (hash-consing makes this an id check)
            if a.id == b.id && as_number(arena, a.id).is_none() {
                let (merged, cost) = if a.sign == b.sign {
                    let two = arena.make_number(2);
                    (
                        arena.make_compute(Compute::Mul, smallvec![two, a.id]),
                        costs.expr_combine,
                    )
                } else {
                    (arena.make_number(0), costs.var_cancel_reward)
                };
                let refs = splice_pair(arena, &terms, i, j, merged);
                candidates.push((cost, "combine_terms", refs, Some(merged)));
            }
        }
    }
    into_models(model, candidates, arena, costs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render;

    fn expand_refs(refs: Vec<RefId>, arena: &mut RefArena) -> Vec<Rc<Model>> {
        let costs = CostModel::default();
        let model = Model::initial(refs, arena, &costs);
        expand(&model, arena, &costs)
    }

    #[test]
    fn merges_two_numbers_lazily() {
        let mut arena = RefArena::new();
        let four = arena.make_number(4);
        let plus = arena.make_op('+');
        let twelve = arena.make_number(12);
        let succs = expand_refs(vec![four, plus, twelve], &mut arena);
        assert_eq!(succs.len(), 1);
        assert_eq!(succs[0].transform, "add_numbers");
        let result = succs[0].result_ref.unwrap();
        assert_eq!(arena.value(result), None, "merge stays lazy until phase B");
        assert_eq!(arena.force_value(result), Some(16));
    }

    #[test]
    fn opposite_sign_numbers_merge_as_subtraction() {
        let mut arena = RefArena::new();
        let twelve = arena.make_number(12);
        let plus = arena.make_op('+');
        let neg_seven = arena.make_number(-7);
        let succs = expand_refs(vec![twelve, plus, neg_seven], &mut arena);
        assert_eq!(succs[0].transform, "subtract_numbers");
        assert_eq!(arena.force_value(succs[0].result_ref.unwrap()), Some(5));
    }

    #[test]
    fn minus_signed_number_waits_for_sub_to_add() {
        let mut arena = RefArena::new();
        let five = arena.make_number(5);
        let minus = arena.make_op('-');
        let three = arena.make_number(3);
        let succs = expand_refs(vec![five, minus, three], &mut arena);
        assert!(succs.is_empty());
    }

    #[test]
    fn doubles_a_repeated_variable() {
        let mut arena = RefArena::new();
        let x = arena.make_variable("x");
        let plus = arena.make_op('+');
        let succs = expand_refs(vec![x, plus, x], &mut arena);
        assert_eq!(succs.len(), 1);
        assert_eq!(succs[0].transform, "combine_terms");
        assert_eq!(render::expand(&arena, succs[0].refs[0]), "2 * x");
    }

    #[test]
    fn cancels_opposite_variables_to_zero_with_reward() {
        let mut arena = RefArena::new();
        let costs = CostModel::default();
        let x = arena.make_variable("x");
        let minus = arena.make_op('-');
        let refs = vec![x, minus, x];
        let model = Model::initial(refs, &mut arena, &costs);
        let succs = expand(&model, &mut arena, &costs);
        assert_eq!(succs.len(), 1);
        assert_eq!(succs[0].total_cost, costs.var_cancel_reward);
        assert!(matches!(
            arena.node(succs[0].refs[0]),
            crate::aref::RefNode::Number(0)
        ));
    }

    #[test]
    fn combines_coefficient_terms() {
        let mut arena = RefArena::new();
        let y = arena.make_variable("y");
        let plus = arena.make_op('+');
        let five = arena.make_number(5);
        let star = arena.make_op('*');
        let five_y = arena.make_group(smallvec![five, star, y]);
        let succs = expand_refs(vec![y, plus, five_y], &mut arena);
        assert_eq!(succs.len(), 1);
        let lt = as_linear_term(&arena, succs[0].refs[0]).unwrap();
        assert_eq!(lt.coeff, 6);
    }

    #[test]
    fn incompatible_terms_yield_nothing() {
        let mut arena = RefArena::new();
        let four = arena.make_number(4);
        let plus = arena.make_op('+');
        let x = arena.make_variable("x");
        let succs = expand_refs(vec![four, plus, x], &mut arena);
        assert!(succs.is_empty());
    }

    #[test]
    fn candidates_come_out_cost_sorted() {
        let mut arena = RefArena::new();
        let x = arena.make_variable("x");
        let plus = arena.make_op('+');
        let minus = arena.make_op('-');
        // x + x - x: doubling (var_combine) and cancelling (reward) pairs
        let succs = expand_refs(vec![x, plus, x, minus, x], &mut arena);
        assert!(succs.len() >= 2);
        for pair in succs.windows(2) {
            assert!(pair[0].total_cost <= pair[1].total_cost);
        }
    }
}
