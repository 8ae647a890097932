//! Multiplication rewrites: collapse one `(L * R)` window inside a term's
//! group structure.
//!
//! Numeric products stay lazy (pending `mul(a,b)` composite); a numeric
//! coefficient folds onto a variable as a `c * v` composite; powers of the
//! same variable merge by adding exponents. Numeric powers are collapsed
//! here too, since a `(b ^ e)` window is just an iterated product.

use crate::aref::{Compute, RefId, RefNode};
use crate::arena::RefArena;
use crate::cost::CostModel;
use crate::linear::{as_number, as_var_power, join_terms, split_terms};
use crate::model::Model;
use crate::rewrite::{into_models, rewrite_in_term, Patch};
use crate::symbol::VarId;
use smallvec::smallvec;
use std::rc::Rc;

fn var_power_ref(arena: &mut RefArena, var: VarId, power: i64) -> RefId {
    let name = arena.cache().var_name(var).to_owned();
    let v = arena.make_variable(&name);
    match power {
        0 => arena.make_number(1),
        1 => v,
        _ => {
            let p = arena.make_number(power);
            arena.make_compute(Compute::Pow, smallvec![v, p])
        }
    }
}

/// Largest exponent the lazy power evaluator will attempt.
const MAX_NUMERIC_EXPONENT: i64 = 31;

fn patches(arena: &mut RefArena, children: &[RefId], costs: &CostModel) -> Vec<Patch> {
    let mut out = Vec::new();
    for start in 0..children.len().saturating_sub(2) {
        let [l, op, r] = [children[start], children[start + 1], children[start + 2]];
        let op_char = match arena.node(op) {
            RefNode::Op(c) => *c,
            _ => continue,
        };
        let window = |replacement, cost, label| Patch {
            start,
            len: 3,
            replacement,
            cost,
            label,
        };

        if op_char == '^' {
            // numeric base and small non-negative exponent only
            let (Some(base), Some(exp)) = (as_number(arena, l), as_number(arena, r)) else {
                continue;
            };
            if !(0..=MAX_NUMERIC_EXPONENT).contains(&exp) {
                continue;
            }
            let replacement = arena.make_compute(Compute::Pow, smallvec![l, r]);
            let cost = costs.mul_cost(base, base) * (exp - 1).max(1);
            out.push(window(replacement, cost, "power_numbers"));
            continue;
        }
        if op_char != '*' {
            continue;
        }

        match (as_number(arena, l), as_number(arena, r)) {
            (Some(a), Some(b)) => {
                let replacement = arena.make_compute(Compute::Mul, smallvec![l, r]);
                out.push(window(replacement, costs.mul_cost(a, b), "multiply_numbers"));
            }
            (Some(_), None) | (None, Some(_)) => {
                let (num, other) = if as_number(arena, l).is_some() {
                    (l, r)
                } else {
                    (r, l)
                };
                if as_var_power(arena, other).is_none() {
                    continue;
                }
                let replacement = arena.make_compute(Compute::Mul, smallvec![num, other]);
                out.push(window(replacement, costs.coeff_var_mul, "multiply_coeff_var"));
            }
            (None, None) => {
                let (Some((va, pa)), Some((vb, pb))) =
                    (as_var_power(arena, l), as_var_power(arena, r))
                else {
                    continue;
                };
                if va != vb {
                    continue;
                }
                let Some(power) = pa.checked_add(pb) else {
                    continue;
                };
                let replacement = var_power_ref(arena, va, power);
                out.push(window(replacement, costs.same_var_mul, "merge_powers"));
            }
        }
    }
    out
}

pub fn expand(model: &Rc<Model>, arena: &mut RefArena, costs: &CostModel) -> Vec<Rc<Model>> {
    let Some(terms) = split_terms(&model.refs, arena) else {
        log::debug!("mul: skipping malformed sequence in {:?}", model.refs);
        return Vec::new();
    };

    let mut candidates = Vec::new();
    for (ti, term) in terms.iter().enumerate() {
        let rewrites = rewrite_in_term(arena, term.id, &mut |arena, children| {
            patches(arena, children, costs)
        });
        for rw in rewrites {
            let mut rebuilt = terms.clone();
            rebuilt[ti].id = rw.term;
            let refs = join_terms(&rebuilt, arena);
            candidates.push((rw.cost, rw.label, refs, Some(rw.result)));
        }
    }
    into_models(model, candidates, arena, costs)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_refs(refs: Vec<RefId>, arena: &mut RefArena) -> Vec<Rc<Model>> {
        let costs = CostModel::default();
        let model = Model::initial(refs, arena, &costs);
        expand(&model, arena, &costs)
    }

    #[test]
    fn collapses_numeric_product_window() {
        let mut arena = RefArena::new();
        let three = arena.make_number(3);
        let star = arena.make_op('*');
        let four = arena.make_number(4);
        let group = arena.make_group(smallvec![three, star, four]);
        let succs = expand_refs(vec![group], &mut arena);
        assert_eq!(succs.len(), 1);
        assert_eq!(succs[0].transform, "multiply_numbers");
        assert_eq!(arena.force_value(succs[0].refs[0]), Some(12));
    }

    #[test]
    fn folds_coefficient_onto_variable() {
        let mut arena = RefArena::new();
        let five = arena.make_number(5);
        let star = arena.make_op('*');
        let y = arena.make_variable("y");
        let group = arena.make_group(smallvec![five, star, y]);
        let succs = expand_refs(vec![group], &mut arena);
        assert_eq!(succs.len(), 1);
        assert_eq!(succs[0].transform, "multiply_coeff_var");
    }

    #[test]
    fn merges_same_variable_powers() {
        let mut arena = RefArena::new();
        let x = arena.make_variable("x");
        let caret = arena.make_op('^');
        let two = arena.make_number(2);
        let three = arena.make_number(3);
        let x2 = arena.make_group(smallvec![x, caret, two]);
        let x3 = arena.make_group(smallvec![x, caret, three]);
        let star = arena.make_op('*');
        let product = arena.make_group(smallvec![x2, star, x3]);
        let succs = expand_refs(vec![product], &mut arena);
        assert_eq!(succs.len(), 1);
        assert_eq!(succs[0].transform, "merge_powers");
        let (v, p) = as_var_power(&arena, succs[0].refs[0]).unwrap();
        assert_eq!(arena.cache().var_name(v), "x");
        assert_eq!(p, 5);
    }

    #[test]
    fn different_variables_do_not_merge() {
        let mut arena = RefArena::new();
        let x = arena.make_variable("x");
        let star = arena.make_op('*');
        let y = arena.make_variable("y");
        let group = arena.make_group(smallvec![x, star, y]);
        let succs = expand_refs(vec![group], &mut arena);
        assert!(succs.is_empty());
    }

    #[test]
    fn reaches_nested_windows_innermost_first() {
        let mut arena = RefArena::new();
        let two = arena.make_number(2);
        let star = arena.make_op('*');
        let three = arena.make_number(3);
        let four = arena.make_number(4);
        let inner = arena.make_group(smallvec![three, star, four]);
        let outer = arena.make_group(smallvec![two, star, inner]);
        let succs = expand_refs(vec![outer], &mut arena);
        // only the inner (3 * 4) window is numeric; the outer waits on it
        assert_eq!(succs.len(), 1);
        assert_eq!(succs[0].transform, "multiply_numbers");
    }

    #[test]
    fn collapses_numeric_power_window() {
        let mut arena = RefArena::new();
        let two = arena.make_number(2);
        let caret = arena.make_op('^');
        let three = arena.make_number(3);
        let group = arena.make_group(smallvec![two, caret, three]);
        let succs = expand_refs(vec![group], &mut arena);
        assert_eq!(succs.len(), 1);
        assert_eq!(succs[0].transform, "power_numbers");
        assert_eq!(arena.force_value(succs[0].refs[0]), Some(8));
    }

    #[test]
    fn long_product_chain_offers_each_window() {
        let mut arena = RefArena::new();
        let two = arena.make_number(2);
        let star = arena.make_op('*');
        let three = arena.make_number(3);
        let four = arena.make_number(4);
        let chain = arena.make_group(smallvec![two, star, three, star, four]);
        let succs = expand_refs(vec![chain], &mut arena);
        assert_eq!(succs.len(), 2);
    }
}
