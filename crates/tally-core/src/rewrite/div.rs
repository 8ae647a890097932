//! Division rewrites: collapse one `(L / R)` window inside a term's group
//! structure.
//!
//! Numeric division is attempted only when it is exact; powers of the same
//! variable divide by subtracting exponents, falling back to a reciprocal
//! composite when the exponent goes negative.

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
    if power == 1 {
        v
    } else {
        let p = arena.make_number(power);
        arena.make_compute(Compute::Pow, smallvec![v, p])
    }
}

fn patches(arena: &mut RefArena, children: &[RefId], costs: &CostModel) -> Vec<Patch> {
    let mut out = Vec::new();
    for start in 0..children.len().saturating_sub(2) {
        let [l, op, r] = [children[start], children[start + 1], children[start + 2]];
        if !matches!(arena.node(op), RefNode::Op('/')) {
            continue;
        }

        if let (Some(a), Some(b)) = (as_number(arena, l), as_number(arena, r)) {
            if b == 0 || a % b != 0 {
                continue;
            }
            let replacement = arena.make_compute(Compute::Div, smallvec![l, r]);
            out.push(Patch {
                start,
                len: 3,
                replacement,
                cost: costs.div,
                label: "divide_numbers",
            });
            continue;
        }

        let (Some((va, pa)), Some((vb, pb))) = (as_var_power(arena, l), as_var_power(arena, r))
        else {
            continue;
        };
        if va != vb {
            continue;
        }
        let Some(diff) = pa.checked_sub(pb) else {
            continue;
        };
        let replacement = if diff == 0 {
            arena.make_number(1)
        } else if diff > 0 {
            var_power_ref(arena, va, diff)
        } else {
            let one = arena.make_number(1);
            let denom = var_power_ref(arena, va, -diff);
            arena.make_compute(Compute::Div, smallvec![one, denom])
        };
        out.push(Patch {
            start,
            len: 3,
            replacement,
            cost: costs.div,
            label: "reduce_powers",
        });
    }
    out
}

pub fn expand(model: &Rc<Model>, arena: &mut RefArena, costs: &CostModel) -> Vec<Rc<Model>> {
    let Some(terms) = split_terms(&model.refs, arena) else {
        log::debug!("div: skipping malformed sequence in {:?}", model.refs);
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
