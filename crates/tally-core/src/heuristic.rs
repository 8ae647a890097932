//! Residual-cost estimate for a ref sequence.
//!
//! Terms are grouped by compatibility key; each group that still has to be
//! merged charges the cheapest rewrite that could merge it, extra groups
//! charge the bookkeeping of carrying them, and unflattened `* / ^`
//! structure charges the multiplications still buried in it. The estimate
//! is zero exactly on goal states.
//!
//! The estimate is a search bias, not a certificate: states that die by
//! cancellation can be cheaper to finish than the group charges suggest.

use crate::aref::{RefId, RefNode};
use crate::arena::RefArena;
use crate::cost::CostModel;
use crate::goal::is_goal;
use crate::linear::{as_linear_term, as_number, split_terms};
use crate::symbol::{CompositeId, VarId};
use rustc_hash::FxHashMap;

/// Compatibility key: terms with equal keys can merge into one.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
enum TermKey {
    Number,
    Var(VarId, i64),
    Expr(CompositeId),
}

fn term_key(arena: &RefArena, id: RefId) -> TermKey {
    if as_number(arena, id).is_some() {
        return TermKey::Number;
    }
    if let Some(lt) = as_linear_term(arena, id) {
        return TermKey::Var(lt.var, lt.power);
    }
    match arena.node(id) {
        RefNode::Composite { name, .. } => TermKey::Expr(*name),
        // a bare operator cannot reach here through split_terms
        _ => TermKey::Number,
    }
}

/// Count `* / ^` operator refs buried in group composites, recursively.
fn nested_op_count(arena: &RefArena, id: RefId) -> i64 {
    match arena.node(id) {
        RefNode::Composite {
            children,
            compute: None,
            ..
        } => children
            .iter()
            .map(|&c| match arena.node(c) {
                RefNode::Op('*') | RefNode::Op('/') | RefNode::Op('^') => 1,
                _ => nested_op_count(arena, c),
            })
            .sum(),
        RefNode::Composite { children, .. } => {
            children.iter().map(|&c| nested_op_count(arena, c)).sum()
        }
        _ => 0,
    }
}

/// Estimate the residual simplification cost of `refs`.
///
/// Zero on goal states and on sequences the term splitter rejects.
pub fn estimate(refs: &[RefId], arena: &RefArena, costs: &CostModel) -> i64 {
    if is_goal(refs, arena) {
        return 0;
    }
    let Some(terms) = split_terms(refs, arena) else {
        return 0;
    };

    let scale = costs.digit_scale();
    let mut groups: FxHashMap<TermKey, i64> = FxHashMap::default();
    let mut nested = 0i64;
    for term in &terms {
        *groups.entry(term_key(arena, term.id)).or_insert(0) += 1;
        nested += nested_op_count(arena, term.id);
    }

    let mut total = 0i64;
    for (key, n) in &groups {
        if *n < 2 {
            continue;
        }
        let base = match key {
            TermKey::Number => costs.add_per_digit * scale,
            TermKey::Var(..) => costs.var_combine,
            TermKey::Expr(_) => costs.expr_combine,
        };
        total += (n - 1) * base;
    }
    let group_count = groups.len() as i64;
    if group_count > 1 {
        total += (group_count - 1) * costs.var_base;
    }
    total += costs.mul_single_digit * scale * nested;
    total
}
