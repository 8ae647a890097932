//! Rewrite generators: one module per rewrite family.
//!
//! Every generator is a function `(model, arena, costs) -> Vec<Rc<Model>>`
//! whose output is sorted by non-decreasing local cost. Contracts:
//!
//! - Each yielded model references the given model as parent and adds the
//!   local rewrite cost to the accumulated total.
//! - Generators never mutate the input model; they allocate fresh refs and
//!   fresh models.
//! - Repeated calls on the same model are deterministic.
//! - A sequence shape a generator does not expect is logged and skipped,
//!   never propagated.
//!
//! All composite construction goes through the arena so structurally
//! identical sub-expressions share one `?k` name and are recognized by the
//! search driver's visited set.

pub mod cancel;
pub mod cleanup;
pub mod div;
pub mod mul;
pub mod sum;

use crate::aref::{Children, RefId, RefNode};
use crate::arena::RefArena;
use crate::cost::CostModel;
use crate::model::Model;
use std::rc::Rc;

/// A rewrite family: name plus expansion function.
pub type Generator = fn(&Rc<Model>, &mut RefArena, &CostModel) -> Vec<Rc<Model>>;

/// The generator table, in the order the action multiplexer polls it.
/// Table order is the deterministic tie-break for equal-cost successors.
pub const GENERATORS: &[(&str, Generator)] = &[
    ("cancel", cancel::expand),
    ("sum", sum::expand),
    ("mul", mul::expand),
    ("div", div::expand),
    ("cleanup", cleanup::expand_cleanup),
    ("sub_to_add", cleanup::expand_sub_to_add),
    ("paren", cleanup::expand_paren),
];

/// One replacement inside a group composite's child list.
pub(crate) struct Patch {
    /// First child index the patch covers.
    pub start: usize,
    /// Number of children replaced.
    pub len: usize,
    /// The ref standing in for the covered span.
    pub replacement: RefId,
    /// Local rewrite cost.
    pub cost: i64,
    /// Transform label for the produced model.
    pub label: &'static str,
}

/// A rebuilt term produced by patching some nested group.
pub(crate) struct TermRewrite {
    pub term: RefId,
    pub cost: i64,
    pub label: &'static str,
    pub result: RefId,
}

/// Apply `rule` to the child list of every group composite reachable inside
/// `term`, innermost groups first, and rebuild the term for each patch.
///
/// A child list that shrinks to a single ref replaces the group outright,
/// so `(x)` collapses to `x` and a fully-merged product loses its wrapper.
pub(crate) fn rewrite_in_term(
    arena: &mut RefArena,
    term: RefId,
    rule: &mut dyn FnMut(&mut RefArena, &[RefId]) -> Vec<Patch>,
) -> Vec<TermRewrite> {
    let children = match arena.node(term) {
        RefNode::Composite {
            children,
            compute: None,
            ..
        } => children.clone(),
        _ => return Vec::new(),
    };

    let mut out = Vec::new();
    for (i, &child) in children.iter().enumerate() {
        for inner in rewrite_in_term(arena, child, rule) {
            let mut rebuilt = children.clone();
            rebuilt[i] = inner.term;
            out.push(TermRewrite {
                term: regroup(arena, rebuilt),
                ..inner
            });
        }
    }
    for patch in rule(arena, &children) {
        let mut rebuilt: Children = Children::new();
        rebuilt.extend_from_slice(&children[..patch.start]);
        rebuilt.push(patch.replacement);
        rebuilt.extend_from_slice(&children[patch.start + patch.len..]);
        out.push(TermRewrite {
            term: regroup(arena, rebuilt),
            cost: patch.cost,
            label: patch.label,
            result: patch.replacement,
        });
    }
    out
}

fn regroup(arena: &mut RefArena, children: Children) -> RefId {
    if children.len() == 1 {
        children[0]
    } else {
        arena.make_group(children)
    }
}

/// Sort candidates by local cost, keeping enumeration order within ties,
/// and materialize them as successor models.
pub(crate) fn into_models(
    parent: &Rc<Model>,
    mut candidates: Vec<(i64, &'static str, Vec<RefId>, Option<RefId>)>,
    arena: &RefArena,
    costs: &CostModel,
) -> Vec<Rc<Model>> {
    candidates.sort_by_key(|(cost, ..)| *cost);
    candidates
        .into_iter()
        .map(|(cost, label, refs, result)| parent.child(label, refs, cost, result, arena, costs))
        .collect()
}
