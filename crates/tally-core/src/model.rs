//! Search-graph nodes.
//!
//! A `Model` is an immutable snapshot of the working expression: the
//! flattened top-level ref sequence plus the accumulated rewrite cost and
//! the residual-cost estimate computed once at construction. Models chain
//! through `parent` links for path reconstruction; the ref sequence itself
//! is the state key (hash-consing makes equal sequences identical).

use crate::aref::RefId;
use crate::arena::RefArena;
use crate::cost::CostModel;
use crate::heuristic;
use std::rc::Rc;

/// An immutable search node.
#[derive(Debug)]
pub struct Model {
    /// Predecessor node, for path reconstruction. `None` at the root.
    pub parent: Option<Rc<Model>>,
    /// Label of the rewrite that produced this node (diagnostics only).
    pub transform: &'static str,
    /// Flattened top-level ref sequence of the current expression.
    pub refs: Vec<RefId>,
    /// Summed cost of rewrites from the root to here.
    pub total_cost: i64,
    /// Residual-cost estimate for `refs`, computed at construction.
    pub remain_cost: i64,
    /// The composite just created by this rewrite, if any.
    pub result_ref: Option<RefId>,
}

impl Model {
    /// Wrap a parsed top-level sequence as the root of a search.
    pub fn initial(refs: Vec<RefId>, arena: &RefArena, costs: &CostModel) -> Rc<Model> {
        let remain_cost = heuristic::estimate(&refs, arena, costs);
        Rc::new(Model {
            parent: None,
            transform: "initial",
            refs,
            total_cost: 0,
            remain_cost,
            result_ref: None,
        })
    }

    /// Construct a successor produced by one rewrite.
    pub fn child(
        self: &Rc<Self>,
        transform: &'static str,
        refs: Vec<RefId>,
        local_cost: i64,
        result_ref: Option<RefId>,
        arena: &RefArena,
        costs: &CostModel,
    ) -> Rc<Model> {
        let remain_cost = heuristic::estimate(&refs, arena, costs);
        Rc::new(Model {
            parent: Some(Rc::clone(self)),
            transform,
            refs,
            total_cost: self.total_cost + local_cost,
            remain_cost,
            result_ref,
        })
    }

    /// The frontier priority: accumulated cost plus the residual estimate.
    pub fn priority(&self) -> i64 {
        self.total_cost + self.remain_cost
    }

    /// Owned copy of the state key.
    pub fn state_key(&self) -> Box<[RefId]> {
        self.refs.clone().into_boxed_slice()
    }

    /// The root-to-here chain of models, root first.
    pub fn path(self: &Rc<Self>) -> Vec<Rc<Model>> {
        let mut path = Vec::new();
        let mut cursor = Some(Rc::clone(self));
        while let Some(model) = cursor {
            cursor = model.parent.clone();
            path.push(model);
        }
        path.reverse();
        path
    }
}
