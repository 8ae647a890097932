//! Best-first search driver.
//!
//! Phase A pops the cheapest model by priority (accumulated cost plus the
//! residual estimate), de-duplicates states through a visited set keyed by
//! the ref sequence, and expands through the action multiplexer. A model
//! with no productive rewrite is parked in an end-of-chain bucket. When the
//! frontier drains, phase B materializes pending compute composites in the
//! parked models and re-opens the search with each state that changed; if
//! nothing changes the search ends with no solution.
//!
//! Within one expansion the driver keeps pulling successors from a rewrite
//! family only while their priority strictly improves, then drops that
//! family's remainder. This is a best-first bias, not part of the
//! correctness argument: dropped successors are re-derivable from the
//! states that survive.

use crate::aref::RefId;
use crate::arena::RefArena;
use crate::cost::CostModel;
use crate::goal::is_goal;
use crate::model::Model;
use crate::mux::ActionMux;
use rustc_hash::FxHashSet;
use std::collections::BinaryHeap;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared stop flag, polled between frontier pops.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. In-flight expansion finishes first.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Knobs for one search run.
#[derive(Clone, Debug, Default)]
pub struct SearchOptions {
    /// Abandon successors whose priority exceeds this bound.
    pub cost_ceiling: Option<i64>,
    /// Stop (with no solution) after this many expansions.
    pub step_limit: Option<usize>,
    /// External stop request.
    pub cancel: Option<CancelToken>,
}

/// Result of a search run.
#[derive(Debug)]
pub enum Outcome {
    /// A goal state was reached; the path runs root first.
    Solved(Vec<Rc<Model>>),
    /// The rewrite space is exhausted without reaching a goal.
    NoSolution,
    /// The external stop token fired.
    Cancelled,
}

impl Outcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }
}

/// Frontier entry: min by priority, insertion order breaks ties.
struct Entry {
    priority: i64,
    seq: u64,
    model: Rc<Model>,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.priority == other.priority && self.seq == other.seq
    }
}
impl Eq for Entry {}
impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // reversed: BinaryHeap is a max-heap, we need the cheapest first
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct Frontier {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Frontier {
    fn new() -> Self {
        Frontier {
            heap: BinaryHeap::new(),
            next_seq: 0,
        }
    }

    fn push(&mut self, model: Rc<Model>) {
        let entry = Entry {
            priority: model.priority(),
            seq: self.next_seq,
            model,
        };
        self.next_seq += 1;
        self.heap.push(entry);
    }

    fn pop(&mut self) -> Option<Rc<Model>> {
        self.heap.pop().map(|e| e.model)
    }
}

/// Run the best-first search from `root`.
pub fn search(
    arena: &mut RefArena,
    costs: &CostModel,
    root: Rc<Model>,
    options: &SearchOptions,
) -> Outcome {
    let mut frontier = Frontier::new();
    let mut visited: FxHashSet<Box<[RefId]>> = FxHashSet::default();
    let mut end_of_chain: Vec<Rc<Model>> = Vec::new();
    let mut steps = 0usize;

    frontier.push(root);
    loop {
        // phase A: drain the frontier
        while let Some(model) = frontier.pop() {
            if options
                .cancel
                .as_ref()
                .is_some_and(CancelToken::is_cancelled)
            {
                return Outcome::Cancelled;
            }
            if options.step_limit.is_some_and(|limit| steps >= limit) {
                return Outcome::NoSolution;
            }
            steps += 1;

            if !visited.insert(model.state_key()) {
                continue;
            }
            if is_goal(&model.refs, arena) {
                return Outcome::Solved(model.path());
            }

            let mut produced = false;
            let mut mux = ActionMux::new(&model, arena, costs);
            let mut halted = vec![false; mux.generator_count()];
            while let Some(action) = mux.next() {
                if halted[action.generator] {
                    continue;
                }
                let mut prev = action.model.priority();
                produced |= offer(&mut frontier, &visited, options, action.model);
                // keep pulling from this family while it strictly improves
                while let Some(next) = mux.peek_from(action.generator).map(|m| m.priority()) {
                    if next >= prev {
                        break;
                    }
                    prev = next;
                    if let Some(pulled) = mux.pop_from(action.generator) {
                        produced |= offer(&mut frontier, &visited, options, pulled);
                    }
                }
                halted[action.generator] = true;
            }
            if !produced {
                end_of_chain.push(model);
            }
        }

        // phase B: deferred compute on the parked models
        let mut reopened = false;
        for model in std::mem::take(&mut end_of_chain) {
            let resolved: Vec<RefId> = model.refs.iter().map(|&id| arena.resolve(id)).collect();
            if resolved == model.refs {
                continue;
            }
            let child = model.child(
                "deferred_compute",
                resolved,
                costs.add_single_digit,
                None,
                arena,
                costs,
            );
            if offer(&mut frontier, &visited, options, child) {
                reopened = true;
            }
        }
        if !reopened {
            return Outcome::NoSolution;
        }
    }
}

/// Push a successor unless it is already visited or over the cost ceiling.
fn offer(
    frontier: &mut Frontier,
    visited: &FxHashSet<Box<[RefId]>>,
    options: &SearchOptions,
    model: Rc<Model>,
) -> bool {
    if options
        .cost_ceiling
        .is_some_and(|ceiling| model.priority() > ceiling)
    {
        return false;
    }
    if visited.contains(model.refs.as_slice()) {
        return false;
    }
    frontier.push(model);
    true
}
