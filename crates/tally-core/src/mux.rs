//! Action multiplexer: merge the per-generator successor sequences into one
//! stream globally ordered by successor total cost.
//!
//! Each generator contributes a queue sorted by local rewrite cost, so
//! every queue is non-decreasing in successor total cost and the k-way
//! merge over queue heads is globally ordered. Ties break by generator
//! table order, keeping expansion deterministic. The driver can also keep
//! pulling from one specific generator's queue while its candidates keep
//! improving.

use crate::arena::RefArena;
use crate::cost::CostModel;
use crate::model::Model;
use crate::rewrite::GENERATORS;
use std::collections::VecDeque;
use std::rc::Rc;

/// One merged successor: which rewrite family produced it, and the model.
pub struct Action {
    pub generator: usize,
    pub name: &'static str,
    pub model: Rc<Model>,
}

/// K-way merge over the generators' successor queues for one expansion.
pub struct ActionMux {
    queues: Vec<(&'static str, VecDeque<Rc<Model>>)>,
}

impl ActionMux {
    /// Run every generator on `model` and queue the results.
    pub fn new(model: &Rc<Model>, arena: &mut RefArena, costs: &CostModel) -> Self {
        let queues = GENERATORS
            .iter()
            .map(|&(name, generator)| (name, generator(model, arena, costs).into()))
            .collect();
        ActionMux { queues }
    }

    /// Number of rewrite families polled.
    pub fn generator_count(&self) -> usize {
        self.queues.len()
    }

    /// Pop the globally cheapest head across all queues.
    pub fn next(&mut self) -> Option<Action> {
        let mut best: Option<(usize, i64)> = None;
        for (idx, (_, queue)) in self.queues.iter().enumerate() {
            if let Some(head) = queue.front() {
                let total = head.total_cost;
                if best.map_or(true, |(_, b)| total < b) {
                    best = Some((idx, total));
                }
            }
        }
        let (generator, _) = best?;
        let name = self.queues[generator].0;
        let model = self.queues[generator].1.pop_front()?;
        Some(Action {
            generator,
            name,
            model,
        })
    }

    /// Peek the next candidate of one specific generator.
    pub fn peek_from(&self, generator: usize) -> Option<&Rc<Model>> {
        self.queues[generator].1.front()
    }

    /// Pop the next candidate of one specific generator.
    pub fn pop_from(&mut self, generator: usize) -> Option<Rc<Model>> {
        self.queues[generator].1.pop_front()
    }
}
