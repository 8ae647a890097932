//! Cancellation: remove a pair of opposite equal terms.
//!
//! Hash-consing makes the "identical canonical symbol" check an id
//! comparison, and the pair is found whichever side carries the minus.

use crate::arena::RefArena;
use crate::cost::CostModel;
use crate::linear::{join_terms, split_terms};
use crate::model::Model;
use crate::rewrite::into_models;
use std::rc::Rc;

/// Flat bookkeeping charge for striking out an opposite pair.
const CANCEL_COST: i64 = 1;

pub fn expand(model: &Rc<Model>, arena: &mut RefArena, costs: &CostModel) -> Vec<Rc<Model>> {
    let Some(terms) = split_terms(&model.refs, arena) else {
        log::debug!("cancel: skipping malformed sequence in {:?}", model.refs);
        return Vec::new();
    };

    let mut candidates = Vec::new();
    for i in 0..terms.len() {
        for j in i + 1..terms.len() {
            if terms[i].id != terms[j].id || terms[i].sign == terms[j].sign {
                continue;
            }
            let remaining: Vec<_> = terms
                .iter()
                .enumerate()
                .filter(|&(k, _)| k != i && k != j)
                .map(|(_, t)| *t)
                .collect();
            let refs = if remaining.is_empty() {
                vec![arena.make_number(0)]
            } else {
                join_terms(&remaining, arena)
            };
            candidates.push((CANCEL_COST, "cancel_terms", refs, None));
        }
    }
    into_models(model, candidates, arena, costs)
}
