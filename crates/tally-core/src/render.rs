//! Textual output: canonical state keys, surface-syntax expansion, and
//! solution-path formatting.
//!
//! `symbols` is the stable diagnostic form (composites appear as their
//! cache-assigned `?k` names); `expand` recursively unfolds composites back
//! into surface syntax for human-facing results.

use crate::aref::{Compute, RefId, RefNode};
use crate::arena::RefArena;
use crate::model::Model;
use std::rc::Rc;

/// Canonical symbols of a sequence, joined by spaces.
pub fn symbols(arena: &RefArena, refs: &[RefId]) -> String {
    refs.iter()
        .map(|&id| arena.symbol(id))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Surface-syntax form of one ref, unfolding composites recursively.
pub fn expand(arena: &RefArena, id: RefId) -> String {
    match arena.node(id) {
        RefNode::Number(n) => n.to_string(),
        RefNode::Variable(v) => arena.cache().var_name(*v).to_owned(),
        RefNode::Op(c) => c.to_string(),
        RefNode::Composite {
            children,
            compute: None,
            ..
        } => join_surface(arena, children),
        RefNode::Composite {
            children,
            compute: Some(compute),
            ..
        } => {
            let parts: Vec<String> = children.iter().map(|&c| expand(arena, c)).collect();
            match compute {
                Compute::Add => parts.join(" + "),
                Compute::Mul => parts.join(" * "),
                Compute::Div => parts.join(" / "),
                Compute::Pow => parts.join("^"),
            }
        }
    }
}

/// Surface-syntax form of a whole top-level sequence.
pub fn expand_refs(arena: &RefArena, refs: &[RefId]) -> String {
    join_surface(arena, refs)
}

/// Join surface forms with spaces, keeping `^` tight against its operands.
fn join_surface(arena: &RefArena, refs: &[RefId]) -> String {
    let mut out = String::new();
    let mut tight = false;
    for (i, &id) in refs.iter().enumerate() {
        let is_caret = matches!(arena.node(id), RefNode::Op('^'));
        if i > 0 && !is_caret && !tight {
            out.push(' ');
        }
        out.push_str(&expand(arena, id));
        tight = is_caret;
    }
    out
}

/// Format a solution path, one line per model:
/// `[transform] <symbols> (cost: total)`.
///
/// This is the only stable textual output of the search.
pub fn format_path(arena: &RefArena, path: &[Rc<Model>]) -> String {
    let mut out = String::new();
    for model in path {
        out.push_str(&format!(
            "[{}] {} (cost: {})\n",
            model.transform,
            symbols(arena, &model.refs),
            model.total_cost
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::CostModel;
    use smallvec::smallvec;

    #[test]
    fn symbols_show_cache_names() {
        let mut arena = RefArena::new();
        let four = arena.make_number(4);
        let plus = arena.make_op('+');
        let three = arena.make_number(3);
        let star = arena.make_op('*');
        let group = arena.make_group(smallvec![three, star, four]);
        assert_eq!(symbols(&arena, &[four, plus, group]), "4 + ?1");
    }

    #[test]
    fn expand_unfolds_groups() {
        let mut arena = RefArena::new();
        let three = arena.make_number(3);
        let star = arena.make_op('*');
        let four = arena.make_number(4);
        let group = arena.make_group(smallvec![three, star, four]);
        assert_eq!(expand(&arena, group), "3 * 4");
    }

    #[test]
    fn expand_keeps_powers_tight() {
        let mut arena = RefArena::new();
        let x = arena.make_variable("x");
        let caret = arena.make_op('^');
        let two = arena.make_number(2);
        let group = arena.make_group(smallvec![x, caret, two]);
        assert_eq!(expand(&arena, group), "x^2");

        let five = arena.make_number(5);
        let pow = arena.make_compute(Compute::Pow, smallvec![x, five]);
        assert_eq!(expand(&arena, pow), "x^5");
    }

    #[test]
    fn expand_renders_compute_composites() {
        let mut arena = RefArena::new();
        let six = arena.make_number(6);
        let y = arena.make_variable("y");
        let product = arena.make_compute(Compute::Mul, smallvec![six, y]);
        assert_eq!(expand(&arena, product), "6 * y");
    }

    #[test]
    fn expand_refs_renders_goal_states() {
        let mut arena = RefArena::new();
        let five = arena.make_number(5);
        let plus = arena.make_op('+');
        let x = arena.make_variable("x");
        let six = arena.make_number(6);
        let y = arena.make_variable("y");
        let six_y = arena.make_compute(Compute::Mul, smallvec![six, y]);
        assert_eq!(
            expand_refs(&arena, &[five, plus, x, plus, six_y]),
            "5 + x + 6 * y"
        );
    }

    #[test]
    fn format_path_lines() {
        let mut arena = RefArena::new();
        let costs = CostModel::default();
        let four = arena.make_number(4);
        let root = Model::initial(vec![four], &arena, &costs);
        let text = format_path(&arena, &root.path());
        assert_eq!(text, "[initial] 4 (cost: 0)\n");
    }
}
