//! Linear-form utilities: splitting a flattened ref sequence into signed
//! terms and classifying term shapes.
//!
//! The top-level state of a search node is `[sign?] T (op T)*` with
//! `op` one of `+` `-`. Generators, the goal recognizer, and the heuristic
//! all view the sequence through [`split_terms`] rather than indexing raw
//! operator positions.

use crate::aref::{Compute, RefId, RefNode};
use crate::arena::RefArena;
use crate::symbol::VarId;

/// Sign of a top-level term, read from the operator preceding it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sign {
    Plus,
    Minus,
}

impl Sign {
    /// The operator character that produces this sign.
    pub fn op(self) -> char {
        match self {
            Sign::Plus => '+',
            Sign::Minus => '-',
        }
    }
}

/// A top-level term together with its sign.
#[derive(Clone, Copy, Debug)]
pub struct Term {
    pub sign: Sign,
    pub id: RefId,
}

impl Term {
    pub fn plus(id: RefId) -> Self {
        Term {
            sign: Sign::Plus,
            id,
        }
    }
}

/// Split a flattened sequence into signed terms.
///
/// Accepts an optional leading sign operator; between terms exactly one of
/// `+` `-` is expected. Returns `None` for malformed sequences (an operator
/// where a term belongs, trailing operator, unexpected operator character)
/// so callers can skip the candidate instead of panicking.
pub fn split_terms(refs: &[RefId], arena: &RefArena) -> Option<Vec<Term>> {
    let mut terms = Vec::new();
    let mut pending: Option<Sign> = None;
    let mut expect_term = true;

    for &id in refs {
        match arena.node(id) {
            RefNode::Op(c) => {
                if !expect_term || terms.is_empty() {
                    // between terms, or the leading sign position
                    let sign = match c {
                        '+' => Sign::Plus,
                        '-' => Sign::Minus,
                        _ => return None,
                    };
                    if pending.is_some() {
                        return None;
                    }
                    pending = Some(sign);
                    expect_term = true;
                } else {
                    return None;
                }
            }
            _ => {
                if !expect_term {
                    return None;
                }
                terms.push(Term {
                    sign: pending.take().unwrap_or(Sign::Plus),
                    id,
                });
                expect_term = false;
            }
        }
    }
    if pending.is_some() || terms.is_empty() {
        return None;
    }
    Some(terms)
}

/// Rebuild a flattened sequence from signed terms.
///
/// A minus-signed first term keeps its leading `-` operator; every later
/// term is preceded by the operator of its sign.
pub fn join_terms(terms: &[Term], arena: &mut RefArena) -> Vec<RefId> {
    let mut refs = Vec::with_capacity(terms.len() * 2);
    for (i, term) in terms.iter().enumerate() {
        if i > 0 || term.sign == Sign::Minus {
            let op = arena.make_op(term.sign.op());
            refs.push(op);
        }
        refs.push(term.id);
    }
    refs
}

/// Whether the sequence carries a leading sign operator.
pub fn has_leading_sign(refs: &[RefId], arena: &RefArena) -> bool {
    refs.first()
        .is_some_and(|&id| matches!(arena.node(id), RefNode::Op('+') | RefNode::Op('-')))
}

// ---------------------------------------------------------------------------
// Term shape classification
// ---------------------------------------------------------------------------

/// A term of the shape `c * v^p` with a known integer coefficient.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LinearTerm {
    pub coeff: i64,
    pub var: VarId,
    pub power: i64,
}

/// The known integer value of a term, if it is a plain number.
pub fn as_number(arena: &RefArena, id: RefId) -> Option<i64> {
    match arena.node(id) {
        RefNode::Number(n) => Some(*n),
        _ => None,
    }
}

/// Recognize `v` and `v^p` shapes: a bare variable, a `[v ^ n]` group, or a
/// pending `pow(v, n)` composite.
pub fn as_var_power(arena: &RefArena, id: RefId) -> Option<(VarId, i64)> {
    match arena.node(id) {
        RefNode::Variable(v) => Some((*v, 1)),
        RefNode::Composite {
            children,
            compute: None,
            ..
        } => match children.as_slice() {
            [base, op, exp] => {
                let RefNode::Variable(v) = arena.node(*base) else {
                    return None;
                };
                if !matches!(arena.node(*op), RefNode::Op('^')) {
                    return None;
                }
                Some((*v, as_number(arena, *exp)?))
            }
            _ => None,
        },
        RefNode::Composite {
            children,
            compute: Some(Compute::Pow),
            ..
        } => match children.as_slice() {
            [base, exp] => {
                let RefNode::Variable(v) = arena.node(*base) else {
                    return None;
                };
                Some((*v, as_number(arena, *exp)?))
            }
            _ => None,
        },
        _ => None,
    }
}

/// Recognize every term shape that contributes linearly to one variable:
/// `v`, `v^p`, `c * v^p` (number factor on either side, as a `[a * b]`
/// group or a pending `mul(a, b)` composite).
pub fn as_linear_term(arena: &RefArena, id: RefId) -> Option<LinearTerm> {
    if let Some((var, power)) = as_var_power(arena, id) {
        return Some(LinearTerm {
            coeff: 1,
            var,
            power,
        });
    }
    let (lhs, rhs) = match arena.node(id) {
        RefNode::Composite {
            children,
            compute: None,
            ..
        } => match children.as_slice() {
            [a, op, b] if matches!(arena.node(*op), RefNode::Op('*')) => (*a, *b),
            _ => return None,
        },
        RefNode::Composite {
            children,
            compute: Some(Compute::Mul),
            ..
        } => match children.as_slice() {
            [a, b] => (*a, *b),
            _ => return None,
        },
        _ => return None,
    };
    let (coeff, var_side) = if let Some(n) = as_number(arena, lhs) {
        (n, rhs)
    } else if let Some(n) = as_number(arena, rhs) {
        (n, lhs)
    } else {
        return None;
    };
    let (var, power) = as_var_power(arena, var_side)?;
    Some(LinearTerm { coeff, var, power })
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    fn seq(arena: &mut RefArena, text: &[&str]) -> Vec<RefId> {
        text.iter()
            .map(|s| match *s {
                "+" | "-" | "*" | "/" | "^" => arena.make_op(s.chars().next().unwrap()),
                _ => match s.parse::<i64>() {
                    Ok(n) => arena.make_number(n),
                    Err(_) => arena.make_variable(s),
                },
            })
            .collect()
    }

    #[test]
    fn splits_plain_sum() {
        let mut arena = RefArena::new();
        let refs = seq(&mut arena, &["2", "+", "3", "+", "4"]);
        let terms = split_terms(&refs, &arena).unwrap();
        assert_eq!(terms.len(), 3);
        assert!(terms.iter().all(|t| t.sign == Sign::Plus));
    }

    #[test]
    fn splits_mixed_signs() {
        let mut arena = RefArena::new();
        let refs = seq(&mut arena, &["x", "-", "x", "+", "5"]);
        let terms = split_terms(&refs, &arena).unwrap();
        assert_eq!(terms[0].sign, Sign::Plus);
        assert_eq!(terms[1].sign, Sign::Minus);
        assert_eq!(terms[2].sign, Sign::Plus);
    }

    #[test]
    fn splits_leading_sign() {
        let mut arena = RefArena::new();
        let refs = seq(&mut arena, &["-", "4", "+", "x"]);
        let terms = split_terms(&refs, &arena).unwrap();
        assert_eq!(terms[0].sign, Sign::Minus);
        assert_eq!(terms[1].sign, Sign::Plus);
    }

    #[test]
    fn rejects_trailing_operator() {
        let mut arena = RefArena::new();
        let refs = seq(&mut arena, &["2", "+"]);
        assert!(split_terms(&refs, &arena).is_none());
    }

    #[test]
    fn rejects_adjacent_terms() {
        let mut arena = RefArena::new();
        let refs = seq(&mut arena, &["2", "3"]);
        assert!(split_terms(&refs, &arena).is_none());
    }

    #[test]
    fn rejects_star_between_terms() {
        let mut arena = RefArena::new();
        let refs = seq(&mut arena, &["2", "*", "3"]);
        assert!(split_terms(&refs, &arena).is_none());
    }

    #[test]
    fn join_round_trips() {
        let mut arena = RefArena::new();
        let refs = seq(&mut arena, &["-", "4", "+", "x", "-", "3"]);
        let terms = split_terms(&refs, &arena).unwrap();
        let rebuilt = join_terms(&terms, &mut arena);
        assert_eq!(rebuilt, refs);
    }

    #[test]
    fn var_power_shapes() {
        let mut arena = RefArena::new();
        let x = arena.make_variable("x");
        let (v, p) = as_var_power(&arena, x).unwrap();
        assert_eq!(arena.cache().var_name(v), "x");
        assert_eq!(p, 1);

        let caret = arena.make_op('^');
        let two = arena.make_number(2);
        let group = arena.make_group(smallvec![x, caret, two]);
        assert_eq!(as_var_power(&arena, group).unwrap().1, 2);

        let five = arena.make_number(5);
        let pow = arena.make_compute(Compute::Pow, smallvec![x, five]);
        assert_eq!(as_var_power(&arena, pow).unwrap().1, 5);
    }

    #[test]
    fn linear_term_shapes() {
        let mut arena = RefArena::new();
        let five = arena.make_number(5);
        let star = arena.make_op('*');
        let y = arena.make_variable("y");

        let group = arena.make_group(smallvec![five, star, y]);
        let lt = as_linear_term(&arena, group).unwrap();
        assert_eq!((lt.coeff, lt.power), (5, 1));

        let compute = arena.make_compute(Compute::Mul, smallvec![five, y]);
        let lt = as_linear_term(&arena, compute).unwrap();
        assert_eq!((lt.coeff, lt.power), (5, 1));

        let flipped = arena.make_group(smallvec![y, star, five]);
        let lt = as_linear_term(&arena, flipped).unwrap();
        assert_eq!((lt.coeff, lt.power), (5, 1));

        assert_eq!(as_linear_term(&arena, y).unwrap().coeff, 1);
    }

    #[test]
    fn product_of_variables_is_not_linear() {
        let mut arena = RefArena::new();
        let x = arena.make_variable("x");
        let star = arena.make_op('*');
        let y = arena.make_variable("y");
        let group = arena.make_group(smallvec![x, star, y]);
        assert!(as_linear_term(&arena, group).is_none());
    }
}
