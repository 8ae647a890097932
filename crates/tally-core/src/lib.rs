//! Tally core: cost-directed simplifier for pencil-and-paper algebra.
//!
//! This crate provides the expression arena, the operation-cost model, the
//! rewrite generators, and the best-first search driver that reduces an
//! elementary algebraic expression to a canonical simplified form along the
//! cheapest rewrite path it can find.

pub mod aref;
pub mod arena;
pub mod cost;
pub mod goal;
pub mod heuristic;
pub mod linear;
pub mod model;
pub mod mux;
pub mod render;
pub mod rewrite;
pub mod search;
pub mod symbol;

// Re-export key types at crate root for convenience.
pub use aref::{Compute, RefId, RefNode};
pub use arena::RefArena;
pub use cost::CostModel;
pub use model::Model;
pub use search::{search, CancelToken, Outcome, SearchOptions};
pub use symbol::{CompositeId, SymbolCache, VarId};
