pub mod search;

pub use search::{Move, SearchOutcome, SearchStats, Searcher, best_move};
