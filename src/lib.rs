pub mod config;
pub mod count_grid;
pub mod error;
pub mod game;
pub mod grid;
pub mod knowledge;
pub mod mine_map;
pub mod sampler;
pub mod sentence;

pub use error::{SolverError, SolverResult};
pub use grid::{Cell, Dims};
pub use knowledge::{KnowledgeBase, PropagationStats};
pub use mine_map::{GridOracle, MineMap};
pub use sampler::CellSampler;
pub use sentence::Sentence;
