pub mod board;
pub mod consensus;

pub use board::ConsensusBoard;
pub use consensus::{BookLine, PlayerConsensus};
