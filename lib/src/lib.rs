//! Computes Wordle feedback, tracks what that feedback reveals about the secret word, and ranks
//! the next guess by how well it splits the remaining candidates in the worst case.

mod data;
mod engine;
mod restrictions;
mod results;
pub mod scorers;

pub use data::filter_candidates;
pub use data::rank_by_letter_coverage;
pub use data::LetterCounter;
pub use data::LetterSet;
pub use data::Word;
pub use data::WordBank;
pub use data::NUM_LETTERS;
pub use engine::*;
pub use restrictions::extract;
pub use restrictions::ConstraintDelta;
pub use restrictions::ConstraintStore;
pub use results::*;
