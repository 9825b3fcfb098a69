//! reelmatch-resolver
//!
//! Picks the one external search result that best matches a catalog title,
//! from title similarity, release-year proximity and relative popularity.
pub mod policy;
pub mod ratio;
pub mod resolver;

pub use policy::ResolverPolicy;
pub use ratio::SequenceRatio;
pub use resolver::{CandidateResolver, ScoreBreakdown};
