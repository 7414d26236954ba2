//! Concurrent discovery of mod candidates
//!
//! Root sources come from [`CandidateFinder`]s. Every source is scanned by
//! its own task; archives nested inside an accepted mod are extracted once
//! into the [`ExtractionCache`] and scanned by child tasks one level deeper.
//! The whole tree shares one wall-clock timeout.

mod builtin;
mod cache;
mod engine;
mod finder;
mod pool;
mod source;

pub use builtin::BuiltinPackage;
pub use cache::ExtractionCache;
pub use engine::Discoverer;
pub use finder::{CandidateFinder, DirectoryCandidateFinder, PathCandidateFinder};
pub use pool::CandidatePool;
pub use source::SourceRoot;
