//! Discovery and version resolution for nested mod archives.
//!
//! The engine scans root sources (directories and zip/jar archives) for mod
//! metadata, follows archives nested inside those sources, and then picks at
//! most one version of every discovered mod id so that all hard
//! requirements and exclusions hold.
//!
//! ```ignore
//! use std::sync::Arc;
//! use modsolve::{CandidateFinder, DirectoryCandidateFinder, ModResolver, ResolverConfig};
//!
//! let config = ResolverConfig::build(Some("."), true)?;
//! let resolver = ModResolver::builder().with_config(config).build()?;
//! let mut context = resolver.new_context();
//! let finders: Vec<Arc<dyn CandidateFinder>> = vec![Arc::new(DirectoryCandidateFinder::new("mods"))];
//! let result = resolver.resolve(&mut context, &finders, Vec::new()).await?;
//! for candidate in result.load_order() {
//!     println!("{}", candidate);
//! }
//! ```

pub mod config;
pub mod context;
pub mod discovery;
pub mod error;
pub mod json;
pub mod package;
pub mod resolver;
pub mod solver;
pub mod validation;

pub use config::ResolverConfig;
pub use context::{ContextState, ResolutionContext};
pub use discovery::{BuiltinPackage, CandidateFinder, DirectoryCandidateFinder, ExtractionCache, PathCandidateFinder};
pub use error::{ResolverError, Result};
pub use json::JsonMetadataParser;
pub use package::{Candidate, CandidateSet, Environment, Link, LinkKind, MetadataParser, Origin, PackageMetadata, SchemaError};
pub use resolver::{ModResolver, ModResolverBuilder};
pub use solver::{Problem, ProblemKind, ResolutionFailure, ResolutionResult, Warning};
pub use validation::{validate_id, IdViolation, InvalidIdError};
