//! Top-level entry point tying discovery and resolution together

use std::path::PathBuf;
use std::sync::Arc;

use crate::config::ResolverConfig;
use crate::context::ResolutionContext;
use crate::discovery::{BuiltinPackage, CandidateFinder, Discoverer, ExtractionCache};
use crate::error::Result;
use crate::json::JsonMetadataParser;
use crate::package::MetadataParser;
use crate::solver::{self, ResolutionResult};

/// Discovers candidates from a set of finders and resolves them.
///
/// The extraction cache is shared across runs, so a resolver that is
/// reused never unpacks the same nested archive twice.
pub struct ModResolver {
    config: ResolverConfig,
    parser: Arc<dyn MetadataParser>,
    cache: Arc<ExtractionCache>,
}

impl ModResolver {
    pub fn builder() -> ModResolverBuilder {
        ModResolverBuilder::default()
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ExtractionCache> {
        &self.cache
    }

    /// A fresh context carrying this resolver's configuration
    pub fn new_context(&self) -> ResolutionContext {
        ResolutionContext::new(self.config.clone())
    }

    /// Run one full resolution inside `context`.
    ///
    /// The context must be fresh; it ends up `Resolved` on success and
    /// `Failed` on any error.
    pub async fn resolve(
        &self,
        context: &mut ResolutionContext,
        finders: &[Arc<dyn CandidateFinder>],
        builtins: Vec<BuiltinPackage>,
    ) -> Result<ResolutionResult> {
        context.begin_discovery()?;

        match self.run(context, finders, builtins).await {
            Ok(result) => {
                context.finish()?;
                Ok(result)
            }
            Err(e) => {
                context.fail();
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        context: &mut ResolutionContext,
        finders: &[Arc<dyn CandidateFinder>],
        builtins: Vec<BuiltinPackage>,
    ) -> Result<ResolutionResult> {
        let mut roots: Vec<PathBuf> = Vec::new();
        {
            let mut emit = |path: PathBuf| roots.push(path);
            for finder in finders {
                finder.find_candidates(context, &mut emit).await?;
            }
        }
        log::debug!("Collected {} root source(s)", roots.len());

        let discoverer = Discoverer::new(context.config(), self.parser.clone(), self.cache.clone());
        let sets = discoverer.discover(roots, builtins).await?;

        context.begin_resolution()?;
        solver::resolve_candidates(&sets)
    }
}

/// Builder for [`ModResolver`]
#[derive(Default)]
pub struct ModResolverBuilder {
    config: Option<ResolverConfig>,
    parser: Option<Arc<dyn MetadataParser>>,
    cache: Option<Arc<ExtractionCache>>,
}

impl ModResolverBuilder {
    pub fn with_config(mut self, config: ResolverConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use a different metadata format than `mod.json`
    pub fn with_parser(mut self, parser: Arc<dyn MetadataParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    pub fn with_cache(mut self, cache: Arc<ExtractionCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build(self) -> Result<ModResolver> {
        let cache = match self.cache {
            Some(cache) => cache,
            None => Arc::new(ExtractionCache::new()?),
        };

        Ok(ModResolver {
            config: self.config.unwrap_or_default(),
            parser: self.parser.unwrap_or_else(|| Arc::new(JsonMetadataParser)),
            cache,
        })
    }
}
