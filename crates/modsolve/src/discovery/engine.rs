use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures_util::future::{BoxFuture, FutureExt};
use indexmap::IndexMap;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use super::{BuiltinPackage, CandidatePool, ExtractionCache, SourceRoot};
use crate::config::ResolverConfig;
use crate::error::{ResolverError, Result};
use crate::package::{Candidate, CandidateSet, Environment, MetadataParser, Origin};
use crate::validation::validate_id;

/// Runs the discovery task tree over a shared [`CandidatePool`]
pub struct Discoverer {
    shared: Arc<Shared>,
    timeout: Duration,
}

/// State every scan task sees
struct Shared {
    parser: Arc<dyn MetadataParser>,
    cache: Arc<ExtractionCache>,
    pool: CandidatePool,
    permits: Semaphore,
    metadata_file: String,
    environment: Environment,
}

impl Discoverer {
    pub fn new(
        config: &ResolverConfig,
        parser: Arc<dyn MetadataParser>,
        cache: Arc<ExtractionCache>,
    ) -> Self {
        let workers = config.worker_count();
        log::debug!("Discovering with {} worker(s)", workers);

        Self {
            shared: Arc::new(Shared {
                parser,
                cache,
                pool: CandidatePool::new(),
                permits: Semaphore::new(workers),
                metadata_file: config.metadata_file.clone(),
                environment: config.environment,
            }),
            timeout: config.discovery_timeout(),
        }
    }

    /// Scan every root and its nested archives, then inject built-ins.
    ///
    /// Either every task finishes in time and the frozen candidate sets are
    /// returned, or one aggregated error is; partial results are never
    /// handed out.
    pub async fn discover(
        self,
        roots: Vec<PathBuf>,
        builtins: Vec<BuiltinPackage>,
    ) -> Result<IndexMap<String, CandidateSet>> {
        let start = Instant::now();

        for builtin in builtins {
            validate_id(&builtin.metadata.id)?;
            let description = builtin.metadata.pretty_string();
            let candidate = Candidate::new(builtin.metadata, builtin.origin, 0);
            match self.shared.pool.insert(candidate) {
                Some(_) => log::debug!("Adding builtin {}", description),
                None => log::debug!("Builtin {} already present", description),
            }
        }

        let shared = self.shared.clone();
        let tree = async move {
            let mut tasks = JoinSet::new();
            for root in roots {
                tasks.spawn(scan(root, 0, shared.clone()));
            }
            join_all(&mut tasks).await
        };

        match tokio::time::timeout(self.timeout, tree).await {
            Ok(result) => result?,
            Err(_) => {
                log::error!("Mod discovery timed out after {:?}", self.timeout);
                return Err(ResolverError::DiscoveryTimeout {
                    timeout: self.timeout,
                });
            }
        }

        let candidates = self.shared.pool.candidate_count();
        let sets = self.shared.pool.freeze();

        log::info!(
            "Discovered {} candidate(s) for {} mod id(s) in {:.2}s",
            candidates,
            sets.len(),
            start.elapsed().as_secs_f64()
        );

        Ok(sets)
    }
}

/// One discovery task: scan `path`, then wait for the tasks of its nested archives
fn scan(path: PathBuf, depth: u32, shared: Arc<Shared>) -> BoxFuture<'static, Result<()>> {
    async move {
        let nested = {
            let _permit = shared
                .permits
                .acquire()
                .await
                .map_err(|e| ResolverError::TaskFailed(e.to_string()))?;

            let worker = shared.clone();
            let source = path.clone();
            tokio::task::spawn_blocking(move || worker.scan_source(&source, depth))
                .await
                .map_err(|e| ResolverError::TaskFailed(format!("{}: {}", path.display(), e)))??
        };

        if nested.is_empty() {
            return Ok(());
        }

        let mut children = JoinSet::new();
        for child in nested {
            children.spawn(scan(child, depth + 1, shared.clone()));
        }
        join_all(&mut children).await
    }
    .boxed()
}

/// Wait for every task, merging failures into one error
async fn join_all(tasks: &mut JoinSet<Result<()>>) -> Result<()> {
    let mut errors = Vec::new();

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(Ok(())) => {}
            Ok(Err(e)) => errors.push(e),
            Err(e) => errors.push(ResolverError::TaskFailed(e.to_string())),
        }
    }

    match ResolverError::aggregate(errors) {
        Some(error) => Err(error),
        None => Ok(()),
    }
}

impl Shared {
    /// Blocking part of a task; returns the nested archives to scan next
    fn scan_source(&self, path: &Path, depth: u32) -> Result<Vec<PathBuf>> {
        let path = path.canonicalize().map_err(|e| ResolverError::io(path, e))?;
        let origin = Origin::from_path(&path);
        let mut root = SourceRoot::open(&path)?;

        let Some(bytes) = root.read_metadata(&self.metadata_file)? else {
            log::debug!("No {} in {}", self.metadata_file, origin);
            return Ok(Vec::new());
        };

        let parsed = self
            .parser
            .parse(&mut bytes.as_slice())
            .map_err(|e| ResolverError::Schema {
                origin: origin.to_string(),
                message: e.message,
            })?;

        let mut nested_entries: Vec<String> = Vec::new();
        for metadata in parsed {
            validate_id(&metadata.id)?;

            if !self.environment.allows(metadata.environment) {
                log::debug!(
                    "Skipping {} from {}: it is for the {} environment",
                    metadata,
                    origin,
                    metadata.environment
                );
                continue;
            }

            let description = metadata.pretty_string();
            match self.pool.insert(Candidate::new(metadata, origin.clone(), depth)) {
                Some(candidate) => {
                    log::debug!("Adding {} as {} (depth {})", origin, description, depth);
                    for entry in &candidate.metadata().nested {
                        if !nested_entries.contains(entry) {
                            nested_entries.push(entry.clone());
                        }
                    }
                }
                None => log::debug!("{} from {} is already present", description, origin),
            }
        }

        if nested_entries.is_empty() {
            return Ok(Vec::new());
        }

        let extracted = self
            .cache
            .get_or_extract(&origin, |dest| root.extract_nested(&nested_entries, dest))?;

        for nested in extracted.iter() {
            log::debug!("Found nested archive {} in {}", nested.display(), origin);
        }

        Ok(extracted.as_ref().clone())
    }
}
