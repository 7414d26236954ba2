use std::path::{Path, PathBuf};

use async_trait::async_trait;
use walkdir::WalkDir;

use crate::context::ResolutionContext;
use crate::error::{ResolverError, Result};

/// Supplies root source paths for discovery
#[async_trait]
pub trait CandidateFinder: Send + Sync {
    /// Report every root source through `emit`
    async fn find_candidates(
        &self,
        context: &ResolutionContext,
        emit: &mut (dyn FnMut(PathBuf) + Send),
    ) -> Result<()>;
}

/// Emits a fixed list of paths
#[derive(Debug, Clone, Default)]
pub struct PathCandidateFinder {
    paths: Vec<PathBuf>,
}

impl PathCandidateFinder {
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl CandidateFinder for PathCandidateFinder {
    async fn find_candidates(
        &self,
        _context: &ResolutionContext,
        emit: &mut (dyn FnMut(PathBuf) + Send),
    ) -> Result<()> {
        for path in &self.paths {
            emit(path.clone());
        }
        Ok(())
    }
}

/// Emits every archive and mod directory directly inside a mods directory
#[derive(Debug, Clone)]
pub struct DirectoryCandidateFinder {
    dir: PathBuf,
}

impl DirectoryCandidateFinder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

fn is_archive(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("jar") || ext.eq_ignore_ascii_case("zip"))
        .unwrap_or(false)
}

#[async_trait]
impl CandidateFinder for DirectoryCandidateFinder {
    async fn find_candidates(
        &self,
        context: &ResolutionContext,
        emit: &mut (dyn FnMut(PathBuf) + Send),
    ) -> Result<()> {
        if !self.dir.exists() {
            log::debug!("Mods directory {} does not exist", self.dir.display());
            return Ok(());
        }
        if !self.dir.is_dir() {
            return Err(ResolverError::io(
                &self.dir,
                std::io::Error::new(std::io::ErrorKind::InvalidInput, "not a directory"),
            ));
        }

        let metadata_file = &context.config().metadata_file;
        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| ResolverError::io(&self.dir, e.into()))?;
            let path = entry.path();

            if entry.file_type().is_file() && is_archive(path) {
                emit(path.to_path_buf());
            } else if entry.file_type().is_dir() && path.join(metadata_file).is_file() {
                emit(path.to_path_buf());
            } else {
                log::trace!("Skipping {}", path.display());
            }
        }

        Ok(())
    }
}
