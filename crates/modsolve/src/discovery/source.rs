use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use zip::result::ZipError;
use zip::ZipArchive;

use crate::error::{ResolverError, Result};

/// Upper bound on the preallocation taken from an entry's declared size
const METADATA_SIZE_HINT: u64 = 64 * 1024;

/// An opened root being scanned: a directory or a zip/jar archive.
///
/// The archive handle lives as long as this value; discovery drops it as
/// soon as metadata and nested entries have been read.
pub enum SourceRoot {
    Directory(PathBuf),
    Archive {
        path: PathBuf,
        archive: ZipArchive<BufReader<File>>,
    },
}

impl SourceRoot {
    pub fn open(path: &Path) -> Result<Self> {
        if path.is_dir() {
            return Ok(SourceRoot::Directory(path.to_path_buf()));
        }

        let file = File::open(path).map_err(|e| ResolverError::io(path, e))?;
        let archive =
            ZipArchive::new(BufReader::new(file)).map_err(|e| ResolverError::archive(path, e))?;

        Ok(SourceRoot::Archive {
            path: path.to_path_buf(),
            archive,
        })
    }

    pub fn path(&self) -> &Path {
        match self {
            SourceRoot::Directory(path) => path,
            SourceRoot::Archive { path, .. } => path,
        }
    }

    /// Read a file at the root; `None` when it does not exist
    pub fn read_metadata(&mut self, file_name: &str) -> Result<Option<Vec<u8>>> {
        match self {
            SourceRoot::Directory(dir) => {
                let path = dir.join(file_name);
                match fs::read(&path) {
                    Ok(bytes) => Ok(Some(bytes)),
                    Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
                    Err(e) => Err(ResolverError::io(path, e)),
                }
            }
            SourceRoot::Archive { path, archive } => {
                let mut entry = match archive.by_name(file_name) {
                    Ok(entry) => entry,
                    Err(ZipError::FileNotFound) => return Ok(None),
                    Err(e) => return Err(ResolverError::archive(path.as_path(), e)),
                };
                let mut bytes = Vec::with_capacity(entry.size().min(METADATA_SIZE_HINT) as usize);
                entry
                    .read_to_end(&mut bytes)
                    .map_err(|e| ResolverError::io(path.as_path(), e))?;
                Ok(Some(bytes))
            }
        }
    }

    /// Copy nested archive entries into `dest`, returning the new files.
    ///
    /// Entries that do not exist or point outside the root are skipped with
    /// a warning.
    pub fn extract_nested(&mut self, entries: &[String], dest: &Path) -> Result<Vec<PathBuf>> {
        let mut extracted = Vec::with_capacity(entries.len());

        for entry in entries {
            let Some(relative) = normalize_entry(entry) else {
                log::warn!(
                    "Ignoring nested archive \"{}\" of {}: path escapes the mod root",
                    entry,
                    self.path().display()
                );
                continue;
            };

            let mut target = tempfile::Builder::new()
                .prefix("nested-")
                .suffix(&extension_suffix(&relative))
                .tempfile_in(dest)
                .map_err(|e| ResolverError::io(dest, e))?;

            let copied = match self {
                SourceRoot::Directory(dir) => {
                    let source = dir.join(&relative);
                    if source.is_file() {
                        let mut file = File::open(&source).map_err(|e| ResolverError::io(&source, e))?;
                        io::copy(&mut file, &mut target).map_err(|e| ResolverError::io(&source, e))?;
                        true
                    } else {
                        false
                    }
                }
                SourceRoot::Archive { path, archive } => match archive.by_name(&relative) {
                    Ok(mut file) => {
                        io::copy(&mut file, &mut target)
                            .map_err(|e| ResolverError::io(path.as_path(), e))?;
                        true
                    }
                    Err(ZipError::FileNotFound) => false,
                    Err(e) => return Err(ResolverError::archive(path.as_path(), e)),
                },
            };

            if !copied {
                log::warn!(
                    "Nested archive \"{}\" declared in {} does not exist",
                    entry,
                    self.path().display()
                );
                continue;
            }

            let (_, path) = target.keep().map_err(|e| ResolverError::io(dest, e.error))?;
            extracted.push(path);
        }

        Ok(extracted)
    }
}

/// Normalize an entry path relative to a root, rejecting `..` components
fn normalize_entry(entry: &str) -> Option<String> {
    let mut parts = Vec::new();
    for part in entry.split(|c: char| c == '/' || c == '\\') {
        match part {
            "" | "." => continue,
            ".." => return None,
            other => parts.push(other),
        }
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

fn extension_suffix(entry: &str) -> String {
    Path::new(entry)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_else(|| ".jar".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, files: &[(&str, &[u8])]) {
        let mut writer = ZipWriter::new(File::create(path).unwrap());
        for (name, content) in files {
            writer.start_file(*name, SimpleFileOptions::default()).unwrap();
            writer.write_all(content).unwrap();
        }
        writer.finish().unwrap();
    }

    #[test]
    fn test_normalize_entry() {
        assert_eq!(normalize_entry("jars/a.jar").as_deref(), Some("jars/a.jar"));
        assert_eq!(normalize_entry("/./jars//a.jar").as_deref(), Some("jars/a.jar"));
        assert_eq!(normalize_entry("jars\\a.jar").as_deref(), Some("jars/a.jar"));
        assert_eq!(normalize_entry("../a.jar"), None);
        assert_eq!(normalize_entry(""), None);
    }

    #[test]
    fn test_directory_metadata() {
        let dir = TempDir::new().unwrap();
        let mut root = SourceRoot::open(dir.path()).unwrap();
        assert!(root.read_metadata("mod.json").unwrap().is_none());

        fs::write(dir.path().join("mod.json"), "{}").unwrap();
        assert_eq!(root.read_metadata("mod.json").unwrap().unwrap(), b"{}");
    }

    #[test]
    fn test_archive_metadata_and_nested() {
        let dir = TempDir::new().unwrap();
        let jar = dir.path().join("outer.jar");
        write_zip(&jar, &[("mod.json", b"{}"), ("jars/inner.jar", b"inner")]);

        let mut root = SourceRoot::open(&jar).unwrap();
        assert_eq!(root.read_metadata("mod.json").unwrap().unwrap(), b"{}");

        let dest = TempDir::new().unwrap();
        let entries = vec![
            "jars/inner.jar".to_string(),
            "jars/missing.jar".to_string(),
            "../escape.jar".to_string(),
        ];
        let extracted = root.extract_nested(&entries, dest.path()).unwrap();
        assert_eq!(extracted.len(), 1);
        assert_eq!(fs::read(&extracted[0]).unwrap(), b"inner");
        assert!(extracted[0].starts_with(dest.path()));
    }

    #[test]
    fn test_metadata_larger_than_size_hint() {
        let dir = TempDir::new().unwrap();
        let jar = dir.path().join("large.jar");
        let padding = " ".repeat(METADATA_SIZE_HINT as usize * 2);
        let content = format!("{{{}}}", padding);
        write_zip(&jar, &[("mod.json", content.as_bytes())]);

        let mut root = SourceRoot::open(&jar).unwrap();
        let bytes = root.read_metadata("mod.json").unwrap().unwrap();
        assert_eq!(bytes.len(), content.len());
    }

    #[test]
    fn test_not_an_archive() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.jar");
        fs::write(&path, "definitely not a zip").unwrap();

        let err = SourceRoot::open(&path).err().unwrap();
        assert!(matches!(err, ResolverError::Archive { .. }));
    }
}
