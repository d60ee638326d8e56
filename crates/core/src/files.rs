//! Whole-file operations confined to an allowed root.

use crate::error::{FsError, FsResult};
use crate::path::{is_missing, AllowedRoot, PathPolicy, ResolvedPath, SafePathResolver};
use std::fs::FileType;
use std::io::Write;
use std::path::Path;
use walkdir::WalkDir;

/// Read, write, delete and list files beneath one root under one policy.
///
/// Concurrent writers to the same name race; the last rename wins.
#[derive(Debug, Clone)]
pub struct FileSandbox {
    resolver: SafePathResolver,
}

impl FileSandbox {
    pub fn new(root: AllowedRoot, policy: PathPolicy) -> Self {
        Self {
            resolver: SafePathResolver::new(root, policy),
        }
    }

    /// Sandbox for a single flat directory.
    pub fn flat(root: AllowedRoot) -> Self {
        Self::new(root, PathPolicy::FlatOnly)
    }

    /// Sandbox that allows nested relative paths.
    pub fn nested(root: AllowedRoot) -> Self {
        Self::new(root, PathPolicy::NoTraversal)
    }

    pub fn resolver(&self) -> &SafePathResolver {
        &self.resolver
    }

    pub fn root(&self) -> &AllowedRoot {
        self.resolver.root()
    }

    pub fn policy(&self) -> PathPolicy {
        self.resolver.policy()
    }

    pub fn resolve(&self, candidate: &str) -> FsResult<ResolvedPath> {
        self.resolver.resolve(candidate)
    }

    /// Contents of an existing regular file.
    pub fn read(&self, candidate: &str) -> FsResult<Vec<u8>> {
        let path = self.existing_file(candidate)?;
        std::fs::read(&path).map_err(|e| FsError::io(candidate, path.as_path(), e))
    }

    /// Like [`read`](Self::read), failing with an I/O error on invalid UTF-8.
    pub fn read_to_string(&self, candidate: &str) -> FsResult<String> {
        let path = self.existing_file(candidate)?;
        std::fs::read_to_string(&path).map_err(|e| FsError::io(candidate, path.as_path(), e))
    }

    /// Write `content`, replacing any existing file.
    ///
    /// The root (and, for nested names, the parent directories) are created on
    /// demand. Data goes to a temporary file in the target directory that is
    /// then renamed over the target.
    pub fn write(&self, candidate: &str, content: impl AsRef<[u8]>) -> FsResult<ResolvedPath> {
        let path = self.resolver.resolve(candidate)?;
        let root = self.root().path();

        std::fs::create_dir_all(root).map_err(|e| FsError::io(candidate, root, e))?;

        if path.as_path().is_dir() {
            return Err(FsError::NotAFile {
                candidate: candidate.to_string(),
            });
        }

        let parent = path.as_path().parent().ok_or_else(|| FsError::NotAFile {
            candidate: candidate.to_string(),
        })?;
        std::fs::create_dir_all(parent).map_err(|e| FsError::io(candidate, parent, e))?;

        let mut staged = tempfile::NamedTempFile::new_in(parent)
            .map_err(|e| FsError::io(candidate, parent, e))?;
        staged
            .write_all(content.as_ref())
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|e| FsError::io(candidate, staged.path(), e))?;
        staged
            .persist(path.as_path())
            .map_err(|e| FsError::io(candidate, path.as_path(), e.error))?;

        tracing::info!(
            candidate,
            path = %path,
            bytes = content.as_ref().len(),
            "File written"
        );
        Ok(path)
    }

    /// Remove an existing regular file.
    pub fn delete(&self, candidate: &str) -> FsResult<()> {
        let path = self.existing_file(candidate)?;
        std::fs::remove_file(&path).map_err(|e| FsError::io(candidate, path.as_path(), e))?;
        tracing::info!(candidate, path = %path, "File deleted");
        Ok(())
    }

    /// Sorted relative paths of the files under the root.
    ///
    /// Flat sandboxes list only the root itself; nested ones walk the whole
    /// tree and join components with `/`. A symlink is listed when it resolves
    /// to a regular file inside the root, so every listed name is readable.
    /// Symlinked directories are not descended into. A missing root lists as
    /// empty.
    pub fn list(&self) -> FsResult<Vec<String>> {
        let root = self.root().path();
        if !root.is_dir() {
            return Ok(Vec::new());
        }

        let mut files = if self.policy().is_recursive() {
            self.list_recursive(root)?
        } else {
            self.list_flat(root)?
        };
        files.sort();
        Ok(files)
    }

    fn existing_file(&self, candidate: &str) -> FsResult<ResolvedPath> {
        let path = self.resolver.resolve(candidate)?;
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => Ok(path),
            Ok(_) => Err(FsError::NotAFile {
                candidate: candidate.to_string(),
            }),
            Err(e) if is_missing(&e) => Err(FsError::NotFound {
                candidate: candidate.to_string(),
            }),
            Err(e) => Err(FsError::io(candidate, path.as_path(), e)),
        }
    }

    fn list_flat(&self, root: &Path) -> FsResult<Vec<String>> {
        let entries = std::fs::read_dir(root).map_err(|e| FsError::io("", root, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| FsError::io("", root, e))?;
            let file_type = entry.file_type().map_err(|e| FsError::io("", entry.path(), e))?;
            let name = entry.file_name().to_string_lossy().into_owned();
            if self.is_listable(file_type, &name) {
                files.push(name);
            }
        }
        Ok(files)
    }

    fn list_recursive(&self, root: &Path) -> FsResult<Vec<String>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(root).min_depth(1) {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                FsError::io("", path, e.into())
            })?;
            let Ok(relative) = entry.path().strip_prefix(root) else {
                continue;
            };
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if self.is_listable(entry.file_type(), &name) {
                files.push(name);
            }
        }
        Ok(files)
    }

    /// Regular files always; symlinks only when they land on a regular file
    /// the resolver would hand out.
    fn is_listable(&self, file_type: FileType, name: &str) -> bool {
        if file_type.is_file() {
            return true;
        }
        file_type.is_symlink()
            && self
                .resolver
                .try_resolve(name)
                .is_ok_and(|path| path.as_path().is_file())
    }
}
