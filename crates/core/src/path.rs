//! Validation of untrusted file names against an allowed root directory.
//!
//! Two policies are supported:
//!
//! - [`PathPolicy::FlatOnly`]: a single flat directory. Separators and
//!   leading dots are refused outright.
//! - [`PathPolicy::NoTraversal`]: nested paths are allowed, `..` is not.
//!
//! Under both policies the joined path is canonicalized and must stay
//! within the canonical root, so symlinks cannot be used to escape.

use crate::error::{FsError, FsResult};
use std::ffi::OsStr;
use std::fmt;
use std::io;
use std::path::{Component, Path, PathBuf};

/// Which shapes of candidate name a call site accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PathPolicy {
    /// Plain file names directly under the root.
    FlatOnly,
    /// Relative paths of any depth, without `..`.
    NoTraversal,
}

impl PathPolicy {
    /// Checks the candidate's shape without touching the filesystem.
    pub fn check(self, candidate: &str) -> FsResult<()> {
        if candidate.trim().is_empty() {
            return Err(FsError::EmptyName {
                candidate: candidate.to_string(),
            });
        }

        // Checked before the separator rule so `/etc/passwd` reports as absolute
        // under both policies.
        if looks_absolute(candidate) {
            return Err(FsError::AbsolutePathRejected {
                candidate: candidate.to_string(),
            });
        }

        match self {
            PathPolicy::FlatOnly => {
                if candidate.contains(['/', '\\']) || candidate.starts_with('.') {
                    return Err(FsError::InvalidName {
                        candidate: candidate.to_string(),
                    });
                }
            }
            PathPolicy::NoTraversal => {
                if candidate.contains("..") {
                    return Err(FsError::TraversalRejected {
                        candidate: candidate.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Whether `list` should descend into subdirectories.
    pub fn is_recursive(self) -> bool {
        matches!(self, PathPolicy::NoTraversal)
    }
}

impl fmt::Display for PathPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPolicy::FlatOnly => write!(f, "flat_only"),
            PathPolicy::NoTraversal => write!(f, "no_traversal"),
        }
    }
}

/// Absolute under the host's rules, or shaped like a Unix, UNC or drive path.
///
/// A drive letter only counts when a separator follows it: `C:\x` and `C:/x`
/// are absolute, `c:notes.txt` is an ordinary name.
fn looks_absolute(candidate: &str) -> bool {
    if Path::new(candidate).is_absolute() || candidate.starts_with(['/', '\\']) {
        return true;
    }
    matches!(
        candidate.as_bytes(),
        [drive, b':', b'/' | b'\\', ..] if drive.is_ascii_alphabetic()
    )
}

/// The directory a sandbox may not leave.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowedRoot {
    path: PathBuf,
}

impl AllowedRoot {
    /// Relative paths are made absolute against the current directory.
    /// The directory does not have to exist yet.
    pub fn new(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = std::path::absolute(path.as_ref())?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Canonical form of the root, tolerating a root that is not created yet.
    pub fn canonical(&self) -> io::Result<PathBuf> {
        canonicalize_lenient(&self.path)
    }
}

impl AsRef<Path> for AllowedRoot {
    fn as_ref(&self) -> &Path {
        &self.path
    }
}

/// A canonical path proven to lie within an [`AllowedRoot`].
///
/// Only [`SafePathResolver::resolve`] constructs these.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPath(PathBuf);

impl ResolvedPath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}

impl AsRef<Path> for ResolvedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl fmt::Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Turns candidate names into paths that are safe to open.
#[derive(Debug, Clone)]
pub struct SafePathResolver {
    root: AllowedRoot,
    policy: PathPolicy,
}

impl SafePathResolver {
    pub fn new(root: AllowedRoot, policy: PathPolicy) -> Self {
        Self { root, policy }
    }

    pub fn root(&self) -> &AllowedRoot {
        &self.root
    }

    pub fn policy(&self) -> PathPolicy {
        self.policy
    }

    /// Validate `candidate` and resolve it beneath the root.
    ///
    /// The target itself need not exist. Every rejection is logged, at
    /// `warn` level when it looks like an escape attempt.
    pub fn resolve(&self, candidate: &str) -> FsResult<ResolvedPath> {
        self.try_resolve(candidate).inspect_err(|e| log_rejection(self.policy, e))
    }

    /// [`resolve`](Self::resolve) without the rejection log.
    pub(crate) fn try_resolve(&self, candidate: &str) -> FsResult<ResolvedPath> {
        self.policy.check(candidate)?;

        let root = self
            .root
            .canonical()
            .map_err(|e| FsError::io(candidate, self.root.path(), e))?;

        let mut joined = root.clone();
        for component in Path::new(candidate).components() {
            match component {
                Component::Normal(part) => joined.push(part),
                Component::CurDir => {}
                // Ruled out by the policy check; refuse rather than guess.
                Component::ParentDir => {
                    return Err(FsError::TraversalRejected {
                        candidate: candidate.to_string(),
                    })
                }
                Component::RootDir | Component::Prefix(_) => {
                    return Err(FsError::AbsolutePathRejected {
                        candidate: candidate.to_string(),
                    })
                }
            }
        }

        let canonical =
            canonicalize_lenient(&joined).map_err(|e| FsError::io(candidate, &joined, e))?;

        if !canonical.starts_with(&root) {
            return Err(FsError::OutsideRoot {
                candidate: candidate.to_string(),
            });
        }

        Ok(ResolvedPath(canonical))
    }
}

fn log_rejection(policy: PathPolicy, err: &FsError) {
    if err.is_suspicious() {
        tracing::warn!(
            candidate = err.candidate(),
            kind = err.kind(),
            %policy,
            "Rejected path that may be an escape attempt"
        );
    } else {
        tracing::debug!(
            candidate = err.candidate(),
            kind = err.kind(),
            %policy,
            "Rejected path"
        );
    }
}

/// Canonicalize the longest existing prefix of `path` and re-append the rest.
///
/// Matches `canonicalize` for existing paths while still giving a stable
/// answer for files that are about to be created.
fn canonicalize_lenient(path: &Path) -> io::Result<PathBuf> {
    let mut existing = path;
    let mut missing: Vec<&OsStr> = Vec::new();

    loop {
        match existing.canonicalize() {
            Ok(mut base) => {
                for part in missing.iter().rev() {
                    base.push(part);
                }
                return Ok(base);
            }
            Err(e) if is_missing(&e) => {
                match (existing.parent(), existing.file_name()) {
                    (Some(parent), Some(name)) => {
                        missing.push(name);
                        existing = parent;
                    }
                    _ => return Err(e),
                }
            }
            Err(e) => return Err(e),
        }
    }
}

/// True for errors meaning "nothing is there", including a path that
/// continues through a regular file.
pub(crate) fn is_missing(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn resolver(dir: &TempDir, policy: PathPolicy) -> SafePathResolver {
        SafePathResolver::new(AllowedRoot::new(dir.path()).unwrap(), policy)
    }

    #[test]
    fn test_resolves_plain_name_under_root() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver(&dir, PathPolicy::FlatOnly);

        let resolved = resolver.resolve("example.txt").unwrap();
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(resolved.as_path(), root.join("example.txt"));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("notes.md"), "hi").unwrap();

        for policy in [PathPolicy::FlatOnly, PathPolicy::NoTraversal] {
            let resolver = resolver(&dir, policy);
            let first = resolver.resolve("notes.md").unwrap();
            let second = resolver.resolve("notes.md").unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_empty_and_blank_names() {
        let dir = TempDir::new().unwrap();
        for policy in [PathPolicy::FlatOnly, PathPolicy::NoTraversal] {
            let resolver = resolver(&dir, policy);
            for candidate in ["", "   ", "\t\n"] {
                let err = resolver.resolve(candidate).unwrap_err();
                assert!(matches!(err, FsError::EmptyName { .. }), "{candidate:?}: {err}");
            }
        }
    }

    #[test]
    fn test_flat_policy_rejects_separators_and_dots() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver(&dir, PathPolicy::FlatOnly);

        for candidate in ["sub/file.txt", "sub\\file.txt", ".hidden", "..", ".env", "./a"] {
            let err = resolver.resolve(candidate).unwrap_err();
            assert!(matches!(err, FsError::InvalidName { .. }), "{candidate}: {err}");
            assert_eq!(err.candidate(), candidate);
            assert!(err.is_rejection() && !err.is_suspicious());
        }
    }

    #[test]
    fn test_flat_policy_allows_inner_double_dot() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver(&dir, PathPolicy::FlatOnly);
        assert!(resolver.resolve("archive..txt").is_ok());
    }

    #[test]
    fn test_absolute_paths_rejected_under_both_policies() {
        let dir = TempDir::new().unwrap();
        for policy in [PathPolicy::FlatOnly, PathPolicy::NoTraversal] {
            let resolver = resolver(&dir, policy);
            for candidate in ["/etc/passwd", "C:\\secrets", "c:/windows", "\\\\server\\share"] {
                let err = resolver.resolve(candidate).unwrap_err();
                assert!(
                    matches!(err, FsError::AbsolutePathRejected { .. }),
                    "{policy} {candidate}: {err}"
                );
            }
        }
    }

    #[cfg(unix)]
    #[test]
    fn test_drive_letter_without_separator_is_a_name() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        for policy in [PathPolicy::FlatOnly, PathPolicy::NoTraversal] {
            let resolved = resolver(&dir, policy).resolve("c:notes.txt").unwrap();
            assert_eq!(resolved.as_path(), root.join("c:notes.txt"));
        }
    }

    #[test]
    fn test_absolute_check_precedes_filesystem_access() {
        // Root that cannot be canonicalized; the shape check must still win.
        let root = AllowedRoot::new("/definitely/not/a/real/root/for/tests").unwrap();
        let resolver = SafePathResolver::new(root, PathPolicy::NoTraversal);
        let err = resolver.resolve("/etc/passwd").unwrap_err();
        assert!(matches!(err, FsError::AbsolutePathRejected { .. }));
    }

    #[test]
    fn test_no_traversal_policy_rejects_double_dot_anywhere() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver(&dir, PathPolicy::NoTraversal);

        for candidate in ["../secret.txt", "subdir/../../etc/passwd", "a/../b", "a..b", ".."] {
            let err = resolver.resolve(candidate).unwrap_err();
            assert!(matches!(err, FsError::TraversalRejected { .. }), "{candidate}: {err}");
            assert!(err.is_suspicious());
        }
    }

    #[test]
    fn test_no_traversal_policy_allows_nested_and_dotfiles() {
        let dir = TempDir::new().unwrap();
        let resolver = resolver(&dir, PathPolicy::NoTraversal);
        let root = dir.path().canonicalize().unwrap();

        let nested = resolver.resolve("reports/2024/summary.md").unwrap();
        assert_eq!(nested.as_path(), root.join("reports/2024/summary.md"));

        let dotted = resolver.resolve(".config").unwrap();
        assert_eq!(dotted.as_path(), root.join(".config"));

        let current = resolver.resolve("./a.txt").unwrap();
        assert_eq!(current.as_path(), root.join("a.txt"));
    }

    #[test]
    fn test_root_need_not_exist() {
        let dir = TempDir::new().unwrap();
        let root = AllowedRoot::new(dir.path().join("later")).unwrap();
        assert!(!root.exists());

        let resolver = SafePathResolver::new(root, PathPolicy::FlatOnly);
        let resolved = resolver.resolve("file.txt").unwrap();
        let expected = dir.path().canonicalize().unwrap().join("later/file.txt");
        assert_eq!(resolved.as_path(), expected);
    }

    #[test]
    fn test_path_through_regular_file_resolves_as_missing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("example.txt"), "x").unwrap();

        let resolver = resolver(&dir, PathPolicy::NoTraversal);
        let resolved = resolver.resolve("example.txt/missing.md").unwrap();
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(resolved.as_path(), root.join("example.txt/missing.md"));
    }

    #[test]
    fn test_relative_root_becomes_absolute() {
        let root = AllowedRoot::new("data").unwrap();
        assert!(root.path().is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_escape_is_outside_root() {
        let outside = TempDir::new().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "top secret").unwrap();

        let dir = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), dir.path().join("link.txt"))
            .unwrap();
        std::os::unix::fs::symlink(outside.path(), dir.path().join("escape")).unwrap();

        let flat = resolver(&dir, PathPolicy::FlatOnly);
        let err = flat.resolve("link.txt").unwrap_err();
        assert!(matches!(err, FsError::OutsideRoot { .. }), "{err}");

        let nested = resolver(&dir, PathPolicy::NoTraversal);
        let err = nested.resolve("escape/secret.txt").unwrap_err();
        assert!(matches!(err, FsError::OutsideRoot { .. }), "{err}");
        assert!(err.is_suspicious());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_inside_root_is_followed() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("real")).unwrap();
        std::fs::write(dir.path().join("real/a.txt"), "a").unwrap();
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("alias")).unwrap();

        let resolver = resolver(&dir, PathPolicy::NoTraversal);
        let resolved = resolver.resolve("alias/a.txt").unwrap();
        let root = dir.path().canonicalize().unwrap();
        assert_eq!(resolved.as_path(), root.join("real/a.txt"));
    }
}
