// Sandboxed file access and keyed resource tables for the primer MCP servers

pub mod catalog;
pub mod error;
pub mod files;
pub mod lookup;
pub mod path;
pub mod types;

pub use error::{FsError, FsResult, LoadError, LookupError};
pub use files::FileSandbox;
pub use lookup::{Keyed, ResourceTable};
pub use path::{AllowedRoot, PathPolicy, ResolvedPath, SafePathResolver};
pub use types::*;
