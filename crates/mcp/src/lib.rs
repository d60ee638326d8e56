// MCP tool and resource layer over the primer core
// Exposes sandboxed file tools, calculator and restaurant tools, and URI-addressed resources

pub mod config;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use config::PrimerConfig;
pub use resources::{ResourceError, ResourceRouter};
pub use server::PrimerServer;
