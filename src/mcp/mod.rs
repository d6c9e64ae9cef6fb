//! Model Context Protocol (MCP) client: stdio sessions and member listing.

pub mod catalog;
pub mod launch;
pub mod ops;
pub mod schema;
pub mod session;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;

pub use catalog::{list_all, MemberCategory};
pub use launch::ServerLaunch;
pub use ops::{MCPSessionOps, ToolOutcome};
pub use schema::{MemberDescriptor, MemberKind};
pub use session::{MCPSession, ServerIdentity};
pub use transport::{MCPTransport, StdioTransport};
