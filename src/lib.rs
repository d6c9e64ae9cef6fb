//! Conduit: an MCP client that lets an LLM call a server's tools.
//!
//! Launches a Model Context Protocol server as a child process, talks to it
//! over stdio, and either reports what it advertises or runs a chat loop in
//! which a chat-completions backend may call the server's tools.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! use conduit::prelude::*;
//!
//! # async fn example() -> conduit::error::Result<()> {
//! let launch = ServerLaunch::resolve(Path::new("server.py"), None)?;
//! let config = ConduitConfig::from_env();
//! let provider: Arc<dyn ModelProvider> = Arc::from(create_provider(&config)?);
//!
//! let mut session = MCPSession::open(&launch).await?;
//! let answer = ToolCallingOrchestrator::new(&mut session, provider)
//!     .with_settings(config.generation_settings())
//!     .process_query("echo hello")
//!     .await;
//! session.close().await?;
//! println!("{}", answer?);
//! # Ok(())
//! # }
//! ```

pub mod agent_loop;
pub mod chat;
pub mod config;
pub mod error;
pub mod mcp;
pub mod prelude;
pub mod provider;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
