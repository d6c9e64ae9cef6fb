//! Command-line surface for the `conduit` binary.

use std::path::PathBuf;

use clap::{Args, Parser};

/// Connect to an MCP server over stdio and list its members or chat with it.
#[derive(Parser, Debug)]
#[command(name = "conduit", version, about = "MCP client with LLM tool calling")]
pub struct Cli {
    /// Path to the server script or executable
    pub server_path: PathBuf,

    #[command(flatten)]
    pub mode: ModeArgs,

    /// Command used to run the server script (defaults by file extension)
    #[arg(long, value_name = "CMD")]
    pub interpreter: Option<String>,
}

/// Exactly one run mode must be chosen.
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct ModeArgs {
    /// List the server's tools, prompts, and resources
    #[arg(long)]
    pub members: bool,

    /// Start an interactive chat that can call the server's tools
    #[arg(long)]
    pub chat: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Members,
    Chat,
}

impl Cli {
    pub fn mode(&self) -> Mode {
        if self.mode.chat {
            Mode::Chat
        } else {
            Mode::Members
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn parse_members_mode() {
        let cli = Cli::try_parse_from(["conduit", "server.py", "--members"]).unwrap();
        assert_eq!(cli.server_path, PathBuf::from("server.py"));
        assert_eq!(cli.mode(), Mode::Members);
        assert!(cli.interpreter.is_none());
    }

    #[test]
    fn parse_chat_mode_with_interpreter() {
        let cli = Cli::try_parse_from([
            "conduit",
            "--chat",
            "./server.py",
            "--interpreter",
            "python3.12",
        ])
        .unwrap();
        assert_eq!(cli.mode(), Mode::Chat);
        assert_eq!(cli.interpreter.as_deref(), Some("python3.12"));
    }

    #[test]
    fn parse_missing_mode_is_error() {
        let err = Cli::try_parse_from(["conduit", "server.py"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn parse_both_modes_is_error() {
        let err = Cli::try_parse_from(["conduit", "server.py", "--members", "--chat"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn parse_missing_server_path_is_error() {
        assert!(Cli::try_parse_from(["conduit", "--members"]).is_err());
    }
}
