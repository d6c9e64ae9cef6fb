//! Resolve how a server script is started.

use std::path::{Path, PathBuf};

use crate::error::ConduitError;

/// Command line used to spawn an MCP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLaunch {
    script: PathBuf,
    command: String,
    args: Vec<String>,
}

impl ServerLaunch {
    /// Resolve a launch for `script`.
    ///
    /// An explicit interpreter wins; otherwise `.py` runs under `python3` and
    /// `.js`/`.mjs`/`.cjs` under `node`. Anything else is executed directly.
    pub fn resolve(script: &Path, interpreter: Option<&str>) -> Result<Self, ConduitError> {
        if !script.exists() {
            return Err(ConduitError::Configuration(format!(
                "Server script '{}' not found",
                script.display()
            )));
        }

        let script_arg = script.to_string_lossy().into_owned();
        let interpreter = interpreter
            .map(str::to_string)
            .or_else(|| default_interpreter(script).map(str::to_string));

        let (command, args) = match interpreter {
            Some(interpreter) => (interpreter, vec![script_arg]),
            None => (script_arg, Vec::new()),
        };

        Ok(Self {
            script: script.to_path_buf(),
            command,
            args,
        })
    }

    pub fn script(&self) -> &Path {
        &self.script
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

fn default_interpreter(script: &Path) -> Option<&'static str> {
    match script.extension()?.to_str()? {
        "py" => Some("python3"),
        "js" | "mjs" | "cjs" => Some("node"),
        _ => None,
    }
}
