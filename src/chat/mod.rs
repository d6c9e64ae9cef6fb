//! Read-eval-print loop over a [`QueryHandler`].

use std::future::Future;
use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::error::ConduitError;

const EXIT_KEYWORD: &str = "quit";
const PROMPT: &str = "You: ";

/// Answers one user query. Non-fatal errors are shown inline and the loop
/// keeps going.
#[async_trait]
pub trait QueryHandler: Send {
    async fn handle_query(&mut self, query: &str) -> Result<String, ConduitError>;
}

/// Why the loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatExit {
    Quit,
    EndOfInput,
    Interrupted,
}

pub struct ChatLoop<H> {
    handler: H,
}

impl<H: QueryHandler> ChatLoop<H> {
    pub fn new(handler: H) -> Self {
        Self { handler }
    }

    pub fn into_inner(self) -> H {
        self.handler
    }

    /// Drive the loop until the exit keyword, end of input, or `interrupt`.
    ///
    /// Backend and remote errors are printed and the loop continues; a fatal
    /// error (the server connection is gone) ends the loop and is returned.
    ///
    /// `interrupt` is only raced against the pending read; a query already
    /// handed to the handler runs to completion.
    pub async fn run_with<R, W, I>(
        &mut self,
        input: R,
        output: &mut W,
        interrupt: I,
    ) -> Result<ChatExit, ConduitError>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        I: Future<Output = ()>,
    {
        let mut lines = input.lines();
        tokio::pin!(interrupt);

        writeln!(output, "\nMCP Chat Started!")?;
        writeln!(output, "Type your questions or '{EXIT_KEYWORD}' to exit.\n")?;

        let exit = loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            let line = tokio::select! {
                line = lines.next_line() => line?,
                () = &mut interrupt => {
                    writeln!(output, "\n")?;
                    break ChatExit::Interrupted;
                }
            };

            let Some(line) = line else {
                writeln!(output)?;
                break ChatExit::EndOfInput;
            };

            let query = line.trim();
            if query.is_empty() {
                continue;
            }
            if query.eq_ignore_ascii_case(EXIT_KEYWORD) {
                break ChatExit::Quit;
            }

            debug!(query, "handling query");
            match self.handler.handle_query(query).await {
                Ok(answer) => writeln!(output, "\n{answer}\n")?,
                Err(error) if error.is_fatal() => {
                    warn!(%error, category = %error.category(), "session lost; ending chat");
                    writeln!(output, "\nGoodbye!")?;
                    output.flush()?;
                    return Err(error);
                }
                Err(error) => {
                    warn!(%error, category = %error.category(), "query failed");
                    writeln!(output, "\nError: {error}\n")?;
                }
            }
        };

        writeln!(output, "Goodbye!")?;
        output.flush()?;
        Ok(exit)
    }
}

/// Run the loop on the process's stdin/stdout, stopping on Ctrl+C.
pub async fn run_chat<H: QueryHandler>(handler: H) -> Result<ChatExit, ConduitError> {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    let interrupt = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "could not listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };
    ChatLoop::new(handler)
        .run_with(stdin, &mut stdout, interrupt)
        .await
}
