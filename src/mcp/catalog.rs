//! Human-readable report of everything a server advertises.

use std::fmt::Write;

use strum::{Display, EnumIter, IntoEnumIterator};
use tracing::warn;

use crate::error::ConduitError;

use super::ops::MCPSessionOps;
use super::schema::MemberDescriptor;

const HEADING: &str = "MCP Server Members";
const PLACEHOLDER_DESCRIPTION: &str = "No description";
const RULE_WIDTH: usize = 50;
const SECTION_RULE_WIDTH: usize = 30;

/// The listing categories, in report order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
#[strum(serialize_all = "UPPERCASE")]
pub enum MemberCategory {
    Tools,
    Prompts,
    Resources,
}

impl MemberCategory {
    /// Run this category's listing operation.
    pub async fn fetch<S>(self, session: &mut S) -> Result<Vec<MemberDescriptor>, ConduitError>
    where
        S: MCPSessionOps + ?Sized,
    {
        match self {
            Self::Tools => session.list_tools().await,
            Self::Prompts => session.list_prompts().await,
            Self::Resources => session.list_resources().await,
        }
    }

    fn render(
        self,
        out: &mut String,
        listing: &Result<Vec<MemberDescriptor>, ConduitError>,
    ) -> std::fmt::Result {
        match listing {
            Ok(members) if members.is_empty() => writeln!(out, "\n{self}: None available"),
            Ok(members) => {
                writeln!(out, "\n{self} ({}):", members.len())?;
                writeln!(out, "{}", "-".repeat(SECTION_RULE_WIDTH))?;
                for member in members {
                    let description = member
                        .description
                        .as_deref()
                        .unwrap_or(PLACEHOLDER_DESCRIPTION);
                    writeln!(out, "  > {} - {description}", member.name)?;
                }
                Ok(())
            }
            Err(error) => writeln!(out, "\n{self}: Error - {error}"),
        }
    }
}

/// Query tools, prompts, and resources and render one report.
///
/// Each category is fetched and rendered on its own; a failure in one
/// becomes an error line and the remaining categories are still listed.
pub async fn list_all<S>(session: &mut S) -> String
where
    S: MCPSessionOps + ?Sized,
{
    let mut report = String::new();
    let _ = writeln!(report, "{HEADING}");
    let _ = writeln!(report, "{}", "=".repeat(RULE_WIDTH));

    for category in MemberCategory::iter() {
        let listing = category.fetch(session).await;
        if let Err(ref error) = listing {
            warn!(%category, %error, "listing failed");
        }
        let _ = category.render(&mut report, &listing);
    }

    let _ = writeln!(report, "\n{}", "=".repeat(RULE_WIDTH));
    report
}
