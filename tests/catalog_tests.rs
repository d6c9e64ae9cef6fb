mod common;

use common::MockSession;
use conduit::mcp::{list_all, MemberDescriptor};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn failing_prompts_do_not_hide_other_sections() {
    let mut session = MockSession {
        resources: vec![MemberDescriptor::resource(
            "greeting_file",
            Some("A friendly greeting.".into()),
            "file://./greeting.txt",
        )],
        ..MockSession::with_echo()
    }
    .fail_listing("prompts/list", "Method not found");

    let report = list_all(&mut session).await;

    assert_eq!(
        report,
        "MCP Server Members\n\
         ==================================================\n\
         \n\
         TOOLS (1):\n\
         ------------------------------\n\
         \x20 > echo - Echo back the provided message.\n\
         \n\
         PROMPTS: Error - Remote error (prompts/list): Method not found\n\
         \n\
         RESOURCES (1):\n\
         ------------------------------\n\
         \x20 > greeting_file - A friendly greeting.\n\
         \n\
         ==================================================\n"
    );
}

#[tokio::test]
async fn empty_categories_are_reported_as_none_available() {
    let mut session = MockSession::default();

    let report = list_all(&mut session).await;

    assert!(report.contains("\nTOOLS: None available\n"));
    assert!(report.contains("\nPROMPTS: None available\n"));
    assert!(report.contains("\nRESOURCES: None available\n"));
    assert!(!report.contains("Error"));
}

#[tokio::test]
async fn every_category_failing_still_produces_a_report() {
    let mut session = MockSession::default()
        .fail_listing("tools/list", "boom")
        .fail_listing("prompts/list", "boom")
        .fail_listing("resources/list", "boom");

    let report = list_all(&mut session).await;

    assert_eq!(report.matches(": Error - ").count(), 3);
    assert!(report.starts_with("MCP Server Members\n"));
    assert!(report.ends_with(&format!("\n{}\n", "=".repeat(50))));
}

#[tokio::test]
async fn listing_never_invokes_tools() {
    let mut session = MockSession::with_echo();
    let _ = list_all(&mut session).await;
    assert!(session.calls.is_empty());
}
