mod common;

use std::io::Cursor;
use std::sync::Arc;

use common::test_config;
use common::test_session;
use common::write_manual;
use common::FakeCompletion;
use docrag::cli::run_interactive;
use docrag::rag::Mode;
use docrag::Result;

async fn run(input: &str, completion: Arc<FakeCompletion>) -> Result<(String, String)> {
    let dir = tempfile::tempdir()?;
    write_manual(dir.path());
    let config = test_config(dir.path());
    let mut session = test_session(&config, completion);
    session.ingest().await?;

    let mut out = Vec::new();
    run_interactive(&mut session, Cursor::new(input.to_string()), &mut out).await?;
    Ok((
        String::from_utf8(out).unwrap(),
        session.system_instruction().to_string(),
    ))
}

#[tokio::test]
async fn test_question_then_exit() -> Result<()> {
    let completion = Arc::new(FakeCompletion::default());
    let (out, _) = run("How often is the pump serviced?\nexit\nnever asked\n", completion.clone()).await?;

    assert!(out.contains("Enter question or command: "));
    assert!(out.contains("Response: Answer"));
    assert!(out.contains("Source Documents:"));
    assert!(out.contains("Source 1:"));
    assert!(out.contains("Total tokens:"));
    assert!(out.contains("Cost: $"));
    assert_eq!(completion.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn test_switch_selects_preset() -> Result<()> {
    let completion = Arc::new(FakeCompletion::default());
    let (out, instruction) = run("switch\n2\nwarranty?\nexit\n", completion.clone()).await?;

    assert!(out.contains("Available modes:"));
    assert!(out.contains("1. Technical"));
    assert!(out.contains("Select mode (1/2): "));
    assert_eq!(instruction, Mode::Summary.instruction());
    assert_eq!(
        completion.last_system_message().as_deref(),
        Some(Mode::Summary.instruction())
    );
    Ok(())
}

#[tokio::test]
async fn test_invalid_selection_keeps_instruction() -> Result<()> {
    let completion = Arc::new(FakeCompletion::default());
    let (out, instruction) = run("switch\n7\nexit\n", completion).await?;

    assert!(out.contains("Invalid selection '7'"));
    assert_eq!(instruction, docrag::rag::DEFAULT_INSTRUCTION);
    Ok(())
}

#[tokio::test]
async fn test_errors_printed_and_loop_continues() -> Result<()> {
    let completion = Arc::new(FakeCompletion::failing());
    let (out, _) = run("first\nsecond\n", completion.clone()).await?;

    assert_eq!(out.matches("Error: ").count(), 2);
    assert!(out.contains("429"));
    // End of input ends the loop
    assert_eq!(completion.call_count(), 2);
    Ok(())
}
