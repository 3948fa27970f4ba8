//! Ask command handler - interactive question loop

use std::io;
use std::io::BufRead;
use std::io::Write;

use crate::cli::output::write_query_result;
use crate::rag::Mode;
use crate::rag::RagSession;
use crate::AppConfig;
use crate::Result;

pub async fn handle_ask(config: &AppConfig, api_key: &str, mode: Mode) -> Result<()> {
    let mut session = RagSession::new(config, api_key)?;
    session.set_mode(mode);

    println!("Loading documents...");
    session.load()?;
    println!("Processing documents...");
    session.process().await?;

    let stdin = io::stdin();
    run_interactive(&mut session, stdin.lock(), io::stdout()).await
}

/// Read commands until `exit` or end of input.
///
/// `switch` offers the two presets; any other line is asked as a question.
/// A failed question is reported and the loop continues.
pub async fn run_interactive<R: BufRead, W: Write>(
    session: &mut RagSession,
    mut input: R,
    mut out: W,
) -> Result<()> {
    writeln!(
        out,
        "\nRAG System ready for queries (type 'exit' to quit, 'switch' to change system message)"
    )?;
    writeln!(out, "{}", "-".repeat(50))?;

    loop {
        write!(out, "\nEnter question or command: ")?;
        out.flush()?;

        let Some(command) = read_trimmed(&mut input)? else {
            break;
        };

        if command.eq_ignore_ascii_case("exit") {
            break;
        }
        if command.eq_ignore_ascii_case("switch") {
            switch_mode(session, &mut input, &mut out)?;
            continue;
        }
        if command.is_empty() {
            continue;
        }

        match session.query(&command).await {
            Ok(result) => write_query_result(&mut out, &result)?,
            Err(e) => writeln!(out, "Error: {e}")?,
        }
    }

    Ok(())
}

fn switch_mode<R: BufRead, W: Write>(
    session: &mut RagSession,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    writeln!(out, "\nAvailable modes:")?;
    writeln!(out, "1. Technical")?;
    writeln!(out, "2. Summary")?;
    write!(out, "Select mode (1/2): ")?;
    out.flush()?;

    let selection = read_trimmed(input)?.unwrap_or_default();
    let mode = match selection.as_str() {
        "1" => Mode::Technical,
        "2" => Mode::Summary,
        other => {
            writeln!(
                out,
                "Invalid selection '{other}', keeping {} mode",
                session.mode_name()
            )?;
            return Ok(());
        }
    };

    session.set_mode(mode);
    writeln!(out, "Switched to {mode} mode")?;
    Ok(())
}

/// Next line without surrounding whitespace, or `None` at end of input
fn read_trimmed(input: &mut impl BufRead) -> Result<Option<String>> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}
