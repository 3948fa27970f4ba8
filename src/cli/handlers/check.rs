//! Environment check handler

use crate::cli::output::print_error;
use crate::cli::output::print_info;
use crate::cli::output::print_success;
use crate::cli::output::print_warning;
use crate::errors::DocRagError;
use crate::llm::ChatMessage;
use crate::llm::CompletionClient;
use crate::llm::OpenAiChatClient;
use crate::AppConfig;
use crate::Result;

/// Outcome of one environment check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub name: &'static str,
    pub passed: bool,
    pub detail: String,
}

impl CheckOutcome {
    fn new(name: &'static str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name,
            passed,
            detail: detail.into(),
        }
    }
}

pub async fn handle_check(config: &AppConfig) -> Result<()> {
    print_info("Testing environment setup...");

    let api_key = config.api_key().ok();
    let client = match api_key.as_deref() {
        Some(key) => Some(OpenAiChatClient::new(&config.llm, key)?),
        None => None,
    };
    let outcomes = run_checks(
        config,
        api_key.is_some(),
        client.as_ref().map(|c| c as &dyn CompletionClient),
    )
    .await;

    let mut failed = 0;
    for outcome in &outcomes {
        let line = format!("{}: {}", outcome.name, outcome.detail);
        if outcome.passed {
            print_success(&line);
        } else {
            failed += 1;
            print_error(&line);
        }
    }

    if failed > 0 {
        print_warning(&format!("{failed} of {} checks failed", outcomes.len()));
        return Err(DocRagError::ConfigError(format!(
            "{failed} environment checks failed"
        )));
    }
    Ok(())
}

/// Credential presence, both directories and a one-message completion round trip.
/// The round trip is skipped without a client.
pub async fn run_checks(
    config: &AppConfig,
    has_api_key: bool,
    client: Option<&dyn CompletionClient>,
) -> Vec<CheckOutcome> {
    let mut outcomes = vec![CheckOutcome::new(
        "API key present",
        has_api_key,
        if has_api_key { "Yes" } else { "No" },
    )];

    for (name, dir) in [
        ("Documents directory exists", config.documents_dir()),
        ("Index directory exists", config.persist_dir()),
    ] {
        let exists = dir.is_dir();
        outcomes.push(CheckOutcome::new(
            name,
            exists,
            format!("{} ({})", if exists { "Yes" } else { "No" }, dir.display()),
        ));
    }

    let round_trip = match client {
        Some(client) => match client.complete(&[ChatMessage::user("Hello!")]).await {
            Ok(_) => CheckOutcome::new(
                "Completion service",
                true,
                format!("{} connection successful", client.model_name()),
            ),
            Err(e) => CheckOutcome::new("Completion service", false, format!("connection failed: {e}")),
        },
        None => CheckOutcome::new("Completion service", false, "skipped, no API key"),
    };
    outcomes.push(round_trip);

    outcomes
}
