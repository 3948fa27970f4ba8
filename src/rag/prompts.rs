//! System instructions and prompt assembly

use std::fmt;
use std::str::FromStr;

pub use crate::llm::ChatMessage;
pub use crate::llm::Role;
use crate::errors::DocRagError;

/// Instruction used when a session is created without one
pub const DEFAULT_INSTRUCTION: &str = "You are a helpful assistant that answers questions based on the provided documents. \
Follow these guidelines: \
1. Only answer based on the information in the provided documents \
2. If you're not sure or the information isn't in the documents, say so \
3. Provide specific references to the documents when possible \
4. Keep answers clear and concise \
5. If you need to make assumptions, state them explicitly";

const TECHNICAL_INSTRUCTION: &str = "You are a precise and concise technical assistant who: \
1. Provides ONLY the specific information requested \
2. Avoids including unnecessary details not asked for \
3. Formats responses in a clear, structured way \
4. Never adds unrequested information \
5. Responds in the most brief way possible while being complete \
6. If multiple items are found, presents them in a list format \
7. If specific information is not found, clearly states that";

const SUMMARY_INSTRUCTION: &str = "You are a concise document analyzer who: \
1. Provides ONLY the exact information requested \
2. Keeps responses as brief as possible \
3. Uses bullet points for multiple items \
4. Avoids any unnecessary elaboration \
5. Sticks strictly to answering the specific question asked \
6. Never includes additional context unless specifically requested";

/// Built-in instruction presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Technical,
    Summary,
}

impl Mode {
    pub const ALL: [Self; 2] = [Self::Technical, Self::Summary];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Technical => "technical",
            Self::Summary => "summary",
        }
    }

    pub const fn instruction(self) -> &'static str {
        match self {
            Self::Technical => TECHNICAL_INSTRUCTION,
            Self::Summary => SUMMARY_INSTRUCTION,
        }
    }

    /// The preset whose text is exactly `instruction`, if any
    pub fn from_instruction(instruction: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.instruction() == instruction)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Mode {
    type Err = DocRagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "technical" => Ok(Self::Technical),
            "summary" => Ok(Self::Summary),
            other => Err(DocRagError::InvalidArgument(format!(
                "Unknown mode '{other}', expected 'technical' or 'summary'"
            ))),
        }
    }
}

/// Build the user turn: retrieved context, then the question
pub fn build_document_qa_prompt(context: &str, question: &str) -> String {
    format!(
        "Context: {context}\n\nQuestion: {question}\n\nPlease provide a detailed answer based on the context above."
    )
}

/// Turns an instruction, context and question into the message sequence sent
/// to the model. Context and question are inserted verbatim.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    #[must_use]
    pub fn compose(instruction: &str, context: &str, question: &str) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(instruction),
            ChatMessage::user(build_document_qa_prompt(context, question)),
        ]
    }
}
