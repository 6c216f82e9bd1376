//! Seller-note annotation behind an injectable generator.

use async_trait::async_trait;
use leadgen_core::Record;

use crate::openai::{ChatRequest, Message, OpenAiClient};

const NOTE_TEMPERATURE: f32 = 0.2;
const NOTE_MAX_TOKENS: u32 = 50;

/// Result of asking for one note. Failures carry a reason for logging and
/// are never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteOutcome {
    Written(String),
    Failed(String),
}

impl NoteOutcome {
    /// The note to store: the text when written, empty otherwise.
    #[must_use]
    pub fn into_note(self) -> String {
        match self {
            Self::Written(text) => text,
            Self::Failed(_) => String::new(),
        }
    }
}

/// Produces a one-line note for a scored record.
#[async_trait]
pub trait NoteGenerator: Send + Sync {
    async fn generate(&self, record: &Record) -> NoteOutcome;
}

/// Prompt describing one record to the language model.
#[must_use]
pub fn note_prompt(record: &Record) -> String {
    let or_unknown = |v: Option<&str>| {
        v.filter(|s| !s.is_empty())
            .unwrap_or("unknown")
            .to_string()
    };
    format!(
        "Company: {}\nIndustry: {}\nWebsite: {}\nSignals: L&D={}\nWrite a 1-line seller note for B2B learning outreach.",
        or_unknown(record.name.as_deref()),
        or_unknown(record.industry.as_deref()),
        or_unknown(record.website.as_deref()),
        if record.has_ld_signals { "yes" } else { "no" },
    )
}

/// [`NoteGenerator`] backed by an `OpenAI` chat model.
pub struct OpenAiNotes {
    client: OpenAiClient,
    model: String,
}

impl OpenAiNotes {
    #[must_use]
    pub fn new(client: OpenAiClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl NoteGenerator for OpenAiNotes {
    async fn generate(&self, record: &Record) -> NoteOutcome {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::user(note_prompt(record))],
            temperature: Some(NOTE_TEMPERATURE),
            max_tokens: Some(NOTE_MAX_TOKENS),
        };
        match self.client.chat_completion(&request).await {
            Ok(text) => NoteOutcome::Written(first_line(&text)),
            Err(e) => NoteOutcome::Failed(e.to_string()),
        }
    }
}

fn first_line(text: &str) -> String {
    text.trim()
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_outcome_collapses_to_empty_note() {
        assert_eq!(NoteOutcome::Failed("timeout".to_string()).into_note(), "");
        assert_eq!(
            NoteOutcome::Written("Pitch leadership courses.".to_string()).into_note(),
            "Pitch leadership courses."
        );
    }

    #[test]
    fn prompt_lists_record_facts() {
        let record = Record {
            name: Some("Acme Learning Solutions".to_string()),
            industry: Some("Education".to_string()),
            has_ld_signals: true,
            ..Record::default()
        };
        let prompt = note_prompt(&record);
        let header = "Company: Acme Learning Solutions\nIndustry: Education\n";
        assert!(prompt.starts_with(header));
        assert!(prompt.contains("Website: unknown\n"));
        assert!(prompt.contains("Signals: L&D=yes\n"));
        assert!(prompt.ends_with("seller note for B2B learning outreach."));
    }

    #[test]
    fn note_keeps_first_trimmed_line() {
        assert_eq!(
            first_line("  Offer a pilot.\nSecond line"),
            "Offer a pilot."
        );
        assert_eq!(first_line("\n\n"), "");
    }
}
