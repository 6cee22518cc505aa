//! Yes/no confirmation before destructive or outward-facing actions

use async_trait::async_trait;
use tracing::debug;

/// Extra input collected together with the confirmation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptInput {
    Email,
}

/// What the user is asked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub header: Option<String>,
    pub message: String,
    pub input: Option<PromptInput>,
}

impl Prompt {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            header: None,
            message: message.into(),
            input: None,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    pub fn with_input(mut self, input: PromptInput) -> Self {
        self.input = Some(input);
        self
    }

    /// "Do you really want to delete the medicine 'Aspirin'?"
    pub fn delete(kind: &str, label: &str) -> Self {
        Self::new(format!(
            "Do you really want to delete the {} '{}'?",
            kind, label
        ))
    }

    pub fn delete_pet(name: &str) -> Self {
        Self::delete("pet", name).with_header("Delete pet")
    }

    pub fn share_pet(name: &str) -> Self {
        Self::new(format!(
            "Enter the e-mail address of the user you want to share '{}' with",
            name
        ))
        .with_header("Share pet")
        .with_input(PromptInput::Email)
    }
}

/// The user's answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Confirm { input: Option<String> },
    Cancel,
}

/// The UI side of a confirmation dialog
#[async_trait]
pub trait Prompter: Send + Sync {
    async fn ask(&self, prompt: &Prompt) -> Decision;
}

/// Ask and run exactly one of the two handlers.
///
/// `on_confirm` receives the collected input, if the prompt asked for one.
pub async fn confirm<P, T>(
    prompter: &P,
    prompt: &Prompt,
    on_confirm: impl FnOnce(Option<String>) -> T,
    on_cancel: impl FnOnce() -> T,
) -> T
where
    P: Prompter + ?Sized,
{
    match prompter.ask(prompt).await {
        Decision::Confirm { input } => on_confirm(input),
        Decision::Cancel => {
            debug!(message = %prompt.message, "Confirmation cancelled");
            on_cancel()
        }
    }
}

/// Prompter that answers every prompt the same way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedPrompter(pub Decision);

impl FixedPrompter {
    pub fn confirm() -> Self {
        Self(Decision::Confirm { input: None })
    }

    pub fn confirm_with(input: impl Into<String>) -> Self {
        Self(Decision::Confirm {
            input: Some(input.into()),
        })
    }

    pub fn cancel() -> Self {
        Self(Decision::Cancel)
    }
}

#[async_trait]
impl Prompter for FixedPrompter {
    async fn ask(&self, _prompt: &Prompt) -> Decision {
        self.0.clone()
    }
}
