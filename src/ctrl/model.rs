//! Language-model backed command generation.
//!
//! One chat completion per request: the configured prompt template is
//! rendered with the user's description and the model is expected to answer
//! with a JSON array of command strings. Ordering of the returned candidates
//! is preserved exactly. There are no retries here; failures bubble up to the
//! session.

use anyhow::{Context, Result, bail};
use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
    CreateChatCompletionRequestArgs,
};

use crate::config::LlmConfig;

pub struct OpenAiModel {
    client: Client<OpenAIConfig>,
    model: String,
    template: String,
}

impl OpenAiModel {
    /// Build a model client from the configuration. The API key is taken
    /// from the environment (`OPENAI_API_KEY`), as the client library does.
    pub fn new(cfg: &LlmConfig) -> Result<Self> {
        match cfg.provider.as_str() {
            "openai" => Ok(Self {
                client: Client::new(),
                model: cfg.model_name.clone(),
                template: cfg.prompt_template.clone(),
            }),
            other => bail!("unsupported model provider: {other}"),
        }
    }

    pub async fn generate_commands(&self, prompt: &str) -> Result<Vec<String>> {
        let text = render_prompt(&self.template, prompt)?;
        let user_msg: ChatCompletionRequestMessage = ChatCompletionRequestUserMessageArgs::default()
            .content(text)
            .build()?
            .into();
        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(vec![user_msg])
            .build()?;
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .context("generating commands")?;

        let content = response
            .choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
            .unwrap_or_default();
        if content.trim().is_empty() {
            bail!("no response from model");
        }
        parse_commands(content)
    }
}

/// Render the prompt template with the user's input bound to `user_input`.
pub fn render_prompt(template: &str, user_input: &str) -> Result<String> {
    let env = minijinja::Environment::new();
    env.render_str(template, minijinja::context! { user_input })
        .context("rendering prompt template")
}

/// Parse the model's answer as a JSON array of command strings, tolerating a
/// fenced code block around it.
fn parse_commands(content: &str) -> Result<Vec<String>> {
    let body = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    serde_json::from_str(body).context("parsing model response")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn render_substitutes_user_input() {
        let rendered = render_prompt("generate: {{ user_input }}", "list files").unwrap();
        assert_eq!(rendered, "generate: list files");
    }

    #[test]
    fn render_rejects_bad_template() {
        assert!(render_prompt("{{ user_input", "list files").is_err());
    }

    #[test]
    fn parse_plain_array() {
        let commands = parse_commands(r#"["ls -l", "ls -la"]"#).unwrap();
        assert_eq!(commands, vec!["ls -l", "ls -la"]);
    }

    #[test]
    fn parse_fenced_array() {
        let commands = parse_commands("```json\n[\"find . -type d\"]\n```").unwrap();
        assert_eq!(commands, vec!["find . -type d"]);
    }

    #[test]
    fn parse_rejects_non_array() {
        assert!(parse_commands("sure, try `ls -l`").is_err());
    }
}
