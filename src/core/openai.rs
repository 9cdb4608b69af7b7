use crate::core::summary::{
    CompletionClient, CompletionRequest, FragmentStream, Role, TokenLimit,
};
use crate::error::{Error, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
        CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use futures::StreamExt;
use tracing::debug;

/// Chat completion client for the OpenAI API.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client<OpenAIConfig>,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::with_config(OpenAIConfig::new().with_api_key(api_key)),
        }
    }

    /// Ids of every model the credential can use, sorted.
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let response = self
            .client
            .models()
            .list()
            .await
            .map_err(|e| Error::custom(format!("Error listing models: {e}")))?;

        let mut ids: Vec<String> = response.data.into_iter().map(|model| model.id).collect();
        ids.sort();
        Ok(ids)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        let request = build_chat_request(request)?;
        debug!(model = %request.model, "sending chat completion request");

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(Error::generation)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::generation("response contained no message content"))
    }

    async fn complete_stream(&self, request: CompletionRequest) -> Result<FragmentStream> {
        let request = build_chat_request(request)?;
        debug!(model = %request.model, "opening chat completion stream");

        let stream = self
            .client
            .chat()
            .create_stream(request)
            .await
            .map_err(Error::generation)?;

        Ok(stream
            .map(|chunk| {
                let chunk = chunk.map_err(Error::generation)?;
                Ok(chunk
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.delta.content))
            })
            .boxed())
    }
}

#[allow(deprecated)]
fn build_chat_request(request: CompletionRequest) -> Result<CreateChatCompletionRequest> {
    let messages = request
        .messages
        .into_iter()
        .map(|message| -> Result<ChatCompletionRequestMessage> {
            let built: ChatCompletionRequestMessage = match message.role {
                Role::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(message.content)
                    .build()
                    .map_err(Error::generation)?
                    .into(),
                Role::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(message.content)
                    .build()
                    .map_err(Error::generation)?
                    .into(),
            };
            Ok(built)
        })
        .collect::<Result<Vec<_>>>()?;

    let mut args = CreateChatCompletionRequestArgs::default();
    args.model(request.model)
        .messages(messages)
        .stream(request.stream);

    if let Some(temperature) = request.temperature {
        args.temperature(temperature);
    }

    match request.token_limit {
        TokenLimit::MaxCompletionTokens(limit) => {
            args.max_completion_tokens(limit);
        }
        TokenLimit::MaxTokens(limit) => {
            args.max_tokens(limit);
        }
    }

    args.build().map_err(Error::generation)
}

#[cfg(test)]
mod tests {
    use super::build_chat_request;
    use crate::core::summary::{ChatMessage, CompletionRequest, Role, TokenLimit};

    fn request(temperature: Option<f32>, token_limit: TokenLimit) -> CompletionRequest {
        CompletionRequest {
            model: "o3-mini".to_string(),
            messages: vec![
                ChatMessage {
                    role: Role::System,
                    content: "Respond in English.".to_string(),
                },
                ChatMessage {
                    role: Role::User,
                    content: "Summarize this".to_string(),
                },
            ],
            stream: true,
            temperature,
            token_limit,
        }
    }

    #[test]
    fn completion_token_field_without_temperature() {
        let built =
            build_chat_request(request(None, TokenLimit::MaxCompletionTokens(4000))).expect("request");
        let json = serde_json::to_value(&built).expect("json");

        assert_eq!(json["max_completion_tokens"], 4000);
        assert!(json.get("temperature").is_none());
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["stream"], true);
        assert_eq!(json["messages"][0]["role"], "system");
        assert_eq!(json["messages"][1]["role"], "user");
    }

    #[test]
    fn generic_token_field_with_temperature() {
        let built =
            build_chat_request(request(Some(0.7), TokenLimit::MaxTokens(1000))).expect("request");
        let json = serde_json::to_value(&built).expect("json");

        assert_eq!(json["max_tokens"], 1000);
        assert!(json.get("max_completion_tokens").is_none());
        let temperature = json["temperature"].as_f64().expect("temperature");
        assert!((temperature - 0.7).abs() < 1e-6);
    }
}
