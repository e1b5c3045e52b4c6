//! Deterministic provider that replays canned replies.
//!
//! Replies are routed by a needle searched in the request messages, so a
//! script can answer each lesson section independently of call order. When a
//! route runs out of replies its last reply repeats.

use crate::error::ApiError;
use crate::provider::{
    ChatMessage, CompletionOptions, CompletionResponse, ModelProviderClient, TokenUsage,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Error(ApiError),
}

impl ScriptedReply {
    pub fn text(content: impl Into<String>) -> Self {
        ScriptedReply::Text(content.into())
    }

    pub fn json(value: serde_json::Value) -> Self {
        ScriptedReply::Text(value.to_string())
    }
}

#[derive(Debug)]
struct Route {
    needle: String,
    replies: VecDeque<ScriptedReply>,
    last: Option<ScriptedReply>,
}

/// One request observed by the scripted provider.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub route: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub options: CompletionOptions,
}

pub struct ScriptedProvider {
    routes: Mutex<Vec<Route>>,
    fallback: Option<ScriptedReply>,
    calls: Mutex<Vec<RecordedCall>>,
    tokens_per_reply: u32,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self {
            routes: Mutex::new(Vec::new()),
            fallback: None,
            calls: Mutex::new(Vec::new()),
            tokens_per_reply: 40,
        }
    }

    /// Answer requests whose messages contain `needle` with `replies`, in order.
    pub fn route(self, needle: impl Into<String>, replies: Vec<ScriptedReply>) -> Self {
        self.routes.lock().push(Route {
            needle: needle.into(),
            replies: replies.into(),
            last: None,
        });
        self
    }

    /// Reply used when no route matches.
    pub fn fallback(mut self, reply: ScriptedReply) -> Self {
        self.fallback = Some(reply);
        self
    }

    pub fn with_tokens_per_reply(mut self, tokens: u32) -> Self {
        self.tokens_per_reply = tokens;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of recorded calls whose route needle equals `needle`.
    pub fn calls_for(&self, needle: &str) -> usize {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.route.as_deref() == Some(needle))
            .count()
    }

    fn next_reply(&self, haystack: &str) -> (Option<String>, Option<ScriptedReply>) {
        let mut routes = self.routes.lock();
        for route in routes.iter_mut() {
            if !haystack.contains(&route.needle) {
                continue;
            }
            let reply = match route.replies.pop_front() {
                Some(reply) => {
                    route.last = Some(reply.clone());
                    Some(reply)
                }
                None => route.last.clone(),
            };
            return (Some(route.needle.clone()), reply);
        }
        (None, self.fallback.clone())
    }
}

#[async_trait]
impl ModelProviderClient for ScriptedProvider {
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        options: CompletionOptions,
    ) -> Result<CompletionResponse, ApiError> {
        let haystack = messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let (route, reply) = self.next_reply(&haystack);

        self.calls.lock().push(RecordedCall {
            route: route.clone(),
            messages,
            options,
        });

        match reply {
            Some(ScriptedReply::Text(content)) => Ok(CompletionResponse {
                content,
                model: "scripted".to_string(),
                usage: TokenUsage {
                    prompt_tokens: 0,
                    completion_tokens: self.tokens_per_reply,
                    total_tokens: self.tokens_per_reply,
                },
                finish_reason: Some("stop".to_string()),
            }),
            Some(ScriptedReply::Error(err)) => Err(err),
            None => Err(ApiError::ProviderError(format!(
                "No scripted reply for route {:?}",
                route
            ))),
        }
    }

    fn provider_name(&self) -> &str {
        "scripted"
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}
