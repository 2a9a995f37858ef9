use super::stream::{self, ReplyStream};
use super::GenerateService;
use crate::{Error, Result};
use async_trait::async_trait;
use futures_util::stream::StreamExt;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
enum ScriptedReply {
    Fragments(Vec<String>),
    Unreachable(String),
    Failure(String),
}

#[derive(Clone)]
pub struct MockGenerateClient {
    replies: Arc<Mutex<Vec<ScriptedReply>>>,
    requests: Arc<Mutex<Vec<(String, String)>>>,
    call_count: Arc<Mutex<usize>>,
    reachable: Arc<Mutex<bool>>,
}

impl MockGenerateClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            reachable: Arc::new(Mutex::new(true)),
        }
    }

    /// Script a reply delivered as a single fragment.
    pub fn with_reply(self, reply: String) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(ScriptedReply::Fragments(vec![reply]));
        self
    }

    /// Script a reply delivered as the given fragment sequence.
    pub fn with_fragments(self, fragments: Vec<String>) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(ScriptedReply::Fragments(fragments));
        self
    }

    /// Script a backend-unreachable failure for one call.
    pub fn with_unreachable(self, message: String) -> Self {
        *self.reachable.lock().unwrap() = false;
        self.replies
            .lock()
            .unwrap()
            .push(ScriptedReply::Unreachable(message));
        self
    }

    /// Script a mid-stream backend failure for one call.
    pub fn with_failure(self, message: String) -> Self {
        self.replies
            .lock()
            .unwrap()
            .push(ScriptedReply::Failure(message));
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// The `(prompt, context)` pairs seen so far, in call order.
    pub fn recorded_requests(&self) -> Vec<(String, String)> {
        self.requests.lock().unwrap().clone()
    }
}

impl Default for MockGenerateClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerateService for MockGenerateClient {
    async fn stream_generate(&self, prompt: &str, context: &str) -> ReplyStream {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        self.requests
            .lock()
            .unwrap()
            .push((prompt.to_string(), context.to_string()));

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Default mock response
            return stream::once(Ok(format!("echo: {}", prompt)));
        }

        let index = (*count - 1) % replies.len();
        match replies[index].clone() {
            ScriptedReply::Fragments(fragments) => {
                futures_util::stream::iter(fragments.into_iter().map(Ok::<String, Error>)).boxed()
            }
            ScriptedReply::Unreachable(message) => {
                stream::once(Err(Error::BackendUnreachable(message)))
            }
            ScriptedReply::Failure(message) => stream::once(Err(Error::Backend(message))),
        }
    }

    async fn check_backend(&self) -> Result<()> {
        if *self.reachable.lock().unwrap() {
            Ok(())
        } else {
            Err(Error::BackendUnreachable("mock backend offline".to_string()))
        }
    }
}
