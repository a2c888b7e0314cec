//! Explicit context shared by the resolver, the message loop and the driver.
//!
//! Built once at startup and passed by reference; nothing here is global.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use convo_core::{ConversationsApi, Result};

use crate::config::EchoConfig;
use crate::retry::{with_retry, RetryPolicy};
use crate::sleeper::{Sleeper, TokioSleeper};

pub struct EchoContext {
    pub api: Arc<dyn ConversationsApi>,
    pub sleeper: Arc<dyn Sleeper>,
    /// Address of the human on the chat side; messages authored by it are user input.
    pub operator_address: String,
    /// Provider-side sender address bound next to the operator.
    pub proxy_address: String,
    pub poll_interval: Duration,
    pub retry: RetryPolicy,
}

impl EchoContext {
    /// Creates a context with a one-second poll interval and the default retry policy.
    pub fn new(
        api: Arc<dyn ConversationsApi>,
        sleeper: Arc<dyn Sleeper>,
        operator_address: impl Into<String>,
        proxy_address: impl Into<String>,
    ) -> Self {
        Self {
            api,
            sleeper,
            operator_address: operator_address.into(),
            proxy_address: proxy_address.into(),
            poll_interval: Duration::from_secs(1),
            retry: RetryPolicy::default(),
        }
    }

    /// Production context: addresses, interval and retry budget from config, real sleeping.
    pub fn from_config(config: &EchoConfig, api: Arc<dyn ConversationsApi>) -> Self {
        Self::new(
            api,
            Arc::new(TokioSleeper),
            config.operator_address(),
            config.proxy_address(),
        )
        .with_poll_interval(config.poll_interval)
        .with_retry(RetryPolicy::default().with_max_retries(config.max_retries))
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Runs one API operation under the context's retry policy.
    pub async fn call<'a, T, F, Fut>(&'a self, operation: &str, mut f: F) -> Result<T>
    where
        F: FnMut(&'a dyn ConversationsApi) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let api: &'a dyn ConversationsApi = self.api.as_ref();
        with_retry(&self.retry, self.sleeper.as_ref(), operation, || f(api)).await
    }
}
