mod client;
mod retry;

pub use client::RateLimitedClient;
pub use retry::{RetryPolicy, is_retryable_status};

#[cfg(test)]
pub(crate) use client::tests::serve_responses;
