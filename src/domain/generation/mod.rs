//! Remote generation domain traits and retry policy

mod client;
mod retry;

pub use client::GenerationClient;
pub use retry::{RetryDecision, RetryPolicy, RetryState};

#[cfg(test)]
pub use client::MockGenerationClient;
