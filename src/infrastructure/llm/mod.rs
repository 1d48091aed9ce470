//! HTTP plumbing shared by the generation and embedding clients

mod http_client;

pub use http_client::{HttpClient, HttpClientTrait};

#[cfg(test)]
pub use http_client::mock::{MockHttpClient, MockReply, RecordedRequest};
