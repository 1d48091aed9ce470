//! Generation client implementations

mod huggingface;
mod retrying;

pub use huggingface::{HuggingFaceGenerationClient, DEFAULT_GENERATION_URL};
pub use retrying::RetryingGenerationClient;
