pub mod client;
pub mod normalizer;
pub mod prompts;
pub mod types;

pub use client::{ChatCompleter, OpenAiChatClient};
pub use normalizer::{extract_final_name, NameNormalizer, NameRefinement, RefineStage};
pub use types::{CompletionRequest, CorrectionResponse};
