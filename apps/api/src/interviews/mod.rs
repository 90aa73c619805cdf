// Mock interviews: question generation, record persistence, answer scoring.
// All LLM calls go through llm_client. No direct generation-service calls here.

pub mod handlers;
pub mod manager;
pub mod models;
pub mod prompts;
pub mod scoring;
pub mod validation;
