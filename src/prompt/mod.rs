// src/prompt/mod.rs
// Prompt assembly: training context, persona system prompt, gateway message list

pub mod builder;

pub use builder::{
    build_messages,
    build_system_prompt,
    build_training_context,
    FALLBACK_TRAINING_CONTEXT,
};
