mod client;

pub use client::OpenAIAssistantClient;
