// Business surface: certified-candidate search and the sales-qualification chatbot.

pub mod candidates;
pub mod chat;
pub mod handlers;
pub mod prompts;
