// src/lib.rs

pub mod client;
pub mod content;
pub mod controller;
pub mod settings;
pub mod types;

pub use client::{ApiError, GeminiClient, Provider};
pub use controller::{ChatController, ChatState};
pub use types::{Message, Role};
