//! Request-issuing client for role-addressed Ollama servers.
//!
//! [`OllamaClient`] resolves a role through a [`registry::RoleRegistry`] and
//! issues non-streaming generation and chat requests against the resolved
//! target. The [`Prompter`] trait is the minimal "prompt in, text out"
//! surface other frameworks can hold onto; [`BoundClient`] implements it for
//! a fixed role.

pub mod adapter;
pub mod client;
pub mod wire;

pub use adapter::{BoundClient, Prompter};
pub use client::{ClientError, OllamaClient};
pub use wire::{Message, Role};
