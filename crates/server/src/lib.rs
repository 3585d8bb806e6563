//! Leekspin Market server library.
//!
//! This crate provides the chat agent server as a library, allowing the
//! orchestration layer to be tested and reused without binding a socket.
//!
//! # Architecture
//!
//! - [`claude`] - Anthropic Messages API client (streaming and non-streaming)
//! - [`agent`] - The fixed tool registry the model may call, plus its executor
//! - [`services`] - Conversation orchestration: the model-call / tool-use loop
//! - [`routes`] - Axum HTTP surface: chat endpoint (SSE) and catalog reads

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod agent;
pub mod claude;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
