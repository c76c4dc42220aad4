//! bookchat is a terminal companion for the Physical AI & Humanoid Robotics
//! book: it shows the book's outline and an "Ask AI" chat panel backed by a
//! question-answering service.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the chat widget state machine, endpoint selection, the
//!   HTTP backend seam, and configuration.
//! - [`book`] describes the book itself: site metadata and the navigation tree.
//! - [`api`] defines the request and response payloads for the backend.
//! - [`ui`] renders the terminal interface and runs the interactive event loop.
//! - [`commands`] implements the slash commands used by the chat loop.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`].

pub mod api;
pub mod app;
pub mod book;
pub mod cli;
pub mod commands;
pub mod core;
pub mod ui;
pub mod utils;
