//! Terminal UI layer for interactive chat sessions.
//!
//! - [`chat_loop`]: the event loop that feeds keys to [`crate::commands`] and
//!   the chat widget, and applies backend replies as they arrive.
//! - [`renderer`]: the outline page, the chat panel and the status line.
//! - [`scroll`]: transcript line building and scroll arithmetic.

pub mod chat_loop;
pub mod renderer;
pub mod scroll;
