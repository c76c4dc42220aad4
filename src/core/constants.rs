//! Fixed texts and request defaults shared by the widget and its front-ends.

use std::time::Duration;

/// Bot reply when no endpoint serves the active query mode.
pub const NOT_CONFIGURED_MESSAGE: &str = "⚠️ Chat backend is not configured for this mode.";

/// Bot reply when the request could not be sent or its body could not be parsed.
pub const ERROR_MESSAGE: &str = "⚠️ Error: could not get response";

/// Bot reply when a successful response carries no usable answer field.
pub const NO_RESPONSE_PLACEHOLDER: &str = "No response returned.";

/// Simulated reply for endpoints that are still marked as placeholders.
pub const COMING_SOON_MESSAGE: &str = "🤖 I’m still learning! Backend coming soon.";

/// Delay before the simulated placeholder reply is appended.
pub const COMING_SOON_DELAY: Duration = Duration::from_millis(600);

/// Shown while the transcript is empty; never stored as a message.
pub const GREETING: &str =
    "👋 Hi! I’m your Physical AI assistant. Ask me anything about this book.";

/// URL value that marks an endpoint as not wired to a backend yet.
pub const PLACEHOLDER_URL: &str = "#";

pub const DEFAULT_MAX_RESULTS: u32 = 5;
pub const DEFAULT_TEMPERATURE: f64 = 0.7;

pub const DEFAULT_BOOK_TITLE: &str = "Physical AI & Humanoid Robotics";
pub const DEFAULT_BOOK_TAGLINE: &str =
    "Understanding Humanoid Robot Systems from Middleware to Multimodal AI Integration";
