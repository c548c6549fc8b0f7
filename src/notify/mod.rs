//! Change notifications.
//!
//! Provides the notifier seam used by the watch loop, the Telegram Bot API
//! implementation and the text of the messages that are sent.

pub mod message;
mod notifier;
pub mod telegram;

pub use notifier::Notifier;
pub use telegram::TelegramNotifier;
