//! Run notifications.
//!
//! A run reports its start, its outcome and fatal errors through a
//! `NotificationSender`. The only real backend is ntfy.
mod abstraction;
mod ntfy;

pub use abstraction::{NotificationSender, NotificationType, NullNotificationSender};
pub use ntfy::NtfyNotificationSender;
