// ============================================================================
// chanprobe-core/src/notifications/ntfy.rs
// ============================================================================
//
// NTFY IMPLEMENTATION: Run Notifications via ntfy.sh
//
// Sends run notifications to an ntfy topic using the blocking dispatcher of
// the ntfy crate. The topic is given as a full URL, e.g.
// https://ntfy.sh/iptv-checks, and split into server and topic on use.

use crate::error::{CoreError, CoreResult};
use crate::notifications::{NotificationSender, NotificationType};

use ntfy::DispatcherBuilder;
use ntfy::payload::{Payload, Priority as NtfyPriority};

/// Sends notifications to an ntfy server.
///
/// ```rust,no_run
/// use chanprobe_core::notifications::{NotificationSender, NotificationType, NtfyNotificationSender};
/// use std::path::PathBuf;
///
/// let sender = NtfyNotificationSender::new("https://ntfy.sh/your_topic").unwrap();
/// let notification = NotificationType::RunStarted {
///     playlist: PathBuf::from("/path/to/playlist.m3u"),
/// };
/// sender.send_notification(&notification).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct NtfyNotificationSender {
    topic_url: String,
    base_url: String,
    topic: String,
}

/// Splits `https://host/topic` into `("https://host", "topic")`.
fn split_topic_url(topic_url: &str) -> CoreResult<(String, String)> {
    let Some(after_scheme) = topic_url.strip_prefix("https://") else {
        return Err(CoreError::NotificationError(format!(
            "Invalid ntfy topic URL '{topic_url}': must start with https://"
        )));
    };

    let (host, topic) = after_scheme.split_once('/').unwrap_or((after_scheme, ""));
    if host.is_empty() {
        return Err(CoreError::NotificationError(format!(
            "URL '{topic_url}' must have a non-empty host"
        )));
    }
    let topic = topic.trim_end_matches('/');
    if topic.is_empty() {
        return Err(CoreError::NotificationError(format!(
            "URL '{topic_url}' is missing topic path"
        )));
    }

    Ok((format!("https://{host}"), topic.to_string()))
}

impl NtfyNotificationSender {
    /// Creates a sender for a full topic URL.
    ///
    /// # Errors
    ///
    /// * `CoreError::NotificationError` if the URL is not `https://<host>/<topic>`
    pub fn new(topic_url: &str) -> CoreResult<Self> {
        let (base_url, topic) = split_topic_url(topic_url)?;
        Ok(Self {
            topic_url: topic_url.to_string(),
            base_url,
            topic,
        })
    }

    pub fn topic_url(&self) -> &str {
        &self.topic_url
    }
}

impl NotificationSender for NtfyNotificationSender {
    fn send_notification(&self, notification: &NotificationType) -> CoreResult<()> {
        let dispatcher = DispatcherBuilder::new(&self.base_url)
            .build_blocking()
            .map_err(|e| {
                CoreError::NotificationError(format!(
                    "Failed to build ntfy dispatcher for {}: {e}",
                    self.base_url
                ))
            })?;

        let priority = map_priority(notification.get_priority()).unwrap_or_else(|| {
            log::warn!(
                "Invalid ntfy priority value provided: {}",
                notification.get_priority()
            );
            NtfyPriority::Default
        });

        let payload = Payload::new(&self.topic)
            .message(notification.get_message())
            .title(notification.get_title())
            .priority(priority)
            .tags(vec!["chanprobe".to_string(), notification.tag().to_string()]);

        dispatcher.send(&payload).map_err(|e| {
            CoreError::NotificationError(format!(
                "Failed to send ntfy notification to {}: {e}",
                self.topic_url
            ))
        })?;
        log::debug!("Sent '{}' notification to {}", notification.tag(), self.topic_url);
        Ok(())
    }
}

/// Maps a 1-5 priority onto ntfy's priority levels.
fn map_priority(p: u8) -> Option<NtfyPriority> {
    match p {
        1 => Some(NtfyPriority::Min),
        2 => Some(NtfyPriority::Low),
        3 => Some(NtfyPriority::Default),
        4 => Some(NtfyPriority::High),
        5 => Some(NtfyPriority::Max),
        _ => None,
    }
}
