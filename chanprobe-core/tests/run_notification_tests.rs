// chanprobe-core/tests/run_notification_tests.rs

use chanprobe_core::external::mocks::MockProber;
use chanprobe_core::notifications::{NotificationSender, NotificationType};
use chanprobe_core::{CoreConfig, CoreError, CoreResult, run_playlist};
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

#[derive(Default)]
struct RecordingSender {
    sent: Mutex<Vec<NotificationType>>,
}

impl NotificationSender for RecordingSender {
    fn send_notification(&self, notification: &NotificationType) -> CoreResult<()> {
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

struct FailingSender;

impl NotificationSender for FailingSender {
    fn send_notification(&self, _notification: &NotificationType) -> CoreResult<()> {
        Err(CoreError::NotificationError("connection refused".to_string()))
    }
}

#[test]
fn test_run_sends_start_and_summary() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let playlist = dir.path().join("tv.m3u");
    fs::write(&playlist, "#EXTINF:-1,A\nhttp://a\n#EXTINF:-1,B\nhttp://b\n")?;
    let config = CoreConfig::new(playlist, dir.path().join("out"));

    let prober = MockProber::new();
    prober.expect_healthy_stream("http://a", 1920, 1080);
    let sender = RecordingSender::default();

    run_playlist(&config, &prober, Some(&sender))?;

    let sent = sender.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(matches!(sent[0], NotificationType::RunStarted { .. }));
    match &sent[1] {
        NotificationType::RunComplete {
            total,
            connected,
            mismatches,
            skipped,
            ..
        } => {
            assert_eq!(*total, 2);
            assert_eq!(*connected, 1);
            assert_eq!(*mismatches, 0);
            assert_eq!(*skipped, 0);
        }
        other => panic!("unexpected notification: {other:?}"),
    }
    Ok(())
}

#[test]
fn test_notification_failure_does_not_fail_run() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let playlist = dir.path().join("tv.m3u");
    fs::write(&playlist, "#EXTINF:-1,A\nhttp://a\n")?;
    let config = CoreConfig::new(playlist, dir.path().join("out"));

    let prober = MockProber::new();
    prober.expect_healthy_stream("http://a", 720, 576);

    let summary = run_playlist(&config, &prober, Some(&FailingSender))?;
    assert_eq!(summary.statistics.total, 1);
    assert_eq!(summary.statistics.connected_true, 1);
    Ok(())
}

#[test]
fn test_fatal_error_is_notified() {
    let dir = tempdir().unwrap();
    let config = CoreConfig::new(dir.path().join("missing.m3u"), dir.path().join("out"));
    let sender = RecordingSender::default();

    let result = run_playlist(&config, &MockProber::new(), Some(&sender));
    assert!(result.is_err());

    let sent = sender.sent.lock().unwrap();
    assert_eq!(sent.len(), 2);
    assert!(matches!(
        &sent[1],
        NotificationType::RunError { message, .. } if message.contains("missing.m3u")
    ));
}
