// chanprobe-core/tests/run_playlist_tests.rs

use chanprobe_core::config::CoreConfigBuilder;
use chanprobe_core::external::mocks::{MockCall, MockCapture, MockProbe, MockProber, video_stream};
use chanprobe_core::reporting::{MISMATCH_LOG_FILE, PLAYLIST_FILE, REPORT_FILE, SKIPPED_LOG_FILE};
use chanprobe_core::{CoreConfig, CoreError, ResolutionTier, run_playlist};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_playlist(dir: &Path, text: &str) -> std::path::PathBuf {
    let path = dir.join("tv.m3u");
    fs::write(&path, text).expect("Failed to write playlist");
    path
}

fn config(dir: &Path, playlist_text: &str, jobs: usize) -> CoreConfig {
    let playlist = write_playlist(dir, playlist_text);
    CoreConfigBuilder::new()
        .playlist_path(playlist)
        .output_dir(dir.join("out"))
        .jobs(jobs)
        .build()
        .expect("valid config")
}

/// Report rows without BOM and header.
fn report_rows(out: &Path) -> Vec<String> {
    let text = fs::read_to_string(out.join(REPORT_FILE)).unwrap();
    text.trim_start_matches('\u{feff}')
        .lines()
        .skip(1)
        .map(str::to_string)
        .collect()
}

const MIXED_PLAYLIST: &str = "#EXTM3U x-tvg-url=\"http://epg.example.com/e.xml\"\n\
#EXTINF:-1 tvg-id=\"c1\" group-title=\"News\",CCTV1[高清]\n\
http://example.com/hd\n\
#EXTINF:-1,Movie[4K]\n\
http://example.com/uhd\n\
#EXTINF:-1,Local\n\
http://example.com/sd\n\
#EXTINF:-1,Dead[高清]\n\
http://example.com/dead\n\
#EXTINF:-1,Odd\n\
http://example.com/odd\n";

fn mixed_prober() -> MockProber {
    let prober = MockProber::new();
    prober.expect_healthy_stream("http://example.com/hd", 1920, 1080);
    prober.expect_healthy_stream("http://example.com/uhd", 3840, 2160);
    prober.expect_healthy_stream("http://example.com/sd", 720, 576);
    prober.expect_probe("http://example.com/dead", MockProbe::Timeout);
    prober.expect_healthy_stream("http://example.com/odd", 1000, 700);
    prober
}

#[test]
fn test_end_to_end_valid_and_invalid_url() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = config(
        dir.path(),
        "#EXTM3U\n\
         #EXTINF:-1,CCTV1[高清]\n\
         http://example.com/hd\n\
         #EXTINF:-1,Broken\n\
         rtmp://example.com/live\n",
        1,
    );
    let prober = MockProber::new();
    prober.expect_healthy_stream("http://example.com/hd", 1920, 1080);

    let summary = run_playlist(&config, &prober, None)?;

    assert_eq!(summary.statistics.total, 1);
    assert_eq!(summary.statistics.connected_true, 1);
    assert_eq!(summary.skipped_count, 1);
    let skipped = fs::read_to_string(summary.paths.skipped_log.clone())?;
    assert_eq!(skipped.lines().count(), 1);
    assert!(skipped.contains("rtmp://example.com/live"));
    assert!(skipped.starts_with("lines 4-5"));

    // The dropped channel is never probed.
    assert!(
        prober
            .calls()
            .iter()
            .all(|c| !matches!(c, MockCall::Probe { url, .. } if url.starts_with("rtmp")))
    );
    Ok(())
}

#[test]
fn test_outputs_for_mixed_playlist() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = config(dir.path(), MIXED_PLAYLIST, 1);
    let summary = run_playlist(&config, &mixed_prober(), None)?;
    let out = dir.path().join("out");

    let stats = &summary.statistics;
    assert_eq!(stats.total, 5);
    assert_eq!(stats.connected_true, 4);
    assert_eq!(stats.connected_false, 1);
    assert_eq!(stats.connected_true + stats.connected_false, stats.total);
    assert_eq!(stats.count(ResolutionTier::Hd), 1);
    assert_eq!(stats.count(ResolutionTier::Uhd4k), 1);
    assert_eq!(stats.count(ResolutionTier::Sd), 1);
    assert_eq!(stats.count(ResolutionTier::Other), 1);
    assert_eq!(stats.count(ResolutionTier::Error), 1);

    let rows = report_rows(&out);
    assert_eq!(rows.len(), stats.total);
    assert_eq!(
        rows[0],
        "1,CCTV1[高清],\"#1 h264, 1920x1080,25fps\",\"#1 aac,2ch,48khz\",0001_CCTV1[高清].jpg,true,高清"
    );
    assert_eq!(rows[3], "4,Dead[高清],,,,false,错误");

    let playlist = fs::read_to_string(out.join(PLAYLIST_FILE))?;
    let lines: Vec<&str> = playlist.lines().collect();
    assert_eq!(lines[0], "#EXTM3U x-tvg-url=\"http://epg.example.com/e.xml\"");
    assert_eq!(lines.len(), 1 + 2 * stats.connected_true);
    assert_eq!(
        lines[1],
        "#EXTINF:-1 tvg-id=\"c1\" group-title=\"News\",CCTV1[高清]"
    );
    assert_eq!(lines[3], "#EXTINF:-1,Movie[4K]");
    assert_eq!(lines[5], "#EXTINF:-1,Local[标清]");
    assert_eq!(lines[7], "#EXTINF:-1,Odd[其他]");
    assert!(!playlist.contains("dead"));

    // Dead[高清] measured Error and is still reported as a mismatch.
    let mismatches = fs::read_to_string(out.join(MISMATCH_LOG_FILE))?;
    assert_eq!(mismatches.lines().count(), 1);
    assert!(mismatches.contains("Dead[高清]"));
    assert_eq!(summary.mismatch_count(), 1);

    assert!(out.join("screenshots").join("0001_CCTV1[高清].jpg").is_file());
    assert!(!out.join("screenshots").join("0004_Dead[高清].jpg").exists());
    Ok(())
}

#[test]
fn test_error_tier_is_never_connected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = config(
        dir.path(),
        "#EXTINF:-1,NoVideo\nhttp://a\n#EXTINF:-1,NoShot\nhttp://b\n#EXTINF:-1,Silent\nhttp://c\n",
        1,
    );
    let prober = MockProber::new();
    let mut audio_only = video_stream(1920, 1080);
    audio_only.video_codec = None;
    prober.expect_probe("http://a", MockProbe::Success(audio_only));
    prober.expect_probe("http://b", MockProbe::Success(video_stream(1280, 720)));
    prober.expect_capture("http://b", MockCapture::NoFile);
    prober.expect_probe("http://c", MockProbe::Failure("connection refused".to_string()));

    let summary = run_playlist(&config, &prober, None)?;
    assert_eq!(summary.statistics.total, 3);
    assert_eq!(summary.statistics.connected_true, 0);
    assert_eq!(summary.statistics.count(ResolutionTier::Error), 3);

    for row in report_rows(&dir.path().join("out")) {
        assert!(row.ends_with(",false,错误"), "{row}");
    }
    let playlist = fs::read_to_string(dir.path().join("out").join(PLAYLIST_FILE))?;
    assert_eq!(playlist, "#EXTM3U\n");
    Ok(())
}

#[test]
fn test_undeclared_names_never_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = config(
        dir.path(),
        "#EXTINF:-1,A\nhttp://a\n#EXTINF:-1,B\nhttp://b\n",
        1,
    );
    let prober = MockProber::new();
    prober.expect_healthy_stream("http://a", 640, 480);
    prober.expect_probe("http://b", MockProbe::Timeout);

    let summary = run_playlist(&config, &prober, None)?;
    assert_eq!(summary.mismatch_count(), 0);
    let log = fs::read_to_string(dir.path().join("out").join(MISMATCH_LOG_FILE))?;
    assert!(log.is_empty());
    Ok(())
}

#[test]
fn test_parallel_run_matches_sequential_run() -> Result<(), Box<dyn std::error::Error>> {
    let seq_dir = tempdir()?;
    let par_dir = tempdir()?;

    let seq_config = config(seq_dir.path(), MIXED_PLAYLIST, 1);
    let par_config = config(par_dir.path(), MIXED_PLAYLIST, 4);
    let sequential = run_playlist(&seq_config, &mixed_prober(), None)?;
    let parallel = run_playlist(&par_config, &mixed_prober(), None)?;

    assert_eq!(sequential.statistics, parallel.statistics);
    assert_eq!(
        report_rows(&seq_dir.path().join("out")),
        report_rows(&par_dir.path().join("out"))
    );
    assert_eq!(
        fs::read_to_string(seq_dir.path().join("out").join(PLAYLIST_FILE))?,
        fs::read_to_string(par_dir.path().join("out").join(PLAYLIST_FILE))?
    );

    let ordinals: Vec<String> = report_rows(&par_dir.path().join("out"))
        .iter()
        .map(|row| row.split(',').next().unwrap_or_default().to_string())
        .collect();
    assert_eq!(ordinals, vec!["1", "2", "3", "4", "5"]);
    Ok(())
}

#[test]
fn test_configured_timeouts_reach_the_prober() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let playlist = write_playlist(dir.path(), "#EXTINF:-1,A\nhttp://a\n");
    let config = CoreConfigBuilder::new()
        .playlist_path(playlist)
        .output_dir(dir.path().join("out"))
        .probe_timeout_secs(3)
        .screenshot_timeout_secs(7)
        .seek_secs(2)
        .build()?;
    let prober = MockProber::new();
    prober.expect_healthy_stream("http://a", 1920, 1080);

    run_playlist(&config, &prober, None)?;

    let calls = prober.calls();
    assert_eq!(calls.len(), 2);
    assert!(matches!(&calls[0], MockCall::Probe { timeout, .. } if timeout.as_secs() == 3));
    assert!(matches!(
        &calls[1],
        MockCall::Capture { timeout, seek, .. } if timeout.as_secs() == 7 && seek.as_secs() == 2
    ));
    Ok(())
}

#[test]
fn test_empty_playlist_still_writes_outputs() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let config = config(dir.path(), "", 1);
    let summary = run_playlist(&config, &MockProber::new(), None)?;

    assert_eq!(summary.statistics.total, 0);
    let out = dir.path().join("out");
    assert!(report_rows(&out).is_empty());
    assert_eq!(fs::read_to_string(out.join(PLAYLIST_FILE))?, "#EXTM3U\n");
    assert!(out.join(SKIPPED_LOG_FILE).is_file());
    Ok(())
}

#[test]
fn test_missing_playlist_is_fatal() {
    let dir = tempdir().unwrap();
    let config = CoreConfig::new(dir.path().join("absent.m3u"), dir.path().join("out"));
    let result = run_playlist(&config, &MockProber::new(), None);
    assert!(matches!(result, Err(CoreError::PathError(_))));
}

#[test]
fn test_unwritable_output_is_fatal() {
    let dir = tempdir().unwrap();
    let playlist = write_playlist(dir.path(), "#EXTINF:-1,A\nhttp://a\n");
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"not a directory").unwrap();

    let config = CoreConfig::new(playlist, blocker.join("out"));
    let result = run_playlist(&config, &MockProber::new(), None);
    assert!(matches!(result, Err(CoreError::OutputWrite { .. })));
}
