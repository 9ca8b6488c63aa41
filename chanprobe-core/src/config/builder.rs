// ============================================================================
// chanprobe-core/src/config/builder.rs
// ============================================================================
//
// CONFIGURATION BUILDER: Builder Pattern for CoreConfig
//
// Fluent construction of CoreConfig. Required paths are checked and the
// finished configuration is validated in build(), so a builder never hands
// out a configuration the pipeline would reject later.

// ---- Standard library imports ----
use std::path::PathBuf;

// ---- Internal crate imports ----
use super::CoreConfig;
use crate::error::{CoreError, CoreResult};

/// Builder for creating CoreConfig instances.
#[derive(Debug, Clone)]
pub struct CoreConfigBuilder {
    // Required fields
    playlist_path: Option<PathBuf>,
    output_dir: Option<PathBuf>,

    // Optional fields with defaults
    probe_timeout_secs: u64,
    screenshot_timeout_secs: u64,
    seek_secs: u64,
    jobs: usize,
    ntfy_topic: Option<String>,
}

impl Default for CoreConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CoreConfigBuilder {
    /// Creates a new CoreConfigBuilder with default values.
    pub fn new() -> Self {
        Self {
            playlist_path: None,
            output_dir: None,
            probe_timeout_secs: super::DEFAULT_PROBE_TIMEOUT_SECS,
            screenshot_timeout_secs: super::DEFAULT_SCREENSHOT_TIMEOUT_SECS,
            seek_secs: super::DEFAULT_SEEK_SECS,
            jobs: super::DEFAULT_JOBS,
            ntfy_topic: None,
        }
    }

    /// Sets the playlist to validate.
    pub fn playlist_path(mut self, path: PathBuf) -> Self {
        self.playlist_path = Some(path);
        self
    }

    /// Sets the output directory.
    pub fn output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = Some(output_dir);
        self
    }

    /// Sets the probe timeout in seconds.
    pub fn probe_timeout_secs(mut self, secs: u64) -> Self {
        self.probe_timeout_secs = secs;
        self
    }

    /// Sets the screenshot timeout in seconds.
    pub fn screenshot_timeout_secs(mut self, secs: u64) -> Self {
        self.screenshot_timeout_secs = secs;
        self
    }

    /// Sets the screenshot seek offset in seconds.
    pub fn seek_secs(mut self, secs: u64) -> Self {
        self.seek_secs = secs;
        self
    }

    /// Sets the worker pool size.
    pub fn jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs;
        self
    }

    /// Sets the ntfy.sh topic URL for the run summary notification.
    pub fn ntfy_topic(mut self, topic: &str) -> Self {
        self.ntfy_topic = Some(topic.to_string());
        self
    }

    /// Builds and validates a CoreConfig.
    ///
    /// # Errors
    ///
    /// * `CoreError::Config` if a required path is missing or a value is out of range
    pub fn build(self) -> CoreResult<CoreConfig> {
        let playlist_path = self
            .playlist_path
            .ok_or_else(|| CoreError::Config("playlist_path is required".to_string()))?;
        let output_dir = self
            .output_dir
            .ok_or_else(|| CoreError::Config("output_dir is required".to_string()))?;

        let config = CoreConfig {
            playlist_path,
            output_dir,
            probe_timeout_secs: self.probe_timeout_secs,
            screenshot_timeout_secs: self.screenshot_timeout_secs,
            seek_secs: self.seek_secs,
            jobs: self.jobs,
            ntfy_topic: self.ntfy_topic,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_paths() {
        let result = CoreConfigBuilder::new().output_dir(PathBuf::from("out")).build();
        assert!(matches!(result, Err(CoreError::Config(msg)) if msg.contains("playlist_path")));

        let result = CoreConfigBuilder::new().playlist_path(PathBuf::from("a.m3u")).build();
        assert!(matches!(result, Err(CoreError::Config(msg)) if msg.contains("output_dir")));
    }

    #[test]
    fn test_builder_overrides() {
        let config = CoreConfigBuilder::new()
            .playlist_path(PathBuf::from("a.m3u"))
            .output_dir(PathBuf::from("out"))
            .probe_timeout_secs(3)
            .screenshot_timeout_secs(7)
            .seek_secs(0)
            .jobs(2)
            .ntfy_topic("https://ntfy.sh/iptv")
            .build()
            .unwrap();

        assert_eq!(config.probe_timeout_secs, 3);
        assert_eq!(config.screenshot_timeout_secs, 7);
        assert_eq!(config.seek_secs, 0);
        assert_eq!(config.jobs, 2);
        assert_eq!(config.ntfy_topic.as_deref(), Some("https://ntfy.sh/iptv"));
    }

    #[test]
    fn test_builder_validates() {
        let result = CoreConfigBuilder::new()
            .playlist_path(PathBuf::from("a.m3u"))
            .output_dir(PathBuf::from("out"))
            .jobs(0)
            .build();
        assert!(result.is_err());
    }
}
