//! Playlist parsing for extended-M3U channel lists.
//!
//! A playlist is read as a sequence of lines. Each `#EXTINF` metadata line is
//! paired with the line that immediately follows it, which must be an `http`
//! URL. Everything the parser cannot use is recorded as a [`SkippedLine`] with
//! its original 1-based line number, so nothing disappears silently.
//!
//! The parser is a lazy iterator over [`ChannelEntry`] values. Skipped lines
//! accumulate on the parser itself and can be drained at any time with
//! [`PlaylistParser::take_skipped`].

use crate::error::{CoreError, CoreResult};

use regex::Regex;
use std::fmt;
use std::path::Path;
use std::sync::LazyLock;

/// Marker that opens a channel entry.
pub const METADATA_MARKER: &str = "#EXTINF";

/// Marker of the playlist header line.
pub const HEADER_MARKER: &str = "#EXTM3U";

/// Matches the metadata marker, its duration and any `key="value"` attributes.
static METADATA_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^#EXTINF:?\s*-?[0-9.]*(?:\s+[A-Za-z0-9_-]+=(?:"[^"]*"|\S+))*"#)
        .expect("metadata prefix pattern is valid")
});

/// One channel taken from the playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEntry {
    /// 1-based position among valid entries
    pub ordinal: usize,
    /// Display name as written in the playlist
    pub declared_name: String,
    /// Stream URL
    pub url: String,
    /// Sanitized metadata line the entry was built from
    pub metadata_line: String,
    /// Source line number of the metadata line
    pub line_number: usize,
}

/// Why a line was not turned into a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty or whitespace-only line
    Blank,
    /// Neither metadata nor a URL belonging to one
    Unrecognized,
    /// Part of a metadata/URL pair whose URL does not start with `http`
    InvalidUrl,
    /// Metadata line at end of input with no URL after it
    MissingUrl,
}

impl SkipReason {
    fn as_str(self) -> &'static str {
        match self {
            SkipReason::Blank => "blank",
            SkipReason::Unrecognized => "unrecognized",
            SkipReason::InvalidUrl => "invalid url",
            SkipReason::MissingUrl => "missing url",
        }
    }
}

/// A source line rejected by the parser.
///
/// A dropped metadata/URL pair is a single entry: the metadata line plus the
/// rejected URL line in `rejected_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    pub line_number: usize,
    pub content: String,
    pub reason: SkipReason,
    /// Line number and content of the URL line of a dropped pair
    pub rejected_url: Option<(usize, String)>,
}

impl fmt::Display for SkippedLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rejected_url {
            Some((url_line, url)) => write!(
                f,
                "lines {}-{} [{}]: {} | {}",
                self.line_number,
                url_line,
                self.reason.as_str(),
                self.content,
                url
            ),
            None => write!(
                f,
                "line {} [{}]: {}",
                self.line_number,
                self.reason.as_str(),
                self.content
            ),
        }
    }
}

/// Removes control characters and byte-order marks, then trims whitespace.
#[must_use]
pub fn sanitize_line(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_control() && *c != '\u{feff}' && *c != '\u{200b}')
        .collect::<String>()
        .trim()
        .to_string()
}

/// Returns true when the (sanitized) line opens a channel.
#[must_use]
pub fn is_metadata_line(line: &str) -> bool {
    line.trim_start().starts_with(METADATA_MARKER)
}

/// Extracts the display name from a metadata line.
///
/// The name is whatever follows the first comma. Without a comma, the marker,
/// duration and attribute list are stripped and the remainder is used. An
/// empty result falls back to `Unknown_Channel_<counter>`.
#[must_use]
pub fn extract_display_name(line: &str, counter: usize) -> String {
    let line = line.trim_start();
    let name = match line.split_once(',') {
        Some((_, rest)) => rest.trim().to_string(),
        None => METADATA_PREFIX.replace(line, "").trim().to_string(),
    };

    if name.is_empty() {
        format!("Unknown_Channel_{counter}")
    } else {
        name
    }
}

/// Rebuilds a metadata line with a new display name, keeping its duration and attributes.
#[must_use]
pub fn rewrite_metadata_line(line: &str, new_name: &str) -> String {
    let line = line.trim_start();
    let prefix = match line.split_once(',') {
        Some((prefix, _)) => prefix.to_string(),
        None => match METADATA_PREFIX.find(line) {
            Some(m) => m.as_str().trim_end().to_string(),
            None => format!("{METADATA_MARKER}:-1"),
        },
    };
    format!("{prefix},{new_name}")
}

/// Reads a playlist file into text, replacing invalid UTF-8 sequences.
pub fn read_playlist(path: &Path) -> CoreResult<String> {
    let bytes = std::fs::read(path).map_err(|e| {
        CoreError::PathError(format!(
            "Failed to read playlist '{}': {}",
            path.display(),
            e
        ))
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Lazy parser turning playlist lines into channel entries.
pub struct PlaylistParser<I> {
    lines: I,
    line_number: usize,
    next_ordinal: usize,
    header: Option<String>,
    seen_content: bool,
    skipped: Vec<SkippedLine>,
}

impl<I> PlaylistParser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    /// Creates a parser over raw (unsanitized) lines.
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            line_number: 0,
            next_ordinal: 1,
            header: None,
            seen_content: false,
            skipped: Vec::new(),
        }
    }

    /// The `#EXTM3U` header line, once it has been read.
    pub fn header(&self) -> Option<&str> {
        self.header.as_deref()
    }

    /// Drains the skipped lines accumulated so far.
    pub fn take_skipped(&mut self) -> Vec<SkippedLine> {
        std::mem::take(&mut self.skipped)
    }

    fn next_line(&mut self) -> Option<(usize, String)> {
        let raw = self.lines.next()?;
        self.line_number += 1;
        Some((self.line_number, sanitize_line(raw.as_ref())))
    }

    fn skip(&mut self, line_number: usize, content: String, reason: SkipReason) {
        log::debug!("Skipping playlist line {line_number} ({}): {content}", reason.as_str());
        self.skipped.push(SkippedLine {
            line_number,
            content,
            reason,
            rejected_url: None,
        });
    }
}

impl<I> Iterator for PlaylistParser<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = ChannelEntry;

    fn next(&mut self) -> Option<ChannelEntry> {
        loop {
            let (line_number, line) = self.next_line()?;

            if line.is_empty() {
                self.skip(line_number, line, SkipReason::Blank);
                continue;
            }

            if !self.seen_content {
                self.seen_content = true;
                if line.starts_with(HEADER_MARKER) {
                    self.header = Some(line);
                    continue;
                }
            }

            if !is_metadata_line(&line) {
                self.skip(line_number, line, SkipReason::Unrecognized);
                continue;
            }

            // The URL candidate is always consumed together with its metadata line.
            match self.next_line() {
                None => {
                    self.skip(line_number, line, SkipReason::MissingUrl);
                }
                Some((url_line_number, url)) if !url.starts_with("http") => {
                    log::warn!(
                        "Dropping channel at line {line_number}: URL line {url_line_number} is not http(s)"
                    );
                    self.skipped.push(SkippedLine {
                        line_number,
                        content: line,
                        reason: SkipReason::InvalidUrl,
                        rejected_url: Some((url_line_number, url)),
                    });
                }
                Some((_, url)) => {
                    let ordinal = self.next_ordinal;
                    self.next_ordinal += 1;
                    let declared_name = extract_display_name(&line, ordinal);
                    return Some(ChannelEntry {
                        ordinal,
                        declared_name,
                        url,
                        metadata_line: line,
                        line_number,
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> (Vec<ChannelEntry>, Vec<SkippedLine>, Option<String>) {
        let mut parser = PlaylistParser::new(text.lines());
        let entries: Vec<_> = parser.by_ref().collect();
        let header = parser.header().map(str::to_string);
        (entries, parser.take_skipped(), header)
    }

    #[test]
    fn test_parses_pairs_and_header() {
        let text = "#EXTM3U x-tvg-url=\"a\"\n\
                    #EXTINF:-1 tvg-id=\"1\",CCTV1[高清]\n\
                    http://example.com/1.m3u8\n\
                    #EXTINF:-1,CCTV2\n\
                    https://example.com/2.m3u8\n";
        let (entries, skipped, header) = parse(text);

        assert_eq!(header.as_deref(), Some("#EXTM3U x-tvg-url=\"a\""));
        assert!(skipped.is_empty());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].ordinal, 1);
        assert_eq!(entries[0].declared_name, "CCTV1[高清]");
        assert_eq!(entries[0].url, "http://example.com/1.m3u8");
        assert_eq!(entries[0].line_number, 2);
        assert_eq!(entries[1].ordinal, 2);
        assert_eq!(entries[1].declared_name, "CCTV2");
    }

    #[test]
    fn test_invalid_url_drops_channel_as_one_skip_entry() {
        let text = "#EXTM3U\n\
                    #EXTINF:-1,Bad\n\
                    rtmp://example.com/live\n\
                    #EXTINF:-1,Good\n\
                    http://example.com/good\n";
        let (entries, skipped, _) = parse(text);

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].declared_name, "Good");
        assert_eq!(entries[0].ordinal, 1);
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].line_number, 2);
        assert_eq!(skipped[0].content, "#EXTINF:-1,Bad");
        assert_eq!(skipped[0].reason, SkipReason::InvalidUrl);
        assert_eq!(
            skipped[0].rejected_url,
            Some((3, "rtmp://example.com/live".to_string()))
        );
        assert_eq!(
            skipped[0].to_string(),
            "lines 2-3 [invalid url]: #EXTINF:-1,Bad | rtmp://example.com/live"
        );
    }

    #[test]
    fn test_rejected_url_line_is_not_a_new_channel() {
        // The second metadata line sits where the URL should be, so it is consumed.
        let text = "#EXTINF:-1,First\n#EXTINF:-1,Second\nhttp://example.com/s\n";
        let (entries, skipped, _) = parse(text);

        assert!(entries.is_empty());
        assert_eq!(skipped.len(), 2);
        assert_eq!(skipped[0].reason, SkipReason::InvalidUrl);
        assert_eq!(skipped[1].line_number, 3);
        assert_eq!(skipped[1].reason, SkipReason::Unrecognized);
    }

    #[test]
    fn test_blank_and_stray_lines_are_skipped() {
        let text = "#EXTM3U\n\n   \n#EXTVLCOPT:http-user-agent=x\n#EXTINF:-1,A\nhttp://a\n";
        let (entries, skipped, _) = parse(text);

        assert_eq!(entries.len(), 1);
        let numbers: Vec<_> = skipped.iter().map(|s| s.line_number).collect();
        assert_eq!(numbers, vec![2, 3, 4]);
        assert_eq!(skipped[0].reason, SkipReason::Blank);
        assert_eq!(skipped[2].reason, SkipReason::Unrecognized);
    }

    #[test]
    fn test_trailing_metadata_without_url() {
        let (entries, skipped, _) = parse("#EXTINF:-1,Orphan");
        assert!(entries.is_empty());
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].reason, SkipReason::MissingUrl);
    }

    #[test]
    fn test_header_only_recognised_first() {
        let (_, skipped, header) = parse("#EXTINF:-1,A\nhttp://a\n#EXTM3U\n");
        assert!(header.is_none());
        assert_eq!(skipped.len(), 1);
        assert_eq!(skipped[0].content, "#EXTM3U");
    }

    #[test]
    fn test_sanitize_strips_control_characters() {
        assert_eq!(sanitize_line("\u{feff}#EXTM3U\r"), "#EXTM3U");
        assert_eq!(sanitize_line("  #EXTINF:-1,\u{0007}News \t"), "#EXTINF:-1,News");
        let (entries, _, _) = parse("  #EXTINF:-1,Indented\r\nhttp://a\r\n");
        assert_eq!(entries[0].declared_name, "Indented");
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(extract_display_name("#EXTINF:-1,  Sports  ", 1), "Sports");
        assert_eq!(
            extract_display_name("#EXTINF:-1 tvg-id=\"x\" group-title=\"News\" Local News", 2),
            "Local News"
        );
        assert_eq!(extract_display_name("#EXTINF:-1 tvg-id=\"x\"", 3), "Unknown_Channel_3");
        assert_eq!(extract_display_name("#EXTINF:-1,", 4), "Unknown_Channel_4");
    }

    #[test]
    fn test_unknown_name_uses_running_ordinal() {
        let (entries, _, _) = parse("#EXTINF:-1,A\nhttp://a\n#EXTINF:-1,\nhttp://b\n");
        assert_eq!(entries[1].declared_name, "Unknown_Channel_2");
    }

    #[test]
    fn test_rewrite_metadata_line() {
        assert_eq!(
            rewrite_metadata_line("#EXTINF:-1 tvg-id=\"1\",CCTV1[标清]", "CCTV1[高清]"),
            "#EXTINF:-1 tvg-id=\"1\",CCTV1[高清]"
        );
        assert_eq!(
            rewrite_metadata_line("#EXTINF:-1 tvg-id=\"1\" Local", "Local[标清]"),
            "#EXTINF:-1 tvg-id=\"1\",Local[标清]"
        );
    }
}
