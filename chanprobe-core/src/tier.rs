//! Resolution tier classification.
//!
//! Streams are sorted into a small fixed set of tiers from their measured
//! frame size. Only exact broadcast sizes count as HD, 4K or SD; everything
//! else is `Other`. `Error` is reserved for channels without a usable video
//! track or without a screenshot.

use std::fmt;

/// Resolution tier of a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionTier {
    Hd,
    Uhd4k,
    Sd,
    Other,
    Error,
}

impl ResolutionTier {
    /// All tiers in report order.
    pub const ALL: [ResolutionTier; 5] = [
        ResolutionTier::Hd,
        ResolutionTier::Uhd4k,
        ResolutionTier::Sd,
        ResolutionTier::Other,
        ResolutionTier::Error,
    ];

    /// Localized label used in reports and channel names.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ResolutionTier::Hd => "高清",
            ResolutionTier::Uhd4k => "4K",
            ResolutionTier::Sd => "标清",
            ResolutionTier::Other => "其他",
            ResolutionTier::Error => "错误",
        }
    }

    /// Label wrapped in square brackets, as it appears in channel names.
    #[must_use]
    pub fn bracketed(self) -> String {
        format!("[{}]", self.label())
    }

    /// Tiers that a channel name may declare with a bracketed marker.
    #[must_use]
    pub fn is_declarable(self) -> bool {
        matches!(
            self,
            ResolutionTier::Hd | ResolutionTier::Uhd4k | ResolutionTier::Sd
        )
    }
}

impl fmt::Display for ResolutionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps a measured frame size to its tier.
///
/// A 0x0 frame size is deliberately treated as 4K: some upstream sources
/// report degenerate dimensions for their highest tier.
#[must_use]
pub fn classify(width: u32, height: u32) -> ResolutionTier {
    match (width, height) {
        (1920, 1080) => ResolutionTier::Hd,
        (3840, 2160) | (0, 0) => ResolutionTier::Uhd4k,
        (720, 576) | (720, 560) => ResolutionTier::Sd,
        _ => ResolutionTier::Other,
    }
}
