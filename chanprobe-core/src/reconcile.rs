//! Reconciliation of declared and measured resolution tiers.
//!
//! Channel names often carry a bracketed tier marker such as `[高清]`. After a
//! channel has been measured, the marker is compared against the measured
//! tier and the name is rewritten to carry the measured tier instead.

use crate::playlist::ChannelEntry;
use crate::tier::ResolutionTier;

use std::fmt;

/// Disagreement between a channel's declared tier and its measured tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub ordinal: usize,
    pub declared_name: String,
    pub declared_tier: ResolutionTier,
    pub actual_tier: ResolutionTier,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {}: declared {}, actual {}",
            self.ordinal, self.declared_name, self.declared_tier, self.actual_tier
        )
    }
}

/// Returns the tier declared by a bracketed marker in the name, if any.
///
/// When several markers are present the leftmost one is taken.
#[must_use]
pub fn declared_tier(name: &str) -> Option<ResolutionTier> {
    ResolutionTier::ALL
        .iter()
        .filter(|tier| tier.is_declarable())
        .filter_map(|tier| name.find(&tier.bracketed()).map(|pos| (pos, *tier)))
        .min_by_key(|(pos, _)| *pos)
        .map(|(_, tier)| tier)
}

/// Compares the declared marker of an entry against the measured tier.
#[must_use]
pub fn detect_mismatch(entry: &ChannelEntry, actual: ResolutionTier) -> Option<Mismatch> {
    let declared = declared_tier(&entry.declared_name)?;
    (declared != actual).then(|| Mismatch {
        ordinal: entry.ordinal,
        declared_name: entry.declared_name.clone(),
        declared_tier: declared,
        actual_tier: actual,
    })
}

/// Rewrites a channel name so that it carries the measured tier.
///
/// A name that already has markers loses all of them and always gets the
/// measured tier appended, `Error` included. A name without markers only gets
/// a tier appended when the tier is not `Error`.
#[must_use]
pub fn rewrite_name(name: &str, tier: ResolutionTier) -> String {
    let markers: Vec<String> = ResolutionTier::ALL
        .iter()
        .filter(|t| t.is_declarable())
        .map(|t| t.bracketed())
        .collect();

    if markers.iter().any(|m| name.contains(m.as_str())) {
        let stripped = markers
            .iter()
            .fold(name.to_string(), |acc, m| acc.replace(m.as_str(), ""));
        format!("{}{}", stripped.trim(), tier.bracketed())
    } else if tier != ResolutionTier::Error {
        format!("{}{}", name, tier.bracketed())
    } else {
        name.to_string()
    }
}
