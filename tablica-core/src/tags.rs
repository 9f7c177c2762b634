//! Tag classification from bracketed markers in event text.
//!
//! Organizers mark events with `[RR]`, `[P]` or a bracketed class range such as
//! `[1-3]`, `[4 - 6]` or `[7]`. Tags are derived from the title and description
//! every time they are needed and are never stored alongside an event.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TablicaError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventTag {
    #[serde(rename = "RR")]
    Rr,
    #[serde(rename = "P")]
    P,
    #[serde(rename = "1-3")]
    Range1To3,
    #[serde(rename = "4-6")]
    Range4To6,
    #[serde(rename = "7-8")]
    Range7To8,
    /// Sentinel for text without any marker.
    #[serde(rename = "none")]
    Untagged,
}

/// Colour used when rendering a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagColor {
    pub name: &'static str,
    pub hex: &'static str,
}

impl EventTag {
    pub fn label(self) -> &'static str {
        match self {
            EventTag::Rr => "RR",
            EventTag::P => "P",
            EventTag::Range1To3 => "1-3",
            EventTag::Range4To6 => "4-6",
            EventTag::Range7To8 => "7-8",
            EventTag::Untagged => "none",
        }
    }

    pub fn color(self) -> TagColor {
        match self {
            EventTag::P => TagColor { name: "violet", hex: "#a78bfa" },
            EventTag::Range1To3 => TagColor { name: "emerald", hex: "#34d399" },
            EventTag::Range4To6 => TagColor { name: "orange", hex: "#fb923c" },
            EventTag::Range7To8 => TagColor { name: "amber", hex: "#fbbf24" },
            EventTag::Rr => TagColor { name: "red", hex: "#f87171" },
            EventTag::Untagged => TagColor { name: "blue", hex: "#60a5fa" },
        }
    }
}

impl fmt::Display for EventTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts a label with or without brackets, case-insensitively (`rr`, `[1-3]`, `none`).
impl FromStr for EventTag {
    type Err = TablicaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().trim_start_matches('[').trim_end_matches(']');
        match label.to_ascii_uppercase().as_str() {
            "RR" => Ok(EventTag::Rr),
            "P" => Ok(EventTag::P),
            "1-3" => Ok(EventTag::Range1To3),
            "4-6" => Ok(EventTag::Range4To6),
            "7-8" => Ok(EventTag::Range7To8),
            "NONE" => Ok(EventTag::Untagged),
            _ => Err(TablicaError::Validation(format!("Unknown tag '{}'", s))),
        }
    }
}

/// Patterns in priority order; the first match becomes the primary tag.
static TAG_PATTERNS: Lazy<Vec<(EventTag, Regex)>> = Lazy::new(|| {
    [
        (EventTag::Rr, r"(?i)\[RR\]"),
        (EventTag::P, r"(?i)\[P\]"),
        (EventTag::Range1To3, r"\[\s*[1-3]\s*-\s*[1-3]\s*\]|\[[1-3]\]"),
        (EventTag::Range4To6, r"\[\s*[4-6]\s*-\s*[4-6]\s*\]|\[[4-6]\]"),
        (EventTag::Range7To8, r"\[\s*[78]\s*-\s*[78]\s*\]|\[[78]\]"),
    ]
    .into_iter()
    .map(|(tag, pattern)| {
        let regex = Regex::new(pattern).expect("tag pattern compiles");
        (tag, regex)
    })
    .collect()
});

/// Ordered, non-empty set of tags detected in a piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TagSet(Vec<EventTag>);

impl TagSet {
    /// Detect every tag in `text`. Yields `[Untagged]` when nothing matches.
    pub fn classify(text: &str) -> Self {
        let tags: Vec<EventTag> = TAG_PATTERNS
            .iter()
            .filter(|(_, regex)| regex.is_match(text))
            .map(|(tag, _)| *tag)
            .collect();

        if tags.is_empty() {
            TagSet(vec![EventTag::Untagged])
        } else {
            TagSet(tags)
        }
    }

    /// Classify an event from its title and description.
    pub fn for_event(title: &str, description: &str) -> Self {
        Self::classify(&format!("{} {}", title, description))
    }

    /// Highest-priority tag, used where only one colour or badge fits.
    pub fn primary(&self) -> EventTag {
        self.0.first().copied().unwrap_or(EventTag::Untagged)
    }

    pub fn as_slice(&self) -> &[EventTag] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = EventTag> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, tag: EventTag) -> bool {
        self.0.contains(&tag)
    }

    pub fn is_untagged(&self) -> bool {
        self.active().next().is_none()
    }

    /// Tags other than the `none` sentinel.
    pub fn active(&self) -> impl Iterator<Item = EventTag> + '_ {
        self.iter().filter(|tag| *tag != EventTag::Untagged)
    }

    /// CSS gradient blending the colours of all active tags.
    pub fn gradient(&self) -> String {
        let colors: Vec<&str> = self.active().map(|tag| tag.color().hex).collect();

        match colors.as_slice() {
            [] => solid_gradient(EventTag::Untagged.color().hex),
            [single] => solid_gradient(single),
            many => {
                let last = (many.len() - 1) as f64;
                let stops: Vec<String> = many
                    .iter()
                    .enumerate()
                    .map(|(index, color)| {
                        let percentage = (index as f64 / last) * 100.0;
                        format!("{} {}%", color, percentage)
                    })
                    .collect();
                format!("linear-gradient(135deg, {})", stops.join(", "))
            }
        }
    }
}

fn solid_gradient(hex: &str) -> String {
    format!("linear-gradient(135deg, {}, {})", hex, hex)
}

/// Unique active tags across several tag sets, in first-seen order.
pub fn available_tags<I>(sets: I) -> Vec<EventTag>
where
    I: IntoIterator<Item = TagSet>,
{
    let mut seen = Vec::new();
    for set in sets {
        for tag in set.active() {
            if !seen.contains(&tag) {
                seen.push(tag);
            }
        }
    }
    seen
}
