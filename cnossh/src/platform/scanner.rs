//! Transcript scanning for device-reported errors.
//!
//! CNOS reports failures as free text in the terminal, so the only signal is
//! a handful of phrases anywhere in the captured output. One hit fails the
//! whole operation.

use std::fmt;

/// Phrases CNOS uses when a command or transfer fails, in priority order.
pub const CNOS_ERROR_MARKERS: &[&str] = &[
    "error",
    "invalid",
    "cannot be enabled in l2 interface",
    "incorrect",
    "failure",
];

const GENERIC_MESSAGE: &str = "Device returned an Error. Please check Results for more information";

/// An error phrase found in a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceError {
    /// The marker that matched (lowercase).
    pub marker: String,

    /// Byte offset of the marker in the scanned text.
    pub position: usize,

    /// Three-digit device error code following the marker, if any.
    pub code: Option<u16>,
}

impl DeviceError {
    /// Human-readable failure message.
    pub fn message(&self) -> String {
        match self.code {
            Some(code) => format!("Error-{:03}: {}", code, GENERIC_MESSAGE),
            None => GENERIC_MESSAGE.to_string(),
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Case-insensitive scanner over a fixed set of error phrases.
#[derive(Debug, Clone)]
pub struct TranscriptScanner {
    markers: Vec<String>,
}

impl TranscriptScanner {
    /// Build a scanner for the given phrases; earlier phrases take priority.
    pub fn new<I, T>(markers: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|m| m.as_ref().to_ascii_lowercase())
                .filter(|m| !m.is_empty())
                .collect(),
        }
    }

    /// Scanner for the CNOS phrase set.
    pub fn cnos() -> Self {
        Self::new(CNOS_ERROR_MARKERS)
    }

    /// Return the first error phrase found, or `None` for a clean transcript.
    pub fn scan(&self, text: &str) -> Option<DeviceError> {
        // ASCII lowercasing keeps byte offsets aligned with `text`.
        let lower = text.to_ascii_lowercase();

        self.markers.iter().find_map(|marker| {
            lower.find(marker.as_str()).map(|position| DeviceError {
                marker: marker.clone(),
                position,
                code: parse_code(&text.as_bytes()[position + marker.len()..]),
            })
        })
    }

    /// The phrases this scanner looks for.
    pub fn markers(&self) -> &[String] {
        &self.markers
    }
}

impl Default for TranscriptScanner {
    fn default() -> Self {
        Self::cnos()
    }
}

/// Parse a three-digit code after a marker: `-101`, `:101`, `: 101` or ` 101`.
fn parse_code(rest: &[u8]) -> Option<u16> {
    let rest = rest.strip_prefix(b"-").or_else(|| rest.strip_prefix(b":")).unwrap_or(rest);
    let rest = rest.strip_prefix(b" ").unwrap_or(rest);
    let digits = rest.get(..3)?;
    if !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    digits
        .iter()
        .fold(Some(0u16), |acc, d| acc.map(|n| n * 10 + u16::from(d - b'0')))
}
