use serde::{Deserialize, Serialize};

/// Registration-statement bucket for a raw EDGAR form type.
///
/// The report counts S-1 and F-1 registrations (including amendments);
/// everything else is `Other` and excluded from aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormBucket {
    S1,
    F1,
    Other,
}

impl FormBucket {
    /// Classifies a raw form-type string. Case-insensitive, tolerant of
    /// surrounding whitespace and a trailing `/A` amendment suffix.
    ///
    /// Matching is exact on the base form: `S-11` is a real-estate form,
    /// not an S-1 variant, so only the bare `S-1`/`F-1` bases count.
    pub fn classify(raw_form_type: &str) -> FormBucket {
        let normalized = raw_form_type.trim().to_ascii_uppercase();
        let base = normalized
            .strip_suffix("/A")
            .map(str::trim_end)
            .unwrap_or(&normalized);
        match base {
            "S-1" => FormBucket::S1,
            "F-1" => FormBucket::F1,
            _ => FormBucket::Other,
        }
    }

    pub fn is_registration(self) -> bool {
        matches!(self, FormBucket::S1 | FormBucket::F1)
    }
}
