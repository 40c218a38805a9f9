//! Five-Section Response Protocol
//!
//! This module owns the marker table shared by the prompt builder and the
//! extractor, the extraction of the five accessibility renderings from a raw
//! completion, and the validation policy that decides whether an extraction
//! is usable.

use crate::error::TransformError;
use serde::{Deserialize, Serialize};

/// Minimum trimmed length (in characters) for a section to count as usable.
pub const MIN_USABLE_SECTION_LEN: usize = 20;

/// One of the five accessibility renderings, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionMarker {
    Visual,
    Hearing,
    Dyslexia,
    Adhd,
    StudyPlan,
}

impl SectionMarker {
    /// All markers in the order the model must emit them.
    pub const ALL: [SectionMarker; 5] = [
        SectionMarker::Visual,
        SectionMarker::Hearing,
        SectionMarker::Dyslexia,
        SectionMarker::Adhd,
        SectionMarker::StudyPlan,
    ];

    /// The literal delimiter line written by the model.
    pub const fn literal(self) -> &'static str {
        match self {
            SectionMarker::Visual => "---VISUAL---",
            SectionMarker::Hearing => "---HEARING---",
            SectionMarker::Dyslexia => "---DYSLEXIA---",
            SectionMarker::Adhd => "---ADHD---",
            SectionMarker::StudyPlan => "---STUDY_PLAN---",
        }
    }

    /// The key under which the section is delivered to callers.
    pub const fn key(self) -> &'static str {
        match self {
            SectionMarker::Visual => "visual",
            SectionMarker::Hearing => "hearing",
            SectionMarker::Dyslexia => "dyslexia",
            SectionMarker::Adhd => "adhd",
            SectionMarker::StudyPlan => "study_plan",
        }
    }

    /// What the model is asked to put in this section.
    pub const fn guidance(self) -> &'static str {
        match self {
            SectionMarker::Visual => "[Detailed visual-friendly explanation]",
            SectionMarker::Hearing => "[Structured concept cards with bullets and arrows]",
            SectionMarker::Dyslexia => "[Short sentences. Clear structure.]",
            SectionMarker::Adhd => "[4 learning blocks + micro-quest + rapid review]",
            SectionMarker::StudyPlan => {
                "[Personalized step-by-step study plan with sessions, goals, and revision schedule]"
            }
        }
    }
}

/// Input to a lesson transformation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformationRequest {
    pub content: String,
}

/// The five renderings of one lesson. Every field is always present; an
/// absent or empty section is an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformationResult {
    pub visual: String,
    pub hearing: String,
    pub dyslexia: String,
    pub adhd: String,
    pub study_plan: String,
}

impl TransformationResult {
    /// Returns the text of a single section.
    pub fn section(&self, marker: SectionMarker) -> &str {
        match marker {
            SectionMarker::Visual => &self.visual,
            SectionMarker::Hearing => &self.hearing,
            SectionMarker::Dyslexia => &self.dyslexia,
            SectionMarker::Adhd => &self.adhd,
            SectionMarker::StudyPlan => &self.study_plan,
        }
    }

    fn section_mut(&mut self, marker: SectionMarker) -> &mut String {
        match marker {
            SectionMarker::Visual => &mut self.visual,
            SectionMarker::Hearing => &mut self.hearing,
            SectionMarker::Dyslexia => &mut self.dyslexia,
            SectionMarker::Adhd => &mut self.adhd,
            SectionMarker::StudyPlan => &mut self.study_plan,
        }
    }

    /// Iterates the sections in marker order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionMarker, &str)> + '_ {
        SectionMarker::ALL
            .into_iter()
            .map(move |marker| (marker, self.section(marker)))
    }
}

/// Splits a raw completion into the five sections.
///
/// Each section starts right after the first case-insensitive occurrence of
/// its own marker and ends at the nearest following occurrence of any later
/// marker, or at the end of the input. A marker that never appears leaves its
/// section empty without affecting the others.
pub fn extract_sections(raw: &str) -> TransformationResult {
    // ASCII lowering keeps byte offsets aligned with `raw`.
    let haystack = raw.to_ascii_lowercase();
    let needles: Vec<String> = SectionMarker::ALL
        .iter()
        .map(|marker| marker.literal().to_ascii_lowercase())
        .collect();

    let mut result = TransformationResult::default();
    for (i, marker) in SectionMarker::ALL.into_iter().enumerate() {
        let Some(found) = haystack.find(&needles[i]) else {
            continue;
        };
        let body_start = found + needles[i].len();
        let body_end = needles[i + 1..]
            .iter()
            .filter_map(|next| haystack[body_start..].find(next.as_str()))
            .min()
            .map(|offset| body_start + offset)
            .unwrap_or(raw.len());

        *result.section_mut(marker) = raw[body_start..body_end].trim().to_string();
    }
    result
}

/// Whether a single section carries enough text to be rendered.
pub fn is_usable(section: &str) -> bool {
    section.trim().chars().count() >= MIN_USABLE_SECTION_LEN
}

/// Accepts the extraction if at least one section is usable.
///
/// Partially empty results pass through unchanged; only a result where every
/// section is unusable is rejected, carrying `raw` for diagnostics.
pub fn validate(result: TransformationResult, raw: &str) -> Result<TransformationResult, TransformError> {
    if result.iter().any(|(_, section)| is_usable(section)) {
        Ok(result)
    } else {
        Err(TransformError::Format {
            raw: raw.to_string(),
        })
    }
}
