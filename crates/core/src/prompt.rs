//! Prompt Construction
//!
//! Pure formatters for the instructions sent to the completion service. The
//! transform prompt lists its markers from [`SectionMarker::ALL`], the same
//! table the extractor searches for.

use crate::{quiz::QuizFormat, sections::SectionMarker};
use std::fmt::Write;

/// Maximum number of lesson characters embedded in a quiz prompt.
pub const QUIZ_CONTENT_LIMIT: usize = 2000;

/// Builds the system prompt for the five-section transformation.
pub fn transform_system_prompt() -> String {
    let mut prompt = String::from(
        "You are EduAccess AI, an accessibility-focused educational transformer.\n\n\
         Transform the user content into FIVE clearly separated sections.\n\n\
         Use EXACTLY this format:\n\n",
    );
    for marker in SectionMarker::ALL {
        let _ = write!(prompt, "{}\n{}\n\n", marker.literal(), marker.guidance());
    }
    prompt.push_str(
        "Rules:\n\
         - DO NOT add commentary.\n\
         - DO NOT wrap in markdown.\n\
         - DO NOT add backticks.\n\
         - Put every section marker on its own line.\n\
         - Follow section markers EXACTLY.\n",
    );
    prompt
}

/// Builds the user prompt for a single focus-check quiz.
///
/// `content` is embedded verbatim; callers truncate it beforehand if needed.
pub fn quiz_prompt(content: &str, format: QuizFormat) -> String {
    match format {
        QuizFormat::Structured => format!(
            "Create ONE short multiple-choice focus recovery question from this content.\n\n\
             Rules:\n\
             - 1 question only\n\
             - 4 options\n\
             - Return ONLY valid JSON\n\
             Format:\n\
             {{\n  \"q\": \"question\",\n  \"options\": [\"A\", \"B\", \"C\", \"D\"],\n  \"correctIndex\": 0\n}}\n\n\
             Content:\n{content}\n"
        ),
        QuizFormat::Freeform => format!(
            "Create ONE short multiple-choice focus recovery question from this content.\n\n\
             Rules:\n\
             - Start the question on its own line with \"1.\"\n\
             - Put each of the 4 options on its own line below the question\n\
             - Do not number the options\n\
             - Return ONLY the question and options, no commentary\n\n\
             Content:\n{content}\n"
        ),
    }
}

/// Builds the tutor prompt answering a learner's question about a lesson.
pub fn tutor_prompt(lesson: &str, question: &str) -> String {
    format!(
        "You are an AI learning tutor.\nExplain clearly and simply.\n\n\
         Lesson:\n{lesson}\n\nStudent Question:\n{question}\n"
    )
}

/// Returns at most `limit` characters of `content`, cut on a char boundary.
pub fn truncate_chars(content: &str, limit: usize) -> &str {
    match content.char_indices().nth(limit) {
        Some((idx, _)) => &content[..idx],
        None => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::extract_sections;

    #[test]
    fn test_transform_prompt_lists_every_marker_on_its_own_line() {
        let prompt = transform_system_prompt();
        let lines: Vec<&str> = prompt.lines().collect();
        for marker in SectionMarker::ALL {
            assert!(
                lines.contains(&marker.literal()),
                "marker {} missing from prompt",
                marker.literal()
            );
        }
    }

    #[test]
    fn test_transform_prompt_markers_are_in_wire_order() {
        let prompt = transform_system_prompt();
        let positions: Vec<usize> = SectionMarker::ALL
            .iter()
            .map(|m| prompt.find(m.literal()).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_extractor_reads_the_prompt_template_itself() {
        // Echoing the template back must populate every section with its guidance.
        let result = extract_sections(&transform_system_prompt());
        for marker in SectionMarker::ALL.into_iter().take(4) {
            assert_eq!(result.section(marker), marker.guidance());
        }
        assert!(result.study_plan.starts_with(SectionMarker::StudyPlan.guidance()));
    }

    #[test]
    fn test_prompts_are_deterministic() {
        assert_eq!(transform_system_prompt(), transform_system_prompt());
        assert_eq!(
            quiz_prompt("cells", QuizFormat::Structured),
            quiz_prompt("cells", QuizFormat::Structured)
        );
    }

    #[test]
    fn test_quiz_prompt_embeds_content_and_schema() {
        let prompt = quiz_prompt("Mitochondria produce ATP.", QuizFormat::Structured);
        assert!(prompt.contains("Mitochondria produce ATP."));
        assert!(prompt.contains("\"correctIndex\": 0"));

        let freeform = quiz_prompt("Mitochondria produce ATP.", QuizFormat::Freeform);
        assert!(freeform.contains("\"1.\""));
        assert!(!freeform.contains("correctIndex"));
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("héllo", 2), "hé");
    }
}
