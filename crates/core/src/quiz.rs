//! Focus-Check Quiz Shapes and Parser
//!
//! A quiz generator answers in one of two shapes: a structured JSON object
//! with a single question, or freeform numbered text. Both are resolved here,
//! once, into a tagged [`ParsedQuiz`] so nothing downstream inspects the raw
//! shape again.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Number of options a structured quiz must carry.
pub const STRUCTURED_OPTION_COUNT: usize = 4;

/// Which quiz protocol the generator is asked to follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuizFormat {
    #[default]
    Structured,
    Freeform,
}

impl FromStr for QuizFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "structured" | "json" => Ok(QuizFormat::Structured),
            "freeform" | "text" => Ok(QuizFormat::Freeform),
            other => Err(format!("'{}' is not a quiz format", other)),
        }
    }
}

/// A single renderable question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizBlock {
    pub question: String,
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_index: Option<usize>,
}

impl QuizBlock {
    /// Whether `option` is the known correct answer. `None` when the block
    /// does not know its answer or the index is out of range.
    pub fn is_correct(&self, option: usize) -> Option<bool> {
        if option >= self.options.len() {
            return None;
        }
        self.correct_index.map(|correct| correct == option)
    }
}

/// The structured quiz wire schema: `{ "q", "options", "correctIndex" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredQuiz {
    pub q: String,
    pub options: Vec<String>,
    #[serde(rename = "correctIndex")]
    pub correct_index: usize,
}

impl StructuredQuiz {
    /// Checks the declared schema: non-empty question, exactly four options,
    /// and an answer index pointing at one of them.
    pub fn is_well_formed(&self) -> bool {
        !self.q.trim().is_empty()
            && self.options.len() == STRUCTURED_OPTION_COUNT
            && self.correct_index < self.options.len()
    }
}

/// Raw generator output in one of its two accepted shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuizOutput {
    Structured(StructuredQuiz),
    Freeform(String),
}

impl QuizOutput {
    /// Normalizes a loosely shaped quiz response into a typed output.
    ///
    /// Candidates are probed in this order and the first present one wins:
    /// 1. the `question` field,
    /// 2. the `question` field nested under `result`,
    /// 3. the `result` field,
    /// 4. the value itself.
    ///
    /// A string candidate becomes [`QuizOutput::Freeform`]; an object
    /// candidate must deserialize as a [`StructuredQuiz`]. Anything else,
    /// including a winning candidate of the wrong shape, yields `None`.
    pub fn from_value(value: Value) -> Option<QuizOutput> {
        let probed = [
            value.get("question"),
            value.get("result").and_then(|r| r.get("question")),
            value.get("result"),
        ]
        .into_iter()
        .flatten()
        .find(|v| is_present(v))
        .cloned();
        let candidate = probed.unwrap_or(value);

        match candidate {
            Value::String(text) if !text.trim().is_empty() => Some(QuizOutput::Freeform(text)),
            Value::Object(_) => serde_json::from_value::<StructuredQuiz>(candidate)
                .ok()
                .map(QuizOutput::Structured),
            _ => None,
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null | Value::Bool(false) => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// A quiz resolved into renderable blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedQuiz {
    Structured(QuizBlock),
    Freeform(Vec<QuizBlock>),
}

impl ParsedQuiz {
    /// All blocks, in display order.
    pub fn blocks(&self) -> &[QuizBlock] {
        match self {
            ParsedQuiz::Structured(block) => std::slice::from_ref(block),
            ParsedQuiz::Freeform(blocks) => blocks,
        }
    }

    pub fn into_blocks(self) -> Vec<QuizBlock> {
        match self {
            ParsedQuiz::Structured(block) => vec![block],
            ParsedQuiz::Freeform(blocks) => blocks,
        }
    }
}

/// Resolves generator output into blocks. Never fails.
pub fn parse_quiz(output: &QuizOutput) -> ParsedQuiz {
    match output {
        QuizOutput::Structured(quiz) => ParsedQuiz::Structured(QuizBlock {
            question: quiz.q.clone(),
            options: quiz.options.clone(),
            correct_index: Some(quiz.correct_index),
        }),
        QuizOutput::Freeform(text) => ParsedQuiz::Freeform(parse_freeform(text)),
    }
}

/// Splits numbered quiz text into blocks.
///
/// A new block starts at every line beginning with `<digits>.`. The first line
/// of a block is its question and the remaining non-blank lines its options.
/// Blocks without any option line are dropped.
pub fn parse_freeform(text: &str) -> Vec<QuizBlock> {
    let mut groups: Vec<Vec<&str>> = Vec::new();
    for line in text.lines() {
        if groups.is_empty() || starts_numbered_item(line) {
            groups.push(Vec::new());
        }
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            if let Some(group) = groups.last_mut() {
                group.push(trimmed);
            }
        }
    }

    groups
        .into_iter()
        .filter(|lines| lines.len() >= 2)
        .map(|lines| QuizBlock {
            question: lines[0].to_string(),
            options: lines[1..].iter().map(|s| s.to_string()).collect(),
            correct_index: None,
        })
        .collect()
}

fn starts_numbered_item(line: &str) -> bool {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && line.as_bytes().get(digits) == Some(&b'.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_freeform_single_block() {
        let blocks = parse_freeform("1. What color is the sky?\nBlue\nGreen");
        assert_eq!(
            blocks,
            vec![QuizBlock {
                question: "1. What color is the sky?".to_string(),
                options: vec!["Blue".to_string(), "Green".to_string()],
                correct_index: None,
            }]
        );
    }

    #[test]
    fn test_freeform_discards_question_without_options() {
        let text = "1. Orphan question?\n2. What is H2O?\nWater\nSalt\n\n3. Last one?";
        let blocks = parse_freeform(text);

        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].question, "2. What is H2O?");
        assert_eq!(blocks[0].options, vec!["Water", "Salt"]);
    }

    #[test]
    fn test_freeform_skips_blank_lines_and_crlf() {
        let blocks = parse_freeform("1. Pick one\r\n\r\nA\r\n   \r\nB\r\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].options, vec!["A", "B"]);
    }

    #[test]
    fn test_freeform_multi_digit_numbering() {
        let blocks = parse_freeform("10. Tenth?\nyes\nno\n11. Eleventh?\nmaybe");
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1].question, "11. Eleventh?");
    }

    #[test]
    fn test_freeform_preamble_without_options_is_dropped() {
        let blocks = parse_freeform("Here is your quiz:\n1. Q?\nA\nB");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].question, "1. Q?");
    }

    #[test]
    fn test_freeform_empty_text() {
        assert!(parse_freeform("").is_empty());
        assert!(parse_freeform("\n\n").is_empty());
    }

    #[test]
    fn test_numbered_item_detection() {
        assert!(starts_numbered_item("1. a"));
        assert!(starts_numbered_item("42."));
        assert!(!starts_numbered_item(" 1. indented"));
        assert!(!starts_numbered_item("1) paren"));
        assert!(!starts_numbered_item("A. letter"));
    }

    #[test]
    fn test_structured_parses_to_one_block() {
        let output = QuizOutput::Structured(StructuredQuiz {
            q: "Which organelle makes ATP?".to_string(),
            options: vec!["Nucleus", "Mitochondria", "Ribosome", "Golgi"]
                .into_iter()
                .map(String::from)
                .collect(),
            correct_index: 1,
        });

        let parsed = parse_quiz(&output);
        assert_eq!(parsed.blocks().len(), 1);
        let block = &parsed.blocks()[0];
        assert_eq!(block.correct_index, Some(1));
        assert_eq!(block.is_correct(1), Some(true));
        assert_eq!(block.is_correct(0), Some(false));
        assert_eq!(block.is_correct(9), None);
    }

    #[test]
    fn test_normalize_prefers_question_field() {
        let value = json!({
            "question": "1. Q?\nA\nB",
            "result": { "question": "ignored" }
        });
        assert_eq!(
            QuizOutput::from_value(value),
            Some(QuizOutput::Freeform("1. Q?\nA\nB".to_string()))
        );
    }

    #[test]
    fn test_normalize_nested_result_question() {
        let value = json!({ "result": { "question": "1. Nested?\nA\nB" } });
        assert_eq!(
            QuizOutput::from_value(value),
            Some(QuizOutput::Freeform("1. Nested?\nA\nB".to_string()))
        );
    }

    #[test]
    fn test_normalize_result_object_and_bare_object() {
        let quiz = json!({ "q": "Q?", "options": ["a", "b", "c", "d"], "correctIndex": 2 });

        let wrapped = QuizOutput::from_value(json!({ "result": quiz.clone() }));
        let bare = QuizOutput::from_value(quiz);

        assert!(matches!(wrapped, Some(QuizOutput::Structured(ref q)) if q.correct_index == 2));
        assert_eq!(wrapped, bare);
    }

    #[test]
    fn test_normalize_skips_empty_candidates() {
        let value = json!({ "question": "", "result": "1. Q?\nA" });
        assert_eq!(
            QuizOutput::from_value(value),
            Some(QuizOutput::Freeform("1. Q?\nA".to_string()))
        );
    }

    #[test]
    fn test_normalize_rejects_unusable_shapes() {
        assert_eq!(QuizOutput::from_value(json!(42)), None);
        assert_eq!(QuizOutput::from_value(json!({ "unexpected": true })), None);
        assert_eq!(QuizOutput::from_value(json!("   ")), None);
    }

    #[test]
    fn test_structured_schema_check() {
        let mut quiz = StructuredQuiz {
            q: "Q?".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 3,
        };
        assert!(quiz.is_well_formed());

        quiz.correct_index = 4;
        assert!(!quiz.is_well_formed());

        quiz.correct_index = 0;
        quiz.options.pop();
        assert!(!quiz.is_well_formed());
    }

    #[test]
    fn test_output_serializes_in_wire_shape() {
        let structured = QuizOutput::Structured(StructuredQuiz {
            q: "Q?".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index: 0,
        });
        let json = serde_json::to_value(&structured).unwrap();
        assert_eq!(json["correctIndex"], 0);
        assert_eq!(json["q"], "Q?");

        let freeform = serde_json::to_value(QuizOutput::Freeform("1. Q?".into())).unwrap();
        assert_eq!(freeform, json!("1. Q?"));
    }

    #[test]
    fn test_quiz_format_from_str() {
        assert_eq!("structured".parse::<QuizFormat>(), Ok(QuizFormat::Structured));
        assert_eq!("FREEFORM".parse::<QuizFormat>(), Ok(QuizFormat::Freeform));
        assert!("yaml".parse::<QuizFormat>().is_err());
    }
}
