//! Article field labels, request payloads, and record read models.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// Highest difficulty level carried by an article.
pub const MAX_LEVEL: u8 = 6;

/// Levels whose records carry an `"Level <N> Instruction"` field.
pub const INSTRUCTION_LEVELS: [u8; 3] = [1, 3, 6];

/// A recognized field key inside a record's `fields` object.
///
/// Keys are matched exactly; a label that merely contains one of these
/// strings is not a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FieldLabel {
    Headline,
    Slug,
    ImageUrl,
    Text(u8),
    Questions(u8),
    Instruction(u8),
    WritingPrompt,
    DateWritten,
}

/// Field order used for every newly built record.
pub const CANONICAL_FIELD_ORDER: [FieldLabel; 22] = [
    FieldLabel::Headline,
    FieldLabel::Slug,
    FieldLabel::ImageUrl,
    FieldLabel::Text(0),
    FieldLabel::Questions(0),
    FieldLabel::Text(1),
    FieldLabel::Questions(1),
    FieldLabel::Instruction(1),
    FieldLabel::Text(2),
    FieldLabel::Questions(2),
    FieldLabel::Text(3),
    FieldLabel::Questions(3),
    FieldLabel::Instruction(3),
    FieldLabel::Text(4),
    FieldLabel::Questions(4),
    FieldLabel::Text(5),
    FieldLabel::Questions(5),
    FieldLabel::Text(6),
    FieldLabel::Questions(6),
    FieldLabel::Instruction(6),
    FieldLabel::WritingPrompt,
    FieldLabel::DateWritten,
];

impl FieldLabel {
    /// Parse an exact field key such as `Level 3 Questions`.
    ///
    /// # Returns
    /// `None` for keys outside the fixed label set.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "Headline" => return Some(Self::Headline),
            "Slug" => return Some(Self::Slug),
            "Image URL" => return Some(Self::ImageUrl),
            "Level 6 Writing Prompt" => return Some(Self::WritingPrompt),
            "Date Written" => return Some(Self::DateWritten),
            _ => {}
        }
        let (level, kind) = key.strip_prefix("Level ")?.split_once(' ')?;
        let mut digits = level.chars();
        let level = digits.next()?.to_digit(10)? as u8;
        if digits.next().is_some() || level > MAX_LEVEL {
            return None;
        }
        match kind {
            "Text" => Some(Self::Text(level)),
            "Questions" => Some(Self::Questions(level)),
            "Instruction" if INSTRUCTION_LEVELS.contains(&level) => Some(Self::Instruction(level)),
            _ => None,
        }
    }

    /// The exact key text written into the source file.
    pub fn label(&self) -> Cow<'static, str> {
        match self {
            Self::Headline => Cow::Borrowed("Headline"),
            Self::Slug => Cow::Borrowed("Slug"),
            Self::ImageUrl => Cow::Borrowed("Image URL"),
            Self::Text(level) => Cow::Owned(format!("Level {} Text", level)),
            Self::Questions(level) => Cow::Owned(format!("Level {} Questions", level)),
            Self::Instruction(level) => Cow::Owned(format!("Level {} Instruction", level)),
            Self::WritingPrompt => Cow::Borrowed("Level 6 Writing Prompt"),
            Self::DateWritten => Cow::Borrowed("Date Written"),
        }
    }
}

impl fmt::Display for FieldLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Field values keyed by label; the store decides how they are laid out.
pub type FieldValues = BTreeMap<FieldLabel, String>;

/// Standard homework instruction for levels that carry one.
pub fn standard_instruction(level: u8) -> Option<&'static str> {
    match level {
        1 | 3 => Some("Write a full sentence to answer each question."),
        6 => Some("Write full sentences to answer each question."),
        _ => None,
    }
}

/// Instruction value derived from the paired level text.
///
/// Empty unless `text` has visible content.
pub fn derived_instruction(level: u8, text: &str) -> String {
    if text.trim().is_empty() {
        return String::new();
    }
    standard_instruction(level).unwrap_or_default().to_string()
}

/// Article field set submitted by the authoring UI.
///
/// Every field is optional. On update, absent fields leave the stored value
/// untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleFields {
    pub id: Option<String>,
    pub headline: Option<String>,
    pub slug: Option<String>,
    pub image_url: Option<String>,
    pub topic: Option<String>,
    pub level0_text: Option<String>,
    pub level0_questions: Option<String>,
    pub level1_text: Option<String>,
    pub level1_questions: Option<String>,
    pub level2_text: Option<String>,
    pub level2_questions: Option<String>,
    pub level3_text: Option<String>,
    pub level3_questions: Option<String>,
    pub level4_text: Option<String>,
    pub level4_questions: Option<String>,
    pub level5_text: Option<String>,
    pub level5_questions: Option<String>,
    pub level6_text: Option<String>,
    pub level6_questions: Option<String>,
    pub level6_writing_prompt: Option<String>,
    pub date_written: Option<String>,
}

impl ArticleFields {
    /// Text supplied for `level`, if any.
    pub fn text(&self, level: u8) -> Option<&str> {
        let value = match level {
            0 => &self.level0_text,
            1 => &self.level1_text,
            2 => &self.level2_text,
            3 => &self.level3_text,
            4 => &self.level4_text,
            5 => &self.level5_text,
            6 => &self.level6_text,
            _ => return None,
        };
        value.as_deref()
    }

    /// Questions supplied for `level`, if any.
    pub fn questions(&self, level: u8) -> Option<&str> {
        let value = match level {
            0 => &self.level0_questions,
            1 => &self.level1_questions,
            2 => &self.level2_questions,
            3 => &self.level3_questions,
            4 => &self.level4_questions,
            5 => &self.level5_questions,
            6 => &self.level6_questions,
            _ => return None,
        };
        value.as_deref()
    }

    /// Value the caller supplied directly for `label`.
    ///
    /// Instruction fields are never supplied; they are derived.
    pub fn supplied(&self, label: FieldLabel) -> Option<&str> {
        match label {
            FieldLabel::Headline => self.headline.as_deref(),
            FieldLabel::Slug => self.slug.as_deref(),
            FieldLabel::ImageUrl => self.image_url.as_deref(),
            FieldLabel::Text(level) => self.text(level),
            FieldLabel::Questions(level) => self.questions(level),
            FieldLabel::Instruction(_) => None,
            FieldLabel::WritingPrompt => self.level6_writing_prompt.as_deref(),
            FieldLabel::DateWritten => self.date_written.as_deref(),
        }
    }

    /// Values to write on update: supplied fields plus instructions whose
    /// paired text was supplied.
    pub fn update_values(&self) -> FieldValues {
        CANONICAL_FIELD_ORDER
            .iter()
            .filter_map(|label| {
                let value = match *label {
                    FieldLabel::Instruction(level) => self
                        .text(level)
                        .map(|text| derived_instruction(level, text)),
                    other => self.supplied(other).map(str::to_string),
                }?;
                Some((*label, value))
            })
            .collect()
    }

    /// Complete value set for a new record.
    ///
    /// # Arguments
    /// - `today`: Date used when `dateWritten` is missing or blank.
    pub fn create_values(&self, today: &str) -> FieldValues {
        let mut values = self.update_values();
        for label in CANONICAL_FIELD_ORDER {
            let entry = values.entry(label).or_default();
            if label == FieldLabel::DateWritten && entry.trim().is_empty() {
                *entry = today.to_string();
            }
        }
        values
    }
}

/// Save mode requested by the authoring UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveMode {
    Create,
    Update,
}

impl SaveMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
        }
    }
}

/// Request payload for `POST /api/articles/save`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveRequest {
    pub article_data: Option<ArticleFields>,
    pub mode: Option<SaveMode>,
    pub file_location: Option<String>,
}

/// Successful save response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResponse {
    pub success: bool,
    pub message: String,
    pub id: String,
    pub mode: SaveMode,
    pub requires_reload: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// One stored record as read back from the source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleRecord {
    pub id: String,
    #[serde(serialize_with = "serialize_ordered_fields")]
    pub fields: Vec<(String, String)>,
}

impl ArticleRecord {
    /// First value stored under the exact key `label`.
    pub fn field(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key == label)
            .map(|(_, value)| value.as_str())
    }
}

fn serialize_ordered_fields<S>(fields: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(fields.len()))?;
    for (key, value) in fields {
        map.serialize_entry(key, value)?;
    }
    map.end()
}

/// Lightweight listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleSummary {
    pub id: String,
    pub headline: String,
    pub slug: String,
}

impl From<&ArticleRecord> for ArticleSummary {
    fn from(value: &ArticleRecord) -> Self {
        Self {
            id: value.id.clone(),
            headline: value.field("Headline").unwrap_or_default().to_string(),
            slug: value.field("Slug").unwrap_or_default().to_string(),
        }
    }
}
