//! Bulk import of plain-text lesson exports into a fresh source file.
//!
//! Each export holds one article at one level and is named
//! `Lvl <N> <Title> _ Breaking News English.txt`. Files sharing a title are
//! merged into one record.

use crate::models::article::{FieldLabel, FieldValues, INSTRUCTION_LEVELS, MAX_LEVEL};
use crate::store::builder::render_source;
use crate::store::ids::format_record_id;
use std::collections::BTreeMap;

const HOMEWORK_MARKER: &str = "Homework:";
const PUBLISHER_SUFFIX: &str = "Breaking News English";

/// Markers that open the level 6 writing prompt, in priority order.
pub const WRITING_MARKERS: [&str; 3] = ["Free Writing", "Academic Writing", "Writing Practice"];

/// Markers identifying the homework instruction line, in priority order.
pub const INSTRUCTION_MARKERS: [&str; 5] = [
    "Write a full sentence",
    "Write a full-sentence",
    "Answer each question",
    "Write full sentences",
    "In your Vocab Notebook",
];

/// Levels whose headline names the article, most preferred first.
const HEADLINE_PREFERENCE: [u8; 3] = [3, 1, 6];

/// Parsed content of one level of one article.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelContent {
    pub headline: String,
    pub article_text: String,
    pub instruction: String,
    pub questions: String,
    pub writing_prompt: String,
}

/// One lesson export after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonFile {
    pub level: u8,
    pub slug: String,
    pub content: LevelContent,
}

/// All levels imported for one slug.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportedArticle {
    pub slug: String,
    pub levels: BTreeMap<u8, LevelContent>,
}

/// Extract the level and slug from an export file name.
///
/// # Returns
/// `None` when the name lacks the `Lvl <N>` prefix.
pub fn parse_filename(file_name: &str) -> Option<(u8, String)> {
    let stem = file_name.strip_suffix(".txt").unwrap_or(file_name);
    let rest = stem.strip_prefix("Lvl ")?;
    let digits_end = rest
        .find(|ch: char| !ch.is_ascii_digit())
        .unwrap_or(rest.len());
    let level = rest[..digits_end].parse::<u8>().ok()?;

    let mut title = rest[digits_end..].trim_start();
    if let Some(index) = title.find(PUBLISHER_SUFFIX) {
        let head = title[..index].trim_end();
        if let Some(stripped) = head.strip_suffix('_') {
            title = stripped.trim_end();
        }
    }
    Some((level, slugify(title)))
}

/// Lowercase `title`, drop everything but ASCII alphanumerics, whitespace and
/// `-`, and join the words with `-`.
pub fn slugify(title: &str) -> String {
    let kept: String = title
        .chars()
        .filter(|ch| ch.is_ascii_alphanumeric() || ch.is_whitespace() || *ch == '-')
        .collect::<String>()
        .to_lowercase();
    kept.split_whitespace().collect::<Vec<_>>().join("-")
}

/// Trim every line and drop blank ones.
pub fn normalize_lesson_text(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Split one level's text into article text, homework and writing prompt.
pub fn parse_level_content(text: &str, level: u8) -> LevelContent {
    let headline = text.lines().next().unwrap_or_default().trim().to_string();
    let Some(homework_at) = text.find(HOMEWORK_MARKER) else {
        return LevelContent {
            headline,
            article_text: text.trim().to_string(),
            ..LevelContent::default()
        };
    };

    let article_text = text[..homework_at].trim().to_string();
    let mut homework = text[homework_at + HOMEWORK_MARKER.len()..].trim();
    let mut writing_prompt = String::new();
    if level == MAX_LEVEL {
        // ASCII lowercasing keeps byte offsets aligned with `homework`.
        let lowered = homework.to_ascii_lowercase();
        let split = WRITING_MARKERS
            .iter()
            .find_map(|marker| lowered.find(&marker.to_ascii_lowercase()));
        if let Some(index) = split {
            writing_prompt = homework[index..].trim().to_string();
            homework = homework[..index].trim();
        }
    }

    let (instruction, questions) = extract_instruction_and_questions(homework);
    LevelContent {
        headline,
        article_text,
        instruction,
        questions,
        writing_prompt,
    }
}

/// Find the instruction line in `homework`; the lines after it are the
/// questions.
///
/// Markers are tried in priority order. Without a match the instruction is
/// empty and the whole homework is returned as questions.
pub fn extract_instruction_and_questions(homework: &str) -> (String, String) {
    let lines: Vec<&str> = homework.split('\n').collect();
    for marker in INSTRUCTION_MARKERS {
        let marker = marker.to_lowercase();
        if let Some(index) = lines
            .iter()
            .position(|line| line.to_lowercase().contains(&marker))
        {
            let questions = lines[index + 1..].join("\n").trim().to_string();
            return (lines[index].trim().to_string(), questions);
        }
    }
    (String::new(), homework.to_string())
}

/// Parse one export given its file name and raw contents.
///
/// # Returns
/// `None` for names without a level prefix or files without text.
pub fn parse_lesson_file(file_name: &str, raw: &str) -> Option<LessonFile> {
    let (level, slug) = parse_filename(file_name)?;
    let text = normalize_lesson_text(raw);
    if text.is_empty() {
        return None;
    }
    Some(LessonFile {
        level,
        slug,
        content: parse_level_content(&text, level),
    })
}

impl ImportedArticle {
    /// Headline taken from the most preferred level present.
    pub fn headline(&self) -> &str {
        HEADLINE_PREFERENCE
            .iter()
            .find_map(|level| self.levels.get(level))
            .map(|content| content.headline.as_str())
            .unwrap_or_default()
    }

    /// Field values for the record; instructions come from the exports
    /// verbatim rather than being derived.
    pub fn field_values(&self) -> FieldValues {
        let mut values = FieldValues::new();
        values.insert(FieldLabel::Headline, self.headline().to_string());
        values.insert(FieldLabel::Slug, self.slug.clone());
        for (&level, content) in &self.levels {
            values.insert(FieldLabel::Text(level), content.article_text.clone());
            values.insert(FieldLabel::Questions(level), content.questions.clone());
            if INSTRUCTION_LEVELS.contains(&level) {
                values.insert(FieldLabel::Instruction(level), content.instruction.clone());
            }
            if level == MAX_LEVEL {
                values.insert(FieldLabel::WritingPrompt, content.writing_prompt.clone());
            }
        }
        values
    }
}

/// Group exports by slug, in slug order.
///
/// A later export for the same slug and level replaces an earlier one. Levels
/// above the highest supported level are dropped.
pub fn group_by_slug(files: impl IntoIterator<Item = LessonFile>) -> Vec<ImportedArticle> {
    let mut grouped: BTreeMap<String, ImportedArticle> = BTreeMap::new();
    for file in files {
        if file.level > MAX_LEVEL {
            tracing::warn!(level = file.level, slug = %file.slug, "Skipping unsupported level");
            continue;
        }
        let article = grouped
            .entry(file.slug.clone())
            .or_insert_with(|| ImportedArticle {
                slug: file.slug.clone(),
                levels: BTreeMap::new(),
            });
        if article.levels.insert(file.level, file.content).is_some() {
            tracing::warn!(level = file.level, slug = %file.slug, "Duplicate export replaced");
        }
    }
    grouped.into_values().collect()
}

/// Assign sequential ids starting at `rec001`.
pub fn assemble(articles: &[ImportedArticle]) -> Vec<(String, FieldValues)> {
    articles
        .iter()
        .enumerate()
        .map(|(index, article)| (format_record_id(index as u32 + 1), article.field_values()))
        .collect()
}

/// Render a complete source file for `files`.
pub fn render_articles(files: impl IntoIterator<Item = LessonFile>) -> (usize, String) {
    let articles = group_by_slug(files);
    let records = assemble(&articles);
    (records.len(), render_source(&records))
}
