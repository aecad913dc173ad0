//! Bulk importer that regenerates the article source file from plain-text
//! lesson exports.
//!
//! # Usage
//!
//! ```bash
//! # Read exports from ./lessons and write ./src/data/newsData.js
//! cargo run -p lessonpress_tools --bin import-lessons -- --input lessons
//!
//! # Overwrite an existing source file somewhere else
//! cargo run -p lessonpress_tools --bin import-lessons -- \
//!     --input lessons --output /tmp/newsData.js --force
//! ```

use anyhow::Context;
use clap::Parser;
use lessonpress_core::import::{parse_lesson_file, render_articles, LessonFile};
use lessonpress_core::store::writer;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walkdir::WalkDir;

/// Lesson export importer for LessonPress.
#[derive(Debug, Parser)]
#[command(
    name = "import-lessons",
    about = "Generate the article source file from 'Lvl <N> <Title>.txt' lesson exports"
)]
struct Args {
    /// Directory scanned recursively for lesson exports
    #[arg(short, long)]
    input: PathBuf,

    /// Source file to write
    #[arg(short, long, default_value = "src/data/newsData.js")]
    output: PathBuf,

    /// Replace the output file if it already exists
    #[arg(long)]
    force: bool,
}

fn is_lesson_export(path: &Path) -> bool {
    let has_txt_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
    let has_level_prefix = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with("Lvl "));
    has_txt_extension && has_level_prefix
}

/// Parse every lesson export under `input`, in path order.
fn collect_lessons(input: &Path) -> anyhow::Result<Vec<LessonFile>> {
    let mut lessons = Vec::new();
    for entry in WalkDir::new(input).sort_by_file_name() {
        let entry = entry.with_context(|| format!("walking {}", input.display()))?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_lesson_export(path) {
            continue;
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let file_name = entry.file_name().to_string_lossy();
        match parse_lesson_file(&file_name, &raw) {
            Some(lesson) => {
                tracing::info!(
                    "Processed {} -> {} (Level {})",
                    file_name,
                    lesson.slug,
                    lesson.level
                );
                lessons.push(lesson);
            }
            None => tracing::warn!("Skipping {}: no level prefix or empty text", file_name),
        }
    }
    Ok(lessons)
}

fn run(args: &Args) -> anyhow::Result<usize> {
    if !args.input.is_dir() {
        anyhow::bail!("input directory does not exist: {}", args.input.display());
    }
    if args.output.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; pass --force to replace it",
            args.output.display()
        );
    }

    let lessons = collect_lessons(&args.input)?;
    if lessons.is_empty() {
        anyhow::bail!("no lesson exports found under {}", args.input.display());
    }
    let (count, source) = render_articles(lessons);

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }
    writer::commit(&args.output, &source)
        .with_context(|| format!("writing {}", args.output.display()))?;
    Ok(count)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lessonpress=info,import_lessons=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let count = run(&args)?;
    println!(
        "Wrote {} article(s) to {}",
        count,
        args.output.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{is_lesson_export, run, Args};
    use lessonpress_core::store::SourceDocument;
    use std::path::Path;
    use tempfile::TempDir;

    fn write_lessons(dir: &Path) {
        std::fs::create_dir_all(dir.join("nested")).expect("mkdir");
        std::fs::write(
            dir.join("Lvl 1 Big Cat _ Breaking News English.txt"),
            "Big Cat Seen\nA big cat was seen.\nHomework:\nWrite a full sentence to answer each question.\n1. What was seen?\n",
        )
        .expect("write level 1");
        std::fs::write(
            dir.join("nested/Lvl 3 Big Cat _ Breaking News English.txt"),
            "Big Cat Spotted In Town\nPeople saw a big cat.\n",
        )
        .expect("write level 3");
        std::fs::write(dir.join("readme.txt"), "not a lesson").expect("write readme");
    }

    #[test]
    fn is_lesson_export_requires_prefix_and_txt() {
        assert!(is_lesson_export(Path::new("a/Lvl 6 Title.txt")));
        assert!(!is_lesson_export(Path::new("a/Lvl 6 Title.docx")));
        assert!(!is_lesson_export(Path::new("a/Title.txt")));
    }

    #[test]
    fn run_merges_levels_into_one_record() {
        let input = TempDir::new().expect("input dir");
        let output_dir = TempDir::new().expect("output dir");
        write_lessons(input.path());
        let args = Args {
            input: input.path().to_path_buf(),
            output: output_dir.path().join("data/newsData.js"),
            force: false,
        };

        assert_eq!(run(&args).expect("import"), 1);
        let source = std::fs::read_to_string(&args.output).expect("read output");
        let document = SourceDocument::parse(&source).expect("parse output");
        let record = document.locate("rec001").expect("record").to_record();
        assert_eq!(record.field("Slug"), Some("big-cat"));
        assert_eq!(record.field("Headline"), Some("Big Cat Spotted In Town"));
        assert_eq!(record.field("Level 1 Questions"), Some("1. What was seen?"));

        let err = run(&args).expect_err("existing output without --force");
        assert!(err.to_string().contains("--force"));
        let forced = Args { force: true, ..args };
        assert_eq!(run(&forced).expect("forced import"), 1);
    }

    #[test]
    fn run_rejects_empty_input() {
        let input = TempDir::new().expect("input dir");
        let args = Args {
            input: input.path().to_path_buf(),
            output: input.path().join("newsData.js"),
            force: false,
        };
        let err = run(&args).expect_err("no lessons");
        assert!(err.to_string().contains("no lesson exports"));
    }
}
