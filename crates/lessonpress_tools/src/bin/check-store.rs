//! Article source file checker: parses the file and reports id health.

use clap::Parser;
use lessonpress_core::store::ids::{next_id, record_number};
use lessonpress_core::store::SourceDocument;
use lessonpress_core::{Config, IdRange};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "check-store",
    about = "Parse an article source file and report duplicate and out-of-range ids"
)]
struct Args {
    /// Source file to check (defaults to ARTICLES_FILE / CONTENT_ROOT)
    #[arg(long)]
    file: Option<PathBuf>,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Exit non-zero when duplicate ids are present
    #[arg(long)]
    strict: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct StoreReport {
    records: usize,
    duplicate_ids: Vec<String>,
    out_of_range_ids: Vec<String>,
    next_id: String,
}

fn build_report(document: &SourceDocument, range: IdRange) -> StoreReport {
    let mut seen: BTreeMap<&str, usize> = BTreeMap::new();
    for id in document.ids() {
        *seen.entry(id).or_default() += 1;
    }
    let duplicate_ids = seen
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(id, _)| id.to_string())
        .collect();
    let out_of_range_ids = document
        .ids()
        .filter(|id| !record_number(id).is_some_and(|number| range.contains(number)))
        .map(str::to_string)
        .collect();
    StoreReport {
        records: document.records.len(),
        duplicate_ids,
        out_of_range_ids,
        next_id: next_id(document.ids(), range),
    }
}

fn run(args: Args) -> Result<(), String> {
    let config = Config::from_env();
    let path = args.file.unwrap_or(config.articles_path);
    let text = std::fs::read_to_string(&path)
        .map_err(|err| format!("cannot read {}: {}", path.display(), err))?;
    let document = SourceDocument::parse(&text).map_err(|err| err.to_string())?;
    let report = build_report(&document, config.id_range);

    if args.json {
        let rendered = serde_json::to_string_pretty(&report).map_err(|err| err.to_string())?;
        println!("{}", rendered);
    } else {
        println!("{}: {} record(s)", path.display(), report.records);
        println!("next id: {}", report.next_id);
        if !report.duplicate_ids.is_empty() {
            println!("duplicate ids: {}", report.duplicate_ids.join(", "));
        }
        if !report.out_of_range_ids.is_empty() {
            println!(
                "ids outside {}..={}: {}",
                config.id_range.min,
                config.id_range.max,
                report.out_of_range_ids.join(", ")
            );
        }
    }

    if args.strict && !report.duplicate_ids.is_empty() {
        return Err(format!(
            "{} duplicate id(s) found",
            report.duplicate_ids.len()
        ));
    }
    Ok(())
}

fn main() {
    let args = Args::parse();

    if let Err(message) = run(args) {
        eprintln!("error: {}", message);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::build_report;
    use lessonpress_core::store::SourceDocument;
    use lessonpress_core::IdRange;

    #[test]
    fn report_flags_duplicates_and_foreign_ids() {
        let source = "export const newsData = [\n  { id: 'rec002', fields: {} },\n  { id: 'rec002', fields: {} },\n  { id: 'rec900', fields: {} },\n  { id: 'draft', fields: {} }\n];\n";
        let document = SourceDocument::parse(source).expect("parse");
        let report = build_report(&document, IdRange::default());
        assert_eq!(report.records, 4);
        assert_eq!(report.duplicate_ids, vec!["rec002"]);
        assert_eq!(report.out_of_range_ids, vec!["rec900", "draft"]);
        assert_eq!(report.next_id, "rec003");
    }
}
