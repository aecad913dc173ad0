use super::article::*;

#[test]
fn field_label_parse_round_trips_canonical_order() {
    for label in CANONICAL_FIELD_ORDER {
        assert_eq!(FieldLabel::parse(&label.label()), Some(label), "{}", label);
    }
}

#[test]
fn field_label_parse_rejects_near_misses() {
    for key in [
        "headline",
        "Level 7 Text",
        "Level 2 Instruction",
        "Level 10 Text",
        "Level 1 Text ",
        "Level 1  Text",
        "My Headline",
        "Level 6 Writing prompt",
    ] {
        assert_eq!(FieldLabel::parse(key), None, "key: {:?}", key);
    }
}

#[test]
fn create_values_derive_instructions_from_supplied_text() {
    let fields = ArticleFields {
        headline: Some("Man Swallowed By Whale".to_string()),
        slug: Some("man-swallowed-by-whale".to_string()),
        level1_text: Some("A man survived three days inside a whale.".to_string()),
        ..ArticleFields::default()
    };
    let values = fields.create_values("2026-10-19");

    assert_eq!(values.len(), CANONICAL_FIELD_ORDER.len());
    assert_eq!(
        values[&FieldLabel::Instruction(1)],
        standard_instruction(1).expect("level 1 instruction")
    );
    assert_eq!(values[&FieldLabel::Instruction(3)], "");
    assert_eq!(values[&FieldLabel::Instruction(6)], "");
    assert_eq!(values[&FieldLabel::DateWritten], "2026-10-19");
    assert_eq!(values[&FieldLabel::ImageUrl], "");
}

#[test]
fn update_values_only_cover_supplied_fields() {
    let fields = ArticleFields {
        headline: Some("New headline".to_string()),
        level3_text: Some("   ".to_string()),
        ..ArticleFields::default()
    };
    let values = fields.update_values();

    let labels: Vec<FieldLabel> = values.keys().copied().collect();
    assert_eq!(
        labels,
        vec![
            FieldLabel::Headline,
            FieldLabel::Text(3),
            FieldLabel::Instruction(3),
        ]
    );
    assert_eq!(values[&FieldLabel::Instruction(3)], "");
}

#[test]
fn explicit_date_written_is_kept_on_create() {
    let fields = ArticleFields {
        date_written: Some("2024-02-29".to_string()),
        ..ArticleFields::default()
    };
    assert_eq!(
        fields.create_values("2026-10-19")[&FieldLabel::DateWritten],
        "2024-02-29"
    );
}

#[test]
fn save_request_deserializes_camel_case_payload() {
    let request: SaveRequest = serde_json::from_value(serde_json::json!({
        "articleData": {
            "headline": "H",
            "slug": "h",
            "level6WritingPrompt": "Write about whales.",
            "imageUrl": "https://example.com/whale.png"
        },
        "mode": "create",
        "fileLocation": "newsData.js"
    }))
    .expect("request");

    assert_eq!(request.mode, Some(SaveMode::Create));
    let fields = request.article_data.expect("article data");
    assert_eq!(
        fields.supplied(FieldLabel::WritingPrompt),
        Some("Write about whales.")
    );
    assert_eq!(
        fields.supplied(FieldLabel::ImageUrl),
        Some("https://example.com/whale.png")
    );
}

#[test]
fn article_record_serializes_fields_in_file_order() {
    let record = ArticleRecord {
        id: "rec002".to_string(),
        fields: vec![
            ("Slug".to_string(), "b".to_string()),
            ("Headline".to_string(), "a".to_string()),
        ],
    };
    let json = serde_json::to_string(&record).expect("json");
    assert_eq!(json, r#"{"id":"rec002","fields":{"Slug":"b","Headline":"a"}}"#);
    assert_eq!(
        ArticleSummary::from(&record),
        ArticleSummary {
            id: "rec002".to_string(),
            headline: "a".to_string(),
            slug: "b".to_string(),
        }
    );
}
