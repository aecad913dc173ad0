//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use lessonpress_server::{create_app, AppState, Config};
use std::path::Path;
use tempfile::TempDir;

pub(crate) const DEV_ORIGIN: &str = "http://localhost:3000";

pub(crate) const SEED_SOURCE: &str = r#"export const newsData = [
  {
    id: 'rec001',
    fields: {
      "Headline": "First Story",
      "Slug": "first-story",
      "Level 1 Text": "Line one.\nLine two.",
      "Level 1 Instruction": "Write a full sentence to answer each question.",
      "Date Written": "2024-05-01",
    }
  },
  {
    id: 'rec250',
    fields: {
      "Headline": "Out Of Band",
      "Slug": "out-of-band",
    }
  }
];
"#;

pub(crate) const SEED_TOPICS: &str = "export const articleTopics = {\n  'first-story': 'science',\n};\n";

pub(crate) fn test_config_for_root(content_root: &Path) -> Config {
    let mut config = Config::for_content_root(content_root);
    config.port = 0;
    config
}

pub(crate) fn test_server_for_config(config: Config) -> TestServer {
    let app = create_app(AppState::new(config));
    TestServer::new(app).expect("server")
}

/// Server over a temp content root seeded with two records and a sidecar.
pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    std::fs::write(temp_dir.path().join("newsData.js"), SEED_SOURCE).expect("seed articles");
    std::fs::write(temp_dir.path().join("articleTopics.js"), SEED_TOPICS).expect("seed topics");
    let server = test_server_for_config(test_config_for_root(temp_dir.path()));
    (server, temp_dir)
}

pub(crate) fn file_hash(path: &Path) -> blake3::Hash {
    blake3::hash(&std::fs::read(path).expect("read file"))
}
