use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Relative location of the prompt table written by [`BuildFixture::write_prompt_csv`].
pub const PROMPT_CSV: &str = "sources/prompts.csv";
/// Relative location of the prompt list written by [`BuildFixture::write_prompt_json`].
pub const PROMPT_JSON: &str = "sources/prompts.json";

/// Isolated project directory holding local prompt sources and page trees.
pub struct BuildFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl BuildFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {:?}", data_path);

        Self {
            temp_dir,
            data_path,
        }
    }

    pub fn root(&self) -> &Path {
        &self.data_path
    }

    /// Create a file with content, creating parent directories as needed.
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Write an `act,prompt` table at [`PROMPT_CSV`].
    pub fn write_prompt_csv(&self, rows: &[(&str, &str)]) -> PathBuf {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["act", "prompt"])
            .expect("Failed to write header");
        for (act, prompt) in rows {
            writer
                .write_record([act, prompt])
                .expect("Failed to write row");
        }
        let bytes = writer.into_inner().expect("Failed to flush csv");
        let content = String::from_utf8(bytes).expect("csv output is utf-8");
        self.create_file(PROMPT_CSV, &content)
    }

    /// Write a JSON array of `{act, prompt}` objects at [`PROMPT_JSON`].
    pub fn write_prompt_json(&self, rows: &[(&str, &str)]) -> PathBuf {
        let items: Vec<_> = rows
            .iter()
            .map(|(act, prompt)| serde_json::json!({ "act": act, "prompt": prompt }))
            .collect();
        let content = serde_json::to_string_pretty(&items).expect("Failed to encode prompts");
        self.create_file(PROMPT_JSON, &content)
    }

    /// Write a cheat-sheet page, e.g. `tldr/pages/linux/ls.md`.
    pub fn write_page(&self, relative_path: &str, content: &str) -> PathBuf {
        self.create_file(relative_path, content)
    }
}

impl Default for BuildFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for BuildFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}
