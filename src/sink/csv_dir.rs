//! CSV-backed sink: one file per table under a directory.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::Result;
use crate::sink::{TableSpec, TabularSink};

pub struct CsvDirSink {
    dir: PathBuf,
}

impl CsvDirSink {
    pub fn new<P: AsRef<Path>>(dir: P) -> Result<Self> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self {
            dir: dir.as_ref().to_path_buf(),
        })
    }

    fn table_path(&self, spec: &TableSpec) -> PathBuf {
        self.dir.join(format!("{}.csv", spec.name))
    }

    fn read_existing(&self, spec: &TableSpec) -> Result<Vec<Vec<String>>> {
        let path = self.table_path(spec);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_path(&path)?;
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        Ok(rows)
    }
}

impl TabularSink for CsvDirSink {
    fn upsert(&self, spec: &TableSpec, rows: Vec<Vec<String>>) -> Result<usize> {
        let existing = self.read_existing(spec)?;

        // Existing rows keep their position; incoming rows overwrite by key
        // or append in input order.
        let mut ordered_keys: Vec<String> = Vec::with_capacity(existing.len() + rows.len());
        let mut by_key: HashMap<String, Vec<String>> = HashMap::new();
        for row in existing {
            let key = spec.key_of(&row);
            if !by_key.contains_key(&key) {
                ordered_keys.push(key.clone());
            }
            by_key.insert(key, row);
        }
        for row in rows {
            let key = spec.key_of(&row);
            if !by_key.contains_key(&key) {
                ordered_keys.push(key.clone());
            }
            by_key.insert(key, row);
        }

        // Atomic replace: write a sibling temp file, then rename over.
        let path = self.table_path(spec);
        let tmp_path = self.dir.join(format!("{}.csv.tmp", spec.name));
        {
            let mut writer = csv::Writer::from_path(&tmp_path)?;
            writer.write_record(spec.headers)?;
            for key in &ordered_keys {
                writer.write_record(&by_key[key])?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp_path, &path)?;

        debug!(table = spec.name, rows = ordered_keys.len(), "table written");
        Ok(ordered_keys.len())
    }

    fn read_rows(&self, spec: &TableSpec) -> Result<Vec<Vec<String>>> {
        self.read_existing(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::GAMES;

    fn row(date: &str, home: &str, away: &str, status: &str) -> Vec<String> {
        vec![
            date.to_string(),
            home.to_string(),
            away.to_string(),
            "4".to_string(),
            "2".to_string(),
            status.to_string(),
            home.to_string(),
        ]
    }

    #[test]
    fn test_create_if_absent_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvDirSink::new(dir.path()).unwrap();

        assert!(sink.read_rows(&GAMES).unwrap().is_empty());

        let written = sink
            .upsert(&GAMES, vec![row("2025-07-27", "Yankees", "Red Sox", "completed")])
            .unwrap();
        assert_eq!(written, 1);

        let rows = sink.read_rows(&GAMES).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][1], "Yankees");
    }

    #[test]
    fn test_upsert_overwrites_by_key_never_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvDirSink::new(dir.path()).unwrap();

        sink.upsert(&GAMES, vec![row("2025-07-27", "Yankees", "Red Sox", "inprogress")])
            .unwrap();
        // Same key, new status: must replace, not append.
        sink.upsert(&GAMES, vec![row("2025-07-27", "Yankees", "Red Sox", "completed")])
            .unwrap();

        let rows = sink.read_rows(&GAMES).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0][5], "completed");
    }

    #[test]
    fn test_upsert_preserves_unrelated_rows() {
        let dir = tempfile::tempdir().unwrap();
        let sink = CsvDirSink::new(dir.path()).unwrap();

        sink.upsert(
            &GAMES,
            vec![
                row("2025-07-26", "Cubs", "Cardinals", "completed"),
                row("2025-07-27", "Yankees", "Red Sox", "inprogress"),
            ],
        )
        .unwrap();
        sink.upsert(&GAMES, vec![row("2025-07-27", "Yankees", "Red Sox", "completed")])
            .unwrap();

        let rows = sink.read_rows(&GAMES).unwrap();
        assert_eq!(rows.len(), 2);
        // Prior row untouched and ordering stable.
        assert_eq!(rows[0][1], "Cubs");
        assert_eq!(rows[1][5], "completed");
    }
}
