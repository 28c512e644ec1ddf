//! Catalog loading and location resolution.

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::csv::{Record, Records};
use super::CatalogEntry;
use crate::config::CatalogConfig;
use crate::error::{Error, Result};

/// Number of columns every catalog row must have.
const CATALOG_COLUMNS: usize = 2;

/// Outcome counts of a catalog load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows turned into entries.
    pub loaded: usize,
    /// Rows skipped as malformed.
    pub skipped: usize,
}

/// Resolve the catalog file from the configured search locations.
///
/// An explicit `path` is the only candidate when set. Otherwise `file_name` is
/// looked up next to the running executable, then in the working directory.
pub fn locate_catalog(config: &CatalogConfig) -> Result<PathBuf> {
    let candidates = match &config.path {
        Some(path) => vec![path.clone()],
        None => search_locations(&config.file_name),
    };

    for candidate in &candidates {
        if candidate.is_file() {
            debug!("Catalog found at {}", candidate.display());
            return Ok(candidate.clone());
        }
    }

    let file_name = config
        .path
        .as_ref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| config.file_name.clone());

    Err(Error::CatalogNotFound {
        file_name,
        searched: candidates
            .iter()
            .map(|c| c.parent().map(Path::to_path_buf).unwrap_or_default())
            .collect(),
    })
}

fn search_locations(file_name: &str) -> Vec<PathBuf> {
    let mut dirs = Vec::new();
    if let Some(dir) = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(dir);
    }
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.contains(&cwd) {
            dirs.push(cwd);
        }
    }
    dirs.into_iter().map(|dir| dir.join(file_name)).collect()
}

/// Read and parse the catalog at `path`.
///
/// Fails with `EmptyCatalog` when no row survives parsing.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<(Vec<CatalogEntry>, LoadReport)> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let (entries, report) = parse_catalog(&content);

    info!(
        path = %path.display(),
        loaded = report.loaded,
        skipped = report.skipped,
        "Catalog loaded"
    );

    if entries.is_empty() {
        return Err(Error::EmptyCatalog);
    }
    Ok((entries, report))
}

/// Parse catalog CSV text, skipping the header row and malformed rows.
pub fn parse_catalog(content: &str) -> (Vec<CatalogEntry>, LoadReport) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut entries = Vec::new();
    let mut report = LoadReport::default();

    // The header row is ignored; columns are positional.
    for record in Records::new(content).skip(1) {
        match record {
            Record::Fields(fields) if fields.len() == CATALOG_COLUMNS => {
                let mut fields = fields.into_iter();
                let symptom = fields.next().unwrap_or_default();
                let advice = fields.next().unwrap_or_default();
                match CatalogEntry::new(symptom, advice) {
                    Some(entry) => {
                        entries.push(entry);
                        report.loaded += 1;
                    }
                    None => {
                        warn!("Skipping catalog row with empty symptom");
                        report.skipped += 1;
                    }
                }
            }
            Record::Fields(fields) => {
                warn!(
                    "Skipping catalog row with {} fields (expected {})",
                    fields.len(),
                    CATALOG_COLUMNS
                );
                report.skipped += 1;
            }
            Record::Malformed { line, reason } => {
                warn!("Skipping malformed catalog row at line {}: {}", line, reason);
                report.skipped += 1;
            }
        }
    }

    (entries, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
symptoms,advice
\"fever and headache\",\"Take rest and stay hydrated.\"
\"stomach pain\",\"Avoid spicy food and consult a doctor.\"
";

    #[test]
    fn test_parse_skips_header() {
        let (entries, report) = parse_catalog(SAMPLE);
        assert_eq!(report, LoadReport { loaded: 2, skipped: 0 });
        assert_eq!(entries[0].symptom_text, "fever and headache");
        assert_eq!(entries[0].advice_text, "Take rest and stay hydrated.");
        assert_eq!(entries[1].symptom_text, "stomach pain");
    }

    #[test]
    fn test_parse_skips_malformed_rows() {
        let content = "\
Symptoms,Advice
cough,Drink warm fluids.
only one column
a,b,c
\"broken\"quote,x
,missing symptom
\"sore throat, mild\",\"Gargle with \"\"salt\"\" water.\"
";
        let (entries, report) = parse_catalog(content);
        assert_eq!(report, LoadReport { loaded: 2, skipped: 4 });
        assert_eq!(entries[0].symptom_text, "cough");
        assert_eq!(entries[1].symptom_text, "sore throat, mild");
        assert_eq!(entries[1].advice_text, "Gargle with \"salt\" water.");
    }

    #[test]
    fn test_parse_stray_quote_keeps_later_rows() {
        let content = "\
symptoms,advice
cough,Drink warm fluids.
\"stray quote,oops
sore throat,Gargle.
back pain,Stay active.
";
        let (entries, report) = parse_catalog(content);
        assert_eq!(report, LoadReport { loaded: 3, skipped: 1 });
        let symptoms: Vec<&str> = entries.iter().map(|e| e.symptom_text.as_str()).collect();
        assert_eq!(symptoms, ["cough", "sore throat", "back pain"]);
    }

    #[test]
    fn test_parse_header_only() {
        let (entries, report) = parse_catalog("symptoms,advice\n");
        assert!(entries.is_empty());
        assert_eq!(report, LoadReport::default());
    }

    #[test]
    fn test_parse_strips_bom() {
        let content = format!("\u{feff}{}", SAMPLE);
        let (entries, _) = parse_catalog(&content);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_load_rejects_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("health_data.csv");
        std::fs::write(&path, "symptoms,advice\nnot,enough,columns\n").unwrap();

        assert!(matches!(load_catalog(&path), Err(Error::EmptyCatalog)));
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("health_data.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let (entries, report) = load_catalog(&path).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(report.loaded, 2);
    }

    #[test]
    fn test_locate_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("symptoms.csv");
        std::fs::write(&path, SAMPLE).unwrap();

        let config = CatalogConfig {
            path: Some(path.clone()),
            ..Default::default()
        };
        assert_eq!(locate_catalog(&config).unwrap(), path);
    }

    #[test]
    fn test_locate_missing_reports_locations() {
        let dir = tempfile::tempdir().unwrap();
        let config = CatalogConfig {
            path: Some(dir.path().join("absent.csv")),
            ..Default::default()
        };

        match locate_catalog(&config) {
            Err(Error::CatalogNotFound { file_name, searched }) => {
                assert_eq!(file_name, "absent.csv");
                assert_eq!(searched, vec![dir.path().to_path_buf()]);
            }
            other => panic!("expected CatalogNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_locate_searches_by_file_name() {
        let config = CatalogConfig {
            path: None,
            file_name: "no-such-catalog-8f3a.csv".to_string(),
        };

        match locate_catalog(&config) {
            Err(Error::CatalogNotFound { file_name, searched }) => {
                assert_eq!(file_name, "no-such-catalog-8f3a.csv");
                assert!(!searched.is_empty());
            }
            other => panic!("expected CatalogNotFound, got {:?}", other),
        }
    }
}
