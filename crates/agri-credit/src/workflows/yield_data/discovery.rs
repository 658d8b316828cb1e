use super::LoadError;
use std::path::{Path, PathBuf};

/// Pick the yield export from a directory of CSV files.
///
/// A file named like `*yield*` wins; otherwise the first `*crop*` file that is not a price
/// list. Names are sorted first so the choice never depends on directory iteration order.
pub(crate) fn select_yield_file(dir: &Path) -> Result<PathBuf, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryMissing {
            dir: dir.to_path_buf(),
        });
    }

    let files = csv_file_names(dir)?;
    match choose(&files) {
        Some(name) => Ok(dir.join(name)),
        None => Err(LoadError::NoYieldFile {
            dir: dir.to_path_buf(),
            files,
        }),
    }
}

fn csv_file_names(dir: &Path) -> Result<Vec<String>, LoadError> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.to_ascii_lowercase().ends_with(".csv") {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

fn choose(files: &[String]) -> Option<&str> {
    let by_yield = files
        .iter()
        .find(|name| name.to_lowercase().contains("yield"));

    by_yield
        .or_else(|| {
            files.iter().find(|name| {
                let lower = name.to_lowercase();
                lower.contains("crop") && !lower.contains("price")
            })
        })
        .map(String::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn names(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn prefers_yield_named_file() {
        let files = names(&["crop_production.csv", "India_Crop_Yield.csv", "prices.csv"]);
        assert_eq!(choose(&files), Some("India_Crop_Yield.csv"));
    }

    #[test]
    fn falls_back_to_crop_file_that_is_not_a_price_list() {
        let files = names(&["Crop_Price_2023.csv", "crop_production.csv"]);
        assert_eq!(choose(&files), Some("crop_production.csv"));
    }

    #[test]
    fn nothing_matches_unrelated_files() {
        let files = names(&["rainfall.csv", "crop_prices.csv"]);
        assert_eq!(choose(&files), None);
    }

    #[test]
    fn missing_directory_is_a_configuration_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("financial");
        let err = select_yield_file(&missing).expect_err("directory absent");
        assert!(matches!(err, LoadError::DirectoryMissing { .. }));
    }

    #[test]
    fn reports_seen_files_when_no_candidate_matches() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("rainfall.csv"), "State,Rain\n").expect("write");
        fs::write(dir.path().join("notes.txt"), "not a csv").expect("write");

        match select_yield_file(dir.path()) {
            Err(LoadError::NoYieldFile { files, .. }) => {
                assert_eq!(files, vec!["rainfall.csv".to_string()]);
            }
            other => panic!("expected NoYieldFile, got {other:?}"),
        }
    }

    #[test]
    fn extension_match_ignores_case() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("CROP_YIELD.CSV"), "State,Crop,Yield\n").expect("write");
        let path = select_yield_file(dir.path()).expect("selects upper-case export");
        assert!(path.ends_with("CROP_YIELD.CSV"));
    }
}
