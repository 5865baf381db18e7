//! Runs every fixture under `testdata/fixtures` through the engine

use std::path::PathBuf;

use rmmd_adapter::{fixture_files, load_fixture};
use rmmd_validation::{ValidationEngine, check_fixture};

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../testdata/fixtures")
}

#[test]
fn all_fixtures_match_their_metadata() -> anyhow::Result<()> {
    let dir = fixture_dir();
    let engine = ValidationEngine::new();

    let files = fixture_files(&dir)?;
    assert!(!files.is_empty(), "no fixtures found in {}", dir.display());

    let mut failures = Vec::new();
    let (mut valid, mut invalid) = (0, 0);
    for path in &files {
        let fixture = load_fixture(&dir, path)?;
        if fixture.expects_success() {
            valid += 1;
        } else {
            invalid += 1;
        }
        if let Err(e) = check_fixture(&engine, &fixture) {
            failures.push(format!("{}: {e}", fixture.relative_path.display()));
        }
    }

    assert!(failures.is_empty(), "fixture failures:\n{}", failures.join("\n"));
    assert!(valid > 0 && invalid > 0);
    Ok(())
}
