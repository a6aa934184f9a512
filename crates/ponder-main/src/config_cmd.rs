use std::fs;
use std::path::PathBuf;

use crate::ponder_home::PonderHome;

const PONDER_TOML_SAMPLE: &str = include_str!("../../../ponder.toml.sample");

/// What `ponder config init` touched.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InitReport {
    pub created: Vec<PathBuf>,
    pub kept: Vec<PathBuf>,
}

impl InitReport {
    pub fn render(&self) -> String {
        let created = self
            .created
            .iter()
            .map(|path| format!("created: {}", path.display()));
        let kept = self
            .kept
            .iter()
            .map(|path| format!("kept: {}", path.display()));
        created.chain(kept).collect::<Vec<_>>().join("\n")
    }
}

/// Lays out the home directory and writes the sample config, never overwriting.
pub fn init_home(home: &PonderHome) -> Result<InitReport, String> {
    let mut report = InitReport::default();

    for dir in [home.root().to_path_buf(), home.log_dir(), home.scripts_dir()] {
        if dir.is_dir() {
            continue;
        }
        fs::create_dir_all(&dir)
            .map_err(|error| format!("create {} failed: {error}", dir.display()))?;
        report.created.push(dir);
    }

    let config_file = home.config_file();
    if config_file.exists() {
        report.kept.push(config_file);
    } else {
        fs::write(&config_file, PONDER_TOML_SAMPLE)
            .map_err(|error| format!("write {} failed: {error}", config_file.display()))?;
        report.created.push(config_file);
    }

    Ok(report)
}
