use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "ponder.toml";

/// On-disk layout rooted at `--conf-dir`, or `~/.ponder` when none is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PonderHome {
    root: PathBuf,
}

impl PonderHome {
    pub fn resolve(conf_dir: Option<&Path>) -> Self {
        let root = match conf_dir {
            Some(dir) => absolute(dir),
            None => user_home().join(".ponder"),
        };
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE_NAME)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.root.join("logs")
    }

    pub fn scripts_dir(&self) -> PathBuf {
        self.root.join("scripts")
    }

    /// A script path as typed, falling back to `scripts/<path>` for relative paths that
    /// do not exist under the current directory.
    pub fn locate_script(&self, script: &Path) -> PathBuf {
        let direct = absolute(script);
        if direct.is_file() || is_rooted(script) {
            return direct;
        }
        let stored = self.scripts_dir().join(script);
        if stored.is_file() {
            stored
        } else {
            direct
        }
    }
}

fn is_rooted(path: &Path) -> bool {
    path.is_absolute() || path.starts_with("~")
}

fn absolute(path: &Path) -> PathBuf {
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => user_home().join(rest),
        Err(_) => path.to_path_buf(),
    };
    if expanded.is_absolute() {
        return expanded;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&expanded))
        .unwrap_or(expanded)
}

fn user_home() -> PathBuf {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}
