//! Executables discovered inside a bottle.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// An executable found in a bottle's prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    pub path: PathBuf,
    pub name: String,
    #[serde(default)]
    pub pinned: bool,
}

impl Program {
    /// Program named after its file, e.g. `Steam.exe`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self {
            path,
            name,
            pinned: false,
        }
    }

    pub fn is_at(&self, path: &Path) -> bool {
        self.path == path
    }
}

/// Pinned/unpinned filters over a program list.
pub trait ProgramsExt {
    fn pinned(&self) -> Vec<&Program>;
    fn unpinned(&self) -> Vec<&Program>;
}

impl ProgramsExt for [Program] {
    fn pinned(&self) -> Vec<&Program> {
        self.iter().filter(|p| p.pinned).collect()
    }

    fn unpinned(&self) -> Vec<&Program> {
        self.iter().filter(|p| !p.pinned).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_from_file() {
        let program = Program::new("/bottle/drive_c/Program Files/Steam/steam.exe");
        assert_eq!(program.name, "steam.exe");
        assert!(!program.pinned);
    }

    #[test]
    fn test_pinned_filters() {
        let mut programs = vec![Program::new("/a.exe"), Program::new("/b.exe")];
        programs[1].pinned = true;

        let pinned: Vec<_> = programs.pinned().iter().map(|p| p.name.clone()).collect();
        let unpinned: Vec<_> = programs.unpinned().iter().map(|p| p.name.clone()).collect();
        assert_eq!(pinned, vec!["b.exe"]);
        assert_eq!(unpinned, vec!["a.exe"]);
    }
}
