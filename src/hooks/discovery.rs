//! Lifecycle hook discovery.
//!
//! Checks which aspect files exist under the hooks folder. Absence is the
//! normal case and never an error.

use std::fmt;
use std::path::Path;

/// Lifecycle phase at which a hook may run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Aspect {
    Before,
    After,
    Error,
}

impl Aspect {
    pub const ALL: [Aspect; 3] = [Aspect::Before, Aspect::After, Aspect::Error];

    pub fn as_str(&self) -> &'static str {
        match self {
            Aspect::Before => "before",
            Aspect::After => "after",
            Aspect::Error => "error",
        }
    }
}

impl fmt::Display for Aspect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aspects whose hook file was found.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HookPresence {
    found: Vec<Aspect>,
}

impl HookPresence {
    pub fn aspects(&self) -> &[Aspect] {
        &self.found
    }

    pub fn contains(&self, aspect: Aspect) -> bool {
        self.found.contains(&aspect)
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty()
    }

    /// One-line summary for the boot log.
    pub fn summary(&self) -> String {
        if self.found.is_empty() {
            "No hooks present".to_string()
        } else {
            let names: Vec<&str> = self.found.iter().map(Aspect::as_str).collect();
            format!("Found {} hook(s): [{}]", names.len(), names.join(", "))
        }
    }
}

/// Check `<folder>/{before,after,error}.rs`.
pub fn discover_hooks(folder: &Path) -> HookPresence {
    let found = Aspect::ALL
        .into_iter()
        .filter(|aspect| folder.join(format!("{}.rs", aspect)).is_file())
        .collect();
    HookPresence { found }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_hooks() {
        let dir = tempfile::tempdir().unwrap();
        let presence = discover_hooks(dir.path());
        assert!(presence.is_empty());
        assert_eq!(presence.summary(), "No hooks present");
    }

    #[test]
    fn test_missing_folder_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_hooks(&dir.path().join("nope")).is_empty());
    }

    #[test]
    fn test_only_before() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("before.rs"), "").unwrap();

        let presence = discover_hooks(dir.path());
        assert_eq!(presence.aspects(), &[Aspect::Before]);
        assert_eq!(presence.summary(), "Found 1 hook(s): [before]");
    }

    #[test]
    fn test_all_aspects_in_fixed_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["error.rs", "after.rs", "before.rs", "other.rs"] {
            std::fs::write(dir.path().join(name), "").unwrap();
        }

        let presence = discover_hooks(dir.path());
        assert_eq!(presence.aspects(), &[Aspect::Before, Aspect::After, Aspect::Error]);
    }
}
