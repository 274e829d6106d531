use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::TEST_FILE_PATTERNS;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Which files under the source root take part in the analysis.
#[derive(Debug, Clone, Copy)]
pub struct ScanOptions<'a> {
    pub includes: &'a [String],
    pub ignores: &'a [String],
    pub ignore_test_files: bool,
}

/// Result of scanning files.
pub struct ScanResult {
    /// Source files in path order.
    pub files: BTreeSet<String>,
    /// Paths that could not be read while walking.
    pub skipped: Vec<String>,
}

struct IgnoreRules {
    literal_paths: Vec<PathBuf>,
    patterns: Vec<Pattern>,
}

impl IgnoreRules {
    fn new(base_dir: &Path, options: &ScanOptions<'_>) -> Self {
        let mut literal_paths = Vec::new();
        let mut patterns = Vec::new();

        for p in options.ignores {
            if is_glob_pattern(p) {
                match Pattern::new(p) {
                    Ok(pattern) => patterns.push(pattern),
                    Err(e) => warn!(pattern = %p, error = %e, "invalid ignore pattern"),
                }
            } else {
                literal_paths.push(base_dir.join(p));
            }
        }

        if options.ignore_test_files {
            patterns.extend(TEST_FILE_PATTERNS.iter().filter_map(|p| Pattern::new(p).ok()));
        }

        Self {
            literal_paths,
            patterns,
        }
    }

    fn is_ignored(&self, path: &Path) -> bool {
        let path_str = path.to_string_lossy();
        self.literal_paths.iter().any(|ignored| path.starts_with(ignored))
            || self.patterns.iter().any(|p| p.matches(&path_str))
    }
}

/// Directories to walk: every include (literal path or glob), or the base dir.
fn dirs_to_scan(base_dir: &Path, includes: &[String]) -> Vec<PathBuf> {
    if includes.is_empty() {
        return vec![base_dir.to_path_buf()];
    }

    let mut dirs = Vec::new();
    for inc in includes {
        let path = base_dir.join(inc);
        if is_glob_pattern(inc) {
            match glob(&path.to_string_lossy()) {
                Ok(entries) => dirs.extend(entries.flatten().filter(|entry| entry.is_dir())),
                Err(e) => warn!(pattern = %inc, error = %e, "invalid include pattern"),
            }
        } else if path.exists() {
            dirs.push(path);
        } else {
            debug!(path = %path.display(), "include path does not exist");
        }
    }
    dirs
}

pub fn scan_files(base_dir: &str, options: &ScanOptions<'_>) -> ScanResult {
    let base_dir = Path::new(base_dir);
    let ignore_rules = IgnoreRules::new(base_dir, options);

    let mut files = BTreeSet::new();
    let mut skipped = Vec::new();

    for dir in dirs_to_scan(base_dir, options.includes) {
        for entry in WalkDir::new(dir) {
            let entry = match entry {
                Ok(e) => e,
                Err(e) => {
                    debug!(error = %e, "cannot access path");
                    skipped.push(e.to_string());
                    continue;
                }
            };
            let path = entry.path();

            if ignore_rules.is_ignored(path) {
                continue;
            }

            if path.is_file() && is_scannable_file(path) {
                files.insert(path.to_string_lossy().into_owned());
            }
        }
    }

    debug!(files = files.len(), skipped = skipped.len(), "scanned source files");
    ScanResult { files, skipped }
}

fn is_scannable_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("tsx" | "ts" | "jsx" | "js")
    )
}

#[cfg(test)]
mod tests {
    use std::fs::{self, File};

    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    fn scan(dir: &Path, includes: &[&str], ignores: &[&str], ignore_test_files: bool) -> Vec<String> {
        let includes: Vec<String> = includes.iter().map(|s| s.to_string()).collect();
        let ignores: Vec<String> = ignores.iter().map(|s| s.to_string()).collect();
        let options = ScanOptions {
            includes: &includes,
            ignores: &ignores,
            ignore_test_files,
        };
        let base = dir.to_str().unwrap();
        scan_files(base, &options)
            .files
            .into_iter()
            .map(|f| f.trim_start_matches(base).trim_start_matches('/').to_string())
            .collect()
    }

    #[test]
    fn test_scan_source_extensions_only() {
        let dir = tempdir().unwrap();
        File::create(dir.path().join("app.tsx")).unwrap();
        File::create(dir.path().join("utils.ts")).unwrap();
        File::create(dir.path().join("style.css")).unwrap();

        assert_eq!(scan(dir.path(), &[], &[], false), vec!["app.tsx", "utils.ts"]);
    }

    #[test]
    fn test_scan_with_includes() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/components")).unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        File::create(dir.path().join("src/app.tsx")).unwrap();
        File::create(dir.path().join("src/components/Button.tsx")).unwrap();
        File::create(dir.path().join("lib/utils.ts")).unwrap();

        // Overlapping includes are deduplicated, missing ones skipped
        assert_eq!(
            scan(dir.path(), &["src", "src/components", "missing"], &[], false),
            vec!["src/app.tsx", "src/components/Button.tsx"]
        );
    }

    #[test]
    fn test_scan_with_glob_include() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/app")).unwrap();
        fs::create_dir_all(dir.path().join("lib")).unwrap();
        File::create(dir.path().join("src/app/page.tsx")).unwrap();
        File::create(dir.path().join("lib/utils.ts")).unwrap();

        assert_eq!(scan(dir.path(), &["src/*"], &[], false), vec!["src/app/page.tsx"]);
    }

    #[test]
    fn test_scan_with_literal_bracket_path() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app/[id]")).unwrap();
        fs::create_dir_all(dir.path().join("app/other")).unwrap();
        File::create(dir.path().join("app/[id]/page.tsx")).unwrap();
        File::create(dir.path().join("app/other/page.tsx")).unwrap();

        assert_eq!(scan(dir.path(), &["app/[id]"], &[], false), vec!["app/[id]/page.tsx"]);
    }

    #[test]
    fn test_scan_ignores_mixed_patterns() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src/components")).unwrap();
        fs::create_dir_all(dir.path().join("src/generated")).unwrap();
        File::create(dir.path().join("src/components/Button.tsx")).unwrap();
        File::create(dir.path().join("src/components/Button.stories.tsx")).unwrap();
        File::create(dir.path().join("src/generated/types.ts")).unwrap();

        assert_eq!(
            scan(
                dir.path(),
                &["src"],
                &["src/generated", "**/*.stories.tsx"],
                false
            ),
            vec!["src/components/Button.tsx"]
        );
    }

    #[test]
    fn test_scan_ignores_test_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("__tests__")).unwrap();
        File::create(dir.path().join("app.tsx")).unwrap();
        File::create(dir.path().join("app.test.tsx")).unwrap();
        File::create(dir.path().join("utils.spec.jsx")).unwrap();
        File::create(dir.path().join("__tests__/helper.ts")).unwrap();

        assert_eq!(scan(dir.path(), &[], &[], true), vec!["app.tsx"]);
        assert_eq!(scan(dir.path(), &[], &[], false).len(), 4);
    }

    #[test]
    fn test_is_glob_pattern() {
        assert!(is_glob_pattern("src/*"));
        assert!(is_glob_pattern("file?.ts"));
        assert!(!is_glob_pattern("src"));
        assert!(!is_glob_pattern("app/[locale]"));
    }
}
