//! Search tools: grep (regex over file contents) and glob (path patterns)

use parley_domain::{
    GlobArgs, GrepArgs, RiskLevel, Session, ToolDefinition, ToolError, ToolParameter, ToolResult,
    ToolResultMetadata,
};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Tool name constants
pub const GREP: &str = "grep";
pub const GLOB: &str = "glob";

/// Matches past this count are dropped.
const MAX_GREP_MATCHES: usize = 50;

/// Get the tool definition for grep
pub fn grep_definition() -> ToolDefinition {
    ToolDefinition::new(
        GREP,
        "Search file contents for a regular expression pattern.",
        RiskLevel::Low,
    )
    .with_parameter(
        ToolParameter::new("pattern", "The regular expression to search for", true)
            .with_type("string"),
    )
    .with_parameter(
        ToolParameter::new(
            "path",
            "The directory to search in (defaults to the session working directory)",
            false,
        )
        .with_type("path"),
    )
    .with_parameter(
        ToolParameter::new(
            "include",
            "Glob pattern to filter which files are searched (e.g. \"*.rs\")",
            false,
        )
        .with_type("string"),
    )
}

/// Get the tool definition for glob
pub fn glob_definition() -> ToolDefinition {
    ToolDefinition::new(
        GLOB,
        "Find files matching a glob pattern.",
        RiskLevel::Low,
    )
    .with_parameter(
        ToolParameter::new("pattern", "The glob pattern to match files against", true)
            .with_type("string"),
    )
    .with_parameter(
        ToolParameter::new(
            "path",
            "The directory to search in (defaults to the session working directory)",
            false,
        )
        .with_type("path"),
    )
}

/// Execute the grep tool.
///
/// Lines are reported 1-based with surrounding whitespace trimmed. Files that
/// cannot be read are skipped. Output is capped at the first 50 matches.
pub fn execute_grep(args: &GrepArgs, session: &Arc<Mutex<Session>>) -> ToolResult {
    let base = {
        let session = session.lock().expect("session lock poisoned");
        match &args.path {
            Some(p) => session.resolve(p),
            None => session.cwd().to_path_buf(),
        }
    };

    if !base.is_dir() {
        return ToolResult::failure(
            GREP,
            ToolError::new("NOT_FOUND", format!("Directory not found: {}", base.display())),
        );
    }

    let regex = match Regex::new(&args.pattern) {
        Ok(r) => r,
        Err(e) => {
            return ToolResult::failure(
                GREP,
                ToolError::invalid_argument(format!("Invalid regex pattern: {}", e)),
            );
        }
    };

    let include = args.include.as_deref().unwrap_or("**/*");
    let walk_pattern = format!("{}/{}", base.display(), include);
    let paths = match glob::glob(&walk_pattern) {
        Ok(paths) => paths,
        Err(e) => {
            return ToolResult::failure(
                GREP,
                ToolError::invalid_argument(format!("Invalid include pattern: {}", e)),
            );
        }
    };

    let mut matches: Vec<String> = Vec::new();
    let mut count = 0;
    'files: for entry in paths.flatten() {
        if !entry.is_file() {
            continue;
        }
        // Binary or unreadable files are skipped, not reported.
        let Ok(content) = fs::read_to_string(&entry) else {
            continue;
        };
        let display = relative_display(&entry, &base);
        for (idx, line) in content.lines().enumerate() {
            // Every occurrence counts toward the cap, not just the line.
            let occurrences = regex.find_iter(line).count();
            if occurrences == 0 {
                continue;
            }
            matches.push(format!("{}:{}: {}", display, idx + 1, line.trim()));
            count += occurrences;
            if count >= MAX_GREP_MATCHES {
                break 'files;
            }
        }
    }
    let output = if matches.is_empty() {
        "No matches found".to_string()
    } else {
        matches.join("\n")
    };

    ToolResult::success(GREP, output).with_metadata(ToolResultMetadata {
        match_count: Some(count),
        path: Some(base.display().to_string()),
        ..Default::default()
    })
}

/// Execute the glob tool: matching file paths relative to the search root.
pub fn execute_glob(args: &GlobArgs, session: &Arc<Mutex<Session>>) -> ToolResult {
    let base = {
        let session = session.lock().expect("session lock poisoned");
        match &args.path {
            Some(p) => session.resolve(p),
            None => session.cwd().to_path_buf(),
        }
    };

    if !base.is_dir() {
        return ToolResult::failure(
            GLOB,
            ToolError::new("NOT_FOUND", format!("Directory not found: {}", base.display())),
        );
    }

    let walk_pattern = format!("{}/{}", base.display(), args.pattern);
    let paths = match glob::glob(&walk_pattern) {
        Ok(paths) => paths,
        Err(e) => {
            return ToolResult::failure(
                GLOB,
                ToolError::invalid_argument(format!("Invalid glob pattern: {}", e)),
            );
        }
    };

    let mut files: Vec<String> = paths
        .flatten()
        .filter(|p| p.is_file())
        .map(|p| relative_display(&p, &base))
        .collect();
    files.sort();

    let count = files.len();
    let output = if files.is_empty() {
        "No files found".to_string()
    } else {
        files.join("\n")
    };

    ToolResult::success(GLOB, output).with_metadata(ToolResultMetadata {
        match_count: Some(count),
        path: Some(base.display().to_string()),
        ..Default::default()
    })
}

fn relative_display(path: &Path, base: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn session_at(path: &std::path::Path) -> Arc<Mutex<Session>> {
        Arc::new(Mutex::new(Session::new(path)))
    }

    #[test]
    fn test_grep_single_match_is_one_based_and_trimmed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("notes.txt"), "    TODO fix this\nall done\n").unwrap();
        let session = session_at(dir.path());

        let result = execute_grep(
            &GrepArgs {
                pattern: "TODO".to_string(),
                path: None,
                include: None,
            },
            &session,
        );

        assert!(result.is_success());
        assert_eq!(result.output(), Some("notes.txt:1: TODO fix this"));
        assert_eq!(result.metadata.match_count, Some(1));
    }

    #[test]
    fn test_grep_respects_include_filter() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.rs"), "needle\n").unwrap();
        fs::write(dir.path().join("b.txt"), "needle\n").unwrap();
        let session = session_at(dir.path());

        let result = execute_grep(
            &GrepArgs {
                pattern: "needle".to_string(),
                path: None,
                include: Some("*.rs".to_string()),
            },
            &session,
        );

        let output = result.output().unwrap();
        assert!(output.contains("a.rs:1:"));
        assert!(!output.contains("b.txt"));
    }

    #[test]
    fn test_grep_caps_at_fifty_matches() {
        let dir = tempdir().unwrap();
        let content: String = (0..80).map(|_| "hit\n").collect();
        fs::write(dir.path().join("big.txt"), content).unwrap();
        let session = session_at(dir.path());

        let result = execute_grep(
            &GrepArgs {
                pattern: "hit".to_string(),
                path: None,
                include: None,
            },
            &session,
        );

        assert_eq!(result.metadata.match_count, Some(50));
        assert_eq!(result.output().unwrap().lines().count(), 50);
    }

    #[test]
    fn test_grep_counts_every_occurrence_toward_cap() {
        let dir = tempdir().unwrap();
        // 40 lines with two occurrences each: the cap lands at line 25
        let content: String = (0..40).map(|_| "hit and hit again\n").collect();
        fs::write(dir.path().join("dense.txt"), content).unwrap();
        let session = session_at(dir.path());

        let result = execute_grep(
            &GrepArgs {
                pattern: "hit".to_string(),
                path: None,
                include: None,
            },
            &session,
        );

        assert_eq!(result.metadata.match_count, Some(50));
        assert_eq!(result.output().unwrap().lines().count(), 25);
    }

    #[test]
    fn test_grep_no_matches() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("f.txt"), "nothing here\n").unwrap();
        let session = session_at(dir.path());

        let result = execute_grep(
            &GrepArgs {
                pattern: "absent".to_string(),
                path: None,
                include: None,
            },
            &session,
        );

        assert_eq!(result.output(), Some("No matches found"));
    }

    #[test]
    fn test_grep_invalid_pattern_is_a_result() {
        let dir = tempdir().unwrap();
        let session = session_at(dir.path());

        let result = execute_grep(
            &GrepArgs {
                pattern: "[unclosed".to_string(),
                path: None,
                include: None,
            },
            &session,
        );

        assert!(!result.is_success());
        assert_eq!(result.error().unwrap().code, "INVALID_ARGUMENT");
    }

    #[test]
    fn test_glob_lists_relative_paths() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/main.rs"), "").unwrap();
        fs::write(dir.path().join("readme.md"), "").unwrap();
        let session = session_at(dir.path());

        let result = execute_glob(
            &GlobArgs {
                pattern: "**/*.rs".to_string(),
                path: None,
            },
            &session,
        );

        assert_eq!(result.output(), Some("src/main.rs"));
    }

    #[test]
    fn test_glob_no_files() {
        let dir = tempdir().unwrap();
        let session = session_at(dir.path());

        let result = execute_glob(
            &GlobArgs {
                pattern: "*.zig".to_string(),
                path: None,
            },
            &session,
        );

        assert_eq!(result.output(), Some("No files found"));
    }
}
