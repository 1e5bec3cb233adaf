//! Prompt templates and output normalization shared by all provider
//! backends, so every backend sends identical prompts.

use crate::git::GitChanges;

/// Line budget for the diff embedded in the branch-name prompt.
pub const BRANCH_NAME_DIFF_LINES: usize = 300;

/// Line budget for the diff embedded in the commit-message prompt.
pub const COMMIT_MESSAGE_DIFF_LINES: usize = 500;

/// Marker appended when a diff is cut at the line budget.
pub const TRUNCATION_MARKER: &str = "\n\n... (diff truncated)";

/// Substitute used when a provider returns an empty commit message.
pub const FALLBACK_COMMIT_MESSAGE: &str = "chore: update code";

/// Response budget for branch-name requests, in tokens.
pub const BRANCH_NAME_MAX_TOKENS: u32 = 50;

/// Response budget for commit-message requests, in tokens.
pub const COMMIT_MESSAGE_MAX_TOKENS: u32 = 100;

/// Truncates a diff to at most `max_lines` lines, appending the truncation
/// marker when anything was cut.
pub fn truncate_diff(diff: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = diff.split('\n').collect();
    if lines.len() <= max_lines {
        return diff.to_string();
    }
    format!("{}{}", lines[..max_lines].join("\n"), TRUNCATION_MARKER)
}

/// Builds the branch-name prompt from a change snapshot.
pub fn branch_name_prompt(changes: &GitChanges) -> String {
    let truncated_diff = truncate_diff(&changes.diff, BRANCH_NAME_DIFF_LINES);

    format!(
        "Based on the following git changes, generate a concise, descriptive branch name in kebab-case format.\n\
         \n\
         Git Status:\n\
         {}\n\
         \n\
         Git Diff (truncated):\n\
         {}\n\
         \n\
         Rules:\n\
         - Use lowercase kebab-case (e.g., feature-add-user-auth)\n\
         - Maximum 50 characters\n\
         - Be specific and descriptive\n\
         - Use conventional prefixes: feature-, fix-, refactor-, docs-, test-, chore-\n\
         - Respond with ONLY the branch name, nothing else\n\
         \n\
         Branch name:",
        changes.status, truncated_diff
    )
}

/// Builds the commit-message prompt from the staged diff.
pub fn commit_message_prompt(staged_diff: &str) -> String {
    let truncated_diff = truncate_diff(staged_diff, COMMIT_MESSAGE_DIFF_LINES);

    format!(
        "Based on the following staged git changes, generate a concise conventional commit message.\n\
         \n\
         Staged Changes:\n\
         {truncated_diff}\n\
         \n\
         Rules:\n\
         - Follow conventional commit format: type: description\n\
         - Types: feat, fix, refactor, docs, test, chore, style, perf\n\
         - Keep the subject line under 72 characters\n\
         - Be specific and descriptive\n\
         - Respond with ONLY the commit message, nothing else\n\
         \n\
         Commit message:"
    )
}

/// Normalizes a raw branch name into `[a-z0-9-/]`, collapsing repeated
/// dashes, stripping leading and trailing dashes, and capping length at 50.
///
/// Providers may ignore formatting instructions, so this runs on every
/// response regardless of how clean it looks.
pub fn clean_branch_name(name: &str) -> String {
    let mut cleaned = String::with_capacity(name.len());

    for c in name.to_lowercase().chars() {
        let mapped = match c {
            'a'..='z' | '0'..='9' | '/' => c,
            '-' => '-',
            _ => '-',
        };
        if mapped == '-' && cleaned.ends_with('-') {
            continue;
        }
        cleaned.push(mapped);
    }

    let trimmed: String = cleaned.trim_matches('-').chars().take(50).collect();
    // Truncation can land on a dash boundary; re-trim the tail.
    trimmed.trim_end_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn changes_with(status: &str, diff: &str) -> GitChanges {
        GitChanges {
            status: status.to_string(),
            diff: diff.to_string(),
            has_staged_changes: false,
            has_unstaged_changes: true,
        }
    }

    #[test]
    fn truncate_diff_under_threshold_is_unchanged() {
        let diff = "line1\nline2\nline3";
        assert_eq!(truncate_diff(diff, 3), diff);
        assert_eq!(truncate_diff(diff, 300), diff);
    }

    #[test]
    fn truncate_diff_over_threshold_cuts_and_marks() {
        let diff: String = (0..400)
            .map(|i| format!("line{i}"))
            .collect::<Vec<_>>()
            .join("\n");

        let truncated = truncate_diff(&diff, 300);
        let body = truncated.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert_eq!(body.split('\n').count(), 300);
        assert!(body.ends_with("line299"));
    }

    #[test]
    fn truncate_diff_at_exact_threshold_is_unchanged() {
        let diff: String = (0..300)
            .map(|i| format!("line{i}"))
            .collect::<Vec<_>>()
            .join("\n");
        assert_eq!(truncate_diff(&diff, 300), diff);
    }

    #[test]
    fn branch_prompt_embeds_status_and_diff() {
        let prompt = branch_name_prompt(&changes_with(" M src/lib.rs", "+fn new()"));
        assert!(prompt.contains(" M src/lib.rs"));
        assert!(prompt.contains("+fn new()"));
        assert!(prompt.contains("feature-, fix-, refactor-, docs-, test-, chore-"));
        assert!(prompt.ends_with("Branch name:"));
    }

    #[test]
    fn commit_prompt_embeds_diff_and_rules() {
        let prompt = commit_message_prompt("+added line");
        assert!(prompt.contains("+added line"));
        assert!(prompt.contains("under 72 characters"));
        assert!(prompt.ends_with("Commit message:"));
    }

    #[test]
    fn clean_branch_name_lowercases_and_replaces() {
        assert_eq!(
            clean_branch_name("Feature: Add User Auth!"),
            "feature-add-user-auth"
        );
    }

    #[test]
    fn clean_branch_name_collapses_and_trims_dashes() {
        assert_eq!(clean_branch_name("--fix---login--"), "fix-login");
    }

    #[test]
    fn clean_branch_name_keeps_slashes() {
        assert_eq!(clean_branch_name("feature/add-auth"), "feature/add-auth");
    }

    #[test]
    fn clean_branch_name_truncates_to_fifty() {
        let long = "a".repeat(80);
        assert_eq!(clean_branch_name(&long).len(), 50);
    }

    #[test]
    fn clean_branch_name_handles_all_junk_input() {
        assert_eq!(clean_branch_name("!!! ???"), "");
    }

    proptest! {
        #[test]
        fn cleaned_names_always_satisfy_the_branch_invariant(raw in ".{0,120}") {
            let cleaned = clean_branch_name(&raw);

            prop_assert!(cleaned.len() <= 50);
            prop_assert!(cleaned
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '/'));
            prop_assert!(!cleaned.starts_with('-'));
            prop_assert!(!cleaned.ends_with('-'));
            prop_assert!(!cleaned.contains("--"));
        }
    }
}
