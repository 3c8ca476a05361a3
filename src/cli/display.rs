//! Rendering of lifecycle results for the terminal

use crate::session::{
    AbortOutcome, ChangeDisposition, ExitOutcome, PurgeOutcome, SessionListing, SessionSummary,
    StatusReport,
};

/// Formatting trait for reports that support plain and JSON output
pub trait ReportDisplay {
    fn format_default(&self) -> String;
    fn format_json(&self) -> serde_json::Value;

    /// Lines meant for stderr rather than the report itself
    fn warnings(&self) -> Vec<String> {
        Vec::new()
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn missing_marker(exists: bool) -> &'static str {
    if exists {
        ""
    } else {
        " (missing)"
    }
}

fn format_summary(summary: &SessionSummary) -> String {
    let marker = if summary.active { "* " } else { "  " };
    let mut out = format!("  {marker}{}\n", summary.name);
    out.push_str(&format!("    Last modified: {}\n", summary.last_modified));
    out.push_str(&format!(
        "    Original branch: {}{}\n",
        summary.original_ref,
        missing_marker(summary.original_ref_exists)
    ));
    out.push_str(&format!(
        "    Session HEAD: {}{}\n",
        summary.head_ref,
        missing_marker(summary.head_ref_exists)
    ));
    if let Some(description) = &summary.description {
        out.push_str(&format!("    Description: {description}\n"));
    }
    if !summary.original_ref_exists {
        out.push_str("    Warning: Original branch is missing. Use 'recover' to recreate it.\n");
    }
    if !summary.head_ref_exists {
        out.push_str("    Warning: Session commit is missing. Use 'abort' to discard the session.\n");
    }
    out
}

impl ReportDisplay for SessionListing {
    fn format_default(&self) -> String {
        if self.is_empty() {
            return "No kaishaku sessions exist.\n".to_string();
        }

        let mut out = String::from("kaishaku sessions:\n");
        for summary in &self.sessions {
            out.push_str(&format_summary(summary));
        }
        out
    }

    fn format_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings: Vec<String> = self
            .corrupted
            .iter()
            .map(|name| {
                format!("Warning: Session '{name}' appears to be corrupted. Use 'abort' to discard it.")
            })
            .collect();
        if let Some(name) = &self.dangling_active {
            warnings.push(dangling_warning(name));
        }
        warnings
    }
}

fn dangling_warning(name: &str) -> String {
    format!("Warning: Active session '{name}' no longer exists. Run 'kaishaku abort' to clear it.")
}

impl ReportDisplay for StatusReport {
    fn format_default(&self) -> String {
        let Some(active) = &self.active else {
            return "No active kaishaku session.\n".to_string();
        };

        let unknown = "(unknown)";
        let mut out = format!("Active session: {}\n", active.name);
        out.push_str(&format!(
            "  Original branch: {}\n",
            active.original_ref.as_deref().unwrap_or(unknown)
        ));
        out.push_str(&format!(
            "  Session HEAD: {}\n",
            active.head_ref.as_deref().unwrap_or(unknown)
        ));
        out.push_str(&format!("  Last modified: {}\n", active.last_modified));
        if let Some(description) = &active.description {
            out.push_str(&format!("  Description: {description}\n"));
        }

        out.push_str("\nCurrent HEAD:\n");
        if let Some(head) = &active.current_head {
            out.push_str(head);
            out.push('\n');
        }

        out.push_str("\nUncommitted changes:\n");
        for line in &active.changes {
            out.push_str(line);
            out.push('\n');
        }

        out.push_str("\nConfiguration:\n");
        out.push_str(&format!("  confirm_exit: {}\n", yes_no(self.config.confirm_exit)));
        out.push_str(&format!("  auto_stash: {}\n", yes_no(self.config.auto_stash)));
        out.push_str(&format!("  auto_save: {}\n", yes_no(self.config.auto_save)));
        out
    }

    fn format_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(name) = &self.dangling_active {
            warnings.push(dangling_warning(name));
        }
        if let Some(active) = &self.active {
            if !active.health.is_well_formed() {
                warnings.push(format!(
                    "Warning: Session '{}' is corrupted ({}). Use 'abort' to discard it.",
                    active.name,
                    active.health.describe()
                ));
            }
        }
        warnings
    }
}

/// Lines printed after an exit
pub fn exit_messages(outcome: &ExitOutcome) -> Vec<String> {
    match outcome {
        ExitOutcome::Aborted => vec!["Aborted.".to_string()],
        ExitOutcome::Exited {
            name,
            original_ref,
            changes,
            ..
        } => {
            let mut lines = Vec::new();
            match changes {
                ChangeDisposition::Clean | ChangeDisposition::StashFailed => {}
                ChangeDisposition::NothingToKeep => {
                    lines.push("No changes to save or stash.".to_string())
                }
                ChangeDisposition::Saved => lines.push("Changes saved successfully.".to_string()),
                ChangeDisposition::Stashed => lines.push(
                    "Changes stashed successfully. Use 'git stash list' to see your stashes."
                        .to_string(),
                ),
                ChangeDisposition::Discarded => lines.push("Changes discarded.".to_string()),
            }
            lines.push(format!(
                "Returned to branch '{original_ref}' from session '{name}'"
            ));
            lines
        }
    }
}

pub fn abort_message(outcome: &AbortOutcome) -> String {
    if outcome.removed {
        format!("Aborted session '{}'", outcome.name)
    } else {
        format!("Cleared active session '{}'", outcome.name)
    }
}

pub fn purge_message(outcome: &PurgeOutcome) -> String {
    match outcome {
        PurgeOutcome::NothingToPurge => "No kaishaku sessions exist.".to_string(),
        PurgeOutcome::Removed(name) => format!("Session '{name}' cleaned."),
        PurgeOutcome::Swept { removed, .. } => format!("{removed} session(s) cleaned."),
    }
}
