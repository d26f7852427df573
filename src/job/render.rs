//! Text artifacts derived from a [`JobRecord`]: systemd units, the job
//! script, and a human readable description.

use std::fmt::Write;
use std::path::Path;

use super::JobRecord;

pub const SCRIPT_SHEBANG: &str = "#!/bin/bash";

/// Store-level settings the service unit refers to.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Directory holding the generated `<name>.sh` scripts.
    pub script_dir: &'a Path,
    /// Account the service runs as.
    pub user: &'a str,
}

impl JobRecord {
    /// Service unit text, or an empty string when the job is not renderable.
    pub fn render_service_unit(&self, ctx: &RenderContext<'_>) -> String {
        if !self.is_renderable() {
            return String::new();
        }
        let script = ctx.script_dir.join(self.script_name());
        let mut out = String::new();
        out.push_str("[Unit]\n");
        let _ = writeln!(out, "Description=rbackup job {}", self.name);
        out.push('\n');
        out.push_str("[Service]\n");
        out.push_str("Type=oneshot\n");
        let _ = writeln!(out, "ExecStart=sh {}", script.display());
        let _ = writeln!(out, "User={}", ctx.user);
        out.push('\n');
        out.push_str("[Install]\n");
        out.push_str("WantedBy=multi-user.target\n");
        out
    }

    /// Timer unit text, or an empty string when the job is not renderable.
    pub fn render_timer_unit(&self) -> String {
        if !self.is_renderable() {
            return String::new();
        }
        let mut out = String::new();
        out.push_str("[Unit]\n");
        let _ = writeln!(out, "Description=Schedule for rbackup job {}", self.name);
        out.push('\n');
        out.push_str("[Timer]\n");
        let _ = writeln!(out, "Unit={}", self.service_unit_name());
        let _ = writeln!(out, "OnCalendar={}", self.render_calendar_spec());
        out.push_str("Persistent=true\n");
        out.push('\n');
        out.push_str("[Install]\n");
        out.push_str("WantedBy=multi-user.target\n");
        out
    }

    /// `OnCalendar=` value: every active day followed by a comma, then the time.
    ///
    /// Only meaningful for recurring jobs; with no days set this degenerates
    /// to a daily `*-*-* HH:MM`.
    pub fn render_calendar_spec(&self) -> String {
        let mut out = String::new();
        for day in self.schedule.active_abbreviations() {
            out.push_str(day);
            out.push(',');
        }
        out.push_str("*-*-* ");
        out.push_str(&self.time_of_day);
        out
    }

    pub fn render_shell_script(&self) -> String {
        format!("{}\n\n{}", SCRIPT_SHEBANG, self.command)
    }

    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Name: {}", self.name);
        let _ = writeln!(out, "Destination: {}", self.destination);
        let _ = writeln!(out, "Source: {}", self.source);
        let _ = writeln!(out, "Enabled: {}", self.enabled);
        out.push_str("Flags:\n");
        let _ = writeln!(out, "  Recurring: {}", self.flags.recurring);
        let _ = writeln!(out, "  Transfer compression: {}", self.flags.transfer_compression);
        let _ = writeln!(out, "  Backup compression: {}", self.flags.backup_compression);
        let _ = writeln!(out, "Days: {}", self.schedule.active_abbreviations().join(" "));
        let _ = writeln!(out, "Time: {}", self.time_of_day);
        let _ = writeln!(out, "Command: {}", self.command);
        out
    }
}
