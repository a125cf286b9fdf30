//! Render timing collected in debug mode.

use std::fmt::Write;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileKind {
    /// A top-level `render` call.
    Template,
    /// A template source read from disk while rendering.
    Load,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileEntry {
    pub kind: ProfileKind,
    pub name: String,
    pub duration: Duration,
    pub children: Vec<ProfileEntry>,
}

#[derive(Debug, Default)]
struct ProfileState {
    entries: Vec<ProfileEntry>,
    /// Loads recorded since the last finished render.
    pending: Vec<ProfileEntry>,
}

/// Timing records of every render performed by a debug-mode renderer.
#[derive(Debug, Default)]
pub struct Profile {
    state: Mutex<ProfileState>,
}

impl Profile {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ProfileState> {
        // A panicking filter must not disable profiling for later renders.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn record_load(&self, name: &str, duration: Duration) {
        self.lock().pending.push(ProfileEntry {
            kind: ProfileKind::Load,
            name: name.to_string(),
            duration,
            children: Vec::new(),
        });
    }

    pub(crate) fn record_template(&self, name: &str, duration: Duration) {
        let mut state = self.lock();
        let children = std::mem::take(&mut state.pending);
        state.entries.push(ProfileEntry {
            kind: ProfileKind::Template,
            name: name.to_string(),
            duration,
            children,
        });
    }

    /// Snapshot of the recorded renders, oldest first.
    pub fn entries(&self) -> Vec<ProfileEntry> {
        self.lock().entries.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total time spent in recorded renders.
    pub fn duration(&self) -> Duration {
        self.lock().entries.iter().map(|e| e.duration).sum()
    }

    pub fn reset(&self) {
        let mut state = self.lock();
        state.entries.clear();
        state.pending.clear();
    }

    /// Renders the profile as an indented text tree:
    ///
    /// ```text
    /// main 12.40ms/100%
    /// └ index.html 10.02ms/81%
    ///   └ load base.html 0.31ms/3%
    /// ```
    pub fn dump(&self) -> String {
        let entries = self.entries();
        let total = entries.iter().map(|e| e.duration).sum::<Duration>();
        let mut out = String::new();
        let _ = writeln!(out, "main {}/100%", format_duration(total));
        for entry in &entries {
            dump_entry(&mut out, entry, total, 0);
        }
        out
    }
}

fn dump_entry(out: &mut String, entry: &ProfileEntry, total: Duration, depth: usize) {
    let label = match entry.kind {
        ProfileKind::Template => entry.name.clone(),
        ProfileKind::Load => format!("load {}", entry.name),
    };
    let _ = writeln!(
        out,
        "{}└ {} {}/{:.0}%",
        "  ".repeat(depth),
        label,
        format_duration(entry.duration),
        percent(entry.duration, total)
    );
    for child in &entry.children {
        dump_entry(out, child, total, depth + 1);
    }
}

fn format_duration(duration: Duration) -> String {
    format!("{:.2}ms", duration.as_secs_f64() * 1000.0)
}

fn percent(part: Duration, total: Duration) -> f64 {
    if total.is_zero() {
        0.0
    } else {
        part.as_secs_f64() / total.as_secs_f64() * 100.0
    }
}
