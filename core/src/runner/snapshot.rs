//! Read-only view of the runner for the presentation layer

use super::RunnerStatus;
use crate::timeline::SegmentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentSnapshot {
    pub index: usize,
    pub count: usize,
    pub kind: SegmentKind,
    pub elapsed_secs: u64,
    pub total_secs: u64,
}

impl SegmentSnapshot {
    pub fn remaining_secs(&self) -> u64 {
        self.total_secs.saturating_sub(self.elapsed_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RunnerSnapshot {
    pub status: RunnerStatus,
    pub plan_name: Option<String>,
    pub plan_len: usize,

    pub exercise_index: Option<usize>,
    pub exercise_name: Option<String>,
    pub on_screen_text: Option<String>,
    pub exercise_elapsed_secs: u64,
    pub exercise_total_secs: u64,

    pub segment: Option<SegmentSnapshot>,

    pub paused: bool,
    /// The last run ended by completing the plan (not by stop)
    pub finished: bool,
}

impl RunnerSnapshot {
    /// One-line status, e.g. `[2/5] Blink Slowly · Work 1/3 · 7/20s`
    pub fn status_line(&self) -> String {
        if self.finished {
            return format!("All {} exercises done", self.plan_len);
        }

        let (Some(index), Some(name), Some(segment)) =
            (self.exercise_index, self.exercise_name.as_deref(), self.segment)
        else {
            return "Idle".to_string();
        };

        let paused = if self.paused { " (paused)" } else { "" };
        format!(
            "[{}/{}] {} · {} {}/{} · {}/{}s{}",
            index + 1,
            self.plan_len,
            name,
            segment.kind,
            segment.index + 1,
            segment.count,
            segment.elapsed_secs,
            segment.total_secs,
            paused
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_formats_progress() {
        let snapshot = RunnerSnapshot {
            status: RunnerStatus::Paused,
            plan_name: Some("Desk".into()),
            plan_len: 5,
            exercise_index: Some(1),
            exercise_name: Some("Blink Slowly".into()),
            on_screen_text: None,
            exercise_elapsed_secs: 27,
            exercise_total_secs: 65,
            segment: Some(SegmentSnapshot {
                index: 0,
                count: 3,
                kind: SegmentKind::Work,
                elapsed_secs: 7,
                total_secs: 20,
            }),
            paused: true,
            finished: false,
        };
        assert_eq!(
            snapshot.status_line(),
            "[2/5] Blink Slowly · Work 1/3 · 7/20s (paused)"
        );
        assert_eq!(snapshot.segment.unwrap().remaining_secs(), 13);
    }

    #[test]
    fn idle_and_finished_lines() {
        assert_eq!(RunnerSnapshot::default().status_line(), "Idle");
        let done = RunnerSnapshot {
            plan_len: 3,
            finished: true,
            ..Default::default()
        };
        assert_eq!(done.status_line(), "All 3 exercises done");
    }
}
