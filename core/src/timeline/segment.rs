//! Segment generation
//!
//! An exercise expands into a timeline of Work and Rest segments:
//!
//! ```text
//! repetitions = 3, work = 10s, rest = 5s
//!
//! |  Work  | Rest |  Work  | Rest |  Work  |
//! 0      10000  15000   25000  30000   40000   (offsets in ms)
//! ```
//!
//! There is no rest after the final repetition.

use serde::{Deserialize, Serialize};

use crate::plan::{ExerciseDefinition, PlanError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    Work,
    Rest,
}

impl SegmentKind {
    pub fn label(&self) -> &'static str {
        match self {
            SegmentKind::Work => "Work",
            SegmentKind::Rest => "Rest",
        }
    }
}

impl std::fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.label())
    }
}

/// One timed interval of an exercise, positioned relative to the exercise start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub start_offset_ms: u64,
    pub end_offset_ms: u64,
    pub duration_secs: u32,
}

impl Segment {
    fn new(kind: SegmentKind, start_offset_ms: u64, duration_secs: u32) -> Self {
        Self {
            kind,
            start_offset_ms,
            end_offset_ms: start_offset_ms + u64::from(duration_secs) * 1000,
            duration_secs,
        }
    }
}

/// The contiguous segments of one exercise. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timeline {
    segments: Vec<Segment>,
}

impl Timeline {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn get(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.segments.iter()
    }

    /// End offset of the last segment
    pub fn total_duration_ms(&self) -> u64 {
        self.segments.last().map_or(0, |s| s.end_offset_ms)
    }

    pub fn total_duration_secs(&self) -> u64 {
        self.segments.iter().map(|s| u64::from(s.duration_secs)).sum()
    }
}

/// Expand an exercise into its timeline, rejecting invalid definitions
pub fn generate(exercise: &ExerciseDefinition) -> Result<Timeline, PlanError> {
    exercise.validate()?;
    Ok(expand(exercise))
}

/// Expansion without validation; callers guarantee the exercise passed `validate`
pub(crate) fn expand(exercise: &ExerciseDefinition) -> Timeline {
    let rest = exercise.rest_secs();
    let mut segments = Vec::with_capacity(exercise.repetitions as usize * 2);
    let mut cursor_ms = 0;

    for i in 0..exercise.repetitions {
        let work = Segment::new(SegmentKind::Work, cursor_ms, exercise.work_duration_secs);
        cursor_ms = work.end_offset_ms;
        segments.push(work);

        if let Some(rest) = rest.filter(|_| i + 1 < exercise.repetitions) {
            let rest = Segment::new(SegmentKind::Rest, cursor_ms, rest);
            cursor_ms = rest.end_offset_ms;
            segments.push(rest);
        }
    }

    Timeline { segments }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_contiguous(timeline: &Timeline) {
        assert_eq!(timeline.segments()[0].start_offset_ms, 0);
        for pair in timeline.segments().windows(2) {
            assert_eq!(pair[0].end_offset_ms, pair[1].start_offset_ms);
        }
        for s in timeline.iter() {
            assert!(s.end_offset_ms > s.start_offset_ms);
            assert_eq!(s.end_offset_ms - s.start_offset_ms, u64::from(s.duration_secs) * 1000);
        }
    }

    #[test]
    fn with_rest_alternates_and_ends_with_work() {
        for reps in 1..=6u32 {
            let ex = ExerciseDefinition::new("Squats", 7, reps).with_rest(3);
            let timeline = generate(&ex).unwrap();

            assert_eq!(timeline.len(), (2 * reps - 1) as usize);
            for (i, s) in timeline.iter().enumerate() {
                let expected = if i % 2 == 0 { SegmentKind::Work } else { SegmentKind::Rest };
                assert_eq!(s.kind, expected);
            }
            assert_eq!(timeline.segments().last().unwrap().kind, SegmentKind::Work);
            assert_contiguous(&timeline);
            assert_eq!(
                timeline.total_duration_secs(),
                u64::from(reps * 7 + (reps - 1) * 3)
            );
            assert_eq!(timeline.total_duration_ms(), timeline.total_duration_secs() * 1000);
        }
    }

    #[test]
    fn without_rest_is_only_work() {
        let ex = ExerciseDefinition::new("Plank", 30, 4);
        let timeline = generate(&ex).unwrap();

        assert_eq!(timeline.len(), 4);
        assert!(timeline.iter().all(|s| s.kind == SegmentKind::Work));
        assert_contiguous(&timeline);
        assert_eq!(timeline.total_duration_secs(), 120);
    }

    #[test]
    fn zero_rest_generates_no_rest_segments() {
        let ex = ExerciseDefinition::new("Plank", 30, 2).with_rest(0);
        assert_eq!(generate(&ex).unwrap().len(), 2);
    }

    #[test]
    fn single_repetition_has_no_rest() {
        let ex = ExerciseDefinition::new("Palming", 30, 1).with_rest(10);
        let timeline = generate(&ex).unwrap();
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.total_duration_ms(), 30_000);
    }

    #[test]
    fn offsets_are_cumulative() {
        let ex = ExerciseDefinition::new("Squats", 10, 3).with_rest(5);
        let offsets: Vec<_> = generate(&ex)
            .unwrap()
            .iter()
            .map(|s| (s.start_offset_ms, s.end_offset_ms))
            .collect();
        assert_eq!(
            offsets,
            vec![(0, 10_000), (10_000, 15_000), (15_000, 25_000), (25_000, 30_000), (30_000, 40_000)]
        );
    }

    #[test]
    fn rejects_invalid_input() {
        assert!(matches!(
            generate(&ExerciseDefinition::new("Zero", 0, 3)),
            Err(PlanError::NonPositiveDuration { .. })
        ));
        assert!(matches!(
            generate(&ExerciseDefinition::new("None", 10, 0)),
            Err(PlanError::NonPositiveRepetitions { .. })
        ));
    }

    #[test]
    fn overlong_exercise_is_an_error_not_a_panic() {
        let ex = ExerciseDefinition::new("Long", u32::MAX, 5_000_000).with_rest(u32::MAX);
        assert!(matches!(generate(&ex), Err(PlanError::DurationTooLong { .. })));

        let ex = ExerciseDefinition::new("Blink", 1, u32::MAX);
        assert!(matches!(generate(&ex), Err(PlanError::DurationTooLong { .. })));
    }

    #[test]
    fn longest_allowed_exercise_expands() {
        let ex = ExerciseDefinition::new("Hour", 3600, 24);
        let timeline = generate(&ex).unwrap();
        assert_eq!(timeline.len(), 24);
        assert_eq!(timeline.total_duration_ms(), 86_400_000);
    }
}
