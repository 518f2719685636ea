//! Built-in eye exercise plan, used when no plan file is given

use super::{ExerciseDefinition, Plan};

pub const BUILTIN_PLAN_NAME: &str = "Eye exercises";

/// (name, work secs, repetitions, rest secs, instruction)
const EYE_EXERCISES: &[(&str, u32, u32, u32, &str)] = &[
    ("Blink Often", 20, 1, 0, "Blink quickly and lightly"),
    ("Blink Slowly", 20, 1, 0, "Close your eyes fully on every blink"),
    ("Head Movement: Clockwise", 15, 2, 5, "Slow circles, keep your eyes forward"),
    ("Head Movement: Counterclockwise", 15, 2, 5, "Slow circles, keep your eyes forward"),
    ("Head Movement: Side to Side", 15, 1, 0, "Turn your head left and right"),
    ("Head Movement: Up and Down", 15, 1, 0, "Nod slowly"),
    ("Eye Movement: Left and Right", 15, 2, 5, "Keep your head still"),
    ("Eye Movement: Up and Down", 15, 2, 5, "Keep your head still"),
    ("Eye Movement: Figure 8", 20, 2, 5, "Trace a large sideways eight"),
    ("Eye Movement: Random Direction", 15, 1, 0, "Look around without moving your head"),
    ("Squeezing Eyes Shut", 10, 3, 5, "Squeeze for a moment, then relax"),
    ("Eyes Shut Movements", 20, 1, 0, "Roll your eyes with the lids closed"),
    ("Change Focus", 20, 2, 5, "Alternate between a near and a far object"),
    ("Temple Massage", 30, 1, 0, "Small circles with your fingertips"),
    ("Eyes Palming", 30, 1, 0, "Cover your eyes with warm palms"),
];

pub fn builtin_plan() -> Plan {
    let exercises = EYE_EXERCISES
        .iter()
        .map(|&(name, work, reps, rest, text)| {
            ExerciseDefinition::new(name, work, reps)
                .with_rest(rest)
                .with_text(text)
        })
        .collect();

    let mut plan = Plan::new(BUILTIN_PLAN_NAME, exercises);
    plan.description = Some("A short routine to rest tired eyes".to_string());
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_plan_is_valid() {
        let plan = builtin_plan().validate().unwrap();
        assert_eq!(plan.len(), EYE_EXERCISES.len());
        assert_eq!(plan.name(), BUILTIN_PLAN_NAME);
    }
}
