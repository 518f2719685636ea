use rand::seq::SliceRandom;

pub const PRAISE_PHRASES: &[&str] = &[
    "Good job!",
    "Nice one, pal!",
    "Well done, buddy!",
    "You are the best",
    "All done!",
    "You've made it",
    "Keep up the good work!",
    "You're doing great!",
    "Fantastic work!",
    "Keep it up!",
];

/// Pick a praise phrase for the end of a plan
pub fn random_praise() -> &'static str {
    PRAISE_PHRASES
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or("Well done!")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn praise_comes_from_the_list() {
        for _ in 0..20 {
            assert!(PRAISE_PHRASES.contains(&random_praise()));
        }
    }
}
