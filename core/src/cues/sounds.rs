//! Sound file lookup
//!
//! Layout under the sounds directory:
//!
//! ```text
//! sounds/
//! ├── work.mp3               segment cues (mp3, wav or ogg)
//! ├── rest.mp3
//! └── announcements/
//!     └── blink-often.mp3    one clip per exercise
//! ```
//!
//! Clips are named by slug, except for the built-in exercises listed in
//! [`BUILTIN_CLIPS`] whose recordings were named by hand.

use std::path::{Path, PathBuf};

use crate::timeline::SegmentKind;

pub const ANNOUNCEMENTS_DIR: &str = "announcements";
const SOUND_EXTENSIONS: &[&str] = &["mp3", "wav", "ogg"];

/// Built-in exercises whose clip stem is not their slug
pub const BUILTIN_CLIPS: &[(&str, &str)] = &[
    ("Head Movement: Up and Down", "head-movement-up-down"),
    ("Eye Movement: Left and Right", "eye-movement-left-right"),
    ("Eye Movement: Up and Down", "eye-movement-updown"),
    ("Eye Movement: Figure 8", "eye-movement-eight"),
];

/// File-name slug of an exercise: `"Head Movement: Up and Down"` → `head-movement-up-and-down`
pub fn exercise_slug(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c != '\'' {
            pending_dash = true;
        }
    }

    slug
}

/// Clip file stem of an exercise: the recorded name for built-ins, the slug otherwise
pub fn clip_stem(exercise: &str) -> String {
    BUILTIN_CLIPS
        .iter()
        .find(|(name, _)| *name == exercise)
        .map_or_else(|| exercise_slug(exercise), |(_, stem)| (*stem).to_string())
}

/// Announcement clip file name of an exercise
pub fn clip_file_name(exercise: &str) -> String {
    format!("{}.mp3", clip_stem(exercise))
}

/// Path of the announcement clip for `exercise`, if the file exists
pub fn announcement_clip(sounds_dir: &Path, exercise: &str) -> Option<PathBuf> {
    let stem = clip_stem(exercise);
    if stem.is_empty() {
        return None;
    }
    find_with_extensions(&sounds_dir.join(ANNOUNCEMENTS_DIR), &stem)
}

/// Path of the cue sound for entering a `kind` segment, if the file exists
pub fn cue_sound(sounds_dir: &Path, kind: SegmentKind) -> Option<PathBuf> {
    let stem = match kind {
        SegmentKind::Work => "work",
        SegmentKind::Rest => "rest",
    };
    find_with_extensions(sounds_dir, stem)
}

fn find_with_extensions(dir: &Path, stem: &str) -> Option<PathBuf> {
    SOUND_EXTENSIONS
        .iter()
        .map(|ext| dir.join(format!("{stem}.{ext}")))
        .find(|path| path.is_file())
}
