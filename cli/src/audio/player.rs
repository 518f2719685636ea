//! Playback backends

use std::path::Path;
use std::process::{Child, Command, Stdio};

use cadence_core::cues::CueError;
use cadence_types::AudioSettings;

/// Something that can speak text and play sound files.
///
/// Both calls return as soon as playback has started.
pub trait CuePlayer: Send {
    fn speak(&mut self, text: &str) -> Result<(), CueError>;
    fn play_file(&mut self, path: &Path) -> Result<(), CueError>;

    /// Play an exercise announcement, cutting off the previous one
    fn play_announcement(&mut self, path: &Path) -> Result<(), CueError> {
        self.play_file(path)
    }
}

/// Player that runs external programs (`espeak`, `paplay`, ...).
///
/// A new utterance or announcement clip cuts off the previous one so
/// announcements never pile up. Cue sounds overlap freely.
pub struct CommandPlayer {
    speech_command: Vec<String>,
    sound_command: Option<Vec<String>>,
    speaking: Option<Child>,
    announcing: Option<Child>,
    playing: Vec<Child>,

    /// TTS engine (None if initialization failed or unavailable on platform)
    #[cfg(not(target_os = "linux"))]
    tts: Option<tts::Tts>,
}

impl CommandPlayer {
    pub fn new(settings: &AudioSettings) -> Self {
        #[cfg(not(target_os = "linux"))]
        let tts = match tts::Tts::default() {
            Ok(mut engine) => {
                let _ = engine.set_rate(engine.normal_rate());
                Some(engine)
            }
            Err(e) => {
                tracing::debug!(error = %e, "TTS unavailable, using speech command");
                None
            }
        };

        Self {
            speech_command: split_command(&settings.speech_command).unwrap_or_default(),
            sound_command: settings.sound_command.as_deref().and_then(split_command),
            speaking: None,
            announcing: None,
            playing: Vec::new(),
            #[cfg(not(target_os = "linux"))]
            tts,
        }
    }

    /// Collect finished sound players
    fn reap(&mut self) {
        self.playing
            .retain_mut(|child| matches!(child.try_wait(), Ok(None)));
    }

    /// Speak with the platform TTS engine, if there is one
    #[cfg(not(target_os = "linux"))]
    fn speak_tts(&mut self, text: &str) -> bool {
        match self.tts {
            Some(ref mut tts) => tts.speak(text, true).is_ok(),
            None => false,
        }
    }

    #[cfg(target_os = "linux")]
    fn speak_tts(&mut self, _text: &str) -> bool {
        false
    }

    fn sound_player(&self, path: &Path) -> Result<&[String], CueError> {
        let Some(command) = self.sound_command.as_deref() else {
            return Err(CueError::NoSoundPlayer);
        };
        if !path.is_file() {
            return Err(CueError::MissingSound {
                path: path.to_path_buf(),
            });
        }
        Ok(command)
    }
}

impl CuePlayer for CommandPlayer {
    fn speak(&mut self, text: &str) -> Result<(), CueError> {
        if self.speak_tts(text) {
            return Ok(());
        }

        stop(&mut self.speaking);
        self.speaking = Some(spawn(&self.speech_command, text)?);
        Ok(())
    }

    fn play_file(&mut self, path: &Path) -> Result<(), CueError> {
        self.reap();
        let child = spawn(self.sound_player(path)?, &path.to_string_lossy())?;
        self.playing.push(child);
        Ok(())
    }

    fn play_announcement(&mut self, path: &Path) -> Result<(), CueError> {
        let command = self.sound_player(path)?;
        let child = spawn(command, &path.to_string_lossy());
        stop(&mut self.announcing);
        self.announcing = Some(child?);
        Ok(())
    }
}

/// Kill the child in `slot` if it is still running. Returns it, reaped.
fn stop(slot: &mut Option<Child>) -> Option<Child> {
    let mut child = slot.take()?;
    if matches!(child.try_wait(), Ok(None)) {
        let _ = child.kill();
        let _ = child.wait();
    }
    Some(child)
}

/// Split a configured command line into program and arguments.
/// None for an empty or badly quoted command.
fn split_command(command: &str) -> Option<Vec<String>> {
    shlex::split(command).filter(|parts| !parts.is_empty())
}

/// Run `command` with `last_arg` appended, detached from the terminal
fn spawn(command: &[String], last_arg: &str) -> Result<Child, CueError> {
    let Some((program, args)) = command.split_first() else {
        return Err(CueError::Spawn {
            command: String::new(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command"),
        });
    };

    Command::new(program)
        .args(args)
        .arg(last_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| CueError::Spawn {
            command: program.clone(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_are_split_like_a_shell() {
        assert_eq!(
            split_command("espeak -s 150 -v 'en-us'"),
            Some(vec![
                "espeak".to_string(),
                "-s".to_string(),
                "150".to_string(),
                "en-us".to_string()
            ])
        );
        assert_eq!(split_command("   "), None);
        assert_eq!(split_command("say \"unterminated"), None);
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let command = vec!["cadence-no-such-program".to_string()];
        assert!(matches!(
            spawn(&command, "hello"),
            Err(CueError::Spawn { command, .. }) if command == "cadence-no-such-program"
        ));
        assert!(matches!(spawn(&[], "hello"), Err(CueError::Spawn { .. })));
    }

    #[test]
    fn files_need_a_player_and_an_existing_path() {
        let settings = AudioSettings {
            sound_command: None,
            ..Default::default()
        };
        let mut player = CommandPlayer::new(&settings);
        assert!(matches!(
            player.play_file(Path::new("/nonexistent/work.mp3")),
            Err(CueError::NoSoundPlayer)
        ));

        let settings = AudioSettings {
            sound_command: Some("true".into()),
            ..Default::default()
        };
        let mut player = CommandPlayer::new(&settings);
        assert!(matches!(
            player.play_file(Path::new("/nonexistent/work.mp3")),
            Err(CueError::MissingSound { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn new_announcement_stops_the_previous_one() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("blink-often.mp3");
        std::fs::write(&clip, b"").unwrap();

        // The clip path lands in $0, so the player just sleeps
        let settings = AudioSettings {
            sound_command: Some("sh -c 'sleep 30'".into()),
            ..Default::default()
        };
        let mut player = CommandPlayer::new(&settings);
        player.play_announcement(&clip).unwrap();
        let mut first = player.announcing.take();
        assert!(matches!(first.as_mut().unwrap().try_wait(), Ok(None)));

        let mut stopped = stop(&mut first).unwrap();
        assert!(first.is_none());
        assert!(matches!(stopped.try_wait(), Ok(Some(_))));

        player.play_announcement(&clip).unwrap();
        let previous = player.announcing.as_ref().unwrap().id();
        player.play_announcement(&clip).unwrap();
        assert_ne!(player.announcing.as_ref().unwrap().id(), previous);
        assert!(player.playing.is_empty());

        stop(&mut player.announcing);
    }
}
