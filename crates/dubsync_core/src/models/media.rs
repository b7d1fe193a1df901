//! Audio source descriptors.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::enums::Slot;

/// File extensions the panel offers in its file picker.
pub const ACCEPTED_EXTENSIONS: &[&str] = &["mkv", "ac3", "eac3", "dts", "wav", "flac"];

const UNKNOWN_MIME: &str = "audio/unknown";

/// A locally chosen file, before the engine has looked at it.
///
/// Only the name ever crosses the wire; the engine resolves it inside
/// its working directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChosenFile {
    /// File name without directories.
    pub name: String,
    /// Local size in bytes.
    pub size_bytes: u64,
    /// MIME type guessed from the extension.
    pub mime_hint: Option<String>,
}

impl ChosenFile {
    pub fn new(name: impl Into<String>, size_bytes: u64) -> Self {
        let name = name.into();
        let mime_hint = mime_for_name(&name).map(str::to_string);
        Self {
            name,
            size_bytes,
            mime_hint,
        }
    }

    /// Build from a local path, keeping only the file name.
    pub fn from_path(path: &Path, size_bytes: u64) -> Option<Self> {
        let name = path.file_name()?.to_str()?;
        Some(Self::new(name, size_bytes))
    }
}

/// Guess the MIME type of an accepted audio container.
pub fn mime_for_name(name: &str) -> Option<&'static str> {
    let extension = Path::new(name).extension()?.to_str()?.to_lowercase();
    let mime = match extension.as_str() {
        "mkv" => "audio/x-matroska",
        "ac3" => "audio/ac3",
        "eac3" => "audio/eac3",
        "dts" => "audio/vnd.dts",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        _ => return None,
    };
    Some(mime)
}

/// An audio source the engine has confirmed it can read.
///
/// Immutable once created; re-selecting a file replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioDescriptor {
    pub name: String,
    pub size_bytes: u64,
    pub mime_hint: String,
    pub duration_seconds: Option<f64>,
    /// Channel layout label, e.g. "6ch".
    pub channel_layout: Option<String>,
    pub codec: Option<String>,
}

impl AudioDescriptor {
    /// Combine the local file facts with what the engine reported.
    pub fn from_probe(
        file: &ChosenFile,
        channels: Option<u32>,
        codec: Option<String>,
        duration: Option<f64>,
    ) -> Self {
        Self {
            name: file.name.clone(),
            size_bytes: file.size_bytes,
            mime_hint: file
                .mime_hint
                .clone()
                .unwrap_or_else(|| UNKNOWN_MIME.to_string()),
            duration_seconds: duration.filter(|d| d.is_finite() && *d >= 0.0),
            channel_layout: channels.map(|c| format!("{}ch", c)),
            codec: codec.filter(|c| !c.trim().is_empty()),
        }
    }

    /// Codec label for display.
    pub fn codec_label(&self) -> &str {
        self.codec.as_deref().unwrap_or("Unknown")
    }

    /// Channel label for display.
    pub fn channel_label(&self) -> &str {
        self.channel_layout.as_deref().unwrap_or("Unknown")
    }
}

/// One value per slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerSlot<T> {
    pub master: T,
    pub dub: T,
}

impl<T> PerSlot<T> {
    pub fn get(&self, slot: Slot) -> &T {
        match slot {
            Slot::Master => &self.master,
            Slot::Dub => &self.dub,
        }
    }

    pub fn get_mut(&mut self, slot: Slot) -> &mut T {
        match slot {
            Slot::Master => &mut self.master,
            Slot::Dub => &mut self.dub,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chosen_file_guesses_mime() {
        let file = ChosenFile::new("Movie.EAC3", 10);
        assert_eq!(file.mime_hint.as_deref(), Some("audio/eac3"));
        assert_eq!(ChosenFile::new("notes.txt", 1).mime_hint, None);
    }

    #[test]
    fn from_path_keeps_only_name() {
        let file = ChosenFile::from_path(Path::new("/home/me/media/master.wav"), 42).unwrap();
        assert_eq!(file.name, "master.wav");
        assert_eq!(file.size_bytes, 42);
    }

    #[test]
    fn descriptor_from_probe() {
        let file = ChosenFile::new("dub.dts", 1024);
        let descriptor =
            AudioDescriptor::from_probe(&file, Some(6), Some("dts".into()), Some(5400.5));
        assert_eq!(descriptor.channel_label(), "6ch");
        assert_eq!(descriptor.codec_label(), "dts");
        assert_eq!(descriptor.mime_hint, "audio/vnd.dts");
        assert_eq!(descriptor.duration_seconds, Some(5400.5));
    }

    #[test]
    fn descriptor_labels_fall_back() {
        let file = ChosenFile::new("mystery", 0);
        let descriptor = AudioDescriptor::from_probe(&file, None, Some(" ".into()), Some(f64::NAN));
        assert_eq!(descriptor.codec_label(), "Unknown");
        assert_eq!(descriptor.channel_label(), "Unknown");
        assert_eq!(descriptor.mime_hint, "audio/unknown");
        assert_eq!(descriptor.duration_seconds, None);
    }

    #[test]
    fn per_slot_access() {
        let mut slots: PerSlot<u32> = PerSlot::default();
        *slots.get_mut(Slot::Dub) += 3;
        assert_eq!(*slots.get(Slot::Dub), 3);
        assert_eq!(*slots.get(Slot::Master), 0);
    }
}
