//! Modality module - the three kinds of intake artifact

use std::fmt;

/// Kind of artifact accepted by the intake workflow
///
/// Each modality has its own extraction collaborator:
/// - Audio: speech recognition, yields a transcript
/// - Document: text extraction from a lab report, yields text
/// - Image: image analysis, yields metrics and an optional preview
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Modality {
    /// Voice recording of the patient
    Audio,

    /// Lab report (PDF)
    Document,

    /// Medical image
    Image,
}

impl Modality {
    /// All modalities, in dispatch order
    pub const ALL: [Modality; 3] = [Modality::Audio, Modality::Document, Modality::Image];

    /// Get the modality name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Audio => "audio",
            Modality::Document => "document",
            Modality::Image => "image",
        }
    }

    /// Parse a modality from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "audio" => Some(Modality::Audio),
            "document" | "doc" | "pdf" => Some(Modality::Document),
            "image" | "img" => Some(Modality::Image),
            _ => None,
        }
    }

    /// Whether a media type is acceptable for this modality
    ///
    /// Mirrors the selection filter: `audio/*`, `application/pdf`, `image/*`.
    ///
    /// # Examples
    ///
    /// ```
    /// use triage_domain::Modality;
    ///
    /// assert!(Modality::Audio.accepts("audio/wav"));
    /// assert!(Modality::Document.accepts("application/pdf"));
    /// assert!(!Modality::Image.accepts("application/pdf"));
    /// ```
    pub fn accepts(&self, media_type: &str) -> bool {
        let media_type = media_type.trim().to_ascii_lowercase();
        match self {
            Modality::Audio => media_type.starts_with("audio/"),
            Modality::Document => media_type == "application/pdf",
            Modality::Image => media_type.starts_with("image/"),
        }
    }
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid modality: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(Modality::parse("AUDIO"), Some(Modality::Audio));
        assert_eq!(Modality::parse("pdf"), Some(Modality::Document));
        assert_eq!(Modality::parse("img"), Some(Modality::Image));
        assert_eq!(Modality::parse("video"), None);
    }

    #[test]
    fn test_media_kind_filter() {
        assert!(Modality::Audio.accepts("audio/mpeg"));
        assert!(!Modality::Audio.accepts("video/mp4"));
        assert!(Modality::Document.accepts("Application/PDF"));
        assert!(!Modality::Document.accepts("text/plain"));
        assert!(Modality::Image.accepts("image/png"));
        assert!(!Modality::Image.accepts("audio/wav"));
    }

    #[test]
    fn test_display_round_trip() {
        for modality in Modality::ALL {
            assert_eq!(modality.to_string().parse::<Modality>(), Ok(modality));
        }
    }
}
