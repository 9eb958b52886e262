//! Side effects the director asks the page to carry out.

use crate::playback::PlaybackCommand;
use crate::reveal::RevealFrame;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    ShowOverlay,
    HideOverlay,
    SetOverlayOpacity(f64),
    /// Mute, play (from the start unless `resume`), then restore mute.
    PlayIntro { resume: bool },
    /// Pause and remember the position.
    PauseIntro,
    /// Stop looping and pause; the intro is done for this visit.
    EndIntro,
    Video(PlaybackCommand),
    FadeOut,
    Navigate { url: String },
    /// Scroll the gallery list by a signed number of pixels.
    ScrollGallery { by: f64 },
    GalleryFrame(RevealFrame),
    /// The gallery crossed the fully-open threshold; re-measure the grid.
    GalleryStateChanged { open: bool },
    SetCtaVisible(bool),
    RotationToggled { enabled: bool },
    CloseCaseViewer,
    CollapseExpanded,
    OpenCaseStudy { page: u32 },
}

/// Reaction to one input event.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outcome {
    pub commands: Vec<Command>,
    /// Whether the DOM event's default action should be suppressed.
    pub prevent_default: bool,
}

impl Outcome {
    pub fn ignored() -> Self {
        Self::default()
    }

    pub fn consumed() -> Self {
        Self {
            commands: Vec::new(),
            prevent_default: true,
        }
    }

    pub fn push(&mut self, command: Command) {
        self.commands.push(command);
    }
}
