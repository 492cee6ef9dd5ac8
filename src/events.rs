use crate::artwork::ArtworkId;
use crate::mode::Mode;
use std::fmt;

/// Outward notifications for the shell / UI chrome.
#[derive(Debug, Clone, PartialEq)]
pub enum NavigatorEvent {
    CollectionLoaded { count: usize },
    FocusChanged { id: Option<ArtworkId>, index: Option<usize> },
    ViewpointChanged { index: usize },
    ModeChanged { from: Mode, to: Mode },
    SearchOverlayOpened,
    InstructionsDismissed,
    SearchApplied { term: String, matches: usize },
    NoResults { term: String },
    ImageLoadFailed { reference: String, reason: String },
}

impl fmt::Display for NavigatorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavigatorEvent::CollectionLoaded { count } => write!(f, "CollectionLoaded count={count}"),
            NavigatorEvent::FocusChanged { id: Some(id), index } => {
                write!(f, "FocusChanged id={id} index={}", index.unwrap_or_default())
            }
            NavigatorEvent::FocusChanged { id: None, .. } => write!(f, "FocusChanged empty"),
            NavigatorEvent::ViewpointChanged { index } => write!(f, "ViewpointChanged index={index}"),
            NavigatorEvent::ModeChanged { from, to } => write!(f, "ModeChanged {from} -> {to}"),
            NavigatorEvent::SearchOverlayOpened => write!(f, "SearchOverlayOpened"),
            NavigatorEvent::InstructionsDismissed => write!(f, "InstructionsDismissed"),
            NavigatorEvent::SearchApplied { term, matches } => {
                write!(f, "SearchApplied term='{term}' matches={matches}")
            }
            NavigatorEvent::NoResults { term } => write!(f, "NoResults term='{term}'"),
            NavigatorEvent::ImageLoadFailed { reference, reason } => {
                write!(f, "ImageLoadFailed reference={reference} reason={reason}")
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<NavigatorEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: NavigatorEvent) {
        self.events.push(event);
    }

    pub fn drain(&mut self) -> Vec<NavigatorEvent> {
        self.events.drain(..).collect()
    }
}
