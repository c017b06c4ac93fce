//! Typed capture events translated from pipeline bus messages.

use gst::prelude::*;
use gst::MessageView;

/// Element message posted by the preview sink once its frame size is known.
pub const PREPARE_SURFACE: &str = "prepare-surface";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    EndOfStream,
    Error {
        message: String,
        debug: Option<String>,
    },
    /// The preview sink is ready to draw frames of this size.
    PrepareSurface { width: u32, height: u32 },
}

impl CaptureEvent {
    /// Translate a bus message. Messages the viewer does not care about map
    /// to `None`.
    pub fn from_message(msg: &gst::MessageRef) -> Option<Self> {
        match msg.view() {
            MessageView::Eos(..) => Some(CaptureEvent::EndOfStream),
            MessageView::Error(err) => Some(CaptureEvent::Error {
                message: err.error().to_string(),
                debug: err.debug().map(|d| d.to_string()),
            }),
            MessageView::Element(element) => {
                let s = element.structure()?;
                if s.name() != PREPARE_SURFACE {
                    return None;
                }
                Some(CaptureEvent::PrepareSurface {
                    width: s.get::<u32>("width").ok()?,
                    height: s.get::<u32>("height").ok()?,
                })
            }
            _ => None,
        }
    }
}

/// Build the element message announcing a drawable surface of `width`×`height`.
pub fn prepare_surface_message(
    src: &impl IsA<gst::Object>,
    width: u32,
    height: u32,
) -> gst::Message {
    let structure = gst::Structure::builder(PREPARE_SURFACE)
        .field("width", width)
        .field("height", height)
        .build();
    gst::message::Element::builder(structure).src(src).build()
}

/// Receiver of capture events, called on the thread that drains the bus.
pub trait CaptureEventHandler {
    fn on_event(&mut self, event: &CaptureEvent);
}

/// Records events in arrival order.
impl CaptureEventHandler for Vec<CaptureEvent> {
    fn on_event(&mut self, event: &CaptureEvent) {
        self.push(event.clone());
    }
}
