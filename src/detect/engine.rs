use tokio::sync::oneshot;

use crate::detect::Detection;
use crate::error::RelayError;
use crate::media::RgbFrame;

/// One detection job handed to the engine.
#[derive(Debug)]
pub struct DetectRequest {
    /// Tracker-assigned id, echoed back in the completion.
    pub id: u64,
    pub frame: RgbFrame,
    /// Capture timestamp of the frame, milliseconds.
    pub timestamp_ms: i64,
}

/// Engine-side completion event for a single request.
#[derive(Debug)]
pub struct Completion {
    pub request_id: u64,
    pub detection: Detection,
    /// Engine clock at completion, milliseconds. Feeds the fps estimate.
    pub timestamp_ms: i64,
}

/// Sender half of the per-request completion channel. Dropped receivers
/// (timed-out requests) make the send fail; engines may ignore that.
pub type CompletionSender = oneshot::Sender<Completion>;

/// Asynchronous face-landmark engine.
///
/// `submit` must not block: it queues the frame and returns. The engine
/// delivers exactly one [`Completion`] per request on the provided sender,
/// echoing the request id. Implementations must not retain pixel data past
/// the completion.
pub trait LandmarkEngine: Send {
    /// Engine identifier, for logs and config matching.
    fn name(&self) -> &'static str;

    /// Queue one frame for detection.
    fn submit(&mut self, request: DetectRequest, done: CompletionSender) -> Result<(), RelayError>;
}

impl<E: LandmarkEngine + ?Sized> LandmarkEngine for Box<E> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn submit(&mut self, request: DetectRequest, done: CompletionSender) -> Result<(), RelayError> {
        (**self).submit(request, done)
    }
}
