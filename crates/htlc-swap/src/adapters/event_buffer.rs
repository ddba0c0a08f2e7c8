use crate::domain::SwapEvent;
use crate::ports::EventEmitter;

/// Collects events for the duration of one call.
///
/// The host drains the buffer after commit; a discarded call drops it.
#[derive(Clone, Debug, Default)]
pub struct BufferedEventEmitter {
    events: Vec<SwapEvent>,
}

impl BufferedEventEmitter {
    pub fn events(&self) -> &[SwapEvent] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<SwapEvent> {
        std::mem::take(&mut self.events)
    }
}

impl EventEmitter for BufferedEventEmitter {
    fn emit(&mut self, event: SwapEvent) {
        self.events.push(event);
    }
}
