use std::collections::VecDeque;

/// One recorded engine event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceEvent {
    pub kind: &'static str,
    pub message: String,
}

/// Bounded trace of recent engine events.
///
/// Feeds the debug overlay; oldest events fall off when the ring is full.
#[derive(Debug)]
pub struct EventTrace {
    events: VecDeque<TraceEvent>,
    cap: usize,
}

impl EventTrace {
    pub fn new(cap: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(cap),
            cap,
        }
    }

    pub fn emit(&mut self, kind: &'static str, message: impl Into<String>) {
        if self.events.len() == self.cap {
            self.events.pop_front();
        }
        self.events.push_back(TraceEvent {
            kind,
            message: message.into(),
        });
    }

    pub fn events(&self) -> impl Iterator<Item = &TraceEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn drain(&mut self) -> Vec<TraceEvent> {
        self.events.drain(..).collect()
    }
}

impl Default for EventTrace {
    fn default() -> Self {
        Self::new(128)
    }
}
