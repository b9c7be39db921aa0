//! Lifecycle events emitted while test files are read.

use std::collections::HashMap;
use std::path::Path;

/// Events fired around each file load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// A test file is about to be read.
    BeforeFileRead,
    /// A test file finished loading.
    AfterFileRead,
}

type Handler = Box<dyn FnMut(&Path)>;

/// Single-threaded event emitter keyed by [`Event`].
///
/// Handlers fire synchronously, in subscription order. The payload is the
/// path of the file the event concerns.
#[derive(Default)]
pub struct EventEmitter {
    handlers: HashMap<Event, Vec<Handler>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a handler for `event`.
    pub fn on(&mut self, event: Event, handler: impl FnMut(&Path) + 'static) -> &mut Self {
        self.handlers.entry(event).or_default().push(Box::new(handler));
        self
    }

    /// Calls every handler subscribed to `event` with `path`.
    pub fn emit(&mut self, event: Event, path: &Path) {
        if let Some(handlers) = self.handlers.get_mut(&event) {
            for handler in handlers {
                handler(path);
            }
        }
    }
}
