use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::event::error::EventSystemError;
use crate::event::{Event, EventHandler, EventId, EventResult};

type SharedHandler = Arc<dyn Fn(&dyn Event) -> EventResult + Send + Sync>;

//--------------------------------------------------
// EventDispatcher (Internal, wrapped by SharedEventDispatcher)
//--------------------------------------------------

/// Event dispatcher holding name-keyed and type-keyed handlers
pub struct EventDispatcher {
    handlers: HashMap<&'static str, Vec<(EventId, SharedHandler)>>,
    type_handlers: HashMap<TypeId, Vec<(EventId, SharedHandler)>>,
    next_handler_id: EventId,
}

impl fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventDispatcher")
         .field("name_handlers_count", &self.name_handler_count())
         .field("type_handlers_count", &self.type_handler_count())
         .field("next_handler_id", &self.next_handler_id)
         .finish()
    }
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
            type_handlers: HashMap::new(),
            next_handler_id: 1,
        }
    }

    fn next_id(&mut self) -> EventId {
        let id = self.next_handler_id;
        self.next_handler_id += 1;
        id
    }

    /// Register a handler for events with a specific name
    pub fn register_handler(&mut self, event_name: &'static str, handler: EventHandler) -> EventId {
        let id = self.next_id();
        self.handlers.entry(event_name).or_default().push((id, Arc::from(handler)));
        id
    }

    /// Register a handler for one concrete event type
    pub fn register_type_handler<E, F>(&mut self, handler: F) -> EventId
    where
        E: Event + 'static,
        F: Fn(&E) -> EventResult + Send + Sync + 'static,
    {
        let id = self.next_id();
        let typed: SharedHandler = Arc::new(move |event: &dyn Event| {
            match event.as_any().downcast_ref::<E>() {
                Some(e) => handler(e),
                None => EventResult::Continue,
            }
        });
        self.type_handlers.entry(TypeId::of::<E>()).or_default().push((id, typed));
        id
    }

    /// Remove a handler by ID from both tables
    pub fn unregister_handler(&mut self, id: EventId) -> bool {
        let mut found = false;
        for handlers in self.handlers.values_mut().chain(self.type_handlers.values_mut()) {
            let len_before = handlers.len();
            handlers.retain(|(h_id, _)| *h_id != id);
            if handlers.len() < len_before {
                found = true;
            }
        }
        found
    }

    /// Handlers that should see `event`, name-keyed first
    fn handlers_for(&self, event: &dyn Event) -> Vec<SharedHandler> {
        let by_name = self.handlers.get(event.name()).into_iter().flatten();
        let by_type = self.type_handlers.get(&event.as_any().type_id()).into_iter().flatten();
        by_name.chain(by_type).map(|(_, handler)| handler.clone()).collect()
    }

    /// Dispatch directly, stopping at the first handler that returns `Stop`
    pub fn dispatch_internal(&self, event: &dyn Event) -> EventResult {
        run_handlers(&self.handlers_for(event), event)
    }

    pub fn name_handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn type_handler_count(&self) -> usize {
        self.type_handlers.values().map(Vec::len).sum()
    }
}

impl Default for EventDispatcher { fn default() -> Self { Self::new() } }

fn run_handlers(handlers: &[SharedHandler], event: &dyn Event) -> EventResult {
    for handler in handlers {
        if handler(event) == EventResult::Stop {
            return EventResult::Stop;
        }
    }
    EventResult::Continue
}

//--------------------------------------------------
// SharedEventDispatcher (Public API)
//--------------------------------------------------

/// Cloneable handle to one dispatcher
#[derive(Clone)]
pub struct SharedEventDispatcher {
    dispatcher: Arc<Mutex<EventDispatcher>>,
}

impl fmt::Debug for SharedEventDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedEventDispatcher").finish_non_exhaustive()
    }
}

impl SharedEventDispatcher {
    pub fn new() -> Self { Self { dispatcher: Arc::new(Mutex::new(EventDispatcher::new())) } }

    fn lock(&self) -> Result<MutexGuard<'_, EventDispatcher>, EventSystemError> {
        self.dispatcher.lock().map_err(|_| EventSystemError::DispatcherPoisoned {
            component: "handlers".to_string(),
        })
    }

    /// Dispatch an event. Handlers run after the lock is released, so a
    /// handler may register or dispatch further events.
    pub fn dispatch(&self, event: &dyn Event) -> Result<EventResult, EventSystemError> {
        let handlers = self.lock()?.handlers_for(event);
        Ok(run_handlers(&handlers, event))
    }

    pub fn register_handler(&self, event_name: &'static str, handler: EventHandler) -> Result<EventId, EventSystemError> {
        Ok(self.lock()?.register_handler(event_name, handler))
    }

    pub fn register_type_handler<E, F>(&self, handler: F) -> Result<EventId, EventSystemError>
    where
        E: Event + 'static,
        F: Fn(&E) -> EventResult + Send + Sync + 'static,
    {
        Ok(self.lock()?.register_type_handler::<E, F>(handler))
    }

    /// Remove a handler; unknown IDs are an error
    pub fn unregister_handler(&self, id: EventId) -> Result<(), EventSystemError> {
        if self.lock()?.unregister_handler(id) {
            Ok(())
        } else {
            Err(EventSystemError::HandlerUnregistrationFailed {
                id,
                reason: "no handler registered with this ID".to_string(),
            })
        }
    }

    /// Total number of registered handlers
    pub fn handler_count(&self) -> Result<usize, EventSystemError> {
        let dispatcher = self.lock()?;
        Ok(dispatcher.name_handler_count() + dispatcher.type_handler_count())
    }
}

impl Default for SharedEventDispatcher { fn default() -> Self { Self::new() } }

/// Create a new event dispatcher instance
pub fn create_dispatcher() -> SharedEventDispatcher { SharedEventDispatcher::new() }

/// Wrap a closure as a boxed name-keyed handler
pub fn event_handler<F>(f: F) -> EventHandler
where F: Fn(&dyn Event) -> EventResult + Send + Sync + 'static {
    Box::new(f)
}
