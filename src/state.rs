use crate::actions::{self, Action};
use crate::store::Store;

/// Store plus the queue of not-yet-applied actions. The UI only
/// dispatches; everything is applied in order at flush time.
pub struct State {
    pub store: Store,
    action_queue: Vec<Action>,
}

impl State {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            action_queue: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        self.action_queue.push(action);
    }

    pub fn flush_actions(&mut self) {
        let actions = std::mem::take(&mut self.action_queue);
        for action in actions {
            actions::update(&mut self.store, action);
        }
    }
}
