use crate::error::{ChartError, ChartResult};

use super::{ChartBuilder, Playground, PlaygroundObserver};

impl<B: ChartBuilder> Playground<B> {
    /// Adds `observer` after the ones already registered. Ids must be
    /// non-empty and unique.
    pub fn register_observer(&mut self, observer: Box<dyn PlaygroundObserver>) -> ChartResult<()> {
        let id = observer.id();
        let rejection = if id.is_empty() {
            Some("observer id is empty".to_owned())
        } else if self.has_observer(id) {
            Some(format!("duplicate observer id `{id}`"))
        } else {
            None
        };
        match rejection {
            Some(reason) => Err(ChartError::InvalidData(reason)),
            None => {
                self.observers.push(observer);
                Ok(())
            }
        }
    }

    /// Drops the observer registered as `observer_id`, if any.
    pub fn unregister_observer(&mut self, observer_id: &str) -> bool {
        let before = self.observers.len();
        self.observers.retain(|observer| observer.id() != observer_id);
        self.observers.len() < before
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    #[must_use]
    pub fn has_observer(&self, observer_id: &str) -> bool {
        self.observers.iter().any(|observer| observer.id() == observer_id)
    }
}
