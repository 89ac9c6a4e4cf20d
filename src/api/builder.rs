use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rhai::Engine;

use super::ChartHandle;

/// Charting capability exposed to scripts.
pub trait ChartBuilder {
    type Handle: ChartHandle + Clone + PartialEq + 'static;

    /// Registers the chart constructor under `constructor` plus whatever
    /// methods its handles need. Every handle constructed through the engine
    /// must be recorded in `ledger`.
    fn install(
        &self,
        engine: &mut Engine,
        constructor: &str,
        ledger: &InstanceLedger<Self::Handle>,
    );
}

/// Every chart constructed during one script run.
///
/// Clones share the same record list, so constructor closures registered in
/// the engine can hold one while the executor drains another.
pub struct InstanceLedger<H> {
    instances: Rc<RefCell<Vec<H>>>,
}

impl<H> InstanceLedger<H> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            instances: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn record(&self, handle: H) {
        self.instances.borrow_mut().push(handle);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.borrow().is_empty()
    }

    /// Takes every recorded handle, in construction order.
    pub fn drain(&self) -> Vec<H> {
        std::mem::take(&mut *self.instances.borrow_mut())
    }
}

impl<H> Clone for InstanceLedger<H> {
    fn clone(&self) -> Self {
        Self {
            instances: Rc::clone(&self.instances),
        }
    }
}

impl<H> Default for InstanceLedger<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> fmt::Debug for InstanceLedger<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstanceLedger")
            .field("instances", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::InstanceLedger;

    #[test]
    fn clones_record_into_the_same_list() {
        let ledger = InstanceLedger::new();
        let constructor_side = ledger.clone();
        constructor_side.record(1_u8);
        constructor_side.record(2_u8);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.drain(), vec![1, 2]);
        assert!(constructor_side.is_empty());
    }
}
