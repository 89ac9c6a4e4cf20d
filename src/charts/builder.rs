use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use rhai::{Engine, EvalAltResult, Map as ScriptMap};

use crate::api::{ChartBuilder, InstanceLedger};

use super::ChartObject;
use super::bindings::{parse_config, register_chart_api};
use super::chart::{ChartConfig, ChartState};

/// Built-in mark chart library.
///
/// Clones share the instance registry, so a host can keep one clone to
/// count live charts while the playground owns another.
#[derive(Clone, Default)]
pub struct MarkChartBuilder {
    instances: Rc<RefCell<Vec<Weak<RefCell<ChartState>>>>>,
    created: Rc<Cell<usize>>,
}

impl MarkChartBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Charts constructed through this builder that are neither destroyed
    /// nor dropped.
    #[must_use]
    pub fn live_instances(&self) -> usize {
        self.instances
            .borrow()
            .iter()
            .filter(|state| ChartObject::is_live(state))
            .count()
    }

    /// Charts constructed through this builder since it was created.
    #[must_use]
    pub fn created_instances(&self) -> usize {
        self.created.get()
    }

    fn track(&self, chart: &ChartObject) {
        let mut instances = self.instances.borrow_mut();
        instances.retain(|state| state.strong_count() > 0);
        instances.push(chart.downgrade());
        self.created.set(self.created.get() + 1);
    }

    fn construct(&self, config: ChartConfig, ledger: &InstanceLedger<ChartObject>) -> ChartObject {
        let chart = ChartObject::new(config);
        self.track(&chart);
        ledger.record(chart.clone());
        chart
    }
}

impl ChartBuilder for MarkChartBuilder {
    type Handle = ChartObject;

    fn install(
        &self,
        engine: &mut Engine,
        constructor: &str,
        ledger: &InstanceLedger<ChartObject>,
    ) {
        register_chart_api(engine);

        let (builder, records) = (self.clone(), ledger.clone());
        engine.register_fn(
            constructor,
            move |options: ScriptMap| -> Result<ChartObject, Box<EvalAltResult>> {
                let config = parse_config(&options)?;
                Ok(builder.construct(config, &records))
            },
        );

        let (builder, records) = (self.clone(), ledger.clone());
        engine.register_fn(constructor, move || -> ChartObject {
            builder.construct(ChartConfig::default(), &records)
        });
    }
}

impl fmt::Debug for MarkChartBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkChartBuilder")
            .field("live", &self.live_instances())
            .field("created", &self.created_instances())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use rhai::{Engine, Scope};

    use super::MarkChartBuilder;
    use crate::api::{ChartBuilder, ChartHandle, InstanceLedger};
    use crate::charts::ChartObject;

    #[test]
    fn constructor_records_every_chart() {
        let builder = MarkChartBuilder::new();
        let ledger = InstanceLedger::new();
        let mut engine = Engine::new();
        builder.install(&mut engine, "Chart", &ledger);

        let script = "let a = Chart(); let b = Chart(#{ autoFit: true }); b";
        let chart: ChartObject = engine
            .eval_with_scope(&mut Scope::new(), script)
            .expect("script runs");

        assert_eq!(ledger.len(), 2);
        assert_eq!(builder.created_instances(), 2);
        assert_eq!(builder.live_instances(), 2);

        for handle in ledger.drain() {
            if handle != chart {
                handle.destroy();
            }
        }
        assert_eq!(builder.live_instances(), 1);
    }
}
