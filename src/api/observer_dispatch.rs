use super::{ChartBuilder, Playground, PlaygroundContext, PlaygroundEvent};

impl<B: ChartBuilder> Playground<B> {
    pub(super) fn observer_context(&self) -> PlaygroundContext {
        let stage = self.stage.borrow();
        PlaygroundContext {
            viewport: self.mount.viewport(),
            has_chart: stage.view.has_chart,
            fullscreen: stage.view.fullscreen,
            active_tab: stage.view.active_tab,
            dataset_len: self.dataset.len(),
            generation: stage.generation,
        }
    }

    pub(super) fn emit_event(&mut self, event: PlaygroundEvent) {
        if self.observers.is_empty() {
            return;
        }
        let context = self.observer_context();
        for observer in &mut self.observers {
            observer.on_event(&event, context);
        }
    }
}
