use super::ViewState;

/// The single slot the live chart lives in.
///
/// `generation` moves every time a handle enters or leaves the slot, so a
/// deferred continuation can tell whether the handle it captured is still the
/// current one.
#[derive(Debug)]
pub(crate) struct Stage<H> {
    pub(crate) current: Option<H>,
    pub(crate) generation: u64,
    pub(crate) view: ViewState,
}

impl<H> Stage<H> {
    pub(crate) fn new() -> Self {
        Self {
            current: None,
            generation: 0,
            view: ViewState::default(),
        }
    }

    /// Empties the slot, returning the handle that was in it.
    pub(crate) fn vacate(&mut self) -> Option<H> {
        let previous = self.current.take();
        if previous.is_some() {
            self.generation += 1;
        }
        previous
    }

    /// Fills the slot. Returns the new generation.
    pub(crate) fn adopt(&mut self, handle: H) -> u64 {
        self.generation += 1;
        self.current = Some(handle);
        self.generation
    }
}
