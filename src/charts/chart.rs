use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value, json};
use smallvec::SmallVec;
use tiny_skia::Pixmap;
use tracing::{debug, trace};

use crate::api::{ChartHandle, DownloadSink, encode_surface_png};
use crate::core::{MountPoint, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::{RenderFrame, default_surface_renderer};

use super::layout::{ChartSnapshot, build_frame};
use super::{MarkKind, MarkObject};

static NEXT_CHART_ID: AtomicU64 = AtomicU64::new(1);

/// Requested size along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    /// Track the mount point.
    Auto,
    Fixed(u32),
}

impl Dimension {
    fn resolve(self, measured: u32) -> u32 {
        match self {
            Self::Auto => measured,
            Self::Fixed(pixels) => pixels,
        }
    }

    fn to_json(self) -> Value {
        match self {
            Self::Auto => json!("auto"),
            Self::Fixed(pixels) => json!(pixels),
        }
    }
}

/// Construction options accepted by `Chart(...)`.
#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Mount point to draw into. `None` draws into a private, unmounted one.
    pub mount: Option<MountPoint>,
    pub auto_fit: bool,
    pub width: Dimension,
    pub height: Dimension,
    /// Options the chart keeps for introspection but does not interpret.
    pub extra: Map<String, Value>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            mount: None,
            auto_fit: false,
            width: Dimension::Auto,
            height: Dimension::Auto,
            extra: Map::new(),
        }
    }
}

pub(crate) struct ChartState {
    id: u64,
    mount: MountPoint,
    attached: bool,
    auto_fit: bool,
    width: Dimension,
    height: Dimension,
    extra: Map<String, Value>,
    data: Option<Value>,
    title: Option<Value>,
    coordinate: Option<Value>,
    marks: SmallVec<[MarkObject; 4]>,
    renders: u64,
    destroyed: bool,
}

impl ChartState {
    fn viewport(&self) -> Viewport {
        let measured = self.mount.viewport();
        if self.auto_fit {
            return measured;
        }
        Viewport::new(
            self.width.resolve(measured.width),
            self.height.resolve(measured.height),
        )
    }

    fn title_text(&self) -> Option<String> {
        self.title
            .as_ref()
            .and_then(|title| title.get("title"))
            .and_then(Value::as_str)
            .map(str::to_owned)
    }

    fn snapshot(&self) -> ChartSnapshot {
        ChartSnapshot {
            title: self.title_text(),
            data: self.data.clone(),
            coordinate: self.coordinate.clone(),
            marks: self.marks.iter().map(MarkObject::spec).collect(),
        }
    }

    fn compose_spec(&self) -> Value {
        let mut spec = self.extra.clone();
        spec.insert("type".to_owned(), json!("view"));
        spec.insert("autoFit".to_owned(), json!(self.auto_fit));
        spec.insert("width".to_owned(), self.width.to_json());
        spec.insert("height".to_owned(), self.height.to_json());
        if let Some(data) = &self.data {
            spec.insert("data".to_owned(), data.clone());
        }
        if let Some(title) = &self.title {
            spec.insert("title".to_owned(), title.clone());
        }
        if let Some(coordinate) = &self.coordinate {
            spec.insert("coordinate".to_owned(), coordinate.clone());
        }
        spec.insert(
            "children".to_owned(),
            Value::Array(self.marks.iter().map(|mark| mark.spec().to_json()).collect()),
        );
        Value::Object(spec)
    }
}

/// Script-visible chart instance. Clones refer to the same chart.
#[derive(Clone)]
pub struct ChartObject {
    state: Rc<RefCell<ChartState>>,
}

impl ChartObject {
    #[must_use]
    pub fn new(config: ChartConfig) -> Self {
        let id = NEXT_CHART_ID.fetch_add(1, Ordering::Relaxed);
        let attached = config.mount.is_some();
        let mount = config.mount.unwrap_or_default();
        let data = config.extra.get("data").cloned();
        trace!(id, attached, "chart constructed");
        Self {
            state: Rc::new(RefCell::new(ChartState {
                id,
                mount,
                attached,
                auto_fit: config.auto_fit,
                width: config.width,
                height: config.height,
                extra: config.extra,
                data,
                title: None,
                coordinate: None,
                marks: SmallVec::new(),
                renders: 0,
                destroyed: false,
            })),
        }
    }

    #[must_use]
    pub fn id(&self) -> u64 {
        self.state.borrow().id
    }

    /// `true` when drawing into a host mount point rather than a private one.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.state.borrow().attached
    }

    #[must_use]
    pub fn mount(&self) -> MountPoint {
        self.state.borrow().mount.clone()
    }

    /// Size the next render will use.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.state.borrow().viewport()
    }

    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.state.borrow().renders
    }

    #[must_use]
    pub fn mark_count(&self) -> usize {
        self.state.borrow().marks.len()
    }

    pub(crate) fn downgrade(&self) -> Weak<RefCell<ChartState>> {
        Rc::downgrade(&self.state)
    }

    pub(crate) fn is_live(state: &Weak<RefCell<ChartState>>) -> bool {
        state
            .upgrade()
            .is_some_and(|state| !state.borrow().destroyed)
    }

    pub fn set_data(&self, data: Value) -> ChartResult<()> {
        let mut state = self.live_state_mut()?;
        state.data = Some(data);
        Ok(())
    }

    /// Sets the title from a bare string or a `{ title, ... }` object.
    pub fn set_title(&self, title: Value) -> ChartResult<()> {
        let title = match title {
            Value::String(text) => json!({ "title": text }),
            Value::Object(object) if object.get("title").is_some_and(Value::is_string) => {
                Value::Object(object)
            }
            _ => {
                return Err(ChartError::InvalidData(
                    "title must be a string or an object with a string `title`".to_owned(),
                ));
            }
        };
        self.live_state_mut()?.title = Some(title);
        Ok(())
    }

    pub fn set_coordinate(&self, coordinate: Value) -> ChartResult<()> {
        if !coordinate.is_object() {
            return Err(ChartError::InvalidData(
                "coordinate must be an object".to_owned(),
            ));
        }
        self.live_state_mut()?.coordinate = Some(coordinate);
        Ok(())
    }

    /// Appends a new mark of `kind` and returns it.
    pub fn add_mark(&self, kind: MarkKind) -> ChartResult<MarkObject> {
        let mark = MarkObject::new(kind);
        self.live_state_mut()?.marks.push(mark.clone());
        Ok(mark)
    }

    /// Lays the chart out at its current size.
    pub fn frame(&self) -> ChartResult<RenderFrame> {
        let (snapshot, viewport) = {
            let state = self.live_state()?;
            (state.snapshot(), state.viewport())
        };
        build_frame(&snapshot, viewport)
    }

    fn paint(&self) -> ChartResult<Pixmap> {
        let frame = self.frame()?;
        let mut renderer = default_surface_renderer();
        renderer.render(&frame)?;
        renderer
            .take_surface()
            .ok_or_else(|| ChartError::Backend("renderer produced no surface".to_owned()))
    }

    fn live_state(&self) -> ChartResult<std::cell::Ref<'_, ChartState>> {
        let state = self.state.borrow();
        if state.destroyed {
            return Err(ChartError::Destroyed);
        }
        Ok(state)
    }

    fn live_state_mut(&self) -> ChartResult<std::cell::RefMut<'_, ChartState>> {
        let state = self.state.borrow_mut();
        if state.destroyed {
            return Err(ChartError::Destroyed);
        }
        Ok(state)
    }
}

impl ChartHandle for ChartObject {
    fn render(&self) -> ChartResult<()> {
        let pixmap = self.paint()?;
        let mut state = self.live_state_mut()?;
        state.mount.attach_surface(state.id, pixmap);
        state.renders += 1;
        trace!(id = state.id, renders = state.renders, "chart rendered");
        Ok(())
    }

    fn destroy(&self) {
        let mut state = self.state.borrow_mut();
        if state.destroyed {
            return;
        }
        state.destroyed = true;
        state.marks.clear();
        let detached = state.mount.detach_owner(state.id);
        debug!(id = state.id, detached, "chart destroyed");
    }

    fn is_destroyed(&self) -> bool {
        self.state.borrow().destroyed
    }

    /// Switches to tracking the mount point size from the next render on.
    fn force_fit(&self) -> ChartResult<()> {
        self.live_state_mut()?.auto_fit = true;
        Ok(())
    }

    fn options(&self) -> Option<Value> {
        let state = self.live_state().ok()?;
        Some(state.compose_spec())
    }

    fn get_options(&self) -> ChartResult<Value> {
        Ok(self.live_state()?.compose_spec())
    }

    /// Chart-level data, or the first mark's own data.
    fn get_data(&self) -> ChartResult<Value> {
        let state = self.live_state()?;
        let data = state
            .data
            .clone()
            .or_else(|| state.marks.iter().find_map(|mark| mark.spec().data))
            .unwrap_or(Value::Null);
        Ok(data)
    }

    fn get_spec(&self) -> ChartResult<Value> {
        Ok(self.live_state()?.compose_spec())
    }

    fn spec(&self) -> Option<Value> {
        self.options()
    }

    fn view_options(&self) -> Option<Value> {
        let state = self.live_state().ok()?;
        let viewport = state.viewport();
        let mut view = json!({
            "autoFit": state.auto_fit,
            "width": viewport.width,
            "height": viewport.height,
        });
        if let (Some(title), Some(object)) = (&state.title, view.as_object_mut()) {
            object.insert("title".to_owned(), title.clone());
        }
        Some(view)
    }

    fn properties(&self) -> Vec<(String, Value)> {
        let state = self.state.borrow();
        let mut properties = vec![
            ("id".to_owned(), json!(state.id)),
            ("attached".to_owned(), json!(state.attached)),
            ("renders".to_owned(), json!(state.renders)),
        ];
        if let Some(title) = &state.title {
            properties.push(("titleComponent".to_owned(), title.clone()));
        }
        properties
    }

    fn download_image(&self, filename: &str, sink: &mut dyn DownloadSink) -> ChartResult<()> {
        let pixmap = self.paint()?;
        let blob = encode_surface_png(&pixmap).map_err(|err| ChartError::Backend(err.to_string()))?;
        sink.save(&blob, filename)
            .map_err(|err| ChartError::Backend(format!("failed to save `{filename}`: {err}")))
    }
}

impl PartialEq for ChartObject {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.state, &other.state)
    }
}

impl fmt::Debug for ChartObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("ChartObject")
            .field("id", &state.id)
            .field("attached", &state.attached)
            .field("marks", &state.marks.len())
            .field("renders", &state.renders)
            .field("destroyed", &state.destroyed)
            .finish()
    }
}
