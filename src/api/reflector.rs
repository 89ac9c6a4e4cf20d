//! Recovers the data and title a chart was built with.
//!
//! Charts expose what they were given in different places depending on how
//! the script built them, so both recoveries walk a fixed list of probes and
//! keep the first usable answer. A probe that errors or panics counts as a
//! miss; reflection never fails.

use std::panic::{self, AssertUnwindSafe};
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::core::Dataset;
use crate::error::ChartResult;

use super::ChartHandle;

/// Export stem used when a chart has no usable title.
pub const DEFAULT_EXPORT_TITLE: &str = "chart";

static TITLE_DISALLOWED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^A-Za-z0-9_\x{4e00}-\x{9fa5}\s-]").expect("title filter pattern is valid")
});

type Probe<H> = fn(&H) -> ChartResult<Option<Value>>;

fn data_probes<H: ChartHandle + ?Sized>() -> [(&'static str, Probe<H>); 4] {
    [
        ("options.data", options_data::<H>),
        ("get_options().data", config_data::<H>),
        ("get_data()", accessor_data::<H>),
        ("spec.data", spec_data::<H>),
    ]
}

fn title_probes<H: ChartHandle + ?Sized>() -> [(&'static str, Probe<H>); 5] {
    [
        ("options.title.title", options_title::<H>),
        ("get_options().title.title", config_title::<H>),
        ("get_spec().title.title", spec_title::<H>),
        ("view_options.title.title", view_title::<H>),
        ("properties[*].title", property_title::<H>),
    ]
}

fn options_data<H: ChartHandle + ?Sized>(handle: &H) -> ChartResult<Option<Value>> {
    Ok(handle.options().and_then(|options| field(options, "data")))
}

fn config_data<H: ChartHandle + ?Sized>(handle: &H) -> ChartResult<Option<Value>> {
    Ok(field(handle.get_options()?, "data"))
}

fn accessor_data<H: ChartHandle + ?Sized>(handle: &H) -> ChartResult<Option<Value>> {
    handle.get_data().map(Some)
}

fn spec_data<H: ChartHandle + ?Sized>(handle: &H) -> ChartResult<Option<Value>> {
    Ok(handle.spec().and_then(|spec| field(spec, "data")))
}

fn options_title<H: ChartHandle + ?Sized>(handle: &H) -> ChartResult<Option<Value>> {
    Ok(handle.options().and_then(nested_title))
}

fn config_title<H: ChartHandle + ?Sized>(handle: &H) -> ChartResult<Option<Value>> {
    Ok(nested_title(handle.get_options()?))
}

fn spec_title<H: ChartHandle + ?Sized>(handle: &H) -> ChartResult<Option<Value>> {
    Ok(nested_title(handle.get_spec()?))
}

fn view_title<H: ChartHandle + ?Sized>(handle: &H) -> ChartResult<Option<Value>> {
    Ok(handle.view_options().and_then(nested_title))
}

/// Any property holding an object with a string `title`.
fn property_title<H: ChartHandle + ?Sized>(handle: &H) -> ChartResult<Option<Value>> {
    Ok(handle.properties().into_iter().find_map(|(_, value)| {
        value
            .as_object()?
            .get("title")
            .filter(|title| title.is_string())
            .cloned()
    }))
}

fn field(value: Value, name: &str) -> Option<Value> {
    match value {
        Value::Object(mut map) => map.remove(name),
        _ => None,
    }
}

fn nested_title(value: Value) -> Option<Value> {
    field(field(value, "title")?, "title")
}

fn run_probe<H: ChartHandle + ?Sized>(
    name: &'static str,
    probe: Probe<H>,
    handle: &H,
) -> Option<Value> {
    match panic::catch_unwind(AssertUnwindSafe(|| probe(handle))) {
        Ok(Ok(Some(value))) if !value.is_null() => Some(value),
        Ok(Ok(_)) => {
            trace!(probe = name, "reflection probe found nothing");
            None
        }
        Ok(Err(err)) => {
            debug!(probe = name, error = %err, "reflection probe failed");
            None
        }
        Err(_) => {
            warn!(probe = name, "reflection probe panicked");
            None
        }
    }
}

/// Data bound to `handle`, or an empty dataset when no probe yields an array
/// of records.
#[must_use]
pub fn reflect_dataset<H: ChartHandle + ?Sized>(handle: &H) -> Dataset {
    for (name, probe) in data_probes::<H>() {
        let Some(value) = run_probe(name, probe, handle) else {
            continue;
        };
        match Dataset::from_value(&value) {
            Some(dataset) => {
                debug!(probe = name, records = dataset.len(), "reflected chart data");
                return dataset;
            }
            None => trace!(probe = name, "probe value is not an array of records"),
        }
    }
    Dataset::default()
}

/// Raw title of `handle`, before sanitization.
#[must_use]
pub fn reflect_title<H: ChartHandle + ?Sized>(handle: &H) -> Option<String> {
    title_probes::<H>().into_iter().find_map(|(name, probe)| {
        run_probe(name, probe, handle).and_then(|value| match value {
            Value::String(title) => Some(title),
            _ => None,
        })
    })
}

/// Strips everything but word characters, whitespace, `-` and CJK ideographs,
/// then trims. Falls back to `"chart"`.
#[must_use]
pub fn sanitize_title(raw: &str) -> String {
    let kept = TITLE_DISALLOWED.replace_all(raw, "");
    let trimmed = kept.trim();
    if trimmed.is_empty() {
        DEFAULT_EXPORT_TITLE.to_owned()
    } else {
        trimmed.to_owned()
    }
}

/// Filename stem for exporting `handle`.
#[must_use]
pub fn export_stem<H: ChartHandle + ?Sized>(handle: &H, fallback: &str) -> String {
    match reflect_title(handle) {
        Some(title) => sanitize_title(&title),
        None => sanitize_title(fallback),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{reflect_dataset, reflect_title, sanitize_title};
    use crate::api::ChartHandle;
    use crate::error::{ChartError, ChartResult};

    #[derive(Default)]
    struct ProbeHandle {
        options: Option<Value>,
        config: Option<Value>,
        data: Option<Value>,
        spec: Option<Value>,
        panics_on_options: bool,
    }

    impl ChartHandle for ProbeHandle {
        fn render(&self) -> ChartResult<()> {
            Ok(())
        }

        fn destroy(&self) {}

        fn is_destroyed(&self) -> bool {
            false
        }

        fn options(&self) -> Option<Value> {
            assert!(!self.panics_on_options, "options getter exploded");
            self.options.clone()
        }

        fn get_options(&self) -> ChartResult<Value> {
            self.config
                .clone()
                .ok_or(ChartError::InvalidData("no config".to_owned()))
        }

        fn get_data(&self) -> ChartResult<Value> {
            self.data.clone().ok_or(ChartError::Unsupported("get_data"))
        }

        fn spec(&self) -> Option<Value> {
            self.spec.clone()
        }
    }

    #[test]
    fn first_usable_probe_wins() {
        let handle = ProbeHandle {
            options: Some(json!({ "data": null })),
            config: Some(json!({ "data": "not records" })),
            data: Some(json!([{ "a": 1 }, { "a": 2 }])),
            spec: Some(json!({ "data": [{ "a": 9 }] })),
            ..ProbeHandle::default()
        };
        assert_eq!(reflect_dataset(&handle).len(), 2);
    }

    #[test]
    fn spec_data_is_the_last_resort() {
        let handle = ProbeHandle {
            spec: Some(json!({ "data": [{ "a": 9 }] })),
            ..ProbeHandle::default()
        };
        let dataset = reflect_dataset(&handle);
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0]["a"], json!(9));
    }

    #[test]
    fn panicking_probe_is_a_miss() {
        let handle = ProbeHandle {
            panics_on_options: true,
            config: Some(json!({ "title": { "title": "Sales" }, "data": [] })),
            ..ProbeHandle::default()
        };
        assert!(reflect_dataset(&handle).is_empty());
        assert_eq!(reflect_title(&handle).as_deref(), Some("Sales"));
    }

    #[test]
    fn sanitizer_keeps_words_spaces_dashes_and_cjk() {
        assert_eq!(sanitize_title("  Sales #1 (2024) "), "Sales 1 2024");
        assert_eq!(sanitize_title("销售-报表_v2!"), "销售-报表_v2");
        assert_eq!(sanitize_title("#$%"), "chart");
        assert_eq!(sanitize_title(""), "chart");
    }
}
