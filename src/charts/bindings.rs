//! Script-facing surface of the built-in chart: types, methods and
//! construction-option parsing.

use rhai::{Dynamic, Engine, EvalAltResult, Map as ScriptMap};
use serde_json::Value;

use crate::api::ChartHandle;
use crate::core::MountPoint;
use crate::error::ChartError;

use super::chart::{ChartConfig, Dimension};
use super::convert::{dynamic_to_json, json_to_dynamic};
use super::{ChartObject, MarkKind, MarkObject};

type ScriptResult<T> = Result<T, Box<EvalAltResult>>;

fn script_error(err: ChartError) -> Box<EvalAltResult> {
    err.to_string().into()
}

/// Parses the map passed to the chart constructor.
pub(crate) fn parse_config(options: &ScriptMap) -> ScriptResult<ChartConfig> {
    let mut config = ChartConfig::default();
    for (key, value) in options {
        match key.as_str() {
            "container" => config.mount = parse_container(value)?,
            "autoFit" => {
                config.auto_fit = value
                    .as_bool()
                    .map_err(|_| "`autoFit` must be a boolean".to_owned())?;
            }
            "width" => config.width = parse_dimension("width", value)?,
            "height" => config.height = parse_dimension("height", value)?,
            other => {
                config.extra.insert(other.to_owned(), dynamic_to_json(value));
            }
        }
    }
    Ok(config)
}

fn parse_container(value: &Dynamic) -> ScriptResult<Option<MountPoint>> {
    if value.is_unit() {
        return Ok(None);
    }
    if let Some(mount) = value.clone().try_cast::<MountPoint>() {
        return Ok(Some(mount));
    }
    if value.is_string() {
        return Err(format!(
            "`container` got the element id \"{value}\"; pass the injected mount point instead"
        )
        .into());
    }
    Err(format!("`container` must be a mount point, got {}", value.type_name()).into())
}

fn parse_dimension(name: &str, value: &Dynamic) -> ScriptResult<Dimension> {
    if let Ok(pixels) = value.as_int() {
        return u32::try_from(pixels)
            .ok()
            .filter(|pixels| *pixels > 0)
            .map(Dimension::Fixed)
            .ok_or_else(|| format!("`{name}` must be a positive pixel count, got {pixels}").into());
    }
    if value
        .clone()
        .into_immutable_string()
        .is_ok_and(|text| text == "auto")
    {
        return Ok(Dimension::Auto);
    }
    Err(format!("`{name}` must be a pixel count or \"auto\"").into())
}

fn channel_value(channel: &str, value: &Dynamic) -> ScriptResult<Value> {
    match dynamic_to_json(value) {
        json @ (Value::String(_) | Value::Number(_)) => Ok(json),
        _ => Err(format!("channel `{channel}` expects a field name or a number").into()),
    }
}

/// Registers chart and mark types and their methods. Methods take handles by
/// value, so they also work on `const` bindings.
pub(crate) fn register_chart_api(engine: &mut Engine) {
    engine.register_type_with_name::<ChartObject>("Chart");
    engine.register_type_with_name::<MarkObject>("Mark");
    engine.register_type_with_name::<MountPoint>("MountPoint");

    register_chart_methods(engine);
    register_mark_methods(engine);
}

fn register_chart_methods(engine: &mut Engine) {
    engine.register_fn("data", |chart: ChartObject, data: Dynamic| -> ScriptResult<ChartObject> {
        chart.set_data(dynamic_to_json(&data)).map_err(script_error)?;
        Ok(chart)
    });
    engine.register_fn("title", |chart: ChartObject, title: Dynamic| -> ScriptResult<ChartObject> {
        chart.set_title(dynamic_to_json(&title)).map_err(script_error)?;
        Ok(chart)
    });
    engine.register_fn(
        "coordinate",
        |chart: ChartObject, coordinate: ScriptMap| -> ScriptResult<ChartObject> {
            chart
                .set_coordinate(dynamic_to_json(&Dynamic::from_map(coordinate)))
                .map_err(script_error)?;
            Ok(chart)
        },
    );

    for (name, kind) in [
        ("interval", MarkKind::Interval),
        ("line", MarkKind::Line),
        ("point", MarkKind::Point),
        ("area", MarkKind::Area),
    ] {
        engine.register_fn(name, move |chart: ChartObject| -> ScriptResult<MarkObject> {
            chart.add_mark(kind).map_err(script_error)
        });
    }

    engine.register_fn("render", |chart: ChartObject| -> ScriptResult<()> {
        chart.render().map_err(script_error)
    });
    engine.register_fn("force_fit", |chart: ChartObject| -> ScriptResult<()> {
        chart.force_fit().map_err(script_error)
    });
    engine.register_fn("destroy", |chart: ChartObject| chart.destroy());
    engine.register_fn("options", |chart: ChartObject| -> ScriptResult<Dynamic> {
        let options = chart.get_options().map_err(script_error)?;
        Ok(json_to_dynamic(&options))
    });
}

fn register_mark_methods(engine: &mut Engine) {
    engine.register_fn(
        "encode",
        |mark: MarkObject, channel: &str, value: Dynamic| -> ScriptResult<MarkObject> {
            mark.set_encode(channel, channel_value(channel, &value)?);
            Ok(mark)
        },
    );
    engine.register_fn(
        "encode",
        |mark: MarkObject, channels: ScriptMap| -> ScriptResult<MarkObject> {
            for (channel, value) in &channels {
                mark.set_encode(channel, channel_value(channel, value)?);
            }
            Ok(mark)
        },
    );
    engine.register_fn("style", |mark: MarkObject, key: &str, value: Dynamic| -> MarkObject {
        mark.set_style(key, dynamic_to_json(&value));
        mark
    });
    engine.register_fn("style", |mark: MarkObject, style: ScriptMap| -> MarkObject {
        for (key, value) in &style {
            mark.set_style(key, dynamic_to_json(value));
        }
        mark
    });
    engine.register_fn("data", |mark: MarkObject, data: Dynamic| -> MarkObject {
        mark.set_data(dynamic_to_json(&data));
        mark
    });
    engine.register_fn("transform", |mark: MarkObject, transform: Dynamic| -> MarkObject {
        mark.push_transform(dynamic_to_json(&transform));
        mark
    });
    engine.register_fn("legend", |mark: MarkObject, legend: Dynamic| -> MarkObject {
        mark.set_legend(dynamic_to_json(&legend));
        mark
    });
    engine.register_fn(
        "legend",
        |mark: MarkObject, channel: &str, options: Dynamic| -> MarkObject {
            mark.set_legend(Value::Object(
                [(channel.to_owned(), dynamic_to_json(&options))].into_iter().collect(),
            ));
            mark
        },
    );
    engine.register_fn("label", |mark: MarkObject, label: Dynamic| -> MarkObject {
        mark.push_label(dynamic_to_json(&label));
        mark
    });
    engine.register_fn("tooltip", |mark: MarkObject, tooltip: Dynamic| -> MarkObject {
        mark.set_tooltip(dynamic_to_json(&tooltip));
        mark
    });
}

#[cfg(test)]
mod tests {
    use rhai::{Dynamic, Map as ScriptMap};

    use super::parse_config;
    use crate::charts::chart::Dimension;
    use crate::core::{MountPoint, Viewport};

    fn options(entries: &[(&str, Dynamic)]) -> ScriptMap {
        entries
            .iter()
            .map(|(key, value)| ((*key).into(), value.clone()))
            .collect()
    }

    #[test]
    fn parses_mount_and_dimensions() {
        let mount = MountPoint::new(Viewport::new(300, 200));
        let config = parse_config(&options(&[
            ("container", Dynamic::from(mount.clone())),
            ("width", Dynamic::from("auto")),
            ("height", Dynamic::from(240_i64)),
            ("theme", Dynamic::from("classic")),
        ]))
        .expect("config");

        assert!(config.mount.is_some_and(|attached| attached.same_mount(&mount)));
        assert_eq!(config.width, Dimension::Auto);
        assert_eq!(config.height, Dimension::Fixed(240));
        assert_eq!(config.extra["theme"], "classic");
    }

    #[test]
    fn rejects_element_ids_and_bad_sizes() {
        let error = parse_config(&options(&[("container", Dynamic::from("container"))]))
            .expect_err("string container");
        assert!(error.to_string().contains("element id"));

        assert!(parse_config(&options(&[("width", Dynamic::from(0_i64))])).is_err());
        assert!(parse_config(&options(&[("height", Dynamic::from("tall"))])).is_err());
        assert!(parse_config(&options(&[("autoFit", Dynamic::from(1_i64))])).is_err());
    }
}
