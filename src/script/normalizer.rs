//! Textual rewrites applied to user scripts before execution.
//!
//! Scripts are often copied from examples written for a fixed-size page. The
//! playground renders into a panel whose size changes, so fixed dimensions
//! become auto-fit directives and the literal `"container"` id becomes the
//! injected mount-point binding. Nothing here parses the script: every match
//! is rewritten, and malformed results surface later as execution errors.

use std::sync::LazyLock;

use regex::Regex;

/// Value a dimension is bound to when it should track the mount point size.
pub const AUTO_FIT_DIRECTIVE: &str = "\"auto\"";

static FIXED_WIDTH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bwidth(\s*):(\s*)\d+").expect("fixed width pattern is valid")
});

static FIXED_HEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bheight(\s*):(\s*)\d+").expect("fixed height pattern is valid")
});

static LITERAL_CONTAINER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\bcontainer(\s*):(\s*)(?:"container"|'container')"#)
        .expect("literal container pattern is valid")
});

/// Rewrites fixed sizes and the literal container id. `mount_param` is the
/// name the mount point is injected under.
#[must_use]
pub fn normalize_with(script: &str, mount_param: &str) -> String {
    let width_fit = format!("width${{1}}:${{2}}{AUTO_FIT_DIRECTIVE}");
    let height_fit = format!("height${{1}}:${{2}}{AUTO_FIT_DIRECTIVE}");
    let width = FIXED_WIDTH.replace_all(script, width_fit.as_str());
    let height = FIXED_HEIGHT.replace_all(&width, height_fit.as_str());
    // `$` in the parameter name must not be read as a capture reference.
    let binding = format!("container${{1}}:${{2}}{}", mount_param.replace('$', "$$"));
    LITERAL_CONTAINER
        .replace_all(&height, binding.as_str())
        .into_owned()
}

/// `normalize_with` using the default `container` mount parameter.
#[must_use]
pub fn normalize(script: &str) -> String {
    normalize_with(script, super::DEFAULT_MOUNT_PARAM)
}

#[cfg(test)]
mod tests {
    use super::{normalize, normalize_with};

    #[test]
    fn fixed_dimensions_become_auto_fit() {
        let source = r#"let chart = Chart(#{ container: container, width: 640, height:480 });"#;
        assert_eq!(
            normalize(source),
            r#"let chart = Chart(#{ container: container, width: "auto", height:"auto" });"#
        );
    }

    #[test]
    fn every_occurrence_is_rewritten() {
        let source = "#{ width: 1 }\n#{ width: 2 }\n#{ height: 3, width:4 }";
        let normalized = normalize(source);
        assert_eq!(normalized.matches("\"auto\"").count(), 4);
        assert!(!normalized.chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn literal_container_becomes_mount_binding() {
        assert_eq!(
            normalize(r#"#{ container: "container" }"#),
            "#{ container: container }"
        );
        assert_eq!(
            normalize("#{ container : 'container' }"),
            "#{ container : container }"
        );
        assert_eq!(
            normalize_with(r#"#{ container: "container" }"#, "mount"),
            "#{ container: mount }"
        );
    }

    #[test]
    fn similar_keys_are_left_alone() {
        let source = concat!(
            "mark.style(#{ lineWidth: 2, line_width: 3, maxHeight: 30 }); ",
            r#"let w = #{ container: "other" };"#,
        );
        assert_eq!(normalize(source), source);
    }

    #[test]
    fn non_numeric_dimensions_are_not_touched() {
        let source = "#{ width: size, height: \"auto\" }";
        assert_eq!(normalize(source), source);
    }
}
