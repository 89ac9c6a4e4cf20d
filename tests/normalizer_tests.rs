use chart_playground::script::{AUTO_FIT_DIRECTIVE, normalize, normalize_with};

#[test]
fn pasted_page_script_is_rewritten_for_the_panel() {
    let pasted = r#"
const chart = Chart(#{
    container: "container",
    autoFit: true,
    width: 800,
    height: 400
});
"#;
    let normalized = normalize(pasted);

    assert!(normalized.contains("container: container,"));
    assert!(normalized.contains(&format!("width: {AUTO_FIT_DIRECTIVE},")));
    assert!(normalized.contains(&format!("height: {AUTO_FIT_DIRECTIVE}\n")));
    assert!(!normalized.contains("800"));
}

#[test]
fn rewrites_are_not_scoped_to_one_declaration() {
    let script = r#"
let a = Chart(#{ container: "container", height: 300 });
let b = #{ container: 'container', height: 120 };
"#;
    let normalized = normalize(script);
    assert_eq!(normalized.matches("container: container").count(), 2);
    assert_eq!(normalized.matches("height: \"auto\"").count(), 2);
}

#[test]
fn other_properties_and_strings_are_untouched() {
    let script = concat!(
        r#"mark.style("lineWidth", 2); let text = "max-width: 12"; "#,
        r#"let container_id = "container";"#,
    );
    assert_eq!(normalize(script), script);
}

#[test]
fn fractional_sizes_keep_their_tail() {
    // Textual rewrite only: the leftover `.5` surfaces later as a script error.
    assert_eq!(normalize("#{ width: 12.5 }"), "#{ width: \"auto\".5 }");
}

#[test]
fn custom_mount_parameter_is_bound() {
    assert_eq!(
        normalize_with(r#"#{ container: "container" }"#, "host"),
        "#{ container: host }"
    );
}
