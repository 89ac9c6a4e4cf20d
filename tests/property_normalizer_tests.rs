use chart_playground::api::{DEFAULT_EXPORT_TITLE, sanitize_title};
use chart_playground::script::normalize;
use proptest::prelude::*;

proptest! {
    #[test]
    fn normalizing_twice_changes_nothing(script in "[a-z#{}:,\"' \n0-9]{0,80}") {
        let once = normalize(&script);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalized_scripts_have_no_fixed_sizes(
        width in 1u32..5_000,
        height in 1u32..5_000,
        spacing in "[ \t]{0,3}"
    ) {
        let script = format!(
            "Chart(#{{ container{spacing}:{spacing}\"container\", {}, height:{height} }})",
            format_args!("width{spacing}:{spacing}{width}"),
        );
        let normalized = normalize(&script);
        let width_text = width.to_string();
        let height_text = height.to_string();
        prop_assert!(!normalized.contains(width_text.as_str()));
        prop_assert!(!normalized.contains(height_text.as_str()));
        prop_assert!(!normalized.contains("\"container\""));
    }

    #[test]
    fn sanitized_titles_only_keep_allowed_characters(raw in "\\PC{0,40}") {
        let sanitized = sanitize_title(&raw);
        prop_assert!(!sanitized.is_empty());
        prop_assert_eq!(sanitized.trim(), sanitized.as_str());
        let all_allowed = sanitized.chars().all(|c| {
            c.is_ascii_alphanumeric()
                || c == '_'
                || c == '-'
                || c.is_whitespace()
                || ('\u{4e00}'..='\u{9fa5}').contains(&c)
        });
        prop_assert!(all_allowed);
    }

    #[test]
    fn symbol_only_titles_fall_back(raw in "[#$%&*()!?.,]{0,12}") {
        prop_assert_eq!(sanitize_title(&raw), DEFAULT_EXPORT_TITLE);
    }
}
