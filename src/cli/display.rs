//! Terminal rendering of results and suggestions.

use owo_colors::OwoColorize;

use crate::core::{AutocompleteResult, GeocodingResult, Source};

const LABEL_WIDTH: usize = 20;

/// Address card: full address, the structured fields that are present,
/// coordinates and a cache badge.
pub fn render_result(result: &GeocodingResult) -> String {
    let mut out = String::new();
    out.push_str(&result.display_name.bold().to_string());
    if result.source == Source::Cache {
        out.push_str(&format!(" {}", "⚡ cached".yellow()));
    }
    for (label, value) in result.structured.fields() {
        push_field(&mut out, label, value);
    }
    push_field(&mut out, "Latitude", &format!("{:.6}", result.lat));
    push_field(&mut out, "Longitude", &format!("{:.6}", result.lng));
    out
}

/// Numbered suggestion list, 1-based.
pub fn render_suggestions(suggestions: &[AutocompleteResult]) -> String {
    suggestions
        .iter()
        .enumerate()
        .map(|(i, s)| format!("  {}. {}", (i + 1).cyan(), s.display_name))
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_field(out: &mut String, label: &str, value: &str) {
    let label = format!("{label}:");
    out.push_str(&format!(
        "\n  {} {}",
        format!("{label:<LABEL_WIDTH$}").dimmed(),
        value
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::StructuredAddress;

    fn result(source: Source) -> GeocodingResult {
        GeocodingResult {
            lat: 18.5204,
            lng: 73.8567,
            display_name: "Pune Railway Station, Pune, Maharashtra".to_string(),
            structured: StructuredAddress {
                city: Some("Pune".to_string()),
                pincode: Some("411001".to_string()),
                street: Some("  ".to_string()),
                ..Default::default()
            },
            source,
        }
    }

    #[test]
    fn test_render_result_fields() {
        let out = render_result(&result(Source::Api));
        assert!(out.contains("Pune Railway Station, Pune, Maharashtra"));
        assert!(out.contains("City:"));
        assert!(out.contains("411001"));
        assert!(out.contains("18.520400"));
        assert!(out.contains("73.856700"));
        assert!(!out.contains("cached"));
    }

    #[test]
    fn test_render_result_skips_absent_fields() {
        let out = render_result(&result(Source::Api));
        assert!(!out.contains("Street:"), "blank field rendered");
        assert!(!out.contains("Country:"));
        assert!(!out.contains("Building/House No.:"));
    }

    #[test]
    fn test_render_result_cache_badge() {
        assert!(render_result(&result(Source::Cache)).contains("cached"));
    }

    #[test]
    fn test_render_suggestions_numbered() {
        let list = vec![
            AutocompleteResult {
                display_name: "Pune, Maharashtra".to_string(),
                address: Default::default(),
            },
            AutocompleteResult {
                display_name: "Pune Airport".to_string(),
                address: Default::default(),
            },
        ];
        let out = render_suggestions(&list);
        assert_eq!(out.lines().count(), 2);
        assert!(out.lines().nth(1).unwrap().ends_with("Pune Airport"));
    }
}
