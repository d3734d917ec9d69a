//! Plain-text rendering of diagnoses and advisories.

use std::fmt::Write as _;

use crate::advisory::WeatherAdvisory;
use crate::envelope::NormalizedDiagnosis;
use crate::weather::WeatherReport;

/// Shown when a diagnosis carries no recommendations.
pub const NO_RECOMMENDATIONS: &str = "No recommendations provided.";

/// Render a diagnosis, optionally with the classifier confidence.
pub fn render_diagnosis(diagnosis: &NormalizedDiagnosis, confidence: Option<f64>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Disease Information");
    let _ = writeln!(out, "  Crop Type:    {}", diagnosis.crop_type);
    let _ = writeln!(out, "  Disease Name: {}", diagnosis.disease_name);
    if let Some(confidence) = confidence {
        let _ = writeln!(out, "  Confidence:   {confidence:.2}%");
    }
    let _ = writeln!(out, "Recommendations:");
    push_list(&mut out, &diagnosis.recommendations, NO_RECOMMENDATIONS);
    out
}

/// Render a weather advisory.
pub fn render_advisory(advisory: &WeatherAdvisory) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Crop Risk Analysis");
    push_list(&mut out, &advisory.risks, "No risks identified.");
    let _ = writeln!(out, "Recommended Actions");
    push_list(&mut out, &advisory.recommendations, NO_RECOMMENDATIONS);
    out
}

/// One-line-per-day forecast summary.
pub fn render_forecast(report: &WeatherReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Forecast for {}",
        report.location_name().unwrap_or("unknown location")
    );
    let days = report
        .forecast
        .get("forecastday")
        .and_then(|d| d.as_array())
        .map(Vec::as_slice)
        .unwrap_or_default();
    for day in days {
        let date = day.get("date").and_then(|d| d.as_str()).unwrap_or("?");
        let summary = &day["day"];
        let min = summary.get("mintemp_c").and_then(|v| v.as_f64());
        let max = summary.get("maxtemp_c").and_then(|v| v.as_f64());
        let condition = summary["condition"]["text"].as_str().unwrap_or("");
        match (min, max) {
            (Some(min), Some(max)) => {
                let _ = writeln!(out, "  {date}: {min:.1}-{max:.1}°C {condition}");
            }
            _ => {
                let _ = writeln!(out, "  {date}: {condition}");
            }
        }
    }
    out
}

/// Split free text into paragraphs on blank lines. CRLF line endings are accepted.
pub fn paragraphs(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_owned)
        .collect()
}

fn push_list(out: &mut String, items: &[String], empty: &str) {
    if items.is_empty() {
        let _ = writeln!(out, "  {empty}");
        return;
    }
    for item in items {
        let parts = paragraphs(item);
        let Some((first, rest)) = parts.split_first() else {
            continue;
        };
        let _ = writeln!(out, "  - {first}");
        for part in rest {
            let _ = writeln!(out, "    {part}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_diagnosis_with_recommendations() {
        let diagnosis = NormalizedDiagnosis {
            disease_name: "Early blight".to_string(),
            crop_type: "tomato".to_string(),
            recommendations: vec!["Rotate crops".to_string(), "Mulch".to_string()],
        };
        let text = render_diagnosis(&diagnosis, Some(87.5));
        assert!(text.contains("Disease Name: Early blight"));
        assert!(text.contains("Confidence:   87.50%"));
        assert!(text.contains("  - Rotate crops\n  - Mulch\n"));
    }

    #[test]
    fn test_diagnosis_without_recommendations() {
        let diagnosis = NormalizedDiagnosis {
            disease_name: "Unknown disease".to_string(),
            crop_type: "Unknown crop".to_string(),
            recommendations: Vec::new(),
        };
        let text = render_diagnosis(&diagnosis, None);
        assert!(text.contains(NO_RECOMMENDATIONS));
        assert!(!text.contains("Confidence"));
    }

    #[test]
    fn test_advisory_sections() {
        let advisory = WeatherAdvisory {
            risks: vec!["Flooding".to_string()],
            recommendations: Vec::new(),
        };
        let text = render_advisory(&advisory);
        assert!(text.contains("Crop Risk Analysis\n  - Flooding\n"));
        assert!(text.ends_with(&format!("  {NO_RECOMMENDATIONS}\n")));
    }

    #[test]
    fn test_forecast_lines() {
        let report: WeatherReport = serde_json::from_value(json!({
            "location": {"name": "Jaffna"},
            "forecast": {"forecastday": [
                {"date": "2025-02-01", "day": {"mintemp_c": 24.0, "maxtemp_c": 31.4, "condition": {"text": "Sunny"}}},
                {"date": "2025-02-02", "day": {}}
            ]}
        }))
        .unwrap();
        let text = render_forecast(&report);
        assert!(text.starts_with("Forecast for Jaffna\n"));
        assert!(text.contains("2025-02-01: 24.0-31.4°C Sunny"));
        assert!(text.contains("2025-02-02: \n"));
    }

    #[test]
    fn test_paragraphs() {
        let text = "Water early.\n\n\n\nPrune lower leaves.\n\n  ";
        assert_eq!(paragraphs(text), vec!["Water early.", "Prune lower leaves."]);
    }

    #[test]
    fn test_paragraphs_with_crlf() {
        let text = "Water early.\r\n\r\nPrune lower leaves.\r\nBurn the cuttings.\r\n";
        assert_eq!(
            paragraphs(text),
            vec!["Water early.", "Prune lower leaves.\nBurn the cuttings."]
        );

        let advisory = WeatherAdvisory {
            risks: vec!["Fungal spread.\r\n\r\nHigh humidity all week.".to_string()],
            recommendations: Vec::new(),
        };
        let text = render_advisory(&advisory);
        assert!(text.contains("  - Fungal spread.\n    High humidity all week.\n"));
    }

    #[test]
    fn test_multi_paragraph_item_is_indented() {
        let advisory = WeatherAdvisory {
            risks: Vec::new(),
            recommendations: vec!["Water early.\n\nAvoid wetting leaves.".to_string()],
        };
        let text = render_advisory(&advisory);
        assert!(text.contains("  - Water early.\n    Avoid wetting leaves.\n"));
        assert!(text.contains("No risks identified."));
    }
}
