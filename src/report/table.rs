//! Plain-text rendering for terminal output

use std::fmt::Write;

use rust_decimal::Decimal;

use crate::analytics::{ExposureProfile, Metric, StrikeSummary};
use crate::core::{OptionType, SpotQuote};
use crate::scanner::ScanReport;

/// Quote lines plus the max-pain headline
pub fn render_headline(report: &ScanReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} options expiring {}", report.ticker, report.expiration);

    if let Some(quote) = &report.quote {
        out.push_str(&render_quote(quote));
    }

    let _ = writeln!(
        out,
        "Target Max Pain: ${} ({} weighting)",
        report.max_pain.strike, report.max_pain.weighting
    );
    if let Some(spot) = report.spot().and_then(|s| Decimal::try_from(s).ok()) {
        let _ = writeln!(
            out,
            "Max pain vs spot: {:+.2}",
            report.max_pain.distance_from(spot)
        );
    }
    match report.gamma_flip {
        Some(strike) => {
            let _ = writeln!(out, "Gamma flip: ${}", strike);
        }
        None => out.push_str("Gamma flip: none\n"),
    }
    if let Some(pcr) = report.summary.put_call_ratio(Metric::OpenInterest) {
        let _ = writeln!(out, "Put/Call OI ratio: {:.2}", pcr);
    }
    out
}

/// Last / high / low / volume / IV lines; missing values print as N/A
pub fn render_quote(quote: &SpotQuote) -> String {
    let price = |v: Option<f64>| v.map_or_else(|| "N/A".to_string(), |p| format!("${:.2}", p));

    let mut out = String::new();
    let _ = writeln!(out, "Last Price: {}", price(quote.last));
    let _ = writeln!(out, "High: {}", price(quote.high));
    let _ = writeln!(out, "Low: {}", price(quote.low));
    let _ = writeln!(
        out,
        "Volume: {}",
        quote.volume.map_or_else(|| "N/A".to_string(), |v| v.to_string())
    );
    let _ = writeln!(
        out,
        "IV: {}",
        quote.iv.map_or_else(|| "N/A".to_string(), |iv| format!("{:.1}%", iv * 100.0))
    );
    out
}

/// Strike table with OI and volume per side
pub fn render_summary_table(summary: &StrikeSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>10} {:>10} {:>10} {:>10} {:>10}",
        "Strike", "CALL OI", "PUT OI", "CALL Vol", "PUT Vol"
    );
    out.push_str(&"-".repeat(54));
    out.push('\n');

    for (strike, entry) in summary.iter() {
        let _ = writeln!(
            out,
            "{:>10} {:>10} {:>10} {:>10} {:>10}",
            strike.to_string(),
            entry.call.open_interest,
            entry.put.open_interest,
            entry.call.volume,
            entry.put.volume
        );
    }

    let _ = writeln!(
        out,
        "{:>10} {:>10} {:>10} {:>10} {:>10}",
        "Total",
        summary.total(Metric::OpenInterest, OptionType::Call),
        summary.total(Metric::OpenInterest, OptionType::Put),
        summary.total(Metric::Volume, OptionType::Call),
        summary.total(Metric::Volume, OptionType::Put)
    );
    out
}

/// Ranked strike list, e.g. "Top CALL OI: 105 (60), 100 (40)"
pub fn render_top(label: &str, ranked: &[(Decimal, u64)]) -> String {
    let items: Vec<String> = ranked
        .iter()
        .map(|(strike, value)| format!("{} ({})", strike, value))
        .collect();
    format!("Top {}: {}\n", label, items.join(", "))
}

/// Horizontal bar chart: put OI to the left, call OI to the right
///
/// A marker row is inserted above the first strike at or above spot, or
/// after the last strike when spot is above all of them.
pub fn render_exposure(profile: &ExposureProfile, half_width: usize) -> String {
    let max = profile.max_magnitude();
    let scale = |v: i128| -> usize {
        if max == 0 {
            return 0;
        }
        let w = half_width as i128;
        ((v.abs() * w + max / 2) / max) as usize
    };

    let spot_idx = profile.spot_index();
    let marker = |out: &mut String| {
        if let Some(spot) = profile.spot {
            let _ = writeln!(out, "{:>10} {}", format!("{:.2}", spot), "~".repeat(2 * half_width + 1));
        }
    };
    let mut out = String::new();

    for (i, row) in profile.rows.iter().enumerate() {
        if spot_idx == Some(i) {
            marker(&mut out);
        }

        let puts = "#".repeat(scale(row.put));
        let calls = "#".repeat(scale(row.call));
        let _ = writeln!(
            out,
            "{:>10} {:>width$}|{:<width$} {:>8} {:>8}",
            row.strike.to_string(),
            puts,
            calls,
            row.call,
            row.put,
            width = half_width
        );
    }
    if spot_idx == Some(profile.rows.len()) {
        marker(&mut out);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{aggregate, gamma_flip, max_pain, PainWeighting};
    use crate::core::OptionContract;
    use chrono::{NaiveDate, Utc};
    use rust_decimal_macros::dec;

    fn summary() -> StrikeSummary {
        aggregate(&[
            OptionContract::call(dec!(95), 10),
            OptionContract::put(dec!(95), 50),
            OptionContract::call(dec!(100), 40).with_volume(3),
            OptionContract::put(dec!(105), 5),
        ])
    }

    fn report(last: Option<f64>) -> ScanReport {
        let summary = summary();
        let quote = last.map(|p| {
            let mut quote = SpotQuote::new("SPY");
            quote.last = Some(p);
            quote
        });
        ScanReport {
            ticker: "SPY".to_string(),
            expiration: NaiveDate::from_ymd_opt(2024, 6, 21).unwrap(),
            max_pain: max_pain(&summary, PainWeighting::OpenInterest).unwrap(),
            gamma_flip: gamma_flip(&summary),
            top_calls: Vec::new(),
            top_puts: Vec::new(),
            exposure: ExposureProfile::from_summary(&summary, last),
            quote,
            summary,
            generated_at: Utc::now(),
        }
    }

    #[test]
    fn test_headline_distance_from_spot() {
        // pains: 95 -> 50, 100 -> 75, 105 -> 300
        let text = render_headline(&report(Some(98.5)));
        assert!(text.contains("Target Max Pain: $95 (oi weighting)"));
        assert!(text.contains("Max pain vs spot: -3.50"));

        let text = render_headline(&report(Some(94.0)));
        assert!(text.contains("Max pain vs spot: +1.00"));

        let text = render_headline(&report(None));
        assert!(!text.contains("Max pain vs spot"));
        assert!(!text.contains("Last Price"));
    }

    #[test]
    fn test_summary_table() {
        let table = render_summary_table(&summary());
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 6);
        assert!(lines[0].contains("CALL OI"));
        assert!(lines[2].trim_start().starts_with("95"));
        assert!(lines[5].contains("Total"));
        assert!(lines[5].contains("50"));
    }

    #[test]
    fn test_quote_missing_fields() {
        let mut quote = SpotQuote::new("SPY");
        quote.last = Some(512.3);
        let text = render_quote(&quote);

        assert!(text.contains("Last Price: $512.30"));
        assert!(text.contains("High: N/A"));
        assert!(text.contains("IV: N/A"));
    }

    #[test]
    fn test_top() {
        let line = render_top("CALL OI", &[(dec!(105), 60), (dec!(100), 40)]);
        assert_eq!(line, "Top CALL OI: 105 (60), 100 (40)\n");
    }

    #[test]
    fn test_exposure_bars() {
        let profile = ExposureProfile::from_summary(&summary(), Some(99.0));
        let chart = render_exposure(&profile, 10);
        let lines: Vec<&str> = chart.lines().collect();

        // 3 strikes plus the spot marker above 100
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("99.00"));
        assert!(lines[0].contains(&"#".repeat(10)));
        assert!(lines[2].contains(&"#".repeat(8)));
    }

    #[test]
    fn test_exposure_spot_above_all_strikes() {
        let profile = ExposureProfile::from_summary(&summary(), Some(200.0));
        let chart = render_exposure(&profile, 10);
        let lines: Vec<&str> = chart.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[2].trim_start().starts_with("105"));
        assert!(lines[3].contains("200.00"));
        assert!(lines[3].contains(&"~".repeat(21)));

        // Below every strike the marker leads.
        let profile = ExposureProfile::from_summary(&summary(), Some(50.0));
        let chart = render_exposure(&profile, 10);
        assert!(chart.lines().next().unwrap().contains("50.00"));
    }

    #[test]
    fn test_exposure_empty() {
        let profile = ExposureProfile::from_summary(&StrikeSummary::new(), None);
        assert!(render_exposure(&profile, 10).is_empty());
    }
}
