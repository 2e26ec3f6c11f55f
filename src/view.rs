//! Terminal View
//!
//! Renders a dashboard [`Frame`] as plain text: the six readouts, one
//! sparkline per chart and any visible confirmation message.

use std::fmt::Write;

use crate::dashboard::{ChartSeries, Frame, ReadoutId};

/// Sparkline glyphs from lowest to highest
const LEVELS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const MIN_CHART_WIDTH: usize = 10;

/// Text renderer for the live dashboard
#[derive(Debug, Clone)]
pub struct TerminalView {
    /// Total line width; charts take what the label column leaves
    width: usize,
    /// Stroke charts in their configured colours (24-bit ANSI)
    color: bool,
}

impl Default for TerminalView {
    fn default() -> Self {
        Self {
            width: 80,
            color: true,
        }
    }
}

impl TerminalView {
    pub fn new(width: usize, color: bool) -> Self {
        Self { width, color }
    }

    /// Width derived from `COLUMNS` when the shell exports it
    pub fn responsive(color: bool) -> Self {
        let width = std::env::var("COLUMNS")
            .ok()
            .and_then(|c| c.parse().ok())
            .unwrap_or(80);
        Self::new(width, color)
    }

    fn chart_width(&self) -> usize {
        self.width.saturating_sub(24).max(MIN_CHART_WIDTH)
    }

    /// Render one full screen
    pub fn render(&self, frame: &Frame) -> String {
        let mut out = String::new();
        let rule = "-".repeat(self.width.min(120));

        let _ = writeln!(out, "Aethernet Dashboard");
        let _ = writeln!(out, "{}", rule);

        for id in ReadoutId::ALL {
            let _ = writeln!(out, "{:<18} {}", id.label(), frame.readouts.get(id));
        }

        let _ = writeln!(out, "{}", rule);

        for series in frame.charts.iter() {
            out.push_str(&self.render_chart(series));
            out.push('\n');
        }

        if let Some(text) = &frame.override_message {
            let _ = writeln!(out, "{}", rule);
            let _ = writeln!(out, ">> {}", text);
        }
        if let Some(text) = &frame.save_message {
            let _ = writeln!(out, "{}", rule);
            let _ = writeln!(out, ">> {}", text);
        }

        out
    }

    /// One chart: label, sparkline and range summary
    pub fn render_chart(&self, series: &ChartSeries) -> String {
        let spec = series.spec();
        let values: Vec<f64> = series.values().collect();
        let width = self.chart_width();
        let visible = &values[values.len().saturating_sub(width)..];

        let line = sparkline(visible);
        let line = match (self.color, ansi_color(spec.color)) {
            (true, Some(prefix)) => format!("{}{}\x1b[0m", prefix, line),
            _ => line,
        };

        let mut out = format!("{:<18} {}", spec.label, line);

        match (series.bounds(), series.latest()) {
            (Some((lo, hi)), Some(latest)) => {
                let _ = write!(
                    out,
                    "\n{:<18} min {:.1}  max {:.1}  latest {} @ {}",
                    "", lo, hi, latest.value, latest.label
                );
            }
            _ => {
                let _ = write!(out, "\n{:<18} waiting for data", "");
            }
        }

        out
    }
}

/// Map values onto eight block heights, scaled between their min and max
pub fn sparkline(values: &[f64]) -> String {
    let (mut lo, mut hi) = values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if values.is_empty() {
        return String::new();
    }

    // Flat series sit mid-height
    if lo == hi {
        lo -= 1.0;
        hi += 1.0;
    }

    let top = (LEVELS.len() - 1) as f64;
    values
        .iter()
        .map(|v| {
            let idx = ((v - lo) / (hi - lo) * top).round() as usize;
            LEVELS[idx.min(LEVELS.len() - 1)]
        })
        .collect()
}

/// 24-bit foreground escape for a `#rrggbb` colour
pub fn ansi_color(hex: &str) -> Option<String> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(format!("\x1b[38;2;{};{};{}m", r, g, b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ClientConfig, SensorClient};
    use crate::dashboard::{
        ChartKind, ChartPoint, Charts, DashboardClient, DashboardOptions, Readouts,
        RefreshOutcome, SubmitOutcome,
    };
    use crate::test_support::{closed_port_url, MockServer};
    use chrono::Local;
    use std::sync::Arc;

    fn dashboard(base_url: String) -> Arc<DashboardClient> {
        let api = SensorClient::new(ClientConfig {
            base_url,
            request_timeout_ms: Some(2000),
        })
        .unwrap();
        DashboardClient::new(Arc::new(api), DashboardOptions::default())
    }

    fn frame_with(values: &[f64]) -> Frame {
        let mut charts = Charts::new(50);
        for &value in values {
            let timestamp = Local::now();
            for kind in ChartKind::ALL {
                charts.get_mut(kind).push(ChartPoint {
                    label: timestamp.format("%H:%M:%S").to_string(),
                    timestamp,
                    value,
                });
            }
        }

        Frame {
            readouts: Readouts::default(),
            charts,
            override_message: None,
            save_message: None,
        }
    }

    #[test]
    fn test_sparkline_scales_to_range() {
        assert_eq!(sparkline(&[0.0, 7.0]), "▁█");
        assert_eq!(sparkline(&[10.0, 10.0, 10.0]), "▅▅▅");
        assert_eq!(sparkline(&[]), "");
    }

    #[test]
    fn test_ansi_color() {
        assert_eq!(ansi_color("#00ffee").as_deref(), Some("\x1b[38;2;0;255;238m"));
        assert_eq!(ansi_color("#A100FF").as_deref(), Some("\x1b[38;2;161;0;255m"));
        assert_eq!(ansi_color("teal"), None);
    }

    #[test]
    fn test_render_lists_readouts_and_charts() {
        let mut frame = frame_with(&[20.0, 21.0]);
        frame.readouts.temperature = "21 °C".to_string();
        frame.save_message = Some("Thresholds saved".to_string());

        let view = TerminalView::new(80, false);
        let text = view.render(&frame);

        assert!(text.contains("Temperature        21 °C"));
        assert!(text.contains("System Decision    --"));
        assert!(text.contains("Tank Level (%)"));
        assert!(text.contains("latest 21 @"));
        assert!(text.contains(">> Thresholds saved"));
        assert!(!text.contains('\x1b'));
    }

    #[test]
    fn test_empty_chart_waits_for_data() {
        let frame = frame_with(&[]);
        let view = TerminalView::new(80, true);
        let text = view.render_chart(frame.charts.get(ChartKind::Humidity));

        assert!(text.starts_with("Humidity (%)"));
        assert!(text.contains("waiting for data"));
    }

    #[test]
    fn test_chart_shows_most_recent_points_only() {
        let values: Vec<f64> = (0..40).map(|v| v as f64).collect();
        let frame = frame_with(&values);

        let view = TerminalView::new(34, false);
        let text = view.render_chart(frame.charts.get(ChartKind::Temperature));
        let first_line = text.lines().next().unwrap();

        assert_eq!(first_line.chars().filter(|c| LEVELS.contains(c)).count(), 10);
    }

    #[tokio::test]
    async fn test_failed_refresh_leaves_screen_unchanged() {
        let server = MockServer::start().await;
        let client = dashboard(server.base_url());
        let view = TerminalView::new(80, false);

        assert_eq!(client.refresh().await, RefreshOutcome::Applied);
        let before = view.render(&client.frame().await);

        server.set_snapshot_body("<html>bad</html>").await;
        assert_eq!(client.refresh().await, RefreshOutcome::Failed);
        let after = view.render(&client.frame().await);

        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_screen_unchanged() {
        let client = dashboard(closed_port_url().await);
        let view = TerminalView::new(80, false);
        let before = view.render(&client.frame().await);

        assert_eq!(client.submit_thresholds("60", "22").await, SubmitOutcome::Failed);
        assert_eq!(client.submit_override("store").await, SubmitOutcome::Failed);

        assert_eq!(view.render(&client.frame().await), before);
    }
}
