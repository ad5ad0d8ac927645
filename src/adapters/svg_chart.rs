//! SVG chart rendering.
//!
//! Two charts per run: close price with both moving averages, and the
//! portfolio value over time. Each is a standalone SVG document.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::domain::error::SmacrossError;
use crate::ports::report_port::{BacktestReport, ReportPort};

const PADDING_LEFT: f64 = 80.0;
const PADDING_RIGHT: f64 = 30.0;
const PADDING_TOP: f64 = 50.0;
const PADDING_BOTTOM: f64 = 60.0;
const Y_TICKS: usize = 5;

pub struct ChartSeries<'a> {
    pub label: String,
    pub color: &'a str,
    pub opacity: f64,
    pub values: Vec<f64>,
}

pub struct LineChart<'a> {
    pub title: String,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub width: f64,
    pub height: f64,
    pub dates: Vec<NaiveDate>,
    pub series: Vec<ChartSeries<'a>>,
}

impl LineChart<'_> {
    pub fn render(&self) -> String {
        let plot_width = self.width - PADDING_LEFT - PADDING_RIGHT;
        let plot_height = self.height - PADDING_TOP - PADDING_BOTTOM;

        let (min, max) = self
            .series
            .iter()
            .flat_map(|s| s.values.iter().copied())
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let (min, max) = if min > max {
            (0.0, 1.0)
        } else if max - min == 0.0 {
            (min - 1.0, max + 1.0)
        } else {
            (min, max)
        };

        let points = self.dates.len();
        let scale_x = if points > 1 {
            plot_width / (points - 1) as f64
        } else {
            0.0
        };
        let scale_y = plot_height / (max - min);
        let x_of = |i: usize| PADDING_LEFT + i as f64 * scale_x;
        let y_of = |v: f64| PADDING_TOP + plot_height - (v - min) * scale_y;

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="sans-serif" font-size="12">
<rect width="100%" height="100%" fill="white"/>
<text x="{cx:.1}" y="28" text-anchor="middle" font-size="16">{title}</text>
"#,
            w = self.width,
            h = self.height,
            cx = self.width / 2.0,
            title = escape(&self.title),
        ));

        // horizontal grid with value labels
        for tick in 0..=Y_TICKS {
            let value = min + (max - min) * tick as f64 / Y_TICKS as f64;
            let y = y_of(value);
            svg.push_str(&format!(
                "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"#dddddd\"/>\n\
                 <text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{:.2}</text>\n",
                PADDING_LEFT,
                PADDING_LEFT + plot_width,
                PADDING_LEFT - 6.0,
                y + 4.0,
                value,
            ));
        }

        // first, middle and last date under the x axis
        if points > 0 {
            let mut ticks = vec![0, points / 2, points - 1];
            ticks.dedup();
            for i in ticks {
                svg.push_str(&format!(
                    "<text x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
                    x_of(i),
                    PADDING_TOP + plot_height + 18.0,
                    self.dates[i]
                ));
            }
        }

        svg.push_str(&format!(
            "<line x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\" stroke=\"black\"/>\n\
             <line x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\" stroke=\"black\"/>\n\
             <text x=\"{cx:.1}\" y=\"{xl:.1}\" text-anchor=\"middle\">{x_label}</text>\n\
             <text x=\"18\" y=\"{cy:.1}\" text-anchor=\"middle\" transform=\"rotate(-90 18 {cy:.1})\">{y_label}</text>\n",
            l = PADDING_LEFT,
            r = PADDING_LEFT + plot_width,
            t = PADDING_TOP,
            b = PADDING_TOP + plot_height,
            cx = PADDING_LEFT + plot_width / 2.0,
            xl = self.height - 15.0,
            cy = PADDING_TOP + plot_height / 2.0,
            x_label = escape(self.x_label),
            y_label = escape(self.y_label),
        ));

        for series in &self.series {
            let coords: Vec<String> = series
                .values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(i, &v)| format!("{:.1},{:.1}", x_of(i), y_of(v)))
                .collect();
            if coords.is_empty() {
                continue;
            }
            svg.push_str(&format!(
                "<polyline fill=\"none\" stroke=\"{}\" stroke-opacity=\"{:.2}\" stroke-width=\"1.5\" points=\"{}\"/>\n",
                series.color,
                series.opacity,
                coords.join(" ")
            ));
        }

        // legend, top-left of the plot area
        for (i, series) in self.series.iter().enumerate() {
            let y = PADDING_TOP + 14.0 + i as f64 * 18.0;
            svg.push_str(&format!(
                "<line x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\" stroke=\"{}\" stroke-width=\"3\"/>\n\
                 <text x=\"{:.1}\" y=\"{:.1}\">{}</text>\n",
                PADDING_LEFT + 10.0,
                PADDING_LEFT + 30.0,
                series.color,
                PADDING_LEFT + 36.0,
                y + 4.0,
                escape(&series.label),
            ));
        }

        svg.push_str("</svg>\n");
        svg
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

pub fn price_chart<'a>(report: &BacktestReport<'a>) -> LineChart<'a> {
    let rows = &report.result.rows;
    LineChart {
        title: format!("Moving Average Crossover Strategy - {}", report.symbol),
        x_label: "Date",
        y_label: "Price ($)",
        width: 1200.0,
        height: 600.0,
        dates: rows.iter().map(|r| r.date).collect(),
        series: vec![
            ChartSeries {
                label: "Stock Price".to_string(),
                color: "#1f77b4",
                opacity: 0.7,
                values: rows.iter().map(|r| r.close).collect(),
            },
            ChartSeries {
                label: format!("Short {}-Day MA", report.strategy.short_window),
                color: "#ff7f0e",
                opacity: 1.0,
                values: rows.iter().map(|r| r.short_ma).collect(),
            },
            ChartSeries {
                label: format!("Long {}-Day MA", report.strategy.long_window),
                color: "#2ca02c",
                opacity: 1.0,
                values: rows.iter().map(|r| r.long_ma).collect(),
            },
        ],
    }
}

pub fn portfolio_chart<'a>(report: &BacktestReport<'a>) -> LineChart<'a> {
    LineChart {
        title: "Portfolio Value Over Time".to_string(),
        x_label: "Date",
        y_label: "Portfolio ($)",
        width: 1200.0,
        height: 500.0,
        dates: report.result.rows.iter().map(|r| r.date).collect(),
        series: vec![ChartSeries {
            label: "Portfolio Value".to_string(),
            color: "#1f77b4",
            opacity: 1.0,
            values: report.result.portfolio_values(),
        }],
    }
}

/// Writes `<symbol>_price_ma.svg` and `<symbol>_portfolio.svg` into `output_dir`.
pub struct SvgChartReport {
    output_dir: PathBuf,
}

impl SvgChartReport {
    pub fn new(output_dir: PathBuf) -> Self {
        Self { output_dir }
    }

    pub fn output_paths(&self, symbol: &str) -> (PathBuf, PathBuf) {
        let stem = symbol.to_lowercase();
        (
            self.output_dir.join(format!("{stem}_price_ma.svg")),
            self.output_dir.join(format!("{stem}_portfolio.svg")),
        )
    }

    fn write_file(path: &Path, content: &str) -> Result<(), SmacrossError> {
        fs::write(path, content)?;
        log::info!("chart written to {}", path.display());
        Ok(())
    }
}

impl ReportPort for SvgChartReport {
    fn write(&self, report: &BacktestReport) -> Result<(), SmacrossError> {
        fs::create_dir_all(&self.output_dir)?;
        let (price_path, portfolio_path) = self.output_paths(report.symbol);
        Self::write_file(&price_path, &price_chart(report).render())?;
        Self::write_file(&portfolio_path, &portfolio_chart(report).render())?;
        Ok(())
    }
}
