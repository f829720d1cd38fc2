//! Inline SVG rendering of a regression panel.
//!
//! Scatter at half opacity, red fit line, light grid, axis labels, title and
//! an R² legend. Output is a self-contained `<svg>` element.

use econlab_analysis::RegressionPanel;
use std::fmt::Write;

const WIDTH: f64 = 480.0;
const HEIGHT: f64 = 320.0;
const MARGIN_LEFT: f64 = 64.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_TOP: f64 = 36.0;
const MARGIN_BOTTOM: f64 = 48.0;
const TICKS: usize = 5;

/// Linear map from data range to pixel range.
#[derive(Debug, Clone, Copy)]
struct Scale {
    lo: f64,
    hi: f64,
    px_lo: f64,
    px_hi: f64,
}

impl Scale {
    /// Data range padded by 5% each side; a flat range is widened by ±1.
    fn padded(values: impl Iterator<Item = f64>, px_lo: f64, px_hi: f64) -> Self {
        let (mut lo, mut hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if !lo.is_finite() || !hi.is_finite() {
            lo = 0.0;
            hi = 1.0;
        }
        if (hi - lo).abs() < 1e-12 {
            lo -= 1.0;
            hi += 1.0;
        }
        let pad = (hi - lo) * 0.05;
        Self {
            lo: lo - pad,
            hi: hi + pad,
            px_lo,
            px_hi,
        }
    }

    fn map(&self, v: f64) -> f64 {
        self.px_lo + (v - self.lo) / (self.hi - self.lo) * (self.px_hi - self.px_lo)
    }

    fn ticks(&self) -> Vec<f64> {
        let step = (self.hi - self.lo) / (TICKS - 1) as f64;
        (0..TICKS).map(|i| self.lo + step * i as f64).collect()
    }
}

/// Tick label with precision matched to the axis span.
fn tick_label(v: f64, span: f64) -> String {
    if span >= 100.0 {
        format!("{v:.0}")
    } else if span >= 1.0 {
        format!("{v:.2}")
    } else {
        format!("{v:.4}")
    }
}

pub fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Render one panel as an SVG element.
pub fn render_panel_svg(panel: &RegressionPanel) -> String {
    let plot_left = MARGIN_LEFT;
    let plot_right = WIDTH - MARGIN_RIGHT;
    let plot_top = MARGIN_TOP;
    let plot_bottom = HEIGHT - MARGIN_BOTTOM;

    let xs = Scale::padded(panel.points.iter().map(|p| p.0), plot_left, plot_right);
    // y axis grows upward
    let ys = Scale::padded(
        panel
            .points
            .iter()
            .map(|p| p.1)
            .chain(panel.line.iter().map(|p| p.1)),
        plot_bottom,
        plot_top,
    );

    let mut svg = String::with_capacity(8 * 1024);
    // Writing to a String cannot fail.
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {WIDTH} {HEIGHT}" class="panel-chart" role="img" aria-label="{title}">"#,
        title = escape(panel.spec.title)
    );

    // grid + ticks
    let _ = write!(svg, r##"<g class="grid" stroke="#000" stroke-opacity="0.3" stroke-width="0.5">"##);
    for t in xs.ticks() {
        let px = xs.map(t);
        let _ = write!(svg, r#"<line x1="{px:.1}" y1="{plot_top:.1}" x2="{px:.1}" y2="{plot_bottom:.1}"/>"#);
    }
    for t in ys.ticks() {
        let py = ys.map(t);
        let _ = write!(svg, r#"<line x1="{plot_left:.1}" y1="{py:.1}" x2="{plot_right:.1}" y2="{py:.1}"/>"#);
    }
    svg.push_str("</g>");

    let _ = write!(svg, r##"<g class="ticks" font-size="10" fill="#333">"##);
    for t in xs.ticks() {
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="middle">{}</text>"#,
            xs.map(t),
            plot_bottom + 14.0,
            tick_label(t, xs.hi - xs.lo)
        );
    }
    for t in ys.ticks() {
        let _ = write!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" text-anchor="end">{}</text>"#,
            plot_left - 6.0,
            ys.map(t) + 3.0,
            tick_label(t, ys.hi - ys.lo)
        );
    }
    svg.push_str("</g>");

    // axes frame
    let _ = write!(
        svg,
        r##"<rect x="{plot_left:.1}" y="{plot_top:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="#333"/>"##,
        plot_right - plot_left,
        plot_bottom - plot_top
    );

    // scatter
    let _ = write!(svg, r##"<g class="points" fill="#1f77b4" fill-opacity="0.5">"##);
    for (x, y) in &panel.points {
        let _ = write!(svg, r#"<circle cx="{:.2}" cy="{:.2}" r="3"/>"#, xs.map(*x), ys.map(*y));
    }
    svg.push_str("</g>");

    // fit line
    let line: Vec<String> = panel
        .line
        .iter()
        .map(|(x, y)| format!("{:.2},{:.2}", xs.map(*x), ys.map(*y)))
        .collect();
    let _ = write!(
        svg,
        r#"<polyline class="fit" points="{}" fill="none" stroke="red" stroke-width="1.5"/>"#,
        line.join(" ")
    );

    // legend
    let lx = plot_left + 10.0;
    let ly = plot_top + 10.0;
    let _ = write!(
        svg,
        r##"<g class="legend"><rect x="{lx:.1}" y="{ly:.1}" width="120" height="20" fill="#fff" fill-opacity="0.8" stroke="#ccc"/><line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="red" stroke-width="1.5"/><text x="{:.1}" y="{:.1}" font-size="11">{}</text></g>"##,
        lx + 6.0,
        ly + 10.0,
        lx + 26.0,
        ly + 10.0,
        lx + 32.0,
        ly + 14.0,
        escape(&panel.legend())
    );

    // title + axis labels
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="20" text-anchor="middle" font-size="13" font-weight="bold">{}</text>"#,
        WIDTH / 2.0,
        escape(panel.spec.title)
    );
    let _ = write!(
        svg,
        r#"<text x="{:.1}" y="{:.1}" text-anchor="middle" font-size="11">{}</text>"#,
        (plot_left + plot_right) / 2.0,
        HEIGHT - 10.0,
        escape(panel.spec.x.label())
    );
    let _ = write!(
        svg,
        r#"<text x="14" y="{:.1}" text-anchor="middle" font-size="11" transform="rotate(-90 14 {:.1})">{}</text>"#,
        (plot_top + plot_bottom) / 2.0,
        (plot_top + plot_bottom) / 2.0,
        escape(panel.spec.y.label())
    );

    svg.push_str("</svg>");
    svg
}
