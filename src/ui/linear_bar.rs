use crate::ui::progress_indicator::ProgressIndicator;
use ratatui::{buffer::Buffer, layout::Rect, style::Color, widgets::Widget};

/// Lower block glyphs from empty to full, in eighths
const LEVELS: [&str; 9] = [" ", "▁", "▂", "▃", "▄", "▅", "▆", "▇", "█"];

/// Glyph for a vertical fill fraction
pub fn level_glyph(fraction: f64) -> &'static str {
    if !fraction.is_finite() || fraction <= 0.0 {
        return LEVELS[0];
    }
    let index = (fraction.min(1.0) * 8.0).round() as usize;
    LEVELS[index.min(8)]
}

/// Renders a [`ProgressIndicator`] on a single terminal row.
///
/// Horizontally one unit is one column. The bar sits `frame.y` rows below the
/// top of `area`, and its current height is drawn as a partial block relative
/// to the configured bar height.
pub struct LinearBar<'a> {
    indicator: &'a ProgressIndicator,
}

impl<'a> LinearBar<'a> {
    pub fn new(indicator: &'a ProgressIndicator) -> Self {
        Self { indicator }
    }
}

/// Columns whose centre lies within `[start, end)`, clipped to `width`
fn covered_columns(start: f64, end: f64, width: u16) -> std::ops::Range<u16> {
    let first = (start - 0.5).ceil().max(0.0);
    let last = (end - 0.5).ceil().max(0.0).min(width as f64);
    if first >= last {
        return 0..0;
    }
    first as u16..last as u16
}

impl Widget for LinearBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let indicator = self.indicator;
        let bar = indicator.frame();
        let bar_height = indicator.config().bar_height;
        if area.width == 0 || area.height == 0 || bar.height <= 0.0 || bar_height <= 0.0 {
            return;
        }

        let row = bar.y.max(0.0).round();
        if row >= area.height as f64 {
            return;
        }
        let y = area.y + row as u16;

        let colors = indicator
            .applied_colors()
            .unwrap_or(indicator.config().colors);

        let track_glyph = level_glyph(bar.height / bar_height);
        for column in covered_columns(bar.x, bar.max_x(), area.width) {
            draw(buf, area.x + column, y, track_glyph, colors.track);
        }

        if !indicator.fill_visible() {
            return;
        }
        let fill = indicator.fill_frame();
        // The fill is clipped by the bar's current height
        let fill_glyph = level_glyph(fill.height.min(bar.height) / bar_height);
        let start = bar.x + fill.x;
        let end = (start + fill.width).min(bar.max_x());
        for column in covered_columns(start, end, area.width) {
            draw(buf, area.x + column, y, fill_glyph, colors.fill);
        }
    }
}

fn draw(buf: &mut Buffer, x: u16, y: u16, symbol: &str, color: Color) {
    buf.get_mut(x, y).set_symbol(symbol).set_fg(color);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::geometry::Size;
    use crate::ui::host::HostWindow;
    use std::time::Duration;

    #[test]
    fn test_level_glyphs() {
        assert_eq!(level_glyph(0.0), " ");
        assert_eq!(level_glyph(0.5), "▄");
        assert_eq!(level_glyph(1.0), "█");
        assert_eq!(level_glyph(3.0), "█");
        assert_eq!(level_glyph(f64::NAN), " ");
    }

    #[test]
    fn test_covered_columns() {
        assert_eq!(covered_columns(0.0, 10.0, 80), 0..10);
        assert_eq!(covered_columns(2.4, 4.6, 80), 2..5);
        assert_eq!(covered_columns(70.0, 100.0, 80), 70..80);
        assert_eq!(covered_columns(5.0, 5.0, 80), 0..0);
    }

    #[test]
    fn test_idle_indicator_draws_nothing() {
        let indicator = ProgressIndicator::new();
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        LinearBar::new(&indicator).render(area, &mut buf);
        assert_eq!(buf, Buffer::empty(area));
    }

    #[test]
    fn test_sweeping_indicator_draws_track_and_fill() {
        let mut host = HostWindow::new(Size::new(20.0, 4.0));
        let mut indicator = ProgressIndicator::new();
        indicator.start(&mut host, Some(Duration::ZERO));
        indicator.tick(Duration::from_millis(500));

        let area = Rect::new(0, 0, 20, 4);
        let mut buf = Buffer::empty(area);
        LinearBar::new(&indicator).render(area, &mut buf);

        let colors = indicator.config().colors;
        // Fill covers 0.7 of the bar width at the half-way point
        for x in 0..14 {
            let cell = buf.get(x, 0);
            assert_eq!(cell.symbol(), "█");
            assert_eq!(cell.fg, colors.fill);
        }
        for x in 14..20 {
            let cell = buf.get(x, 0);
            assert_eq!(cell.symbol(), "█");
            assert_eq!(cell.fg, colors.track);
        }
        assert_eq!(buf.get(0, 1).symbol(), " ");
    }
}
