use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfLayerReference, Point, Polygon,
    Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::Result;
use crate::pipeline::MovieAverages;

pub const CHART_TITLE: &str = "Average ages of the casts of currently playing movies";
pub const X_LABEL: &str = "Average ages";

const PAGE_WIDTH: f32 = 210.0;
const MARGIN: f32 = 15.0;
const HEADER: f32 = 25.0;
const FOOTER: f32 = 25.0;
const BAR_HEIGHT: f32 = 6.0;
const BAR_GAP: f32 = 3.0;
const MIN_PLOT_HEIGHT: f32 = 60.0;
const LABEL_FONT_SIZE: f32 = 8.0;
// Rough Helvetica advance per character, in mm, at LABEL_FONT_SIZE.
const LABEL_CHAR_WIDTH: f32 = 1.6;
const MAX_LABEL_WIDTH: f32 = 80.0;
const MAX_LABEL_CHARS: usize = 48;
const TICKS: usize = 5;
const UNMAPPABLE: char = '?';

// Printable code points of Windows-1252 outside Latin-1.
const WINANSI_EXTRAS: &str = "€‚ƒ„…†‡ˆ‰Š‹ŒŽ‘’“”•–—˜™š›œžŸ";

/// Output path for a chart name; `.pdf` is always appended.
pub fn pdf_path(name: &str) -> PathBuf {
    PathBuf::from(format!("{}.pdf", name))
}

/// Upper end of the x axis: the largest value rounded up to a multiple of ten.
pub fn axis_upper_bound(values: impl IntoIterator<Item = f64>) -> f64 {
    let max = values.into_iter().fold(0.0_f64, f64::max);
    ((max / 10.0).ceil() * 10.0).max(10.0)
}

fn truncate_label(title: &str) -> String {
    if title.chars().count() <= MAX_LABEL_CHARS {
        return title.to_string();
    }
    let mut label: String = title.chars().take(MAX_LABEL_CHARS - 3).collect();
    label.push_str("...");
    label
}

fn winansi_encodable(c: char) -> bool {
    matches!(c as u32, 0x20..=0x7E | 0xA0..=0xFF) || WINANSI_EXTRAS.contains(c)
}

/// Replaces characters the built-in PDF fonts cannot encode with `?`.
///
/// Those fonts are WinAnsi-encoded and silently drop anything else, which
/// would leave a Cyrillic or CJK title with no label at all.
pub fn winansi_label(text: &str) -> String {
    text.chars()
        .map(|c| if winansi_encodable(c) { c } else { UNMAPPABLE })
        .collect()
}

/// Bar labels in chart order. Without an embedded Unicode font, titles are
/// reduced to what the built-in fonts can show.
pub fn chart_labels(averages: &MovieAverages, unicode_font: bool) -> Vec<String> {
    averages
        .iter()
        .map(|(title, _)| {
            let label = truncate_label(title);
            if unicode_font {
                return label;
            }
            let encodable = winansi_label(&label);
            if encodable != label {
                warn!(
                    title,
                    "title not representable in the built-in font, set CHART_FONT_PATH"
                );
            }
            encodable
        })
        .collect()
}

/// Writes one horizontal bar per movie to `<output_name>.pdf` and returns the path.
///
/// `font_path` names a TrueType/OpenType font to embed for all text; without
/// one, the built-in Helvetica is used.
pub fn render(
    averages: &MovieAverages,
    output_name: &str,
    font_path: Option<&Path>,
) -> Result<PathBuf> {
    let path = pdf_path(output_name);

    let labels = chart_labels(averages, font_path.is_some());
    let longest = labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let label_width = (longest as f32 * LABEL_CHAR_WIDTH).min(MAX_LABEL_WIDTH) + 4.0;

    let bars = averages.len() as f32;
    let plot_height = (bars * (BAR_HEIGHT + BAR_GAP) + BAR_GAP).max(MIN_PLOT_HEIGHT);
    let page_height = HEADER + plot_height + FOOTER;

    let (doc, page, layer) =
        PdfDocument::new(CHART_TITLE, Mm(PAGE_WIDTH), Mm(page_height), "Chart");
    let layer = doc.get_page(page).get_layer(layer);
    let (font, bold) = match font_path {
        Some(font_path) => {
            let font = doc.add_external_font(File::open(font_path)?)?;
            (font.clone(), font)
        }
        None => (
            doc.add_builtin_font(BuiltinFont::Helvetica)?,
            doc.add_builtin_font(BuiltinFont::HelveticaBold)?,
        ),
    };

    let plot = PlotArea {
        left: MARGIN + label_width,
        right: PAGE_WIDTH - MARGIN,
        bottom: FOOTER,
        top: FOOTER + plot_height,
        upper: axis_upper_bound(averages.iter().map(|(_, average)| average)),
    };

    layer.use_text(CHART_TITLE, 11.0, Mm(MARGIN), Mm(page_height - 12.0), &bold);

    layer.set_fill_color(Color::Rgb(Rgb::new(0.6, 0.75, 0.9, None)));
    for (slot, (_, average)) in averages.iter().enumerate() {
        let y = plot.bar_bottom(slot);
        layer.add_polygon(rect(plot.left, y, plot.x_for(average) - plot.left, BAR_HEIGHT));
    }

    layer.set_fill_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    for (slot, label) in labels.iter().enumerate() {
        let y = plot.bar_bottom(slot);
        layer.use_text(label.as_str(), LABEL_FONT_SIZE, Mm(MARGIN), Mm(y + 1.8), &font);
    }

    draw_axes(&layer, &plot, &font);

    doc.save(&mut BufWriter::new(File::create(&path)?))?;
    Ok(path)
}

struct PlotArea {
    left: f32,
    right: f32,
    bottom: f32,
    top: f32,
    upper: f64,
}

impl PlotArea {
    fn x_for(&self, value: f64) -> f32 {
        self.left + (value / self.upper) as f32 * (self.right - self.left)
    }

    fn bar_bottom(&self, slot: usize) -> f32 {
        self.top - BAR_GAP - (slot as f32 + 1.0) * BAR_HEIGHT - slot as f32 * BAR_GAP
    }
}

fn draw_axes(layer: &PdfLayerReference, plot: &PlotArea, font: &IndirectFontRef) {
    layer.set_outline_color(Color::Rgb(Rgb::new(0.0, 0.0, 0.0, None)));
    layer.set_outline_thickness(0.5);
    layer.add_line(segment(plot.left, plot.bottom, plot.left, plot.top));
    layer.add_line(segment(plot.left, plot.bottom, plot.right, plot.bottom));

    for tick in 0..=TICKS {
        let value = plot.upper * tick as f64 / TICKS as f64;
        let x = plot.x_for(value);
        layer.add_line(segment(x, plot.bottom, x, plot.bottom - 1.5));
        let tick_label = format!("{:.0}", value);
        layer.use_text(tick_label, LABEL_FONT_SIZE, Mm(x - 2.0), Mm(plot.bottom - 6.0), font);
    }

    let centre = plot.left + (plot.right - plot.left) / 2.0;
    layer.use_text(X_LABEL, 9.0, Mm(centre - 10.0), Mm(plot.bottom - 13.0), font);
}

fn segment(x1: f32, y1: f32, x2: f32, y2: f32) -> Line {
    Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y1)), false),
            (Point::new(Mm(x2), Mm(y2)), false),
        ],
        is_closed: false,
    }
}

fn rect(x: f32, y: f32, width: f32, height: f32) -> Polygon {
    Polygon {
        rings: vec![vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + width), Mm(y)), false),
            (Point::new(Mm(x + width), Mm(y + height)), false),
            (Point::new(Mm(x), Mm(y + height)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    }
}
