//! PDF rendering
//!
//! Lays out a compiled [`Report`]: a portrait title page with the profile and
//! achievement summary, then one landscape page per chart.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use printpdf::image_crate::{DynamicImage, ImageFormat, RgbImage};
use printpdf::*;

use super::{CalorieRow, Report, WeightPoint};
use crate::build_info::BuildInfo;
use crate::error::Error;
use crate::Result;

// ============================================================================
// Color Constants (RGB 0-255)
// ============================================================================

const COLOR_TITLE: (u8, u8, u8) = (0, 112, 192);
const COLOR_GOOD: (u8, u8, u8) = (0, 176, 80);
const COLOR_WARN: (u8, u8, u8) = (255, 0, 0);
const COLOR_BLACK: (u8, u8, u8) = (0, 0, 0);
const COLOR_GRAY: (u8, u8, u8) = (128, 128, 128);

const CHART_WIDTH: u32 = 1000;
const CHART_HEIGHT: u32 = 400;

// ============================================================================
// Chart Generation (plotters)
// ============================================================================

/// Pad a degenerate or inverted range so plotters can draw it
fn padded_range(min: f64, max: f64, pad: f64) -> (f64, f64) {
    if !(min.is_finite() && max.is_finite()) {
        return (0.0, 1.0);
    }
    if (max - min).abs() < f64::EPSILON {
        (min - pad, max + pad)
    } else {
        let margin = (max - min) * 0.1;
        (min - margin, max + margin)
    }
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> std::result::Result<Vec<u8>, String> {
    let img = RgbImage::from_raw(width, height, buffer).ok_or("Failed to create image from buffer")?;

    let mut png_bytes = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut png_bytes), ImageFormat::Png)
        .map_err(|e| e.to_string())?;
    Ok(png_bytes)
}

/// Net calories against the goal's expected daily delta, as PNG bytes
pub fn generate_calorie_chart(
    rows: &[CalorieRow],
    width: u32,
    height: u32,
) -> std::result::Result<Vec<u8>, String> {
    use plotters::prelude::*;

    if rows.is_empty() {
        return Err("No calorie data to chart".to_string());
    }

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let (x_min, x_max) = padded_range(
            rows.iter().map(|r| r.days_since_start as f64).fold(f64::INFINITY, f64::min),
            rows.iter().map(|r| r.days_since_start as f64).fold(f64::NEG_INFINITY, f64::max),
            1.0,
        );
        let (y_min, y_max) = padded_range(
            rows.iter()
                .flat_map(|r| [r.net_calories, r.expected_daily_delta])
                .fold(f64::INFINITY, f64::min),
            rows.iter()
                .flat_map(|r| [r.net_calories, r.expected_daily_delta])
                .fold(f64::NEG_INFINITY, f64::max),
            100.0,
        );

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| e.to_string())?;

        chart
            .configure_mesh()
            .x_desc("Days Since Start")
            .y_desc("Calories")
            .draw()
            .map_err(|e| e.to_string())?;

        let net_points: Vec<(f64, f64)> = rows
            .iter()
            .map(|r| (r.days_since_start as f64, r.net_calories))
            .collect();

        chart
            .draw_series(LineSeries::new(net_points.clone(), BLUE.stroke_width(2)))
            .map_err(|e| e.to_string())?
            .label("Net Calories")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

        chart
            .draw_series(net_points.iter().map(|(x, y)| Circle::new((*x, *y), 3, BLUE.filled())))
            .map_err(|e| e.to_string())?;

        let expected_points: Vec<(f64, f64)> = rows
            .iter()
            .map(|r| (r.days_since_start as f64, r.expected_daily_delta))
            .collect();

        chart
            .draw_series(LineSeries::new(expected_points.clone(), RED.stroke_width(2)))
            .map_err(|e| e.to_string())?
            .label("Expected Daily Calorie Change")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

        chart
            .draw_series(expected_points.iter().map(|(x, y)| Cross::new((*x, *y), 4, RED.stroke_width(2))))
            .map_err(|e| e.to_string())?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    encode_png(buffer, width, height)
}

/// Weight over time, as PNG bytes
pub fn generate_weight_chart(
    points: &[WeightPoint],
    unit: &str,
    width: u32,
    height: u32,
) -> std::result::Result<Vec<u8>, String> {
    use plotters::prelude::*;

    if points.is_empty() {
        return Err("No weight data to chart".to_string());
    }

    let mut buffer = vec![0u8; (width * height * 3) as usize];

    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(|e| e.to_string())?;

        let (x_min, x_max) = padded_range(
            points.iter().map(|p| p.days_since_start as f64).fold(f64::INFINITY, f64::min),
            points.iter().map(|p| p.days_since_start as f64).fold(f64::NEG_INFINITY, f64::max),
            1.0,
        );
        let (y_min, y_max) = padded_range(
            points.iter().map(|p| p.weight).fold(f64::INFINITY, f64::min),
            points.iter().map(|p| p.weight).fold(f64::NEG_INFINITY, f64::max),
            2.0,
        );

        let mut chart = ChartBuilder::on(&root)
            .margin(20)
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| e.to_string())?;

        let y_desc = format!("Weight ({})", unit);
        chart
            .configure_mesh()
            .x_desc("Days Since Start")
            .y_desc(y_desc.as_str())
            .draw()
            .map_err(|e| e.to_string())?;

        let series: Vec<(f64, f64)> = points
            .iter()
            .map(|p| (p.days_since_start as f64, p.weight))
            .collect();

        let purple = RGBColor(112, 48, 160);
        chart
            .draw_series(LineSeries::new(series.clone(), purple.stroke_width(2)))
            .map_err(|e| e.to_string())?;

        chart
            .draw_series(series.iter().map(|(x, y)| Circle::new((*x, *y), 4, purple.filled())))
            .map_err(|e| e.to_string())?;

        root.present().map_err(|e| e.to_string())?;
    }

    encode_png(buffer, width, height)
}

// ============================================================================
// PDF Helper Functions
// ============================================================================

fn rgb_to_printpdf(r: u8, g: u8, b: u8) -> Color {
    Color::Rgb(Rgb::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        None,
    ))
}

fn add_text(
    layer: &PdfLayerReference,
    font: &IndirectFontRef,
    text: &str,
    x: Mm,
    y: Mm,
    size: f32,
    color: (u8, u8, u8),
) {
    layer.set_fill_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.use_text(text, size, x, y, font);
}

fn add_line(
    layer: &PdfLayerReference,
    x1: Mm,
    y1: Mm,
    x2: Mm,
    y2: Mm,
    color: (u8, u8, u8),
    width: f32,
) {
    layer.set_outline_color(rgb_to_printpdf(color.0, color.1, color.2));
    layer.set_outline_thickness(width);

    let line = Line {
        points: vec![(Point::new(x1, y1), false), (Point::new(x2, y2), false)],
        is_closed: false,
    };
    layer.add_line(line);
}

/// What a chart page shows
enum ChartContent {
    Image(Vec<u8>),
    NoData(&'static str),
    Failed(String),
}

impl ChartContent {
    /// Render `generate` unless the series is empty
    fn from_series(
        is_empty: bool,
        no_data: &'static str,
        generate: impl FnOnce() -> std::result::Result<Vec<u8>, String>,
    ) -> Self {
        if is_empty {
            return ChartContent::NoData(no_data);
        }
        match generate() {
            Ok(png_bytes) => ChartContent::Image(png_bytes),
            Err(e) => {
                tracing::warn!(error = %e, "chart generation failed");
                ChartContent::Failed(e)
            }
        }
    }

    /// Text and color drawn in place of a missing chart
    fn placeholder(&self) -> Option<(String, (u8, u8, u8))> {
        match self {
            ChartContent::Image(_) => None,
            ChartContent::NoData(message) => Some((message.to_string(), COLOR_GRAY)),
            ChartContent::Failed(e) => Some((format!("Chart generation error: {}", e), COLOR_WARN)),
        }
    }
}

/// Add a landscape page holding one chart, or a note when it cannot be drawn
fn add_chart_page(
    doc: &PdfDocumentReference,
    font: &IndirectFontRef,
    font_bold: &IndirectFontRef,
    title: &str,
    chart: ChartContent,
) -> Result<()> {
    let (page, layer) = doc.add_page(Mm(279.4), Mm(215.9), title);
    let layer = doc.get_page(page).get_layer(layer);

    let margin_left = 15.0;
    let mut y = 215.9 - 20.0;

    add_text(&layer, font_bold, title, Mm(margin_left), Mm(y), 16.0, COLOR_TITLE);
    y -= 10.0;

    if let Some((message, color)) = chart.placeholder() {
        add_text(&layer, font, &message, Mm(margin_left), Mm(y - 10.0), 11.0, color);
        return Ok(());
    }

    if let ChartContent::Image(png_bytes) = chart {
        let dynamic_image = printpdf::image_crate::load_from_memory(&png_bytes)
            .map_err(|e| Error::Report(e.to_string()))?;
        let pdf_image = Image::from_dynamic_image(&dynamic_image);

        // 1000x400 px at 120 DPI is about 212mm x 85mm
        let transform = ImageTransform {
            translate_x: Some(Mm(margin_left)),
            translate_y: Some(Mm(y - 90.0)),
            dpi: Some(120.0),
            ..Default::default()
        };
        pdf_image.add_to_layer(layer.clone(), transform);
    }

    Ok(())
}

// ============================================================================
// Report Rendering
// ============================================================================

/// Write the report to `output_path`, creating parent directories as needed
pub fn render_pdf(report: &Report, output_path: &Path) -> Result<()> {
    let (doc, page1, layer1) =
        PdfDocument::new("DietMaster Report", Mm(215.9), Mm(279.4), "Layer 1");

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| Error::Report(e.to_string()))?;
    let font_bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| Error::Report(e.to_string()))?;

    let layer = doc.get_page(page1).get_layer(layer1);

    let page_height = 279.4;
    let margin_left = 15.0;
    let mut y = page_height - 20.0;

    add_text(&layer, &font_bold, "DietMaster Report", Mm(margin_left), Mm(y), 20.0, COLOR_TITLE);
    y -= 8.0;

    let now = chrono::Local::now().format("%Y-%m-%d").to_string();
    add_text(&layer, &font, &format!("Generated: {}", now), Mm(margin_left), Mm(y), 10.0, COLOR_GRAY);
    y -= 6.0;

    add_line(&layer, Mm(margin_left), Mm(y), Mm(200.0), Mm(y), COLOR_GRAY, 0.5);
    y -= 10.0;

    add_text(&layer, &font_bold, "Profile", Mm(margin_left), Mm(y), 13.0, COLOR_BLACK);
    y -= 7.0;
    for line in report.profile_lines() {
        add_text(&layer, &font, &line, Mm(margin_left), Mm(y), 11.0, COLOR_BLACK);
        y -= 6.0;
    }
    y -= 6.0;

    add_text(&layer, &font_bold, "Achievement Summary", Mm(margin_left), Mm(y), 13.0, COLOR_BLACK);
    y -= 7.0;
    let losing = report.profile.weekly_weight_change.unwrap_or(0.0) >= 0.0;
    let lost = report.summary.total_change >= 0.0;
    let change_color = if losing == lost { COLOR_GOOD } else { COLOR_WARN };
    for (i, line) in report.summary_lines().iter().enumerate() {
        // third line is the weight change
        let line_color = if i == 2 { change_color } else { COLOR_BLACK };
        add_text(&layer, &font, line, Mm(margin_left), Mm(y), 11.0, line_color);
        y -= 6.0;
    }
    y -= 6.0;

    add_text(
        &layer,
        &font,
        &format!(
            "{} days of calorie data, {} weight entries",
            report.calorie_series.len(),
            report.weight_series.len()
        ),
        Mm(margin_left),
        Mm(y),
        10.0,
        COLOR_GRAY,
    );

    add_text(&layer, &font, &BuildInfo::current().footer(), Mm(margin_left), Mm(10.0), 8.0, COLOR_GRAY);

    add_chart_page(
        &doc,
        &font,
        &font_bold,
        "Net Calories vs. Expected Daily Calorie Change",
        ChartContent::from_series(report.calorie_series.is_empty(), "No calorie data to chart", || {
            generate_calorie_chart(&report.calorie_series, CHART_WIDTH, CHART_HEIGHT)
        }),
    )?;

    add_chart_page(
        &doc,
        &font,
        &font_bold,
        "Weight Over Time",
        ChartContent::from_series(report.weight_series.is_empty(), "No weight data to chart", || {
            generate_weight_chart(
                &report.weight_series,
                report.summary.weight_unit,
                CHART_WIDTH,
                CHART_HEIGHT,
            )
        }),
    )?;

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(output_path)?;
    let mut writer = BufWriter::new(file);
    doc.save(&mut writer).map_err(|e| Error::Report(e.to_string()))?;

    tracing::info!(path = %output_path.display(), "report written");
    Ok(())
}
