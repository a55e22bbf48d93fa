use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::element::Pie;
use plotters::prelude::*;

use crate::models::{Status, SummaryStats};
use crate::report::format_brl;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 600;

const BAR_COLORS: [RGBColor; 4] = [
    RGBColor(0xFA, 0xA3, 0x07),
    RGBColor(0x9D, 0x02, 0x08),
    RGBColor(0x3A, 0x86, 0xFF),
    RGBColor(0x2A, 0x9D, 0x8F),
];

/// Write a PNG with the status pie (left) and fee-by-squad bars (right).
pub fn render(stats: &SummaryStats, output_path: &Path) -> Result<()> {
    let root = BitMapBackend::new(output_path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;

    let (left, right) = root.split_horizontally((WIDTH / 2) as i32);
    draw_status_pie(&left, stats)?;
    draw_fee_bars(&right, stats)?;

    root.present()?;
    println!("Chart written to: {}", output_path.display());
    Ok(())
}

fn draw_status_pie(area: &DrawingArea<BitMapBackend, Shift>, stats: &SummaryStats) -> Result<()> {
    let area = area.titled("Client status", ("sans-serif", 28))?;

    let slices: Vec<(Status, f64)> = Status::ALL
        .iter()
        .map(|s| (*s, stats.status_count(*s) as f64))
        .filter(|(_, count)| *count > 0.0)
        .collect();

    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);

    if slices.is_empty() {
        draw_placeholder(&area, center)?;
        return Ok(());
    }

    let radius = f64::from(w.min(h)) * 0.32;
    let sizes: Vec<f64> = slices.iter().map(|(_, count)| *count).collect();
    let colors: Vec<RGBColor> = slices
        .iter()
        .map(|(status, _)| {
            let (r, g, b) = status.rgb();
            RGBColor(r, g, b)
        })
        .collect();
    let labels: Vec<String> = slices.iter().map(|(status, _)| status.to_string()).collect();

    let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    pie.start_angle(-90.0);
    pie.label_style(("sans-serif", 18).into_font().color(&BLACK));
    pie.percentages(("sans-serif", 16).into_font().color(&WHITE));
    area.draw(&pie)?;

    Ok(())
}

fn draw_fee_bars(area: &DrawingArea<BitMapBackend, Shift>, stats: &SummaryStats) -> Result<()> {
    let groups: Vec<(&str, f64)> = stats
        .sum_fee_by_group
        .iter()
        .map(|(g, fee)| (g.as_str(), *fee))
        .collect();

    if groups.is_empty() {
        let (w, h) = area.dim_in_pixel();
        draw_placeholder(area, (w as i32 / 2, h as i32 / 2))?;
        return Ok(());
    }

    let max_fee = groups.iter().map(|(_, fee)| *fee).fold(0.0, f64::max).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption("Fee by squad", ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(120)
        .build_cartesian_2d((0..groups.len()).into_segmented(), 0.0..max_fee * 1.15)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => groups
                .get(*i)
                .map(|(g, _)| g.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .y_label_formatter(&|v| format_brl(*v))
        .draw()?;

    chart.draw_series(groups.iter().enumerate().map(|(i, (_, fee))| {
        let color = BAR_COLORS[i % BAR_COLORS.len()];
        let mut bar = Rectangle::new(
            [(SegmentValue::Exact(i), 0.0), (SegmentValue::Exact(i + 1), *fee)],
            color.filled(),
        );
        bar.set_margin(0, 0, 15, 15);
        bar
    }))?;

    Ok(())
}

fn draw_placeholder(area: &DrawingArea<BitMapBackend, Shift>, center: (i32, i32)) -> Result<()> {
    area.draw_text(
        "No clients",
        &("sans-serif", 22).into_font().color(&BLACK),
        (center.0 - 50, center.1),
    )?;
    Ok(())
}
