use std::path::Path;

use anyhow::{Context, Result};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::models::{ClientRecord, Status, SummaryStats};
use crate::report::{format_brl, format_months, percent, Dashboard};

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const COVER_HDR_H: f32 = 62.0;
const T_END: f32 = PAGE_W - MARGIN;

// ── Palette ───────────────────────────────────────────────────────────────────
type Rgb3 = (f32, f32, f32);

const BG: Rgb3 = (1.00, 1.00, 1.00);
const PANEL: Rgb3 = (1.00, 1.00, 1.00);
const PANEL_ALT: Rgb3 = (0.95, 0.96, 0.99);
const PANEL_BORDER: Rgb3 = (0.85, 0.87, 0.92);
const ACCENT_FROM: Rgb3 = (0.98, 0.64, 0.03); // #faa307
const ACCENT_TO: Rgb3 = (0.62, 0.01, 0.03); // #9d0208
const TEXT_PRI: Rgb3 = (0.07, 0.08, 0.14);
const TEXT_SEC: Rgb3 = (0.36, 0.40, 0.52);
const TEXT_MUT: Rgb3 = (0.58, 0.63, 0.72);
const WHITE: Rgb3 = (1.00, 1.00, 1.00);
const WHITE_DIM: Rgb3 = (1.00, 0.92, 0.82);

const R_BADGE: f32 = 1.5;

// ── Public entry point ────────────────────────────────────────────────────────

/// Render the dashboard as a PDF: overview page, then the client table.
pub fn render(dashboard: &Dashboard, records: &[ClientRecord], output_path: &Path) -> Result<()> {
    let doc = PdfDocument::empty("Client Dashboard");

    add_overview_page(&doc, dashboard)?;
    add_client_pages(&doc, records)?;

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    println!("PDF report written to: {}", output_path.display());
    Ok(())
}

// ── Overview page ─────────────────────────────────────────────────────────────

fn add_overview_page(doc: &PdfDocumentReference, dashboard: &Dashboard) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Overview");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;
    let stats = dashboard.stats;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    let hdr_bot = PAGE_H - COVER_HDR_H;
    fill_gradient_h(&layer, 0.0, hdr_bot, PAGE_W, COVER_HDR_H, ACCENT_FROM, ACCENT_TO, 28);

    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("client-pulse v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(PAGE_W - MARGIN - 40.0), Mm(PAGE_H - 10.5), &font_r,
    );
    set_color(&layer, WHITE);
    layer.use_text("Client Dashboard", 28.0, Mm(MARGIN), Mm(PAGE_H - 28.0), &font_b);
    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("Squad: {}", dashboard.squad),
        14.0, Mm(MARGIN), Mm(PAGE_H - 40.0), &font_b,
    );

    // Source chip
    let chip_y = hdr_bot - 18.0;
    let chip_h = 12.0f32;
    let chip_w = 80.0f32;
    fill_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL);
    stroke_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL_BORDER);
    fill_rect(&layer, MARGIN, chip_y, 2.5, chip_h, ACCENT_FROM);
    set_color(&layer, TEXT_MUT);
    layer.use_text("DATA SOURCE", 6.0, Mm(MARGIN + 5.0), Mm(chip_y + chip_h - 3.8), &font_b);
    set_color(&layer, TEXT_PRI);
    layer.use_text(dashboard.source.to_string(), 9.5, Mm(MARGIN + 5.0), Mm(chip_y + 2.8), &font_b);

    set_color(&layer, TEXT_SEC);
    layer.use_text(
        format!("Updated  {}", dashboard.generated_at),
        9.0, Mm(MARGIN), Mm(chip_y - 8.0), &font_r,
    );

    // Metric cards
    let rule_y = chip_y - 14.0;
    section_rule(&layer, rule_y, "OVERVIEW", &font_b);

    let card_y = rule_y - 34.0;
    let card_h = 24.0f32;
    let gap = 4.0f32;
    let card_w = (T_END - MARGIN - gap * 3.0) / 4.0;
    let cards: [(&str, String); 4] = [
        ("CLIENTS", stats.total_count.to_string()),
        ("TOTAL FEE", format_brl(stats.total_fee)),
        ("AVERAGE LT", format_months(stats.average_lifetime)),
        ("AVERAGE TICKET", format_brl(stats.average_ticket)),
    ];
    for (i, (label, value)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        draw_stat_card(&layer, cx, card_y, card_w, card_h, label, value, &font_r, &font_b);
    }

    let status_top = card_y - 10.0;
    section_rule(&layer, status_top, "CLIENT STATUS", &font_b);
    let squads_top = draw_status_rows(&layer, stats, status_top - 12.0, &font_r, &font_b);

    section_rule(&layer, squads_top, "METRICS BY SQUAD", &font_b);
    draw_squad_table(&layer, stats, squads_top - 12.0, &font_r, &font_b);

    draw_footer(&layer, &font_r);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_stat_card(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    label: &str,
    value: &str,
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) {
    fill_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL);
    stroke_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL_BORDER);
    fill_rect(layer, x, y + h - 2.0, w, 2.0, ACCENT_FROM);

    let size = if value.chars().count() > 12 { 10.5 } else { 15.0 };
    set_color(layer, TEXT_PRI);
    layer.use_text(value, size, Mm(x + 4.0), Mm(y + h * 0.40), font_b);

    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(x + 4.0), Mm(y + 3.5), font_r);
}

/// One row per status: badge, count, share and a proportional bar. Returns the y
/// coordinate just below the last row.
fn draw_status_rows(
    layer: &PdfLayerReference,
    stats: &SummaryStats,
    top: f32,
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) -> f32 {
    const ROW_H: f32 = 8.0;
    const BAR_X: f32 = MARGIN + 82.0;
    let bar_max = T_END - BAR_X;

    for (i, status) in Status::ALL.iter().enumerate() {
        let row_y = top - i as f32 * ROW_H;
        let count = stats.status_count(*status);
        let share = percent(count, stats.total_count);
        let (bg, fg) = status_palette(*status);

        fill_rounded_rect(layer, MARGIN, row_y - 1.5, 36.0, 5.5, R_BADGE, bg);
        set_color(layer, fg);
        layer.use_text(status.to_string(), 7.5, Mm(MARGIN + 2.5), Mm(row_y), font_b);

        set_color(layer, TEXT_PRI);
        layer.use_text(count.to_string(), 9.0, Mm(MARGIN + 44.0), Mm(row_y), font_b);
        set_color(layer, TEXT_SEC);
        layer.use_text(format!("{:.1}%", share), 8.0, Mm(MARGIN + 60.0), Mm(row_y), font_r);

        fill_rounded_rect(layer, BAR_X, row_y - 0.5, bar_max, 3.5, R_BADGE, PANEL_ALT);
        let width = bar_max * share as f32 / 100.0;
        if width > 0.0 {
            fill_rounded_rect(layer, BAR_X, row_y - 0.5, width, 3.5, R_BADGE, status_rgb(*status));
        }
    }

    top - Status::ALL.len() as f32 * ROW_H - 4.0
}

fn draw_squad_table(
    layer: &PdfLayerReference,
    stats: &SummaryStats,
    top: f32,
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) {
    const ROW_H: f32 = 6.5;
    const MAX_ROWS: usize = 10;
    let col_x = [MARGIN + 2.0, MARGIN + 56.0, MARGIN + 76.0, MARGIN + 112.0, MARGIN + 138.0];
    let headers = ["SQUAD", "CLIENTS", "FEE", "AVG LT", "TICKET"];

    set_color(layer, TEXT_MUT);
    for (x, h) in col_x.iter().zip(headers) {
        layer.use_text(h, 6.5, Mm(*x), Mm(top), font_b);
    }
    draw_hline(layer, MARGIN, T_END, top - 2.0, PANEL_BORDER);

    if stats.count_by_group.is_empty() {
        set_color(layer, TEXT_MUT);
        layer.use_text("No clients", 8.0, Mm(col_x[0]), Mm(top - 7.5), font_r);
        return;
    }

    for (i, (group, count)) in stats.count_by_group.iter().take(MAX_ROWS).enumerate() {
        let row_y = top - 7.5 - i as f32 * ROW_H;
        if i % 2 == 0 {
            fill_rect(layer, MARGIN, row_y - 1.5, T_END - MARGIN, ROW_H, PANEL_ALT);
        }
        let fee = stats.sum_fee_by_group.get(group).copied().unwrap_or(0.0);
        let lt = stats.avg_lifetime_by_group.get(group).copied().unwrap_or(0.0);
        let ticket = stats.avg_ticket_by_group.get(group).copied().unwrap_or(0.0);

        set_color(layer, TEXT_PRI);
        layer.use_text(truncate(group, 28), 8.0, Mm(col_x[0]), Mm(row_y), font_r);
        set_color(layer, TEXT_SEC);
        layer.use_text(count.to_string(), 8.0, Mm(col_x[1]), Mm(row_y), font_r);
        layer.use_text(format_brl(fee), 8.0, Mm(col_x[2]), Mm(row_y), font_r);
        layer.use_text(format_months(lt), 8.0, Mm(col_x[3]), Mm(row_y), font_r);
        layer.use_text(format_brl(ticket), 8.0, Mm(col_x[4]), Mm(row_y), font_r);
    }

    if stats.count_by_group.len() > MAX_ROWS {
        let more_y = top - 7.5 - MAX_ROWS as f32 * ROW_H;
        set_color(layer, TEXT_MUT);
        layer.use_text(
            format!("+ {} more…", stats.count_by_group.len() - MAX_ROWS),
            7.5, Mm(col_x[0]), Mm(more_y), font_r,
        );
    }
}

// ── Client table pages ────────────────────────────────────────────────────────

fn add_client_pages(doc: &PdfDocumentReference, records: &[ClientRecord]) -> Result<()> {
    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    const ROW_H: f32 = 7.0;
    const HDR_Y: f32 = 268.5;
    const FIRST_Y: f32 = 259.5;
    const BOT_MARGIN: f32 = 25.0;

    //  NAME       SQUAD      FEE        LT         STATUS
    //  18…76      76…116     116…148    148…160    160…192  (mm)
    let col_x = [MARGIN, MARGIN + 58.0, MARGIN + 98.0, MARGIN + 130.0, MARGIN + 146.0];
    let headers = ["NAME", "SQUAD", "FEE", "LT", "STATUS"];

    let mut cur_y = FIRST_Y;
    let mut layer: Option<PdfLayerReference> = None;
    let mut page_num: u32 = 0;

    for (row_idx, record) in records.iter().enumerate() {
        let page = match layer.take() {
            Some(current) if cur_y - ROW_H >= BOT_MARGIN => current,
            _ => {
                page_num += 1;
                let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Clients");
                let page = doc.get_page(pi).get_layer(li);

                fill_rect(&page, 0.0, 0.0, PAGE_W, PAGE_H, BG);
                fill_gradient_h(&page, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_FROM, ACCENT_TO, 21);

                set_color(&page, TEXT_PRI);
                layer_title(&page, "Clients", &font_b);
                set_color(&page, TEXT_MUT);
                page.use_text(
                    format!("Page {}", page_num),
                    8.0, Mm(PAGE_W - MARGIN - 14.0), Mm(283.0), &font_r,
                );
                draw_hline(&page, MARGIN, T_END, 277.5, PANEL_BORDER);

                fill_rounded_rect(&page, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL);
                stroke_rounded_rect(&page, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL_BORDER);
                set_color(&page, TEXT_MUT);
                for (x, h) in col_x.iter().zip(headers) {
                    page.use_text(h, 7.0, Mm(x + 1.5), Mm(HDR_Y - 4.0), &font_b);
                }

                draw_footer(&page, &font_r);
                cur_y = FIRST_Y;
                page
            }
        };

        if row_idx % 2 == 0 {
            fill_rect(&page, MARGIN, cur_y - ROW_H + 1.5, T_END - MARGIN, ROW_H, PANEL_ALT);
        }

        let text_y = cur_y - 4.0;
        set_color(&page, TEXT_PRI);
        page.use_text(truncate(&record.name, 32), 8.0, Mm(col_x[0] + 1.5), Mm(text_y), &font_r);
        set_color(&page, TEXT_SEC);
        page.use_text(truncate(&record.group, 22), 8.0, Mm(col_x[1] + 1.5), Mm(text_y), &font_r);
        page.use_text(format_brl(record.fee), 8.0, Mm(col_x[2] + 1.5), Mm(text_y), &font_r);
        page.use_text(
            format!("{:.1}", record.lifetime_months),
            8.0, Mm(col_x[3] + 1.5), Mm(text_y), &font_r,
        );

        let (bg, fg) = status_palette(record.status);
        let badge_x = col_x[4] + 1.5;
        let badge_y = cur_y - ROW_H + 2.2;
        fill_rounded_rect(&page, badge_x, badge_y, 27.0, 4.8, R_BADGE, bg);
        set_color(&page, fg);
        page.use_text(record.status.to_string(), 7.0, Mm(badge_x + 2.0), Mm(badge_y + 1.1), &font_b);

        draw_hline(&page, MARGIN, T_END, cur_y - ROW_H + 1.5, PANEL_BORDER);
        cur_y -= ROW_H;
        layer = Some(page);
    }

    Ok(())
}

fn layer_title(layer: &PdfLayerReference, title: &str, font_b: &IndirectFontRef) {
    layer.use_text(title, 14.0, Mm(MARGIN), Mm(282.5), font_b);
}

fn section_rule(layer: &PdfLayerReference, y: f32, label: &str, font_b: &IndirectFontRef) {
    draw_hline(layer, MARGIN, T_END, y, PANEL_BORDER);
    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(MARGIN), Mm(y - 6.5), font_b);
}

fn draw_footer(layer: &PdfLayerReference, font_r: &IndirectFontRef) {
    draw_hline(layer, MARGIN, T_END, 22.0, PANEL_BORDER);
    set_color(layer, TEXT_MUT);
    layer.use_text(
        format!("Generated by client-pulse v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), font_r,
    );
}

// ── Status colours ────────────────────────────────────────────────────────────

fn status_rgb(status: Status) -> Rgb3 {
    let (r, g, b) = status.rgb();
    (r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
}

/// Badge background (status colour washed towards white) and text colour (darkened).
fn status_palette(status: Status) -> (Rgb3, Rgb3) {
    let (r, g, b) = status_rgb(status);
    let wash = |c: f32| c + (1.0 - c) * 0.78;
    let dark = |c: f32| c * 0.55;
    ((wash(r), wash(g), wash(b)), (dark(r), dark(g), dark(b)))
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn rgb(color: Rgb3) -> Color {
    Color::Rgb(Rgb { r: color.0, g: color.1, b: color.2, icc_profile: None })
}

fn set_color(layer: &PdfLayerReference, color: Rgb3) {
    layer.set_fill_color(rgb(color));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: Rgb3) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y)), false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x), Mm(y + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

/// Clockwise ring approximating a rounded rectangle, 8 segments per corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    let r = r.min(w / 2.0).min(h / 2.0);
    const SEGS: usize = 8;
    let mut pts = Vec::with_capacity(4 * (SEGS + 1));

    let corners = [
        (x + w - r, y + r, 270.0f32, 360.0f32),
        (x + w - r, y + h - r, 0.0f32, 90.0f32),
        (x + r, y + h - r, 90.0f32, 180.0f32),
        (x + r, y + r, 180.0f32, 270.0f32),
    ];

    for (cx, cy, start, end) in &corners {
        for i in 0..=SEGS {
            let t = i as f32 / SEGS as f32;
            let angle = (start + (end - start) * t).to_radians();
            pts.push((Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())), false));
        }
    }
    pts
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb3) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, r: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.4);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Stroke,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, color: Rgb3) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![(Point::new(Mm(x1), Mm(y)), false), (Point::new(Mm(x2), Mm(y)), false)],
        is_closed: false,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    from: Rgb3,
    to: Rgb3,
    steps: usize,
) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        // Overlap strips slightly to prevent rounding gaps
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}…", chars[..max - 1].iter().collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::summarize;
    use crate::models::DataSource;

    fn record(name: &str, group: &str, status: Status) -> ClientRecord {
        ClientRecord {
            id: 1,
            name: name.to_string(),
            group: group.to_string(),
            fee: 2500.0,
            lifetime_months: 6.0,
            status,
        }
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Templários", 20), "Templários");
        assert_eq!(truncate("Supermercado Bom Preço", 10), "Supermerc…");
    }

    #[test]
    fn test_status_palette_is_lighter_and_darker() {
        let (bg, fg) = status_palette(Status::Danger);
        let base = status_rgb(Status::Danger);
        assert!(bg.1 > base.1);
        assert!(fg.0 < base.0);
    }

    #[test]
    fn test_render_writes_pdf() {
        let records: Vec<ClientRecord> = (0..60)
            .map(|i| {
                let status = Status::ALL[i % Status::ALL.len()];
                let group = if i % 2 == 0 { "Templários" } else { "Spartans" };
                record(&format!("Cliente {}", i + 1), group, status)
            })
            .collect();
        let stats = summarize(&records);
        let dashboard = Dashboard {
            source: DataSource::Demo,
            squad: "todos",
            generated_at: "2026-01-01 09:00".to_string(),
            stats: &stats,
        };

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.pdf");
        render(&dashboard, &records, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
