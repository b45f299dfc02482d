// ============================================================================
// Chart - Graphique historique + prédiction
// ============================================================================
// Affiche la série composée : deux datasets sur un même axe de dates
//
// CONCEPTS RATATUI :
// 1. Chart widget : graphique ligne
// 2. Dataset : une sous-série (historique / prédiction)
// 3. Axis : l'axe X est en jours depuis la première date de la série
// ============================================================================

use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph},
    Frame,
};

use crate::models::{DisplaySeries, MarketSnapshot, Provenance};

/// Points (x, y) d'une sous-série, x = jours depuis `origin`
///
/// CONCEPT RUST : Iterator chaining
/// - filtre la sous-série, puis convertit chaque date en offset
pub fn series_points(series: &DisplaySeries, provenance: Provenance, origin: NaiveDate) -> Vec<(f64, f64)> {
    series
        .sub_series(provenance)
        .map(|p| ((p.date - origin).num_days() as f64, p.price))
        .collect()
}

/// Dessine le graphique du snapshot
pub fn render_price_chart(frame: &mut Frame, snapshot: &MarketSnapshot, area: Rect) {
    let series = &snapshot.series;

    let (Some(origin), Some(end), Some((min_price, max_price))) =
        (series.first_date(), series.last_date(), series.price_bounds())
    else {
        render_no_data(frame, area, "No price data for this selection");
        return;
    };

    let historical = series_points(series, Provenance::Historical, origin);
    let predicted = series_points(series, Provenance::Predicted, origin);

    // Marge de 5% pour que le graphique respire
    let margin = ((max_price - min_price) * 0.05).max(1.0);
    let y_min = (min_price - margin).max(0.0);
    let y_max = max_price + margin;
    let x_max = ((end - origin).num_days() as f64).max(1.0);

    let datasets = vec![
        Dataset::default()
            .name(Provenance::Historical.label())
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Blue))
            .data(&historical),
        Dataset::default()
            .name(Provenance::Predicted.label())
            .marker(symbols::Marker::Dot)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Color::Green))
            .data(&predicted),
    ];

    let mid = origin + chrono::Duration::days((x_max / 2.0) as i64);
    let x_axis = Axis::default()
        .title("Date")
        .style(Style::default().fg(Color::Gray))
        .bounds([0.0, x_max])
        .labels(vec![
            Span::raw(origin.format("%Y-%m-%d").to_string()),
            Span::raw(mid.format("%Y-%m-%d").to_string()),
            Span::raw(end.format("%Y-%m-%d").to_string()),
        ]);

    let y_axis = Axis::default()
        .title("Price ($)")
        .style(Style::default().fg(Color::Gray))
        .bounds([y_min, y_max])
        .labels(vec![
            Span::raw(format!("${:.0}", y_min)),
            Span::raw(format!("${:.0}", (y_min + y_max) / 2.0)),
            Span::raw(format!("${:.0}", y_max)),
        ]);

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(format!(" Price History & Prediction - {} ", snapshot.display_name())),
        )
        .x_axis(x_axis)
        .y_axis(y_axis);

    frame.render_widget(chart, area);
}

/// Affiche un message quand il n'y a pas de données à afficher
fn render_no_data(frame: &mut Frame, area: Rect, message: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Gray))
        .title(" Price History & Prediction ");

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================
