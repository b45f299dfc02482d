// ============================================================================
// Dashboard - Rendu de l'interface principale
// ============================================================================
// Dessine l'interface TUI à partir d'un ViewSnapshot
//
// CONCEPTS RUST :
// 1. Fonctions pures : le rendu ne lit que le snapshot, il ne modifie rien
// 2. Pattern matching : un rendu par variant de LoadState
// 3. Builder pattern : construction fluide des widgets
//
// CONCEPTS RATATUI :
// 1. Frame : surface de dessin
// 2. Widgets : composants UI (Block, Paragraph, etc.)
// 3. Layout : découpage de l'espace en zones
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::{ErrorInfo, LoadState, ViewSnapshot};
use crate::models::{Catalog, MarketSnapshot, ProductInfo, Selection};
use crate::ui::chart;

/// Dessine l'interface complète
///
/// # Arguments
/// * `frame` - Surface de dessin ratatui
/// * `view` - Dernier snapshot publié par le contrôleur
/// * `catalog` - Catalogue (pour les libellés de la sélection)
pub fn render(frame: &mut Frame, view: &ViewSnapshot, catalog: &Catalog) {
    let chunks = create_layout(frame.size());

    render_header(frame, view, chunks[0]);
    render_selection(frame, &view.selection, catalog, chunks[1]);

    // CONCEPT RUST : Match sur enum pour router
    // - Le compilateur force à gérer tous les variants
    match &view.load_state {
        LoadState::Idle => render_message(frame, chunks[2], "Select a brand and a model to load market data", Color::Gray),
        LoadState::Loading => render_message(frame, chunks[2], "Loading market data...", Color::Yellow),
        LoadState::Loaded(snapshot) => render_market(frame, snapshot, chunks[2]),
        LoadState::Failed(error) => render_error(frame, error, chunks[2]),
    }

    render_footer(frame, chunks[3]);
}

/// Crée le layout principal (header, sélection, contenu, footer)
fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Sélection
            Constraint::Min(0),    // Contenu
            Constraint::Length(3), // Footer
        ])
        .split(area)
        .to_vec()
}

// ============================================================================
// Header et sélection
// ============================================================================

/// Dessine le header avec le titre et l'indicateur de chargement
fn render_header(frame: &mut Frame, view: &ViewSnapshot, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" SneakerWatch ")
        .title_alignment(Alignment::Center);

    let mut spans = vec![Span::styled(
        "Sneaker Price Predictor",
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    )];

    if view.load_state.is_loading() {
        spans.push(Span::styled("  ⟳ Loading", Style::default().fg(Color::Yellow)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Libellés lisibles d'une sélection (repli sur les identifiants)
pub fn selection_labels<'a>(selection: &'a Selection, catalog: &'a Catalog) -> (&'a str, &'a str) {
    let category = catalog.category(&selection.category);
    let category_label = category.map(|c| c.label.as_str()).unwrap_or(&selection.category);
    let item_label = category
        .and_then(|c| c.item(&selection.item))
        .map(|i| i.label.as_str())
        .unwrap_or(&selection.item);

    (category_label, item_label)
}

/// Dessine la sélection courante (marque / modèle)
fn render_selection(frame: &mut Frame, selection: &Selection, catalog: &Catalog, area: Rect) {
    let (brand, model) = selection_labels(selection, catalog);

    let line = Line::from(vec![
        Span::styled("Brand: ", Style::default().fg(Color::Gray)),
        Span::styled(brand, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
        Span::raw("    "),
        Span::styled("Model: ", Style::default().fg(Color::Gray)),
        Span::styled(model, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    ]);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Selection "),
    );

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Contenu : statistiques + graphique
// ============================================================================

/// Dessine la fiche produit, les cartes de statistiques et le graphique
fn render_market(frame: &mut Frame, snapshot: &MarketSnapshot, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    let product = snapshot
        .product
        .as_ref()
        .map(product_line)
        .unwrap_or_else(|| snapshot.display_name());
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(product, Style::default().fg(Color::Cyan))))
            .alignment(Alignment::Center),
        chunks[0],
    );

    render_stat_cards(frame, snapshot, chunks[1]);
    chart::render_price_chart(frame, snapshot, chunks[2]);
}

/// Résumé produit : nom, prix de vente conseillé, coloris connus
///
/// Ex : "Nike Dunk Low | Retail $110.00 | Panda (DD1391-100, 2021-03-10)"
pub fn product_line(product: &ProductInfo) -> String {
    let mut parts = vec![product.name.clone()];

    if let Some(base_price) = product.base_price {
        parts.push(format!("Retail {}", format_price(base_price)));
    }

    let variants: Vec<String> = product
        .variants
        .iter()
        .map(|v| match v.release_date {
            Some(date) => format!("{} ({}, {})", v.color, v.sku, date.format("%Y-%m-%d")),
            None => format!("{} ({})", v.color, v.sku),
        })
        .collect();
    if !variants.is_empty() {
        parts.push(variants.join(", "));
    }

    parts.join(" | ")
}

/// Les cinq cartes : prix actuel, variation 7j, variation 30j, plus haut, plus bas
fn render_stat_cards(frame: &mut Frame, snapshot: &MarketSnapshot, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 5); 5])
        .split(area);

    let stats = snapshot.statistics.as_ref();
    let values = [
        ("Current Price", stats.map(|s| format_price(s.current_price)), Color::White),
        ("7d Change", stats.map(|s| format_change(s.price_change_7d)), change_color(stats.and_then(|s| s.price_change_7d))),
        ("30d Change", stats.map(|s| format_change(s.price_change_30d)), change_color(stats.and_then(|s| s.price_change_30d))),
        ("Highest Price", stats.map(|s| format_price(s.highest_price)), Color::White),
        ("Lowest Price", stats.map(|s| format_price(s.lowest_price)), Color::White),
    ];

    for ((title, value, color), card) in values.into_iter().zip(cards.iter()) {
        let text = value.unwrap_or_else(|| "N/A".to_string());
        let paragraph = Paragraph::new(Line::from(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Gray))
                .title(format!(" {} ", title)),
        );

        frame.render_widget(paragraph, *card);
    }
}

/// Formate un prix : "$123.45"
pub fn format_price(price: f64) -> String {
    format!("${:.2}", price)
}

/// Formate une variation : "+5.00%", "-2.10%" ou "N/A"
pub fn format_change(change: Option<f64>) -> String {
    match change {
        Some(value) => format!("{:+.2}%", value),
        None => "N/A".to_string(),
    }
}

/// Vert si hausse, rouge si baisse
fn change_color(change: Option<f64>) -> Color {
    match change {
        Some(value) if value > 0.0 => Color::Green,
        Some(value) if value < 0.0 => Color::Red,
        _ => Color::White,
    }
}

// ============================================================================
// Messages et erreurs
// ============================================================================

/// Message centré (Idle, Loading)
fn render_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(message, Style::default().fg(color))),
    ];

    let paragraph = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Panneau d'erreur : message + invitation à rafraîchir
fn render_error(frame: &mut Frame, error: &ErrorInfo, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            error.message.as_str(),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled("Press 'r' to retry", Style::default().fg(Color::Gray))),
    ];

    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(" Error "),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Dessine le footer avec les raccourcis clavier
fn render_footer(frame: &mut Frame, area: Rect) {
    let keys = [
        ("Tab/b", "Brand"),
        ("←/→", "Model"),
        ("r", "Refresh"),
        ("q", "Quit"),
    ];

    let mut spans = Vec::new();
    for (i, (key, label)) in keys.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  |  "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)));
        spans.push(Span::raw(format!(" {}", label)));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)))
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

// ============================================================================
// Tests
// ============================================================================
