// ============================================================================
// Layout commun : header (onglets) + contenu + footer (raccourcis)
// ============================================================================
// CONCEPTS RATATUI :
// 1. Layout : découpage vertical header / contenu / footer
// 2. Tabs : onglets du header, l'actif en surbrillance
// 3. Line + Span : plusieurs couleurs sur une même ligne
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, Screen, StatusKind};

/// Couleur principale (le bleu de la marque)
pub const ACCENT: Color = Color::Blue;

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠹", "⠸"];

/// Crée le layout principal (header, content, footer)
pub fn create_layout(area: Rect) -> Vec<Rect> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header : 3 lignes
            Constraint::Min(0),    // Content : tout le reste
            Constraint::Length(3), // Footer : 3 lignes
        ])
        .split(area)
        .to_vec()
}

/// Style d'une touche dans le footer : "[Enter]"
pub fn key_span(key: &str) -> Span<'static> {
    Span::styled(
        format!("[{}]", key),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    )
}

/// Bloc avec bordure et titre, style commun à tous les écrans
pub fn titled_block(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(format!(" {} ", title))
}

/// Ligne "Label : valeur" d'un formulaire
///
/// Le champ qui a le focus est en gras avec un curseur ▏.
pub fn field_line(label: &str, value: &str, placeholder: &str, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let marker = if focused { "▶ " } else { "  " };

    let value_span = if value.is_empty() && !focused {
        Span::styled(placeholder.to_string(), Style::default().fg(Color::DarkGray))
    } else {
        Span::styled(value.to_string(), Style::default().fg(Color::White))
    };

    let mut spans = vec![
        Span::styled(marker, label_style),
        Span::styled(format!("{:<18}", label), label_style),
        value_span,
    ];
    if focused {
        spans.push(Span::styled(
            "▏",
            Style::default().fg(Color::White).add_modifier(Modifier::SLOW_BLINK),
        ));
    }
    Line::from(spans)
}

// ============================================================================
// Header : Marque + onglets
// ============================================================================

/// Dessine le header : "MyFinance" et les onglets Home / Planos / Teste Grátis
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = Screen::TABS
        .iter()
        .enumerate()
        .map(|(i, screen)| Line::from(format!("F{} {}", i + 1, screen.title())))
        .collect();

    // Le Checkout n'a pas d'onglet : aucun onglet sélectionné
    let selected = Screen::TABS.iter().position(|s| *s == app.current_screen);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT))
        .title(Span::styled(
            " MyFinance ",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        ))
        .title_alignment(Alignment::Left);

    let mut tabs = Tabs::new(titles)
        .block(block)
        .style(Style::default().fg(Color::Gray))
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD),
        )
        .divider("│");
    if let Some(index) = selected {
        tabs = tabs.select(index);
    } else {
        tabs = tabs.highlight_style(Style::default().fg(Color::Gray));
    }

    frame.render_widget(tabs, area);
}

// ============================================================================
// Footer : statut, chargement, confirmation de quit, raccourcis
// ============================================================================

/// Dessine le footer
///
/// Priorité d'affichage :
/// 1. Confirmation de quit
/// 2. Chargement en cours (spinner)
/// 3. Message de statut
/// 4. Raccourcis de l'écran courant
pub fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(ACCENT));

    let line = if app.is_awaiting_quit_confirmation() {
        Line::from(vec![
            Span::styled(
                "⚠  Appuyez sur ",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "[q]",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD)
                    .add_modifier(Modifier::SLOW_BLINK),
            ),
            Span::styled(
                " à nouveau pour quitter, ou n'importe quelle autre touche pour annuler ⚠",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
        ])
    } else if app.is_loading {
        let frame_index = (app.tick_count % SPINNER.len() as u64) as usize;
        Line::from(vec![
            Span::styled(
                format!("{} ", SPINNER[frame_index]),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                app.loading_message
                    .clone()
                    .unwrap_or_else(|| "Processando...".to_string()),
                Style::default().fg(Color::White),
            ),
        ])
    } else if let Some(status) = &app.status {
        let (icon, color) = match status.kind {
            StatusKind::Info => ("ℹ", Color::Cyan),
            StatusKind::Success => ("✓", Color::Green),
            StatusKind::Error => ("✗", Color::Red),
        };
        Line::from(Span::styled(
            format!("{} {}", icon, status.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
    } else {
        shortcuts(app)
    };

    let paragraph = Paragraph::new(vec![line])
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Raccourcis propres à chaque écran
fn shortcuts(app: &App) -> Line<'static> {
    let quit = if app.is_typing() { "Ctrl+C" } else { "q" };
    let mut spans = vec![key_span(quit), Span::raw(" Sair  "), key_span("F1-F3"), Span::raw(" Navegar  ")];

    let specific: Vec<(&str, &str)> = match app.current_screen {
        Screen::Home => vec![("Enter", "Teste Grátis"), ("p", "Ver Planos")],
        Screen::Plans => vec![("← →", "Escolher"), ("Enter", "Comprar Agora")],
        Screen::Ledger => vec![
            ("Tab", "Campo"),
            ("← →", "Opções"),
            ("Enter", "Adicionar"),
            ("↑ ↓", "Rolar"),
        ],
        Screen::Checkout => vec![("Tab", "Campo"), ("Enter", "Continuar"), ("Esc", "Voltar")],
    };
    for (key, label) in specific {
        spans.push(key_span(key));
        spans.push(Span::raw(format!(" {}  ", label)));
    }
    Line::from(spans)
}
