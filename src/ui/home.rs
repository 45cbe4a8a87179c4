// ============================================================================
// Écran Home : présentation du produit
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::ui::layout::{key_span, titled_block, ACCENT};

/// Témoignages affichés sous l'accroche : (nom, métier, résultat)
const TESTIMONIALS: [(&str, &str, &str); 3] = [
    ("Liews Ramilton", "Consultor de Vendas", "+40% em investimentos"),
    ("Oscar Piastri", "Corretor Imobiliário", "Primeiro imóvel adquirido"),
    ("Lando Norris", "Advogado", "Aposentadoria antecipada"),
];

pub fn render_home(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(9), Constraint::Length(7)])
        .split(area);

    render_hero(frame, app, chunks[0]);
    render_testimonials(frame, chunks[1]);
}

fn render_hero(frame: &mut Frame, app: &App, area: Rect) {
    let entries = app.ledger.len();

    let mut text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "Controle suas ",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "finanças",
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                " de forma inteligente",
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "Descubra como é ter controle total sobre seu dinheiro. Com o MyFinance, \
             você finalmente entende para onde seu dinheiro está indo.",
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(vec![
            key_span("Enter"),
            Span::raw(" Teste Grátis    "),
            key_span("p"),
            Span::raw(" Ver Planos"),
        ]),
    ];

    if entries > 0 {
        text.push(Line::from(""));
        text.push(Line::from(Span::styled(
            format!("{} lançamento(s) salvos neste computador", entries),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(text)
        .block(titled_block("MyFinance"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_testimonials(frame: &mut Frame, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    for ((name, role, achievement), column) in TESTIMONIALS.iter().zip(columns.iter()) {
        let text = vec![
            Line::from(Span::styled(
                *name,
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(*role, Style::default().fg(ACCENT))),
            Line::from(""),
            Line::from(Span::styled(
                format!("✓ {}", achievement),
                Style::default().fg(Color::Green),
            )),
        ];
        let paragraph = Paragraph::new(text)
            .block(titled_block("Depoimento"))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, *column);
    }
}
