// ============================================================================
// Écran Planos : les trois offres côte à côte
// ============================================================================
// CONCEPT RATATUI : Layout horizontal
// - Constraint::Ratio(1, 3) : trois colonnes de même largeur
// - La carte sélectionnée a une bordure épaisse
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, BorderType, Borders, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::models::{format_brl, Plan};
use crate::ui::layout::ACCENT;

pub fn render_plans(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "Escolha seu Plano",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Invista no seu futuro financeiro com planos que se adaptam às suas necessidades",
            Style::default().fg(Color::Gray),
        )),
    ])
    .alignment(Alignment::Center);
    frame.render_widget(title, chunks[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(chunks[1]);

    for (index, (plan, column)) in Plan::catalog().iter().zip(columns.iter()).enumerate() {
        render_card(frame, plan, index == app.selected_plan, *column);
    }
}

/// Dessine une carte de plan
fn render_card(frame: &mut Frame, plan: &Plan, selected: bool, area: Rect) {
    let (border_type, border_style) = if selected {
        (
            BorderType::Thick,
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )
    } else {
        (BorderType::Plain, Style::default().fg(Color::DarkGray))
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_type(border_type)
        .border_style(border_style)
        .title(format!(" {} ", plan.name))
        .title_alignment(Alignment::Center);
    if let Some(badge) = plan.badge {
        block = block.title(
            Title::from(Span::styled(
                format!(" {} ", badge),
                Style::default().fg(Color::Black).bg(Color::Yellow),
            ))
            .alignment(Alignment::Right),
        );
    }

    let mut text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format_brl(plan.price),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("/{}", plan.period), Style::default().fg(Color::Gray)),
        ]),
        Line::from(Span::styled(plan.description, Style::default().fg(Color::Gray))),
        Line::from(""),
    ];

    text.extend(plan.features.iter().map(|feature| {
        Line::from(vec![
            Span::styled("✓ ", Style::default().fg(Color::Green)),
            Span::raw(*feature),
        ])
    }));

    text.push(Line::from(""));
    let button_style = if selected {
        Style::default()
            .fg(Color::White)
            .bg(ACCENT)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ACCENT)
    };
    text.push(Line::from(Span::styled(" Comprar Agora ", button_style)));

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}
