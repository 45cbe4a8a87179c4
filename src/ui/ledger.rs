// ============================================================================
// Écran Lançamentos : formulaire + totaux + liste
// ============================================================================
// Découpage :
// ┌ Novo Lançamento ┐┌ Entradas ┐┌ Saídas ┐┌ Saldo ┐
// │ formulaire      │└──────────┘└────────┘└───────┘
// │                 │┌ Lançamentos ─────────────────┐
// └─────────────────┘│ liste (plus récent en haut)  │
//                    └──────────────────────────────┘
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, LedgerField};
use crate::models::{format_brl, EntryKind, LedgerEntry, Totals};
use crate::ui::layout::{field_line, titled_block, ACCENT};

pub fn render_ledger(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(48), Constraint::Min(30)])
        .split(area);

    render_form(frame, app, columns[0]);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(columns[1]);

    render_totals(frame, &app.ledger.totals(), right[0]);
    render_entries(frame, app, right[1]);
}

// ============================================================================
// Formulaire
// ============================================================================

fn render_form(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.entry_form;

    let mut lines = vec![Line::from("")];
    for field in LedgerField::ALL {
        let focused = app.ledger_field == field;
        let line = match field {
            LedgerField::Date => field_line(field.label(), &form.date, "aaaa-mm-dd", focused),
            LedgerField::Description => {
                field_line(field.label(), &form.description, "Ex: Supermercado", focused)
            }
            LedgerField::Category => {
                let value = if form.category.is_empty() {
                    String::new()
                } else {
                    format!("◀ {} ▶", form.category)
                };
                field_line(field.label(), &value, "◀ Selecione ▶", focused)
            }
            LedgerField::Amount => field_line(field.label(), &form.amount, "0,00", focused),
            LedgerField::Kind => kind_line(form.kind, focused),
        };
        lines.push(line);
        lines.push(Line::from(""));
    }

    lines.push(Line::from(Span::styled(
        "  [Enter] Adicionar Lançamento",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )));

    let paragraph = Paragraph::new(lines).block(titled_block("Novo Lançamento"));
    frame.render_widget(paragraph, area);
}

/// Boutons radio Entrada / Saída
fn kind_line(kind: EntryKind, focused: bool) -> Line<'static> {
    let label_style = if focused {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let radio = |option: EntryKind| {
        let (mark, color) = if option == kind {
            ("(●) ", kind_color(option))
        } else {
            ("( ) ", Color::DarkGray)
        };
        Span::styled(format!("{}{}  ", mark, option.label()), Style::default().fg(color))
    };

    Line::from(vec![
        Span::styled(if focused { "▶ " } else { "  " }, label_style),
        Span::styled(format!("{:<18}", LedgerField::Kind.label()), label_style),
        radio(EntryKind::Entrada),
        radio(EntryKind::Saida),
    ])
}

fn kind_color(kind: EntryKind) -> Color {
    match kind {
        EntryKind::Entrada => Color::Green,
        EntryKind::Saida => Color::Red,
    }
}

// ============================================================================
// Totaux
// ============================================================================

fn render_totals(frame: &mut Frame, totals: &Totals, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

    let balance_color = if totals.is_positive() {
        Color::Green
    } else {
        Color::Red
    };

    let values = [
        ("Entradas", totals.total_in, Color::Green),
        ("Saídas", totals.total_out, Color::Red),
        ("Saldo", totals.balance, balance_color),
    ];

    for ((title, value, color), card) in values.into_iter().zip(cards.iter()) {
        let paragraph = Paragraph::new(Line::from(Span::styled(
            format_brl(value),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(titled_block(title))
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, *card);
    }
}

// ============================================================================
// Liste des lançamentos
// ============================================================================

fn render_entries(frame: &mut Frame, app: &App, area: Rect) {
    let block = titled_block(&format!("Lançamentos ({})", app.ledger.len()));

    if app.ledger.is_empty() {
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "Nenhum lançamento cadastrado",
                Style::default().fg(Color::Gray),
            )),
        ])
        .block(block)
        .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = app
        .ledger
        .entries()
        .iter()
        .skip(app.ledger_offset)
        .map(entry_item)
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

/// Une ligne : date, description, catégorie, montant signé
fn entry_item(entry: &LedgerEntry) -> ListItem<'static> {
    let color = kind_color(entry.kind);
    ListItem::new(Line::from(vec![
        Span::styled(
            format!(" {}  ", entry.display_date()),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(
            format!("{:<24}", entry.description),
            Style::default().fg(Color::White),
        ),
        Span::styled(
            format!("{:<14}", entry.category.label()),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("{} {}", entry.kind.sign(), format_brl(entry.amount)),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
    ]))
}
