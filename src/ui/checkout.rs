// ============================================================================
// Écran Checkout : progression + formulaire de l'étape + résumé
// ============================================================================
// CONCEPTS RATATUI :
// 1. Gauge : barre de progression (33%, 66%, 100%)
// 2. Layout imbriqué : vertical (progression / corps) puis horizontal
//    (formulaire / résumé de commande)
// ============================================================================

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, ConfirmationChoice};
use crate::models::{format_brl, format_card_number, CheckoutField, CheckoutSession, CheckoutStep};
use crate::ui::layout::{field_line, titled_block, ACCENT};

const STEPS: [CheckoutStep; 3] = [
    CheckoutStep::Personal,
    CheckoutStep::Payment,
    CheckoutStep::Confirmation,
];

pub fn render_checkout(frame: &mut Frame, app: &App, area: Rect) {
    // Sans session, la navigation a déjà redirigé vers Planos
    let Some(session) = &app.checkout else {
        let paragraph = Paragraph::new("Nenhum plano selecionado")
            .block(titled_block("Finalizar Compra"))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);

    render_progress(frame, session, rows[0]);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(40), Constraint::Length(34)])
        .split(rows[1]);

    match session.step() {
        CheckoutStep::Personal | CheckoutStep::Payment => {
            render_step_form(frame, app, session, columns[0])
        }
        CheckoutStep::Confirmation => render_confirmation(frame, app, session, columns[0]),
    }
    render_summary(frame, session, columns[1]);
}

// ============================================================================
// Progression
// ============================================================================

fn render_progress(frame: &mut Frame, session: &CheckoutSession, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(3)])
        .split(area);

    let current = session.step();
    let labels: Vec<Span> = STEPS
        .iter()
        .flat_map(|step| {
            let style = if step.number() <= current.number() {
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            [
                Span::styled(format!("{}. {}", step.number(), step.label()), style),
                Span::raw("      "),
            ]
        })
        .collect();
    frame.render_widget(
        Paragraph::new(Line::from(labels)).alignment(Alignment::Center),
        chunks[0],
    );

    let gauge = Gauge::default()
        .block(titled_block("Finalizar Compra"))
        .gauge_style(Style::default().fg(ACCENT).bg(Color::Black))
        .percent(session.progress_percent())
        .label(format!("Etapa {} de 3", current.number()));
    frame.render_widget(gauge, chunks[1]);
}

// ============================================================================
// Étapes 1 et 2 : formulaires
// ============================================================================

fn render_step_form(frame: &mut Frame, app: &App, session: &CheckoutSession, area: Rect) {
    let step = session.step();
    let focused = app.focused_checkout_field();

    let mut lines = vec![Line::from("")];
    for field in step.fields() {
        if *field == CheckoutField::Cep {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "  Endereço (opcional, preenchido pelo CEP)",
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )));
        }

        let raw = session.field(*field);
        let value = if *field == CheckoutField::CardNumber {
            format_card_number(raw)
        } else {
            raw.to_string()
        };
        let label = if field.is_required() {
            format!("{} *", field.label())
        } else {
            field.label().to_string()
        };
        lines.push(field_line(&label, &value, field.placeholder(), focused == Some(*field)));
    }

    lines.push(Line::from(""));
    let action = match step {
        CheckoutStep::Personal => "[Enter] Continuar para Pagamento".to_string(),
        _ if session.is_processing() => "Processando...".to_string(),
        _ => format!("[Esc] Voltar    [Enter] Pagar {}", format_brl(session.plan.total())),
    };
    lines.push(Line::from(Span::styled(
        format!("  {}", action),
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )));

    let paragraph = Paragraph::new(lines).block(titled_block(step.label()));
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Étape 3 : confirmation
// ============================================================================

fn render_confirmation(frame: &mut Frame, app: &App, session: &CheckoutSession, area: Rect) {
    let button = |choice: ConfirmationChoice, label: &str| {
        let style = if app.confirmation_choice == choice {
            Style::default()
                .fg(Color::White)
                .bg(ACCENT)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(ACCENT)
        };
        Span::styled(format!(" {} ", label), style)
    };

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            "✓",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "Parabéns! Compra Realizada",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("Seu "),
            Span::styled(session.plan.name, Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(" foi ativado com sucesso!"),
        ]),
        Line::from(vec![
            Span::raw("Valor: "),
            Span::styled(
                format_brl(session.plan.total()),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            button(ConfirmationChoice::Account, "Acessar Minha Conta"),
            Span::raw("   "),
            button(ConfirmationChoice::Home, "Voltar para Home"),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(titled_block(CheckoutStep::Confirmation.label()))
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}

// ============================================================================
// Résumé de commande
// ============================================================================

fn render_summary(frame: &mut Frame, session: &CheckoutSession, area: Rect) {
    let plan = &session.plan;
    let price = format!("{}/{}", format_brl(plan.price), plan.period);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            plan.name,
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(plan.description, Style::default().fg(Color::Gray))),
        Line::from(""),
        Line::from(vec![
            Span::styled("Preço   ", Style::default().fg(Color::Gray)),
            Span::raw(price),
        ]),
        Line::from("──────────────────────────"),
        Line::from(vec![
            Span::styled("Total   ", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format_brl(plan.total()),
                Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            ),
        ]),
    ];

    let paragraph = Paragraph::new(text)
        .block(titled_block("Resumo do Pedido"))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
