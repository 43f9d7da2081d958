use crate::api::{priority_display, ChargerSourcePriority, OutputSourcePriority};
use crate::panel::notification::NotificationLevel;
use crate::panel::{ControlId, ModalLayout, PanelLayout, PanelState};

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

const MODAL_WIDTH: u16 = 56;
const MODAL_HEIGHT: u16 = 9;

/// Render one frame and report where everything landed, so mouse events can
/// be mapped back to controls.
pub fn draw(frame: &mut Frame, state: &PanelState, gateway_url: &str) -> PanelLayout {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header
            Constraint::Min(11),   // body
            Constraint::Length(1), // notification
            Constraint::Length(1), // help
        ])
        .split(area);

    draw_header(frame, rows[0], gateway_url);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(38), Constraint::Min(30)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(5), Constraint::Length(4)])
        .split(columns[0]);

    draw_selector(frame, left[0], state);
    draw_current_settings(frame, left[1], state);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // output priorities
            Constraint::Length(6), // charger priorities
            Constraint::Length(3), // max charge current
            Constraint::Min(0),
        ])
        .split(columns[1]);

    let mut controls = Vec::new();
    draw_output_controls(frame, right[0], state, &mut controls);
    draw_charger_controls(frame, right[1], state, &mut controls);
    let input = draw_charge_input(frame, right[2], state);

    draw_notification(frame, rows[2], state);
    draw_help(frame, rows[3], state);

    let modal = draw_modal(frame, area, state);

    PanelLayout {
        selector: left[0],
        controls,
        input,
        modal,
    }
}

fn draw_header(frame: &mut Frame, area: Rect, gateway_url: &str) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Axpert Control Panel ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let line = Line::from(vec![
        Span::styled("gateway: ", Style::default().fg(Color::DarkGray)),
        Span::styled(gateway_url, Style::default().fg(Color::Cyan)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

fn draw_selector(frame: &mut Frame, area: Rect, state: &PanelState) {
    let title = if state.selector_placeholder().is_none() && state.selected().is_none() {
        " Select an inverter... "
    } else {
        " Inverters "
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if let Some(placeholder) = state.selector_placeholder() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                placeholder,
                Style::default().fg(Color::DarkGray),
            )),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = state
        .inverters()
        .iter()
        .enumerate()
        .skip(state.scroll())
        .take(inner.height as usize)
        .map(|(index, inverter)| {
            let selected = state.selected() == Some(index);
            let prefix = if selected { "> " } else { "  " };
            let style = if selected {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let mut spans = vec![Span::styled(
                format!("{}{}", prefix, inverter.serialno),
                style,
            )];
            if let Some(model) = &inverter.model {
                spans.push(Span::styled(
                    format!("  {}", model),
                    Style::default().fg(Color::DarkGray),
                ));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_current_settings(frame: &mut Frame, area: Rect, state: &PanelState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Current Settings ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match state.selected_settings() {
        Some(settings) => vec![
            Line::from(format!(
                "Output:  {}",
                priority_display(&settings.output_source_priority)
            )),
            Line::from(format!(
                "Charger: {}",
                priority_display(&settings.charger_source_priority)
            )),
        ],
        None => {
            let message = if state.selected_serial().is_some() {
                "Not collected yet"
            } else {
                "No inverter selected"
            };
            vec![Line::from(Span::styled(
                message,
                Style::default().fg(Color::DarkGray),
            ))]
        }
    };

    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_output_controls(
    frame: &mut Frame,
    area: Rect,
    state: &PanelState,
    controls: &mut Vec<(ControlId, Rect)>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Output Source Priority ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for (i, value) in OutputSourcePriority::all().iter().enumerate() {
        let control = ControlId::Output(*value);
        lines.push(control_line(
            i + 1,
            value.display_name(),
            state.is_active(control),
            state.busy(),
        ));
        if (i as u16) < inner.height {
            controls.push((control, Rect::new(inner.x, inner.y + i as u16, inner.width, 1)));
        }
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_charger_controls(
    frame: &mut Frame,
    area: Rect,
    state: &PanelState,
    controls: &mut Vec<(ControlId, Rect)>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Charger Source Priority ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = Vec::new();
    for (i, value) in ChargerSourcePriority::all().iter().enumerate() {
        let control = ControlId::Charger(*value);
        lines.push(control_line(
            i + 4,
            value.display_name(),
            state.is_active(control),
            state.busy(),
        ));
        if (i as u16) < inner.height {
            controls.push((control, Rect::new(inner.x, inner.y + i as u16, inner.width, 1)));
        }
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn control_line(hotkey: usize, name: &str, active: bool, busy: bool) -> Line<'static> {
    let marker = if active { "* " } else { "  " };
    let style = if busy {
        Style::default().fg(Color::DarkGray)
    } else if active {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(format!("[{}] ", hotkey), Style::default().fg(Color::Yellow)),
        Span::styled(format!("{}{}", marker, name), style),
    ])
}

fn draw_charge_input(frame: &mut Frame, area: Rect, state: &PanelState) -> Rect {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Max Charge Current [c] ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let caret = if state.editing() { "_" } else { "" };
    let hint = if state.editing() {
        "  Enter apply, Esc cancel"
    } else {
        "  press c to edit"
    };

    let line = Line::from(vec![
        Span::styled(
            format!("{}{} A", state.input(), caret),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::styled(hint, Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);

    inner
}

fn draw_notification(frame: &mut Frame, area: Rect, state: &PanelState) {
    let Some(notification) = state.notification() else {
        return;
    };

    let style = match notification.level() {
        NotificationLevel::Success => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        NotificationLevel::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    };
    frame.render_widget(
        Paragraph::new(Span::styled(notification.message(), style)),
        area,
    );
}

fn draw_help(frame: &mut Frame, area: Rect, state: &PanelState) {
    let text = if state.busy() {
        "Working..."
    } else if state.modal().is_some() {
        "y/Enter: confirm | n/Esc: cancel"
    } else if state.editing() {
        "digits: edit | Enter: apply | Esc: cancel"
    } else {
        "j/k: select | 1-3: output | 4-7: charger | c: charge current | r: reload | q: quit"
    };

    frame.render_widget(
        Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))),
        area,
    );
}

fn draw_modal(frame: &mut Frame, area: Rect, state: &PanelState) -> Option<ModalLayout> {
    let modal = state.modal()?;
    let command = modal.command();

    let width = MODAL_WIDTH.min(area.width);
    let height = MODAL_HEIGHT.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let popup = Rect::new(x, y, width, height);

    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Confirm Command ");
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let body = vec![
        Line::from(format!("Inverter: {}", command.serialno())),
        Line::from(format!("Command:  {}", command.display_name())),
        Line::from(format!("Value:    {}", command.value_display())),
        Line::default(),
        Line::from(Span::styled(
            "This will change your inverter settings immediately.",
            Style::default().fg(Color::Yellow),
        )),
    ];
    frame.render_widget(Paragraph::new(body), inner);

    // bottom row carries the two click targets, one per half
    let buttons = Rect::new(
        inner.x,
        inner.y + inner.height.saturating_sub(1),
        inner.width,
        1,
    );
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(buttons);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "[Y] Confirm",
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        halves[0],
    );
    frame.render_widget(
        Paragraph::new(Span::styled(
            "[N] Cancel",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
        halves[1],
    );

    Some(ModalLayout {
        area: popup,
        confirm: halves[0],
        cancel: halves[1],
    })
}
