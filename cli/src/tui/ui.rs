use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use escoba_core::api::{LineKind, PhaseTransition, RenderedLine, SessionPhase};

use super::app::{Focus, TuiApp};

pub fn draw(f: &mut Frame<'_>, app: &TuiApp) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(f.area());

    draw_header(f, chunks[0], app);
    draw_main(f, chunks[1], app);
    draw_footer(f, chunks[2], app);
}

fn draw_header(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let run_id = app
        .run_id
        .as_deref()
        .map(|id| id.get(..8).unwrap_or(id))
        .unwrap_or("-");
    let elapsed = app
        .panels
        .elapsed_secs
        .map(format_duration)
        .unwrap_or_else(|| "--:--".to_string());
    let phase_style = match app.phase {
        SessionPhase::Idle => Style::default().fg(Color::Green),
        SessionPhase::Requesting => Style::default().fg(Color::Yellow),
        SessionPhase::Replaying => Style::default().fg(Color::Cyan),
        SessionPhase::Failed => Style::default().fg(Color::Red),
    };

    let mut parts = vec![
        Span::styled("Escoba Arena", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("  Run: "),
        Span::styled(run_id.to_string(), Style::default().fg(Color::Gray)),
        Span::raw("  Phase: "),
        Span::styled(PhaseTransition::phase_description(app.phase), phase_style),
        Span::raw("  Elapsed: "),
        Span::styled(elapsed, Style::default().fg(Color::Gray)),
    ];
    if let Some(status) = &app.status {
        parts.push(Span::raw("  "));
        parts.push(Span::styled(status.clone(), Style::default().fg(Color::Gray)));
    }

    let header = Paragraph::new(Line::from(parts)).block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(header, area);
}

fn draw_main(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(38), Constraint::Percentage(62)])
        .split(area);

    draw_form(f, columns[0], app);

    let score_height = app
        .panels
        .final_scores
        .as_ref()
        .map(|s| s.len() as u16 + 2)
        .unwrap_or(3);
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(score_height),
        ])
        .split(columns[1]);

    draw_log(f, rows[0], app);
    draw_table(f, rows[1], app);
    draw_players(f, rows[2], app);
    draw_scores(f, rows[3], app);
}

fn draw_form(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let focused = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let normal = Style::default();

    let mut lines = vec![Line::from(vec![
        Span::raw("Players: "),
        Span::styled(
            format!("< {} >", app.players),
            if app.focus == Focus::Players {
                focused
            } else {
                normal
            },
        ),
    ])];
    lines.push(Line::from(""));

    for row in app.form.rows() {
        let style = if app.focus == Focus::Row(row.index()) {
            focused
        } else {
            normal
        };
        lines.push(Line::from(vec![
            Span::raw(format!("{}: ", row.label())),
            Span::styled(row.selected_value().to_string(), style),
        ]));
        if row.override_visible() {
            let editing = app.editing && app.focus == Focus::Row(row.index());
            let text = if row.override_text().is_empty() && !editing {
                format!("(default: {})", app.form.default_model())
            } else {
                row.override_text().to_string()
            };
            let mut override_line = vec![Span::raw("    model: "), Span::styled(text, style)];
            if editing {
                override_line.push(Span::styled("_", Style::default().fg(Color::Yellow)));
            }
            lines.push(Line::from(override_line));
        }
    }

    lines.push(Line::from(""));
    let start_style = if app.panels.start_enabled {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    lines.push(Line::from(Span::styled("[Enter] Start Simulation", start_style)));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Setup"))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

fn draw_log(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let lines: Vec<Line> = app.panels.log.iter().map(log_line).collect();
    let visible = area.height.saturating_sub(2) as usize;
    let offset = lines.len().saturating_sub(visible) as u16;
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Game Log"))
        .wrap(Wrap { trim: false })
        .scroll((offset, 0));
    f.render_widget(widget, area);
}

fn log_line(line: &RenderedLine) -> Line<'_> {
    let style = match line.kind {
        LineKind::Narrative => Style::default().fg(Color::Cyan),
        LineKind::Action => Style::default(),
        LineKind::ActionError | LineKind::Failure => Style::default().fg(Color::Red),
        LineKind::Unknown => Style::default().fg(Color::DarkGray),
    };
    Line::from(Span::styled(line.text.as_str(), style))
}

fn draw_table(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let cards: Vec<Span> = app
        .panels
        .table
        .iter()
        .flat_map(|card| {
            [
                Span::styled(format!("[{card}]"), Style::default().fg(Color::Yellow)),
                Span::raw(" "),
            ]
        })
        .collect();
    let widget = Paragraph::new(Line::from(cards))
        .block(Block::default().borders(Borders::ALL).title("Table"));
    f.render_widget(widget, area);
}

fn draw_players(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let names: Vec<String> = app
        .panels
        .players
        .iter()
        .map(|p| format!("{} ({})", p.label(), p.name))
        .collect();
    let widget = Paragraph::new(names.join("   "))
        .block(Block::default().borders(Borders::ALL).title("Players"));
    f.render_widget(widget, area);
}

fn draw_scores(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let lines: Vec<Line> = match &app.panels.final_scores {
        Some(scores) => {
            let leaders = scores.leaders();
            scores
                .iter()
                .map(|entry| {
                    let style = if leaders.contains(&entry.player.as_str()) {
                        Style::default().add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    Line::from(Span::styled(
                        format!("{}: {}", entry.player, entry.display_score()),
                        style,
                    ))
                })
                .collect()
        }
        None => Vec::new(),
    };
    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Final Scores"));
    f.render_widget(widget, area);
}

fn draw_footer(f: &mut Frame<'_>, area: Rect, app: &TuiApp) {
    let hint = if app.editing {
        "type model id  Backspace: delete  Enter/Esc: done"
    } else {
        "j/k: move  h/l or \u{2190}/\u{2192}: change  +/-: players  e: edit custom  Enter: start  Esc: quit"
    };
    let widget = Paragraph::new(Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Cyan)),
        Span::styled(hint, Style::default().fg(Color::Gray)),
    ]))
    .block(Block::default().borders(Borders::TOP))
    .alignment(Alignment::Left);
    f.render_widget(widget, area);
}

fn format_duration(secs: u64) -> String {
    let m = secs / 60;
    let s = secs % 60;
    format!("{m:02}:{s:02}")
}
