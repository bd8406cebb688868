//! TUI rendering functions.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use unicode_width::UnicodeWidthStr;

use sonar_core::suggest::{SuggestionTransport, highlight_ranges};
use sonar_core::{Candidate, CandidateKind, CoordinatorState};

use super::ghost::ghost_text_spans;
use crate::app::App;

/// Draw the full UI.
pub fn draw<T: SuggestionTransport>(frame: &mut Frame<'_>, app: &mut App<T>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Header
            Constraint::Length(3), // Address bar
            Constraint::Min(3),    // Page
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_address_bar(frame, app, chunks[1]);
    draw_page(frame, app, chunks[2]);
    draw_status_bar(frame, app, chunks[3]);

    app.popup_area = draw_dropdown(frame, app, chunks[1], frame.area());
}

fn draw_header<T: SuggestionTransport>(frame: &mut Frame<'_>, app: &App<T>, area: Rect) {
    let mut spans = vec![
        Span::styled(
            "Sonar",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" | {}", app.current_page().title)),
    ];
    if app.coordinator.is_voice_active() {
        spans.push(Span::styled(
            " [recording]",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_address_bar<T: SuggestionTransport>(frame: &mut Frame<'_>, app: &App<T>, area: Rect) {
    let focused = app.coordinator.is_focused();
    let query = app.coordinator.query();

    // Preview the top candidate only while the user is typing, not browsing.
    let ghost = (focused
        && app.coordinator.state() == CoordinatorState::ShowingSuggestions
        && query.selected_index.is_none())
    .then(|| query.candidates.first().map(|c| c.navigation_text.as_str()))
    .flatten();

    let (title, border) = if app.coordinator.is_voice_active() {
        ("Address (voice)", Style::default().fg(Color::Red))
    } else if focused {
        ("Address", Style::default().fg(Color::Cyan))
    } else {
        ("Address", Style::default().fg(Color::DarkGray))
    };

    let bar = Paragraph::new(Line::from(ghost_text_spans(app.text(), ghost))).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(title),
    );
    frame.render_widget(bar, area);

    if focused {
        let before: String = app.text().chars().take(app.cursor_pos).collect();
        let col = u16::try_from(UnicodeWidthStr::width(before.as_str())).unwrap_or(u16::MAX);
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(col)
            .min(area.x.saturating_add(area.width.saturating_sub(2)));
        frame.set_cursor_position((cursor_x, area.y.saturating_add(1)));
    }
}

fn draw_page<T: SuggestionTransport>(frame: &mut Frame<'_>, app: &App<T>, area: Rect) {
    let page = app.current_page();
    let mut lines = vec![
        Line::from(Span::styled(
            page.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            page.url.clone(),
            Style::default().fg(Color::Blue),
        )),
        Line::raw(""),
    ];
    let earlier = app.history.iter().rev().skip(1);
    lines.extend(earlier.map(|visit| {
        Line::from(vec![
            Span::styled("  \u{2190} ", Style::default().fg(Color::DarkGray)),
            Span::raw(visit.url.clone()),
        ])
    }));

    let page = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Page"));
    frame.render_widget(page, area);
}

fn draw_status_bar<T: SuggestionTransport>(frame: &mut Frame<'_>, app: &App<T>, area: Rect) {
    let status = Paragraph::new(Line::from(vec![
        Span::styled(app.status.as_str(), Style::default().fg(Color::DarkGray)),
        Span::styled(
            " | Tab: focus | Ctrl+V: voice | Ctrl+C: quit",
            Style::default().fg(Color::DarkGray),
        ),
    ]));
    frame.render_widget(status, area);
}

/// Draw the dropdown under the address bar. Returns its area, or `None` when
/// there is nothing to show.
fn draw_dropdown<T: SuggestionTransport>(
    frame: &mut Frame<'_>,
    app: &App<T>,
    bar: Rect,
    screen: Rect,
) -> Option<Rect> {
    let query = app.coordinator.query();
    if query.candidates.is_empty() {
        return None;
    }

    let wanted = u16::try_from(query.candidates.len())
        .unwrap_or(u16::MAX)
        .saturating_add(2);
    let height = wanted.min(screen.bottom().saturating_sub(bar.bottom()));
    if height < 3 {
        return None;
    }
    let area = Rect::new(bar.x, bar.bottom(), bar.width, height);

    let lines: Vec<Line<'_>> = query
        .candidates
        .iter()
        .enumerate()
        .map(|(i, c)| candidate_line(c, &query.raw_text, query.selected_index == Some(i)))
        .collect();

    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        ),
        area,
    );
    Some(area)
}

/// One dropdown row: a kind marker, then the display text with the typed
/// query highlighted.
pub fn candidate_line<'a>(candidate: &'a Candidate, query: &str, selected: bool) -> Line<'a> {
    let base = if selected {
        Style::default().add_modifier(Modifier::REVERSED)
    } else {
        Style::default()
    };
    let (marker, color) = match candidate.kind {
        CandidateKind::Site => ("\u{25c6} ", Color::Green),
        CandidateKind::Search => ("\u{2315} ", Color::Blue),
    };

    let mut spans = vec![Span::styled(marker, base.fg(color))];
    let text = candidate.display_text.as_str();
    let mut last = 0;
    for range in highlight_ranges(text, query) {
        if range.start > last {
            spans.push(Span::styled(&text[last..range.start], base));
        }
        spans.push(Span::styled(
            &text[range.clone()],
            base.fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
        last = range.end;
    }
    if last < text.len() {
        spans.push(Span::styled(&text[last..], base));
    }
    Line::from(spans)
}
