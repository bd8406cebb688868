//! Input handling for TUI key and mouse events.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use sonar_core::NavKey;
use sonar_core::suggest::SuggestionTransport;

use super::TermEvent;
use crate::app::App;

/// Process a terminal event, updating app state.
pub fn handle_term_event<T: SuggestionTransport>(app: &mut App<T>, event: TermEvent) {
    match event {
        TermEvent::Key(key) => handle_key(app, key),
        TermEvent::Mouse(mouse) => handle_mouse(app, mouse),
        TermEvent::Resize(_, _) => { /* terminal auto-handles resize on next draw */ }
    }
}

fn handle_key<T: SuggestionTransport>(app: &mut App<T>, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') => app.should_quit = true,
            KeyCode::Char('v') => app.toggle_voice(),
            _ => {}
        }
        return;
    }
    if key.code == KeyCode::Tab {
        app.toggle_focus();
        return;
    }
    // An unfocused address bar receives no keystrokes.
    if !app.coordinator.is_focused() {
        return;
    }

    match key.code {
        KeyCode::Up => app.press(NavKey::Up),
        KeyCode::Down => app.press(NavKey::Down),
        KeyCode::Enter => app.press(NavKey::Enter),
        KeyCode::Esc => app.press(NavKey::Escape),
        KeyCode::Char(c) => app.insert_char(c),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete(),
        KeyCode::Left => app.move_left(),
        KeyCode::Right => app.move_right(),
        KeyCode::Home => app.move_home(),
        KeyCode::End => app.move_end(),
        _ => {}
    }
}

fn handle_mouse<T: SuggestionTransport>(app: &mut App<T>, mouse: MouseEvent) {
    let Some(index) = app.candidate_at(mouse.column, mouse.row) else {
        return;
    };
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.click_candidate(index),
        MouseEventKind::Moved => app.hover_candidate(index),
        _ => {}
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ratatui::layout::Rect;

    use sonar_core::testing::ScriptedTransport;
    use sonar_core::{Candidate, CoordinatorEvent, CoordinatorState};

    use super::*;
    use crate::app::test_helpers::test_app;

    fn key(code: KeyCode) -> TermEvent {
        TermEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn ctrl(c: char) -> TermEvent {
        TermEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> TermEvent {
        TermEvent::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn type_text(app: &mut App<ScriptedTransport>, text: &str) {
        for c in text.chars() {
            handle_term_event(app, key(KeyCode::Char(c)));
        }
    }

    fn show(app: &mut App<ScriptedTransport>, texts: &[&str]) {
        let token = app.coordinator.query().raw_text.clone();
        app.coordinator.handle_event(CoordinatorEvent::SuggestionsReady {
            token,
            candidates: texts.iter().map(|t| Candidate::search(t)).collect(),
        });
        app.popup_area = Some(Rect::new(0, 4, 40, 2 + u16::try_from(texts.len()).unwrap()));
    }

    #[tokio::test]
    async fn ctrl_c_quits() {
        let (mut app, _nav) = test_app();
        handle_term_event(&mut app, ctrl('c'));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn typing_edits_the_bar() {
        let (mut app, _nav) = test_app();
        type_text(&mut app, "wex");
        handle_term_event(&mut app, key(KeyCode::Backspace));
        assert_eq!(app.text(), "we");
        assert_eq!(app.coordinator.state(), CoordinatorState::Debouncing);
    }

    #[tokio::test]
    async fn enter_commits_to_the_navigator() {
        let (mut app, mut nav) = test_app();
        type_text(&mut app, "rust book");
        handle_term_event(&mut app, key(KeyCode::Enter));
        assert_eq!(nav.try_recv().unwrap(), "rust book");
    }

    #[tokio::test]
    async fn arrows_preview_and_move_cursor_to_end() {
        let (mut app, _nav) = test_app();
        type_text(&mut app, "we");
        show(&mut app, &["weather", "web"]);
        handle_term_event(&mut app, key(KeyCode::Down));
        handle_term_event(&mut app, key(KeyCode::Down));
        assert_eq!(app.text(), "web");
        assert_eq!(app.cursor_pos, 3);
    }

    #[tokio::test]
    async fn tab_blurs_and_blocks_typing() {
        let (mut app, _nav) = test_app();
        handle_term_event(&mut app, key(KeyCode::Tab));
        assert!(!app.coordinator.is_focused());
        type_text(&mut app, "ab");
        assert_eq!(app.text(), "");

        handle_term_event(&mut app, key(KeyCode::Tab));
        assert!(app.coordinator.is_focused());
    }

    #[tokio::test]
    async fn ctrl_v_toggles_voice() {
        let (mut app, _nav) = test_app();
        handle_term_event(&mut app, ctrl('v'));
        assert!(app.coordinator.is_voice_active());
        assert_eq!(app.status, "Listening...");
        handle_term_event(&mut app, ctrl('v'));
        assert!(!app.coordinator.is_voice_active());
    }

    #[tokio::test]
    async fn mouse_hover_selects_and_click_commits() {
        let (mut app, mut nav) = test_app();
        type_text(&mut app, "we");
        show(&mut app, &["weather", "web"]);

        handle_term_event(&mut app, mouse(MouseEventKind::Moved, 5, 6));
        assert_eq!(app.coordinator.query().selected_index, Some(1));
        assert_eq!(app.text(), "we");

        handle_term_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 5));
        assert_eq!(nav.try_recv().unwrap(), "weather");
        assert_eq!(app.coordinator.state(), CoordinatorState::Idle);
    }

    #[tokio::test]
    async fn clicks_outside_the_dropdown_are_ignored() {
        let (mut app, mut nav) = test_app();
        type_text(&mut app, "we");
        show(&mut app, &["weather"]);
        handle_term_event(&mut app, mouse(MouseEventKind::Down(MouseButton::Left), 5, 1));
        assert!(nav.try_recv().is_err());
    }
}
