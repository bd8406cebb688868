//! Tests for TUI rendering.

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::style::{Color, Modifier};

    use sonar_core::testing::ScriptedTransport;
    use sonar_core::{Candidate, CoordinatorEvent};

    use crate::app::App;
    use crate::app::test_helpers::test_app;
    use crate::ui::{candidate_line, draw};

    /// Create a `TestBackend` + `Terminal` of the given size and draw the app once.
    fn draw_app(width: u16, height: u16, app: &mut App<ScriptedTransport>) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| draw(frame, app)).unwrap();
        terminal
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    fn with_dropdown(app: &mut App<ScriptedTransport>, typed: &str, candidates: Vec<Candidate>) {
        for c in typed.chars() {
            app.insert_char(c);
        }
        app.coordinator.handle_event(CoordinatorEvent::SuggestionsReady {
            token: typed.to_string(),
            candidates,
        });
    }

    #[tokio::test]
    async fn render_new_tab() {
        let (mut app, _nav) = test_app();
        let terminal = draw_app(80, 24, &mut app);
        let text = screen_text(&terminal);
        assert!(text.contains("Sonar | New Tab"));
        assert!(text.contains("sonar://new-tab"));
        assert!(app.popup_area.is_none());
    }

    #[tokio::test]
    async fn dropdown_lists_candidates_under_the_bar() {
        let (mut app, _nav) = test_app();
        with_dropdown(
            &mut app,
            "git",
            vec![
                Candidate::site("github.com", "GitHub"),
                Candidate::search("git tutorial"),
            ],
        );
        let terminal = draw_app(80, 24, &mut app);
        let text = screen_text(&terminal);

        assert!(text.contains("GitHub \u{2014} github.com"));
        assert!(text.contains("git tutorial"));
        let area = app.popup_area.unwrap();
        assert_eq!(area.y, 4);
        assert_eq!(area.height, 4);
    }

    #[tokio::test]
    async fn ghost_text_previews_the_top_candidate() {
        let (mut app, _nav) = test_app();
        with_dropdown(&mut app, "git", vec![Candidate::site("github.com", "GitHub")]);
        let terminal = draw_app(80, 24, &mut app);
        let text = screen_text(&terminal);
        assert!(text.contains("github.com"));
        let buffer = terminal.backend().buffer();
        // Row 2 is the bar's text row; "git" starts after the border.
        assert_eq!(buffer[(4, 2)].symbol(), "h");
        assert_eq!(buffer[(4, 2)].fg, Color::DarkGray);
    }

    #[tokio::test]
    async fn selection_is_reversed_and_previewed() {
        let (mut app, _nav) = test_app();
        with_dropdown(
            &mut app,
            "we",
            vec![Candidate::search("weather"), Candidate::search("web")],
        );
        app.press(sonar_core::NavKey::Down);
        let terminal = draw_app(80, 24, &mut app);
        let buffer = terminal.backend().buffer();
        // First dropdown row, first character after the border.
        assert!(buffer[(1, 5)].modifier.contains(Modifier::REVERSED));
        assert!(!buffer[(1, 6)].modifier.contains(Modifier::REVERSED));
        assert!(screen_text(&terminal).contains("\u{2502}weather"));
    }

    #[test]
    fn candidate_line_highlights_matches() {
        let candidate = Candidate::site("github.com", "GitHub");
        let line = candidate_line(&candidate, "git", false);
        let contents: Vec<&str> = line.spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(contents, vec!["\u{25c6} ", "Git", "Hub \u{2014} ", "git", "hub.com"]);
        assert_eq!(line.spans[1].style.fg, Some(Color::Yellow));
        assert_eq!(line.spans[2].style.fg, None);
    }

    #[test]
    fn candidate_line_marks_selection() {
        let candidate = Candidate::search("weather");
        let line = candidate_line(&candidate, "zz", true);
        assert!(
            line.spans
                .iter()
                .all(|s| s.style.add_modifier.contains(Modifier::REVERSED))
        );
    }
}
