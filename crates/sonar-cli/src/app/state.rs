//! Application state and types.

use ratatui::layout::Rect;

use sonar_core::suggest::{HttpTransport, SuggestionTransport};
use sonar_core::{InputCoordinator, NavKey, NavigationTarget, Resolver};

/// A page loaded in the (simulated) tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageVisit {
    pub url: String,
    pub title: String,
}

/// TUI application state.
pub struct App<T = HttpTransport> {
    pub coordinator: InputCoordinator<T>,
    pub resolver: Resolver,
    /// Cursor position in the address bar, in characters.
    pub cursor_pos: usize,
    /// Loaded pages, oldest first. Never empty.
    pub history: Vec<PageVisit>,
    pub status: String,
    pub should_quit: bool,
    /// Screen area of the dropdown (set each frame by the renderer).
    pub popup_area: Option<Rect>,
}

impl<T: SuggestionTransport> App<T> {
    /// Start on the new-tab page with a focused, empty address bar.
    pub fn new(mut coordinator: InputCoordinator<T>, resolver: Resolver) -> Self {
        let home = PageVisit {
            url: resolver.home_url().to_string(),
            title: "New Tab".to_string(),
        };
        coordinator.set_current_page(&home.url, &home.title);
        Self {
            coordinator,
            resolver,
            cursor_pos: 0,
            history: vec![home],
            status: "Ready".to_string(),
            should_quit: false,
            popup_area: None,
        }
    }

    /// Text shown in the address bar.
    pub fn text(&self) -> &str {
        self.coordinator.display_text()
    }

    pub fn current_page(&self) -> &PageVisit {
        // `history` starts with the home page and only grows.
        &self.history[self.history.len() - 1]
    }

    pub fn insert_char(&mut self, c: char) {
        let mut text = self.text().to_string();
        let at = byte_offset(&text, self.cursor_pos);
        text.insert(at, c);
        self.cursor_pos += 1;
        self.coordinator.on_input(&text);
    }

    pub fn backspace(&mut self) {
        if self.cursor_pos == 0 {
            return;
        }
        let mut text = self.text().to_string();
        self.cursor_pos -= 1;
        let at = byte_offset(&text, self.cursor_pos);
        text.remove(at);
        self.coordinator.on_input(&text);
    }

    pub fn delete(&mut self) {
        let mut text = self.text().to_string();
        if self.cursor_pos >= text.chars().count() {
            return;
        }
        let at = byte_offset(&text, self.cursor_pos);
        text.remove(at);
        self.coordinator.on_input(&text);
    }

    pub fn move_left(&mut self) {
        self.cursor_pos = self.cursor_pos.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        self.cursor_pos = (self.cursor_pos + 1).min(self.text().chars().count());
    }

    pub fn move_home(&mut self) {
        self.cursor_pos = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_pos = self.text().chars().count();
    }

    /// Forward a navigation key; the field text may be replaced, so the
    /// cursor moves to its end.
    pub fn press(&mut self, key: NavKey) {
        self.coordinator.on_key(key);
        self.move_end();
    }

    pub fn toggle_focus(&mut self) {
        if self.coordinator.is_focused() {
            self.coordinator.on_blur();
        } else {
            self.coordinator.on_focus();
        }
        self.move_end();
    }

    pub fn toggle_voice(&mut self) {
        self.coordinator.toggle_voice();
        self.status = if self.coordinator.is_voice_active() {
            "Listening...".to_string()
        } else {
            "Ready".to_string()
        };
    }

    pub fn click_candidate(&mut self, index: usize) {
        self.coordinator.on_candidate_clicked(index);
        self.move_end();
    }

    pub fn hover_candidate(&mut self, index: usize) {
        self.coordinator.on_candidate_hovered(index);
    }

    /// Dropdown row under the screen cell (`column`, `row`), if any.
    pub fn candidate_at(&self, column: u16, row: u16) -> Option<usize> {
        let area = self.popup_area?;
        let inside = column > area.x
            && column < area.right().saturating_sub(1)
            && row > area.y
            && row < area.bottom().saturating_sub(1);
        if !inside {
            return None;
        }
        let index = usize::from(row - area.y - 1);
        (index < self.coordinator.query().candidates.len()).then_some(index)
    }

    /// Load committed address-bar text as the current page.
    pub fn open(&mut self, committed: &str) {
        let target = self.resolver.resolve(committed);
        let title = self.page_title(&target);
        let url = target.url().to_string();
        self.coordinator.set_current_page(&url, &title);
        self.status = format!("Loaded {url}");
        self.history.push(PageVisit { url, title });
    }

    fn page_title(&self, target: &NavigationTarget) -> String {
        match target {
            NavigationTarget::Internal(url) if self.resolver.is_home(url) => "New Tab".to_string(),
            NavigationTarget::Internal(url) => url.clone(),
            NavigationTarget::Search { query, .. } => format!("{query} - Search"),
            NavigationTarget::Url(url) => {
                let host = url
                    .split_once("://")
                    .map_or(url.as_str(), |(_, rest)| rest)
                    .split('/')
                    .next()
                    .unwrap_or_default();
                self.coordinator
                    .aggregator()
                    .local()
                    .data()
                    .find_site(host)
                    .map_or_else(|| host.to_string(), |site| site.title.clone())
            }
        }
    }
}

/// Byte index of the `chars`-th character of `text`, or its length.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices().nth(chars).map_or(text.len(), |(i, _)| i)
}
