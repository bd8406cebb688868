//! Address-bar input coordination.
//!
//! [`InputCoordinator`] owns the query state and decides when to ask the
//! [`SuggestionAggregator`] for candidates, which candidate is selected, and
//! what gets committed to the [`Navigator`].
//!
//! It never blocks. Timers and fetches run as spawned tasks that post a
//! [`CoordinatorEvent`] back over an unbounded channel; whoever drives the
//! coordinator feeds those events to [`InputCoordinator::handle_event`].
//! Every event carries either a timer generation or the query text it was
//! issued for, so events that lost their meaning in the meantime are dropped.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::config::SuggestionConfig;
use crate::navigation::url_bar_display;
use crate::suggest::remote::{HttpTransport, SuggestionTransport};
use crate::suggest::{Candidate, SuggestionAggregator, char_len};

/// Receives committed address-bar text.
pub trait Navigator {
    fn navigate(&mut self, text: &str);
}

impl Navigator for mpsc::UnboundedSender<String> {
    fn navigate(&mut self, text: &str) {
        // A closed receiver means the browser is shutting down.
        let _ = self.send(text.to_string());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinatorState {
    /// No dropdown and nothing scheduled.
    Idle,
    /// Waiting for typing to pause, or for the suggestions of the last pause.
    Debouncing,
    /// The dropdown is open.
    ShowingSuggestions,
    /// Dictation owns the field; no suggestions are fetched.
    VoiceActive,
}

/// Keys the coordinator reacts to besides text edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Enter,
    Escape,
}

/// Text being typed and the dropdown built for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    /// What the user typed, independent of any arrow-key preview.
    pub raw_text: String,
    /// `None` or a valid index into `candidates`.
    pub selected_index: Option<usize>,
    pub candidates: Vec<Candidate>,
}

impl QueryState {
    pub fn selected(&self) -> Option<&Candidate> {
        self.selected_index.and_then(|i| self.candidates.get(i))
    }

    fn clear_candidates(&mut self) {
        self.candidates.clear();
        self.selected_index = None;
    }
}

/// Posted back to the coordinator by its own timers and fetches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    DebounceElapsed { generation: u64 },
    SuggestionsReady { token: String, candidates: Vec<Candidate> },
    BlurElapsed { generation: u64 },
    VoiceCapElapsed { generation: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorTimings {
    pub debounce: Duration,
    pub blur_delay: Duration,
    pub voice_cap: Duration,
}

impl CoordinatorTimings {
    pub const fn from_config(config: &SuggestionConfig) -> Self {
        Self {
            debounce: config.debounce(),
            blur_delay: config.blur_delay(),
            voice_cap: config.voice_cap(),
        }
    }
}

impl Default for CoordinatorTimings {
    fn default() -> Self {
        Self::from_config(&SuggestionConfig::default())
    }
}

/// The page currently loaded, used to restore the address bar on blur.
#[derive(Debug, Clone, Default)]
struct CurrentPage {
    url: String,
    title: String,
}

pub struct InputCoordinator<T = HttpTransport> {
    aggregator: Arc<SuggestionAggregator<T>>,
    navigator: Box<dyn Navigator + Send>,
    events: mpsc::UnboundedSender<CoordinatorEvent>,
    timings: CoordinatorTimings,

    state: CoordinatorState,
    query: QueryState,
    /// What the address bar shows; differs from `raw_text` while previewing a
    /// candidate or after a blur revert.
    display: String,
    focused: bool,
    page: CurrentPage,

    debounce_generation: u64,
    blur_generation: u64,
    voice_generation: u64,
    /// Whether anything was committed since focus was last lost.
    committed_since_blur: bool,
    /// Whether the display holds the `"domain / title"` form.
    reverted: bool,
}

impl<T: SuggestionTransport> InputCoordinator<T> {
    /// Create a focused, idle coordinator and the receiver its timers and
    /// fetches report to.
    pub fn new(
        aggregator: Arc<SuggestionAggregator<T>>,
        navigator: Box<dyn Navigator + Send>,
        timings: CoordinatorTimings,
    ) -> (Self, mpsc::UnboundedReceiver<CoordinatorEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let coordinator = Self {
            aggregator,
            navigator,
            events,
            timings,
            state: CoordinatorState::Idle,
            query: QueryState::default(),
            display: String::new(),
            focused: true,
            page: CurrentPage::default(),
            debounce_generation: 0,
            blur_generation: 0,
            voice_generation: 0,
            committed_since_blur: false,
            reverted: false,
        };
        (coordinator, rx)
    }

    pub const fn state(&self) -> CoordinatorState {
        self.state
    }

    pub const fn query(&self) -> &QueryState {
        &self.query
    }

    /// Text the address bar shows.
    pub fn display_text(&self) -> &str {
        &self.display
    }

    pub const fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_voice_active(&self) -> bool {
        self.state == CoordinatorState::VoiceActive
    }

    pub fn aggregator(&self) -> &SuggestionAggregator<T> {
        &self.aggregator
    }

    /// Record the page that is now loaded. Used for the blur display.
    pub fn set_current_page(&mut self, url: &str, title: &str) {
        self.page = CurrentPage {
            url: url.to_string(),
            title: title.to_string(),
        };
        if self.reverted {
            self.display = url_bar_display(url, title);
        }
    }

    /// The field's text changed to `text`.
    pub fn on_input(&mut self, text: &str) {
        self.query.raw_text = text.to_string();
        self.display = text.to_string();
        self.reverted = false;

        if self.state == CoordinatorState::VoiceActive {
            return;
        }

        self.debounce_generation += 1;
        if char_len(text) < self.aggregator.min_query_chars() {
            self.state = CoordinatorState::Idle;
            self.query.clear_candidates();
            return;
        }

        self.state = CoordinatorState::Debouncing;
        self.query.selected_index = None;
        self.schedule(
            self.timings.debounce,
            CoordinatorEvent::DebounceElapsed {
                generation: self.debounce_generation,
            },
        );
    }

    pub fn on_key(&mut self, key: NavKey) {
        match key {
            NavKey::Down => self.move_selection(true),
            NavKey::Up => self.move_selection(false),
            NavKey::Enter => {
                let text = self
                    .query
                    .selected()
                    .map_or_else(|| self.query.raw_text.clone(), |c| c.navigation_text.clone());
                self.finish();
                self.commit(&text);
            }
            NavKey::Escape => {
                self.finish();
                self.display = self.query.raw_text.clone();
            }
        }
    }

    /// The renderer reports a click on candidate `index`.
    pub fn on_candidate_clicked(&mut self, index: usize) {
        let Some(candidate) = self.query.candidates.get(index) else {
            return;
        };
        let text = candidate.navigation_text.clone();
        self.finish();
        self.commit(&text);
    }

    /// The renderer reports the pointer over candidate `index`. Selects it
    /// without previewing it in the field.
    pub fn on_candidate_hovered(&mut self, index: usize) {
        if self.state == CoordinatorState::ShowingSuggestions && index < self.query.candidates.len()
        {
            self.query.selected_index = Some(index);
        }
    }

    pub fn on_focus(&mut self) {
        self.focused = true;
        self.blur_generation += 1;
        if self.reverted {
            self.reverted = false;
            let url = if self.page.url.starts_with("sonar://new-tab") {
                String::new()
            } else {
                self.page.url.clone()
            };
            self.query.raw_text.clone_from(&url);
            self.display = url;
        }
    }

    /// Focus left the field. The dropdown stays open briefly so a click on it
    /// can still land.
    pub fn on_blur(&mut self) {
        self.focused = false;
        self.committed_since_blur = false;
        self.blur_generation += 1;
        self.schedule(
            self.timings.blur_delay,
            CoordinatorEvent::BlurElapsed {
                generation: self.blur_generation,
            },
        );
    }

    /// Start dictation, or stop it if it is running.
    pub fn toggle_voice(&mut self) {
        self.voice_generation += 1;
        if self.state == CoordinatorState::VoiceActive {
            info!("Voice input stopped");
            self.state = CoordinatorState::Idle;
            return;
        }

        info!("Voice input started");
        self.debounce_generation += 1;
        self.query.clear_candidates();
        self.state = CoordinatorState::VoiceActive;
        self.schedule(
            self.timings.voice_cap,
            CoordinatorEvent::VoiceCapElapsed {
                generation: self.voice_generation,
            },
        );
    }

    pub fn handle_event(&mut self, event: CoordinatorEvent) {
        match event {
            CoordinatorEvent::DebounceElapsed { generation } => {
                if generation != self.debounce_generation
                    || self.state != CoordinatorState::Debouncing
                {
                    return;
                }
                if char_len(&self.query.raw_text) < self.aggregator.min_query_chars() {
                    self.state = CoordinatorState::Idle;
                    self.query.clear_candidates();
                    return;
                }
                self.spawn_fetch(self.query.raw_text.clone());
            }
            CoordinatorEvent::SuggestionsReady { token, candidates } => {
                let listening = matches!(
                    self.state,
                    CoordinatorState::Debouncing | CoordinatorState::ShowingSuggestions
                );
                if !listening || token != self.query.raw_text {
                    debug!(query = %token, "Dropping stale suggestions");
                    return;
                }
                self.query.selected_index = None;
                if candidates.is_empty() {
                    self.state = CoordinatorState::Idle;
                    self.query.candidates.clear();
                } else {
                    self.state = CoordinatorState::ShowingSuggestions;
                    self.query.candidates = candidates;
                }
            }
            CoordinatorEvent::BlurElapsed { generation } => {
                if generation != self.blur_generation || self.focused {
                    return;
                }
                self.debounce_generation += 1;
                self.query.clear_candidates();
                if self.state != CoordinatorState::VoiceActive {
                    self.state = CoordinatorState::Idle;
                }
                if !self.committed_since_blur {
                    self.display = url_bar_display(&self.page.url, &self.page.title);
                    self.reverted = true;
                }
            }
            CoordinatorEvent::VoiceCapElapsed { generation } => {
                if generation == self.voice_generation
                    && self.state == CoordinatorState::VoiceActive
                {
                    info!(
                        cap_ms = self.timings.voice_cap.as_millis(),
                        "Voice input reached its time limit"
                    );
                    self.state = CoordinatorState::Idle;
                }
            }
        }
    }

    /// Arrow keys cycle through the dropdown and preview the selection.
    fn move_selection(&mut self, down: bool) {
        if self.state != CoordinatorState::ShowingSuggestions {
            return;
        }
        let len = self.query.candidates.len();
        if len == 0 {
            return;
        }
        let next = match (self.query.selected_index, down) {
            (Some(i), true) if i < len => (i + 1) % len,
            (Some(i), false) if i < len => (i + len - 1) % len,
            (_, true) => 0,
            (_, false) => len - 1,
        };
        self.query.selected_index = Some(next);
        self.display.clone_from(&self.query.candidates[next].navigation_text);
    }

    /// Close the dropdown and invalidate anything still scheduled for it.
    fn finish(&mut self) {
        if self.state == CoordinatorState::VoiceActive {
            self.voice_generation += 1;
        }
        self.state = CoordinatorState::Idle;
        self.debounce_generation += 1;
        self.query.clear_candidates();
    }

    fn commit(&mut self, text: &str) {
        if text.trim().is_empty() {
            return;
        }
        info!(text, "Committing address bar");
        self.query.raw_text = text.to_string();
        self.display = text.to_string();
        self.reverted = false;
        self.committed_since_blur = true;
        self.navigator.navigate(text);
    }

    fn spawn_fetch(&self, token: String) {
        let aggregator = Arc::clone(&self.aggregator);
        let events = self.events.clone();
        debug!(query = %token, generation = self.debounce_generation, "Fetching suggestions");
        tokio::spawn(async move {
            let candidates = aggregator.get_suggestions(&token).await;
            let _ = events.send(CoordinatorEvent::SuggestionsReady { token, candidates });
        });
    }

    fn schedule(&self, delay: Duration, event: CoordinatorEvent) {
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(event);
        });
    }
}

impl<T> std::fmt::Debug for InputCoordinator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputCoordinator")
            .field("state", &self.state)
            .field("query", &self.query)
            .field("display", &self.display)
            .field("focused", &self.focused)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::suggest::{LocalIndex, ReferenceData, RemoteSuggestionClient, SiteEntry};
    use crate::testing::ScriptedTransport;

    type Harness = (
        InputCoordinator<ScriptedTransport>,
        mpsc::UnboundedReceiver<CoordinatorEvent>,
        mpsc::UnboundedReceiver<String>,
    );

    fn harness(transport: ScriptedTransport) -> Harness {
        let data = ReferenceData::new(
            vec!["weather".to_string(), "weather forecast".to_string()],
            vec![
                SiteEntry::new("github.com", "GitHub"),
                SiteEntry::new("weather.com", "The Weather Channel"),
            ],
        );
        let aggregator = SuggestionAggregator::new(
            LocalIndex::new(data),
            Some(RemoteSuggestionClient::new(
                transport,
                100,
                Duration::from_secs(3),
            )),
        );
        let (nav_tx, nav_rx) = mpsc::unbounded_channel();
        let (coordinator, events) = InputCoordinator::new(
            Arc::new(aggregator),
            Box::new(nav_tx),
            CoordinatorTimings::default(),
        );
        (coordinator, events, nav_rx)
    }

    /// Feed events back to the coordinator until `wait` of (paused) time passes.
    async fn run_for(
        coordinator: &mut InputCoordinator<ScriptedTransport>,
        events: &mut mpsc::UnboundedReceiver<CoordinatorEvent>,
        wait: Duration,
    ) {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            tokio::select! {
                Some(event) = events.recv() => coordinator.handle_event(event),
                () = tokio::time::sleep_until(deadline) => break,
            }
        }
    }

    fn transport(c: &InputCoordinator<ScriptedTransport>) -> &ScriptedTransport {
        c.aggregator().remote().unwrap().transport()
    }

    const SETTLE: Duration = Duration::from_secs(1);

    #[tokio::test(start_paused = true)]
    async fn typing_opens_the_dropdown_after_the_debounce() {
        let (mut c, mut events, _nav) =
            harness(ScriptedTransport::new().respond("weath", &["weather today"]));

        c.on_input("weath");
        assert_eq!(c.state(), CoordinatorState::Debouncing);
        run_for(&mut c, &mut events, Duration::from_millis(100)).await;
        assert_eq!(transport(&c).total_calls(), 0);

        run_for(&mut c, &mut events, SETTLE).await;
        assert_eq!(c.state(), CoordinatorState::ShowingSuggestions);
        let texts: Vec<&str> = c
            .query()
            .candidates
            .iter()
            .map(|x| x.navigation_text.as_str())
            .collect();
        assert_eq!(
            texts,
            vec!["weather", "weather forecast", "weather.com", "weather today"]
        );
        assert_eq!(c.query().selected_index, None);
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_typing_issues_one_request() {
        let (mut c, mut events, _nav) = harness(ScriptedTransport::new());

        c.on_input("wea");
        run_for(&mut c, &mut events, Duration::from_millis(50)).await;
        c.on_input("weat");
        run_for(&mut c, &mut events, Duration::from_millis(50)).await;
        c.on_input("weath");
        run_for(&mut c, &mut events, SETTLE).await;

        assert_eq!(transport(&c).calls_for("wea"), 0);
        assert_eq!(transport(&c).calls_for("weat"), 0);
        assert_eq!(transport(&c).calls_for("weath"), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn short_input_goes_idle() {
        let (mut c, mut events, _nav) = harness(ScriptedTransport::new());
        c.on_input("gi");
        run_for(&mut c, &mut events, SETTLE).await;
        assert_eq!(c.state(), CoordinatorState::ShowingSuggestions);

        c.on_input("g");
        assert_eq!(c.state(), CoordinatorState::Idle);
        assert!(c.query().candidates.is_empty());
        run_for(&mut c, &mut events, SETTLE).await;
        assert_eq!(c.state(), CoordinatorState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn no_matches_goes_idle() {
        let (mut c, mut events, _nav) = harness(ScriptedTransport::new());
        c.on_input("zzzz");
        run_for(&mut c, &mut events, SETTLE).await;
        assert_eq!(c.state(), CoordinatorState::Idle);
        assert!(c.query().candidates.is_empty());
    }

    #[tokio::test]
    async fn stale_results_are_dropped() {
        let (mut c, _events, _nav) = harness(ScriptedTransport::new());
        c.on_input("weather");
        c.handle_event(CoordinatorEvent::SuggestionsReady {
            token: "weath".into(),
            candidates: vec![Candidate::search("weath")],
        });
        assert_eq!(c.state(), CoordinatorState::Debouncing);
        assert!(c.query().candidates.is_empty());

        c.handle_event(CoordinatorEvent::SuggestionsReady {
            token: "weather".into(),
            candidates: vec![Candidate::search("weather")],
        });
        assert_eq!(c.state(), CoordinatorState::ShowingSuggestions);
    }

    #[tokio::test]
    async fn results_after_escape_are_dropped() {
        let (mut c, _events, _nav) = harness(ScriptedTransport::new());
        c.on_input("weather");
        c.on_key(NavKey::Escape);
        c.handle_event(CoordinatorEvent::SuggestionsReady {
            token: "weather".into(),
            candidates: vec![Candidate::search("weather")],
        });
        assert_eq!(c.state(), CoordinatorState::Idle);
        assert!(c.query().candidates.is_empty());
        assert_eq!(c.display_text(), "weather");
    }

    #[tokio::test(start_paused = true)]
    async fn escape_cancels_the_pending_debounce() {
        let (mut c, mut events, _nav) = harness(ScriptedTransport::new());
        c.on_input("weath");
        c.on_key(NavKey::Escape);
        run_for(&mut c, &mut events, SETTLE).await;
        assert_eq!(c.state(), CoordinatorState::Idle);
        assert_eq!(transport(&c).total_calls(), 0);
    }

    fn showing(c: &mut InputCoordinator<ScriptedTransport>, texts: &[&str]) {
        let raw = c.query().raw_text.clone();
        c.handle_event(CoordinatorEvent::SuggestionsReady {
            token: raw,
            candidates: texts.iter().map(|t| Candidate::search(t)).collect(),
        });
    }

    #[tokio::test]
    async fn arrows_cycle_and_preview() {
        let (mut c, _events, _nav) = harness(ScriptedTransport::new());
        c.on_input("we");
        showing(&mut c, &["a", "b", "c"]);

        c.on_key(NavKey::Down);
        assert_eq!(c.query().selected_index, Some(0));
        assert_eq!(c.display_text(), "a");
        c.on_key(NavKey::Down);
        c.on_key(NavKey::Down);
        c.on_key(NavKey::Down);
        assert_eq!(c.query().selected_index, Some(0));

        c.on_key(NavKey::Up);
        assert_eq!(c.query().selected_index, Some(2));
        assert_eq!(c.display_text(), "c");
        assert_eq!(c.query().raw_text, "we");
        assert_eq!(c.state(), CoordinatorState::ShowingSuggestions);
    }

    #[tokio::test]
    async fn up_from_nothing_selects_last() {
        let (mut c, _events, _nav) = harness(ScriptedTransport::new());
        c.on_input("we");
        showing(&mut c, &["a", "b"]);
        c.on_key(NavKey::Up);
        assert_eq!(c.query().selected_index, Some(1));
    }

    #[tokio::test]
    async fn arrows_do_nothing_without_a_dropdown() {
        let (mut c, _events, _nav) = harness(ScriptedTransport::new());
        c.on_input("we");
        c.on_key(NavKey::Down);
        assert_eq!(c.query().selected_index, None);
        assert_eq!(c.display_text(), "we");
    }

    #[tokio::test]
    async fn enter_commits_selection() {
        let (mut c, _events, mut nav) = harness(ScriptedTransport::new());
        c.on_input("we");
        showing(&mut c, &["weather", "weather forecast"]);
        c.on_key(NavKey::Down);
        c.on_key(NavKey::Down);
        c.on_key(NavKey::Enter);

        assert_eq!(nav.try_recv().unwrap(), "weather forecast");
        assert_eq!(c.state(), CoordinatorState::Idle);
        assert!(c.query().candidates.is_empty());
        assert_eq!(c.display_text(), "weather forecast");
    }

    #[tokio::test]
    async fn enter_without_selection_commits_raw_text() {
        let (mut c, _events, mut nav) = harness(ScriptedTransport::new());
        c.on_input("Weather Paris");
        c.on_key(NavKey::Enter);
        assert_eq!(nav.try_recv().unwrap(), "Weather Paris");
    }

    #[tokio::test]
    async fn blank_input_commits_nothing() {
        let (mut c, _events, mut nav) = harness(ScriptedTransport::new());
        c.on_input("   ");
        c.on_key(NavKey::Enter);
        assert!(nav.try_recv().is_err());
        assert_eq!(c.state(), CoordinatorState::Idle);
    }

    #[tokio::test]
    async fn hover_selects_without_preview() {
        let (mut c, _events, _nav) = harness(ScriptedTransport::new());
        c.on_input("we");
        showing(&mut c, &["a", "b"]);
        c.on_candidate_hovered(1);
        assert_eq!(c.query().selected_index, Some(1));
        assert_eq!(c.display_text(), "we");

        c.on_candidate_hovered(7);
        assert_eq!(c.query().selected_index, Some(1));
    }

    #[tokio::test]
    async fn click_commits_candidate() {
        let (mut c, _events, mut nav) = harness(ScriptedTransport::new());
        c.on_input("we");
        showing(&mut c, &["a", "b"]);
        c.on_candidate_clicked(1);
        assert_eq!(nav.try_recv().unwrap(), "b");
        assert_eq!(c.state(), CoordinatorState::Idle);

        c.on_candidate_clicked(0);
        assert!(nav.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn blur_clears_and_reverts_after_delay() {
        let (mut c, mut events, _nav) = harness(ScriptedTransport::new());
        c.set_current_page("https://www.github.com/", "GitHub");
        c.on_input("we");
        showing(&mut c, &["a"]);

        c.on_blur();
        run_for(&mut c, &mut events, Duration::from_millis(150)).await;
        assert_eq!(c.query().candidates.len(), 1);

        run_for(&mut c, &mut events, Duration::from_millis(100)).await;
        assert!(c.query().candidates.is_empty());
        assert_eq!(c.state(), CoordinatorState::Idle);
        assert_eq!(c.display_text(), "github.com / GitHub");

        c.on_focus();
        assert_eq!(c.display_text(), "https://www.github.com/");
    }

    #[tokio::test(start_paused = true)]
    async fn focus_cancels_pending_blur() {
        let (mut c, mut events, _nav) = harness(ScriptedTransport::new());
        c.on_input("we");
        showing(&mut c, &["a"]);

        c.on_blur();
        run_for(&mut c, &mut events, Duration::from_millis(100)).await;
        c.on_focus();
        run_for(&mut c, &mut events, SETTLE).await;
        assert_eq!(c.query().candidates.len(), 1);
        assert_eq!(c.display_text(), "we");
    }

    #[tokio::test(start_paused = true)]
    async fn click_during_blur_delay_skips_revert() {
        let (mut c, mut events, mut nav) = harness(ScriptedTransport::new());
        c.set_current_page("https://github.com/", "GitHub");
        c.on_input("we");
        showing(&mut c, &["weather.com"]);

        c.on_blur();
        run_for(&mut c, &mut events, Duration::from_millis(50)).await;
        c.on_candidate_clicked(0);
        run_for(&mut c, &mut events, SETTLE).await;

        assert_eq!(nav.try_recv().unwrap(), "weather.com");
        assert_eq!(c.display_text(), "weather.com");
    }

    #[tokio::test(start_paused = true)]
    async fn voice_input_skips_suggestions() {
        let (mut c, mut events, _nav) = harness(ScriptedTransport::new());
        c.toggle_voice();
        assert!(c.is_voice_active());

        c.on_input("weather in paris");
        run_for(&mut c, &mut events, SETTLE).await;
        assert_eq!(c.state(), CoordinatorState::VoiceActive);
        assert_eq!(transport(&c).total_calls(), 0);
        assert_eq!(c.display_text(), "weather in paris");

        c.toggle_voice();
        assert_eq!(c.state(), CoordinatorState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn voice_stops_at_the_cap() {
        let (mut c, mut events, _nav) = harness(ScriptedTransport::new());
        c.toggle_voice();
        run_for(&mut c, &mut events, Duration::from_secs(29)).await;
        assert!(c.is_voice_active());
        run_for(&mut c, &mut events, Duration::from_secs(2)).await;
        assert_eq!(c.state(), CoordinatorState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn old_voice_cap_does_not_stop_a_new_session() {
        let (mut c, mut events, _nav) = harness(ScriptedTransport::new());
        c.toggle_voice();
        run_for(&mut c, &mut events, Duration::from_secs(20)).await;
        c.toggle_voice();
        c.toggle_voice();
        run_for(&mut c, &mut events, Duration::from_secs(20)).await;
        assert!(c.is_voice_active());
    }
}
