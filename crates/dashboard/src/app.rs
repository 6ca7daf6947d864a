//! Main application structure

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crossterm::{
    event::{self, DisableMouseCapture, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
};
use tokio::{runtime::Handle, sync::mpsc};
use tracing::info;

use crate::{
    error::Result,
    poller::{PollOutcome, Poller},
    source::StatusSource,
    state::DashboardState,
    ui::{UiState, render_ui},
};

/// How long the render loop waits for terminal input per frame.
const FRAME_TIMEOUT: Duration = Duration::from_millis(100);

/// Main application state
pub struct App<S> {
    /// Whether the app should quit
    should_quit: bool,

    /// Node list and loading/error flags
    state: DashboardState,

    /// UI state
    ui_state: UiState,

    /// Where node status comes from
    source: Arc<S>,

    /// Runtime the poller runs on
    runtime: Handle,

    /// Shutdown flag set by signal handler
    shutdown_flag: Option<Arc<AtomicBool>>,
}

impl<S: StatusSource> App<S> {
    /// Create a new application polling `source` on `runtime`
    pub fn new(source: S, runtime: Handle) -> Self {
        Self {
            should_quit: false,
            state: DashboardState::new(),
            ui_state: UiState::new(),
            source: Arc::new(source),
            runtime,
            shutdown_flag: None,
        }
    }

    /// Set the shutdown flag for signal handling
    pub fn set_shutdown_flag(&mut self, shutdown_flag: Arc<AtomicBool>) {
        self.shutdown_flag = Some(shutdown_flag);
    }

    /// Current dashboard state
    #[must_use]
    pub const fn state(&self) -> &DashboardState {
        &self.state
    }

    /// Run the application until the user quits
    ///
    /// The poller starts before the first frame and is cancelled on every
    /// exit path, including errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized or drawn to.
    pub fn run(&mut self) -> Result<()> {
        let (sender, mut outcomes) = mpsc::unbounded_channel();
        let poller = {
            let _guard = self.runtime.enter();
            Poller::new(self.source.clone()).start(sender)
        };

        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.run_loop(&mut terminal, &mut outcomes);

        poller.cancel();
        Self::cleanup_terminal(&mut terminal)?;

        drop(outcomes);
        self.runtime.block_on(poller.shutdown());

        result
    }

    /// Cleanup terminal state
    fn cleanup_terminal<B: Backend + io::Write>(terminal: &mut Terminal<B>) -> Result<()> {
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture
        )?;
        terminal.show_cursor()?;
        Ok(())
    }

    fn run_loop<B: Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
        outcomes: &mut mpsc::UnboundedReceiver<PollOutcome>,
    ) -> Result<()> {
        info!("Starting dashboard render loop");

        while !self.should_quit {
            if let Some(shutdown_flag) = &self.shutdown_flag {
                if shutdown_flag.load(Ordering::SeqCst) {
                    info!("Signal-triggered shutdown");
                    self.should_quit = true;
                    break;
                }
            }

            self.drain_outcomes(outcomes);

            terminal.draw(|frame| render_ui(frame, &self.state, &mut self.ui_state))?;

            if event::poll(FRAME_TIMEOUT)? {
                if let event::Event::Key(key) = event::read()? {
                    self.handle_key_event(key);
                }
            }
        }

        info!("Dashboard render loop finished");
        Ok(())
    }

    /// Apply every outcome that has resolved since the last frame, in order
    pub fn drain_outcomes(&mut self, outcomes: &mut mpsc::UnboundedReceiver<PollOutcome>) {
        while let Ok(outcome) = outcomes.try_recv() {
            self.state.apply(outcome);
        }
    }

    /// Handle keyboard input
    fn handle_key_event(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                info!("Quit requested");
                self.should_quit = true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                info!("Force quit requested");
                self.should_quit = true;
            }
            KeyCode::Up => self.ui_state.scroll_up(),
            KeyCode::Down => self.ui_state.scroll_down(),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use studyspace_occupancy::NodeStatus;

    use super::*;
    use crate::state::DashboardView;

    struct NoNodes;

    #[async_trait]
    impl StatusSource for NoNodes {
        async fn fetch_status(&self) -> Result<Vec<NodeStatus>> {
            Ok(Vec::new())
        }
    }

    fn node(id: &str) -> NodeStatus {
        NodeStatus {
            node_id: id.to_string(),
            free_seats: Some(1),
            total_seats: Some(2),
            timestamp: String::new(),
        }
    }

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[tokio::test]
    async fn test_drain_applies_outcomes_in_order() {
        let mut app = App::new(NoNodes, Handle::current());
        let (sender, mut outcomes) = mpsc::unbounded_channel();

        sender.send(Ok(vec![node("first")])).unwrap();
        sender.send(Ok(vec![node("second")])).unwrap();
        app.drain_outcomes(&mut outcomes);

        assert_eq!(
            app.state().view(),
            DashboardView::Populated(&[node("second")])
        );
    }

    #[tokio::test]
    async fn test_quit_keys() {
        for (code, modifiers) in [
            (KeyCode::Char('q'), KeyModifiers::NONE),
            (KeyCode::Esc, KeyModifiers::NONE),
            (KeyCode::Char('c'), KeyModifiers::CONTROL),
        ] {
            let mut app = App::new(NoNodes, Handle::current());
            app.handle_key_event(press(code, modifiers));
            assert!(app.should_quit, "{code:?}");
        }

        let mut app = App::new(NoNodes, Handle::current());
        app.handle_key_event(press(KeyCode::Char('c'), KeyModifiers::NONE));
        assert!(!app.should_quit);
    }

    #[tokio::test]
    async fn test_shutdown_flag_ends_loop() {
        let mut app = App::new(NoNodes, Handle::current());
        let flag = Arc::new(AtomicBool::new(true));
        app.set_shutdown_flag(flag);

        let mut terminal = Terminal::new(ratatui::backend::TestBackend::new(80, 24)).unwrap();
        let (_sender, mut outcomes) = mpsc::unbounded_channel();

        app.run_loop(&mut terminal, &mut outcomes).unwrap();

        assert!(app.should_quit);
        assert!(app.state().is_loading());
    }
}
