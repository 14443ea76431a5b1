use crate::core::{UploadedFile, Workflow};
use crate::services::RequestDispatcher;
use crate::tui::components::{
    AnalysisPanel, ErrorBanner, HelpOverlay, PredictionPanel, QueryPanel, UploadHint, UploadPanel,
};
use crate::tui::{Action, Component, Focusable, KeyBindings, Theme};
use color_eyre::Result;
use crossterm::event::{KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Panel holding keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Upload,
    Query,
}

/// Application state
///
/// Owns the session workflow and the panels that show it. Key presses become
/// actions; requests go out through the dispatcher and their outcomes are
/// applied on [`tick`](Self::tick).
pub struct App {
    workflow: Workflow,
    dispatcher: RequestDispatcher,

    upload_panel: UploadPanel,
    analysis_panel: AnalysisPanel,
    query_panel: QueryPanel,
    prediction_panel: PredictionPanel,
    error_banner: ErrorBanner,
    help: Option<HelpOverlay>,

    focus: Focus,
    keybindings: KeyBindings,
    theme: Theme,
    should_quit: bool,
}

impl App {
    pub fn new(dispatcher: RequestDispatcher, keybindings: KeyBindings, theme: Theme) -> Self {
        let mut upload_panel = UploadPanel::new(theme.clone());
        upload_panel.set_focused(true);

        Self {
            workflow: Workflow::new(),
            dispatcher,
            upload_panel,
            analysis_panel: AnalysisPanel::new(theme.clone()),
            query_panel: QueryPanel::new(theme.clone()),
            prediction_panel: PredictionPanel::new(theme.clone()),
            error_banner: ErrorBanner::new(theme.clone()),
            help: None,
            focus: Focus::Upload,
            keybindings,
            theme,
            should_quit: false,
        }
    }

    /// Handle a key event
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        // Only handle key press events, ignore release/repeat
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        if let Some(action) = self.keybindings.get_action(&key) {
            return self.handle_action(action);
        }

        // Unbound keys are typing
        if self.help.is_some() {
            return Ok(());
        }
        match self.focus {
            Focus::Upload => {
                self.upload_panel.handle_key(key);
            }
            Focus::Query => {
                if self.query_panel.handle_key(key) {
                    self.workflow.set_query(self.query_panel.text());
                }
            }
        }
        Ok(())
    }

    /// Handle an action
    pub fn handle_action(&mut self, action: Action) -> Result<()> {
        debug!("Action {:?} with focus {:?}", action, self.focus);

        if action == Action::Quit {
            self.should_quit = true;
            return Ok(());
        }

        // The overlay swallows everything while open
        if let Some(help) = &mut self.help {
            if help.handle_action(action)? {
                self.help = None;
            }
            return Ok(());
        }

        match action {
            Action::ToggleHelp => {
                self.help = Some(HelpOverlay::new(&self.keybindings, self.theme.clone()));
            }
            Action::Cancel => {
                self.workflow.dismiss_error();
                self.upload_panel.set_hint(None);
            }
            Action::FocusNext => self.cycle_focus(true),
            Action::FocusPrev => self.cycle_focus(false),
            Action::Confirm => match self.focus {
                Focus::Upload => self.stage_from_input(),
                Focus::Query => self.start_prediction(),
            },
            Action::Analyze => self.start_analysis(),
            Action::Predict => self.start_prediction(),
            Action::ScrollUp | Action::ScrollDown => {
                self.prediction_panel.handle_action(action)?;
            }
            Action::Quit => {}
        }

        Ok(())
    }

    /// Stage the file at `path` for analysis
    ///
    /// An unreadable path leaves the session as it was and shows the reason
    /// in the upload panel.
    pub fn stage_path(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.upload_panel.set_path(&path.to_string_lossy());

        match UploadedFile::from_path(path) {
            Ok(file) => {
                let hint = if file.is_empty() {
                    format!("Staged empty file {}", file.name())
                } else {
                    format!("Staged {}", file.name())
                };
                self.workflow.select_file(Some(file));
                self.upload_panel.set_hint(Some(UploadHint::Info(hint)));
                true
            }
            Err(err) => {
                warn!("Cannot read {}: {}", path.display(), err);
                self.upload_panel.set_hint(Some(UploadHint::Error(format!(
                    "Cannot read {}: {}",
                    path.display(),
                    err
                ))));
                false
            }
        }
    }

    fn stage_from_input(&mut self) {
        match self.upload_panel.path() {
            Some(path) => {
                self.stage_path(path);
            }
            None => {
                self.workflow.select_file(None);
                self.upload_panel
                    .set_hint(Some(UploadHint::Error("Enter a file path first".to_string())));
            }
        }
    }

    fn start_analysis(&mut self) {
        if let Some(request) = self.workflow.analyze() {
            self.dispatcher.dispatch(request);
        }
    }

    fn start_prediction(&mut self) {
        if let Some(request) = self.workflow.predict() {
            self.dispatcher.dispatch(request);
        }
    }

    /// Panels that can take focus right now, in tab order
    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![Focus::Upload];
        if self.workflow.analysis().is_some() {
            order.push(Focus::Query);
        }
        order
    }

    fn cycle_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        let next = if forward {
            (current + 1) % order.len()
        } else {
            (current + order.len() - 1) % order.len()
        };
        self.set_focus(order[next]);
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.upload_panel.set_focused(focus == Focus::Upload);
        self.query_panel.set_focused(focus == Focus::Query);
    }

    /// Apply finished requests (called on every tick)
    pub fn tick(&mut self) -> Result<()> {
        let before = self.workflow.analysis().cloned();
        while let Some(outcome) = self.dispatcher.try_next() {
            self.workflow.complete(outcome);
        }

        // First result of a new analysis moves on to the query
        let after = self.workflow.analysis();
        let replaced = match (&before, after) {
            (Some(old), Some(new)) => !Arc::ptr_eq(old, new),
            (None, Some(_)) => true,
            _ => false,
        };
        if replaced {
            self.set_focus(Focus::Query);
        }

        self.sync_panels();
        Ok(())
    }

    /// Push the session state into the panels
    fn sync_panels(&mut self) {
        let workflow = &self.workflow;
        let in_flight = workflow.in_flight();

        self.upload_panel.sync(
            workflow.file().map(UploadedFile::describe),
            workflow.can_analyze(),
            in_flight == Some(crate::core::InFlight::Analysis),
        );
        self.query_panel.sync(
            workflow.can_predict(),
            in_flight == Some(crate::core::InFlight::Prediction),
        );
        self.analysis_panel.set_analysis(workflow.analysis().cloned());
        self.prediction_panel.set_prediction(workflow.prediction().cloned());
        self.error_banner.set_message(workflow.error().map(|e| e.message()));

        if self.focus == Focus::Query && workflow.analysis().is_none() {
            self.set_focus(Focus::Upload);
        }
    }

    /// Check if the app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn workflow(&self) -> &Workflow {
        &self.workflow
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn upload_hint(&self) -> Option<&UploadHint> {
        self.upload_panel.hint()
    }

    pub fn is_help_visible(&self) -> bool {
        self.help.is_some()
    }

    /// Render the app
    pub fn render(&mut self, frame: &mut Frame) {
        self.sync_panels();
        let area = frame.area();

        let has_analysis = self.workflow.analysis().is_some();
        let has_prediction = self.workflow.prediction().is_some();

        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),                         // Header
                Constraint::Length(self.error_banner.height()), // Error banner
                Constraint::Min(0),                            // Workflow
                Constraint::Length(1),                         // Footer
            ])
            .split(area);

        self.render_header(frame, outer[0]);
        let dismiss = self.keybindings.instructions(&[Action::Cancel]);
        self.error_banner.render(frame, outer[1], &dismiss);

        let mut constraints = vec![Constraint::Length(9)];
        if has_analysis {
            constraints.push(Constraint::Length(6));
        }
        constraints.push(Constraint::Min(0));
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(outer[2]);

        self.upload_panel.render(frame, body[0]);

        if has_analysis {
            self.query_panel.render(frame, body[1]);
            let results = body[2];
            if has_prediction {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                    .split(results);
                self.analysis_panel.render(frame, columns[0]);
                self.prediction_panel.render(frame, columns[1]);
            } else {
                self.analysis_panel.render(frame, results);
            }
        } else {
            let hint = self.keybindings.instructions(&[Action::Confirm, Action::Analyze]);
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    format!(" Enter a file path, then {hint}"),
                    self.theme.muted_style(),
                ))),
                body[1],
            );
        }

        self.render_footer(frame, outer[3]);

        if let Some(help) = &mut self.help {
            let help_area = Self::centered_rect(60, 70, area);
            help.render(frame, help_area);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(" AI Data Scientist ", self.theme.title_style()),
            Span::styled(format!(" {}", self.workflow.stage()), self.theme.muted_style()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let text = self.keybindings.instructions(&self.footer_actions());
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(format!(" {text}"), self.theme.muted_style()))),
            area,
        );
    }

    /// Footer hints: the help overlay's actions while it is open, otherwise
    /// the focused input's actions followed by chart scrolling once there
    /// are charts to scroll
    fn footer_actions(&self) -> Vec<Action> {
        if let Some(help) = &self.help {
            return help.supported_actions().to_vec();
        }

        let mut actions = vec![Action::FocusNext];
        let focused: &dyn Component = match self.focus {
            Focus::Upload => &self.upload_panel,
            Focus::Query => &self.query_panel,
        };
        actions.extend_from_slice(focused.supported_actions());
        if self.workflow.prediction().is_some() {
            actions.extend_from_slice(self.prediction_panel.supported_actions());
        }
        actions.extend([Action::ToggleHelp, Action::Quit]);
        actions
    }

    /// Helper to create centered rectangle
    fn centered_rect(percent_w: u16, percent_h: u16, area: Rect) -> Rect {
        let width = (area.width * percent_w) / 100;
        let height = (area.height * percent_h) / 100;
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        Rect {
            x,
            y,
            width,
            height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        AnalysisError, AnalysisResult, CleanedData, ModelSummary, PredictionError,
        PredictionRequest, PredictionResult, RequestFailure, Stage,
    };
    use crate::services::AnalysisService;
    use crate::tui::components::test_support::buffer_text;
    use crossterm::event::{KeyCode, KeyModifiers};
    use futures::future::{BoxFuture, FutureExt};
    use ratatui::{backend::TestBackend, Terminal};
    use std::io::Write;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Answers every analysis with 100x5 clean data; predictions fail
    /// unless the query mentions salary
    struct FakeService;

    impl AnalysisService for FakeService {
        fn analyze<'a>(
            &'a self,
            _file: &'a UploadedFile,
        ) -> BoxFuture<'a, Result<AnalysisResult, AnalysisError>> {
            async {
                Ok(AnalysisResult {
                    total_rows: 100,
                    total_columns: 5,
                    is_clean: true,
                    noise_types: vec![],
                    cleaned_data: CleanedData::new(serde_json::json!([{"salary": 1}])),
                    pca_result: None,
                })
            }
            .boxed()
        }

        fn predict<'a>(
            &'a self,
            request: &'a PredictionRequest,
        ) -> BoxFuture<'a, Result<PredictionResult, PredictionError>> {
            let ok = request.user_query.contains("salary");
            async move {
                if !ok {
                    return Err(PredictionError::new(RequestFailure::Status(422)));
                }
                Ok(PredictionResult {
                    prediction_results: ModelSummary {
                        model: "LinearRegression".to_string(),
                        target_variable: "salary".to_string(),
                        mean_squared_error: 12.5,
                        feature_variables: None,
                        predictions: None,
                        actual_values: None,
                    },
                    visualizations: vec![],
                })
            }
            .boxed()
        }
    }

    struct Harness {
        app: App,
        temp_dir: TempDir,
        _runtime: tokio::runtime::Runtime,
    }

    fn harness() -> Harness {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let dispatcher = RequestDispatcher::new(Arc::new(FakeService), runtime.handle().clone());
        Harness {
            app: App::new(dispatcher, KeyBindings::default(), Theme::default()),
            temp_dir: TempDir::new().unwrap(),
            _runtime: runtime,
        }
    }

    fn write_csv(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("salaries.csv");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "experience,salary").unwrap();
        writeln!(file, "1,40000").unwrap();
        path
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key_event(key(KeyCode::Char(c))).unwrap();
        }
    }

    fn settle(app: &mut App) {
        for _ in 0..200 {
            app.tick().unwrap();
            if !app.workflow().is_loading() {
                return;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        panic!("request never finished");
    }

    fn screen(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_quit() {
        let mut h = harness();
        assert!(!h.app.should_quit());
        h.app
            .handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL))
            .unwrap();
        assert!(h.app.should_quit());
    }

    #[test]
    fn test_typed_path_is_staged_on_enter() {
        let mut h = harness();
        let path = write_csv(&h.temp_dir);

        type_text(&mut h.app, &path.to_string_lossy());
        h.app.handle_key_event(key(KeyCode::Enter)).unwrap();

        assert_eq!(h.app.workflow().file().map(|f| f.name()), Some("salaries.csv"));
        assert!(matches!(h.app.upload_hint(), Some(UploadHint::Info(_))));
    }

    #[test]
    fn test_unreadable_path_leaves_session_alone() {
        let mut h = harness();
        let good = write_csv(&h.temp_dir);
        assert!(h.app.stage_path(&good));

        assert!(!h.app.stage_path(h.temp_dir.path().join("missing.csv")));
        assert_eq!(h.app.workflow().file().map(|f| f.name()), Some("salaries.csv"));
        assert!(matches!(h.app.upload_hint(), Some(UploadHint::Error(_))));
        assert!(h.app.workflow().error().is_none());
    }

    #[test]
    fn test_analyze_then_predict() {
        let mut h = harness();
        let path = write_csv(&h.temp_dir);
        h.app.stage_path(&path);

        h.app.handle_key_event(key(KeyCode::F(5))).unwrap();
        assert_eq!(h.app.workflow().stage(), Stage::Analyzing);
        assert!(screen(&mut h.app, 100, 40).contains("[ Analyzing... ]"));

        settle(&mut h.app);
        assert_eq!(h.app.workflow().stage(), Stage::Analyzed);
        assert_eq!(h.app.focus(), Focus::Query);

        type_text(&mut h.app, "predict salary");
        assert_eq!(h.app.workflow().query(), "predict salary");
        h.app.handle_key_event(key(KeyCode::Enter)).unwrap();
        settle(&mut h.app);

        assert_eq!(h.app.workflow().stage(), Stage::Predicted);
        let text = screen(&mut h.app, 100, 40);
        assert!(text.contains("Total Rows: 100"));
        assert!(text.contains("Model: LinearRegression"));
        assert!(text.contains("MSE: 12.50"));
    }

    #[test]
    fn test_failed_prediction_shows_banner_until_dismissed() {
        let mut h = harness();
        let path = write_csv(&h.temp_dir);
        h.app.stage_path(&path);
        h.app.handle_action(Action::Analyze).unwrap();
        settle(&mut h.app);

        type_text(&mut h.app, "predict age");
        h.app.handle_action(Action::Predict).unwrap();
        settle(&mut h.app);

        assert!(screen(&mut h.app, 100, 40).contains("Prediction failed. Please try again."));
        assert_eq!(h.app.workflow().stage(), Stage::Analyzed);

        h.app.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(h.app.workflow().error().is_none());
        assert!(!screen(&mut h.app, 100, 40).contains("Prediction failed"));
    }

    #[test]
    fn test_predict_disabled_before_analysis() {
        let mut h = harness();
        h.app.handle_action(Action::Predict).unwrap();
        h.app.handle_action(Action::Analyze).unwrap();
        assert_eq!(h.app.workflow().stage(), Stage::Idle);
        assert!(!h.app.workflow().is_loading());
    }

    #[test]
    fn test_focus_cycles_only_through_visible_panels() {
        let mut h = harness();
        h.app.handle_action(Action::FocusNext).unwrap();
        assert_eq!(h.app.focus(), Focus::Upload);

        let path = write_csv(&h.temp_dir);
        h.app.stage_path(&path);
        h.app.handle_action(Action::Analyze).unwrap();
        settle(&mut h.app);

        h.app.handle_action(Action::FocusPrev).unwrap();
        assert_eq!(h.app.focus(), Focus::Upload);
        h.app.handle_action(Action::FocusNext).unwrap();
        assert_eq!(h.app.focus(), Focus::Query);
    }

    #[test]
    fn test_help_overlay_swallows_actions() {
        let mut h = harness();
        h.app.handle_key_event(key(KeyCode::F(1))).unwrap();
        assert!(h.app.is_help_visible());
        assert!(screen(&mut h.app, 100, 40).contains("Help"));

        // Typing is ignored while help is open
        type_text(&mut h.app, "abc");
        h.app.handle_key_event(key(KeyCode::Esc)).unwrap();
        assert!(!h.app.is_help_visible());
        h.app.handle_key_event(key(KeyCode::Enter)).unwrap();
        assert!(matches!(h.app.upload_hint(), Some(UploadHint::Error(_))));
    }

    #[test]
    fn test_footer_follows_focused_panel() {
        let mut h = harness();
        assert_eq!(
            h.app.footer_actions(),
            vec![
                Action::FocusNext,
                Action::Confirm,
                Action::Analyze,
                Action::ToggleHelp,
                Action::Quit
            ]
        );

        let path = write_csv(&h.temp_dir);
        h.app.stage_path(&path);
        h.app.handle_action(Action::Analyze).unwrap();
        settle(&mut h.app);
        assert_eq!(h.app.focus(), Focus::Query);
        assert!(h.app.footer_actions().contains(&Action::Predict));
        assert!(!h.app.footer_actions().contains(&Action::Analyze));

        type_text(&mut h.app, "predict salary");
        h.app.handle_action(Action::Predict).unwrap();
        settle(&mut h.app);
        assert!(h.app.footer_actions().contains(&Action::ScrollDown));
        assert!(screen(&mut h.app, 100, 40).contains("F6: Predict"));

        h.app.handle_action(Action::ToggleHelp).unwrap();
        assert_eq!(h.app.footer_actions(), vec![Action::ToggleHelp, Action::Cancel]);
    }

    #[test]
    fn test_initial_screen() {
        let mut h = harness();
        let text = screen(&mut h.app, 100, 30);
        assert!(text.contains("AI Data Scientist"));
        assert!(text.contains("1. Upload Data"));
        assert!(!text.contains("3. Make a Prediction"));
        assert!(text.contains("F1: Help"));
    }
}
