//! Main TUI application state and event loop.

use crate::tui::callback::{RequestRunner, TuiEvent};
use crate::tui::event::{
    Action, EventHandler, ListKey, clean_pasted_path, map_global_key, map_list_key,
};
use crate::tui::theme::Theme;
use crate::tui::widgets::form::{
    PathInput, render_buttons, render_multi_select, render_path_input, render_single_select,
};
use crate::tui::widgets::header::{HeaderData, render_header};
use crate::tui::widgets::keys_overlay::{KeysOverlay, render_keys_overlay};
use crate::tui::widgets::loading::{LoadingState, render_loading};
use crate::tui::widgets::results::{
    analysis_lines, comparison_lines, dataset_lines, downloads_lines, metadata_lines,
    mitigation_lines, model_lines, render_results,
};
use crate::tui::widgets::status_bar::{InputMode, render_status_bar};
use crate::tui::widgets::stepper::render_stepper;
use crate::tui::widgets::toasts::render_toasts;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use fairlens_core::validate::{validate_dataset_file, validate_model_file};
use fairlens_core::views::{ComparisonView, DatasetView, MitigationView, ModelView};
use fairlens_core::{Command, FairlensConfig, FairnessApi, Metadata, PredictionKind, Step, Wizard};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::text::Line;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// What a button does when activated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonAction {
    UploadData,
    Sample,
    SaveMetadata,
    UploadModel,
    Analyze,
    Mitigate,
    Compare,
    DownloadBiased,
    DownloadFair,
    ModelCard,
    Finish,
}

impl ButtonAction {
    pub fn label(self) -> &'static str {
        match self {
            Self::UploadData => "Upload Dataset",
            Self::Sample => "Download Sample CSV",
            Self::SaveMetadata => "Save Metadata",
            Self::UploadModel => "Upload Model",
            Self::Analyze => "Analyze Bias",
            Self::Mitigate => "Apply Mitigation",
            Self::Compare => "Compare Models",
            Self::DownloadBiased => "Biased Predictions",
            Self::DownloadFair => "Fair Predictions",
            Self::ModelCard => "Model Card",
            Self::Finish => "Finish",
        }
    }
}

/// A focusable element of the current step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    DataPath,
    ModelPath,
    Target,
    Protected,
    Features,
    Technique,
    Attribute,
    Button(ButtonAction),
}

impl Field {
    fn input_mode(self) -> InputMode {
        match self {
            Self::DataPath | Self::ModelPath => InputMode::Edit,
            Self::Button(_) => InputMode::Button,
            _ => InputMode::Select,
        }
    }
}

/// Focus order of a step. The mitigation form disappears once applied.
pub fn fields_for(step: Step, mitigation_visible: bool) -> Vec<Field> {
    use ButtonAction::*;
    match step {
        Step::UploadData => vec![Field::DataPath, Field::Button(UploadData), Field::Button(Sample)],
        Step::Metadata => vec![
            Field::Target,
            Field::Protected,
            Field::Features,
            Field::Button(SaveMetadata),
        ],
        Step::UploadModel => vec![Field::ModelPath, Field::Button(UploadModel)],
        Step::AnalyzeBias => vec![Field::Button(Analyze)],
        Step::Mitigate if mitigation_visible => {
            vec![Field::Technique, Field::Attribute, Field::Button(Mitigate)]
        }
        Step::Mitigate => Vec::new(),
        Step::Compare => vec![
            Field::Button(Compare),
            Field::Button(DownloadBiased),
            Field::Button(DownloadFair),
            Field::Button(ModelCard),
            Field::Button(Finish),
        ],
    }
}

/// Main TUI application state.
pub struct App {
    wizard: Wizard,
    runner: RequestRunner,
    theme: Theme,
    base_url: String,
    /// Index into the current step's fields.
    focus: usize,
    /// Cursor in the focused option list.
    list_cursor: usize,
    data_path: PathInput,
    model_path: PathInput,
    results_scroll: u16,
    keys_overlay: KeysOverlay,
    loading: LoadingState,
    should_quit: bool,
}

impl App {
    pub fn new(
        config: FairlensConfig,
        api: Arc<dyn FairnessApi>,
    ) -> (Self, mpsc::UnboundedReceiver<TuiEvent>) {
        let theme = Theme::from_name(&config.ui.theme);
        let base_url = config.api.base_url.clone();
        let wizard = Wizard::new(config, Arc::clone(&api));
        let (runner, events) = RequestRunner::new(api, wizard.inflight().clone());
        let app = Self {
            wizard,
            runner,
            theme,
            base_url,
            focus: 0,
            list_cursor: 0,
            data_path: PathInput::new(),
            model_path: PathInput::new(),
            results_scroll: 0,
            keys_overlay: KeysOverlay::new(),
            loading: LoadingState::default(),
            should_quit: false,
        };
        (app, events)
    }

    /// Run the main event loop.
    pub async fn run(
        &mut self,
        terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
        mut events: mpsc::UnboundedReceiver<TuiEvent>,
    ) -> anyhow::Result<()> {
        let mut event_handler = EventHandler::new();
        let tick_rate = std::time::Duration::from_millis(100);

        self.submit(Command::CheckHealth);

        loop {
            terminal.draw(|frame| self.draw(frame))?;

            tokio::select! {
                event = event_handler.next() => {
                    if let Some(event) = event {
                        self.handle_terminal_event(event);
                    }
                }
                event = events.recv() => {
                    if let Some(event) = event {
                        self.handle_tui_event(event);
                    }
                }
                _ = tokio::time::sleep(tick_rate) => {
                    self.tick();
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn tick(&mut self) {
        self.loading.tick();
        self.loading.update(self.wizard.inflight().is_busy());
        self.wizard.toasts_mut().prune(Instant::now());
    }

    // --- focus ---

    fn fields(&self) -> Vec<Field> {
        fields_for(
            self.wizard.current_step(),
            self.wizard.mitigation_form().is_visible(),
        )
    }

    pub fn focused_field(&self) -> Option<Field> {
        let fields = self.fields();
        if fields.is_empty() {
            return None;
        }
        Some(fields[self.focus.min(fields.len() - 1)])
    }

    fn move_focus(&mut self, forward: bool) {
        let len = self.fields().len();
        if len == 0 {
            return;
        }
        let current = self.focus.min(len - 1);
        self.focus = if forward {
            (current + 1) % len
        } else {
            (current + len - 1) % len
        };
        self.list_cursor = 0;
    }

    fn focus_on(&mut self, field: Field) {
        if let Some(idx) = self.fields().iter().position(|f| *f == field) {
            self.focus = idx;
            self.list_cursor = 0;
        }
    }

    fn on_step_changed(&mut self) {
        self.focus = 0;
        self.list_cursor = 0;
        self.results_scroll = 0;
    }

    pub fn input_mode(&self) -> InputMode {
        if self.wizard.inflight().is_busy() {
            return InputMode::Busy;
        }
        self.focused_field()
            .map(Field::input_mode)
            .unwrap_or(InputMode::Button)
    }

    // --- events ---

    fn handle_terminal_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            Event::Paste(text) => self.handle_paste(&text),
            _ => {}
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) {
        if self.keys_overlay.is_visible() {
            match key.code {
                KeyCode::Esc | KeyCode::F(1) => self.keys_overlay.hide(),
                KeyCode::Up => self.keys_overlay.scroll_up(),
                KeyCode::Down => self.keys_overlay.scroll_down(),
                _ => {}
            }
            return;
        }

        if let Some(action) = map_global_key(&key) {
            self.handle_action(action);
            return;
        }

        let Some(field) = self.focused_field() else {
            return;
        };
        match field {
            Field::DataPath | Field::ModelPath => {
                if key.code == KeyCode::Enter {
                    let action = if field == Field::DataPath {
                        ButtonAction::UploadData
                    } else {
                        ButtonAction::UploadModel
                    };
                    self.activate(action);
                } else if field == Field::DataPath {
                    self.data_path.handle_key(&key);
                } else {
                    self.model_path.handle_key(&key);
                }
            }
            Field::Button(action) => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.activate(action);
                }
            }
            list => {
                if let Some(list_key) = map_list_key(&key) {
                    self.handle_list_key(list, list_key);
                }
            }
        }
    }

    fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.should_quit = true,
            Action::NextStep => {
                self.wizard.next_step();
                self.on_step_changed();
            }
            Action::PrevStep => {
                self.wizard.prev_step();
                self.on_step_changed();
            }
            Action::GoToStep(n) => {
                self.wizard.go_to(Step::from_number(n));
                self.on_step_changed();
            }
            Action::FocusNext => self.move_focus(true),
            Action::FocusPrev => self.move_focus(false),
            Action::CheckHealth => self.submit(Command::CheckHealth),
            Action::Reset => {
                self.wizard.reset();
                self.data_path.clear();
                self.model_path.clear();
                self.on_step_changed();
            }
            Action::DismissToast => {
                self.wizard.toasts_mut().dismiss_latest();
            }
            Action::ToggleHelp => self.keys_overlay.toggle(),
            Action::ScrollUp => self.results_scroll = self.results_scroll.saturating_sub(1),
            Action::ScrollDown => self.results_scroll = self.results_scroll.saturating_add(1),
        }
    }

    /// A paste fills the path field of an upload step. A path with the
    /// right extension is uploaded straight away.
    fn handle_paste(&mut self, text: &str) {
        let path = clean_pasted_path(text);
        match self.wizard.current_step() {
            Step::UploadData => {
                let ready = validate_dataset_file(Some(Path::new(&path))).is_valid();
                self.data_path.set(path);
                self.focus_on(Field::DataPath);
                if ready {
                    self.activate(ButtonAction::UploadData);
                }
            }
            Step::UploadModel => {
                let ready = validate_model_file(Some(Path::new(&path))).is_valid();
                self.model_path.set(path);
                self.focus_on(Field::ModelPath);
                if ready {
                    self.activate(ButtonAction::UploadModel);
                }
            }
            step => tracing::debug!(step = %step, "Ignoring paste outside an upload step"),
        }
    }

    fn option_count(&self, field: Field) -> usize {
        let metadata = self.wizard.metadata_form();
        let mitigation = self.wizard.mitigation_form();
        match field {
            Field::Target => metadata.target.options().len(),
            Field::Protected => metadata.protected.options().len(),
            Field::Features => metadata.features.options().len(),
            Field::Technique => mitigation.technique.options().len(),
            Field::Attribute => mitigation.protected_attribute.options().len(),
            _ => 0,
        }
    }

    fn handle_list_key(&mut self, field: Field, key: ListKey) {
        let len = self.option_count(field);
        if len == 0 {
            return;
        }
        let cursor = self.list_cursor.min(len - 1);
        match key {
            ListKey::Up => self.list_cursor = cursor.saturating_sub(1),
            ListKey::Down => self.list_cursor = (cursor + 1).min(len - 1),
            ListKey::Toggle | ListKey::Activate => match field {
                Field::Target => self
                    .wizard
                    .metadata_form_mut()
                    .target
                    .select_index(Some(cursor)),
                Field::Protected => self.wizard.metadata_form_mut().protected.toggle(cursor),
                Field::Features => self.wizard.metadata_form_mut().features.toggle(cursor),
                Field::Technique => self
                    .wizard
                    .mitigation_form_mut()
                    .technique
                    .select_index(Some(cursor)),
                Field::Attribute => self
                    .wizard
                    .mitigation_form_mut()
                    .protected_attribute
                    .select_index(Some(cursor)),
                _ => {}
            },
        }
    }

    fn activate(&mut self, action: ButtonAction) {
        let command = match action {
            ButtonAction::UploadData => Command::UploadDataset {
                path: self.data_path.path(),
            },
            ButtonAction::Sample => {
                if let Ok(path) = self.wizard.write_sample() {
                    self.data_path.set(path.display().to_string());
                }
                return;
            }
            ButtonAction::SaveMetadata => {
                let form = self.wizard.metadata_form();
                Command::SubmitMetadata(Metadata {
                    target: form.target_value(),
                    protected: form.protected.selected(),
                    features: form.features.selected(),
                })
            }
            ButtonAction::UploadModel => Command::UploadModel {
                path: self.model_path.path(),
            },
            ButtonAction::Analyze => Command::AnalyzeBias,
            ButtonAction::Mitigate => {
                let form = self.wizard.mitigation_form();
                Command::ApplyMitigation {
                    technique: form.technique.value().map(str::to_string),
                    protected_attribute: form.protected_attribute.value().map(str::to_string),
                }
            }
            ButtonAction::Compare => Command::CompareModels,
            ButtonAction::DownloadBiased => Command::DownloadPredictions(PredictionKind::Biased),
            ButtonAction::DownloadFair => Command::DownloadPredictions(PredictionKind::Fair),
            ButtonAction::ModelCard => Command::DownloadModelCard,
            ButtonAction::Finish => {
                self.wizard.finish();
                return;
            }
        };
        self.submit(command);
    }

    /// Validate locally, then start the request in the background.
    ///
    /// Nothing new is submitted while an earlier command is still waiting for
    /// its outcome. Plot follow-ups do not count.
    fn submit(&mut self, command: Command) {
        if self.wizard.has_pending() {
            tracing::debug!(?command, "Busy; command ignored");
            return;
        }
        match self.wizard.prepare(command) {
            Ok(request) => self.runner.spawn(request),
            Err(e) => tracing::debug!(error = %e, "Command rejected"),
        }
    }

    fn handle_tui_event(&mut self, event: TuiEvent) {
        match event {
            TuiEvent::RequestFinished { kind, result } => {
                let before = self.wizard.current_step();
                match self.wizard.apply(kind, result) {
                    Ok(follow_ups) => {
                        for request in follow_ups {
                            self.runner.spawn(request);
                        }
                    }
                    Err(e) => tracing::debug!(error = %e, "Request failed"),
                }
                if self.wizard.current_step() != before {
                    self.on_step_changed();
                }
            }
        }
    }

    // --- drawing ---

    /// Draw the full UI.
    pub fn draw(&self, frame: &mut Frame) {
        let [header_area, stepper_area, main_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        let header = HeaderData {
            api_status: self.wizard.session().api_status(),
            base_url: self.base_url.clone(),
            step: self.wizard.current_step(),
            busy: self.wizard.inflight().is_busy(),
        };
        render_header(frame, header_area, &header, &self.theme);
        render_stepper(frame, stepper_area, self.wizard.navigator(), &self.theme);
        self.draw_step(frame, main_area);
        render_status_bar(frame, status_area, self.input_mode(), &self.theme);

        render_toasts(frame, main_area, self.wizard.toasts().toasts(), &self.theme);

        let inflight = self.wizard.inflight();
        if let Some(label) = inflight.current_label() {
            render_loading(
                frame,
                frame.area(),
                &label,
                inflight.count(),
                &self.loading,
                &self.theme,
            );
        }

        render_keys_overlay(frame, frame.area(), &self.keys_overlay, &self.theme);
    }

    fn form_height(&self) -> u16 {
        let fields = self.fields();
        let has_path = fields
            .iter()
            .any(|f| matches!(f, Field::DataPath | Field::ModelPath));
        let has_list = fields
            .iter()
            .any(|f| matches!(f, Field::Target | Field::Technique));
        let buttons = fields.iter().any(|f| matches!(f, Field::Button(_)));
        let mut height = 0;
        if has_path {
            height += 3;
        }
        if has_list {
            height += 10;
        }
        if buttons {
            height += 2;
        }
        height
    }

    fn draw_step(&self, frame: &mut Frame, area: Rect) {
        let [form_area, results_area] =
            Layout::vertical([Constraint::Length(self.form_height()), Constraint::Min(3)])
                .areas(area);
        self.draw_form(frame, form_area);

        let step = self.wizard.current_step();
        let lines = self.results_for(step);
        render_results(
            frame,
            results_area,
            step.title(),
            lines,
            self.results_scroll,
            &self.theme,
        );
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        if area.height == 0 {
            return;
        }
        let fields = self.fields();
        let focused = self.focused_field();
        let theme = &self.theme;
        let mut remaining = area;

        let mut take = |height: u16| -> Rect {
            let height = height.min(remaining.height);
            let taken = Rect::new(remaining.x, remaining.y, remaining.width, height);
            remaining.y += height;
            remaining.height -= height;
            taken
        };

        if fields.contains(&Field::DataPath) {
            let rect = take(3);
            render_path_input(
                frame,
                rect,
                "Dataset (.csv)",
                &self.data_path,
                focused == Some(Field::DataPath),
                theme,
            );
        }
        if fields.contains(&Field::ModelPath) {
            let rect = take(3);
            render_path_input(
                frame,
                rect,
                "Model (.joblib, .pkl, .pickle)",
                &self.model_path,
                focused == Some(Field::ModelPath),
                theme,
            );
        }
        if fields.contains(&Field::Target) {
            let rect = take(10);
            let [target, protected, features] = Layout::horizontal([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .areas(rect);
            let form = self.wizard.metadata_form();
            render_single_select(
                frame,
                target,
                "Target",
                &form.target,
                self.list_cursor,
                focused == Some(Field::Target),
                theme,
            );
            render_multi_select(
                frame,
                protected,
                "Protected attributes",
                &form.protected,
                self.list_cursor,
                focused == Some(Field::Protected),
                theme,
            );
            render_multi_select(
                frame,
                features,
                "Features",
                &form.features,
                self.list_cursor,
                focused == Some(Field::Features),
                theme,
            );
        }
        if fields.contains(&Field::Technique) {
            let rect = take(10);
            let [technique, attribute] =
                Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .areas(rect);
            let form = self.wizard.mitigation_form();
            render_single_select(
                frame,
                technique,
                "Technique",
                &form.technique,
                self.list_cursor,
                focused == Some(Field::Technique),
                theme,
            );
            render_single_select(
                frame,
                attribute,
                "Protected attribute",
                &form.protected_attribute,
                self.list_cursor,
                focused == Some(Field::Attribute),
                theme,
            );
        }

        let buttons: Vec<ButtonAction> = fields
            .iter()
            .filter_map(|f| match f {
                Field::Button(action) => Some(*action),
                _ => None,
            })
            .collect();
        if !buttons.is_empty() {
            let rect = take(2);
            let labels: Vec<&str> = buttons.iter().map(|b| b.label()).collect();
            let focused_button = match focused {
                Some(Field::Button(action)) => buttons.iter().position(|b| *b == action),
                _ => None,
            };
            let row = Rect::new(rect.x + 1, rect.y + 1, rect.width.saturating_sub(1), 1);
            if rect.height >= 2 {
                render_buttons(frame, row, &labels, focused_button, theme);
            }
        }
    }

    fn results_for(&self, step: Step) -> Vec<Line<'static>> {
        let session = self.wizard.session();
        let theme = &self.theme;
        let mut lines = match step {
            Step::UploadData => session
                .dataset()
                .map(|d| dataset_lines(&DatasetView::new(d), theme))
                .unwrap_or_default(),
            Step::Metadata => session
                .metadata()
                .map(|m| metadata_lines(m, theme))
                .unwrap_or_default(),
            Step::UploadModel => session
                .model()
                .map(|m| model_lines(&ModelView::new(m), theme))
                .unwrap_or_default(),
            Step::AnalyzeBias => session
                .analysis()
                .map(|a| analysis_lines(a, theme))
                .unwrap_or_default(),
            Step::Mitigate => session
                .mitigation()
                .map(|m| mitigation_lines(&MitigationView::new(m), theme))
                .unwrap_or_default(),
            Step::Compare => {
                let mut lines = session
                    .comparison()
                    .map(|c| comparison_lines(&ComparisonView::new(c), theme))
                    .unwrap_or_default();
                lines.extend(downloads_lines(session.downloads(), theme));
                lines
            }
        };
        if lines.is_empty() {
            lines.push(Line::styled(step_hint(step), theme.muted_style()));
        }
        lines
    }
}

fn step_hint(step: Step) -> &'static str {
    match step {
        Step::UploadData => "Type or paste the path of a CSV dataset, then press Enter.",
        Step::Metadata => "Pick the target, protected attributes and features, then save.",
        Step::UploadModel => "Type or paste the path of a trained model file, then press Enter.",
        Step::AnalyzeBias => "Run the analysis to see fairness metrics and plots.",
        Step::Mitigate => "Choose a technique and the attribute to protect.",
        Step::Compare => "Compare the biased and fair models, then download the results.",
    }
}
