use crate::prelude::*;

pub mod modal;
pub mod notification;

use modal::ConfirmModal;
use notification::Notification;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;
use std::time::Instant;

const MAX_AMPS_DIGITS: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelData {
    /// Fresh inverter list from the gateway.
    Inverters(Vec<InverterInfo>),
    /// The inverter list could not be fetched.
    InvertersFailed,
    /// Settings outcomes from one refresh sweep, one entry per serial.
    SettingsBatch(Vec<(String, SettingsOutcome)>),
    /// A command finished, successfully or not.
    CommandOutcome(PanelCommand, CommandResult),
    Shutdown,
}

/// Something the event loop must do on the panel's behalf after handling
/// input. The state machine itself never touches channels or the terminal.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    Send(PanelCommand),
    Reload,
    Quit,
}

/// One activatable control on the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlId {
    Output(OutputSourcePriority),
    Charger(ChargerSourcePriority),
    ChargeCurrent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Loaded,
    Failed,
}

/// Screen regions of the last rendered frame, used to map mouse events back
/// to controls. Rendering fills this in; a default layout hits nothing.
#[derive(Debug, Clone, Default)]
pub struct PanelLayout {
    pub selector: Rect,
    pub controls: Vec<(ControlId, Rect)>,
    pub input: Rect,
    pub modal: Option<ModalLayout>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ModalLayout {
    pub area: Rect,
    pub confirm: Rect,
    pub cancel: Rect,
}

fn hit(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x && column < area.x + area.width && row >= area.y && row < area.y + area.height
}

/// The panel's entire mutable state. Input events and coordinator messages
/// go in, `PanelAction`s come out.
///
/// While a confirmation modal is open every other control is frozen and the
/// selector viewport is pinned to the offset it had when the modal opened.
/// While a command is in flight (`busy`) everything except quitting is
/// ignored until the outcome arrives.
pub struct PanelState {
    inverters: Vec<InverterInfo>,
    list_status: ListStatus,
    selected: Option<usize>,
    scroll: usize,
    store: SettingsStore,
    busy: bool,
    editing: bool,
    input: String,
    modal: Option<ConfirmModal>,
    notification: Option<Notification>,
    layout: PanelLayout,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::new()
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self {
            inverters: Vec::new(),
            list_status: ListStatus::Loading,
            selected: None,
            scroll: 0,
            store: SettingsStore::new(),
            busy: false,
            editing: false,
            input: String::new(),
            modal: None,
            notification: None,
            layout: PanelLayout::default(),
        }
    }

    // Accessors for rendering {{{
    pub fn inverters(&self) -> &[InverterInfo] {
        &self.inverters
    }

    pub fn list_status(&self) -> ListStatus {
        self.list_status
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_serial(&self) -> Option<&str> {
        self.selected
            .and_then(|index| self.inverters.get(index))
            .map(|inverter| inverter.serialno.as_str())
    }

    pub fn selected_settings(&self) -> Option<&CurrentSettings> {
        self.store.get(self.selected_serial()?)
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn busy(&self) -> bool {
        self.busy
    }

    pub fn editing(&self) -> bool {
        self.editing
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn modal(&self) -> Option<&ConfirmModal> {
        self.modal.as_ref()
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    /// Whether a control matches the last values read back from the selected
    /// inverter. Nothing is active while the settings are unknown. Charge
    /// current has no readback, so it never shows as active.
    pub fn is_active(&self, control: ControlId) -> bool {
        let Some(settings) = self.selected_settings() else {
            return false;
        };

        match control {
            ControlId::Output(value) => settings.output_source_priority == value.as_str(),
            ControlId::Charger(value) => settings.charger_source_priority == value.as_str(),
            ControlId::ChargeCurrent => false,
        }
    }

    pub fn selector_placeholder(&self) -> Option<&'static str> {
        match self.list_status {
            ListStatus::Loading => Some("Loading inverters..."),
            ListStatus::Failed => Some("Failed to load inverters"),
            ListStatus::Loaded if self.inverters.is_empty() => Some("No inverters found"),
            ListStatus::Loaded => None,
        }
    }

    pub fn set_layout(&mut self, layout: PanelLayout) {
        self.layout = layout;
    }
    // }}}

    // Input handling {{{
    pub fn handle_key(&mut self, key: KeyEvent) -> Vec<PanelAction> {
        // Raw mode turns Ctrl-C into an ordinary key event, so this is the
        // one binding that must work in every mode.
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return vec![PanelAction::Quit];
        }

        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }

        if self.editing {
            return self.handle_input_key(key);
        }

        if key.code == KeyCode::Char('q') {
            return vec![PanelAction::Quit];
        }

        if self.busy {
            return Vec::new();
        }

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous();
                Vec::new()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next();
                Vec::new()
            }
            KeyCode::Char('r') => {
                self.list_status = ListStatus::Loading;
                vec![PanelAction::Reload]
            }
            KeyCode::Char('c') => {
                self.editing = true;
                Vec::new()
            }
            KeyCode::Char(c @ '1'..='3') => {
                let value = OutputSourcePriority::all()[c as usize - '1' as usize];
                self.request_control(ControlId::Output(value))
            }
            KeyCode::Char(c @ '4'..='7') => {
                let value = ChargerSourcePriority::all()[c as usize - '4' as usize];
                self.request_control(ControlId::Charger(value))
            }
            _ => Vec::new(),
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Vec<PanelAction> {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => self.resolve_modal(true),
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => self.resolve_modal(false),
            // everything else is swallowed while confirming
            _ => Vec::new(),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) -> Vec<PanelAction> {
        match key.code {
            KeyCode::Enter => {
                let actions = self.request_control(ControlId::ChargeCurrent);
                if self.modal.is_some() {
                    self.editing = false;
                }
                actions
            }
            KeyCode::Esc => {
                self.editing = false;
                Vec::new()
            }
            KeyCode::Backspace => {
                self.input.pop();
                Vec::new()
            }
            KeyCode::Char(c) if c.is_ascii_digit() && self.input.len() < MAX_AMPS_DIGITS => {
                self.input.push(c);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<PanelAction> {
        let (column, row) = (mouse.column, mouse.row);

        if let Some(modal_layout) = self.layout.modal {
            return match mouse.kind {
                MouseEventKind::Down(MouseButton::Left) => {
                    if hit(modal_layout.confirm, column, row) {
                        self.resolve_modal(true)
                    } else if hit(modal_layout.cancel, column, row)
                        || !hit(modal_layout.area, column, row)
                    {
                        // a click on the dimmed background counts as cancel
                        self.resolve_modal(false)
                    } else {
                        Vec::new()
                    }
                }
                _ => Vec::new(),
            };
        }

        if self.busy {
            return Vec::new();
        }

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => self.handle_click(column, row),
            MouseEventKind::ScrollUp if hit(self.layout.selector, column, row) => {
                self.scroll_by(-1);
                Vec::new()
            }
            MouseEventKind::ScrollDown if hit(self.layout.selector, column, row) => {
                self.scroll_by(1);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn handle_click(&mut self, column: u16, row: u16) -> Vec<PanelAction> {
        if hit(self.layout.selector, column, row) {
            self.editing = false;
            let index = row.saturating_sub(self.layout.selector.y + 1) as usize + self.scroll;
            if index < self.inverters.len() {
                self.selected = Some(index);
            }
            return Vec::new();
        }

        if hit(self.layout.input, column, row) {
            self.editing = true;
            return Vec::new();
        }

        let control = self
            .layout
            .controls
            .iter()
            .find(|(_, area)| hit(*area, column, row))
            .map(|(control, _)| *control);
        if let Some(control) = control {
            self.editing = false;
            return self.request_control(control);
        }

        self.editing = false;
        Vec::new()
    }
    // }}}

    /// Open the confirmation modal for a control, if the preconditions hold.
    fn request_control(&mut self, control: ControlId) -> Vec<PanelAction> {
        if self.busy {
            return Vec::new();
        }

        // the control already shows the server-reported value, nothing to send
        if self.is_active(control) {
            return Vec::new();
        }

        let serialno = match self.selected_serial() {
            Some(serialno) => serialno.to_string(),
            None => {
                self.notify_error("Please select an inverter first");
                return Vec::new();
            }
        };

        let command = match control {
            ControlId::Output(value) => PanelCommand::SetOutputPriority(serialno, value),
            ControlId::Charger(value) => PanelCommand::SetChargerPriority(serialno, value),
            ControlId::ChargeCurrent => {
                let amps = self.input.trim().to_string();
                if amps.is_empty() {
                    self.notify_error("Please enter a current value");
                    return Vec::new();
                }
                PanelCommand::SetMaxChargeCurrent(serialno, amps)
            }
        };

        self.modal = Some(ConfirmModal::open(command, self.scroll));
        Vec::new()
    }

    fn resolve_modal(&mut self, confirmed: bool) -> Vec<PanelAction> {
        let Some(modal) = self.modal.take() else {
            return Vec::new();
        };

        let (command, saved_scroll) = modal.resolve();
        self.scroll = saved_scroll;

        if confirmed {
            self.busy = true;
            vec![PanelAction::Send(command)]
        } else {
            self.notify_error("Command cancelled by user");
            Vec::new()
        }
    }

    /// Fold a coordinator message into the panel state.
    pub fn apply(&mut self, data: ChannelData) {
        match data {
            ChannelData::Inverters(inverters) => {
                let previous = self.selected_serial().map(str::to_string);
                self.inverters = inverters;
                self.list_status = ListStatus::Loaded;

                self.selected = previous
                    .and_then(|serial| self.inverters.iter().position(|i| i.serialno == serial));
                if self.selected.is_none() && self.inverters.len() == 1 {
                    self.selected = Some(0);
                }

                if self.inverters.is_empty() {
                    self.notify_error("No inverters found");
                }

                self.clamp_scroll();
                if let Some(index) = self.selected {
                    self.ensure_visible(index);
                }
            }
            ChannelData::InvertersFailed => {
                self.inverters.clear();
                self.list_status = ListStatus::Failed;
                self.selected = None;
                self.scroll = 0;
                self.notify_error("Failed to load inverters");
            }
            ChannelData::SettingsBatch(batch) => {
                for (serialno, outcome) in &batch {
                    self.store.apply(serialno, outcome);
                    // NotReady is expected and stays silent; a real failure
                    // is worth a notification whichever inverter it hit
                    if let SettingsOutcome::Failed(message) = outcome {
                        self.notify_error(message.clone());
                    }
                }
            }
            ChannelData::CommandOutcome(command, result) => {
                self.busy = false;
                match result {
                    CommandResult::Success => self.notify_success(format!(
                        "{}: {}",
                        command.display_name(),
                        command.value_display()
                    )),
                    CommandResult::Failed(message) => self.notify_error(message),
                }
            }
            ChannelData::Shutdown => {}
        }
    }

    /// Drop the notification once its time is up.
    pub fn tick(&mut self, now: Instant) {
        if let Some(notification) = &self.notification {
            if notification.is_expired(now) {
                self.notification = None;
            }
        }
    }

    // Selection and scrolling {{{
    fn select_next(&mut self) {
        if self.inverters.is_empty() {
            return;
        }
        let next = match self.selected {
            Some(index) => (index + 1).min(self.inverters.len() - 1),
            None => 0,
        };
        self.selected = Some(next);
        self.ensure_visible(next);
    }

    fn select_previous(&mut self) {
        if self.inverters.is_empty() {
            return;
        }
        let previous = match self.selected {
            Some(index) => index.saturating_sub(1),
            None => 0,
        };
        self.selected = Some(previous);
        self.ensure_visible(previous);
    }

    fn selector_height(&self) -> usize {
        self.layout.selector.height.saturating_sub(2).max(1) as usize
    }

    fn ensure_visible(&mut self, index: usize) {
        let height = self.selector_height();
        if index < self.scroll {
            self.scroll = index;
        } else if index >= self.scroll + height {
            self.scroll = index + 1 - height;
        }
    }

    fn clamp_scroll(&mut self) {
        let max = self.inverters.len().saturating_sub(self.selector_height());
        if self.scroll > max {
            self.scroll = max;
        }
    }

    fn scroll_by(&mut self, delta: i32) {
        if delta < 0 {
            self.scroll = self.scroll.saturating_sub(delta.unsigned_abs() as usize);
        } else {
            let max = self.inverters.len().saturating_sub(self.selector_height());
            self.scroll = (self.scroll + delta as usize).min(max);
        }
    }
    // }}}

    fn notify_success(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::success(message));
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification::error(message));
    }
}
