use crate::prelude::*;

pub mod widgets;

use crate::panel::PanelAction;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::time::{Duration, Instant};

/// Puts the terminal back into cooked mode. Held for the lifetime of the
/// event loop so a panic inside a draw call cannot leave the terminal raw.
struct RestoreGuard;

impl Drop for RestoreGuard {
    fn drop(&mut self) {
        let _ = io::stdout().execute(DisableMouseCapture);
        let _ = io::stdout().execute(LeaveAlternateScreen);
        let _ = disable_raw_mode();
    }
}

/// Owns the terminal and drives the panel state machine. Input events and
/// coordinator messages are folded into `PanelState`; the resulting actions
/// are forwarded to the coordinator.
#[derive(Clone)]
pub struct Tui {
    config: ConfigWrapper,
    channels: Channels,
    shutdown: broadcast::Sender<()>,
}

impl Tui {
    pub fn new(config: ConfigWrapper, channels: Channels, shutdown: broadcast::Sender<()>) -> Self {
        Self {
            config,
            channels,
            shutdown,
        }
    }

    pub async fn start(&self) -> Result<()> {
        let result = self.run().await;

        // The application waits on this signal; it has to fire no matter how
        // the UI ended.
        let _ = self.shutdown.send(());

        result
    }

    async fn run(&self) -> Result<()> {
        io::stdout().execute(EnterAlternateScreen)?;
        io::stdout().execute(EnableMouseCapture)?;
        enable_raw_mode()?;
        let _guard = RestoreGuard;

        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        let result = self.event_loop(&mut terminal).await;
        if let Err(e) = &result {
            error!("Terminal UI failed: {}", e);
        }
        result
    }

    async fn event_loop(
        &self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let mut receiver = self.channels.to_panel.subscribe();
        let mut state = PanelState::new();
        let gateway_url = self.config.gateway().url().to_string();

        // Ask for the inverter list right away; everything else follows from
        // what comes back.
        if self
            .channels
            .to_coordinator
            .send(coordinator::ChannelData::LoadInverters)
            .is_err()
        {
            bail!("send(to_coordinator) failed - channel closed?");
        }

        loop {
            let mut layout = crate::panel::PanelLayout::default();
            terminal.draw(|frame| {
                layout = widgets::draw(frame, &state, &gateway_url);
            })?;
            state.set_layout(layout);

            loop {
                match receiver.try_recv() {
                    Ok(panel::ChannelData::Shutdown) => return Ok(()),
                    Ok(data) => state.apply(data),
                    Err(broadcast::error::TryRecvError::Empty) => break,
                    Err(broadcast::error::TryRecvError::Lagged(count)) => {
                        warn!("panel channel lagged, skipped {} messages", count);
                    }
                    Err(broadcast::error::TryRecvError::Closed) => return Ok(()),
                }
            }

            if event::poll(Duration::from_millis(50))? {
                let actions = match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => state.handle_key(key),
                    Event::Mouse(mouse) => state.handle_mouse(mouse),
                    _ => Vec::new(),
                };

                for action in actions {
                    match action {
                        PanelAction::Send(command) => {
                            if self
                                .channels
                                .to_coordinator
                                .send(coordinator::ChannelData::SendCommand(command))
                                .is_err()
                            {
                                bail!("send(to_coordinator) failed - channel closed?");
                            }
                        }
                        PanelAction::Reload => {
                            if self
                                .channels
                                .to_coordinator
                                .send(coordinator::ChannelData::LoadInverters)
                                .is_err()
                            {
                                bail!("send(to_coordinator) failed - channel closed?");
                            }
                        }
                        PanelAction::Quit => return Ok(()),
                    }
                }
            }

            state.tick(Instant::now());
        }
    }
}
