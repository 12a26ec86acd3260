//! Full-screen chat terminal.
//!
//! One task owns the screen. Terminal events arrive from a reader task,
//! chat replies and login answers from spawned request tasks, and a frame
//! tick drives the reveal animation and the typing indicator.

pub mod login_form;
pub mod renderer;
pub mod reveal;
pub mod state;

use std::{
    error::Error,
    sync::Arc,
    time::{Duration, Instant},
};

use ratatui::crossterm::event::{self, Event, KeyEventKind};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::admin::backend::AdminBackend;
use crate::admin::login::{submit_login, LoginOutcome};
use crate::api::Settings;
use crate::core::exchange::{ChatBackend, ChatExchange, ExchangeEffect, ExchangeResult};
use crate::core::session::Session;
use crate::ui::lifecycle::{restore_terminal, setup_terminal, ChatTerminal};
use crate::utils::logging::LoggingState;

use renderer::{draw, ChatView};
use state::{ChatUi, LocalCommand, UiCommand, HELP_TEXT};

/// System lines shown before the first message; never written to the log.
pub const WELCOME_LINES: [&str; 2] = [
    Settings::DEFAULT_GREETING,
    "Type a message to start the conversation...",
];

const FRAME: Duration = Duration::from_millis(16);
const INDICATOR_FRAME: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub username: Option<String>,
    pub reveal_interval_ms: u64,
    pub log_file: Option<String>,
    pub email_hint: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatExit {
    Quit,
    /// Admin credentials were accepted; the caller opens the console.
    Admin,
}

fn spawn_event_reader(event_tx: mpsc::UnboundedSender<Event>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            if let Ok(true) = event::poll(Duration::from_millis(10)) {
                match event::read() {
                    Ok(ev) => {
                        if event_tx.send(ev).is_err() {
                            break;
                        }
                    }
                    Err(_) => continue,
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    })
}

struct ChatLoop<B: ChatBackend + AdminBackend> {
    backend: Arc<B>,
    exchange: ChatExchange<B>,
    ui: ChatUi,
    logging: LoggingState,
    logged: usize,
    login_tx: mpsc::UnboundedSender<LoginOutcome>,
    started: Instant,
}

impl<B: ChatBackend + AdminBackend> ChatLoop<B> {
    fn draw(&self, terminal: &mut ChatTerminal) -> Result<(), Box<dyn Error>> {
        let frame = (self.started.elapsed().as_millis() / INDICATOR_FRAME.as_millis()) as usize;
        let view = ChatView {
            transcript: self.exchange.transcript(),
            ui: &self.ui,
            loading: self.exchange.is_loading(),
            username: self.exchange.session().username(),
            logging_status: self.logging.get_status_string(),
            frame,
        };
        terminal.draw(|f| draw(f, &view))?;
        Ok(())
    }

    /// Append transcript entries added since the last call to the log file.
    fn log_new_messages(&mut self) {
        let transcript = self.exchange.transcript();
        let failure = transcript[self.logged..]
            .iter()
            .find_map(|message| self.logging.log_message(message).err());
        self.logged = transcript.len();
        if let Some(err) = failure {
            self.exchange.push_error(format!("Logging error: {err}"));
            self.logged += 1;
        }
    }

    fn apply_effect(&mut self, effect: ExchangeEffect) {
        match effect {
            ExchangeEffect::OpenLogin => self.ui.open_login(),
            ExchangeEffect::Sent => self.ui.reveal.finish(),
            ExchangeEffect::Reply { index } => {
                if let Some(message) = self.exchange.transcript().get(index) {
                    self.ui.reveal.start(index, &message.content, Instant::now());
                }
            }
            ExchangeEffect::Failed | ExchangeEffect::Nothing => {}
        }
    }

    fn run_local(&mut self, command: LocalCommand) {
        match command {
            LocalCommand::Help => self.exchange.push_system(HELP_TEXT),
            LocalCommand::Log(Some(path)) => match self.logging.set_log_file(path) {
                Ok(message) => self.exchange.push_system(message),
                Err(err) => self
                    .exchange
                    .push_error(format!("Could not open log file: {err}")),
            },
            LocalCommand::Log(None) => match self.logging.toggle_logging() {
                Ok(message) => self.exchange.push_system(message),
                Err(err) => self.exchange.push_error(err.to_string()),
            },
            LocalCommand::Quit => {}
        }
    }

    fn spawn_login(&self, email: String, password: String) {
        let backend = Arc::clone(&self.backend);
        let tx = self.login_tx.clone();
        tokio::spawn(async move {
            let outcome = submit_login(backend.as_ref(), &email, &password).await;
            let _ = tx.send(outcome);
        });
    }

    /// Returns whether to redraw, and the exit reason when the loop should stop.
    fn handle_command(&mut self, command: UiCommand) -> (bool, Option<ChatExit>) {
        match command {
            UiCommand::None => (false, None),
            UiCommand::Redraw => (true, None),
            UiCommand::Quit => (true, Some(ChatExit::Quit)),
            UiCommand::Send(text) => {
                let effect = self.exchange.submit(&text);
                self.apply_effect(effect);
                (true, None)
            }
            UiCommand::Local(LocalCommand::Quit) => (true, Some(ChatExit::Quit)),
            UiCommand::Local(command) => {
                self.run_local(command);
                (true, None)
            }
            UiCommand::Login { email, password } => {
                debug!("submitting admin login");
                self.spawn_login(email, password);
                (true, None)
            }
        }
    }

    async fn run(
        &mut self,
        terminal: &mut ChatTerminal,
        event_rx: &mut mpsc::UnboundedReceiver<Event>,
        reply_rx: &mut mpsc::UnboundedReceiver<ExchangeResult>,
        login_rx: &mut mpsc::UnboundedReceiver<LoginOutcome>,
    ) -> Result<ChatExit, Box<dyn Error>> {
        let mut ticker = tokio::time::interval(FRAME);
        let mut redraw = true;
        let mut last_indicator = Instant::now();

        loop {
            self.log_new_messages();
            if redraw {
                self.draw(terminal)?;
                redraw = false;
            }

            tokio::select! {
                Some(ev) = event_rx.recv() => {
                    let busy = self.exchange.is_loading();
                    let command = match ev {
                        Event::Key(key) if key.kind == KeyEventKind::Press => {
                            self.ui.handle_key(&key, busy)
                        }
                        Event::Paste(text) => self.ui.handle_paste(&text),
                        Event::Resize(_, _) => UiCommand::Redraw,
                        _ => UiCommand::None,
                    };
                    let (changed, exit) = self.handle_command(command);
                    if let Some(exit) = exit {
                        return Ok(exit);
                    }
                    redraw |= changed;
                }
                Some(result) = reply_rx.recv() => {
                    let effect = self.exchange.settle(result);
                    self.apply_effect(effect);
                    redraw = true;
                }
                Some(outcome) = login_rx.recv() => {
                    let accepted = self
                        .ui
                        .login
                        .as_mut()
                        .is_some_and(|form| form.settle(outcome));
                    if accepted {
                        info!("admin login accepted from chat");
                        return Ok(ChatExit::Admin);
                    }
                    redraw = true;
                }
                _ = ticker.tick() => {
                    let now = Instant::now();
                    redraw |= self.ui.reveal.tick(now);
                    if self.exchange.is_loading() && now.duration_since(last_indicator) >= INDICATOR_FRAME {
                        last_indicator = now;
                        redraw = true;
                    }
                }
            }
        }
    }
}

/// Push the welcome lines and return how many transcript entries they use.
fn greet<B: ChatBackend>(exchange: &mut ChatExchange<B>) -> usize {
    for line in WELCOME_LINES {
        exchange.push_system(line);
    }
    exchange.transcript().len()
}

pub async fn run_chat<B>(backend: Arc<B>, options: ChatOptions) -> Result<ChatExit, Box<dyn Error>>
where
    B: ChatBackend + AdminBackend,
{
    let logging = LoggingState::new(options.log_file)?;
    let session = Session::with_username(options.username);
    let (mut exchange, mut reply_rx) = ChatExchange::new(Arc::clone(&backend), session);
    let greeted = greet(&mut exchange);
    let (login_tx, mut login_rx) = mpsc::unbounded_channel();

    let mut chat = ChatLoop {
        backend,
        exchange,
        ui: ChatUi::new(options.reveal_interval_ms, options.email_hint),
        logging,
        logged: greeted,
        login_tx,
        started: Instant::now(),
    };

    let mut terminal = setup_terminal()?;
    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let reader = spawn_event_reader(event_tx);

    let result = chat
        .run(&mut terminal, &mut event_rx, &mut reply_rx, &mut login_rx)
        .await;

    reader.abort();
    restore_terminal(&mut terminal)?;
    result
}
