//! Line-oriented shell and entry point.
//!
//! This binary is the thin integration layer between the shelter library and
//! a terminal. It reads one command per line, maps it to an [`Event`], runs
//! the resulting actions and re-renders.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │   Main Thread           │
//! │  ┌──────────────────┐   │
//! │  │  Shell           │   │  ← UI state, auth session, event handling
//! │  └──────────────────┘   │
//! │          │ JSON         │
//! │          ▼ (mpsc)       │
//! │  ┌──────────────────┐   │
//! │  │ ShelterWorker    │   │  ← Storage operations
//! │  │ (worker thread)  │   │
//! │  └──────────────────┘   │
//! └─────────────────────────┘
//! ```
//!
//! # Worker Communication
//!
//! Messages between the shell and the worker use JSON serialization:
//!
//! - Shell → Worker: [`WorkerMessage`] (`LoadListings`, `SetFavorite`, etc.)
//! - Worker → Shell: [`WorkerResponse`] (`ListingsLoaded`, `FavoriteSynced`, etc.)
//!
//! The worker handles messages one at a time, so responses arrive in the
//! order their requests were posted. After each command the shell waits for
//! every outstanding response before rendering.

use shelter::app::{EventTab, LoginForm, NewListingForm, SignUpForm};
use shelter::auth::{AuthSession, IdentityProvider};
use shelter::catalog::CategoryFilter;
use shelter::worker::{ShelterWorker, WorkerMessage, WorkerResponse};
use shelter::{handle_event, Action, AppState, Config, Event, ShelterError};
use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

/// Rows the renderer lays the list out for.
const SCREEN_ROWS: usize = 24;

const HELP: &str = "\
commands:
  j / k                  move selection down / up
  open | back            open the selected record / close it
  /text                  search (a lone / clears the query)
  c [all|dog|cat|other]  set or cycle the category filter
  animals | events | favorites
  upcoming | past        switch the events tab
  fav [id]               toggle favorite
  adopt [id]             request adoption
  register [id]          register for an event
  add name|age|category|description|photo,photo
  login <email> <password>
  signup <name> <email> <password> <confirm> [phone]
  logout | refresh | ok | help | q";

/// Spawns the storage worker thread.
///
/// The worker answers each JSON request with one JSON line; an undecodable
/// request gets an empty reply so the shell's pending count stays in step.
fn spawn_worker(mut worker: ShelterWorker) -> (Sender<String>, Receiver<String>, JoinHandle<()>) {
    let (request_tx, request_rx) = mpsc::channel::<String>();
    let (response_tx, response_rx) = mpsc::channel::<String>();

    let handle = thread::spawn(move || {
        let span = tracing::debug_span!("worker_thread");
        let _guard = span.entered();

        for payload in request_rx {
            let reply = worker.on_message(&payload).unwrap_or_default();
            if response_tx.send(reply).is_err() {
                break;
            }
        }
        tracing::debug!("worker thread exiting");
    });

    (request_tx, response_rx, handle)
}

struct Shell {
    app: AppState,
    session: AuthSession,
    provider: Box<dyn IdentityProvider>,
    to_worker: Sender<String>,
    from_worker: Receiver<String>,
    pending: usize,
    running: bool,
}

impl Shell {
    fn new(
        to_worker: Sender<String>,
        from_worker: Receiver<String>,
        provider: Box<dyn IdentityProvider>,
    ) -> Self {
        let session = AuthSession::init(provider.as_ref());
        Self {
            app: AppState::new(),
            session,
            provider,
            to_worker,
            from_worker,
            pending: 0,
            running: true,
        }
    }

    /// Runs one event to quiescence: its actions, the auth outcomes they
    /// produce, and every worker response they trigger.
    fn dispatch(&mut self, event: Event) {
        let mut queue = VecDeque::from([event]);

        loop {
            while let Some(event) = queue.pop_front() {
                self.handle(&event, &mut queue);
            }

            if self.pending == 0 {
                break;
            }
            match self.from_worker.recv() {
                Ok(payload) => {
                    self.pending -= 1;
                    if let Some(event) = Self::map_worker_payload(&payload) {
                        queue.push_back(event);
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, "worker channel closed");
                    self.pending = 0;
                }
            }
        }
    }

    fn handle(&mut self, event: &Event, queue: &mut VecDeque<Event>) {
        let span = tracing::debug_span!("shell_event", event = ?std::mem::discriminant(event));
        let _guard = span.entered();

        match handle_event(&mut self.app, &self.session, event) {
            Ok((should_render, actions)) => {
                tracing::debug!(
                    action_count = actions.len(),
                    should_render = should_render,
                    "event handled successfully"
                );
                for action in &actions {
                    if let Some(next) = self.execute_action(action) {
                        queue.push_back(next);
                    }
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "error handling event");
            }
        }
    }

    fn map_worker_payload(payload: &str) -> Option<Event> {
        match serde_json::from_str::<WorkerResponse>(payload) {
            Ok(response) => {
                tracing::debug!(response = ?response, "worker response received");
                Some(Event::WorkerResponse(response))
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to deserialize worker response");
                None
            }
        }
    }

    fn post_worker_message(&mut self, message: &WorkerMessage) {
        match serde_json::to_string(message) {
            Ok(payload) => {
                tracing::debug!(payload_len = payload.len(), "posting message to worker");
                if self.to_worker.send(payload).is_ok() {
                    self.pending += 1;
                } else {
                    tracing::warn!("worker thread is gone, dropping message");
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "failed to serialize worker message");
            }
        }
    }

    /// Executes an action, returning the follow-up event for auth actions.
    #[tracing::instrument(level = "debug", skip(self))]
    fn execute_action(&mut self, action: &Action) -> Option<Event> {
        match action {
            Action::Close => {
                self.running = false;
                None
            }
            Action::PostToWorker(message) => {
                self.post_worker_message(message);
                None
            }
            Action::RedirectToLogin => {
                println!("Sign in to continue: login <email> <password>");
                None
            }
            Action::SignIn { email, password } => Some(auth_outcome(
                self.session
                    .sign_in(self.provider.as_mut(), email, password)
                    .cloned(),
            )),
            Action::SignUp(sign_up) => Some(auth_outcome(
                self.session
                    .sign_up(self.provider.as_mut(), sign_up.clone())
                    .cloned(),
            )),
            Action::SignOut => {
                if let Err(e) = self.session.sign_out(self.provider.as_mut()) {
                    tracing::warn!(error = %e, "provider sign-out failed");
                }
                Some(Event::SignedOut)
            }
        }
    }

    fn render(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Some(who) = self.session.identity() {
            writeln!(out, "[{}] {}", who.initial(), who.display_name)?;
        }
        shelter::ui::render(&self.app, SCREEN_ROWS, &mut out)?;
        out.flush()
    }
}

fn auth_outcome(result: shelter::Result<shelter::domain::Identity>) -> Event {
    match result {
        Ok(identity) => Event::SignedIn(identity),
        Err(ShelterError::Auth(error)) => Event::AuthFailed(error),
        Err(e) => {
            tracing::warn!(error = %e, "auth provider failed");
            Event::DismissNotice
        }
    }
}

/// Parses one input line against the current state.
///
/// Commands that take an optional id default to the selected row.
fn parse_command(line: &str, app: &AppState) -> Result<Option<Event>, String> {
    let line = line.trim();
    if let Some(query) = line.strip_prefix('/') {
        return Ok(Some(Event::SetQuery(query.trim().to_string())));
    }

    let (command, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(c, r)| (c, r.trim()));
    let target = |what: &str| -> Result<String, String> {
        if rest.is_empty() {
            app.selected_id()
                .map(ToString::to_string)
                .ok_or_else(|| format!("nothing selected to {what}"))
        } else {
            Ok(rest.to_string())
        }
    };

    let event = match command {
        "" | "help" | "?" => return Ok(None),
        "j" | "down" => Event::KeyDown,
        "k" | "up" => Event::KeyUp,
        "q" | "quit" => Event::CloseFocus,
        "open" => Event::OpenSelected,
        "back" => Event::CloseDetail,
        "c" | "category" if rest.is_empty() => Event::CycleCategory,
        "c" | "category" => Event::SetCategory(
            rest.parse::<CategoryFilter>()
                .map_err(|e| e.to_string())?,
        ),
        "animals" => Event::ShowAnimals,
        "events" => Event::ShowEvents,
        "favorites" => Event::ShowFavorites,
        "upcoming" => Event::SwitchEventTab(EventTab::Upcoming),
        "past" => Event::SwitchEventTab(EventTab::Past),
        "fav" => Event::ToggleFavorite {
            listing_id: target("favorite")?,
        },
        "adopt" => Event::RequestAdoption {
            listing_id: target("adopt")?,
        },
        "register" => Event::RegisterForEvent {
            event_id: target("register for")?,
        },
        "add" => Event::SubmitListing(parse_listing_form(rest)),
        "login" => {
            let mut words = rest.split_whitespace();
            Event::SubmitLogin(LoginForm {
                email: words.next().unwrap_or_default().to_string(),
                password: words.next().unwrap_or_default().to_string(),
            })
        }
        "signup" => {
            let mut words = rest.split_whitespace();
            let mut next = || words.next().unwrap_or_default().to_string();
            Event::SubmitSignUp(SignUpForm {
                name: next(),
                email: next(),
                password: next(),
                confirm_password: next(),
                phone: next(),
            })
        }
        "logout" => Event::SignOut,
        "refresh" => Event::Refresh,
        "ok" => Event::DismissNotice,
        other => return Err(format!("unknown command: {other} (try help)")),
    };

    Ok(Some(event))
}

/// `name|age|category|description|photo,photo`; missing parts stay empty so
/// validation can name them.
fn parse_listing_form(rest: &str) -> NewListingForm {
    let mut parts = rest.split('|').map(str::trim);
    let mut next = || parts.next().unwrap_or_default().to_string();

    NewListingForm {
        name: next(),
        age: next(),
        category: next(),
        description: next(),
        images: next()
            .split(',')
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(String::from)
            .collect(),
    }
}

fn main() {
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("shelter: {e}");
            std::process::exit(2);
        }
    };
    shelter::observability::init_tracing(&config);

    let span = tracing::debug_span!("shell_start");
    let guard = span.entered();

    let worker = match ShelterWorker::from_config(&config) {
        Ok(worker) => worker,
        Err(e) => {
            tracing::error!(error = %e, "failed to open storage");
            eprintln!("shelter: {e}");
            std::process::exit(1);
        }
    };
    let provider = match shelter::auth::provider_from_config(&config) {
        Ok(provider) => provider,
        Err(e) => {
            tracing::error!(error = %e, "failed to open accounts");
            eprintln!("shelter: {e}");
            std::process::exit(1);
        }
    };
    let (to_worker, from_worker, worker_thread) = spawn_worker(worker);
    let mut shell = Shell::new(to_worker, from_worker, provider);
    tracing::debug!(signed_in = shell.provider.current_identity().is_some(), "shell ready");
    drop(guard);

    shell.dispatch(Event::Mount);
    if let Err(e) = shell.render() {
        tracing::warn!(error = %e, "render failed");
    }

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read input");
                break;
            }
        };

        match parse_command(&line, &shell.app) {
            Ok(Some(event)) => shell.dispatch(event),
            Ok(None) => {
                println!("{HELP}");
                continue;
            }
            Err(message) => {
                println!("{message}");
                continue;
            }
        }

        if !shell.running {
            break;
        }
        if let Err(e) = shell.render() {
            tracing::warn!(error = %e, "render failed");
        }
    }

    // Closing the request channel ends the worker loop, which drops the
    // storage and flushes it.
    drop(shell);
    if worker_thread.join().is_err() {
        tracing::error!("worker thread panicked");
    }
}
