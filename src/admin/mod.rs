//! Admin console: login, panel switching and record management.

pub mod backend;
pub mod commands;
pub mod console;
pub mod forms;
pub mod login;
pub mod panels;
pub mod prompt;
pub mod registry;

use std::io;
use std::sync::Arc;

pub use backend::{AdminBackend, Mutation};
pub use console::{AdminConsole, ConsoleExit};

use prompt::ConsoleIo;

/// Log in (unless the caller already has a session) and run the console.
///
/// Returns `None` when the user abandoned the login prompt.
pub async fn run_admin<B: AdminBackend>(
    backend: Arc<B>,
    io: &mut dyn ConsoleIo,
    email_hint: Option<&str>,
    already_authenticated: bool,
) -> io::Result<Option<ConsoleExit>> {
    if !already_authenticated && !login::login_prompt(backend.as_ref(), io, email_hint).await? {
        return Ok(None);
    }
    let mut console = AdminConsole::new(backend);
    console.run(io).await.map(Some)
}
