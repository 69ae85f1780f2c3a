//! Parley CLI library: terminal chat over a [`ChatSession`].
//!
//! - [`render`]: text rendering of session state.
//! - [`chat_loop`]: read lines, submit them, print what the session appends.
//! - [`ChatOptions`] / [`build_session`]: wire gateway, store and user from flags.

pub mod render;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use parley::{
    ChatSession, ConversationStore, Gateway, HttpGateway, SettingsError, SqliteMessageStore,
    StoreError, StoreOptions, SubmitOutcome, UserProfile,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("azure settings: {0}")]
    Settings(#[from] SettingsError),
    #[error("history store: {0}")]
    Store(#[from] StoreError),
    #[error("--history-db needs --user-id")]
    HistoryWithoutUser,
}

/// How the terminal chat reaches a completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GatewayTarget {
    /// POST to a running server's `/api/chat`.
    Remote(String),
    /// Call Azure OpenAI in-process with settings from the environment.
    Local,
}

#[derive(Clone, Debug)]
pub struct ChatOptions {
    pub target: GatewayTarget,
    pub user_id: Option<String>,
    pub display_name: Option<String>,
    pub history_db: Option<PathBuf>,
    pub store_options: StoreOptions,
}

impl Default for ChatOptions {
    fn default() -> Self {
        Self {
            target: GatewayTarget::Remote(DEFAULT_SERVER_URL.to_string()),
            user_id: None,
            display_name: None,
            history_db: None,
            store_options: StoreOptions::default(),
        }
    }
}

pub fn build_gateway(target: &GatewayTarget) -> Result<Arc<dyn Gateway>, CliError> {
    match target {
        GatewayTarget::Remote(url) => {
            info!(url = %url, "using remote gateway");
            Ok(Arc::new(HttpGateway::new(url)))
        }
        GatewayTarget::Local => Ok(serve::gateway_from_env()?),
    }
}

/// Builds an unmounted session. History needs both a user and a database path.
pub fn build_session(options: &ChatOptions) -> Result<ChatSession, CliError> {
    let mut session = ChatSession::new(build_gateway(&options.target)?);
    let user = options.user_id.as_ref().map(|uid| {
        let user = UserProfile::new(uid.clone());
        match &options.display_name {
            Some(name) => user.with_display_name(name.clone()),
            None => user,
        }
    });
    match (&options.history_db, user) {
        (Some(path), Some(user)) => {
            let backend = SqliteMessageStore::new(path)?;
            info!(path = %path.display(), user_id = %user.uid, "conversation history enabled");
            session = session
                .with_store(ConversationStore::with_options(
                    Arc::new(backend),
                    options.store_options,
                ))
                .with_user(user);
        }
        (Some(_), None) => return Err(CliError::HistoryWithoutUser),
        (None, Some(user)) => session = session.with_user(user),
        (None, None) => {}
    }
    Ok(session)
}

fn is_quit_command(s: &str) -> bool {
    matches!(s.trim(), "/quit" | "/exit")
}

/// Mounts the session, prints it, then runs one turn per input line until EOF or `/quit`.
///
/// Blank lines are ignored. Pending history writes are flushed before returning.
pub async fn chat_loop<R, W>(session: &mut ChatSession, input: R, out: &mut W) -> Result<(), CliError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    session.mount().await;
    writeln!(
        out,
        "{}",
        render::render_session(session.user(), session.messages(), session.is_busy())
    )?;

    let gateway = session.gateway();
    let mut lines = input.lines();
    loop {
        write!(out, "> ")?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if is_quit_command(&line) {
            break;
        }

        session.set_input(line);
        let turn = match session.begin_submit() {
            SubmitOutcome::Started(turn) => turn,
            SubmitOutcome::Ignored(_) => continue,
        };
        if let Some(user_message) = session.messages().last() {
            writeln!(out, "{}", render::render_message(user_message))?;
        }
        writeln!(out, "{}", render::BUSY_INDICATOR)?;
        out.flush()?;

        let result = gateway.complete(&turn.request).await;
        if let Some(reply) = session.finish_turn(result) {
            writeln!(out, "{}", render::render_message(reply))?;
        }
    }

    for failure in session.flush_persistence().await {
        warn!(message_id = %failure.message_id, "message not saved: {}", failure.error);
    }
    Ok(())
}
