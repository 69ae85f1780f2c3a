//! Parley CLI binary.
//!
//! Subcommands: `serve` (HTTP chat server), `chat` (terminal chat). Without a subcommand the
//! terminal chat runs; its flags are accepted at the top level.

use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use cli::{build_session, chat_loop, ChatOptions, GatewayTarget, DEFAULT_SERVER_URL};
use parley::StoreOptions;
use tokio::io::BufReader;

#[derive(Parser, Debug)]
#[command(name = "parley")]
#[command(about = "Parley: AI chat server and terminal client")]
struct Args {
    #[command(subcommand)]
    cmd: Option<Command>,

    #[command(flatten)]
    chat: ChatArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (POST /api/chat)
    Serve(ServeArgs),
    /// Chat from the terminal (same as no subcommand)
    Chat,
}

#[derive(ClapArgs, Debug)]
struct ServeArgs {
    /// Listen address (default PARLEY_SERVE_ADDR or 127.0.0.1:3000)
    #[arg(long, value_name = "ADDR")]
    addr: Option<String>,
    /// Exit after the first chat request
    #[arg(long)]
    once: bool,
}

#[derive(ClapArgs, Debug)]
struct ChatArgs {
    /// Server origin for the completion route
    #[arg(long, global = true, value_name = "URL", env = "PARLEY_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    server: String,
    /// Call Azure OpenAI in-process instead of a server
    #[arg(long, global = true)]
    local: bool,
    /// User id that owns the conversation history
    #[arg(long, global = true, value_name = "ID")]
    user_id: Option<String>,
    /// Display name shown in the header
    #[arg(long, global = true, value_name = "NAME")]
    display_name: Option<String>,
    /// SQLite file for conversation history (needs --user-id)
    #[arg(long, global = true, value_name = "PATH", env = "PARLEY_HISTORY_DB")]
    history_db: Option<PathBuf>,
    /// Key stored records by message id so a message is saved at most once
    #[arg(long, global = true)]
    idempotent_writes: bool,
}

impl ChatArgs {
    fn into_options(self) -> ChatOptions {
        let mut store_options = StoreOptions::from_env();
        store_options.idempotent_writes |= self.idempotent_writes;
        ChatOptions {
            target: if self.local {
                GatewayTarget::Local
            } else {
                GatewayTarget::Remote(self.server)
            },
            user_id: self.user_id,
            display_name: self.display_name,
            history_db: self.history_db,
            store_options,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    config::load_and_apply("parley", None::<&std::path::Path>).ok();
    let _log_guard = config::init_tracing(&config::TracingOptions::from_env("parley"))?;

    let args = Args::parse();

    match args.cmd {
        Some(Command::Serve(sa)) => {
            let gateway = match serve::gateway_from_env() {
                Ok(g) => g,
                Err(e) => {
                    eprintln!("serve error: {}", e);
                    std::process::exit(1);
                }
            };
            let addr = sa.addr.unwrap_or_else(|| serve::ServeConfig::from_env().addr);
            if let Err(e) = serve::run_serve(Some(&addr), gateway, sa.once).await {
                eprintln!("serve error: {}", e);
                std::process::exit(1);
            }
        }
        Some(Command::Chat) | None => run_chat(args.chat).await?,
    }
    Ok(())
}

async fn run_chat(args: ChatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = build_session(&args.into_options())?;
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    chat_loop(&mut session, stdin, &mut stdout).await?;
    println!("Bye.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_flags_without_subcommand() {
        let args = Args::try_parse_from([
            "parley",
            "--user-id",
            "alice",
            "--server",
            "http://127.0.0.1:9",
            "--idempotent-writes",
        ])
        .unwrap();
        assert!(args.cmd.is_none());
        assert_eq!(args.chat.user_id.as_deref(), Some("alice"));
        assert_eq!(args.chat.server, "http://127.0.0.1:9");
        assert!(args.chat.idempotent_writes);
        assert!(!args.chat.local);
    }

    #[test]
    fn chat_flags_after_chat_subcommand() {
        let args =
            Args::try_parse_from(["parley", "chat", "--local", "--display-name", "Ann"]).unwrap();
        assert!(matches!(args.cmd, Some(Command::Chat)));
        assert!(args.chat.local);
        assert_eq!(args.chat.display_name.as_deref(), Some("Ann"));
    }

    #[test]
    fn serve_subcommand_parses() {
        let args = Args::try_parse_from(["parley", "serve", "--addr", "0.0.0.0:8080", "--once"])
            .unwrap();
        match args.cmd {
            Some(Command::Serve(sa)) => {
                assert_eq!(sa.addr.as_deref(), Some("0.0.0.0:8080"));
                assert!(sa.once);
            }
            other => panic!("expected serve, got {:?}", other),
        }
    }

    #[test]
    fn local_flag_selects_in_process_gateway() {
        let args = Args::try_parse_from(["parley", "--local"]).unwrap();
        assert_eq!(args.chat.into_options().target, GatewayTarget::Local);
    }
}
