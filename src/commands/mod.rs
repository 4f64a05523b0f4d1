pub mod auth;
pub mod help;
pub mod history;
pub mod profile;
pub mod send;
pub mod watch;

use std::sync::Arc;

use tracing::debug;

use crate::app::App;

/// What the console loop should do after a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub async fn handle_line(app: &Arc<App>, line: &str) -> Flow {
    // Parse command and arguments
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.is_empty() {
        return Flow::Continue;
    }

    let command = parts[0].to_lowercase();
    let args = &parts[1..];
    debug!("Dispatching command {}", command);

    let result = match command.as_str() {
        "help" | "?" => help::execute(args),
        "login" => auth::login(app, args).await,
        "register" => auth::register(app, args).await,
        "logout" => auth::logout(app),
        "profile" | "me" => profile::execute(app, args).await,
        "balance" | "bal" => profile::balance(app).await,
        "history" | "tx" => history::execute(app, args).await,
        "send" | "transfer" => send::execute(app, args).await,
        "watch" => watch::start(app).await,
        "unwatch" => watch::stop(app).await,
        "quit" | "exit" => return Flow::Quit,
        other => Err(format!("Unknown command `{}`. Type `help` for a list.", other)),
    };

    if let Err(e) = result {
        debug!("Command {} refused: {}", command, e);
        println!("❌ {}", e);
    }

    Flow::Continue
}
