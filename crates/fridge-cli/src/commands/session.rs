//! Interactive session loop.
//!
//! Reads one command per line from stdin. The session, the scheduler task and
//! any in-flight uploads share a single [`SharedSession`], so every command
//! and every reconciliation pass runs to completion under the lock before the
//! next one starts.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Utc;
use clap::Args;
use fridge_core::{
    upload_latest, Config, CoreError, Event, FridgeSession, RecognitionClient, Scheduler,
    SharedSession,
};
use tokio::sync::mpsc;
use tracing::debug;

const HELP: &str = "\
commands:
  capture <path>     queue a photo (newest is uploaded)
  upload             upload the newest photo
  list               show items
  photos             show queued photos
  inc <id>           add one day to an item
  dec <id>           remove one day from an item
  tick               run a reconciliation pass now
  active             signal a foreground transition to the scheduler
  help               show this text
  quit               leave the session";

#[derive(Args)]
pub struct SessionArgs {
    /// Photo to queue before the session starts
    #[arg(long)]
    photo: Option<PathBuf>,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
}

enum Command {
    Capture(PathBuf),
    Upload,
    List,
    Photos,
    Inc(String),
    Dec(String),
    Tick,
    Active,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    // The argument is the rest of the line as typed; ids and paths may
    // contain inner whitespace.
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim_start()),
        None => (line, ""),
    };
    let need_arg = |what: &str| {
        if arg.is_empty() {
            Err(format!("{verb}: missing {what}"))
        } else {
            Ok(arg.to_string())
        }
    };

    let cmd = match verb {
        "capture" => Command::Capture(PathBuf::from(need_arg("path")?)),
        "upload" => Command::Upload,
        "list" | "ls" => Command::List,
        "photos" => Command::Photos,
        "inc" | "+" => Command::Inc(need_arg("item id")?),
        "dec" | "-" => Command::Dec(need_arg("item id")?),
        "tick" => Command::Tick,
        "active" => Command::Active,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };
    Ok(Some(cmd))
}

fn describe(event: &Event) -> String {
    match event {
        Event::PhotoCaptured { path, .. } => format!("captured {path}"),
        Event::ItemsIngested { count, malformed: 0, .. } => format!("recognized {count} items"),
        Event::ItemsIngested { count, malformed, .. } => {
            format!("recognized {count} items ({malformed} without an expiration)")
        }
        Event::ItemsDecayed { changed, .. } => format!("{changed} items aged"),
        Event::ItemAdjusted { id, display, .. } => format!("{id}: {display}"),
    }
}

/// Forward stdin lines from a plain thread.
///
/// A blocking read cannot be cancelled, so it stays off the runtime; the
/// thread is simply abandoned when the session ends.
fn spawn_stdin_reader() -> mpsc::UnboundedReceiver<std::io::Result<String>> {
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lines() {
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

struct Output {
    json: bool,
}

impl Output {
    fn event(&self, event: &Event) {
        if self.json {
            match serde_json::to_string(event) {
                Ok(line) => println!("{line}"),
                Err(e) => eprintln!("error: {e}"),
            }
        } else {
            println!("{}", describe(event));
        }
    }

    fn error(&self, err: &dyn std::fmt::Display) {
        eprintln!("error: {err}");
    }
}

pub async fn run(args: SessionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let client = Arc::new(RecognitionClient::new(&config.recognition)?);
    let out = Output { json: args.json };

    let session: SharedSession = FridgeSession::new().shared();
    if let Some(photo) = args.photo {
        let event = session.lock().await.capture_photo(photo);
        out.event(&event);
    }

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let scheduler = Scheduler::from_config(&config.scheduler).spawn(session.clone(), events_tx);
    let (uploads_tx, mut uploads_rx) = mpsc::unbounded_channel::<Result<Event, CoreError>>();

    let mut lines = spawn_stdin_reader();
    loop {
        tokio::select! {
            line = lines.recv() => {
                let line = match line {
                    Some(Ok(line)) => line,
                    Some(Err(e)) => {
                        out.error(&e);
                        continue;
                    }
                    None => break,
                };
                let cmd = match parse_command(&line) {
                    Ok(Some(cmd)) => cmd,
                    Ok(None) => continue,
                    Err(msg) => {
                        out.error(&msg);
                        continue;
                    }
                };
                let now = Utc::now();
                match cmd {
                    Command::Capture(path) => {
                        let event = session.lock().await.capture_photo(path);
                        out.event(&event);
                    }
                    Command::Upload => {
                        debug!(endpoint = client.endpoint(), "upload started");
                        let session = session.clone();
                        let client = Arc::clone(&client);
                        let tx = uploads_tx.clone();
                        tokio::spawn(async move {
                            let _ = tx.send(upload_latest(&session, &client).await);
                        });
                    }
                    Command::List => {
                        let views = session.lock().await.views(now);
                        if out.json {
                            println!("{}", serde_json::to_string(&views)?);
                        } else {
                            super::print_views(&views);
                        }
                    }
                    Command::Photos => {
                        let guard = session.lock().await;
                        if guard.photos().is_empty() {
                            println!("No photos");
                        }
                        for photo in guard.photos() {
                            println!("{}", photo.display());
                        }
                    }
                    Command::Inc(id) => match session.lock().await.increment(&id, now) {
                        Ok(event) => out.event(&event),
                        Err(e) => out.error(&e),
                    },
                    Command::Dec(id) => match session.lock().await.decrement(&id, now) {
                        Ok(event) => out.event(&event),
                        Err(e) => out.error(&e),
                    },
                    Command::Tick => {
                        if let Some(event) = session.lock().await.tick(now) {
                            out.event(&event);
                        }
                    }
                    Command::Active => scheduler.became_active(),
                    Command::Help => println!("{HELP}"),
                    Command::Quit => break,
                }
            }
            Some(result) = uploads_rx.recv() => match result {
                Ok(event) => out.event(&event),
                Err(e) => out.error(&e),
            },
            Some(event) = events_rx.recv() => out.event(&event),
        }
    }

    scheduler.shutdown().await;
    Ok(())
}
