use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, warn};

use chatter_sync::{Command, Stamped, SyncHandle};
use chatter_types::ChannelId;

use crate::render::{Renderer, channel_list, notice_line};

const HELP: &str = "\
Commands:
  <text>               send a message to the current channel
  /join <id>           switch channel
  /create <name>       create a channel and switch to it
  /rename <id> <name>  rename a channel
  /delete <id>         delete a channel
  /channels            list channels
  /refresh             fetch channels and messages again
  /dismiss             clear the error banner
  /quit                leave";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    ListChannels,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_input(line: &str) -> Input {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        return Input::Empty;
    }
    let Some(rest) = line.strip_prefix('/') else {
        return Input::Command(Command::SendMessage(line.to_string()));
    };

    let (verb, args) = match rest.split_once(char::is_whitespace) {
        Some((verb, args)) => (verb, args.trim()),
        None => (rest, ""),
    };

    match verb {
        "join" => parse_id(args).map_or_else(Input::Invalid, |id| {
            Input::Command(Command::SelectChannel(id))
        }),
        "create" => Input::Command(Command::CreateChannel(args.to_string())),
        "rename" => {
            let (id, name) = args.split_once(char::is_whitespace).unwrap_or((args, ""));
            parse_id(id).map_or_else(Input::Invalid, |id| {
                Input::Command(Command::RenameChannel {
                    id,
                    name: name.to_string(),
                })
            })
        }
        "delete" => parse_id(args).map_or_else(Input::Invalid, |id| {
            Input::Command(Command::RemoveChannel(id))
        }),
        "channels" => Input::ListChannels,
        "refresh" => Input::Command(Command::Refresh),
        "dismiss" => Input::Command(Command::DismissErrors),
        "help" => Input::Help,
        "quit" | "exit" => Input::Quit,
        other => Input::Invalid(format!("unknown command /{other}, try /help")),
    }
}

fn parse_id(arg: &str) -> Result<ChannelId, String> {
    arg.trim()
        .parse()
        .map_err(|_| format!("expected a channel id, got {arg:?}"))
}

/// Drive an interactive session until `/quit`, end of input or the
/// coordinator stopping.
pub async fn run(handle: SyncHandle, mut notices: broadcast::Receiver<Stamped>) -> Result<()> {
    let mut renderer = Renderer::default();
    let mut state = handle.watch();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print_lines(renderer.update(&state.borrow_and_update()));
    println!("Type /help for commands.");

    loop {
        tokio::select! {
            changed = state.changed() => {
                if changed.is_err() {
                    break;
                }
                print_lines(renderer.update(&state.borrow_and_update()));
            }
            notice = notices.recv() => match notice {
                Ok(stamped) => println!("{}", notice_line(&stamped)),
                Err(RecvError::Lagged(skipped)) => warn!("Skipped {} notices", skipped),
                Err(RecvError::Closed) => break,
            },
            line = lines.next_line() => {
                let Some(line) = line? else {
                    debug!("stdin closed");
                    break;
                };
                match parse_input(&line) {
                    Input::Command(command) => handle.send(command)?,
                    Input::ListChannels => print_lines(channel_list(&handle.state())),
                    Input::Help => println!("{HELP}"),
                    Input::Quit => break,
                    Input::Empty => {}
                    Input::Invalid(reason) => println!("{reason}"),
                }
            }
        }
    }

    handle.shutdown().await;
    Ok(())
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{line}");
    }
}
