use std::collections::HashSet;

use chatter_store::Store;
use chatter_sync::{NoticeLevel, Stamped};
use chatter_types::{Channel, ChannelId, Message, MessageId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Blank,
    Loading,
    Failed(Option<String>),
    Ready,
}

/// Turns successive store snapshots into terminal lines, printing only what
/// changed since the previous snapshot.
#[derive(Debug, Default)]
pub struct Renderer {
    phase: Phase,
    current: Option<ChannelId>,
    channels: Vec<Channel>,
    shown: HashSet<MessageId>,
}

impl Renderer {
    pub fn update(&mut self, store: &Store) -> Vec<String> {
        let mut out = Vec::new();

        if store.fetch_failed() {
            match store.fetch_error() {
                Some(error) => {
                    let phase = Phase::Failed(Some(error.to_string()));
                    if self.phase != phase {
                        out.push(format!("Error: {error} (type /refresh to retry)"));
                        self.phase = phase;
                    }
                }
                // Dismissed: keep whatever banner is up, without repeating it.
                None => {
                    if !matches!(self.phase, Phase::Failed(_)) {
                        out.push("Error: loading failed (type /refresh to retry)".to_string());
                        self.phase = Phase::Failed(None);
                    }
                }
            }
            return out;
        }

        if !store.is_ready() {
            if self.phase != Phase::Loading {
                out.push("Loading…".to_string());
                self.phase = Phase::Loading;
            }
            return out;
        }

        let first = self.phase != Phase::Ready;
        self.phase = Phase::Ready;

        let current = store.channels.current_channel_id;
        let switched = first || self.current != Some(current);

        if switched || self.channels != store.channels.channels {
            out.extend(channel_list(store));
            self.channels = store.channels.channels.clone();
        }

        if switched {
            self.current = Some(current);
            self.shown.clear();
            out.push(header(store));
        }

        for message in store.current_messages() {
            if self.shown.insert(message.id) {
                out.push(message_line(message));
            }
        }
        out
    }
}

pub fn channel_list(store: &Store) -> Vec<String> {
    let current = store.channels.current_channel_id;
    store
        .channels
        .channels
        .iter()
        .map(|c| {
            let marker = if c.id == current { '*' } else { ' ' };
            format!("{marker} {:>3} #{}", c.id, c.name)
        })
        .collect()
}

fn header(store: &Store) -> String {
    let name = store.current_channel().map(|c| c.name.as_str()).unwrap_or("?");
    let count = store.messages.count_in_channel(store.channels.current_channel_id);
    let noun = if count == 1 { "message" } else { "messages" };
    format!("-- #{name} ({count} {noun}) --")
}

pub fn message_line(message: &Message) -> String {
    format!("<{}> {}", message.username, message.body)
}

pub fn notice_line(stamped: &Stamped) -> String {
    let mark = match stamped.notice.level() {
        NoticeLevel::Success => '+',
        NoticeLevel::Info => '~',
        NoticeLevel::Error => '!',
    };
    format!("[{}] {mark} {}", stamped.at.format("%H:%M:%S"), stamped.notice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatter_store::Action;
    use chatter_sync::Notice;
    use chatter_types::SessionContext;

    fn ready_store() -> Store {
        let mut store = Store::new(SessionContext::authorized("ann", "t"));
        store.reduce(&Action::ChannelsLoaded(vec![
            Channel {
                id: 1,
                name: "general".into(),
                removable: false,
            },
            Channel {
                id: 2,
                name: "random".into(),
                removable: true,
            },
        ]));
        store.reduce(&Action::MessagesLoaded(vec![
            msg(1, 1, "hello"),
            msg(2, 2, "elsewhere"),
        ]));
        store
    }

    fn msg(id: u64, channel_id: u64, body: &str) -> Message {
        Message {
            id,
            channel_id,
            username: "bob".into(),
            body: body.into(),
        }
    }

    #[test]
    fn loading_is_printed_once() {
        let mut renderer = Renderer::default();
        let mut store = Store::default();
        store.reduce(&Action::ChannelsLoading);

        assert_eq!(renderer.update(&store), vec!["Loading…"]);
        assert!(renderer.update(&store).is_empty());
    }

    #[test]
    fn fetch_error_replaces_content() {
        let mut renderer = Renderer::default();
        let mut store = ready_store();
        store.reduce(&Action::MessagesFailed("server returned 500".into()));

        let lines = renderer.update(&store);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("Error: server returned 500"));
    }

    #[test]
    fn dismissed_failure_is_not_shown_as_loading() {
        let mut renderer = Renderer::default();
        let mut store = Store::default();
        store.reduce(&Action::ChannelsFailed("boom".into()));
        store.reduce(&Action::MessagesFailed("boom".into()));
        assert_eq!(renderer.update(&store), vec!["Error: boom (type /refresh to retry)"]);

        store.reduce(&Action::ClearChannelError);
        store.reduce(&Action::ClearMessageError);
        assert!(renderer.update(&store).is_empty());

        // A view that starts after the dismissal still gets a banner.
        let lines = Renderer::default().update(&store);
        assert_eq!(lines, vec!["Error: loading failed (type /refresh to retry)"]);
    }

    #[test]
    fn first_ready_snapshot_renders_list_header_and_messages() {
        let mut renderer = Renderer::default();
        let lines = renderer.update(&ready_store());

        assert_eq!(
            lines,
            vec![
                "*   1 #general",
                "    2 #random",
                "-- #general (1 message) --",
                "<bob> hello",
            ]
        );
    }

    #[test]
    fn only_new_messages_are_printed_afterwards() {
        let mut renderer = Renderer::default();
        let mut store = ready_store();
        renderer.update(&store);

        store.reduce(&Action::MessageReceived(msg(3, 1, "again")));
        store.reduce(&Action::MessageReceived(msg(4, 2, "not here")));
        assert_eq!(renderer.update(&store), vec!["<bob> again"]);
    }

    #[test]
    fn switching_channel_redraws() {
        let mut renderer = Renderer::default();
        let mut store = ready_store();
        renderer.update(&store);

        store.reduce(&Action::ChannelSelected(2));
        let lines = renderer.update(&store);
        assert_eq!(lines[1], "*   2 #random");
        assert_eq!(lines[2], "-- #random (1 message) --");
        assert_eq!(lines[3], "<bob> elsewhere");
    }

    #[test]
    fn notice_lines_carry_level_mark() {
        let line = notice_line(&Stamped::now(Notice::SessionExpired));
        assert!(line.ends_with("! Session expired, log in again"));
    }
}
