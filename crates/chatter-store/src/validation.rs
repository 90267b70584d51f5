use chatter_types::{ChannelId, SessionContext};
use thiserror::Error;

use crate::channels::ChannelsState;

pub const CHANNEL_NAME_MIN: usize = 3;
pub const CHANNEL_NAME_MAX: usize = 20;
pub const USERNAME_MIN: usize = 3;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("channel name is required")]
    NameRequired,
    #[error("channel name must be {min} to {max} characters")]
    NameLength { min: usize, max: usize },
    #[error("channel name must be unique")]
    NameTaken,
    #[error("channel {0} does not exist")]
    UnknownChannel(ChannelId),
    #[error("channel {0} cannot be changed")]
    NotRemovable(ChannelId),
    #[error("message is empty")]
    EmptyMessage,
    #[error("not logged in")]
    NotAuthorized,
    #[error("username must be {min} to {max} characters")]
    UsernameLength { min: usize, max: usize },
    #[error("password must be at least {min} characters")]
    PasswordTooShort { min: usize },
    #[error("passwords must match")]
    PasswordMismatch,
}

/// Check a proposed channel name against length bounds and the names already
/// in the list. Returns the trimmed name to submit.
pub fn validate_channel_name<'a>(
    name: &'a str,
    channels: &ChannelsState,
) -> Result<&'a str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }

    let len = name.chars().count();
    if !(CHANNEL_NAME_MIN..=CHANNEL_NAME_MAX).contains(&len) {
        return Err(ValidationError::NameLength {
            min: CHANNEL_NAME_MIN,
            max: CHANNEL_NAME_MAX,
        });
    }

    if channels.names().any(|existing| existing == name) {
        return Err(ValidationError::NameTaken);
    }

    Ok(name)
}

/// Rename uses the same name rules and additionally requires the channel to
/// exist and be removable.
pub fn validate_channel_rename<'a>(
    id: ChannelId,
    name: &'a str,
    channels: &ChannelsState,
) -> Result<&'a str, ValidationError> {
    check_mutable(id, channels)?;
    validate_channel_name(name, channels)
}

pub fn validate_channel_removal(id: ChannelId, channels: &ChannelsState) -> Result<(), ValidationError> {
    check_mutable(id, channels)
}

fn check_mutable(id: ChannelId, channels: &ChannelsState) -> Result<(), ValidationError> {
    let channel = channels.get(id).ok_or(ValidationError::UnknownChannel(id))?;
    if !channel.removable {
        return Err(ValidationError::NotRemovable(id));
    }
    Ok(())
}

/// Whitespace-only drafts are rejected; the returned body is trimmed.
pub fn validate_message_draft<'a>(
    draft: &'a str,
    session: &'a SessionContext,
) -> Result<(&'a str, &'a str), ValidationError> {
    let body = draft.trim();
    if body.is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    let username = session.username().ok_or(ValidationError::NotAuthorized)?;
    Ok((body, username))
}

pub fn validate_signup(
    username: &str,
    password: &str,
    confirm: &str,
) -> Result<(), ValidationError> {
    let len = username.trim().chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(ValidationError::UsernameLength {
            min: USERNAME_MIN,
            max: USERNAME_MAX,
        });
    }
    if password.chars().count() < PASSWORD_MIN {
        return Err(ValidationError::PasswordTooShort { min: PASSWORD_MIN });
    }
    if password != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chatter_types::Channel;

    use super::*;
    use crate::action::Action;

    fn channels() -> ChannelsState {
        let mut state = ChannelsState::default();
        state.reduce(&Action::ChannelsLoaded(vec![
            Channel {
                id: 1,
                name: "general".into(),
                removable: false,
            },
            Channel {
                id: 3,
                name: "rust".into(),
                removable: true,
            },
        ]));
        state
    }

    #[test]
    fn rejects_names_outside_length_bounds() {
        let state = channels();
        let bounds = ValidationError::NameLength { min: 3, max: 20 };

        assert_eq!(validate_channel_name("ab", &state), Err(bounds.clone()));
        assert_eq!(validate_channel_name(&"x".repeat(21), &state), Err(bounds));
        assert_eq!(validate_channel_name("abc", &state), Ok("abc"));
        assert_eq!(validate_channel_name(&"x".repeat(20), &state).map(str::len), Ok(20));
    }

    #[test]
    fn counts_characters_not_bytes() {
        let state = channels();
        assert_eq!(validate_channel_name("кот", &state), Ok("кот"));
    }

    #[test]
    fn rejects_blank_and_duplicate_names() {
        let state = channels();
        assert_eq!(validate_channel_name("   ", &state), Err(ValidationError::NameRequired));
        assert_eq!(validate_channel_name("general", &state), Err(ValidationError::NameTaken));
        assert_eq!(validate_channel_name("  rust ", &state), Err(ValidationError::NameTaken));
    }

    #[test]
    fn rename_requires_existing_removable_channel() {
        let state = channels();
        assert_eq!(
            validate_channel_rename(1, "lobby", &state),
            Err(ValidationError::NotRemovable(1))
        );
        assert_eq!(
            validate_channel_rename(9, "lobby", &state),
            Err(ValidationError::UnknownChannel(9))
        );
        assert_eq!(validate_channel_rename(3, "lobby", &state), Ok("lobby"));
        assert_eq!(validate_channel_removal(3, &state), Ok(()));
        assert_eq!(validate_channel_removal(1, &state), Err(ValidationError::NotRemovable(1)));
    }

    #[test]
    fn whitespace_only_draft_is_rejected() {
        let session = SessionContext::authorized("ann", "t");
        assert_eq!(
            validate_message_draft(" \t ", &session),
            Err(ValidationError::EmptyMessage)
        );
        assert_eq!(validate_message_draft(" hi ", &session), Ok(("hi", "ann")));
        assert_eq!(
            validate_message_draft("hi", &SessionContext::anonymous()),
            Err(ValidationError::NotAuthorized)
        );
    }

    #[test]
    fn signup_rules() {
        assert!(validate_signup("ann", "secret", "secret").is_ok());
        assert_eq!(
            validate_signup("an", "secret", "secret"),
            Err(ValidationError::UsernameLength { min: 3, max: 20 })
        );
        assert_eq!(
            validate_signup("ann", "short", "short"),
            Err(ValidationError::PasswordTooShort { min: 6 })
        );
        assert_eq!(
            validate_signup("ann", "secret", "secreT"),
            Err(ValidationError::PasswordMismatch)
        );
    }
}
