//! Bulk email composition and recipient resolution

use crate::error::{ProtocolError, ProtocolResult};
use punter_types::{Role, User};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Who an email goes to
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "camelCase")]
pub enum RecipientSelection {
    /// Every account with the `user` role
    #[default]
    AllUsers,
    /// Every account with the `punter` role
    AllPunters,
    /// One `user` account, by id
    SpecificUser(String),
    /// One `punter` account, by id
    SpecificPunter(String),
}

impl RecipientSelection {
    /// Role every recipient must have
    pub const fn role(&self) -> Role {
        match self {
            Self::AllUsers | Self::SpecificUser(_) => Role::User,
            Self::AllPunters | Self::SpecificPunter(_) => Role::Punter,
        }
    }

    /// Chosen account id for the specific variants
    pub fn specific_id(&self) -> Option<&str> {
        match self {
            Self::SpecificUser(id) | Self::SpecificPunter(id) => Some(id),
            Self::AllUsers | Self::AllPunters => None,
        }
    }

    /// Accounts the operator can pick from for this selection
    pub fn candidates<'a>(&self, users: &'a [User]) -> Vec<&'a User> {
        let role = self.role();
        users.iter().filter(|user| user.role == role).collect()
    }
}

impl fmt::Display for RecipientSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllUsers => f.write_str("All Users"),
            Self::AllPunters => f.write_str("All Punters"),
            Self::SpecificUser(id) => write!(f, "Specific User ({id})"),
            Self::SpecificPunter(id) => write!(f, "Specific Punter ({id})"),
        }
    }
}

/// Resolved recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipient {
    /// Account id
    pub id: String,
    /// Display name
    pub name: String,
    /// Delivery address
    pub email: String,
}

impl From<&User> for Recipient {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.full_name(),
            email: user.email.clone(),
        }
    }
}

/// Email form state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmailDraft {
    /// Recipient selection
    pub recipients: RecipientSelection,
    /// Subject line
    pub subject: String,
    /// Message body
    pub body: String,
}

impl EmailDraft {
    /// Validate the draft and resolve its recipients against the user list
    pub fn compose(&self, users: &[User]) -> ProtocolResult<EmailMessage> {
        if self.subject.trim().is_empty() || self.body.trim().is_empty() {
            return Err(ProtocolError::IncompleteEmail);
        }

        let recipients: Vec<Recipient> = match self.recipients.specific_id() {
            Some(id) if id.trim().is_empty() => return Err(ProtocolError::MissingRecipient),
            Some(id) => {
                let role = self.recipients.role();
                let user = users
                    .iter()
                    .find(|user| user.id == id)
                    .ok_or_else(|| ProtocolError::not_found("user", id))?;
                if user.role != role {
                    return Err(ProtocolError::InvalidRecipient {
                        id: id.to_string(),
                        expected: role.as_str(),
                    });
                }
                vec![Recipient::from(user)]
            }
            None => self
                .recipients
                .candidates(users)
                .into_iter()
                .map(Recipient::from)
                .collect(),
        };

        if recipients.is_empty() {
            return Err(ProtocolError::NoRecipients);
        }

        Ok(EmailMessage {
            selection: self.recipients.clone(),
            recipients,
            subject: self.subject.trim().to_string(),
            body: self.body.clone(),
        })
    }
}

/// Validated message ready to hand to a mailer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailMessage {
    /// Selection the recipients were resolved from
    pub selection: RecipientSelection,
    /// Resolved recipients
    pub recipients: Vec<Recipient>,
    /// Subject line
    pub subject: String,
    /// Message body
    pub body: String,
}

/// Outcome of a send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Subject line
    pub subject: String,
    /// Selection label
    pub selection: String,
    /// Addresses the message went to
    pub delivered: Vec<String>,
}

impl DeliveryReport {
    /// Report covering every recipient of `message`
    pub fn for_message(message: &EmailMessage) -> Self {
        Self {
            subject: message.subject.clone(),
            selection: message.selection.to_string(),
            delivered: message
                .recipients
                .iter()
                .map(|recipient| recipient.email.clone())
                .collect(),
        }
    }
}
