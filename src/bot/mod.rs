//! Chat bot dispatcher
//!
//! Routes already-parsed chat updates to handlers and returns the replies to
//! send. The transport that polls the chat platform and delivers replies is
//! an external collaborator: it feeds [`Update`] values in and renders the
//! returned [`Reply`] values out. Handler failures never propagate to the
//! transport - they are logged and turned into a service-error reply.

pub mod client;
pub mod messages;

use crate::constants::MIN_PHONE_DIGITS;
use crate::model::EnsureUserRequest;
use std::sync::Arc;

pub use client::{AuthApi, HttpApiClient};

/// One inbound chat update
#[derive(Debug, Clone, Default, serde::Deserialize)]
pub struct Update {
    pub message: Option<IncomingMessage>,
    pub callback: Option<CallbackQuery>,
}

/// A message sent to the bot
#[derive(Debug, Clone, serde::Deserialize)]
pub struct IncomingMessage {
    pub chat_id: i64,
    pub from: Option<Sender>,
    pub text: Option<String>,
    pub contact: Option<Contact>,
}

/// The account behind a message or callback
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Sender {
    pub id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub username: Option<String>,
}

/// A shared contact card
#[derive(Debug, Clone, serde::Deserialize)]
pub struct Contact {
    pub phone: String,
}

/// An inline-keyboard button press
#[derive(Debug, Clone, serde::Deserialize)]
pub struct CallbackQuery {
    pub id: String,
    pub from_id: i64,
    pub chat_id: i64,
    pub data: Option<String>,
}

/// An outbound action for the transport to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Send a chat message
    Message {
        chat_id: i64,
        text: String,
        markup: Option<ReplyMarkup>,
    },
    /// Acknowledge a callback query, optionally with an alert text
    CallbackAck {
        callback_id: String,
        text: Option<String>,
    },
}

impl Reply {
    fn message(chat_id: i64, text: impl Into<String>) -> Self {
        Reply::Message {
            chat_id,
            text: text.into(),
            markup: None,
        }
    }

    fn message_with_markup(chat_id: i64, text: impl Into<String>, markup: ReplyMarkup) -> Self {
        Reply::Message {
            chat_id,
            text: text.into(),
            markup: Some(markup),
        }
    }

    fn ack(callback_id: impl Into<String>) -> Self {
        Reply::CallbackAck {
            callback_id: callback_id.into(),
            text: None,
        }
    }

    fn ack_with_text(callback_id: impl Into<String>, text: impl Into<String>) -> Self {
        Reply::CallbackAck {
            callback_id: callback_id.into(),
            text: Some(text.into()),
        }
    }
}

/// Keyboard attached to an outbound message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyMarkup {
    /// One-time keyboard with a single contact-request button
    ContactRequest { button: String },
    /// Remove any reply keyboard
    RemoveKeyboard,
    /// Inline buttons carrying callback data
    Inline(Vec<InlineButton>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineButton {
    pub text: String,
    pub data: String,
}

impl InlineButton {
    fn new(text: &str, data: &str) -> Self {
        Self {
            text: text.to_string(),
            data: data.to_string(),
        }
    }
}

/// Routes updates to handlers
pub struct Dispatcher {
    api: Arc<dyn AuthApi>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn AuthApi>) -> Self {
        Self { api }
    }

    /// Handle one update, returning the replies to send
    pub async fn handle(&self, update: &Update) -> Vec<Reply> {
        if let Some(message) = &update.message {
            let is_start = message
                .text
                .as_deref()
                .map(|t| t.trim().to_ascii_lowercase().starts_with("/start"))
                .unwrap_or(false);

            if is_start {
                return self.handle_start(message).await;
            }
            if is_phone_message(message) {
                return self.handle_phone(message).await;
            }
            return Vec::new();
        }

        if let Some(callback) = &update.callback {
            return self.handle_callback(callback).await;
        }

        Vec::new()
    }

    /// /start: ensure the profile exists (without phone), then ask for it
    async fn handle_start(&self, message: &IncomingMessage) -> Vec<Reply> {
        let Some(from) = &message.from else {
            return vec![Reply::message(message.chat_id, messages::SENDER_NOT_FOUND)];
        };

        let req = EnsureUserRequest {
            chat_id: from.id,
            first_name: from.first_name.clone(),
            last_name: from.last_name.clone(),
            username: from.username.clone(),
            phone: None,
        };
        match self.api.ensure_user(&req).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(chat_id = from.id, "ensure_user rejected during /start")
            }
            Err(e) => {
                tracing::error!(chat_id = from.id, error = %e, "ensure_user failed during /start")
            }
        }

        vec![Reply::message_with_markup(
            message.chat_id,
            messages::ASK_PHONE,
            ReplyMarkup::ContactRequest {
                button: messages::SEND_PHONE_BUTTON.to_string(),
            },
        )]
    }

    /// User sent a contact or a phone-looking text: save it and show the menu
    async fn handle_phone(&self, message: &IncomingMessage) -> Vec<Reply> {
        let Some(from) = &message.from else {
            return Vec::new();
        };

        let phone = message
            .contact
            .as_ref()
            .and_then(|c| normalize_phone(&c.phone))
            .or_else(|| message.text.as_deref().and_then(normalize_phone));

        let Some(phone) = phone else {
            return vec![Reply::message(message.chat_id, messages::ASK_PHONE)];
        };

        let req = EnsureUserRequest {
            chat_id: from.id,
            first_name: from.first_name.clone(),
            last_name: from.last_name.clone(),
            username: from.username.clone(),
            phone: Some(phone),
        };
        match self.api.ensure_user(&req).await {
            Ok(true) => {}
            Ok(false) => tracing::warn!(chat_id = from.id, "ensure_user(phone) rejected"),
            Err(e) => {
                tracing::error!(chat_id = from.id, error = %e, "ensure_user(phone) failed");
                return vec![Reply::message(message.chat_id, messages::SERVICE_ERROR)];
            }
        }

        vec![
            Reply::message_with_markup(
                message.chat_id,
                messages::PHONE_SAVED,
                ReplyMarkup::RemoveKeyboard,
            ),
            Reply::message_with_markup(
                message.chat_id,
                messages::WELCOME,
                ReplyMarkup::Inline(vec![
                    InlineButton::new(messages::BUTTON_CODE, messages::callback::CODE),
                    InlineButton::new(messages::BUTTON_PROFILE, messages::callback::PROFILE),
                    InlineButton::new(messages::BUTTON_LANGUAGE, messages::callback::LANG),
                ]),
            ),
        ]
    }

    async fn handle_callback(&self, callback: &CallbackQuery) -> Vec<Reply> {
        let Some(data) = callback.data.as_deref() else {
            return Vec::new();
        };

        match data {
            messages::callback::CODE => self.handle_code_callback(callback).await,
            messages::callback::PROFILE => self.handle_profile_callback(callback).await,
            d if d.starts_with(messages::callback::LANG) => handle_language_callback(callback, d),
            _ => Vec::new(),
        }
    }

    async fn handle_code_callback(&self, callback: &CallbackQuery) -> Vec<Reply> {
        match self.api.code(callback.from_id).await {
            Ok(Some(code)) => vec![
                Reply::ack(&callback.id),
                Reply::message(callback.chat_id, messages::code_sent(&code)),
            ],
            Ok(None) => vec![
                Reply::ack(&callback.id),
                Reply::message(callback.chat_id, messages::NO_CODE_YET),
            ],
            Err(e) => {
                tracing::error!(chat_id = callback.from_id, error = %e, "code fetch failed");
                vec![Reply::ack_with_text(&callback.id, messages::SERVICE_ERROR)]
            }
        }
    }

    async fn handle_profile_callback(&self, callback: &CallbackQuery) -> Vec<Reply> {
        match self.api.profile(callback.from_id).await {
            Ok(profile) => {
                let text = match &profile {
                    Some(p) => messages::profile_text(
                        p.first_name.as_deref(),
                        p.last_name.as_deref(),
                        p.chat_id,
                        p.phone.as_deref(),
                    ),
                    None => messages::profile_text(None, None, callback.from_id, None),
                };
                vec![
                    Reply::ack(&callback.id),
                    Reply::message(callback.chat_id, text),
                ]
            }
            Err(e) => {
                tracing::error!(chat_id = callback.from_id, error = %e, "profile fetch failed");
                vec![Reply::ack_with_text(&callback.id, messages::SERVICE_ERROR)]
            }
        }
    }
}

fn handle_language_callback(callback: &CallbackQuery, data: &str) -> Vec<Reply> {
    if data == messages::callback::LANG {
        return vec![
            Reply::ack(&callback.id),
            Reply::message_with_markup(
                callback.chat_id,
                messages::LANGUAGE_CHOOSE,
                ReplyMarkup::Inline(vec![
                    InlineButton::new("English", messages::callback::LANG_EN),
                    InlineButton::new("Русский", messages::callback::LANG_RU),
                    InlineButton::new("O'zbekcha", messages::callback::LANG_UZ),
                ]),
            ),
        ];
    }

    vec![
        Reply::ack(&callback.id),
        Reply::message(callback.chat_id, messages::LANGUAGE_SET),
    ]
}

/// Keep `+` and digits; anything shorter than a real phone number is rejected
fn normalize_phone(value: &str) -> Option<String> {
    let digits: String = value
        .chars()
        .filter(|c| *c == '+' || c.is_ascii_digit())
        .collect();
    let digit_count = digits.chars().filter(|c| c.is_ascii_digit()).count();
    (digit_count >= MIN_PHONE_DIGITS).then_some(digits)
}

/// A message counts as a phone submission when it carries a contact card or
/// enough digits to plausibly be a typed number
fn is_phone_message(message: &IncomingMessage) -> bool {
    if message.contact.is_some() {
        return true;
    }
    match &message.text {
        Some(text) => {
            text.chars()
                .filter(|c| *c == '+' || c.is_ascii_digit())
                .count()
                >= MIN_PHONE_DIGITS
        }
        None => false,
    }
}

#[cfg(test)]
mod client_test;
#[cfg(test)]
mod dispatch_test;
