use super::*;
use crate::model::Profile;
use crate::{Result, StayKeyError};
use async_trait::async_trait;
use std::sync::Mutex;

/// Programmable API double that records every ensure_user call
#[derive(Default)]
struct FakeApi {
    ensure_calls: Mutex<Vec<EnsureUserRequest>>,
    ensure_ok: Mutex<bool>,
    code: Mutex<Option<String>>,
    profile: Mutex<Option<Profile>>,
    fail: Mutex<bool>,
}

impl FakeApi {
    fn new() -> Self {
        Self {
            ensure_ok: Mutex::new(true),
            ..Self::default()
        }
    }

    fn with_code(code: &str) -> Self {
        let api = Self::new();
        *api.code.lock().unwrap() = Some(code.to_string());
        api
    }

    fn failing() -> Self {
        let api = Self::new();
        *api.fail.lock().unwrap() = true;
        api
    }

    fn ensure_calls(&self) -> Vec<EnsureUserRequest> {
        self.ensure_calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AuthApi for FakeApi {
    async fn ensure_user(&self, req: &EnsureUserRequest) -> Result<bool> {
        if *self.fail.lock().unwrap() {
            return Err(StayKeyError::network("api down"));
        }
        self.ensure_calls.lock().unwrap().push(req.clone());
        Ok(*self.ensure_ok.lock().unwrap())
    }

    async fn code(&self, _chat_id: i64) -> Result<Option<String>> {
        if *self.fail.lock().unwrap() {
            return Err(StayKeyError::network("api down"));
        }
        Ok(self.code.lock().unwrap().clone())
    }

    async fn profile(&self, _chat_id: i64) -> Result<Option<Profile>> {
        if *self.fail.lock().unwrap() {
            return Err(StayKeyError::network("api down"));
        }
        Ok(self.profile.lock().unwrap().clone())
    }
}

fn sender(id: i64) -> Sender {
    Sender {
        id,
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        username: Some("ada".to_string()),
    }
}

fn text_update(chat_id: i64, text: &str) -> Update {
    Update {
        message: Some(IncomingMessage {
            chat_id,
            from: Some(sender(chat_id)),
            text: Some(text.to_string()),
            contact: None,
        }),
        callback: None,
    }
}

fn contact_update(chat_id: i64, phone: &str) -> Update {
    Update {
        message: Some(IncomingMessage {
            chat_id,
            from: Some(sender(chat_id)),
            text: None,
            contact: Some(Contact {
                phone: phone.to_string(),
            }),
        }),
        callback: None,
    }
}

fn callback_update(chat_id: i64, data: &str) -> Update {
    Update {
        message: None,
        callback: Some(CallbackQuery {
            id: "cb-1".to_string(),
            from_id: chat_id,
            chat_id,
            data: Some(data.to_string()),
        }),
    }
}

#[tokio::test]
async fn test_start_ensures_profile_and_asks_for_phone() {
    let api = Arc::new(FakeApi::new());
    let dispatcher = Dispatcher::new(api.clone());

    let replies = dispatcher.handle(&text_update(42, "/start")).await;

    let calls = api.ensure_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].chat_id, 42);
    assert_eq!(calls[0].username.as_deref(), Some("ada"));
    assert!(calls[0].phone.is_none());

    assert_eq!(replies.len(), 1);
    let Reply::Message { text, markup, .. } = &replies[0] else {
        panic!("expected a message reply");
    };
    assert_eq!(text, messages::ASK_PHONE);
    assert!(matches!(markup, Some(ReplyMarkup::ContactRequest { .. })));
}

#[tokio::test]
async fn test_start_without_sender() {
    let dispatcher = Dispatcher::new(Arc::new(FakeApi::new()));
    let update = Update {
        message: Some(IncomingMessage {
            chat_id: 42,
            from: None,
            text: Some("/start".to_string()),
            contact: None,
        }),
        callback: None,
    };

    let replies = dispatcher.handle(&update).await;
    assert_eq!(
        replies,
        vec![Reply::Message {
            chat_id: 42,
            text: messages::SENDER_NOT_FOUND.to_string(),
            markup: None,
        }]
    );
}

#[tokio::test]
async fn test_contact_saves_phone_and_shows_menu() {
    let api = Arc::new(FakeApi::new());
    let dispatcher = Dispatcher::new(api.clone());

    let replies = dispatcher
        .handle(&contact_update(42, "+1 (555) 123-0001"))
        .await;

    let calls = api.ensure_calls();
    assert_eq!(calls.len(), 1);
    // Formatting noise is stripped before the phone is sent on
    assert_eq!(calls[0].phone.as_deref(), Some("+15551230001"));

    assert_eq!(replies.len(), 2);
    let Reply::Message { text, markup, .. } = &replies[0] else {
        panic!("expected a message reply");
    };
    assert_eq!(text, messages::PHONE_SAVED);
    assert_eq!(markup, &Some(ReplyMarkup::RemoveKeyboard));

    let Reply::Message { markup, .. } = &replies[1] else {
        panic!("expected a message reply");
    };
    let Some(ReplyMarkup::Inline(buttons)) = markup else {
        panic!("expected inline menu");
    };
    assert_eq!(buttons.len(), 3);
    assert_eq!(buttons[0].data, messages::callback::CODE);
}

#[tokio::test]
async fn test_typed_phone_is_accepted() {
    let api = Arc::new(FakeApi::new());
    let dispatcher = Dispatcher::new(api.clone());

    dispatcher.handle(&text_update(42, "+998901234567")).await;

    let calls = api.ensure_calls();
    assert_eq!(calls[0].phone.as_deref(), Some("+998901234567"));
}

#[tokio::test]
async fn test_short_number_asks_again() {
    let api = Arc::new(FakeApi::new());
    let dispatcher = Dispatcher::new(api.clone());

    let replies = dispatcher.handle(&contact_update(42, "12345")).await;

    assert!(api.ensure_calls().is_empty());
    assert_eq!(
        replies,
        vec![Reply::Message {
            chat_id: 42,
            text: messages::ASK_PHONE.to_string(),
            markup: None,
        }]
    );
}

#[tokio::test]
async fn test_chatty_text_is_ignored() {
    let dispatcher = Dispatcher::new(Arc::new(FakeApi::new()));
    let replies = dispatcher.handle(&text_update(42, "hello there")).await;
    assert!(replies.is_empty());
}

#[tokio::test]
async fn test_code_callback_delivers_code() {
    let dispatcher = Dispatcher::new(Arc::new(FakeApi::with_code("1234")));

    let replies = dispatcher
        .handle(&callback_update(42, messages::callback::CODE))
        .await;

    assert_eq!(replies.len(), 2);
    assert!(matches!(&replies[0], Reply::CallbackAck { text: None, .. }));
    let Reply::Message { text, .. } = &replies[1] else {
        panic!("expected a message reply");
    };
    assert!(text.contains("1234"));
}

#[tokio::test]
async fn test_code_callback_for_unlinked_account() {
    let dispatcher = Dispatcher::new(Arc::new(FakeApi::new()));

    let replies = dispatcher
        .handle(&callback_update(42, messages::callback::CODE))
        .await;

    let Reply::Message { text, .. } = &replies[1] else {
        panic!("expected a message reply");
    };
    assert_eq!(text, messages::NO_CODE_YET);
}

#[tokio::test]
async fn test_code_callback_when_api_is_down() {
    let dispatcher = Dispatcher::new(Arc::new(FakeApi::failing()));

    let replies = dispatcher
        .handle(&callback_update(42, messages::callback::CODE))
        .await;

    assert_eq!(
        replies,
        vec![Reply::CallbackAck {
            callback_id: "cb-1".to_string(),
            text: Some(messages::SERVICE_ERROR.to_string()),
        }]
    );
}

#[tokio::test]
async fn test_profile_callback_renders_profile() {
    let api = Arc::new(FakeApi::new());
    *api.profile.lock().unwrap() = Some(Profile {
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        phone: Some("+15551230001".to_string()),
        chat_id: 42,
    });
    let dispatcher = Dispatcher::new(api);

    let replies = dispatcher
        .handle(&callback_update(42, messages::callback::PROFILE))
        .await;

    let Reply::Message { text, .. } = &replies[1] else {
        panic!("expected a message reply");
    };
    assert!(text.contains("Ada"));
    assert!(text.contains("+15551230001"));
}

#[tokio::test]
async fn test_profile_callback_without_phone_hints_mini_app() {
    let api = Arc::new(FakeApi::new());
    *api.profile.lock().unwrap() = Some(Profile {
        first_name: None,
        last_name: None,
        phone: None,
        chat_id: 42,
    });
    let dispatcher = Dispatcher::new(api);

    let replies = dispatcher
        .handle(&callback_update(42, messages::callback::PROFILE))
        .await;

    let Reply::Message { text, .. } = &replies[1] else {
        panic!("expected a message reply");
    };
    assert!(text.contains(messages::PROFILE_PHONE_HINT));
}

#[tokio::test]
async fn test_language_menu_and_selection() {
    let dispatcher = Dispatcher::new(Arc::new(FakeApi::new()));

    let replies = dispatcher
        .handle(&callback_update(42, messages::callback::LANG))
        .await;
    let Reply::Message { markup, .. } = &replies[1] else {
        panic!("expected a message reply");
    };
    assert!(matches!(markup, Some(ReplyMarkup::Inline(buttons)) if buttons.len() == 3));

    let replies = dispatcher
        .handle(&callback_update(42, messages::callback::LANG_EN))
        .await;
    let Reply::Message { text, .. } = &replies[1] else {
        panic!("expected a message reply");
    };
    assert_eq!(text, messages::LANGUAGE_SET);
}

#[tokio::test]
async fn test_empty_update_produces_no_replies() {
    let dispatcher = Dispatcher::new(Arc::new(FakeApi::new()));
    assert!(dispatcher.handle(&Update::default()).await.is_empty());
}
