//! User-facing message strings and callback data values

pub const WELCOME: &str = "Welcome! Pick one of the options below.";
pub const ASK_PHONE: &str =
    "Send your phone number (share your contact or type it like +15551234567):";
pub const SEND_PHONE_BUTTON: &str = "Share phone number";
pub const PHONE_SAVED: &str = "Thanks, your number is saved.";
pub const SENDER_NOT_FOUND: &str = "Could not read your chat account id.";
pub const NO_CODE_YET: &str =
    "There is no code for you yet. Register through the Mini App first and request a code.";
pub const SERVICE_ERROR: &str = "The service is temporarily unavailable. Try again later.";
pub const PROFILE_PHONE_HINT: &str = "Fill in your phone number through the Mini App.";
pub const LANGUAGE_CHOOSE: &str = "Choose a language:";
pub const LANGUAGE_SET: &str = "Language updated.";
pub const BUTTON_CODE: &str = "Get login code";
pub const BUTTON_PROFILE: &str = "My profile";
pub const BUTTON_LANGUAGE: &str = "Language";

/// Render the code-delivery message
pub fn code_sent(code: &str) -> String {
    format!(
        "Your login code: {code}\n\nUse it to sign in to the Mini App. Do not share it with anyone."
    )
}

/// Render the profile message
pub fn profile_text(
    first_name: Option<&str>,
    last_name: Option<&str>,
    chat_id: i64,
    phone: Option<&str>,
) -> String {
    let first_name = first_name.unwrap_or("-");
    let last_name = last_name.unwrap_or("-");
    let phone = match phone {
        Some(p) if !p.is_empty() => p,
        _ => PROFILE_PHONE_HINT,
    };
    format!(
        "Profile:\nFirst name: {first_name}\nLast name: {last_name}\nChat ID: {chat_id}\nPhone: {phone}"
    )
}

/// Callback data values for inline keyboard buttons
pub mod callback {
    pub const CODE: &str = "code";
    pub const PROFILE: &str = "profile";
    pub const LANG: &str = "lang";
    pub const LANG_EN: &str = "lang_en";
    pub const LANG_RU: &str = "lang_ru";
    pub const LANG_UZ: &str = "lang_uz";
}
