//! Validity predicate and final cleanup for candidate review text.

use crate::patterns::{ASCII_LETTER, NON_WORD, OWNER_REPLY_PHRASE};

/// Why a candidate was judged invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invalidity {
    TooShort,
    OwnerReply,
    TooFewWordChars,
    BareEllipsis,
}

impl Invalidity {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TooShort => "shorter than 5 characters",
            Self::OwnerReply => "owner reply",
            Self::TooFewWordChars => "fewer than 3 word characters",
            Self::BareEllipsis => "truncated with no letters",
        }
    }
}

fn mentions_owner_reply(text: &str) -> bool {
    text.to_lowercase().contains(OWNER_REPLY_PHRASE)
}

/// Check a candidate, returning the first rule it breaks.
pub fn check_comment(text: &str) -> Result<(), Invalidity> {
    let trimmed = text.trim();
    if trimmed.chars().count() < 5 {
        return Err(Invalidity::TooShort);
    }
    if mentions_owner_reply(text) {
        return Err(Invalidity::OwnerReply);
    }
    if NON_WORD.replace_all(text, "").chars().count() < 3 {
        return Err(Invalidity::TooFewWordChars);
    }
    if trimmed.ends_with('…') && !ASCII_LETTER.is_match(text) {
        return Err(Invalidity::BareEllipsis);
    }
    Ok(())
}

/// Whether `text` can stand as a review's text.
#[must_use]
pub fn is_valid_comment(text: &str) -> bool {
    check_comment(text).is_ok()
}

/// Empty for owner-reply restatements, otherwise trimmed.
#[must_use]
pub fn clean_final_text(text: &str) -> String {
    if mentions_owner_reply(text) {
        String::new()
    } else {
        text.trim().to_string()
    }
}
