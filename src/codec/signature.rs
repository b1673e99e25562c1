//! Codec for the obfuscated license token embedded in the export header.
//!
//! Token layout after the `TradeDate#` prefix (all fixed-width except id):
//!
//! ```text
//! <4 sig digits><1 status digit><4 mmdd digits><id digits, reversed><4 yyyy digits>
//! ```
//!
//! Every decimal digit is substituted through an alphabet: one for the
//! signature/status/date fields, a second for the id field. This is an
//! obfuscation gate, not cryptography.

use {
    crate::{
        config::constants::{SIGNATURE_PREFIX, codec},
        error::IngestError,
        models::{Expiry, LicenseStatus, UserInfo},
        utils::DateUtils,
    },
    chrono::{Local, NaiveDate},
};

/// Decoded token fields. `signature_digits` keeps the raw decoded digit
/// string so an unreadable signature ('?' sentinel) survives into the
/// mismatch report instead of crashing the decode.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub signature_digits: String,
    pub user_id: String,
    pub status: LicenseStatus,
    pub expiry: Expiry,
    pub is_expired: bool,
}

impl TokenInfo {
    /// The embedded anti-tamper signature, if all four digits decoded.
    pub fn signature(&self) -> Option<u32> {
        self.signature_digits.parse().ok()
    }

    pub fn user_info(&self) -> UserInfo {
        UserInfo {
            user_id: self.user_id.clone(),
            status: self.status,
            expiry: self.expiry.clone(),
            is_expired: self.is_expired,
        }
    }
}

fn decode_digit(c: char) -> char {
    match codec::DIGIT_ALPHABET.find(c) {
        Some(idx) => (b'0' + idx as u8) as char,
        None => codec::UNKNOWN_DIGIT,
    }
}

fn encode_digit(c: char) -> char {
    digit_to_alphabet(c, codec::DIGIT_ALPHABET)
}

fn digit_to_alphabet(c: char, alphabet: &str) -> char {
    match c.to_digit(10) {
        Some(d) => alphabet.chars().nth(d as usize).unwrap_or(c),
        None => c,
    }
}

/// Decode a token against the current local date.
pub fn decode(token: &str) -> Result<TokenInfo, IngestError> {
    decode_at(token, Local::now().date_naive())
}

/// Decode a token, evaluating expiry against an explicit `today` (midnight
/// resolution: strictly before today means expired).
pub fn decode_at(token: &str, today: NaiveDate) -> Result<TokenInfo, IngestError> {
    let content = token
        .strip_prefix(SIGNATURE_PREFIX)
        .ok_or_else(|| IngestError::TokenFormat("missing TradeDate# prefix".to_string()))?;

    let chars: Vec<char> = content.chars().collect();
    if chars.len() < codec::MIN_TOKEN_LEN {
        return Err(IngestError::TokenFormat(format!(
            "token content is {} chars, minimum is {}",
            chars.len(),
            codec::MIN_TOKEN_LEN
        )));
    }

    // Fixed-width fields from the front, year from the back, id in between.
    let signature_digits: String = chars[0..4].iter().copied().map(decode_digit).collect();
    let status_digit = decode_digit(chars[4]);
    let mmdd: String = chars[5..9].iter().copied().map(decode_digit).collect();
    let yyyy: String = chars[chars.len() - 4..]
        .iter()
        .copied()
        .map(decode_digit)
        .collect();

    // Id digits use the second alphabet and were stored reversed; unknown
    // characters pass through untouched.
    let user_id: String = chars[9..chars.len() - 4]
        .iter()
        .rev()
        .map(|&c| match codec::ID_ALPHABET.find(c) {
            Some(idx) => (b'0' + idx as u8) as char,
            None => c,
        })
        .collect();

    let full_date = format!("{yyyy}{mmdd}");
    let expiry = if full_date == codec::PERMANENT_DATE {
        Expiry::Permanent
    } else {
        match DateUtils::parse_compact(&full_date) {
            Some(date) => Expiry::On(date),
            None => Expiry::Unreadable(full_date),
        }
    };

    let is_expired = matches!(&expiry, Expiry::On(date) if *date < today);

    let status = if status_digit == '1' {
        LicenseStatus::Bound
    } else {
        LicenseStatus::Vip
    };

    Ok(TokenInfo {
        signature_digits,
        user_id,
        status,
        expiry,
        is_expired,
    })
}

/// Exact inverse of [`decode_at`] for every encodable tuple: numeric user
/// id, 0..=9999 signature, calendar or permanent expiry.
pub fn encode(signature: u32, status: LicenseStatus, expiry: &Expiry, user_id: &str) -> String {
    let sig: String = format!("{:04}", signature % 10000)
        .chars()
        .map(encode_digit)
        .collect();

    let status_digit = match status {
        LicenseStatus::Bound => '1',
        LicenseStatus::Vip => '2',
    };

    let full_date = match expiry {
        Expiry::Permanent => codec::PERMANENT_DATE.to_string(),
        Expiry::On(date) => date.format(DateUtils::COMPACT_FORMAT).to_string(),
        Expiry::Unreadable(digits) => digits.clone(),
    };
    let (yyyy, mmdd) = full_date.split_at(4);

    let id: String = user_id
        .chars()
        .rev()
        .map(|c| digit_to_alphabet(c, codec::ID_ALPHABET))
        .collect();

    format!(
        "{prefix}{sig}{status}{mmdd}{id}{yyyy}",
        prefix = SIGNATURE_PREFIX,
        status = encode_digit(status_digit),
        mmdd = mmdd.chars().map(encode_digit).collect::<String>(),
        yyyy = yyyy.chars().map(encode_digit).collect::<String>(),
    )
}
