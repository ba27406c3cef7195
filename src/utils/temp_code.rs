//! Temporary code and password generation for org ward first-time login.
//!
//! Temp codes use the fixed format `lumtempcode-<uuid v4>` so the auth flow
//! can distinguish temp-code logins from ordinary usernames before touching
//! the database.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use uuid::Uuid;

pub const TEMP_CODE_PREFIX: &str = "lumtempcode-";

pub const DEFAULT_PASSWORD_LENGTH: usize = 12;

const PASSWORD_CHARSET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";
const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SYMBOLS: &[u8] = b"!@#$%^&*";

/// Generate a temporary login code: `lumtempcode-{uuid}`.
pub fn generate_code() -> String {
    format!("{}{}", TEMP_CODE_PREFIX, Uuid::new_v4())
}

/// Check whether a login identifier is a temp code (cheap prefix test).
pub fn is_temp_code(username: &str) -> bool {
    username.starts_with(TEMP_CODE_PREFIX)
}

/// Strict structural check of the temp code format, used as a pre-filter
/// before any database lookup. Hex groups of 8-4-4-4-12 with the v4 version
/// nibble and an RFC 4122 variant nibble, case-insensitive.
pub fn is_valid_code_format(code: &str) -> bool {
    let Some(rest) = code.strip_prefix(TEMP_CODE_PREFIX) else {
        return false;
    };

    let bytes = rest.as_bytes();
    if bytes.len() != 36 {
        return false;
    }

    for (i, &b) in bytes.iter().enumerate() {
        let ok = match i {
            8 | 13 | 18 | 23 => b == b'-',
            // version nibble: always 4
            14 => b == b'4',
            // variant nibble: 8, 9, a or b
            19 => matches!(b.to_ascii_lowercase(), b'8' | b'9' | b'a' | b'b'),
            _ => b.is_ascii_hexdigit(),
        };
        if !ok {
            return false;
        }
    }

    true
}

/// Generate a random password guaranteed to contain at least one uppercase
/// letter, one lowercase letter, one digit and one symbol. The guaranteed
/// characters are shuffled into the rest so their positions are not
/// predictable.
pub fn generate_password(length: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut chars: Vec<char> = Vec::with_capacity(length);

    for set in [UPPERCASE, LOWERCASE, DIGITS, SYMBOLS] {
        chars.push(set[rng.gen_range(0..set.len())] as char);
    }

    while chars.len() < length {
        chars.push(PASSWORD_CHARSET[rng.gen_range(0..PASSWORD_CHARSET.len())] as char);
    }

    chars.shuffle(&mut rng);
    chars.into_iter().collect()
}

/// Expiry timestamp `days` from now.
pub fn expiry_date(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}
