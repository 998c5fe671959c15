//! Input validation for amounts and free-text arguments.
//!
//! Amounts are expressed in the token's smallest unit and must be strictly
//! positive. Text arguments are bounded so that records stay small:
//! - memos: at most 256 bytes
//! - info URLs: at most 256 bytes
//! - identity hashes: at most 128 bytes

use soroban_sdk::String;

/// Maximum memo length in bytes.
pub const MAX_MEMO_LENGTH: u32 = 256;

/// Maximum info URL length in bytes.
pub const MAX_INFO_URL_LENGTH: u32 = 256;

/// Maximum identity hash length in bytes.
pub const MAX_IDHASH_LENGTH: u32 = 128;

/// Check that a quantity can be moved between buckets or accounts.
#[inline]
pub fn validate_amount(amount: i128) -> bool {
    amount > 0
}

/// Check that a quantity can seed a balance bucket.
#[inline]
pub fn validate_opening_amount(amount: i128) -> bool {
    amount >= 0
}

pub fn validate_memo(memo: &String) -> bool {
    memo.len() <= MAX_MEMO_LENGTH
}

pub fn validate_info_url(url: &String) -> bool {
    url.len() <= MAX_INFO_URL_LENGTH
}

pub fn validate_idhash(idhash: &String) -> bool {
    idhash.len() <= MAX_IDHASH_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;
    use soroban_sdk::Env;

    #[test]
    fn test_amounts() {
        assert!(validate_amount(1));
        assert!(validate_amount(i128::MAX));
        assert!(!validate_amount(0));
        assert!(!validate_amount(-5));

        assert!(validate_opening_amount(0));
        assert!(!validate_opening_amount(-1));
    }

    #[test]
    fn test_text_bounds() {
        let env = Env::default();

        assert!(validate_memo(&String::from_str(&env, "")));
        assert!(validate_memo(&String::from_str(&env, "gift for alice")));

        let long = [b'x'; 257];
        let long = core::str::from_utf8(&long).unwrap();
        assert!(!validate_memo(&String::from_str(&env, long)));
        assert!(!validate_info_url(&String::from_str(&env, long)));
        assert!(validate_info_url(&String::from_str(&env, &long[..256])));

        assert!(validate_idhash(&String::from_str(&env, &long[..128])));
        assert!(!validate_idhash(&String::from_str(&env, &long[..129])));
    }
}
