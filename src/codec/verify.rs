//! Anti-tamper gate: the export is stamped with a checksum of its most
//! recent data date. A mismatch means the file was edited or re-dated; a
//! match with an expired license is rejected separately so the user sees
//! the expiry date, not a tamper warning.

use crate::{
    codec::TokenInfo,
    config::constants::codec::{CHECKSUM_MODULUS, CHECKSUM_MULTIPLIER, CHECKSUM_OFFSET},
    error::IngestError,
    models::Expiry,
    utils::DateUtils,
};

/// Checksum over the compact data date (must match the exporter formula
/// exactly: `(date * 3 + 888) % 10000`).
pub fn checksum(date_digits: u64) -> u32 {
    ((date_digits * CHECKSUM_MULTIPLIER + CHECKSUM_OFFSET) % CHECKSUM_MODULUS) as u32
}

/// Gate a decoded token against the first (newest) date in the file.
/// Passing means: signature matches the checksum AND the license is not
/// expired. Both failures abort ingestion before any Dataset mutation.
pub fn verify(info: &TokenInfo, first_date: &str) -> Result<(), IngestError> {
    let digits = DateUtils::compact_digits(first_date);
    let day: u64 = digits.parse().map_err(|_| {
        IngestError::TokenFormat(format!("data date '{first_date}' is not numeric"))
    })?;

    let expected = checksum(day);
    if info.signature() != Some(expected) {
        return Err(IngestError::SignatureMismatch {
            expected,
            embedded: info.signature_digits.clone(),
        });
    }

    if info.is_expired {
        if let Expiry::On(date) = &info.expiry {
            return Err(IngestError::TokenExpired(*date));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        crate::{
            codec::{decode_at, encode},
            models::{Expiry, LicenseStatus},
        },
        chrono::NaiveDate,
    };

    fn token_for(signature: u32, expiry: Expiry) -> TokenInfo {
        let encoded = encode(signature, LicenseStatus::Vip, &expiry, "123");
        decode_at(&encoded, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()).unwrap()
    }

    #[test]
    fn formula_holds_across_the_full_date_range() {
        struct TestCase {
            date: u64,
            expected: u32,
        }

        let tests = [
            // TC0: all-zero boundary
            TestCase {
                date: 0,
                expected: 888,
            },
            // TC1: real trading day
            TestCase {
                date: 20260212,
                expected: 1524,
            },
            // TC2: top boundary
            TestCase {
                date: 99999999,
                expected: 885,
            },
        ];

        for (index, test) in tests.into_iter().enumerate() {
            assert_eq!(checksum(test.date), test.expected, "TC{index} failed");

            let info = token_for(test.expected, Expiry::Permanent);
            assert!(
                verify(&info, &format!("{:08}", test.date)).is_ok(),
                "TC{index} verify failed"
            );
        }
    }

    #[test]
    fn off_by_one_signature_is_a_mismatch_not_a_format_error() {
        let info = token_for(1525, Expiry::Permanent);
        let err = verify(&info, "20260212").unwrap_err();
        assert_eq!(
            err,
            IngestError::SignatureMismatch {
                expected: 1524,
                embedded: "1525".to_string(),
            }
        );
    }

    #[test]
    fn date_separators_are_stripped_before_the_checksum() {
        let info = token_for(1524, Expiry::Permanent);
        assert!(verify(&info, "2026/02/12").is_ok());
        assert!(verify(&info, "2026-02-12").is_ok());
    }

    #[test]
    fn expired_but_correctly_signed_token_reports_the_expiry_date() {
        let expiry_date = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        let info = token_for(1524, Expiry::On(expiry_date));
        assert!(info.is_expired);

        let err = verify(&info, "20260212").unwrap_err();
        assert_eq!(err, IngestError::TokenExpired(expiry_date));
    }

    #[test]
    fn unreadable_signature_digits_never_pass() {
        let mut info = token_for(888, Expiry::Permanent);
        info.signature_digits = "08??".to_string();
        assert!(matches!(
            verify(&info, "00000000"),
            Err(IngestError::SignatureMismatch { .. })
        ));
    }
}
