use rand::Rng;
use time::OffsetDateTime;

use crate::error::ApiError;

/// Six-digit verification code, uniform over [100000, 999999].
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(100_000..=999_999).to_string()
}

/// Decide whether a submitted code verifies against the stored one. The
/// stored pair is either both set or both absent; absent means no code was
/// ever issued (or it was already consumed). Mismatch is reported before
/// expiry, matching the original flow.
pub(crate) fn check_otp(
    stored: Option<&str>,
    expires: Option<OffsetDateTime>,
    submitted: &str,
    now: OffsetDateTime,
) -> Result<(), ApiError> {
    let (code, expires) = match (stored, expires) {
        (Some(code), Some(expires)) => (code, expires),
        _ => return Err(ApiError::NoOtpSet),
    };
    if code != submitted {
        return Err(ApiError::InvalidOtp);
    }
    if expires < now {
        return Err(ApiError::OtpExpired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Duration as TimeDuration;

    #[test]
    fn otp_is_six_digits_in_range() {
        for _ in 0..1000 {
            let code = generate_otp();
            assert_eq!(code.len(), 6);
            let n: u32 = code.parse().expect("numeric");
            assert!((100_000..=999_999).contains(&n));
        }
    }

    #[test]
    fn correct_code_before_expiry_verifies() {
        let now = OffsetDateTime::now_utc();
        let expires = now + TimeDuration::minutes(10);
        assert!(check_otp(Some("123456"), Some(expires), "123456", now).is_ok());
    }

    #[test]
    fn wrong_code_is_rejected() {
        let now = OffsetDateTime::now_utc();
        let expires = now + TimeDuration::minutes(10);
        let err = check_otp(Some("123456"), Some(expires), "654321", now).unwrap_err();
        assert!(matches!(err, ApiError::InvalidOtp));
    }

    #[test]
    fn expired_code_is_rejected() {
        let now = OffsetDateTime::now_utc();
        let expires = now - TimeDuration::minutes(1);
        let err = check_otp(Some("123456"), Some(expires), "123456", now).unwrap_err();
        assert!(matches!(err, ApiError::OtpExpired));
    }

    #[test]
    fn cleared_code_cannot_be_resubmitted() {
        // After successful verification both fields are cleared; sending the
        // same code again must fail as never-issued.
        let now = OffsetDateTime::now_utc();
        let err = check_otp(None, None, "123456", now).unwrap_err();
        assert!(matches!(err, ApiError::NoOtpSet));
    }

    #[test]
    fn half_set_pair_counts_as_not_issued() {
        let now = OffsetDateTime::now_utc();
        let err = check_otp(Some("123456"), None, "123456", now).unwrap_err();
        assert!(matches!(err, ApiError::NoOtpSet));
        let err = check_otp(None, Some(now), "123456", now).unwrap_err();
        assert!(matches!(err, ApiError::NoOtpSet));
    }
}
