//! Registration token models and the redemption state machine.
//!
//! Tokens move strictly forward: ACTIVE → USED (uses exhausted),
//! ACTIVE → EXPIRED (past expiry, evaluated lazily on read) and
//! ACTIVE → REVOKED (administrative). A multi-use token stays ACTIVE after
//! a redemption that does not exhaust `max_uses`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(
    Serialize, Deserialize, sqlx::Type, Debug, Clone, Copy, PartialEq, Eq, ToSchema,
)]
#[sqlx(type_name = "token_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum TokenStatus {
    Active,
    Used,
    Expired,
    Revoked,
}

impl TokenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenStatus::Active => "ACTIVE",
            TokenStatus::Used => "USED",
            TokenStatus::Expired => "EXPIRED",
            TokenStatus::Revoked => "REVOKED",
        }
    }
}

/// An organization-issued registration token.
#[derive(Serialize, FromRow, Debug, Clone, ToSchema)]
pub struct RegistrationToken {
    pub id: Uuid,
    pub token: String,
    pub generated_by_user_id: Uuid,
    pub organization_id: Uuid,
    pub status: TokenStatus,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub max_uses: i32,
    pub current_uses: i32,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub used_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// Generate an opaque token string: `lumreg-{uuid}`.
pub fn generate_token_string() -> String {
    format!("lumreg-{}", Uuid::new_v4())
}

#[derive(Deserialize, Debug, Validate, ToSchema)]
pub struct CreateTokenDto {
    /// Hint shown to the student during self-service registration.
    #[validate(length(min = 1, max = 200))]
    pub student_name: Option<String>,
    #[validate(email)]
    pub student_email: Option<String>,
    /// Defaults to 1.
    #[validate(range(min = 1, max = 100))]
    pub max_uses: Option<i32>,
    /// Defaults to 7.
    #[validate(range(min = 1, max = 365))]
    pub expires_in_days: Option<i64>,
}

#[derive(Deserialize, Debug, ToSchema)]
pub struct RedeemTokenRequest {
    pub token: String,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct RedeemTokenResponse {
    pub organization_id: Uuid,
    pub organization_name: String,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub remaining_uses: i32,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct TokenListParams {
    pub status: Option<TokenStatus>,
}

/// Per-status counts for an organization, lazy-expiry aware: overdue ACTIVE
/// rows count as expired even before being rewritten.
#[derive(Serialize, FromRow, Debug, ToSchema)]
pub struct TokenStatsResponse {
    pub total: i64,
    pub active: i64,
    pub used: i64,
    pub expired: i64,
    pub revoked: i64,
}

/// Why a redemption was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemFailure {
    AlreadyUsed,
    Expired,
    Revoked,
}

impl RedeemFailure {
    pub fn message(&self) -> &'static str {
        match self {
            RedeemFailure::AlreadyUsed => "This registration token has already been used",
            RedeemFailure::Expired => "This registration token has expired",
            RedeemFailure::Revoked => "This registration token has been revoked",
        }
    }
}

/// What a redemption attempt should do to the token row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedeemDecision {
    /// Increment `current_uses`; flip to USED when `exhausts` is set.
    Consume { exhausts: bool },
    Fail(RedeemFailure),
}

/// Pure redemption decision. `expired` is the lazy expiry check
/// (`expires_at < now`) evaluated by the caller; holding the row lock while
/// deciding is what makes the increment safe under concurrency.
pub fn redeem_decision(
    status: TokenStatus,
    expired: bool,
    current_uses: i32,
    max_uses: i32,
) -> RedeemDecision {
    match status {
        TokenStatus::Used => RedeemDecision::Fail(RedeemFailure::AlreadyUsed),
        TokenStatus::Expired => RedeemDecision::Fail(RedeemFailure::Expired),
        TokenStatus::Revoked => RedeemDecision::Fail(RedeemFailure::Revoked),
        TokenStatus::Active if expired => RedeemDecision::Fail(RedeemFailure::Expired),
        TokenStatus::Active => {
            if current_uses >= max_uses {
                RedeemDecision::Fail(RedeemFailure::AlreadyUsed)
            } else {
                RedeemDecision::Consume {
                    exhausts: current_uses + 1 == max_uses,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_use_token_exhausts_on_first_redemption() {
        assert_eq!(
            redeem_decision(TokenStatus::Active, false, 0, 1),
            RedeemDecision::Consume { exhausts: true }
        );
    }

    #[test]
    fn test_multi_use_token_stays_active_until_last_use() {
        assert_eq!(
            redeem_decision(TokenStatus::Active, false, 0, 2),
            RedeemDecision::Consume { exhausts: false }
        );
        assert_eq!(
            redeem_decision(TokenStatus::Active, false, 1, 2),
            RedeemDecision::Consume { exhausts: true }
        );
    }

    #[test]
    fn test_terminal_states_fail_with_specific_reasons() {
        assert_eq!(
            redeem_decision(TokenStatus::Used, false, 2, 2),
            RedeemDecision::Fail(RedeemFailure::AlreadyUsed)
        );
        assert_eq!(
            redeem_decision(TokenStatus::Expired, false, 0, 1),
            RedeemDecision::Fail(RedeemFailure::Expired)
        );
        assert_eq!(
            redeem_decision(TokenStatus::Revoked, false, 0, 1),
            RedeemDecision::Fail(RedeemFailure::Revoked)
        );
    }

    #[test]
    fn test_lazy_expiry_beats_remaining_uses() {
        // An overdue ACTIVE token fails even with uses left.
        assert_eq!(
            redeem_decision(TokenStatus::Active, true, 0, 5),
            RedeemDecision::Fail(RedeemFailure::Expired)
        );
    }

    #[test]
    fn test_exhausted_active_row_cannot_be_consumed() {
        // Such a row should already carry USED; the counter still refuses.
        assert_eq!(
            redeem_decision(TokenStatus::Active, false, 3, 3),
            RedeemDecision::Fail(RedeemFailure::AlreadyUsed)
        );
    }
}
