//! Tagged-union results for authentication and verification flows.
//!
//! Every expected business outcome is an explicit variant so callers
//! pattern-match exhaustively instead of catching errors or testing nulls.

use crate::domain::User;

/// Why a login or refresh attempt was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    EmailNotVerified,
    InvalidCredentials,
    UserNotRegistered,
    RefreshTokenInvalid,
}

/// Result of the account-level credential check, before any token is minted.
#[derive(Debug, Clone)]
pub enum LoginCheck {
    Verified(User),
    Rejected(AuthFailure),
}

/// Result of a user-facing login or refresh operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated {
        access_token: String,
        refresh_token: String,
    },
    Rejected(AuthFailure),
}

/// Why a verification mail could not be (re)sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationFailure {
    EmailNotSent,
    UserNotFound,
    WindowExpired,
    AlreadyVerified,
}

/// Result of the resend-verification flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    Sent,
    Rejected(VerificationFailure),
}
