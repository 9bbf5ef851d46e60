//! Authentication handlers - thin mapping between HTTP and the auth service.

use actix_web::{HttpResponse, web};

use sentra_core::domain::{AuthOutcome, Credentials, VerificationFailure, VerificationOutcome};
use sentra_core::ports::TokenService;
use sentra_shared::dto::{
    AuthResponse, LoginRequest, MessageResponse, RefreshRequest, RegisterRequest,
    ResendVerificationRequest, UserResponse,
};

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult, auth_failure_error};
use crate::state::AppState;

/// POST /api/auth/register
pub async fn register(
    state: web::Data<AppState>,
    body: web::Json<RegisterRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let violations = state
        .auth
        .register(&req.name, &req.email, &req.password)
        .await?;

    if !violations.is_empty() {
        return Err(AppError::Validation(violations));
    }

    Ok(HttpResponse::Created().json(MessageResponse {
        message: "Registered. Check your e-mail to verify the account.".to_string(),
    }))
}

/// POST /api/auth/login
pub async fn login(
    state: web::Data<AppState>,
    body: web::Json<LoginRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let credentials = Credentials::new(req.email, req.password);

    match state.auth.login(&credentials).await? {
        AuthOutcome::Rejected(reason) => Err(auth_failure_error(reason)),
        AuthOutcome::Authenticated {
            access_token,
            refresh_token,
        } => Ok(HttpResponse::Ok().json(AuthResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: state.tokens.access_ttl_seconds() as u64,
        })),
    }
}

/// POST /api/auth/refresh
pub async fn refresh(
    state: web::Data<AppState>,
    body: web::Json<RefreshRequest>,
) -> AppResult<HttpResponse> {
    match state.auth.refresh(&body.refresh_token).await? {
        AuthOutcome::Rejected(reason) => Err(auth_failure_error(reason)),
        AuthOutcome::Authenticated {
            access_token,
            refresh_token,
        } => Ok(HttpResponse::Ok().json(AuthResponse {
            access_token,
            refresh_token,
            token_type: "Bearer".to_string(),
            expires_in: state.tokens.access_ttl_seconds() as u64,
        })),
    }
}

/// GET /api/auth/verify-email/{token}
pub async fn verify_email(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let token = path.into_inner();

    if state.auth.confirm_email(&token).await? {
        Ok(HttpResponse::Ok().json(MessageResponse {
            message: "E-mail verified. You can sign in now.".to_string(),
        }))
    } else {
        Err(AppError::BadRequest(
            "Verification link is invalid or expired.".to_string(),
        ))
    }
}

/// POST /api/auth/resend-verification
pub async fn resend_verification(
    state: web::Data<AppState>,
    body: web::Json<ResendVerificationRequest>,
) -> AppResult<HttpResponse> {
    match state.auth.resend_verification(&body.email).await? {
        VerificationOutcome::Sent => Ok(HttpResponse::Accepted().json(MessageResponse {
            message: "Verification mail sent.".to_string(),
        })),
        VerificationOutcome::Rejected(reason) => Err(match reason {
            VerificationFailure::UserNotFound => {
                AppError::NotFound("No account for that e-mail address".to_string())
            }
            VerificationFailure::AlreadyVerified => {
                AppError::Conflict("E-mail address is already verified".to_string())
            }
            VerificationFailure::WindowExpired => {
                AppError::Gone("The verification window has expired".to_string())
            }
            VerificationFailure::EmailNotSent => {
                AppError::BadGateway("Verification mail could not be sent".to_string())
            }
        }),
    }
}

/// GET /api/auth/me - Protected route
pub async fn me(state: web::Data<AppState>, identity: Identity) -> AppResult<HttpResponse> {
    tracing::debug!(user = %identity.email, "Profile requested");

    let user = state
        .accounts
        .find_by_id(identity.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Account no longer exists".to_string()))?;

    Ok(HttpResponse::Ok().json(UserResponse {
        id: user.id.to_string(),
        name: user.name,
        email: user.email,
        verified: user.verified,
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{App, test, web};

    use super::*;
    use crate::handlers::configure_routes;

    fn test_state() -> AppState {
        AppState::in_memory("http://localhost:8080")
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .app_data(web::Data::new(Arc::clone(&$state.tokens)))
                    .configure(configure_routes),
            )
            .await
        };
    }

    #[actix_rt::test]
    async fn register_rejects_weak_password_with_violations() {
        let state = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(RegisterRequest {
                name: "Ann".to_string(),
                email: "ann@x.com".to_string(),
                password: "weak".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 422);
    }

    #[actix_rt::test]
    async fn register_verify_login_flow() {
        let state = test_state();
        let app = test_app!(state);

        // Register
        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(RegisterRequest {
                name: "Ann".to_string(),
                email: "ann@x.com".to_string(),
                password: "Secret1!".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 201);

        // Login before verification is forbidden
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(LoginRequest {
                email: "ann@x.com".to_string(),
                password: "Secret1!".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 403);

        // Follow the verification link
        let token = state
            .accounts
            .create_verification_token("ann@x.com")
            .await
            .unwrap()
            .unwrap();
        let req = test::TestRequest::get()
            .uri(&format!("/api/auth/verify-email/{token}"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        // Login now succeeds with a full token pair
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(LoginRequest {
                email: "ann@x.com".to_string(),
                password: "Secret1!".to_string(),
            })
            .to_request();
        let auth: AuthResponse = test::call_and_read_body_json(&app, req).await;
        assert!(!auth.access_token.is_empty());
        assert!(!auth.refresh_token.is_empty());
        assert_ne!(auth.access_token, auth.refresh_token);

        // The access token authenticates /me
        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {}", auth.access_token)))
            .to_request();
        let me: UserResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(me.email, "ann@x.com");
        assert!(me.verified);

        // The refresh token mints a fresh access token
        let req = test::TestRequest::post()
            .uri("/api/auth/refresh")
            .set_json(RefreshRequest {
                refresh_token: auth.refresh_token.clone(),
            })
            .to_request();
        let refreshed: AuthResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(refreshed.refresh_token, auth.refresh_token);
        assert!(!refreshed.access_token.is_empty());
    }

    #[actix_rt::test]
    async fn login_with_unknown_account_is_unauthorized() {
        let state = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(LoginRequest {
                email: "ghost@x.com".to_string(),
                password: "Secret1!".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
    }

    #[actix_rt::test]
    async fn verify_with_unknown_token_is_bad_request() {
        let state = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/auth/verify-email/not-a-real-token")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 400);
    }

    #[actix_rt::test]
    async fn refresh_with_garbage_token_is_unauthorized() {
        let state = test_state();
        let app = test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/auth/refresh")
            .set_json(RefreshRequest {
                refresh_token: "garbage".to_string(),
            })
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), 401);
    }
}
