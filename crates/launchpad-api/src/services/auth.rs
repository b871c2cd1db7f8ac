use chrono::{Duration, Utc};
use launchpad_core::models::{
    email_verification_identifier, normalize_email, AuthSession, SessionMetadata,
    SignInRequest, SignUpRequest, User, CREDENTIAL_PROVIDER,
};
use launchpad_core::{AppError, Config};
use launchpad_db::{AccountRepository, SessionRepository, UserRepository, VerificationRepository};
use validator::Validate;

use crate::auth::cookie::{clear_session_cookie, generate_token, session_cookie};
use crate::auth::password::{
    hash_password_blocking, verify_dummy_password_blocking, verify_password_blocking,
};

/// Lifetime of an email verification token
const EMAIL_VERIFICATION_TTL_HOURS: i64 = 24;

/// A newly created session and the `Set-Cookie` value that carries it
#[derive(Debug)]
pub struct IssuedSession {
    pub auth: AuthSession,
    pub cookie: String,
}

/// Sign-up, sign-in, sign-out and email verification
#[derive(Clone)]
pub struct AuthService {
    users: UserRepository,
    accounts: AccountRepository,
    sessions: SessionRepository,
    verifications: VerificationRepository,
    secret: String,
    base_url: String,
    session_ttl: Duration,
    secure_cookies: bool,
}

impl AuthService {
    pub fn new(
        config: &Config,
        users: UserRepository,
        accounts: AccountRepository,
        sessions: SessionRepository,
        verifications: VerificationRepository,
    ) -> Self {
        Self {
            users,
            accounts,
            sessions,
            verifications,
            secret: config.auth_secret().to_string(),
            base_url: config.auth_base_url().trim_end_matches('/').to_string(),
            session_ttl: Duration::hours(config.session_ttl_hours()),
            secure_cookies: config.is_production(),
        }
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// `Set-Cookie` value that signs the browser out
    pub fn clear_cookie(&self) -> String {
        clear_session_cookie(self.secure_cookies)
    }

    #[tracing::instrument(skip_all)]
    pub async fn sign_up(
        &self,
        mut request: SignUpRequest,
        metadata: SessionMetadata,
    ) -> Result<IssuedSession, AppError> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::InvalidInput("Name must not be blank".to_string()));
        }

        let password_hash = hash_password_blocking(request.password).await?;
        let user = self
            .users
            .create_with_password(name, &request.email, &password_hash)
            .await?;

        let token = generate_token();
        let expires_at = Utc::now() + Duration::hours(EMAIL_VERIFICATION_TTL_HOURS);
        self.verifications
            .create(&email_verification_identifier(user.id), &token, expires_at)
            .await?;

        // No mailer is configured, so the link goes to the log.
        tracing::info!(
            user_id = %user.id,
            verification_url = %format!("{}/api/auth/verify-email?token={}", self.base_url, token),
            "Email verification issued"
        );

        self.issue_session(user, &metadata).await
    }

    /// Unknown emails and wrong passwords fail the same way.
    #[tracing::instrument(skip_all)]
    pub async fn sign_in(
        &self,
        mut request: SignInRequest,
        metadata: SessionMetadata,
    ) -> Result<IssuedSession, AppError> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        let Some(user) = self.users.find_by_email(&request.email).await? else {
            tracing::debug!("Sign-in for unknown email");
            verify_dummy_password_blocking(request.password).await?;
            return Err(AppError::InvalidCredentials);
        };

        let Some(password_hash) = self
            .accounts
            .find_credential(user.id)
            .await?
            .filter(|account| account.provider_id == CREDENTIAL_PROVIDER)
            .and_then(|account| account.password)
        else {
            tracing::debug!(user_id = %user.id, "Sign-in without a credential account");
            verify_dummy_password_blocking(request.password).await?;
            return Err(AppError::InvalidCredentials);
        };

        if !verify_password_blocking(request.password, password_hash).await? {
            tracing::debug!(user_id = %user.id, "Sign-in with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        self.issue_session(user, &metadata).await
    }

    /// Delete the session behind `token`. Signing out twice is not an error.
    pub async fn sign_out(&self, token: Option<&str>) -> Result<(), AppError> {
        if let Some(token) = token {
            let deleted = self.sessions.delete_by_token(token).await?;
            tracing::debug!(deleted, "Session signed out");
        }
        Ok(())
    }

    /// Consume an email verification token and mark the owner verified.
    #[tracing::instrument(skip(self, token))]
    pub async fn verify_email(&self, token: &str) -> Result<(), AppError> {
        let invalid = || AppError::BadRequest("Invalid or expired verification token".to_string());

        let verification = self
            .verifications
            .take_valid(token)
            .await?
            .ok_or_else(invalid)?;
        let user_id = verification
            .email_verification_user()
            .ok_or_else(invalid)?;

        if !self.users.mark_email_verified(user_id).await? {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        tracing::info!(user_id = %user_id, "Email verified");
        Ok(())
    }

    async fn issue_session(
        &self,
        user: User,
        metadata: &SessionMetadata,
    ) -> Result<IssuedSession, AppError> {
        let token = generate_token();
        let expires_at = Utc::now() + self.session_ttl;
        let session = self
            .sessions
            .create(user.id, &token, expires_at, metadata)
            .await?;

        tracing::info!(user_id = %user.id, session_id = %session.id, "Session created");

        let cookie = session_cookie(
            &token,
            &self.secret,
            self.session_ttl.num_seconds(),
            self.secure_cookies,
        );
        Ok(IssuedSession {
            auth: AuthSession { user, session },
            cookie,
        })
    }
}
