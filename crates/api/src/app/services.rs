//! Service wiring: one identity-provider handle shared by every stage.

use std::sync::Arc;

use thiserror::Error;

use loangate_auth::{
    CredentialVerifier, DirectoryError, IdentityProvider, JwtIdentityProvider, RoleAssignmentService,
    TimeoutProvider, UserDirectory,
};

use crate::config::ApiConfig;
use crate::middleware::AuthState;

#[derive(Debug, Error)]
pub enum ServicesError {
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

/// Request-independent services handed to routes and middleware.
#[derive(Clone)]
pub struct AppServices {
    pub provider: Arc<dyn IdentityProvider>,
    pub verifier: CredentialVerifier,
    pub role_assignment: RoleAssignmentService,
}

impl AppServices {
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self {
            verifier: CredentialVerifier::new(provider.clone()),
            role_assignment: RoleAssignmentService::new(provider.clone()),
            provider,
        }
    }

    pub fn auth_state(&self) -> AuthState {
        AuthState {
            verifier: self.verifier.clone(),
        }
    }
}

/// Build the identity provider described by `config`.
pub fn build_provider(config: &ApiConfig) -> Result<Arc<dyn IdentityProvider>, ServicesError> {
    let directory = match &config.users_file {
        Some(path) => {
            let directory = UserDirectory::load_json(path)?;
            tracing::info!(path = %path.display(), users = directory.len(), "loaded user directory");
            directory
        }
        None => {
            tracing::warn!("USERS_FILE not set; user directory starts empty");
            UserDirectory::new()
        }
    };

    let provider: Arc<dyn IdentityProvider> = Arc::new(JwtIdentityProvider::new(
        config.jwt_secret_or_dev_default().as_bytes(),
        Arc::new(directory),
    ));

    Ok(match config.provider_timeout {
        Some(deadline) => Arc::new(TimeoutProvider::new(provider, deadline)),
        None => provider,
    })
}
