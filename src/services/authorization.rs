use std::collections::HashSet;

use crate::models::ROLE_ADMIN;
use crate::services::auth_service::Claims;
use crate::utils::error::AppError;

/// Ações que exigem privilégio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Criar, alterar e remover disciplinas do catálogo
    ManageCatalog,
}

/// Decide permissões pelos roles do token e pela lista de emails configurada
#[derive(Debug, Clone, Default)]
pub struct Authorizer {
    admin_emails: HashSet<String>,
}

impl Authorizer {
    pub fn new<I, S>(admin_emails: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            admin_emails: admin_emails
                .into_iter()
                .map(|email| email.as_ref().trim().to_lowercase())
                .collect(),
        }
    }

    pub fn allows(&self, claims: &Claims, capability: Capability) -> bool {
        match capability {
            Capability::ManageCatalog => {
                claims.roles.iter().any(|role| role == ROLE_ADMIN)
                    || self.admin_emails.contains(&claims.email.to_lowercase())
            }
        }
    }

    pub fn require(&self, claims: &Claims, capability: Capability) -> Result<(), AppError> {
        if self.allows(claims, capability) {
            Ok(())
        } else {
            log::warn!("🚫 {} denied {:?}", claims.email, capability);
            Err(AppError::Forbidden(
                "Access denied. Only admin can manage courses.".to_string(),
            ))
        }
    }
}
