use crate::utils::error::AppError;
use mongodb::bson::oid::ObjectId;

/// Normaliza e valida um email institucional.
///
/// Retorna o email em minúsculas, sem espaços nas bordas.
pub fn normalize_email(raw: &str, allowed_domain: &str) -> Result<String, AppError> {
    let email = raw.trim().to_lowercase();

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| AppError::InvalidRequest("Invalid email address".to_string()))?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Err(AppError::InvalidRequest("Invalid email address".to_string()));
    }

    if email.chars().any(char::is_whitespace) {
        return Err(AppError::InvalidRequest("Invalid email address".to_string()));
    }

    if !allowed_domain.is_empty() && !email.ends_with(&allowed_domain.to_lowercase()) {
        return Err(AppError::InvalidRequest(format!(
            "Email must end with {}",
            allowed_domain
        )));
    }

    Ok(email)
}

/// Falha se algum campo obrigatório estiver vazio
pub fn require_fields(fields: &[(&str, &str)]) -> Result<(), AppError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidRequest(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

pub fn parse_object_id(raw: &str, what: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw.trim())
        .map_err(|_| AppError::InvalidRequest(format!("Invalid {} id", what)))
}
