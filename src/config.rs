use std::env;

const DEV_JWT_SECRET: &str = "default-secret-change-me";
/// Validade máxima do token: um ano
const MAX_JWT_EXPIRATION_HOURS: i64 = 24 * 365;

/// Configuração da aplicação, carregada das variáveis de ambiente
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_audience: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    /// Sufixo exigido nos emails de cadastro (vazio = qualquer domínio)
    pub allowed_email_domain: String,
    /// Emails com permissão de gerenciar o catálogo
    pub admin_emails: Vec<String>,
    /// Origens CORS permitidas (vazio = qualquer origem)
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        let database_url =
            env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set".to_string())?;

        let jwt_secret = env::var("JWT_SECRET").unwrap_or_else(|_| {
            log::warn!("⚠️  JWT_SECRET not set, using development default");
            DEV_JWT_SECRET.to_string()
        });

        Ok(Self {
            host: var_or("HOST", "0.0.0.0"),
            port: parse_or("PORT", 5000)?,
            database_url,
            jwt_secret,
            jwt_issuer: var_or("JWT_ISSUER", "course-matcher"),
            jwt_audience: var_or("JWT_AUDIENCE", "course-matcher-api"),
            jwt_expiration_hours: expiration_hours(parse_or("JWT_EXPIRATION_HOURS", 24)?)?,
            bcrypt_cost: parse_or("BCRYPT_COST", 10)?,
            allowed_email_domain: var_or("ALLOWED_EMAIL_DOMAIN", "@mytru.ca"),
            admin_emails: split_list(&env::var("ADMIN_EMAILS").unwrap_or_default())
                .into_iter()
                .map(|email| email.to_lowercase())
                .collect(),
            cors_origins: split_list(&env::var("CORS_ORIGINS").unwrap_or_default()),
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|e| format!("Invalid {} value '{}': {}", key, raw, e)),
        Err(_) => Ok(default),
    }
}

fn expiration_hours(hours: i64) -> Result<i64, String> {
    if (1..=MAX_JWT_EXPIRATION_HOURS).contains(&hours) {
        Ok(hours)
    } else {
        Err(format!(
            "JWT_EXPIRATION_HOURS must be between 1 and {}, got {}",
            MAX_JWT_EXPIRATION_HOURS, hours
        ))
    }
}

/// "a, b,,c" -> ["a", "b", "c"]
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
impl AppConfig {
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            database_url: "mongodb://localhost:27017/course_matcher_test".to_string(),
            jwt_secret: "test-secret".to_string(),
            jwt_issuer: "course-matcher".to_string(),
            jwt_audience: "course-matcher-api".to_string(),
            jwt_expiration_hours: 1,
            bcrypt_cost: 4,
            allowed_email_domain: "@mytru.ca".to_string(),
            admin_emails: vec!["registrar@mytru.ca".to_string()],
            cors_origins: vec![],
        }
    }
}
