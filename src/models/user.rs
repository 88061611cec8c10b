use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_ADMIN: &str = "admin";

// User model
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub name: String,
    /// Hash bcrypt da senha
    #[serde(rename = "password")]
    pub password_hash: String,
    /// Disciplinas matriculadas, sem repetição, na ordem de inscrição
    #[serde(default)]
    pub courses: Vec<ObjectId>,
    /// Mantido por compatibilidade de schema; os matches são sempre recalculados
    #[serde(default)]
    pub matches: Vec<ObjectId>,
    #[serde(default = "default_roles")]
    pub roles: Vec<String>,
    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

// Default functions for serde
fn default_roles() -> Vec<String> {
    vec![ROLE_STUDENT.to_string()]
}

impl User {
    pub fn new(email: String, name: String, password_hash: String) -> Self {
        let now = BsonDateTime::now();
        User {
            id: None,
            email,
            name,
            password_hash,
            courses: Vec::new(),
            matches: Vec::new(),
            roles: default_roles(),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// Perfil público do usuário (nunca inclui o hash da senha)
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: String,
    pub roles: Vec<String>,
    /// IDs das disciplinas matriculadas
    pub courses: Vec<String>,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        UserInfo {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email.clone(),
            name: user.name.clone(),
            roles: user.roles.clone(),
            courses: user.courses.iter().map(|id| id.to_hex()).collect(),
        }
    }
}
