use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};
use serde::{Deserialize, Serialize};

/// Disciplina do catálogo (armazenada no MongoDB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    /// Código de registro (CRN), único no catálogo
    pub crn: String,
    pub subject: String,
    pub course_number: String,
    pub title: String,
    pub section: String,
    pub instructor: Option<String>,
    pub schedule: Option<String>,
    pub campus: Option<String>,

    pub created_at: Option<BsonDateTime>,
    pub updated_at: Option<BsonDateTime>,
}

/// Request para criar ou atualizar disciplina (admin)
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    #[serde(default)]
    pub crn: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub course_number: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub section: String,
    pub instructor: Option<String>,
    pub schedule: Option<String>,
    pub campus: Option<String>,
}

impl CourseRequest {
    pub fn into_course(self) -> Course {
        let now = BsonDateTime::now();
        Course {
            id: None,
            crn: self.crn.trim().to_string(),
            subject: self.subject.trim().to_string(),
            course_number: self.course_number.trim().to_string(),
            title: self.title.trim().to_string(),
            section: self.section.trim().to_string(),
            instructor: self.instructor,
            schedule: self.schedule,
            campus: self.campus,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

/// Disciplina como exposta na API
#[derive(Debug, Clone, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub crn: String,
    pub subject: String,
    pub course_number: String,
    pub title: String,
    pub section: String,
    pub instructor: Option<String>,
    pub schedule: Option<String>,
    pub campus: Option<String>,
}

impl From<Course> for CourseResponse {
    fn from(c: Course) -> Self {
        CourseResponse {
            id: c.id.map(|id| id.to_hex()).unwrap_or_default(),
            crn: c.crn,
            subject: c.subject,
            course_number: c.course_number,
            title: c.title,
            section: c.section,
            instructor: c.instructor,
            schedule: c.schedule,
            campus: c.campus,
        }
    }
}
