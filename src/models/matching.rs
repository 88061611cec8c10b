use serde::Serialize;

use super::{Course, CourseResponse};

/// Outro estudante que compartilha ao menos uma disciplina
#[derive(Debug, Clone, PartialEq)]
pub struct StudentMatch {
    pub name: String,
    pub email: String,
    /// Nunca vazio; na ordem de inscrição do outro estudante
    pub common_courses: Vec<Course>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub name: String,
    pub email: String,
    pub common_courses: Vec<CourseResponse>,
}

impl From<StudentMatch> for MatchResponse {
    fn from(m: StudentMatch) -> Self {
        MatchResponse {
            name: m.name,
            email: m.email,
            common_courses: m.common_courses.into_iter().map(CourseResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CourseRequest;
    use mongodb::bson::oid::ObjectId;

    #[test]
    fn test_match_response_wire_shape() {
        let id = ObjectId::new();
        let mut course = CourseRequest {
            crn: "10101".to_string(),
            subject: "COMP".to_string(),
            course_number: "1010".to_string(),
            title: "CS101".to_string(),
            section: "01".to_string(),
            ..Default::default()
        }
        .into_course();
        course.id = Some(id);

        let response = MatchResponse::from(StudentMatch {
            name: "Alice".to_string(),
            email: "alice@mytru.ca".to_string(),
            common_courses: vec![course],
        });
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["name"], "Alice");
        assert_eq!(json["email"], "alice@mytru.ca");
        assert!(json.get("common_courses").is_none());

        let common = json["commonCourses"].as_array().unwrap();
        assert_eq!(common.len(), 1);
        assert_eq!(common[0]["_id"], id.to_hex());
        assert_eq!(common[0]["courseNumber"], "1010");
        assert!(common[0].get("createdAt").is_none());
    }
}
