//! Helpers compartilhados pelos testes.

use mongodb::bson::oid::ObjectId;

use crate::database::{memory::MemoryStore, CourseCatalog, UserDirectory};
use crate::models::{Course, CourseRequest, User};

pub fn course_request(crn: &str, title: &str) -> CourseRequest {
    CourseRequest {
        crn: crn.to_string(),
        subject: "COMP".to_string(),
        course_number: crn.to_string(),
        title: title.to_string(),
        section: "01".to_string(),
        instructor: Some("Dr. Smith".to_string()),
        schedule: Some("MWF 10:00".to_string()),
        campus: Some("Kamloops".to_string()),
    }
}

pub async fn add_course(store: &MemoryStore, crn: &str, title: &str) -> Course {
    store
        .insert_course(course_request(crn, title).into_course())
        .await
        .unwrap()
}

/// Cria um estudante matriculado exatamente em `courses`, nessa ordem.
pub async fn enroll_student(store: &MemoryStore, name: &str, courses: &[ObjectId]) -> ObjectId {
    let mut user = User::new(
        format!("{}@mytru.ca", name.to_lowercase()),
        name.to_string(),
        "hash".to_string(),
    );
    user.courses = courses.to_vec();
    store.insert_user(user).await.unwrap().id.unwrap()
}
