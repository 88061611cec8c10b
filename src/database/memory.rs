//! `Store` em memória para os testes. Mantém a ordem de inserção, como uma
//! varredura da coleção na ordem natural.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{CourseCatalog, UserDirectory};
use crate::models::{Course, User};
use crate::utils::error::AppError;

#[derive(Default)]
pub struct MemoryStore {
    courses: RwLock<Vec<Course>>,
    users: RwLock<Vec<User>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CourseCatalog for MemoryStore {
    async fn find_course_by_id(&self, id: &ObjectId) -> Result<Option<Course>, AppError> {
        let courses = self.courses.read().await;
        Ok(courses.iter().find(|c| c.id.as_ref() == Some(id)).cloned())
    }

    async fn find_courses_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Course>, AppError> {
        let courses = self.courses.read().await;
        Ok(courses
            .iter()
            .filter(|c| c.id.map_or(false, |id| ids.contains(&id)))
            .cloned()
            .collect())
    }

    async fn find_course_by_crn(&self, crn: &str) -> Result<Option<Course>, AppError> {
        let courses = self.courses.read().await;
        Ok(courses.iter().find(|c| c.crn == crn).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, AppError> {
        Ok(self.courses.read().await.clone())
    }

    async fn insert_course(&self, mut course: Course) -> Result<Course, AppError> {
        let mut courses = self.courses.write().await;
        if courses.iter().any(|c| c.crn == course.crn) {
            return Err(AppError::Conflict(
                "Course already exists with this CRN.".to_string(),
            ));
        }
        course.id = Some(course.id.unwrap_or_else(ObjectId::new));
        courses.push(course.clone());
        Ok(course)
    }

    async fn update_course(&self, course: &Course) -> Result<bool, AppError> {
        let mut courses = self.courses.write().await;
        if courses.iter().any(|c| c.crn == course.crn && c.id != course.id) {
            return Err(AppError::Conflict(
                "Course already exists with this CRN.".to_string(),
            ));
        }
        match courses.iter_mut().find(|c| c.id == course.id) {
            Some(stored) => {
                let created_at = stored.created_at;
                *stored = course.clone();
                stored.created_at = created_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_course(&self, id: &ObjectId) -> Result<bool, AppError> {
        let mut courses = self.courses.write().await;
        let before = courses.len();
        courses.retain(|c| c.id.as_ref() != Some(id));
        Ok(courses.len() < before)
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, mut user: User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict("User already exists".to_string()));
        }
        user.id = Some(user.id.unwrap_or_else(ObjectId::new));
        users.push(user.clone());
        Ok(user)
    }

    async fn find_users_with_any_course_in(
        &self,
        ids: &[ObjectId],
        excluding: &ObjectId,
    ) -> Result<Vec<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .filter(|u| u.id.as_ref() != Some(excluding))
            .filter(|u| u.courses.iter().any(|c| ids.contains(c)))
            .cloned()
            .collect())
    }

    async fn add_course_if_absent(
        &self,
        user_id: &ObjectId,
        course_id: &ObjectId,
    ) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id.as_ref() == Some(user_id)) {
            Some(user) if !user.courses.contains(course_id) => {
                user.courses.push(*course_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove_course_if_present(
        &self,
        user_id: &ObjectId,
        course_id: &ObjectId,
    ) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        match users.iter_mut().find(|u| u.id.as_ref() == Some(user_id)) {
            Some(user) if user.courses.contains(course_id) => {
                user.courses.retain(|c| c != course_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn remove_course_from_all_users(&self, course_id: &ObjectId) -> Result<u64, AppError> {
        let mut users = self.users.write().await;
        let mut touched = 0;
        for user in users.iter_mut().filter(|u| u.courses.contains(course_id)) {
            user.courses.retain(|c| c != course_id);
            touched += 1;
        }
        Ok(touched)
    }
}
