//! Interfaces do catálogo de disciplinas e do diretório de usuários.
//!
//! `MongoDB` implementa as duas em produção; os testes usam o store em memória.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{Course, User};
use crate::utils::error::AppError;

#[async_trait]
pub trait CourseCatalog: Send + Sync {
    async fn find_course_by_id(&self, id: &ObjectId) -> Result<Option<Course>, AppError>;

    /// Resolve ids em disciplinas. Ids sem disciplina ficam de fora; a ordem
    /// do resultado não é garantida.
    async fn find_courses_by_ids(&self, ids: &[ObjectId]) -> Result<Vec<Course>, AppError>;

    async fn find_course_by_crn(&self, crn: &str) -> Result<Option<Course>, AppError>;

    async fn list_courses(&self) -> Result<Vec<Course>, AppError>;

    /// Falha com `Conflict` se o crn já existir. Retorna a disciplina gravada, com id.
    async fn insert_course(&self, course: Course) -> Result<Course, AppError>;

    /// Substitui os campos editáveis. Retorna false se a disciplina não existir.
    async fn update_course(&self, course: &Course) -> Result<bool, AppError>;

    async fn delete_course(&self, id: &ObjectId) -> Result<bool, AppError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_user_by_id(&self, id: &ObjectId) -> Result<Option<User>, AppError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Falha com `Conflict` se o email já estiver cadastrado.
    async fn insert_user(&self, user: User) -> Result<User, AppError>;

    /// Usuários (exceto `excluding`) matriculados em ao menos um dos `ids`,
    /// na ordem do diretório.
    async fn find_users_with_any_course_in(
        &self,
        ids: &[ObjectId],
        excluding: &ObjectId,
    ) -> Result<Vec<User>, AppError>;

    /// Acrescenta `course_id` só se ainda não estiver presente, numa única
    /// escrita atômica. Retorna se o documento mudou.
    async fn add_course_if_absent(
        &self,
        user_id: &ObjectId,
        course_id: &ObjectId,
    ) -> Result<bool, AppError>;

    /// Remove `course_id` se presente. Retorna se o documento mudou.
    async fn remove_course_if_present(
        &self,
        user_id: &ObjectId,
        course_id: &ObjectId,
    ) -> Result<bool, AppError>;

    /// Retira `course_id` de todas as matrículas. Retorna quantos usuários mudaram.
    async fn remove_course_from_all_users(&self, course_id: &ObjectId) -> Result<u64, AppError>;
}

/// Qualquer coisa que atenda as duas coleções
pub trait Store: CourseCatalog + UserDirectory {}

impl<T: CourseCatalog + UserDirectory + ?Sized> Store for T {}
