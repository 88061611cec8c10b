//! Motor de matches: outros estudantes com ao menos uma disciplina em comum.
//!
//! Só leitura. As disciplinas do usuário são resolvidas no catálogo uma vez;
//! os candidatos vêm de uma única query `$in` no diretório e a interseção é
//! feita aqui, na ordem de inscrição de cada candidato.

use std::collections::{HashMap, HashSet};

use mongodb::bson::oid::ObjectId;

use crate::{
    database::{CourseCatalog, UserDirectory},
    models::{Course, StudentMatch},
    services::enrollment_service::resolve_in_order,
    utils::error::AppError,
};

pub async fn compute_matches<D, C>(
    directory: &D,
    catalog: &C,
    user_id: &ObjectId,
) -> Result<Vec<StudentMatch>, AppError>
where
    D: UserDirectory + ?Sized,
    C: CourseCatalog + ?Sized,
{
    let user = directory
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    // S: ids do usuário que ainda existem no catálogo, sem repetição
    let shared: HashMap<ObjectId, Course> = resolve_in_order(catalog, &user.courses)
        .await?
        .into_iter()
        .filter_map(|course| course.id.map(|id| (id, course)))
        .collect();

    if shared.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<ObjectId> = shared.keys().copied().collect();
    let candidates = directory.find_users_with_any_course_in(&ids, user_id).await?;

    let matches: Vec<StudentMatch> = candidates
        .into_iter()
        .filter(|candidate| candidate.id.as_ref() != Some(user_id))
        .filter_map(|candidate| {
            let mut seen = HashSet::new();
            let common_courses: Vec<Course> = candidate
                .courses
                .iter()
                .filter(|id| seen.insert(**id))
                .filter_map(|id| shared.get(id).cloned())
                .collect();

            if common_courses.is_empty() {
                return None;
            }

            Some(StudentMatch {
                name: candidate.name,
                email: candidate.email,
                common_courses,
            })
        })
        .collect();

    log::debug!("🤝 {} match(es) for user {}", matches.len(), user_id);

    Ok(matches)
}
