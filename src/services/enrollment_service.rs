use std::collections::HashMap;

use mongodb::bson::oid::ObjectId;

use crate::{
    database::{CourseCatalog, Store},
    models::{Course, User},
    utils::error::AppError,
};

async fn require_user<S>(store: &S, user_id: &ObjectId) -> Result<User, AppError>
where
    S: Store + ?Sized,
{
    store
        .find_user_by_id(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Matricula o usuário numa disciplina existente do catálogo.
///
/// Retorna o usuário atualizado.
pub async fn add_course<S>(
    store: &S,
    user_id: &ObjectId,
    course_id: &ObjectId,
) -> Result<User, AppError>
where
    S: Store + ?Sized,
{
    require_user(store, user_id).await?;

    if store.find_course_by_id(course_id).await?.is_none() {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    if !store.add_course_if_absent(user_id, course_id).await? {
        return Err(AppError::Conflict("Course already added".to_string()));
    }

    log::info!("➕ User {} enrolled in course {}", user_id, course_id);

    require_user(store, user_id).await
}

/// Cancela a matrícula. Falha com `Conflict` se o usuário não estiver matriculado.
pub async fn remove_course<S>(
    store: &S,
    user_id: &ObjectId,
    course_id: &ObjectId,
) -> Result<User, AppError>
where
    S: Store + ?Sized,
{
    require_user(store, user_id).await?;

    if !store.remove_course_if_present(user_id, course_id).await? {
        return Err(AppError::Conflict(
            "Course not found in user's enrolled courses".to_string(),
        ));
    }

    log::info!("➖ User {} left course {}", user_id, course_id);

    require_user(store, user_id).await
}

/// Disciplinas matriculadas, na ordem de inscrição. Referências órfãs são ignoradas.
pub async fn list_courses<S>(store: &S, user_id: &ObjectId) -> Result<Vec<Course>, AppError>
where
    S: Store + ?Sized,
{
    let user = require_user(store, user_id).await?;
    resolve_in_order(store, &user.courses).await
}

/// Resolve ids na ordem dada; ids repetidos ou sem disciplina são descartados
pub(crate) async fn resolve_in_order<C>(catalog: &C, ids: &[ObjectId]) -> Result<Vec<Course>, AppError>
where
    C: CourseCatalog + ?Sized,
{
    let mut by_id: HashMap<ObjectId, Course> = catalog
        .find_courses_by_ids(ids)
        .await?
        .into_iter()
        .filter_map(|course| course.id.map(|id| (id, course)))
        .collect();

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}
