use mongodb::bson::{oid::ObjectId, DateTime as BsonDateTime};

use crate::{
    database::Store,
    models::{Course, CourseRequest},
    utils::{error::AppError, validation::require_fields},
};

fn validate(request: &CourseRequest) -> Result<(), AppError> {
    require_fields(&[
        ("crn", &request.crn),
        ("subject", &request.subject),
        ("courseNumber", &request.course_number),
        ("title", &request.title),
        ("section", &request.section),
    ])
}

/// Catálogo completo, na ordem do banco
pub async fn list_catalog<S>(store: &S) -> Result<Vec<Course>, AppError>
where
    S: Store + ?Sized,
{
    store.list_courses().await
}

pub async fn create_course<S>(store: &S, request: CourseRequest) -> Result<Course, AppError>
where
    S: Store + ?Sized,
{
    validate(&request)?;

    let course = request.into_course();
    if store.find_course_by_crn(&course.crn).await?.is_some() {
        return Err(AppError::Conflict(
            "Course already exists with this CRN.".to_string(),
        ));
    }

    let course = store.insert_course(course).await?;
    log::info!("📚 Course {} ({}) added to catalog", course.crn, course.title);

    Ok(course)
}

pub async fn update_course<S>(
    store: &S,
    course_id: &ObjectId,
    request: CourseRequest,
) -> Result<Course, AppError>
where
    S: Store + ?Sized,
{
    validate(&request)?;

    let existing = store
        .find_course_by_id(course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let mut updated = request.into_course();
    updated.id = existing.id;
    updated.created_at = existing.created_at;
    updated.updated_at = Some(BsonDateTime::now());

    if let Some(other) = store.find_course_by_crn(&updated.crn).await? {
        if other.id != updated.id {
            return Err(AppError::Conflict(
                "Course already exists with this CRN.".to_string(),
            ));
        }
    }

    if !store.update_course(&updated).await? {
        return Err(AppError::NotFound("Course not found".to_string()));
    }

    log::info!("✏️  Course {} updated", updated.crn);

    Ok(updated)
}

/// Remove a disciplina do catálogo e de todas as matrículas
pub async fn delete_course<S>(store: &S, course_id: &ObjectId) -> Result<(), AppError>
where
    S: Store + ?Sized,
{
    let course = store
        .find_course_by_id(course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    // Matrículas primeiro: se a remoção do curso falhar, não sobra referência órfã
    let touched = store.remove_course_from_all_users(course_id).await?;
    store.delete_course(course_id).await?;

    log::info!(
        "🗑️  Course {} deleted, removed from {} enrolled set(s)",
        course.crn,
        touched
    );

    Ok(())
}
