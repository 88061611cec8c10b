use actix_web::{web, HttpResponse, Responder};
use serde::Deserialize;

use crate::{
    api::error_response,
    database::Store,
    middleware::auth::Claims,
    models::{CourseResponse, MatchResponse, UserInfo},
    services::{course_service, enrollment_service, match_service},
    utils::{error::AppError, validation::parse_object_id},
};

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub course_id: Option<String>,
}

/// POST /api/courses/add - Matricula o usuário logado numa disciplina
#[utoipa::path(
    post,
    path = "/api/courses/add",
    tag = "Enrollment",
    request_body = EnrollRequest,
    responses(
        (status = 200, description = "Course added", body = UserInfo),
        (status = 404, description = "User or course not found"),
        (status = 409, description = "Course already added")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_course(
    claims: web::ReqData<Claims>,
    db: web::Data<dyn Store>,
    request: web::Json<EnrollRequest>,
) -> impl Responder {
    let ids = claims.user_id().and_then(|user_id| {
        let raw = request
            .course_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| AppError::InvalidRequest("Missing courseId".to_string()))?;
        Ok((user_id, parse_object_id(raw, "course")?))
    });
    let (user_id, course_id) = match ids {
        Ok(ids) => ids,
        Err(e) => return error_response("POST /courses/add", e),
    };

    match enrollment_service::add_course(db.get_ref(), &user_id, &course_id).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Course added successfully",
            "updatedUser": UserInfo::from(&user)
        })),
        Err(e) => error_response("POST /courses/add", e),
    }
}

/// GET /api/courses/courses - Disciplinas do usuário logado
#[utoipa::path(
    get,
    path = "/api/courses/courses",
    tag = "Enrollment",
    responses(
        (status = 200, description = "Enrolled courses", body = [CourseResponse]),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_my_courses(claims: web::ReqData<Claims>, db: web::Data<dyn Store>) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return error_response("GET /courses/courses", e),
    };

    match enrollment_service::list_courses(db.get_ref(), &user_id).await {
        Ok(courses) => {
            let courses: Vec<CourseResponse> = courses.into_iter().map(CourseResponse::from).collect();
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Courses fetched successfully",
                "courses": courses
            }))
        }
        Err(e) => error_response("GET /courses/courses", e),
    }
}

/// DELETE /api/courses/courses/delete/{courseId} - Cancela a matrícula
#[utoipa::path(
    delete,
    path = "/api/courses/courses/delete/{course_id}",
    tag = "Enrollment",
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course removed from schedule", body = UserInfo),
        (status = 409, description = "Not enrolled in this course")
    ),
    security(("bearer_auth" = []))
)]
pub async fn drop_course(
    claims: web::ReqData<Claims>,
    db: web::Data<dyn Store>,
    path: web::Path<String>,
) -> impl Responder {
    let ids = claims
        .user_id()
        .and_then(|user_id| Ok((user_id, parse_object_id(&path, "course")?)));
    let (user_id, course_id) = match ids {
        Ok(ids) => ids,
        Err(e) => return error_response("DELETE /courses/courses/delete", e),
    };

    match enrollment_service::remove_course(db.get_ref(), &user_id, &course_id).await {
        Ok(user) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Course deleted successfully",
            "updatedUser": UserInfo::from(&user)
        })),
        Err(e) => error_response("DELETE /courses/courses/delete", e),
    }
}

/// GET /api/courses/all - Catálogo completo
#[utoipa::path(
    get,
    path = "/api/courses/all",
    tag = "Catalog",
    responses(
        (status = 200, description = "All courses", body = [CourseResponse]),
        (status = 404, description = "Catalog is empty")
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_all(db: web::Data<dyn Store>) -> impl Responder {
    match course_service::list_catalog(db.get_ref()).await {
        Ok(courses) if courses.is_empty() => {
            error_response("GET /courses/all", AppError::NotFound("No courses found".to_string()))
        }
        Ok(courses) => {
            let courses: Vec<CourseResponse> = courses.into_iter().map(CourseResponse::from).collect();
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "message": "Courses fetched successfully",
                "courses": courses
            }))
        }
        Err(e) => error_response("GET /courses/all", e),
    }
}

/// GET /api/courses/matches - Estudantes com disciplinas em comum
#[utoipa::path(
    get,
    path = "/api/courses/matches",
    tag = "Matches",
    responses(
        (status = 200, description = "Students sharing at least one course", body = [MatchResponse]),
        (status = 404, description = "User not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_matches(claims: web::ReqData<Claims>, db: web::Data<dyn Store>) -> impl Responder {
    let user_id = match claims.user_id() {
        Ok(id) => id,
        Err(e) => return error_response("GET /courses/matches", e),
    };

    match match_service::compute_matches(db.get_ref(), db.get_ref(), &user_id).await {
        Ok(matches) => {
            let matches: Vec<MatchResponse> = matches.into_iter().map(MatchResponse::from).collect();
            HttpResponse::Ok().json(serde_json::json!({
                "success": true,
                "matches": matches
            }))
        }
        Err(e) => error_response("GET /courses/matches", e),
    }
}
