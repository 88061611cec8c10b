pub mod admin;
pub mod auth;
pub mod courses;
pub mod health;
pub mod swagger;

use actix_web::{web, HttpResponse, ResponseError};

use crate::middleware::AuthMiddleware;
use crate::utils::error::AppError;

/// Rotas `/api/auth` e `/api/courses`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public auth endpoints
        .service(
            web::scope("/api/auth")
                .route("/register", web::post().to(auth::register))
                .route("/login", web::post().to(auth::login))
                // Protected endpoints requiring JWT authentication
                .service(
                    web::resource("/verify")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(auth::verify_token))
                )
                .service(
                    web::resource("/me")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(auth::get_me))
                )
        )
        // Courses: enrollment, catalog, matches and admin - Requires JWT
        .service(
            web::scope("/api/courses")
                .wrap(AuthMiddleware)
                .route("/add", web::post().to(courses::add_course))
                .route("/courses", web::get().to(courses::list_my_courses))
                .route("/courses/delete/{course_id}", web::delete().to(courses::drop_course))
                .route("/all", web::get().to(courses::list_all))
                .route("/matches", web::get().to(courses::get_matches))
                .route("/matches/", web::get().to(courses::get_matches))
                .route("/admin/add", web::post().to(admin::add_course))
                .route("/admin/update/{course_id}", web::put().to(admin::update_course))
                .route("/admin/delete/{course_id}", web::delete().to(admin::delete_course))
        );
}

/// Loga o erro no nível adequado e converte em resposta JSON
pub(crate) fn error_response(context: &str, e: AppError) -> HttpResponse {
    match &e {
        AppError::DatabaseError(_) | AppError::Internal(_) => {
            log::error!("❌ {}: {}", context, e)
        }
        _ => log::warn!("⚠️  {}: {}", context, e),
    }
    e.error_response()
}

/// Corpo JSON extraído de forma adiada, para validar permissões antes
pub(crate) fn json_body<T>(body: Result<web::Json<T>, actix_web::Error>) -> Result<T, AppError> {
    body.map(web::Json::into_inner)
        .map_err(|e| AppError::InvalidRequest(format!("Invalid request body: {}", e)))
}
