use utoipa::OpenApi;
use utoipa::openapi::security::{SecurityScheme, HttpAuthScheme, HttpBuilder};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Course Matcher API",
        version = "1.0.0",
        description = "Course enrollment and student matching. \n\n**Authentication:** every endpoint except register/login and health requires a JWT Bearer token.\n\n**Features:**\n- Registration and login with institutional email\n- Shared course catalog (admin managed)\n- Enroll / unenroll in courses\n- Classmates sharing at least one course"
    ),
    paths(
        // Auth endpoints
        crate::api::auth::register,
        crate::api::auth::login,
        crate::api::auth::verify_token,
        crate::api::auth::get_me,

        // Health
        crate::api::health::health_check,

        // Enrollment & matching
        crate::api::courses::add_course,
        crate::api::courses::list_my_courses,
        crate::api::courses::drop_course,
        crate::api::courses::list_all,
        crate::api::courses::get_matches,

        // Catalog administration
        crate::api::admin::add_course,
        crate::api::admin::update_course,
        crate::api::admin::delete_course,
    ),
    components(
        schemas(
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::RegisterRequest,
            crate::services::auth_service::AuthResponse,
            crate::services::auth_service::RegisterResponse,
            crate::models::UserInfo,
            crate::models::CourseRequest,
            crate::models::CourseResponse,
            crate::models::MatchResponse,
            crate::api::courses::EnrollRequest,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Registration, login and token introspection."),
        (name = "Health", description = "Service and database health."),
        (name = "Enrollment", description = "The caller's own schedule."),
        (name = "Catalog", description = "Browse the shared course catalog."),
        (name = "Matches", description = "Students sharing at least one enrolled course with the caller."),
        (name = "Admin", description = "Catalog management. Requires the ManageCatalog capability."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Enter your JWT token"))
                        .build()
                ),
            );
        }
    }
}
