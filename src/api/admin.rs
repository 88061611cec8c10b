use actix_web::{web, HttpResponse, Responder};

use crate::{
    api::{error_response, json_body},
    database::Store,
    middleware::auth::Claims,
    models::{CourseRequest, CourseResponse},
    services::{course_service, Authorizer, Capability},
    utils::validation::parse_object_id,
};

/// POST /api/courses/admin/add - Cria disciplina no catálogo
#[utoipa::path(
    post,
    path = "/api/courses/admin/add",
    tag = "Admin",
    request_body = CourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Missing required course fields"),
        (status = 403, description = "Caller cannot manage the catalog"),
        (status = 409, description = "CRN already exists")
    ),
    security(("bearer_auth" = []))
)]
pub async fn add_course(
    claims: web::ReqData<Claims>,
    authorizer: web::Data<Authorizer>,
    db: web::Data<dyn Store>,
    body: Result<web::Json<CourseRequest>, actix_web::Error>,
) -> impl Responder {
    // Permissão antes do corpo: quem não é admin recebe 403 mesmo com JSON inválido
    let request = match authorizer
        .require(&claims, Capability::ManageCatalog)
        .and_then(|_| json_body(body))
    {
        Ok(request) => request,
        Err(e) => return error_response("POST /courses/admin/add", e),
    };

    match course_service::create_course(db.get_ref(), request).await {
        Ok(course) => HttpResponse::Created().json(serde_json::json!({
            "success": true,
            "message": "Course added successfully",
            "course": CourseResponse::from(course)
        })),
        Err(e) => error_response("POST /courses/admin/add", e),
    }
}

/// PUT /api/courses/admin/update/{courseId} - Atualiza disciplina
#[utoipa::path(
    put,
    path = "/api/courses/admin/update/{course_id}",
    tag = "Admin",
    request_body = CourseRequest,
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course updated", body = CourseResponse),
        (status = 403, description = "Caller cannot manage the catalog"),
        (status = 404, description = "Course not found"),
        (status = 409, description = "CRN already used by another course")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_course(
    claims: web::ReqData<Claims>,
    authorizer: web::Data<Authorizer>,
    db: web::Data<dyn Store>,
    path: web::Path<String>,
    body: Result<web::Json<CourseRequest>, actix_web::Error>,
) -> impl Responder {
    let target = authorizer
        .require(&claims, Capability::ManageCatalog)
        .and_then(|_| Ok((parse_object_id(&path, "course")?, json_body(body)?)));
    let (course_id, request) = match target {
        Ok(target) => target,
        Err(e) => return error_response("PUT /courses/admin/update", e),
    };

    match course_service::update_course(db.get_ref(), &course_id, request).await {
        Ok(course) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Course updated successfully",
            "course": CourseResponse::from(course)
        })),
        Err(e) => error_response("PUT /courses/admin/update", e),
    }
}

/// DELETE /api/courses/admin/delete/{courseId} - Remove disciplina e matrículas
#[utoipa::path(
    delete,
    path = "/api/courses/admin/delete/{course_id}",
    tag = "Admin",
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course deleted and removed from every schedule"),
        (status = 403, description = "Caller cannot manage the catalog"),
        (status = 404, description = "Course not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_course(
    claims: web::ReqData<Claims>,
    authorizer: web::Data<Authorizer>,
    db: web::Data<dyn Store>,
    path: web::Path<String>,
) -> impl Responder {
    let course_id = match authorizer
        .require(&claims, Capability::ManageCatalog)
        .and_then(|_| parse_object_id(&path, "course"))
    {
        Ok(id) => id,
        Err(e) => return error_response("DELETE /courses/admin/delete", e),
    };

    match course_service::delete_course(db.get_ref(), &course_id).await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "Course deleted successfully"
        })),
        Err(e) => error_response("DELETE /courses/admin/delete", e),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::{
        http::{header::ContentType, StatusCode},
        test,
    };
    use serde_json::{json, Value};

    use crate::api::test_support::{bearer_for, init_app};
    use crate::database::{memory::MemoryStore, CourseCatalog, UserDirectory};
    use crate::services::fixtures::{add_course, enroll_student};

    fn cs101() -> Value {
        json!({
            "crn": "10101",
            "subject": "COMP",
            "courseNumber": "1010",
            "title": "CS101",
            "section": "01"
        })
    }

    #[actix_web::test]
    async fn test_students_cannot_manage_catalog() {
        let store = Arc::new(MemoryStore::new());
        let existing = add_course(&store, "20101", "MATH201").await.id.unwrap();
        let alice = enroll_student(&store, "Alice", &[]).await;
        let auth = bearer_for(&store, &alice).await;
        let app = init_app!(store.clone());

        let requests = [
            test::TestRequest::post()
                .uri("/api/courses/admin/add")
                .set_json(cs101()),
            // Corpo inválido: a permissão é checada antes
            test::TestRequest::post()
                .uri("/api/courses/admin/add")
                .insert_header(ContentType::json())
                .set_payload("{not json"),
            test::TestRequest::put()
                .uri(&format!("/api/courses/admin/update/{}", existing.to_hex()))
                .insert_header(ContentType::json())
                .set_payload("{not json"),
            test::TestRequest::delete()
                .uri(&format!("/api/courses/admin/delete/{}", existing.to_hex())),
        ];

        for req in requests {
            let req = req.insert_header(("Authorization", auth.clone())).to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(res.status(), StatusCode::FORBIDDEN);
            let body: Value = test::read_body_json(res).await;
            assert_eq!(body["message"], "Access denied. Only admin can manage courses.");
        }

        assert_eq!(store.list_courses().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn test_admin_catalog_lifecycle() {
        let store = Arc::new(MemoryStore::new());
        let registrar = enroll_student(&store, "Registrar", &[]).await;
        let auth = bearer_for(&store, &registrar).await;
        let app = init_app!(store.clone());

        let req = test::TestRequest::post()
            .uri("/api/courses/admin/add")
            .insert_header(("Authorization", auth.clone()))
            .insert_header(ContentType::json())
            .set_payload("{not json")
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/courses/admin/add")
            .insert_header(("Authorization", auth.clone()))
            .set_json(cs101())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(res).await;
        let id = body["course"]["_id"].as_str().unwrap().to_string();

        let req = test::TestRequest::put()
            .uri("/api/courses/admin/update/not-an-id")
            .insert_header(("Authorization", auth.clone()))
            .set_json(cs101())
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);

        let mut renamed = cs101();
        renamed["title"] = json!("Intro to Computing");
        let req = test::TestRequest::put()
            .uri(&format!("/api/courses/admin/update/{}", id))
            .insert_header(("Authorization", auth.clone()))
            .set_json(renamed)
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["course"]["title"], "Intro to Computing");

        // Estudante matriculado perde a disciplina junto com o catálogo
        let course_id = mongodb::bson::oid::ObjectId::parse_str(&id).unwrap();
        let alice = enroll_student(&store, "Alice", &[course_id]).await;

        let req = test::TestRequest::delete()
            .uri(&format!("/api/courses/admin/delete/{}", id))
            .insert_header(("Authorization", auth.clone()))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);

        let alice = store.find_user_by_id(&alice).await.unwrap().unwrap();
        assert!(alice.courses.is_empty());

        let req = test::TestRequest::get()
            .uri("/api/courses/all")
            .insert_header(("Authorization", auth))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }
}
