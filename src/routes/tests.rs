//! 基于真实路由配置的 HTTP 测试，存储使用内存 SQLite

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use super::configure_routes;
use crate::config::{AppConfig, Argon2Config};
use crate::storage::Storage;
use crate::storage::sea_orm_storage::SeaOrmStorage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::PasswordService;
use crate::utils::{json_error_handler, query_error_handler};

const PLATFORM_KEY: &str = "platform-test-key";

fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.jwt.secret = "route-test-secret".to_string();
    config.platform.api_key = PLATFORM_KEY.to_string();
    config
}

fn fast_passwords() -> PasswordService {
    PasswordService::new(&Argon2Config {
        memory_cost: 1024,
        time_cost: 1,
        parallelism: 1,
    })
    .unwrap()
}

async fn memory_storage() -> Arc<dyn Storage> {
    Arc::new(SeaOrmStorage::in_memory().await.unwrap())
}

macro_rules! init_app {
    ($storage:expr) => {{
        let config = test_config();
        test::init_service(
            App::new()
                .app_data(web::QueryConfig::default().error_handler(query_error_handler))
                .app_data(web::JsonConfig::default().error_handler(json_error_handler))
                .app_data(web::Data::new($storage.clone()))
                .app_data(web::Data::new(JwtUtils::new(&config.jwt)))
                .app_data(web::Data::new(fast_passwords()))
                .app_data(web::Data::new(config))
                .configure(configure_routes),
        )
        .await
    }};
}

// 发送请求，返回状态码与 JSON 响应体（非 JSON 时为 Null）
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let body = test::read_body(resp).await;
        (
            status,
            serde_json::from_slice::<Value>(&body).unwrap_or(Value::Null),
        )
    }};
}

// 开通租户，返回 (租户 ID, 管理员邮箱, 管理员初始密码)
macro_rules! provision {
    ($app:expr, $name:expr, $subdomain:expr) => {{
        let admin_email = format!("admin@{}.test", $subdomain);
        let (status, body) = send!(
            $app,
            test::TestRequest::post()
                .uri("/api/v1/tenants")
                .insert_header(("X-Platform-Key", PLATFORM_KEY))
                .set_json(json!({
                    "name": $name,
                    "subdomain": $subdomain,
                    "admin_email": admin_email,
                    "admin_first_name": "Ada",
                    "admin_last_name": "Admin",
                }))
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["data"]["tenant"]["id"].as_str().unwrap().to_string(),
            admin_email,
            body["data"]["admin_password"].as_str().unwrap().to_string(),
        )
    }};
}

macro_rules! login {
    ($app:expr, $tenant:expr, $email:expr, $password:expr) => {{
        let (status, body) = send!(
            $app,
            test::TestRequest::post()
                .uri("/api/v1/auth/login")
                .set_json(json!({
                    "tenant_id": $tenant,
                    "email": $email,
                    "password": $password,
                }))
        );
        assert_eq!(status, StatusCode::OK, "{body}");
        body["data"]["access_token"].as_str().unwrap().to_string()
    }};
}

// 管理员创建用户，返回 (用户 ID, 生成的密码)
macro_rules! create_user {
    ($app:expr, $token:expr, $email:expr, $user_type:expr) => {{
        let (status, body) = send!(
            $app,
            test::TestRequest::post()
                .uri("/api/v1/users")
                .insert_header(("Authorization", format!("Bearer {}", $token)))
                .set_json(json!({
                    "email": $email,
                    "first_name": "Test",
                    "last_name": "User",
                    "profile": { "user_type": $user_type },
                }))
        );
        assert_eq!(status, StatusCode::CREATED, "{body}");
        (
            body["data"]["user"]["id"].as_i64().unwrap(),
            body["data"]["generated_password"]
                .as_str()
                .unwrap()
                .to_string(),
        )
    }};
}

fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

#[actix_web::test]
async fn test_provisioning_requires_platform_key() {
    let storage = memory_storage().await;
    let app = init_app!(storage);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/tenants")
            .set_json(json!({
                "name": "No Key School",
                "admin_email": "admin@nokey.test",
                "admin_first_name": "No",
                "admin_last_name": "Key",
            }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(storage.count_tenants().await.unwrap(), 0);

    let (tenant_id, _, password) = provision!(app, "Alpha School", "alpha");
    assert!(!tenant_id.is_empty());
    assert!(password.len() >= 8);
    assert_eq!(storage.count_tenants().await.unwrap(), 1);
}

#[actix_web::test]
async fn test_login_failures_are_indistinguishable() {
    let storage = memory_storage().await;
    let app = init_app!(storage);
    let (tenant_id, email, password) = provision!(app, "Alpha School", "alpha");

    let login_body = |tenant: &str, email: &str, password: &str| {
        json!({ "tenant_id": tenant, "email": email, "password": password })
    };

    let (wrong_password, wrong_password_body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(login_body(&tenant_id, &email, "not-the-password"))
    );
    let (unknown_tenant, unknown_tenant_body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(login_body(&uuid::Uuid::new_v4().to_string(), &email, &password))
    );
    let (unknown_email, unknown_email_body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(login_body(&tenant_id, "ghost@alpha.test", &password))
    );

    assert_eq!(wrong_password, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_tenant, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password_body["message"], unknown_tenant_body["message"]);
    assert_eq!(wrong_password_body["message"], unknown_email_body["message"]);
}

#[actix_web::test]
async fn test_first_login_requires_password_change() {
    let storage = memory_storage().await;
    let app = init_app!(storage);
    let (tenant_id, email, password) = provision!(app, "Alpha School", "alpha");

    // 无连字符的租户 ID 同样可以登录
    let simple_tenant = tenant_id.replace('-', "");
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({
                "tenant_id": simple_tenant,
                "email": email,
                "password": password,
            }))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["password_change_required"], json!(true));
    let token = body["data"]["access_token"].as_str().unwrap().to_string();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/change-password")
            .insert_header(bearer(&token))
            .set_json(json!({
                "current_password": password,
                "new_password": "Correct-Horse-42-Battery!",
            }))
    );
    assert_eq!(status, StatusCode::OK, "{body}");

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["user"]["email"], json!(email));
    assert_eq!(body["data"]["password_change_required"], json!(false));
}

#[actix_web::test]
async fn test_protected_routes_require_token() {
    let storage = memory_storage().await;
    let app = init_app!(storage);

    let (status, body) = send!(app, test::TestRequest::get().uri("/api/v1/auth/me"));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["data"], Value::Null);

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/subjects")
            .insert_header(bearer("not-a-jwt"))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_tenants_cannot_see_each_other() {
    let storage = memory_storage().await;
    let app = init_app!(storage);
    let (alpha, alpha_email, alpha_password) = provision!(app, "Alpha School", "alpha");
    let (beta, beta_email, beta_password) = provision!(app, "Beta School", "beta");
    let alpha_token = login!(app, alpha, alpha_email, alpha_password);
    let beta_token = login!(app, beta, beta_email, beta_password);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/subjects")
            .insert_header(bearer(&alpha_token))
            .set_json(json!({ "name": "Mathematics", "code": "MATH" }))
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let subject_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/subjects/{subject_id}"))
            .insert_header(bearer(&beta_token))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/subjects")
            .insert_header(bearer(&beta_token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(0));

    // 同名科目在另一个租户里不冲突
    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/subjects")
            .insert_header(bearer(&beta_token))
            .set_json(json!({ "name": "Mathematics" }))
    );
    assert_eq!(status, StatusCode::CREATED);

    // 租户头与令牌不一致
    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/subjects")
            .insert_header(bearer(&alpha_token))
            .insert_header(("X-Tenant-ID", beta.as_str()))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_role_restrictions() {
    let storage = memory_storage().await;
    let app = init_app!(storage);
    let (tenant, admin_email, admin_password) = provision!(app, "Alpha School", "alpha");
    let admin_token = login!(app, tenant, admin_email, admin_password);

    let (_, student_password) =
        create_user!(app, admin_token, "student@alpha.test", "student");
    let student_token = login!(app, tenant, "student@alpha.test", student_password);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/subjects")
            .insert_header(bearer(&student_token))
            .set_json(json!({ "name": "Art" }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/subjects")
            .insert_header(bearer(&student_token))
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/users")
            .insert_header(bearer(&student_token))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_invalid_path_id_is_bad_request() {
    let storage = memory_storage().await;
    let app = init_app!(storage);
    let (tenant, admin_email, admin_password) = provision!(app, "Alpha School", "alpha");
    let admin_token = login!(app, tenant, admin_email, admin_password);

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/subjects/abc")
            .insert_header(bearer(&admin_token))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("id"));
}

#[actix_web::test]
async fn test_deactivated_tenant_tokens_rejected() {
    use crate::entity::tenants;
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, sea_query::Expr};

    let sea_orm = SeaOrmStorage::in_memory().await.unwrap();
    let db = sea_orm.db.clone();
    let storage: Arc<dyn Storage> = Arc::new(sea_orm);
    let app = init_app!(storage);
    let (tenant, admin_email, admin_password) = provision!(app, "Alpha School", "alpha");
    let admin_token = login!(app, tenant, admin_email, admin_password);

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(&admin_token))
    );
    assert_eq!(status, StatusCode::OK);

    tenants::Entity::update_many()
        .col_expr(tenants::Column::IsActive, Expr::value(false))
        .filter(tenants::Column::Id.eq(uuid::Uuid::parse_str(&tenant).unwrap()))
        .exec(&db)
        .await
        .unwrap();

    let (status, _) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/auth/me")
            .insert_header(bearer(&admin_token))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn test_out_of_range_skip_is_bad_request() {
    let storage = memory_storage().await;
    let app = init_app!(storage);
    let (tenant, admin_email, admin_password) = provision!(app, "Alpha School", "alpha");
    let admin_token = login!(app, tenant, admin_email, admin_password);

    for uri in [
        "/api/v1/users?skip=9223372036854775808",
        "/api/v1/enrollments?skip=18446744073709551615",
    ] {
        let (status, _) = send!(
            app,
            test::TestRequest::get()
                .uri(uri)
                .insert_header(bearer(&admin_token))
        );
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }

    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/users?skip=9223372036854775807")
            .insert_header(bearer(&admin_token))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 0);
}

#[actix_web::test]
async fn test_submission_workflow_over_http() {
    let storage = memory_storage().await;
    let app = init_app!(storage);
    let (tenant, admin_email, admin_password) = provision!(app, "Alpha School", "alpha");
    let admin_token = login!(app, tenant, admin_email, admin_password);

    let (teacher_id, teacher_password) =
        create_user!(app, admin_token, "teacher@alpha.test", "teacher");
    let (student_id, student_password) =
        create_user!(app, admin_token, "student@alpha.test", "student");
    let teacher_token = login!(app, tenant, "teacher@alpha.test", teacher_password);
    let student_token = login!(app, tenant, "student@alpha.test", student_password);

    let (_, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/subjects")
            .insert_header(bearer(&admin_token))
            .set_json(json!({ "name": "Physics" }))
    );
    let subject_id = body["data"]["id"].as_i64().unwrap();
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/academic-years")
            .insert_header(bearer(&admin_token))
            .set_json(json!({
                "name": "2025/2026",
                "start_date": "2025-09-01",
                "end_date": "2026-06-30",
                "is_current": true,
            }))
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    let year_id = body["data"]["id"].as_i64().unwrap();

    // 教师未指定 teacher_id 时归属自己
    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/assessments")
            .insert_header(bearer(&teacher_token))
            .set_json(json!({
                "title": "Kinematics quiz",
                "subject_id": subject_id,
                "academic_year_id": year_id,
                "grade_type": "QUIZ",
                "max_score": 10.0,
            }))
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["teacher_id"], json!(teacher_id));
    let assessment_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri("/api/v1/submissions")
            .insert_header(bearer(&student_token))
            .set_json(json!({ "assessment_id": assessment_id, "content": "v = d / t" }))
    );
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["data"]["student_id"], json!(student_id));
    assert_eq!(body["data"]["status"], json!("DRAFT"));
    let submission_id = body["data"]["id"].as_i64().unwrap();

    // 草稿不能直接评分
    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .insert_header(bearer(&teacher_token))
            .set_json(json!({ "score": 5.0 }))
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/submissions/{submission_id}/submit"))
            .insert_header(bearer(&student_token))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], json!("SUBMITTED"));

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .insert_header(bearer(&student_token))
            .set_json(json!({ "score": 10.0 }))
    );
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .insert_header(bearer(&teacher_token))
            .set_json(json!({ "score": 11.0 }))
    );
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send!(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/submissions/{submission_id}/grade"))
            .insert_header(bearer(&teacher_token))
            .set_json(json!({ "score": 8.5, "feedback": "Good work" }))
    );
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["status"], json!("GRADED"));
    assert_eq!(body["data"]["graded_by"], json!(teacher_id));

    // 学生列表只包含自己的提交
    let (status, body) = send!(
        app,
        test::TestRequest::get()
            .uri("/api/v1/submissions")
            .insert_header(bearer(&student_token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], json!(1));
}
