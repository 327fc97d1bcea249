#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use api::auth::generate_jwt;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use db::models::user::{Model as UserModel, Role};

    use crate::helpers::app::{TestApp, make_test_app, send};

    struct TestCtx {
        app: TestApp,
        db: sea_orm::DatabaseConnection,
        prof_token: String,
        student: UserModel,
    }

    async fn setup() -> TestCtx {
        let (app, db) = make_test_app().await;

        let professor = UserModel::create(&db, "bat_prof", "bat_prof@test.com", Role::Professor)
            .await
            .unwrap();
        let (prof_token, _) = generate_jwt(professor.id);

        let student = UserModel::create(&db, "bat_stud", "bat_stud@test.com", Role::Student)
            .await
            .unwrap();

        TestCtx {
            app,
            db,
            prof_token,
            student,
        }
    }

    async fn create_batch(ctx: &TestCtx, name: &str) -> i64 {
        let (status, body) = send(
            &ctx.app,
            Method::POST,
            "/api/batches",
            Some(&ctx.prof_token),
            Some(json!({"name": name})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        body["data"]["id"].as_i64().unwrap()
    }

    #[tokio::test]
    async fn create_list_and_delete_a_batch() {
        let ctx = setup().await;
        let batch_id = create_batch(&ctx, "2026-A").await;

        let (status, body) = send(
            &ctx.app,
            Method::GET,
            "/api/batches",
            Some(&ctx.prof_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["name"], "2026-A");

        let (status, _) = send(
            &ctx.app,
            Method::DELETE,
            &format!("/api/batches/{batch_id}"),
            Some(&ctx.prof_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn duplicate_batch_name_is_rejected() {
        let ctx = setup().await;
        create_batch(&ctx, "2026-A").await;

        let (status, body) = send(
            &ctx.app,
            Method::POST,
            "/api/batches",
            Some(&ctx.prof_token),
            Some(json!({"name": "2026-A"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_kind"], "validation");
    }

    #[tokio::test]
    async fn roster_assignment_round_trip() {
        let ctx = setup().await;
        let batch_id = create_batch(&ctx, "2026-R").await;
        let students_uri = format!("/api/batches/{batch_id}/students");

        let (status, _) = send(
            &ctx.app,
            Method::POST,
            &students_uri,
            Some(&ctx.prof_token),
            Some(json!({"user_id": ctx.student.id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &ctx.app,
            Method::GET,
            &students_uri,
            Some(&ctx.prof_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let roster = body["data"].as_array().unwrap();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0]["id"], ctx.student.id);
        assert_eq!(roster[0]["username"], "bat_stud");

        let (status, _) = send(
            &ctx.app,
            Method::DELETE,
            &format!("{students_uri}/{}", ctx.student.id),
            Some(&ctx.prof_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(
            &ctx.app,
            Method::GET,
            &students_uri,
            Some(&ctx.prof_token),
            None,
        )
        .await;
        assert!(body["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn assigning_twice_or_assigning_a_professor_fails() {
        let ctx = setup().await;
        let batch_id = create_batch(&ctx, "2026-X").await;
        let students_uri = format!("/api/batches/{batch_id}/students");

        let (status, _) = send(
            &ctx.app,
            Method::POST,
            &students_uri,
            Some(&ctx.prof_token),
            Some(json!({"user_id": ctx.student.id})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &ctx.app,
            Method::POST,
            &students_uri,
            Some(&ctx.prof_token),
            Some(json!({"user_id": ctx.student.id})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_kind"], "validation");

        let other_prof = UserModel::create(&ctx.db, "bat_prof2", "bat_prof2@test.com", Role::Professor)
            .await
            .unwrap();
        let (status, body) = send(
            &ctx.app,
            Method::POST,
            &students_uri,
            Some(&ctx.prof_token),
            Some(json!({"user_id": other_prof.id})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_kind"], "validation");
    }

    #[tokio::test]
    async fn unknown_batch_or_user_is_not_found() {
        let ctx = setup().await;
        let batch_id = create_batch(&ctx, "2026-N").await;

        let (status, _) = send(
            &ctx.app,
            Method::POST,
            "/api/batches/99999/students",
            Some(&ctx.prof_token),
            Some(json!({"user_id": ctx.student.id})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &ctx.app,
            Method::POST,
            &format!("/api/batches/{batch_id}/students"),
            Some(&ctx.prof_token),
            Some(json!({"user_id": 99_999})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(
            &ctx.app,
            Method::DELETE,
            &format!("/api/batches/{batch_id}/students/99999"),
            Some(&ctx.prof_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
