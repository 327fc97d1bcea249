#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use api::auth::generate_jwt;
    use axum::http::{Method, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::json;

    use db::models::{
        attendance_session::{Model as SessionModel, NewSession, SessionStatus},
        batch::Model as BatchModel,
        batch_student::Model as BatchStudentModel,
        class_config::Model as ClassConfigModel,
        subject::Model as SubjectModel,
        user::{Model as UserModel, Role},
    };

    use crate::helpers::app::{TestApp, make_test_app, send};

    struct TestCtx {
        app: TestApp,
        db: sea_orm::DatabaseConnection,
        professor: UserModel,
        prof_token: String,
        sess: SessionModel,
    }

    async fn setup() -> TestCtx {
        let (app, db) = make_test_app().await;

        let professor = UserModel::create(&db, "put_prof", "put_prof@test.com", Role::Professor)
            .await
            .unwrap();
        let (prof_token, _) = generate_jwt(professor.id);

        let student = UserModel::create(&db, "put_stud", "put_stud@test.com", Role::Student)
            .await
            .unwrap();

        let batch = BatchModel::create(&db, "2026-P").await.unwrap();
        BatchStudentModel::assign(&db, batch.id, student.id).await.unwrap();
        let subject = SubjectModel::create(&db, "COS214", "Design Patterns")
            .await
            .unwrap();
        let config = ClassConfigModel::create(&db, "EB 3-1", -25.7530, 28.2300)
            .await
            .unwrap();

        let now = Utc::now();
        let sess = SessionModel::create(
            &db,
            NewSession {
                title: "Lecture 1".into(),
                description: "Introduction".into(),
                valid_from: now - Duration::hours(1),
                valid_to: now + Duration::hours(1),
                subject_code: subject.code.clone(),
                batch_id: batch.id,
                class_config_id: config.id,
                created_by: professor.id,
            },
        )
        .await
        .unwrap();

        TestCtx {
            app,
            db,
            professor,
            prof_token,
            sess,
        }
    }

    #[tokio::test]
    async fn edit_updates_fields_while_new() {
        let ctx = setup().await;

        let (status, body) = send(
            &ctx.app,
            Method::PUT,
            &format!("/api/sessions/{}", ctx.sess.uuid),
            Some(&ctx.prof_token),
            Some(json!({"title": "Lecture 1 (moved)", "description": "Moved to Friday"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["title"], "Lecture 1 (moved)");
        assert_eq!(body["data"]["description"], "Moved to Friday");
    }

    #[tokio::test]
    async fn edit_rejects_inverted_window() {
        let ctx = setup().await;

        let (status, body) = send(
            &ctx.app,
            Method::PUT,
            &format!("/api/sessions/{}", ctx.sess.uuid),
            Some(&ctx.prof_token),
            Some(json!({
                "valid_to": (ctx.sess.valid_from - Duration::minutes(5)).to_rfc3339(),
            })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_kind"], "invalid_time_range");
    }

    #[tokio::test]
    async fn edit_of_completed_session_is_rejected() {
        let ctx = setup().await;
        SessionModel::transition(&ctx.db, &ctx.sess.uuid, ctx.professor.id, SessionStatus::Active)
            .await
            .unwrap();
        SessionModel::transition(
            &ctx.db,
            &ctx.sess.uuid,
            ctx.professor.id,
            SessionStatus::Completed,
        )
        .await
        .unwrap();

        let (status, body) = send(
            &ctx.app,
            Method::PUT,
            &format!("/api/sessions/{}", ctx.sess.uuid),
            Some(&ctx.prof_token),
            Some(json!({"title": "Too late"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_kind"], "validation");
    }

    #[tokio::test]
    async fn edit_by_non_creator_is_forbidden() {
        let ctx = setup().await;

        let other = UserModel::create(&ctx.db, "put_prof2", "put_prof2@test.com", Role::Professor)
            .await
            .unwrap();
        let (other_token, _) = generate_jwt(other.id);

        let (status, body) = send(
            &ctx.app,
            Method::PUT,
            &format!("/api/sessions/{}", ctx.sess.uuid),
            Some(&other_token),
            Some(json!({"title": "Hijacked"})),
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error_kind"], "forbidden");
    }

    #[tokio::test]
    async fn edit_unknown_collaborator_is_not_found() {
        let ctx = setup().await;

        let (status, body) = send(
            &ctx.app,
            Method::PUT,
            &format!("/api/sessions/{}", ctx.sess.uuid),
            Some(&ctx.prof_token),
            Some(json!({"class_config_id": 99_999})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_kind"], "not_found");
    }
}
