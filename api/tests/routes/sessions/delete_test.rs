#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use api::auth::generate_jwt;
    use axum::http::{Method, StatusCode};
    use chrono::{Duration, Utc};

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
        student_token: String,
        sess: SessionModel,
    }

    async fn setup() -> TestCtx {
        let (app, db) = make_test_app().await;

        let professor = UserModel::create(&db, "del_prof", "del_prof@test.com", Role::Professor)
            .await
            .unwrap();
        let (prof_token, _) = generate_jwt(professor.id);

        let student = UserModel::create(&db, "del_stud", "del_stud@test.com", Role::Student)
            .await
            .unwrap();
        let (student_token, _) = generate_jwt(student.id);

        let batch = BatchModel::create(&db, "2026-D").await.unwrap();
        BatchStudentModel::assign(&db, batch.id, student.id).await.unwrap();
        let subject = SubjectModel::create(&db, "COS221", "Databases").await.unwrap();
        let config = ClassConfigModel::create(&db, "IT 2-2", -25.7550, 28.2320)
            .await
            .unwrap();

        let now = Utc::now();
        let sess = SessionModel::create(
            &db,
            NewSession {
                title: "Tutorial 4".into(),
                description: "Normal forms".into(),
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
            student_token,
            sess,
        }
    }

    #[tokio::test]
    async fn delete_removes_the_session() {
        let ctx = setup().await;
        let uri = format!("/api/sessions/{}", ctx.sess.uuid);

        let (status, _) = send(&ctx.app, Method::DELETE, &uri, Some(&ctx.prof_token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&ctx.app, Method::GET, &uri, Some(&ctx.prof_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_is_allowed_in_any_status() {
        let ctx = setup().await;
        SessionModel::transition(&ctx.db, &ctx.sess.uuid, ctx.professor.id, SessionStatus::Active)
            .await
            .unwrap();

        let (status, _) = send(
            &ctx.app,
            Method::DELETE,
            &format!("/api/sessions/{}", ctx.sess.uuid),
            Some(&ctx.prof_token),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn delete_by_non_creator_is_forbidden() {
        let ctx = setup().await;

        let other = UserModel::create(&ctx.db, "del_prof2", "del_prof2@test.com", Role::Professor)
            .await
            .unwrap();
        let (other_token, _) = generate_jwt(other.id);

        let (status, body) = send(
            &ctx.app,
            Method::DELETE,
            &format!("/api/sessions/{}", ctx.sess.uuid),
            Some(&other_token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error_kind"], "forbidden");
    }

    #[tokio::test]
    async fn delete_requires_the_professor_role() {
        let ctx = setup().await;

        let (status, _) = send(
            &ctx.app,
            Method::DELETE,
            &format!("/api/sessions/{}", ctx.sess.uuid),
            Some(&ctx.student_token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn delete_unknown_session_is_not_found() {
        let ctx = setup().await;

        let (status, body) = send(
            &ctx.app,
            Method::DELETE,
            "/api/sessions/missing-uuid",
            Some(&ctx.prof_token),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_kind"], "not_found");
    }
}
