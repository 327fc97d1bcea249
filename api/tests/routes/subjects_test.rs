#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use api::auth::generate_jwt;
    use axum::http::{Method, StatusCode};
    use chrono::{Duration, Utc};
    use serde_json::json;

    use db::models::{
        attendance_session::{Model as SessionModel, NewSession},
        batch::Model as BatchModel,
        class_config::Model as ClassConfigModel,
        subject::Model as SubjectModel,
        user::{Model as UserModel, Role},
    };

    use crate::helpers::app::{TestApp, make_test_app, send};

    async fn setup() -> (TestApp, sea_orm::DatabaseConnection, String, String) {
        let (app, db) = make_test_app().await;

        let professor = UserModel::create(&db, "sub_prof", "sub_prof@test.com", Role::Professor)
            .await
            .unwrap();
        let (prof_token, _) = generate_jwt(professor.id);

        let student = UserModel::create(&db, "sub_stud", "sub_stud@test.com", Role::Student)
            .await
            .unwrap();
        let (student_token, _) = generate_jwt(student.id);

        (app, db, prof_token, student_token)
    }

    #[tokio::test]
    async fn create_and_list_subjects() {
        let (app, _db, prof_token, _) = setup().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/subjects",
            Some(&prof_token),
            Some(json!({"code": "COS301", "title": "Software Engineering"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["code"], "COS301");

        let (status, body) = send(&app, Method::GET, "/api/subjects", Some(&prof_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn duplicate_subject_code_is_rejected() {
        let (app, _db, prof_token, _) = setup().await;
        let req = json!({"code": "COS301", "title": "Software Engineering"});

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/subjects",
            Some(&prof_token),
            Some(req.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/subjects",
            Some(&prof_token),
            Some(req),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_kind"], "validation");
    }

    #[tokio::test]
    async fn subject_routes_are_professor_only() {
        let (app, _db, _, student_token) = setup().await;

        let (status, _) = send(&app, Method::GET, "/api/subjects", Some(&student_token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = send(&app, Method::GET, "/api/subjects", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn delete_refuses_while_sessions_reference_the_subject() {
        let (app, db, prof_token, _) = setup().await;

        let professor = UserModel::create(&db, "sub_prof2", "sub_prof2@test.com", Role::Professor)
            .await
            .unwrap();
        let subject = SubjectModel::create(&db, "COS212", "Data Structures")
            .await
            .unwrap();
        let batch = BatchModel::create(&db, "2026-S").await.unwrap();
        let config = ClassConfigModel::create(&db, "NW 1-1", -25.7540, 28.2310)
            .await
            .unwrap();

        let now = Utc::now();
        let sess = SessionModel::create(
            &db,
            NewSession {
                title: "Lecture 2".into(),
                description: "AVL trees".into(),
                valid_from: now,
                valid_to: now + Duration::hours(1),
                subject_code: subject.code.clone(),
                batch_id: batch.id,
                class_config_id: config.id,
                created_by: professor.id,
            },
        )
        .await
        .unwrap();

        let uri = format!("/api/subjects/{}", subject.id);
        let (status, body) = send(&app, Method::DELETE, &uri, Some(&prof_token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_kind"], "validation");

        // once the session is gone the subject can be deleted
        SessionModel::delete(&db, &sess.uuid, professor.id).await.unwrap();
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&prof_token), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
