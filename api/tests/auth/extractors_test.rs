#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use api::auth::generate_jwt;
    use axum::http::{Method, StatusCode};

    use db::models::user::{Model as UserModel, Role};

    use crate::helpers::app::{make_test_app, send};

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let (app, _db) = make_test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/sessions", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn malformed_token_is_unauthorized() {
        let (app, _db) = make_test_app().await;

        let (status, _) = send(
            &app,
            Method::GET,
            "/api/sessions",
            Some("not-a-jwt"),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_passes_the_guard() {
        let (app, db) = make_test_app().await;
        let user = UserModel::create(&db, "auth_stud", "auth_stud@test.com", Role::Student)
            .await
            .unwrap();
        let (token, _) = generate_jwt(user.id);

        let (status, body) = send(&app, Method::GET, "/api/sessions", Some(&token), None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
    }

    #[tokio::test]
    async fn token_for_a_deleted_user_cannot_reach_professor_routes() {
        let (app, _db) = make_test_app().await;
        // signed with the right secret, but no matching user row
        let (token, _) = generate_jwt(424_242);

        let (status, _) = send(&app, Method::GET, "/api/subjects", Some(&token), None).await;

        assert_eq!(status, StatusCode::FORBIDDEN);
    }
}
