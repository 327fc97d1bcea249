#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use api::auth::generate_jwt;
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use db::models::user::{Model as UserModel, Role};

    use crate::helpers::app::{TestApp, make_test_app, send};

    async fn setup() -> (TestApp, String) {
        let (app, db) = make_test_app().await;

        let professor = UserModel::create(&db, "cfg_prof", "cfg_prof@test.com", Role::Professor)
            .await
            .unwrap();
        let (prof_token, _) = generate_jwt(professor.id);

        (app, prof_token)
    }

    #[tokio::test]
    async fn create_edit_and_list_class_configs() {
        let (app, prof_token) = setup().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/class-configs",
            Some(&prof_token),
            Some(json!({"label": "Lab 2-1", "latitude": -25.7545, "longitude": 28.2314})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let config_id = body["data"]["id"].as_i64().unwrap();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/class-configs/{config_id}"),
            Some(&prof_token),
            Some(json!({"label": "Lab 2-2", "latitude": -25.7550})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["label"], "Lab 2-2");
        assert_eq!(body["data"]["longitude"], 28.2314);

        let (status, body) = send(&app, Method::GET, "/api/class-configs", Some(&prof_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn out_of_range_coordinates_are_rejected() {
        let (app, prof_token) = setup().await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/class-configs",
            Some(&prof_token),
            Some(json!({"label": "Nowhere", "latitude": 95.0, "longitude": 0.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_kind"], "invalid_coordinates");

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/class-configs",
            Some(&prof_token),
            Some(json!({"label": "Nowhere", "latitude": 0.0, "longitude": 181.0})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_kind"], "invalid_coordinates");
    }

    #[tokio::test]
    async fn editing_an_unknown_config_is_not_found() {
        let (app, prof_token) = setup().await;

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/class-configs/99999",
            Some(&prof_token),
            Some(json!({"label": "Ghost"})),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error_kind"], "not_found");
    }

    #[tokio::test]
    async fn delete_round_trip() {
        let (app, prof_token) = setup().await;

        let (_, body) = send(
            &app,
            Method::POST,
            "/api/class-configs",
            Some(&prof_token),
            Some(json!({"label": "Temp", "latitude": 0.0, "longitude": 0.0})),
        )
        .await;
        let config_id = body["data"]["id"].as_i64().unwrap();

        let uri = format!("/api/class-configs/{config_id}");
        let (status, _) = send(&app, Method::DELETE, &uri, Some(&prof_token), None).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(&app, Method::DELETE, &uri, Some(&prof_token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
