#[cfg(test)]
mod tests {
    use axum::http::{Method, StatusCode};

    use crate::helpers::app::{make_test_app, send};

    #[tokio::test]
    async fn health_check_is_public() {
        let (app, _db) = make_test_app().await;

        let (status, body) = send(&app, Method::GET, "/api/health", None, None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], "OK");
    }
}
