mod common;

use common::{location, spawn_app, stub_document, PASSWORD, REVIEWER, SUBMITTER};
use serde_json::{json, Value};

#[tokio::test]
async fn health_check_works() {
    let app = spawn_app(vec![]).await;

    let response = app.get("/health").await;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn dashboard_requires_login() {
    let app = spawn_app(vec![]).await;

    let response = app.get("/dashboard/user").await;

    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(location(&response), "/login");
    assert!(app.backend.list_requests().is_empty());
}

#[tokio::test]
async fn failed_login_is_reported_to_the_session() {
    let app = spawn_app(vec![]).await;

    let response = app.login(SUBMITTER, "wrong").await;
    assert_eq!(response.status().as_u16(), 401);

    let session: Value = app.get("/session").await.json().await.unwrap();
    assert_eq!(session["authenticated"], false);
    assert_eq!(session["notifications"][0]["title"], "AuthService");
    assert_eq!(
        session["notifications"][0]["message"],
        "Code 401: Invalid credentials"
    );

    let drained: Value = app.get("/session").await.json().await.unwrap();
    assert_eq!(drained["notifications"], json!([]));
}

#[tokio::test]
async fn reviewer_lands_on_reviewer_dashboard() {
    let app = spawn_app(vec![stub_document("d-1", "READY_FOR_REVIEW")]).await;

    let response = app.login(REVIEWER, PASSWORD).await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.headers()["HX-Redirect"], "/dashboard");

    let response = app.get("/dashboard").await;
    assert_eq!(location(&response), "/dashboard/user");

    let response = app.get("/dashboard/user").await;
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(location(&response), "/dashboard/reviewer");

    let response = app.get("/dashboard/reviewer").await;
    assert_eq!(response.status().as_u16(), 200);
    let view: Value = response.json().await.unwrap();
    assert_eq!(view["role"], "REVIEWER");
    assert_eq!(view["columns"][0], "creatorId");
    assert_eq!(view["data"]["count"], 1);
    assert_eq!(view["data"]["results"][0]["creatorEmail"], SUBMITTER);
    assert_eq!(
        view["data"]["results"][0]["availableActions"][1]["type"],
        "CHANGE_STATUS"
    );
    assert!(!view["allowedStatuses"]
        .as_array()
        .unwrap()
        .contains(&json!("DRAFT")));

    let session: Value = app.get("/session").await.json().await.unwrap();
    assert_eq!(session["location"], "/dashboard/reviewer");
    assert_eq!(session["user"]["role"], "REVIEWER");
}

#[tokio::test]
async fn disallowed_filter_is_rejected() {
    let app = spawn_app(vec![]).await;
    app.login(SUBMITTER, PASSWORD).await;

    let response = app.get("/dashboard/user?creatorId=u-9").await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn confirmed_delete_reloads_the_same_page() {
    let app = spawn_app(vec![
        stub_document("d-1", "DRAFT"),
        stub_document("d-2", "APPROVED"),
    ])
    .await;
    app.login(SUBMITTER, PASSWORD).await;

    let view: Value = app
        .get("/dashboard/user?page=2&size=5")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["query"]["page"], 2);
    assert_eq!(app.wait_for_lists(1).await.len(), 1);

    let response = app
        .post_json(
            "/dashboard/user/actions",
            json!({ "action": "DELETE", "documentId": "d-1" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 202);

    let dialog = app.open_dialog().await;
    assert_eq!(dialog["kind"], "confirmation");
    assert_eq!(
        dialog["data"]["message"],
        "Are you sure you want to delete the document?"
    );

    let response = app.post_json("/dialog", json!({ "action": "confirm" })).await;
    assert_eq!(response.status().as_u16(), 204);

    let lists = app.wait_for_lists(2).await;
    assert!(app
        .backend
        .requests()
        .contains(&"DELETE /document/d-1".to_string()));
    assert!(lists[1].contains("page=2"), "{}", lists[1]);
    assert!(lists[1].contains("size=5"), "{}", lists[1]);

    let view: Value = app
        .get("/dashboard/user?page=2&size=5")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["data"]["count"], 1);
    assert_eq!(app.get("/dialog").await.status().as_u16(), 204);
}

#[tokio::test]
async fn cancelled_rename_sends_nothing() {
    let app = spawn_app(vec![stub_document("d-1", "DRAFT")]).await;
    app.login(SUBMITTER, PASSWORD).await;
    app.get("/dashboard/user").await;

    app.post_json(
        "/dashboard/user/actions",
        json!({ "action": "CHANGE_NAME", "documentId": "d-1" }),
    )
    .await;

    let dialog = app.open_dialog().await;
    assert_eq!(dialog["kind"], "rename");
    assert_eq!(dialog["data"]["document"]["name"], "Document d-1");

    let response = app.post_json("/dialog", json!({ "action": "cancel" })).await;
    assert_eq!(response.status().as_u16(), 204);

    assert_eq!(app.get("/dialog").await.status().as_u16(), 204);
    assert!(!app
        .backend
        .requests()
        .iter()
        .any(|request| request.starts_with("PATCH")));
}

#[tokio::test]
async fn add_document_uploads_the_picked_file() {
    let app = spawn_app(vec![]).await;
    app.login(SUBMITTER, PASSWORD).await;
    let view: Value = app.get("/dashboard/user").await.json().await.unwrap();
    assert_eq!(view["toolbarActions"][0]["type"], "ADD");

    app.post_json("/dashboard/user/actions", json!({ "action": "ADD" }))
        .await;
    let dialog = app.open_dialog().await;
    assert_eq!(dialog["kind"], "addDocument");

    let form = reqwest::multipart::Form::new()
        .text("intent", "send_to_review")
        .part(
            "file",
            reqwest::multipart::Part::bytes(b"%PDF-1.4".to_vec())
                .file_name("contract.pdf")
                .mime_str("application/pdf")
                .unwrap(),
        );
    let response = app
        .client
        .post(format!("{}/dialog/upload", app.address))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 204);

    app.wait_for_lists(2).await;
    assert!(app.backend.requests().contains(
        &"POST /document name=contract status=READY_FOR_REVIEW file=contract.pdf".to_string()
    ));
}

#[tokio::test]
async fn json_login_and_logout_round_trip() {
    let app = spawn_app(vec![]).await;

    let response = app
        .post_json("/login", json!({ "email": SUBMITTER, "password": PASSWORD }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(app.get("/dashboard/user").await.status().as_u16(), 200);

    let response = app.get("/logout").await;
    assert_eq!(location(&response), "/login");

    let response = app.get("/dashboard/user").await;
    assert_eq!(response.status().as_u16(), 303);
    assert_eq!(location(&response), "/login");
}

#[tokio::test]
async fn malformed_email_is_rejected_before_the_backend() {
    let app = spawn_app(vec![]).await;

    let response = app.login("not-an-email", PASSWORD).await;

    assert_eq!(response.status().as_u16(), 422);
    assert!(app.backend.requests().is_empty());
}
