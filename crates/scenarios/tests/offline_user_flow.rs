//! End-to-end scenarios against a local double of the playground API.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use apiprobe_application::{HarnessError, HarnessResult};
use apiprobe_domain::{
    AuthMaterials, HarnessConfig, JobPhase, JobStatus, Overrides, RegistrationField, SessionStatus,
    UserUpdate,
};
use apiprobe_infrastructure::{
    assert_body_equals, assert_field_equals, assert_has_fields, assert_missing_fields,
    assert_status,
};
use apiprobe_scenarios::{FixedAccount, Harness, accounts, messages};
use pretty_assertions::assert_eq;
use wiremock::matchers::{body_string_contains, header, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const USER_ID: i64 = 7001;

fn harness(server: &MockServer) -> Harness {
    let config = HarnessConfig::from_base_url(&server.uri()).unwrap();
    Harness::with_reqwest(config).expect("failed to build harness")
}

async fn mount_register_and_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/user/"))
        .and(body_string_contains("username=learnqa"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(r#"{{"id":"{USER_ID}"}}"#)))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .and(body_string_contains("password=123"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-csrf-token", "tok")
                .insert_header("set-cookie", "auth_sid=sid; Path=/")
                .set_body_string(format!(r#"{{"user_id":{USER_ID}}}"#)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_register_login_get_and_edit() -> HarnessResult<()> {
    let server = MockServer::start().await;
    mount_register_and_login(&server).await;

    let user_path = format!("/api/user/{USER_ID}");
    Mock::given(method("GET"))
        .and(path(user_path.as_str()))
        .and(header("x-csrf-token", "tok"))
        .and(header("cookie", "auth_sid=sid"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"id":"{USER_ID}","username":"learnqa","email":"a@example.com","firstName":"learnqa","lastName":"learnqa"}}"#
        )))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(user_path.as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"username":"learnqa"}"#))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(user_path.as_str()))
        .and(header("x-csrf-token", "tok"))
        .and(body_string_contains("firstName=Changed"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut harness = harness(&server);
    let (user, session) = harness.register_and_login().await?;
    assert_eq!(user.id, USER_ID);
    assert_eq!(session.user_id(), user.id);
    assert_eq!(session.csrf_token(), "tok");
    assert_eq!(session.session_cookie(), "sid");

    let response = harness.users.get_user(user.id, Some(&session)).await?;
    assert_status(&response, 200)?;
    assert_has_fields(&response, ["username", "email", "firstName", "lastName"])?;
    assert_field_equals(&response, "id", USER_ID)?;

    let response = harness.users.get_user_unauthenticated(user.id).await?;
    assert_has_fields(&response, ["username"])?;
    assert_missing_fields(&response, ["email", "firstName", "lastName"])?;

    let update = UserUpdate::new().with(RegistrationField::FirstName, "Changed");
    let response = harness.users.edit_user(user.id, &update, Some(&session)).await?;
    assert_status(&response, 200)?;
    Ok(())
}

#[tokio::test]
async fn test_delete_then_get_is_not_found() -> HarnessResult<()> {
    let server = MockServer::start().await;
    mount_register_and_login(&server).await;

    let user_path = format!("/api/user/{USER_ID}");
    Mock::given(method("DELETE"))
        .and(path(user_path.as_str()))
        .and(header("cookie", "auth_sid=sid"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(user_path.as_str()))
        .respond_with(ResponseTemplate::new(404).set_body_string(messages::USER_NOT_FOUND))
        .mount(&server)
        .await;

    let mut harness = harness(&server);
    let (user, session) = harness.register_and_login().await?;

    let response = harness.users.delete_user(user.id, Some(&session)).await?;
    assert_status(&response, 200)?;

    let response = harness.users.get_user(user.id, Some(&session)).await?;
    assert_status(&response, 404)?;
    assert_body_equals(&response, messages::USER_NOT_FOUND)?;
    Ok(())
}

/// Serves logins for `account`, handing out `token` and cookie `sid`.
async fn mount_fixed_login(server: &MockServer, account: FixedAccount, token: &str, sid: &str) {
    let email = account.email.replace('@', "%40");
    Mock::given(method("POST"))
        .and(path("/api/user/login"))
        .and(body_string_contains(format!("email={email}")))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("x-csrf-token", token)
                .insert_header("set-cookie", format!("auth_sid={sid}; Path=/"))
                .set_body_string(format!(r#"{{"user_id":{}}}"#, account.id)),
        )
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_foreign_edit_is_sent_with_actor_session_and_changes_nothing() -> HarnessResult<()> {
    let server = MockServer::start().await;
    let target = accounts::FIXTURE_A;
    let actor = accounts::FIXTURE_B;
    mount_fixed_login(&server, target, "tok-a", "sid-a").await;
    mount_fixed_login(&server, actor, "tok-b", "sid-b").await;

    let target_path = format!("/api/user/{}", target.id);
    Mock::given(method("GET"))
        .and(path(target_path.as_str()))
        .and(header("x-csrf-token", "tok-a"))
        .and(header("cookie", "auth_sid=sid-a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(format!(
            r#"{{"id":"{}","username":"learnqa","email":"{}","firstName":"learnqa","lastName":"learnqa"}}"#,
            target.id, target.email
        )))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(target_path.as_str()))
        .and(header("x-csrf-token", "tok-b"))
        .and(header("cookie", "auth_sid=sid-b"))
        .respond_with(ResponseTemplate::new(400).set_body_string("This user can only edit their own data."))
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness(&server);
    let target_session = harness.sessions.login(&target.credentials()).await?;
    let before = harness.profile(&target_session).await?;

    let actor_session = harness.sessions.login(&actor.credentials()).await?;
    assert_eq!(actor_session.csrf_token(), "tok-b");
    let update = UserUpdate::new().with(RegistrationField::LastName, "aqnrael");
    let response = harness
        .users
        .edit_user(target.id, &update, Some(&actor_session))
        .await?;
    assert_status(&response, 400)?;

    let after = harness.profile(&target_session).await?;
    assert_eq!(after, before);
    assert_eq!(after[2], ("lastName", Some("learnqa".to_string())));
    Ok(())
}

#[tokio::test]
async fn test_protected_users_are_not_deleted() -> HarnessResult<()> {
    let server = MockServer::start().await;
    mount_fixed_login(&server, accounts::VINKOTOV, "tok", "sid").await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/user/[1-5]$"))
        .and(header("x-csrf-token", "tok"))
        .respond_with(ResponseTemplate::new(400).set_body_string(messages::PROTECTED_USER))
        .expect(5)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/api/user/[1-5]$"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"username":"Vitaliy"}"#))
        .expect(5)
        .mount(&server)
        .await;

    let harness = harness(&server);
    let session = harness
        .sessions
        .login(&accounts::VINKOTOV.credentials())
        .await?;

    for id in accounts::PROTECTED_IDS {
        let response = harness.users.delete_user(id, Some(&session)).await?;
        assert_status(&response, 400)?;
        assert_body_equals(&response, messages::PROTECTED_USER)?;

        let response = harness.users.get_user(id, None).await?;
        assert_status(&response, 200)?;
    }
    Ok(())
}

#[tokio::test]
async fn test_partial_materials_go_out_unauthenticated() -> HarnessResult<()> {
    let server = MockServer::start().await;
    let user_path = format!("/api/user/{USER_ID}");
    Mock::given(method("PUT"))
        .and(path(user_path.as_str()))
        .and(header("x-csrf-token", "tok"))
        .respond_with(ResponseTemplate::new(200))
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path(user_path.as_str()))
        .respond_with(
            ResponseTemplate::new(400).set_body_string(messages::AUTH_TOKEN_NOT_SUPPLIED),
        )
        .mount(&server)
        .await;

    let harness = harness(&server);
    let materials = AuthMaterials {
        csrf_token: Some("tok".to_string()),
        session_cookie: None,
    };
    let update = UserUpdate::new().with(RegistrationField::LastName, "aqnrael");
    let response = harness
        .users
        .edit_user_with(USER_ID, &update, &materials)
        .await?;

    assert_status(&response, 400)?;
    assert_body_equals(&response, messages::AUTH_TOKEN_NOT_SUPPLIED)?;
    Ok(())
}

#[tokio::test]
async fn test_register_without_email_is_rejected() -> HarnessResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/user/"))
        .respond_with(ResponseTemplate::new(400).set_body_string(messages::missing_param("email")))
        .mount(&server)
        .await;

    let mut harness = harness(&server);
    let payload = harness
        .data
        .generate(&Overrides::new().omit(RegistrationField::Email));
    assert_eq!(payload.email, None);

    let response = harness.users.register(&payload).await?;
    assert_status(&response, 400)?;
    assert_body_equals(&response, &messages::missing_param("email"))?;

    let err = harness
        .register_user(&Overrides::new().omit(RegistrationField::Email))
        .await
        .unwrap_err();
    assert!(matches!(err, HarnessError::Assertion(_)));
    Ok(())
}

#[tokio::test]
async fn test_session_verify_reports_denied() -> HarnessResult<()> {
    let server = MockServer::start().await;
    mount_register_and_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/user/auth"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"user_id":0}"#))
        .mount(&server)
        .await;

    let mut harness = harness(&server);
    let (_, session) = harness.register_and_login().await?;
    assert_eq!(harness.sessions.verify(&session).await?, SessionStatus::Denied);
    Ok(())
}

#[tokio::test]
async fn test_long_redirect_chain_terminates() -> HarnessResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/long_redirect"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/hop/1"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hop/1"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/hop/2", server.uri())),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/hop/2"))
        .respond_with(ResponseTemplate::new(200).set_body_string("done"))
        .mount(&server)
        .await;

    let harness = harness(&server);
    let trace = harness.redirects.trace_long_redirect().await?;

    assert!(trace.is_terminal());
    assert_eq!(trace.len(), 3);
    assert_eq!(trace.redirect_count(), 2);
    assert_eq!(trace.final_url(), Some(format!("{}/hop/2", server.uri()).as_str()));
    for hop in &trace.hops()[..2] {
        assert!(hop.location.as_deref().is_some_and(|l| !l.is_empty()));
    }
    Ok(())
}

#[tokio::test]
async fn test_longtime_job_completes() -> HarnessResult<()> {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/ajax/api/longtime_job"))
        .and(query_param("token", "abc"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"status":"Job is ready","result":"42"}"#),
        )
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ajax/api/longtime_job"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"token":"abc","seconds":0}"#))
        .expect(1)
        .mount(&server)
        .await;

    let harness = harness(&server);
    let state = harness.jobs.run().await?;

    assert_eq!(state.token, "abc");
    assert_eq!(state.status, JobStatus::Ready);
    assert_eq!(state.phase, JobPhase::Ready);
    assert_eq!(state.result.as_deref(), Some("42"));
    assert_eq!(state.polls, 1);
    Ok(())
}
