//! Login and session checks against the live playground.

use apiprobe_application::HarnessResult;
use apiprobe_domain::{AuthMaterials, SessionStatus};
use apiprobe_infrastructure::{assert_field_equals, assert_status};
use apiprobe_scenarios::{Harness, accounts};
use pretty_assertions::assert_eq;

#[tokio::test]
#[ignore = "requires network access to playground.learnqa.ru"]
async fn test_login_fixed_user() -> HarnessResult<()> {
    let harness = Harness::from_env()?;
    let session = harness
        .sessions
        .login(&accounts::VINKOTOV.credentials())
        .await?;
    assert_eq!(session.user_id(), accounts::VINKOTOV.id);

    let response = harness.users.check_auth(Some(&session)).await?;
    assert_status(&response, 200)?;
    assert_field_equals(&response, "user_id", accounts::VINKOTOV.id)?;

    assert_eq!(harness.sessions.verify(&session).await?, SessionStatus::Active);
    Ok(())
}

#[tokio::test]
#[ignore = "requires network access to playground.learnqa.ru"]
async fn test_register_then_login_yields_same_id() -> HarnessResult<()> {
    let mut harness = Harness::from_env()?;
    let (user, session) = harness.register_and_login().await?;
    assert_eq!(session.user_id(), user.id);
    Ok(())
}

#[tokio::test]
#[ignore = "requires network access to playground.learnqa.ru"]
async fn test_check_auth_with_half_of_the_pair() -> HarnessResult<()> {
    let harness = Harness::from_env()?;
    let session = harness
        .sessions
        .login(&accounts::VINKOTOV.credentials())
        .await?;

    let token_only = AuthMaterials {
        csrf_token: Some(session.csrf_token().to_string()),
        session_cookie: None,
    };
    let cookie_only = AuthMaterials {
        csrf_token: None,
        session_cookie: Some(session.session_cookie().to_string()),
    };
    for materials in [token_only, cookie_only] {
        let response = harness.users.check_auth_with(&materials).await?;
        assert_status(&response, 200)?;
        assert_field_equals(&response, "user_id", 0)?;
    }
    Ok(())
}
