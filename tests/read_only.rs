//
//  sonarqube-client
//  tests/read_only.rs
//

//! Live smoke tests for read-only endpoints. These create nothing and can
//! run against any reachable instance.

mod common;

use anyhow::Result;
use sonarqube_client::api::qualityprofiles::ProfilesSearchOption;
use sonarqube_client::api::rules::RulesSearchOption;

#[tokio::test]
async fn server_answers_version_and_ping() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };

    let version = client.server().version().await?;
    assert!(!version.is_empty());
    assert!(version.chars().next().is_some_and(|c| c.is_ascii_digit()));

    assert_eq!(client.system().ping().await?, "pong");

    let status = client.system().status().await?;
    assert_eq!(status.status, "UP");
    assert!(version.starts_with(&status.version) || status.version.starts_with(&version));
    Ok(())
}

#[tokio::test]
async fn languages_and_metrics_are_populated() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };

    let languages = client.languages().list(&Default::default()).await?;
    assert!(!languages.languages.is_empty());

    let metrics = client
        .metrics()
        .search(&Default::default())
        .await?;
    assert!(metrics.metrics.iter().any(|m| m.key == "coverage"));

    let types = client.metrics().types().await?;
    assert!(types.types.iter().any(|t| t == "PERCENT"));
    Ok(())
}

#[tokio::test]
async fn builtin_profiles_and_rules_exist() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };

    let profiles = client
        .quality_profiles()
        .search(&ProfilesSearchOption {
            defaults: Some(true),
            ..Default::default()
        })
        .await?;
    assert!(profiles.profiles.iter().all(|p| p.is_default));

    let rules = client
        .rules()
        .search(&RulesSearchOption {
            ps: Some(5),
            ..Default::default()
        })
        .await?;
    assert!(rules.total > 0);
    assert_eq!(rules.rules.len(), 5);
    Ok(())
}
