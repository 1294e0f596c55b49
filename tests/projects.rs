//
//  sonarqube-client
//  tests/projects.rs
//

//! Live tests for project provisioning, search and administration.

mod common;

use anyhow::Result;
use sonarqube_client::api::projects::{
    ProjectsCreateOption, ProjectsSearchOption, ProjectsUpdateKeyOption,
    ProjectsUpdateVisibilityOption,
};

use common::{unique_name, Cleanup};

#[tokio::test]
async fn project_lifecycle() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };
    let mut cleanup = Cleanup::new();

    let key = unique_name("project");
    let created = client
        .projects()
        .create(&ProjectsCreateOption {
            project: key.clone(),
            name: format!("{key} (integration)"),
            ..Default::default()
        })
        .await?;
    cleanup.project(&key);
    assert_eq!(created.project.key, key);

    // A freshly provisioned project must show up in a keyed search and
    // carry no analysis date yet.
    let found = client
        .projects()
        .search(&ProjectsSearchOption {
            projects: Some(key.clone()),
            ..Default::default()
        })
        .await?;
    assert_eq!(found.components.len(), 1);
    assert_eq!(found.components[0].key, key);
    assert!(found.components[0].last_analysis_date.is_none());

    client
        .projects()
        .update_visibility(&ProjectsUpdateVisibilityOption {
            project: key.clone(),
            visibility: "private".to_string(),
        })
        .await?;
    let found = client
        .projects()
        .search(&ProjectsSearchOption {
            projects: Some(key.clone()),
            ..Default::default()
        })
        .await?;
    assert_eq!(found.components[0].visibility.as_deref(), Some("private"));

    cleanup.run(&client).await;
    Ok(())
}

#[tokio::test]
async fn project_key_rename() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };
    let mut cleanup = Cleanup::new();

    let key = unique_name("rename");
    client
        .projects()
        .create(&ProjectsCreateOption {
            project: key.clone(),
            name: key.clone(),
            ..Default::default()
        })
        .await?;

    let new_key = format!("{key}-moved");
    client
        .projects()
        .update_key(&ProjectsUpdateKeyOption {
            from: key.clone(),
            to: new_key.clone(),
        })
        .await?;
    cleanup.project(&new_key);

    let found = client
        .projects()
        .search(&ProjectsSearchOption {
            projects: Some(format!("{key},{new_key}")),
            ..Default::default()
        })
        .await?;
    assert_eq!(found.components.len(), 1);
    assert_eq!(found.components[0].key, new_key);

    cleanup.run(&client).await;
    Ok(())
}

#[tokio::test]
async fn duplicate_key_is_rejected() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };
    let mut cleanup = Cleanup::new();

    let key = unique_name("dup");
    let opt = ProjectsCreateOption {
        project: key.clone(),
        name: key.clone(),
        ..Default::default()
    };
    client.projects().create(&opt).await?;
    cleanup.project(&key);

    let err = client.projects().create(&opt).await.unwrap_err();
    assert!(matches!(
        err,
        sonarqube_client::ApiError::BadRequest(_)
    ));

    cleanup.run(&client).await;
    Ok(())
}
