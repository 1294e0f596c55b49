//
//  sonarqube-client
//  tests/webhooks.rs
//

//! Live tests for webhook administration.

mod common;

use anyhow::Result;
use sonarqube_client::api::webhooks::{DeliveriesOption, WebhooksCreateOption, WebhooksUpdateOption};

use common::{unique_name, Cleanup};

#[tokio::test]
async fn webhook_lifecycle() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };
    let mut cleanup = Cleanup::new();

    let name = unique_name("hook");
    let created = client
        .webhooks()
        .create(&WebhooksCreateOption {
            name: name.clone(),
            url: "https://hooks.invalid/sonar".to_string(),
            ..Default::default()
        })
        .await?;
    cleanup.webhook(&created.webhook.key);
    assert_eq!(created.webhook.name, name);

    let listed = client.webhooks().list(None).await?;
    assert!(listed.webhooks.iter().any(|w| w.key == created.webhook.key));

    let renamed = format!("{name}-renamed");
    client
        .webhooks()
        .update(&WebhooksUpdateOption {
            webhook: created.webhook.key.clone(),
            name: renamed.clone(),
            url: "https://hooks.invalid/sonar/v2".to_string(),
            secret: None,
        })
        .await?;

    let listed = client.webhooks().list(None).await?;
    let updated = listed
        .webhooks
        .iter()
        .find(|w| w.key == created.webhook.key)
        .expect("updated webhook still listed");
    assert_eq!(updated.name, renamed);
    assert_eq!(updated.url, "https://hooks.invalid/sonar/v2");

    // No analysis ran, so the delivery history of this hook is empty.
    let deliveries = client
        .webhooks()
        .deliveries(&DeliveriesOption {
            webhook: Some(created.webhook.key.clone()),
            ..Default::default()
        })
        .await?;
    assert_eq!(deliveries.deliveries.len(), 0);

    cleanup.run(&client).await;
    Ok(())
}

#[tokio::test]
async fn project_webhook_is_scoped() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };
    let mut cleanup = Cleanup::new();

    let project = unique_name("hookproj");
    client
        .projects()
        .create(&sonarqube_client::api::projects::ProjectsCreateOption {
            project: project.clone(),
            name: project.clone(),
            ..Default::default()
        })
        .await?;
    cleanup.project(&project);

    let created = client
        .webhooks()
        .create(&WebhooksCreateOption {
            name: unique_name("hook"),
            url: "https://hooks.invalid/sonar".to_string(),
            project: Some(project.clone()),
            ..Default::default()
        })
        .await?;
    cleanup.webhook(&created.webhook.key);

    // Scoped hooks appear in the project listing, not the global one.
    let global = client.webhooks().list(None).await?;
    assert!(global.webhooks.iter().all(|w| w.key != created.webhook.key));
    let scoped = client.webhooks().list(Some(&project)).await?;
    assert!(scoped.webhooks.iter().any(|w| w.key == created.webhook.key));

    cleanup.run(&client).await;
    Ok(())
}
