//
//  sonarqube-client
//  tests/quality_gates.rs
//

//! Live tests for quality gate administration.

mod common;

use anyhow::Result;
use sonarqube_client::api::qualitygates::GateConditionOption;

use common::{unique_name, Cleanup};

fn gate_id(gate: &sonarqube_client::api::qualitygates::QualityGate) -> String {
    // Servers answer with a numeric id (pre-9.x) or a uuid string.
    match &gate.id {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[tokio::test]
async fn gate_with_conditions() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };
    let mut cleanup = Cleanup::new();

    let name = unique_name("gate");
    let gate = client.quality_gates().create(&name).await?;
    let id = gate_id(&gate);
    cleanup.gate(&id);
    assert_eq!(gate.name, name);

    let condition = client
        .quality_gates()
        .create_condition(
            &id,
            &GateConditionOption {
                metric: "coverage".to_string(),
                op: "LT".to_string(),
                error: "80".to_string(),
            },
        )
        .await?;
    assert_eq!(condition.metric, "coverage");

    let shown = client.quality_gates().show(&id).await?;
    assert!(shown.conditions.iter().any(|c| c.metric == "coverage"));

    let listed = client.quality_gates().list().await?;
    assert!(listed.qualitygates.iter().any(|g| g.name == name));

    cleanup.run(&client).await;
    Ok(())
}

#[tokio::test]
async fn gate_project_association() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };
    let mut cleanup = Cleanup::new();

    let name = unique_name("gatesel");
    let gate = client.quality_gates().create(&name).await?;
    let id = gate_id(&gate);
    cleanup.gate(&id);

    let project = unique_name("gateproj");
    client
        .projects()
        .create(&sonarqube_client::api::projects::ProjectsCreateOption {
            project: project.clone(),
            name: project.clone(),
            ..Default::default()
        })
        .await?;
    cleanup.project(&project);

    client.quality_gates().select(&id, &project).await?;
    let associated = client.quality_gates().get_by_project(&project).await?;
    assert_eq!(associated.quality_gate.name, name);

    client.quality_gates().deselect(&project).await?;
    let after = client.quality_gates().get_by_project(&project).await?;
    assert_ne!(after.quality_gate.name, name);

    cleanup.run(&client).await;
    Ok(())
}

#[tokio::test]
async fn gate_copy_keeps_conditions() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };
    let mut cleanup = Cleanup::new();

    let name = unique_name("gatesrc");
    let gate = client.quality_gates().create(&name).await?;
    let id = gate_id(&gate);
    cleanup.gate(&id);

    client
        .quality_gates()
        .create_condition(
            &id,
            &GateConditionOption {
                metric: "duplicated_lines_density".to_string(),
                op: "GT".to_string(),
                error: "3".to_string(),
            },
        )
        .await?;

    let copy_name = unique_name("gatecopy");
    let copy = client.quality_gates().copy(&id, &copy_name).await?;
    let copy_id = gate_id(&copy);
    cleanup.gate(&copy_id);

    let shown = client.quality_gates().show(&copy_id).await?;
    assert!(shown
        .conditions
        .iter()
        .any(|c| c.metric == "duplicated_lines_density"));

    cleanup.run(&client).await;
    Ok(())
}
