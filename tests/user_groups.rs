//
//  sonarqube-client
//  tests/user_groups.rs
//

//! Live tests for group administration and membership.

mod common;

use anyhow::Result;
use sonarqube_client::api::user_groups::{
    GroupRef, GroupUsersOption, GroupsCreateOption, GroupsSearchOption,
};
use sonarqube_client::api::users::UsersCreateOption;

use common::{unique_name, Cleanup};

#[tokio::test]
async fn group_membership_roundtrip() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };
    let mut cleanup = Cleanup::new();

    let group_name = unique_name("group");
    let created = client
        .user_groups()
        .create(&GroupsCreateOption {
            name: group_name.clone(),
            description: Some("created by the integration suite".to_string()),
        })
        .await?;
    cleanup.group(&group_name);
    assert_eq!(created.group.name, group_name);

    let login = unique_name("user");
    client
        .users()
        .create(&UsersCreateOption {
            login: login.clone(),
            name: login.clone(),
            password: Some("Sqc-It-Password-1".to_string()),
            ..Default::default()
        })
        .await?;
    cleanup.user(&login);

    let group = GroupRef::by_name(group_name.clone());
    client.user_groups().add_user(&group, &login).await?;

    let members = client
        .user_groups()
        .users(&GroupUsersOption {
            group: GroupRef::by_name(group_name.clone()),
            ..Default::default()
        })
        .await?;
    assert!(members.users.iter().any(|u| u.login == login));

    client.user_groups().remove_user(&group, &login).await?;
    let members = client
        .user_groups()
        .users(&GroupUsersOption {
            group: GroupRef::by_name(group_name.clone()),
            ..Default::default()
        })
        .await?;
    assert!(members.users.iter().all(|u| u.login != login));

    cleanup.run(&client).await;
    Ok(())
}

#[tokio::test]
async fn group_search_filters_by_name() -> Result<()> {
    let Some(client) = common::live_client() else {
        return Ok(());
    };
    let mut cleanup = Cleanup::new();

    let group_name = unique_name("search");
    client
        .user_groups()
        .create(&GroupsCreateOption {
            name: group_name.clone(),
            description: None,
        })
        .await?;
    cleanup.group(&group_name);

    let page = client
        .user_groups()
        .search(&GroupsSearchOption {
            q: Some(group_name.clone()),
            ..Default::default()
        })
        .await?;
    assert_eq!(page.groups.len(), 1);
    assert_eq!(page.groups[0].name, group_name);

    cleanup.run(&client).await;
    Ok(())
}
