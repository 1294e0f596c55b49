//
//  sonarqube-client
//  tests/common/mod.rs
//

//! Shared plumbing for the live integration tests.
//!
//! The tests in this directory run against a real SonarQube instance and
//! are skipped unless `SONAR_URL` is set (with `SONAR_TOKEN` or
//! `SONAR_USER`/`SONAR_PASSWORD` for an admin account):
//!
//! ```sh
//! SONAR_URL=http://localhost:9000 SONAR_USER=admin SONAR_PASSWORD=admin \
//!     cargo test --test '*' -- --test-threads=1
//! ```
//!
//! Every resource a test creates carries a `sqc-it-` prefixed random name
//! and is registered with [`Cleanup`], which is run at the end of the
//! test. A panicking assertion skips the cleanup pass, so run the suite
//! against a disposable server.

// Each test binary compiles its own copy; not every binary uses every
// helper.
#![allow(dead_code)]

use rand::Rng;
use sonarqube_client::SonarClient;

/// Builds a client from the environment, or `None` to skip the test.
pub fn live_client() -> Option<SonarClient> {
    if std::env::var("SONAR_URL").is_err() {
        eprintln!("SONAR_URL is not set; skipping live test");
        return None;
    }
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    match SonarClient::from_env() {
        Ok(client) => Some(client),
        Err(e) => panic!("SONAR_URL is set but the client cannot be built: {e}"),
    }
}

/// Returns a random, recognizable resource name.
pub fn unique_name(kind: &str) -> String {
    let n: u32 = rand::rng().random();
    format!("sqc-it-{kind}-{n:08x}")
}

/// Records created resources and deletes them in one pass at the end of a
/// test. Deletion failures are reported but do not fail the test: the
/// resource may legitimately be gone already.
#[derive(Default)]
pub struct Cleanup {
    projects: Vec<String>,
    groups: Vec<String>,
    users: Vec<String>,
    gates: Vec<String>,
    webhooks: Vec<String>,
}

impl Cleanup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(&mut self, key: impl Into<String>) {
        self.projects.push(key.into());
    }

    pub fn group(&mut self, name: impl Into<String>) {
        self.groups.push(name.into());
    }

    pub fn user(&mut self, login: impl Into<String>) {
        self.users.push(login.into());
    }

    pub fn gate(&mut self, id: impl Into<String>) {
        self.gates.push(id.into());
    }

    pub fn webhook(&mut self, key: impl Into<String>) {
        self.webhooks.push(key.into());
    }

    pub async fn run(self, client: &SonarClient) {
        for key in &self.webhooks {
            if let Err(e) = client.webhooks().delete(key).await {
                eprintln!("cleanup: webhook {key}: {e}");
            }
        }
        for id in &self.gates {
            if let Err(e) = client.quality_gates().destroy(id).await {
                eprintln!("cleanup: quality gate {id}: {e}");
            }
        }
        for key in &self.projects {
            if let Err(e) = client.projects().delete(key).await {
                eprintln!("cleanup: project {key}: {e}");
            }
        }
        for name in &self.groups {
            let group = sonarqube_client::api::user_groups::GroupRef::by_name(name.clone());
            if let Err(e) = client.user_groups().delete(&group).await {
                eprintln!("cleanup: group {name}: {e}");
            }
        }
        for login in &self.users {
            if let Err(e) = client.users().deactivate(login).await {
                eprintln!("cleanup: user {login}: {e}");
            }
        }
    }
}
