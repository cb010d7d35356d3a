//! Mock upstream for end-to-end runs.
//!
//! One wiremock server plays both GitHub's release API and the static
//! distribution server (under `/static`).

#![allow(dead_code)]

mod fixtures;

pub use fixtures::*;

use docker_offline_updater::core::config::{Endpoints, HttpSettings};
use docker_offline_updater::{Architecture, UpdaterConfig};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const COMPOSE_ASSET_ROUTE: &str = "/compose/v2.32.4/docker-compose-linux-x86_64";

/// Config for an x86_64-only run against `github_api` and `static_base`.
pub fn test_config(output_dir: &Path, github_api: String, static_base: String) -> UpdaterConfig {
    let mut config = UpdaterConfig::new(output_dir);
    config.architectures = vec![Architecture::X86_64];
    config.retry_base_delay = Duration::ZERO;
    config.endpoints = Endpoints {
        github_api,
        static_base,
    };
    config.http = HttpSettings::default();
    config
}

/// Config pointing both upstreams at `server`.
pub fn server_config(output_dir: &Path, server: &MockServer) -> UpdaterConfig {
    test_config(
        output_dir,
        server.uri(),
        format!("{}/static", server.uri()),
    )
}

/// Latest engine 99.99.99 (not published statically), latest Compose 2.32.4.
pub async fn mount_release_api(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/moby/moby/releases/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": "v99.99.99",
            "assets": []
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/docker/compose/releases/latest"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": "v2.32.4",
            "assets": []
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/docker/compose/releases/tags/v2.32.4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tag_name": "v2.32.4",
            "assets": [
                {
                    "name": "docker-compose-linux-x86_64.sha256",
                    "browser_download_url": format!("{}{}.sha256", server.uri(), COMPOSE_ASSET_ROUTE)
                },
                {
                    "name": "docker-compose-linux-x86_64",
                    "browser_download_url": format!("{}{}", server.uri(), COMPOSE_ASSET_ROUTE)
                }
            ]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(COMPOSE_ASSET_ROUTE))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(COMPOSE_BODY))
        .mount(server)
        .await;
}

/// Static x86_64 directory with 27.4.1 as the newest engine and rootless extras.
pub async fn mount_static(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/static/x86_64/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(X86_64_LISTING))
        .mount(server)
        .await;

    for (file, body) in [
        ("docker-27.4.1.tgz", ENGINE_BODY),
        ("docker-rootless-extras-27.4.1.tgz", ROOTLESS_BODY),
    ] {
        let route = format!("/static/x86_64/{}", file);
        Mock::given(method("HEAD"))
            .and(path(route.as_str()))
            .respond_with(ResponseTemplate::new(200))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path(route.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body))
            .mount(server)
            .await;
    }
}

/// Sorted file names in `dir`.
pub fn dir_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
