//! Integration tests for the registry public API against a mocked GitHub API.

use std::io::Write;

use cairn::config::Settings;
use cairn::registry::{ModuleCoordinate, ModuleRegistry};
use cairn::CairnError;
use httpmock::prelude::*;

/// Registry in shared-repository mode with an explicit repository name,
/// so candidate discovery needs no repository listing.
fn monorepo_registry(server: &MockServer) -> ModuleRegistry {
    ModuleRegistry::new(Settings {
        github_api_base: server.base_url(),
        monorepo_owner: Some("acme".to_string()),
        monorepo_name: Some("terraform-aws-modules".to_string()),
        ..Default::default()
    })
}

/// Registry in shared-repository mode with convention-based discovery.
fn discovery_registry(server: &MockServer) -> ModuleRegistry {
    ModuleRegistry::new(Settings {
        github_api_base: server.base_url(),
        monorepo_owner: Some("acme".to_string()),
        ..Default::default()
    })
}

/// Registry in single-repo mode (no owning account).
fn standard_registry(server: &MockServer) -> ModuleRegistry {
    ModuleRegistry::new(Settings {
        github_api_base: server.base_url(),
        ..Default::default()
    })
}

fn tree_json(entries: &[(&str, &str)]) -> serde_json::Value {
    serde_json::json!({
        "tree": entries
            .iter()
            .map(|(path, kind)| serde_json::json!({"path": path, "type": kind}))
            .collect::<Vec<_>>()
    })
}

fn mock_repo_info<'a>(server: &'a MockServer, repo: &str) -> httpmock::Mock<'a> {
    let path = format!("/repos/acme/{}", repo);
    server.mock(move |when, then| {
        when.method(GET).path(path.clone());
        then.status(200)
            .json_body(serde_json::json!({"name": repo, "default_branch": "main"}));
    })
}

fn mock_tree<'a>(
    server: &'a MockServer,
    repo: &str,
    entries: &[(&str, &str)],
) -> httpmock::Mock<'a> {
    let path = format!("/repos/acme/{}/git/trees/main", repo);
    let body = tree_json(entries);
    server.mock(move |when, then| {
        when.method(GET).path(path.clone());
        then.status(200).json_body(body.clone());
    })
}

fn mock_tags<'a>(server: &'a MockServer, repo: &str, tags: &[&str]) -> httpmock::Mock<'a> {
    let path = format!("/repos/acme/{}/tags", repo);
    let body = serde_json::json!(tags
        .iter()
        .map(|t| serde_json::json!({"name": t}))
        .collect::<Vec<_>>());
    server.mock(move |when, then| {
        when.method(GET).path(path.clone());
        then.status(200).json_body(body.clone());
    })
}

fn snapshot_zip(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut zip = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in entries {
        if name.ends_with('/') {
            zip.add_directory(name.trim_end_matches('/'), options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
    }
    zip.finish().unwrap().into_inner()
}

// --- Location resolution ---

#[test]
fn resolve_finds_module_in_shared_repository() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[
            ("modules", "tree"),
            ("modules/net", "tree"),
            ("modules/net/vpc", "tree"),
            ("modules/net/vpc/main.tf", "blob"),
        ],
    );

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");

    let location = registry.resolve(&coord).unwrap().unwrap();
    assert_eq!(location.repo, "terraform-aws-modules");
    assert_eq!(location.path, "net/vpc");
}

#[test]
fn second_resolution_within_ttl_makes_no_remote_calls() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    let tree = mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");

    let first = registry.resolve(&coord).unwrap().unwrap();
    tree.assert_calls(1);

    let second = registry.resolve(&coord).unwrap().unwrap();
    assert_eq!(first, second);
    tree.assert_calls(1);
}

#[test]
fn negative_resolution_is_cached() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    let tree = mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "no_such_module", "aws");

    assert!(registry.resolve(&coord).unwrap().is_none());
    tree.assert_calls(1);

    // The negative answer is served from the flat cache.
    assert!(registry.resolve(&coord).unwrap().is_none());
    tree.assert_calls(1);
}

#[test]
fn clear_cache_forces_a_fresh_scan() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    let tree = mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");

    registry.resolve(&coord).unwrap().unwrap();
    tree.assert_calls(1);

    registry.clear_cache();

    registry.resolve(&coord).unwrap().unwrap();
    tree.assert_calls(2);
}

#[test]
fn resolve_probes_conventional_names_in_single_repo_mode() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/jane/vpc");
        then.status(404);
    });
    server.mock(|when, then| {
        when.method(GET).path("/repos/jane/terraform-aws-vpc");
        then.status(200).json_body(serde_json::json!({"name": "terraform-aws-vpc"}));
    });

    let registry = standard_registry(&server);
    let coord = ModuleCoordinate::new("jane", "vpc", "aws");

    let location = registry.resolve(&coord).unwrap().unwrap();
    assert_eq!(location.repo, "terraform-aws-vpc");
    assert_eq!(location.path, "");
}

#[test]
fn resolve_prefers_direct_repo_name_over_convention() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repos/jane/vpc");
        then.status(200).json_body(serde_json::json!({"name": "vpc"}));
    });

    let registry = standard_registry(&server);
    let coord = ModuleCoordinate::new("jane", "vpc", "aws");

    let location = registry.resolve(&coord).unwrap().unwrap();
    assert_eq!(location.repo, "vpc");
}

// --- Scanning and the structured cache ---

#[test]
fn scan_builds_records_with_derived_hierarchy() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[
            ("modules/net/vpc/main.tf", "blob"),
            ("modules/security/firewall/waf/main.tf", "blob"),
        ],
    );
    mock_tags(&server, "terraform-aws-modules", &["v1.0.0"]);

    let registry = monorepo_registry(&server);
    let records = registry.modules_for_provider("aws", false).unwrap();

    assert_eq!(records.len(), 2);

    // Two segments after the prefix: parent falls back to the sentinel.
    let vpc = &records[0];
    assert_eq!(vpc.name, "net_vpc");
    assert_eq!(vpc.group_slug, "net");
    assert_eq!(vpc.parent_slug, "general");
    assert_eq!(vpc.repo_name, "terraform-aws-modules");
    assert_eq!(vpc.path, "net/vpc");
    assert_eq!(vpc.versions, vec!["1.0.0"]);

    let waf = &records[1];
    assert_eq!(waf.name, "security_firewall_waf");
    assert_eq!(waf.group_slug, "security");
    assert_eq!(waf.parent_slug, "firewall");
}

#[test]
fn scan_excludes_scaffolding_directories() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[
            ("modules/net/vpc/main.tf", "blob"),
            ("modules/net/vpc/examples/basic/main.tf", "blob"),
            ("modules/tests/harness/main.tf", "blob"),
            ("modules/fixtures/sample/main.tf", "blob"),
        ],
    );
    mock_tags(&server, "terraform-aws-modules", &[]);

    let registry = monorepo_registry(&server);
    let records = registry.modules_for_provider("aws", false).unwrap();

    let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["net_vpc"]);
}

#[test]
fn scan_with_zero_module_directories_yields_zero_records() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    let tree = mock_tree(
        &server,
        "terraform-aws-modules",
        &[("README.md", "blob"), ("environments/prod/main.tf", "blob")],
    );
    mock_tags(&server, "terraform-aws-modules", &[]);

    let registry = monorepo_registry(&server);
    assert!(registry.modules_for_provider("aws", false).unwrap().is_empty());

    // The empty result still marks the provider as scanned.
    assert!(registry.modules_for_provider("aws", false).unwrap().is_empty());
    tree.assert_calls(1);
}

#[test]
fn scan_fetches_tags_once_per_repository() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[
            ("modules/net/vpc/main.tf", "blob"),
            ("modules/storage/s3/main.tf", "blob"),
            ("modules/compute/asg/main.tf", "blob"),
        ],
    );
    let tags = mock_tags(&server, "terraform-aws-modules", &["v1.0.0"]);

    let registry = monorepo_registry(&server);
    let records = registry.modules_for_provider("aws", false).unwrap();

    assert_eq!(records.len(), 3);
    tags.assert_calls(1);
}

#[test]
fn scan_skips_failing_repository_and_continues() {
    let server = MockServer::start();

    // Discovery finds two candidate repositories.
    server.mock(|when, then| {
        when.method(GET)
            .path("/orgs/acme/repos")
            .query_param("page", "1");
        then.status(200).json_body(serde_json::json!([
            {"name": "broken-terraform-aws-modules"},
            {"name": "terraform-aws-modules"}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/orgs/acme/repos")
            .query_param("page", "2");
        then.status(200).json_body(serde_json::json!([]));
    });

    // The first repository fails its metadata fetch.
    server.mock(|when, then| {
        when.method(GET).path("/repos/acme/broken-terraform-aws-modules");
        then.status(500);
    });
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );
    mock_tags(&server, "terraform-aws-modules", &[]);

    let registry = discovery_registry(&server);
    let records = registry.modules_for_provider("aws", false).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].repo_name, "terraform-aws-modules");
}

#[test]
fn scan_enrichment_extracts_descriptions() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[
            ("modules/net/vpc/main.tf", "blob"),
            ("modules/storage/s3/main.tf", "blob"),
        ],
    );
    mock_tags(&server, "terraform-aws-modules", &[]);

    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/terraform-aws-modules/contents/modules/net/vpc/README.md");
        then.status(200)
            .body("# VPC\n\nProvisions an opinionated VPC.\n");
    });
    // The other module has no README.
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/terraform-aws-modules/contents/modules/storage/s3/README.md");
        then.status(404);
    });

    let registry = monorepo_registry(&server);
    let records = registry.modules_for_provider("aws", true).unwrap();

    let vpc = records.iter().find(|r| r.name == "net_vpc").unwrap();
    assert_eq!(vpc.description, "Provisions an opinionated VPC.");
    assert!(vpc.readme.as_deref().unwrap().contains("# VPC"));

    let s3 = records.iter().find(|r| r.name == "storage_s3").unwrap();
    assert_eq!(s3.description, "Module storage_s3 (aws)");
    assert!(s3.readme.is_none());
}

#[test]
fn concurrent_scans_last_write_wins() {
    // Known race, accepted by design: two scans of the same provider may
    // interleave and each module entry keeps whichever scan wrote last.
    // Both scans observe identical upstream data, so the merged result must
    // equal a single scan's result.
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[
            ("modules/net/vpc/main.tf", "blob"),
            ("modules/storage/s3/main.tf", "blob"),
        ],
    );
    mock_tags(&server, "terraform-aws-modules", &["v1.0.0"]);

    let registry = monorepo_registry(&server);

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let registry = registry.clone();
            std::thread::spawn(move || registry.modules_for_provider("aws", false).unwrap())
        })
        .collect();

    for handle in handles {
        // A thread may observe the other scan's partially filled subtree,
        // so individual results can be short; they never exceed the set.
        let records = handle.join().unwrap();
        assert!(records.len() <= 2);
    }

    let merged = registry.modules_for_provider("aws", false).unwrap();
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].name, "net_vpc");
    assert_eq!(merged[1].name, "storage_s3");
}

// --- Provider discovery ---

#[test]
fn providers_discovered_from_repository_names() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/orgs/acme/repos")
            .query_param("page", "1");
        then.status(200).json_body(serde_json::json!([
            {"name": "terraform-aws-modules"},
            {"name": "corp-Terraform-GCP-Modules"},
            {"name": "widgets"}
        ]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/orgs/acme/repos")
            .query_param("page", "2");
        then.status(200).json_body(serde_json::json!([]));
    });

    let registry = discovery_registry(&server);
    let providers = registry.providers().unwrap();

    assert_eq!(providers.len(), 2);
    assert_eq!(providers[0].name, "aws");
    assert_eq!(providers[0].repos, vec!["terraform-aws-modules"]);
    assert_eq!(providers[1].name, "gcp");
    assert_eq!(providers[1].repos, vec!["corp-Terraform-GCP-Modules"]);
}

#[test]
fn provider_list_is_cached() {
    let server = MockServer::start();
    let listing = server.mock(|when, then| {
        when.method(GET)
            .path("/orgs/acme/repos")
            .query_param("page", "1");
        then.status(200)
            .json_body(serde_json::json!([{"name": "terraform-aws-modules"}]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/orgs/acme/repos")
            .query_param("page", "2");
        then.status(200).json_body(serde_json::json!([]));
    });

    let registry = discovery_registry(&server);
    registry.providers().unwrap();
    registry.providers().unwrap();
    listing.assert_calls(1);
}

#[test]
fn explicit_monorepo_name_needs_no_discovery() {
    let server = MockServer::start();

    let registry = monorepo_registry(&server);
    let providers = registry.providers().unwrap();

    assert_eq!(providers.len(), 1);
    assert_eq!(providers[0].name, "aws");
    assert_eq!(providers[0].repos, vec!["terraform-aws-modules"]);
}

#[test]
fn single_repo_mode_has_no_providers() {
    let server = MockServer::start();
    let registry = standard_registry(&server);
    assert!(registry.providers().unwrap().is_empty());
}

// --- Versions ---

#[test]
fn versions_strip_exactly_one_leading_v() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );
    mock_tags(
        &server,
        "terraform-aws-modules",
        &["v1.2.0", "1.3.0", "vv1.0"],
    );

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");

    let versions = registry.versions(&coord).unwrap().unwrap();
    // Upstream order preserved, one v stripped per tag.
    assert_eq!(versions, vec!["1.2.0", "1.3.0", "v1.0"]);
}

#[test]
fn versions_served_from_structured_cache_after_scan() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );
    let tags = mock_tags(&server, "terraform-aws-modules", &["v2.1.0"]);

    let registry = monorepo_registry(&server);
    registry.modules_for_provider("aws", false).unwrap();
    tags.assert_calls(1);

    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");
    let versions = registry.versions(&coord).unwrap().unwrap();
    assert_eq!(versions, vec!["2.1.0"]);
    tags.assert_calls(1);
}

#[test]
fn versions_for_unknown_coordinate_are_none() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(&server, "terraform-aws-modules", &[]);

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "ghost", "aws");
    assert!(registry.versions(&coord).unwrap().is_none());
}

// --- Source archives ---

#[test]
fn source_archive_is_scoped_to_the_module() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );

    let snapshot = snapshot_zip(&[
        ("acme-terraform-aws-modules-abc123/", ""),
        ("acme-terraform-aws-modules-abc123/README.md", "top"),
        ("acme-terraform-aws-modules-abc123/modules/net/vpc/main.tf", "resource {}"),
        ("acme-terraform-aws-modules-abc123/modules/net/vpc/outputs.tf", "output {}"),
        ("acme-terraform-aws-modules-abc123/modules/storage/s3/main.tf", "bucket {}"),
    ]);
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/terraform-aws-modules/zipball/v1.0.0");
        then.status(200).body(snapshot);
    });

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");

    let bytes = registry.source_archive(&coord, "1.0.0").unwrap().unwrap();

    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert_eq!(names, vec!["main.tf", "outputs.tf"]);
    for name in &names {
        assert!(!name.contains("abc123"));
        assert!(!name.contains("modules/"));
    }
}

#[test]
fn source_archive_retries_without_v_prefix() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );

    let tagged = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/terraform-aws-modules/zipball/v1.0.0");
        then.status(404);
    });
    let snapshot = snapshot_zip(&[("root-sha/modules/net/vpc/main.tf", "resource {}")]);
    let bare = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/terraform-aws-modules/zipball/1.0.0");
        then.status(200).body(snapshot);
    });

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");

    let bytes = registry.source_archive(&coord, "1.0.0").unwrap().unwrap();
    assert!(!bytes.is_empty());
    tagged.assert_calls(1);
    bare.assert_calls(1);
}

#[test]
fn source_archive_not_found_after_two_failures() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );
    server.mock(|when, then| {
        when.method(GET)
            .path_matches(r"/repos/acme/terraform-aws-modules/zipball/.*");
        then.status(404);
    });

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");

    assert!(registry.source_archive(&coord, "9.9.9").unwrap().is_none());
}

#[test]
fn corrupt_snapshot_is_a_hard_error() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/terraform-aws-modules/zipball/v1.0.0");
        then.status(200).body("definitely not a zip");
    });

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");

    let err = registry.source_archive(&coord, "1.0.0").unwrap_err();
    assert!(matches!(err, CairnError::CorruptArchive { .. }));
}

#[test]
fn empty_module_yields_empty_but_valid_archive() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );

    // The tagged snapshot no longer contains the module directory.
    let snapshot = snapshot_zip(&[("root-sha/README.md", "only this")]);
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/terraform-aws-modules/zipball/v0.1.0");
        then.status(200).body(snapshot);
    });

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");

    let bytes = registry.source_archive(&coord, "0.1.0").unwrap().unwrap();
    let archive = zip::ZipArchive::new(std::io::Cursor::new(bytes)).unwrap();
    assert!(archive.is_empty());
}

// --- Readme, examples, search ---

#[test]
fn readme_served_from_enriched_scan_without_refetch() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );
    mock_tags(&server, "terraform-aws-modules", &[]);
    let readme = server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/terraform-aws-modules/contents/modules/net/vpc/README.md");
        then.status(200).body("# VPC\n\nOpinionated VPC.\n");
    });

    let registry = monorepo_registry(&server);
    registry.modules_for_provider("aws", true).unwrap();
    readme.assert_calls(1);

    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");
    let text = registry.readme(&coord).unwrap().unwrap();
    assert!(text.contains("Opinionated VPC."));
    readme.assert_calls(1);
}

#[test]
fn readme_falls_back_to_lowercase_name() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/terraform-aws-modules/contents/modules/net/vpc/README.md");
        then.status(404);
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/terraform-aws-modules/contents/modules/net/vpc/readme.md");
        then.status(200).body("lowercase readme\n");
    });

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");

    let text = registry.readme(&coord).unwrap().unwrap();
    assert_eq!(text, "lowercase readme\n");
}

#[test]
fn examples_lists_directories_only() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/terraform-aws-modules/contents/modules/net/vpc/examples");
        then.status(200).json_body(serde_json::json!([
            {"name": "basic", "path": "modules/net/vpc/examples/basic", "type": "dir",
             "html_url": "https://github.com/acme/terraform-aws-modules/tree/main/modules/net/vpc/examples/basic"},
            {"name": "README.md", "path": "modules/net/vpc/examples/README.md", "type": "file",
             "html_url": null}
        ]));
    });

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");

    let examples = registry.examples(&coord).unwrap();
    assert_eq!(examples.len(), 1);
    assert_eq!(examples[0].name, "basic");
}

#[test]
fn missing_examples_directory_is_empty_list() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );
    server.mock(|when, then| {
        when.method(GET)
            .path("/repos/acme/terraform-aws-modules/contents/modules/net/vpc/examples");
        then.status(404);
    });

    let registry = monorepo_registry(&server);
    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");
    assert!(registry.examples(&coord).unwrap().is_empty());
}

#[test]
fn search_matches_flattened_names() {
    let server = MockServer::start();
    mock_repo_info(&server, "terraform-aws-modules");
    mock_tree(
        &server,
        "terraform-aws-modules",
        &[
            ("modules/net/vpc/main.tf", "blob"),
            ("modules/storage/s3/main.tf", "blob"),
        ],
    );
    mock_tags(&server, "terraform-aws-modules", &[]);
    server.mock(|when, then| {
        when.method(GET).path_matches(
            r"/repos/acme/terraform-aws-modules/contents/.*",
        );
        then.status(404);
    });

    let registry = monorepo_registry(&server);

    let hits = registry.search("vpc", Some("aws")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "net_vpc");

    // An empty query returns everything.
    let all = registry.search("", Some("aws")).unwrap();
    assert_eq!(all.len(), 2);
}

// --- Warmup ---

#[test]
fn warmup_populates_the_structured_cache() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/orgs/acme");
        then.status(200).json_body(serde_json::json!({"login": "acme"}));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/orgs/acme/repos")
            .query_param("page", "1");
        then.status(200)
            .json_body(serde_json::json!([{"name": "terraform-aws-modules"}]));
    });
    server.mock(|when, then| {
        when.method(GET)
            .path("/orgs/acme/repos")
            .query_param("page", "2");
        then.status(200).json_body(serde_json::json!([]));
    });
    mock_repo_info(&server, "terraform-aws-modules");
    let tree = mock_tree(
        &server,
        "terraform-aws-modules",
        &[("modules/net/vpc/main.tf", "blob")],
    );
    mock_tags(&server, "terraform-aws-modules", &["v1.0.0"]);
    server.mock(|when, then| {
        when.method(GET).path_matches(
            r"/repos/acme/terraform-aws-modules/contents/.*",
        );
        then.status(404);
    });

    let registry = discovery_registry(&server);
    cairn::warmup::spawn(registry.clone()).join().unwrap();

    tree.assert_calls(1);

    // Requests after warmup are served warm.
    let records = registry.modules_for_provider("aws", true).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "net_vpc");
    tree.assert_calls(1);

    let coord = ModuleCoordinate::new("acme", "net_vpc", "aws");
    let location = registry.resolve(&coord).unwrap().unwrap();
    assert_eq!(location.path, "net/vpc");
    tree.assert_calls(1);
}
