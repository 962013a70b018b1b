use httpmock::prelude::*;
use parking_lot::Mutex;

use packforge::build::BuildEvent;
use packforge::config::SourceFormat;
use packforge::error::ErrorCode;

use super::fixture::{Project, prompt_source};

#[test]
fn missing_tree_is_skipped_and_the_rest_is_built() {
    let project = Project::new();
    project.fixture.write_prompt_csv(&[("Poet", "I want you to act as a poet.")]);
    project.fixture.write_page("tldr/pages/linux/ls.md", "- List:\n\n`ls`\n");

    let report = project.build().unwrap();

    let failed: Vec<_> = report.failures.iter().map(|f| f.source.as_str()).collect();
    assert_eq!(failed, vec!["commands.zh", "zh_local"]);
    assert_eq!(report.failures[0].code, ErrorCode::SourceUnavailable);

    let ids: Vec<_> = report.manifest.packages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["en-linux", "en-roles"]);
}

#[test]
fn malformed_table_is_reported_with_its_code() {
    let project = Project::new();
    project.fixture.create_file("sources/prompts.csv", "title,body\nPoet,Write\n");
    project.fixture.write_prompt_json(&[("诗人", "我希望你充当诗人。")]);

    let report = project.build().unwrap();

    let en = report.failures.iter().find(|f| f.source == "en_local").unwrap();
    assert_eq!(en.code, ErrorCode::SourceMalformed);
    assert!(en.message.contains("missing 'act' column"));
    assert_eq!(report.manifest.packages.len(), 1);
    assert_eq!(report.manifest.packages[0].id, "zh-roles");
}

#[test]
fn empty_platform_directory_writes_nothing() {
    let project = Project::new();
    project.fixture.write_page("tldr/pages/linux/ls.md", "- List:\n\n`ls`\n");
    project.fixture.write_page("tldr/pages/osx/notes.md", "# notes\n\n> Nothing to run.\n");

    let events = Mutex::new(Vec::new());
    let report = project
        .build_observed(&|event: &BuildEvent| events.lock().push(event.clone()))
        .unwrap();

    assert!(report.manifest.packages.iter().all(|p| p.id != "en-osx"));
    assert!(!project.pack_path("packs/en/osx.json").exists());
    assert!(events
        .lock()
        .contains(&BuildEvent::GroupSkipped { id: "en-osx".into() }));
}

#[test]
fn nothing_built_writes_no_manifest() {
    let project = Project::new();
    let err = project.build().unwrap_err();

    assert_eq!(err.code(), ErrorCode::NothingBuilt);
    assert!(!project.root().join("dist/manifest.json").exists());
}

#[test]
fn remote_sources_are_fetched() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/prompts.csv");
        then.status(200)
            .header("content-type", "text/csv")
            .body("act,prompt\nPoet,\"I want you to act as a poet.\"\n");
    });
    server.mock(|when, then| {
        when.method(GET).path("/prompts-zh.json");
        then.status(503);
    });

    let mut project = Project::new();
    project.config.prompts = vec![
        prompt_source("en_remote", &server.url("/prompts.csv"), SourceFormat::Csv, "en", "Remote"),
        prompt_source("zh_remote", &server.url("/prompts-zh.json"), SourceFormat::Json, "zh", "远程"),
    ];
    project.config.commands.clear();

    let report = project.build().unwrap();

    mock.assert();
    assert_eq!(report.manifest.packages.len(), 1);
    assert_eq!(report.manifest.packages[0].name, "Remote");
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].source, "zh_remote");
    assert_eq!(report.failures[0].code, ErrorCode::SourceUnavailable);
}
