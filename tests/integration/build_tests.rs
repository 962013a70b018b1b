use packforge::packs::PackKind;
use packforge::pipeline::cleaner::has_markdown_links;
use packforge::pipeline::types::RecordType;

use super::fixture::{Project, RUN_TIMESTAMP, assert_unique_ids};

fn seeded() -> Project {
    let project = Project::new();
    project.fixture.write_prompt_csv(&[
        (
            "Linux Terminal",
            "Contributed by: @someone\nI want you to act as a linux terminal. My first command is pwd",
        ),
        (
            "Storyteller",
            "Tell a story about [topic]. See [the guide](https://example.com/guide). My first request is \"Tell me about a dragon.\"",
        ),
        ("Spreadsheet", "Act as a text based excel. ${cells:A1}"),
        ("", "no title"),
    ]);
    project.fixture.write_prompt_json(&[
        ("充当翻译", "我希望你充当翻译。我的第一句话是“你好，世界。”"),
        ("空白", "   "),
    ]);
    project.fixture.write_page(
        "tldr/pages/common/tar.md",
        "# tar\n\n> Archiving utility.\n> More information: <https://www.gnu.org/software/tar>.\n\n- [c]reate an archive:\n\n`tar cf {{target.tar}} {{file1 file2}}`\n\n- E[x]tract an archive:\n\n`tar xf {{source.tar}}`\n",
    );
    project.fixture.write_page(
        "tldr/pages/linux/apt.md",
        "# apt\n\n> Package manager.\n\n- Update the package list:\n\n`sudo apt update`\n\n- Dangling action with no command\n",
    );
    project.fixture.write_page(
        "tldr/pages.zh/linux/ls.md",
        "# ls\n\n> 列出目录内容。\n> 更多信息：<https://example.com>.\n\n- 列出文件：\n\n`ls -1`\n",
    );
    project
}

#[test]
fn full_build_writes_every_group() {
    let project = seeded();
    let report = project.build().unwrap();

    let ids: Vec<_> = report.manifest.packages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["en-common", "en-linux", "en-roles", "zh-linux", "zh-roles"]);
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert_eq!(report.manifest.updated_at, RUN_TIMESTAMP);
    assert_eq!(report.manifest, project.read_manifest());
}

#[test]
fn manifest_counts_match_pack_files() {
    let project = seeded();
    let report = project.build().unwrap();

    for entry in &report.manifest.packages {
        let records = project.read_pack(&entry.url);
        assert_eq!(entry.count, records.len(), "count mismatch for {}", entry.id);
        assert!(entry.size_kb > 0.0);
        assert_unique_ids(&records);

        let bytes = std::fs::metadata(project.pack_path(&entry.url)).unwrap().len();
        assert!((entry.size_kb - bytes as f64 / 1024.0).abs() < 0.01);
    }
}

#[test]
fn records_are_clean_and_canonical() {
    let project = seeded();
    let report = project.build().unwrap();

    for entry in &report.manifest.packages {
        for record in project.read_pack(&entry.url) {
            assert!(!record.content.trim().is_empty(), "{} has empty content", record.id);
            assert!(!has_markdown_links(&record.content), "{} keeps a link", record.id);
            assert_eq!(record.created_at, RUN_TIMESTAMP);
            assert_eq!(record.source, "official");
            let expected = match entry.category {
                PackKind::Prompt => RecordType::Prompt,
                PackKind::Command => RecordType::Command,
            };
            assert_eq!(record.record_type, expected);
        }
    }
}

#[test]
fn prompt_records_are_normalized_and_classified() {
    let project = seeded();
    project.build().unwrap();

    let roles = project.read_pack("packs/en/roles.json");
    assert_eq!(roles.len(), 3);

    let terminal = &roles[0];
    assert_eq!(terminal.title, "Linux Terminal");
    assert_eq!(
        terminal.content,
        "I want you to act as a linux terminal. My first command is {{input}}"
    );
    assert_eq!(terminal.group, "Coding");
    assert_eq!(terminal.tags, vec!["en", "roleplay", "coding"]);

    let story = &roles[1];
    assert_eq!(
        story.content,
        "Tell a story about {{topic}}. See the guide. My first request is {{input}}."
    );
    assert_eq!(story.group, "Writing");

    assert_eq!(roles[2].content, "Act as a text based excel. {{cells}}");
    assert_eq!(roles[2].group, "Productivity");

    let zh = project.read_pack("packs/zh/roles.json");
    assert_eq!(zh.len(), 1);
    assert_eq!(zh[0].content, "我希望你充当翻译。我的第一句话是{{input}}。");
    assert_eq!(zh[0].group, "Academic");
}

#[test]
fn command_records_follow_page_layout() {
    let project = seeded();
    let report = project.build().unwrap();

    let tar = project.read_pack("packs/en/common.json");
    assert_eq!(tar.len(), 2);
    assert_eq!(tar[0].id, "tldr-en-common-tar-0");
    assert_eq!(tar[0].content, "tar cf {{target.tar}} {{file1 file2}}");
    assert_eq!(tar[0].group, "Common Tools");

    let apt = project.read_pack("packs/en/linux.json");
    assert_eq!(apt.len(), 1);
    assert_eq!(apt[0].content, "sudo apt update");

    let zh = report
        .manifest
        .packages
        .iter()
        .find(|p| p.id == "zh-linux")
        .unwrap();
    assert_eq!(zh.name, "Linux 运维 (ZH)");
    assert_eq!(zh.description, "Contains 1 zh commands for linux.");

    assert_eq!(report.drops.unpaired_action, 1);
    assert_eq!(report.drops.empty_title, 1);
    assert_eq!(report.drops.empty_body, 1);
}

#[test]
fn rebuild_is_stable() {
    let project = seeded();
    let first = project.build().unwrap();
    let first_linux = project.read_pack("packs/en/linux.json");

    let second = project.build().unwrap();
    assert_eq!(first.manifest.packages, second.manifest.packages);
    assert_eq!(first_linux, project.read_pack("packs/en/linux.json"));
}

#[test]
fn language_filter_limits_build() {
    let mut project = seeded();
    project.config.languages = vec!["zh".to_string()];
    let report = project.build().unwrap();

    let ids: Vec<_> = report.manifest.packages.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec!["zh-linux", "zh-roles"]);
    assert!(!project.pack_path("packs/en/roles.json").exists());
}
