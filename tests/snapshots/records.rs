use insta::assert_snapshot;

use packforge::pipeline::assembler::{RecordAssembler, SequentialIds};
use packforge::pipeline::classifier::CategoryClassifier;
use packforge::pipeline::redactor::ExampleRedactor;
use packforge::pipeline::types::RawEntry;

fn assembler() -> RecordAssembler {
    RecordAssembler::new(CategoryClassifier::default(), ExampleRedactor::default(), 1)
        .with_ids(SequentialIds::new("snap"))
}

#[test]
fn test_prompt_record_json() {
    let entry = RawEntry::role_prompt(
        "English Translator",
        r#"I want you to act as an English translator. My first request is: "Translate this to French.""#,
        "en",
    );
    let record = assembler().assemble_prompt(&entry).into_record().unwrap();

    assert_snapshot!(serde_json::to_string_pretty(&record).unwrap(), @r#"
    {
      "id": "snap-0",
      "type": "prompt",
      "title": "English Translator",
      "content": "I want you to act as an English translator. My first request is: {{input}}.",
      "group": "Academic",
      "description": "English Translator - AI Assistant Role",
      "tags": [
        "en",
        "roleplay",
        "academic"
      ],
      "isFavorite": false,
      "createdAt": 1,
      "updatedAt": 1,
      "source": "official"
    }
    "#);
}

#[test]
fn test_command_records_listing() {
    let page = "# tar\n\n> Archiving utility.\n> More information: <https://www.gnu.org/software/tar>.\n\n- Create an archive from files:\n\n`tar cf {target.tar} {file1 file2}`\n\n- Extract an archive:\n\n`tar xf ${source}`\n";
    let entry = RawEntry::command_page("tar", page, "en", "common");
    let extraction = assembler().assemble_commands(&entry, "Common Tools");

    let listing = extraction
        .records
        .iter()
        .map(|r| format!("{} | {} | {} | {}", r.id, r.content, r.description, r.tags.join(",")))
        .collect::<Vec<_>>()
        .join("\n");

    assert_snapshot!(listing, @r"
    tldr-en-common-tar-0 | tar cf {target.tar} {file1 file2} | tar: Archiving utility. (Create an archive from files) | common,tar,tldr,en
    tldr-en-common-tar-1 | tar xf ${source} | tar: Archiving utility. (Extract an archive) | common,tar,tldr,en
    ");
}
