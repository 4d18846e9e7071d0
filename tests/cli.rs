mod common;

use std::io::Write;
use std::process::{Command, Stdio};

use common::create_workspace;
use stubbles_annotations::config::CONFIG_FILE_NAME;

fn parse_in(dir: &std::path::Path, doc: &str) -> serde_json::Value {
    let mut child = Command::new(env!("CARGO_BIN_EXE_stubbles-annotations"))
        .args(["parse", "--target", "T"])
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to start binary");
    child
        .stdin
        .take()
        .expect("stdin is piped")
        .write_all(doc.as_bytes())
        .expect("failed to write docblock");
    let output = child.wait_with_output().expect("binary did not finish");
    assert!(output.status.success(), "parse failed: {output:?}");
    serde_json::from_slice(&output.stdout).expect("output is JSON")
}

#[test]
fn parse_honours_ignored_tags_of_current_directory() {
    let doc = "/**\n * @covers(Foo)\n * @Inject\n */";

    let plain = create_workspace(&[]);
    let map = parse_in(plain.path(), doc);
    assert_eq!(map["T"]["annotations"].as_array().unwrap().len(), 2);

    let configured = create_workspace(&[(CONFIG_FILE_NAME, "[lexer]\nignored_tags = [\"covers\"]\n")]);
    let map = parse_in(configured.path(), doc);
    let annotations = map["T"]["annotations"].as_array().unwrap();
    assert_eq!(annotations.len(), 1);
    assert_eq!(annotations[0]["name"], "Inject");
}
