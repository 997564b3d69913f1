use semred::annotate::RuleAnnotator;
use semred::config::Config;
use semred::pipeline::Pipeline;
use semred::Error;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn setup(dir: &TempDir, body: &str) -> Config {
    let input = dir.path().join("posts.csv");
    fs::write(&input, body).unwrap();
    Config {
        input,
        output: dir.path().join("posts_preprocessed.csv"),
        ..Config::default()
    }
}

fn numbered_input(rows: usize) -> String {
    let mut body = String::from("id,post,label\n");
    for i in 0..rows {
        body.push_str(&format!("{i},Post number {i} about cats,l{}\n", i % 3));
    }
    body
}

fn read_output(path: &Path) -> Vec<csv::StringRecord> {
    csv::Reader::from_path(path)
        .unwrap()
        .records()
        .map(|r| r.unwrap())
        .collect()
}

fn run(config: &Config) -> semred::pipeline::RunSummary {
    let annotator = RuleAnnotator::new(config).unwrap();
    Pipeline::new(config, &annotator).unwrap().run().unwrap()
}

#[test]
fn test_urls_users_and_punctuation() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir, "post\n\"Check https://example.com now!! @alice\"\n");
    config.keep_punctuation = false;
    run(&config);

    let rows = read_output(&config.output);
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][1], "check <URL> now!! <USER>");
    assert!(!rows[0][2].contains('!'));
    assert!(!rows[0][3].contains('!'));
    assert!(rows[0][2].contains("<URL>"));
    assert!(rows[0][3].contains("<URL>"));
    assert!(rows[0][3].contains("<USER>"));
}

#[test]
fn test_empty_text_gives_empty_fields() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "id,post\n1,\n2,hello\n");
    run(&config);

    let rows = read_output(&config.output);
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[0][2], "");
    assert_eq!(&rows[0][3], "");
    assert_eq!(&rows[0][4], "");
    assert_eq!(&rows[1][2], "hello");
}

#[test]
fn test_short_row_gives_empty_fields() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "id,label,post\n1,x,hello\n2,y\n3,z,bye\n");
    let summary = run(&config);
    assert_eq!(summary.rows, 3);

    let text = fs::read_to_string(&config.output).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[2], "2,y,,,,");

    let rows = read_output(&config.output);
    assert_eq!(&rows[0][3], "hello");
    assert_eq!(&rows[2][3], "bye");
}

#[test]
fn test_thousand_rows_in_two_batches() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir, &numbered_input(1000));
    config.batch_size = 500;
    let summary = run(&config);

    assert_eq!(summary.batches, 2);
    assert_eq!(summary.rows, 1000);

    let text = fs::read_to_string(&config.output).unwrap();
    assert_eq!(text.lines().count(), 1001);
    assert!(text.ends_with('\n'));
    assert!(!text.contains('\r'));

    let rows = read_output(&config.output);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(&row[0], i.to_string());
        assert_eq!(&row[3], format!("post number {i} about cats"));
        assert_eq!(&row[2], format!("l{}", i % 3));
    }
}

#[test]
fn test_single_header_at_top() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir, &numbered_input(25));
    config.batch_size = 4;
    run(&config);

    let text = fs::read_to_string(&config.output).unwrap();
    let header = "id,post,label,text_raw,text_stopword,text_lemma";
    assert_eq!(text.lines().next(), Some(header));
    assert_eq!(text.lines().filter(|l| *l == header).count(), 1);
}

#[test]
fn test_only_stopwords() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "post\nthe a an\n");
    run(&config);

    let rows = read_output(&config.output);
    assert_eq!(&rows[0][2], "");
    assert_eq!(&rows[0][3], "the a an");
}

#[test]
fn test_row_cap_leaves_sample_alone() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir, &numbered_input(1000));
    config.row_cap = Some(10);
    config.sample_rows = 3;

    let annotator = RuleAnnotator::new(&config).unwrap();
    let pipeline = Pipeline::new(&config, &annotator).unwrap();
    let report = pipeline.sample().unwrap();
    let summary = pipeline.run().unwrap();
    let again = pipeline.sample().unwrap();

    assert_eq!(summary.rows, 10);
    assert_eq!(read_output(&config.output).len(), 10);
    assert_eq!(report.rows.len(), 3);
    assert_eq!(report.rows[0].raw, "post number 0 about cats");
    assert_eq!(report.rows, again.rows);
}

#[test]
fn test_sample_does_not_create_output() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, &numbered_input(5));
    let annotator = RuleAnnotator::new(&config).unwrap();
    let report = Pipeline::new(&config, &annotator).unwrap().sample().unwrap();
    assert_eq!(report.rows.len(), 3);
    assert!(!config.output.exists());
}

#[test]
fn test_token_counts_never_grow() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(
        &dir,
        "post\n\"The children were playing, and they stopped.\"\n\"@bob see www.x.io!!\"\n",
    );
    config.keep_punctuation = false;
    run(&config);

    for row in read_output(&config.output) {
        let raw = row[1].split_whitespace().count();
        assert!(row[2].split_whitespace().count() <= raw);
        assert!(row[3].split_whitespace().count() <= raw);
    }
}

#[test]
fn test_multiline_text_is_flattened() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "post,id\n\"line one\r\nline two\",9\n");
    run(&config);

    let rows = read_output(&config.output);
    assert_eq!(&rows[0][2], "line one line two");
    assert_eq!(&rows[0][1], "9");
}

#[test]
fn test_existing_output_is_overwritten() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "post\nhi\n");
    fs::write(&config.output, "old,stuff\n1,2\n3,4\n5,6\n").unwrap();
    run(&config);

    let text = fs::read_to_string(&config.output).unwrap();
    assert_eq!(text.lines().count(), 2);
    assert!(!text.contains("old"));
}

#[test]
fn test_header_only_input() {
    let dir = TempDir::new().unwrap();
    let config = setup(&dir, "id,post\n");
    let summary = run(&config);

    assert_eq!(summary.batches, 0);
    assert_eq!(summary.rows, 0);
    let text = fs::read_to_string(&config.output).unwrap();
    assert_eq!(text, "id,post,text_raw,text_stopword,text_lemma\n");
}

#[test]
fn test_missing_input_creates_no_output() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        input: dir.path().join("absent.csv"),
        output: dir.path().join("out.csv"),
        ..Config::default()
    };
    let annotator = RuleAnnotator::new(&config).unwrap();
    let pipeline = Pipeline::new(&config, &annotator).unwrap();

    assert!(matches!(pipeline.sample(), Err(Error::InputNotFound(_))));
    assert!(matches!(pipeline.run(), Err(Error::InputNotFound(_))));
    assert!(!config.output.exists());
}

#[test]
fn test_missing_column_is_fatal() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir, "id,body\n1,hello\n");
    config.text_column = "post".to_string();
    let annotator = RuleAnnotator::new(&config).unwrap();
    let pipeline = Pipeline::new(&config, &annotator).unwrap();

    let err = pipeline.run().unwrap_err();
    assert!(matches!(err, Error::MissingColumn { ref column, .. } if column == "post"));
    assert!(!config.output.exists());
}

#[test]
fn test_malformed_row_keeps_completed_batches() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir, "id,post\n1,a\n2,b\n3,c\n4,d,extra\n5,e\n");
    config.batch_size = 2;
    let annotator = RuleAnnotator::new(&config).unwrap();
    let err = Pipeline::new(&config, &annotator).unwrap().run().unwrap_err();
    assert!(matches!(err, Error::RowTooLong { line: 5, .. }));

    let rows = read_output(&config.output);
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[1][0], "2");
}

#[test]
fn test_tab_delimited() {
    let dir = TempDir::new().unwrap();
    let mut config = setup(&dir, "post\tid\nGoing home\t1\n");
    config.delimiter = '\t';
    run(&config);

    let text = fs::read_to_string(&config.output).unwrap();
    assert!(text.starts_with("post\tid\ttext_raw\ttext_stopword\ttext_lemma\n"));
    assert!(text.contains("\tgoing home\t"));
}
