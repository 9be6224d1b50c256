use httpmock::prelude::*;
use nonogram_fetch::{
    LocalStorage, NonogramError, PuzzleEngine, PuzzleFormat, PuzzleId, PuzzleRequest, SourceKind,
    WebpbnSource,
};
use std::time::Duration;
use tempfile::TempDir;

const NON_BODY: &str = "catalogue \"webpbn puzzle #1611\"\ntitle \"Dragonfly\"\nby \"Jan Wolter\"\ncopyright \"(c) Copyright 2005 by Jan Wolter\"\nwidth 5\nheight 5\n\nrows\n1\n3\n5\n3\n1\n\ncolumns\n1\n3\n5\n3\n1\n";

const XML_BODY: &str = r#"<?xml version="1.0"?>
<!DOCTYPE pbn SYSTEM "https://webpbn.com/pbn-0.3.dtd">
<puzzleset>
<puzzle type="grid" defaultcolor="black">
<source>webpbn.com</source>
<id>#1611</id>
<title>Dragonfly</title>
<color name="white" char=".">fff</color>
<color name="black" char="X">000</color>
<clues type="columns"><line><count>1</count></line></clues>
<clues type="rows"><line><count>1</count></line></clues>
</puzzle>
</puzzleset>
"#;

fn request(id: u64, format: PuzzleFormat, include_solution: bool) -> PuzzleRequest {
    PuzzleRequest {
        id: PuzzleId(id),
        source: SourceKind::Webpbn,
        format,
        include_solution,
    }
}

fn engine(server: &MockServer, output_path: &str) -> PuzzleEngine<LocalStorage> {
    PuzzleEngine::new(LocalStorage::new(output_path.to_string()))
        .with_source(WebpbnSource::new(server.base_url(), Duration::from_secs(5)))
}

#[tokio::test]
async fn test_download_non_writes_file() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let referer = format!("{}/export.cgi", server.base_url());
    let export_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/export.cgi/webpbn00001611.non")
            .query_param("go", "1")
            .query_param("id", "1611")
            .query_param("fmt", "ss")
            .query_param_exists("sid")
            .header("referer", referer.as_str());
        then.status(200).body(NON_BODY);
    });

    let artifact = engine(&server, &output_path)
        .download(&request(1611, PuzzleFormat::Non, false))
        .await
        .unwrap();

    export_mock.assert();
    assert_eq!(artifact.file_name, "1611.non");
    let written = std::fs::read(temp_dir.path().join("1611.non")).unwrap();
    assert_eq!(written, NON_BODY.as_bytes());
}

#[tokio::test]
async fn test_xml_with_solution_flag() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let export_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/export.cgi/webpbn00001611.xml")
            .query_param("fmt", "xml")
            .query_param("xml_soln", "on");
        then.status(200)
            .header("Content-Type", "application/xml")
            .body(XML_BODY);
    });

    let data = engine(&server, &output_path)
        .produce(&request(1611, PuzzleFormat::Xml, true))
        .await
        .unwrap();

    export_mock.assert();
    assert_eq!(data, XML_BODY.as_bytes());
}

#[tokio::test]
async fn test_no_such_puzzle_is_invalid_content() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/export.cgi/webpbn99999999.non");
        then.status(200).body("No such puzzle 99999999");
    });

    let result = engine(&server, &output_path)
        .download(&request(99999999, PuzzleFormat::Non, false))
        .await;

    assert!(matches!(result, Err(NonogramError::InvalidContent { .. })));
    assert!(!temp_dir.path().join("99999999.non").exists());
}

#[tokio::test]
async fn test_xml_with_single_clue_group_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let body = XML_BODY.replace(
        "<clues type=\"columns\"><line><count>1</count></line></clues>\n",
        "",
    );

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/export.cgi/webpbn00000042.xml");
        then.status(200).body(&body);
    });

    let result = engine(&server, &output_path)
        .produce(&request(42, PuzzleFormat::Xml, false))
        .await;

    assert!(matches!(result, Err(NonogramError::InvalidContent { .. })));
}

#[tokio::test]
async fn test_http_error_status() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let export_mock = server.mock(|when, then| {
        when.method(GET).path("/export.cgi/webpbn00000007.non");
        then.status(503);
    });

    let result = engine(&server, &output_path)
        .download(&request(7, PuzzleFormat::Non, false))
        .await;

    export_mock.assert();
    match result {
        Err(NonogramError::HttpStatusError { status, .. }) => assert_eq!(status, 503),
        other => panic!("expected HttpStatusError, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let engine = PuzzleEngine::new(LocalStorage::new(output_path))
        .with_source(WebpbnSource::new("http://127.0.0.1:1", Duration::from_secs(2)));

    let result = engine
        .produce(&request(1, PuzzleFormat::Non, false))
        .await;

    assert!(matches!(result, Err(NonogramError::TransportError(_))));
}
