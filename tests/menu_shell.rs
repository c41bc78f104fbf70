mod common;

use common::{client_for, database, database_path, query_path, results, API_KEY, DATABASE_ID};
use crossterm::event::KeyCode;
use jobline::config::NotionProfile;
use jobline::tui::io::{MockEventStream, MockRenderStream, RenderCommand};
use jobline::AppController;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn run_test_entry_should_page_demo_output_into_the_viewport() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(query_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(results(&["row-a"], None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(database_path()))
        .respond_with(ResponseTemplate::new(200).set_body_json(database(&["Applied"])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("schema.json");
    let profile = NotionProfile {
        name: "default".to_string(),
        api_url: format!("{}/v1", server.uri()),
        api_key: API_KEY.to_string(),
        notion_version: "2022-06-28".to_string(),
        database_id: DATABASE_ID.to_string(),
        schema_path: schema_path.clone(),
    };

    // A tall viewport keeps the whole output on one page, so the only waits
    // are the return prompt and the quit key.
    let mut app = AppController::with_io_streams(
        profile,
        client_for(&server),
        MockEventStream::keys([KeyCode::Enter, KeyCode::Char(' '), KeyCode::Char('q')]),
        MockRenderStream::with_size((200, 500)),
    );
    app.run().await.unwrap();

    let render = app.render_stream();
    let rows = render.drawn_rows();
    assert!(rows
        .iter()
        .any(|(row, text)| *row == 0 && text == "Running test function..."));
    let text = render.written_text();
    assert!(text.contains("Running test function..."));
    assert!(text.contains("\"row-a\""));
    assert!(text.contains("Database schema saved to"));
    assert!(text.contains("Press any key to return to the menu."));
    assert!(render.has_command(&RenderCommand::EnableRawMode));
    assert!(!render.is_raw_mode());
    assert!(schema_path.exists());
    assert_eq!(app.event_stream().remaining(), 0);
}
