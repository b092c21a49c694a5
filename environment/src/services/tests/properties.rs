use crate::services::properties::Properties;

#[test]
fn test_render_keeps_insertion_order() {
    let mut properties = Properties::new();
    properties.set("broker.id", 0).set("listeners", "PLAINTEXT://localhost:9092");

    assert_eq!(
        properties.render(),
        "broker.id=0\nlisteners=PLAINTEXT://localhost:9092\n"
    );
}

#[test]
fn test_set_replaces_in_place() {
    let mut properties = Properties::new();
    properties.set("a", 1).set("b", 2).set("a", 3);

    assert_eq!(properties.get("a"), Some("3"));
    assert_eq!(properties.render(), "a=3\nb=2\n");
}

#[test]
fn test_backslashes_escaped() {
    let mut properties = Properties::new();
    properties.set("log.dirs", "C:\\kafka\\logs");

    assert_eq!(properties.render(), "log.dirs=C:\\\\kafka\\\\logs\n");
}

#[tokio::test]
async fn test_write_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("server.properties");

    let mut properties = Properties::new();
    properties.set("num.partitions", 1);
    properties.write_to(&path).await.unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "num.partitions=1\n");
}
