use selfies::{
    run_and_take_snapshots, ClassInstance, Primitive, SessionOptions, Snapshot, SnapshotError,
    Value,
};
use selfies_test_fixtures::{fixture, node, node_available};
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(60);

fn options(script: &str) -> SessionOptions {
    SessionOptions::new(node()).arg(fixture(script))
}

fn breakpoint(script: &str, line: u32) -> selfies::BreakpointSpec {
    format!("{}:{line}", fixture(script).display())
        .parse()
        .expect("invalid breakpoint")
}

async fn run(options: SessionOptions) -> Result<Vec<Snapshot>, SnapshotError> {
    tokio::time::timeout(TIMEOUT, run_and_take_snapshots(options))
        .await
        .expect("session timed out")
}

fn point(x: f64, y: f64) -> Value {
    Value::Instance(
        ClassInstance::new("Point")
            .with_field("x", Primitive::Number(x))
            .with_field("y", Primitive::Number(y)),
    )
}

fn x_of(value: &Value) -> f64 {
    match value.as_instance().and_then(|i| i.get("x")) {
        Some(Value::Primitive(Primitive::Number(x))) => *x,
        other => panic!("no numeric x in {other:?}"),
    }
}

macro_rules! require_node {
    () => {
        if !node_available() {
            eprintln!("node is not available, skipping");
            return Ok(());
        }
    };
}

#[test_log::test(tokio::test)]
async fn test_snapshot_of_single_instance() -> Result<(), SnapshotError> {
    require_node!();
    let snapshots = run(options("point.js")
        .breakpoint(breakpoint("point.js", 9))
        .include("Point"))
    .await?;

    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0].id().ends_with("point.js:9"), "{}", snapshots[0].id());
    assert_eq!(snapshots[0].values(), [point(1.0, 2.0)]);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_missing_class_gives_empty_snapshot() -> Result<(), SnapshotError> {
    require_node!();
    let snapshots = run(options("point.js")
        .breakpoint(breakpoint("point.js", 9))
        .include("Nope"))
    .await?;

    assert_eq!(snapshots.len(), 1);
    assert!(snapshots[0].values().is_empty());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_accessors_are_not_called() -> Result<(), SnapshotError> {
    require_node!();
    let snapshots = run(options("invoice.js")
        .breakpoint(breakpoint("invoice.js", 12))
        .include("Invoice"))
    .await?;

    assert_eq!(snapshots.len(), 1);
    assert_eq!(
        snapshots[0].values(),
        [Value::Instance(
            ClassInstance::new("Invoice").with_field("amount", Primitive::Number(10.0))
        )]
    );
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_snapshots_follow_pause_order() -> Result<(), SnapshotError> {
    require_node!();
    let snapshots = run(options("shapes.js")
        .breakpoint(breakpoint("shapes.js", 14))
        .breakpoint(breakpoint("shapes.js", 9))
        .include("Point"))
    .await?;

    assert_eq!(snapshots.len(), 2);
    assert!(snapshots[0].id().ends_with("shapes.js:9"), "{}", snapshots[0].id());
    assert!(snapshots[1].id().ends_with("shapes.js:14"), "{}", snapshots[1].id());

    assert_eq!(snapshots[0].values(), [point(1.0, 2.0)]);
    let mut xs: Vec<f64> = snapshots[1].values().iter().map(x_of).collect();
    xs.sort_by(f64::total_cmp);
    assert_eq!(xs, [1.0, 3.0]);
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_no_breakpoints() -> Result<(), SnapshotError> {
    require_node!();
    let snapshots = run(options("busy.js").include("Point")).await?;
    assert!(snapshots.is_empty());
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_missing_executable() {
    let options = SessionOptions::new("/nonexistent/selfies-node").arg(fixture("point.js"));
    let result = run(options).await;
    assert!(matches!(result, Err(SnapshotError::Io(_))), "{result:?}");
}
