use super::*;

fn p(x: f64) -> Point {
    Point::new(x, 0.0)
}

#[test]
fn consecutive_points_coalesce_into_one_run() {
    let q = CommandQueue::new();
    for i in 0..1_000 {
        assert!(q.push_point(p(f64::from(i))));
    }
    assert_eq!(q.pending_kinds(), vec![CommandKind::Points(1_000)]);

    let batch = q.wait_batch().unwrap();
    let Some(Command::Points(run)) = batch.front() else {
        panic!("expected a point run, got {batch:?}");
    };
    let xs: Vec<f64> = run.iter().map(|pt| pt.x).collect();
    assert_eq!(xs, (0..1_000).map(f64::from).collect::<Vec<_>>());
}

#[test]
fn stroke_end_splits_runs_and_keeps_its_position() {
    let q = CommandQueue::new();
    q.push_point(p(1.0));
    q.push_point(p(2.0));
    q.push(Command::EndStroke);
    q.push_point(p(3.0));
    q.push(Command::SetColor(Rgba8::BLACK));
    q.push_point(p(4.0));
    q.push_point(p(5.0));

    assert_eq!(
        q.pending_kinds(),
        vec![
            CommandKind::Points(2),
            CommandKind::EndStroke,
            CommandKind::Points(1),
            CommandKind::SetColor,
            CommandKind::Points(2),
        ]
    );
}

#[test]
fn wait_batch_takes_everything_pending() {
    let q = CommandQueue::new();
    q.push(Command::Reset);
    q.push_point(p(1.0));
    let batch = q.wait_batch().unwrap();
    assert_eq!(batch.len(), 2);
    assert!(q.pending_kinds().is_empty());
}

#[test]
fn closed_queue_drains_then_stops() {
    let q = CommandQueue::new();
    q.push(Command::EndStroke);
    q.close();
    assert!(!q.push(Command::Reset));
    assert!(!q.push_point(p(1.0)));

    assert_eq!(q.wait_batch().unwrap().len(), 1);
    assert!(q.wait_batch().is_none());
}

#[test]
fn waiting_worker_wakes_on_push() {
    let q = Arc::new(CommandQueue::new());
    let worker = {
        let q = Arc::clone(&q);
        std::thread::spawn(move || q.wait_batch().map(|b| b.len()))
    };
    q.push(Command::Reset);
    assert_eq!(worker.join().unwrap(), Some(1));
}
