use super::*;

fn state_with(cfg: ModelConfig) -> DrawingState {
    let mut state = DrawingState::new(&cfg);
    state.set_size(SurfaceSize::new(100.0, 50.0).unwrap());
    state
}

fn state() -> DrawingState {
    state_with(ModelConfig {
        live_span_limit: None,
        ..ModelConfig::default()
    })
}

fn line(y: f64, xs: impl IntoIterator<Item = u32>) -> Vec<Point> {
    xs.into_iter().map(|x| Point::new(f64::from(x), y)).collect()
}

#[test]
fn samples_before_any_size_are_discarded() {
    let mut s = DrawingState::new(&ModelConfig::default());
    s.extend(&line(10.0, [1, 5, 9]));
    s.end_stroke();
    let out = s.snapshot();
    assert!(out.is_empty());
    assert!(out.full_image().is_none());
}

#[test]
fn open_stroke_is_live_only_until_it_ends() {
    let mut s = state();
    s.extend(&line(10.0, [10, 20, 30]));
    let open = s.snapshot();
    assert!(open.committed.is_none());
    assert!(open.live.is_some());

    s.end_stroke();
    let closed = s.snapshot();
    assert!(closed.live.is_none());
    let img = closed.committed.unwrap();
    let b = img.painted_bounds().unwrap();
    assert!(b.x0 <= 10 && b.x1 >= 30, "{b:?}");
    assert!(b.y0 >= 7 && b.y1 <= 12, "{b:?}");
}

#[test]
fn single_sample_stroke_commits_nothing() {
    let mut s = state();
    s.extend(&line(10.0, [10]));
    assert!(s.snapshot().live.is_none());
    s.end_stroke();
    assert!(s.snapshot().is_empty());
}

#[test]
fn invalid_samples_are_skipped_without_breaking_the_stroke() {
    let mut s = state();
    s.extend(&[
        Point::new(10.0, 10.0),
        Point::new(f64::NAN, 10.0),
        Point::new(500.0, 10.0),
        Point::new(-1.0, 10.0),
        Point::new(40.0, 10.0),
    ]);
    let live = s.snapshot().live.unwrap();
    let els = live.centerline.elements();
    assert_eq!(els.len(), 2, "{els:?}");
}

#[test]
fn color_changes_recolor_the_live_stroke_but_not_committed_ones() {
    let red = Rgba8::rgba(255, 0, 0, 255);
    let blue = Rgba8::rgba(0, 0, 255, 255);

    let mut s = state();
    s.set_color(red);
    s.extend(&line(10.0, [10, 40]));
    s.end_stroke();

    s.extend(&line(30.0, [10, 40]));
    s.set_color(blue);
    let out = s.snapshot();
    assert_eq!(out.live.as_ref().unwrap().color, blue);
    assert_eq!(out.committed.as_ref().unwrap().pixel(25, 10), Some([255, 0, 0, 255]));

    s.end_stroke();
    let img = s.snapshot().committed.unwrap();
    assert_eq!(img.pixel(25, 10), Some([255, 0, 0, 255]));
    assert_eq!(img.pixel(25, 30), Some([0, 0, 255, 255]));
}

#[test]
fn long_strokes_flush_finalized_spans_while_open() {
    let mut s = state_with(ModelConfig {
        live_span_limit: Some(4),
        ..ModelConfig::default()
    });
    s.extend(&line(20.0, (1..=7).map(|i| i * 10)));

    let out = s.snapshot();
    let committed = out.committed.clone().expect("finalized spans flushed");
    let live = out.live.expect("tail stays live");
    assert!(committed.pixel(20, 20).unwrap()[3] > 0);
    assert!(live.centerline.elements().len() < 7);

    s.end_stroke();
    let img = s.snapshot().committed.unwrap();
    for x in [15, 35, 55, 65] {
        assert_eq!(img.pixel(x, 20).unwrap()[3], 255, "x={x}");
    }
}

#[test]
fn reset_returns_to_the_empty_state() {
    let mut s = state();
    s.extend(&line(10.0, [10, 20]));
    s.end_stroke();
    s.extend(&line(30.0, [10, 20]));
    s.reset();
    let out = s.snapshot();
    assert!(out.is_empty());
    assert!(out.full_image().is_none());
    assert_eq!(out.surface, Some(SurfaceSize::new(100.0, 50.0).unwrap()));
}

#[test]
fn oversized_surface_is_rejected_and_previous_size_kept() {
    let mut s = state();
    let before = s.revision();
    s.set_size(SurfaceSize::new(70_000.0, 10.0).unwrap());
    assert_eq!(s.revision(), before);
    assert_eq!(s.snapshot().surface.unwrap().width(), 100.0);
}

#[test]
fn live_outline_is_cached_between_unchanged_snapshots() {
    let mut s = state();
    s.extend(&line(10.0, [10, 20, 30]));
    let a = s.snapshot();
    let b = s.snapshot();
    let (a, b) = (a.live.unwrap(), b.live.unwrap());
    assert!(Arc::ptr_eq(&a.outline, &b.outline));

    s.extend(&line(10.0, [40]));
    let c = s.snapshot().live.unwrap();
    assert!(!Arc::ptr_eq(&a.outline, &c.outline));
}

#[test]
fn full_image_includes_the_live_stroke() {
    let mut s = state();
    s.extend(&line(10.0, [10, 20, 30]));
    let full = s.snapshot().full_image().expect("live drawing counts as a signature");
    assert_eq!((full.width(), full.height()), (100, 50));
    assert!(full.pixel(20, 10).unwrap()[3] > 0);
}

#[test]
fn flushing_translucent_ink_leaves_no_darker_seams() {
    let ink = Rgba8::rgba(0, 0, 0, 128);
    let draw = |limit: Option<usize>| {
        let mut s = state_with(ModelConfig {
            live_span_limit: limit,
            color: ink,
            ..ModelConfig::default()
        });
        for p in line(20.0, (1..=7).map(|i| i * 10)) {
            s.extend(&[p]);
        }
        s.end_stroke();
        s.snapshot().committed.unwrap()
    };

    let (flushed, whole) = (draw(Some(2)), draw(None));
    for x in 12..68 {
        let (a, b) = (flushed.pixel(x, 20).unwrap(), whole.pixel(x, 20).unwrap());
        assert!(a[3].abs_diff(b[3]) <= 1, "x={x}: {a:?} vs {b:?}");
    }
}

#[test]
fn surface_too_large_to_allocate_is_rejected_and_drawing_continues() {
    let mut s = state();
    s.extend(&line(10.0, [10, 40]));
    s.end_stroke();
    let before = s.revision();

    s.set_size(SurfaceSize::new(65_535.0, 65_535.0).unwrap());
    assert_eq!(s.revision(), before);

    s.extend(&line(30.0, [10, 40]));
    s.end_stroke();
    let img = s.snapshot().committed.unwrap();
    assert_eq!((img.width(), img.height()), (100, 50));
    assert_eq!(img.pixel(25, 30), Some([0, 0, 0, 255]));
}
