use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gpui_dragvalue::{
    Axis, BandScale, BarDragger, ConstraintRect, ContinuousScale, DragOptions, DragSurface,
    DragTracker, Range, ScreenPoint, ScreenRect, ValueDragger, redistribute_proportional,
    sums_to_one,
};

fn assert_close(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len());
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-6, "{actual:?} != {expected:?}");
    }
}

// Three 60px bands inside a chart whose frame starts at (40, 30) and is
// 200px tall.
fn chart() -> (ScreenRect, BandScale, ContinuousScale) {
    let frame = ScreenRect::from_origin_size(ScreenPoint::new(40.0, 30.0), 180.0, 200.0);
    let x = BandScale::new(3, 0.0, 180.0).unwrap();
    let y = ContinuousScale::linear(Range::unit(), 200.0, 0.0).unwrap();
    (frame, x, y)
}

#[test]
fn proportional_drag_rescales_the_others() {
    let next = redistribute_proportional(&[0.5, 0.3, 0.2], 0, 0.8);
    assert_close(&next, &[0.8, 0.12, 0.08]);
    assert!(sums_to_one(&next));
}

#[test]
fn draining_a_full_bar_spreads_mass_evenly() {
    let next = redistribute_proportional(&[1.0, 0.0, 0.0], 0, 0.4);
    assert_close(&next, &[0.4, 0.3, 0.3]);
}

#[test]
fn bar_chart_in_offset_frame() {
    let surface = DragSurface::new();
    let (frame, x, y) = chart();
    let history = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&history);
    let bars = BarDragger::new(vec![1.0, 0.0, 0.0], x, y)
        .on_change(move |values| sink.borrow_mut().push(values.to_vec()))
        .attach(&surface, frame)
        .unwrap();

    // Bar 0 occupies window x 40..100; value 0.4 sits 120px below the top.
    assert!(surface.pointer_down(ScreenPoint::new(70.0, 60.0)).is_some());
    surface.pointer_move(ScreenPoint::new(70.0, 150.0)).unwrap();
    surface.pointer_up(ScreenPoint::new(70.0, 150.0));

    assert_close(&bars.values(), &[0.4, 0.3, 0.3]);
    assert_eq!(history.borrow().len(), 1);
    assert!(!surface.is_dragging());
}

#[test]
fn constrained_tracker_reports_clamped_position() {
    let ticks = Rc::new(RefCell::new(Vec::new()));
    let ends = Rc::new(RefCell::new(Vec::new()));
    let tick_sink = Rc::clone(&ticks);
    let end_sink = Rc::clone(&ends);
    let mut tracker = DragTracker::new(
        DragOptions::new()
            .constraints(ConstraintRect::none().with_x(10.0, 100.0))
            .on_drag(move |point, _| {
                tick_sink.borrow_mut().push(point);
                Ok(())
            })
            .on_end(move |point, _| end_sink.borrow_mut().push(point)),
    );

    tracker.start(ScreenPoint::new(50.0, 5.0));
    let reported = tracker.drag(ScreenPoint::new(250.0, 5.0)).unwrap();

    assert_eq!(reported, Some(ScreenPoint::new(100.0, 5.0)));
    assert_eq!(ticks.borrow().as_slice(), &[ScreenPoint::new(100.0, 5.0)]);
    let ended = tracker.end(ScreenPoint::new(250.0, 5.0));
    assert_eq!(ended, Some(ScreenPoint::new(100.0, 5.0)));
    assert_eq!(ends.borrow().len(), 1);
}

#[test]
fn second_end_is_ignored() {
    let surface = DragSurface::new();
    let ends = Rc::new(Cell::new(0));
    let sink = Rc::clone(&ends);
    let frame = ScreenRect::from_origin_size(ScreenPoint::default(), 100.0, 100.0);
    let _binding = surface.attach(
        frame,
        frame,
        DragOptions::new().on_end(move |_, _| sink.set(sink.get() + 1)),
    );

    surface.pointer_down(ScreenPoint::new(10.0, 10.0));
    assert!(surface.pointer_up(ScreenPoint::new(20.0, 20.0)).is_some());
    assert!(surface.pointer_up(ScreenPoint::new(20.0, 20.0)).is_none());
    assert_eq!(ends.get(), 1);
}

#[test]
fn dropping_a_handle_mid_gesture_stops_callbacks() {
    let surface = DragSurface::new();
    let (frame, _, y) = chart();
    let changes = Rc::new(Cell::new(0));
    let sink = Rc::clone(&changes);
    let marker = ValueDragger::new(0.5, y)
        .axis(Axis::Y)
        .bounds(Range::unit())
        .on_change(move |_| sink.set(sink.get() + 1))
        .attach(&surface, frame, frame)
        .unwrap();

    surface.pointer_down(ScreenPoint::new(100.0, 130.0));
    surface.pointer_move(ScreenPoint::new(100.0, 80.0)).unwrap();
    assert_eq!(changes.get(), 1);
    assert!((marker.value() - 0.75).abs() < 1e-6);

    drop(marker);
    assert!(!surface.is_dragging());
    assert_eq!(surface.pointer_move(ScreenPoint::new(100.0, 40.0)), Ok(None));
    assert_eq!(changes.get(), 1);
}

#[test]
fn callbacks_may_read_other_handles() {
    let surface = DragSurface::new();
    let (frame, x, y) = chart();
    let marker = Rc::new(
        ValueDragger::new(0.25, y)
            .axis(Axis::Y)
            .attach(&surface, ScreenRect::default(), frame)
            .unwrap(),
    );
    let observed = Rc::new(Cell::new(None));
    let reader = Rc::clone(&marker);
    let sink = Rc::clone(&observed);
    let _bars = BarDragger::new(vec![0.2, 0.3, 0.5], x, y)
        .on_change(move |_| sink.set(Some((reader.value(), reader.is_dragging()))))
        .attach(&surface, frame)
        .unwrap();

    surface.pointer_down(ScreenPoint::new(190.0, 100.0));
    surface.pointer_move(ScreenPoint::new(190.0, 110.0)).unwrap();
    assert_eq!(observed.get(), Some((0.25, false)));
}
