use std::cell::Cell;
use std::rc::Rc;

use gpui_dragvalue::redistribute::normalize;
use gpui_dragvalue::{
    ConstraintRect, ContinuousScale, Range, ScreenPoint, ValueDragger, redistribute_proportional,
    sums_to_one,
};
use proptest::prelude::*;
use proptest::sample::Index;

fn distribution() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..10.0, 1..8).prop_filter_map("needs mass", |mut values| {
        normalize(&mut values).then_some(values)
    })
}

proptest! {
    #[test]
    fn clamp_stays_within_bounds(
        a in -500.0f32..500.0,
        b in -500.0f32..500.0,
        x in -1000.0f32..1000.0,
        y in -1000.0f32..1000.0,
    ) {
        let (lo, hi) = (a.min(b), a.max(b));
        let rect = ConstraintRect::none().with_x(lo, hi).with_y(lo, hi);
        let clamped = rect.clamp(ScreenPoint::new(x, y));

        prop_assert!(clamped.x >= lo && clamped.x <= hi);
        prop_assert!(clamped.y >= lo && clamped.y <= hi);
        if (lo..=hi).contains(&x) {
            prop_assert_eq!(clamped.x, x);
        }
    }

    #[test]
    fn unbounded_clamp_is_identity(x in -1e6f32..1e6, y in -1e6f32..1e6) {
        let point = ScreenPoint::new(x, y);
        prop_assert_eq!(ConstraintRect::none().clamp(point), point);
    }

    #[test]
    fn redistribution_sums_to_one(
        values in distribution(),
        index in any::<Index>(),
        new_value in 0.0f64..=1.0,
    ) {
        let index = index.index(values.len());
        let next = redistribute_proportional(&values, index, new_value);
        prop_assert_eq!(next.len(), values.len());
        prop_assert!(sums_to_one(&next), "sum drifted: {:?}", next);
    }

    #[test]
    fn redistribution_is_non_negative(
        values in distribution(),
        index in any::<Index>(),
        new_value in -0.5f64..=1.5,
    ) {
        let index = index.index(values.len());
        let next = redistribute_proportional(&values, index, new_value);
        prop_assert!(next.iter().all(|value| *value >= 0.0), "negative entry: {:?}", next);
    }

    #[test]
    fn repeated_position_reports_once(x in 0.0f32..=100.0) {
        let calls = Rc::new(Cell::new(0u32));
        let sink = Rc::clone(&calls);
        let scale = ContinuousScale::linear(Range::unit(), 0.0, 100.0).unwrap();
        let (mut tracker, value) = ValueDragger::new(0.5, scale)
            .on_change(move |_| sink.set(sink.get() + 1))
            .into_tracker()
            .unwrap();

        tracker.start(ScreenPoint::new(50.0, 0.0));
        tracker.drag(ScreenPoint::new(x, 0.0)).unwrap();
        let after_first = calls.get();
        tracker.drag(ScreenPoint::new(x, 0.0)).unwrap();

        prop_assert!(after_first <= 1);
        prop_assert_eq!(calls.get(), after_first);
        prop_assert_eq!(after_first == 1, x != 50.0);
        prop_assert!((value.get() - f64::from(x) / 100.0).abs() < 1e-9);
    }
}
