use proptest::prelude::*;
use segint::batch::intersect_batch;
use segint::codec::{encode_bits, CoordFormat};
use segint::intersect::resolve_collinear;
use segint::{
    Backend, DecimalBackend, DoubleBackend, Intersection, IntersectionKind, Intersector,
    RationalBackend, Segment,
};

fn int_segment() -> impl Strategy<Value = [f64; 4]> {
    prop::array::uniform4(-20i32..=20).prop_map(|c| c.map(f64::from))
}

fn seg(c: [f64; 4]) -> Segment<f64> {
    Segment::from_coords(c[0], c[1], c[2], c[3])
}

fn pair_in<B: Backend>(b: &B, c1: [f64; 4], c2: [f64; 4]) -> Option<Intersection<f64>> {
    let engine = Intersector::exact(b).unwrap();
    let hit = engine.intersect(&seg(c1).lift(b).unwrap(), &seg(c2).lift(b).unwrap());
    hit.map(|i| match i {
        Intersection::TrueCrossing(p) => Intersection::TrueCrossing(p.to_f64()),
        Intersection::PointOverlap(p) => Intersection::PointOverlap(p.to_f64()),
        Intersection::SegmentOverlap(s, e) => Intersection::SegmentOverlap(s.to_f64(), e.to_f64()),
    })
}

proptest! {
    #[test]
    fn exact_intersection_is_symmetric(c1 in int_segment(), c2 in int_segment()) {
        let rb = RationalBackend;
        let engine = Intersector::exact(&rb).unwrap();
        let (a, b) = (seg(c1).lift(&rb).unwrap(), seg(c2).lift(&rb).unwrap());
        let ab = engine.intersect(&a, &b);
        let ba = engine.intersect(&b, &a);
        prop_assert_eq!(ab.as_ref().map(|i| i.kind()), ba.as_ref().map(|i| i.kind()));
        let pts = |i: &Option<Intersection<_>>| {
            i.iter().flat_map(|i| i.points().cloned()).collect::<Vec<_>>()
        };
        prop_assert_eq!(pts(&ab), pts(&ba));
    }

    #[test]
    fn backends_classify_integer_pairs_alike(c1 in int_segment(), c2 in int_segment()) {
        let exact = pair_in(&RationalBackend, c1, c2);
        let kind = exact.as_ref().map(|i| i.kind());
        prop_assert_eq!(pair_in(&DecimalBackend::default(), c1, c2).map(|i| i.kind()), kind);
        let double = pair_in(&DoubleBackend, c1, c2);
        prop_assert_eq!(double.as_ref().map(|i| i.kind()), kind);
        // collinear overlaps never do arithmetic on the boundary points
        if kind != Some(IntersectionKind::TrueCrossing) {
            prop_assert_eq!(double, exact);
        }
    }

    #[test]
    fn bits64_round_trip(bits in any::<u64>()) {
        let text = encode_bits(f64::from_bits(bits));
        prop_assert_eq!(text.len(), 64);
        prop_assert_eq!(CoordFormat::Bits64.decode(&text).unwrap().to_bits(), bits);
    }

    #[test]
    fn bits32_round_trip(bits in any::<u32>()) {
        let v = f32::from_bits(bits);
        prop_assume!(!v.is_nan());
        let text = CoordFormat::Bits32.encode(f64::from(v));
        prop_assert_eq!(CoordFormat::Bits32.decode(&text).unwrap(), f64::from(v));
    }

    #[test]
    fn resolver_is_idempotent(x0 in -20i32..20, len_a in 0i32..10, off in -12i32..12, len_b in 0i32..10) {
        // both on the line y = 2x + 1
        let on_line = |x: i32| [f64::from(x), f64::from(2 * x + 1)];
        let mk = |x: i32, len: i32| {
            let (p, q) = (on_line(x), on_line(x + len));
            seg([p[0], p[1], q[0], q[1]])
        };
        let a = mk(x0, len_a);
        let b = mk(x0 + off, len_b);
        if let Some(hit) = resolve_collinear(&a, &b) {
            let pts: Vec<_> = hit.points().cloned().collect();
            let interval = Segment::new(pts[0].clone(), pts[pts.len() - 1].clone());
            prop_assert_eq!(resolve_collinear(&interval, &interval), Some(hit.clone()));
            prop_assert_eq!(resolve_collinear(&a, &interval), Some(hit.clone()));
            prop_assert_eq!(resolve_collinear(&interval, &b), Some(hit));
        }
    }

    #[test]
    fn batch_matches_scalar_double(cs in prop::collection::vec(int_segment(), 0..25)) {
        let segs: Vec<_> = cs.into_iter().map(seg).collect();
        let engine = Intersector::exact(&DoubleBackend).unwrap();
        let mut scalar = engine.all_pairs(&segs);
        let mut batch = intersect_batch(&segs);
        scalar.sort_by_key(|r| r.segments);
        batch.sort_by_key(|r| r.segments);
        prop_assert_eq!(batch, scalar);
    }
}
