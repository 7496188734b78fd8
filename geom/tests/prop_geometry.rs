use geom::{floor, Position};
use proptest::prelude::*;

proptest! {
    #[test]
    fn prop_floor_matches_f64_floor(x in -1.0e6f64..1.0e6) {
        prop_assert_eq!(f64::from(floor(x)), x.floor());
    }

    #[test]
    fn prop_floor_never_above_input(x in -1.0e6f64..1.0e6) {
        prop_assert!(f64::from(floor(x)) <= x);
        prop_assert!(x - f64::from(floor(x)) < 1.0);
    }

    #[test]
    fn prop_chunk_is_block_shifted(x in -1.0e6f64..1.0e6, z in -1.0e6f64..1.0e6) {
        let pos = Position::new(x, 0.0, z, 0.0, 0.0, "world");
        prop_assert_eq!(pos.chunk_x(), pos.block_x() >> 4);
        prop_assert_eq!(pos.chunk_z(), pos.block_z() >> 4);
    }

    #[test]
    fn prop_distance_sq_nonnegative_and_symmetric(
        ax in -1.0e3f64..1.0e3, ay in -1.0e3f64..1.0e3, az in -1.0e3f64..1.0e3,
        bx in -1.0e3f64..1.0e3, by in -1.0e3f64..1.0e3, bz in -1.0e3f64..1.0e3,
    ) {
        let a = Position::new(ax, ay, az, 0.0, 0.0, "world");
        let b = Position::new(bx, by, bz, 0.0, 0.0, "world");
        let d = a.distance_sq(&b);
        prop_assert!(d >= 0.0);
        prop_assert_eq!(d.to_bits(), b.distance_sq(&a).to_bits());
    }
}
