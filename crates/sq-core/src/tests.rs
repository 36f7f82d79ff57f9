//! Unit tests for sq-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ActionId, PedId, VehicleId};

    #[test]
    fn index_roundtrip() {
        let id = PedId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(PedId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn invalid_sentinels() {
        assert_eq!(PedId::INVALID.0, u32::MAX);
        assert!(!VehicleId::default().is_valid());
        assert!(ActionId(0).is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(PedId(7).to_string(), "PedId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{MapSize, TilePoint, WorldPoint};

    #[test]
    fn tile_world_conversion_is_exact() {
        for &(tx, ty, tz, ox, oy, oz) in &[
            (0, 0, 0, 0, 0, 0),
            (3, 7, 2, 255, 1, 127),
            (12, 0, 5, 128, 128, 64),
        ] {
            let tp = TilePoint::new(tx, ty, tz, ox, oy, oz);
            assert_eq!(tp.to_world().to_tile(), tp);
        }
        let wp = WorldPoint::new(1_000, 513, 300);
        assert_eq!(wp.to_tile().to_world(), wp);
    }

    #[test]
    fn world_of_tile_centre() {
        let wp = TilePoint::tile(2, 1, 1).to_world();
        assert_eq!(wp, WorldPoint::new(2 * 256 + 128, 256 + 128, 128));
    }

    #[test]
    fn map_index_roundtrip() {
        let size = MapSize::new(4, 3, 2);
        assert_eq!(size.tile_count(), 24);
        let idx = size.index_of(3, 2, 1).unwrap();
        assert_eq!(size.coords_of(idx), (3, 2, 1));
        assert!(size.index_of(4, 0, 0).is_none());
        assert!(size.index_of(-1, 0, 0).is_none());
    }

    #[test]
    fn degenerate_map_has_no_tiles() {
        assert_eq!(MapSize::new(0, 5, 5).tile_count(), 0);
    }

    #[test]
    fn clamp_into_bounds() {
        let size = MapSize::new(4, 4, 2);
        let p = TilePoint::new(9, -3, 5, 10, 20, 30).clamped(size);
        assert_eq!((p.tx, p.ty, p.tz), (3, 0, 1));
        assert_eq!((p.ox, p.oy, p.oz), (10, 20, 30));
    }

    #[test]
    fn tile_distance_is_chebyshev() {
        let a = TilePoint::tile(0, 0, 0);
        let b = TilePoint::tile(3, -5, 1);
        assert_eq!(a.tile_distance(&b), 5);
    }
}

#[cfg(test)]
mod dir {
    use crate::{Angle, Dir8, WorldPoint};

    #[test]
    fn bits_are_distinct() {
        let all: u16 = Dir8::ALL.iter().map(|d| d.bit() as u16).sum();
        assert_eq!(all, 0xff);
    }

    #[test]
    fn opposite_and_delta() {
        for d in Dir8::ALL {
            let (dx, dy) = d.delta();
            let (ox, oy) = d.opposite().delta();
            assert_eq!((dx + ox, dy + oy), (0, 0));
            assert_eq!(Dir8::from_delta(dx, dy), Some(d));
        }
        assert_eq!(Dir8::from_delta(0, 0), None);
    }

    #[test]
    fn diagonal_components() {
        assert_eq!(Dir8::SE.components(), Some((Dir8::E, Dir8::S)));
        assert_eq!(Dir8::N.components(), None);
    }

    #[test]
    fn angle_toward_cardinals() {
        let o = WorldPoint::new(0, 0, 0);
        assert_eq!(Angle::toward(o, WorldPoint::new(100, 0, 0)), Angle(0));
        assert_eq!(Angle::toward(o, WorldPoint::new(0, 100, 0)), Angle(64));
        assert_eq!(Angle::toward(o, WorldPoint::new(-100, 0, 0)), Angle(128));
        assert_eq!(Angle::toward(o, WorldPoint::new(0, -100, 0)), Angle(192));
    }

    #[test]
    fn angle_rounds_to_nearest_dir8() {
        assert_eq!(Angle(15).dir8(), Dir8::E);
        assert_eq!(Angle(17).dir8(), Dir8::SE);
        assert_eq!(Angle(250).dir8(), Dir8::E);
        assert_eq!(Dir8::NW.angle(), Angle(160));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn clock_advances() {
        let mut clock = SimClock::new();
        clock.advance(50);
        clock.advance(70);
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.elapsed_ms, 120);
    }

    #[test]
    fn clock_display_breakdown() {
        let mut clock = SimClock::new();
        clock.advance(61_250);
        assert_eq!(clock.elapsed_msm(), (1, 1, 250));
    }

    #[test]
    fn default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_frame_rejected() {
        let cfg = SimConfig { frame_ms: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::{PedId, PedRng};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = PedRng::new(12345, PedId(0));
        let mut r2 = PedRng::new(12345, PedId(0));
        for _ in 0..100 {
            assert_eq!(r1.gen_range(0..1000), r2.gen_range(0..1000));
        }
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = PedRng::new(0, PedId(0));
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }
}
