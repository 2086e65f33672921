//! Curve Properties
//!
//! Sweeps white and black levels (and random parameter sets) and checks the
//! properties every regamma curve must have regardless of the inputs.

use hdrgamma_core::curve::legacy_curve_with_gamma;
use hdrgamma_core::math::pq_eotf;
use hdrgamma_core::{CurveCache, CurveRequest, HdrCurveParams, TransferCurve, hdr_curve};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;

const WHITE_LEVELS: [f64; 11] = [
    80.0, 120.0, 160.0, 200.0, 240.0, 280.0, 320.0, 360.0, 400.0, 440.0, 480.0,
];
const BLACK_LEVELS: [f64; 3] = [0.0, 0.1, 0.5];

fn grid() -> Vec<(f64, f64)> {
    WHITE_LEVELS
        .iter()
        .flat_map(|&w| BLACK_LEVELS.iter().map(move |&b| (w, b)))
        .collect()
}

fn signal(i: usize, len: usize) -> f64 {
    i as f64 / (len - 1) as f64
}

fn assert_well_formed(curve: &TransferCurve, size: usize, context: &str) {
    assert_eq!(curve.len(), size, "{}", context);
    assert_eq!(curve.samples()[0], 0.0, "{}: black maps to zero", context);
    assert!(curve.is_monotonic(), "{}: not monotonic", context);
    for &v in curve.samples() {
        assert!(
            v.is_finite() && (0.0..=1.0).contains(&v),
            "{}: sample {} out of range",
            context,
            v
        );
    }
}

#[test]
fn hdr_grid_is_monotonic() {
    hdrgamma_tests::init_tracing();
    grid().par_iter().for_each(|&(white, black)| {
        let params = HdrCurveParams::new(white).with_black_level(black);
        let curve = hdr_curve(&params).unwrap();
        assert_well_formed(&curve, 4096, &format!("white={} black={}", white, black));
    });
}

#[test]
fn hdr_passes_through_above_white() {
    grid().par_iter().for_each(|&(white, black)| {
        let params = HdrCurveParams::new(white).with_black_level(black);
        let curve = hdr_curve(&params).unwrap();
        let len = curve.len();

        let mut checked = 0;
        for (i, &out) in curve.samples().iter().enumerate() {
            let input = signal(i, len);
            if pq_eotf(input) > white {
                assert_eq!(out, input, "white={} sample {}", white, i);
                checked += 1;
            }
        }
        assert!(checked > 0, "white={}: no samples above SDR white", white);
    });
}

#[test]
fn hdr_darkens_shadows_without_black_lift() {
    WHITE_LEVELS.par_iter().for_each(|&white| {
        let curve = hdr_curve(&HdrCurveParams::new(white)).unwrap();
        let len = curve.len();
        for (i, &out) in curve.samples().iter().enumerate() {
            let input = signal(i, len);
            if pq_eotf(input) < 0.005 * white {
                assert!(
                    out <= input,
                    "white={} sample {}: {} > {}",
                    white,
                    i,
                    out,
                    input
                );
            }
        }
    });
}

#[test]
fn hdr_respects_black_level() {
    grid()
        .into_par_iter()
        .filter(|&(_, black)| black > 0.0)
        .for_each(|(white, black)| {
            let curve = hdr_curve(&HdrCurveParams::new(white).with_black_level(black)).unwrap();
            for &out in curve.samples().iter().filter(|&&v| v > 0.0) {
                assert!(
                    pq_eotf(out) >= black * (1.0 - 1e-6),
                    "white={} black={}: output {} nits is below black",
                    white,
                    black,
                    pq_eotf(out)
                );
            }
        });
}

#[test]
fn hdr_white_point_is_fixed() {
    for white in WHITE_LEVELS {
        let curve = hdr_curve(&HdrCurveParams::new(white)).unwrap();
        let len = curve.len();
        // Last sample at or below SDR white maps to (nearly) itself
        let i = (0..len)
            .rev()
            .find(|&i| pq_eotf(signal(i, len)) <= white)
            .unwrap();
        let input = signal(i, len);
        let out = curve.samples()[i];
        assert!(
            (out - input).abs() < 2e-3,
            "white={}: {} -> {}",
            white,
            input,
            out
        );
    }
}

#[test]
fn random_hdr_params() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x4844_5232);
    let params: Vec<HdrCurveParams> = (0..64)
        .map(|_| {
            let white = rng.gen_range(80.0..1000.0);
            HdrCurveParams::new(white)
                .with_size(rng.gen_range(2..=4096))
                .with_black_level(rng.gen_range(0.0..1.0))
                .with_gamma(rng.gen_range(1.8..2.6))
        })
        .collect();

    params.par_iter().for_each(|p| {
        let curve = hdr_curve(p).unwrap();
        assert_well_formed(&curve, p.size, &format!("{:?}", p));
    });
}

#[test]
fn random_legacy_params() {
    let mut rng = ChaCha8Rng::seed_from_u64(22);
    for _ in 0..32 {
        let size = rng.gen_range(2..=2048);
        let gamma = rng.gen_range(1.8..2.6);
        let curve = legacy_curve_with_gamma(size, gamma).unwrap();
        let context = format!("size={} gamma={}", size, gamma);
        assert_well_formed(&curve, size, &context);
        assert!((curve.samples()[size - 1] - 1.0).abs() < 1e-9, "{}", context);
    }
}

#[test]
fn shared_cache_across_threads() {
    let cache = CurveCache::new();
    let requests: Vec<CurveRequest> = WHITE_LEVELS
        .iter()
        .map(|&w| CurveRequest::HdrAware(HdrCurveParams::new(w)))
        .chain(std::iter::once(CurveRequest::legacy()))
        .collect();

    (0..8).into_par_iter().for_each(|_| {
        for request in &requests {
            let curve = cache.get_or_build(request).unwrap();
            assert_eq!(curve.len(), request.size());
        }
    });
    assert_eq!(cache.len(), requests.len());
}
