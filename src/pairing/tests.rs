use super::*;
use crate::spectrum::SpectrumBuilder;

fn envelope_peaks(mono: f64, charge: u8, intensities: [f64; 3]) -> Vec<(f64, f64)> {
    let spacing = NEUTRON_MASS / f64::from(charge);
    intensities
        .iter()
        .enumerate()
        .map(|(i, &h)| (mono + i as f64 * spacing, h))
        .collect()
}

fn pair_spectrum(mono: f64, charge: u8, light: [f64; 3], heavy: [f64; 3]) -> Spectrum {
    let partner = mono + DEFAULT_LABEL_MASS_DIFF / f64::from(charge);
    let mut builder = SpectrumBuilder::new(1);
    for (mz, h) in envelope_peaks(mono, charge, light)
        .into_iter()
        .chain(envelope_peaks(partner, charge, heavy))
    {
        builder = builder.add_peak(mz, h);
    }
    builder.build()
}

#[test]
fn test_detects_charge_two_pair() {
    let spectrum = pair_spectrum(600.0, 2, [1000.0, 800.0, 400.0], [1000.0, 800.0, 400.0]);
    assert_eq!(
        detect_pair_charge(&spectrum, 0, &PairingParams::default()),
        Some(2)
    );
}

#[test]
fn test_detects_charge_three_pair() {
    let spectrum = pair_spectrum(500.0, 3, [900.0, 1000.0, 500.0], [850.0, 950.0, 520.0]);
    assert_eq!(
        detect_pair_charge(&spectrum, 0, &PairingParams::default()),
        Some(3)
    );
}

#[test]
fn test_dissimilar_envelopes_rejected() {
    let spectrum = pair_spectrum(600.0, 2, [1000.0, 800.0, 400.0], [100.0, 900.0, 50.0]);
    assert_eq!(
        detect_pair_charge(&spectrum, 0, &PairingParams::default()),
        None
    );

    // the same pair passes once the similarity bar is low enough
    let lenient = PairingParams {
        similarity_threshold: 0.2,
        ..PairingParams::default()
    };
    assert_eq!(detect_pair_charge(&spectrum, 0, &lenient), Some(2));
}

#[test]
fn test_incomplete_envelope_rejected() {
    let partner = 600.0 + DEFAULT_LABEL_MASS_DIFF / 2.0;
    let spectrum = SpectrumBuilder::new(1)
        .add_peak(600.0, 1000.0)
        .add_peak(600.0 + NEUTRON_MASS / 2.0, 800.0)
        .add_peak(600.0 + NEUTRON_MASS, 400.0)
        .add_peak(partner, 1000.0)
        .add_peak(partner + NEUTRON_MASS / 2.0, 800.0)
        .build();
    assert_eq!(
        detect_pair_charge(&spectrum, 0, &PairingParams::default()),
        None
    );
}

#[test]
fn test_missing_partner_is_no_pair() {
    // three peaks spaced like a charge-3 envelope but no labeled partner
    let spectrum = SpectrumBuilder::new(1)
        .add_peak(500.00, 100.0)
        .add_peak(500.0335, 100.0)
        .add_peak(500.067, 100.0)
        .build();
    for idx in 0..spectrum.len() {
        assert_eq!(
            detect_pair_charge(&spectrum, idx, &PairingParams::default()),
            None
        );
    }
}

#[test]
fn test_out_of_range_anchor() {
    let spectrum = SpectrumBuilder::new(1).add_peak(100.0, 1.0).build();
    assert_eq!(
        detect_pair_charge(&spectrum, 5, &PairingParams::default()),
        None
    );
}

#[test]
fn test_isotope_envelope() {
    let spectrum = pair_spectrum(600.0, 2, [10.0, 20.0, 30.0], [1.0, 2.0, 3.0]);
    let envelope = isotope_envelope(&spectrum, 600.0, 2, Tolerance::Ppm(5.0)).unwrap();
    assert_eq!(envelope, [10.0, 20.0, 30.0]);
    assert!(isotope_envelope(&spectrum, 600.0, 3, Tolerance::Ppm(5.0)).is_none());
}

#[test]
fn test_distance_functions() {
    let a = [3.0, 4.0, 0.0];
    let b = [0.0, 0.0, 0.0];
    assert!((squared_norm(&a) - 25.0).abs() < 1e-12);
    assert!((euclidean_distance(&a, &b) - 5.0).abs() < 1e-12);
    assert!((envelope_distance(&a, &b) - 1.0).abs() < 1e-12);
    assert_eq!(envelope_distance(&a, &a), 0.0);
    assert_eq!(envelope_distance(&b, &b), 0.0);
}

#[test]
fn test_max_distance() {
    let params = PairingParams::default();
    assert!((params.max_distance() - 0.25).abs() < 1e-12);
}
