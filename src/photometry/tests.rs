// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use indicatif::ProgressBar;

use super::*;
use crate::{
    constants::{ALLWISE_CATALOG, GALEX_CATALOG},
    coord::SkyPosition,
    cosmology::Cosmology,
    query::{CatalogTable, Cell, PreloadedCatalogs, QueryError},
};

fn allwise() -> CatalogTable {
    let mut table = CatalogTable::new(
        ["designation", "ra", "dec", "w4mpro", "w4sigmpro"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    for (name, ra, dec, w4, err) in [
        ("J100000.00+020000.0", 150.0, 2.0, 5.0, Cell::Float(0.1)),
        ("J100400.00+021000.0", 151.0, 2.1666667, 6.5, Cell::Float(0.2)),
        ("J110000.00-050000.0", 165.0, -5.0, 8.0, Cell::Masked),
    ] {
        table
            .push_row(vec![
                Cell::Text(name.to_string()),
                Cell::Float(ra),
                Cell::Float(dec),
                Cell::Float(w4),
                err,
            ])
            .unwrap();
    }
    table
}

/// Four GALEX rows at increasing separations from (200, 30). Only the last has
/// an FUV magnitude.
fn galex() -> CatalogTable {
    let mut table = CatalogTable::new(
        ["ra", "dec", "fuv_mag", "fuv_magerr"]
            .into_iter()
            .map(String::from)
            .collect(),
    );
    for (i, (mag, err)) in [
        (Cell::Masked, Cell::Masked),
        (Cell::Masked, Cell::Masked),
        (Cell::Float(f64::NAN), Cell::Masked),
        (Cell::Float(19.0), Cell::Float(0.12)),
    ]
    .into_iter()
    .enumerate()
    {
        table
            .push_row(vec![
                Cell::Float(200.0),
                Cell::Float(30.0 + 0.001 * (i + 1) as f64),
                mag,
                err,
            ])
            .unwrap();
    }
    // Something else entirely, with a magnitude in the first row.
    table
        .push_row(vec![
            Cell::Float(10.0),
            Cell::Float(-10.0),
            Cell::Float(18.0),
            Cell::Float(0.05),
        ])
        .unwrap();
    table
}

fn service() -> PreloadedCatalogs {
    PreloadedCatalogs::new()
        .with_table(ALLWISE_CATALOG, allwise())
        .with_table(GALEX_CATALOG, galex())
}

#[test]
fn ab_zero_point() {
    assert_relative_eq!(ab_mag_to_flux_density(0.0), 3.630780547701003e-20, max_relative = 1e-12);
    // 3631 Jy is 3.631e-20 erg/s/cm²/Hz.
    assert_relative_eq!(ab_mag_to_flux_density(0.0), 3.631e-20, max_relative = 1e-4);
}

#[test]
fn band_frequencies() {
    assert_relative_eq!(Band::W4.frequency_hz(), 1.3626929909090908e13, max_relative = 1e-12);
    assert_relative_eq!(Band::Fuv.frequency_hz(), 1.9341448903225805e15, max_relative = 1e-12);
    assert_eq!(Band::Fuv.to_string(), "FUV");
}

#[test]
fn w4_conversion() {
    let m = InfraredMatch {
        designation: "J100000.00+020000.0".to_string(),
        w4mpro: 5.0,
        w4sigmpro: Some(0.1),
        dist_arcsec: 0.0,
    };
    let fl = w4_to_flux_luminosity(&m, 0.05, 100.0, &Cosmology::default());
    assert_relative_eq!(fl.flux, 4.351567456969911e-25, max_relative = 1e-10);
    assert_relative_eq!(fl.flux_err, 4.00794174303077e-26, max_relative = 1e-10);
    assert_relative_eq!(fl.lum, 7.095037526142293e42, max_relative = 1e-10);
    assert_relative_eq!(fl.lum_err, 6.534771056771438e41, max_relative = 1e-10);
}

#[test]
fn w4_lookup_and_report() {
    let m = lookup_infrared_magnitude(&service(), SkyPosition::new(150.0001, 2.0)).unwrap();
    assert_eq!(m.designation, "J100000.00+020000.0");
    assert_abs_diff_eq!(m.w4mpro, 5.0);
    assert_eq!(m.w4sigmpro, Some(0.1));
    assert_abs_diff_eq!(m.dist_arcsec, 0.36, epsilon = 1e-3);

    let lines = report_infrared_match(&m);
    assert_eq!(lines.len(), 2);
    assert!(lines[1].starts_with("J100000.00+020000.0"));
    assert!(lines[1].ends_with("arcsec"));
}

#[test]
fn w4_lookup_with_nothing_nearby() {
    let result = lookup_infrared_magnitude(&service(), SkyPosition::new(300.0, 60.0));
    assert!(matches!(result, Err(PhotometryError::NoRows { .. })));
}

#[test]
fn w4_lookup_errors_propagate() {
    let service = service().with_unavailable(ALLWISE_CATALOG);
    let result = infrared_flux_luminosity(
        &service,
        SkyPosition::new(150.0, 2.0),
        100.0,
        &Cosmology::default(),
    );
    assert!(matches!(
        result,
        Err(PhotometryError::Query(QueryError::Status { status: 503, .. }))
    ));
}

#[test]
fn w4_masked_error_defaults() {
    let cosmo = Cosmology::default();
    let position = SkyPosition::new(165.0, -5.0);

    let scalar = infrared_flux_luminosity(&service(), position, 10.0, &cosmo).unwrap();
    assert_relative_eq!(
        scalar.flux_err,
        mag_err_to_flux_err(scalar.flux, 0.05),
        max_relative = 1e-12
    );

    let list = infrared_flux_luminosity_list(
        &service(),
        &[position],
        &[10.0],
        &cosmo,
        &ProgressBar::hidden(),
    )
    .unwrap();
    assert_relative_eq!(
        list[0].flux_err,
        mag_err_to_flux_err(list[0].flux, 0.5),
        max_relative = 1e-12
    );
    assert_relative_eq!(list[0].flux, scalar.flux, max_relative = 1e-12);
}

#[test]
fn w4_list_matches_scalar_calls() {
    let cosmo = Cosmology::default();
    let service = service();
    let positions = [SkyPosition::new(150.0, 2.0), SkyPosition::new(151.0, 2.1666667)];
    let distances = [100.0, 250.0];

    let list = infrared_flux_luminosity_list(
        &service,
        &positions,
        &distances,
        &cosmo,
        &ProgressBar::hidden(),
    )
    .unwrap();
    assert_eq!(list.len(), positions.len());
    for ((position, distance), from_list) in positions.iter().zip(distances).zip(list) {
        let scalar = infrared_flux_luminosity(&service, *position, distance, &cosmo).unwrap();
        assert_eq!(scalar, from_list);
    }
}

#[test]
fn w4_list_length_mismatch() {
    let result = infrared_flux_luminosity_list(
        &service(),
        &[SkyPosition::new(150.0, 2.0)],
        &[100.0, 200.0],
        &Cosmology::default(),
        &ProgressBar::hidden(),
    );
    assert!(matches!(
        result,
        Err(PhotometryError::LengthMismatch {
            expected: 1,
            got: 2,
            ..
        })
    ));
}

#[test]
fn fuv_scalar_lookup_only_scans_three_rows() {
    let position = SkyPosition::new(200.0, 30.0);
    assert_eq!(lookup_uv_magnitude(&service(), position), Magnitude::Missing);
    assert_eq!(
        try_lookup_uv_magnitude(&service(), position, None).unwrap(),
        Magnitude::Measured {
            mag: 19.0,
            err: Some(0.12)
        }
    );
}

#[test]
fn fuv_list_lookup_scans_all_rows() {
    let mags = lookup_uv_magnitudes(
        &service(),
        &[SkyPosition::new(200.0, 30.0), SkyPosition::new(10.0, -10.0)],
        &ProgressBar::hidden(),
    );
    assert_eq!(
        mags,
        vec![
            Magnitude::Measured {
                mag: 19.0,
                err: Some(0.12)
            },
            Magnitude::Measured {
                mag: 18.0,
                err: Some(0.05)
            },
        ]
    );
}

#[test]
fn fuv_lookup_failures_are_missing() {
    let position = SkyPosition::new(10.0, -10.0);
    let down = service().with_unavailable(GALEX_CATALOG);
    assert!(matches!(
        try_lookup_uv_magnitude(&down, position, Some(3)),
        Err(PhotometryError::Query(_))
    ));
    assert_eq!(lookup_uv_magnitude(&down, position), Magnitude::Missing);
    assert_eq!(
        lookup_uv_magnitudes(&down, &[position, position], &ProgressBar::hidden()),
        vec![Magnitude::Missing, Magnitude::Missing]
    );

    // Nothing within the search radius.
    let nowhere = SkyPosition::new(300.0, 60.0);
    assert!(matches!(
        try_lookup_uv_magnitude(&service(), nowhere, Some(3)),
        Err(PhotometryError::NoRows { .. })
    ));
    assert_eq!(lookup_uv_magnitude(&service(), nowhere), Magnitude::Missing);
}

#[test]
fn fuv_conversion() {
    let fl = uv_flux_luminosity(
        Magnitude::Measured {
            mag: 19.0,
            err: Some(0.12),
        },
        50.0,
        &Cosmology::default(),
    );
    assert_relative_eq!(fl.flux, 4.860105762927633e-28, max_relative = 1e-10);
    assert_relative_eq!(fl.flux_err, 5.371587398443978e-29, max_relative = 1e-10);
    assert_relative_eq!(fl.lum, 2.8118081677514512e41, max_relative = 1e-10);
    assert_relative_eq!(fl.lum_err, 3.107725234283229e40, max_relative = 1e-10);
}

#[test]
fn fuv_missing_magnitude_uses_placeholder() {
    let cosmo = Cosmology::default();
    let expected_flux = ab_mag_to_flux_density(999.0 + cosmo.magnitude_correction());
    for distance in [1.0, 100.0, 1e4] {
        let fl = uv_flux_luminosity(Magnitude::Missing, distance, &cosmo);
        assert_eq!(fl.flux, expected_flux);
        assert_eq!(fl.flux_err, 0.0);
        assert_eq!(fl.lum_err, 0.0);
    }
}

#[test]
fn fuv_list_conversion() {
    let cosmo = Cosmology::default();
    let mags = [
        Magnitude::Missing,
        Magnitude::Measured {
            mag: 19.0,
            err: Some(0.12),
        },
    ];
    let list = uv_flux_luminosity_list(&mags, &[10.0, 50.0], &cosmo).unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0].flux_err, 0.0);
    assert_eq!(list[1], uv_flux_luminosity(mags[1], 50.0, &cosmo));

    assert!(matches!(
        uv_flux_luminosity_list(&mags, &[10.0], &cosmo),
        Err(PhotometryError::LengthMismatch { .. })
    ));
}

#[test]
fn fuv_missing_error_is_nan() {
    let fl = uv_flux_luminosity(
        Magnitude::Measured {
            mag: 19.0,
            err: None,
        },
        50.0,
        &Cosmology::default(),
    );
    assert!(fl.flux > 0.0);
    assert!(fl.flux_err.is_nan());
}
