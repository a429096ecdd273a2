// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;
use indoc::indoc;

use super::{irsa, mast, *};

fn small_catalog() -> CatalogTable {
    let mut table = CatalogTable::new(vec![
        "designation".to_string(),
        "ra".to_string(),
        "dec".to_string(),
        "w4mpro".to_string(),
    ]);
    for (name, ra, dec, w4) in [
        ("far", 10.0, 10.0, Cell::Float(7.0)),
        ("near", 150.001, 2.0, Cell::Float(5.5)),
        ("nearest", 150.0, 2.0001, Cell::Masked),
    ] {
        table
            .push_row(vec![
                Cell::Text(name.to_string()),
                Cell::Float(ra),
                Cell::Float(dec),
                w4,
            ])
            .unwrap();
    }
    table
}

#[test]
fn cells_are_parsed_from_text() {
    assert_eq!(Cell::parse(""), Cell::Masked);
    assert_eq!(Cell::parse("  "), Cell::Masked);
    assert_eq!(Cell::parse("null"), Cell::Masked);
    assert_eq!(Cell::parse("42"), Cell::Int(42));
    assert_eq!(Cell::parse("-1.5"), Cell::Float(-1.5));
    assert_eq!(
        Cell::parse("J095959.99+021234.5"),
        Cell::Text("J095959.99+021234.5".to_string())
    );
    assert!(Cell::parse("nan").is_masked());
    assert_eq!(Cell::parse("nan").as_f64(), None);
    assert_eq!(Cell::Int(3).as_f64(), Some(3.0));
}

#[test]
fn ragged_rows_are_rejected() {
    let mut table = CatalogTable::new(vec!["a".to_string(), "b".to_string()]);
    let result = table.push_row(vec![Cell::Int(1)]);
    assert!(matches!(
        result,
        Err(QueryError::RaggedRow {
            row: 0,
            got: 1,
            expected: 2
        })
    ));
    assert!(table.is_empty());
}

#[test]
fn columns_are_found_by_name() {
    let table = small_catalog();
    assert_eq!(table.column_index("w4mpro"), Some(3));
    assert_eq!(table.column_index("W4MPRO"), Some(3));
    assert_eq!(table.column_index("w3mpro"), None);
    assert_eq!(
        table.get(1, "designation").unwrap(),
        Some(&Cell::Text("near".to_string()))
    );
    assert_eq!(table.get(10, "designation").unwrap(), None);
    assert!(matches!(
        table.get(0, "nope"),
        Err(QueryError::MissingColumn(c)) if c == "nope"
    ));
}

#[test]
fn irsa_csv_is_parsed() {
    let body = indoc! {"
        designation,ra,dec,w4mpro,w4sigmpro,dist
        J100000.00+020000.0,150.0000001,2.0000002,7.123,,0.52
        J100000.10+020001.0,150.0004,2.0003,8.5,0.31,1.71
    "};
    let table = irsa::parse_csv_table(body, "IRSA").unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.columns(),
        ["designation", "ra", "dec", "w4mpro", "w4sigmpro", "dist"]
    );
    assert_eq!(table.get(0, "w4sigmpro").unwrap(), Some(&Cell::Masked));
    assert_eq!(table.get(1, "w4sigmpro").unwrap(), Some(&Cell::Float(0.31)));
    assert_abs_diff_eq!(
        table.get(0, "dist").unwrap().unwrap().as_f64().unwrap(),
        0.52
    );
}

#[test]
fn irsa_csv_with_no_rows() {
    let table = irsa::parse_csv_table("designation,ra,dec\n", "IRSA").unwrap();
    assert!(table.is_empty());
    assert_eq!(table.columns().len(), 3);
}

#[test]
fn irsa_adql_describes_a_cone() {
    let adql = irsa::cone_search_adql("allwise_p3as_psd", SkyPosition::new(150.0, 2.5), 2.0);
    assert!(adql.contains("FROM allwise_p3as_psd AS t"));
    assert!(adql.contains("POINT('ICRS', 150, 2.5)"));
    // 2 arcmin in degrees.
    assert!(adql.contains("CIRCLE('ICRS', 150, 2.5, 0.03333333333333333)"));
    assert!(adql.contains("ORDER BY dist"));
}

#[test]
fn mast_json_is_parsed() {
    let body = indoc! {r#"
        {
            "status": "COMPLETE",
            "msg": "",
            "fields": [
                {"name": "objid", "type": "int"},
                {"name": "fuv_mag", "type": "float"},
                {"name": "fuv_magerr", "type": "float"},
                {"name": "survey", "type": "string"}
            ],
            "data": [
                {"objid": 6381797498000000001, "fuv_mag": null, "fuv_magerr": null, "survey": "AIS"},
                {"objid": 6381797498000000002, "fuv_mag": 19.25, "fuv_magerr": 0.12, "survey": "MIS"}
            ]
        }
    "#};
    let response: mast::MastResponse = serde_json::from_str(body).unwrap();
    let table = mast::response_to_table(response).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.columns(), ["objid", "fuv_mag", "fuv_magerr", "survey"]);
    assert_eq!(table.get(0, "fuv_mag").unwrap(), Some(&Cell::Masked));
    assert_eq!(table.get(1, "fuv_mag").unwrap(), Some(&Cell::Float(19.25)));
    assert_eq!(
        table.get(1, "objid").unwrap(),
        Some(&Cell::Int(6381797498000000002))
    );
    assert_eq!(
        table.get(1, "survey").unwrap(),
        Some(&Cell::Text("MIS".to_string()))
    );
}

#[test]
fn mast_results_are_ordered_by_distance() {
    let body = indoc! {r#"
        {
            "status": "COMPLETE",
            "msg": "",
            "fields": [
                {"name": "fuv_mag", "type": "float"},
                {"name": "distance", "type": "float"}
            ],
            "data": [
                {"fuv_mag": 21.0, "distance": 0.3},
                {"fuv_mag": 20.0, "distance": null},
                {"fuv_mag": 19.0, "distance": 0.01},
                {"fuv_mag": 18.0, "distance": 0.3}
            ]
        }
    "#};
    let response: mast::MastResponse = serde_json::from_str(body).unwrap();
    let table = mast::response_to_table(response).unwrap();
    let mags: Vec<f64> = table.rows().map(|row| row[0].as_f64().unwrap()).collect();
    // Ties keep the server's order; an unknown distance goes last.
    assert_eq!(mags, [19.0, 21.0, 18.0, 20.0]);
}

#[test]
fn tables_sort_by_numeric_columns() {
    let mut table = CatalogTable::from_csv("id,dist\na,2.5\nb,\nc,0.5\n").unwrap();
    table.sort_by_column("dist").unwrap();
    let ids: Vec<String> = table.rows().map(|row| row[0].to_string()).collect();
    assert_eq!(ids, ["c", "a", "b"]);
    assert!(matches!(
        table.sort_by_column("distance"),
        Err(QueryError::MissingColumn(_))
    ));
}

#[test]
fn preloaded_region_query_sorts_and_adds_dist() {
    let service = PreloadedCatalogs::new().with_table("allwise_p3as_psd", small_catalog());
    let result = service
        .query_region("allwise_p3as_psd", SkyPosition::new(150.0, 2.0), 2.0)
        .unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result.columns().last().map(|s| s.as_str()), Some("dist"));
    assert_eq!(
        result.get(0, "designation").unwrap(),
        Some(&Cell::Text("nearest".to_string()))
    );
    assert_eq!(
        result.get(1, "designation").unwrap(),
        Some(&Cell::Text("near".to_string()))
    );
    // 0.0001 degrees = 0.36 arcsec.
    assert_abs_diff_eq!(
        result.get(0, "dist").unwrap().unwrap().as_f64().unwrap(),
        0.36,
        epsilon = 1e-6
    );
}

#[test]
fn preloaded_object_query() {
    let service = PreloadedCatalogs::new().with_table("Galex", small_catalog());
    let result = service.query_object("Galex", "150.0 2.0").unwrap();
    assert_eq!(result.len(), 2);
    assert!(matches!(
        service.query_object("Galex", "NGC 1300"),
        Err(QueryError::UnresolvedObject(_))
    ));
}

#[test]
fn preloaded_failures() {
    let service = PreloadedCatalogs::new()
        .with_table("Galex", small_catalog())
        .with_unavailable("Galex");
    assert!(matches!(
        service.query_object("Galex", "150.0 2.0"),
        Err(QueryError::Status { status: 503, .. })
    ));
    assert!(matches!(
        service.query_region("allwise_p3as_psd", SkyPosition::new(0.0, 0.0), 2.0),
        Err(QueryError::UnknownCatalog(_))
    ));
}

#[test]
fn preloaded_object_radius() {
    let service = PreloadedCatalogs::new()
        .with_table("Galex", small_catalog())
        .with_object_radius(1e-5);
    let result = service.query_object("Galex", "150.0 2.0").unwrap();
    assert!(result.is_empty());

    let service = service.with_object_radius(0.01);
    assert_eq!(service.query_object("Galex", "150.0 2.0").unwrap().len(), 2);
}
