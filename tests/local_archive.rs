use approx::assert_relative_eq;
use gdal::Dataset;
use std::fs;
use std::path::Path;
use tempfile::{TempDir, tempdir};

use secchi::Error;
use secchi::archive::{CollectionQuery, ImageSource, LocalArchive};
use secchi::config::{Config, Product, TimeStep, TimeWindow};
use secchi::export::write_geotiff;
use secchi::image::Image;
use secchi::pipeline::Pipeline;
use secchi::raster::Raster;
use secchi::region::Region;
use secchi::sat_bands::Satellites;

// 0.04 degree grid over [-84, -83] x [41.5, 42.5]
const GT: [f64; 6] = [-84.0, 0.04, 0.0, 42.5, 0.0, -0.04];

// 0.08 degree grid over the same area
const GT_9KM: [f64; 6] = [-84.0, 0.08, 0.0, 42.5, 0.0, -0.08];

fn write_granule(dir: &Path, date: &str, suite: &str, band: &str, value: f32) {
    let name = format!("AQUA_MODIS.{}.L3m.DAY.{}.{}.4km.tif", date, suite, band);
    write_geotiff(dir.join(name), &Raster::filled(25, 25, GT, value), band).unwrap();
}

fn write_9km_acquisition(dir: &Path, date: &str, chlor_a: f32) {
    for (suite, band, value) in [
        ("CHL", "chlor_a", chlor_a),
        ("RRS", "Rrs_488", 0.02),
        ("RRS", "Rrs_667", 0.01),
    ] {
        let name = format!("AQUA_MODIS.{}.L3m.DAY.{}.{}.9km.tif", date, suite, band);
        write_geotiff(dir.join(name), &Raster::filled(13, 13, GT_9KM, value), band).unwrap();
    }
}

fn archive() -> TempDir {
    let dir = tempdir().unwrap();
    let daily = dir.path().join("2016/06");
    fs::create_dir_all(&daily).unwrap();

    for (date, chlor_a) in [("20160601", 1.0), ("20160602", 3.0)] {
        write_granule(&daily, date, "CHL", "chlor_a", chlor_a);
        write_granule(&daily, date, "RRS", "Rrs_488", 0.02);
        write_granule(&daily, date, "RRS", "Rrs_667", 0.01);
    }

    // Incomplete acquisition
    write_granule(&daily, "20160603", "CHL", "chlor_a", 5.0);
    write_granule(&daily, "20160603", "RRS", "Rrs_488", 0.02);

    fs::write(daily.join("notes.txt"), "not a granule").unwrap();

    dir
}

fn region() -> Region {
    Region::new(&[
        [-83.51, 41.69],
        [-83.29, 41.69],
        [-83.29, 41.91],
        [-83.51, 41.91],
    ])
    .unwrap()
}

fn product(dir: &Path) -> Product {
    Product::new(dir, Satellites::Modis, TimeStep::Daily)
}

#[test]
fn test_query_loads_complete_acquisitions() {
    let dir = archive();
    let archive = LocalArchive::new(product(dir.path())).unwrap();

    assert_eq!(archive.granules().len(), 8);

    let query = CollectionQuery::new(
        TimeWindow::parse("2016-06-01", "2016-06-30").unwrap(),
        region(),
        &["chlor_a", "Rrs_488", "Rrs_667"],
    );
    let collection = archive.query(&query).unwrap();

    let ids: Vec<&str> = collection.iter().map(Image::id).collect();
    assert_eq!(ids, vec!["A2016153", "A2016154"]);

    let image = collection.get("A2016154").unwrap();
    assert_eq!(image.band_names().count(), 3);
    let chl = image.band("chlor_a").unwrap();
    assert!(chl.width() < 25 && chl.height() < 25);
    assert!(chl.data().iter().all(|&v| v == 3.0));
    assert_eq!(image.property("product"), Some("NASA/OCEANDATA/MODIS-Aqua/L3SMI"));
}

#[test]
fn test_query_outside_footprint_is_empty() {
    let dir = archive();
    let archive = LocalArchive::new(product(dir.path())).unwrap();

    let far_away = Region::new(&[[10.0, 10.0], [11.0, 10.0], [11.0, 11.0]]).unwrap();
    let query = CollectionQuery::new(
        TimeWindow::parse("2016-06-01", "2016-06-30").unwrap(),
        far_away,
        &["chlor_a"],
    );

    assert!(archive.query(&query).unwrap().is_empty());
}

#[test]
fn test_single_image_lookup() {
    let dir = archive();
    let archive = LocalArchive::new(product(dir.path())).unwrap();
    let bands = vec!["chlor_a".to_string()];

    let image = archive.image("A2016153", &region(), &bands).unwrap();
    let chl = image.band("chlor_a").unwrap();
    assert!(chl.valid_count() > 0);
    assert!(chl.valid_count() < chl.data().len());

    assert!(matches!(
        archive.image("A2017183", &region(), &bands),
        Err(Error::UnknownImage(_))
    ));
}

#[test]
fn test_missing_archive_directory() {
    let dir = tempdir().unwrap();
    let result = LocalArchive::new(product(&dir.path().join("missing")));
    assert!(matches!(result, Err(Error::MissingArchive(_))));
}

#[test]
fn test_pipeline_writes_series_and_geotiffs() {
    let dir = archive();
    let output = dir.path().join("output");
    let config = Config::new(
        TimeWindow::parse("2016-06-01", "2016-06-30").unwrap(),
        product(dir.path()),
    )
    .with_region(region())
    .with_output_directory(&output);

    let report = Pipeline::from_config(config).unwrap().run().unwrap();

    assert_eq!(report.images, 2);

    let csv = fs::read_to_string(output.join("series/chlor_a_mean.csv")).unwrap();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[1].starts_with("2016-06-01,A2016153,1,"));
    assert!(lines[2].starts_with("2016-06-02,A2016154,3,"));
    assert!(output.join("series/tsi_mean.json").exists());

    for name in [
        "Mean_Chlorophyll-a.tif",
        "Mean_Secchi_Depth.tif",
        "Mean_Trophic_State_(from_index).tif",
    ] {
        let dataset = Dataset::open(output.join("exports").join(name)).unwrap();
        let gt = dataset.geo_transform().unwrap();
        assert_relative_eq!(gt[1], 250.0 / 111_320.0);
        assert_relative_eq!(gt[5], -250.0 / 111_320.0);
    }

    let chlor = &report.exports[0];
    assert!(chlor.valid_pixels > 0);
    let dataset = Dataset::open(&chlor.path).unwrap();
    let band = dataset.rasterband(1).unwrap();
    let (w, h) = dataset.raster_size();
    let buffer = band.read_as::<f32>((0, 0), (w, h), (w, h), None).unwrap();
    let valid: Vec<f32> = buffer.data().iter().copied().filter(|v| !v.is_nan()).collect();
    assert_eq!(valid.len(), chlor.valid_pixels);
    assert!(valid.iter().all(|&v| v == 2.0));
}

#[test]
fn test_mixed_resolutions_read_only_the_product_resolution() {
    let dir = archive();
    let daily = dir.path().join("2016/06");
    write_9km_acquisition(&daily, "20160602", 7.0);
    write_9km_acquisition(&daily, "20160604", 9.0);

    let query = CollectionQuery::new(
        TimeWindow::parse("2016-06-01", "2016-06-30").unwrap(),
        region(),
        &["chlor_a", "Rrs_488", "Rrs_667"],
    );

    let archive_4km = LocalArchive::new(product(dir.path())).unwrap();
    assert_eq!(archive_4km.granules().len(), 8);
    let collection = archive_4km.query(&query).unwrap();
    let ids: Vec<&str> = collection.iter().map(Image::id).collect();
    assert_eq!(ids, vec!["A2016153", "A2016154"]);
    let chl = collection.get("A2016154").unwrap().band("chlor_a").unwrap();
    assert!(chl.data().iter().all(|&v| v == 3.0));

    let archive_9km = LocalArchive::new(product(dir.path()).with_resolution("9km")).unwrap();
    let ids: Vec<String> = archive_9km
        .query(&query)
        .unwrap()
        .iter()
        .map(|image| image.id().to_string())
        .collect();
    assert_eq!(ids, vec!["A2016154", "A2016156"]);
}

#[test]
fn test_pipeline_over_mixed_resolutions() {
    let dir = archive();
    write_9km_acquisition(&dir.path().join("2016/06"), "20160604", 9.0);
    let output = dir.path().join("output");
    let config = Config::new(
        TimeWindow::parse("2016-06-01", "2016-06-30").unwrap(),
        product(dir.path()),
    )
    .with_region(region())
    .with_output_directory(&output);

    let report = Pipeline::from_config(config).unwrap().run().unwrap();

    assert_eq!(report.images, 2);
    assert_eq!(report.exports.len(), 3);
}
