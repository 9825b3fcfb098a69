use std::fs;
use std::io::Write;
use figment::providers::{Format, Toml};
use figment::Figment;
use tempfile::TempDir;

use reelmatch_core::config::{CatalogConfig, Config, ImagesConfig};
use reelmatch_core::types::{CatalogItem, MediaType, Recommendation, Recommendations};
use reelmatch_core::{Catalog, CatalogFilter, Error};

fn sample_catalog() -> Catalog {
    Catalog::from_items(vec![
        CatalogItem::new("Dick Johnson Is Dead", "Documentaries").with_year(2020),
        CatalogItem::new("Blood & Water", "International TV Shows, TV Dramas, TV Mysteries").with_media_type(MediaType::TvShow).with_year(2021),
        CatalogItem::new("Ganglands", "Crime TV Shows, International TV Shows, TV Action & Adventure").with_media_type(MediaType::TvShow).with_year(2021),
        CatalogItem::new("Sankofa", "Dramas, Independent Movies, International Movies").with_year(1993),
        CatalogItem::new("The Starling", "Comedies, Dramas"),
    ])
    .expect("catalog")
}

#[test]
fn load_json_array_with_upstream_columns() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("titles.json");
    fs::write(
        &path,
        r#"[
            {"title": "Midnight Mass", "director": null, "cast": "Kate Siegel", "listed_in": "TV Dramas, TV Horror", "type": "TV Show", "release_year": 2021},
            {"title": "Sankofa", "director": "Haile Gerima", "listed_in": "Dramas", "type": "Movie", "release_year": "1993"}
        ]"#,
    )
    .unwrap();

    let catalog = Catalog::load(&path).expect("load");
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.items()[0].media_type, MediaType::TvShow);
    assert_eq!(catalog.items()[1].release_year, Some(1993));
    assert_eq!(catalog.items()[1].cast, None);
}

#[test]
fn load_json_lines() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("titles.jsonl");
    let mut f = fs::File::create(&path).unwrap();
    writeln!(f, r#"{{"title": "Alpha", "listed_in": "Drama"}}"#).unwrap();
    writeln!(f).unwrap();
    writeln!(f, r#"{{"title": "Beta", "genres": "Drama", "type": "tv"}}"#).unwrap();

    let catalog = Catalog::load(&path).expect("load");
    assert_eq!(catalog.len(), 2);
    assert_eq!(catalog.items()[1].genres.as_deref(), Some("Drama"));
    assert_eq!(catalog.items()[1].media_type, MediaType::TvShow);
}

#[test]
fn malformed_record_reports_its_row() {
    let err = Catalog::parse(r#"[{"title": "ok", "listed_in": "Drama"}, {"listed_in": "Drama"}]"#).unwrap_err();
    assert!(matches!(err, Error::Data { row: 1, .. }), "got {err:?}");
    let err = Catalog::parse(r#"[{"title": "  ", "listed_in": "Drama"}]"#).unwrap_err();
    assert!(matches!(err, Error::Data { row: 0, .. }), "got {err:?}");
}

#[test]
fn position_of_is_case_insensitive_and_first_wins() {
    let catalog = Catalog::from_items(vec![
        CatalogItem::new("Solo", "Dramas").with_year(2018),
        CatalogItem::new("Alpha", "Dramas"),
        CatalogItem::new("SOLO", "Comedies").with_year(2019),
    ])
    .unwrap();
    assert_eq!(catalog.position_of("solo"), Some(0));
    assert_eq!(catalog.position_of("ALPHA"), Some(1));
    assert_eq!(catalog.position_of("Solo "), None);
}

#[test]
fn genre_counts_are_sorted_by_frequency_then_name() {
    let catalog = sample_catalog();
    let top = catalog.top_genres(3);
    assert_eq!(top[0], ("Dramas".to_string(), 2));
    assert_eq!(top[1], ("International TV Shows".to_string(), 2));
    assert_eq!(top[2].1, 1);
    assert_eq!(catalog.genre_counts().len(), 10);
}

#[test]
fn browse_applies_every_filter_dimension() {
    let catalog = sample_catalog();
    assert_eq!(catalog.browse(&CatalogFilter::default()).len(), 5);
    // substring match: "TV Dramas" passes a "Dramas" filter
    assert_eq!(catalog.browse(&CatalogFilter::default().with_genre("Dramas")), vec![1, 3, 4]);
    assert_eq!(catalog.browse(&CatalogFilter::default().with_media_type(MediaType::TvShow)), vec![1, 2]);
    // "The Starling" has no year and so fails any year range
    assert_eq!(catalog.browse(&CatalogFilter::default().with_years(1990, 2020)), vec![0, 3]);
    let filter = CatalogFilter::default().with_genre("Crime").with_genre("Documentaries").with_years(2020, 2021);
    assert_eq!(catalog.browse(&filter), vec![0, 2]);
    assert_eq!(catalog.year_span(), Some((1993, 2021)));
}

#[test]
fn filtering_recommendations_keeps_rank_order() {
    let catalog = sample_catalog();
    let ranked = Recommendations::Ranked(vec![
        Recommendation { row: 4, title: "The Starling".into(), score: 0.5 },
        Recommendation { row: 1, title: "Blood & Water".into(), score: 0.4 },
        Recommendation { row: 3, title: "Sankofa".into(), score: 0.3 },
    ]);
    let filtered = ranked.filtered(&catalog, &CatalogFilter::default().with_genre("Dramas"));
    assert_eq!(filtered.titles(), vec!["The Starling", "Blood & Water", "Sankofa"]);
    let filtered = filtered.filtered(&catalog, &CatalogFilter::default().with_media_type(MediaType::Movie));
    assert_eq!(filtered.titles(), vec!["The Starling", "Sankofa"]);
    assert!(Recommendations::TitleNotFound.filtered(&catalog, &CatalogFilter::default()).is_not_found());
}

#[test]
fn config_sections_fall_back_to_defaults() {
    let config = Config::from_toml_str("[images]\nbase_url = \"https://img.example/w300/\"\n");
    let images: ImagesConfig = config.section("images").expect("images");
    assert_eq!(images.url_for("/abc.jpg"), "https://img.example/w300/abc.jpg");
    let catalog: CatalogConfig = config.section("catalog").expect("catalog");
    assert_eq!(catalog.path, "data/catalog.json");
}

#[test]
fn filtering_drops_rows_the_catalog_does_not_hold() {
    let catalog = sample_catalog();
    let ranked = Recommendations::Ranked(vec![
        Recommendation { row: 99, title: "Gone".into(), score: 0.9 },
        Recommendation { row: 3, title: "Sankofa".into(), score: 0.3 },
    ]);
    assert_eq!(ranked.filtered(&catalog, &CatalogFilter::default().with_genre("Dramas")).titles(), vec!["Sankofa"]);
}

#[test]
fn catalog_path_resolves_against_config_dir() {
    let dir = TempDir::new().expect("tempdir");
    let figment = Figment::new().merge(Toml::string("[catalog]\npath = \"titles.json\"\n"));
    let config = Config::from_figment(figment, dir.path());
    assert_eq!(config.base_dir(), dir.path());

    let catalog: CatalogConfig = config.section("catalog").expect("catalog");
    assert_eq!(config.resolve_path(&catalog.path), dir.path().join("titles.json"));
    let absolute = dir.path().join("elsewhere").join("catalog.json");
    assert_eq!(config.resolve_path(&absolute.to_string_lossy()), absolute);
}

#[test]
fn load_from_reads_config_file_in_dir() {
    let dir = TempDir::new().expect("tempdir");
    fs::write(dir.path().join("config.toml"), "[catalog]\npath = \"data/netflix.jsonl\"\n").expect("write config");
    let config = Config::load_from(dir.path()).expect("config");
    let catalog: CatalogConfig = config.section("catalog").expect("catalog");
    assert_eq!(catalog.path, "data/netflix.jsonl");
    assert_eq!(config.resolve_path(&catalog.path), dir.path().join("data/netflix.jsonl"));
}
