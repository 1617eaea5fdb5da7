use shipstate::kernel::catalog::{CatalogBuilder, CatalogError, Field, SchemaCatalog, SlotKind};
use shipstate::kernel::config::{ConfigError, EngineConfig};
use shipstate::kernel::version::GameVersion;

#[test]
fn test_standard_catalog_builds() {
    let catalog = SchemaCatalog::standard().expect("standard catalog must validate");

    assert_eq!(catalog.key_for(Field::Fuel), "FUEL");
    assert_eq!(catalog.key_for(Field::TotalVelocity), "PLAYER SHIP TOTAL VELOCITY, AVL");
    assert_eq!(catalog.key_for(Field::Mtds), "MDTS STATUS");
    assert_eq!(catalog.slot_key(SlotKind::CargoBay, 0), Some("CARGO BAY 1"));
    assert_eq!(catalog.slot_key(SlotKind::Equipment, 9), Some("EQUIPMENT SLOT 10"));
    assert_eq!(catalog.slot_key(SlotKind::SecondaryWeapon, 8), None);
}

#[test]
fn test_slot_capacities_per_generation() {
    let catalog = SchemaCatalog::standard().unwrap();

    assert_eq!(catalog.capacity_for(SlotKind::CargoBay, GameVersion::None), 0);
    assert_eq!(catalog.capacity_for(SlotKind::CargoBay, GameVersion::EvochronMercenary), 5);
    assert_eq!(catalog.capacity_for(SlotKind::CargoBay, GameVersion::EvochronLegacy), 10);
    assert_eq!(catalog.capacity_for(SlotKind::SecondaryWeapon, GameVersion::EvochronMercenary), 8);
    assert_eq!(catalog.capacity_for(SlotKind::SecondaryWeapon, GameVersion::EvochronLegacy), 8);
    assert_eq!(catalog.capacity_for(SlotKind::Equipment, GameVersion::EvochronMercenary), 8);
    assert_eq!(catalog.capacity_for(SlotKind::Equipment, GameVersion::EvochronLegacy), 10);
}

#[test]
fn test_capability_is_monotonic() {
    // Without explicit caps, support at V implies support at every later V.
    let catalog = SchemaCatalog::standard().unwrap();

    for field in Field::ALL {
        let mut seen = false;
        for version in GameVersion::ALL {
            let supported = catalog.supports(field, version);
            assert!(!(seen && !supported), "{:?} lost support at {:?}", field, version);
            seen |= supported;
        }
        assert!(seen, "{:?} must be supported somewhere", field);
    }
}

#[test]
fn test_legacy_only_fields() {
    let catalog = SchemaCatalog::standard().unwrap();

    for field in [Field::ArmorLimit, Field::TotalVelocity, Field::Heading, Field::Pitch] {
        assert!(!catalog.supports(field, GameVersion::EvochronMercenary), "{:?}", field);
        assert!(catalog.supports(field, GameVersion::EvochronLegacy), "{:?}", field);
    }
    assert!(!catalog.supports(Field::Fuel, GameVersion::None));
    assert!(catalog.supports(Field::Fuel, GameVersion::EvochronMercenary));
}

#[test]
fn test_upper_bound_caps_support() {
    let catalog = CatalogBuilder::standard()
        .until(Field::Fuel, GameVersion::EvochronMercenary)
        .build()
        .unwrap();

    assert!(catalog.supports(Field::Fuel, GameVersion::EvochronMercenary));
    assert!(!catalog.supports(Field::Fuel, GameVersion::EvochronLegacy));
}

#[test]
fn test_missing_field_is_startup_fault() {
    let result = CatalogBuilder::standard().remove(Field::Pitch).build();
    assert_eq!(result.unwrap_err(), CatalogError::MissingField(Field::Pitch));
}

#[test]
fn test_never_supported_field_is_startup_fault() {
    let result = CatalogBuilder::standard()
        .since(Field::Heading, GameVersion::EvochronLegacy)
        .until(Field::Heading, GameVersion::EvochronMercenary)
        .build();

    assert!(
        matches!(result, Err(CatalogError::NeverSupported { field: Field::Heading, .. })),
        "inverted range must be rejected, got {:?}",
        result
    );
}

#[test]
fn test_empty_key_is_startup_fault() {
    let result = CatalogBuilder::standard()
        .field(Field::ShipType, "  ", GameVersion::EvochronMercenary)
        .build();
    assert_eq!(result.unwrap_err(), CatalogError::EmptyKey(Field::ShipType));
}

#[test]
fn test_capacity_larger_than_key_table_is_rejected() {
    let keys = vec!["CARGO BAY 1".to_string(), "CARGO BAY 2".to_string()];
    let result = CatalogBuilder::standard()
        .slots(SlotKind::CargoBay, keys, &[(GameVersion::EvochronLegacy, 3)])
        .build();

    assert_eq!(
        result.unwrap_err(),
        CatalogError::CapacityExceedsKeys {
            kind: SlotKind::CargoBay,
            version: GameVersion::EvochronLegacy,
            capacity: 3,
            keys: 2,
        }
    );
}

#[test]
fn test_native_total_requires_supported_key() {
    let result = CatalogBuilder::standard()
        .since(Field::ShieldTotal, GameVersion::EvochronLegacy)
        .native_total(GameVersion::EvochronMercenary)
        .build();
    assert_eq!(
        result.unwrap_err(),
        CatalogError::NativeTotalUnsupported(GameVersion::EvochronMercenary)
    );

    let ok = CatalogBuilder::standard()
        .native_total(GameVersion::EvochronLegacy)
        .build()
        .unwrap();
    assert!(ok.reports_native_total(GameVersion::EvochronLegacy));
    assert!(!ok.reports_native_total(GameVersion::EvochronMercenary));
}

#[test]
fn test_config_defaults_and_overrides() {
    let config = EngineConfig::default();
    assert_eq!(config.poll_interval_ms, 100);
    assert_eq!(config.decode_event_capacity, 10_000);
    assert!(config.native_shield_total.is_empty());

    let config = EngineConfig::from_json_str(
        r#"{ "poll_interval_ms": 250, "native_shield_total": ["EvochronLegacy"] }"#,
    )
    .unwrap();
    assert_eq!(config.poll_interval_ms, 250);
    assert_eq!(config.decode_event_capacity, 10_000, "unset keys keep defaults");

    let catalog = config.catalog().unwrap();
    assert!(catalog.reports_native_total(GameVersion::EvochronLegacy));
}

#[test]
fn test_config_rejects_unknown_keys() {
    let result = EngineConfig::from_json_str(r#"{ "poll_ms": 5 }"#);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
fn test_config_missing_file_falls_back_to_defaults() {
    let path = std::env::temp_dir().join(format!("shipstate-missing-{}.json", std::process::id()));
    let config = EngineConfig::load(&path).unwrap();
    assert_eq!(config, EngineConfig::default());
}

#[test]
fn test_config_load_from_file() {
    let path = std::env::temp_dir().join(format!("shipstate-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "decode_event_capacity": 16 }"#).unwrap();

    let config = EngineConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.decode_event_capacity, 16);
    assert_eq!(config.poll_interval_ms, 100);
}

#[test]
fn test_identifier_tables_follow_declaration_order() {
    // Catalog storage is indexed by discriminant.
    assert!(Field::ALL.iter().enumerate().all(|(i, f)| *f as usize == i));
    assert!(SlotKind::ALL.iter().enumerate().all(|(i, k)| *k as usize == i));

    let catalog = SchemaCatalog::standard().unwrap();
    assert_eq!(catalog.key_for(Field::Fuel), "FUEL");
    assert_eq!(catalog.key_for(Field::TractorBeam), "TRACTOR BEAM STATUS");
    assert_eq!(catalog.slot_key(SlotKind::SecondaryWeapon, 0), Some("SECONDARY WEAPON SLOT 1"));
}

#[test]
fn test_range_before_definition_is_startup_fault() {
    // 1. A cap on a field that does not exist yet is rejected, not dropped.
    let result = CatalogBuilder::standard()
        .remove(Field::Heading)
        .until(Field::Heading, GameVersion::EvochronMercenary)
        .field(Field::Heading, "PLAYER SHIP HEADING", GameVersion::EvochronMercenary)
        .build();
    assert_eq!(result.unwrap_err(), CatalogError::RangeBeforeField(Field::Heading));

    let result = CatalogBuilder::empty()
        .since(Field::Fuel, GameVersion::EvochronLegacy)
        .build();
    assert_eq!(result.unwrap_err(), CatalogError::RangeBeforeField(Field::Fuel));

    // 2. Define first, then narrow: accepted.
    let catalog = CatalogBuilder::standard()
        .remove(Field::Heading)
        .field(Field::Heading, "PLAYER SHIP HEADING", GameVersion::EvochronMercenary)
        .until(Field::Heading, GameVersion::EvochronMercenary)
        .build()
        .unwrap();
    assert!(catalog.supports(Field::Heading, GameVersion::EvochronMercenary));
    assert!(!catalog.supports(Field::Heading, GameVersion::EvochronLegacy));
}

#[test]
fn test_default_version_gates_everything() {
    assert_eq!(GameVersion::default(), GameVersion::None);

    let catalog = SchemaCatalog::standard().unwrap();
    let version = GameVersion::default();
    assert!(Field::ALL.iter().all(|f| !catalog.supports(*f, version)));
    assert!(SlotKind::ALL.iter().all(|k| catalog.capacity_for(*k, version) == 0));
}
