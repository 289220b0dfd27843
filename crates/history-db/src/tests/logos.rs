use super::test_db;
use crate::LogoAsset;

#[test]
fn test_logo_asset_upsert() {
    let db = test_db();
    assert!(db.get_logo_asset("abc.png").unwrap().is_none());

    let mut asset = LogoAsset {
        storage_key: "abc.png".into(),
        original_name: "company logo.png".into(),
        byte_size: 512,
        uploaded_at: "2025-01-01T00:00:00.000Z".into(),
    };
    db.upsert_logo_asset(&asset).unwrap();
    assert_eq!(db.get_logo_asset("abc.png").unwrap(), Some(asset.clone()));

    asset.original_name = "renamed.png".into();
    db.upsert_logo_asset(&asset).unwrap();
    let got = db.get_logo_asset("abc.png").unwrap().unwrap();
    assert_eq!(got.original_name, "renamed.png");
}
