//! Sample content for codec tests.

#![allow(dead_code)]

use passcore_content::{CustomField, CustomFieldKind, ItemContent, ItemContentData, LoginData};

pub fn sample_login() -> ItemContent {
    ItemContent {
        item_uuid: "3f9a8c2e-0d4b-4c1e-9a7f-2b6d5e8f1a03".into(),
        name: "Bank".into(),
        note: "joint account".into(),
        data: ItemContentData::Login(LoginData {
            username: "alice@example.com".into(),
            password: "correct horse battery staple".into(),
            totp_uri: "otpauth://totp/Bank:alice?secret=JBSWY3DPEHPK3PXP".into(),
            urls: vec!["https://bank.example".into(), "https://m.bank.example".into()],
        }),
        custom_fields: vec![
            CustomField::new("PIN", CustomFieldKind::Hidden, "0000"),
            CustomField::new("Branch", CustomFieldKind::Text, "Main St"),
            CustomField::new("2FA", CustomFieldKind::Totp, "otpauth://totp/x?secret=ABC"),
        ],
    }
}

pub fn sample_note() -> ItemContent {
    ItemContent::new("Wifi", "ssid: home\npass: hunter2", ItemContentData::Note, vec![])
}

pub fn sample_alias() -> ItemContent {
    ItemContent::new("Newsletter alias", "", ItemContentData::Alias, vec![])
}
