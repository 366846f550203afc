//! Typed item content.

use std::fmt;
use uuid::Uuid;

/// Kind of item. The discriminators are part of the wire format and only
/// ever get appended to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemContentType {
    Login,
    Alias,
    Note,
}

impl ItemContentType {
    pub const ALL: [ItemContentType; 3] = [
        ItemContentType::Login,
        ItemContentType::Alias,
        ItemContentType::Note,
    ];

    pub const fn discriminator(self) -> u32 {
        match self {
            ItemContentType::Login => 0,
            ItemContentType::Alias => 1,
            ItemContentType::Note => 2,
        }
    }

    pub const fn from_discriminator(value: u32) -> Option<Self> {
        match value {
            0 => Some(ItemContentType::Login),
            1 => Some(ItemContentType::Alias),
            2 => Some(ItemContentType::Note),
            _ => None,
        }
    }
}

impl fmt::Display for ItemContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemContentType::Login => "login",
            ItemContentType::Alias => "alias",
            ItemContentType::Note => "note",
        })
    }
}

/// Login credentials. `Debug` never prints the password.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginData {
    pub username: String,
    pub password: String,
    pub totp_uri: String,
    pub urls: Vec<String>,
}

impl fmt::Debug for LoginData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginData")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("totp_uri", &self.totp_uri)
            .field("urls", &self.urls)
            .finish()
    }
}

/// Type-specific payload of an item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ItemContentData {
    Login(LoginData),
    Alias,
    Note,
}

impl ItemContentData {
    pub fn content_type(&self) -> ItemContentType {
        match self {
            ItemContentData::Login(_) => ItemContentType::Login,
            ItemContentData::Alias => ItemContentType::Alias,
            ItemContentData::Note => ItemContentType::Note,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CustomFieldKind {
    Text,
    Totp,
    Hidden,
}

impl CustomFieldKind {
    pub const fn discriminator(self) -> u32 {
        match self {
            CustomFieldKind::Text => 0,
            CustomFieldKind::Totp => 1,
            CustomFieldKind::Hidden => 2,
        }
    }

    pub const fn from_discriminator(value: u32) -> Option<Self> {
        match value {
            0 => Some(CustomFieldKind::Text),
            1 => Some(CustomFieldKind::Totp),
            2 => Some(CustomFieldKind::Hidden),
            _ => None,
        }
    }
}

/// A user-defined field. For `Totp` the content is the TOTP URI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomField {
    pub title: String,
    pub kind: CustomFieldKind,
    pub content: String,
}

impl CustomField {
    pub fn new(title: impl Into<String>, kind: CustomFieldKind, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            kind,
            content: content.into(),
        }
    }
}

/// Decrypted content of one item.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemContent {
    /// Client-generated, stable across revisions.
    pub item_uuid: String,
    pub name: String,
    pub note: String,
    pub data: ItemContentData,
    pub custom_fields: Vec<CustomField>,
}

impl ItemContent {
    /// New item content with a fresh random `item_uuid`.
    pub fn new(
        name: impl Into<String>,
        note: impl Into<String>,
        data: ItemContentData,
        custom_fields: Vec<CustomField>,
    ) -> Self {
        Self {
            item_uuid: Uuid::new_v4().to_string(),
            name: name.into(),
            note: note.into(),
            data,
            custom_fields,
        }
    }

    pub fn content_type(&self) -> ItemContentType {
        self.data.content_type()
    }

    /// First URL of a login, used for icons and autofill matching.
    pub fn primary_url(&self) -> Option<&str> {
        match &self.data {
            ItemContentData::Login(login) => login.urls.first().map(String::as_str),
            _ => None,
        }
    }
}

/// Items of one kind, in their original order.
pub fn filter_by_type<'a, I>(items: I, content_type: ItemContentType) -> Vec<&'a ItemContent>
where
    I: IntoIterator<Item = &'a ItemContent>,
{
    items
        .into_iter()
        .filter(|item| item.content_type() == content_type)
        .collect()
}
