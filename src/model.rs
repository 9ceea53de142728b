//! Data model for discovered references and extracted player records
//!
//! Field names in the serialized output mirror the upstream catalog's
//! vocabulary (overall/potential, value/wage, weak foot, skill moves).

use chrono::NaiveDate;
use serde::Serialize;
use url::Url;

/// A player link discovered on a listing page, pending extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRef {
    /// Absolute URL of the player's detail page
    pub url: Url,

    /// Display name shown on the listing row
    pub name: String,

    /// The listing page the link was found on, sent as Referer when
    /// fetching the detail page
    pub referer: Option<String>,
}

/// The fully structured record for one player.
///
/// A record starts with only the identity carried over from its
/// [`PlayerRef`]; extraction fills the rest in place. If extraction fails
/// partway, fields assigned up to that point are kept.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Player {
    pub url: String,
    pub name: String,
    pub fullname: Option<String>,
    pub age: Option<u32>,
    pub birthday: Option<NaiveDate>,
    pub height: Option<String>,
    pub weight: Option<String>,
    pub overall: Option<i32>,
    pub potential: Option<i32>,
    /// Currency-formatted, kept as the raw string (e.g. "€110.5M")
    pub value: Option<String>,
    /// Currency-formatted, kept as the raw string
    pub wage: Option<String>,
    pub foot: Option<String>,
    pub reputation: Option<i32>,
    pub weak_foot: Option<i32>,
    pub skill_moves: Option<i32>,
    pub team: Option<String>,
    pub team_position: Option<String>,
    pub team_number: Option<i32>,
    pub country: Option<String>,
    pub country_position: Option<String>,
    pub country_number: Option<i32>,
    pub properties: Vec<PropertyGroup>,
}

impl Player {
    /// Creates an empty record carrying the identity of a discovered
    /// reference.
    pub fn from_ref(player_ref: &PlayerRef) -> Self {
        Player {
            url: player_ref.url.to_string(),
            name: player_ref.name.clone(),
            ..Player::default()
        }
    }
}

/// One labeled column of rated attributes (e.g. "Attacking").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyGroup {
    pub name: String,
    pub properties: Vec<Property>,
}

/// A single rated attribute.
///
/// `score` is `-1` when the attribute carries no numeric rating, which is
/// distinct from a genuine 0. The sentinel serializes as the integer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Property {
    pub name: String,
    pub score: i32,
}
