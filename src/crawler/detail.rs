//! Detail-page extraction
//!
//! Turns one player's detail page into the typed fields and property
//! groups of a [`Player`]. Extraction is position-indexed: the document
//! regions below are read by node order, not by label text, so the index
//! constants form a versioned mapping of the catalog's markup.
//!
//! Layout mapping (v1):
//!
//! | region                             | index | field            |
//! |------------------------------------|-------|------------------|
//! | `.stats .text-center span`         | 0     | overall          |
//! |                                    | 1     | potential        |
//! |                                    | 2     | value (raw)      |
//! |                                    | 3     | wage (raw)       |
//! | `.teams tr td`                     | 0     | attribute list   |
//! |                                    | 1     | spacer (skipped) |
//! |                                    | 2     | team column      |
//! |                                    | 3     | country column   |
//! | attribute list `ul li`             | 0     | preferred foot   |
//! |                                    | 1     | reputation       |
//! |                                    | 2     | weak foot        |
//! |                                    | 3     | skill moves      |
//! | team/country column `ul li`        | 0     | name             |
//! |                                    | 2     | position         |
//! |                                    | 3     | kit number       |
//!
//! The first extraction error aborts the record; fields assigned before
//! the failure stay assigned, and the partially-filled record is kept.

use crate::model::{Player, Property, PropertyGroup};
use crate::{ExtractError, ExtractResult};
use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

const STAT_OVERALL: usize = 0;
const STAT_POTENTIAL: usize = 1;
const STAT_VALUE: usize = 2;
const STAT_WAGE: usize = 3;

const CELL_ATTRIBUTES: usize = 0;
const CELL_SPACER: usize = 1;
const CELL_TEAM: usize = 2;
const CELL_COUNTRY: usize = 3;

const ATTR_FOOT: usize = 0;
const ATTR_REPUTATION: usize = 1;
const ATTR_WEAK_FOOT: usize = 2;
const ATTR_SKILL_MOVES: usize = 3;

const AFFIL_NAME: usize = 0;
const AFFIL_POSITION: usize = 2;
const AFFIL_NUMBER: usize = 3;

static META_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article .player .info .meta span").expect("valid selector")
});
static STATS_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article .player .stats .text-center span").expect("valid selector")
});
static TEAMS_CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article .player .teams tr td").expect("valid selector"));
static LIST_ITEM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul li").expect("valid selector"));
static LABEL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("span").expect("valid selector"));
static GROUP_CONTAINER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("article .columns .column div").expect("valid selector"));
static GROUP_HEADER_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h5").expect("valid selector"));
static GROUP_LIST_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("ul").expect("valid selector"));
static ITEM_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("li").expect("valid selector"));

/// Identity block: full name, age, birthday, height, weight around the
/// portrait markup.
static META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^([^<>]*) <.*> *Age ([0-9]+) \((.*)\) ([^ ]+) ([^ ]+)"#).expect("valid regex")
});

/// Removes whole `<tag>...</tag>` spans from raw inner markup.
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^<]+?>[^<]*</[^<]+?>").expect("valid regex"));

/// Optional leading integer rating followed by the attribute name.
static PROPERTY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]*) *(.+)$").expect("valid regex"));

const BIRTHDAY_FORMAT: &str = "%b %d, %Y";

/// Extracts a detail document into `player`, mutating it in place.
///
/// Extraction is a pure read of the document: running it twice into fresh
/// records produces identical records.
pub fn extract_player(document: &Html, player: &mut Player) -> ExtractResult<()> {
    extract_meta(document, player)?;
    extract_stats(document, player)?;
    extract_affiliations(document, player)?;
    extract_property_groups(document, player)?;
    Ok(())
}

fn extract_meta(document: &Html, player: &mut Player) -> ExtractResult<()> {
    let meta = document
        .select(&META_SELECTOR)
        .next()
        .ok_or(ExtractError::MissingNode("player meta span"))?;
    let raw = meta.inner_html();
    let caps = META_RE
        .captures(&raw)
        .ok_or(ExtractError::Pattern("player meta"))?;

    player.fullname = Some(caps[1].to_string());
    player.age = Some(caps[2].parse().map_err(|_| ExtractError::Number {
        field: "age",
        text: caps[2].to_string(),
    })?);
    player.birthday = Some(
        NaiveDate::parse_from_str(&caps[3], BIRTHDAY_FORMAT).map_err(|_| ExtractError::Date {
            text: caps[3].to_string(),
        })?,
    );
    player.height = Some(caps[4].to_string());
    player.weight = Some(caps[5].to_string());
    Ok(())
}

fn extract_stats(document: &Html, player: &mut Player) -> ExtractResult<()> {
    for (index, span) in document.select(&STATS_SELECTOR).enumerate() {
        let text = span.text().collect::<String>();
        match index {
            STAT_OVERALL => player.overall = Some(parse_int("overall", text.trim())?),
            STAT_POTENTIAL => player.potential = Some(parse_int("potential", text.trim())?),
            STAT_VALUE => player.value = Some(text),
            STAT_WAGE => player.wage = Some(text),
            _ => {}
        }
    }
    Ok(())
}

fn extract_affiliations(document: &Html, player: &mut Player) -> ExtractResult<()> {
    for (cell_index, cell) in document.select(&TEAMS_CELL_SELECTOR).enumerate() {
        match cell_index {
            CELL_SPACER => continue,
            CELL_ATTRIBUTES => extract_attribute_items(&cell, player)?,
            CELL_TEAM => {
                let column = extract_affiliation(&cell, "team number")?;
                player.team = column.name;
                player.team_position = column.position;
                player.team_number = column.number;
            }
            CELL_COUNTRY => {
                let column = extract_affiliation(&cell, "country number")?;
                player.country = column.name;
                player.country_position = column.position;
                player.country_number = column.number;
            }
            _ => {}
        }
    }
    Ok(())
}

/// The preferred-foot/reputation/weak-foot/skill-moves list. Each item is
/// tag-stripped first; items past the known indices are ignored.
fn extract_attribute_items(cell: &ElementRef, player: &mut Player) -> ExtractResult<()> {
    for (item_index, item) in cell.select(&LIST_ITEM_SELECTOR).enumerate() {
        let raw = item.inner_html();
        let stripped = TAG_RE.replace_all(&raw, "");
        match item_index {
            ATTR_FOOT => player.foot = Some(stripped.replace('\n', "").trim().to_string()),
            ATTR_REPUTATION => {
                player.reputation = Some(parse_int("reputation", stripped.trim())?)
            }
            ATTR_WEAK_FOOT => player.weak_foot = Some(parse_int("weak foot", stripped.trim())?),
            ATTR_SKILL_MOVES => {
                player.skill_moves = Some(parse_int("skill moves", stripped.trim())?)
            }
            _ => {}
        }
    }
    Ok(())
}

struct AffiliationColumn {
    name: Option<String>,
    position: Option<String>,
    number: Option<i32>,
}

/// One team/country column. Missing list indices are simply not visited;
/// only a present-but-unparsable number is an error.
fn extract_affiliation(
    cell: &ElementRef,
    number_field: &'static str,
) -> ExtractResult<AffiliationColumn> {
    let mut column = AffiliationColumn {
        name: None,
        position: None,
        number: None,
    };
    for (item_index, item) in cell.select(&LIST_ITEM_SELECTOR).enumerate() {
        match item_index {
            AFFIL_NAME => {
                let text = item.text().collect::<String>();
                column.name = Some(text.replace('\n', "").trim().to_string());
            }
            AFFIL_POSITION => {
                column.position = item
                    .select(&LABEL_SELECTOR)
                    .next()
                    .map(|label| label.text().collect::<String>());
            }
            AFFIL_NUMBER => {
                let raw = item.inner_html();
                let stripped = TAG_RE.replace_all(&raw, "").replace('\n', "");
                column.number = Some(parse_int(number_field, stripped.trim())?);
            }
            _ => {}
        }
    }
    Ok(column)
}

/// Property groups accumulate across all containers in document order.
/// Within a container, every `h5` opens a group and the k-th `ul` fills
/// the k-th group; a `ul` with no matching header is a mismatch error.
fn extract_property_groups(document: &Html, player: &mut Player) -> ExtractResult<()> {
    for container in document.select(&GROUP_CONTAINER_SELECTOR) {
        let mut groups: Vec<PropertyGroup> = container
            .select(&GROUP_HEADER_SELECTOR)
            .map(|header| PropertyGroup {
                name: header.text().collect::<String>(),
                properties: Vec::new(),
            })
            .collect();
        let header_count = groups.len();

        for (list_index, list) in container.select(&GROUP_LIST_SELECTOR).enumerate() {
            let group = groups
                .get_mut(list_index)
                .ok_or(ExtractError::GroupMismatch {
                    headers: header_count,
                    list_index,
                })?;
            for item in list.select(&ITEM_SELECTOR) {
                let text = item.text().collect::<String>();
                group.properties.push(parse_property(text.trim())?);
            }
        }

        player.properties.extend(groups);
    }
    Ok(())
}

/// Parses one property item: an optional leading integer rating followed
/// by the attribute name. No rating yields the `-1` sentinel.
fn parse_property(text: &str) -> ExtractResult<Property> {
    let caps = PROPERTY_RE
        .captures(text)
        .ok_or(ExtractError::Pattern("property item"))?;
    let score = if caps[1].is_empty() {
        -1
    } else {
        parse_int("property score", &caps[1])?
    };
    Ok(Property {
        name: caps[2].to_string(),
        score,
    })
}

fn parse_int(field: &'static str, text: &str) -> ExtractResult<i32> {
    text.parse::<i32>().map_err(|_| ExtractError::Number {
        field,
        text: text.to_string(),
    })
}
