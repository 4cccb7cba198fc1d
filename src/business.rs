//! Business details pushed into the page's placeholder slots.

use std::collections::BTreeMap;
use std::path::Path;

use chrono::NaiveTime;
use serde::Deserialize;

use crate::error::Error;

/// Markers recognised by [`populate`], in the order a typical page lists them.
pub const DEFAULT_MARKERS: &[&str] = &[
    "name",
    "tagline",
    "phone",
    "email",
    "address",
    "service-area",
    "hours",
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessInfo {
    pub name: Option<String>,
    pub tagline: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<Address>,
    pub service_area: Option<Vec<String>>,
    pub hours: Option<Vec<OpeningHours>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub street: Option<String>,
    pub city: Option<String>,
    pub region: Option<String>,
    pub postal_code: Option<String>,
}

impl Address {
    /// Single-line postal form, e.g. `12 Elm St, Springfield, OR 97477`.
    pub fn one_line(&self) -> Option<String> {
        let locality = match (&self.region, &self.postal_code) {
            (Some(region), Some(postal)) => Some(format!("{region} {postal}")),
            (Some(region), None) => Some(region.clone()),
            (None, Some(postal)) => Some(postal.clone()),
            (None, None) => None,
        };
        let parts: Vec<String> = [self.street.clone(), self.city.clone(), locality]
            .into_iter()
            .flatten()
            .filter(|p| !p.trim().is_empty())
            .collect();
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpeningHours {
    pub days: String,
    pub open: String,
    #[serde(default)]
    pub close: String,
}

impl OpeningHours {
    fn render(&self) -> String {
        if self.close.trim().is_empty() {
            return format!("{}: {}", self.days, twelve_hour(&self.open));
        }
        format!(
            "{}: {} – {}",
            self.days,
            twelve_hour(&self.open),
            twelve_hour(&self.close)
        )
    }
}

// Leaves non-HH:MM input (e.g. "Closed") as written.
fn twelve_hour(raw: &str) -> String {
    match NaiveTime::parse_from_str(raw.trim(), "%H:%M") {
        Ok(t) => t.format("%-I:%M %p").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// One element on the page carrying a marker attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub marker: String,
    pub text: String,
    pub attrs: BTreeMap<String, String>,
}

/// Placeholder elements in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceholderPage {
    slots: Vec<Slot>,
}

pub const PLACEHOLDER_TEXT: &str = "…";

impl PlaceholderPage {
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let slots = markers
            .into_iter()
            .map(|marker| Slot {
                marker: marker.into(),
                text: PLACEHOLDER_TEXT.to_string(),
                attrs: BTreeMap::new(),
            })
            .collect();
        Self { slots }
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// First slot carrying `marker`.
    pub fn slot(&self, marker: &str) -> Option<&Slot> {
        self.slots.iter().find(|s| s.marker == marker)
    }
}

/// Write every present field into the matching slots; returns how many were written.
///
/// Absent fields and unrecognised markers keep their placeholder content.
pub fn populate(page: &mut PlaceholderPage, info: &BusinessInfo) -> usize {
    let mut written = 0;
    for slot in &mut page.slots {
        let Some((text, href)) = field_for(&slot.marker, info) else {
            continue;
        };
        slot.text = text;
        if let Some(href) = href {
            slot.attrs.insert("href".to_string(), href);
        }
        written += 1;
    }
    written
}

fn field_for(marker: &str, info: &BusinessInfo) -> Option<(String, Option<String>)> {
    match marker {
        "name" => info.name.clone().map(|n| (n, None)),
        "tagline" => info.tagline.clone().map(|t| (t, None)),
        "phone" => info.phone.clone().map(|p| {
            let href = tel_href(&p);
            (p, Some(href))
        }),
        "email" => info
            .email
            .clone()
            .map(|e| (e.clone(), Some(format!("mailto:{e}")))),
        "address" => info.address.as_ref().and_then(Address::one_line).map(|a| (a, None)),
        "service-area" => info
            .service_area
            .as_ref()
            .filter(|areas| !areas.is_empty())
            .map(|areas| (areas.join(", "), None)),
        "hours" => info
            .hours
            .as_ref()
            .filter(|hours| !hours.is_empty())
            .map(|hours| {
                let lines: Vec<String> = hours.iter().map(OpeningHours::render).collect();
                (lines.join("\n"), None)
            }),
        _ => None,
    }
}

// Digits only, keeping a leading `+` country prefix.
fn tel_href(phone: &str) -> String {
    let mut href = String::from("tel:");
    if phone.trim_start().starts_with('+') {
        href.push('+');
    }
    href.extend(phone.chars().filter(char::is_ascii_digit));
    href
}

/// Read and parse the business-info JSON document.
pub async fn load_business_info(path: &Path) -> Result<BusinessInfo, Error> {
    let bytes = tokio::fs::read(path).await.map_err(|source| Error::InfoRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_slice(&bytes).map_err(|source| Error::InfoParse {
        path: path.to_path_buf(),
        source,
    })
}
