//! Domain data structures for coordinates, the campus feed, map pins, and users.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// A latitude/longitude pair identifying a point on the Earth's surface.
pub struct Coordinate {
    /// Latitude in decimal degrees.
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude in decimal degrees.
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Coordinate {
    /// Construct a coordinate from latitude and longitude.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{},{}", self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a post in the campus feed.
pub struct FeedItemId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A single post in the campus feed.
pub struct FeedItem {
    /// Unique identifier.
    pub id: FeedItemId,
    /// Display name of the author.
    pub author: String,
    /// Headline shown in the feed list.
    pub title: String,
    /// Post content.
    pub body: String,
    /// Time the post was published.
    pub created_at: DateTime<Utc>,
    /// Number of likes the post has received.
    pub likes: u32,
    /// Optional place the post refers to.
    pub location: Option<Coordinate>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
/// Identifier for a map category such as "dining" or "libraries".
pub struct CategoryId(pub String);

impl fmt::Display for CategoryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A category grouping pins on the campus map.
pub struct MapCategory {
    /// Unique identifier.
    pub id: CategoryId,
    /// Human-friendly name.
    pub name: String,
    /// Optional icon name used by the front-end.
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a point of interest on the map.
pub struct PinId(pub String);

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Point of interest on the campus map.
pub struct MapPin {
    /// Unique identifier.
    pub id: PinId,
    /// Category the pin belongs to.
    pub category: CategoryId,
    /// Title shown on the pin.
    pub title: String,
    /// Optional longer description.
    pub description: Option<String>,
    /// Street address the pin was resolved from, if any.
    pub address: Option<String>,
    /// Position of the pin.
    pub location: Coordinate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
/// Orderings offered by the feed's sort control.
pub enum SortOption {
    /// Most recent posts first.
    #[default]
    Newest,
    /// Oldest posts first.
    Oldest,
    /// Posts with the most likes first.
    MostLiked,
}

impl fmt::Display for SortOption {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slug = match self {
            SortOption::Newest => "newest",
            SortOption::Oldest => "oldest",
            SortOption::MostLiked => "most-liked",
        };
        write!(formatter, "{slug}")
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown sort option: {0}")]
/// Returned when a sort option slug cannot be parsed.
pub struct UnknownSortOption(pub String);

impl FromStr for SortOption {
    type Err = UnknownSortOption;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_lowercase().as_str() {
            "newest" => Ok(SortOption::Newest),
            "oldest" => Ok(SortOption::Oldest),
            "most-liked" | "most_liked" => Ok(SortOption::MostLiked),
            _ => Err(UnknownSortOption(raw.to_owned())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Application-wide display settings.
pub struct Settings {
    /// Ordering applied to the feed when the client does not ask for one.
    pub default_sort: SortOption,
    /// Initial center of the campus map.
    pub map_center: Coordinate,
    /// Initial zoom level of the campus map.
    pub map_zoom: u8,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_sort: SortOption::default(),
            map_center: crate::resolver::DEFAULT_FALLBACK,
            map_zoom: 16,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Normalized email address used as the user lookup key.
pub struct Email(String);

impl Email {
    /// Trim, lower-case, and validate an email address.
    ///
    /// Returns `None` unless the input has exactly one `@` with non-empty
    /// text on both sides.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized = raw.trim().to_lowercase();
        let (local, domain) = normalized.split_once('@')?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return None;
        }
        Some(Self(normalized))
    }

    /// The normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Identifier for a registered user.
pub struct UserId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
/// Access level of a user.
pub enum Role {
    /// Regular campus user.
    #[default]
    User,
    /// Administrator with access to the admin endpoints.
    Admin,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
/// Registered user.
pub struct User {
    /// Unique identifier.
    pub id: UserId,
    /// Normalized email address.
    pub email: Email,
    /// Name shown next to posts.
    pub display_name: String,
    /// Access level.
    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_serializes_as_lat_lng() {
        let json = serde_json::to_value(Coordinate::new(40.73, -73.99)).expect("serializable");
        assert_eq!(json, serde_json::json!({ "lat": 40.73, "lng": -73.99 }));
    }

    #[test]
    fn email_is_normalized() {
        let email = Email::parse("  Jane.Doe@Campus.EDU ").expect("valid email");
        assert_eq!(email.as_str(), "jane.doe@campus.edu");
    }

    #[test]
    fn malformed_emails_are_rejected() {
        for raw in ["", "no-at-sign", "@campus.edu", "jane@", "a@b@c"] {
            assert!(Email::parse(raw).is_none(), "{raw:?} should be rejected");
        }
    }

    #[test]
    fn sort_option_slugs() {
        assert_eq!("most-liked".parse::<SortOption>(), Ok(SortOption::MostLiked));
        assert_eq!(" Oldest ".parse::<SortOption>(), Ok(SortOption::Oldest));
        assert_eq!(SortOption::MostLiked.to_string(), "most-liked");
        assert!("popular".parse::<SortOption>().is_err());
    }

    #[test]
    fn default_settings_center_on_campus() {
        let settings = Settings::default();
        assert_eq!(settings.default_sort, SortOption::Newest);
        assert_eq!(settings.map_center, Coordinate::new(40.7308, -73.9973));
    }
}
