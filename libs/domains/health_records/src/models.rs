use std::fmt;

use bson::oid::ObjectId;
use chrono::{DateTime, SubsecRound, Utc};
use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};

/// A health record as stored in the `health_data` collection.
///
/// Optional measurements that were not recorded are omitted from the stored
/// document and read back as `None`. Every record written here carries a
/// `timestamp`; documents written by other clients without one read back with
/// `timestamp: None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    /// Document id (`_id`), generated by the database on insert
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Owner of the record. Not unique: a user accumulates records over time.
    pub user_id: i64,
    /// UTC instant the record was written, generated by the store
    #[serde(
        default,
        with = "optional_bson_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<DateTime<Utc>>,
    pub glucose_level: f64,
    pub heart_rate: f64,
    /// Physical activity (e.g. steps), `None` when not recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<f64>,
    /// Reference to an external food image; never validated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub food_image_path: Option<String>,
}

impl HealthRecord {
    /// Stamp caller-supplied fields with the current time.
    ///
    /// The timestamp is truncated to milliseconds, the resolution of a BSON
    /// datetime, so the value returned equals the value read back.
    pub fn new(input: NewHealthRecord) -> Self {
        Self {
            id: None,
            user_id: input.user_id,
            timestamp: Some(Utc::now().trunc_subsecs(3)),
            glucose_level: input.glucose_level,
            heart_rate: input.heart_rate,
            activity_level: input.activity_level,
            food_image_path: input.food_image_path,
        }
    }
}

/// `Option<DateTime<Utc>>` stored as a BSON datetime; missing or null reads as `None`
mod optional_bson_datetime {
    use bson::DateTime as BsonDateTime;
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        (*value).map(BsonDateTime::from_chrono).serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        Ok(Option::<BsonDateTime>::deserialize(deserializer)?.map(BsonDateTime::to_chrono))
    }
}

impl fmt::Display for HealthRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(id) = &self.id {
            write!(f, "[{id}] ")?;
        }
        write!(f, "user_id={}", self.user_id)?;
        match self.timestamp {
            Some(timestamp) => write!(f, " timestamp={}", timestamp.to_rfc3339())?,
            None => write!(f, " timestamp=-")?,
        }
        write!(
            f,
            " glucose_level={} heart_rate={}",
            self.glucose_level, self.heart_rate
        )?;
        match self.activity_level {
            Some(activity) => write!(f, " activity_level={activity}")?,
            None => write!(f, " activity_level=-")?,
        }
        match &self.food_image_path {
            Some(path) => write!(f, " food_image_path={path}"),
            None => write!(f, " food_image_path=-"),
        }
    }
}

/// Caller-supplied fields of a new record.
///
/// The id and timestamp are never supplied by callers.
#[derive(Debug, Clone, PartialEq)]
pub struct NewHealthRecord {
    pub user_id: i64,
    pub glucose_level: f64,
    pub heart_rate: f64,
    pub activity_level: Option<f64>,
    pub food_image_path: Option<String>,
}

impl NewHealthRecord {
    pub fn new(user_id: i64, glucose_level: f64, heart_rate: f64) -> Self {
        Self {
            user_id,
            glucose_level,
            heart_rate,
            activity_level: None,
            food_image_path: None,
        }
    }

    pub fn with_activity_level(mut self, activity_level: f64) -> Self {
        self.activity_level = Some(activity_level);
        self
    }

    pub fn with_food_image_path(mut self, path: impl Into<String>) -> Self {
        self.food_image_path = Some(path.into());
        self
    }
}

/// Partial update applied to the first record of a user.
///
/// `None` leaves the stored field untouched. The optional measurements take
/// `Some(None)` to remove the field from the record (`$unset`), so a record
/// can return to "not recorded".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HealthRecordUpdate {
    pub glucose_level: Option<f64>,
    pub heart_rate: Option<f64>,
    pub activity_level: Option<Option<f64>>,
    pub food_image_path: Option<Option<String>>,
}

impl HealthRecordUpdate {
    /// True when no field is set
    pub fn is_empty(&self) -> bool {
        self.glucose_level.is_none()
            && self.heart_rate.is_none()
            && self.activity_level.is_none()
            && self.food_image_path.is_none()
    }

    /// The update document: `$set` for new values, `$unset` for removed
    /// fields. Operators with nothing to do are left out.
    pub fn to_update_document(&self) -> Document {
        let mut set = Document::new();
        let mut unset = Document::new();

        if let Some(glucose_level) = self.glucose_level {
            set.insert("glucose_level", glucose_level);
        }
        if let Some(heart_rate) = self.heart_rate {
            set.insert("heart_rate", heart_rate);
        }
        match self.activity_level {
            Some(Some(activity_level)) => {
                set.insert("activity_level", activity_level);
            }
            Some(None) => {
                unset.insert("activity_level", "");
            }
            None => {}
        }
        match &self.food_image_path {
            Some(Some(food_image_path)) => {
                set.insert("food_image_path", food_image_path.as_str());
            }
            Some(None) => {
                unset.insert("food_image_path", "");
            }
            None => {}
        }

        let mut update = Document::new();
        if !set.is_empty() {
            update.insert("$set", set);
        }
        if !unset.is_empty() {
            update.insert("$unset", unset);
        }
        update
    }

    /// Field names touched by this update, for logging
    pub fn field_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.glucose_level.is_some() {
            names.push("glucose_level");
        }
        if self.heart_rate.is_some() {
            names.push("heart_rate");
        }
        if self.activity_level.is_some() {
            names.push("activity_level");
        }
        if self.food_image_path.is_some() {
            names.push("food_image_path");
        }
        names
    }
}

/// Query filter for listing records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HealthRecordFilter {
    /// Exact match on `user_id`; `None` matches every record
    pub user_id: Option<i64>,
}

impl HealthRecordFilter {
    /// Match every record in the collection
    pub fn all() -> Self {
        Self::default()
    }

    /// Match the records of one user
    pub fn for_user(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// Build the MongoDB filter document
    pub fn to_document(&self) -> Document {
        match self.user_id {
            Some(user_id) => doc! { "user_id": user_id },
            None => doc! {},
        }
    }
}
