//! SQL Server column type -> JSON Schema type

use super::document::{DATE_TIME_FORMAT, JsonType};
use lazy_static::lazy_static;
use std::collections::HashMap;

lazy_static! {
    static ref TYPE_MAP: HashMap<&'static str, JsonType> = {
        let mut map = HashMap::new();

        for name in ["varchar", "nvarchar", "char", "nchar", "text", "ntext"] {
            map.insert(name, JsonType::String);
        }
        for name in ["int", "bigint", "smallint", "tinyint"] {
            map.insert(name, JsonType::Integer);
        }
        for name in ["decimal", "numeric", "float", "real", "money", "smallmoney"] {
            map.insert(name, JsonType::Number);
        }
        map.insert("bit", JsonType::Boolean);

        // Temporal values travel as strings; see `date_time_format`
        for name in ["datetime", "datetime2", "date", "time", "datetimeoffset", "smalldatetime"] {
            map.insert(name, JsonType::String);
        }
        // Binary payloads are encoded as strings in JSON
        for name in ["binary", "varbinary", "image"] {
            map.insert(name, JsonType::String);
        }
        map.insert("uniqueidentifier", JsonType::String);

        map
    };
}

/// Case-insensitive lookup; `None` for types outside the table
pub fn map_db_type(db_type: &str) -> Option<JsonType> {
    TYPE_MAP.get(db_type.to_lowercase().as_str()).copied()
}

/// `date-time` when the type name contains `date` or `time` anywhere.
///
/// A plain substring test: `validate` matches too.
pub fn date_time_format(db_type: &str) -> Option<&'static str> {
    let lowered = db_type.to_lowercase();
    (lowered.contains("date") || lowered.contains("time")).then_some(DATE_TIME_FORMAT)
}
