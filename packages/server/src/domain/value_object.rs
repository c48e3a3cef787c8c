//! 値オブジェクト
//!
//! ID、ロール、レポートのステータスと優先度、ルーム名を表現します。

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::ValueObjectError;

/// Room that every admin connection joins
pub const ADMINS_ROOM: &str = "admins";

/// Prefix of per-unit room names (`unit_<unitId>`)
pub const UNIT_ROOM_PREFIX: &str = "unit_";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// 空文字列は拒否する
            pub fn new(value: String) -> Result<Self, ValueObjectError> {
                if value.trim().is_empty() {
                    return Err(ValueObjectError::Empty($kind));
                }
                Ok(Self(value))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_string(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValueObjectError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

string_id!(
    /// User identifier carried in the bearer credential
    UserId,
    "user id"
);
string_id!(
    /// Organizational unit (department) identifier
    UnitId,
    "unit id"
);
string_id!(
    /// Report identifier
    ReportId,
    "report id"
);

/// Unique id of one real-time session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(Uuid);

impl ConnectionId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Broadcast group name: `admins` or `unit_<unitId>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(String);

impl RoomId {
    pub fn admins() -> Self {
        Self(ADMINS_ROOM.to_string())
    }

    pub fn for_unit(unit_id: &UnitId) -> Self {
        Self(format!("{}{}", UNIT_ROOM_PREFIX, unit_id.as_str()))
    }

    /// Parse a room name. Only `admins` and non-empty `unit_<id>` names exist.
    pub fn parse(value: &str) -> Option<Self> {
        if value == ADMINS_ROOM {
            return Some(Self::admins());
        }
        let unit = value.strip_prefix(UNIT_ROOM_PREFIX)?;
        UnitId::new(unit.to_string()).ok().map(|unit| Self::for_unit(&unit))
    }

    /// Unit id encoded in a unit room name
    pub fn unit_id(&self) -> Option<UnitId> {
        self.0
            .strip_prefix(UNIT_ROOM_PREFIX)
            .and_then(|unit| UnitId::new(unit.to_string()).ok())
    }

    pub fn is_admins(&self) -> bool {
        self.0 == ADMINS_ROOM
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// User role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Supervisor,
    Worker,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Supervisor => "supervisor",
            Self::Worker => "worker",
            Self::Student => "student",
        }
    }
}

impl FromStr for Role {
    type Err = ValueObjectError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "admin" => Ok(Self::Admin),
            "supervisor" => Ok(Self::Supervisor),
            "worker" => Ok(Self::Worker),
            "student" => Ok(Self::Student),
            other => Err(ValueObjectError::UnknownVariant {
                kind: "role",
                value: other.to_string(),
            }),
        }
    }
}

/// Report lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Completed,
}

impl ReportStatus {
    pub const ALL: [Self; 3] = [Self::Pending, Self::InProgress, Self::Completed];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl FromStr for ReportStatus {
    type Err = ValueObjectError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(ValueObjectError::UnknownVariant {
                kind: "status",
                value: other.to_string(),
            }),
        }
    }
}

/// Report priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPriority {
    Low,
    Medium,
    High,
}

impl ReportPriority {
    pub const ALL: [Self; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for ReportPriority {
    type Err = ValueObjectError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(ValueObjectError::UnknownVariant {
                kind: "priority",
                value: other.to_string(),
            }),
        }
    }
}
