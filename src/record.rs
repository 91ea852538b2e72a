//! Statement records and their variants.
//!
//! Records arrive as loosely shaped JSON where the variant is signalled by an
//! `objectType` tag, or by nothing at all. The conversions here settle the
//! shape once at the boundary so that everything downstream can match on a
//! closed set of variants:
//! * an explicit `objectType` wins,
//! * otherwise a record with an `id` is an Activity,
//! * otherwise it is an Agent.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use std::str::FromStr;

use crate::error::{Result, UtilError};
use crate::language::LanguageMap;
use crate::temporal::{self, Timestamp};

// ------------- ObjectType -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Activity,
    Agent,
    Group,
    SubStatement,
    StatementRef,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Activity => "Activity",
            ObjectType::Agent => "Agent",
            ObjectType::Group => "Group",
            ObjectType::SubStatement => "SubStatement",
            ObjectType::StatementRef => "StatementRef",
        }
    }
}
impl FromStr for ObjectType {
    type Err = UtilError;
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Activity" => Ok(ObjectType::Activity),
            "Agent" => Ok(ObjectType::Agent),
            "Group" => Ok(ObjectType::Group),
            "SubStatement" => Ok(ObjectType::SubStatement),
            "StatementRef" => Ok(ObjectType::StatementRef),
            other => Err(UtilError::Record(format!("unknown objectType {other:?}"))),
        }
    }
}

/// The variant tag of a raw record: its `objectType`, else `Activity` when it
/// has an `id`, else `Agent`.
pub fn object_type(record: &Value) -> &str {
    match record.get("objectType").and_then(Value::as_str) {
        Some(tag) => tag,
        None if record.get("id").is_some_and(|id| !id.is_null()) => "Activity",
        None => "Agent",
    }
}

// ------------- Agents and groups -------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Account {
    #[serde(rename = "homePage", default, skip_serializing_if = "Option::is_none")]
    pub home_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The fields that identify an agent. At most one should be set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InverseIdentifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbox: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mbox_sha1sum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account: Option<Account>,
}

/// A single person or system. Any actor without `objectType: "Group"` is read
/// as an Agent, so a `member` list on an untagged actor is dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub identity: InverseIdentifier,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(flatten)]
    pub identity: InverseIdentifier,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member: Option<Vec<Agent>>,
}

/// Whoever performed the statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "objectType")]
pub enum Actor {
    Agent(Agent),
    Group(Group),
}

impl Actor {
    pub fn name(&self) -> Option<&str> {
        match self {
            Actor::Agent(a) => a.name.as_deref(),
            Actor::Group(g) => g.name.as_deref(),
        }
    }
    pub fn identity(&self) -> &InverseIdentifier {
        match self {
            Actor::Agent(a) => &a.identity,
            Actor::Group(g) => &g.identity,
        }
    }
}

impl TryFrom<Value> for Actor {
    type Error = UtilError;
    fn try_from(value: Value) -> Result<Self> {
        expect_object(&value)?;
        if value.get("objectType").and_then(Value::as_str) == Some("Group") {
            Ok(Actor::Group(serde_json::from_value(value)?))
        } else {
            Ok(Actor::Agent(serde_json::from_value(value)?))
        }
    }
}
impl<'de> Deserialize<'de> for Actor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Actor::try_from(Value::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}

// ------------- Verbs and activities -------------
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Verb {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<LanguageMap>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<LanguageMap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LanguageMap>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<ActivityDefinition>,
    // not part of the definition, but some producers put a plain name here
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatementRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

// ------------- Sub-statements -------------
/// An embedded statement. The `id`, `stored`, `version` and `authority`
/// fields only belong on stored top level statements; they are kept so that a
/// top level statement passed off as a sub-statement can be recognised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubStatement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<Verb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<StatementObject>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<Actor>,
}

impl SubStatement {
    pub fn has_persistence_markers(&self) -> bool {
        self.id.is_some() || self.stored.is_some() || self.version.is_some() || self.authority.is_some()
    }
}

// ------------- Statement objects -------------
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "objectType")]
pub enum StatementObject {
    Activity(Activity),
    Agent(Agent),
    Group(Group),
    SubStatement(Box<SubStatement>),
    StatementRef(StatementRef),
}

impl StatementObject {
    pub fn object_type(&self) -> ObjectType {
        match self {
            StatementObject::Activity(_) => ObjectType::Activity,
            StatementObject::Agent(_) => ObjectType::Agent,
            StatementObject::Group(_) => ObjectType::Group,
            StatementObject::SubStatement(_) => ObjectType::SubStatement,
            StatementObject::StatementRef(_) => ObjectType::StatementRef,
        }
    }
}

impl TryFrom<Value> for StatementObject {
    type Error = UtilError;
    fn try_from(value: Value) -> Result<Self> {
        expect_object(&value)?;
        let kind: ObjectType = object_type(&value).parse()?;
        Ok(match kind {
            ObjectType::Activity => StatementObject::Activity(serde_json::from_value(value)?),
            ObjectType::Agent => StatementObject::Agent(serde_json::from_value(value)?),
            ObjectType::Group => StatementObject::Group(serde_json::from_value(value)?),
            ObjectType::SubStatement => StatementObject::SubStatement(Box::new(serde_json::from_value(value)?)),
            ObjectType::StatementRef => StatementObject::StatementRef(serde_json::from_value(value)?),
        })
    }
}
impl<'de> Deserialize<'de> for StatementObject {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        StatementObject::try_from(Value::deserialize(deserializer)?).map_err(de::Error::custom)
    }
}

fn expect_object(value: &Value) -> Result<()> {
    if value.is_object() {
        Ok(())
    } else {
        Err(UtilError::Record(format!("expected a record object, found {value}")))
    }
}

// ------------- Statement -------------
/// A top level statement, reduced to the parts that get displayed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<Actor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verb: Option<Verb>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object: Option<StatementObject>,
    #[serde(default, deserialize_with = "lenient_time", skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<Timestamp>,
    #[serde(default, deserialize_with = "lenient_time", skip_serializing_if = "Option::is_none")]
    pub stored: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority: Option<Actor>,
}

// An unreadable time is dropped (with a warning) rather than failing the whole statement.
fn lenient_time<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Option<Timestamp>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(temporal::coerce))
}

impl FromStr for Statement {
    type Err = UtilError;
    fn from_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

// ------------- Entity -------------
/// A borrowed view of anything that has an identifier and a display string.
#[derive(Debug, Clone, Copy)]
pub enum Entity<'a> {
    Activity(&'a Activity),
    Agent(&'a Agent),
    Group(&'a Group),
    Verb(&'a Verb),
    SubStatement(&'a SubStatement),
    StatementRef(&'a StatementRef),
}

impl Entity<'_> {
    /// Verbs are not statement objects and have no object type.
    pub fn object_type(&self) -> Option<ObjectType> {
        match self {
            Entity::Activity(_) => Some(ObjectType::Activity),
            Entity::Agent(_) => Some(ObjectType::Agent),
            Entity::Group(_) => Some(ObjectType::Group),
            Entity::Verb(_) => None,
            Entity::SubStatement(_) => Some(ObjectType::SubStatement),
            Entity::StatementRef(_) => Some(ObjectType::StatementRef),
        }
    }
}

impl<'a> From<&'a StatementObject> for Entity<'a> {
    fn from(object: &'a StatementObject) -> Self {
        match object {
            StatementObject::Activity(a) => Entity::Activity(a),
            StatementObject::Agent(a) => Entity::Agent(a),
            StatementObject::Group(g) => Entity::Group(g),
            StatementObject::SubStatement(s) => Entity::SubStatement(s),
            StatementObject::StatementRef(r) => Entity::StatementRef(r),
        }
    }
}
impl<'a> From<&'a Actor> for Entity<'a> {
    fn from(actor: &'a Actor) -> Self {
        match actor {
            Actor::Agent(a) => Entity::Agent(a),
            Actor::Group(g) => Entity::Group(g),
        }
    }
}
impl<'a> From<&'a Verb> for Entity<'a> {
    fn from(verb: &'a Verb) -> Self {
        Entity::Verb(verb)
    }
}
impl<'a> From<&'a Activity> for Entity<'a> {
    fn from(activity: &'a Activity) -> Self {
        Entity::Activity(activity)
    }
}
impl<'a> From<&'a Agent> for Entity<'a> {
    fn from(agent: &'a Agent) -> Self {
        Entity::Agent(agent)
    }
}
impl<'a> From<&'a Group> for Entity<'a> {
    fn from(group: &'a Group) -> Self {
        Entity::Group(group)
    }
}
impl<'a> From<&'a SubStatement> for Entity<'a> {
    fn from(sub: &'a SubStatement) -> Self {
        Entity::SubStatement(sub)
    }
}
