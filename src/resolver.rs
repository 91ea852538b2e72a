//! Identifiers and display strings for statement parts.
//!
//! Every operation here is best effort. A partial record still renders as
//! something, falling back to the literal `unknown` where a string is
//! required.

use tracing::debug;

use std::fmt;

use crate::language::{LanguageMap, LanguageResolver, LocaleProvider, Preference, SystemLocale};
use crate::record::{Account, Agent, Entity, InverseIdentifier, Statement, StatementObject, SubStatement, Verb};

pub const UNKNOWN: &str = "unknown";

// ------------- Identifier -------------
/// What identifies an entity. Accounts are kept as the reference itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Identifier<'a> {
    Iri(&'a str),
    Account(&'a Account),
}

impl<'a> Identifier<'a> {
    pub fn as_iri(&self) -> Option<&'a str> {
        match self {
            Identifier::Iri(iri) => Some(*iri),
            Identifier::Account(_) => None,
        }
    }
}
impl fmt::Display for Identifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Identifier::Iri(iri) => write!(f, "{}", iri),
            Identifier::Account(account) => write!(
                f,
                "{}:{}",
                account.home_page.as_deref().unwrap_or(""),
                account.name.as_deref().unwrap_or("")
            ),
        }
    }
}

fn inverse_identifier(identity: &InverseIdentifier) -> Option<Identifier<'_>> {
    identity
        .mbox
        .as_deref()
        .or(identity.openid.as_deref())
        .or(identity.mbox_sha1sum.as_deref())
        .map(Identifier::Iri)
        .or_else(|| identity.account.as_ref().map(Identifier::Account))
}

/// The identifier of `entity`. Sub-statements have none.
pub fn identifier<'a>(entity: impl Into<Entity<'a>>) -> Option<Identifier<'a>> {
    match entity.into() {
        Entity::Activity(a) => a.id.as_deref().map(Identifier::Iri),
        Entity::Agent(a) => inverse_identifier(&a.identity),
        Entity::Group(g) => inverse_identifier(&g.identity),
        Entity::Verb(v) => v.id.as_deref().map(Identifier::Iri),
        Entity::SubStatement(_) => None,
        Entity::StatementRef(r) => r.id.as_deref().map(Identifier::Iri),
    }
}

// Anonymous groups are named after their members.
fn actor_id_string(identity: &InverseIdentifier, members: Option<&[Agent]>) -> String {
    if let Some(iri) = identity
        .mbox
        .as_deref()
        .or(identity.openid.as_deref())
        .or(identity.mbox_sha1sum.as_deref())
    {
        return iri.to_string();
    }
    if let Some(account) = &identity.account {
        return Identifier::Account(account).to_string();
    }
    if let Some(members) = members {
        let listed: Vec<String> = members.iter().map(|m| actor_id_string(&m.identity, None)).collect();
        return format!("Anon Group {}", listed.join(","));
    }
    UNKNOWN.to_string()
}

fn present(text: &Option<String>) -> Option<String> {
    text.as_ref().filter(|t| !t.is_empty()).cloned()
}

// ------------- Resolver -------------
#[derive(Debug, Clone, Default)]
pub struct EntityResolver<P = SystemLocale> {
    languages: LanguageResolver<P>,
}

impl<P: LocaleProvider> EntityResolver<P> {
    pub fn new(provider: P) -> Self {
        Self {
            languages: LanguageResolver::new(provider),
        }
    }
    pub fn languages(&self) -> &LanguageResolver<P> {
        &self.languages
    }

    pub fn identifier<'a>(&self, entity: impl Into<Entity<'a>>) -> Option<Identifier<'a>> {
        identifier(entity)
    }

    /// Like [`identifier`](Self::identifier), but always yields a string.
    pub fn identifier_string<'a>(&self, entity: impl Into<Entity<'a>>) -> String {
        let preference = self.languages.preference(None);
        self.identifier_string_in(&preference, entity.into())
    }

    pub fn display<'a>(&self, entity: impl Into<Entity<'a>>) -> Option<String> {
        let preference = self.languages.preference(None);
        self.display_in(&preference, entity.into())
    }

    /// `actorId:verbDisplay:objectId`, or `None` for nested sub-statements and
    /// for stored statements posing as sub-statements.
    pub fn sub_statement_display(&self, sub: &SubStatement) -> Option<String> {
        let preference = self.languages.preference(None);
        self.sub_statement_display_in(&preference, sub)
    }

    /// `<actor> <verb> <object>`, each part displayed or `unknown`.
    pub fn statement_display(&self, statement: &Statement) -> String {
        let preference = self.languages.preference(None);
        let part = |entity: Option<Entity>| {
            entity
                .and_then(|e| self.display_in(&preference, e))
                .unwrap_or_else(|| UNKNOWN.to_string())
        };
        format!(
            "{} {} {}",
            part(statement.actor.as_ref().map(Entity::from)),
            part(statement.verb.as_ref().map(Entity::from)),
            part(statement.object.as_ref().map(Entity::from)),
        )
    }

    fn label(&self, preference: &Preference<'_, P>, map: Option<&LanguageMap>) -> Option<String> {
        preference.resolve_where(map, |l: &String| !l.is_empty()).cloned()
    }

    fn identifier_string_in(&self, preference: &Preference<'_, P>, entity: Entity) -> String {
        let found = match entity {
            Entity::Agent(a) => return actor_id_string(&a.identity, None),
            Entity::Group(g) => return actor_id_string(&g.identity, g.member.as_deref()),
            Entity::Activity(a) => a.id.clone(),
            Entity::Verb(v) => v.id.clone(),
            Entity::StatementRef(r) => r.id.clone(),
            Entity::SubStatement(s) => self.sub_statement_display_in(preference, s),
        };
        found.unwrap_or_else(|| UNKNOWN.to_string())
    }

    fn display_in(&self, preference: &Preference<'_, P>, entity: Entity) -> Option<String> {
        match entity {
            Entity::Activity(a) => a
                .definition
                .as_ref()
                .and_then(|d| self.label(preference, d.name.as_ref()))
                .or_else(|| present(&a.name))
                .or_else(|| a.id.clone()),
            Entity::Agent(a) => present(&a.name).or_else(|| Some(actor_id_string(&a.identity, None))),
            Entity::Group(g) => {
                present(&g.name).or_else(|| Some(actor_id_string(&g.identity, g.member.as_deref())))
            }
            Entity::Verb(v) => self.verb_display_in(preference, v),
            Entity::SubStatement(s) => self.sub_statement_display_in(preference, s),
            Entity::StatementRef(r) => r.id.clone(),
        }
    }

    fn verb_display_in(&self, preference: &Preference<'_, P>, verb: &Verb) -> Option<String> {
        self.label(preference, verb.display.as_ref()).or_else(|| verb.id.clone())
    }

    fn sub_statement_display_in(&self, preference: &Preference<'_, P>, sub: &SubStatement) -> Option<String> {
        if matches!(sub.object, Some(StatementObject::SubStatement(_))) {
            debug!("sub-statement nested in a sub-statement has no compact display");
            return None;
        }
        if sub.has_persistence_markers() {
            debug!(id = ?sub.id, "stored statement passed as a sub-statement");
            return None;
        }
        let actor = sub.actor.as_ref().and_then(|e| identifier(e)).map(|i| i.to_string()).unwrap_or_default();
        let verb = sub
            .verb
            .as_ref()
            .and_then(|v| self.verb_display_in(preference, v))
            .unwrap_or_default();
        let object = sub.object.as_ref().and_then(|e| identifier(e)).map(|i| i.to_string()).unwrap_or_default();
        Some(format!("{}:{}:{}", actor, verb, object))
    }
}
