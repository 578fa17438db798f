//! Schema derivation: fold entities and relations into table definitions.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::Field;
use crate::inflect::{camel_case, pluralize};
use crate::node::NodeId;
use crate::relation::{Relation, RelationType};
use crate::scene::Scene;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    #[serde(rename = "type")]
    pub typ: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u32>,
    pub primary: bool,
    pub nullable: bool,
    pub generated: bool,
}

impl From<&Field> for ColumnSchema {
    fn from(field: &Field) -> Self {
        Self {
            typ: field.typ.clone(),
            length: field.length,
            primary: field.primary,
            nullable: field.nullable,
            generated: field.generated,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinColumn {
    pub target: String,
    pub referenced_column_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinTable {
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationSchema {
    #[serde(rename = "type")]
    pub typ: RelationType,
    pub target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_column: Option<JoinColumn>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub join_table: Option<JoinTable>,
}

impl RelationSchema {
    fn new(typ: RelationType, target: &str) -> Self {
        Self {
            typ,
            target: target.to_string(),
            join_column: None,
            join_table: None,
        }
    }
}

/// One table of the derived schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySchema {
    pub name: String,
    pub columns: IndexMap<String, ColumnSchema>,
    #[serde(default)]
    pub relations: IndexMap<String, RelationSchema>,
}

impl EntitySchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
            relations: IndexMap::new(),
        }
    }
}

/// Derive one schema fragment per entity, in scene order, with the
/// relation metadata folded in on both sides.
///
/// Relations whose endpoints are not both entities of the scene are
/// skipped. A relation name derived twice on the same entity keeps the
/// later relation.
pub fn derive(scene: &Scene) -> Vec<EntitySchema> {
    let mut fragments: IndexMap<NodeId, EntitySchema> = scene
        .entities()
        .map(|entity| (entity.id().clone(), entity.to_schema_fragment()))
        .collect();

    for relation in scene.relations() {
        let (Some(from), Some(to)) = (relation.link_from(), relation.link_to()) else {
            debug!("skipping unattached relation {}", relation.id());
            continue;
        };
        if !fragments.contains_key(from) || !fragments.contains_key(to) {
            debug!("skipping relation {} with a missing endpoint", relation.id());
            continue;
        }
        let (from_side, to_side) = relation_entries(relation);
        if let (Some((key, schema)), Some(fragment)) = (from_side, fragments.get_mut(from)) {
            fragment.relations.insert(key, schema);
        }
        if let (Some((key, schema)), Some(fragment)) = (to_side, fragments.get_mut(to)) {
            fragment.relations.insert(key, schema);
        }
    }

    fragments.into_values().collect()
}

type Entry = Option<(String, RelationSchema)>;

/// Relation entries for the `from` entity and the `to` entity.
fn relation_entries(relation: &Relation) -> (Entry, Entry) {
    let from_name = relation.from_name.as_str();
    let to_name = relation.to_name.as_str();

    match relation.relation_type {
        RelationType::OneToOne => {
            let mut owner = RelationSchema::new(RelationType::OneToOne, to_name);
            owner.join_column = Some(JoinColumn {
                target: to_name.to_string(),
                referenced_column_name: relation.referenced_column_name.clone(),
            });
            (
                Some((camel_case(to_name), owner)),
                Some((
                    camel_case(from_name),
                    RelationSchema::new(RelationType::OneToOne, from_name),
                )),
            )
        }
        RelationType::OneToMany => (
            Some((
                camel_case(to_name),
                RelationSchema::new(RelationType::OneToMany, to_name),
            )),
            None,
        ),
        // Stored on the "one" side, so the direction flips.
        RelationType::ManyToOne => (
            None,
            Some((
                camel_case(from_name),
                RelationSchema::new(RelationType::OneToMany, from_name),
            )),
        ),
        RelationType::ManyToMany => {
            let mut owner = RelationSchema::new(RelationType::ManyToMany, to_name);
            owner.join_table = Some(JoinTable {
                target: to_name.to_string(),
            });
            (
                Some((pluralize(&camel_case(to_name)), owner)),
                Some((
                    pluralize(&camel_case(from_name)),
                    RelationSchema::new(RelationType::ManyToMany, from_name),
                )),
            )
        }
    }
}
