//! The scene owns every node of one diagram and keeps relations and their
//! endpoint registries in step.

use indexmap::IndexMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::entity::{Entity, EntityOptions};
use crate::link::{LinkEnd, Linkable};
use crate::node::{Node, NodeId, NodeKind};
use crate::relation::{Relation, RelationOptions};

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("node {0} not found")]
    NotFound(NodeId),
    #[error("node {id} is a {found}, expected {expected}")]
    WrongKind {
        id: NodeId,
        expected: NodeKind,
        found: NodeKind,
    },
    #[error("node {0} already exists")]
    DuplicateId(NodeId),
    #[error("entity title must not be empty")]
    EmptyTitle,
    #[error("entity {0} already exists")]
    DuplicateTitle(String),
    #[error("entity {0} needs at least one field")]
    NoFields(String),
    #[error("relation cannot connect entity {0} to itself")]
    SelfReference(NodeId),
    #[error("relation {0} could not be attached to both entities")]
    IncompleteRelation(NodeId),
}

/// Nodes in draw order, back to front.
#[derive(Debug, Clone, Default)]
pub struct Scene {
    nodes: IndexMap<NodeId, Node>,
    needs_redraw: bool,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.nodes.values().filter_map(Node::as_entity)
    }

    pub fn relations(&self) -> impl Iterator<Item = &Relation> {
        self.nodes.values().filter_map(Node::as_relation)
    }

    pub fn entity(&self, id: &NodeId) -> Result<&Entity, SceneError> {
        let node = self.node(id)?;
        node.as_entity().ok_or_else(|| wrong_kind(id, NodeKind::Entity, node.kind()))
    }

    pub fn relation(&self, id: &NodeId) -> Result<&Relation, SceneError> {
        let node = self.node(id)?;
        node.as_relation()
            .ok_or_else(|| wrong_kind(id, NodeKind::Relation, node.kind()))
    }

    pub fn find_entity_by_title(&self, title: &str) -> Option<&Entity> {
        self.entities().find(|e| e.title == title)
    }

    /// Whether something changed since the last call.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Create an entity from editor input. The title must be non-empty and
    /// unique, and the table needs at least one column.
    pub fn add_entity(&mut self, options: EntityOptions) -> Result<NodeId, SceneError> {
        self.validate_title(&options.title, None)?;
        if options.fields.is_empty() {
            return Err(SceneError::NoFields(options.title));
        }
        let entity = Entity::new(options);
        let id = entity.id().clone();
        self.insert_node(Node::Entity(entity))?;
        Ok(id)
    }

    /// Create a detached relation.
    pub fn add_relation(&mut self, options: RelationOptions) -> Result<NodeId, SceneError> {
        let relation = Relation::new(options);
        let id = relation.id().clone();
        self.insert_node(Node::Relation(relation))?;
        Ok(id)
    }

    /// Insert a node as is, without validation or link resolution.
    pub fn insert_node(&mut self, node: Node) -> Result<(), SceneError> {
        let id = node.id().clone();
        if self.nodes.contains_key(&id) {
            return Err(SceneError::DuplicateId(id));
        }
        debug!("adding {} {}", node.kind(), id);
        self.nodes.insert(id, node);
        self.needs_redraw = true;
        Ok(())
    }

    /// Attach one end of `relation` to `node`.
    ///
    /// A previous node on that end is detached first. Returns `false` when
    /// the node refused the link; that case is logged, not an error.
    pub fn set_link(
        &mut self,
        relation: &NodeId,
        end: LinkEnd,
        node: &NodeId,
    ) -> Result<bool, SceneError> {
        self.relation(relation)?;
        let target = self.node(node)?;
        if !target.as_linkable().is_some_and(|l| l.is_linkable()) {
            warn!("{} {} is not linkable.", target.kind(), node);
            return Ok(false);
        }
        let name = target.title().to_string();

        if self.relation(relation)?.link(end).is_some() {
            self.remove_link(relation, end)?;
        }
        let registered = self
            .nodes
            .get_mut(node)
            .and_then(|n| n.as_linkable_mut())
            .is_some_and(|l| l.add_link(end, relation));
        if !registered {
            return Ok(false);
        }
        self.relation_mut(relation)?.attach(end, node.clone(), name);
        debug!("attached {:?} end of relation {} to {}", end, relation, node);

        self.update_link_coords(node)?;
        Ok(true)
    }

    pub fn set_link_from(&mut self, relation: &NodeId, node: &NodeId) -> Result<bool, SceneError> {
        self.set_link(relation, LinkEnd::From, node)
    }

    pub fn set_link_to(&mut self, relation: &NodeId, node: &NodeId) -> Result<bool, SceneError> {
        self.set_link(relation, LinkEnd::To, node)
    }

    /// Detach one end of `relation`, deregistering it from the node.
    /// Returns the node it was attached to.
    pub fn remove_link(
        &mut self,
        relation: &NodeId,
        end: LinkEnd,
    ) -> Result<Option<NodeId>, SceneError> {
        let Some(node) = self.relation_mut(relation)?.detach(end) else {
            return Ok(None);
        };
        if let Some(linkable) = self.nodes.get_mut(&node).and_then(|n| n.as_linkable_mut()) {
            linkable.remove_link(end, relation);
        }
        debug!("detached {:?} end of relation {} from {}", end, relation, node);
        self.needs_redraw = true;
        Ok(Some(node))
    }

    pub fn remove_link_from(&mut self, relation: &NodeId) -> Result<Option<NodeId>, SceneError> {
        self.remove_link(relation, LinkEnd::From)
    }

    pub fn remove_link_to(&mut self, relation: &NodeId) -> Result<Option<NodeId>, SceneError> {
        self.remove_link(relation, LinkEnd::To)
    }

    /// Pin every relation attached to `node` onto its anchor and draw those
    /// relations behind it.
    pub fn update_link_coords(&mut self, node: &NodeId) -> Result<(), SceneError> {
        let Some(linkable) = self.node(node)?.as_linkable() else {
            return Ok(());
        };
        for update in linkable.link_updates() {
            let Some(relation) = self
                .nodes
                .get_mut(&update.relation)
                .and_then(|n| n.as_relation_mut())
            else {
                warn!("Relation {} registered on {} is not in the scene.", update.relation, node);
                continue;
            };
            relation.set_endpoint(update.end, update.point);
            self.send_behind(&update.relation, node);
        }
        self.needs_redraw = true;
        Ok(())
    }

    pub fn move_entity(&mut self, id: &NodeId, left: f64, top: f64) -> Result<(), SceneError> {
        self.entity_mut(id)?.move_to(left, top);
        self.update_link_coords(id)
    }

    pub fn translate_entity(&mut self, id: &NodeId, dx: f64, dy: f64) -> Result<(), SceneError> {
        let geometry = self.entity(id)?.geometry;
        self.move_entity(id, geometry.left + dx, geometry.top + dy)
    }

    /// Run an edit on an entity, then refresh everything that depends on
    /// its title and size.
    ///
    /// Title edits through here skip validation; see [`Scene::set_entity_title`].
    pub fn edit_entity<R>(
        &mut self,
        id: &NodeId,
        edit: impl FnOnce(&mut Entity) -> R,
    ) -> Result<R, SceneError> {
        let entity = self.entity_mut(id)?;
        let result = edit(entity);

        let title = entity.title.clone();
        let outgoing: Vec<NodeId> = entity.links().out_links().cloned().collect();
        let incoming: Vec<NodeId> = entity.links().in_links().cloned().collect();
        for relation in &outgoing {
            if let Ok(r) = self.relation_mut(relation) {
                r.from_name = title.clone();
            }
        }
        for relation in &incoming {
            if let Ok(r) = self.relation_mut(relation) {
                r.to_name = title.clone();
            }
        }

        self.update_link_coords(id)?;
        Ok(result)
    }

    pub fn set_entity_title(&mut self, id: &NodeId, title: &str) -> Result<(), SceneError> {
        self.validate_title(title, Some(id))?;
        self.edit_entity(id, |entity| entity.set_title(title))
    }

    /// Remove a relation after deregistering it from both endpoints.
    pub fn remove_relation(&mut self, id: &NodeId) -> Result<Relation, SceneError> {
        self.remove_link(id, LinkEnd::From)?;
        self.remove_link(id, LinkEnd::To)?;
        match self.nodes.shift_remove(id) {
            Some(Node::Relation(relation)) => {
                debug!("removed relation {}", id);
                self.needs_redraw = true;
                Ok(relation)
            }
            _ => Err(SceneError::NotFound(id.clone())),
        }
    }

    /// Remove an entity together with every relation attached to it.
    pub fn remove_entity(&mut self, id: &NodeId) -> Result<Entity, SceneError> {
        let attached = self.entity(id)?.links().all();
        for relation in &attached {
            if self.nodes.contains_key(relation) {
                self.remove_relation(relation)?;
            }
        }
        match self.nodes.shift_remove(id) {
            Some(Node::Entity(entity)) => {
                debug!("removed entity {} with {} relations", id, attached.len());
                self.needs_redraw = true;
                Ok(entity)
            }
            _ => Err(SceneError::NotFound(id.clone())),
        }
    }

    pub fn remove(&mut self, id: &NodeId) -> Result<Node, SceneError> {
        match self.node(id)?.kind() {
            NodeKind::Entity => self.remove_entity(id).map(Node::Entity),
            NodeKind::Relation => self.remove_relation(id).map(Node::Relation),
        }
    }

    /// Draw a relation between two distinct entities.
    ///
    /// If either end cannot be attached the relation is removed again and
    /// [`SceneError::IncompleteRelation`] is returned.
    pub fn connect(
        &mut self,
        from: &NodeId,
        to: &NodeId,
        mut options: RelationOptions,
    ) -> Result<NodeId, SceneError> {
        if from == to {
            return Err(SceneError::SelfReference(from.clone()));
        }
        let start = self.entity(from)?.link_anchor();
        let end = self.entity(to)?.link_anchor();
        options.points = [start.x, start.y, end.x, end.y];

        let id = self.add_relation(options)?;
        let complete = matches!(self.set_link(&id, LinkEnd::From, from), Ok(true))
            && matches!(self.set_link(&id, LinkEnd::To, to), Ok(true));
        if !complete {
            self.remove_relation(&id)?;
            return Err(SceneError::IncompleteRelation(id));
        }
        Ok(id)
    }

    fn node(&self, id: &NodeId) -> Result<&Node, SceneError> {
        self.nodes
            .get(id)
            .ok_or_else(|| SceneError::NotFound(id.clone()))
    }

    fn entity_mut(&mut self, id: &NodeId) -> Result<&mut Entity, SceneError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| SceneError::NotFound(id.clone()))?;
        let found = node.kind();
        node.as_entity_mut()
            .ok_or_else(|| wrong_kind(id, NodeKind::Entity, found))
    }

    fn relation_mut(&mut self, id: &NodeId) -> Result<&mut Relation, SceneError> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| SceneError::NotFound(id.clone()))?;
        let found = node.kind();
        node.as_relation_mut()
            .ok_or_else(|| wrong_kind(id, NodeKind::Relation, found))
    }

    fn validate_title(&self, title: &str, except: Option<&NodeId>) -> Result<(), SceneError> {
        if title.trim().is_empty() {
            return Err(SceneError::EmptyTitle);
        }
        let taken = self
            .entities()
            .any(|e| e.title == title && Some(e.id()) != except);
        if taken {
            return Err(SceneError::DuplicateTitle(title.to_string()));
        }
        Ok(())
    }

    /// Move `id` directly below `anchor` in draw order when it is above it.
    fn send_behind(&mut self, id: &NodeId, anchor: &NodeId) {
        let (Some(from), Some(to)) = (self.nodes.get_index_of(id), self.nodes.get_index_of(anchor))
        else {
            return;
        };
        if from > to {
            self.nodes.move_index(from, to);
        }
    }
}

fn wrong_kind(id: &NodeId, expected: NodeKind, found: NodeKind) -> SceneError {
    SceneError::WrongKind {
        id: id.clone(),
        expected,
        found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Field;
    use crate::geometry::Point;
    use crate::relation::RelationType;
    use proptest::prelude::*;

    fn table(title: &str, left: f64) -> EntityOptions {
        EntityOptions::new(title, vec![Field::new("id", "int").primary()]).at(left, 0.0)
    }

    /// Every attached relation is registered on its endpoints and every
    /// registration points back at a relation attached there.
    fn assert_links_consistent(scene: &Scene) {
        for relation in scene.relations() {
            if let Some(from) = relation.link_from() {
                assert!(scene.entity(from).unwrap().links().has_out_link(relation.id()));
            }
            if let Some(to) = relation.link_to() {
                assert!(scene.entity(to).unwrap().links().has_in_link(relation.id()));
            }
        }
        for entity in scene.entities() {
            for id in entity.links().out_links() {
                assert_eq!(scene.relation(id).unwrap().link_from(), Some(entity.id()));
            }
            for id in entity.links().in_links() {
                assert_eq!(scene.relation(id).unwrap().link_to(), Some(entity.id()));
            }
        }
    }

    #[test]
    fn test_add_entity_validation() {
        let mut scene = Scene::new();
        scene.add_entity(table("User", 0.0)).unwrap();

        assert_eq!(scene.add_entity(table("  ", 0.0)), Err(SceneError::EmptyTitle));
        assert_eq!(
            scene.add_entity(table("User", 0.0)),
            Err(SceneError::DuplicateTitle("User".into()))
        );
        assert_eq!(
            scene.add_entity(EntityOptions::new("Empty", vec![])),
            Err(SceneError::NoFields("Empty".into()))
        );
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn test_connect_attaches_both_ends() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let role = scene.add_entity(table("Role", 400.0)).unwrap();
        let rel = scene
            .connect(&user, &role, RelationOptions::new(RelationType::ManyToMany))
            .unwrap();

        let relation = scene.relation(&rel).unwrap();
        assert_eq!(relation.link_from(), Some(&user));
        assert_eq!(relation.link_to(), Some(&role));
        assert_eq!(relation.from_name, "User");
        assert_eq!(relation.to_name, "Role");
        assert_eq!(relation.start(), scene.entity(&user).unwrap().link_anchor());
        assert_eq!(relation.end(), scene.entity(&role).unwrap().link_anchor());
        assert_links_consistent(&scene);
    }

    #[test]
    fn test_connect_rejects_self_reference() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        assert_eq!(
            scene.connect(&user, &user, RelationOptions::default()),
            Err(SceneError::SelfReference(user.clone()))
        );
        assert_eq!(scene.relations().count(), 0);
    }

    #[test]
    fn test_connect_reverts_when_an_end_refuses() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let mut locked = table("Locked", 400.0);
        locked.linkable = false;
        let locked = scene.add_entity(locked).unwrap();

        let err = scene
            .connect(&user, &locked, RelationOptions::default())
            .unwrap_err();
        assert!(matches!(err, SceneError::IncompleteRelation(_)));
        assert_eq!(scene.relations().count(), 0);
        assert!(scene.entity(&user).unwrap().links().is_empty());
    }

    #[test]
    fn test_relation_is_not_linkable() {
        let mut scene = Scene::new();
        let a = scene.add_relation(RelationOptions::default()).unwrap();
        let b = scene.add_relation(RelationOptions::default()).unwrap();
        assert_eq!(scene.set_link_to(&a, &b), Ok(false));
        assert!(scene.relation(&a).unwrap().is_detached());
    }

    #[test]
    fn test_reattach_moves_registration() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let role = scene.add_entity(table("Role", 400.0)).unwrap();
        let team = scene.add_entity(table("Team", 800.0)).unwrap();
        let rel = scene.connect(&user, &role, RelationOptions::default()).unwrap();

        assert_eq!(scene.set_link_to(&rel, &team), Ok(true));
        assert!(!scene.entity(&role).unwrap().links().has_in_link(&rel));
        assert!(scene.entity(&team).unwrap().links().has_in_link(&rel));
        assert_eq!(scene.relation(&rel).unwrap().to_name, "Team");
        assert_links_consistent(&scene);
    }

    #[test]
    fn test_remove_link_twice_is_noop() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let role = scene.add_entity(table("Role", 400.0)).unwrap();
        let rel = scene.connect(&user, &role, RelationOptions::default()).unwrap();

        assert_eq!(scene.remove_link_from(&rel), Ok(Some(user.clone())));
        assert_eq!(scene.remove_link_from(&rel), Ok(None));
        assert!(scene.entity(&user).unwrap().links().is_empty());
        assert_links_consistent(&scene);
    }

    #[test]
    fn test_remove_entity_removes_its_relations() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let role = scene.add_entity(table("Role", 400.0)).unwrap();
        let profile = scene.add_entity(table("Profile", 800.0)).unwrap();
        scene.connect(&user, &role, RelationOptions::default()).unwrap();
        scene.connect(&profile, &user, RelationOptions::default()).unwrap();

        scene.remove_entity(&user).unwrap();

        assert_eq!(scene.relations().count(), 0);
        assert_eq!(scene.entities().count(), 2);
        assert!(scene.entity(&role).unwrap().links().is_empty());
        assert!(scene.entity(&profile).unwrap().links().is_empty());
    }

    #[test]
    fn test_remove_relation_deregisters_both_ends() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let role = scene.add_entity(table("Role", 400.0)).unwrap();
        let rel = scene.connect(&user, &role, RelationOptions::default()).unwrap();

        let removed = scene.remove(&rel).unwrap();
        assert!(matches!(removed, Node::Relation(_)));
        assert!(scene.entity(&user).unwrap().links().is_empty());
        assert!(scene.entity(&role).unwrap().links().is_empty());
    }

    #[test]
    fn test_move_follows_attached_end_only() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let role = scene.add_entity(table("Role", 400.0)).unwrap();
        let rel = scene.connect(&user, &role, RelationOptions::default()).unwrap();
        let before = scene.relation(&rel).unwrap().clone();
        let center = scene.entity(&user).unwrap().link_anchor();

        scene.translate_entity(&user, 30.0, -12.5).unwrap();

        let after = scene.relation(&rel).unwrap();
        assert_eq!(after.start(), center.translate(30.0, -12.5));
        assert_eq!(after.start(), scene.entity(&user).unwrap().link_anchor());
        assert_eq!(after.end(), before.end());
    }

    #[test]
    fn test_relation_drawn_behind_entity() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let role = scene.add_entity(table("Role", 400.0)).unwrap();
        let rel = scene.connect(&user, &role, RelationOptions::default()).unwrap();

        let order: Vec<&NodeId> = scene.nodes().map(Node::id).collect();
        let pos = |id: &NodeId| order.iter().position(|n| *n == id).unwrap();
        assert!(pos(&rel) < pos(&user));
        assert!(pos(&rel) < pos(&role));
    }

    #[test]
    fn test_title_change_refreshes_names() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let role = scene.add_entity(table("Role", 400.0)).unwrap();
        let rel = scene.connect(&user, &role, RelationOptions::default()).unwrap();

        scene.set_entity_title(&user, "Account").unwrap();
        assert_eq!(scene.relation(&rel).unwrap().from_name, "Account");
        assert_eq!(
            scene.set_entity_title(&role, "Account"),
            Err(SceneError::DuplicateTitle("Account".into()))
        );
        assert!(scene.find_entity_by_title("Account").is_some());
        assert!(scene.find_entity_by_title("User").is_none());
    }

    #[test]
    fn test_field_edit_repins_relations() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let role = scene.add_entity(table("Role", 400.0)).unwrap();
        let rel = scene.connect(&user, &role, RelationOptions::default()).unwrap();

        scene
            .edit_entity(&user, |e| {
                for i in 0..8 {
                    e.add_field(Field::new(format!("col_{i}"), "int"));
                }
            })
            .unwrap();
        let anchor = scene.entity(&user).unwrap().link_anchor();
        assert_eq!(scene.relation(&rel).unwrap().start(), anchor);
    }

    #[test]
    fn test_wrong_kind_and_missing() {
        let mut scene = Scene::new();
        let rel = scene.add_relation(RelationOptions::default()).unwrap();
        assert!(matches!(
            scene.entity(&rel),
            Err(SceneError::WrongKind { expected: NodeKind::Entity, .. })
        ));
        let missing = NodeId::from("missing");
        assert_eq!(scene.move_entity(&missing, 0.0, 0.0), Err(SceneError::NotFound(missing)));
    }

    #[test]
    fn test_add_relation_rejects_taken_id() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let options = RelationOptions {
            id: Some(user.clone()),
            ..RelationOptions::default()
        };
        assert_eq!(scene.add_relation(options), Err(SceneError::DuplicateId(user.clone())));
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.entity(&user).unwrap().title, "User");
    }

    #[test]
    fn test_connect_with_taken_id_keeps_scene() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let role = scene.add_entity(table("Role", 400.0)).unwrap();
        let options = RelationOptions {
            id: Some(role.clone()),
            ..RelationOptions::default()
        };
        assert_eq!(
            scene.connect(&user, &role, options),
            Err(SceneError::DuplicateId(role.clone()))
        );
        assert_eq!(scene.relations().count(), 0);
        assert!(scene.entity(&role).is_ok());
        assert_links_consistent(&scene);
    }

    #[test]
    fn test_edit_entity_keeps_id() {
        let mut scene = Scene::new();
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        let role = scene.add_entity(table("Role", 400.0)).unwrap();
        scene.connect(&user, &role, RelationOptions::default()).unwrap();

        let seen = scene
            .edit_entity(&user, |e| {
                e.add_field(Field::new("email", "varchar"));
                e.id().clone()
            })
            .unwrap();
        assert_eq!(seen, user);
        assert!(scene.entity(&user).unwrap().is_linkable());
        assert_links_consistent(&scene);
    }

    #[test]
    fn test_take_redraw() {
        let mut scene = Scene::new();
        assert!(!scene.take_redraw());
        let user = scene.add_entity(table("User", 0.0)).unwrap();
        assert!(scene.take_redraw());
        assert!(!scene.take_redraw());
        scene.move_entity(&user, 5.0, 5.0).unwrap();
        assert!(scene.needs_redraw());
    }

    proptest! {
        #[test]
        fn link_coords_are_idempotent(
            moves in prop::collection::vec((-500.0f64..500.0, -500.0f64..500.0), 1..8),
        ) {
            let mut scene = Scene::new();
            let user = scene.add_entity(table("User", 0.0)).unwrap();
            let role = scene.add_entity(table("Role", 400.0)).unwrap();
            let rel = scene.connect(&user, &role, RelationOptions::default()).unwrap();

            for (left, top) in moves {
                scene.move_entity(&user, left, top).unwrap();
                let first: (Point, Point) = {
                    let r = scene.relation(&rel).unwrap();
                    (r.start(), r.end())
                };
                scene.update_link_coords(&user).unwrap();
                let r = scene.relation(&rel).unwrap();
                prop_assert_eq!(first, (r.start(), r.end()));
            }
            assert_links_consistent(&scene);
        }
    }
}
