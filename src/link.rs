//! Link capability for nodes that relations can attach to.
//!
//! A linkable node only records the ids of the relations attached to it.
//! The scene owns both the node and the relations, and resolves the ids when
//! coordinates have to be pushed into the relations.

use indexmap::IndexSet;
use tracing::warn;

use crate::geometry::Point;
use crate::node::NodeId;

/// Which end of a relation a node sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEnd {
    /// Relation leaves the node (`x1, y1`).
    From,
    /// Relation enters the node (`x2, y2`).
    To,
}

/// Endpoint coordinate a relation has to take after its node moved.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkUpdate {
    pub relation: NodeId,
    pub end: LinkEnd,
    pub point: Point,
}

/// Inbound and outbound relation ids of one node, in attach order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinkRegistry {
    in_links: IndexSet<NodeId>,
    out_links: IndexSet<NodeId>,
}

impl LinkRegistry {
    pub fn in_links(&self) -> impl Iterator<Item = &NodeId> {
        self.in_links.iter()
    }

    pub fn out_links(&self) -> impl Iterator<Item = &NodeId> {
        self.out_links.iter()
    }

    pub fn has_in_link(&self, relation: &NodeId) -> bool {
        self.in_links.contains(relation)
    }

    pub fn has_out_link(&self, relation: &NodeId) -> bool {
        self.out_links.contains(relation)
    }

    pub fn len(&self) -> usize {
        self.in_links.len() + self.out_links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_links.is_empty() && self.out_links.is_empty()
    }

    /// Every attached relation, inbound first. A relation attached on both
    /// sides (self reference) is listed once.
    pub fn all(&self) -> Vec<NodeId> {
        let mut ids: IndexSet<NodeId> = self.in_links.clone();
        ids.extend(self.out_links.iter().cloned());
        ids.into_iter().collect()
    }

    fn set_for(&mut self, end: LinkEnd) -> &mut IndexSet<NodeId> {
        match end {
            LinkEnd::To => &mut self.in_links,
            LinkEnd::From => &mut self.out_links,
        }
    }
}

fn direction(end: LinkEnd) -> &'static str {
    match end {
        LinkEnd::To => "InLink",
        LinkEnd::From => "OutLink",
    }
}

/// Capability of a node that relations can attach to.
pub trait Linkable {
    fn node_id(&self) -> &NodeId;

    fn type_name(&self) -> &'static str;

    /// Whether registration is allowed at all.
    fn is_linkable(&self) -> bool;

    fn links(&self) -> &LinkRegistry;

    fn links_mut(&mut self) -> &mut LinkRegistry;

    /// Point relation ends are pinned to.
    fn link_anchor(&self) -> Point;

    /// Register `relation` on the given side. Non-linkable nodes and
    /// duplicate ids are warned about and left untouched.
    fn add_link(&mut self, end: LinkEnd, relation: &NodeId) -> bool {
        if !self.is_linkable() {
            warn!("{} {} is not linkable.", self.type_name(), self.node_id());
            return false;
        }
        if !self.links_mut().set_for(end).insert(relation.clone()) {
            warn!("{} {} already exists.", direction(end), relation);
            return false;
        }
        true
    }

    fn remove_link(&mut self, end: LinkEnd, relation: &NodeId) -> bool {
        if !self.is_linkable() {
            warn!("{} {} is not linkable.", self.type_name(), self.node_id());
            return false;
        }
        if !self.links_mut().set_for(end).shift_remove(relation) {
            warn!("{} {} is not registered on {}.", direction(end), relation, self.node_id());
            return false;
        }
        true
    }

    fn add_in_link(&mut self, relation: &NodeId) -> bool {
        self.add_link(LinkEnd::To, relation)
    }

    fn remove_in_link(&mut self, relation: &NodeId) -> bool {
        self.remove_link(LinkEnd::To, relation)
    }

    fn add_out_link(&mut self, relation: &NodeId) -> bool {
        self.add_link(LinkEnd::From, relation)
    }

    fn remove_out_link(&mut self, relation: &NodeId) -> bool {
        self.remove_link(LinkEnd::From, relation)
    }

    /// Endpoint coordinates every attached relation must take: inbound
    /// relations end at the anchor, outbound relations start there.
    fn link_updates(&self) -> Vec<LinkUpdate> {
        let anchor = self.link_anchor();
        let links = self.links();
        let inbound = links.in_links().map(|id| LinkUpdate {
            relation: id.clone(),
            end: LinkEnd::To,
            point: anchor,
        });
        let outbound = links.out_links().map(|id| LinkUpdate {
            relation: id.clone(),
            end: LinkEnd::From,
            point: anchor,
        });
        inbound.chain(outbound).collect()
    }
}
